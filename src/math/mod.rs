//! Mathematical utilities: coordinate transformation and member stiffness

pub mod solve;
pub mod sparse;

use nalgebra::{DMatrix, DVector, Matrix3, SMatrix, SVector, Vector3};

use crate::error::{FrameError, FrameResult};

pub use solve::{solve_system, SolveFailure};
pub use sparse::{SkylineCholesky, SparseMatrixBuilder};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;
pub type Mat3 = Matrix3<f64>;
pub type Vec3 = Vector3<f64>;

/// 12x12 matrix for member stiffness
pub type Mat12 = SMatrix<f64, 12, 12>;
/// 12-element vector for member forces/displacements
pub type Vec12 = SVector<f64, 12>;

/// Relative size of the horizontal projection below which a member counts as
/// parallel to global Z
const VERTICAL_TOLERANCE: f64 = 1e-10;

/// Compute the 3x3 rotation from global to member-local axes
///
/// Rows of the result are the local x, y, z axes expressed in global
/// coordinates:
/// - local x points along `v`
/// - local y = normalize(ref × x) with ref = global Z, or global X when `v`
///   is parallel to global Z
/// - local z = x × y
///
/// `theta` then rolls local y and z about local x.
pub fn rotation_matrix(v: &Vec3, theta: f64) -> FrameResult<Mat3> {
    let length = v.norm();
    if !(length.is_finite() && length > 0.0) {
        return Err(FrameError::InvalidGeometry(format!(
            "direction vector [{}, {}, {}] has no length",
            v.x, v.y, v.z
        )));
    }
    let x = v / length;

    let reference = if v.x.hypot(v.y) <= VERTICAL_TOLERANCE * length {
        Vec3::x()
    } else {
        Vec3::z()
    };
    let y = reference.cross(&x).normalize();
    let z = x.cross(&y);

    let (y, z) = if theta != 0.0 {
        let (sin_t, cos_t) = theta.sin_cos();
        (y * cos_t + z * sin_t, z * cos_t - y * sin_t)
    } else {
        (y, z)
    };

    Ok(Mat3::from_rows(&[x.transpose(), y.transpose(), z.transpose()]))
}

/// Build the 12x12 block-diagonal transformation with `r` on each of the
/// four 3x3 blocks (n1 translation, n1 rotation, n2 translation, n2 rotation)
pub fn transformation_matrix(r: &Mat3) -> Mat12 {
    let mut t = Mat12::zeros();
    for block in 0..4 {
        let offset = block * 3;
        t.fixed_view_mut::<3, 3>(offset, offset).copy_from(r);
    }
    t
}

/// Transform a local member stiffness to global axes: Tᵀ · K · T
///
/// The result is symmetrized so that it is exactly symmetric in floating
/// point.
pub fn to_global(k_local: &Mat12, r: &Mat3) -> Mat12 {
    let t = transformation_matrix(r);
    let k = t.transpose() * k_local * t;
    (k + k.transpose()) * 0.5
}

/// Local stiffness of an axial-only (truss) member
///
/// Only the local-x translations of both ends are coupled.
pub fn axial_local_stiffness(ea: f64, length: f64) -> Mat12 {
    let k = ea / length;
    let mut m = Mat12::zeros();
    m[(0, 0)] = k;
    m[(0, 6)] = -k;
    m[(6, 0)] = -k;
    m[(6, 6)] = k;
    m
}

/// Section and material constants of a frame member
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameProperties {
    /// Modulus of elasticity
    pub e: f64,
    /// Shear modulus
    pub g: f64,
    /// Cross-sectional area
    pub ax: f64,
    /// Shear area in local y
    pub ay: f64,
    /// Shear area in local z
    pub az: f64,
    /// Moment of inertia about local y-axis
    pub iy: f64,
    /// Moment of inertia about local z-axis
    pub iz: f64,
    /// Torsional constant
    pub j: f64,
}

impl FrameProperties {
    /// Shear flexibility ratio 12·E·I / (G·As·L²), zero when the shear area
    /// or G is not given
    fn shear_ratio(&self, inertia: f64, shear_area: f64, length: f64) -> f64 {
        if self.g > 0.0 && shear_area > 0.0 {
            12.0 * self.e * inertia / (self.g * shear_area * length * length)
        } else {
            0.0
        }
    }
}

/// Compute the local stiffness matrix for a 3D frame element
///
/// DOF order per end is [DX, DY, DZ, RX, RY, RZ]. Bending in the local x-y
/// plane uses Iz, bending in the local x-z plane uses Iy.
///
/// With `shear_deformation` false this is the Euler-Bernoulli element. With
/// it true, bending terms carry the Timoshenko correction built from the
/// shear areas Ay (x-y plane) and Az (x-z plane).
pub fn frame_local_stiffness(
    props: &FrameProperties,
    length: f64,
    shear_deformation: bool,
) -> Mat12 {
    let l = length;
    let l2 = l * l;
    let l3 = l2 * l;

    let (phi_y, phi_z) = if shear_deformation {
        (
            props.shear_ratio(props.iz, props.ay, l),
            props.shear_ratio(props.iy, props.az, l),
        )
    } else {
        (0.0, 0.0)
    };

    let ea_l = props.e * props.ax / l;
    let gj_l = props.g * props.j / l;

    // x-y plane (v, θz)
    let eiz = props.e * props.iz / (1.0 + phi_y);
    let z12 = 12.0 * eiz / l3;
    let z6 = 6.0 * eiz / l2;
    let z4 = (4.0 + phi_y) * eiz / l;
    let z2 = (2.0 - phi_y) * eiz / l;

    // x-z plane (w, θy)
    let eiy = props.e * props.iy / (1.0 + phi_z);
    let y12 = 12.0 * eiy / l3;
    let y6 = 6.0 * eiy / l2;
    let y4 = (4.0 + phi_z) * eiy / l;
    let y2 = (2.0 - phi_z) * eiy / l;

    #[rustfmt::skip]
    let data = [
        // Row 0: axial at n1
        ea_l,   0.0,   0.0,   0.0,   0.0,   0.0,  -ea_l,  0.0,   0.0,   0.0,   0.0,   0.0,
        // Row 1: shear Fy at n1
        0.0,    z12,   0.0,   0.0,   0.0,   z6,    0.0,  -z12,   0.0,   0.0,   0.0,   z6,
        // Row 2: shear Fz at n1
        0.0,    0.0,   y12,   0.0,  -y6,    0.0,   0.0,   0.0,  -y12,   0.0,  -y6,    0.0,
        // Row 3: torsion at n1
        0.0,    0.0,   0.0,   gj_l,  0.0,   0.0,   0.0,   0.0,   0.0,  -gj_l,  0.0,   0.0,
        // Row 4: moment My at n1
        0.0,    0.0,  -y6,    0.0,   y4,    0.0,   0.0,   0.0,   y6,    0.0,   y2,    0.0,
        // Row 5: moment Mz at n1
        0.0,    z6,    0.0,   0.0,   0.0,   z4,    0.0,  -z6,    0.0,   0.0,   0.0,   z2,
        // Row 6: axial at n2
       -ea_l,   0.0,   0.0,   0.0,   0.0,   0.0,   ea_l,  0.0,   0.0,   0.0,   0.0,   0.0,
        // Row 7: shear Fy at n2
        0.0,   -z12,   0.0,   0.0,   0.0,  -z6,    0.0,   z12,   0.0,   0.0,   0.0,  -z6,
        // Row 8: shear Fz at n2
        0.0,    0.0,  -y12,   0.0,   y6,    0.0,   0.0,   0.0,   y12,   0.0,   y6,    0.0,
        // Row 9: torsion at n2
        0.0,    0.0,   0.0,  -gj_l,  0.0,   0.0,   0.0,   0.0,   0.0,   gj_l,  0.0,   0.0,
        // Row 10: moment My at n2
        0.0,    0.0,  -y6,    0.0,   y2,    0.0,   0.0,   0.0,   y6,    0.0,   y4,    0.0,
        // Row 11: moment Mz at n2
        0.0,    z6,    0.0,   0.0,   0.0,   z2,    0.0,  -z6,    0.0,   0.0,   0.0,   z4,
    ];

    Mat12::from_row_slice(&data)
}
