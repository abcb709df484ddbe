//! Structural elements module

mod boundary;
mod material;
mod member;
mod node;
pub(crate) mod node_ref;
mod section;
mod shape;

pub use boundary::{Boundary, Restraint};
pub use material::Material;
pub use member::{Member, MemberKind};
pub use node::Node;
pub use section::Section;
pub use shape::{SectionDefinition, Shape};
