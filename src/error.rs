//! Error types for the frame solver

use thiserror::Error;

/// Main error type for solver operations
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Node '{node}' referenced by {owner} not found in model")]
    NodeNotFound { node: String, owner: String },

    #[error("Section '{section}' referenced by member '{member}' not found in model")]
    SectionNotFound { section: String, member: String },

    #[error("Material '{material}' referenced by member '{member}' not found in model")]
    MaterialNotFound { material: String, member: String },

    #[error("Duplicate name '{0}' already exists")]
    DuplicateName(String),

    #[error(
        "Singular stiffness matrix at {dof} - model may be unstable or have insufficient supports"
    )]
    SingularMatrix { dof: String },

    #[error("Stiffness matrix is ill-conditioned at {dof} (scaled pivot {ratio:e})")]
    IllConditioned { dof: String, ratio: f64 },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Solve cancelled")]
    Cancelled,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for solver operations
pub type FrameResult<T> = Result<T, FrameError>;
