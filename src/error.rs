//! Error types for the DCM exporter.

use thiserror::Error;

/// Result type alias using DcmError.
pub type Result<T> = std::result::Result<T, DcmError>;

/// Main error type for DCM export operations.
#[derive(Error, Debug)]
pub enum DcmError {
    /// Export was attempted while the host is in a state that forbids it.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Nothing in the export scope has mesh geometry.
    #[error("No export targets with resolvable mesh geometry")]
    NoExportTargets,

    /// An export target has neither a direct nor a skinned mesh.
    /// Recovered by skipping the target.
    #[error("Unresolvable mesh for object: {0}")]
    UnresolvableMesh(String),

    /// A material slot is empty or refers to a material that does not exist.
    /// Recovered by skipping the material.
    #[error("Missing material: {0}")]
    MissingMaterial(String),

    /// I/O error while writing the output file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a scene or configuration document.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Source mesh data is malformed.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// A submesh needs more indices than the 16-bit index count can hold.
    #[error("Submesh of '{mesh}' has {count} indices, more than the format allows (65535)")]
    IndexOverflow { mesh: String, count: usize },

    /// A file header count does not fit in its 8-bit field.
    #[error("Too many {what}: {count} (max 255)")]
    CountOverflow { what: &'static str, count: usize },

    /// Records written do not match the counts declared in the file header.
    #[error("Header declares {declared} {what} but {written} were written")]
    CountMismatch {
        what: &'static str,
        declared: usize,
        written: usize,
    },

    /// The file assembler was driven out of order.
    #[error("Assembler state error: expected {expected:?}, was {actual:?}")]
    InvalidState {
        expected: crate::export::assembler::AssemblerState,
        actual: crate::export::assembler::AssemblerState,
    },
}
