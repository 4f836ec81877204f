mod parser;
mod writer;

pub use parser::*;
pub use writer::*;

/// Error types for the PLY module.
#[derive(Debug, thiserror::Error)]
pub enum PlyError {
    /// Failed to read or write the PLY file
    #[error("Failed to read or write PLY file. {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or unsupported PLY header
    #[error("Malformed PLY header: {0}")]
    Header(String),

    /// Malformed vertex data
    #[error("Malformed PLY vertex data: {0}")]
    Vertex(String),

    /// The background export thread ended without reporting a result
    #[error("Export thread ended without a result")]
    ExportAborted,
}
