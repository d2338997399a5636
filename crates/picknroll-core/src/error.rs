use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Image has zero natural dimensions: {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    #[error("No candidates to roll from")]
    EmptyCandidatePool,

    #[error("Candidate index {index} out of range (total: {total})")]
    CandidateIndexOutOfRange { index: usize, total: usize },

    #[error("History index {index} out of range (length: {len})")]
    HistoryIndexOutOfRange { index: usize, len: usize },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ViewerError>;
