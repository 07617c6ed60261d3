//! Error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    /// Ball speed must stay non-negative
    #[error("negative ball speed: {0}")]
    NegativeSpeed(f32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings parse error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("invalid setting: {0}")]
    InvalidSetting(String),
}
