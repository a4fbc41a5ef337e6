/// Top-level failure for one run of the countdown.

use std::io;

use thiserror::Error;

use crate::domain::layout::LayoutError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}
