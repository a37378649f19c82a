use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageListError {
    #[error("No current image")]
    NoCurrentImage,

    #[error("Failed to decode image {path:?}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to encode image {path:?}: {source}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to write image {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ImageListError {
    /// Splits an encoder failure into I/O problems and format problems.
    pub fn from_save(path: PathBuf, err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(source) => ImageListError::Write { path, source },
            source => ImageListError::Encode { path, source },
        }
    }
}

pub type Result<T> = std::result::Result<T, ImageListError>;
