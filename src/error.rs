use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ErrorType {
    #[error("Unable to read effects catalog {}: {source}", .path.display())]
    CatalogIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Unable to read effects record at line {line}: {source}")]
    CatalogRead {
        line: usize,
        source: std::io::Error,
    },
    #[error("Malformed effects record at line {line}: {source}")]
    CatalogParse {
        line: usize,
        source: serde_json::Error,
    },
    #[error("Unable to load image {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Unable to save image {}: {source}", .path.display())]
    Save {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Thread count must be at least 1")]
    InvalidThreadCount,
}
