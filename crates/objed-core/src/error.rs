use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors from the file-level collaborators. Rebuilding itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("unsupported file extension: {}", .0.display())]
    UnsupportedExtension(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("no file selected")]
    NoFileSelected,

    #[error("invalid form data: {0}")]
    InvalidForm(String),
}
