// One error enum for the whole crate.
// Every variant states *where* things went wrong.
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Creating the window failed (no display, no GL/X11 surface, ...).
    #[error("window init error: {0}")]
    WindowInit(String),
    /// Pushing the frame buffer to the window failed.
    #[error("window update error: {0}")]
    WindowUpdate(String),
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid color {0:?}: expected \"#RRGGBB\"")]
    InvalidColor(String),
    #[error("export error: {0}")]
    Export(String),
    #[error("logging has already been initialised")]
    LoggingInit,
}
