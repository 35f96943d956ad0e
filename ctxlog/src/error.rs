use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not create/open log file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not redirect stderr to the log file: {0}")]
    Capture(#[source] io::Error),

    #[error("stderr capture is not supported for this logger on this platform")]
    CaptureUnsupported,
}
