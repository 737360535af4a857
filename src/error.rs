//! Error and warning types for archive scanning.
//!
//! Every [`Error`] is fatal: the scan stops at the first one and nothing that
//! was already extracted is rolled back. [`Warning`]s are collected into the
//! [`ScanReport`](crate::ScanReport) and only reported once the scan is over.

use thiserror::Error;

/// Problems with the archive contents themselves.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// The header signature is not the GNU tar magic.
    #[error("This does not look like a tar archive")]
    NotATarArchive,

    /// The header describes something other than a regular file.
    #[error("Unsupported header type: '{}'", .0.escape_ascii())]
    UnsupportedEntryType(u8),

    /// A block the archive promised is not there.
    #[error("Unexpected EOF in archive")]
    TruncatedArchive,
}

/// Fatal errors that abort a scan.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The sink refused to create the output file for an entry.
    #[error("{name}: Cannot open: {source}")]
    CreateFailed {
        /// Entry name as stored in the archive.
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O error from the archive source or while writing an artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the format error behind this error, if there is one.
    pub fn format_error(&self) -> Option<&FormatError> {
        match self {
            Error::Format(e) => Some(e),
            _ => None,
        }
    }
}

/// Non-fatal conditions, reported after the scan completes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Warning {
    /// The stream ended after only one zero block.
    #[error("A lone zero block at {block}")]
    LoneZeroBlock {
        /// Blocks consumed when the stream ended, payload blocks included.
        block: u64,
    },

    /// A requested name never appeared in the archive.
    #[error("{0}: Not found in archive")]
    EntryNotFound(String),
}

/// Result type for scanning operations.
pub type Result<T> = std::result::Result<T, Error>;
