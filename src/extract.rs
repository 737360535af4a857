//! Copying entry payloads out of the archive.

use std::{
    fs::File,
    io::{self, Read, Write},
    path::PathBuf,
};

use log::{debug, trace};

use crate::error::{Error, FormatError, Result};
use crate::header::{HeaderRecord, BLOCK_SIZE};

/// Creates the output artifacts that extracted entries are written to.
pub trait ArtifactSink {
    type Artifact: Write;

    /// Creates a new, empty artifact for the entry called `name`.
    fn create(&mut self, name: &str) -> io::Result<Self::Artifact>;
}

/// Writes extracted entries as files below a destination directory.
///
/// Existing files are truncated. Missing parent directories are not created,
/// so an entry inside a directory that does not exist fails to extract.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ArtifactSink for DirectorySink {
    type Artifact = File;

    fn create(&mut self, name: &str) -> io::Result<File> {
        File::create(self.root.join(name))
    }
}

/// Extracts the entry described by `header` into a new artifact.
///
/// `source` must be positioned just past the header block. On success exactly
/// `header.block_count()` blocks have been consumed from it and the artifact,
/// which is `header.size` bytes long, has been flushed and closed.
pub fn extract_entry<R, S>(source: &mut R, header: &HeaderRecord, sink: &mut S) -> Result<()>
where
    R: Read,
    S: ArtifactSink + ?Sized,
{
    let mut artifact = sink.create(&header.name).map_err(|source| Error::CreateFailed {
        name: header.name.clone(),
        source,
    })?;

    let blocks = header.block_count();
    debug!("extracting {} ({} bytes, {blocks} blocks)", header.name, header.size);

    let mut buf = [0u8; BLOCK_SIZE];
    for index in 0..blocks {
        source.read_exact(&mut buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => Error::Format(FormatError::TruncatedArchive),
            _ => Error::Io(e),
        })?;

        let len = if index + 1 == blocks {
            header.tail_len()
        } else {
            BLOCK_SIZE
        };
        trace!("{}: block {index} -> {len} bytes", header.name);
        artifact.write_all(&buf[..len])?;
    }

    artifact.flush()?;
    Ok(())
}
