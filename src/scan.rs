//! The block-by-block archive scanner.
//!
//! The scanner reads one block at a time. Zero blocks drive a small state
//! machine that recognizes the two-block terminator; every other block must
//! be a valid header, which is then listed, extracted, or skipped over
//! depending on the [`ScanConfig`] and the requested names.
//!
//! Any [`Error`](crate::Error) ends the scan immediately. Whatever was printed or
//! extracted before that point stays done.

use std::io::{Read, Seek, SeekFrom, Write};

use log::{debug, trace};

use crate::error::{FormatError, Result, Warning};
use crate::extract::{extract_entry, ArtifactSink};
use crate::header::{is_zero_block, HeaderRecord, BLOCK_SIZE};
use crate::selection::Selection;
use crate::util::read_full;

/// What to do with selected entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Print the name of each selected entry.
    List,
    /// Write each selected entry through the sink.
    Extract,
}

/// Run-wide settings, fixed before the scan starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    pub mode: Mode,
    /// Also print names while extracting.
    pub verbose: bool,
}

impl ScanConfig {
    fn prints_names(&self) -> bool {
        match self.mode {
            Mode::List => true,
            Mode::Extract => self.verbose,
        }
    }
}

/// Progress through the end-of-archive marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Scanning,
    /// One zero block has been seen. Headers may still follow it; the next
    /// zero block, adjacent or not, ends the archive.
    SawOneZero,
    /// A second zero block; the archive is over.
    Done,
}

/// Outcome of a scan that did not hit a fatal error.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanReport {
    warnings: Vec<Warning>,
    entries: u64,
    selected: u64,
}

impl ScanReport {
    /// Non-fatal problems, in the order they were found.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Number of entry headers read.
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Number of entries that were listed or extracted.
    pub fn selected(&self) -> u64 {
        self.selected
    }

    /// Requested names that never showed up in the archive.
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.warnings.iter().filter_map(|w| match w {
            Warning::EntryNotFound(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// True if the run as a whole must be considered a failure.
    ///
    /// A lone zero block alone does not fail the run; a missing name does.
    pub fn failed(&self) -> bool {
        self.missing().next().is_some()
    }
}

/// Scans a single archive. Consumed by [`Scanner::run`].
#[derive(Debug)]
pub struct Scanner {
    config: ScanConfig,
    selection: Selection,
}

impl Scanner {
    /// Creates a scanner for the given requested names; no names selects
    /// every entry.
    pub fn new<I, S>(config: ScanConfig, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            config,
            selection: Selection::new(names),
        }
    }

    /// Scans `source` from its start.
    ///
    /// Selected names are written, one per line, to `out`. In
    /// [`Mode::Extract`] selected entries are written through `sink`.
    pub fn run<R, S, W>(mut self, mut source: R, sink: &mut S, out: &mut W) -> Result<ScanReport>
    where
        R: Read + Seek,
        S: ArtifactSink + ?Sized,
        W: Write + ?Sized,
    {
        let archive_len = source.seek(SeekFrom::End(0))?;
        source.seek(SeekFrom::Start(0))?;
        debug!("scanning {archive_len} byte archive in {:?} mode", self.config.mode);

        let mut report = ScanReport::default();
        let mut state = ScanState::Scanning;
        let mut blocks_read: u64 = 0;
        let mut block = [0u8; BLOCK_SIZE];

        while state != ScanState::Done {
            if !read_block(&mut source, &mut block)? {
                break;
            }
            blocks_read += 1;

            if is_zero_block(&block) {
                trace!("zero block at {blocks_read}");
                state = match state {
                    ScanState::Scanning => ScanState::SawOneZero,
                    _ => ScanState::Done,
                };
                continue;
            }

            let header = HeaderRecord::decode(&block)?;
            report.entries += 1;

            let selected = self.selection.mark(&header.name);
            debug!(
                "{}: {} bytes, {} blocks, selected: {selected}",
                header.name,
                header.size,
                header.block_count()
            );

            if selected {
                report.selected += 1;
                if self.config.prints_names() {
                    writeln!(out, "{}", header.name)?;
                    out.flush()?;
                }
            }

            if selected && self.config.mode == Mode::Extract {
                extract_entry(&mut source, &header, sink)?;
            } else {
                skip_payload(&mut source, &header)?;
            }

            let pos = source.stream_position()?;
            if pos > archive_len {
                debug!("{}: payload ends at {pos}, past end of archive", header.name);
                return Err(FormatError::TruncatedArchive.into());
            }
            blocks_read += header.block_count();
        }

        if state == ScanState::SawOneZero {
            report.warnings.push(Warning::LoneZeroBlock { block: blocks_read });
        }

        report.warnings.extend(
            self.selection
                .finalize()
                .into_iter()
                .map(Warning::EntryNotFound),
        );

        Ok(report)
    }
}

/// Reads the next block. Returns false once no complete block is left.
fn read_block(source: &mut impl Read, block: &mut [u8; BLOCK_SIZE]) -> Result<bool> {
    match read_full(source, block)? {
        BLOCK_SIZE => Ok(true),
        0 => Ok(false),
        n => {
            debug!("ignoring partial trailing block of {n} bytes");
            Ok(false)
        }
    }
}

/// Seeks past the payload of an entry without reading it.
fn skip_payload(source: &mut impl Seek, header: &HeaderRecord) -> Result<()> {
    let len = header
        .block_count()
        .checked_mul(BLOCK_SIZE as u64)
        .and_then(|len| i64::try_from(len).ok())
        .ok_or(FormatError::TruncatedArchive)?;
    trace!("{}: skipping {len} bytes", header.name);
    source.seek(SeekFrom::Current(len))?;
    Ok(())
}
