//! Sequential reader for GNU tar archives.
//!
//! The crate walks an archive one 512-byte block at a time, either listing
//! the names of its entries or extracting them through an [`ArtifactSink`].
//! Only regular files are supported; any other entry type aborts the scan.
//!
//! ```no_run
//! use std::fs::File;
//!
//! use mytar::{DirectorySink, Mode, ScanConfig, Scanner};
//!
//! let archive = File::open("archive.tar").unwrap();
//! let config = ScanConfig { mode: Mode::List, verbose: false };
//! let scanner = Scanner::new(config, Vec::<String>::new());
//! let report = scanner
//!     .run(archive, &mut DirectorySink::new("."), &mut std::io::stdout())
//!     .unwrap();
//! for warning in report.warnings() {
//!     eprintln!("{warning}");
//! }
//! ```

pub mod error;
pub mod extract;
pub mod header;
pub mod octal;
pub mod scan;
pub mod selection;
mod util;


pub use error::{Error, FormatError, Result, Warning};
pub use extract::{extract_entry, ArtifactSink, DirectorySink};
pub use header::{HeaderRecord, BLOCK_SIZE};
pub use scan::{Mode, ScanConfig, ScanReport, Scanner};
pub use selection::Selection;
