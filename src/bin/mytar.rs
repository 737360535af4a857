use std::{fs::File, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use thiserror::Error;

use mytar::{DirectorySink, FormatError, Mode, ScanConfig, Scanner};

const NOT_RECOVERABLE: &str = "Error is not recoverable: exiting now";
const FAILURE_STATUS: &str = "Exiting with failure status due to previous errors";

/// mytar
#[derive(Debug, Parser)]
#[clap(name = "mytar", version)]
pub struct App {
    /// the archive to read
    #[clap(short = 'f', long = "file")]
    file: Option<PathBuf>,
    /// list the contents of the archive
    #[clap(short = 't', long = "list")]
    list: bool,
    /// extract files from the archive
    #[clap(short = 'x', long = "extract")]
    extract: bool,
    /// print the names of extracted files
    #[clap(short, long)]
    verbose: bool,
    /// extract into this directory
    #[clap(short = 'C', long = "directory", default_value = ".")]
    directory: PathBuf,
    /// only list or extract these entries
    names: Vec<String>,
}

#[derive(Debug, Error)]
enum UsageError {
    #[error("Refusing to read archive contents from terminal")]
    NoArchive,
    #[error("You must specify either -t or -x option")]
    Mode,
}

impl App {
    fn config(&self) -> Result<(&PathBuf, ScanConfig), UsageError> {
        let file = self.file.as_ref().ok_or(UsageError::NoArchive)?;
        let mode = match (self.list, self.extract) {
            (true, false) => Mode::List,
            (false, true) => Mode::Extract,
            _ => return Err(UsageError::Mode),
        };
        Ok((
            file,
            ScanConfig {
                mode,
                verbose: self.verbose,
            },
        ))
    }
}

/// Returns Ok(false) if the scan finished but the run still failed.
fn run(app: App) -> Result<bool> {
    let (path, config) = app.config()?;
    let archive = File::open(path).with_context(|| format!("{}: Cannot open", path.display()))?;

    let mut sink = DirectorySink::new(&app.directory);
    let report = Scanner::new(config, app.names.iter().cloned()).run(
        archive,
        &mut sink,
        &mut std::io::stdout().lock(),
    )?;

    log::debug!(
        "{} entries, {} selected, {} warnings",
        report.entries(),
        report.selected(),
        report.warnings().len()
    );
    for warning in report.warnings() {
        eprintln!("mytar: {warning}");
    }

    Ok(!report.failed())
}

/// The line printed after a fatal error, if any.
fn trailer(err: &anyhow::Error) -> Option<&'static str> {
    if let Some(usage) = err.downcast_ref::<UsageError>() {
        return match usage {
            UsageError::NoArchive => Some(NOT_RECOVERABLE),
            UsageError::Mode => None,
        };
    }
    match err.downcast_ref::<mytar::Error>()?.format_error()? {
        FormatError::NotATarArchive => Some(FAILURE_STATUS),
        FormatError::TruncatedArchive => Some(NOT_RECOVERABLE),
        FormatError::UnsupportedEntryType(_) => None,
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let app = App::parse();

    match run(app) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            eprintln!("mytar: {FAILURE_STATUS}");
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("mytar: {err:#}");
            if let Some(line) = trailer(&err) {
                eprintln!("mytar: {line}");
            }
            ExitCode::from(2)
        }
    }
}
