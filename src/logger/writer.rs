//! Log writer module
//!
//! Process-wide log sinks. Access and error lines each go to stderr or to
//! an append-mode file chosen at startup.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

/// Set once by `init`
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

enum LogTarget {
    /// Write to stderr, keeping stdout for the console banner
    Stderr,
    /// Append to file
    File(Mutex<File>),
}

/// Access and error sinks, fixed for the life of the process
pub struct LogWriter {
    access: LogTarget,
    error: LogTarget,
}

impl LogWriter {
    fn new(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<Self> {
        Ok(Self {
            access: open_target(access_log_file)?,
            error: open_target(error_log_file)?,
        })
    }

    pub fn write_access(&self, message: &str) {
        write_to_target(&self.access, message);
    }

    pub fn write_error(&self, message: &str) {
        write_to_target(&self.error, message);
    }
}

fn open_target(path: Option<&str>) -> io::Result<LogTarget> {
    Ok(match path {
        Some(p) => LogTarget::File(Mutex::new(open_log_file(p)?)),
        None => LogTarget::Stderr,
    })
}

/// Open `path` for appending, creating it and its parent directories
fn open_log_file(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

fn write_to_target(target: &LogTarget, message: &str) {
    match target {
        LogTarget::Stderr => {
            eprintln!("{message}");
        }
        LogTarget::File(file) => {
            if let Ok(mut f) = file.lock() {
                let _ = writeln!(f, "{message}");
            }
        }
    }
}

/// Install the process-wide writer
///
/// Fails if a log file cannot be opened or a writer is already installed.
pub fn init(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<()> {
    let writer = LogWriter::new(access_log_file, error_log_file)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Get the global log writer, if `init()` has run
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}
