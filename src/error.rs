use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors. Each one ends the process with exit status 1.
#[derive(Debug, Error)]
pub enum SelpgError {
    #[error("too many arguments: expected at most one input file, got {0}")]
    TooManyArguments(usize),

    #[error("invalid start, end page or line number")]
    InvalidRange,

    #[error("conflicting flags: -f and -l")]
    ConflictingFlags,

    #[error("could not open input file \"{}\": {source}", .path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not open pipe to \"{dest}\": {source}")]
    OpenPrintPipe {
        dest: String,
        #[source]
        source: io::Error,
    },

    #[error("failed writing to {sink}: {source}")]
    Write {
        sink: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("failed reading input: {0}")]
    Read(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, SelpgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_input_mentions_path() {
        let err = SelpgError::OpenInput {
            path: PathBuf::from("missing.txt"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("\"missing.txt\""));
    }

    #[test]
    fn test_write_failure_names_sink() {
        let err = SelpgError::Write {
            sink: "standard output",
            source: io::Error::new(io::ErrorKind::BrokenPipe, "closed"),
        };
        assert!(err.to_string().starts_with("failed writing to standard output"));
    }
}
