use std::path::PathBuf;

use crate::cli::Cli;
use crate::error::{Result, SelpgError};
use crate::page_range::PageRange;

/// Lines per page when neither -l nor -f is given.
///
/// This is the classic selpg page length, so line mode does not require -l.
/// Without it the whole input would otherwise be a single page.
pub const DEFAULT_PAGE_LENGTH: usize = 72;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Lines { page_length: usize },
    FormFeed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

/// External command the selected pages are piped into, invoked as `<command> -d <dest>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintTarget {
    pub command: String,
    pub dest: String,
}

/// Validated run configuration. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub range: PageRange,
    pub mode: Mode,
    pub input: InputSource,
    pub print: Option<PrintTarget>,
}

/// Unvalidated values as supplied by the caller.
#[derive(Debug, Clone)]
pub struct RawArgs {
    pub start_page: i64,
    pub end_page: i64,
    pub page_length: Option<i64>,
    pub form_feed: bool,
    pub dest: Option<String>,
    pub print_command: String,
    pub inputs: Vec<PathBuf>,
}

impl From<Cli> for RawArgs {
    fn from(cli: Cli) -> Self {
        RawArgs {
            start_page: cli.start_page,
            end_page: cli.end_page,
            page_length: cli.page_length,
            form_feed: cli.form_feed,
            dest: cli.dest,
            print_command: cli.print_command,
            inputs: cli.inputs,
        }
    }
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        Self::validate(RawArgs::from(cli))
    }

    /// Checks, in order: positional count, page bounds, -f/-l conflict.
    pub fn validate(args: RawArgs) -> Result<Self> {
        if args.inputs.len() > 1 {
            return Err(SelpgError::TooManyArguments(args.inputs.len()));
        }

        let range = PageRange::new(args.start_page, args.end_page)?;

        // Any explicit -l conflicts with -f, whatever its value.
        if args.form_feed && args.page_length.is_some() {
            return Err(SelpgError::ConflictingFlags);
        }

        let mode = if args.form_feed {
            Mode::FormFeed
        } else {
            let page_length = match args.page_length {
                Some(len) if len <= 0 => return Err(SelpgError::InvalidRange),
                Some(len) => usize::try_from(len).map_err(|_| SelpgError::InvalidRange)?,
                None => DEFAULT_PAGE_LENGTH,
            };
            Mode::Lines { page_length }
        };

        let input = match args.inputs.into_iter().next() {
            Some(path) => InputSource::File(path),
            None => InputSource::Stdin,
        };

        let print = args.dest.map(|dest| PrintTarget {
            command: args.print_command,
            dest,
        });

        Ok(Config {
            range,
            mode,
            input,
            print,
        })
    }
}
