use std::fs::File;
use std::io::{self, BufRead, BufReader};

use log::debug;

use crate::config::{Config, InputSource, Mode};
use crate::error::{Result, SelpgError};
use crate::page_range::{PageRange, SelectionResult};
use crate::paginate::Segmenter;
use crate::sink::{Console, PageSink, PrintPipe, Tee};

pub fn run(config: &Config) -> Result<SelectionResult> {
    let input = open_input(&config.input)?;
    let printer = config.print.as_ref().map(PrintPipe::open).transpose()?;

    let mut output = Tee::new(Console::stdout(), printer);
    let selected = select(input, config.mode, config.range, &mut output);
    // Sink failures carry the real cause, so they win over the selection error.
    output.finish()?;
    let result = selected?;

    if let Some(shortfall) = result.shortfall {
        eprintln!("selpg: {}", shortfall);
    }

    Ok(result)
}

pub fn open_input(source: &InputSource) -> Result<Box<dyn BufRead>> {
    match source {
        InputSource::Stdin => {
            debug!("reading standard input");
            Ok(Box::new(io::stdin().lock()))
        }
        InputSource::File(path) => {
            let file = File::open(path).map_err(|source| SelpgError::OpenInput {
                path: path.clone(),
                source,
            })?;
            debug!("reading {}", path.display());
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

/// Stream `input` through the page segmenter and copy units inside `range` to `sink`.
pub fn select<R, S>(input: R, mode: Mode, range: PageRange, sink: &mut S) -> Result<SelectionResult>
where
    R: BufRead,
    S: PageSink,
{
    let mut pages = Segmenter::new(input, mode);

    for unit in pages.by_ref() {
        let unit = unit?;
        if range.contains(unit.page) {
            sink.write_unit(&unit.bytes).map_err(|source| SelpgError::Write {
                sink: sink.name(),
                source,
            })?;
        }
    }

    let total = pages.pages_emitted();
    debug!("{} page(s) in input", total);

    Ok(range.check(total))
}
