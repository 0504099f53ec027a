use std::io::{self, Write};
use std::process::{Child, ChildStdin, Command, Stdio};

use log::{debug, warn};

use crate::config::PrintTarget;
use crate::error::{Result, SelpgError};

/// Destination for selected output, with an explicit end of life.
pub trait PageSink {
    /// Short description used in error messages.
    fn name(&self) -> &'static str;

    fn write_unit(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Flush and release the sink. Called exactly once.
    fn close(self) -> io::Result<()>
    where
        Self: Sized;
}

pub struct Console {
    out: io::StdoutLock<'static>,
}

impl Console {
    pub fn stdout() -> Self {
        Console {
            out: io::stdout().lock(),
        }
    }
}

impl PageSink for Console {
    fn name(&self) -> &'static str {
        "standard output"
    }

    fn write_unit(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out.write_all(bytes)
    }

    fn close(mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Pipe into the standard input of an external print command.
///
/// The command's own stdout and stderr are inherited, so anything it prints
/// interleaves with ours.
pub struct PrintPipe {
    dest: String,
    child: Child,
    stdin: Option<ChildStdin>,
}

impl PrintPipe {
    pub fn open(target: &PrintTarget) -> Result<Self> {
        let open_err = |source| SelpgError::OpenPrintPipe {
            dest: target.dest.clone(),
            source,
        };

        let mut child = Command::new(&target.command)
            .arg("-d")
            .arg(&target.dest)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(open_err)?;

        let stdin = child.stdin.take().ok_or_else(|| {
            open_err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "child has no standard input",
            ))
        })?;

        debug!(
            "spawned `{} -d {}` (pid {})",
            target.command,
            target.dest,
            child.id()
        );

        Ok(PrintPipe {
            dest: target.dest.clone(),
            child,
            stdin: Some(stdin),
        })
    }
}

impl PageSink for PrintPipe {
    fn name(&self) -> &'static str {
        "print destination"
    }

    fn write_unit(&mut self, bytes: &[u8]) -> io::Result<()> {
        match self.stdin.as_mut() {
            Some(stdin) => stdin.write_all(bytes),
            None => Err(io::Error::new(io::ErrorKind::BrokenPipe, "print pipe closed")),
        }
    }

    fn close(mut self) -> io::Result<()> {
        // Dropping stdin delivers EOF to the print command.
        drop(self.stdin.take());
        let status = self.child.wait()?;
        if !status.success() {
            eprintln!(
                "selpg: print command for \"{}\" exited with {}",
                self.dest, status
            );
        }
        Ok(())
    }
}

impl Drop for PrintPipe {
    fn drop(&mut self) {
        // Only reached without close() on an early exit; close the pipe and reap the child.
        if let Some(stdin) = self.stdin.take() {
            drop(stdin);
            let _ = self.child.wait();
        }
    }
}

/// Collects everything written to it.
#[derive(Debug, Default)]
pub struct MemorySink {
    buf: Vec<u8>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

impl PageSink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn write_unit(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    fn close(self) -> io::Result<()> {
        Ok(())
    }
}

struct Tracked<S> {
    sink: S,
    failure: Option<io::Error>,
}

impl<S: PageSink> Tracked<S> {
    fn new(sink: S) -> Self {
        Tracked {
            sink,
            failure: None,
        }
    }

    fn write_unit(&mut self, bytes: &[u8]) {
        if self.failure.is_some() {
            return;
        }
        if let Err(e) = self.sink.write_unit(bytes) {
            warn!("writing to {} failed: {}", self.sink.name(), e);
            self.failure = Some(e);
        }
    }

    fn finish(self) -> Result<()> {
        let name = self.sink.name();
        let closed = self.sink.close();
        match (self.failure, closed) {
            (Some(source), _) | (None, Err(source)) => {
                Err(SelpgError::Write { sink: name, source })
            }
            (None, Ok(())) => Ok(()),
        }
    }
}

/// Fans every unit out to a primary sink and an optional printer.
///
/// A write failure on one side only disables that side; the other keeps
/// receiving data. Failures are reported by `finish`.
pub struct Tee<C, P> {
    console: Tracked<C>,
    printer: Option<Tracked<P>>,
}

impl<C: PageSink, P: PageSink> Tee<C, P> {
    pub fn new(console: C, printer: Option<P>) -> Self {
        Tee {
            console: Tracked::new(console),
            printer: printer.map(Tracked::new),
        }
    }

    fn all_failed(&self) -> bool {
        self.console.failure.is_some()
            && self.printer.as_ref().map_or(true, |p| p.failure.is_some())
    }

    /// Close both sides exactly once, returning the first failure seen.
    pub fn finish(self) -> Result<()> {
        let console = self.console.finish();
        let printer = match self.printer {
            Some(printer) => printer.finish(),
            None => Ok(()),
        };
        console.and(printer)
    }
}

impl<C: PageSink, P: PageSink> PageSink for Tee<C, P> {
    fn name(&self) -> &'static str {
        "output"
    }

    /// Errors only once every side has failed, so the caller can stop reading.
    fn write_unit(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.console.write_unit(bytes);
        if let Some(printer) = self.printer.as_mut() {
            printer.write_unit(bytes);
        }

        if self.all_failed() {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "every output failed"))
        } else {
            Ok(())
        }
    }

    fn close(self) -> io::Result<()> {
        self.finish().map_err(io::Error::other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Fails every write after the first `ok_writes`.
    struct Flaky {
        ok_writes: usize,
        written: Rc<RefCell<Vec<u8>>>,
        closed: Rc<RefCell<usize>>,
    }

    impl PageSink for Flaky {
        fn name(&self) -> &'static str {
            "flaky"
        }

        fn write_unit(&mut self, bytes: &[u8]) -> io::Result<()> {
            if self.ok_writes == 0 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
            }
            self.ok_writes -= 1;
            self.written.borrow_mut().extend_from_slice(bytes);
            Ok(())
        }

        fn close(self) -> io::Result<()> {
            *self.closed.borrow_mut() += 1;
            Ok(())
        }
    }

    fn flaky(ok_writes: usize) -> (Flaky, Rc<RefCell<Vec<u8>>>, Rc<RefCell<usize>>) {
        let written = Rc::new(RefCell::new(Vec::new()));
        let closed = Rc::new(RefCell::new(0));
        let sink = Flaky {
            ok_writes,
            written: Rc::clone(&written),
            closed: Rc::clone(&closed),
        };
        (sink, written, closed)
    }

    #[test]
    fn test_memory_sink_collects() {
        let mut sink = MemorySink::new();
        sink.write_unit(b"ab").unwrap();
        sink.write_unit(b"c").unwrap();
        assert_eq!(sink.into_inner(), b"abc");
    }

    #[test]
    fn test_tee_writes_both_sides() {
        let (console, console_out, console_closed) = flaky(usize::MAX);
        let (printer, printer_out, printer_closed) = flaky(usize::MAX);
        let mut tee = Tee::new(console, Some(printer));

        tee.write_unit(b"x\n").unwrap();
        tee.write_unit(b"y\n").unwrap();
        tee.finish().unwrap();

        assert_eq!(*console_out.borrow(), b"x\ny\n");
        assert_eq!(*printer_out.borrow(), b"x\ny\n");
        assert_eq!(*console_closed.borrow(), 1);
        assert_eq!(*printer_closed.borrow(), 1);
    }

    #[test]
    fn test_printer_failure_does_not_stop_console() {
        let (console, console_out, _) = flaky(usize::MAX);
        let (printer, printer_out, printer_closed) = flaky(1);
        let mut tee = Tee::new(console, Some(printer));

        for unit in [&b"1"[..], b"2", b"3"] {
            tee.write_unit(unit).unwrap();
        }

        assert_eq!(*console_out.borrow(), b"123");
        assert_eq!(*printer_out.borrow(), b"1");

        let err = tee.finish().unwrap_err();
        assert!(matches!(err, SelpgError::Write { sink: "flaky", .. }));
        // The failed side is still closed.
        assert_eq!(*printer_closed.borrow(), 1);
    }

    #[test]
    fn test_console_failure_does_not_stop_printer() {
        let (console, _, _) = flaky(0);
        let (printer, printer_out, _) = flaky(usize::MAX);
        let mut tee = Tee::new(console, Some(printer));

        tee.write_unit(b"a").unwrap();
        tee.write_unit(b"b").unwrap();

        assert_eq!(*printer_out.borrow(), b"ab");
        assert!(tee.finish().is_err());
    }

    #[test]
    fn test_all_sides_failed() {
        let (console, _, _) = flaky(0);
        let mut tee: Tee<Flaky, MemorySink> = Tee::new(console, None);
        assert!(tee.write_unit(b"a").is_err());
    }

    #[test]
    fn test_print_pipe_spawn_failure() {
        let target = PrintTarget {
            command: "selpg-no-such-print-command".to_string(),
            dest: "lab".to_string(),
        };
        let err = PrintPipe::open(&target).err().unwrap();
        assert!(matches!(err, SelpgError::OpenPrintPipe { ref dest, .. } if dest == "lab"));
    }
}
