//! Splitting an input stream into numbered pages.
//!
//! Both strategies are lazy: they pull one unit (a line, or a form-feed
//! delimited chunk) from the reader per call to `next` and never hold more
//! than that unit in memory.

pub mod form_feed;
pub mod lines;

use std::io::{self, BufRead};

use crate::config::Mode;

pub use form_feed::FormFeedSegmenter;
pub use lines::LineSegmenter;

/// One unit of output tagged with the page it belongs to.
///
/// In line mode this is a single line including its terminator; in
/// form-feed mode it is a whole page with the separator removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageUnit {
    pub page: u64,
    pub bytes: Vec<u8>,
}

pub enum Segmenter<R> {
    Lines(LineSegmenter<R>),
    FormFeed(FormFeedSegmenter<R>),
}

impl<R: BufRead> Segmenter<R> {
    pub fn new(reader: R, mode: Mode) -> Self {
        match mode {
            Mode::Lines { page_length } => Segmenter::Lines(LineSegmenter::new(reader, page_length)),
            Mode::FormFeed => Segmenter::FormFeed(FormFeedSegmenter::new(reader)),
        }
    }

    /// Number of pages that have produced at least one unit so far.
    pub fn pages_emitted(&self) -> u64 {
        match self {
            Segmenter::Lines(s) => s.pages_emitted(),
            Segmenter::FormFeed(s) => s.pages_emitted(),
        }
    }
}

impl<R: BufRead> Iterator for Segmenter<R> {
    type Item = io::Result<PageUnit>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Segmenter::Lines(s) => s.next(),
            Segmenter::FormFeed(s) => s.next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_dispatch_by_mode() {
        let input = "a\nb\x0cc\n";

        let lines: Vec<_> = Segmenter::new(Cursor::new(input), Mode::Lines { page_length: 1 })
            .map(|u| u.unwrap().page)
            .collect();
        assert_eq!(lines, vec![1, 2]);

        let mut pages = Segmenter::new(Cursor::new(input), Mode::FormFeed);
        let first = pages.next().unwrap().unwrap();
        assert_eq!(first.bytes, b"a\nb");
        assert_eq!(pages.pages_emitted(), 1);
    }
}
