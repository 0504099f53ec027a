use std::io::{self, BufRead};

use log::trace;

use super::PageUnit;

/// Fixed number of newline-terminated lines per page.
pub struct LineSegmenter<R> {
    reader: R,
    page_length: usize,
    line_ctr: usize,
    page_ctr: u64,
    emitted: u64,
    done: bool,
}

impl<R: BufRead> LineSegmenter<R> {
    pub fn new(reader: R, page_length: usize) -> Self {
        LineSegmenter {
            reader,
            page_length,
            line_ctr: 0,
            page_ctr: 1,
            emitted: 0,
            done: false,
        }
    }

    pub fn pages_emitted(&self) -> u64 {
        self.emitted
    }
}

impl<R: BufRead> Iterator for LineSegmenter<R> {
    type Item = io::Result<PageUnit>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut line = Vec::new();
        match self.reader.read_until(b'\n', &mut line) {
            Ok(0) => {
                self.done = true;
                return None;
            }
            Ok(_) => {}
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        }

        let unit = PageUnit {
            page: self.page_ctr,
            bytes: line,
        };

        if self.line_ctr == 0 {
            self.emitted += 1;
        }
        self.line_ctr += 1;
        if self.line_ctr == self.page_length {
            trace!("page {} complete", self.page_ctr);
            self.page_ctr += 1;
            self.line_ctr = 0;
        }

        Some(Ok(unit))
    }
}
