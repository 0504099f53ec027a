use std::io::{self, BufRead};

use log::trace;

use super::PageUnit;

pub const FORM_FEED: u8 = 0x0c;

/// Pages separated by form-feed bytes.
pub struct FormFeedSegmenter<R> {
    reader: R,
    page_ctr: u64,
    done: bool,
}

impl<R: BufRead> FormFeedSegmenter<R> {
    pub fn new(reader: R) -> Self {
        FormFeedSegmenter {
            reader,
            page_ctr: 1,
            done: false,
        }
    }

    pub fn pages_emitted(&self) -> u64 {
        self.page_ctr - 1
    }
}

impl<R: BufRead> Iterator for FormFeedSegmenter<R> {
    type Item = io::Result<PageUnit>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut chunk = Vec::new();
        match self.reader.read_until(FORM_FEED, &mut chunk) {
            // A zero-length read at end of stream is not a page, even right after a form feed.
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

        if chunk.last() == Some(&FORM_FEED) {
            chunk.pop();
        } else {
            self.done = true;
        }

        let unit = PageUnit {
            page: self.page_ctr,
            bytes: chunk,
        };
        trace!("page {} is {} bytes", unit.page, unit.bytes.len());
        self.page_ctr += 1;

        Some(Ok(unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collect(input: &[u8]) -> (Vec<PageUnit>, u64) {
        let mut seg = FormFeedSegmenter::new(Cursor::new(input.to_vec()));
        let units: Vec<_> = seg.by_ref().map(|u| u.unwrap()).collect();
        (units, seg.pages_emitted())
    }

    #[test]
    fn test_three_pages() {
        let (units, total) = collect(b"A\x0cB\x0cC");
        assert_eq!(total, 3);
        let pages: Vec<_> = units.iter().map(|u| (u.page, u.bytes.as_slice())).collect();
        assert_eq!(pages, vec![(1, &b"A"[..]), (2, &b"B"[..]), (3, &b"C"[..])]);
    }

    #[test]
    fn test_trailing_form_feed_adds_no_page() {
        let (units, total) = collect(b"A\x0cB\x0c");
        assert_eq!(total, 2);
        assert_eq!(units.last().unwrap().bytes, b"B");
    }

    #[test]
    fn test_empty_page_between_separators() {
        let (units, total) = collect(b"A\x0c\x0cB");
        assert_eq!(total, 3);
        assert_eq!(units[1].page, 2);
        assert!(units[1].bytes.is_empty());
    }

    #[test]
    fn test_rejoining_pages_restores_input() {
        let input = b"first\npage\x0csecond\n\x0c\x0cfourth\n";
        let (units, _) = collect(input);
        let rejoined = units
            .iter()
            .map(|u| u.bytes.clone())
            .collect::<Vec<_>>()
            .join(&FORM_FEED);
        assert_eq!(rejoined, input.to_vec());
    }

    #[test]
    fn test_empty_input() {
        let (units, total) = collect(b"");
        assert!(units.is_empty());
        assert_eq!(total, 0);
    }

    #[test]
    fn test_no_form_feed_is_one_page() {
        let (units, total) = collect(b"just text\nmore\n");
        assert_eq!(total, 1);
        assert_eq!(units[0].bytes, b"just text\nmore\n");
    }
}
