//! Fenced code block scanning
//!
//! Splits a document into markdown regions and fenced code blocks with an
//! explicit two-state line scanner:
//!
//! - **Outside** a fence, a line of the form ```` ```tag ```` (tag made of
//!   ASCII letters, digits and `_`, possibly empty) opens a block.
//! - **Inside** a fence, the first line that is exactly ```` ``` ```` closes it.
//!   Blocks never nest, so a second opener inside a block is body text.
//!
//! An opener that is never closed does not form a block; its text stays in
//! the surrounding markdown region. A trailing `\r` is ignored when matching
//! fence lines but stays part of the ranges.
//!
//! All ranges are byte ranges into the scanned text, and the regions tile
//! the whole input without gaps or overlaps.

use std::ops::Range;

const FENCE: &str = "```";

/// A complete opener + body + closer triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock<'a> {
    /// Raw language tag as typed after the opening fence (may be empty)
    pub tag: &'a str,
    /// Opening fence line, including its line terminator
    pub opener: Range<usize>,
    /// Lines between the fences, including the terminator of the last one
    pub body: Range<usize>,
    /// Closing fence line, excluding its `\n`
    pub closer: Range<usize>,
}

impl FencedBlock<'_> {
    /// Byte range covered by the whole block.
    pub fn span(&self) -> Range<usize> {
        self.opener.start..self.closer.end
    }
}

/// One piece of a scanned document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Region<'a> {
    /// Text handled by the markdown grammar
    Markdown(Range<usize>),
    /// A fenced code block
    Fenced(FencedBlock<'a>),
}

enum ScanState<'a> {
    Outside,
    Inside {
        tag: &'a str,
        opener: Range<usize>,
    },
}

/// A line of the input: `content` excludes the `\n`, `next` is where the
/// following line starts.
struct Line<'a> {
    start: usize,
    content: &'a str,
    next: usize,
}

fn lines(text: &str) -> impl Iterator<Item = Line<'_>> {
    let mut pos = 0;
    std::iter::from_fn(move || {
        if pos >= text.len() {
            return None;
        }
        let start = pos;
        let (content_end, next) = match text[start..].find('\n') {
            Some(i) => (start + i, start + i + 1),
            None => (text.len(), text.len()),
        };
        pos = next;
        Some(Line {
            start,
            content: &text[start..content_end],
            next,
        })
    })
}

/// Language tag if `line` opens a fence.
fn opener_tag(line: &str) -> Option<&str> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let tag = line.strip_prefix(FENCE)?;
    tag.bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_')
        .then_some(tag)
}

fn is_closer(line: &str) -> bool {
    line.strip_suffix('\r').unwrap_or(line) == FENCE
}

/// Split `text` into markdown regions and fenced blocks, in document order.
pub fn scan_regions(text: &str) -> Vec<Region<'_>> {
    let mut regions = Vec::new();
    let mut state = ScanState::Outside;
    // Start of the markdown text not yet assigned to a region
    let mut gap_start = 0;

    for line in lines(text) {
        state = match state {
            ScanState::Outside => match opener_tag(line.content) {
                Some(tag) => ScanState::Inside {
                    tag,
                    opener: line.start..line.next,
                },
                None => ScanState::Outside,
            },
            ScanState::Inside { tag, opener } => {
                if is_closer(line.content) {
                    if gap_start < opener.start {
                        regions.push(Region::Markdown(gap_start..opener.start));
                    }
                    let closer = line.start..line.start + line.content.len();
                    gap_start = closer.end;
                    regions.push(Region::Fenced(FencedBlock {
                        tag,
                        body: opener.end..line.start,
                        opener,
                        closer,
                    }));
                    ScanState::Outside
                } else {
                    ScanState::Inside { tag, opener }
                }
            }
        };
    }

    // An unterminated opener simply stays part of the trailing markdown
    if gap_start < text.len() {
        regions.push(Region::Markdown(gap_start..text.len()));
    }

    regions
}

/// The fenced blocks of `text`, without the markdown regions.
pub fn fenced_blocks(text: &str) -> Vec<FencedBlock<'_>> {
    scan_regions(text)
        .into_iter()
        .filter_map(|region| match region {
            Region::Fenced(block) => Some(block),
            Region::Markdown(_) => None,
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
