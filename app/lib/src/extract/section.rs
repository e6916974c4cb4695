//! Round sectioning.
//!
//! A log is a sequence of headings like `=== Read Test Round 3 ===` separated
//! by free-form output. A round's section is the text between its heading and
//! the next heading of any kind, so field matching can never run into the
//! following round.

use crate::extract::matcher::line_at;
use crate::record::Category;

/// Text of one round of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    /// Round ordinal printed in the heading.
    pub round: u32,
    /// Lines between the heading and the next heading.
    pub body: &'a str,
}

/// Lazy iterator over the sections of one category.
#[derive(Debug, Clone)]
pub struct Sections<'a> {
    text: &'a str,
    pos: usize,
    category: Category,
}

impl<'a> Sections<'a> {
    /// Iterate over `category`'s round sections in `text`.
    pub fn new(text: &'a str, category: Category) -> Self {
        Self {
            text,
            pos: 0,
            category,
        }
    }
}

impl<'a> Iterator for Sections<'a> {
    type Item = Section<'a>;

    fn next(&mut self) -> Option<Section<'a>> {
        while let Some((line, next)) = line_at(self.text, self.pos) {
            self.pos = next;
            let Some(round) = round_heading(line, self.category) else {
                continue;
            };

            let start = next;
            let mut end = start;
            while let Some((line, next)) = line_at(self.text, end) {
                if heading_text(line).is_some() {
                    break;
                }
                end = next;
            }
            self.pos = end;
            return Some(Section {
                round,
                body: &self.text[start..end],
            });
        }
        None
    }
}

/// Inner text of a `=== ... ===` heading line, if the line is one.
///
/// Text before the opening `===` is treated as a log prefix.
pub fn heading_text(line: &str) -> Option<&str> {
    let start = line.find("===")?;
    let heading = line[start..].trim_end();
    if heading.len() < 6 || !heading.ends_with("===") {
        return None;
    }
    Some(heading[3..heading.len() - 3].trim())
}

/// Round ordinal if `line` is a round heading of `category`.
pub fn round_heading(line: &str, category: Category) -> Option<u32> {
    let inner = heading_text(line)?;
    let ordinal = inner
        .strip_prefix(category.heading())?
        .strip_prefix(" Test Round ")?;
    ordinal.trim().parse().ok().filter(|&round| round > 0)
}
