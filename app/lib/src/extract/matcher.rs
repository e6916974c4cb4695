//! Labeled result-line matchers.
//!
//! A [`FieldMatcher`] recognizes one kind of result line such as
//! `✓ Average read latency: 12.34 μs` and captures its numbers. Templates use
//! `{}` for a number; the text between placeholders must appear literally.
//! Anything before the first literal (timestamps, check marks, log prefixes)
//! and after the last one is ignored.

/// Spellings accepted wherever a template says `μs`.
///
/// Covers GREEK SMALL LETTER MU, MICRO SIGN, ASCII, and the mis-decoded UTF-8
/// form some terminals produce.
const MICRO_UNITS: [&str; 4] = ["μs", "µs", "us", "Î¼s"];

/// Matcher for a single labeled log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMatcher {
    /// Short description used in diagnostics.
    pub label: &'static str,
    /// Line template with `{}` placeholders for non-negative decimals.
    pub template: &'static str,
}

impl FieldMatcher {
    /// Create a matcher.
    pub const fn new(label: &'static str, template: &'static str) -> Self {
        Self { label, template }
    }

    /// Number of values a successful match captures.
    pub fn capture_count(&self) -> usize {
        self.template.matches("{}").count()
    }

    /// Try to match a single line, returning the captured numbers.
    pub fn match_line(&self, line: &str) -> Option<Vec<f64>> {
        let mut literals = self.template.split("{}");
        let head = literals.next().unwrap_or_default();
        let tail: Vec<&str> = literals.collect();

        // The head literal may occur more than once ("Read time: .. Read 5 KV"),
        // so every occurrence is a candidate anchor.
        for (start, _) in line.match_indices(head) {
            if let Some(values) = match_after(&line[start + head.len()..], &tail) {
                return Some(values);
            }
        }
        None
    }

    /// Scan `text` line by line starting at byte offset `from`.
    ///
    /// On success returns the captures and the offset just past the matched
    /// line, so matchers can be chained in order.
    pub fn scan(&self, text: &str, from: usize) -> Option<(Vec<f64>, usize)> {
        let mut pos = from;
        while let Some((line, next)) = line_at(text, pos) {
            if let Some(values) = self.match_line(line) {
                return Some((values, next));
            }
            pos = next;
        }
        None
    }

    /// Iterate over every matching line in `text`.
    pub fn scan_all<'t>(&'t self, text: &'t str) -> impl Iterator<Item = Vec<f64>> + 't {
        let mut pos = 0;
        std::iter::from_fn(move || {
            let (values, next) = self.scan(text, pos)?;
            pos = next;
            Some(values)
        })
    }
}

/// Return the line starting at `pos` (without its terminator) and the offset
/// of the following line.
pub(crate) fn line_at(text: &str, pos: usize) -> Option<(&str, usize)> {
    if pos >= text.len() {
        return None;
    }
    let rest = &text[pos..];
    match rest.find('\n') {
        Some(i) => Some((rest[..i].trim_end_matches('\r'), pos + i + 1)),
        None => Some((rest, text.len())),
    }
}

/// Match `number literal number literal ...` at the start of `rest`.
fn match_after(mut rest: &str, literals: &[&str]) -> Option<Vec<f64>> {
    let mut values = Vec::with_capacity(literals.len());
    for literal in literals {
        let (value, after) = parse_number(rest)?;
        values.push(value);
        rest = strip_literal(after, literal)?;
    }
    Some(values)
}

/// Parse a non-negative decimal (`digits[.digits]`) from the start of `s`.
pub(crate) fn parse_number(s: &str) -> Option<(f64, &str)> {
    let end = s
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    let digits = &s[..end];
    if !digits.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: f64 = digits.parse().ok()?;
    if value.is_finite() {
        Some((value, &s[end..]))
    } else {
        None
    }
}

/// Strip `literal` from the front of `s`, accepting alternative micro units.
fn strip_literal<'a>(s: &'a str, literal: &str) -> Option<&'a str> {
    if let Some(rest) = s.strip_prefix(literal) {
        return Some(rest);
    }
    let (before, after) = literal.split_once(MICRO_UNITS[0])?;
    let s = s.strip_prefix(before)?;
    MICRO_UNITS[1..]
        .iter()
        .find_map(|unit| s.strip_prefix(unit))
        .and_then(|s| s.strip_prefix(after))
}

/// Convert a captured value to an operation count.
pub(crate) fn to_count(value: f64) -> Option<u64> {
    if value.fract() == 0.0 && value >= 0.0 && value <= u64::MAX as f64 {
        Some(value as u64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LATENCY: FieldMatcher = FieldMatcher::new("avg read", "Average read latency: {} μs");
    const SPLIT: FieldMatcher =
        FieldMatcher::new("phase times", "Read time: {} ms, Write time: {} ms");

    #[test]
    fn test_match_line_with_check_mark() {
        assert_eq!(
            LATENCY.match_line("✓ Average read latency: 12.34 μs"),
            Some(vec![12.34])
        );
    }

    #[test]
    fn test_match_line_with_prefix_noise() {
        assert_eq!(
            LATENCY.match_line("[2025-09-16 22:13:46] INFO ✓ Average read latency: 7 μs"),
            Some(vec![7.0])
        );
    }

    #[test]
    fn test_match_line_micro_variants() {
        assert_eq!(LATENCY.match_line("Average read latency: 1.5 µs"), Some(vec![1.5]));
        assert_eq!(LATENCY.match_line("Average read latency: 1.5 us"), Some(vec![1.5]));
        assert_eq!(LATENCY.match_line("Average read latency: 1.5 Î¼s"), Some(vec![1.5]));
        assert_eq!(LATENCY.match_line("Average read latency: 1.5 ms"), None);
    }

    #[test]
    fn test_match_line_multiple_captures() {
        assert_eq!(
            SPLIT.match_line("✓ Read time: 10.50 ms, Write time: 20.25 ms"),
            Some(vec![10.5, 20.25])
        );
    }

    #[test]
    fn test_match_line_rejects_negative_and_missing() {
        assert_eq!(LATENCY.match_line("Average read latency: -3 μs"), None);
        assert_eq!(LATENCY.match_line("Average read latency: n/a μs"), None);
        assert_eq!(LATENCY.match_line("Average write latency: 3 μs"), None);
    }

    #[test]
    fn test_match_line_retries_later_anchor() {
        let matcher = FieldMatcher::new("read total", "Read {} KV pairs in {} ms");
        let line = "Read time: 5 ms; ✓ Read 100 KV pairs in 3.5 ms";
        assert_eq!(matcher.match_line(line), Some(vec![100.0, 3.5]));
    }

    #[test]
    fn test_scan_advances_past_match() {
        let text = "noise\nAverage read latency: 1 μs\nAverage read latency: 2 μs\n";
        let (first, next) = LATENCY.scan(text, 0).unwrap();
        assert_eq!(first, vec![1.0]);
        let (second, _) = LATENCY.scan(text, next).unwrap();
        assert_eq!(second, vec![2.0]);
    }

    #[test]
    fn test_scan_all() {
        let matcher = FieldMatcher::new("batch", "batch commit: {} ms");
        let text = "a batch commit: 3 ms\nb\nc batch commit: 4 ms\r\n";
        let all: Vec<_> = matcher.scan_all(text).collect();
        assert_eq!(all, vec![vec![3.0], vec![4.0]]);
    }

    #[test]
    fn test_capture_count() {
        assert_eq!(LATENCY.capture_count(), 1);
        assert_eq!(SPLIT.capture_count(), 2);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("12.5 ms"), Some((12.5, " ms")));
        assert_eq!(parse_number("100000"), Some((100000.0, "")));
        assert_eq!(parse_number(". ms"), None);
        assert_eq!(parse_number("1.2.3"), None);
    }

    #[test]
    fn test_to_count() {
        assert_eq!(to_count(80_000.0), Some(80_000));
        assert_eq!(to_count(1.5), None);
    }
}
