#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
/// A byte range of the source text.
pub struct Span {
    /// The start index of the span.
    pub start: u32,
    /// The end index of the span, exclusive.
    pub end: u32,
}

impl Span {
    /// Creates a span covering `len` bytes starting at `start`.
    pub fn at(start: usize, len: usize) -> Span {
        Span {
            start: start as u32,
            end: (start + len) as u32,
        }
    }

    /// Returns the text of the span.
    pub fn text(self, source: &str) -> &str {
        &source[self.start as usize..self.end as usize]
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{start}..{end}", start = self.start, end = self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_returns_covered_substring() {
        let source = "(+ 12 3)";
        assert_eq!(Span::at(0, 1).text(source), "(");
        assert_eq!(Span::at(3, 2).text(source), "12");
    }

    #[test]
    fn display_shows_byte_range() {
        assert_eq!(Span { start: 4, end: 9 }.to_string(), "4..9");
    }
}
