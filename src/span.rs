use std::fmt::Display;

/// Struct too show were a token or AST section originates from.
// .line is the line number of the start of the token/AST.
// .column is the column number of the start.
// .offset is the character offset at which the area starts.
// .length is the length of the area in characters.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub struct Span {
    line: u32,
    column: u32,
    offset: u32,
    length: u32,
}

impl Span {
    pub fn new(line: u32, column: u32, offset: u32, length: u32) -> Self {
        Span {
            line,
            column,
            offset,
            length,
        }
    }
    pub fn line(&self) -> u32 {
        self.line
    }
    pub fn column(&self) -> u32 {
        self.column
    }
    pub fn offset(&self) -> u32 {
        self.offset
    }
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Transform the section from Span Self to Span other too the combined span
    pub fn to(&self, other: &Span) -> Span {
        // Ensure in debug mode that the self comes before other
        if cfg!(debug_assertions) && self.offset > other.offset {
            log::warn!(
                "Span::to is given in the wrong order: (self:{:?} - other:{:?}",
                self,
                other
            );
        }
        Span::new(
            self.line,
            self.column,
            self.offset,
            (other.offset + other.length).saturating_sub(self.offset),
        )
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::Span;

    #[test]
    fn joined_span_covers_both_ends() {
        let begin = Span::new(1, 1, 0, 3);
        let end = Span::new(1, 9, 8, 2);
        let span = begin.to(&end);
        assert_eq!(span, Span::new(1, 1, 0, 10));
        assert_eq!(span.to_string(), "1:1");
    }
}
