use arcstr::ArcStr;

/// A request document together with the name it should be reported under.
///
/// The engine only ever reads the body; the name shows up in syntax error
/// messages so multi-document servers can tell requests apart.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Source {
    body: ArcStr,
    name: ArcStr,
}

/// A one-based line/column pair, the position format of the response wire
/// format.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize)]
pub struct SourceLocation {
    /// One-based line number.
    pub line: usize,
    /// One-based column number.
    pub column: usize,
}

impl Source {
    /// Wraps a request body under the default name `GraphQL request`.
    pub fn new(body: impl Into<ArcStr>) -> Self {
        Self {
            body: body.into(),
            name: arcstr::literal!("GraphQL request"),
        }
    }

    /// Sets the name this [`Source`] is reported under.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<ArcStr>) -> Self {
        self.name = name.into();
        self
    }

    /// The document text.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The reporting name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Maps a zero-based byte offset into this source to a one-based
    /// line/column pair.
    ///
    /// Lines are split on `\n`, `\r\n` and lone `\r`. Offsets past the end of
    /// the body locate just after the last character.
    pub fn location(&self, offset: usize) -> SourceLocation {
        let mut line = 1;
        let mut line_start = 0;

        let bytes = self.body.as_bytes();
        let mut i = 0;
        while i < offset && i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    line += 1;
                    line_start = i + 1;
                }
                b'\r' => {
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    line += 1;
                    line_start = i + 1;
                }
                _ => {}
            }
            i += 1;
        }

        let column = self.body[line_start..offset.min(self.body.len())]
            .chars()
            .count()
            + 1;

        SourceLocation { line, column }
    }
}

#[cfg(test)]
mod tests {
    use super::Source;

    #[test]
    fn locates_offsets_across_line_terminators() {
        let source = Source::new("ab\ncd\r\nef\rgh");

        assert_eq!(source.location(0).line, 1);
        assert_eq!(source.location(0).column, 1);
        assert_eq!(source.location(1).column, 2);

        let c = source.location(3);
        assert_eq!((c.line, c.column), (2, 1));

        let e = source.location(7);
        assert_eq!((e.line, e.column), (3, 1));

        let g = source.location(10);
        assert_eq!((g.line, g.column), (4, 1));
    }

    #[test]
    fn offset_past_end_points_after_last_character() {
        let source = Source::new("ab");
        let loc = source.location(10);
        assert_eq!((loc.line, loc.column), (1, 3));
    }
}
