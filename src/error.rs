pub type TilelateResult<T> = std::result::Result<T, TilelateError>;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ParseErrorKind {
    /// A `for`, `if` or `sep` block ran to the end of the text without its `{{end}}`.
    #[error("Missing '{{{{end}}}}' for '{tag}'")]
    UnclosedBlock { tag: String },
    /// A control tag showed up somewhere it cannot appear, e.g. a stray `{{end}}`.
    #[error("Unexpected tag '{tag}'")]
    UnexpectedTag { tag: String },
    #[error("'{{{{sep}}}}' must be the first construct of a loop body")]
    MisplacedSeparator,
    #[error("'{{{{if}}}}' block has more than one '{{{{else}}}}'")]
    DuplicateElse,
    #[error("Expected an opening tag, found '{found}'")]
    NotAnOpeningTag { found: String },
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
#[error("Parse error at line {line}, column {column}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    #[source]
    pub kind: ParseErrorKind,
}

impl ParseError {
    /// Builds an error for the byte `offset` of `text`, translating the offset
    /// into a 1-indexed line and column (columns count chars, not bytes).
    pub(crate) fn at(text: &str, offset: usize, kind: ParseErrorKind) -> Self {
        let offset = offset.min(text.len());
        let before = text.get(..offset).unwrap_or(text);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before
            .get(line_start..)
            .map_or(0, |rest| rest.chars().count())
            + 1;

        Self { line, column, kind }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
pub enum TilelateError {
    /// Inline template text (not looked up by id) failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A template fetched by id has unbalanced control tags.
    #[error("Malformed template '{template_id}': {source}")]
    Malformed {
        template_id: String,
        #[source]
        source: ParseError,
    },
}

impl TilelateError {
    pub(crate) fn malformed<T: AsRef<str>>(template_id: T, source: ParseError) -> Self {
        Self::Malformed {
            template_id: template_id.as_ref().to_string(),
            source,
        }
    }

    /// The underlying parse error, whichever way the template was provided.
    pub const fn parse_error(&self) -> &ParseError {
        match self {
            Self::Parse(error) | Self::Malformed { source: error, .. } => error,
        }
    }
}
