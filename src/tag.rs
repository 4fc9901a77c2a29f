//! Recognition of the `{{...}}` control tags.

pub(crate) const OPEN: &str = "{{";
pub(crate) const CLOSE: &str = "}}";
pub(crate) const END_TAG: &str = "{{end}}";
pub(crate) const ELSE_TAG: &str = "{{else}}";
pub(crate) const SEP_TAG: &str = "{{sep}}";
pub(crate) const I18N_PREFIX: &str = "i18n:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TagKind<'a> {
    Substitution(&'a str),
    For(&'a str),
    If(&'a str),
    Else,
    Sep,
    End,
}

impl TagKind<'_> {
    /// Tags that open a scope closed by `{{end}}`.
    pub(crate) const fn opens_block(&self) -> bool {
        matches!(self, Self::For(_) | Self::If(_) | Self::Sep)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Tag<'a> {
    pub(crate) kind: TagKind<'a>,
    /// Byte offset of the opening `{{`.
    pub(crate) start: usize,
    /// Byte offset just past the closing `}}`.
    pub(crate) end: usize,
}

impl<'a> Tag<'a> {
    pub(crate) fn text(&self, input: &'a str) -> &'a str {
        input.get(self.start..self.end).unwrap_or_default()
    }
}

/// Reads `{{<prefix><arg>}}` where `arg` is one or more characters other
/// than `}`. Returns the argument and the total tag length.
pub(crate) fn with_argument<'a>(rest: &'a str, prefix: &str) -> Option<(&'a str, usize)> {
    let after = rest.strip_prefix(OPEN)?.strip_prefix(prefix)?;
    let arg_len = after.find('}')?;
    if arg_len == 0 || !after.get(arg_len..)?.starts_with(CLOSE) {
        return None;
    }
    let arg = after.get(..arg_len)?;
    Some((arg, OPEN.len() + prefix.len() + arg_len + CLOSE.len()))
}

/// Tries to read a control tag starting exactly at byte `pos`.
///
/// Anything between braces that is not one of the known forms is not a tag
/// and yields `None`; callers treat it as literal text. `{{i18n:..}}` tags
/// are gone by the time templates are lexed, so they count as text here.
pub(crate) fn lex_tag(input: &str, pos: usize) -> Option<Tag<'_>> {
    let rest = input.get(pos..)?;
    if !rest.starts_with(OPEN) {
        return None;
    }

    let (kind, len) = if rest.starts_with(END_TAG) {
        (TagKind::End, END_TAG.len())
    } else if rest.starts_with(ELSE_TAG) {
        (TagKind::Else, ELSE_TAG.len())
    } else if rest.starts_with(SEP_TAG) {
        (TagKind::Sep, SEP_TAG.len())
    } else if let Some((key, len)) = with_argument(rest, "=") {
        (TagKind::Substitution(key), len)
    } else if let Some((key, len)) = with_argument(rest, "for:") {
        (TagKind::For(key), len)
    } else if let Some((condition, len)) = with_argument(rest, "if:") {
        (TagKind::If(condition), len)
    } else {
        return None;
    };

    Some(Tag {
        kind,
        start: pos,
        end: pos + len,
    })
}

/// Finds the next control tag at or after `from`, stopping before `limit`.
pub(crate) fn next_tag(input: &str, from: usize, limit: usize) -> Option<Tag<'_>> {
    let window = input.get(..limit)?;
    let mut pos = from;
    while let Some(found) = window.get(pos..).and_then(|rest| rest.find(OPEN)) {
        let start = pos + found;
        match lex_tag(window, start) {
            Some(tag) => return Some(tag),
            // `{{{=x}}` still holds a tag one byte later.
            None => pos = start + 1,
        }
    }
    None
}
