use crate::error::{ParseError, ParseErrorKind};
use crate::tag::{TagKind, lex_tag, next_tag};

/// Finds the `{{end}}` that closes the block opened at `open_start`.
///
/// `open_start` must be the byte offset of a `{{for:..}}`, `{{if:..}}` or
/// `{{sep}}` tag. Nested blocks of any kind are skipped by depth counting:
/// every opener increments the depth, every `{{end}}` decrements it and
/// `{{else}}` leaves it unchanged. The returned offset is the start of the
/// matching `{{end}}`.
///
/// # Errors
/// - `NotAnOpeningTag` if `open_start` does not point at an opener.
/// - `UnclosedBlock` if the text ends before the depth returns to zero.
///
/// # Examples
///
/// ```
/// let text = "{{for:a}}{{if:b}}x{{end}}{{end}}";
/// assert_eq!(tilelate::locate_end(text, 0).unwrap(), 25);
/// ```
pub fn locate_end(text: &str, open_start: usize) -> Result<usize, ParseError> {
    let open = lex_tag(text, open_start)
        .filter(|tag| tag.kind.opens_block())
        .ok_or_else(|| {
            let found = text
                .get(open_start..)
                .and_then(|rest| rest.chars().next())
                .map_or_else(|| "end of input".to_string(), |c| c.to_string());
            ParseError::at(text, open_start, ParseErrorKind::NotAnOpeningTag { found })
        })?;

    let mut depth: usize = 1;
    let mut pos = open.end;
    while let Some(tag) = next_tag(text, pos, text.len()) {
        match tag.kind {
            TagKind::For(_) | TagKind::If(_) | TagKind::Sep => depth = depth.saturating_add(1),
            TagKind::End => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Ok(tag.start);
                }
            }
            TagKind::Else | TagKind::Substitution(_) => {}
        }
        pos = tag.end;
    }

    Err(ParseError::at(
        text,
        open_start,
        ParseErrorKind::UnclosedBlock {
            tag: open.text(text).to_string(),
        },
    ))
}
