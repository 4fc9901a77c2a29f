use crate::{
    ast::{AstNode, Separator},
    condition::Condition,
    error::{ParseError, ParseErrorKind},
    locator::locate_end,
    tag::{END_TAG, Tag, TagKind, lex_tag, next_tag},
};

type ParseResult<T> = Result<T, ParseError>;

/// What a run of nodes is being parsed for; decides which modifiers are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Root,
    LoopBody,
    IfBody,
    Separator,
}

/// Nodes of one block, split at `{{else}}` when parsing an `if` body.
struct Parsed<'a> {
    nodes: Vec<AstNode<'a>>,
    else_branch: Option<Vec<AstNode<'a>>>,
}

struct Parser<'a> {
    input: &'a str,
}

impl<'a> Parser<'a> {
    const fn new(input: &'a str) -> Self {
        Parser { input }
    }

    #[inline]
    fn make_error(&self, offset: usize, kind: ParseErrorKind) -> ParseError {
        ParseError::at(self.input, offset, kind)
    }

    fn unexpected(&self, tag: &Tag<'a>) -> ParseError {
        self.make_error(
            tag.start,
            ParseErrorKind::UnexpectedTag {
                tag: tag.text(self.input).to_string(),
            },
        )
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        self.input.get(start..end).unwrap_or_default()
    }

    /// Parses `input[start..end]`, a range that is known to be balanced.
    fn parse_block(&self, start: usize, end: usize, kind: BlockKind) -> ParseResult<Parsed<'a>> {
        let mut nodes = Vec::new();
        let mut else_nodes: Option<Vec<AstNode<'a>>> = None;
        let mut pos = start;

        while let Some(tag) = next_tag(self.input, pos, end) {
            let target = else_nodes.as_mut().unwrap_or(&mut nodes);
            if tag.start > pos {
                target.push(AstNode::Constant {
                    data: self.slice(pos, tag.start),
                });
            }

            pos = match tag.kind {
                TagKind::Substitution(key) => {
                    target.push(AstNode::Substitution { key });
                    tag.end
                }
                TagKind::For(key) => {
                    let close = locate_end(self.input, tag.start)?;
                    target.push(self.parse_for(key, tag.end, close)?);
                    close + END_TAG.len()
                }
                TagKind::If(condition) => {
                    let close = locate_end(self.input, tag.start)?;
                    let Parsed {
                        nodes: body,
                        else_branch,
                    } = self.parse_block(tag.end, close, BlockKind::IfBody)?;
                    target.push(AstNode::If {
                        condition: Condition::parse(condition),
                        body,
                        else_branch,
                    });
                    close + END_TAG.len()
                }
                TagKind::Else => {
                    if kind != BlockKind::IfBody {
                        return Err(self.unexpected(&tag));
                    }
                    if else_nodes.is_some() {
                        return Err(self.make_error(tag.start, ParseErrorKind::DuplicateElse));
                    }
                    else_nodes = Some(Vec::new());
                    tag.end
                }
                // A leading separator is consumed by `parse_for`, any other is misplaced.
                TagKind::Sep => {
                    return Err(self.make_error(tag.start, ParseErrorKind::MisplacedSeparator));
                }
                // Every `end` inside a balanced range belongs to a nested
                // block, so one showing up here was never opened.
                TagKind::End => return Err(self.unexpected(&tag)),
            };
        }

        if pos < end {
            else_nodes.as_mut().unwrap_or(&mut nodes).push(AstNode::Constant {
                data: self.slice(pos, end),
            });
        }

        Ok(Parsed {
            nodes,
            else_branch: else_nodes,
        })
    }

    /// Parses a loop body spanning `input[start..end]`, lifting out a leading
    /// `{{sep}}...{{end}}` block.
    fn parse_for(&self, key: &'a str, start: usize, end: usize) -> ParseResult<AstNode<'a>> {
        let body_text = self.slice(start, end);
        let leading_len = body_text.len() - body_text.trim_start().len();
        let sep_start = start + leading_len;

        let (separator, body_start) = match lex_tag(self.input, sep_start) {
            Some(tag) if tag.kind == TagKind::Sep && tag.end <= end => {
                let close = locate_end(self.input, sep_start)?;
                let sep = self.parse_block(tag.end, close, BlockKind::Separator)?;
                let separator = Separator {
                    leading: self.slice(start, sep_start),
                    body: sep.nodes,
                };
                (Some(separator), close + END_TAG.len())
            }
            _ => (None, start),
        };

        let body = self.parse_block(body_start, end, BlockKind::LoopBody)?.nodes;
        Ok(AstNode::For {
            key,
            separator,
            body,
        })
    }
}

/// Parses a whole template into its node list.
pub(crate) fn tokenize(input: &str) -> Result<Vec<AstNode<'_>>, ParseError> {
    if input.is_empty() {
        return Ok(vec![]);
    }
    let parser = Parser::new(input);
    Ok(parser.parse_block(0, input.len(), BlockKind::Root)?.nodes)
}

/// Tests for the parser module via tokenizer.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::CompareOp;

    // Helper macros for quick AST node creation in tests
    macro_rules! sub {
        ($key:expr) => {
            AstNode::Substitution { key: $key }
        };
    }
    macro_rules! const_str {
        ($data:expr) => {
            AstNode::Constant { data: $data }
        };
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_empty_input() {
        assert_eq!(tokenize("").unwrap(), vec![]);
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_simple_constant() {
        assert_eq!(
            tokenize("<div class=\"tile\"></div>").unwrap(),
            vec![const_str!("<div class=\"tile\"></div>")]
        );
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_unknown_braces_are_literal() {
        assert_eq!(
            tokenize("{{ name }} {{x").unwrap(),
            vec![const_str!("{{ name }} {{x")]
        );
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_substitution() {
        assert_eq!(
            tokenize("<a href=\"{{=url}}\">{{=text}}</a>").unwrap(),
            vec![
                const_str!("<a href=\""),
                sub!("url"),
                const_str!("\">"),
                sub!("text"),
                const_str!("</a>"),
            ]
        );
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_localization_tags_are_plain_text() {
        assert_eq!(
            tokenize("<a>{{i18n:edit_mode}}</a>").unwrap(),
            vec![const_str!("<a>{{i18n:edit_mode}}</a>")]
        );
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_no_spurious_empty_constants_between_tags() {
        assert_eq!(tokenize("{{=a}}{{=b}}").unwrap(), vec![sub!("a"), sub!("b")]);
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_for_loop() {
        assert_eq!(
            tokenize("<ul>{{for:tiles}}<li>{{=text}}</li>{{end}}</ul>").unwrap(),
            vec![
                const_str!("<ul>"),
                AstNode::For {
                    key: "tiles",
                    separator: None,
                    body: vec![const_str!("<li>"), sub!("text"), const_str!("</li>")],
                },
                const_str!("</ul>"),
            ]
        );
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_for_loop_with_separator() {
        assert_eq!(
            tokenize("{{for:langs}}\n  {{sep}} | {{end}}{{=code}}{{end}}").unwrap(),
            vec![AstNode::For {
                key: "langs",
                separator: Some(Separator {
                    leading: "\n  ",
                    body: vec![const_str!(" | ")],
                }),
                body: vec![sub!("code")],
            }]
        );
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_if_else() {
        assert_eq!(
            tokenize("{{if:n>=2}}many{{else}}few{{end}}").unwrap(),
            vec![AstNode::If {
                condition: Condition::Compare {
                    lhs: "n",
                    op: CompareOp::Ge,
                    rhs: "2"
                },
                body: vec![const_str!("many")],
                else_branch: Some(vec![const_str!("few")]),
            }]
        );
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_if_with_empty_else() {
        assert_eq!(
            tokenize("{{if:a}}x{{else}}{{end}}").unwrap(),
            vec![AstNode::If {
                condition: Condition::Truthy { key: "a" },
                body: vec![const_str!("x")],
                else_branch: Some(vec![]),
            }]
        );
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_nested_else_belongs_to_inner_if() {
        let nodes = tokenize("{{if:a}}{{if:b}}1{{else}}2{{end}}{{else}}3{{end}}").unwrap();
        let [AstNode::If { body, else_branch, .. }] = nodes.as_slice() else {
            panic!("Expected a single if node, got {nodes:?}");
        };
        assert_eq!(else_branch.as_deref(), Some([const_str!("3")].as_slice()));
        assert!(matches!(
            body.as_slice(),
            [AstNode::If { else_branch: Some(_), .. }]
        ));
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_nested_loops() {
        let nodes = tokenize("{{for:rows}}[{{for:cols}}{{=v}}{{end}}]{{end}}").unwrap();
        let [AstNode::For { key, body, .. }] = nodes.as_slice() else {
            panic!("Expected a single for node, got {nodes:?}");
        };
        assert_eq!(*key, "rows");
        assert_eq!(body.len(), 3);
        assert!(matches!(&body[1], AstNode::For { key: "cols", .. }));
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_panic_unclosed_for() {
        let err = tokenize("{{for:items}}<li>{{=x}}</li>").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnclosedBlock { ref tag } if tag == "{{for:items}}"));
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_panic_unclosed_nested_if() {
        let err = tokenize("<p>\n{{for:a}}{{if:b}}x{{end}}").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnclosedBlock { .. }));
        assert_eq!(err.line, 2);
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_panic_stray_end() {
        let err = tokenize("text{{end}}").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedTag {
                tag: "{{end}}".to_string()
            }
        );
        assert_eq!(err.column, 5);
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_panic_else_outside_if() {
        assert!(matches!(
            tokenize("a{{else}}b").unwrap_err().kind,
            ParseErrorKind::UnexpectedTag { .. }
        ));
        assert!(matches!(
            tokenize("{{for:a}}x{{else}}y{{end}}").unwrap_err().kind,
            ParseErrorKind::UnexpectedTag { .. }
        ));
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_panic_duplicate_else() {
        let err = tokenize("{{if:a}}1{{else}}2{{else}}3{{end}}").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::DuplicateElse);
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_panic_misplaced_separator() {
        let err = tokenize("{{for:a}}{{=x}}{{sep}},{{end}}{{end}}").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MisplacedSeparator);
        let err = tokenize("{{sep}},{{end}}").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MisplacedSeparator);
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_if_branch_cannot_straddle_else() {
        // The loop's body runs up to the first `{{end}}` and so swallows the `{{else}}`.
        assert!(tokenize("{{if:a}}{{for:b}}{{else}}{{end}}{{end}}").is_err());
    }
}
