use crate::ast::{AstNode, Separator};
use crate::error::ParseError;
use crate::parser::tokenize;
use crate::tag::{ELSE_TAG, END_TAG, SEP_TAG};
use crate::value::{Context, Scope};

/// A Template is a parsed template source that can be rendered any number of
/// times against different data.
///
/// Templates are parsed from already localized text: run the source through
/// [`crate::localize`] first when it carries `{{i18n:..}}` tags, as
/// [`crate::Engine`] does.
///
/// # Example
///
/// ```rust
/// use tilelate::{Context, Template, Translations, localize};
///
/// let mut translations = Translations::new();
/// translations.insert("en", "open", "Open");
///
/// let source = localize("{{i18n:open}} <b>{{=name}}</b>", &translations);
/// let template = Template::parse(&source).unwrap();
/// let context = Context::new().insert("name", "Mail").to_owned();
///
/// assert_eq!(template.render(Some(&context)), "Open <b>Mail</b>");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Template<'a> {
    content: &'a str,
    nodes: Vec<AstNode<'a>>,
}

impl<'a> Template<'a> {
    /// Parses template text into its tree of literal runs, substitutions,
    /// loops and conditionals.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if a `for`/`if` block has no matching `{{end}}`,
    /// or an `else`, `sep` or `end` tag appears where it cannot.
    pub fn parse(content: &'a str) -> Result<Self, ParseError> {
        let nodes = tokenize(content)?;
        Ok(Self { content, nodes })
    }

    /// The source text this template was parsed from.
    pub const fn content(&self) -> &'a str {
        self.content
    }

    /// Renders the template against `context`.
    ///
    /// Values are inserted as-is; nothing is HTML-escaped. Without a context
    /// the template comes back unevaluated.
    pub fn render(&self, context: Option<&Context>) -> String {
        let mut output = String::with_capacity(self.content.len());
        render_nodes(&self.nodes, Scope::from(context), &mut output);
        output
    }
}

/// Evaluates `nodes` in `scope`, appending the result to `output`.
///
/// Lookups only ever see the keys of `scope` itself: a loop body rendered
/// for one element cannot reach keys of the enclosing data.
fn render_nodes(nodes: &[AstNode<'_>], scope: Scope<'_>, output: &mut String) {
    if scope.is_absent() {
        write_unevaluated(nodes, output);
        return;
    }

    for node in nodes {
        match node {
            AstNode::Constant { data } => output.push_str(data),
            AstNode::Substitution { key } => match scope.get(key) {
                Some(value) => output.push_str(&value.to_text()),
                // Keys missing from this scope leave their tag in place.
                None => write_substitution_tag(key, output),
            },
            AstNode::For {
                key,
                separator,
                body,
            } => {
                let Some(items) = scope.get(key).and_then(|value| value.as_list()) else {
                    continue;
                };
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        if let Some(separator) = separator {
                            write_unevaluated(&separator.body, output);
                        }
                    }
                    render_nodes(body, Scope::from(item), output);
                }
            }
            AstNode::If {
                condition,
                body,
                else_branch,
            } => {
                if condition.evaluate(scope) {
                    render_nodes(body, scope, output);
                } else if let Some(else_branch) = else_branch {
                    render_nodes(else_branch, scope, output);
                }
            }
        }
    }
}

fn write_substitution_tag(key: &str, output: &mut String) {
    output.push_str("{{=");
    output.push_str(key);
    output.push_str("}}");
}

/// Prints nodes back as template text.
///
/// Used for blocks rendered without data and for loop separators, which
/// support no placeholders.
fn write_unevaluated(nodes: &[AstNode<'_>], output: &mut String) {
    for node in nodes {
        match node {
            AstNode::Constant { data } => output.push_str(data),
            AstNode::Substitution { key } => write_substitution_tag(key, output),
            AstNode::For {
                key,
                separator,
                body,
            } => {
                output.push_str("{{for:");
                output.push_str(key);
                output.push_str("}}");
                if let Some(Separator { leading, body }) = separator {
                    output.push_str(leading);
                    output.push_str(SEP_TAG);
                    write_unevaluated(body, output);
                    output.push_str(END_TAG);
                }
                write_unevaluated(body, output);
                output.push_str(END_TAG);
            }
            AstNode::If {
                condition,
                body,
                else_branch,
            } => {
                output.push_str("{{if:");
                output.push_str(&condition.source());
                output.push_str("}}");
                write_unevaluated(body, output);
                if let Some(else_branch) = else_branch {
                    output.push_str(ELSE_TAG);
                    write_unevaluated(else_branch, output);
                }
                output.push_str(END_TAG);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Translations, localize};
    use crate::value::Value;

    fn translations() -> Translations {
        let mut translations = Translations::new();
        translations.insert("en", "login", "Login");
        translations.insert("en", "or", "or");
        translations
    }

    fn render(content: &str, context: Option<&Context>) -> String {
        let localized = localize(content, &translations());
        Template::parse(&localized).unwrap().render(context)
    }

    fn tile(text: &str) -> Value {
        Context::new().insert("text", text).to_owned().into()
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_plain_text_is_identity() {
        let text = "<div id=\"grid\">\n  <span>{ not a tag }</span>\n</div>";
        assert_eq!(render(text, Some(&Context::new())), text);
        assert_eq!(render(text, None), text);
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_substitution() {
        let context = Context::new().insert("year", 2024).insert("name", "Ann").to_owned();
        assert_eq!(
            render("&copy; {{=year}} {{=name}}{{=name}}", Some(&context)),
            "&copy; 2024 AnnAnn"
        );
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_substitution_does_not_escape() {
        let context = Context::new().insert("html", "<script>x</script>").to_owned();
        assert_eq!(render("{{=html}}", Some(&context)), "<script>x</script>");
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_missing_key_keeps_tag() {
        assert_eq!(render("a{{=missing}}b", Some(&Context::new())), "a{{=missing}}b");
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_absent_context_leaves_structure_verbatim() {
        let text = "{{i18n:login}} {{for:a}}\n{{sep}},{{end}}{{=x}}{{end}} {{if:n>=2}}y{{else}}z{{end}} {{if:b}}c{{end}}";
        assert_eq!(
            render(text, None),
            "Login {{for:a}}\n{{sep}},{{end}}{{=x}}{{end}} {{if:n>=2}}y{{else}}z{{end}} {{if:b}}c{{end}}"
        );
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_loop_with_separator() {
        let context = Context::new()
            .insert("tiles", vec![tile("a"), tile("b"), tile("c")])
            .to_owned();
        assert_eq!(
            render("{{for:tiles}} {{sep}} {{i18n:or}} {{end}}[{{=text}}]{{end}}", Some(&context)),
            "[a] or [b] or [c]"
        );
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_separator_ignores_data() {
        let context = Context::new()
            .insert("tiles", vec![tile("a"), tile("b")])
            .to_owned();
        assert_eq!(
            render("{{for:tiles}}{{sep}}{{=text}}{{end}}{{=text}}{{end}}", Some(&context)),
            "a{{=text}}b"
        );
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_loop_over_missing_or_non_list() {
        let context = Context::new().insert("tiles", "abc").insert("empty", Vec::<Value>::new()).to_owned();
        assert_eq!(render("<{{for:tiles}}x{{end}}>", Some(&context)), "<>");
        assert_eq!(render("<{{for:empty}}x{{end}}>", Some(&context)), "<>");
        assert_eq!(render("<{{for:missing}}x{{end}}>", Some(&context)), "<>");
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_loop_does_not_see_outer_scope() {
        let context = Context::new()
            .insert("title", "outer")
            .insert("tiles", vec![tile("a")])
            .to_owned();
        assert_eq!(
            render("{{for:tiles}}{{=text}}/{{=title}}{{end}}", Some(&context)),
            "a/{{=title}}"
        );
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_loop_over_primitives_and_nulls() {
        let context = Context::new()
            .insert("items", vec![Value::from(1), Value::Null])
            .to_owned();
        assert_eq!(
            render("{{for:items}}({{if:a}}y{{else}}n{{end}}{{=a}}){{end}}", Some(&context)),
            "(n{{=a}})({{if:a}}y{{else}}n{{end}}{{=a}})"
        );
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_nested_loops() {
        let row = |values: Vec<i32>| -> Value { Context::new().insert("inner", values).to_owned().into() };
        let context = Context::new()
            .insert("outer", vec![row(vec![1, 2]), row(vec![3])])
            .to_owned();
        // Inner elements are numbers, so they expose no keys of their own.
        assert_eq!(
            render("{{for:outer}}[{{for:inner}}x{{end}}]{{end}}", Some(&context)),
            "[xx][x]"
        );
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_if_else_scenario() {
        let few = Context::new().insert("n", 1).to_owned();
        let many = Context::new().insert("n", 2).to_owned();
        let text = "{{if:n>=2}}many{{else}}few{{end}}";
        assert_eq!(render(text, Some(&few)), "few");
        assert_eq!(render(text, Some(&many)), "many");
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_if_without_else() {
        let context = Context::new().insert("on", false).to_owned();
        assert_eq!(render("a{{if:on}}b{{end}}c", Some(&context)), "ac");
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_branches_are_evaluated() {
        let context = Context::new()
            .insert("edit", true)
            .insert("name", "Tile")
            .insert("sizes", vec!["1x1", "2x2"])
            .to_owned();
        assert_eq!(
            render("{{if:edit}}{{=name}}:{{for:sizes}}*{{end}}{{else}}-{{end}}", Some(&context)),
            "Tile:**"
        );
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_content_is_kept() {
        let template = Template::parse("{{=a}}").unwrap();
        assert_eq!(template.content(), "{{=a}}");
    }
}
