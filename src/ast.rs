use crate::condition::Condition;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum AstNode<'a> {
    /// A run of literal markup, copied to the output untouched.
    Constant { data: &'a str },
    /// `{{=key}}`
    Substitution { key: &'a str },
    /// `{{for:key}}...{{end}}`, optionally led by a `{{sep}}...{{end}}` block.
    For {
        key: &'a str,
        separator: Option<Separator<'a>>,
        body: Vec<AstNode<'a>>,
    },
    /// `{{if:cond}}...{{end}}` or `{{if:cond}}...{{else}}...{{end}}`.
    If {
        condition: Condition<'a>,
        body: Vec<AstNode<'a>>,
        else_branch: Option<Vec<AstNode<'a>>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Separator<'a> {
    /// Whitespace between `{{for:..}}` and `{{sep}}`, only needed to print the
    /// block back unevaluated.
    pub(crate) leading: &'a str,
    pub(crate) body: Vec<AstNode<'a>>,
}
