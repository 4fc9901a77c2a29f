use std::{borrow::Cow, collections::BTreeMap, fmt};

/// A single piece of template data.
///
/// Values are untyped in the way the template language is: numbers and
/// strings coerce into each other for comparisons, and every value has a
/// text form used by `{{=key}}` substitution.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
    Object(Context),
}

impl Value {
    /// Boolean coercion: `false`, `0`, `NaN`, `""` and `null` are falsy,
    /// everything else is truthy. Empty lists and objects are truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::List(_) | Self::Object(_) => true,
        }
    }

    pub const fn as_list(&self) -> Option<&Vec<Self>> {
        match self {
            Self::List(items) => Some(items),
            Self::Null | Self::Bool(_) | Self::Number(_) | Self::String(_) | Self::Object(_) => {
                None
            }
        }
    }

    pub const fn as_object(&self) -> Option<&Context> {
        match self {
            Self::Object(context) => Some(context),
            Self::Null | Self::Bool(_) | Self::Number(_) | Self::String(_) | Self::List(_) => None,
        }
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The text form used for substitution.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Self::String(s) => Cow::Borrowed(s),
            Self::Null => Cow::Borrowed("null"),
            Self::Bool(true) => Cow::Borrowed("true"),
            Self::Bool(false) => Cow::Borrowed("false"),
            Self::Number(n) => Cow::Owned(format_number(*n)),
            // Lists join their elements with commas, nulls becoming empty.
            Self::List(items) => Cow::Owned(
                items
                    .iter()
                    .map(|item| match item {
                        Self::Null => Cow::Borrowed(""),
                        other => other.to_text(),
                    })
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            Self::Object(_) => Cow::Borrowed("[object Object]"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Number to text the way an untyped host prints it: shortest round-trip
/// digits, with exponent form (`1e+21`, `1e-7`) outside `1e-6 <= |n| < 1e21`.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        // Covers -0 as well.
        "0".to_string()
    } else if (1e-6..1e21).contains(&n.abs()) {
        n.to_string()
    } else {
        let exponential = format!("{n:e}");
        match exponential.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => exponential,
        }
    }
}

/// Numeric coercion of text. Surrounding whitespace is ignored, blank text
/// is `0`, and anything that is not a decimal, `0x`/`0o`/`0b` integer or
/// `Infinity` literal is `NaN`.
pub(crate) fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let radix = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)]
        .into_iter()
        .find_map(|(prefix, radix)| trimmed.strip_prefix(prefix).map(|digits| (digits, radix)));
    if let Some((digits, radix)) = radix {
        return u64::from_str_radix(digits, radix).map_or(f64::NAN, |n| n as f64);
    }

    let unsigned = trimmed.trim_start_matches(['+', '-']);
    if unsigned == "Infinity" && trimmed.len() <= unsigned.len() + 1 {
        return if trimmed.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    // `f64::from_str` also accepts "inf" and "nan", which are not numbers here.
    let is_decimal = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !is_decimal {
        return f64::NAN;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Cow<'_, str>> for Value {
    fn from(value: Cow<'_, str>) -> Self {
        Self::String(value.into_owned())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Self::Number(value as f64)
    }
}

impl From<Context> for Value {
    fn from(value: Context) -> Self {
        Self::Object(value)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(map) => Self::Object(Context {
                data: map.into_iter().map(|(k, v)| (k, v.into())).collect(),
            }),
        }
    }
}

/// A string-keyed data scope that templates are rendered against.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Context {
    data: BTreeMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<N: AsRef<str>, V: Into<Value>>(&mut self, name: N, value: V) -> &mut Self {
        self.data.insert(name.as_ref().to_string(), value.into());
        self
    }

    pub fn get<N: AsRef<str>>(&self, name: N) -> Option<&Value> {
        self.data.get(name.as_ref())
    }

    pub fn contains<N: AsRef<str>>(&self, name: N) -> bool {
        self.data.contains_key(name.as_ref())
    }

    pub fn remove<N: AsRef<str>>(&mut self, name: N) -> Option<Value> {
        self.data.remove(name.as_ref())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(feature = "serde")]
impl Context {
    /// Parses a JSON object into a context.
    ///
    /// # Errors
    /// - If `json` is not valid JSON or not an object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The scope a block is evaluated in.
///
/// A missing context or a `null` loop element is `Absent`, which makes the
/// evaluator print its block back unevaluated. Non-object loop elements are
/// present but expose no keys.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Scope<'d> {
    Absent,
    Object(&'d Context),
    Primitive,
}

impl<'d> Scope<'d> {
    pub(crate) const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Own-key lookup; never consults enclosing scopes.
    pub(crate) fn get(&self, key: &str) -> Option<&'d Value> {
        match self {
            Self::Object(context) => context.get(key),
            Self::Absent | Self::Primitive => None,
        }
    }
}

impl<'d> From<Option<&'d Context>> for Scope<'d> {
    fn from(context: Option<&'d Context>) -> Self {
        context.map_or(Self::Absent, Self::Object)
    }
}

impl<'d> From<&'d Value> for Scope<'d> {
    fn from(value: &'d Value) -> Self {
        match value {
            Value::Null => Self::Absent,
            Value::Object(context) => Self::Object(context),
            Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::List(_) => {
                Self::Primitive
            }
        }
    }
}
