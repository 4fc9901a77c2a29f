//! Per-locale string tables with a fallback locale.

use std::{borrow::Cow, collections::HashMap};

use crate::config::{Config, DEFAULT_LOCALE};
use crate::interface::Localizer;
use crate::tag::{I18N_PREFIX, OPEN, with_argument};

/// Prefix of the text rendered for a key found in no table.
pub const TRANSLATION_MISSING: &str = "###TRANSLATION_MISSING###:";

/// String tables keyed by locale code, with one active locale.
///
/// Lookups try the active locale, then the fallback locale, and finally
/// produce `###TRANSLATION_MISSING###:<key>`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translations {
    #[cfg_attr(feature = "serde", serde(default))]
    tables: HashMap<String, HashMap<String, String>>,
    #[cfg_attr(feature = "serde", serde(default = "default_locale"))]
    locale: String,
    #[cfg_attr(feature = "serde", serde(default = "default_locale"))]
    fallback_locale: String,
}

#[cfg(feature = "serde")]
fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

impl Default for Translations {
    fn default() -> Self {
        Self::new()
    }
}

impl Translations {
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
            locale: DEFAULT_LOCALE.to_string(),
            fallback_locale: DEFAULT_LOCALE.to_string(),
        }
    }

    /// Starts at `config.locale`, falling back to `config.fallback_locale`.
    ///
    /// The configured locale is taken as-is, even before it has a table.
    pub fn with_config(config: &Config) -> Self {
        Self {
            tables: HashMap::new(),
            locale: config.locale.clone(),
            fallback_locale: config.fallback_locale.clone(),
        }
    }

    /// Adds or replaces one entry of `locale`'s table.
    pub fn insert<L, K, V>(&mut self, locale: L, key: K, text: V) -> &mut Self
    where
        L: Into<String>,
        K: Into<String>,
        V: Into<String>,
    {
        self.tables
            .entry(locale.into())
            .or_default()
            .insert(key.into(), text.into());
        self
    }

    /// Merges a whole table into `locale`'s table.
    pub fn insert_table<L, I, K, V>(&mut self, locale: L, entries: I) -> &mut Self
    where
        L: Into<String>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.tables
            .entry(locale.into())
            .or_default()
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Switches the active locale. Locales without a table are ignored and
    /// leave the current one in place.
    ///
    /// Returns whether the active locale is now `locale`.
    pub fn set_locale<L: AsRef<str>>(&mut self, locale: L) -> bool {
        let locale = locale.as_ref();
        if !self.tables.contains_key(locale) {
            tracing::debug!(locale, current = %self.locale, "Ignoring locale without a table");
            return false;
        }
        self.locale = locale.to_string();
        true
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn fallback_locale(&self) -> &str {
        &self.fallback_locale
    }

    pub fn has_locale<L: AsRef<str>>(&self, locale: L) -> bool {
        self.tables.contains_key(locale.as_ref())
    }

    /// Locale codes that have a table, sorted.
    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        locales.sort_unstable();
        locales
    }

    /// Looks `key` up without the placeholder fallback.
    pub fn get(&self, key: &str) -> Option<&str> {
        [&self.locale, &self.fallback_locale]
            .into_iter()
            .filter_map(|locale| self.tables.get(locale))
            .find_map(|table| table.get(key))
            .map(String::as_str)
    }
}

#[cfg(feature = "serde")]
impl Translations {
    /// Loads tables from a JSON object of the form
    /// `{"en": {"login": "Login"}, "de": {"login": "Einloggen"}}`.
    ///
    /// # Errors
    /// - If `json` is not an object of string tables.
    pub fn from_json_tables(json: &str, config: &Config) -> Result<Self, serde_json::Error> {
        let tables: HashMap<String, HashMap<String, String>> = serde_json::from_str(json)?;
        let mut translations = Self::with_config(config);
        translations.tables = tables;
        Ok(translations)
    }
}

impl Localizer for Translations {
    fn translate(&self, key: &str) -> Cow<'_, str> {
        match self.get(key) {
            Some(text) => Cow::Borrowed(text),
            None => {
                tracing::warn!(key, locale = %self.locale, "Translation missing");
                Cow::Owned(format!("{TRANSLATION_MISSING}{key}"))
            }
        }
    }
}

/// Replaces every `{{i18n:key}}` tag in `text` with the localizer's text for
/// `key`.
///
/// This is the first thing done to a template source, before any other tag
/// is looked at. Translations may therefore carry template tags of their own,
/// and a tag may sit inside another tag's argument, as in
/// `{{if:lang=={{i18n:code}}}}`. Localization tags inside a translation are
/// expanded too, except for a key already being expanded, which is left as
/// written.
///
/// # Examples
///
/// ```
/// use tilelate::{Translations, localize};
///
/// let mut translations = Translations::new();
/// translations.insert("en", "greet", "Hi {{=name}}");
/// assert_eq!(localize("<p>{{i18n:greet}}</p>", &translations), "<p>Hi {{=name}}</p>");
/// ```
pub fn localize<L: Localizer + ?Sized>(text: &str, localizer: &L) -> String {
    let mut output = String::with_capacity(text.len());
    localize_into(text, localizer, &mut Vec::new(), &mut output);
    output
}

fn localize_into<L: Localizer + ?Sized>(
    text: &str,
    localizer: &L,
    expanding: &mut Vec<String>,
    output: &mut String,
) {
    let mut copied = 0;
    let mut pos = 0;
    while let Some(found) = text.get(pos..).and_then(|rest| rest.find(OPEN)) {
        let start = pos + found;
        let Some((key, len)) = text
            .get(start..)
            .and_then(|rest| with_argument(rest, I18N_PREFIX))
        else {
            pos = start + 1;
            continue;
        };
        let end = start + len;

        output.push_str(text.get(copied..start).unwrap_or_default());
        if expanding.iter().any(|active| active == key) {
            tracing::warn!(key, "Translation expands into itself");
            output.push_str(text.get(start..end).unwrap_or_default());
        } else {
            let translation = localizer.translate(key);
            expanding.push(key.to_string());
            localize_into(&translation, localizer, expanding, output);
            expanding.pop();
        }
        copied = end;
        pos = end;
    }
    output.push_str(text.get(copied..).unwrap_or_default());
}
