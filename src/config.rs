/// Settings shared by the engine and its default collaborators.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Config {
    /// Prepended to a template id to find its source element, e.g. `tmpl-tile`.
    pub template_prefix: String,
    /// Locale used for lookups until another is selected.
    pub locale: String,
    /// Locale consulted when the active one lacks a key.
    pub fallback_locale: String,
}

pub const DEFAULT_TEMPLATE_PREFIX: &str = "tmpl-";
pub const DEFAULT_LOCALE: &str = "en";

impl Default for Config {
    fn default() -> Self {
        Self {
            template_prefix: DEFAULT_TEMPLATE_PREFIX.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            fallback_locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

#[cfg(feature = "serde")]
impl Config {
    /// Reads a config from JSON; missing fields take their defaults.
    ///
    /// # Errors
    /// - If `json` is not a valid config object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
