use std::{borrow::Cow, collections::HashMap};

use crate::config::Config;
use crate::interface::{RenderTarget, TemplateSource};

/// An in-memory page: element ids mapped to their inner HTML.
///
/// Template sources are elements named `<prefix><template id>` (`tmpl-` by
/// default), and rendering into a target replaces that element's content,
/// creating the element if needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    template_prefix: String,
    elements: HashMap<String, String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::with_config(&Config::default())
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            template_prefix: config.template_prefix.clone(),
            elements: HashMap::new(),
        }
    }

    /// Registers the source of `template_id` under its prefixed element id.
    pub fn add_template<N: AsRef<str>, C: Into<String>>(&mut self, template_id: N, source: C) -> &mut Self {
        let element_id = self.template_element_id(template_id.as_ref());
        self.elements.insert(element_id, source.into());
        self
    }

    pub fn set_html<N: Into<String>, C: Into<String>>(&mut self, element_id: N, html: C) -> &mut Self {
        self.elements.insert(element_id.into(), html.into());
        self
    }

    pub fn html<N: AsRef<str>>(&self, element_id: N) -> Option<&str> {
        self.elements.get(element_id.as_ref()).map(String::as_str)
    }

    pub fn remove<N: AsRef<str>>(&mut self, element_id: N) -> Option<String> {
        self.elements.remove(element_id.as_ref())
    }

    pub fn template_element_id(&self, template_id: &str) -> String {
        format!("{}{}", self.template_prefix, template_id)
    }
}

impl TemplateSource for Document {
    fn fetch_source(&self, template_id: &str) -> Option<Cow<'_, str>> {
        self.html(self.template_element_id(template_id)).map(Cow::Borrowed)
    }
}

impl RenderTarget for Document {
    fn write_html(&mut self, target: &str, html: &str) {
        match self.elements.get_mut(target) {
            Some(element) => {
                element.clear();
                element.push_str(html);
            }
            None => {
                self.elements.insert(target.to_string(), html.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ntest::timeout(100)]
    fn test_templates_use_prefix() {
        let mut document = Document::new();
        document.add_template("footer", "<p>{{=year}}</p>");
        assert_eq!(document.html("tmpl-footer"), Some("<p>{{=year}}</p>"));
        assert_eq!(document.fetch_source("footer").as_deref(), Some("<p>{{=year}}</p>"));
        assert!(document.fetch_source("tmpl-footer").is_none());
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_custom_prefix() {
        let config = Config {
            template_prefix: "template_".to_string(),
            ..Config::default()
        };
        let mut document = Document::with_config(&config);
        document.add_template("login-form", "form");
        assert_eq!(document.html("template_login-form"), Some("form"));
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_write_replaces_content() {
        let mut document = Document::new();
        document.set_html("grid", "old");
        document.write_html("grid", "new");
        document.write_html("footer", "created");
        assert_eq!(document.html("grid"), Some("new"));
        assert_eq!(document.html("footer"), Some("created"));
    }
}
