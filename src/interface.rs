use std::{borrow::Cow, collections::HashMap};

/// Where template sources come from.
///
/// Lookups that fail are not errors: the engine renders a visible
/// placeholder for unknown ids instead.
pub trait TemplateSource {
    fn fetch_source(&self, template_id: &str) -> Option<Cow<'_, str>>;
}

/// Key to locale-specific text. Must always produce some text, falling back
/// to a placeholder for unknown keys.
pub trait Localizer {
    fn translate(&self, key: &str) -> Cow<'_, str>;
}

/// Where rendered HTML ends up, addressed by target id.
pub trait RenderTarget {
    fn write_html(&mut self, target: &str, html: &str);
}

impl<T: TemplateSource + ?Sized> TemplateSource for &T {
    fn fetch_source(&self, template_id: &str) -> Option<Cow<'_, str>> {
        (**self).fetch_source(template_id)
    }
}

impl<T: TemplateSource + ?Sized> TemplateSource for &mut T {
    fn fetch_source(&self, template_id: &str) -> Option<Cow<'_, str>> {
        (**self).fetch_source(template_id)
    }
}

impl<L: Localizer + ?Sized> Localizer for &L {
    fn translate(&self, key: &str) -> Cow<'_, str> {
        (**self).translate(key)
    }
}

impl<T: RenderTarget + ?Sized> RenderTarget for &mut T {
    fn write_html(&mut self, target: &str, html: &str) {
        (**self).write_html(target, html);
    }
}

/// A plain map of template id to source text.
impl TemplateSource for HashMap<String, String> {
    fn fetch_source(&self, template_id: &str) -> Option<Cow<'_, str>> {
        self.get(template_id).map(|source| Cow::Borrowed(source.as_str()))
    }
}

/// A plain map of target id to the last HTML written there.
impl RenderTarget for HashMap<String, String> {
    fn write_html(&mut self, target: &str, html: &str) {
        self.insert(target.to_string(), html.to_string());
    }
}
