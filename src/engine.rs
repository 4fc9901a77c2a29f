use crate::config::Config;
use crate::error::{TilelateError, TilelateResult};
use crate::i18n::{Translations, localize};
use crate::interface::{Localizer, RenderTarget, TemplateSource};
use crate::persist::{PersistedRender, PersistenceStore};
use crate::template::Template;
use crate::value::Context;

/// Prefix of the text rendered for an unknown template id.
pub const TEMPLATE_MISSING: &str = "###TEMPLATE_MISSING###:";

/// `Engine` renders templates fetched from a [`TemplateSource`] and keeps
/// track of the renders that should be replayed after a global change.
///
/// The engine owns its localizer and its persistence store; template
/// sources and render targets are borrowed per call, so one host object
/// (such as [`crate::Document`]) can serve as both.
///
/// # Examples
///
/// ```
/// use tilelate::{Context, Document, Engine};
///
/// let mut document = Document::new();
/// document.add_template("footer", "&copy; {{=year}}");
///
/// let mut engine = Engine::new();
/// let data = Context::new().insert("year", 2024).to_owned();
/// engine
///     .render_and_persist(&mut document, "footer", "footer", Some(data))
///     .unwrap();
/// assert_eq!(document.html("footer"), Some("&copy; 2024"));
///
/// engine.refresh_all(&mut document).unwrap();
/// assert_eq!(document.html("footer"), Some("&copy; 2024"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine<L = Translations> {
    localizer: L,
    store: PersistenceStore,
}

impl Engine<Translations> {
    /// Creates an engine with empty translation tables.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &Config) -> Self {
        Self::with_localizer(Translations::with_config(config))
    }

    /// Switches the active locale and redraws every persisted render.
    ///
    /// Unknown locales leave the active one in place; the redraw happens
    /// either way. Returns whether the locale changed to `locale`.
    ///
    /// # Errors
    /// - If a persisted template has become malformed.
    pub fn switch_locale<H, N>(&mut self, host: &mut H, locale: N) -> TilelateResult<bool>
    where
        H: TemplateSource + RenderTarget + ?Sized,
        N: AsRef<str>,
    {
        let switched = self.localizer.set_locale(locale.as_ref());
        self.refresh_all(host)?;
        Ok(switched)
    }
}

impl<L: Localizer> Engine<L> {
    pub fn with_localizer(localizer: L) -> Self {
        Self {
            localizer,
            store: PersistenceStore::new(),
        }
    }

    pub const fn localizer(&self) -> &L {
        &self.localizer
    }

    pub const fn localizer_mut(&mut self) -> &mut L {
        &mut self.localizer
    }

    pub const fn persisted(&self) -> &PersistenceStore {
        &self.store
    }

    /// Renders template text directly, without a source lookup.
    ///
    /// Localization tags are replaced first, then the localized text is
    /// parsed and evaluated against `data`.
    ///
    /// # Errors
    /// - `TilelateError::Parse` if the localized text has unbalanced control
    ///   tags. Positions refer to the localized text.
    pub fn resolve(&self, text: &str, data: Option<&Context>) -> TilelateResult<String> {
        let localized = localize(text, &self.localizer);
        let template = Template::parse(&localized)?;
        Ok(template.render(data))
    }

    /// Fetches `template_id` from `source` and renders it with `data`.
    ///
    /// An unknown id renders as `###TEMPLATE_MISSING###:<id>` rather than
    /// failing.
    ///
    /// # Errors
    /// - `TilelateError::Malformed` if the template has unbalanced control tags.
    pub fn render<S, N>(
        &self,
        source: &S,
        template_id: N,
        data: Option<&Context>,
    ) -> TilelateResult<String>
    where
        S: TemplateSource + ?Sized,
        N: AsRef<str>,
    {
        let template_id = template_id.as_ref();
        let Some(text) = source.fetch_source(template_id) else {
            tracing::warn!(template_id, "Template missing");
            return Ok(format!("{TEMPLATE_MISSING}{template_id}"));
        };

        let localized = localize(&text, &self.localizer);
        let template = Template::parse(&localized)
            .map_err(|error| TilelateError::malformed(template_id, error))?;
        tracing::debug!(template_id, has_data = data.is_some(), "Rendering template");
        Ok(template.render(data))
    }

    /// Renders `template_id` and writes the result into `target`.
    ///
    /// # Errors
    /// - `TilelateError::Malformed` if the template has unbalanced control
    ///   tags; the target is left untouched.
    pub fn fill<H, T, N>(
        &self,
        host: &mut H,
        target: T,
        template_id: N,
        data: Option<&Context>,
    ) -> TilelateResult<()>
    where
        H: TemplateSource + RenderTarget + ?Sized,
        T: AsRef<str>,
        N: AsRef<str>,
    {
        let html = self.render(&*host, template_id, data)?;
        host.write_html(target.as_ref(), &html);
        Ok(())
    }

    /// Fills `target` and remembers the render so [`Engine::refresh_all`]
    /// can redraw it. A later registration for the same target replaces
    /// this one.
    ///
    /// # Errors
    /// - `TilelateError::Malformed` if the template has unbalanced control
    ///   tags; nothing is stored in that case.
    pub fn render_and_persist<H, T, N>(
        &mut self,
        host: &mut H,
        target: T,
        template_id: N,
        data: Option<Context>,
    ) -> TilelateResult<()>
    where
        H: TemplateSource + RenderTarget + ?Sized,
        T: AsRef<str>,
        N: AsRef<str>,
    {
        let target = target.as_ref();
        let template_id = template_id.as_ref();
        self.fill(host, target, template_id, data.as_ref())?;

        tracing::debug!(element = target, template_id, "Persisting render");
        self.store.insert(PersistedRender {
            target: target.to_string(),
            template_id: template_id.to_string(),
            data,
        });
        Ok(())
    }

    /// Redraws every persisted render with the data it was registered with,
    /// in registration order.
    ///
    /// An entry whose template fails to parse keeps its old content; the
    /// remaining entries are still redrawn.
    ///
    /// # Errors
    /// - `TilelateError::Malformed` for the first template that no longer
    ///   parses.
    pub fn refresh_all<H>(&self, host: &mut H) -> TilelateResult<()>
    where
        H: TemplateSource + RenderTarget + ?Sized,
    {
        tracing::debug!(entries = self.store.len(), "Refreshing persisted renders");
        let mut first_error = None;
        for entry in self.store.iter() {
            tracing::trace!(
                element = %entry.target,
                template_id = %entry.template_id,
                "Replaying render"
            );
            let result = self.fill(host, &entry.target, &entry.template_id, entry.data.as_ref());
            if let Err(error) = result {
                tracing::warn!(element = %entry.target, %error, "Skipping persisted render");
                first_error.get_or_insert(error);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Forgets every persisted render.
    pub fn clear_persisted(&mut self) {
        tracing::debug!(entries = self.store.len(), "Clearing persisted renders");
        self.store.clear();
    }
}
