//! A small string template engine for HTML fragments.
//!
//! Templates mix literal markup with a handful of control tags:
//!
//! | Tag | Meaning |
//! |---|---|
//! | `{{=key}}` | value of `key` in the current scope |
//! | `{{i18n:key}}` | localized text for `key` |
//! | `{{for:key}}...{{end}}` | body once per element of the list `key` |
//! | `{{sep}}...{{end}}` | first thing in a loop body: text between elements |
//! | `{{if:cond}}...{{else}}...{{end}}` | branch on `key` or `lhs<op>rhs` |
//!
//! Localization tags are replaced in the raw source before anything else is
//! looked at, so translations may contain template tags of their own.
//!
//! Comparisons are loose: numeric strings compare as numbers against
//! numbers, so `{{if:count>=2}}` works whether `count` is `2` or `"2"`.
//! Nothing is escaped; values are inserted as raw HTML.
//!
//! ```
//! use tilelate::{Context, Engine};
//!
//! let engine = Engine::new();
//! let data = Context::new()
//!     .insert("tiles", vec![
//!         Context::new().insert("text", "Mail").to_owned(),
//!         Context::new().insert("text", "News").to_owned(),
//!     ])
//!     .to_owned();
//!
//! let html = engine
//!     .resolve("{{for:tiles}}{{sep}} | {{end}}<a>{{=text}}</a>{{end}}", Some(&data))
//!     .unwrap();
//! assert_eq!(html, "<a>Mail</a> | <a>News</a>");
//! ```

mod ast;
mod condition;
mod config;
mod document;
mod engine;
mod error;
mod i18n;
mod interface;
mod locator;
mod parser;
mod persist;
mod tag;
mod template;
mod value;

// Public exports.
pub use config::{Config, DEFAULT_LOCALE, DEFAULT_TEMPLATE_PREFIX};
pub use document::Document;
pub use engine::{Engine, TEMPLATE_MISSING};
pub use error::{ParseError, ParseErrorKind, TilelateError, TilelateResult};
pub use i18n::{TRANSLATION_MISSING, Translations, localize};
pub use interface::{Localizer, RenderTarget, TemplateSource};
pub use locator::locate_end;
pub use persist::{PersistedRender, PersistenceStore};
pub use template::Template;
pub use value::{Context, Value};
