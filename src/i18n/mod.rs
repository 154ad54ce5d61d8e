use std::path::Path;

use fluent_bundle::{FluentArgs, FluentBundle, FluentResource};
use tracing::{debug, warn};
use unic_langid::LanguageIdentifier;

use crate::game::types::StatusMessage;

/// Fluent-based internationalization.
pub struct I18n {
    bundle: FluentBundle<FluentResource>,
    lang: String,
}

impl I18n {
    /// Load `.ftl` files from the resources directory and auto-detect the system language.
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Self {
        let sys_lang = sys_locale::get_locale()
            .unwrap_or_else(|| "en".to_string())
            .to_lowercase();
        Self::load_for(dir, &sys_lang)
    }

    /// Load the bundle best matching `locale`, falling back to English.
    pub fn load_for<P: AsRef<Path>>(dir: P, locale: &str) -> Self {
        let dir = dir.as_ref();
        let lang_code = if locale.to_lowercase().starts_with("de") {
            "de"
        } else {
            "en"
        };

        if let Some(i18n) = Self::try_load(dir, lang_code) {
            return i18n;
        }
        if lang_code != "en" {
            if let Some(i18n) = Self::try_load(dir, "en") {
                return i18n;
            }
        }

        warn!(dir = %dir.display(), "no translations found, using built-in texts");
        Self::empty()
    }

    fn empty() -> Self {
        let langid: LanguageIdentifier = "en".parse().unwrap_or_default();
        Self {
            bundle: FluentBundle::new(vec![langid]),
            lang: "en".to_string(),
        }
    }

    fn try_load(dir: &Path, lang: &str) -> Option<Self> {
        let path = dir.join(format!("{}.ftl", lang));
        let source = std::fs::read_to_string(&path).ok()?;
        let resource = FluentResource::try_new(source).ok()?;
        let langid: LanguageIdentifier = lang.parse().ok()?;
        let mut bundle = FluentBundle::new(vec![langid]);
        // Plain label text; no bidi isolation marks around arguments.
        bundle.set_use_isolating(false);
        bundle.add_resource(resource).ok()?;
        debug!(lang, "translations loaded");
        Some(Self {
            bundle,
            lang: lang.to_string(),
        })
    }

    /// Get a translated message by its identifier.
    pub fn t(&self, id: &str) -> String {
        self.format(id, None).unwrap_or_else(|| id.to_string())
    }

    /// Get a translated message with arguments.
    pub fn t_args(&self, id: &str, args: &FluentArgs) -> String {
        self.format(id, Some(args)).unwrap_or_else(|| id.to_string())
    }

    /// Text for the status line. Untranslated messages use the English wording.
    pub fn status(&self, message: &StatusMessage) -> String {
        let mut args = FluentArgs::new();
        if let Some(p) = message.player() {
            args.set("player", p.to_string());
        }
        self.format(message.fluent_id(), Some(&args))
            .unwrap_or_else(|| message.to_string())
    }

    fn format(&self, id: &str, args: Option<&FluentArgs>) -> Option<String> {
        let pattern = self.bundle.get_message(id)?.value()?;
        let mut errors = vec![];
        Some(
            self.bundle
                .format_pattern(pattern, args, &mut errors)
                .to_string(),
        )
    }

    pub fn current_language(&self) -> &str {
        &self.lang
    }
}
