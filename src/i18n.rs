//! Translation lookup for the bot replies.
//!
//! Locale resources are JSON documents embedded in the binary. Nested objects
//! are flattened into dotted keys, so `{"ffinfo": {"usage": "..."}}` is looked
//! up with `ffinfo.usage`. Placeholders use the `{{name}}` syntax.

use std::collections::HashMap;

use log::{debug, warn};
use serde_json::Value;

/// Locale used when a key is missing from the configured locale.
pub const FALLBACK_LOCALE: &str = "en";

/// Embedded locale resources as `(locale, json)` pairs.
const RESOURCES: [(&str, &str); 2] = [
    ("en", include_str!("../locales/en.json")),
    ("bn", include_str!("../locales/bn.json")),
];

/// Read-only translation table shared by the dispatcher and the commands.
///
/// # Examples
///
/// ```no_run
/// # use telecmd::i18n::Translator;
/// let translator = Translator::new("bn").unwrap();
/// let text = translator.t_with("ffinfo.usage", &[("prefix", "/")]);
/// ```
#[derive(Debug, Clone)]
pub struct Translator {
    /// Locale used first for every lookup
    locale: String,
    /// Flattened messages indexed by locale then by key
    messages: HashMap<String, HashMap<String, String>>,
}

impl Translator {
    /// Creates a translator over the embedded resources.
    ///
    /// # Errors
    ///
    /// Returns an error if an embedded resource is not valid JSON.
    pub fn new(locale: &str) -> Result<Self, serde_json::Error> {
        Self::from_resources(locale, &RESOURCES)
    }

    /// Creates a translator over the given `(locale, json)` resources.
    ///
    /// # Errors
    ///
    /// Returns an error if a resource is not valid JSON.
    pub fn from_resources(locale: &str, resources: &[(&str, &str)]) -> Result<Self, serde_json::Error> {
        let mut messages = HashMap::new();
        for (name, json) in resources {
            let value: Value = serde_json::from_str(json)?;
            let mut flat = HashMap::new();
            flatten("", &value, &mut flat);
            debug!("loaded {} messages for locale {}", flat.len(), name);
            messages.insert((*name).to_owned(), flat);
        }

        let locale = locale.to_lowercase();
        if !messages.contains_key(&locale) {
            warn!(
                "no resources for locale {}, falling back to {}",
                locale, FALLBACK_LOCALE
            );
        }

        Ok(Translator { locale, messages })
    }

    /// Locale used first for every lookup.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Looks up `key` in the configured locale, then in the fallback locale.
    ///
    /// Returns the key itself when no locale knows it.
    pub fn t(&self, key: &str) -> String {
        [self.locale.as_str(), FALLBACK_LOCALE]
            .iter()
            .find_map(|locale| self.messages.get(*locale)?.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_owned())
    }

    /// Looks up `key` and replaces every `{{name}}` placeholder with its value.
    pub fn t_with(&self, key: &str, values: &[(&str, &str)]) -> String {
        values
            .iter()
            .fold(self.t(key), |text, (name, value)| {
                text.replace(&format!("{{{{{}}}}}", name), value)
            })
    }
}

/// Flattens nested JSON objects into dotted keys. Only string leaves are kept.
fn flatten(prefix: &str, value: &Value, out: &mut HashMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(&path, child, out);
            }
        }
        Value::String(text) => {
            out.insert(prefix.to_owned(), text.clone());
        }
        _ => debug!("ignore non string message {}", prefix),
    }
}
