use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{ModelError, ModelResult};

/// The locales configured for a space, default locale first.
///
/// Never empty and never contains duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LocaleSet {
    codes: Vec<String>,
}

impl LocaleSet {
    /// Builds a locale set; the first code is the default locale.
    pub fn new<I, S>(codes: I) -> ModelResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let codes: Vec<String> = codes.into_iter().map(Into::into).collect();
        if codes.is_empty() {
            return Err(ModelError::InvalidLocales("at least one locale is required".into()));
        }
        let mut seen = HashSet::new();
        for code in &codes {
            if code.trim().is_empty() {
                return Err(ModelError::InvalidLocales("locale codes must not be blank".into()));
            }
            if !seen.insert(code.as_str()) {
                return Err(ModelError::InvalidLocales(format!("duplicate locale '{code}'")));
            }
        }
        Ok(Self { codes })
    }

    /// A set with a single (default) locale.
    pub fn single(code: &str) -> Self {
        Self {
            codes: vec![code.to_string()],
        }
    }

    /// Parses the CMS locale listing: either an array of
    /// `{"code": .., "default": bool}` objects or a collection wrapper with
    /// an `items` array. The locale flagged `default` is moved to the front.
    pub fn from_cms_json(json: &serde_json::Value) -> ModelResult<Self> {
        let items = json.get("items").unwrap_or(json);
        let locales: Vec<CmsLocale> = serde_json::from_value(items.clone())?;

        let mut codes = Vec::with_capacity(locales.len());
        if let Some(default) = locales.iter().find(|l| l.default) {
            codes.push(default.code.clone());
        }
        codes.extend(locales.into_iter().filter(|l| !l.default).map(|l| l.code));
        Self::new(codes)
    }

    /// The default locale code.
    pub fn default_locale(&self) -> &str {
        &self.codes[0]
    }

    /// All locale codes in order.
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// Locales a field is stored under: every locale when localized,
    /// otherwise only the default.
    pub fn applicable(&self, localized: bool) -> &[String] {
        if localized { &self.codes } else { &self.codes[..1] }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for LocaleSet {
    type Error = ModelError;

    fn try_from(codes: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(codes)
    }
}

impl From<LocaleSet> for Vec<String> {
    fn from(set: LocaleSet) -> Self {
        set.codes
    }
}

#[derive(Deserialize)]
struct CmsLocale {
    code: String,
    #[serde(default)]
    default: bool,
}
