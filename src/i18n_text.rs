use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;

use crate::Locale;

/// Text localized into any number of locales.
///
/// An entry is never empty: setting a locale's text to `""` removes it, and reading a locale
/// without an entry returns `""`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serialize",
    serde(into = "Vec<LocalizedString>", from = "Vec<LocalizedString>")
)]
pub struct I18nText {
    strings: BTreeMap<Locale, String>,
}

/// A single locale/text pair; the serialized form of [`I18nText`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct LocalizedString {
    pub locale: Locale,
    pub text: String,
}

impl I18nText {
    pub fn new() -> Self {
        I18nText::default()
    }
    /// Returns the text for `locale`, or `""` if there is none.
    pub fn get(&self, locale: &Locale) -> &str {
        match self.strings.get(locale) {
            Some(s) => s,
            None => "",
        }
    }
    /// Sets the text for `locale`; an empty string removes the entry.
    pub fn set<S: Into<String>>(&mut self, locale: &Locale, text: S) {
        let text = text.into();
        if text.is_empty() {
            self.strings.remove(locale);
        } else {
            self.strings.insert(locale.clone(), text);
        }
    }
    pub fn remove(&mut self, locale: &Locale) -> Option<String> {
        self.strings.remove(locale)
    }
    pub fn contains(&self, locale: &Locale) -> bool {
        self.strings.contains_key(locale)
    }
    /// Returns an iterator over the localized entries, ordered by locale identifier.
    pub fn iter(&self) -> impl Iterator<Item = (&Locale, &str)> {
        self.strings.iter().map(|(l, s)| (l, s.as_str()))
    }
    pub fn len(&self) -> usize {
        self.strings.len()
    }
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl fmt::Display for I18nText {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(
            formatter,
            "{{{}}}",
            self.iter()
                .map(|(l, s)| format!("{}: {:?}", l.name(), s))
                .join(", ")
        )
    }
}

impl From<I18nText> for Vec<LocalizedString> {
    fn from(text: I18nText) -> Self {
        text.strings
            .into_iter()
            .map(|(locale, text)| LocalizedString { locale, text })
            .collect()
    }
}

impl From<Vec<LocalizedString>> for I18nText {
    fn from(strings: Vec<LocalizedString>) -> Self {
        let mut text = I18nText::new();
        for s in strings {
            text.set(&s.locale, s.text);
        }
        text
    }
}
