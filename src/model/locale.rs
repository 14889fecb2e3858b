use super::{ChangeObserver, XmlDeserialize, assign};
use crate::coercion;
use serde::Serialize;

/// A language supported by the API, parsed from `languages.xml`.
///
/// Locales have no natural order; the client sorts them by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Locale {
    /// Numeric id of the language
    pub id: i32,
    /// Display name, e.g. "Deutsch"
    pub name: Option<String>,
    /// Short code used in requests, e.g. "de"
    pub abbreviation: Option<String>,
}

impl XmlDeserialize for Locale {
    fn apply_field(&mut self, tag: &str, text: &str, observer: &mut dyn ChangeObserver) -> bool {
        match tag {
            "id" => assign(&mut self.id, coercion::parse_int(text, 0), "id", observer),
            "name" => assign(&mut self.name, Some(text.to_string()), "name", observer),
            "abbreviation" => assign(
                &mut self.abbreviation,
                Some(text.to_string()),
                "abbreviation",
                observer,
            ),
            _ => return false,
        }

        true
    }
}
