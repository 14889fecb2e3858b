use super::{ChangeObserver, assign};
use crate::coercion::{self, DATE_UNSET};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Fields shared by show and episode records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordBase {
    /// TheTVDB id of the record
    pub id: i32,
    /// Display name (series name or episode title)
    pub name: Option<String>,
    /// Language abbreviation of the text fields, e.g. "en"
    pub language: Option<String>,
    /// Plot overview
    pub overview: Option<String>,
    /// First air date, [`DATE_UNSET`] when unknown
    pub first_aired: NaiveDateTime,
    /// IMDb identifier, e.g. "tt1219024"
    pub imdb_id: Option<String>,
}

impl Default for RecordBase {
    fn default() -> Self {
        Self {
            id: 0,
            name: None,
            language: None,
            overview: None,
            first_aired: DATE_UNSET,
            imdb_id: None,
        }
    }
}

impl RecordBase {
    /// Applies one of the shared tags; `name_tag` is the record's own
    /// spelling of the name element ("seriesname" or "episodename").
    pub(super) fn apply_field(
        &mut self,
        tag: &str,
        text: &str,
        name_tag: &str,
        observer: &mut dyn ChangeObserver,
    ) -> bool {
        match tag {
            "id" => assign(&mut self.id, coercion::parse_int(text, 0), "id", observer),
            "language" => assign(&mut self.language, Some(text.to_string()), "language", observer),
            "overview" => assign(&mut self.overview, Some(text.to_string()), "overview", observer),
            "firstaired" => {
                if let Some(date) = coercion::parse_date(text) {
                    assign(&mut self.first_aired, date, "first_aired", observer);
                }
            }
            "imdb_id" => assign(&mut self.imdb_id, Some(text.to_string()), "imdb_id", observer),
            _ if tag == name_tag => assign(&mut self.name, Some(text.to_string()), "name", observer),
            _ => return false,
        }

        true
    }
}
