use super::{ChangeObserver, RecordBase, Unobserved, XmlDeserialize, assign, assign_normalized};
use crate::coercion::{self, DATE_UNSET};
use chrono::NaiveDateTime;
use serde::Serialize;

/// A single episode, parsed from an `<Episode>` element of the series document.
///
/// Numeric fields that are absent hold -1 (or -1.0); dates hold
/// [`DATE_UNSET`]. The review fields are only filled by the full series
/// archive, the airs-before/after fields only for specials.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeRecord {
    /// Id, name, language and the other fields every record shares
    #[serde(flatten)]
    pub base: RecordBase,
    /// Episode number in combined (aired and DVD) ordering
    pub combined_episode_number: f64,
    /// Season in combined ordering
    pub combined_season: i32,
    /// Chapter on the DVD
    pub dvd_chapter: i32,
    /// Id of the DVD disc
    pub dvd_disc_id: i32,
    /// Episode number in DVD ordering
    pub dvd_episode_number: f64,
    /// Season in DVD ordering
    pub dvd_season: i32,
    /// Director of the episode
    pub director: Option<String>,
    /// Image quality flag of the episode thumbnail
    pub image_flag: i32,
    /// Episode number within its season
    pub number: i32,
    /// Guest stars as comma-separated display text
    pub guest_stars: Option<String>,
    /// Production code assigned by the studio
    pub production_code: Option<String>,
    /// Average user rating, -1.0 when unrated
    pub rating: f64,
    /// Number of user votes
    pub rating_count: i32,
    /// Season the episode belongs to, 0 for specials
    pub season_number: i32,
    /// Writers as comma-separated display text
    pub writer: Option<String>,
    /// Episode number counted across all seasons
    pub absolute_number: i32,
    /// Relative path of the episode thumbnail
    pub picture_filename: Option<String>,
    /// Unix timestamp of the last update
    pub last_updated: i64,
    /// Id of the season record
    pub season_id: i32,
    /// Id of the series the episode belongs to
    pub series_id: i32,
    /// When the thumbnail was added
    pub thumb_added: NaiveDateTime,
    /// Thumbnail height in pixels
    pub thumb_height: i32,
    /// Thumbnail width in pixels
    pub thumb_width: i32,
    /// Exported to the TMS listings feed
    pub is_export: bool,
    /// Thumbnail flagged as blurry during review
    pub is_review_blurry: bool,
    /// Thumbnail flagged as too dark during review
    pub is_review_dark: bool,
    /// Reviewer was unsure about the thumbnail
    pub is_review_unsure: bool,
    /// Id of the reviewing user
    pub review_by_id: i32,
    /// When the review happened
    pub review_date: NaiveDateTime,
    /// Id of the logo check performed by the reviewer
    pub review_logo_id: i32,
    /// Other review remarks as a numeric code
    pub review_other: i32,
    /// For specials: season after which the special airs
    pub airs_after_season: i32,
    /// For specials: episode before which the special airs
    pub airs_before_episode: i32,
    /// For specials: season before which the special airs
    pub airs_before_season: i32,
}

impl Default for EpisodeRecord {
    fn default() -> Self {
        Self {
            base: RecordBase::default(),
            combined_episode_number: -1.0,
            combined_season: -1,
            dvd_chapter: -1,
            dvd_disc_id: -1,
            dvd_episode_number: -1.0,
            dvd_season: -1,
            director: None,
            image_flag: -1,
            number: -1,
            guest_stars: None,
            production_code: None,
            rating: -1.0,
            rating_count: -1,
            season_number: -1,
            writer: None,
            absolute_number: -1,
            picture_filename: None,
            last_updated: -1,
            season_id: -1,
            series_id: -1,
            thumb_added: DATE_UNSET,
            thumb_height: -1,
            thumb_width: -1,
            is_export: false,
            is_review_blurry: false,
            is_review_dark: false,
            is_review_unsure: false,
            review_by_id: -1,
            review_date: DATE_UNSET,
            review_logo_id: -1,
            review_other: -1,
            airs_after_season: -1,
            airs_before_episode: -1,
            airs_before_season: -1,
        }
    }
}

impl EpisodeRecord {
    /// Converts the pipe-delimited guest star and writer lists into display text
    pub fn normalize(&mut self) {
        self.normalize_observed(&mut Unobserved);
    }

    fn normalize_observed(&mut self, observer: &mut dyn ChangeObserver) {
        assign_normalized(&mut self.guest_stars, "guest_stars", observer);
        assign_normalized(&mut self.writer, "writer", observer);
    }
}

impl XmlDeserialize for EpisodeRecord {
    fn apply_field(&mut self, tag: &str, text: &str, observer: &mut dyn ChangeObserver) -> bool {
        if self.base.apply_field(tag, text, "episodename", observer) {
            return true;
        }

        let int = |sentinel| coercion::parse_int(text, sentinel);
        let owned = || Some(text.to_string());

        match tag {
            "combined_episodenumber" => assign(
                &mut self.combined_episode_number,
                coercion::parse_double(text, -1.0),
                "combined_episode_number",
                observer,
            ),
            "combined_season" => assign(&mut self.combined_season, int(-1), "combined_season", observer),
            "dvd_chapter" => assign(&mut self.dvd_chapter, int(-1), "dvd_chapter", observer),
            "dvd_discid" => assign(&mut self.dvd_disc_id, int(-1), "dvd_disc_id", observer),
            "dvd_episodenumber" => assign(
                &mut self.dvd_episode_number,
                coercion::parse_double(text, -1.0),
                "dvd_episode_number",
                observer,
            ),
            "dvd_season" => assign(&mut self.dvd_season, int(-1), "dvd_season", observer),
            "director" => assign(&mut self.director, owned(), "director", observer),
            "epimgflag" => assign(&mut self.image_flag, int(-1), "image_flag", observer),
            "episodenumber" => assign(&mut self.number, int(-1), "number", observer),
            "gueststars" => assign(&mut self.guest_stars, owned(), "guest_stars", observer),
            "productioncode" => assign(&mut self.production_code, owned(), "production_code", observer),
            "rating" => assign(&mut self.rating, coercion::parse_double(text, -1.0), "rating", observer),
            "ratingcount" => assign(&mut self.rating_count, int(-1), "rating_count", observer),
            "seasonnumber" => assign(&mut self.season_number, int(-1), "season_number", observer),
            "writer" => assign(&mut self.writer, owned(), "writer", observer),
            "absolute_number" => assign(&mut self.absolute_number, int(-1), "absolute_number", observer),
            "filename" => assign(&mut self.picture_filename, owned(), "picture_filename", observer),
            "lastupdated" => assign(
                &mut self.last_updated,
                coercion::parse_long(text, -1),
                "last_updated",
                observer,
            ),
            "seasonid" => assign(&mut self.season_id, int(-1), "season_id", observer),
            "seriesid" => assign(&mut self.series_id, int(-1), "series_id", observer),
            "thumb_added" => {
                if let Some(date) = coercion::parse_date(text) {
                    assign(&mut self.thumb_added, date, "thumb_added", observer);
                }
            }
            "thumb_height" => assign(&mut self.thumb_height, int(-1), "thumb_height", observer),
            "thumb_width" => assign(&mut self.thumb_width, int(-1), "thumb_width", observer),
            "tms_export" => assign(&mut self.is_export, coercion::parse_flag(text), "is_export", observer),
            "tms_review_blurry" => assign(
                &mut self.is_review_blurry,
                coercion::parse_flag(text),
                "is_review_blurry",
                observer,
            ),
            "tms_review_dark" => assign(
                &mut self.is_review_dark,
                coercion::parse_flag(text),
                "is_review_dark",
                observer,
            ),
            "tms_review_unsure" => assign(
                &mut self.is_review_unsure,
                coercion::parse_flag(text),
                "is_review_unsure",
                observer,
            ),
            "tms_review_by" => assign(&mut self.review_by_id, int(-1), "review_by_id", observer),
            "tms_review_date" => {
                if let Some(date) = coercion::parse_date(text) {
                    assign(&mut self.review_date, date, "review_date", observer);
                }
            }
            "tms_review_logo" => assign(&mut self.review_logo_id, int(-1), "review_logo_id", observer),
            "tms_review_other" => assign(&mut self.review_other, int(-1), "review_other", observer),
            "airsafter_season" => assign(&mut self.airs_after_season, int(-1), "airs_after_season", observer),
            "airsbefore_episode" => assign(
                &mut self.airs_before_episode,
                int(-1),
                "airs_before_episode",
                observer,
            ),
            "airsbefore_season" => assign(&mut self.airs_before_season, int(-1), "airs_before_season", observer),
            _ => return false,
        }

        true
    }

    fn finish(&mut self, observer: &mut dyn ChangeObserver) {
        self.normalize_observed(observer);
    }
}
