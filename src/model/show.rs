use super::{
    CastMember, ChangeObserver, EpisodeRecord, RecordBase, Unobserved, XmlDeserialize, assign,
    assign_normalized,
};
use crate::coercion::{self, DATE_UNSET};
use chrono::NaiveDateTime;
use serde::Serialize;

/// A TV series, parsed from the `<Series>` element of a series document.
///
/// Episodes and cast are not part of the `<Series>` element itself; they
/// are attached by whoever loads the surrounding documents (see
/// [`crate::SeriesDetails`]). Parsing into an existing record merges
/// fields and keeps both collections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowRecord {
    /// Id, name, language and the other fields every record shares
    #[serde(flatten)]
    pub base: RecordBase,
    /// Relative path of the graphical banner
    pub banner_path: Option<String>,
    /// Zap2it identifier, e.g. "EP01085588"
    pub zap2it_id: Option<String>,
    /// True once at least one episode is attached
    pub has_episodes: bool,
    /// Episodes in document order
    pub episodes: Vec<EpisodeRecord>,
    /// Legacy series id, distinct from `base.id`
    pub show_id: i32,
    /// Actors as comma-separated display text
    pub actors: Option<String>,
    /// Weekday the series airs on, e.g. "Monday"
    pub airs_day_of_week: Option<String>,
    /// Time of day the series airs, as given by the network
    pub airs_time: Option<String>,
    /// Age rating, e.g. "TV-14"
    pub content_rating: Option<String>,
    /// Genres as comma-separated display text
    pub genre: Option<String>,
    /// Network the series airs on
    pub network: Option<String>,
    /// Id of the network
    pub network_id: i32,
    /// Average user rating, -1.0 when unrated
    pub rating: f64,
    /// Number of user votes
    pub rating_count: i32,
    /// Runtime in minutes
    pub runtime: f64,
    /// Airing status, e.g. "Continuing" or "Ended"
    pub status: Option<String>,
    /// When the series was added to the database
    pub added_date: NaiveDateTime,
    /// Id of the user who added the series
    pub added_by_user_id: i32,
    /// Relative path of the fan art image
    pub fanart_path: Option<String>,
    /// Unix timestamp of the last update
    pub last_updated: i64,
    /// Relative path of the poster image
    pub poster_path: Option<String>,
    /// Whether the record is marked for review
    pub review_wanted: bool,
    /// Cast in the order of the cast document
    pub cast: Vec<CastMember>,
}

impl Default for ShowRecord {
    fn default() -> Self {
        Self {
            base: RecordBase::default(),
            banner_path: None,
            zap2it_id: None,
            has_episodes: false,
            episodes: Vec::new(),
            show_id: -1,
            actors: None,
            airs_day_of_week: None,
            airs_time: None,
            content_rating: None,
            genre: None,
            network: None,
            network_id: -1,
            rating: -1.0,
            rating_count: -1,
            runtime: -1.0,
            status: None,
            added_date: DATE_UNSET,
            added_by_user_id: -1,
            fanart_path: None,
            last_updated: -1,
            poster_path: None,
            review_wanted: false,
            cast: Vec::new(),
        }
    }
}

impl ShowRecord {
    /// Appends an episode, keeping insertion order
    ///
    /// `has_episodes` is not touched; call [`ShowRecord::update_has_episodes`]
    /// once all episodes are attached.
    pub fn add_episode(&mut self, episode: EpisodeRecord) {
        self.episodes.push(episode);
    }

    /// Recomputes `has_episodes` from the episode collection
    pub fn update_has_episodes(&mut self) {
        self.has_episodes = !self.episodes.is_empty();
    }

    /// Converts the pipe-delimited actor and genre lists into display text
    pub fn normalize(&mut self) {
        self.normalize_observed(&mut Unobserved);
    }

    fn normalize_observed(&mut self, observer: &mut dyn ChangeObserver) {
        assign_normalized(&mut self.actors, "actors", observer);
        assign_normalized(&mut self.genre, "genre", observer);
    }
}

impl XmlDeserialize for ShowRecord {
    fn apply_field(&mut self, tag: &str, text: &str, observer: &mut dyn ChangeObserver) -> bool {
        if self.base.apply_field(tag, text, "seriesname", observer) {
            return true;
        }

        let owned = || Some(text.to_string());

        match tag {
            "seriesid" => assign(&mut self.show_id, coercion::parse_int(text, -1), "show_id", observer),
            "banner" => assign(&mut self.banner_path, owned(), "banner_path", observer),
            "zap2it_id" => assign(&mut self.zap2it_id, owned(), "zap2it_id", observer),
            "actors" => assign(&mut self.actors, owned(), "actors", observer),
            "airs_dayofweek" => assign(&mut self.airs_day_of_week, owned(), "airs_day_of_week", observer),
            "airs_time" => assign(&mut self.airs_time, owned(), "airs_time", observer),
            "contentrating" => assign(&mut self.content_rating, owned(), "content_rating", observer),
            "genre" => assign(&mut self.genre, owned(), "genre", observer),
            "network" => assign(&mut self.network, owned(), "network", observer),
            "networkid" => assign(
                &mut self.network_id,
                coercion::parse_int(text, -1),
                "network_id",
                observer,
            ),
            "rating" => assign(&mut self.rating, coercion::parse_double(text, -1.0), "rating", observer),
            "ratingcount" => assign(
                &mut self.rating_count,
                coercion::parse_int(text, -1),
                "rating_count",
                observer,
            ),
            "runtime" => assign(&mut self.runtime, coercion::parse_double(text, -1.0), "runtime", observer),
            "status" => assign(&mut self.status, owned(), "status", observer),
            "added" => {
                if let Some(date) = coercion::parse_date(text) {
                    assign(&mut self.added_date, date, "added_date", observer);
                }
            }
            "addedby" => assign(
                &mut self.added_by_user_id,
                coercion::parse_int(text, -1),
                "added_by_user_id",
                observer,
            ),
            "fanart" => assign(&mut self.fanart_path, owned(), "fanart_path", observer),
            "lastupdated" => assign(
                &mut self.last_updated,
                coercion::parse_long(text, -1),
                "last_updated",
                observer,
            ),
            "poster" => assign(&mut self.poster_path, owned(), "poster_path", observer),
            "tms_wanted" => assign(
                &mut self.review_wanted,
                coercion::parse_flag(text),
                "review_wanted",
                observer,
            ),
            _ => return false,
        }

        true
    }

    fn finish(&mut self, observer: &mut dyn ChangeObserver) {
        let has_episodes = !self.episodes.is_empty();
        assign(&mut self.has_episodes, has_episodes, "has_episodes", observer);
        self.normalize_observed(observer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASTLE: &str = "<Series><id>83462</id>\
        <Actors>|Nathan Fillion|Stana Katic|Molly C. Quinn|Jon Huertas|</Actors>\
        <Airs_DayOfWeek>Monday</Airs_DayOfWeek><Airs_Time>10:00 PM</Airs_Time>\
        <ContentRating>TV-PG</ContentRating><FirstAired>2009-03-09</FirstAired>\
        <Genre>|Comedy|Crime|Drama|</Genre><IMDB_ID>tt1219024</IMDB_ID><Language>en</Language>\
        <Network>ABC</Network><NetworkID></NetworkID><Overview>Rick Castle is one of the world's most successful crime authors.</Overview>\
        <Rating>8.8</Rating><RatingCount>346</RatingCount><Runtime>60</Runtime><SeriesID>75394</SeriesID>\
        <SeriesName>Castle (2009)</SeriesName><Status>Continuing</Status><added>2008-10-17 15:05:50</added>\
        <addedBy>3071</addedBy><banner>graphical/83462-g10.jpg</banner><fanart>fanart/original/83462-33.jpg</fanart>\
        <lastupdated>1378896827</lastupdated><poster>posters/83462-6.jpg</poster><tms_wanted>1</tms_wanted>\
        <zap2it_id>EP01085588</zap2it_id></Series>";

    fn parse(xml: &str) -> ShowRecord {
        let document = roxmltree::Document::parse(xml).unwrap();
        ShowRecord::from_node(Some(&document.root_element())).unwrap()
    }

    #[test]
    fn test_deserialize_series() {
        let show = parse(CASTLE);

        assert_eq!(show.base.id, 83462);
        assert_eq!(show.base.name.as_deref(), Some("Castle (2009)"));
        assert_eq!(show.base.language.as_deref(), Some("en"));
        assert_eq!(show.base.imdb_id.as_deref(), Some("tt1219024"));
        assert_eq!(show.base.first_aired.to_string(), "2009-03-09 00:00:00");
        assert_eq!(
            show.actors.as_deref(),
            Some("Nathan Fillion, Stana Katic, Molly C. Quinn, Jon Huertas")
        );
        assert_eq!(show.genre.as_deref(), Some("Comedy, Crime, Drama"));
        assert_eq!(show.airs_day_of_week.as_deref(), Some("Monday"));
        assert_eq!(show.airs_time.as_deref(), Some("10:00 PM"));
        assert_eq!(show.content_rating.as_deref(), Some("TV-PG"));
        assert_eq!(show.network.as_deref(), Some("ABC"));
        assert_eq!(show.network_id, -1);
        assert_eq!(show.rating, 8.8);
        assert_eq!(show.rating_count, 346);
        assert_eq!(show.runtime, 60.0);
        assert_eq!(show.show_id, 75394);
        assert_eq!(show.status.as_deref(), Some("Continuing"));
        assert_eq!(show.added_date.to_string(), "2008-10-17 15:05:50");
        assert_eq!(show.added_by_user_id, 3071);
        assert_eq!(show.banner_path.as_deref(), Some("graphical/83462-g10.jpg"));
        assert_eq!(show.fanart_path.as_deref(), Some("fanart/original/83462-33.jpg"));
        assert_eq!(show.last_updated, 1_378_896_827);
        assert_eq!(show.poster_path.as_deref(), Some("posters/83462-6.jpg"));
        assert!(show.review_wanted);
        assert_eq!(show.zap2it_id.as_deref(), Some("EP01085588"));
        assert!(!show.has_episodes);
        assert!(show.episodes.is_empty());
        assert!(show.cast.is_empty());
    }

    #[test]
    fn test_deserialize_merges_into_existing_record() {
        let document = roxmltree::Document::parse(CASTLE).unwrap();
        let mut show = ShowRecord {
            cast: vec![CastMember::default()],
            ..Default::default()
        };
        show.add_episode(EpisodeRecord::default());

        show.deserialize(Some(&document.root_element())).unwrap();

        assert_eq!(show.cast.len(), 1);
        assert_eq!(show.episodes.len(), 1);
        assert!(show.has_episodes);
        assert_eq!(show.base.id, 83462);
    }

    #[test]
    fn test_update_has_episodes() {
        let mut show = ShowRecord::default();
        show.update_has_episodes();
        assert!(!show.has_episodes);

        show.add_episode(EpisodeRecord::default());
        assert!(!show.has_episodes);
        show.update_has_episodes();
        assert!(show.has_episodes);
    }

    #[test]
    fn test_normalize_handles_plain_and_empty_lists() {
        let mut show = ShowRecord {
            actors: Some("Nathan Fillion".to_string()),
            genre: Some("|".to_string()),
            ..Default::default()
        };
        show.normalize();

        assert_eq!(show.actors.as_deref(), Some("Nathan Fillion"));
        assert_eq!(show.genre, None);
    }

    #[test]
    fn test_observer_sees_normalized_lists() {
        let document = roxmltree::Document::parse("<Series><Genre>|Drama|</Genre></Series>").unwrap();
        let mut changes = Vec::new();
        let mut show = ShowRecord::default();
        show.deserialize_observed(Some(&document.root_element()), &mut |property: &'static str| {
            changes.push(property)
        })
        .unwrap();

        // Raw assignment, then the display form
        assert_eq!(changes, vec!["genre", "genre"]);
        assert_eq!(show.genre.as_deref(), Some("Drama"));
    }

    #[test]
    fn test_deserialize_without_node_fails() {
        let result = ShowRecord::from_node(None::<&roxmltree::Node>);
        match result {
            Err(crate::model::ModelError::InvalidArgument { parameter, .. }) => {
                assert_eq!(parameter, "node")
            }
            other => panic!("expected invalid argument, got {:?}", other),
        }
    }
}
