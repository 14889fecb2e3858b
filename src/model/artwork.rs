use super::{ChangeObserver, XmlDeserialize, assign};
use crate::coercion;
use serde::Serialize;
use std::str::FromStr;

/// Kind of artwork, taken from the `<BannerType>` element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtworkKind {
    /// Fan art backdrop
    Fanart,
    /// Poster image
    Poster,
    /// Season image
    Season,
    /// Series banner
    Series,
    /// Missing or unrecognized type
    #[default]
    Unknown,
}

impl FromStr for ArtworkKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fanart" => Ok(ArtworkKind::Fanart),
            "poster" => Ok(ArtworkKind::Poster),
            "season" => Ok(ArtworkKind::Season),
            "series" => Ok(ArtworkKind::Series),
            _ => Err(()),
        }
    }
}

/// An image of a series, parsed from a `<Banner>` element of `banners.xml`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artwork {
    /// Id of the image, -1 when unknown
    pub id: i32,
    /// Relative path of the full-size image
    pub path: Option<String>,
    /// Kind of image
    pub kind: ArtworkKind,
    /// Dimension or sub-type, e.g. "1920x1080" or "season"
    pub dimension: Option<String>,
    /// Raw pipe-delimited color palette, e.g. "|217,177,118|59,40,68|"
    pub colors: Option<String>,
    /// Language abbreviation of the image text
    pub language: Option<String>,
    /// Average rating, -1.0 when unrated
    pub rating: f64,
    /// Number of ratings, -1 when unknown
    pub rating_count: i32,
    /// Whether the series name is printed on the image
    pub includes_series_name: bool,
    /// Relative path of the thumbnail
    pub thumbnail_path: Option<String>,
    /// Relative path of the vignette
    pub vignette_path: Option<String>,
    /// Season the image belongs to, -1 for series-wide images
    pub season: i32,
}

impl Default for Artwork {
    fn default() -> Self {
        Self {
            id: -1,
            path: None,
            kind: ArtworkKind::Unknown,
            dimension: None,
            colors: None,
            language: None,
            rating: -1.0,
            rating_count: -1,
            includes_series_name: false,
            thumbnail_path: None,
            vignette_path: None,
            season: -1,
        }
    }
}

impl XmlDeserialize for Artwork {
    fn apply_field(&mut self, tag: &str, text: &str, observer: &mut dyn ChangeObserver) -> bool {
        match tag {
            "id" => assign(&mut self.id, coercion::parse_int(text, -1), "id", observer),
            "bannerpath" => assign(&mut self.path, Some(text.to_string()), "path", observer),
            "bannertype" => {
                let kind: ArtworkKind = text.parse().unwrap_or_default();
                assign(&mut self.kind, kind, "kind", observer);
            }
            "bannertype2" => assign(&mut self.dimension, Some(text.to_string()), "dimension", observer),
            "colors" => assign(&mut self.colors, Some(text.to_string()), "colors", observer),
            "language" => assign(&mut self.language, Some(text.to_string()), "language", observer),
            "rating" => assign(&mut self.rating, coercion::parse_double(text, -1.0), "rating", observer),
            "ratingcount" => assign(
                &mut self.rating_count,
                coercion::parse_int(text, -1),
                "rating_count",
                observer,
            ),
            "seriesname" => assign(
                &mut self.includes_series_name,
                coercion::parse_bool(text),
                "includes_series_name",
                observer,
            ),
            "thumbnailpath" => assign(
                &mut self.thumbnail_path,
                Some(text.to_string()),
                "thumbnail_path",
                observer,
            ),
            "vignettepath" => assign(
                &mut self.vignette_path,
                Some(text.to_string()),
                "vignette_path",
                observer,
            ),
            "season" => assign(&mut self.season, coercion::parse_int(text, -1), "season", observer),
            _ => return false,
        }

        true
    }
}
