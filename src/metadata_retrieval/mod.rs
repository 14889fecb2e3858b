/// Client for TheTVDB XML API.
///
/// This module provides the [`TvDbApi`] trait describing the remote
/// operations (mirrors, languages, series search and the full series
/// archive), the [`TvDbClient`] implementation and the [`Transport`] seam
/// it uses for network access.
mod archive;
mod transport;
mod tvdb;

pub use archive::extract_flat;
pub use transport::{HttpTransport, Transport};
pub use tvdb::TvDbClient;

use crate::model::{Locale, Mirror, ModelError, ShowRecord};
use crate::series_details::SeriesDetails;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while talking to the API.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// A required argument was missing, empty or zero
    #[error("Invalid argument `{parameter}`: {reason}")]
    InvalidArgument {
        parameter: &'static str,
        reason: &'static str,
    },

    /// A request URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The request could not be sent or its body could not be read
    #[error("Request failed: {0}")]
    RequestError(String),

    /// The server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// No known mirror serves XML, banners and archives
    #[error("No mirror serving XML, banners and archives is available")]
    NoCapableMirror,

    /// The series download was not a ZIP archive
    #[error("Expected a ZIP archive but received {}", mime.as_deref().unwrap_or("unknown data"))]
    NotAnArchive { mime: Option<String> },

    /// The ZIP archive could not be read
    #[error("Failed to read archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Writing the archive or one of its entries failed
    #[error("Failed to write {path}: {source}")]
    Extraction {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A response could not be turned into records
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// External identifier used to look up a series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteId {
    /// IMDb id, e.g. "tt1219024"
    Imdb(String),
    /// Zap2it id, e.g. "EP01085588"
    Zap2It(String),
}

impl RemoteId {
    /// The identifier itself
    pub fn value(&self) -> &str {
        match self {
            RemoteId::Imdb(id) | RemoteId::Zap2It(id) => id,
        }
    }
}

/// Remote operations of TheTVDB API.
///
/// `language` defaults to the configured language and `mirror` to the
/// client's default mirror when `None` is passed.
pub trait TvDbApi {
    /// Fetches all mirrors and remembers the first fully capable one
    fn mirrors(&self) -> Result<Vec<Mirror>, RetrievalError>;

    /// Fetches the supported languages, sorted by name
    fn languages(&self, mirror: Option<&Mirror>) -> Result<Vec<Locale>, RetrievalError>;

    /// Searches series by name
    ///
    /// Only series in the requested language are returned.
    fn series_by_name(
        &self,
        name: &str,
        language: Option<&str>,
        mirror: Option<&Mirror>,
    ) -> Result<Vec<ShowRecord>, RetrievalError>;

    /// Looks up series by IMDb or Zap2it id
    fn series_by_remote_id(
        &self,
        remote_id: &RemoteId,
        language: Option<&str>,
        mirror: Option<&Mirror>,
    ) -> Result<Vec<ShowRecord>, RetrievalError>;

    /// Downloads and extracts the full series archive
    fn full_series_by_id(
        &self,
        id: u32,
        language: Option<&str>,
        mirror: Option<&Mirror>,
    ) -> Result<SeriesDetails, RetrievalError>;
}
