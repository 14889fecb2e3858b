//! tvdb_client - Read series metadata from TheTVDB XML API
//!
//! This library parses TheTVDB's XML documents into typed records and
//! provides a small client that resolves a mirror, searches series and
//! downloads the full series archive (series record, episodes, cast and
//! artwork) for a language.
//!
//! # Examples
//!
//! ```no_run
//! use tvdb_client::{ClientConfig, TvDbApi, TvDbClient};
//!
//! let config = ClientConfig {
//!     api_key: "0123456789ABCDEF".to_string(),
//!     ..Default::default()
//! };
//! let client = TvDbClient::new(config)?;
//!
//! let details = client.full_series_by_id(83462, Some("en"), None)?;
//! for episode in &details.show()?.episodes {
//!     println!("S{:02}E{:02} {}", episode.season_number, episode.number,
//!         episode.base.name.as_deref().unwrap_or_default());
//! }
//! # Ok::<(), tvdb_client::TvDbError>(())
//! ```

pub mod coercion;
mod config;
mod metadata_retrieval;
mod mirror_cache;
pub mod model;
mod series_details;
mod temp;

pub use config::{API_KEY_ENV, ClientConfig, ConfigError};
pub use metadata_retrieval::{
    HttpTransport, RemoteId, RetrievalError, Transport, TvDbApi, TvDbClient, extract_flat,
};
pub use mirror_cache::MirrorCache;
pub use model::{
    Artwork, ArtworkKind, CastMember, ChangeObserver, ElementNode, EpisodeRecord, Locale, Mirror,
    MirrorCapabilities, ModelError, RecordBase, ShowRecord, Unobserved, XmlDeserialize,
};
pub use series_details::{ARTWORK_FILE, CAST_FILE, SeriesDetails};

use std::path::PathBuf;
use thiserror::Error;

/// Progress event emitted while loading a full series
///
/// These events allow library users to track progress and provide feedback
/// during downloads, see [`TvDbClient::full_series_with_progress`].
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Looking up the mirror to download from
    ResolvingMirror,

    /// Mirror selected
    MirrorResolved { address: String },

    /// Downloading the series archive
    DownloadingArchive { series_id: u32, language: String },

    /// Archive downloaded
    ArchiveDownloaded { bytes: usize },

    /// Extracting the archive
    ExtractingArchive { destination: PathBuf },

    /// Series documents opened
    Loaded { series_id: u32, directory: PathBuf },
}

/// Top-level error type for tvdb_client operations
#[derive(Debug, Error)]
pub enum TvDbError {
    /// Error while parsing documents
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Error while talking to the API
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    /// Error while loading or saving the configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
