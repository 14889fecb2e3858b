//! Series details module
//!
//! Loads the three documents of an extracted full-series archive (cast,
//! artwork and the language specific series document) and turns them into
//! typed records on first access.

use crate::model::{
    Artwork, CastMember, ElementNode, EpisodeRecord, ModelError, ShowRecord, XmlDeserialize,
    parse_document,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// File name of the cast document inside a series directory
pub const CAST_FILE: &str = "actors.xml";

/// File name of the artwork document inside a series directory
pub const ARTWORK_FILE: &str = "banners.xml";

/// Raw text of the three series documents, validated as well-formed XML
#[derive(Debug)]
struct Documents {
    cast: String,
    artworks: String,
    show: String,
    show_origin: String,
}

/// Lazily parsed view of one series in one language.
///
/// The documents are read and checked for well-formedness on construction,
/// but parsed into records only when the matching accessor is called for
/// the first time. Parsed values are cached and shared as [`Arc`]s, so
/// repeated calls return the same instance. Every slot is guarded by its
/// own lock; concurrent first accesses parse exactly once.
///
/// After [`SeriesDetails::release`] every accessor fails with
/// [`ModelError::Released`].
///
/// # Examples
///
/// ```no_run
/// use tvdb_client::SeriesDetails;
///
/// let details = SeriesDetails::new("/tmp/castle", "en")?;
/// let show = details.show()?;
/// println!("{} has {} episodes", show.base.name.as_deref().unwrap_or("?"), show.episodes.len());
/// # Ok::<(), tvdb_client::ModelError>(())
/// ```
#[derive(Debug)]
pub struct SeriesDetails {
    directory: PathBuf,
    language: Option<String>,
    documents: Option<Documents>,
    cast: Mutex<Option<Arc<Vec<CastMember>>>>,
    artworks: Mutex<Option<Arc<Vec<Artwork>>>>,
    show: Mutex<Option<Arc<ShowRecord>>>,
}

/// Reads `file_name` from `directory` and checks that it is well-formed XML
fn read_document(directory: &Path, file_name: &str) -> Result<String, ModelError> {
    let path = directory.join(file_name);
    let text = fs::read_to_string(&path).map_err(|e| ModelError::Io {
        path: path.clone(),
        source: e,
    })?;

    roxmltree::Document::parse(&text).map_err(|e| ModelError::Xml {
        origin: file_name.to_string(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), bytes = text.len(), "Opened series document");

    Ok(text)
}

impl SeriesDetails {
    /// Opens the series documents in `directory` for `language`
    ///
    /// The directory must contain `actors.xml`, `banners.xml` and
    /// `{language}.xml`.
    ///
    /// # Errors
    ///
    /// * [`ModelError::NotFound`] if `directory` does not exist
    /// * [`ModelError::InvalidArgument`] if `language` is empty
    /// * [`ModelError::Io`] if one of the documents cannot be read
    /// * [`ModelError::Xml`] if one of the documents is not well-formed
    pub fn new(directory: impl AsRef<Path>, language: &str) -> Result<Self, ModelError> {
        let directory = directory.as_ref();

        if !directory.is_dir() {
            return Err(ModelError::NotFound {
                path: directory.to_path_buf(),
            });
        }

        if language.trim().is_empty() {
            return Err(ModelError::InvalidArgument {
                parameter: "language",
                reason: "Language must not be empty",
            });
        }

        let show_origin = format!("{}.xml", language);
        let documents = Documents {
            cast: read_document(directory, CAST_FILE)?,
            artworks: read_document(directory, ARTWORK_FILE)?,
            show: read_document(directory, &show_origin)?,
            show_origin,
        };

        Ok(Self {
            directory: directory.to_path_buf(),
            language: Some(language.to_string()),
            documents: Some(documents),
            cast: Mutex::new(None),
            artworks: Mutex::new(None),
            show: Mutex::new(None),
        })
    }

    /// Directory the documents were read from
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Language of the series document, `None` once released
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// True once [`SeriesDetails::release`] has been called
    pub fn is_released(&self) -> bool {
        self.documents.is_none()
    }

    fn documents(&self) -> Result<&Documents, ModelError> {
        self.documents.as_ref().ok_or(ModelError::Released)
    }

    /// Cast of the series, in document order
    pub fn cast(&self) -> Result<Arc<Vec<CastMember>>, ModelError> {
        let documents = self.documents()?;
        let mut slot = self.cast.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(cast) = slot.as_ref() {
            tracing::trace!("Reusing cached cast list");
            return Ok(Arc::clone(cast));
        }

        let cast = Arc::new(parse_document::<CastMember>(&documents.cast, "Actor", CAST_FILE)?);
        tracing::debug!(count = cast.len(), "Parsed cast list");
        *slot = Some(Arc::clone(&cast));

        Ok(cast)
    }

    /// Banners, posters and fan art of the series, in document order
    pub fn artworks(&self) -> Result<Arc<Vec<Artwork>>, ModelError> {
        let documents = self.documents()?;
        let mut slot = self.artworks.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(artworks) = slot.as_ref() {
            tracing::trace!("Reusing cached artwork list");
            return Ok(Arc::clone(artworks));
        }

        let artworks = Arc::new(parse_document::<Artwork>(&documents.artworks, "Banner", ARTWORK_FILE)?);
        tracing::debug!(count = artworks.len(), "Parsed artwork list");
        *slot = Some(Arc::clone(&artworks));

        Ok(artworks)
    }

    /// The series record with its cast and all episodes attached
    ///
    /// Loads the cast list first if that has not happened yet.
    pub fn show(&self) -> Result<Arc<ShowRecord>, ModelError> {
        let documents = self.documents()?;
        let mut slot = self.show.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(show) = slot.as_ref() {
            tracing::trace!("Reusing cached series record");
            return Ok(Arc::clone(show));
        }

        let mut show = ShowRecord {
            cast: self.cast()?.as_ref().clone(),
            ..Default::default()
        };

        let document = roxmltree::Document::parse(&documents.show).map_err(|e| ModelError::Xml {
            origin: documents.show_origin.clone(),
            source: e,
        })?;

        for node in document.root_element().child_elements() {
            let tag = node.element_name();

            if tag.eq_ignore_ascii_case("Episode") {
                show.add_episode(EpisodeRecord::from_node(Some(&node))?);
            } else if tag.eq_ignore_ascii_case("Series") {
                show.deserialize(Some(&node))?;
            }
        }

        show.update_has_episodes();
        tracing::debug!(
            id = show.base.id,
            episodes = show.episodes.len(),
            cast = show.cast.len(),
            "Parsed series record"
        );

        let show = Arc::new(show);
        *slot = Some(Arc::clone(&show));

        Ok(show)
    }

    /// Drops all documents and cached records
    ///
    /// The instance cannot be used afterwards. Calling this again is a no-op.
    pub fn release(&mut self) {
        if self.is_released() {
            return;
        }

        self.documents = None;
        self.language = None;
        *self.cast.get_mut().unwrap_or_else(PoisonError::into_inner) = None;
        *self.artworks.get_mut().unwrap_or_else(PoisonError::into_inner) = None;
        *self.show.get_mut().unwrap_or_else(PoisonError::into_inner) = None;

        tracing::debug!(directory = %self.directory.display(), "Released series details");
    }
}
