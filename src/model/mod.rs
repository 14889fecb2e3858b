//! Typed records parsed from TheTVDB XML documents.
//!
//! Every record type implements [`XmlDeserialize`], which walks the child
//! elements of one XML element and assigns the recognized ones to typed
//! fields. Tag names are matched case-insensitively, unknown tags are
//! ignored and empty elements leave the field at its default.
mod artwork;
mod cast_member;
mod episode;
mod locale;
mod mirror;
mod record_base;
mod show;

pub use artwork::{Artwork, ArtworkKind};
pub use cast_member::CastMember;
pub use episode::EpisodeRecord;
pub use locale::Locale;
pub use mirror::{Mirror, MirrorCapabilities};
pub use record_base::RecordBase;
pub use show::ShowRecord;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while turning XML into records.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A required input was absent or empty
    #[error("Invalid argument `{parameter}`: {reason}")]
    InvalidArgument {
        parameter: &'static str,
        reason: &'static str,
    },

    /// The directory holding the series documents does not exist
    #[error("The directory \"{}\" could not be found", path.display())]
    NotFound { path: PathBuf },

    /// A series document could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A document is not well-formed XML
    #[error("Malformed XML in {origin}: {source}")]
    Xml {
        origin: String,
        source: roxmltree::Error,
    },

    /// The series details were released and can no longer be used
    #[error("Series details were released and can no longer be accessed")]
    Released,
}

impl ModelError {
    /// Error for a required `node` argument that was not provided
    pub(crate) fn missing_node() -> Self {
        ModelError::InvalidArgument {
            parameter: "node",
            reason: "Provided node must not be null",
        }
    }
}

/// Minimal view of an XML element needed by the record parsers.
///
/// Any XML library that can enumerate child elements in document order and
/// expose their tag name and text content can back the parsers.
pub trait ElementNode: Sized {
    /// The local tag name of this element
    fn element_name(&self) -> &str;

    /// Concatenated text of all descendant text nodes
    fn inner_text(&self) -> String;

    /// Child elements in document order (text and comments are skipped)
    fn child_elements(&self) -> Vec<Self>;
}

impl<'a, 'input: 'a> ElementNode for roxmltree::Node<'a, 'input> {
    fn element_name(&self) -> &str {
        roxmltree::Node::tag_name(self).name()
    }

    fn inner_text(&self) -> String {
        self.descendants()
            .filter(|node| node.is_text())
            .filter_map(|node| node.text())
            .collect()
    }

    fn child_elements(&self) -> Vec<Self> {
        self.children().filter(|node| node.is_element()).collect()
    }
}

/// Receives the name of every property whose value changed during parsing.
///
/// Assignments that leave a value unchanged are not reported.
pub trait ChangeObserver {
    fn property_changed(&mut self, property: &'static str);
}

impl<F> ChangeObserver for F
where
    F: FnMut(&'static str),
{
    fn property_changed(&mut self, property: &'static str) {
        self(property)
    }
}

/// Observer that discards all change notifications
#[derive(Debug, Clone, Copy, Default)]
pub struct Unobserved;

impl ChangeObserver for Unobserved {
    fn property_changed(&mut self, _property: &'static str) {}
}

/// Writes `value` into `slot` unless it already holds an equal value.
///
/// The observer is notified only when the slot actually changed.
pub(crate) fn assign<T: PartialEq>(
    slot: &mut T,
    value: T,
    property: &'static str,
    observer: &mut dyn ChangeObserver,
) {
    if *slot == value {
        return;
    }

    *slot = value;
    observer.property_changed(property);
}

/// Replaces pipe-delimited list text in `slot` with its display form
pub(crate) fn assign_normalized(
    slot: &mut Option<String>,
    property: &'static str,
    observer: &mut dyn ChangeObserver,
) {
    let normalized = slot.as_deref().and_then(crate::coercion::normalize_list);
    assign(slot, normalized, property, observer);
}

/// Trait for records that can be filled from an XML element.
pub trait XmlDeserialize: Default {
    /// Assigns one child element's text to the matching field.
    ///
    /// `tag` is lowercased and `text` is trimmed and non-empty. Returns
    /// false when the tag does not belong to this record.
    fn apply_field(&mut self, tag: &str, text: &str, observer: &mut dyn ChangeObserver) -> bool;

    /// Hook that runs once all children have been applied
    fn finish(&mut self, _observer: &mut dyn ChangeObserver) {}

    /// Fills this record from `node`, reporting changed properties to `observer`.
    ///
    /// Fields are merged into the existing value: children that are absent
    /// or empty leave the corresponding field untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] when `node` is `None`.
    fn deserialize_observed<N: ElementNode>(
        &mut self,
        node: Option<&N>,
        observer: &mut dyn ChangeObserver,
    ) -> Result<(), ModelError> {
        let node = node.ok_or_else(ModelError::missing_node)?;

        for child in node.child_elements() {
            let tag = child.element_name().to_ascii_lowercase();
            let text = child.inner_text();
            let text = text.trim();

            if text.is_empty() {
                tracing::trace!(tag = %tag, "Skipping empty element");
                continue;
            }

            if !self.apply_field(&tag, text, observer) {
                tracing::trace!(tag = %tag, "Ignoring unrecognized element");
            }
        }

        self.finish(observer);
        Ok(())
    }

    /// Fills this record from `node` without change notifications
    fn deserialize<N: ElementNode>(&mut self, node: Option<&N>) -> Result<(), ModelError> {
        self.deserialize_observed(node, &mut Unobserved)
    }

    /// Creates a new record from `node`
    fn from_node<N: ElementNode>(node: Option<&N>) -> Result<Self, ModelError> {
        let mut record = Self::default();
        record.deserialize(node)?;
        Ok(record)
    }
}

/// Parses an XML document and deserializes every child of its root element
/// whose tag equals `item_tag` (ignoring ASCII case).
///
/// `origin` names the document in error messages.
pub fn parse_document<T: XmlDeserialize>(
    xml: &str,
    item_tag: &str,
    origin: &str,
) -> Result<Vec<T>, ModelError> {
    let document = roxmltree::Document::parse(xml).map_err(|e| ModelError::Xml {
        origin: origin.to_string(),
        source: e,
    })?;

    let mut records = Vec::new();
    for node in document.root_element().child_elements() {
        if node.element_name().eq_ignore_ascii_case(item_tag) {
            records.push(T::from_node(Some(&node))?);
        }
    }

    tracing::debug!(origin, item_tag, count = records.len(), "Parsed XML collection");

    Ok(records)
}
