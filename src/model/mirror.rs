use super::{ChangeObserver, XmlDeserialize, assign};
use crate::coercion;
use serde::Serialize;
use std::cmp::Ordering;

/// The kinds of content a mirror serves, decoded from its type mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct MirrorCapabilities {
    /// Serves XML documents (bit 0)
    pub xml: bool,
    /// Serves banner images (bit 1)
    pub banners: bool,
    /// Serves zipped series archives (bit 2)
    pub zip: bool,
}

impl MirrorCapabilities {
    /// Decodes a type mask; bits above bit 2 are ignored
    pub fn decode(type_mask: i32) -> Self {
        Self {
            xml: type_mask & 0b001 != 0,
            banners: type_mask & 0b010 != 0,
            zip: type_mask & 0b100 != 0,
        }
    }

    /// True when the mirror serves every kind of content
    pub fn is_complete(&self) -> bool {
        self.xml && self.banners && self.zip
    }
}

/// A server mirror, parsed from a `<Mirror>` element of `mirrors.xml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Mirror {
    /// Id of the mirror
    pub id: i32,
    /// Base URL, e.g. "http://thetvdb.com"
    pub address: Option<String>,
    /// Content served by this mirror
    pub capabilities: MirrorCapabilities,
}

impl Mirror {
    /// Creates a mirror for `address` that serves all content types
    pub fn new(id: i32, address: impl Into<String>) -> Self {
        Self {
            id,
            address: Some(address.into()),
            capabilities: MirrorCapabilities::decode(0b111),
        }
    }

    /// Orders mirrors by descending id
    pub fn cmp_by_id(&self, other: &Self) -> Ordering {
        other.id.cmp(&self.id)
    }
}

impl XmlDeserialize for Mirror {
    fn apply_field(&mut self, tag: &str, text: &str, observer: &mut dyn ChangeObserver) -> bool {
        match tag {
            "id" => assign(&mut self.id, coercion::parse_int(text, 0), "id", observer),
            "mirrorpath" => assign(&mut self.address, Some(text.to_string()), "address", observer),
            "typemask" => {
                let capabilities = MirrorCapabilities::decode(coercion::parse_int(text, 0));
                assign(&mut self.capabilities, capabilities, "capabilities", observer);
            }
            _ => return false,
        }

        true
    }
}
