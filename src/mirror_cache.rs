//! Default mirror memoization
//!
//! The first mirror list fetched in a session decides the default mirror
//! for every later request that does not name one.

use crate::model::Mirror;

/// Remembers the first fully capable mirror seen by a client.
///
/// Once a default is chosen it is kept for the lifetime of the cache. There
/// is no staleness handling: if the remembered mirror becomes unreachable,
/// requests keep going to it until a new cache (usually a new client) is
/// created or [`MirrorCache::clear`] is called.
#[derive(Debug, Clone, Default)]
pub struct MirrorCache {
    default: Option<Mirror>,
}

impl MirrorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The remembered default mirror, if any
    pub fn default_mirror(&self) -> Option<&Mirror> {
        self.default.as_ref()
    }

    /// Scans `mirrors` for the first one serving XML, banners and archives
    ///
    /// Does nothing when a default is already remembered. Returns the
    /// default after the scan.
    pub fn remember(&mut self, mirrors: &[Mirror]) -> Option<&Mirror> {
        if self.default.is_none() {
            match mirrors.iter().find(|mirror| mirror.capabilities.is_complete()) {
                Some(mirror) => {
                    tracing::debug!(
                        id = mirror.id,
                        address = mirror.address.as_deref().unwrap_or_default(),
                        "Selected default mirror"
                    );
                    self.default = Some(mirror.clone());
                }
                None => {
                    tracing::warn!(count = mirrors.len(), "No mirror serves all content types");
                }
            }
        }

        self.default.as_ref()
    }

    /// Forgets the remembered default
    pub fn clear(&mut self) {
        self.default = None;
    }
}
