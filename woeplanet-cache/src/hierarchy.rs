//! Upward traversal of the place hierarchy.

use log::warn;
use woeplanet_core::Place;

use crate::{CacheError, GeoplanetCache};

/// Outcome of walking `parent` links from a place towards the root.
///
/// Only [`AncestorSearch::Found`] carries a place. The other variants
/// describe why the walk stopped so callers can report gaps in the data.
#[derive(Debug, Clone, PartialEq)]
pub enum AncestorSearch {
    /// The first place on the path whose placetype matched.
    Found(Place),
    /// The starting WOE ID is not in the cache.
    UnknownStart {
        /// WOE ID the walk started from.
        woeid: u64,
    },
    /// A root was reached without a match.
    NoParent {
        /// WOE ID of the root where the walk stopped.
        last: u64,
    },
    /// A `parent` link points at a place that is not in the cache.
    DanglingParent {
        /// Place holding the broken link.
        child: u64,
        /// Parent WOE ID with no row.
        missing: u64,
    },
}

impl AncestorSearch {
    /// The matched place, discarding the reason for a miss.
    #[must_use]
    pub fn into_place(self) -> Option<Place> {
        match self {
            Self::Found(place) => Some(place),
            Self::UnknownStart { .. } | Self::NoParent { .. } | Self::DanglingParent { .. } => {
                None
            }
        }
    }
}

impl GeoplanetCache {
    /// Walk upwards from `woeid` to the first place of `placetype`,
    /// starting with `woeid` itself.
    ///
    /// Parent chains must be acyclic; a cycle that never reaches a matching
    /// placetype keeps the walk running.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when a place cannot be read. Gaps in the
    /// hierarchy are reported through the returned [`AncestorSearch`].
    pub fn resolve_ancestor(
        &self,
        woeid: u64,
        placetype: u64,
    ) -> Result<AncestorSearch, CacheError> {
        let Some(mut current) = self.get_woeid(woeid)? else {
            return Ok(AncestorSearch::UnknownStart { woeid });
        };
        loop {
            if current.placetype == Some(placetype) {
                return Ok(AncestorSearch::Found(current));
            }
            let parent = match current.parent {
                None | Some(0) => {
                    return Ok(AncestorSearch::NoParent {
                        last: current.woeid,
                    });
                }
                Some(parent) => parent,
            };
            match self.get_woeid(parent)? {
                Some(next) => current = next,
                None => {
                    return Ok(AncestorSearch::DanglingParent {
                        child: current.woeid,
                        missing: parent,
                    });
                }
            }
        }
    }

    /// Like [`GeoplanetCache::resolve_ancestor`], but logs each miss and
    /// reports it as `None`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when a place cannot be read.
    pub fn find_ancestor(&self, woeid: u64, placetype: u64) -> Result<Option<Place>, CacheError> {
        let search = self.resolve_ancestor(woeid, placetype)?;
        match &search {
            AncestorSearch::Found(_) => {}
            AncestorSearch::UnknownStart { .. } => {
                warn!("find_ancestor({woeid}, {placetype}): no place with woeid {woeid}");
            }
            AncestorSearch::NoParent { last } => {
                warn!(
                    "find_ancestor({woeid}, {placetype}): reached root {last} without a match"
                );
            }
            AncestorSearch::DanglingParent { child, missing } => {
                warn!(
                    "find_ancestor({woeid}, {placetype}): parent {missing} of {child} is missing"
                );
            }
        }
        Ok(search.into_place())
    }
}
