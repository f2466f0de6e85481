//! Reverse lookup: ordered placeholder values -> generated href.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::core::Href;

/// Ordered placeholder values of one endpoint.
pub type ParamKey = SmallVec<[String; 2]>;

/// Per-spec reverse lookup.
///
/// Stored flat, keyed by the whole value tuple, rather than as one nested
/// map level per placeholder.
#[derive(Debug, Clone)]
pub enum ReverseLookup {
    /// A static path has exactly one href.
    Static(Href),
    Parametric(FxHashMap<ParamKey, Href>),
}

impl ReverseLookup {
    pub fn parametric() -> Self {
        Self::Parametric(FxHashMap::default())
    }

    /// Insert a tuple. Returns the already-stored href if the tuple is taken.
    ///
    /// A static lookup accepts no insertions and reports its own href.
    pub fn insert(&mut self, key: ParamKey, href: Href) -> Result<(), Href> {
        match self {
            Self::Static(existing) => Err(existing.clone()),
            Self::Parametric(map) => match map.get(&key) {
                Some(existing) => Err(existing.clone()),
                None => {
                    map.insert(key, href);
                    Ok(())
                }
            },
        }
    }

    /// Resolve a value tuple. A static lookup only matches an empty tuple.
    pub fn get<S: AsRef<str>>(&self, params: &[S]) -> Option<&Href> {
        match self {
            Self::Static(href) => params.is_empty().then_some(href),
            Self::Parametric(map) => {
                let key: ParamKey = params.iter().map(|p| p.as_ref().to_string()).collect();
                map.get(&key)
            }
        }
    }

    /// Number of resolvable tuples.
    pub fn len(&self) -> usize {
        match self {
            Self::Static(_) => 1,
            Self::Parametric(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
