//! Resource identifiers
//!
//! Provides [`Uri`], the identifier type used for every cube resource.
//! Equality is exact string equality; no normalization is performed.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Prefix used for blank node identifiers
pub const BLANK_NODE_PREFIX: &str = "_:";

/// An opaque resource identifier (IRI or blank node label)
///
/// Backed by a shared string, so clones are cheap and models built from
/// persistent collections can share identifiers freely.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uri(Arc<str>);

impl Uri {
    /// Create a new identifier
    #[inline]
    #[must_use]
    pub fn new(value: impl Into<Arc<str>>) -> Self {
        Self(value.into())
    }

    /// Borrow the identifier text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this identifies a blank node
    #[inline]
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.starts_with(BLANK_NODE_PREFIX)
    }

    /// Last path or fragment segment, used as a fallback label
    ///
    /// `http://example.org/dim#country` yields `country`; an identifier
    /// without separators is returned whole.
    #[must_use]
    pub fn local_name(&self) -> &str {
        let trimmed = self.0.trim_end_matches(['/', '#']);
        trimmed
            .rfind(['/', '#'])
            .map_or(trimmed, |idx| &trimmed[idx + 1..])
    }
}

impl Display for Uri {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Uri {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Uri {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for Uri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Uri {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Uri {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Uri {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}
