//! # Resource Targets
//!
//! A target names the page, or set of pages, a permission applies to.
//!
//! | Pattern | Kind | Matches |
//! |---------|------|---------|
//! | `Main` | exact | only `Main` |
//! | `*` | any | every page except group member lists (`...Group`) |
//! | `*Main` | ends with `Main` | `FooMain`, `Main` |
//! | `Main*` | starts with `Mai` | `MainPage`, `Maid`, but never `...Group` |
//!
//! The prefix of a trailing-wildcard pattern drops the `*` and one more
//! character: `Main*` yields the prefix `Mai`. Existing policies depend on
//! this span, so it is preserved.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Suffix of group member list pages. Wildcard grants do not reach them.
pub const GROUP_SUFFIX: &str = "Group";

/// The universal wildcard pattern.
pub const WILDCARD: &str = "*";

/// How a target pattern matches page names, parsed once from its text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// A single page, matched by exact name.
    Exact,
    /// `*`: every page except group member lists.
    Any,
    /// `*<suffix>`: pages whose name ends with the suffix.
    EndsWith(String),
    /// `<literal>*`: pages whose name starts with the derived prefix,
    /// excluding group member lists.
    StartsWith(String),
}

/// An immutable page-name pattern.
///
/// Equality and hashing use the pattern text only.
///
/// # Example
///
/// ```
/// use wiki_permissions::target::ResourceTarget;
///
/// let all = ResourceTarget::parse("*");
/// assert!(all.contains(&ResourceTarget::parse("Main")));
/// assert!(!all.contains(&ResourceTarget::parse("AdminGroup")));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ResourceTarget {
    pattern: String,
    kind: TargetKind,
}

impl ResourceTarget {
    /// Parse a target pattern. Every string is a valid pattern.
    pub fn parse(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let kind = Self::classify(&pattern);
        Self { pattern, kind }
    }

    /// The universal wildcard target `*`.
    pub fn any() -> Self {
        Self::parse(WILDCARD)
    }

    fn classify(pattern: &str) -> TargetKind {
        if pattern == WILDCARD {
            TargetKind::Any
        } else if let Some(suffix) = pattern.strip_prefix('*') {
            TargetKind::EndsWith(suffix.to_string())
        } else if pattern.ends_with('*') {
            // Drops the '*' and the character before it.
            let keep = pattern.chars().count().saturating_sub(2);
            TargetKind::StartsWith(pattern.chars().take(keep).collect())
        } else {
            TargetKind::Exact
        }
    }

    /// The pattern text, verbatim.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// How this pattern matches.
    pub fn kind(&self) -> &TargetKind {
        &self.kind
    }

    /// Check if this pattern contains a wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.kind != TargetKind::Exact
    }

    /// Check if every page matched by `requested` is also matched by this target.
    ///
    /// Rules, first match wins:
    /// 1. identical pattern text;
    /// 2. `*` matches anything not ending in `Group`;
    /// 3. `*<suffix>` matches anything ending in the suffix;
    /// 4. `<literal>*` matches anything starting with the derived prefix and
    ///    not ending in `Group`;
    /// 5. nothing else.
    pub fn contains(&self, requested: &ResourceTarget) -> bool {
        if self.pattern == requested.pattern {
            return true;
        }

        let name = requested.as_str();
        match &self.kind {
            TargetKind::Any => !name.ends_with(GROUP_SUFFIX),
            TargetKind::EndsWith(suffix) => name.ends_with(suffix.as_str()),
            TargetKind::StartsWith(prefix) => {
                !name.ends_with(GROUP_SUFFIX) && name.starts_with(prefix.as_str())
            }
            TargetKind::Exact => false,
        }
    }

    /// Check if this target is a subset of `granted`.
    pub fn is_subset_of(&self, granted: &ResourceTarget) -> bool {
        granted.contains(self)
    }
}

/// Check if the `requested` pattern is a subset of the `granted` pattern.
///
/// # Example
///
/// ```
/// use wiki_permissions::target::is_subset;
///
/// assert!(is_subset("*Main", "FooMain"));
/// assert!(!is_subset("*Main", "MainFoo"));
/// assert!(!is_subset("Main*", "MainGroup"));
/// ```
pub fn is_subset(granted: &str, requested: &str) -> bool {
    ResourceTarget::parse(granted).contains(&ResourceTarget::parse(requested))
}

impl PartialEq for ResourceTarget {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for ResourceTarget {}

impl std::hash::Hash for ResourceTarget {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.pattern.hash(state);
    }
}

impl fmt::Display for ResourceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

impl From<String> for ResourceTarget {
    fn from(pattern: String) -> Self {
        Self::parse(pattern)
    }
}

impl From<&str> for ResourceTarget {
    fn from(pattern: &str) -> Self {
        Self::parse(pattern)
    }
}

impl From<ResourceTarget> for String {
    fn from(target: ResourceTarget) -> Self {
        target.pattern
    }
}
