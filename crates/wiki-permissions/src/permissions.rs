//! # Permissions
//!
//! A page permission combines a target pattern with a set of actions.
//! One permission implies another when its actions (expanded over the action
//! hierarchy) cover the other's, and its target covers the other's target.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::actions::{Action, ActionMask};
use crate::config::GrantConfig;
use crate::error::{PermissionError, PermissionResult};
use crate::target::ResourceTarget;

/// `comment` on every page.
pub static COMMENT_ALL: LazyLock<Permission> =
    LazyLock::new(|| Permission::whole(Action::Comment));
/// `delete` on every page.
pub static DELETE_ALL: LazyLock<Permission> =
    LazyLock::new(|| Permission::whole(Action::Delete));
/// `edit` on every page.
pub static EDIT_ALL: LazyLock<Permission> =
    LazyLock::new(|| Permission::whole(Action::Edit));
/// `rename` on every page.
pub static RENAME_ALL: LazyLock<Permission> =
    LazyLock::new(|| Permission::whole(Action::Rename));
/// `upload` on every page.
pub static UPLOAD_ALL: LazyLock<Permission> =
    LazyLock::new(|| Permission::whole(Action::Upload));
/// `view` on every page.
pub static VIEW_ALL: LazyLock<Permission> =
    LazyLock::new(|| Permission::whole(Action::View));

/// Something with a page name, such as a wiki page loaded by the caller.
pub trait NamedResource {
    /// The resource name used as a permission target.
    fn name(&self) -> &str;
}

/// A permission to perform actions on a page or a set of pages.
///
/// Equality compares the action mask and the exact target text: `Main*` and
/// `Mai*` are different permissions even though they match the same pages.
/// The hash covers only the actions, so permissions with equal actions and
/// different targets share a bucket.
///
/// # Example
///
/// ```
/// use wiki_permissions::permissions::Permission;
///
/// let granted = Permission::new("Main*", "edit").unwrap();
/// let requested = Permission::new("MainPage", "view").unwrap();
/// assert!(granted.implies(&requested));
/// assert!(!requested.implies(&granted));
///
/// assert_eq!(Permission::new("Main", "view,Edit").unwrap().actions(), "edit,view");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "GrantConfig", into = "GrantConfig")]
pub struct Permission {
    target: ResourceTarget,
    mask: ActionMask,
    actions: String,
}

impl Permission {
    /// Create a permission from a target pattern and a comma-separated action list.
    ///
    /// The target is stored verbatim. The action list must be non-empty and
    /// contain only known actions.
    ///
    /// # Example
    ///
    /// ```
    /// use wiki_permissions::permissions::Permission;
    ///
    /// assert!(Permission::new("Main", "view").is_ok());
    /// assert!(Permission::new("Main", "fly").is_err());
    /// assert!(Permission::new("Main", "").is_err());
    /// ```
    pub fn new(target: impl Into<String>, actions: &str) -> PermissionResult<Self> {
        let mask = ActionMask::parse(actions)?;
        Ok(Self::from_mask(ResourceTarget::parse(target), mask))
    }

    /// Create a permission for every page (`*`).
    pub fn all(actions: &str) -> PermissionResult<Self> {
        Self::new(crate::target::WILDCARD, actions)
    }

    /// Create a permission for a single named resource.
    pub fn for_resource<R>(resource: &R, actions: &str) -> PermissionResult<Self>
    where
        R: NamedResource + ?Sized,
    {
        Self::new(resource.name(), actions)
    }

    /// The shared whole-site permission for a single action.
    ///
    /// # Example
    ///
    /// ```
    /// use wiki_permissions::{Action, Permission};
    ///
    /// let edit_all = Permission::all_for(Action::Edit);
    /// assert_eq!(edit_all.pattern(), "*");
    /// assert_eq!(edit_all.actions(), "edit");
    /// ```
    pub fn all_for(action: Action) -> &'static Permission {
        match action {
            Action::Comment => &*COMMENT_ALL,
            Action::Delete => &*DELETE_ALL,
            Action::Edit => &*EDIT_ALL,
            Action::Rename => &*RENAME_ALL,
            Action::Upload => &*UPLOAD_ALL,
            Action::View => &*VIEW_ALL,
        }
    }

    fn whole(action: Action) -> Self {
        Self::from_mask(ResourceTarget::any(), action.mask())
    }

    fn from_mask(target: ResourceTarget, mask: ActionMask) -> Self {
        Self {
            target,
            mask,
            actions: mask.canonical(),
        }
    }

    /// The target pattern.
    pub fn target(&self) -> &ResourceTarget {
        &self.target
    }

    /// The target pattern text.
    pub fn pattern(&self) -> &str {
        self.target.as_str()
    }

    /// The granted actions, as given (not expanded).
    pub fn mask(&self) -> ActionMask {
        self.mask
    }

    /// Canonical action list: lower case, sorted, comma-joined.
    pub fn actions(&self) -> &str {
        &self.actions
    }

    /// All actions this permission grants once the hierarchy is applied.
    pub fn implied_mask(&self) -> ActionMask {
        self.mask.expand()
    }

    /// Check if this permission implies another.
    ///
    /// Two conditions must hold:
    /// 1. every requested action is granted, directly or through the action
    ///    hierarchy (checked first; the target is not examined on failure);
    /// 2. the requested target is a subset of this permission's target.
    ///
    /// Never fails.
    pub fn implies(&self, requested: &Permission) -> bool {
        self.mask.covers(requested.mask) && self.target.contains(&requested.target)
    }
}

impl PartialEq for Permission {
    fn eq(&self, other: &Self) -> bool {
        self.mask == other.mask && self.target == other.target
    }
}

impl Eq for Permission {}

impl Hash for Permission {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.mask.bits().hash(state);
        self.actions.hash(state);
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Permission({:?}, {:?})", self.target.as_str(), self.actions)
    }
}

impl TryFrom<GrantConfig> for Permission {
    type Error = PermissionError;

    fn try_from(grant: GrantConfig) -> Result<Self, Self::Error> {
        Self::new(grant.target, &grant.actions)
    }
}

impl From<Permission> for GrantConfig {
    fn from(permission: Permission) -> Self {
        GrantConfig {
            target: permission.target.into(),
            actions: permission.actions,
        }
    }
}

/// A set of granted permissions.
///
/// The set implies a requested permission when any member does.
///
/// # Example
///
/// ```
/// use wiki_permissions::permissions::{Permission, PermissionSet};
///
/// let set = PermissionSet::from_grants(&[("*", "view"), ("Sandbox*", "edit")]).unwrap();
///
/// assert!(set.implies(&Permission::new("Main", "view").unwrap()));
/// assert!(set.implies(&Permission::new("SandboxTest", "upload").unwrap()));
/// assert!(!set.implies(&Permission::new("Main", "edit").unwrap()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet {
    permissions: HashSet<Permission>,
}

impl PermissionSet {
    /// Create a new empty permission set.
    pub fn new() -> Self {
        Self {
            permissions: HashSet::new(),
        }
    }

    /// Build a set from `(target, actions)` pairs.
    ///
    /// Fails on the first malformed action list.
    pub fn from_grants(grants: &[(&str, &str)]) -> PermissionResult<Self> {
        grants
            .iter()
            .map(|(target, actions)| Permission::new(*target, actions))
            .collect()
    }

    /// Add a permission to the set.
    ///
    /// # Returns
    ///
    /// `true` if the permission was not already present
    pub fn add(&mut self, permission: Permission) -> bool {
        self.permissions.insert(permission)
    }

    /// Add multiple permissions to the set.
    pub fn add_all<I>(&mut self, permissions: I)
    where
        I: IntoIterator<Item = Permission>,
    {
        self.permissions.extend(permissions);
    }

    /// Remove a permission from the set.
    ///
    /// # Returns
    ///
    /// `true` if the permission was present, `false` otherwise
    pub fn remove(&mut self, permission: &Permission) -> bool {
        self.permissions.remove(permission)
    }

    /// Check if the set holds exactly this permission.
    pub fn contains(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
    }

    /// Check if any permission in the set implies the requested one.
    pub fn implies(&self, requested: &Permission) -> bool {
        let granted = self.permissions.iter().any(|p| p.implies(requested));
        tracing::trace!(
            target_pattern = %requested.pattern(),
            actions = %requested.actions(),
            granted,
            "Permission check"
        );
        granted
    }

    /// Check if every permission in `other` is implied by this set.
    pub fn implies_all(&self, other: &PermissionSet) -> bool {
        other.iter().all(|perm| self.implies(perm))
    }

    /// Check if at least one permission in `other` is implied by this set.
    pub fn implies_any(&self, other: &PermissionSet) -> bool {
        other.iter().any(|perm| self.implies(perm))
    }

    /// Iterate the permissions in the set.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.iter()
    }

    /// Merge another permission set into this one.
    pub fn merge(&mut self, other: &PermissionSet) {
        self.permissions.extend(other.permissions.iter().cloned());
    }

    /// Get the count of permissions.
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Clear all permissions.
    pub fn clear(&mut self) {
        self.permissions.clear();
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self {
            permissions: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PermissionSet {
    type Item = &'a Permission;
    type IntoIter = std::collections::hash_set::Iter<'a, Permission>;

    fn into_iter(self) -> Self::IntoIter {
        self.permissions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn perm(target: &str, actions: &str) -> Permission {
        Permission::new(target, actions).unwrap()
    }

    fn hash_of(p: &Permission) -> u64 {
        let mut hasher = DefaultHasher::new();
        p.hash(&mut hasher);
        hasher.finish()
    }

    struct Page(&'static str);

    impl NamedResource for Page {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_permission_creation() {
        let p = perm("Main", "Edit,VIEW");
        assert_eq!(p.pattern(), "Main");
        assert_eq!(p.mask(), ActionMask::EDIT | ActionMask::VIEW);
        assert_eq!(p.actions(), "edit,view");
    }

    #[test]
    fn test_permission_invalid_actions() {
        assert_eq!(
            Permission::new("Main", "fly"),
            Err(PermissionError::UnrecognizedAction("fly".to_string()))
        );
        assert_eq!(Permission::new("Main", ""), Err(PermissionError::BlankActions));
    }

    #[test]
    fn test_permission_all() {
        let p = Permission::all("view").unwrap();
        assert_eq!(p.pattern(), "*");
        assert_eq!(&p, &*VIEW_ALL);
    }

    #[test]
    fn test_permission_for_resource() {
        let p = Permission::for_resource(&Page("Main"), "comment").unwrap();
        assert_eq!(p, perm("Main", "comment"));
    }

    #[test]
    fn test_all_for_singletons() {
        for action in Action::ALL {
            let p = Permission::all_for(action);
            assert_eq!(p.pattern(), "*");
            assert_eq!(p.mask(), action.mask());
            assert_eq!(p.actions(), action.as_str());
        }
        assert!(std::ptr::eq(
            Permission::all_for(Action::Edit),
            Permission::all_for(Action::Edit)
        ));
    }

    #[test]
    fn test_equality_is_order_independent() {
        let a = perm("Main", "edit,view");
        let b = perm("Main", "view,edit");
        assert_eq!(a, b);
        assert_eq!(a.actions(), "edit,view");
        assert_eq!(b.actions(), "edit,view");
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_equality_uses_target_text() {
        assert_ne!(perm("Main*", "view"), perm("Mai*", "view"));
        assert_ne!(perm("Main", "view"), perm("Main", "edit"));
        // Duplicates collapse onto the same bit.
        assert_eq!(perm("Main", "view,view"), perm("Main", "view"));
    }

    #[test]
    fn test_hash_ignores_target() {
        assert_eq!(hash_of(&perm("Main", "edit")), hash_of(&perm("Other", "edit")));
    }

    #[test]
    fn test_implies_actions() {
        let delete = perm("Main", "delete");
        let view = perm("Main", "view");
        assert!(delete.implies(&view));
        assert!(!view.implies(&delete));

        let edit = perm("Main", "edit");
        assert!(edit.implies(&perm("Main", "comment,upload,view")));
        assert!(!edit.implies(&perm("Main", "rename")));
        assert!(!edit.implies(&perm("Main", "view,delete")));
    }

    #[test]
    fn test_implies_targets() {
        assert!(EDIT_ALL.implies(&perm("Main", "view")));
        assert!(!EDIT_ALL.implies(&perm("AdminGroup", "view")));
        assert!(perm("*Group", "view").implies(&perm("AdminGroup", "view")));
        assert!(perm("Main*", "edit").implies(&perm("MainPage", "edit")));
        assert!(!perm("Main*", "edit").implies(&perm("MainGroup", "edit")));
        assert!(!perm("Main", "delete").implies(&perm("Other", "view")));
    }

    #[test]
    fn test_implies_short_circuits_on_actions() {
        // Same target, insufficient actions.
        assert!(!perm("Main", "view").implies(&perm("Main", "edit")));
    }

    #[test]
    fn test_implies_reflexive() {
        for target in ["Main", "*", "*Main", "Main*", "AdminGroup", ""] {
            let p = perm(target, "comment,upload");
            assert!(p.implies(&p), "{p} should imply itself");
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            perm("Main", "view,edit").to_string(),
            "Permission(\"Main\", \"edit,view\")"
        );
    }

    #[test]
    fn test_permission_set() {
        let mut set = PermissionSet::new();
        assert!(set.add(perm("*", "view")));
        assert!(set.add(perm("Sandbox*", "edit")));
        assert!(!set.add(perm("*", "view")));
        assert_eq!(set.len(), 2);

        assert!(set.implies(&perm("Main", "view")));
        assert!(set.implies(&perm("SandboxTest", "comment")));
        assert!(!set.implies(&perm("Main", "edit")));
        assert!(!set.implies(&perm("AdminGroup", "view")));
    }

    #[test]
    fn test_permission_set_same_actions_different_targets() {
        let set: PermissionSet = [perm("Main", "edit"), perm("Other", "edit")]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&perm("Other", "edit")));
    }

    #[test]
    fn test_permission_set_remove() {
        let mut set = PermissionSet::from_grants(&[("Main", "view")]).unwrap();
        assert!(set.remove(&perm("Main", "view")));
        assert!(set.is_empty());
        assert!(!set.implies(&perm("Main", "view")));
    }

    #[test]
    fn test_permission_set_from_grants_fails_fast() {
        let err = PermissionSet::from_grants(&[("*", "view"), ("Main", "fly")]).unwrap_err();
        assert_eq!(err, PermissionError::UnrecognizedAction("fly".to_string()));
    }

    #[test]
    fn test_permission_set_merge() {
        let mut set1 = PermissionSet::from_grants(&[("*", "view")]).unwrap();
        let set2 = PermissionSet::from_grants(&[("Main", "edit")]).unwrap();

        set1.merge(&set2);
        assert_eq!(set1.len(), 2);
        assert!(set1.implies(&perm("Main", "upload")));
    }

    #[test]
    fn test_permission_set_implies_all_any() {
        let granted = PermissionSet::from_grants(&[("Main*", "edit")]).unwrap();
        let both = PermissionSet::from_grants(&[("MainPage", "view"), ("Other", "view")]).unwrap();
        let inside = PermissionSet::from_grants(&[("MainPage", "view"), ("Mail", "comment")]).unwrap();

        assert!(!granted.implies_all(&both));
        assert!(granted.implies_any(&both));
        assert!(granted.implies_all(&inside));
        assert!(granted.implies_all(&PermissionSet::new()));
        assert!(!granted.implies_any(&PermissionSet::new()));
    }
}
