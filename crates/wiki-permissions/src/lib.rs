//! # Wiki Permissions
//!
//! This crate decides whether a granted page permission covers a requested
//! one. Every page-level authorization check reduces to this question.
//!
//! ## Overview
//!
//! The wiki-permissions crate handles:
//! - **Actions**: `view`, `comment`, `upload`, `edit`, `delete`, `rename`, as bit flags
//! - **Targets**: page names and wildcard patterns (`*`, `*Suffix`, `Prefix*`)
//! - **Permissions**: Target + action set, with `implies`
//! - **Permission Sets**: Collections of granted permissions
//! - **Policy Config**: Grant lists loaded from the environment or JSON
//!
//! ## Architecture
//!
//! ```text
//! Permission = Target + Actions
//!
//! granted.implies(requested) =
//!     expand(granted.actions) ⊇ requested.actions
//!     && granted.target ⊇ requested.target
//! ```
//!
//! ## Action Implications
//!
//! - `delete` and `rename` imply `edit`
//! - `edit` implies `comment` and `upload`
//! - `comment` and `upload` imply `view`
//!
//! ## Group Pages
//!
//! Group member lists are pages whose name ends in `Group`. The `*` and
//! `Prefix*` wildcards never reach them; only an exact grant or a `*Suffix`
//! grant does.
//!
//! ## Usage
//!
//! ```rust
//! use wiki_permissions::{Action, Permission, PermissionSet};
//!
//! let granted = Permission::new("Main*", "delete").unwrap();
//! let requested = Permission::new("MainPage", "view").unwrap();
//! assert!(granted.implies(&requested));
//!
//! // Whole-site anchors
//! assert!(Permission::all_for(Action::Edit).implies(&requested));
//! assert!(!Permission::all_for(Action::Edit)
//!     .implies(&Permission::new("AdminGroup", "view").unwrap()));
//!
//! // Sets
//! let set = PermissionSet::from_grants(&[("*", "view"), ("Sandbox*", "edit")]).unwrap();
//! assert!(set.implies(&requested));
//!
//! // Malformed action lists fail at construction
//! assert!(Permission::new("Main", "fly").is_err());
//! ```

pub mod actions;
pub mod config;
pub mod error;
pub mod permissions;
pub mod target;

// Re-export main types for convenience
pub use actions::{Action, ActionMask};
pub use config::{GrantConfig, PolicyConfig};
pub use error::{PermissionError, PermissionResult};
pub use permissions::{
    NamedResource, Permission, PermissionSet, COMMENT_ALL, DELETE_ALL, EDIT_ALL, RENAME_ALL,
    UPLOAD_ALL, VIEW_ALL,
};
pub use target::{is_subset, ResourceTarget, TargetKind, GROUP_SUFFIX};
