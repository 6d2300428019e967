//! # Actions
//!
//! Defines the operations a page permission can grant and the action mask
//! that holds a set of them.
//!
//! Coarser actions imply finer ones:
//!
//! ```text
//! delete ─┐
//!         ├─> edit ─┬─> comment ─┐
//! rename ─┘         └─> upload  ─┴─> view
//! ```

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::{PermissionError, PermissionResult};

/// Operations that can be performed on a page.
///
/// Action names are case-insensitive on input and always lower case on output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Comment on a page.
    Comment,

    /// Delete a page.
    ///
    /// Implies `edit`.
    Delete,

    /// Modify page content.
    ///
    /// Implies `comment` and `upload`.
    Edit,

    /// Rename a page.
    ///
    /// Implies `edit`.
    Rename,

    /// Attach files to a page.
    Upload,

    /// Read a page.
    View,
}

impl Action {
    /// All actions, in canonical (alphabetical) order.
    pub const ALL: [Action; 6] = [
        Action::Comment,
        Action::Delete,
        Action::Edit,
        Action::Rename,
        Action::Upload,
        Action::View,
    ];

    /// Get the string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Comment => "comment",
            Action::Delete => "delete",
            Action::Edit => "edit",
            Action::Rename => "rename",
            Action::Upload => "upload",
            Action::View => "view",
        }
    }

    /// Parse action from its name (case-insensitive).
    ///
    /// No surrounding whitespace is tolerated.
    ///
    /// # Example
    ///
    /// ```
    /// use wiki_permissions::actions::Action;
    ///
    /// assert_eq!(Action::parse("view"), Some(Action::View));
    /// assert_eq!(Action::parse("EDIT"), Some(Action::Edit));
    /// assert_eq!(Action::parse("fly"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str().eq_ignore_ascii_case(s))
    }

    /// Get all actions.
    pub fn all() -> Vec<Self> {
        Self::ALL.to_vec()
    }

    /// The single-bit mask for this action.
    pub fn mask(&self) -> ActionMask {
        match self {
            Action::View => ActionMask::VIEW,
            Action::Edit => ActionMask::EDIT,
            Action::Comment => ActionMask::COMMENT,
            Action::Upload => ActionMask::UPLOAD,
            Action::Delete => ActionMask::DELETE,
            Action::Rename => ActionMask::RENAME,
        }
    }

    /// Actions directly implied by this one (one step in the hierarchy).
    pub fn implied_actions(&self) -> &'static [Action] {
        match self {
            Action::Delete | Action::Rename => &[Action::Edit],
            Action::Edit => &[Action::Comment, Action::Upload],
            Action::Comment | Action::Upload => &[Action::View],
            Action::View => &[],
        }
    }

    /// Check if this action implies another action, directly or transitively.
    ///
    /// Every action implies itself.
    ///
    /// # Example
    ///
    /// ```
    /// use wiki_permissions::actions::Action;
    ///
    /// assert!(Action::Delete.implies(Action::View));
    /// assert!(Action::Edit.implies(Action::Upload));
    /// assert!(!Action::View.implies(Action::Comment));
    /// assert!(!Action::Rename.implies(Action::Delete));
    /// ```
    pub fn implies(&self, other: Action) -> bool {
        self.mask().expand().contains(other.mask())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| PermissionError::UnrecognizedAction(s.to_string()))
    }
}

bitflags! {
    /// A set of actions, one bit per [`Action`].
    ///
    /// | Action | Bit |
    /// |--------|-----|
    /// | `view` | `0x01` |
    /// | `edit` | `0x02` |
    /// | `comment` | `0x04` |
    /// | `upload` | `0x08` |
    /// | `delete` | `0x10` |
    /// | `rename` | `0x20` |
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ActionMask: u32 {
        /// Read a page.
        const VIEW    = 0x01;
        /// Modify page content.
        const EDIT    = 0x02;
        /// Comment on a page.
        const COMMENT = 0x04;
        /// Attach files to a page.
        const UPLOAD  = 0x08;
        /// Delete a page.
        const DELETE  = 0x10;
        /// Rename a page.
        const RENAME  = 0x20;
    }
}

impl ActionMask {
    /// Parse a comma-separated action list into a mask.
    ///
    /// Tokens are matched case-insensitively. Repeated actions collapse onto
    /// the same bit. An empty list, or any token that is not one of the six
    /// actions (including an empty token such as the one in `"view,"`), is an
    /// error; there is no way to produce an empty mask from text.
    ///
    /// # Example
    ///
    /// ```
    /// use wiki_permissions::actions::ActionMask;
    ///
    /// let mask = ActionMask::parse("View,edit").unwrap();
    /// assert_eq!(mask, ActionMask::VIEW | ActionMask::EDIT);
    ///
    /// assert!(ActionMask::parse("").is_err());
    /// assert!(ActionMask::parse("view,fly").is_err());
    /// ```
    pub fn parse(actions: &str) -> PermissionResult<Self> {
        if actions.is_empty() {
            return Err(PermissionError::BlankActions);
        }

        actions.split(',').try_fold(Self::empty(), |mask, token| {
            Action::parse(token)
                .map(|action| mask | action.mask())
                .ok_or_else(|| PermissionError::UnrecognizedAction(token.to_string()))
        })
    }

    /// Close this mask over the action hierarchy.
    ///
    /// Repeatedly adds every action implied by an action already present
    /// until nothing changes. `expand(DELETE)` is
    /// `DELETE | EDIT | COMMENT | UPLOAD | VIEW`; `expand(VIEW)` is `VIEW`.
    #[must_use]
    pub fn expand(self) -> Self {
        let mut mask = self;
        loop {
            let next = mask.actions().fold(mask, |acc, action| {
                action
                    .implied_actions()
                    .iter()
                    .fold(acc, |acc, implied| acc | implied.mask())
            });
            if next == mask {
                return mask;
            }
            mask = next;
        }
    }

    /// Check if this mask, once expanded, grants every action in `requested`.
    pub fn covers(self, requested: ActionMask) -> bool {
        self.expand().contains(requested)
    }

    /// Iterate the actions present in this mask, in canonical order.
    pub fn actions(self) -> impl Iterator<Item = Action> {
        Action::ALL
            .into_iter()
            .filter(move |action| self.contains(action.mask()))
    }

    /// Canonical text: lower-case action names, sorted, comma-joined.
    ///
    /// An empty mask yields an empty string.
    ///
    /// # Example
    ///
    /// ```
    /// use wiki_permissions::actions::ActionMask;
    ///
    /// let mask = ActionMask::VIEW | ActionMask::EDIT;
    /// assert_eq!(mask.canonical(), "edit,view");
    /// assert_eq!(ActionMask::empty().canonical(), "");
    /// ```
    pub fn canonical(self) -> String {
        self.actions()
            .map(|action| action.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl From<Action> for ActionMask {
    fn from(action: Action) -> Self {
        action.mask()
    }
}
