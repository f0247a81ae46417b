//! Duplicate group model.
//!
//! # Overview
//!
//! A [`DuplicateGroup`] is an opaque identifier (a content hash or a
//! scanner-assigned id) plus the ordered paths the backend believes to be
//! identical. Deleting a member during review turns it into a tombstone in
//! place; members are never removed, so positions stay stable for the
//! whole session.
//!
//! # Example
//!
//! ```
//! use dupbrowse::duplicates::DuplicateGroup;
//! use std::path::{Path, PathBuf};
//!
//! let mut group = DuplicateGroup::new(
//!     "3f2a",
//!     vec![PathBuf::from("/media/a.jpg"), PathBuf::from("/media/b.jpg")],
//! )
//! .expect("two members");
//!
//! assert!(group.mark_deleted(Path::new("/media/b.jpg")));
//! assert_eq!(group.len(), 2);
//! assert_eq!(group.live_count(), 1);
//! ```

use std::path::{Path, PathBuf};

use crate::scanner::ScanRecord;

/// One position in a duplicate group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupMember {
    /// A file that still exists as far as this session knows.
    Live(PathBuf),
    /// A file removed through the review screen; keeps the original path.
    Tombstone(PathBuf),
}

impl GroupMember {
    /// The member's path (original path for tombstones).
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Live(p) | Self::Tombstone(p) => p,
        }
    }

    /// Whether the member has been deleted.
    #[must_use]
    pub fn is_tombstone(&self) -> bool {
        matches!(self, Self::Tombstone(_))
    }
}

/// Set of two or more files believed identical by a backend scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Opaque group identifier
    pub id: String,
    members: Vec<GroupMember>,
}

impl DuplicateGroup {
    /// Create a group from live paths.
    ///
    /// Returns `None` for fewer than two paths, which cannot be duplicates.
    #[must_use]
    pub fn new(id: impl Into<String>, paths: Vec<PathBuf>) -> Option<Self> {
        if paths.len() < 2 {
            return None;
        }
        Some(Self {
            id: id.into(),
            members: paths.into_iter().map(GroupMember::Live).collect(),
        })
    }

    /// Build a group from a backend record.
    #[must_use]
    pub fn from_record(record: ScanRecord) -> Option<Self> {
        Self::new(record.group_id, record.member_paths)
    }

    /// Members in scanner order, tombstones included.
    #[must_use]
    pub fn members(&self) -> &[GroupMember] {
        &self.members
    }

    /// Number of members, tombstones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if this group has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of members that have not been deleted.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.members.iter().filter(|m| !m.is_tombstone()).count()
    }

    /// Paths of members that have not been deleted.
    #[must_use]
    pub fn live_paths(&self) -> Vec<PathBuf> {
        self.members
            .iter()
            .filter_map(|m| match m {
                GroupMember::Live(p) => Some(p.clone()),
                GroupMember::Tombstone(_) => None,
            })
            .collect()
    }

    /// Whether any member (live or deleted) has this path.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.members.iter().any(|m| m.path() == path)
    }

    /// Turn the live member with `path` into a tombstone.
    ///
    /// Returns false if no live member has that path.
    pub fn mark_deleted(&mut self, path: &Path) -> bool {
        for member in &mut self.members {
            if let GroupMember::Live(p) = member {
                if p == path {
                    *member = GroupMember::Tombstone(p.clone());
                    return true;
                }
            }
        }
        false
    }
}
