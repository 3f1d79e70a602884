//! Three-way resolution of a single path
//!
//! Each path tracked by the split point (S), the current tip (A, "ours") or
//! the other tip (B, "theirs") is resolved from its three blob hashes
//! `h1`, `h2`, `h3` (absent when the commit does not track it):
//!
//! | Condition                              | Resolution |
//! |----------------------------------------|------------|
//! | all present, `h1 == h2`, `h2 != h3`    | take theirs |
//! | all present, `h1 == h3`, `h3 != h2`    | keep ours |
//! | A and B present, `h2 == h3`            | keep ours |
//! | S and A present, `h1 == h2`, B absent  | delete |
//! | S and B present, `h1 == h3`, A absent  | drop |
//! | S absent, only A present               | keep ours |
//! | S absent, only B present               | take theirs |
//! | only S present                         | drop |
//! | anything else                          | conflict |

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Track our version; the working file already holds it
    Keep(ObjectId),
    /// Write their version to the working file and track it
    TakeTheirs(ObjectId),
    /// Delete the working file and drop the path from the tree
    Delete,
    /// Leave the path out of the tree without touching the working file
    Drop,
    /// Both sides changed the path differently
    Conflict {
        ours: Option<ObjectId>,
        theirs: Option<ObjectId>,
    },
}

pub fn resolve(
    base: Option<&ObjectId>,
    ours: Option<&ObjectId>,
    theirs: Option<&ObjectId>,
) -> Resolution {
    match (base, ours, theirs) {
        (Some(h1), Some(h2), Some(h3)) if h1 == h2 && h2 != h3 => {
            Resolution::TakeTheirs(h3.clone())
        }
        (Some(h1), Some(h2), Some(h3)) if h1 == h3 && h3 != h2 => Resolution::Keep(h2.clone()),
        (_, Some(h2), Some(h3)) if h2 == h3 => Resolution::Keep(h2.clone()),
        (Some(h1), Some(h2), None) if h1 == h2 => Resolution::Delete,
        (Some(h1), None, Some(h3)) if h1 == h3 => Resolution::Drop,
        (None, Some(h2), None) => Resolution::Keep(h2.clone()),
        (None, None, Some(h3)) => Resolution::TakeTheirs(h3.clone()),
        (_, None, None) => Resolution::Drop,
        (_, ours, theirs) => Resolution::Conflict {
            ours: ours.cloned(),
            theirs: theirs.cloned(),
        },
    }
}

/// Resolve every path tracked by any of the three trees, in path order
pub fn resolve_trees(base: &Tree, ours: &Tree, theirs: &Tree) -> BTreeMap<PathBuf, Resolution> {
    let paths = base
        .paths()
        .chain(ours.paths())
        .chain(theirs.paths())
        .collect::<BTreeSet<_>>();

    paths
        .into_iter()
        .map(|path| {
            let resolution = resolve(base.get(path), ours.get(path), theirs.get(path));
            debug_merge_log!("merge: {} -> {:?}", path.display(), resolution);
            (path.clone(), resolution)
        })
        .collect()
}
