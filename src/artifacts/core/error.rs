//! User-facing failures
//!
//! Every precondition a command checks fails with one of these variants. They
//! travel inside `anyhow::Error`, so callers recover the variant with
//! `err.downcast_ref::<TwigError>()`.

use crate::artifacts::objects::object_id::ObjectId;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TwigError {
    Usage,
    NotInitialized,
    AlreadyInitialized,
    FileNotFound,
    FileNotInCommit,
    PathOutsideRepository(String),
    ObjectNotFound(ObjectId),
    NoSuchBranch,
    BranchExists,
    InvalidBranchName(String),
    CannotRemoveCurrentBranch,
    NothingStaged,
    EmptyMessage,
    NothingToRemove,
    NoSuchCommit,
    AmbiguousCommitId(String),
    NoCommitWithMessage,
    AlreadyOnBranch,
    SelfMerge,
    UncommittedChanges,
    UntrackedFileConflict,
    AlreadyUpToDate,
    RemoteNotFound,
    RemoteExists,
    NoSuchRemote,
    NoSuchRemoteBranch,
    NonFastForward,
}

impl fmt::Display for TwigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TwigError::Usage => write!(f, "Incorrect operands."),
            TwigError::NotInitialized => write!(f, "Not in an initialized Twig directory."),
            TwigError::AlreadyInitialized => write!(
                f,
                "A Twig version-control system already exists in the current directory."
            ),
            TwigError::FileNotFound => write!(f, "File does not exist."),
            TwigError::FileNotInCommit => write!(f, "File does not exist in that commit."),
            TwigError::PathOutsideRepository(path) => {
                write!(f, "'{path}' is outside the repository.")
            }
            TwigError::ObjectNotFound(oid) => write!(f, "Object {oid} not found in the database."),
            TwigError::NoSuchBranch => write!(f, "A branch with that name does not exist."),
            TwigError::BranchExists => write!(f, "A branch with that name already exists."),
            TwigError::InvalidBranchName(name) => write!(f, "'{name}' is not a valid branch name."),
            TwigError::CannotRemoveCurrentBranch => write!(f, "Cannot remove the current branch."),
            TwigError::NothingStaged => write!(f, "No changes added to the commit."),
            TwigError::EmptyMessage => write!(f, "Please enter a commit message."),
            TwigError::NothingToRemove => write!(f, "No reason to remove the file."),
            TwigError::NoSuchCommit => write!(f, "No commit with that id exists."),
            TwigError::AmbiguousCommitId(prefix) => {
                write!(f, "Commit id '{prefix}' is ambiguous.")
            }
            TwigError::NoCommitWithMessage => write!(f, "Found no commit with that message."),
            TwigError::AlreadyOnBranch => write!(f, "No need to checkout the current branch."),
            TwigError::SelfMerge => write!(f, "Cannot merge a branch with itself."),
            TwigError::UncommittedChanges => write!(f, "You have uncommitted changes."),
            TwigError::UntrackedFileConflict => write!(
                f,
                "There is an untracked file in the way; delete it, or add and commit it first."
            ),
            TwigError::AlreadyUpToDate => {
                write!(f, "Given branch is an ancestor of the current branch.")
            }
            TwigError::RemoteNotFound => write!(f, "Remote directory not found."),
            TwigError::RemoteExists => write!(f, "A remote with that name already exists."),
            TwigError::NoSuchRemote => write!(f, "A remote with that name does not exist."),
            TwigError::NoSuchRemoteBranch => write!(f, "That remote does not have that branch."),
            TwigError::NonFastForward => {
                write!(f, "Please pull down remote changes before pushing.")
            }
        }
    }
}

impl std::error::Error for TwigError {}

/// Recover the user-facing variant carried by an error, if any
pub fn twig_error(err: &anyhow::Error) -> Option<&TwigError> {
    err.downcast_ref::<TwigError>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_survive_the_trip_through_anyhow() {
        let err: anyhow::Error = TwigError::SelfMerge.into();

        assert_eq!(twig_error(&err), Some(&TwigError::SelfMerge));
        assert_eq!(err.to_string(), "Cannot merge a branch with itself.");
    }

    #[test]
    fn context_does_not_hide_the_variant() {
        let err = anyhow::Error::from(TwigError::NoSuchCommit).context("while resetting");

        assert_eq!(twig_error(&err), Some(&TwigError::NoSuchCommit));
    }
}
