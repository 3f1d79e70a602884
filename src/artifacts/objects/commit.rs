//! Commit object
//!
//! Commits are immutable snapshots of the repository. They contain:
//! - Zero, one or two parent commit IDs (root, normal or merge commit)
//! - A creation timestamp
//! - The full tree of tracked paths and their blob hashes
//! - The commit message
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! parent <parent-sha>
//! date <unix-seconds> <timezone>
//! blob <blob-sha> <path>
//!
//! <commit message>
//! ```
//!
//! The message follows the first empty line verbatim, so it may itself span
//! several lines.

use crate::artifacts::objects::object::{Object, Packable, Unpackable, with_header};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, SubsecRound};
use std::io::BufRead;

/// Environment variable overriding the timestamp of new commits
pub const COMMIT_DATE_ENV: &str = "TWIG_COMMIT_DATE";

/// Message of the commit created by `init`
pub const ROOT_COMMIT_MESSAGE: &str = "initial commit";

/// Parent links of a commit
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Parents {
    /// The root commit created by `init`
    Root,
    Normal(ObjectId),
    /// First parent is the branch merged into, second the merged branch
    Merge(ObjectId, ObjectId),
}

impl Parents {
    pub fn to_vec(&self) -> Vec<ObjectId> {
        match self {
            Parents::Root => vec![],
            Parents::Normal(parent) => vec![parent.clone()],
            Parents::Merge(first, second) => vec![first.clone(), second.clone()],
        }
    }

    pub fn first(&self) -> Option<&ObjectId> {
        match self {
            Parents::Root => None,
            Parents::Normal(parent) | Parents::Merge(parent, _) => Some(parent),
        }
    }

    fn try_from_vec(mut parents: Vec<ObjectId>) -> anyhow::Result<Self> {
        match parents.len() {
            0 => Ok(Parents::Root),
            1 => Ok(Parents::Normal(parents.remove(0))),
            2 => {
                let second = parents.remove(1);
                Ok(Parents::Merge(parents.remove(0), second))
            }
            n => Err(anyhow::anyhow!("Invalid commit object: {n} parents")),
        }
    }
}

/// Slim representation of a commit
///
/// Contains only the graph information needed by ancestry and split point
/// searches, so those algorithms never have to hold whole trees.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SlimCommit {
    /// The commit's object ID
    pub oid: ObjectId,
    /// The commit's parent object IDs, in order
    pub parents: Vec<ObjectId>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    parents: Parents,
    timestamp: DateTime<FixedOffset>,
    tree: Tree,
    message: String,
}

impl Commit {
    /// Build a commit; the timestamp is kept to whole seconds, as stored
    pub fn new(
        parents: Parents,
        timestamp: DateTime<FixedOffset>,
        tree: Tree,
        message: String,
    ) -> Self {
        Commit {
            parents,
            timestamp: timestamp.trunc_subsecs(0),
            tree,
            message,
        }
    }

    /// The commit every repository starts from: no parents, empty tree, epoch timestamp
    pub fn root() -> Self {
        let epoch = DateTime::from_timestamp(0, 0)
            .unwrap_or_default()
            .fixed_offset();

        Commit::new(
            Parents::Root,
            epoch,
            Tree::default(),
            ROOT_COMMIT_MESSAGE.to_string(),
        )
    }

    /// Timestamp for a new commit
    ///
    /// Reads `TWIG_COMMIT_DATE` (RFC 2822 or `%Y-%m-%d %H:%M:%S %z`) and falls
    /// back to the local time when it is unset or malformed.
    pub fn timestamp_from_env() -> DateTime<FixedOffset> {
        std::env::var(COMMIT_DATE_ENV)
            .ok()
            .and_then(|date_str| {
                DateTime::parse_from_rfc2822(&date_str)
                    .or_else(|_| DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                    .ok()
            })
            .unwrap_or_else(|| chrono::Local::now().fixed_offset())
    }

    pub fn parents(&self) -> &Parents {
        &self.parents
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn is_merge(&self) -> bool {
        matches!(self.parents, Parents::Merge(..))
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Format timestamp in human-readable form
    ///
    /// # Returns
    ///
    /// String like "Thu Jan 1 00:00:00 1970 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    pub fn to_slim(&self, oid: ObjectId) -> SlimCommit {
        SlimCommit {
            oid,
            parents: self.parents.to_vec(),
        }
    }

    fn payload(&self) -> anyhow::Result<String> {
        let mut lines = vec![];

        for parent in self.parents.to_vec() {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!(
            "date {} {}",
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        ));
        for (path, oid) in &self.tree {
            lines.push(Tree::entry_line(path, oid)?);
        }
        lines.push(String::new());
        lines.push(self.message.clone());

        Ok(lines.join("\n"))
    }
}

fn parse_date(value: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    let (seconds, timezone) = value
        .split_once(' ')
        .context("Invalid commit object: invalid date line")?;
    let seconds = seconds
        .parse::<i64>()
        .map_err(|_| anyhow::anyhow!("Invalid timestamp"))?;
    let offset = DateTime::parse_from_str(
        &format!("1970-01-01 00:00:00 {timezone}"),
        "%Y-%m-%d %H:%M:%S %z",
    )
    .map_err(|_| anyhow::anyhow!("Invalid timezone"))?
    .offset()
    .to_owned();

    let datetime =
        DateTime::from_timestamp(seconds, 0).ok_or_else(|| anyhow::anyhow!("Invalid timestamp"))?;
    Ok(datetime.with_timezone(&offset))
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(with_header(self.object_type(), self.payload()?.as_bytes()))
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;
        let content = String::from_utf8(content)?;

        let (headers, message) = content
            .split_once("\n\n")
            .context("Invalid commit object: missing message separator")?;

        let mut parents = Vec::new();
        let mut timestamp = None;
        let mut tree = Tree::default();

        for line in headers.lines() {
            if let Some(parent) = line.strip_prefix("parent ") {
                parents.push(ObjectId::try_parse(parent.to_string())?);
            } else if let Some(date) = line.strip_prefix("date ") {
                timestamp = Some(parse_date(date)?);
            } else {
                let (path, oid) = Tree::parse_entry_line(line)?;
                tree.insert(path, oid);
            }
        }

        let timestamp = timestamp.context("Invalid commit object: missing date line")?;

        Ok(Self::new(
            Parents::try_from_vec(parents)?,
            timestamp,
            tree,
            message.to_string(),
        ))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}
