use crate::areas::database::Database;
use crate::artifacts::core::TwigError;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;

/// A commit id as typed by the user, possibly abbreviated
///
/// Abbreviated ids are resolved by a linear scan over the stored commit
/// ids. Exactly one match is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision(String);

impl Revision {
    pub fn parse(revision: &str) -> Self {
        Revision(revision.trim().to_ascii_lowercase())
    }

    pub fn resolve(&self, database: &Database) -> anyhow::Result<ObjectId> {
        if !self.looks_like_oid() {
            return Err(TwigError::NoSuchCommit.into());
        }

        let mut matches = database.find_commits_by_prefix(&self.0)?;
        match matches.len() {
            0 => Err(TwigError::NoSuchCommit.into()),
            1 => Ok(matches.remove(0)),
            _ => Err(TwigError::AmbiguousCommitId(self.0.clone()).into()),
        }
    }

    fn looks_like_oid(&self) -> bool {
        !self.0.is_empty()
            && self.0.len() <= OBJECT_ID_LENGTH
            && self.0.chars().all(|c| c.is_ascii_hexdigit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::core::error::twig_error;
    use crate::artifacts::objects::commit::{Commit, Parents};
    use crate::artifacts::objects::tree::Tree;
    use assert_fs::TempDir;
    use rstest::{fixture, rstest};

    #[fixture]
    fn database() -> (TempDir, Database, Vec<ObjectId>) {
        let dir = TempDir::new().unwrap();
        let database = Database::new(dir.path().join("objects").into_boxed_path());
        database.init().unwrap();

        let mut parent = database.store(&Commit::root()).unwrap();
        let mut oids = vec![parent.clone()];
        for message in ["one", "two", "three"] {
            parent = database
                .store(&Commit::new(
                    Parents::Normal(parent),
                    Commit::root().timestamp(),
                    Tree::default(),
                    message.to_string(),
                ))
                .unwrap();
            oids.push(parent.clone());
        }

        (dir, database, oids)
    }

    #[rstest]
    fn full_and_short_ids_resolve(database: (TempDir, Database, Vec<ObjectId>)) {
        let (_dir, database, oids) = database;

        for oid in &oids {
            assert_eq!(&Revision::parse(oid.as_ref()).resolve(&database).unwrap(), oid);
            assert_eq!(
                &Revision::parse(&oid.to_short_oid().to_uppercase())
                    .resolve(&database)
                    .unwrap(),
                oid
            );
        }
    }

    #[rstest]
    #[case("")]
    #[case("not-hex")]
    #[case("0000000000")]
    fn unknown_ids_are_reported(
        database: (TempDir, Database, Vec<ObjectId>),
        #[case] revision: &str,
    ) {
        let (_dir, database, oids) = database;
        // skip if a stored id happens to start with the prefix
        if oids.iter().any(|oid| oid.starts_with(revision) && !revision.is_empty()) {
            return;
        }

        let err = Revision::parse(revision).resolve(&database).unwrap_err();
        assert_eq!(twig_error(&err), Some(&TwigError::NoSuchCommit));
    }

    #[test]
    fn prefix_shared_by_several_commits_is_ambiguous() {
        let dir = TempDir::new().unwrap();
        let database = Database::new(dir.path().join("objects").into_boxed_path());
        // 17 commits guarantee two of them share a first hex digit
        for n in 0..17 {
            database
                .store(&Commit::new(
                    Parents::Root,
                    Commit::root().timestamp(),
                    Tree::default(),
                    format!("commit {n}"),
                ))
                .unwrap();
        }

        let prefix = "0123456789abcdef"
            .chars()
            .map(|c| c.to_string())
            .find(|prefix| database.find_commits_by_prefix(prefix).unwrap().len() > 1)
            .unwrap();

        let err = Revision::parse(&prefix).resolve(&database).unwrap_err();
        assert_eq!(
            twig_error(&err),
            Some(&TwigError::AmbiguousCommitId(prefix))
        );
    }
}
