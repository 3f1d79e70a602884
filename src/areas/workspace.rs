use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::core::TwigError;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::tree::Tree;
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Name of the repository metadata directory inside the working tree
pub const METADATA_DIR: &str = ".twig";

const IGNORED_PATHS: [&str; 3] = [METADATA_DIR, ".", ".."];

/// Working directory file access, relative to the working tree root
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Tracked form of a path given on the command line (`./a/b` is `a/b`)
    ///
    /// Paths leaving the working tree or pointing into `.twig` are refused.
    pub fn tracked_path(file: &str) -> anyhow::Result<PathBuf> {
        let path = Path::new(file)
            .components()
            .filter(|component| !matches!(component, Component::CurDir))
            .collect::<PathBuf>();
        Tree::check_path(&path)?;

        Ok(path)
    }

    pub fn exists(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_file()
    }

    /// Read a working file as a blob, failing with `FileNotFound` if it is absent
    pub fn parse_blob(&self, file_path: &Path) -> anyhow::Result<Blob> {
        if !self.exists(file_path) {
            return Err(TwigError::FileNotFound.into());
        }

        Ok(Blob::new(self.read_file(file_path)?))
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let full_path = self.path.join(file_path);
        let content = std::fs::read(&full_path)
            .with_context(|| format!("Failed to read file: {:?}", file_path))?;

        Ok(Bytes::from(content))
    }

    pub fn write_file(&self, file_path: &Path, data: &[u8]) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory for: {:?}", file_path))?;
        }
        if full_path.is_dir() {
            std::fs::remove_dir_all(&full_path).with_context(|| {
                format!("Failed to remove existing directory: {:?}", file_path)
            })?;
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&full_path)
            .with_context(|| format!("Failed to open file: {:?}", file_path))?;

        file.write_all(data)
            .with_context(|| format!("Failed to write to file: {:?}", file_path))?;

        Ok(())
    }

    /// Delete a working file if present, then prune directories it leaves empty
    pub fn remove_file(&self, file_path: &Path) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if full_path.is_file() {
            std::fs::remove_file(&full_path)
                .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
            self.prune_empty_parent_dirs(&full_path)?;
        }

        Ok(())
    }

    /// Every file of the working tree, relative to its root, sorted
    pub fn list_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        let mut files = WalkDir::new(&self.path)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry.file_name().to_string_lossy().as_ref()))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(self.path.as_ref())
                    .ok()
                    .map(PathBuf::from)
            })
            .collect::<Vec<_>>();
        files.sort();

        Ok(files)
    }

    fn is_ignored(name: &str) -> bool {
        IGNORED_PATHS.contains(&name)
    }

    // Deletions go first so a file can be replaced by a directory of the same name.
    pub fn apply_migration(&self, migration: &Migration) -> anyhow::Result<()> {
        for file_path in migration.deletions() {
            self.remove_file(file_path)?;
        }

        for (file_path, oid) in migration.writes() {
            let data = migration.load_blob_data(oid)?;
            self.write_file(file_path, &data)?;
        }

        Ok(())
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.path.as_ref()
            && parent.starts_with(self.path.as_ref())
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent)
                .with_context(|| format!("Failed to remove empty directory: {:?}", parent))?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::core::error::twig_error;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn workspace_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        dir.child("a.txt").write_str("a").unwrap();
        dir.child("nested/deep/b.txt").write_str("b").unwrap();
        dir.child(".twig/HEAD").write_str("ref: refs/heads/master").unwrap();
        dir
    }

    fn workspace(dir: &TempDir) -> Workspace {
        Workspace::new(dir.path().to_path_buf().into_boxed_path())
    }

    #[rstest]
    fn listing_skips_the_metadata_dir(workspace_dir: TempDir) {
        let files = workspace(&workspace_dir).list_files().unwrap();

        assert_eq!(
            files,
            vec![PathBuf::from("a.txt"), PathBuf::from("nested/deep/b.txt")]
        );
    }

    #[rstest]
    fn missing_files_are_reported(workspace_dir: TempDir) {
        let err = workspace(&workspace_dir)
            .parse_blob(Path::new("missing.txt"))
            .unwrap_err();

        assert_eq!(twig_error(&err), Some(&TwigError::FileNotFound));
    }

    #[rstest]
    fn removing_the_last_file_prunes_its_directories(workspace_dir: TempDir) {
        let workspace = workspace(&workspace_dir);

        workspace.remove_file(Path::new("nested/deep/b.txt")).unwrap();

        assert!(!workspace_dir.child("nested").exists());
        assert!(workspace_dir.child("a.txt").exists());
    }

    #[test]
    fn command_line_paths_drop_current_dir_components() {
        assert_eq!(
            Workspace::tracked_path("./nested/./b.txt").unwrap(),
            PathBuf::from("nested/b.txt")
        );
    }

    #[rstest]
    #[case("../outside", "../outside")]
    #[case("nested/../../outside", "nested/../../outside")]
    #[case("/tmp/outside", "/tmp/outside")]
    #[case("./.twig/HEAD", ".twig/HEAD")]
    #[case(".", "")]
    fn command_line_paths_must_stay_in_the_working_tree(
        #[case] file: &str,
        #[case] reported: &str,
    ) {
        let err = Workspace::tracked_path(file).unwrap_err();

        assert_eq!(
            twig_error(&err),
            Some(&TwigError::PathOutsideRepository(reported.to_string()))
        );
    }

    #[rstest]
    fn writing_creates_parent_directories(workspace_dir: TempDir) {
        let workspace = workspace(&workspace_dir);

        workspace
            .write_file(Path::new("new/dir/c.txt"), b"c")
            .unwrap();

        assert_eq!(
            workspace.read_file(Path::new("new/dir/c.txt")).unwrap(),
            Bytes::from_static(b"c")
        );
    }
}
