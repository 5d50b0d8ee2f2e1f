use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;

/// Read-only access to the checked-out workspace.
///
/// Manifest paths are relative to [`RepoView::root`].
pub trait RepoView {
    fn root(&self) -> &Utf8Path;

    fn read_to_string(&self, rel: &Utf8Path) -> anyhow::Result<String>;
}

/// File-system backed `RepoView`.
#[derive(Debug, Clone)]
pub struct FsRepoView {
    root: Utf8PathBuf,
}

impl FsRepoView {
    pub fn new(root: Utf8PathBuf) -> Self {
        Self { root }
    }

    fn abs(&self, rel: &Utf8Path) -> Utf8PathBuf {
        if rel.is_absolute() {
            rel.to_path_buf()
        } else {
            self.root.join(rel)
        }
    }
}

impl RepoView for FsRepoView {
    fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn read_to_string(&self, rel: &Utf8Path) -> anyhow::Result<String> {
        let abs = self.abs(rel);
        fs::read_to_string(&abs).with_context(|| format!("read manifest {}", abs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        fs::create_dir_all(root.join("app/webapp")).unwrap();
        fs::write(root.join("app/webapp/manifest.json"), "{}").unwrap();

        let repo = FsRepoView::new(root.clone());
        let rel = Utf8Path::new("app/webapp/manifest.json");
        assert_eq!(repo.read_to_string(rel).unwrap(), "{}");
        assert!(repo.read_to_string(Utf8Path::new("app/webapp")).is_err());
    }

    #[test]
    fn missing_file_error_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let repo = FsRepoView::new(root);

        let err = repo
            .read_to_string(Utf8Path::new("nope/manifest.json"))
            .unwrap_err();
        assert!(format!("{err:#}").contains("nope/manifest.json"));
    }
}
