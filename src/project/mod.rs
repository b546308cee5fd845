//! Project resource abstraction.
//!
//! The working copy never touches the filesystem directly; it goes through
//! [`ProjectResources`] so tests can substitute a mock and hosts can plug in
//! their own resource model.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use tempfile::NamedTempFile;

/// Files of one project, addressed by project-relative paths.
#[cfg_attr(test, mockall::automock)]
pub trait ProjectResources {
    /// Project name, used as its identity.
    fn name(&self) -> String;

    fn file_exists(&self, relative: &Utf8Path) -> bool;

    fn read_file(&self, relative: &Utf8Path) -> io::Result<Vec<u8>>;

    /// Create a new file. Fails if the file already exists.
    fn create_file(&self, relative: &Utf8Path, contents: &[u8]) -> io::Result<()>;

    /// Replace the contents of an existing file. Readers see either the old or
    /// the new contents.
    fn set_contents(&self, relative: &Utf8Path, contents: &[u8]) -> io::Result<()>;

    /// Make a freshly created file known to the local resource model.
    fn refresh_local(&self, relative: &Utf8Path) -> io::Result<()>;
}

/// Project backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct FsProject {
    name: String,
    root: Utf8PathBuf,
}

impl FsProject {
    /// The project is named after its root directory.
    pub fn new<P: AsRef<Utf8Path>>(root: P) -> Self {
        let root = root.as_ref().to_path_buf();
        let name = root.file_name().unwrap_or(root.as_str()).to_string();
        Self { name, root }
    }

    pub fn with_name<P: AsRef<Utf8Path>>(name: impl Into<String>, root: P) -> Self {
        Self {
            name: name.into(),
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn resolve(&self, relative: &Utf8Path) -> Utf8PathBuf {
        self.root.join(relative)
    }
}

impl ProjectResources for FsProject {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn file_exists(&self, relative: &Utf8Path) -> bool {
        self.resolve(relative).is_file()
    }

    fn read_file(&self, relative: &Utf8Path) -> io::Result<Vec<u8>> {
        fs::read(self.resolve(relative))
    }

    fn create_file(&self, relative: &Utf8Path, contents: &[u8]) -> io::Result<()> {
        let path = self.resolve(relative);
        let mut file = OpenOptions::new().write(true).create_new(true).open(&path)?;
        file.write_all(contents)?;
        file.sync_all()
    }

    fn set_contents(&self, relative: &Utf8Path, contents: &[u8]) -> io::Result<()> {
        let path = self.resolve(relative);
        if !path.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", path),
            ));
        }
        // sibling temp file renamed over the target; the target is never truncated
        let dir = path.parent().unwrap_or(self.root.as_path());
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(contents)?;
        temp.as_file().sync_all()?;
        temp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }

    fn refresh_local(&self, relative: &Utf8Path) -> io::Result<()> {
        // A plain directory has no resource cache; just confirm the file landed.
        fs::metadata(self.resolve(relative)).map(|_| ())
    }
}
