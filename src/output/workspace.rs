// Output workspace: cleared at the start of every run, then written into

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Handle to a freshly emptied output directory.
///
/// Every generated artifact goes through [`Workspace::write`], so nothing is
/// written outside the directory.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Delete `root` with everything under it and recreate it empty.
    ///
    /// Works whether `root` is absent, an empty directory, a populated
    /// directory, or a stray file.
    pub fn reset(root: &Path) -> Result<Self> {
        match fs::symlink_metadata(root) {
            Ok(meta) if meta.is_dir() => {
                fs::remove_dir_all(root).map_err(|e| Error::filesystem("remove", root, e))?;
            }
            Ok(_) => {
                fs::remove_file(root).map_err(|e| Error::filesystem("remove", root, e))?;
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::filesystem("inspect", root, e)),
        }

        fs::create_dir_all(root).map_err(|e| Error::filesystem("create", root, e))?;
        tracing::debug!("Reset workspace {}", root.display());

        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Write `contents` to `file_name` directly inside the workspace
    pub fn write(&self, file_name: &str, contents: &str) -> Result<PathBuf> {
        if Path::new(file_name).file_name().and_then(|n| n.to_str()) != Some(file_name) {
            return Err(Error::other(format!(
                "Refusing to write {} outside workspace {}",
                file_name,
                self.root.display()
            )));
        }

        let path = self.root.join(file_name);
        fs::write(&path, contents).map_err(|e| Error::filesystem("write", &path, e))?;
        Ok(path)
    }

    /// Get the workspace directory
    pub fn root(&self) -> &Path {
        &self.root
    }
}
