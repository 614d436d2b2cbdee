//! Example store
//!
//! Directory of recorded examples, one JSON file per exchange. Files are
//! named `<index>-<uuid>.json` so that reading them back in name order
//! reproduces recording order.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::ResourceExample;

#[derive(Debug, Clone)]
pub struct ExampleStore {
    dir: PathBuf,
}

impl ExampleStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn json_files(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|e| e == "json") {
                files.push(path);
            }
        }
        files.sort_by_key(|p| sort_key(p));
        Ok(files)
    }

    /// Persist an example and return the written path
    pub fn save(&self, example: &ResourceExample) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let index = self.json_files()?.len();
        let path = self
            .dir
            .join(format!("{:06}-{}.json", index, uuid::Uuid::new_v4()));
        example.dump(&path)?;
        tracing::debug!(path = %path.display(), "saved example");
        Ok(path)
    }

    /// Read every stored example; undecodable files are skipped with a warning
    pub fn load_all(&self) -> Result<Vec<ResourceExample>> {
        let mut examples = Vec::new();
        for path in self.json_files()? {
            match ResourceExample::load(&path) {
                Ok(example) => examples.push(example),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable example");
                }
            }
        }
        Ok(examples)
    }

    /// Remove the store directory and everything in it
    pub fn clean(&self) -> Result<()> {
        if self.dir.exists() {
            std::fs::remove_dir_all(&self.dir)?;
        }
        Ok(())
    }
}

// Numeric prefix first so `10-…` sorts after `9-…` for hand-named files
fn sort_key(path: &Path) -> (u64, String) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let index = name
        .split('-')
        .next()
        .and_then(|prefix| prefix.parse().ok())
        .unwrap_or(u64::MAX);
    (index, name)
}
