//! File tree access used by replication
//!
//! The engine reads, writes and lists files only through the [`FileTree`]
//! trait. [`DiskFS`] is the real implementation; [`MemoryFS`] keeps everything
//! in a map and is used to exercise the engine without touching the disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Collaborator interface for file access.
pub trait FileTree {
    /// Read a whole file.
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;

    /// Write a whole file, replacing any previous content.
    fn write_file(&mut self, path: &Path, content: &[u8]) -> Result<()>;

    /// Whether a file (or directory) exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Every regular file below `root`, as paths relative to `root`.
    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>>;
}

/// The host filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskFS;

impl FileTree for DiskFS {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|source| Error::FileIo {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_file(&mut self, path: &Path, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::FileIo {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, content).map_err(|source| Error::FileIo {
            path: path.to_path_buf(),
            source,
        })
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            debug!("{} is not a directory; nothing to list", root.display());
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = entry.map_err(|e| Error::Filesystem {
                message: format!("Failed to walk '{}': {}", root.display(), e),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(root) {
                files.push(relative.to_path_buf());
            }
        }
        Ok(files)
    }
}

/// In-memory file tree keyed by full path
#[derive(Debug, Clone, Default)]
pub struct MemoryFS {
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl MemoryFS {
    /// Create a new empty filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file with string content
    pub fn add_file_string<P: AsRef<Path>>(&mut self, path: P, content: &str) {
        self.files
            .insert(path.as_ref().to_path_buf(), content.as_bytes().to_vec());
    }

    /// Add or replace a file with raw content
    pub fn add_file_content<P: AsRef<Path>>(&mut self, path: P, content: Vec<u8>) {
        self.files.insert(path.as_ref().to_path_buf(), content);
    }

    /// Get a file's content
    pub fn get_file<P: AsRef<Path>>(&self, path: P) -> Option<&[u8]> {
        self.files.get(path.as_ref()).map(Vec::as_slice)
    }

    /// Get a file's content as UTF-8 text
    pub fn get_string<P: AsRef<Path>>(&self, path: P) -> Option<&str> {
        self.get_file(path).and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    /// Get the number of files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if filesystem is empty
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileTree for MemoryFS {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| Error::Filesystem {
                message: format!("File not found: {}", path.display()),
            })
    }

    fn write_file(&mut self, path: &Path, content: &[u8]) -> Result<()> {
        self.files.insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.files.keys().any(|file| file.starts_with(path))
    }

    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        Ok(self
            .files
            .keys()
            .filter_map(|path| path.strip_prefix(root).ok())
            .filter(|relative| !relative.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .collect())
    }
}
