//! Virtual file system used by the loaders.
//!
//! Relative paths are looked up as given first, then under each registered
//! search directory in registration order.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bevy::log::debug;

/// File source registry and directory lister.
pub trait Vfs: Send + Sync {
    /// Register an additional directory to resolve relative paths against.
    fn add_search_directory(&mut self, directory: &Path);

    /// Read a whole file as text.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Names of the regular files directly inside `directory`.
    fn list_files(&self, directory: &Path) -> BTreeSet<String>;

    /// Names of the subdirectories directly inside `directory`.
    fn list_directories(&self, directory: &Path) -> BTreeSet<String>;

    /// Concrete location of `path`, if it exists anywhere in the file system.
    fn resolve(&self, path: &Path) -> Option<PathBuf>;
}

/// [`Vfs`] backed by the local file system.
#[derive(Debug, Clone, Default)]
pub struct DiskVfs {
    search_directories: Vec<PathBuf>,
}

impl DiskVfs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_directories(&self) -> &[PathBuf] {
        &self.search_directories
    }

    fn candidates<'a>(&'a self, path: &'a Path) -> impl Iterator<Item = PathBuf> + 'a {
        let relative = path.is_relative();
        std::iter::once(path.to_path_buf()).chain(
            self.search_directories
                .iter()
                .filter(move |_| relative)
                .map(move |dir| dir.join(path)),
        )
    }

    fn list_entries(&self, directory: &Path, want_dirs: bool) -> BTreeSet<String> {
        let Some(resolved) = self.candidates(directory).find(|c| c.is_dir()) else {
            debug!("Directory {:?} not found in any search directory", directory);
            return BTreeSet::new();
        };
        let Ok(entries) = fs::read_dir(&resolved) else {
            return BTreeSet::new();
        };
        entries
            .filter_map(Result::ok)
            .filter(|entry| {
                entry
                    .file_type()
                    .is_ok_and(|kind| if want_dirs { kind.is_dir() } else { kind.is_file() })
            })
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect()
    }
}

impl Vfs for DiskVfs {
    fn add_search_directory(&mut self, directory: &Path) {
        if !self.search_directories.iter().any(|d| d == directory) {
            self.search_directories.push(directory.to_path_buf());
        }
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        match self.resolve(path) {
            Some(resolved) => fs::read_to_string(resolved),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found in any search directory", path.display()),
            )),
        }
    }

    fn list_files(&self, directory: &Path) -> BTreeSet<String> {
        self.list_entries(directory, false)
    }

    fn list_directories(&self, directory: &Path) -> BTreeSet<String> {
        self.list_entries(directory, true)
    }

    fn resolve(&self, path: &Path) -> Option<PathBuf> {
        self.candidates(path).find(|candidate| candidate.is_file())
    }
}
