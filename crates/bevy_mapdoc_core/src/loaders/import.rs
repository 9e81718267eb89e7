//! `<import>` directive resolution.

use std::path::{Path, PathBuf};

use bevy::log::{debug, warn};
use bevy::platform::collections::HashSet;
use normalize_path::NormalizePath;

use crate::config::MapLoaderConfig;
use crate::loaders::LoadContext;
use crate::loaders::object::load_object_file;

/// Resolves the import directives of one map load.
///
/// - `file` only: load that object document.
/// - `dir` and `file`: load `dir/file`.
/// - `dir` only: load every object document under `dir`, recursively,
///   skipping excluded directory names, and record `dir`.
///
/// All paths are relative to the map directory. A document reached twice
/// through different paths is only parsed once.
#[derive(Debug)]
pub struct ImportResolver<'c> {
    config: &'c MapLoaderConfig,
    visited: HashSet<PathBuf>,
    directories: Vec<PathBuf>,
}

impl<'c> ImportResolver<'c> {
    pub fn new(config: &'c MapLoaderConfig) -> Self {
        Self {
            config,
            visited: HashSet::default(),
            directories: Vec::new(),
        }
    }

    /// Process one directive. A directive with neither attribute does nothing.
    pub fn resolve(&mut self, ctx: &mut LoadContext, dir: Option<&str>, file: Option<&str>) {
        match (dir, file) {
            (Some(dir), Some(file)) => {
                let file = file.trim_start_matches(['/', '\\']);
                self.load_file(ctx, &Path::new(dir).join(file));
            }
            (None, Some(file)) => self.load_file(ctx, Path::new(file)),
            (Some(dir), None) => {
                let dir = PathBuf::from(dir);
                self.load_directory(ctx, &dir);
                self.directories.push(dir);
            }
            (None, None) => warn!("Ignoring import without dir or file"),
        }
    }

    /// Directories imported so far, in directive order.
    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    pub fn into_directories(self) -> Vec<PathBuf> {
        self.directories
    }

    fn load_file(&mut self, ctx: &mut LoadContext, file: &Path) {
        if !self.visited.insert(file.normalize()) {
            debug!("Object document {} already imported", file.display());
            return;
        }
        load_object_file(ctx, file);
    }

    fn load_directory(&mut self, ctx: &mut LoadContext, dir: &Path) {
        let full = ctx.map_directory.join(dir);

        for name in ctx.vfs.list_files(&full) {
            let is_object_document = Path::new(&name)
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.config.object_extension));
            if is_object_document {
                self.load_file(ctx, &dir.join(&name));
            }
        }

        for name in ctx.vfs.list_directories(&full) {
            if self.config.is_excluded(&name) {
                debug!("Not descending into excluded directory {}", full.join(&name).display());
                continue;
            }
            self.load_directory(ctx, &dir.join(&name));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use bevy_mapdoc_assets::prelude::{AnimationPool, DiskVfs, ImagePool};

    use super::*;
    use crate::model::Model;
    use crate::progress::ProgressTracker;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn object(id: &str) -> String {
        format!(r#"<object id="{id}" namespace="test"/>"#)
    }

    fn import_all(root: &Path, directives: &[(Option<&str>, Option<&str>)]) -> (Model, Vec<PathBuf>, u32) {
        let config = MapLoaderConfig::default();
        let mut model = Model::new();
        let vfs = DiskVfs::new();
        let mut images = ImagePool::new();
        let mut animations = AnimationPool::new();
        let mut progress = ProgressTracker::default();
        let mut ctx = LoadContext {
            model: &mut model,
            vfs: &vfs,
            images: &mut images,
            animations: &mut animations,
            progress: &mut progress,
            map_directory: root,
        };

        let mut resolver = ImportResolver::new(&config);
        for (dir, file) in directives {
            resolver.resolve(&mut ctx, *dir, *file);
        }
        let directories = resolver.into_directories();
        (model, directories, progress.count())
    }

    #[test]
    fn test_file_and_dir_file_imports() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "rock.xml", &object("rock"));
        write(tmp.path(), "objects/tree.xml", &object("tree"));

        let (model, directories, _) =
            import_all(tmp.path(), &[(None, Some("rock.xml")), (Some("objects"), Some("tree.xml"))]);
        assert!(model.get_object("rock", "test").is_some());
        assert!(model.get_object("tree", "test").is_some());
        assert!(directories.is_empty());
    }

    #[test]
    fn test_directory_import_recurses_and_skips_excluded() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "objects/rock.xml", &object("rock"));
        write(tmp.path(), "objects/readme.txt", "not an object");
        write(tmp.path(), "objects/plants/tree.xml", &object("tree"));
        write(tmp.path(), "objects/.svn/ghost.xml", &object("ghost"));

        let (model, directories, _) = import_all(tmp.path(), &[(Some("objects"), None)]);
        assert!(model.get_object("rock", "test").is_some());
        assert!(model.get_object("tree", "test").is_some());
        assert!(model.get_object("ghost", "test").is_none());
        assert_eq!(directories, vec![PathBuf::from("objects")]);
    }

    #[test]
    fn test_same_document_through_two_paths_loads_once() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "objects/rock.xml", &object("rock"));

        let (model, _, documents) = import_all(
            tmp.path(),
            &[
                (Some("objects"), None),
                (None, Some("objects/rock.xml")),
                (Some("objects/../objects"), Some("rock.xml")),
            ],
        );
        assert_eq!(model.object_count(), 1);
        assert_eq!(documents, 1);
    }

    #[test]
    fn test_empty_directive_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let (model, directories, documents) = import_all(tmp.path(), &[(None, None)]);
        assert_eq!(model.object_count(), 0);
        assert!(directories.is_empty());
        assert_eq!(documents, 0);
    }
}
