//! Object document loading.
//!
//! An object document declares one reusable template:
//!
//! ```xml
//! <object id="knight" namespace="units" parent="unit" blocking="1" static="0" pather="RoutePather">
//!     <image source="knight_0.png" direction="0" x_offset="-16" y_offset="-32"/>
//!     <action id="walk">
//!         <animation source="walk_0.xml" direction="0"/>
//!         <animation source="walk_90.xml" direction="90"/>
//!     </action>
//! </object>
//! ```
//!
//! Sources are relative to the object document. Resulting locators include
//! the map directory.

use std::path::Path;

use bevy::log::{debug, warn};
use bevy_mapdoc_assets::prelude::{
    AttributeResolver, Element, ImageLocation, ResourceLocator, load_document, resolve_source,
};

use crate::components::ObjectId;
use crate::loaders::LoadContext;
use crate::model::DEFAULT_PATHER;

/// Load the object document at `file`, relative to the map directory.
///
/// Counts one progress step for the document whatever the outcome.
pub fn load_object_file(ctx: &mut LoadContext, file: &Path) -> Option<ObjectId> {
    let path = ctx.map_directory.join(file);
    let object = match load_document(ctx.vfs, &path) {
        Ok(root) => load_object(ctx, &root, file),
        Err(e) => {
            warn!("Skipping object document {}: {}", path.display(), e);
            None
        }
    };
    ctx.progress.increment();
    object
}

/// Build a template from a parsed object document.
///
/// Returns the id of the newly created template, or `None` when the document
/// produced none: wrong root tag, missing `id`/`namespace`, unknown parent,
/// or an already registered `(id, namespace)`.
pub fn load_object(ctx: &mut LoadContext, root: &Element, file: &Path) -> Option<ObjectId> {
    if root.name() != "object" {
        debug!("Ignoring {}: root element is <{}>", file.display(), root.name());
        return None;
    }

    let (Some(id), Some(namespace)) = (root.attribute("id"), root.attribute("namespace")) else {
        warn!("Skipping object in {}: id and namespace are required", file.display());
        return None;
    };

    let object_id = match root.attribute("parent") {
        Some(parent_id) => {
            let Some(parent) = ctx.model.get_object(parent_id, namespace) else {
                warn!(
                    "Skipping object {}:{} in {}: parent '{}' not found",
                    namespace,
                    id,
                    file.display(),
                    parent_id
                );
                return None;
            };
            match ctx.model.create_object(id, namespace, Some(parent)) {
                Ok(object_id) => object_id,
                Err(e) => {
                    warn!("Skipping object in {}: {}", file.display(), e);
                    return None;
                }
            }
        }
        None => {
            if ctx.model.get_object(id, namespace).is_some() {
                debug!("Object {}:{} already loaded, skipping {}", namespace, id, file.display());
                return None;
            }
            match ctx.model.create_object(id, namespace, None) {
                Ok(object_id) => object_id,
                Err(e) => {
                    warn!("Skipping object in {}: {}", file.display(), e);
                    return None;
                }
            }
        }
    };

    // Derived objects without their own pather inherit the parent's.
    let pather = match root.attribute("pather") {
        Some(pather_name) => ctx.model.get_pather(pather_name).or_else(|| {
            warn!(
                "Unknown pather '{}' for object {}:{}, using {}",
                pather_name, namespace, id, DEFAULT_PATHER
            );
            ctx.model.get_pather(DEFAULT_PATHER)
        }),
        None if root.attribute("parent").is_some() => None,
        None => ctx.model.get_pather(DEFAULT_PATHER),
    };

    let map_directory = ctx.map_directory;
    let locate = |source: &str| ResourceLocator::new(map_directory.join(resolve_source(file, source).path()));

    let object = ctx.model.object_mut(object_id)?;
    object.resource_location = Some(file.to_path_buf());
    object.blocking = root.flag("blocking");
    object.is_static = root.flag("static");
    object.pather = pather;

    for image in root.children_named("image") {
        if let Some(source) = image.attribute("source") {
            let mut location = ImageLocation::new(locate(source));
            if let Some(x_shift) = image.query(&["x_offset"]) {
                location.x_shift = x_shift;
            }
            if let Some(y_shift) = image.query(&["y_offset"]) {
                location.y_shift = y_shift;
            }
            let handle = ctx.images.add_from_location(location);
            object.add_static_image(image.resolve(&["direction"], 0).value, handle);
        } else {
            warn!("Skipping image without source in {}", file.display());
        }
        ctx.progress.increment();
    }

    for action_element in root.children_named("action") {
        let Some(action_id) = action_element.attribute("id") else {
            warn!("Skipping action without id in {}", file.display());
            for _ in action_element.children_named("animation") {
                ctx.progress.increment();
            }
            continue;
        };

        let action = object.create_action(action_id);
        for animation in action_element.children_named("animation") {
            let Some(source) = animation.attribute("source") else {
                warn!("Skipping animation without source in action '{}' of {}", action_id, file.display());
                ctx.progress.increment();
                continue;
            };

            let locator = locate(source);
            match ctx.animations.add_from_file(&locator, ctx.vfs, ctx.images) {
                Some(handle) => {
                    action.add_animation(animation.resolve(&["direction"], 0).value, handle);
                    // Last attached animation decides the duration.
                    if let Some(loaded) = ctx.animations.get(handle) {
                        action.duration_ms = loaded.duration_ms();
                    }
                }
                None => warn!("Animation {} unavailable for action '{}'", locator, action_id),
            }
            ctx.progress.increment();
        }
    }

    Some(object_id)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use bevy_mapdoc_assets::prelude::{AnimationDocumentLoader, AnimationPool, DiskVfs, ImagePool, parse_document};
    use tempfile::TempDir;

    use super::*;
    use crate::model::Model;
    use crate::progress::ProgressTracker;

    struct Fixture {
        dir: TempDir,
        model: Model,
        vfs: DiskVfs,
        images: ImagePool,
        animations: AnimationPool,
        progress: ProgressTracker,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let mut animations = AnimationPool::new();
            animations.add_provider(AnimationDocumentLoader::new(dir.path()));
            Self {
                dir,
                model: Model::new(),
                vfs: DiskVfs::new(),
                images: ImagePool::new(),
                animations,
                progress: ProgressTracker::default(),
            }
        }

        fn write(&self, relative: &str, contents: &str) {
            let path = self.dir.path().join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }

        fn load(&mut self, relative: &str) -> Option<ObjectId> {
            let map_directory: PathBuf = self.dir.path().to_path_buf();
            let mut ctx = LoadContext {
                model: &mut self.model,
                vfs: &self.vfs,
                images: &mut self.images,
                animations: &mut self.animations,
                progress: &mut self.progress,
                map_directory: &map_directory,
            };
            load_object_file(&mut ctx, Path::new(relative))
        }
    }

    const WALK: &str = r#"<animation delay="100">
        <frame source="walk_0.png"/>
        <frame source="walk_1.png" delay="150"/>
        <frame source="walk_2.png" delay="120"/>
    </animation>"#;

    const RUN: &str = r#"<animation delay="50"><frame source="run_0.png"/></animation>"#;

    #[test]
    fn test_object_document_builds_template() {
        let mut fx = Fixture::new();
        fx.write("units/walk.xml", WALK);
        fx.write(
            "units/knight.xml",
            r#"<object id="knight" namespace="units" blocking="1">
                <image source="knight_90.png" direction="90" x_offset="-16"/>
                <image source="knight_0.png"/>
                <image direction="180"/>
                <action id="walk"><animation source="walk.xml" direction="0"/></action>
            </object>"#,
        );

        let knight = fx.load("units/knight.xml").unwrap();
        let object = fx.model.object(knight).unwrap();
        assert!(object.blocking);
        assert!(!object.is_static);
        assert_eq!(object.resource_location(), Some(Path::new("units/knight.xml")));
        assert_eq!(fx.model.pather_name(object.pather.unwrap()), Some(DEFAULT_PATHER));
        assert_eq!(object.static_image_angles(), vec![0, 90]);

        let image = fx.images.get(object.static_image(90).unwrap()).unwrap();
        assert_eq!(image.locator.path(), fx.dir.path().join("units/knight_90.png"));
        assert_eq!((image.x_shift, image.y_shift), (-16, 0));

        let walk = object.action("walk").unwrap();
        assert_eq!(walk.duration_ms, 370);
        let animation = fx.animations.get(walk.animation(0).unwrap()).unwrap();
        assert_eq!(animation.frame_count(), 3);

        // three images, one animation, one document
        assert_eq!(fx.progress.count(), 5);
    }

    #[test]
    fn test_last_attached_animation_sets_duration() {
        let mut fx = Fixture::new();
        fx.write("walk.xml", WALK);
        fx.write("run.xml", RUN);
        fx.write(
            "runner.xml",
            r#"<object id="runner" namespace="units">
                <action id="move">
                    <animation source="walk.xml" direction="0"/>
                    <animation source="run.xml" direction="90"/>
                </action>
            </object>"#,
        );

        let runner = fx.load("runner.xml").unwrap();
        let action = fx.model.object(runner).unwrap().action("move").unwrap();
        assert_eq!(action.animations().len(), 2);
        assert_eq!(action.duration_ms, 50);
    }

    #[test]
    fn test_reloading_same_object_is_idempotent() {
        let mut fx = Fixture::new();
        fx.write("tree.xml", r#"<object id="tree" namespace="nature"/>"#);
        fx.write("copy/tree.xml", r#"<object id="tree" namespace="nature" static="1"/>"#);

        assert!(fx.load("tree.xml").is_some());
        assert!(fx.load("copy/tree.xml").is_none());
        assert_eq!(fx.model.object_count(), 1);
        let tree = fx.model.get_object("tree", "nature").unwrap();
        assert!(!fx.model.object(tree).unwrap().is_static);
    }

    #[test]
    fn test_derived_object_requires_parent() {
        let mut fx = Fixture::new();
        fx.write("archer.xml", r#"<object id="archer" namespace="units" parent="unit"/>"#);
        fx.write("unit.xml", r#"<object id="unit" namespace="units" pather="RoutePather"/>"#);

        assert!(fx.load("archer.xml").is_none());
        let unit = fx.load("unit.xml").unwrap();
        let archer = fx.load("archer.xml").unwrap();
        assert_eq!(fx.model.object(archer).unwrap().parent(), Some(unit));
    }

    #[test]
    fn test_derived_object_inherits_pather() {
        let mut fx = Fixture::new();
        let linear = fx.model.add_pather("LinearPather");
        fx.write("unit.xml", r#"<object id="unit" namespace="units" pather="LinearPather"/>"#);
        fx.write("archer.xml", r#"<object id="archer" namespace="units" parent="unit"/>"#);
        fx.write(
            "scout.xml",
            r#"<object id="scout" namespace="units" parent="unit" pather="RoutePather"/>"#,
        );

        fx.load("unit.xml").unwrap();
        let archer = fx.load("archer.xml").unwrap();
        let scout = fx.load("scout.xml").unwrap();

        assert_eq!(fx.model.object(archer).unwrap().pather, None);
        assert_eq!(fx.model.pather_of(archer), Some(linear));
        assert_eq!(fx.model.pather_of(scout), fx.model.get_pather(DEFAULT_PATHER));
    }

    #[test]
    fn test_huge_frame_delays_saturate_action_duration() {
        let mut fx = Fixture::new();
        fx.write(
            "slow.xml",
            r#"<animation delay="3000000000"><frame source="a.png"/><frame source="b.png"/></animation>"#,
        );
        fx.write(
            "statue.xml",
            r#"<object id="statue" namespace="props">
                <action id="default"><animation source="slow.xml"/></action>
            </object>"#,
        );

        let statue = fx.load("statue.xml").unwrap();
        let action = fx.model.object(statue).unwrap().action("default").unwrap();
        assert_eq!(action.duration_ms, u32::MAX);
    }

    #[test]
    fn test_non_object_documents_are_ignored() {
        let mut fx = Fixture::new();
        fx.write("walk.xml", WALK);
        fx.write("nameless.xml", r#"<object namespace="units"/>"#);

        assert!(fx.load("walk.xml").is_none());
        assert!(fx.load("nameless.xml").is_none());
        assert!(fx.load("missing.xml").is_none());
        assert_eq!(fx.model.object_count(), 0);
        assert_eq!(fx.progress.count(), 3);
    }

    #[test]
    fn test_unavailable_animation_is_skipped() {
        let mut fx = Fixture::new();
        fx.write(
            "ghost.xml",
            r#"<object id="ghost" namespace="units">
                <action id="haunt"><animation source="missing.xml"/></action>
                <action><animation source="walk.xml"/></action>
            </object>"#,
        );

        let ghost = fx.load("ghost.xml").unwrap();
        let object = fx.model.object(ghost).unwrap();
        let haunt = object.action("haunt").unwrap();
        assert!(haunt.animations().is_empty());
        assert_eq!(haunt.duration_ms, 0);
        assert_eq!(object.actions().len(), 1);
        assert_eq!(fx.progress.count(), 3);
    }

    #[test]
    fn test_load_object_from_parsed_root() {
        let mut fx = Fixture::new();
        let root = parse_document(r#"<object id="rock" namespace="nature" static="1"/>"#).unwrap();
        let map_directory = fx.dir.path().to_path_buf();
        let mut ctx = LoadContext {
            model: &mut fx.model,
            vfs: &fx.vfs,
            images: &mut fx.images,
            animations: &mut fx.animations,
            progress: &mut fx.progress,
            map_directory: &map_directory,
        };
        let rock = load_object(&mut ctx, &root, Path::new("rock.xml")).unwrap();
        assert!(fx.model.object(rock).unwrap().is_static);
    }
}
