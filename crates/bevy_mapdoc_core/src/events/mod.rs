//! Events fired by the map loading systems.

use bevy::prelude::*;

use crate::components::MapId;

/// Fired on a map entity once its document has been loaded into the model.
///
/// This is an `EntityEvent` that can be observed on the requesting entity.
///
/// # Example
///
/// ```ignore
/// commands.spawn(MapdocMap::new("assets/maps/town.xml"))
///     .observe(|trigger: On<MapdocLoaded>, loader: Res<MapdocLoader>| {
///         let map = loader.model().map(trigger.event().map).unwrap();
///         info!("{} has {} layers", map.id(), map.layers().len());
///     });
/// ```
#[derive(EntityEvent, Debug, Clone)]
pub struct MapdocLoaded {
    /// The entity carrying the `MapdocMap` request
    #[event_target]
    pub entity: Entity,
    /// The loaded map in the loader's model
    pub map: MapId,
    /// The map's document id
    pub map_name: String,
}
