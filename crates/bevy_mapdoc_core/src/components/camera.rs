//! Camera configuration.

use bevy::math::{IVec2, UVec2};

/// Viewport rectangle on the render surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole render surface.
    pub fn full_screen(screen_size: UVec2) -> Self {
        Self::new(
            0,
            0,
            i32::try_from(screen_size.x).unwrap_or(i32::MAX),
            i32::try_from(screen_size.y).unwrap_or(i32::MAX),
        )
    }
}

/// A camera attached to one layer of a map.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    id: String,
    layer: String,
    pub viewport: Viewport,
    /// Pixel size of one cell of the reference layer.
    pub cell_image_dimensions: IVec2,
    pub tilt: f64,
    pub zoom: f64,
    pub rotation: f64,
}

impl Camera {
    pub fn new(id: impl Into<String>, layer: impl Into<String>, viewport: Viewport) -> Self {
        Self {
            id: id.into(),
            layer: layer.into(),
            viewport,
            cell_image_dimensions: IVec2::ZERO,
            tilt: 0.0,
            zoom: 1.0,
            rotation: 0.0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Id of the layer the camera is attached to.
    pub fn layer(&self) -> &str {
        &self.layer
    }
}
