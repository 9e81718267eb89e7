//! Cell grids and pathing strategies.

use bevy::math::DVec2;

/// Cell shape of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridKind {
    Square,
    Hexagonal,
}

/// Transform from layer cell coordinates to map coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGridConfig {
    /// X/Y pixel shift
    pub shift: DVec2,
    /// X/Y scale
    pub scale: DVec2,
    /// Rotation in degrees
    pub rotation: f64,
}

impl Default for CellGridConfig {
    fn default() -> Self {
        Self {
            shift: DVec2::ZERO,
            scale: DVec2::ONE,
            rotation: 0.0,
        }
    }
}

/// A named grid prototype or a layer's configured copy of one.
///
/// The model hands out copies of its registered prototypes; a layer receives
/// its grid fully configured at creation and never changes it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CellGrid {
    name: String,
    kind: GridKind,
    config: CellGridConfig,
}

impl CellGrid {
    pub fn new(name: impl Into<String>, kind: GridKind) -> Self {
        Self {
            name: name.into(),
            kind,
            config: CellGridConfig::default(),
        }
    }

    pub fn square() -> Self {
        Self::new("square", GridKind::Square)
    }

    pub fn hexagonal() -> Self {
        Self::new("hexagonal", GridKind::Hexagonal)
    }

    pub fn with_config(mut self, config: CellGridConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> GridKind {
        self.kind
    }

    pub fn config(&self) -> &CellGridConfig {
        &self.config
    }
}

/// Connectivity a layer exposes for movement planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PathingStrategy {
    #[default]
    EdgesOnly,
    EdgesAndDiagonals,
    Freeform,
}

impl PathingStrategy {
    /// Exact-match lookup of the document spelling; anything unknown is
    /// [`PathingStrategy::EdgesOnly`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "cell_edges_and_diagonals" => Self::EdgesAndDiagonals,
            "freeform" => Self::Freeform,
            _ => Self::EdgesOnly,
        }
    }
}
