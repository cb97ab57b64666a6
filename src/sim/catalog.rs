//! Level catalog
//!
//! The catalog is a static JSON resource:
//!
//! ```json
//! { "levels": [ { "level_data": ["x0", "y0", "x1", "y1"] } ] }
//! ```
//!
//! Every level is run through the coordinate parser when the catalog loads.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::coords::parse_coordinates;

/// Failure to load the catalog as a whole.
///
/// Distinct from a single level being empty: without a catalog there is no
/// menu to populate at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("level data resource not found: {0}")]
    Missing(String),

    #[error("level data resource is empty")]
    Empty,

    #[error("level data is malformed: {0}")]
    Malformed(String),
}

/// Raw catalog document as authored
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCatalog {
    #[serde(default)]
    pub levels: Vec<RawLevel>,
}

/// Raw level entry: string-encoded coordinates, x then y
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawLevel {
    #[serde(default, deserialize_with = "nullable_tokens")]
    pub level_data: Vec<String>,
}

fn nullable_tokens<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A point in a level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// 0-based gameplay order
    pub index: usize,
    pub position: Vec2,
}

/// A playable level: points in the order they must be tapped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    points: Vec<Point>,
}

impl Level {
    /// Build a level from raw tokens
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        Self::from_positions(parse_coordinates(tokens))
    }

    pub fn from_positions(positions: Vec<Vec2>) -> Self {
        let points = positions
            .into_iter()
            .enumerate()
            .map(|(index, position)| Point { index, position })
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// A level with no valid points cannot be played
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// All levels, in menu order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelCatalog {
    levels: Vec<Level>,
}

impl LevelCatalog {
    pub fn new(levels: Vec<Level>) -> Self {
        Self { levels }
    }

    /// Parse catalog JSON text
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        if text.trim().is_empty() {
            return Err(CatalogError::Empty);
        }

        let raw: RawCatalog =
            serde_json::from_str(text).map_err(|e| CatalogError::Malformed(e.to_string()))?;

        let catalog = Self::from_raw(&raw);
        let empty = catalog.levels.iter().filter(|l| l.is_empty()).count();
        log::info!(
            "Loaded {} levels ({} without valid points)",
            catalog.len(),
            empty
        );
        Ok(catalog)
    }

    /// Read and parse the named catalog resource
    pub fn from_resource(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            log::warn!("Could not read level data {}: {}", path.display(), e);
            CatalogError::Missing(path.display().to_string())
        })?;
        Self::from_json(&text)
    }

    pub fn from_raw(raw: &RawCatalog) -> Self {
        let levels = raw
            .levels
            .iter()
            .map(|level| Level::from_tokens(level.level_data.as_slice()))
            .collect();
        Self { levels }
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn level(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Number shown on a level's menu button ("Level N")
#[inline]
pub fn display_number(level_index: usize) -> usize {
    level_index + 1
}
