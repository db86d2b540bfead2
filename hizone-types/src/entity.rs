use crate::zone::{Zone, ZoneSelector};
use geo::{BoundingRect, MultiPolygon, Polygon, Rect};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Stable identifier of a structure, unique within one table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One physical structure: a building footprint and the zones derived from it.
///
/// # Examples
///
/// ```
/// use hizone_types::entity::Entity;
/// use geo::polygon;
///
/// let footprint = polygon![
///     (x: 0.0, y: 0.0),
///     (x: 4.0, y: 0.0),
///     (x: 4.0, y: 3.0),
///     (x: 0.0, y: 3.0),
/// ];
/// let entity = Entity::new("a", footprint);
/// assert_eq!(entity.id.as_str(), "a");
/// assert!(entity.zones.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub footprint: Polygon<f64>,
    #[serde(default)]
    pub zones: Vec<Zone>,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>, footprint: Polygon<f64>) -> Self {
        Self {
            id: id.into(),
            footprint,
            zones: Vec::new(),
        }
    }

    /// Replace the zones of this entity.
    pub fn with_zones(mut self, zones: Vec<Zone>) -> Self {
        self.zones = zones;
        self
    }

    /// Look up a zone by name.
    pub fn zone(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.name == name)
    }

    /// Resolve a selector against this entity.
    ///
    /// Returns `None` when the selector names a zone this entity does not carry.
    pub fn geometry(&self, selector: &ZoneSelector) -> Option<GeometryRef<'_>> {
        match selector {
            ZoneSelector::Footprint => Some(GeometryRef::Polygon(&self.footprint)),
            ZoneSelector::Outer(name) => self
                .zone(name)
                .map(|zone| GeometryRef::MultiPolygon(&zone.outer)),
            ZoneSelector::Ring(name) => self
                .zone(name)
                .map(|zone| GeometryRef::MultiPolygon(&zone.ring)),
        }
    }
}

/// Borrowed view of the geometry chosen by a [`ZoneSelector`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryRef<'a> {
    Polygon(&'a Polygon<f64>),
    MultiPolygon(&'a MultiPolygon<f64>),
}

impl<'a> GeometryRef<'a> {
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        match self {
            GeometryRef::Polygon(polygon) => polygon.bounding_rect(),
            GeometryRef::MultiPolygon(multi) => multi.bounding_rect(),
        }
    }

    /// Iterate the member polygons (one for a plain polygon).
    pub fn polygons(&self) -> std::slice::Iter<'a, Polygon<f64>> {
        let slice: &'a [Polygon<f64>] = match *self {
            GeometryRef::Polygon(polygon) => std::slice::from_ref(polygon),
            GeometryRef::MultiPolygon(multi) => &multi.0,
        };
        slice.iter()
    }
}
