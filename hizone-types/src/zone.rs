use geo::MultiPolygon;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named zone at an absolute distance from the footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSpec {
    pub name: String,
    /// Distance from the footprint edge where the zone ends, in table units.
    pub distance: f64,
}

impl ZoneSpec {
    pub fn new(name: impl Into<String>, distance: f64) -> Self {
        Self {
            name: name.into(),
            distance,
        }
    }
}

/// Buffer geometry derived from a footprint.
///
/// `outer` covers everything up to `distance` from the footprint, the
/// footprint included. `ring` is `outer` minus the previous zone's `outer`
/// (minus the footprint for the first zone), so rings of one entity are
/// pairwise disjoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    pub distance: f64,
    pub outer: MultiPolygon<f64>,
    pub ring: MultiPolygon<f64>,
}

/// Which geometry of a subject entity a relation is evaluated against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "zone", rename_all = "snake_case")]
pub enum ZoneSelector {
    Footprint,
    /// Cumulative buffer of the named zone.
    Outer(String),
    /// Annulus of the named zone.
    Ring(String),
}

impl ZoneSelector {
    pub fn outer(name: impl Into<String>) -> Self {
        ZoneSelector::Outer(name.into())
    }

    pub fn ring(name: impl Into<String>) -> Self {
        ZoneSelector::Ring(name.into())
    }

    pub fn zone_name(&self) -> Option<&str> {
        match self {
            ZoneSelector::Footprint => None,
            ZoneSelector::Outer(name) | ZoneSelector::Ring(name) => Some(name),
        }
    }

    /// Column name used when a count for this selector is attached to a table.
    ///
    /// ```
    /// use hizone_types::zone::ZoneSelector;
    ///
    /// assert_eq!(ZoneSelector::outer("Z1").column_name(), "count_Z1");
    /// assert_eq!(ZoneSelector::ring("Z2").column_name(), "count_Z2_ring");
    /// assert_eq!(ZoneSelector::Footprint.column_name(), "count_footprint");
    /// ```
    pub fn column_name(&self) -> String {
        match self {
            ZoneSelector::Footprint => "count_footprint".to_string(),
            ZoneSelector::Outer(name) => format!("count_{}", name),
            ZoneSelector::Ring(name) => format!("count_{}_ring", name),
        }
    }
}

impl fmt::Display for ZoneSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneSelector::Footprint => write!(f, "footprint"),
            ZoneSelector::Outer(name) => write!(f, "{}", name),
            ZoneSelector::Ring(name) => write!(f, "{} ring", name),
        }
    }
}
