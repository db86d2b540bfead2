//! Home ignition zone analysis for building footprints.
//!
//! Concentric zones are built around each footprint, then pairwise relations
//! are computed between the structures of a table: how many other
//! footprints fall in each zone, and how far each footprint is from its
//! nearest neighbour.
//!
//! ```rust
//! use hizone::{EntityTable, ZoneSelector, ZoneSpec, count_intersections_same_table, min_nearest_distance};
//! use hizone::types::entity::Entity;
//! use geo::polygon;
//!
//! let square = |x: f64, y: f64| polygon![
//!     (x: x, y: y),
//!     (x: x + 1.0, y: y),
//!     (x: x + 1.0, y: y + 1.0),
//!     (x: x, y: y + 1.0),
//! ];
//!
//! let table = EntityTable::from_entities(vec![
//!     Entity::new("a", square(0.0, 0.0)),
//!     Entity::new("b", square(0.0, 5.0)),
//!     Entity::new("c", square(20.0, 20.0)),
//! ])?
//! .with_zones(&[ZoneSpec::new("Z1", 2.0), ZoneSpec::new("Z2", 10.0)])?;
//!
//! let counts = count_intersections_same_table(&table, &[ZoneSelector::outer("Z2")])?;
//! assert_eq!(counts.get("a", "count_Z2").and_then(|v| v.count()), Some(1));
//!
//! let ssd = min_nearest_distance(&table)?;
//! assert_eq!(ssd.get("a", "min_ssd").and_then(|v| v.distance()), Some(4.0));
//! # Ok::<(), hizone::HizError>(())
//! ```

pub mod analysis;
#[cfg(feature = "catalog")]
pub mod catalog;
pub mod compute;
pub mod config;
pub mod error;
pub mod table;

pub use hizone_types as types;

pub use config::{Config, IoConfig};
pub use error::{AlignmentError, HizError, Operation, Result};
pub use table::EntityTable;

pub use compute::spatial::{
    MIN_SSD_COLUMN, PairwiseRelationEngine, RelationKind, RelationResult, RelationValue,
    count_intersections_cross_table, count_intersections_same_table, min_nearest_distance,
};
pub use compute::zones::build_zones;

pub use hizone_types::entity::{Entity, EntityId, GeometryRef};
pub use hizone_types::zone::{Zone, ZoneSelector, ZoneSpec};

pub use geo::{MultiPolygon, Polygon, Rect};

#[cfg(feature = "catalog")]
pub use catalog::{CopyReport, TileCatalog, copy_unique_tiles};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{EntityTable, HizError, Result};

    pub use crate::{Config, IoConfig};

    pub use crate::{Entity, EntityId, ZoneSelector, ZoneSpec};

    pub use crate::{
        PairwiseRelationEngine, RelationResult, RelationValue, count_intersections_cross_table,
        count_intersections_same_table, min_nearest_distance,
    };

    pub use geo::{MultiPolygon, Polygon};
}
