//! # hizone-types
//!
//! Core data types for home ignition zone analysis.
//!
//! - **Entity types**: `EntityId`, `Entity`, `GeometryRef`
//! - **Zone types**: `ZoneSpec`, `Zone`, `ZoneSelector`
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives.
//!
//! ## Examples
//!
//! ```rust
//! use hizone_types::entity::Entity;
//! use hizone_types::zone::ZoneSelector;
//! use geo::polygon;
//!
//! let footprint = polygon![
//!     (x: 0.0, y: 0.0),
//!     (x: 1.0, y: 0.0),
//!     (x: 1.0, y: 1.0),
//!     (x: 0.0, y: 1.0),
//! ];
//! let house = Entity::new("house-1", footprint);
//! assert!(house.geometry(&ZoneSelector::Footprint).is_some());
//! assert!(house.geometry(&ZoneSelector::outer("Z1")).is_none());
//! ```

pub mod entity;
pub mod zone;
