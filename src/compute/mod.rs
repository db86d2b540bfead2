//! Relation engine, zone construction, validation, raster helpers and GeoJSON conversion.

#[cfg(feature = "geojson")]
pub mod geojson;
pub mod raster;
pub mod spatial;
pub mod validation;
pub mod zones;
