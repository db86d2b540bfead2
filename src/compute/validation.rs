//! Validation for footprint and zone geometries.

use crate::error::{HizError, Operation, Result};
use geo::{Area, Polygon};
use hizone_types::entity::{EntityId, GeometryRef};

/// Checks that a polygon is usable by the geometry predicates.
///
/// Rejects empty exteriors, rings with fewer than four coordinates,
/// non-finite coordinates and polygons with zero area. Returns the reason
/// as a plain message so callers can attach entity context.
///
/// # Examples
///
/// ```
/// use hizone::compute::validation::check_polygon;
/// use geo::{polygon, LineString, Polygon};
///
/// let square = polygon![
///     (x: 0.0, y: 0.0),
///     (x: 1.0, y: 0.0),
///     (x: 1.0, y: 1.0),
///     (x: 0.0, y: 1.0),
/// ];
/// assert!(check_polygon(&square).is_ok());
///
/// let empty = Polygon::new(LineString::new(vec![]), vec![]);
/// assert!(check_polygon(&empty).is_err());
/// ```
pub fn check_polygon(polygon: &Polygon<f64>) -> std::result::Result<(), String> {
    let exterior = polygon.exterior();
    if exterior.0.is_empty() {
        return Err("polygon is empty".to_string());
    }

    if exterior.0.len() < 4 {
        return Err(format!(
            "exterior ring has {} coordinates, at least 4 required",
            exterior.0.len()
        ));
    }

    let rings = std::iter::once(exterior).chain(polygon.interiors());
    for (ring_idx, ring) in rings.enumerate() {
        for (idx, coord) in ring.coords().enumerate() {
            if !coord.x.is_finite() || !coord.y.is_finite() {
                return Err(format!(
                    "ring {} coordinate {} is not finite: ({}, {})",
                    ring_idx, idx, coord.x, coord.y
                ));
            }
        }
    }

    let area = polygon.unsigned_area();
    if area <= 0.0 || !area.is_finite() {
        return Err("polygon has zero area".to_string());
    }

    Ok(())
}

/// Validates an entity footprint, naming the entity on failure.
pub fn validate_footprint(
    id: &EntityId,
    footprint: &Polygon<f64>,
    operation: Operation,
) -> Result<()> {
    check_polygon(footprint).map_err(|reason| HizError::InvalidGeometry {
        id: id.clone(),
        operation,
        reason: format!("footprint: {}", reason),
    })
}

/// Validates a selected geometry (footprint, zone outer or ring).
///
/// A multipolygon must hold at least one polygon and every member must pass
/// [`check_polygon`].
pub fn validate_geometry(id: &EntityId, geometry: GeometryRef<'_>, operation: Operation) -> Result<()> {
    let invalid = |reason: String| HizError::InvalidGeometry {
        id: id.clone(),
        operation,
        reason,
    };

    match geometry {
        GeometryRef::Polygon(polygon) => check_polygon(polygon).map_err(invalid),
        GeometryRef::MultiPolygon(multi) => {
            if multi.0.is_empty() {
                return Err(invalid("zone geometry is empty".to_string()));
            }
            for (idx, polygon) in multi.0.iter().enumerate() {
                check_polygon(polygon)
                    .map_err(|reason| invalid(format!("zone part {}: {}", idx, reason)))?;
            }
            Ok(())
        }
    }
}
