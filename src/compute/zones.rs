//! Home ignition zone construction.
//!
//! The outer edge of zone `k` is the footprint buffered by `distance_k`,
//! measured from the footprint itself. The ring of zone `k` is its outer
//! buffer minus the previous outer buffer (the footprint for the first zone).
//! Each outer buffer is taken from the footprint rather than from the
//! previous zone so arc approximation error does not accumulate.

use crate::config::validate_zone_schedule;
use crate::compute::validation::validate_footprint;
use crate::error::{HizError, Operation, Result};
use geo::{BooleanOps, Buffer, MultiPolygon, Polygon};
use hizone_types::entity::Entity;
use hizone_types::zone::{Zone, ZoneSpec};

/// Build the zones of one footprint.
///
/// The schedule must be valid (see [`validate_zone_schedule`]); an empty
/// schedule yields no zones.
///
/// # Examples
///
/// ```
/// use hizone::compute::zones::build_zones;
/// use hizone_types::zone::ZoneSpec;
/// use geo::polygon;
///
/// let footprint = polygon![
///     (x: 0.0, y: 0.0),
///     (x: 10.0, y: 0.0),
///     (x: 10.0, y: 10.0),
///     (x: 0.0, y: 10.0),
/// ];
/// let schedule = vec![ZoneSpec::new("Z1", 2.0), ZoneSpec::new("Z2", 10.0)];
/// let zones = build_zones(&footprint, &schedule).unwrap();
///
/// assert_eq!(zones.len(), 2);
/// assert_eq!(zones[1].distance, 10.0);
/// ```
pub fn build_zones(footprint: &Polygon<f64>, schedule: &[ZoneSpec]) -> Result<Vec<Zone>> {
    validate_zone_schedule(schedule).map_err(HizError::Configuration)?;
    Ok(build_zones_unchecked(footprint, schedule))
}

/// Build zones for an entity, validating its footprint first.
pub fn zones_for_entity(entity: &Entity, schedule: &[ZoneSpec]) -> Result<Vec<Zone>> {
    validate_zone_schedule(schedule).map_err(HizError::Configuration)?;
    validate_footprint(&entity.id, &entity.footprint, Operation::BuildZones)?;
    Ok(build_zones_unchecked(&entity.footprint, schedule))
}

fn build_zones_unchecked(footprint: &Polygon<f64>, schedule: &[ZoneSpec]) -> Vec<Zone> {
    let mut zones = Vec::with_capacity(schedule.len());
    let mut previous_outer = MultiPolygon::new(vec![footprint.clone()]);

    for spec in schedule {
        let outer = footprint.buffer(spec.distance);
        let ring = outer.difference(&previous_outer);

        zones.push(Zone {
            name: spec.name.clone(),
            distance: spec.distance,
            outer: outer.clone(),
            ring,
        });

        previous_outer = outer;
    }

    zones
}
