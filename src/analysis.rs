//! End-to-end zone analysis of a footprint table driven by a [`Config`].

use crate::compute::raster::{RasterProfile, rasterize};
use crate::compute::spatial::relations::PairwiseRelationEngine;
use crate::config::Config;
use crate::error::{HizError, Result};
use crate::table::EntityTable;
use hizone_types::zone::ZoneSelector;
use ndarray::Array2;

/// Selectors for every zone of the schedule: each outer zone, then each ring.
pub fn zone_selectors(config: &Config) -> Vec<ZoneSelector> {
    config
        .zones
        .iter()
        .map(|spec| ZoneSelector::outer(spec.name.clone()))
        .chain(config.zones.iter().map(|spec| ZoneSelector::ring(spec.name.clone())))
        .collect()
}

/// Build zones for every entity and attach the same-table intersection
/// counts of each outer zone and ring plus the `min_ssd` column.
///
/// The table is left untouched when any step fails.
///
/// # Examples
///
/// ```
/// use hizone::{Config, EntityTable, analysis::annotate};
/// use hizone_types::entity::Entity;
/// use geo::polygon;
///
/// let square = |x: f64| polygon![
///     (x: x, y: 0.0),
///     (x: x + 1.0, y: 0.0),
///     (x: x + 1.0, y: 1.0),
///     (x: x, y: 1.0),
/// ];
/// let mut table = EntityTable::from_entities(vec![
///     Entity::new("a", square(0.0)),
///     Entity::new("b", square(5.0)),
/// ])?;
///
/// annotate(&mut table, &Config::default())?;
/// assert_eq!(table.value("a", "count_Z1"), Some(0.0));
/// assert_eq!(table.value("a", "count_Z2"), Some(1.0));
/// assert_eq!(table.value("a", "min_ssd"), Some(4.0));
/// # Ok::<(), hizone::HizError>(())
/// ```
pub fn annotate(table: &mut EntityTable, config: &Config) -> Result<()> {
    config.validate().map_err(HizError::Configuration)?;

    let zoned = table.clone().with_zones(&config.zones)?;
    let (counts, ssd) = {
        let engine = PairwiseRelationEngine::new(&zoned);
        (
            engine.count_intersections(&zone_selectors(config))?,
            engine.min_nearest_distance()?,
        )
    };

    let mut annotated = zoned;
    annotated.attach(&counts)?;
    annotated.attach(&ssd)?;
    *table = annotated;

    log::info!(
        "Annotated {} structures with {} zones",
        table.len(),
        config.zones.len()
    );
    Ok(())
}

/// Footprint coverage of the whole table at `config.resolution`: 1 where a
/// cell centre falls on a structure, 0 elsewhere.
pub fn coverage_raster(table: &EntityTable, config: &Config, nodata: u8) -> Result<(RasterProfile, Array2<u8>)> {
    config.validate().map_err(HizError::Configuration)?;
    let profile = RasterProfile::from_table(table, config.resolution, nodata)?;
    let grid = rasterize(table.iter().map(|entity| &entity.footprint), &profile, None)?;
    Ok((profile, grid))
}

/// Read the footprints named by `config.io`, annotate them and write the
/// result to the configured output path.
#[cfg(feature = "geojson")]
pub fn run(config: &Config) -> Result<EntityTable> {
    use crate::compute::geojson::{read_table, write_table};

    let input = config.io.footprints_path.as_ref().ok_or_else(|| {
        HizError::Configuration("No footprints path configured".to_string())
    })?;

    let mut table = read_table(input, &config.io.id_property)?;
    annotate(&mut table, config)?;

    if let Some(output) = &config.io.output_path {
        write_table(&table, output, &config.io.id_property)?;
        log::info!("Wrote {} structures to {}", table.len(), output.display());
    }
    Ok(table)
}
