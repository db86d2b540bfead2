//! Pairwise relations between the entities of a table.
//!
//! Three query shapes share one footprint index:
//!
//! - intersection counts of each entity's zone against the other footprints
//!   of the same table,
//! - intersection counts of a subject table's zones against the footprints
//!   of this table, aligned by identifier,
//! - distance from each footprint's boundary to the nearest other footprint.
//!
//! Every entity is compared against every other entity exactly as a
//! brute-force double loop would; the index only skips pairs whose envelopes
//! cannot satisfy the predicate. An entity is never compared against itself.
//!
//! Every footprint of the object table is checked when the engine is built.
//! Any query that reads the object table fails with `InvalidGeometry` naming
//! the first invalid row, wherever that footprint lies.

use super::algorithms::{boundary_distance, footprint_intersects};
use super::result::{MIN_SSD_COLUMN, RelationKind, RelationResult, RelationRow, RelationValue};
use super::rtree::FootprintIndex;
use crate::compute::validation::{check_polygon, validate_footprint, validate_geometry};
use crate::error::{AlignmentError, HizError, Operation, Result};
use crate::table::EntityTable;
use geo::{BoundingRect, Rect};
use hizone_types::entity::{Entity, EntityId};
use hizone_types::zone::ZoneSelector;
use smallvec::smallvec;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Relation engine over the footprints of one table.
///
/// # Examples
///
/// ```
/// use hizone::{EntityTable, PairwiseRelationEngine};
/// use hizone_types::entity::Entity;
/// use hizone_types::zone::{ZoneSelector, ZoneSpec};
/// use geo::polygon;
///
/// let square = |x: f64, y: f64| polygon![
///     (x: x, y: y),
///     (x: x + 1.0, y: y),
///     (x: x + 1.0, y: y + 1.0),
///     (x: x, y: y + 1.0),
/// ];
///
/// let mut table = EntityTable::from_entities(vec![
///     Entity::new("a", square(0.0, 0.0)),
///     Entity::new("b", square(0.0, 2.5)),
/// ])?;
/// table.build_zones(&[ZoneSpec::new("Z1", 2.0)])?;
///
/// let engine = PairwiseRelationEngine::new(&table);
/// let counts = engine.count_intersections(&[ZoneSelector::outer("Z1")])?;
/// assert_eq!(counts.get("a", "count_Z1").and_then(|v| v.count()), Some(1));
///
/// let ssd = engine.min_nearest_distance()?;
/// assert_eq!(ssd.get("a", "min_ssd").and_then(|v| v.distance()), Some(1.5));
/// # Ok::<(), hizone::HizError>(())
/// ```
pub struct PairwiseRelationEngine<'a> {
    table: &'a EntityTable,
    index: FootprintIndex,
    /// First object row whose footprint fails validation, with the reason.
    invalid: Option<(EntityId, String)>,
}

impl<'a> PairwiseRelationEngine<'a> {
    /// Build the footprint index for `table` and record its first invalid
    /// footprint, if any.
    pub fn new(table: &'a EntityTable) -> Self {
        let index = FootprintIndex::build(
            table
                .entities()
                .iter()
                .enumerate()
                .map(|(row, entity)| (row, &entity.footprint)),
        );
        let invalid = table.iter().find_map(|entity| {
            check_polygon(&entity.footprint)
                .err()
                .map(|reason| (entity.id.clone(), reason))
        });
        if let Some((id, reason)) = &invalid {
            log::warn!("Footprint of '{}' is invalid: {}", id, reason);
        }
        Self {
            table,
            index,
            invalid,
        }
    }

    pub fn table(&self) -> &'a EntityTable {
        self.table
    }

    /// Count, for every entity and selector, the other footprints of this
    /// table intersecting the selected geometry.
    ///
    /// Returns one column per selector, named by
    /// [`ZoneSelector::column_name`].
    pub fn count_intersections(&self, selectors: &[ZoneSelector]) -> Result<RelationResult> {
        check_selectors(self.table, selectors)?;
        self.check_objects(Operation::CountIntersections)?;

        let rows = self.evaluate(self.table.len(), |row| {
            let mut values = RelationRow::new();
            for selector in selectors {
                let count = self.count_same_table(row, selector)?;
                values.push(RelationValue::Count(count));
            }
            Ok(values)
        })?;

        log::debug!(
            "Counted intersections for {} entities across {} selectors",
            rows.len(),
            selectors.len()
        );

        Ok(RelationResult::new(
            RelationKind::IntersectionCount,
            selectors.iter().map(ZoneSelector::column_name).collect(),
            self.table.ids().cloned().collect(),
            rows,
        ))
    }

    /// Intersection count for a single entity of this table.
    pub fn count_intersections_for(&self, id: &str, selector: &ZoneSelector) -> Result<usize> {
        let row = self.row_of(id)?;
        let entity = self.table.entity(row);
        if entity.geometry(selector).is_none() {
            return Err(unknown_zone(selector, entity));
        }
        self.check_objects(Operation::CountIntersections)?;
        self.count_same_table(row, selector)
    }

    /// Count, for every entity of `subject`, the footprints of this table
    /// that intersect the subject's selected geometry, excluding the
    /// footprint carrying the subject's identifier.
    ///
    /// Every subject identifier must be present in this table; the check
    /// covers the whole subject table before any counting starts.
    pub fn count_cross_table(
        &self,
        subject: &EntityTable,
        selector: &ZoneSelector,
    ) -> Result<RelationResult> {
        let own_rows = subject
            .ids()
            .map(|id| {
                self.table.index_of(id.as_str()).ok_or_else(|| {
                    HizError::from(AlignmentError::MissingIdentifier { id: id.clone() })
                })
            })
            .collect::<Result<Vec<usize>>>()?;

        check_selectors(subject, std::slice::from_ref(selector))?;
        self.check_objects(Operation::CountCrossTable)?;

        let rows = self.evaluate(subject.len(), |subject_row| {
            let entity = subject.entity(subject_row);
            let count = self.count_against(
                entity,
                selector,
                Some(own_rows[subject_row]),
                Operation::CountCrossTable,
            )?;
            Ok(smallvec![RelationValue::Count(count)])
        })?;

        log::debug!(
            "Counted cross-table intersections for {} subjects against {} objects",
            rows.len(),
            self.table.len()
        );

        Ok(RelationResult::new(
            RelationKind::CrossTableCount,
            vec![selector.column_name()],
            subject.ids().cloned().collect(),
            rows,
        ))
    }

    /// Distance from every footprint's boundary to the nearest other
    /// footprint, in table units; `+inf` when the table holds one entity.
    pub fn min_nearest_distance(&self) -> Result<RelationResult> {
        self.check_objects(Operation::NearestDistance)?;
        let rows = self.evaluate(self.table.len(), |row| {
            let distance = self.nearest_distance(row)?;
            Ok(smallvec![RelationValue::Distance(distance)])
        })?;

        Ok(RelationResult::new(
            RelationKind::NearestDistance,
            vec![MIN_SSD_COLUMN.to_string()],
            self.table.ids().cloned().collect(),
            rows,
        ))
    }

    /// Nearest-neighbour distance for a single entity of this table.
    pub fn nearest_distance_for(&self, id: &str) -> Result<f64> {
        let row = self.row_of(id)?;
        self.check_objects(Operation::NearestDistance)?;
        self.nearest_distance(row)
    }

    fn row_of(&self, id: &str) -> Result<usize> {
        self.table
            .index_of(id)
            .ok_or_else(|| HizError::InvalidInput(format!("Unknown entity identifier '{}'", id)))
    }

    fn count_same_table(&self, row: usize, selector: &ZoneSelector) -> Result<usize> {
        let entity = self.table.entity(row);
        validate_footprint(&entity.id, &entity.footprint, Operation::CountIntersections)?;
        self.count_against(entity, selector, Some(row), Operation::CountIntersections)
    }

    /// Count footprints of this table intersecting `subject`'s selected
    /// geometry, skipping `exclude`.
    fn count_against(
        &self,
        subject: &Entity,
        selector: &ZoneSelector,
        exclude: Option<usize>,
        operation: Operation,
    ) -> Result<usize> {
        let geometry = subject
            .geometry(selector)
            .ok_or_else(|| unknown_zone(selector, subject))?;
        validate_geometry(&subject.id, geometry, operation)?;
        let Some(rect) = geometry.bounding_rect() else {
            return Ok(0);
        };

        let mut count = 0;
        for candidate in self.index.candidates(&rect) {
            if Some(candidate) == exclude {
                continue;
            }
            let other = self.table.entity(candidate);
            if footprint_intersects(&other.footprint, geometry) {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Expanding envelope search for the closest other footprint.
    ///
    /// Footprints outside the subject envelope grown by `radius` are farther
    /// than `radius` from the subject boundary, so once the best distance
    /// found is within `radius` no unvisited footprint can beat it.
    fn nearest_distance(&self, row: usize) -> Result<f64> {
        let entity = self.table.entity(row);
        validate_footprint(&entity.id, &entity.footprint, Operation::NearestDistance)?;

        if self.table.len() <= 1 {
            return Ok(f64::INFINITY);
        }

        let Some(rect) = entity.footprint.bounding_rect() else {
            return Ok(f64::INFINITY);
        };
        let mut radius = initial_radius(&rect);

        loop {
            let mut best = f64::INFINITY;
            for candidate in self.index.candidates_within(&rect, radius) {
                if candidate == row {
                    continue;
                }
                let other = self.table.entity(candidate);
                best = best.min(boundary_distance(&entity.footprint, &other.footprint));
            }

            if best <= radius || self.index.covered_by(&rect, radius) {
                return Ok(best);
            }
            radius *= 2.0;
        }
    }

    fn check_objects(&self, operation: Operation) -> Result<()> {
        match &self.invalid {
            Some((id, reason)) => Err(HizError::InvalidGeometry {
                id: id.clone(),
                operation,
                reason: format!("footprint: {}", reason),
            }),
            None => Ok(()),
        }
    }

    /// Evaluate `f` for every row; the first failing row in row order wins.
    #[cfg(not(feature = "parallel"))]
    fn evaluate<F>(&self, len: usize, f: F) -> Result<Vec<RelationRow>>
    where
        F: Fn(usize) -> Result<RelationRow>,
    {
        (0..len).map(f).collect()
    }

    /// Evaluate `f` for every row; the first failing row in row order wins.
    #[cfg(feature = "parallel")]
    fn evaluate<F>(&self, len: usize, f: F) -> Result<Vec<RelationRow>>
    where
        F: Fn(usize) -> Result<RelationRow> + Sync + Send,
    {
        let results: Vec<Result<RelationRow>> = (0..len).into_par_iter().map(f).collect();
        results.into_iter().collect()
    }
}

/// Same-table intersection counts (`structures_per_zone`).
pub fn count_intersections_same_table(
    table: &EntityTable,
    selectors: &[ZoneSelector],
) -> Result<RelationResult> {
    PairwiseRelationEngine::new(table).count_intersections(selectors)
}

/// Cross-table intersection counts (`structures_in_hiz`): zones of `subject`
/// against footprints of `object`.
pub fn count_intersections_cross_table(
    subject: &EntityTable,
    selector: &ZoneSelector,
    object: &EntityTable,
) -> Result<RelationResult> {
    PairwiseRelationEngine::new(object).count_cross_table(subject, selector)
}

/// Minimum structure separation distance (`min_ssd`).
pub fn min_nearest_distance(table: &EntityTable) -> Result<RelationResult> {
    PairwiseRelationEngine::new(table).min_nearest_distance()
}

/// Selectors must be non-empty and every named zone must exist on every
/// subject entity.
fn check_selectors(table: &EntityTable, selectors: &[ZoneSelector]) -> Result<()> {
    if selectors.is_empty() {
        return Err(HizError::Configuration(
            "At least one zone selector is required".to_string(),
        ));
    }
    for selector in selectors {
        if let Some(entity) = table
            .entities()
            .iter()
            .find(|entity| entity.geometry(selector).is_none())
        {
            return Err(unknown_zone(selector, entity));
        }
    }
    Ok(())
}

fn unknown_zone(selector: &ZoneSelector, entity: &Entity) -> HizError {
    HizError::Configuration(format!(
        "Zone '{}' is not defined for entity '{}'",
        selector.zone_name().unwrap_or("footprint"),
        entity.id
    ))
}

fn initial_radius(rect: &Rect<f64>) -> f64 {
    let extent = rect.width().max(rect.height());
    if extent > 0.0 { extent } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AlignmentError;
    use geo::{Polygon, polygon};
    use hizone_types::zone::ZoneSpec;

    fn square(x: f64, y: f64, side: f64) -> Polygon<f64> {
        polygon![
            (x: x, y: y),
            (x: x + side, y: y),
            (x: x + side, y: y + side),
            (x: x, y: y + side),
        ]
    }

    fn zoned(entities: Vec<Entity>) -> EntityTable {
        EntityTable::from_entities(entities)
            .unwrap()
            .with_zones(&[ZoneSpec::new("Z1", 2.0), ZoneSpec::new("Z2", 10.0)])
            .unwrap()
    }

    fn scattered() -> EntityTable {
        let entities = (0..36)
            .map(|i| {
                let x = (i % 6) as f64 * 7.0 + (i % 5) as f64 * 0.9;
                let y = (i / 6) as f64 * 6.0 + (i % 3) as f64 * 1.3;
                Entity::new(format!("s{}", i), square(x, y, 1.0 + (i % 4) as f64 * 0.5))
            })
            .collect();
        zoned(entities)
    }

    #[test]
    fn test_singleton_table() {
        let table = zoned(vec![Entity::new("only", square(0.0, 0.0, 1.0))]);
        let engine = PairwiseRelationEngine::new(&table);

        let counts = engine
            .count_intersections(&[ZoneSelector::Footprint, ZoneSelector::outer("Z2")])
            .unwrap();
        assert_eq!(counts.row("only").unwrap(), &[RelationValue::Count(0), RelationValue::Count(0)]);

        let ssd = engine.min_nearest_distance().unwrap();
        assert_eq!(ssd.get("only", MIN_SSD_COLUMN), Some(RelationValue::Distance(f64::INFINITY)));
    }

    #[test]
    fn test_empty_table() {
        let table = EntityTable::new();
        let ssd = min_nearest_distance(&table).unwrap();
        assert!(ssd.is_empty());
        assert_eq!(ssd.columns(), &[MIN_SSD_COLUMN.to_string()]);
    }

    #[test]
    fn test_self_is_never_counted() {
        // Identical footprints: each sees the other once and never itself
        let table = zoned(vec![
            Entity::new("a", square(0.0, 0.0, 1.0)),
            Entity::new("b", square(0.0, 0.0, 1.0)),
        ]);
        let counts = count_intersections_same_table(&table, &[ZoneSelector::Footprint]).unwrap();
        assert_eq!(counts.get("a", "count_footprint"), Some(RelationValue::Count(1)));
        assert_eq!(counts.get("b", "count_footprint"), Some(RelationValue::Count(1)));

        let ssd = min_nearest_distance(&table).unwrap();
        assert_eq!(ssd.get("a", MIN_SSD_COLUMN), Some(RelationValue::Distance(0.0)));
    }

    #[test]
    fn test_counts_symmetric_for_outer_zones() {
        // 5x5 grid, spacing 6: side neighbours 5 apart, diagonal ones ~7.07
        let entities = (0..25)
            .map(|i| {
                let x = (i % 5) as f64 * 6.0;
                let y = (i / 5) as f64 * 6.0;
                Entity::new(format!("g{}", i), square(x, y, 1.0))
            })
            .collect();
        let table = zoned(entities);
        let engine = PairwiseRelationEngine::new(&table);

        for name in ["Z1", "Z2"] {
            let selector = ZoneSelector::outer(name);
            for a in table.iter() {
                for b in table.iter().filter(|b| b.id != a.id) {
                    let ab = footprint_intersects(&b.footprint, a.geometry(&selector).unwrap());
                    let ba = footprint_intersects(&a.footprint, b.geometry(&selector).unwrap());
                    assert_eq!(ab, ba, "{} vs {} in {}", a.id, b.id, name);
                }
            }
        }

        let counts = engine
            .count_intersections(&[ZoneSelector::outer("Z1"), ZoneSelector::outer("Z2")])
            .unwrap();
        assert_eq!(counts.get("g12", "count_Z1"), Some(RelationValue::Count(0)));
        assert_eq!(counts.get("g12", "count_Z2"), Some(RelationValue::Count(8)));
        assert_eq!(counts.get("g0", "count_Z2"), Some(RelationValue::Count(3)));
    }

    #[test]
    fn test_counts_match_brute_force() {
        let table = scattered();
        let selectors = [
            ZoneSelector::Footprint,
            ZoneSelector::outer("Z1"),
            ZoneSelector::ring("Z2"),
        ];
        let counts = count_intersections_same_table(&table, &selectors).unwrap();

        for entity in table.iter() {
            for selector in &selectors {
                let geometry = entity.geometry(selector).unwrap();
                let expected = table
                    .iter()
                    .filter(|other| other.id != entity.id)
                    .filter(|other| footprint_intersects(&other.footprint, geometry))
                    .count();
                assert_eq!(
                    counts.get(entity.id.as_str(), &selector.column_name()),
                    Some(RelationValue::Count(expected))
                );
            }
        }
    }

    #[test]
    fn test_nearest_matches_brute_force() {
        let table = scattered();
        let ssd = min_nearest_distance(&table).unwrap();

        for entity in table.iter() {
            let expected = table
                .iter()
                .filter(|other| other.id != entity.id)
                .map(|other| boundary_distance(&entity.footprint, &other.footprint))
                .fold(f64::INFINITY, f64::min);
            let actual = ssd.get(entity.id.as_str(), MIN_SSD_COLUMN).unwrap().distance().unwrap();
            assert_eq!(actual, expected, "entity {}", entity.id);
        }
    }

    #[test]
    fn test_nearest_across_wide_gaps() {
        // Neighbour far beyond the initial search radius
        let table = zoned(vec![
            Entity::new("a", square(0.0, 0.0, 1.0)),
            Entity::new("b", square(500.0, 0.0, 1.0)),
            Entity::new("c", square(503.0, 0.0, 1.0)),
        ]);
        let engine = PairwiseRelationEngine::new(&table);
        assert_eq!(engine.nearest_distance_for("a").unwrap(), 499.0);
        assert_eq!(engine.nearest_distance_for("b").unwrap(), 2.0);
        assert!(engine.nearest_distance_for("zzz").is_err());
    }

    #[test]
    fn test_repeated_queries_are_identical() {
        let table = scattered();
        let engine = PairwiseRelationEngine::new(&table);
        let selectors = [ZoneSelector::outer("Z2")];
        assert_eq!(
            engine.count_intersections(&selectors).unwrap(),
            engine.count_intersections(&selectors).unwrap()
        );
        assert_eq!(
            engine.min_nearest_distance().unwrap(),
            PairwiseRelationEngine::new(&table).min_nearest_distance().unwrap()
        );
    }

    #[test]
    fn test_single_row_matches_table_query() {
        let table = scattered();
        let engine = PairwiseRelationEngine::new(&table);
        let selector = ZoneSelector::outer("Z1");
        let counts = engine.count_intersections(std::slice::from_ref(&selector)).unwrap();
        for id in table.ids() {
            assert_eq!(
                counts.get(id.as_str(), "count_Z1").and_then(|v| v.count()),
                Some(engine.count_intersections_for(id.as_str(), &selector).unwrap())
            );
        }
    }

    #[test]
    fn test_unknown_zone_is_configuration_error() {
        let table = zoned(vec![
            Entity::new("a", square(0.0, 0.0, 1.0)),
            Entity::new("b", square(3.0, 0.0, 1.0)),
        ]);
        let engine = PairwiseRelationEngine::new(&table);
        assert!(matches!(
            engine.count_intersections(&[ZoneSelector::outer("Z9")]),
            Err(HizError::Configuration(_))
        ));
        assert!(matches!(
            engine.count_intersections(&[]),
            Err(HizError::Configuration(_))
        ));
        assert!(matches!(
            engine.count_intersections_for("a", &ZoneSelector::ring("Z9")),
            Err(HizError::Configuration(_))
        ));
    }

    #[test]
    fn test_invalid_subject_footprint() {
        let table = EntityTable::from_entities(vec![
            Entity::new("a", square(0.0, 0.0, 1.0)),
            Entity::new("flat", polygon![(x: 5.0, y: 0.0), (x: 6.0, y: 0.0), (x: 7.0, y: 0.0)]),
        ])
        .unwrap();

        let err = min_nearest_distance(&table).unwrap_err();
        match err {
            HizError::InvalidGeometry { id, operation, .. } => {
                assert_eq!(id.as_str(), "flat");
                assert_eq!(operation, Operation::NearestDistance);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = count_intersections_same_table(&table, &[ZoneSelector::Footprint]).unwrap_err();
        assert_eq!(err.entity_id().map(|id| id.as_str()), Some("flat"));
    }

    #[test]
    fn test_first_invalid_row_reported() {
        let empty = Polygon::new(geo::LineString::new(vec![]), vec![]);
        let table = EntityTable::from_entities(vec![
            Entity::new("a", square(0.0, 0.0, 1.0)),
            Entity::new("bad1", empty.clone()),
            Entity::new("bad2", empty),
        ])
        .unwrap();
        let err = min_nearest_distance(&table).unwrap_err();
        assert_eq!(err.entity_id().map(|id| id.as_str()), Some("bad1"));
    }

    #[test]
    fn test_zero_area_footprint_far_from_subject() {
        // Collinear footprint well outside every query envelope
        let table = zoned(vec![
            Entity::new("a", square(0.0, 0.0, 1.0)),
            Entity::new("b", square(2.0, 0.0, 1.0)),
        ]);
        let mut entities: Vec<Entity> = table.iter().cloned().collect();
        entities.push(Entity::new(
            "flat_far",
            polygon![(x: 500.0, y: 0.0), (x: 500.0, y: 1.0), (x: 500.0, y: 2.0)],
        ));
        let table = EntityTable::from_entities(entities).unwrap();
        let engine = PairwiseRelationEngine::new(&table);

        let err = engine
            .count_intersections_for("a", &ZoneSelector::outer("Z1"))
            .unwrap_err();
        assert_eq!(err.entity_id().map(|id| id.as_str()), Some("flat_far"));

        match engine.nearest_distance_for("a").unwrap_err() {
            HizError::InvalidGeometry { id, operation, reason } => {
                assert_eq!(id.as_str(), "flat_far");
                assert_eq!(operation, Operation::NearestDistance);
                assert!(reason.contains("zero area"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = engine.count_intersections(&[ZoneSelector::Footprint]).unwrap_err();
        assert_eq!(err.entity_id().map(|id| id.as_str()), Some("flat_far"));
        let err = engine.min_nearest_distance().unwrap_err();
        assert_eq!(err.entity_id().map(|id| id.as_str()), Some("flat_far"));
    }

    #[test]
    fn test_cross_table_degenerate_objects() {
        let subjects = zoned(vec![Entity::new("a", square(0.0, 0.0, 1.0))]);
        let objects = EntityTable::from_entities(vec![
            Entity::new("a", square(0.0, 0.0, 1.0)),
            Entity::new("b", square(2.0, 0.0, 1.0)),
            Entity::new("empty", Polygon::new(geo::LineString::new(vec![]), vec![])),
            Entity::new(
                "flat_far",
                polygon![(x: 500.0, y: 0.0), (x: 501.0, y: 0.0), (x: 502.0, y: 0.0)],
            ),
        ])
        .unwrap();

        match count_intersections_cross_table(&subjects, &ZoneSelector::outer("Z1"), &objects)
            .unwrap_err()
        {
            HizError::InvalidGeometry { id, operation, .. } => {
                assert_eq!(id.as_str(), "empty");
                assert_eq!(operation, Operation::CountCrossTable);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let engine = PairwiseRelationEngine::new(&objects);
        let err = engine.nearest_distance_for("a").unwrap_err();
        assert_eq!(err.entity_id().map(|id| id.as_str()), Some("empty"));
        let err = engine.count_intersections_for("b", &ZoneSelector::Footprint).unwrap_err();
        assert_eq!(err.entity_id().map(|id| id.as_str()), Some("empty"));
    }

    #[test]
    fn test_cross_table_counts() {
        let objects = zoned(vec![
            Entity::new("a", square(0.0, 0.0, 1.0)),
            Entity::new("b", square(2.0, 0.0, 1.0)),
            Entity::new("c", square(30.0, 0.0, 1.0)),
        ]);
        let subjects = objects.without("c");

        let result =
            count_intersections_cross_table(&subjects, &ZoneSelector::outer("Z1"), &objects)
                .unwrap();
        assert_eq!(result.kind(), RelationKind::CrossTableCount);
        assert_eq!(result.len(), 2);
        assert_eq!(result.get("a", "count_Z1"), Some(RelationValue::Count(1)));
        assert_eq!(result.get("b", "count_Z1"), Some(RelationValue::Count(1)));
        assert_eq!(result.get("c", "count_Z1"), None);
    }

    #[test]
    fn test_cross_table_missing_identifier() {
        let objects = zoned(vec![
            Entity::new("a", square(0.0, 0.0, 1.0)),
            Entity::new("b", square(2.0, 0.0, 1.0)),
        ]);
        let subjects = zoned(vec![
            Entity::new("a", square(0.0, 0.0, 1.0)),
            Entity::new("x", square(2.0, 0.0, 1.0)),
        ]);

        let err = count_intersections_cross_table(&subjects, &ZoneSelector::outer("Z1"), &objects)
            .unwrap_err();
        assert!(matches!(
            err,
            HizError::Alignment(AlignmentError::MissingIdentifier { ref id }) if id.as_str() == "x"
        ));
    }
}
