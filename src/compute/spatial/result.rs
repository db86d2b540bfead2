//! Relation results keyed by entity identifier.

use hizone_types::entity::EntityId;
use rustc_hash::FxHashMap;
use serde::Serialize;
use smallvec::SmallVec;

/// Column name of the nearest-neighbour separation distance.
pub const MIN_SSD_COLUMN: &str = "min_ssd";

/// Which relation produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    IntersectionCount,
    CrossTableCount,
    NearestDistance,
}

/// One scalar of a relation result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationValue {
    Count(usize),
    /// `f64::INFINITY` when the entity has no neighbour.
    Distance(f64),
}

impl RelationValue {
    pub fn as_f64(&self) -> f64 {
        match *self {
            RelationValue::Count(count) => count as f64,
            RelationValue::Distance(distance) => distance,
        }
    }

    pub fn count(&self) -> Option<usize> {
        match *self {
            RelationValue::Count(count) => Some(count),
            RelationValue::Distance(_) => None,
        }
    }

    pub fn distance(&self) -> Option<f64> {
        match *self {
            RelationValue::Distance(distance) => Some(distance),
            RelationValue::Count(_) => None,
        }
    }
}

pub(crate) type RelationRow = SmallVec<[RelationValue; 4]>;

/// Per-entity scalars produced by one relation query.
///
/// Rows follow the order of the subject table. Each row holds one value per
/// column.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationResult {
    kind: RelationKind,
    columns: Vec<String>,
    ids: Vec<EntityId>,
    rows: Vec<RelationRow>,
    positions: FxHashMap<EntityId, usize>,
}

impl RelationResult {
    pub(crate) fn new(
        kind: RelationKind,
        columns: Vec<String>,
        ids: Vec<EntityId>,
        rows: Vec<RelationRow>,
    ) -> Self {
        debug_assert_eq!(ids.len(), rows.len());
        let positions = ids
            .iter()
            .enumerate()
            .map(|(pos, id)| (id.clone(), pos))
            .collect();
        Self {
            kind,
            columns,
            ids,
            rows,
            positions,
        }
    }

    pub fn kind(&self) -> RelationKind {
        self.kind
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    /// All values for one entity, in column order.
    pub fn row(&self, id: &str) -> Option<&[RelationValue]> {
        self.positions.get(id).map(|&pos| self.rows[pos].as_slice())
    }

    pub fn get(&self, id: &str, column: &str) -> Option<RelationValue> {
        let col = self.columns.iter().position(|name| name == column)?;
        self.row(id).map(|row| row[col])
    }

    /// Iterate `(id, values)` pairs in subject order.
    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &[RelationValue])> {
        self.ids
            .iter()
            .zip(self.rows.iter().map(|row| row.as_slice()))
    }
}
