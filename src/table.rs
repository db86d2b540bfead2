//! Identifier-indexed table of structures with derived attribute columns.

use crate::compute::spatial::algorithms::{combined_bounds, union_polygons};
use crate::compute::spatial::result::RelationResult;
use crate::compute::validation::validate_footprint;
use crate::compute::zones::zones_for_entity;
use crate::config::validate_zone_schedule;
use crate::error::{AlignmentError, HizError, Operation, Result};
use geo::{MultiPolygon, Rect};
use hizone_types::entity::{Entity, EntityId};
use hizone_types::zone::{Zone, ZoneSpec};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

/// Ordered collection of entities sharing one coordinate system.
///
/// Identifiers are unique. Attribute columns hold one `f64` per row; rows a
/// column has no value for hold `NaN`.
#[derive(Debug, Clone, Default)]
pub struct EntityTable {
    entities: Vec<Entity>,
    index: FxHashMap<EntityId, usize>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl EntityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table, rejecting duplicate identifiers.
    pub fn from_entities(entities: impl IntoIterator<Item = Entity>) -> Result<Self> {
        let mut table = Self::new();
        for entity in entities {
            table.push(entity)?;
        }
        Ok(table)
    }

    /// Append an entity. Fails with a duplicate-identifier alignment error
    /// when the id is already present.
    pub fn push(&mut self, entity: Entity) -> Result<()> {
        if self.index.contains_key(&entity.id) {
            return Err(AlignmentError::DuplicateIdentifier { id: entity.id }.into());
        }
        self.index.insert(entity.id.clone(), self.entities.len());
        self.entities.push(entity);
        for values in self.columns.values_mut() {
            values.push(f64::NAN);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &EntityId> {
        self.entities.iter().map(|entity| &entity.id)
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.index_of(id).map(|row| &self.entities[row])
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Entity at `row`. Panics when out of range.
    pub fn entity(&self, row: usize) -> &Entity {
        &self.entities[row]
    }

    /// Remove a row by identifier, with its column values.
    pub fn remove(&mut self, id: &str) -> Option<Entity> {
        let row = self.index.remove(id)?;
        let entity = self.entities.remove(row);
        for values in self.columns.values_mut() {
            values.remove(row);
        }
        for position in self.index.values_mut() {
            if *position > row {
                *position -= 1;
            }
        }
        Some(entity)
    }

    /// Copy of this table without the row carrying `id`.
    pub fn without(&self, id: &str) -> Self {
        let mut table = self.clone();
        table.remove(id);
        table
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(|values| values.as_slice())
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|name| name.as_str())
    }

    pub fn value(&self, id: &str, column: &str) -> Option<f64> {
        let row = self.index_of(id)?;
        self.columns.get(column).map(|values| values[row])
    }

    /// Insert a column from `(id, value)` pairs, replacing any column of the
    /// same name. Rows without a value get `NaN`.
    pub fn set_column<'i>(
        &mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = (&'i EntityId, f64)>,
    ) -> Result<()> {
        let mut column = vec![f64::NAN; self.entities.len()];
        for (id, value) in values {
            let row = self
                .index_of(id.as_str())
                .ok_or_else(|| AlignmentError::MissingIdentifier { id: id.clone() })?;
            column[row] = value;
        }
        self.columns.insert(name.into(), column);
        Ok(())
    }

    /// Attach every column of a relation result, overwriting columns of the
    /// same name. Nothing is written when an id is missing from this table.
    pub fn attach(&mut self, result: &RelationResult) -> Result<()> {
        let mut rows = Vec::with_capacity(result.len());
        for id in result.ids() {
            let row = self
                .index_of(id.as_str())
                .ok_or_else(|| AlignmentError::MissingIdentifier { id: id.clone() })?;
            rows.push(row);
        }

        for (col, name) in result.columns().iter().enumerate() {
            let mut column = vec![f64::NAN; self.entities.len()];
            for (&row, (_, values)) in rows.iter().zip(result.iter()) {
                column[row] = values[col].as_f64();
            }
            self.columns.insert(name.clone(), column);
        }
        Ok(())
    }

    /// Build the zones of every entity from `schedule`, replacing any zones
    /// they carried. The table is left untouched on error.
    pub fn build_zones(&mut self, schedule: &[ZoneSpec]) -> Result<()> {
        validate_zone_schedule(schedule).map_err(HizError::Configuration)?;

        let zones = self
            .entities
            .iter()
            .map(|entity| zones_for_entity(entity, schedule))
            .collect::<Result<Vec<_>>>()?;

        for (entity, zones) in self.entities.iter_mut().zip(zones) {
            entity.zones = zones;
        }
        log::debug!(
            "Built {} zones for {} entities",
            schedule.len(),
            self.entities.len()
        );
        Ok(())
    }

    /// Builder-style variant of [`EntityTable::build_zones`].
    pub fn with_zones(mut self, schedule: &[ZoneSpec]) -> Result<Self> {
        self.build_zones(schedule)?;
        Ok(self)
    }

    /// Zones for one entity, built without touching the table.
    pub fn zones_of(&self, id: &str, schedule: &[ZoneSpec]) -> Result<Vec<Zone>> {
        let entity = self
            .get(id)
            .ok_or_else(|| HizError::InvalidInput(format!("Unknown entity identifier '{}'", id)))?;
        zones_for_entity(entity, schedule)
    }

    /// Bounding box of all footprints.
    pub fn total_bounds(&self) -> Result<Rect<f64>> {
        combined_bounds(self.entities.iter().map(|entity| &entity.footprint))
            .ok_or_else(|| HizError::InvalidInput("Table has no footprints to bound".to_string()))
    }

    /// Union of all footprints into one coverage geometry.
    pub fn footprint_union(&self) -> Result<MultiPolygon<f64>> {
        for entity in &self.entities {
            validate_footprint(&entity.id, &entity.footprint, Operation::Coverage)?;
        }
        if self.entities.is_empty() {
            return Err(HizError::InvalidInput(
                "Table has no footprints to union".to_string(),
            ));
        }
        Ok(union_polygons(self.entities.iter().map(|entity| &entity.footprint)))
    }
}
