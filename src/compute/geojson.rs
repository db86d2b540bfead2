//! GeoJSON conversion for footprints and entity tables.

use crate::error::{HizError, Result};
use crate::table::EntityTable;
use geo::{Coord, LineString, Polygon};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value, feature};
use hizone_types::entity::{Entity, EntityId};
use serde_json::Number;
use std::path::Path;

/// Converts a Polygon to a GeoJSON geometry string.
pub fn polygon_to_geojson(polygon: &Polygon<f64>) -> Result<String> {
    let geom = polygon_geometry(polygon);
    serde_json::to_string(&geom)
        .map_err(|e| HizError::Serialization(format!("Failed to serialize polygon: {}", e)))
}

/// Parses a GeoJSON geometry string into a Polygon.
pub fn polygon_from_geojson(geojson: &str) -> Result<Polygon<f64>> {
    let geom: Geometry = serde_json::from_str(geojson)
        .map_err(|e| HizError::InvalidInput(format!("Failed to parse GeoJSON: {}", e)))?;
    polygon_from_value(geom.value)
}

/// Reads a FeatureCollection of polygon features into a table.
///
/// The identifier is taken from the `id_property` property (string or
/// number), falling back to the feature id. Other numeric properties become
/// attribute columns.
///
/// # Examples
///
/// ```
/// use hizone::compute::geojson::table_from_geojson;
///
/// let json = r#"{
///     "type": "FeatureCollection",
///     "features": [{
///         "type": "Feature",
///         "properties": { "bldg": 7, "height": 4.5 },
///         "geometry": {
///             "type": "Polygon",
///             "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]]
///         }
///     }]
/// }"#;
///
/// let table = table_from_geojson(json, "bldg").unwrap();
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.value("7", "height"), Some(4.5));
/// ```
pub fn table_from_geojson(geojson: &str, id_property: &str) -> Result<EntityTable> {
    let collection: FeatureCollection = serde_json::from_str(geojson)
        .map_err(|e| HizError::InvalidInput(format!("Failed to parse FeatureCollection: {}", e)))?;

    let mut table = EntityTable::new();
    let mut attributes: Vec<(EntityId, String, f64)> = Vec::new();

    for (idx, feature) in collection.features.into_iter().enumerate() {
        let id = feature_id(&feature, id_property)
            .ok_or_else(|| HizError::InvalidInput(format!(
                "Feature at index {} has no '{}' property or feature id",
                idx, id_property
            )))?;

        let geometry = feature
            .geometry
            .ok_or_else(|| HizError::InvalidInput(format!("Feature '{}' has no geometry", id)))?;
        let footprint = polygon_from_value(geometry.value).map_err(|e| {
            HizError::InvalidInput(format!("Feature '{}': {}", id, e))
        })?;

        if let Some(properties) = feature.properties {
            for (name, value) in properties {
                if name == id_property {
                    continue;
                }
                if let Some(number) = value.as_f64() {
                    attributes.push((id.clone(), name, number));
                }
            }
        }

        table.push(Entity::new(id, footprint))?;
    }

    let mut columns: Vec<(String, Vec<(EntityId, f64)>)> = Vec::new();
    for (id, name, value) in attributes {
        match columns.iter_mut().find(|(column, _)| *column == name) {
            Some((_, values)) => values.push((id, value)),
            None => columns.push((name, vec![(id, value)])),
        }
    }
    for (name, values) in columns {
        table.set_column(name, values.iter().map(|(id, value)| (id, *value)))?;
    }

    log::debug!("Loaded {} footprints from GeoJSON", table.len());
    Ok(table)
}

/// Writes a table as a FeatureCollection of footprints.
///
/// Attribute columns become numeric properties; non-finite values (no
/// neighbour, no value) are written as `null`. An identifier written in
/// canonical integer form (`101`, `-3`, but not `007`) is written back as a
/// JSON number, any other identifier as a string, so integer ids read by
/// [`table_from_geojson`] keep their type.
pub fn table_to_geojson(table: &EntityTable, id_property: &str) -> Result<String> {
    let column_names: Vec<&str> = table.column_names().collect();

    let features = table
        .iter()
        .enumerate()
        .map(|(row, entity)| {
            let mut properties = JsonObject::new();
            properties.insert(id_property.to_string(), id_value(&entity.id));
            for name in &column_names {
                let value = table
                    .column(name)
                    .and_then(|values| Number::from_f64(values[row]))
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null);
                properties.insert(name.to_string(), value);
            }

            Feature {
                bbox: None,
                geometry: Some(polygon_geometry(&entity.footprint)),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };

    serde_json::to_string(&collection)
        .map_err(|e| HizError::Serialization(format!("Failed to serialize table: {}", e)))
}

/// Reads a GeoJSON file into a table.
pub fn read_table<P: AsRef<Path>>(path: P, id_property: &str) -> Result<EntityTable> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    table_from_geojson(&contents, id_property)
}

/// Writes a table to a GeoJSON file, replacing any existing file.
pub fn write_table<P: AsRef<Path>>(table: &EntityTable, path: P, id_property: &str) -> Result<()> {
    let contents = table_to_geojson(table, id_property)?;
    std::fs::write(path.as_ref(), contents)?;
    Ok(())
}

fn feature_id(feature: &Feature, id_property: &str) -> Option<EntityId> {
    let from_property = feature
        .properties
        .as_ref()
        .and_then(|properties| properties.get(id_property))
        .and_then(json_id);

    from_property.or_else(|| match &feature.id {
        Some(feature::Id::String(id)) => Some(EntityId::new(id.clone())),
        Some(feature::Id::Number(number)) => Some(EntityId::new(number.to_string())),
        None => None,
    })
}

fn json_id(value: &serde_json::Value) -> Option<EntityId> {
    match value {
        serde_json::Value::String(id) => Some(EntityId::new(id.clone())),
        serde_json::Value::Number(number) => Some(EntityId::new(number.to_string())),
        _ => None,
    }
}

fn id_value(id: &EntityId) -> serde_json::Value {
    let text = id.as_str();
    let number = text
        .parse::<i64>()
        .ok()
        .filter(|n| n.to_string() == text)
        .map(Number::from)
        .or_else(|| {
            text.parse::<u64>()
                .ok()
                .filter(|n| n.to_string() == text)
                .map(Number::from)
        });
    match number {
        Some(number) => serde_json::Value::Number(number),
        None => serde_json::Value::String(text.to_string()),
    }
}

fn polygon_geometry(polygon: &Polygon<f64>) -> Geometry {
    let mut rings = Vec::with_capacity(1 + polygon.interiors().len());
    rings.push(ring_positions(polygon.exterior()));
    for interior in polygon.interiors() {
        rings.push(ring_positions(interior));
    }
    Geometry::new(Value::Polygon(rings))
}

fn ring_positions(ring: &LineString<f64>) -> Vec<Vec<f64>> {
    ring.coords().map(|coord| vec![coord.x, coord.y]).collect()
}

fn polygon_from_value(value: Value) -> Result<Polygon<f64>> {
    let rings = match value {
        Value::Polygon(rings) => rings,
        Value::MultiPolygon(mut polygons) if polygons.len() == 1 => polygons.remove(0),
        _ => {
            return Err(HizError::InvalidInput(
                "GeoJSON geometry is not a Polygon".to_string(),
            ));
        }
    };

    let mut rings = rings.into_iter();
    let exterior = rings.next().ok_or_else(|| {
        HizError::InvalidInput("Polygon must have at least one ring".to_string())
    })?;

    let exterior = parse_ring(exterior)?;
    let interiors = rings.map(parse_ring).collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn parse_ring(positions: Vec<Vec<f64>>) -> Result<LineString<f64>> {
    let coords = positions
        .into_iter()
        .map(|position| {
            if position.len() < 2 {
                return Err(HizError::InvalidInput(
                    "Coordinate must have at least 2 values".to_string(),
                ));
            }
            Ok(Coord {
                x: position[0],
                y: position[1],
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(LineString::from(coords))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    #[test]
    fn test_polygon_geojson_roundtrip() {
        let poly = polygon![
            (x: 0.0, y: 0.0),
            (x: 3.0, y: 0.0),
            (x: 3.0, y: 2.0),
            (x: 0.0, y: 2.0),
        ];
        let json = polygon_to_geojson(&poly).unwrap();
        assert_eq!(polygon_from_geojson(&json).unwrap(), poly);
    }

    #[test]
    fn test_rejects_non_polygon() {
        let point = r#"{ "type": "Point", "coordinates": [1.0, 2.0] }"#;
        assert!(polygon_from_geojson(point).is_err());
    }

    #[test]
    fn test_integer_ids_written_as_numbers() {
        assert_eq!(id_value(&EntityId::new("101")), serde_json::json!(101));
        assert_eq!(id_value(&EntityId::new("-3")), serde_json::json!(-3));
        assert_eq!(
            id_value(&EntityId::new("18446744073709551615")),
            serde_json::json!(u64::MAX)
        );
        assert_eq!(id_value(&EntityId::new("007")), serde_json::json!("007"));
        assert_eq!(id_value(&EntityId::new("1.5")), serde_json::json!("1.5"));
        assert_eq!(id_value(&EntityId::new("shed-7")), serde_json::json!("shed-7"));
    }

    #[test]
    fn test_feature_id_fallback() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "id": "fid-1",
                "properties": {},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]]
                }
            }]
        }"#;
        let table = table_from_geojson(json, "bldg").unwrap();
        assert!(table.get("fid-1").is_some());
    }

    #[test]
    fn test_missing_identifier() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "height": 3 },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]]
                }
            }]
        }"#;
        assert!(matches!(
            table_from_geojson(json, "id"),
            Err(HizError::InvalidInput(_))
        ));
    }
}
