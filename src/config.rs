//! Configuration for zone construction and table I/O.
//!
//! Every distance and location the analysis depends on is supplied here by
//! the caller; nothing in the relation engine is hardcoded.
use hizone_types::zone::ZoneSpec;
use serde::de::Error;
use std::path::PathBuf;

/// Analysis configuration
///
/// # Example
///
/// ```rust
/// use hizone::Config;
///
/// let config = Config::from_json(r#"{
///     "zones": [
///         { "name": "Z1", "distance": 1.5 },
///         { "name": "Z2", "distance": 9.0 }
///     ]
/// }"#).unwrap();
///
/// assert_eq!(config.zones.len(), 2);
/// assert_eq!(config.io.id_property, "id");
/// ```
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Zone schedule, ordered by increasing distance from the footprint
    #[serde(default = "Config::default_zones")]
    pub zones: Vec<ZoneSpec>,

    /// Cell size used when building raster profiles from a table
    #[serde(default = "Config::default_resolution")]
    pub resolution: f64,

    #[serde(default)]
    pub io: IoConfig,
}

/// Input and output locations for table I/O
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoConfig {
    /// Feature property holding the structure identifier
    #[serde(default = "IoConfig::default_id_property")]
    pub id_property: String,

    #[serde(default)]
    pub footprints_path: Option<PathBuf>,

    #[serde(default)]
    pub output_path: Option<PathBuf>,
}

impl IoConfig {
    fn default_id_property() -> String {
        "id".to_string()
    }
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            id_property: Self::default_id_property(),
            footprints_path: None,
            output_path: None,
        }
    }
}

impl Config {
    /// Zones Z1..Z4 at 2, 10, 30 and 60 units from the footprint.
    pub fn default_zones() -> Vec<ZoneSpec> {
        vec![
            ZoneSpec::new("Z1", 2.0),
            ZoneSpec::new("Z2", 10.0),
            ZoneSpec::new("Z3", 30.0),
            ZoneSpec::new("Z4", 60.0),
        ]
    }

    const fn default_resolution() -> f64 {
        1.0
    }

    pub fn with_zones(mut self, zones: Vec<ZoneSpec>) -> Self {
        self.zones = zones;
        self
    }

    pub fn with_zone(mut self, name: impl Into<String>, distance: f64) -> Self {
        self.zones.push(ZoneSpec::new(name, distance));
        self
    }

    pub fn with_resolution(mut self, resolution: f64) -> Self {
        assert!(
            resolution.is_finite() && resolution > 0.0,
            "Resolution must be positive and finite"
        );
        self.resolution = resolution;
        self
    }

    pub fn with_io(mut self, io: IoConfig) -> Self {
        self.io = io;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_zone_schedule(&self.zones)?;

        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(format!(
                "Resolution must be positive and finite, got: {}",
                self.resolution
            ));
        }

        if self.io.id_property.is_empty() {
            return Err("Identifier property name must not be empty".to_string());
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            zones: Self::default_zones(),
            resolution: Self::default_resolution(),
            io: IoConfig::default(),
        }
    }
}

/// Zone distances must be finite, positive and strictly increasing, and
/// names unique and non-empty.
pub fn validate_zone_schedule(zones: &[ZoneSpec]) -> Result<(), String> {
    let mut previous = 0.0;
    for (idx, zone) in zones.iter().enumerate() {
        if zone.name.is_empty() {
            return Err(format!("Zone at index {} has an empty name", idx));
        }
        if zones[..idx].iter().any(|other| other.name == zone.name) {
            return Err(format!("Zone name '{}' is used more than once", zone.name));
        }
        if !zone.distance.is_finite() || zone.distance <= 0.0 {
            return Err(format!(
                "Zone '{}' distance must be positive and finite, got: {}",
                zone.name, zone.distance
            ));
        }
        if zone.distance <= previous {
            return Err(format!(
                "Zone '{}' distance ({}) must be greater than the previous zone ({})",
                zone.name, zone.distance, previous
            ));
        }
        previous = zone.distance;
    }
    Ok(())
}
