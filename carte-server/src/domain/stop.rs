//! Transit stop types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Marker fill for stops with both a shelter and lighting.
pub const COLOR_COMPLETE: &str = "#2E8B57";

/// Marker fill for stops with exactly one of shelter or lighting.
pub const COLOR_PARTIAL: &str = "#FFD700";

/// Marker fill for stops with no equipment.
pub const COLOR_NONE: &str = "#DC143C";

/// Identifier of a stop, as assigned by the stops endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopId(pub i64);

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a route filter value is not an integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid route id: {input:?}")]
pub struct InvalidRouteId {
    input: String,
}

/// Identifier of a route (ligne) served by a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(pub i64);

impl RouteId {
    /// Parse a route id from user input.
    ///
    /// Surrounding whitespace is ignored; anything else must be a base-10
    /// integer. Trailing text is not dropped: `"2a"` and `"1.5"` are
    /// rejected rather than read as 2 and 1.
    ///
    /// ```
    /// use carte_server::domain::RouteId;
    ///
    /// assert_eq!(RouteId::parse(" 12 ").unwrap(), RouteId(12));
    /// assert!(RouteId::parse("douze").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, InvalidRouteId> {
        s.trim()
            .parse::<i64>()
            .map(RouteId)
            .map_err(|_| InvalidRouteId {
                input: s.to_string(),
            })
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Geographic position in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Equipment flags of a stop.
///
/// Missing flags are read as absent equipment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    #[serde(rename = "abribus", default)]
    pub shelter: bool,

    #[serde(rename = "eclairage", default)]
    pub lighting: bool,
}

/// How well a stop is equipped, as shown by its marker color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquipmentLevel {
    /// Shelter and lighting.
    Complete,
    /// Shelter or lighting, not both.
    Partial,
    /// Neither.
    Unequipped,
}

impl EquipmentLevel {
    /// Marker fill color for this level.
    pub fn color(self) -> &'static str {
        match self {
            EquipmentLevel::Complete => COLOR_COMPLETE,
            EquipmentLevel::Partial => COLOR_PARTIAL,
            EquipmentLevel::Unequipped => COLOR_NONE,
        }
    }
}

impl Equipment {
    /// Classify the equipment flags.
    pub fn level(&self) -> EquipmentLevel {
        match (self.shelter, self.lighting) {
            (true, true) => EquipmentLevel::Complete,
            (true, false) | (false, true) => EquipmentLevel::Partial,
            (false, false) => EquipmentLevel::Unequipped,
        }
    }
}

/// Missing or null labels read as empty text.
fn text_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A physical transit stop as returned by `/api/arrets`.
///
/// Field names follow the API's JSON. Fields this crate does not model are
/// kept in `extra` so that an export reproduces the stop as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,

    #[serde(rename = "nom", default, deserialize_with = "text_or_empty")]
    pub name: String,

    #[serde(default, deserialize_with = "text_or_empty")]
    pub zone: String,

    #[serde(rename = "quartier", default, deserialize_with = "text_or_empty")]
    pub neighborhood: String,

    #[serde(rename = "coordonnees")]
    pub position: Coordinates,

    /// Routes calling at this stop.
    #[serde(rename = "lignes_desservies", default)]
    pub routes: Vec<RouteId>,

    #[serde(rename = "equipements", default)]
    pub equipment: Equipment,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Stop {
    /// Whether `route` calls at this stop.
    pub fn serves(&self, route: RouteId) -> bool {
        self.routes.contains(&route)
    }

    /// Served routes joined with `", "`, in API order.
    pub fn routes_label(&self) -> String {
        self.routes
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "id": 7,
            "nom": "Place de la Nation",
            "zone": "Centre",
            "quartier": "Koulouba",
            "coordonnees": { "latitude": 12.3686, "longitude": -1.5275 },
            "lignes_desservies": [1, 3, 12],
            "equipements": { "abribus": true, "eclairage": false },
            "code": "PN-01"
        })
    }

    #[test]
    fn deserialize_stop() {
        let stop: Stop = serde_json::from_value(sample_json()).unwrap();

        assert_eq!(stop.id, StopId(7));
        assert_eq!(stop.name, "Place de la Nation");
        assert_eq!(stop.neighborhood, "Koulouba");
        assert_eq!(stop.position, Coordinates::new(12.3686, -1.5275));
        assert_eq!(stop.routes, vec![RouteId(1), RouteId(3), RouteId(12)]);
        assert!(stop.equipment.shelter);
        assert!(!stop.equipment.lighting);
        assert_eq!(stop.extra.get("code"), Some(&serde_json::json!("PN-01")));
    }

    #[test]
    fn unknown_fields_survive_serialization() {
        let original = sample_json();
        let stop: Stop = serde_json::from_value(original.clone()).unwrap();
        let back = serde_json::to_value(&stop).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn missing_equipment_reads_as_unequipped() {
        let mut json = sample_json();
        json.as_object_mut().unwrap().remove("equipements");
        let stop: Stop = serde_json::from_value(json).unwrap();
        assert_eq!(stop.equipment.level(), EquipmentLevel::Unequipped);
    }

    #[test]
    fn null_or_missing_labels_read_as_empty() {
        let mut json = sample_json();
        let fields = json.as_object_mut().unwrap();
        fields.insert("quartier".into(), serde_json::Value::Null);
        fields.remove("zone");

        let stop: Stop = serde_json::from_value(json).unwrap();

        assert_eq!(stop.neighborhood, "");
        assert_eq!(stop.zone, "");
        assert_eq!(stop.name, "Place de la Nation");
    }

    #[test]
    fn missing_position_is_rejected() {
        let mut json = sample_json();
        json.as_object_mut().unwrap().remove("coordonnees");
        assert!(serde_json::from_value::<Stop>(json).is_err());
    }

    #[test]
    fn level_for_each_flag_combination() {
        let eq = |shelter, lighting| Equipment { shelter, lighting };

        assert_eq!(eq(true, true).level(), EquipmentLevel::Complete);
        assert_eq!(eq(true, false).level(), EquipmentLevel::Partial);
        assert_eq!(eq(false, true).level(), EquipmentLevel::Partial);
        assert_eq!(eq(false, false).level(), EquipmentLevel::Unequipped);
    }

    #[test]
    fn level_colors() {
        assert_eq!(EquipmentLevel::Complete.color(), "#2E8B57");
        assert_eq!(EquipmentLevel::Partial.color(), "#FFD700");
        assert_eq!(EquipmentLevel::Unequipped.color(), "#DC143C");
    }

    #[test]
    fn routes_label_joins_with_comma() {
        let stop: Stop = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(stop.routes_label(), "1, 3, 12");
    }

    #[test]
    fn parse_route_id() {
        assert_eq!(RouteId::parse("3"), Ok(RouteId(3)));
        assert_eq!(RouteId::parse("  42\n"), Ok(RouteId(42)));
        assert_eq!(RouteId::parse("-1"), Ok(RouteId(-1)));
        assert!(RouteId::parse("").is_err());
        assert!(RouteId::parse("3a").is_err());
        assert!(RouteId::parse("1.5").is_err());
        assert!(RouteId::parse("ligne 3").is_err());
    }

    proptest! {
        #[test]
        fn partial_iff_exactly_one_flag(shelter: bool, lighting: bool) {
            let level = Equipment { shelter, lighting }.level();
            prop_assert_eq!(level == EquipmentLevel::Partial, shelter ^ lighting);
            prop_assert_eq!(level == EquipmentLevel::Complete, shelter && lighting);
        }
    }
}
