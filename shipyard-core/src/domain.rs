//! Domain entities for Shipyard.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{Field, Result, ShipyardError};

/// Class of a ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipType {
    /// Cargo and passenger transport.
    Transport,
    /// Warship.
    Military,
    /// Trading vessel.
    Merchant,
}

impl ShipType {
    /// Every ship class, in declaration order.
    pub const ALL: [ShipType; 3] = [Self::Transport, Self::Military, Self::Merchant];

    /// Stable storage and wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "TRANSPORT",
            Self::Military => "MILITARY",
            Self::Merchant => "MERCHANT",
        }
    }
}

impl fmt::Display for ShipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipType {
    type Err = ShipyardError;

    fn from_str(value: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or(ShipyardError::InvalidField(Field::ShipType))
    }
}

/// A persisted ship record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ship {
    /// Storage-assigned identifier.
    pub id: i64,
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Ship class.
    pub ship_type: ShipType,
    /// Production date, epoch milliseconds on the wire.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[schema(value_type = i64)]
    pub prod_date: DateTime<Utc>,
    /// Whether the ship has been used.
    #[serde(rename = "isUsed")]
    pub is_used: bool,
    /// Maximum speed.
    pub speed: f64,
    /// Crew size.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

impl Ship {
    /// Attach a storage identifier to validated values.
    pub fn from_values(id: i64, values: ShipValues) -> Self {
        Self {
            id,
            name: values.name,
            planet: values.planet,
            ship_type: values.ship_type,
            prod_date: values.prod_date,
            is_used: values.is_used,
            speed: values.speed,
            crew_size: values.crew_size,
            rating: values.rating,
        }
    }
}

/// A fully validated ship that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipValues {
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Ship class.
    pub ship_type: ShipType,
    /// Production date.
    pub prod_date: DateTime<Utc>,
    /// Whether the ship has been used.
    pub is_used: bool,
    /// Maximum speed.
    pub speed: f64,
    /// Crew size.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

/// Creation payload. Missing fields are rejected during validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewShip {
    /// Ship name.
    pub name: Option<String>,
    /// Home planet.
    pub planet: Option<String>,
    /// Ship class.
    pub ship_type: Option<ShipType>,
    /// Production date in epoch milliseconds.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    #[schema(value_type = Option<i64>)]
    pub prod_date: Option<DateTime<Utc>>,
    /// Whether the ship has been used; defaults to false.
    #[serde(rename = "isUsed")]
    pub is_used: Option<bool>,
    /// Maximum speed.
    pub speed: Option<f64>,
    /// Crew size.
    pub crew_size: Option<i32>,
}

/// Partial update payload. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShipPatch {
    /// New ship name.
    pub name: Option<String>,
    /// New home planet.
    pub planet: Option<String>,
    /// New ship class.
    pub ship_type: Option<ShipType>,
    /// New production date in epoch milliseconds.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    #[schema(value_type = Option<i64>)]
    pub prod_date: Option<DateTime<Utc>>,
    /// New used flag.
    #[serde(rename = "isUsed")]
    pub is_used: Option<bool>,
    /// New maximum speed.
    pub speed: Option<f64>,
    /// New crew size.
    pub crew_size: Option<i32>,
}

impl ShipPatch {
    /// Whether the patch touches a field the rating depends on.
    pub fn affects_rating(&self) -> bool {
        self.prod_date.is_some() || self.is_used.is_some() || self.speed.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{NewShip, Ship, ShipPatch, ShipType};
    use chrono::{TimeZone, Utc};

    fn sample_ship() -> Ship {
        Ship {
            id: 7,
            name: "Orion".to_string(),
            planet: "Mars".to_string(),
            ship_type: ShipType::Merchant,
            prod_date: Utc.with_ymd_and_hms(3000, 1, 1, 0, 0, 0).unwrap(),
            is_used: false,
            speed: 0.5,
            crew_size: 12,
            rating: 2.0,
        }
    }

    #[test]
    fn ship_serializes_with_wire_names() {
        let value = serde_json::to_value(sample_ship()).expect("serialize");

        assert_eq!(value["shipType"], "MERCHANT");
        assert_eq!(value["isUsed"], false);
        assert_eq!(value["crewSize"], 12);
        assert_eq!(value["prodDate"], 32_503_680_000_000i64);
    }

    #[test]
    fn new_ship_accepts_partial_payload() {
        let payload: NewShip =
            serde_json::from_str(r#"{"name":"Orion","prodDate":32503680000000}"#).expect("parse");

        assert_eq!(payload.name.as_deref(), Some("Orion"));
        assert_eq!(
            payload.prod_date,
            Some(Utc.with_ymd_and_hms(3000, 1, 1, 0, 0, 0).unwrap())
        );
        assert!(payload.is_used.is_none());
        assert!(payload.ship_type.is_none());
    }

    #[test]
    fn new_ship_ignores_rating_and_id() {
        let payload: NewShip =
            serde_json::from_str(r#"{"id":5,"rating":9.9,"speed":0.3}"#).expect("parse");

        assert_eq!(payload.speed, Some(0.3));
    }

    #[test]
    fn patch_reports_rating_dependencies() {
        let rename = ShipPatch {
            name: Some("Vega".to_string()),
            ..ShipPatch::default()
        };
        let reused = ShipPatch {
            is_used: Some(true),
            ..ShipPatch::default()
        };

        assert!(!rename.affects_rating());
        assert!(reused.affects_rating());
    }

    #[test]
    fn ship_type_parses_storage_names() {
        for kind in ShipType::ALL {
            assert_eq!(kind.as_str().parse::<ShipType>(), Ok(kind));
        }
        assert!("transport".parse::<ShipType>().is_err());
    }
}
