//! Field validation, rating computation and update merging.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::domain::{NewShip, Ship, ShipPatch, ShipValues};
use crate::error::{Field, Result, ShipyardError};

/// Maximum length of a name or planet, in characters.
pub const MAX_TEXT_LEN: usize = 50;
/// Slowest accepted speed.
pub const MIN_SPEED: f64 = 0.01;
/// Fastest accepted speed.
pub const MAX_SPEED: f64 = 0.99;
/// Smallest accepted crew.
pub const MIN_CREW_SIZE: i32 = 1;
/// Largest accepted crew.
pub const MAX_CREW_SIZE: i32 = 9999;
/// Year the rating formula is anchored to.
pub const RATING_REFERENCE_YEAR: i32 = 3019;

/// Production dates must fall strictly after the start of this year.
pub const PRODUCTION_START_YEAR: i32 = 2800;
/// Production dates must fall strictly before the start of this year.
pub const PRODUCTION_END_YEAR: i32 = 3019;

fn start_of_year(year: i32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, 1, 1)?
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
}

/// Reject an empty or overlong name or planet.
pub fn check_text(field: Field, value: &str) -> Result<()> {
    if value.is_empty() || value.chars().count() > MAX_TEXT_LEN {
        return Err(ShipyardError::InvalidField(field));
    }
    Ok(())
}

/// Reject production dates outside the open interval (2800, 3019).
pub fn check_prod_date(value: &DateTime<Utc>) -> Result<()> {
    match (
        start_of_year(PRODUCTION_START_YEAR),
        start_of_year(PRODUCTION_END_YEAR),
    ) {
        (Some(start), Some(end)) if start < *value && *value < end => Ok(()),
        _ => Err(ShipyardError::InvalidField(Field::ProdDate)),
    }
}

/// Reject speeds outside `[MIN_SPEED, MAX_SPEED]`.
pub fn check_speed(value: f64) -> Result<()> {
    if !(MIN_SPEED..=MAX_SPEED).contains(&value) {
        return Err(ShipyardError::InvalidField(Field::Speed));
    }
    Ok(())
}

/// Reject crew sizes outside `[MIN_CREW_SIZE, MAX_CREW_SIZE]`.
pub fn check_crew_size(value: i32) -> Result<()> {
    if !(MIN_CREW_SIZE..=MAX_CREW_SIZE).contains(&value) {
        return Err(ShipyardError::InvalidField(Field::CrewSize));
    }
    Ok(())
}

/// Compute the rating of a ship.
///
/// `80 * speed * k / (3019 - year + 1)` rounded to two decimals, where `k`
/// halves the score of used ships.
pub fn compute_rating(speed: f64, is_used: bool, prod_date: &DateTime<Utc>) -> f64 {
    let k = if is_used { 0.5 } else { 1.0 };
    let age = f64::from(RATING_REFERENCE_YEAR - prod_date.year() + 1);
    round2(80.0 * speed * k / age)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn required<T>(value: Option<T>, field: Field) -> Result<T> {
    value.ok_or(ShipyardError::InvalidField(field))
}

/// Validate a creation payload and compute its rating.
///
/// Fields are checked in wire order and the first failure is reported.
pub fn validate_new_ship(ship: NewShip) -> Result<ShipValues> {
    let name = required(ship.name, Field::Name)?;
    check_text(Field::Name, &name)?;
    let planet = required(ship.planet, Field::Planet)?;
    check_text(Field::Planet, &planet)?;
    let ship_type = required(ship.ship_type, Field::ShipType)?;
    let prod_date = required(ship.prod_date, Field::ProdDate)?;
    check_prod_date(&prod_date)?;
    let speed = required(ship.speed, Field::Speed)?;
    check_speed(speed)?;
    let crew_size = required(ship.crew_size, Field::CrewSize)?;
    check_crew_size(crew_size)?;
    let is_used = ship.is_used.unwrap_or(false);

    Ok(ShipValues {
        rating: compute_rating(speed, is_used, &prod_date),
        name,
        planet,
        ship_type,
        prod_date,
        is_used,
        speed,
        crew_size,
    })
}

/// Validate every field present in `patch`, then build the merged ship.
///
/// `current` is never modified. The rating is recomputed only when the
/// patch carries a production date, used flag or speed.
pub fn merge_patch(current: &Ship, patch: ShipPatch) -> Result<Ship> {
    if let Some(name) = &patch.name {
        check_text(Field::Name, name)?;
    }
    if let Some(planet) = &patch.planet {
        check_text(Field::Planet, planet)?;
    }
    if let Some(prod_date) = &patch.prod_date {
        check_prod_date(prod_date)?;
    }
    if let Some(speed) = patch.speed {
        check_speed(speed)?;
    }
    if let Some(crew_size) = patch.crew_size {
        check_crew_size(crew_size)?;
    }

    let affects_rating = patch.affects_rating();
    let mut merged = Ship {
        id: current.id,
        name: patch.name.unwrap_or_else(|| current.name.clone()),
        planet: patch.planet.unwrap_or_else(|| current.planet.clone()),
        ship_type: patch.ship_type.unwrap_or(current.ship_type),
        prod_date: patch.prod_date.unwrap_or(current.prod_date),
        is_used: patch.is_used.unwrap_or(current.is_used),
        speed: patch.speed.unwrap_or(current.speed),
        crew_size: patch.crew_size.unwrap_or(current.crew_size),
        rating: current.rating,
    };
    if affects_rating {
        merged.rating = compute_rating(merged.speed, merged.is_used, &merged.prod_date);
    }
    Ok(merged)
}
