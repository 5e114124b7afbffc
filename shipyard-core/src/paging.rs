//! Ordering and pagination of ship listings.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Ship;

/// Default zero-based page number.
pub const DEFAULT_PAGE_NUMBER: i64 = 0;
/// Default number of ships per page.
pub const DEFAULT_PAGE_SIZE: i64 = 3;

/// Key a listing is sorted by, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipOrder {
    /// Storage identifier.
    Id,
    /// Speed.
    Speed,
    /// Production date.
    Date,
    /// Rating.
    Rating,
}

/// Requested page of a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page number; defaults to [`DEFAULT_PAGE_NUMBER`].
    pub number: Option<i64>,
    /// Page size; defaults to [`DEFAULT_PAGE_SIZE`].
    pub size: Option<i64>,
}

impl PageRequest {
    /// Build a request from explicit values.
    pub fn new(number: i64, size: i64) -> Self {
        Self {
            number: Some(number),
            size: Some(size),
        }
    }

    /// Half-open index range of the page within `len` items.
    ///
    /// Negative numbers, non-positive sizes and offsets past the end all
    /// resolve to an empty range.
    pub fn bounds(&self, len: usize) -> (usize, usize) {
        let number = self.number.unwrap_or(DEFAULT_PAGE_NUMBER);
        let size = self.size.unwrap_or(DEFAULT_PAGE_SIZE);
        if number < 0 || size <= 0 {
            return (0, 0);
        }
        let Some(from) = number
            .checked_mul(size)
            .and_then(|from| usize::try_from(from).ok())
        else {
            return (0, 0);
        };
        if from >= len {
            return (0, 0);
        }
        let size = usize::try_from(size).unwrap_or(usize::MAX);
        (from, from.saturating_add(size).min(len))
    }
}

/// Sort ships by `order`; `None` leaves the input order untouched.
///
/// The sort is stable, so ties keep their input order.
pub fn sort_ships(mut ships: Vec<Ship>, order: Option<ShipOrder>) -> Vec<Ship> {
    let Some(order) = order else {
        return ships;
    };
    match order {
        ShipOrder::Id => ships.sort_by_key(|ship| ship.id),
        ShipOrder::Speed => ships.sort_by(|a, b| a.speed.total_cmp(&b.speed)),
        ShipOrder::Date => ships.sort_by_key(|ship| ship.prod_date),
        ShipOrder::Rating => ships.sort_by(|a, b| a.rating.total_cmp(&b.rating)),
    }
    ships
}

/// Slice the requested page out of `ships`.
pub fn page(ships: Vec<Ship>, request: PageRequest) -> Vec<Ship> {
    let (from, to) = request.bounds(ships.len());
    ships.into_iter().skip(from).take(to - from).collect()
}
