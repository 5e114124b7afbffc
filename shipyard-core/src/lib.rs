#![deny(missing_docs)]
//! Shipyard core library.
//!
//! This crate contains the ship catalog domain types together with the
//! filtering, rating, validation and pagination rules behind the Shipyard API.

pub mod domain;
pub mod error;
pub mod filter;
pub mod paging;
pub mod service;
pub mod store;
pub mod validation;

pub use domain::{NewShip, Ship, ShipPatch, ShipType, ShipValues};
pub use error::{Field, Result, ShipyardError};
pub use filter::{ShipFilter, filter_ships};
pub use paging::{
    DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, PageRequest, ShipOrder, page, sort_ships,
};
pub use service::{ShipService, parse_ship_id};
pub use store::{InMemoryShipStore, ShipStore};
pub use validation::{compute_rating, merge_patch, validate_new_ship};
