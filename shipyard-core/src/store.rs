//! Storage abstraction for ship records.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::domain::{Ship, ShipValues};
use crate::error::{Result, ShipyardError};

/// Durable storage of ships keyed by identifier.
#[cfg_attr(test, mockall::automock)]
pub trait ShipStore {
    /// All stored ships in ascending identifier order.
    fn list_all(&self) -> Result<Vec<Ship>>;
    /// Look up a single ship.
    fn get_by_id(&self, id: i64) -> Result<Option<Ship>>;
    /// Store a new ship, assigning its identifier.
    fn insert(&self, values: ShipValues) -> Result<Ship>;
    /// Overwrite an existing ship.
    fn update(&self, ship: &Ship) -> Result<Ship>;
    /// Remove a ship.
    fn delete(&self, ship: &Ship) -> Result<()>;
}

impl<S: ShipStore + ?Sized> ShipStore for Arc<S> {
    fn list_all(&self) -> Result<Vec<Ship>> {
        (**self).list_all()
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Ship>> {
        (**self).get_by_id(id)
    }

    fn insert(&self, values: ShipValues) -> Result<Ship> {
        (**self).insert(values)
    }

    fn update(&self, ship: &Ship) -> Result<Ship> {
        (**self).update(ship)
    }

    fn delete(&self, ship: &Ship) -> Result<()> {
        (**self).delete(ship)
    }
}

#[derive(Debug, Default)]
struct Catalog {
    ships: BTreeMap<i64, Ship>,
    last_id: i64,
}

/// Ship store held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryShipStore {
    catalog: RwLock<Catalog>,
}

impl InMemoryShipStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> ShipyardError {
    ShipyardError::Storage("ship catalog lock poisoned".to_string())
}

impl ShipStore for InMemoryShipStore {
    fn list_all(&self) -> Result<Vec<Ship>> {
        let catalog = self.catalog.read().map_err(poisoned)?;
        Ok(catalog.ships.values().cloned().collect())
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Ship>> {
        let catalog = self.catalog.read().map_err(poisoned)?;
        Ok(catalog.ships.get(&id).cloned())
    }

    fn insert(&self, values: ShipValues) -> Result<Ship> {
        let mut catalog = self.catalog.write().map_err(poisoned)?;
        catalog.last_id += 1;
        let ship = Ship::from_values(catalog.last_id, values);
        catalog.ships.insert(ship.id, ship.clone());
        Ok(ship)
    }

    fn update(&self, ship: &Ship) -> Result<Ship> {
        let mut catalog = self.catalog.write().map_err(poisoned)?;
        let entry = catalog
            .ships
            .get_mut(&ship.id)
            .ok_or(ShipyardError::NotFound(ship.id))?;
        *entry = ship.clone();
        Ok(ship.clone())
    }

    fn delete(&self, ship: &Ship) -> Result<()> {
        let mut catalog = self.catalog.write().map_err(poisoned)?;
        catalog
            .ships
            .remove(&ship.id)
            .map(|_| ())
            .ok_or(ShipyardError::NotFound(ship.id))
    }
}
