//! Ship catalog operations composed over a [`ShipStore`].

use crate::domain::{NewShip, Ship, ShipPatch};
use crate::error::{Result, ShipyardError};
use crate::filter::{ShipFilter, filter_ships};
use crate::paging::{PageRequest, ShipOrder, page, sort_ships};
use crate::store::ShipStore;
use crate::validation::{merge_patch, validate_new_ship};

/// Parse a ship identifier from a request path segment.
pub fn parse_ship_id(raw: &str) -> Result<i64> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ShipyardError::MalformedIdentifier(raw.to_string())),
    }
}

/// Catalog service; every call performs at most one read and one write.
#[derive(Debug, Clone)]
pub struct ShipService<S: ShipStore> {
    store: S,
}

impl<S: ShipStore> ShipService<S> {
    /// Wrap a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Filter, sort and page the catalog.
    pub fn list(
        &self,
        filter: &ShipFilter,
        order: Option<ShipOrder>,
        request: PageRequest,
    ) -> Result<Vec<Ship>> {
        let matching = filter_ships(self.store.list_all()?, filter);
        log::debug!("{} ships match listing filter", matching.len());
        Ok(page(sort_ships(matching, order), request))
    }

    /// Number of ships matching `filter`.
    pub fn count(&self, filter: &ShipFilter) -> Result<usize> {
        let count = filter_ships(self.store.list_all()?, filter).len();
        log::debug!("{count} ships match count filter");
        Ok(count)
    }

    /// Fetch a ship by its raw identifier.
    pub fn get(&self, raw_id: &str) -> Result<Ship> {
        let id = parse_ship_id(raw_id)?;
        self.store
            .get_by_id(id)?
            .ok_or(ShipyardError::NotFound(id))
    }

    /// Validate and store a new ship.
    pub fn create(&self, ship: NewShip) -> Result<Ship> {
        let values = validate_new_ship(ship).inspect_err(|err| {
            log::warn!("rejected ship creation: {err}");
        })?;
        let created = self.store.insert(values)?;
        log::info!("created ship {}", created.id);
        Ok(created)
    }

    /// Apply a partial update to an existing ship.
    pub fn update(&self, raw_id: &str, patch: ShipPatch) -> Result<Ship> {
        let current = self.get(raw_id)?;
        let merged = merge_patch(&current, patch).inspect_err(|err| {
            log::warn!("rejected update of ship {}: {err}", current.id);
        })?;
        let updated = self.store.update(&merged)?;
        log::info!("updated ship {}", updated.id);
        Ok(updated)
    }

    /// Delete a ship by its raw identifier.
    pub fn delete(&self, raw_id: &str) -> Result<()> {
        let ship = self.get(raw_id)?;
        self.store.delete(&ship)?;
        log::info!("deleted ship {}", ship.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ShipService, parse_ship_id};
    use crate::domain::{NewShip, Ship, ShipPatch, ShipType};
    use crate::error::{Field, ShipyardError};
    use crate::filter::ShipFilter;
    use crate::paging::{PageRequest, ShipOrder};
    use crate::store::{InMemoryShipStore, MockShipStore};
    use chrono::{TimeZone, Utc};
    use mockall::predicate::eq;

    fn payload(name: &str, year: i32, speed: f64) -> NewShip {
        NewShip {
            name: Some(name.to_string()),
            planet: Some("Earth".to_string()),
            ship_type: Some(ShipType::Transport),
            prod_date: Some(Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap()),
            is_used: None,
            speed: Some(speed),
            crew_size: Some(50),
        }
    }

    fn stored(id: i64) -> Ship {
        Ship {
            id,
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

    fn seeded_service(count: usize) -> ShipService<InMemoryShipStore> {
        let service = ShipService::new(InMemoryShipStore::new());
        for index in 0..count {
            let speed = 0.9 - index as f64 * 0.05;
            service
                .create(payload(&format!("Ship {index}"), 3000, speed))
                .expect("create");
        }
        service
    }

    #[test]
    fn parse_ship_id_rejects_malformed_values() {
        assert_eq!(parse_ship_id("12"), Ok(12));
        for raw in ["abc", "0", "-1", "", "1.5", " 5", "5 "] {
            assert_eq!(
                parse_ship_id(raw),
                Err(ShipyardError::MalformedIdentifier(raw.to_string()))
            );
        }
    }

    #[test]
    fn create_computes_rating_and_assigns_id() {
        let service = ShipService::new(InMemoryShipStore::new());

        let created = service.create(payload("Orion", 3000, 0.5)).expect("create");

        assert_eq!(created.id, 1);
        assert_eq!(created.rating, 2.0);
        assert!(!created.is_used);
    }

    #[test]
    fn create_rejects_invalid_payload_without_writing() {
        let mut store = MockShipStore::new();
        store.expect_insert().never();
        let service = ShipService::new(store);

        let result = service.create(payload("Orion", 3019, 0.5));

        assert_eq!(result, Err(ShipyardError::InvalidField(Field::ProdDate)));
    }

    #[test]
    fn list_sorts_and_pages() {
        let service = seeded_service(10);

        let first = service
            .list(&ShipFilter::default(), None, PageRequest::default())
            .expect("list");
        assert_eq!(
            first.iter().map(|ship| ship.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );

        let slowest = service
            .list(
                &ShipFilter::default(),
                Some(ShipOrder::Speed),
                PageRequest::new(0, 2),
            )
            .expect("list");
        assert_eq!(
            slowest.iter().map(|ship| ship.id).collect::<Vec<_>>(),
            vec![10, 9]
        );

        let tail = service
            .list(&ShipFilter::default(), None, PageRequest::new(3, 3))
            .expect("list");
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].id, 10);
    }

    #[test]
    fn count_ignores_paging() {
        let service = seeded_service(10);
        let filter = ShipFilter {
            min_speed: Some(0.7),
            ..ShipFilter::default()
        };

        assert_eq!(service.count(&ShipFilter::default()), Ok(10));
        assert_eq!(service.count(&filter), Ok(5));
    }

    #[test]
    fn get_distinguishes_malformed_from_missing() {
        let mut store = MockShipStore::new();
        store.expect_get_by_id().with(eq(9)).return_const(Ok(None));
        let service = ShipService::new(store);

        assert_eq!(service.get("9"), Err(ShipyardError::NotFound(9)));
        assert_eq!(
            service.get("-9"),
            Err(ShipyardError::MalformedIdentifier("-9".to_string()))
        );
    }

    #[test]
    fn update_with_invalid_field_leaves_store_untouched() {
        let mut store = MockShipStore::new();
        store
            .expect_get_by_id()
            .with(eq(1))
            .return_const(Ok(Some(stored(1))));
        store.expect_update().never();
        let service = ShipService::new(store);
        let patch = ShipPatch {
            speed: Some(1.5),
            ..ShipPatch::default()
        };

        assert_eq!(
            service.update("1", patch),
            Err(ShipyardError::InvalidField(Field::Speed))
        );
    }

    #[test]
    fn update_persists_merged_ship() {
        let service = seeded_service(1);
        let patch = ShipPatch {
            is_used: Some(true),
            planet: Some("Venus".to_string()),
            ..ShipPatch::default()
        };

        let updated = service.update("1", patch).expect("update");
        let reloaded = service.get("1").expect("get");

        assert_eq!(updated, reloaded);
        assert_eq!(reloaded.planet, "Venus");
        assert_eq!(reloaded.rating, 1.8);
    }

    #[test]
    fn update_missing_ship_is_not_found() {
        let service = seeded_service(1);

        assert_eq!(
            service.update("2", ShipPatch::default()),
            Err(ShipyardError::NotFound(2))
        );
    }

    #[test]
    fn delete_removes_ship_once() {
        let service = seeded_service(2);

        service.delete("1").expect("delete");

        assert_eq!(service.delete("1"), Err(ShipyardError::NotFound(1)));
        assert_eq!(service.count(&ShipFilter::default()), Ok(1));
    }

    #[test]
    fn delete_forwards_loaded_ship_to_store() {
        let mut store = MockShipStore::new();
        store
            .expect_get_by_id()
            .with(eq(4))
            .return_const(Ok(Some(stored(4))));
        store
            .expect_delete()
            .withf(|ship: &Ship| ship.id == 4)
            .times(1)
            .returning(|_| Ok(()));
        let service = ShipService::new(store);

        assert_eq!(service.delete("4"), Ok(()));
    }
}
