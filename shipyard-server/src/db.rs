//! Database connection pool and PostgreSQL ship store.

use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use shipyard_core::{Result, Ship, ShipStore, ShipValues, ShipyardError};

use crate::models::{ShipRecord, ShipRow};
use crate::schema::ships;

/// Pooled PostgreSQL connections for the Shipyard server.
pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

/// Embedded Diesel migrations.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

fn storage_error(err: impl std::fmt::Display) -> ShipyardError {
    ShipyardError::Storage(err.to_string())
}

/// Build a pool for `database_url` and apply pending migrations.
pub fn init_pool(database_url: &str) -> Result<DbPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder()
        .build(manager)
        .map_err(storage_error)?;
    run_migrations(&pool)?;
    Ok(pool)
}

/// Run pending Diesel migrations.
pub fn run_migrations(pool: &DbPool) -> Result<()> {
    let mut conn = pool.get().map_err(storage_error)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(storage_error)?;
    if !applied.is_empty() {
        log::info!("applied {} database migrations", applied.len());
    }
    Ok(())
}

/// Ship store backed by the `ships` table.
#[derive(Clone)]
pub struct PgShipStore {
    pool: DbPool,
}

impl PgShipStore {
    /// Wrap a connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<r2d2::PooledConnection<ConnectionManager<PgConnection>>> {
        self.pool.get().map_err(storage_error)
    }
}

impl ShipStore for PgShipStore {
    fn list_all(&self) -> Result<Vec<Ship>> {
        let mut conn = self.conn()?;
        ships::table
            .order(ships::id.asc())
            .select(ShipRecord::as_select())
            .load::<ShipRecord>(&mut conn)
            .map_err(storage_error)?
            .into_iter()
            .map(Ship::try_from)
            .collect()
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Ship>> {
        let mut conn = self.conn()?;
        ships::table
            .find(id)
            .select(ShipRecord::as_select())
            .first::<ShipRecord>(&mut conn)
            .optional()
            .map_err(storage_error)?
            .map(Ship::try_from)
            .transpose()
    }

    fn insert(&self, values: ShipValues) -> Result<Ship> {
        let mut conn = self.conn()?;
        let row = ShipRow::from(values);
        let record = diesel::insert_into(ships::table)
            .values(&row)
            .returning(ShipRecord::as_returning())
            .get_result::<ShipRecord>(&mut conn)
            .map_err(storage_error)?;
        Ship::try_from(record)
    }

    fn update(&self, ship: &Ship) -> Result<Ship> {
        let mut conn = self.conn()?;
        let row = ShipRow::from(ship);
        let record = diesel::update(ships::table.find(ship.id))
            .set(&row)
            .returning(ShipRecord::as_returning())
            .get_result::<ShipRecord>(&mut conn)
            .optional()
            .map_err(storage_error)?
            .ok_or(ShipyardError::NotFound(ship.id))?;
        Ship::try_from(record)
    }

    fn delete(&self, ship: &Ship) -> Result<()> {
        let mut conn = self.conn()?;
        let removed = diesel::delete(ships::table.find(ship.id))
            .execute(&mut conn)
            .map_err(storage_error)?;
        if removed == 0 {
            return Err(ShipyardError::NotFound(ship.id));
        }
        Ok(())
    }
}

#[cfg(test)]
fn split_database_url(database_url: &str) -> (String, String) {
    let (url_base, query) = database_url.split_once('?').unwrap_or((database_url, ""));
    let (base, _db_name) = url_base
        .rsplit_once('/')
        .expect("DATABASE_URL must include a database name");
    let query_suffix = if query.is_empty() {
        String::new()
    } else {
        format!("?{query}")
    };
    (base.to_string(), query_suffix)
}

#[cfg(test)]
/// A temporary PostgreSQL database for tests.
pub(crate) struct TestDatabase {
    database_url: String,
    admin_url: String,
    db_name: String,
}

#[cfg(test)]
impl TestDatabase {
    /// Create a new isolated test database using `TEST_DATABASE_URL` or `DATABASE_URL`.
    pub(crate) fn new() -> Self {
        let base_url = std::env::var("TEST_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .expect("set TEST_DATABASE_URL or DATABASE_URL for PostgreSQL tests");
        let (base, query_suffix) = split_database_url(&base_url);
        let db_name = format!("shipyard_test_{}", uuid::Uuid::new_v4().simple());
        let admin_url = format!("{base}/postgres{query_suffix}");
        let database_url = format!("{base}/{db_name}{query_suffix}");

        let mut admin_conn = PgConnection::establish(&admin_url).expect("connect admin database");
        diesel::sql_query(format!("CREATE DATABASE \"{db_name}\""))
            .execute(&mut admin_conn)
            .expect("create test database");

        Self {
            database_url,
            admin_url,
            db_name,
        }
    }

    /// Return the test database URL.
    pub(crate) fn database_url(&self) -> &str {
        &self.database_url
    }
}

#[cfg(test)]
impl Drop for TestDatabase {
    fn drop(&mut self) {
        if let Ok(mut conn) = PgConnection::establish(&self.admin_url) {
            let escaped = self.db_name.replace('\'', "''");
            let _ = diesel::sql_query(format!(
                "SELECT pg_terminate_backend(pid) \
                 FROM pg_stat_activity \
                 WHERE datname = '{escaped}' AND pid <> pg_backend_pid()"
            ))
            .execute(&mut conn);
            let _ = diesel::sql_query(format!("DROP DATABASE IF EXISTS \"{}\"", self.db_name))
                .execute(&mut conn);
        }
    }
}
