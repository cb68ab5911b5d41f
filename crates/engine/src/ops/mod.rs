use sea_orm::{DatabaseConnection, DbErr};

use crate::{DatabasePool, EngineError, ResultEngine};

mod users;

/// Log a database failure before handing it back to the caller.
fn db_error(op: &'static str) -> impl Fn(DbErr) -> EngineError {
    move |err| {
        tracing::error!("error in {op}: {err}");
        EngineError::Database(err)
    }
}

/// Access layer over the `users` table.
///
/// `Engine` is the only component that queries the table. Cloning the
/// underlying connection is cheap, the pool is shared.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: Option<DatabaseConnection>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = Some(db);
        self
    }

    /// Take the database from an initialized pool
    pub fn pool(mut self, pool: &DatabasePool) -> EngineBuilder {
        self.database = pool.get().ok().cloned();
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let database = self.database.ok_or(EngineError::NotInitialized)?;
        Ok(Engine { database })
    }
}
