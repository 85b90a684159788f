use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteConnection},
    Connection as SqlConnection,
};
use tokio::sync::{Mutex, MutexGuard};

use crate::schema;

/// A thread safe connection to the database
#[derive(Clone)]
pub struct Connection(Arc<Mutex<SqliteConnection>>);

impl Connection {
    /// Open a connection to the database.
    /// The database file is created if it does not exist.
    pub async fn open(filename: &str) -> Result<Connection> {
        let opts = SqliteConnectOptions::from_str(filename)?
            .create_if_missing(true)
            .foreign_keys(true);
        let conn = SqliteConnection::connect_with(&opts).await?;
        log::debug!("opened database {}", filename);
        Ok(Connection(Arc::new(Mutex::new(conn))))
    }

    /// Acquire the underlying sqlite connection
    pub async fn lock(&self) -> MutexGuard<'_, SqliteConnection> {
        self.0.lock().await
    }

    /// Bring the schema up to date, returns the schema version.
    pub async fn migrate(&self) -> Result<u32> {
        schema::migrate(self).await
    }
}

pub struct TestHandle {
    filename: PathBuf,
}

impl Drop for TestHandle {
    fn drop(&mut self) {
        let wal = self.filename.with_extension("sqlite3-wal");
        let shm = self.filename.with_extension("sqlite3-shm");
        for path in [self.filename.as_path(), wal.as_path(), shm.as_path()] {
            remove_if_exists(path);
        }
    }
}

fn remove_if_exists(path: &Path) {
    if path.exists() {
        let _ = fs::remove_file(path);
    }
}

/// Open a new test database connection.
/// The database will be created on each open and removed
/// when the handle is dropped.
pub async fn open_test() -> (TestHandle, Connection) {
    let filename = std::env::temp_dir().join(format!(
        "gym_test_{}.sqlite3",
        rand::random::<u64>()
    ));
    let handle = TestHandle {
        filename: filename.clone(),
    };
    let conn = Connection::open(&filename.to_string_lossy()).await.unwrap();

    // Install the schema
    conn.migrate().await.unwrap();

    (handle, conn)
}
