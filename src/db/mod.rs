//! Storage layer for the task list.
//!
//! `Database` holds where the store lives, not an open connection. Every
//! operation opens its own connection and drops it when done, so nothing is
//! shared between CLI invocations or concurrent HTTP requests.

pub mod tasks;

use crate::error::{TaskError, TaskResult};
use rusqlite::{Connection, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

/// How long a connection waits on a locked file store before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

static MEMORY_DB_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Clone)]
enum Target {
    File(PathBuf),
    /// Shared-cache in-memory database. The anchor connection keeps it alive
    /// for as long as any clone of the handle exists.
    Memory {
        uri: String,
        _anchor: Arc<Mutex<Connection>>,
    },
}

/// Database handle. Cheap to clone.
#[derive(Clone)]
pub struct Database {
    target: Target,
}

impl Database {
    /// Open or create the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> TaskResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(TaskError::database)?;
        }

        let conn = Connection::open(&path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        tasks::ensure_schema(&conn)?;
        debug!(path = %path.display(), "Opened task database");

        Ok(Self {
            target: Target::File(path),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> TaskResult<Self> {
        let n = MEMORY_DB_COUNTER.fetch_add(1, Ordering::Relaxed);
        let uri = format!(
            "file:tasklist-mem-{}-{}?mode=memory&cache=shared",
            std::process::id(),
            n
        );
        let anchor = Connection::open(&uri)?;
        tasks::ensure_schema(&anchor)?;

        Ok(Self {
            target: Target::Memory {
                uri,
                _anchor: Arc::new(Mutex::new(anchor)),
            },
        })
    }

    /// Path of the backing file, if this is a file store.
    pub fn path(&self) -> Option<&Path> {
        match &self.target {
            Target::File(path) => Some(path),
            Target::Memory { .. } => None,
        }
    }

    fn connect(&self) -> TaskResult<Connection> {
        let conn = match &self.target {
            Target::File(path) => {
                let conn = Connection::open(path)?;
                conn.busy_timeout(BUSY_TIMEOUT)?;
                conn
            }
            Target::Memory { uri, .. } => Connection::open(uri)?,
        };
        Ok(conn)
    }

    /// Run `f` on a fresh connection. The connection is closed when this
    /// returns, whether `f` succeeded or not.
    pub fn with_conn<F, T>(&self, f: F) -> TaskResult<T>
    where
        F: FnOnce(&Connection) -> TaskResult<T>,
    {
        let conn = self.connect()?;
        f(&conn)
    }

    /// Run `f` inside a transaction on a fresh connection. Commits when `f`
    /// succeeds; any error rolls the transaction back.
    ///
    /// The write lock is taken at `BEGIN`, so a read-then-write body waits
    /// out the busy timeout instead of failing when another writer holds it.
    pub fn with_transaction<F, T>(&self, f: F) -> TaskResult<T>
    where
        F: FnOnce(&Connection) -> TaskResult<T>,
    {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&*tx)?;
        tx.commit()?;
        Ok(value)
    }
}
