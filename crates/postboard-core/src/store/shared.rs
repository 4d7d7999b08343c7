//! Lazily opened, exactly-once user store.

use std::path::{Path, PathBuf};

use tokio::sync::OnceCell;

use super::UserStore;
use crate::error::Result;

enum Location {
    File(PathBuf),
    Memory,
}

/// Owner of the process's single [`UserStore`].
///
/// The composition root holds one `SharedStore` and hands out the store it
/// opens. The first `get` opens the backing file; concurrent first calls
/// wait on the same initialization, so exactly one connection is created.
pub struct SharedStore {
    location: Location,
    cell: OnceCell<UserStore>,
}

impl SharedStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            location: Location::File(path),
            cell: OnceCell::new(),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            location: Location::Memory,
            cell: OnceCell::new(),
        }
    }

    /// The store, opening it on first use.
    ///
    /// A failed open leaves the cell empty so a later call can retry.
    pub async fn get(&self) -> Result<&UserStore> {
        self.cell
            .get_or_try_init(|| async {
                match &self.location {
                    Location::File(path) => UserStore::open_path(path.clone()).await,
                    Location::Memory => UserStore::open_in_memory(),
                }
            })
            .await
    }

    /// The store if it has already been opened
    pub fn get_if_open(&self) -> Option<&UserStore> {
        self.cell.get()
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            Location::File(path) => Some(path),
            Location::Memory => None,
        }
    }
}
