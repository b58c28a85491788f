mod movies;
mod reviews;
mod seed;
mod users;

pub use movies::MovieDb;
pub use reviews::ReviewDb;
pub use users::UserDb;

use crate::config::Config;
use crate::error::Result;
use log::info;

const USERS: &[u8] = b"users";
const USERS_USERNAME: &[u8] = b"users_username";
const MOVIES: &[u8] = b"movies";
const MOVIES_TITLE: &[u8] = b"movies_title";
const MOVIES_FINGERPRINT: &[u8] = b"movies_fingerprint";
const REVIEWS: &[u8] = b"reviews";

// Big-endian so that sled's lexicographic key order matches numeric order.
fn serialize_id(id: u64) -> [u8; 8] {
    id.to_be_bytes()
}

/// Handle to the persistent store. Cloning is cheap and every clone shares
/// the same underlying database; each operation opens the trees it needs and
/// releases them when it returns.
#[derive(Clone)]
pub struct Store {
    db: sled::Db,
    password_cost: u32,
}

impl Store {
    pub fn new(db: sled::Db, password_cost: u32) -> Self {
        Store { db, password_cost }
    }

    /// Opens the database described by `config` and seeds the catalog if it
    /// is empty.
    pub fn open(config: &Config) -> Result<Self> {
        let db = sled::Config::new()
            .path(&config.db)
            .temporary(config.temporary)
            .open()?;
        let store = Store::new(db, config.bcrypt_cost);
        let seeded = store.seed_movies()?;
        if seeded > 0 {
            info!("Seeded catalog with {} movies", seeded);
        }
        Ok(store)
    }

    #[cfg(test)]
    pub fn temporary() -> Self {
        let db = sled::Config::new().temporary(true).open().unwrap();
        Store::new(db, 4)
    }

    /// Ids start at 1 so that 0 can be treated as "missing" by callers.
    fn next_id(&self) -> Result<u64> {
        Ok(self.db.generate_id()? + 1)
    }

    fn tree(&self, name: &[u8]) -> Result<sled::Tree> {
        Ok(self.db.open_tree(name)?)
    }
}
