//! Repository contract
//!
//! The whole-collection interface the service layer programs against: save
//! an authoritative collection, load it back, clear it.

use crate::codec::Record;
use crate::engine::Store;
use crate::error::Result;

/// Bulk persistence of a record collection
pub trait Repository<T> {
    /// Replace the persisted collection with `items`
    fn save(&mut self, items: &[T]) -> Result<()>;

    /// Load the full collection
    fn load(&mut self) -> Result<Vec<T>>;

    /// Remove every persisted item
    fn clear(&mut self) -> Result<()>;
}

impl<T: Record> Repository<T> for Store<T> {
    fn save(&mut self, items: &[T]) -> Result<()> {
        Store::save(self, items.iter().cloned()).map(|_| ())
    }

    fn load(&mut self) -> Result<Vec<T>> {
        self.load_all()
    }

    fn clear(&mut self) -> Result<()> {
        Store::clear(self).map(|_| ())
    }
}
