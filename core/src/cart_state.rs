// storefront_core/src/cart_state.rs

//! Client-held cart state: a keyed collection of display entries with a
//! derived total, optionally mirrored to durable storage.
//!
//! The prices kept here are whatever the catalog showed when the item was
//! added. They drive the displayed total only; [`CartState::checkout_lines`]
//! deliberately drops them so checkout always re-prices on the server.

use crate::domain::CartLine;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
  pub id: Uuid,
  pub name: String,
  pub price_cents: i64,
  pub qty: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
  items: Vec<CartEntry>,
  total_price_cents: i64,
}

impl CartState {
  pub fn new() -> Self {
    Self::default()
  }

  /// Rebuilds a state from persisted entries, dropping non-positive
  /// quantities and merging repeated ids.
  pub fn from_entries(entries: Vec<CartEntry>) -> Self {
    let mut state = Self::new();
    for entry in entries {
      state.add_item(entry);
    }
    state
  }

  pub fn items(&self) -> &[CartEntry] {
    &self.items
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn total_price_cents(&self) -> i64 {
    self.total_price_cents
  }

  /// Adds an entry, or raises the quantity of the entry already present for
  /// the same product. The display name and price are refreshed from `entry`.
  pub fn add_item(&mut self, entry: CartEntry) {
    if entry.qty <= 0 {
      return;
    }
    match self.items.iter_mut().find(|i| i.id == entry.id) {
      Some(existing) => {
        existing.qty = existing.qty.saturating_add(entry.qty);
        existing.name = entry.name;
        existing.price_cents = entry.price_cents;
      }
      None => self.items.push(entry),
    }
    self.recompute();
  }

  /// Sets the quantity for `id`; a quantity of zero or less removes it.
  pub fn update_quantity(&mut self, id: Uuid, qty: i32) {
    if qty <= 0 {
      self.items.retain(|i| i.id != id);
    } else if let Some(existing) = self.items.iter_mut().find(|i| i.id == id) {
      existing.qty = qty;
    }
    self.recompute();
  }

  pub fn remove_item(&mut self, id: Uuid) {
    self.items.retain(|i| i.id != id);
    self.recompute();
  }

  pub fn clear(&mut self) {
    self.items.clear();
    self.recompute();
  }

  /// Ids and quantities only, in the order they were added.
  pub fn checkout_lines(&self) -> Vec<CartLine> {
    self.items.iter().map(|i| CartLine::new(i.id, i.qty)).collect()
  }

  fn recompute(&mut self) {
    self.total_price_cents = self
      .items
      .iter()
      .map(|i| i.price_cents.saturating_mul(i64::from(i.qty)))
      .fold(0i64, i64::saturating_add);
  }
}

/// Durable mirror for a [`CartStore`].
pub trait CartPersistence: Send + Sync {
  fn load(&self) -> anyhow::Result<Option<Vec<CartEntry>>>;
  fn save(&self, entries: &[CartEntry]) -> anyhow::Result<()>;
}

/// Keeps the cart in memory only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPersistence;

impl CartPersistence for NoPersistence {
  fn load(&self) -> anyhow::Result<Option<Vec<CartEntry>>> {
    Ok(None)
  }

  fn save(&self, _entries: &[CartEntry]) -> anyhow::Result<()> {
    Ok(())
  }
}

/// Mirrors the cart entries to a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
  path: PathBuf,
}

impl JsonFilePersistence {
  pub fn new(path: impl AsRef<Path>) -> Self {
    Self {
      path: path.as_ref().to_path_buf(),
    }
  }
}

impl CartPersistence for JsonFilePersistence {
  fn load(&self) -> anyhow::Result<Option<Vec<CartEntry>>> {
    if !self.path.exists() {
      return Ok(None);
    }
    let raw = std::fs::read_to_string(&self.path)?;
    Ok(Some(serde_json::from_str(&raw)?))
  }

  fn save(&self, entries: &[CartEntry]) -> anyhow::Result<()> {
    std::fs::write(&self.path, serde_json::to_string(entries)?)?;
    Ok(())
  }
}

/// Shared cart with every mutation mirrored to its persistence.
///
/// A failed save is logged and the in-memory state is kept; the next
/// successful save writes the full state again.
pub struct CartStore<P: CartPersistence = NoPersistence> {
  state: RwLock<CartState>,
  persistence: P,
}

impl<P: CartPersistence> CartStore<P> {
  /// Restores the cart from `persistence`. Unreadable data starts an empty cart.
  pub fn open(persistence: P) -> Self {
    let state = match persistence.load() {
      Ok(Some(entries)) => CartState::from_entries(entries),
      Ok(None) => CartState::new(),
      Err(e) => {
        warn!(error = %e, "Stored cart could not be read; starting empty.");
        CartState::new()
      }
    };
    Self {
      state: RwLock::new(state),
      persistence,
    }
  }

  pub fn snapshot(&self) -> CartState {
    self.state.read().clone()
  }

  pub fn total_price_cents(&self) -> i64 {
    self.state.read().total_price_cents()
  }

  pub fn checkout_lines(&self) -> Vec<CartLine> {
    self.state.read().checkout_lines()
  }

  pub fn add_item(&self, entry: CartEntry) {
    self.mutate(|s| s.add_item(entry));
  }

  pub fn update_quantity(&self, id: Uuid, qty: i32) {
    self.mutate(|s| s.update_quantity(id, qty));
  }

  pub fn remove_item(&self, id: Uuid) {
    self.mutate(|s| s.remove_item(id));
  }

  pub fn clear(&self) {
    self.mutate(CartState::clear);
  }

  fn mutate(&self, f: impl FnOnce(&mut CartState)) {
    let mut guard = self.state.write();
    f(&mut *guard);
    if let Err(e) = self.persistence.save(guard.items()) {
      warn!(error = %e, "Failed to persist cart.");
    } else {
      debug!(items = guard.items().len(), total_cents = guard.total_price_cents(), "Cart persisted.");
    }
  }
}
