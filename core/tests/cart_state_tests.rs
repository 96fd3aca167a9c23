// tests/cart_state_tests.rs
mod common;

use common::*;
use storefront_core::{CartEntry, CartLine, CartPersistence, CartState, CartStore, JsonFilePersistence, NoPersistence};
use tempfile::tempdir;
use uuid::Uuid;

fn entry(id: Uuid, name: &str, price_cents: i64, qty: i32) -> CartEntry {
  CartEntry {
    id,
    name: name.to_string(),
    price_cents,
    qty,
  }
}

#[test]
fn test_total_follows_every_mutation() {
  setup_tracing();
  let a = Uuid::new_v4();
  let b = Uuid::new_v4();
  let mut cart = CartState::new();
  assert_eq!(cart.total_price_cents(), 0);

  cart.add_item(entry(a, "A", 1000, 2));
  assert_eq!(cart.total_price_cents(), 2000);

  cart.add_item(entry(b, "B", 300, 1));
  assert_eq!(cart.total_price_cents(), 2300);

  cart.add_item(entry(a, "A", 1000, 1));
  assert_eq!(cart.items().len(), 2);
  assert_eq!(cart.total_price_cents(), 3300);

  cart.update_quantity(b, 4);
  assert_eq!(cart.total_price_cents(), 4200);

  cart.remove_item(a);
  assert_eq!(cart.total_price_cents(), 1200);

  cart.clear();
  assert!(cart.is_empty());
  assert_eq!(cart.total_price_cents(), 0);
}

#[test]
fn test_update_to_zero_removes_entry() {
  let a = Uuid::new_v4();
  let mut cart = CartState::new();
  cart.add_item(entry(a, "A", 100, 3));
  cart.update_quantity(a, 0);
  assert!(cart.is_empty());

  // Unknown ids are ignored.
  cart.update_quantity(Uuid::new_v4(), 5);
  assert!(cart.is_empty());
}

#[test]
fn test_checkout_lines_carry_ids_and_quantities_only() {
  let a = Uuid::new_v4();
  let b = Uuid::new_v4();
  let mut cart = CartState::new();
  cart.add_item(entry(a, "A", 100, 1));
  cart.add_item(entry(b, "B", 999_999, 2));

  assert_eq!(cart.checkout_lines(), vec![CartLine::new(a, 1), CartLine::new(b, 2)]);
}

#[test]
fn test_store_mirrors_to_json_file_and_restores() {
  setup_tracing();
  let dir = tempdir().unwrap();
  let path = dir.path().join("cart.json");
  let a = Uuid::new_v4();
  let b = Uuid::new_v4();

  {
    let store = CartStore::open(JsonFilePersistence::new(&path));
    store.add_item(entry(a, "A", 500, 2));
    store.add_item(entry(b, "B", 250, 1));
    store.update_quantity(b, 3);
  }

  let saved = JsonFilePersistence::new(&path).load().unwrap().unwrap();
  assert_eq!(saved.len(), 2);

  let reopened = CartStore::open(JsonFilePersistence::new(&path));
  let snapshot = reopened.snapshot();
  assert_eq!(snapshot.items().len(), 2);
  assert_eq!(reopened.total_price_cents(), 500 * 2 + 250 * 3);

  reopened.clear();
  let saved = JsonFilePersistence::new(&path).load().unwrap().unwrap();
  assert!(saved.is_empty());
}

#[test]
fn test_corrupt_file_starts_an_empty_cart() {
  setup_tracing();
  let dir = tempdir().unwrap();
  let path = dir.path().join("cart.json");
  std::fs::write(&path, "not json").unwrap();

  let store = CartStore::open(JsonFilePersistence::new(&path));
  assert!(store.snapshot().is_empty());
}

#[test]
fn test_memory_only_store() {
  let store = CartStore::open(NoPersistence);
  let a = Uuid::new_v4();
  store.add_item(entry(a, "A", 10, 1));
  store.remove_item(a);
  assert!(store.checkout_lines().is_empty());
}
