// tests/concurrency_tests.rs
mod common;

use common::*;
use std::sync::Arc;
use storefront_core::{CheckoutError, MemoryStore};
use tokio::sync::Barrier;
use uuid::Uuid;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_buyers_for_last_unit_exactly_one_wins() {
  setup_tracing();
  let store = MemoryStore::new();
  let a = store.insert_product("Last One", 1500, 1).await;
  let checkout = Arc::new(checkout_over(&store));
  let barrier = Arc::new(Barrier::new(2));

  let mut handles = Vec::new();
  for _ in 0..2 {
    let checkout = checkout.clone();
    let barrier = barrier.clone();
    handles.push(tokio::spawn(async move {
      barrier.wait().await;
      checkout.place_order(Some(Uuid::new_v4()), vec![line(a, 1)]).await
    }));
  }

  let mut successes = 0;
  let mut insufficient = 0;
  for handle in handles {
    match handle.await.unwrap() {
      Ok(_) => successes += 1,
      Err(CheckoutError::InsufficientStock { available, .. }) => {
        assert_eq!(available, 0);
        insufficient += 1;
      }
      Err(other) => panic!("Unexpected checkout error: {:?}", other),
    }
  }

  assert_eq!(successes, 1);
  assert_eq!(insufficient, 1);
  assert_eq!(stock_of(&store, a).await, 0);
  assert_eq!(store.order_count().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_full_stock_requests_race_without_overselling() {
  setup_tracing();
  let store = MemoryStore::new();
  let a = store.insert_product("Batch", 200, 7).await;
  let checkout = Arc::new(checkout_over(&store));

  let handles: Vec<_> = (0..8)
    .map(|_| {
      let checkout = checkout.clone();
      tokio::spawn(async move { checkout.place_order(Some(Uuid::new_v4()), vec![line(a, 7)]).await })
    })
    .collect();

  let mut successes = 0;
  for handle in handles {
    match handle.await.unwrap() {
      Ok(receipt) => {
        assert_eq!(receipt.total_cents, 1400);
        successes += 1;
      }
      Err(CheckoutError::InsufficientStock { .. }) => {}
      Err(other) => panic!("Unexpected checkout error: {:?}", other),
    }
  }

  assert_eq!(successes, 1);
  assert_eq!(stock_of(&store, a).await, 0);
  assert_eq!(store.order_count().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_single_unit_buyers_never_drive_stock_negative() {
  setup_tracing();
  let store = MemoryStore::new();
  let a = store.insert_product("Popular", 100, 10).await;
  let b = store.insert_product("Companion", 50, 100).await;
  let checkout = Arc::new(checkout_over(&store));

  let handles: Vec<_> = (0..25)
    .map(|_| {
      let checkout = checkout.clone();
      tokio::spawn(async move {
        checkout
          .place_order(Some(Uuid::new_v4()), vec![line(b, 1), line(a, 1)])
          .await
      })
    })
    .collect();

  let mut successes = 0;
  for handle in handles {
    if handle.await.unwrap().is_ok() {
      successes += 1;
    }
  }

  assert_eq!(successes, 10);
  assert_eq!(stock_of(&store, a).await, 0);
  // Failed checkouts must not have taken anything from the companion product.
  assert_eq!(stock_of(&store, b).await, 90);
  assert_eq!(store.order_count().await, 10);
}
