// storefront_core/src/domain/cart.rs

use crate::error::{CheckoutError, CheckoutResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One product/quantity intent as submitted by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
  pub product_id: Uuid,
  pub quantity: i32,
}

impl CartLine {
  pub fn new(product_id: Uuid, quantity: i32) -> Self {
    Self { product_id, quantity }
  }
}

/// A validated, non-empty cart with one line per product.
///
/// Lines keep the order in which each product first appeared in the
/// submitted list, so validation errors name the same product a client
/// would see first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
  lines: Vec<CartLine>,
}

impl Cart {
  /// Validates raw lines: rejects an empty list and non-positive quantities,
  /// and merges repeated product ids by summing their quantities.
  pub fn from_lines(raw: impl IntoIterator<Item = CartLine>) -> CheckoutResult<Self> {
    let mut lines: Vec<CartLine> = Vec::new();

    for line in raw {
      if line.quantity <= 0 {
        return Err(CheckoutError::InvalidQuantity {
          product_id: line.product_id,
          quantity: i64::from(line.quantity),
        });
      }

      match lines.iter_mut().find(|l| l.product_id == line.product_id) {
        Some(existing) => {
          existing.quantity = existing.quantity.checked_add(line.quantity).ok_or(CheckoutError::InvalidQuantity {
            product_id: line.product_id,
            quantity: i64::from(existing.quantity) + i64::from(line.quantity),
          })?;
        }
        None => lines.push(line),
      }
    }

    if lines.is_empty() {
      return Err(CheckoutError::EmptyCart);
    }
    Ok(Self { lines })
  }

  pub fn lines(&self) -> &[CartLine] {
    &self.lines
  }

  pub fn product_ids(&self) -> Vec<Uuid> {
    self.lines.iter().map(|l| l.product_id).collect()
  }

  pub fn len(&self) -> usize {
    self.lines.len()
  }

  /// Always false for a constructed cart; present for API symmetry with `len`.
  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  /// Lines sorted by product id. Stock is decremented in this order so that
  /// concurrent checkouts lock product rows consistently.
  pub fn lines_in_lock_order(&self) -> Vec<CartLine> {
    let mut sorted = self.lines.clone();
    sorted.sort_by_key(|l| l.product_id);
    sorted
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_input_is_rejected() {
    let err = Cart::from_lines(Vec::new()).unwrap_err();
    assert!(matches!(err, CheckoutError::EmptyCart));
  }

  #[test]
  fn zero_and_negative_quantities_are_rejected() {
    let id = Uuid::new_v4();
    for qty in [0, -3] {
      let err = Cart::from_lines(vec![CartLine::new(id, qty)]).unwrap_err();
      match err {
        CheckoutError::InvalidQuantity { product_id, quantity } => {
          assert_eq!(product_id, id);
          assert_eq!(quantity, i64::from(qty));
        }
        other => panic!("Expected InvalidQuantity, got {:?}", other),
      }
    }
  }

  #[test]
  fn repeated_products_are_merged_in_first_seen_order() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let cart = Cart::from_lines(vec![CartLine::new(a, 1), CartLine::new(b, 2), CartLine::new(a, 4)]).unwrap();

    assert_eq!(cart.len(), 2);
    assert_eq!(cart.lines()[0], CartLine::new(a, 5));
    assert_eq!(cart.lines()[1], CartLine::new(b, 2));
  }

  #[test]
  fn merged_quantity_overflow_is_rejected() {
    let a = Uuid::new_v4();
    let err = Cart::from_lines(vec![CartLine::new(a, i32::MAX), CartLine::new(a, 1)]).unwrap_err();
    assert!(matches!(err, CheckoutError::InvalidQuantity { .. }));
  }

  #[test]
  fn lock_order_is_sorted_by_product_id() {
    let ids: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
    let cart = Cart::from_lines(ids.iter().map(|id| CartLine::new(*id, 1))).unwrap();

    let mut expected = ids.clone();
    expected.sort();
    let ordered: Vec<Uuid> = cart.lines_in_lock_order().iter().map(|l| l.product_id).collect();
    assert_eq!(ordered, expected);
  }
}
