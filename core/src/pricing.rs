// korb/src/pricing.rs

//! Pure derivation of monetary totals from a cart view.
//!
//! Everything here is side-effect free and integer-only: all values are
//! non-negative integers in the smallest currency unit, and no rounding or
//! floating-point arithmetic appears anywhere. Totals are widened to `u64`
//! so large carts cannot overflow the `u32` unit prices.

use crate::error::{KorbError, KorbResult};
use crate::model::{CartView, LineItem};
use std::env;

/// Default free-shipping threshold, in minor currency units.
pub const DEFAULT_FREE_SHIPPING_THRESHOLD: u64 = 50_000;

/// Pricing policy injected into the calculator rather than hard-coded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingPolicy {
  /// A line whose subtotal reaches this value ships free.
  pub free_shipping_threshold: u64,
}

impl Default for PricingPolicy {
  fn default() -> Self {
    Self {
      free_shipping_threshold: DEFAULT_FREE_SHIPPING_THRESHOLD,
    }
  }
}

impl PricingPolicy {
  pub fn new(free_shipping_threshold: u64) -> Self {
    Self { free_shipping_threshold }
  }

  /// Loads the policy from the environment, falling back to the default
  /// threshold when `KORB_FREE_SHIPPING_THRESHOLD` is unset.
  pub fn from_env() -> KorbResult<Self> {
    let threshold = match env::var("KORB_FREE_SHIPPING_THRESHOLD") {
      Ok(raw) => raw.parse::<u64>().map_err(|e| KorbError::Configuration {
        message: format!("Invalid KORB_FREE_SHIPPING_THRESHOLD '{}': {}", raw, e),
      })?,
      Err(_) => DEFAULT_FREE_SHIPPING_THRESHOLD,
    };
    tracing::debug!(free_shipping_threshold = threshold, "Pricing policy loaded.");
    Ok(Self::new(threshold))
  }
}

/// Aggregate totals over the checked subset of a view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartTotals {
  pub subtotal: u64,
  pub shipping: u64,
}

/// `price * quantity` plus every option's `option_price * quantity`.
///
/// A required-option line carries `quantity = 0` by invariant, so its first
/// term contributes nothing; no special case is needed here.
pub fn line_subtotal(item: &LineItem) -> u64 {
  let base = item.price as u64 * item.quantity as u64;
  let options: u64 = item
    .options
    .iter()
    .map(|o| o.option_price as u64 * o.quantity as u64)
    .sum();
  base + options
}

/// Zero once the line's subtotal reaches the free-shipping threshold,
/// otherwise the line's base shipping price.
pub fn line_shipping(item: &LineItem, policy: &PricingPolicy) -> u64 {
  if line_subtotal(item) >= policy.free_shipping_threshold {
    0
  } else {
    item.shipping_price as u64
  }
}

/// Sums subtotal and shipping over checked lines only. Users pay for what
/// they selected; unchecked lines are excluded from both sums.
pub fn cart_totals(view: &CartView, policy: &PricingPolicy) -> CartTotals {
  let mut totals = CartTotals::default();
  for line in view.lines().iter().filter(|l| l.checked) {
    totals.subtotal += line_subtotal(&line.item);
    totals.shipping += line_shipping(&line.item, policy);
  }
  totals
}
