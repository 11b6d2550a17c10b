// korb/src/model/line_item.rs

//! Data shapes for a cart entry and its option sub-entries.
//!
//! These structs carry no logic of their own; the invariants over them
//! (uniqueness, no empty placeholders, quantity floors) are enforced by the
//! mutation primitives on [`crate::model::CartView`].

use serde::{Deserialize, Serialize};

/// One product's presence in a cart.
///
/// When `option_required` is true the bare product is never purchasable on
/// its own: `quantity` stays 0 and every purchasable unit lives in
/// `options`. When it is false the line itself is the purchasable unit and
/// `options` stays empty.
///
/// All monetary fields are non-negative integers in the smallest currency
/// unit. The persisted/remote wire shape uses camelCase field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
  pub product_id: String,
  pub product_name: String,
  pub category_name: String,
  /// Unit price of the base product.
  pub price: u32,
  /// Base per-item shipping cost, charged unless the line clears the
  /// free-shipping threshold.
  pub shipping_price: u32,
  /// Display only, never consulted by any logic here.
  pub images: Vec<String>,
  pub option_required: bool,
  /// Quantity of the bare product. Meaningful only when `option_required`
  /// is false; expected to be 0 otherwise.
  pub quantity: u32,
  pub options: Vec<CartOption>,
}

impl LineItem {
  /// Total purchasable units on this line: the bare quantity plus every
  /// option's quantity. This is the quantity handed to the payment session.
  pub fn unit_count(&self) -> u32 {
    self.quantity + self.options.iter().map(|o| o.quantity).sum::<u32>()
  }

  /// A line is empty when nothing on it is purchasable: a required-option
  /// line with no options left, or a bare line whose quantity reached 0.
  /// Empty lines must be removed, never retained as placeholders.
  pub fn is_empty(&self) -> bool {
    self.options.is_empty() && self.quantity == 0
  }
}

/// One selected variant nested under a product's [`LineItem`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartOption {
  /// Server-assigned row identifier. Empty string for guest-local entries
  /// that have never been synced; the remote store supersedes it on merge.
  pub cart_line_id: String,
  pub option_id: String,
  pub option_name: String,
  pub option_price: u32,
  /// Always >= 1 for an existing row; decrementing below 1 is rejected.
  pub quantity: u32,
}

/// Product metadata carried by an add-to-cart command, enough to
/// materialize a new [`LineItem`] client-side when none exists yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRef {
  pub product_id: String,
  pub product_name: String,
  pub category_name: String,
  pub price: u32,
  pub shipping_price: u32,
  pub images: Vec<String>,
  pub option_required: bool,
}

/// Option metadata carried by an add-to-cart command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRef {
  pub option_id: String,
  pub option_name: String,
  pub option_price: u32,
}

/// The add-to-cart command payload used from product-detail flows.
///
/// `option: None` targets the bare product; `Some` targets (or creates) the
/// matching option row under the product's line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartAddition {
  pub product: ProductRef,
  pub option: Option<OptionRef>,
  pub quantity: u32,
}

impl CartAddition {
  /// Materializes a fresh [`LineItem`] for a product not yet in the cart.
  pub(crate) fn to_line_item(&self) -> LineItem {
    let (quantity, options) = match &self.option {
      Some(opt) => (
        0,
        vec![CartOption {
          cart_line_id: String::new(),
          option_id: opt.option_id.clone(),
          option_name: opt.option_name.clone(),
          option_price: opt.option_price,
          quantity: self.quantity,
        }],
      ),
      None => (self.quantity, Vec::new()),
    };
    LineItem {
      product_id: self.product.product_id.clone(),
      product_name: self.product.product_name.clone(),
      category_name: self.product.category_name.clone(),
      price: self.product.price,
      shipping_price: self.product.shipping_price,
      images: self.product.images.clone(),
      option_required: self.product.option_required,
      quantity,
      options,
    }
  }
}

/// One `{product_id, quantity}` pair handed to the payment session at
/// checkout. Produced from the checked subset of the view, consumed
/// downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLine {
  pub product_id: String,
  pub quantity: u32,
}
