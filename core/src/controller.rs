// korb/src/controller.rs

//! The intent boundary consumed by the UI.
//!
//! Translates user intents into engine calls and re-reads the totals after
//! every mutation, so the rendering layer always gets a price consistent
//! with the view it is about to draw. Destructive intents are gated behind
//! the confirmation dialog here, keeping the engine confirmation-agnostic:
//! request, await the external answer, then commit.

use crate::collab::{ConfirmationDialog, PaymentSession};
use crate::engine::CartEngine;
use crate::error::{KorbError, KorbResult};
use crate::model::CartAddition;
use crate::pricing::{cart_totals, CartTotals, PricingPolicy};
use std::sync::Arc;
use tracing::{debug, info};

pub struct CartController {
  engine: Arc<CartEngine>,
  policy: PricingPolicy,
  confirm: Arc<dyn ConfirmationDialog>,
  payment: Arc<dyn PaymentSession>,
}

impl CartController {
  pub fn new(
    engine: Arc<CartEngine>,
    policy: PricingPolicy,
    confirm: Arc<dyn ConfirmationDialog>,
    payment: Arc<dyn PaymentSession>,
  ) -> Self {
    Self {
      engine,
      policy,
      confirm,
      payment,
    }
  }

  /// Totals over the currently checked lines.
  pub fn totals(&self) -> CartTotals {
    cart_totals(&self.engine.state().read(), &self.policy)
  }

  /// Loads the view from the authoritative store and prices it.
  pub async fn refresh(&self) -> KorbResult<CartTotals> {
    self.engine.load_view().await?;
    Ok(self.totals())
  }

  pub fn toggle_line(&self, index: usize, checked: bool) -> CartTotals {
    self.engine.set_checked(index, checked);
    self.totals()
  }

  pub fn toggle_all(&self, checked: bool) -> CartTotals {
    self.engine.set_all_checked(checked);
    self.totals()
  }

  pub async fn add_to_cart(&self, addition: &CartAddition) -> KorbResult<CartTotals> {
    self.engine.add_or_increment(addition).await?;
    Ok(self.totals())
  }

  pub async fn change_quantity(
    &self,
    product_id: &str,
    option_id: Option<&str>,
    current_quantity: u32,
    delta: i64,
  ) -> KorbResult<CartTotals> {
    self
      .engine
      .change_quantity(product_id, option_id, current_quantity, delta)
      .await?;
    Ok(self.totals())
  }

  /// Deletes one line (or one option row) after explicit confirmation.
  /// Returns `None` when the user declines; nothing is mutated anywhere.
  pub async fn remove_line(&self, product_id: &str, option_id: Option<&str>) -> KorbResult<Option<CartTotals>> {
    let confirmed = self
      .confirm
      .confirm("Remove item", "Remove this item from your cart?")
      .await;
    if !confirmed {
      debug!(product_id, "Line removal declined.");
      return Ok(None);
    }
    self.engine.remove_line(product_id, option_id).await?;
    Ok(Some(self.totals()))
  }

  /// Deletes every checked line after explicit confirmation. Returns `None`
  /// when the user declines.
  pub async fn remove_selected(&self) -> KorbResult<Option<CartTotals>> {
    let confirmed = self
      .confirm
      .confirm("Remove selected items", "Remove all selected items from your cart?")
      .await;
    if !confirmed {
      debug!("Selected-lines removal declined.");
      return Ok(None);
    }
    self.engine.remove_selected().await?;
    Ok(Some(self.totals()))
  }

  /// Hands the checked `{product_id, quantity}` pairs to the payment
  /// session and returns its opaque identifier. An empty selection makes no
  /// hand-off and returns `None`.
  pub async fn checkout(&self) -> KorbResult<Option<String>> {
    let lines = self.engine.state().read().checkout_lines();
    if lines.is_empty() {
      debug!("Checkout requested with nothing selected; no hand-off.");
      return Ok(None);
    }
    let session_id = self
      .payment
      .begin(&lines)
      .await
      .map_err(|source| KorbError::Collaborator { source })?;
    info!(%session_id, line_count = lines.len(), "Checkout handed off to payment session.");
    Ok(Some(session_id))
  }
}
