// korb/src/model/view.rs

//! The in-memory, render-facing cart representation and its mutation
//! primitives.
//!
//! `CartView` is the only place cart invariants are enforced:
//!  - at most one line per product id, at most one option per option id
//!    (repeated adds increment instead of duplicating);
//!  - no empty placeholder lines survive a removal;
//!  - quantities never drop below 1 through a delta.
//!
//! Both the engine's optimistic view and the guest store's persisted
//! snapshot mutate through these primitives, so the two cannot drift apart
//! on semantics. The `checked` selection flag exists only here and is
//! stripped before anything reaches a backing store.

use crate::model::line_item::{CartAddition, CheckoutLine, LineItem};

/// One line of the view: a [`LineItem`] decorated with the UI-only
/// selection flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewLine {
  pub item: LineItem,
  pub checked: bool,
}

/// Aggregate selection state, derivable at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
  /// The cart has no lines at all.
  Empty,
  /// No line is checked.
  None,
  /// Some but not all lines are checked.
  Partial,
  /// Every line is checked.
  All,
}

/// The in-memory cart view. Ordered, cheap to clone, never persisted as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartView {
  lines: Vec<ViewLine>,
}

impl CartView {
  /// Decorates a stored snapshot: every line starts unchecked.
  pub fn from_items(items: Vec<LineItem>) -> Self {
    Self {
      lines: items.into_iter().map(|item| ViewLine { item, checked: false }).collect(),
    }
  }

  /// Strips the selection flags, yielding the persistable shape.
  pub fn into_items(self) -> Vec<LineItem> {
    self.lines.into_iter().map(|line| line.item).collect()
  }

  /// Clones the persistable shape without consuming the view.
  pub fn snapshot_items(&self) -> Vec<LineItem> {
    self.lines.iter().map(|line| line.item.clone()).collect()
  }

  pub fn lines(&self) -> &[ViewLine] {
    &self.lines
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  pub fn len(&self) -> usize {
    self.lines.len()
  }

  // --- Selection (never touches a backing store) ---

  /// Sets the selection flag of one line. Out-of-range indexes are ignored.
  pub fn set_checked(&mut self, index: usize, checked: bool) {
    if let Some(line) = self.lines.get_mut(index) {
      line.checked = checked;
    }
  }

  /// Sets every line's selection flag. A no-op on an empty cart.
  pub fn set_all_checked(&mut self, checked: bool) {
    for line in &mut self.lines {
      line.checked = checked;
    }
  }

  pub fn selection(&self) -> Selection {
    if self.lines.is_empty() {
      return Selection::Empty;
    }
    let checked = self.lines.iter().filter(|l| l.checked).count();
    match checked {
      0 => Selection::None,
      n if n == self.lines.len() => Selection::All,
      _ => Selection::Partial,
    }
  }

  pub fn checked_product_ids(&self) -> Vec<String> {
    self
      .lines
      .iter()
      .filter(|l| l.checked)
      .map(|l| l.item.product_id.clone())
      .collect()
  }

  /// The checked subset as `{product_id, quantity}` pairs for the payment
  /// hand-off. Quantity is the line's total unit count.
  pub fn checkout_lines(&self) -> Vec<CheckoutLine> {
    self
      .lines
      .iter()
      .filter(|l| l.checked)
      .map(|l| CheckoutLine {
        product_id: l.item.product_id.clone(),
        quantity: l.item.unit_count(),
      })
      .collect()
  }

  // --- Mutation primitives (invariant enforcement boundary) ---

  /// Adds the target of `addition` or increments it when it already exists.
  ///
  /// At most one line per product id and one option per option id ever
  /// results, regardless of how often this is called. Zero-quantity
  /// additions are dropped so they can never create an empty placeholder.
  pub fn upsert(&mut self, addition: &CartAddition) {
    if addition.quantity == 0 {
      tracing::debug!(product_id = %addition.product.product_id, "dropping zero-quantity addition");
      return;
    }
    let existing = self
      .lines
      .iter_mut()
      .find(|l| l.item.product_id == addition.product.product_id);

    let line = match existing {
      Some(line) => line,
      None => {
        self.lines.push(ViewLine {
          item: addition.to_line_item(),
          checked: false,
        });
        return;
      }
    };

    match &addition.option {
      Some(opt) => {
        if let Some(row) = line.item.options.iter_mut().find(|o| o.option_id == opt.option_id) {
          row.quantity += addition.quantity;
        } else {
          line.item.options.push(crate::model::CartOption {
            cart_line_id: String::new(),
            option_id: opt.option_id.clone(),
            option_name: opt.option_name.clone(),
            option_price: opt.option_price,
            quantity: addition.quantity,
          });
        }
      }
      None => {
        line.item.quantity += addition.quantity;
      }
    }
  }

  /// Applies a quantity delta to the bare product (`option_id: None`) or to
  /// the matching option row. Returns false (leaving the view unchanged)
  /// when the target does not exist or the resulting quantity would fall
  /// below 1.
  pub fn apply_delta(&mut self, product_id: &str, option_id: Option<&str>, delta: i64) -> bool {
    let option_id = option_id.filter(|id| !id.is_empty());
    let Some(line) = self.lines.iter_mut().find(|l| l.item.product_id == product_id) else {
      return false;
    };
    let quantity = match option_id {
      Some(opt_id) => match line.item.options.iter_mut().find(|o| o.option_id == opt_id) {
        Some(row) => &mut row.quantity,
        None => return false,
      },
      None => &mut line.item.quantity,
    };
    let next = *quantity as i64 + delta;
    if next < 1 {
      return false;
    }
    *quantity = next as u32;
    true
  }

  /// Removes an option row (`option_id` non-empty) or the whole line
  /// (`option_id` empty/absent). A line left with no options and no bare
  /// quantity is spliced out entirely rather than kept as a placeholder.
  pub fn remove(&mut self, product_id: &str, option_id: Option<&str>) {
    let option_id = option_id.filter(|id| !id.is_empty());
    match option_id {
      Some(opt_id) => {
        if let Some(line) = self.lines.iter_mut().find(|l| l.item.product_id == product_id) {
          line.item.options.retain(|o| o.option_id != opt_id);
          if line.item.is_empty() {
            self.lines.retain(|l| l.item.product_id != product_id);
          }
        }
      }
      None => {
        self.lines.retain(|l| l.item.product_id != product_id);
      }
    }
  }

  /// Removes every checked line and returns their product ids, in order,
  /// for the matching bulk delete against the authoritative store.
  pub fn remove_checked(&mut self) -> Vec<String> {
    let removed = self.checked_product_ids();
    self.lines.retain(|l| !l.checked);
    removed
  }

  /// Clears the whole view. Used on logout; backing stores are untouched.
  pub fn clear(&mut self) {
    self.lines.clear();
  }
}
