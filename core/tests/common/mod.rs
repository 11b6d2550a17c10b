// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use korb::{
  AuthProvider, CartAddition, CartEngine, CheckoutLine, ConfirmationDialog, LineItem, MemoryLocalStore, Notifier,
  OptionRef, PaymentSession, ProductRef, RemoteCartService,
};
// Re-exported so `use common::*;` brings the trait into scope for
// `harness.local.load()` calls in the test binaries.
pub use korb::LocalStore;
use parking_lot::Mutex;
use std::sync::{
  atomic::{AtomicBool, AtomicUsize, Ordering},
  Arc,
};
use tracing::Level;

// --- Helper for Tracing Setup (call once per test binary) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Fixture builders ---

pub fn bare_item(product_id: &str, price: u32, shipping_price: u32, quantity: u32) -> LineItem {
  LineItem {
    product_id: product_id.to_string(),
    product_name: format!("{} name", product_id),
    category_name: "test-category".to_string(),
    price,
    shipping_price,
    images: vec![format!("{}.jpg", product_id)],
    option_required: false,
    quantity,
    options: Vec::new(),
  }
}

pub fn option_item(product_id: &str, price: u32, shipping_price: u32, options: &[(&str, u32, u32)]) -> LineItem {
  LineItem {
    product_id: product_id.to_string(),
    product_name: format!("{} name", product_id),
    category_name: "test-category".to_string(),
    price,
    shipping_price,
    images: vec![format!("{}.jpg", product_id)],
    option_required: true,
    quantity: 0,
    options: options
      .iter()
      .map(|(option_id, option_price, quantity)| korb::CartOption {
        cart_line_id: String::new(),
        option_id: option_id.to_string(),
        option_name: format!("{} name", option_id),
        option_price: *option_price,
        quantity: *quantity,
      })
      .collect(),
  }
}

pub fn product_ref(product_id: &str, price: u32, shipping_price: u32, option_required: bool) -> ProductRef {
  ProductRef {
    product_id: product_id.to_string(),
    product_name: format!("{} name", product_id),
    category_name: "test-category".to_string(),
    price,
    shipping_price,
    images: vec![format!("{}.jpg", product_id)],
    option_required,
  }
}

pub fn add_bare(product_id: &str, price: u32, shipping_price: u32, quantity: u32) -> CartAddition {
  CartAddition {
    product: product_ref(product_id, price, shipping_price, false),
    option: None,
    quantity,
  }
}

pub fn add_option(
  product_id: &str,
  price: u32,
  shipping_price: u32,
  option_id: &str,
  option_price: u32,
  quantity: u32,
) -> CartAddition {
  CartAddition {
    product: product_ref(product_id, price, shipping_price, true),
    option: Some(OptionRef {
      option_id: option_id.to_string(),
      option_name: format!("{} name", option_id),
      option_price,
    }),
    quantity,
  }
}

// --- Fake remote cart service ---

/// In-process stand-in for the server cart. Records every call, applies
/// adds with server-owned combination semantics (duplicate targets sum),
/// assigns cart line ids, and can be told to fail reads or writes.
#[derive(Default)]
pub struct FakeRemote {
  items: Mutex<Vec<LineItem>>,
  pub additions: Mutex<Vec<CartAddition>>,
  pub delta_calls: Mutex<Vec<(String, Option<String>, i64)>>,
  pub delete_calls: Mutex<Vec<(String, Option<String>)>>,
  pub bulk_delete_calls: Mutex<Vec<Vec<String>>>,
  pub list_calls: AtomicUsize,
  pub fail_reads: AtomicBool,
  pub fail_writes: AtomicBool,
  next_line_id: AtomicUsize,
}

impl FakeRemote {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_items(items: Vec<LineItem>) -> Self {
    let remote = Self::default();
    *remote.items.lock() = items;
    remote
  }

  pub fn items(&self) -> Vec<LineItem> {
    self.items.lock().clone()
  }

  pub fn set_fail_reads(&self, fail: bool) {
    self.fail_reads.store(fail, Ordering::SeqCst);
  }

  pub fn set_fail_writes(&self, fail: bool) {
    self.fail_writes.store(fail, Ordering::SeqCst);
  }

  fn check_write(&self) -> anyhow::Result<()> {
    if self.fail_writes.load(Ordering::SeqCst) {
      anyhow::bail!("injected remote write failure");
    }
    Ok(())
  }

  fn assign_line_id(&self) -> String {
    format!("srv-{}", self.next_line_id.fetch_add(1, Ordering::SeqCst) + 1)
  }
}

#[async_trait]
impl RemoteCartService for FakeRemote {
  async fn list(&self) -> anyhow::Result<Vec<LineItem>> {
    self.list_calls.fetch_add(1, Ordering::SeqCst);
    if self.fail_reads.load(Ordering::SeqCst) {
      anyhow::bail!("injected remote read failure");
    }
    Ok(self.items.lock().clone())
  }

  async fn add_or_increment(&self, addition: &CartAddition) -> anyhow::Result<()> {
    self.check_write()?;
    self.additions.lock().push(addition.clone());

    let mut items = self.items.lock();
    let line = match items.iter_mut().find(|i| i.product_id == addition.product.product_id) {
      Some(line) => line,
      None => {
        items.push(LineItem {
          product_id: addition.product.product_id.clone(),
          product_name: addition.product.product_name.clone(),
          category_name: addition.product.category_name.clone(),
          price: addition.product.price,
          shipping_price: addition.product.shipping_price,
          images: addition.product.images.clone(),
          option_required: addition.product.option_required,
          quantity: 0,
          options: Vec::new(),
        });
        items.last_mut().unwrap()
      }
    };
    match &addition.option {
      Some(opt) => {
        if let Some(row) = line.options.iter_mut().find(|o| o.option_id == opt.option_id) {
          row.quantity += addition.quantity;
        } else {
          line.options.push(korb::CartOption {
            cart_line_id: self.assign_line_id(),
            option_id: opt.option_id.clone(),
            option_name: opt.option_name.clone(),
            option_price: opt.option_price,
            quantity: addition.quantity,
          });
        }
      }
      None => {
        line.quantity += addition.quantity;
      }
    }
    Ok(())
  }

  async fn update_quantity(&self, product_id: &str, option_id: Option<&str>, delta: i64) -> anyhow::Result<()> {
    self.check_write()?;
    self
      .delta_calls
      .lock()
      .push((product_id.to_string(), option_id.map(str::to_string), delta));

    let mut items = self.items.lock();
    if let Some(line) = items.iter_mut().find(|i| i.product_id == product_id) {
      match option_id {
        Some(opt_id) => {
          if let Some(row) = line.options.iter_mut().find(|o| o.option_id == opt_id) {
            row.quantity = (row.quantity as i64 + delta).max(0) as u32;
          }
        }
        None => {
          line.quantity = (line.quantity as i64 + delta).max(0) as u32;
        }
      }
    }
    Ok(())
  }

  async fn delete_line(&self, product_id: &str, option_id: Option<&str>) -> anyhow::Result<()> {
    self.check_write()?;
    self
      .delete_calls
      .lock()
      .push((product_id.to_string(), option_id.map(str::to_string)));

    let mut items = self.items.lock();
    match option_id {
      Some(opt_id) => {
        if let Some(line) = items.iter_mut().find(|i| i.product_id == product_id) {
          line.options.retain(|o| o.option_id != opt_id);
          if line.options.is_empty() && line.quantity == 0 {
            items.retain(|i| i.product_id != product_id);
          }
        }
      }
      None => {
        items.retain(|i| i.product_id != product_id);
      }
    }
    Ok(())
  }

  async fn delete_lines(&self, product_ids: &[String]) -> anyhow::Result<()> {
    self.check_write()?;
    self.bulk_delete_calls.lock().push(product_ids.to_vec());
    let mut items = self.items.lock();
    items.retain(|i| !product_ids.contains(&i.product_id));
    Ok(())
  }
}

// --- Other fake collaborators ---

#[derive(Default)]
pub struct FakeAuth {
  authed: AtomicBool,
}

impl FakeAuth {
  pub fn guest() -> Self {
    Self::default()
  }

  pub fn authenticated() -> Self {
    let auth = Self::default();
    auth.authed.store(true, Ordering::SeqCst);
    auth
  }

  pub fn set_authenticated(&self, value: bool) {
    self.authed.store(value, Ordering::SeqCst);
  }
}

impl AuthProvider for FakeAuth {
  fn is_authenticated(&self) -> bool {
    self.authed.load(Ordering::SeqCst)
  }
}

#[derive(Default)]
pub struct RecordingNotifier {
  pub messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
  pub fn count(&self) -> usize {
    self.messages.lock().len()
  }
}

impl Notifier for RecordingNotifier {
  fn notify(&self, message: &str) {
    self.messages.lock().push(message.to_string());
  }
}

pub struct ScriptedConfirm {
  answer: AtomicBool,
  pub prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirm {
  pub fn answering(answer: bool) -> Self {
    Self {
      answer: AtomicBool::new(answer),
      prompts: Mutex::new(Vec::new()),
    }
  }
}

#[async_trait]
impl ConfirmationDialog for ScriptedConfirm {
  async fn confirm(&self, title: &str, _description: &str) -> bool {
    self.prompts.lock().push(title.to_string());
    self.answer.load(Ordering::SeqCst)
  }
}

#[derive(Default)]
pub struct RecordingPayment {
  pub handoffs: Mutex<Vec<Vec<CheckoutLine>>>,
}

#[async_trait]
impl PaymentSession for RecordingPayment {
  async fn begin(&self, lines: &[CheckoutLine]) -> anyhow::Result<String> {
    self.handoffs.lock().push(lines.to_vec());
    Ok(format!("pay-session-{}", self.handoffs.lock().len()))
  }
}

// --- Engine harness ---

pub struct Harness {
  pub engine: Arc<CartEngine>,
  pub local: Arc<MemoryLocalStore>,
  pub remote: Arc<FakeRemote>,
  pub auth: Arc<FakeAuth>,
  pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
  pub fn guest() -> Self {
    Self::build(Vec::new(), Vec::new(), false)
  }

  pub fn guest_with_local(items: Vec<LineItem>) -> Self {
    Self::build(items, Vec::new(), false)
  }

  pub fn authenticated_with_remote(items: Vec<LineItem>) -> Self {
    Self::build(Vec::new(), items, true)
  }

  pub fn build(local_items: Vec<LineItem>, remote_items: Vec<LineItem>, authenticated: bool) -> Self {
    setup_tracing();
    let local = Arc::new(MemoryLocalStore::with_items(local_items));
    let remote = Arc::new(FakeRemote::with_items(remote_items));
    let auth = Arc::new(if authenticated {
      FakeAuth::authenticated()
    } else {
      FakeAuth::guest()
    });
    let notifier = Arc::new(RecordingNotifier::default());
    let engine = Arc::new(CartEngine::new(
      local.clone() as Arc<dyn korb::LocalStore>,
      remote.clone() as Arc<dyn RemoteCartService>,
      auth.clone() as Arc<dyn AuthProvider>,
      notifier.clone() as Arc<dyn Notifier>,
    ));
    Self {
      engine,
      local,
      remote,
      auth,
      notifier,
    }
  }
}
