// korb_core/examples/login_merge.rs

use async_trait::async_trait;
use korb::{
  AuthProvider, CartAddition, CartEngine, KorbResult, LineItem, MemoryLocalStore, Notifier, RemoteCartService,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

// 1. A tiny in-process "server" cart. Adds are relative: duplicates sum,
//    which is exactly the combination rule the merge leaves to the server.
#[derive(Default)]
struct DemoRemote {
  items: Mutex<Vec<LineItem>>,
}

#[async_trait]
impl RemoteCartService for DemoRemote {
  async fn list(&self) -> anyhow::Result<Vec<LineItem>> {
    Ok(self.items.lock().clone())
  }

  async fn add_or_increment(&self, addition: &CartAddition) -> anyhow::Result<()> {
    let mut items = self.items.lock();
    if let Some(line) = items.iter_mut().find(|i| i.product_id == addition.product.product_id) {
      line.quantity += addition.quantity;
      return Ok(());
    }
    items.push(LineItem {
      product_id: addition.product.product_id.clone(),
      product_name: addition.product.product_name.clone(),
      category_name: addition.product.category_name.clone(),
      price: addition.product.price,
      shipping_price: addition.product.shipping_price,
      images: addition.product.images.clone(),
      option_required: addition.product.option_required,
      quantity: addition.quantity,
      options: Vec::new(),
    });
    Ok(())
  }

  async fn update_quantity(&self, _product_id: &str, _option_id: Option<&str>, _delta: i64) -> anyhow::Result<()> {
    Ok(())
  }

  async fn delete_line(&self, _product_id: &str, _option_id: Option<&str>) -> anyhow::Result<()> {
    Ok(())
  }

  async fn delete_lines(&self, _product_ids: &[String]) -> anyhow::Result<()> {
    Ok(())
  }
}

struct DemoAuth {
  authed: AtomicBool,
}

impl AuthProvider for DemoAuth {
  fn is_authenticated(&self) -> bool {
    self.authed.load(Ordering::SeqCst)
  }
}

struct LogNotifier;
impl Notifier for LogNotifier {
  fn notify(&self, message: &str) {
    info!("notice: {}", message);
  }
}

fn guest_line(product_id: &str, price: u32, quantity: u32) -> LineItem {
  LineItem {
    product_id: product_id.to_string(),
    product_name: format!("{} (demo)", product_id),
    category_name: "demo".to_string(),
    price,
    shipping_price: 3_000,
    images: Vec::new(),
    option_required: false,
    quantity,
    options: Vec::new(),
  }
}

#[tokio::main]
async fn main() -> KorbResult<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Login Merge Example ---");

  // 2. A guest cart persisted before login, and a remote cart that already
  //    holds some of the same product.
  let local = Arc::new(MemoryLocalStore::with_items(vec![
    guest_line("p1", 10_000, 1),
    guest_line("p2", 5_000, 2),
  ]));
  let remote = Arc::new(DemoRemote::default());
  remote.add_or_increment(&CartAddition {
    product: korb::ProductRef {
      product_id: "p1".to_string(),
      product_name: "p1 (demo)".to_string(),
      category_name: "demo".to_string(),
      price: 10_000,
      shipping_price: 3_000,
      images: Vec::new(),
      option_required: false,
    },
    option: None,
    quantity: 3,
  })
  .await
  .map_err(korb::KorbError::from)?;

  let auth = Arc::new(DemoAuth {
    authed: AtomicBool::new(false),
  });
  let engine = CartEngine::new(local.clone(), remote.clone(), auth.clone(), Arc::new(LogNotifier));

  // 3. The user logs in: the engine consumes the transition exactly once
  //    and pushes the guest snapshot as relative adds.
  auth.authed.store(true, Ordering::SeqCst);
  engine.handle_login().await?;

  // p1 combined server-side (1 + 3 = 4), p2 created fresh.
  for line in engine.state().read().lines() {
    info!("remote cart line: {} x{}", line.item.product_id, line.item.quantity);
  }

  // 4. Re-delivered login events are ignored; nothing merges twice.
  engine.handle_login().await?;
  info!("after duplicate login event: {} line(s)", engine.state().read().len());

  Ok(())
}
