//! Integration tests for Aurora.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p aurora-integration-tests
//! ```
//!
//! Nothing external is needed: each test starts the storefront router on an
//! ephemeral localhost port, backed by a fixed product list and a temporary
//! data directory, and talks to it over HTTP with `reqwest`.
//!
//! # Test Categories
//!
//! - `shopper_state` - Cart and wishlist properties through the store handles
//! - `storefront_api` - End-to-end flows over HTTP, including restarts

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use aurora_core::{Product, ProductId, Rating};
use aurora_storefront::catalog::StaticCatalog;
use aurora_storefront::config::StorefrontConfig;
use aurora_storefront::persistence::{JsonFileStore, StateStore};
use aurora_storefront::routes;
use aurora_storefront::state::AppState;
use rust_decimal::Decimal;
use tokio::task::JoinHandle;

/// A product with a list price and no discount.
#[must_use]
pub fn product(id: i32, title: &str, category: &str, price: Decimal) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_string(),
        description: format!("{title} from the test catalog"),
        price,
        category: category.to_string(),
        image: format!("https://img.test/{id}.png"),
        rating: Rating {
            rate: 4.2,
            count: 120,
        },
        brand: None,
        discounted_price: None,
    }
}

/// The catalog every test server serves.
#[must_use]
pub fn sample_products() -> Vec<Product> {
    let mut headphones = product(4, "Wireless Headphones", "electronics", Decimal::new(80, 0));
    headphones.discounted_price = Some(Decimal::new(60, 0));

    vec![
        product(1, "Canvas Backpack", "men's clothing", Decimal::new(10, 0)),
        product(2, "Cotton Tee", "men's clothing", Decimal::new(5, 0)),
        product(3, "Silver Bracelet", "jewelery", Decimal::new(4999, 2)),
        headphones,
    ]
}

/// A storefront running on localhost for the duration of a test.
pub struct TestServer {
    pub client: reqwest::Client,
    pub addr: SocketAddr,
    pub state: AppState,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a storefront persisting to `data_dir`.
    pub async fn start(data_dir: &Path) -> Self {
        let persistence: Arc<dyn StateStore> = Arc::new(JsonFileStore::new(data_dir));
        let config = StorefrontConfig {
            data_dir: data_dir.to_path_buf(),
            checkout_delay: Duration::from_millis(10),
            ..StorefrontConfig::default()
        };
        let state = AppState::from_parts(
            config,
            Arc::new(StaticCatalog::new(sample_products())),
            persistence,
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = routes::app(state.clone());
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            client: reqwest::Client::new(),
            addr,
            state,
            handle,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Stop serving. State already written to disk stays there.
    pub fn stop(self) {
        self.handle.abort();
    }
}
