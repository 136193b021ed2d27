//! Integration tests for Blife Healthy.
//!
//! Each test starts the full storefront in-process on an ephemeral port, over
//! a fresh data directory, and drives it with a cookie-keeping HTTP client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p blife-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `shopper_flow` - Catalog, cart, checkout, reviews
//! - `seller_flow` - Seller console and store page
//! - `admin_flow` - Store approval, users, logs, commissions
//! - `access` - Resolver redirects and refusals

use std::sync::Arc;

use reqwest::{Client, Response};
use tempfile::TempDir;

use blife_core::{Product, ProductInput, UserRole};
use blife_storefront::config::StorefrontConfig;
use blife_storefront::repository::LocalRepository;
use blife_storefront::state::AppState;
use blife_storefront::storage::FileKv;

/// A running storefront and a client with its own cookie jar.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    /// Kept alive so the data directory outlives the server.
    pub data_dir: TempDir,
}

impl TestContext {
    /// Start a storefront over a fresh data directory.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    #[allow(clippy::expect_used)]
    pub async fn new() -> Self {
        let data_dir = tempfile::tempdir().expect("Failed to create data directory");
        let kv = FileKv::open(data_dir.path()).expect("Failed to open data directory");
        let state = AppState::new(StorefrontConfig::default(), Arc::new(kv));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let app = blife_storefront::app(state);
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Test server failed");
        });

        Self {
            client: Self::client(),
            base_url: format!("http://{addr}"),
            data_dir,
        }
    }

    /// A new client (new cookie jar, so a new session) for the same server.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[allow(clippy::expect_used)]
    #[must_use]
    pub fn client() -> Client {
        Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to build HTTP client")
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path`, following redirects.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    #[allow(clippy::expect_used)]
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed")
    }

    /// POST a form to `path`, following the redirect that answers it.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    #[allow(clippy::expect_used)]
    pub async fn post(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST failed")
    }

    /// Write a product straight into the server's data directory, bypassing
    /// the seller console (which only ever adds to the seller's own store).
    ///
    /// # Panics
    ///
    /// Panics if the data directory cannot be opened.
    #[allow(clippy::expect_used)]
    pub async fn seed_product(&self, input: ProductInput) -> Product {
        let kv = FileKv::open(self.data_dir.path()).expect("Failed to open data directory");
        LocalRepository::new(Arc::new(kv)).add_product(input).await
    }

    /// Mock login with `email` and `role`.
    pub async fn login(&self, email: &str, role: UserRole) -> Response {
        self.post("/login", &[("email", email), ("role", role.as_str())])
            .await
    }
}

/// Read a response body.
///
/// # Panics
///
/// Panics if the body cannot be read.
#[allow(clippy::expect_used)]
pub async fn body(response: Response) -> String {
    response.text().await.expect("Failed to read body")
}
