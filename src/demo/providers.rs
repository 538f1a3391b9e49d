//! Services the demo view models depend on.
//!
//! View models receive these as trait objects through their constructors,
//! so tests swap in stubs without any registry.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use thiserror::Error;

use super::domain::{Cart, NormalPrice, Price, Product, Sku, SkuColor, SkuSize};
use crate::config::DemoConfig;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("product '{0}' not found")]
    ProductNotFound(String),

    #[error("product '{0}' is not in the cart")]
    NotInCart(String),

    #[error("malformed product response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
pub trait ProductProvider: Send + Sync {
    async fn product(&self, id: &str) -> Result<Product, ServiceError>;
}

#[async_trait]
pub trait CartProvider: Send + Sync {
    async fn add_product(&self, product: Product) -> Result<Cart, ServiceError>;
    async fn remove_product(&self, product: Product) -> Result<Cart, ServiceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    V1,
    V2,
}

/// Product endpoint stand-in.
///
/// Waits the configured latency, then decodes a canned response body the
/// way a real client would decode the HTTP body.
pub struct ProductService {
    api: ApiVersion,
    latency: Duration,
}

impl ProductService {
    pub fn new(api: ApiVersion, latency: Duration) -> Self {
        Self { api, latency }
    }

    pub fn from_config(config: &DemoConfig) -> Self {
        let api = if config.use_v2_api {
            ApiVersion::V2
        } else {
            ApiVersion::V1
        };
        Self::new(api, config.latency())
    }

    fn response_body(&self) -> &'static str {
        match self.api {
            ApiVersion::V1 => V1_PRODUCT_BODY,
            ApiVersion::V2 => V2_PRODUCT_BODY,
        }
    }
}

#[async_trait]
impl ProductProvider for ProductService {
    async fn product(&self, id: &str) -> Result<Product, ServiceError> {
        tokio::time::sleep(self.latency).await;

        if id.trim().is_empty() {
            return Err(ServiceError::ProductNotFound(id.to_string()));
        }

        let response: ProductResponse = serde_json::from_str(self.response_body())?;
        let mut product = Product::from(response);
        product.id = id.to_string();
        Ok(product)
    }
}

/// Cart kept in memory.
#[derive(Default)]
pub struct InMemoryCart {
    cart: Mutex<Cart>,
}

impl InMemoryCart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Cart {
        self.cart.lock().clone()
    }
}

#[async_trait]
impl CartProvider for InMemoryCart {
    async fn add_product(&self, product: Product) -> Result<Cart, ServiceError> {
        let mut cart = self.cart.lock();
        cart.products.push(product);
        Ok(cart.clone())
    }

    async fn remove_product(&self, product: Product) -> Result<Cart, ServiceError> {
        let mut cart = self.cart.lock();
        let position = cart
            .products
            .iter()
            .position(|p| p.id == product.id)
            .ok_or_else(|| ServiceError::NotInCart(product.id.clone()))?;
        cart.products.remove(position);
        Ok(cart.clone())
    }
}

const V1_PRODUCT_BODY: &str = r#"{
  "id": "1",
  "name": "Name",
  "price": { "type": "regular", "amount": 10.0 },
  "skus": [
    {
      "id": "1",
      "color": { "name": "Red" },
      "size": { "name": "Medium", "metadata": "M" },
      "price": { "type": "regular", "amount": 10.0 }
    }
  ]
}"#;

const V2_PRODUCT_BODY: &str = r#"{
  "id": "1",
  "name": "Name",
  "price": { "type": "sale", "amount": 8.0, "was": 10.0 },
  "skus": [
    {
      "id": "1",
      "color": { "name": "Red" },
      "size": { "name": "Medium", "metadata": "M" },
      "price": { "type": "sale", "amount": 8.0, "was": 10.0 }
    },
    {
      "id": "2",
      "color": { "name": "Blue" },
      "size": { "name": "Large", "metadata": null },
      "price": { "type": "regular", "amount": 12.0 }
    }
  ]
}"#;

#[derive(Debug, Deserialize)]
struct ProductResponse {
    id: String,
    name: String,
    price: ResponsePrice,
    skus: Vec<ResponseSku>,
}

#[derive(Debug, Deserialize)]
struct ResponsePrice {
    #[serde(rename = "type")]
    kind: String,
    amount: f64,
    #[serde(default)]
    was: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ResponseSku {
    id: String,
    color: ResponseColor,
    size: ResponseSize,
    price: ResponsePrice,
}

#[derive(Debug, Deserialize)]
struct ResponseColor {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ResponseSize {
    name: String,
    #[serde(default)]
    metadata: Option<String>,
}

impl From<ResponsePrice> for Price {
    fn from(price: ResponsePrice) -> Self {
        match (price.kind.as_str(), price.was) {
            ("sale", Some(was)) => Price::Sale {
                was,
                now: price.amount,
            },
            _ => Price::Regular(price.amount),
        }
    }
}

impl From<ResponseSku> for Sku {
    fn from(sku: ResponseSku) -> Self {
        Self {
            id: sku.id,
            color: SkuColor {
                name: sku.color.name,
                image_url: None,
            },
            size: SkuSize {
                name: sku.size.name,
                meta_description: sku.size.metadata,
            },
            price: sku.price.into(),
        }
    }
}

impl From<ProductResponse> for Product {
    fn from(response: ProductResponse) -> Self {
        Self {
            id: response.id,
            name: response.name,
            price: NormalPrice::Single(response.price.into()),
            skus: response.skus.into_iter().map(Sku::from).collect(),
        }
    }
}
