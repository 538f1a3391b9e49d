//! Demo features built on the engine: a product page with SKU rows, a cart
//! and a debounced search. Their services are fakes.

pub mod cart;
pub mod domain;
pub mod product;
pub mod providers;
pub mod search;
pub mod sku;

pub use cart::{CartInput, CartOutput, CartViewModel};
pub use domain::{Cart, NormalPrice, Price, Product, ProductId, Sku, SkuColor, SkuId, SkuSize};
pub use product::{ProductInput, ProductOutput, ProductViewModel, ProductViewState};
pub use providers::{
    ApiVersion, CartProvider, InMemoryCart, ProductProvider, ProductService, ServiceError,
};
pub use search::{SearchInput, SearchOutput, SearchViewModel};
pub use sku::{SkuInput, SkuOutput, SkuViewModel, SkuViewState};
