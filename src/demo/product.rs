use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::domain::{Product, ProductId, Sku};
use super::providers::ProductProvider;
use super::sku::SkuOutput;
use crate::viewmodel::{Responder, ViewModel, ViewModelError};

#[derive(Debug, Clone, PartialEq)]
pub struct ProductViewState {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_price: String,
    pub is_liked: bool,
}

#[derive(Debug)]
pub enum ProductInput {
    LoadProduct { id: ProductId },
    DidTapLike,
    /// Output of a child SKU view model, forwarded by the view.
    Sku(SkuOutput),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProductOutput {
    ViewState(ProductViewState),
    Skus(Vec<Sku>),
    AddedToBag(Sku),
    ShowError(String),
}

struct ProductState {
    product: Product,
    is_liked: bool,
}

impl ProductState {
    fn view_state(&self) -> ProductViewState {
        ProductViewState {
            product_id: self.product.id.clone(),
            product_name: self.product.name.clone(),
            product_price: self.product.price.to_string(),
            is_liked: self.is_liked,
        }
    }
}

/// Product page.
pub struct ProductViewModel {
    provider: Arc<dyn ProductProvider>,
    state: Mutex<ProductState>,
}

impl ProductViewModel {
    pub fn new(provider: Arc<dyn ProductProvider>) -> Self {
        Self {
            provider,
            state: Mutex::new(ProductState {
                product: Product::empty(),
                is_liked: false,
            }),
        }
    }

    pub fn product(&self) -> Product {
        self.state.lock().product.clone()
    }
}

#[async_trait]
impl ViewModel for ProductViewModel {
    type Input = ProductInput;
    type Output = ProductOutput;

    async fn accept(
        &self,
        input: ProductInput,
        respond: Responder<ProductOutput>,
    ) -> anyhow::Result<()> {
        match input {
            ProductInput::LoadProduct { id } => {
                let product = self.provider.product(&id).await?;
                let skus = product.skus.clone();
                let view_state = {
                    let mut state = self.state.lock();
                    state.product = product;
                    state.view_state()
                };
                respond.send(ProductOutput::ViewState(view_state));
                respond.send(ProductOutput::Skus(skus));
            }
            ProductInput::DidTapLike => {
                let view_state = {
                    let mut state = self.state.lock();
                    state.is_liked = !state.is_liked;
                    state.view_state()
                };
                respond.send(ProductOutput::ViewState(view_state));
            }
            ProductInput::Sku(SkuOutput::AddedToBag(sku)) => {
                respond.send(ProductOutput::AddedToBag(sku));
            }
            // The page renders its own SKU rows.
            ProductInput::Sku(SkuOutput::ViewState(_)) => {
                return Err(ViewModelError::IgnoreInput.into());
            }
        }
        Ok(())
    }

    fn filter(&self) -> Vec<ProductInput> {
        vec![ProductInput::LoadProduct { id: String::new() }]
    }

    fn carries_view_state(&self, output: &ProductOutput) -> bool {
        matches!(output, ProductOutput::ViewState(_))
    }

    fn thrown_error(&self, error: anyhow::Error, respond: &Responder<ProductOutput>) {
        respond.send(ProductOutput::ShowError(error.to_string()));
    }
}
