use std::sync::Arc;

use async_trait::async_trait;

use super::domain::{Cart, Product};
use super::providers::CartProvider;
use crate::viewmodel::{Responder, ViewModel};

#[derive(Debug)]
pub enum CartInput {
    DidTapAddButton(Product),
    DidTapRemoveButton(Product),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CartOutput {
    ShowCart(Cart),
    ShowError(String),
}

/// Cart screen. One request at a time; taps during a request are dropped.
pub struct CartViewModel {
    provider: Arc<dyn CartProvider>,
}

impl CartViewModel {
    pub fn new(provider: Arc<dyn CartProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl ViewModel for CartViewModel {
    type Input = CartInput;
    type Output = CartOutput;

    async fn accept(&self, input: CartInput, respond: Responder<CartOutput>) -> anyhow::Result<()> {
        let cart = match input {
            CartInput::DidTapAddButton(product) => self.provider.add_product(product).await?,
            CartInput::DidTapRemoveButton(product) => {
                self.provider.remove_product(product).await?
            }
        };
        respond.send(CartOutput::ShowCart(cart));
        Ok(())
    }

    fn filter_all(&self) -> bool {
        true
    }

    fn thrown_error(&self, error: anyhow::Error, respond: &Responder<CartOutput>) {
        respond.send(CartOutput::ShowError(error.to_string()));
    }
}
