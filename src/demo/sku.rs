use async_trait::async_trait;

use super::domain::Sku;
use crate::viewmodel::{Responder, ViewModel};

#[derive(Debug, Clone, PartialEq)]
pub struct SkuViewState {
    pub color: String,
    pub price: String,
}

#[derive(Debug)]
pub enum SkuInput {
    AddToBag,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkuOutput {
    ViewState(SkuViewState),
    AddedToBag(Sku),
}

/// One SKU row on the product page.
pub struct SkuViewModel {
    sku: Sku,
}

impl SkuViewModel {
    pub fn new(sku: Sku) -> Self {
        Self { sku }
    }
}

#[async_trait]
impl ViewModel for SkuViewModel {
    type Input = SkuInput;
    type Output = SkuOutput;

    fn first(&self, respond: &Responder<SkuOutput>) {
        respond.send(SkuOutput::ViewState(SkuViewState {
            color: self.sku.color.name.clone(),
            price: self.sku.price.to_string(),
        }));
    }

    async fn accept(&self, input: SkuInput, respond: Responder<SkuOutput>) -> anyhow::Result<()> {
        match input {
            SkuInput::AddToBag => respond.send(SkuOutput::AddedToBag(self.sku.clone())),
        }
        Ok(())
    }

    fn carries_view_state(&self, output: &SkuOutput) -> bool {
        matches!(output, SkuOutput::ViewState(_))
    }
}
