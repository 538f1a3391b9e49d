use std::time::Duration;

use async_trait::async_trait;

use super::domain::ProductId;
use crate::viewmodel::{Debounce, Responder, ViewModel};

const CATALOG: &[(&str, &str)] = &[
    ("1", "Chair"),
    ("2", "Channel Lamp"),
    ("3", "Chandelier"),
    ("4", "Table"),
    ("5", "Cabinet"),
];

#[derive(Debug)]
pub enum SearchInput {
    Search(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutput {
    Results {
        term: String,
        product_ids: Vec<ProductId>,
    },
}

/// Search-as-you-type. Keystrokes are debounced so only the settled term
/// hits the catalog.
pub struct SearchViewModel {
    interval: Duration,
}

impl SearchViewModel {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    fn matches(term: &str) -> Vec<ProductId> {
        let term = term.to_lowercase();
        CATALOG
            .iter()
            .filter(|(_, name)| name.to_lowercase().starts_with(&term))
            .map(|(id, _)| id.to_string())
            .collect()
    }
}

#[async_trait]
impl ViewModel for SearchViewModel {
    type Input = SearchInput;
    type Output = SearchOutput;

    async fn accept(
        &self,
        input: SearchInput,
        respond: Responder<SearchOutput>,
    ) -> anyhow::Result<()> {
        match input {
            SearchInput::Search(term) => {
                let product_ids = Self::matches(&term);
                respond.send(SearchOutput::Results { term, product_ids });
            }
        }
        Ok(())
    }

    fn debounce(&self) -> Vec<Debounce<SearchInput>> {
        vec![Debounce::new(SearchInput::Search(String::new()), self.interval)]
    }
}
