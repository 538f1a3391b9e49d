use std::fmt;

pub type ProductId = String;
pub type SkuId = String;

#[derive(Debug, Clone, PartialEq)]
pub enum Price {
    Regular(f64),
    Sale { was: f64, now: f64 },
}

impl Price {
    /// Price the customer pays today.
    pub fn current(&self) -> f64 {
        match self {
            Price::Regular(price) => *price,
            Price::Sale { now, .. } => *now,
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Regular(price) => write!(f, "{price:.2}"),
            Price::Sale { was, now } => write!(f, "Was: {was:.2} Now: {now:.2}"),
        }
    }
}

/// Price shown on a product, which may span its SKUs.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalPrice {
    Single(Price),
    Range { from: Price, to: Price },
}

impl fmt::Display for NormalPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalPrice::Single(price) => price.fmt(f),
            NormalPrice::Range { from, to } => {
                write!(f, "From {:.2} to {:.2}", from.current(), to.current())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkuColor {
    pub name: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkuSize {
    pub name: String,
    pub meta_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sku {
    pub id: SkuId,
    pub color: SkuColor,
    pub size: SkuSize,
    pub price: Price,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: NormalPrice,
    pub skus: Vec<Sku>,
}

impl Product {
    /// Placeholder shown before the real product has loaded.
    pub fn empty() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            price: NormalPrice::Single(Price::Regular(0.0)),
            skus: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    pub products: Vec<Product>,
}
