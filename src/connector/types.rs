//! Upstream payload types shared by every connector.
//!
//! Every product field is optional upstream; defaults are applied later, in
//! [`crate::pricing`], when the record is turned into a response entry.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use strum::EnumString;

/// Reply of a product search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResults {
    /// Matching products. Absent or null upstream means no products.
    #[serde(default)]
    pub products: Option<Vec<Product>>,
}

impl SearchResults {
    /// Wrap a list of products.
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Some(products),
        }
    }

    /// Products in upstream order.
    pub fn products(&self) -> &[Product] {
        self.products.as_deref().unwrap_or_default()
    }
}

/// A single product as returned by the catalog.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Display title.
    pub title: Option<String>,
    /// Shelf price before any bonus is applied.
    pub price_before_bonus: Option<Decimal>,
    /// Active promotions, most relevant first.
    pub discount_labels: Option<Vec<DiscountLabel>>,
    /// Human readable promotion text (e.g. "1 + 1 gratis").
    pub bonus_mechanism: Option<String>,
    /// Pack size (e.g. "1 l").
    pub sales_unit_size: Option<String>,
    /// Price per unit (e.g. "prijs per liter €1.29").
    pub unit_price_description: Option<String>,
    /// Whether the product can be ordered online.
    pub available_online: Option<bool>,
}

impl Product {
    /// The first discount label, if the product carries any.
    pub fn first_discount(&self) -> Option<&DiscountLabel> {
        self.discount_labels.as_deref().and_then(|labels| labels.first())
    }
}

/// Promotion marker attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountLabel {
    /// Promotion type code.
    pub code: String,
    /// Upstream description of the promotion.
    #[serde(default)]
    pub default_description: Option<String>,
}

impl DiscountLabel {
    /// Build a label with just a code.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            default_description: None,
        }
    }

    /// Parsed promotion type.
    pub fn discount_code(&self) -> DiscountCode {
        DiscountCode::from_str(&self.code)
            .unwrap_or_else(|_| DiscountCode::Other(self.code.clone()))
    }
}

/// Promotion types the pricing rules know about.
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
pub enum DiscountCode {
    /// "Buy X, get Y free" (e.g. 1 + 1 gratis).
    #[strum(serialize = "DISCOUNT_X_PLUS_Y_FREE")]
    XPlusYFree,
    /// Any code without a dedicated rule.
    #[strum(default)]
    Other(String),
}
