//! Price normalization for search results.
//!
//! Only one promotion type changes the price: "buy X, get Y free" is
//! approximated as half price for a single unit, whatever X and Y are.
//! Every other promotion keeps the shelf price.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::connector::{DiscountCode, Product};
use crate::error::PricingError;

/// Currency of every AH price.
pub const CURRENCY: &str = "EUR";

/// Simplified price record returned by `/search`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPriceEntry {
    /// Product title.
    pub title: Option<String>,
    /// Shelf price before bonus.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub normal_price: Option<Decimal>,
    /// Price after the promotion rule is applied.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub discounted_price: Option<Decimal>,
    /// Promotion text.
    pub bonus_description: Option<String>,
    /// Pack size.
    pub sales_unit_size: Option<String>,
    /// Price per unit text.
    pub unit_price_description: Option<String>,
    /// Always [`CURRENCY`].
    pub currency: &'static str,
    /// Orderable online; false when upstream omits it.
    pub available_online: bool,
}

/// Apply the discount rule for a product.
///
/// Only the first discount label is consulted.
pub fn discounted_price(product: &Product) -> Result<Option<Decimal>, PricingError> {
    let normal_price = product.price_before_bonus;

    let Some(label) = product.first_discount() else {
        return Ok(normal_price);
    };

    match label.discount_code() {
        DiscountCode::XPlusYFree => match normal_price {
            Some(price) => Ok(Some(price / Decimal::TWO)),
            None => Err(PricingError::MissingPrice {
                title: product.title.clone(),
            }),
        },
        DiscountCode::Other(_) => Ok(normal_price),
    }
}

impl ProductPriceEntry {
    /// Build the response entry for an upstream product.
    pub fn from_product(product: &Product) -> Result<Self, PricingError> {
        let discounted_price = discounted_price(product)?;

        Ok(Self {
            title: product.title.clone(),
            normal_price: product.price_before_bonus,
            discounted_price,
            bonus_description: product.bonus_mechanism.clone(),
            sales_unit_size: product.sales_unit_size.clone(),
            unit_price_description: product.unit_price_description.clone(),
            currency: CURRENCY,
            available_online: product.available_online.unwrap_or(false),
        })
    }
}

/// Convert every product, preserving order. Fails on the first product
/// whose price cannot be derived.
pub fn price_entries(products: &[Product]) -> Result<Vec<ProductPriceEntry>, PricingError> {
    products.iter().map(ProductPriceEntry::from_product).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::MockProductBuilder;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn no_labels_keeps_normal_price() {
        let product = MockProductBuilder::new("Melk").price(dec!(2.00)).build();

        let entry = ProductPriceEntry::from_product(&product).unwrap();
        assert_eq!(entry.normal_price, Some(dec!(2.00)));
        assert_eq!(entry.discounted_price, Some(dec!(2.00)));
    }

    #[test]
    fn x_plus_y_free_halves_the_price() {
        let product = MockProductBuilder::new("Chips")
            .price(dec!(3.00))
            .discount("DISCOUNT_X_PLUS_Y_FREE")
            .build();

        assert_eq!(discounted_price(&product).unwrap(), Some(dec!(1.50)));
    }

    #[test]
    fn other_codes_keep_normal_price() {
        let product = MockProductBuilder::new("Koffie")
            .price(dec!(4.00))
            .discount("DISCOUNT_PERCENTAGE")
            .build();

        assert_eq!(discounted_price(&product).unwrap(), Some(dec!(4.00)));
    }

    #[test]
    fn only_first_label_counts() {
        let product = MockProductBuilder::new("Kaas")
            .price(dec!(4.00))
            .discount("DISCOUNT_BONUS")
            .discount("DISCOUNT_X_PLUS_Y_FREE")
            .build();
        assert_eq!(discounted_price(&product).unwrap(), Some(dec!(4.00)));

        let product = MockProductBuilder::new("Kaas")
            .price(dec!(4.00))
            .discount("DISCOUNT_X_PLUS_Y_FREE")
            .discount("DISCOUNT_BONUS")
            .build();
        assert_eq!(discounted_price(&product).unwrap(), Some(dec!(2.00)));
    }

    #[test]
    fn missing_price_without_labels_stays_absent() {
        let product = MockProductBuilder::new("Onbekend").build();

        let entry = ProductPriceEntry::from_product(&product).unwrap();
        assert_eq!(entry.normal_price, None);
        assert_eq!(entry.discounted_price, None);
    }

    #[test]
    fn missing_price_with_x_plus_y_label_is_an_error() {
        let product = MockProductBuilder::new("Onbekend")
            .discount("DISCOUNT_X_PLUS_Y_FREE")
            .build();

        assert_eq!(
            discounted_price(&product),
            Err(PricingError::MissingPrice {
                title: Some("Onbekend".to_string())
            })
        );
    }

    #[test]
    fn defaults_are_applied() {
        let entry = ProductPriceEntry::from_product(&Product::default()).unwrap();
        assert_eq!(entry.currency, "EUR");
        assert!(!entry.available_online);
        assert_eq!(entry.title, None);
    }

    #[test]
    fn entry_serializes_prices_as_numbers() {
        let product = MockProductBuilder::new("AH Halfvolle melk")
            .price(dec!(3.00))
            .discount("DISCOUNT_X_PLUS_Y_FREE")
            .bonus("1 + 1 gratis")
            .unit_size("1 l")
            .unit_price("prijs per liter €3.00")
            .available_online(true)
            .build();

        let entry = ProductPriceEntry::from_product(&product).unwrap();
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({
                "title": "AH Halfvolle melk",
                "normal_price": 3.0,
                "discounted_price": 1.5,
                "bonus_description": "1 + 1 gratis",
                "sales_unit_size": "1 l",
                "unit_price_description": "prijs per liter €3.00",
                "currency": "EUR",
                "available_online": true
            })
        );
    }

    #[test]
    fn price_entries_preserve_order() {
        let products = vec![
            MockProductBuilder::new("a").price(dec!(1)).build(),
            MockProductBuilder::new("b").price(dec!(2)).build(),
        ];

        let entries = price_entries(&products).unwrap();
        let titles: Vec<_> = entries.iter().map(|e| e.title.as_deref()).collect();
        assert_eq!(titles, vec![Some("a"), Some("b")]);
    }
}
