//! Item catalog and payment methods for order intake.

use crate::{
    config::settings::OrderSettings,
    errors::{Error, Result},
};

/// An orderable item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    /// Stable id used in commands
    pub id: String,
    /// Display name
    pub name: String,
    /// Unit price in the smallest currency unit
    pub price: u64,
}

/// Items and payment methods offered by the shop.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    payment_methods: Vec<String>,
}

impl Catalog {
    /// Builds a catalog from explicit lists.
    #[must_use]
    pub fn new(items: Vec<CatalogItem>, payment_methods: Vec<String>) -> Self {
        Self {
            items,
            payment_methods,
        }
    }

    /// Builds the catalog from the `[orders]` settings.
    #[must_use]
    pub fn from_settings(settings: &OrderSettings) -> Self {
        let items = settings
            .items
            .iter()
            .map(|item| CatalogItem {
                id: item.id.clone(),
                name: item.name.clone(),
                price: item.price,
            })
            .collect();
        Self::new(items, settings.payment_methods.clone())
    }

    /// All items in configuration order.
    #[must_use]
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// All payment methods in configuration order.
    #[must_use]
    pub fn payment_methods(&self) -> &[String] {
        &self.payment_methods
    }

    /// Finds an item by id or name, ignoring case.
    pub fn item(&self, query: &str) -> Result<&CatalogItem> {
        let query = query.trim();
        self.items
            .iter()
            .find(|item| item.id.eq_ignore_ascii_case(query) || item.name.eq_ignore_ascii_case(query))
            .ok_or_else(|| Error::UnknownItem {
                id: query.to_string(),
            })
    }

    /// Resolves a payment method to its configured spelling, ignoring case.
    pub fn payment_method(&self, query: &str) -> Result<&str> {
        let query = query.trim();
        self.payment_methods
            .iter()
            .find(|method| method.eq_ignore_ascii_case(query))
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownPaymentMethod {
                method: query.to_string(),
            })
    }
}

/// Formats an amount as rupiah with dot thousands separators: `Rp 25.000`.
#[must_use]
pub fn format_price(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("Rp {grouped}")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::settings::ItemConfig;

    fn catalog() -> Catalog {
        let settings = OrderSettings {
            items: vec![
                ItemConfig {
                    id: "crate".to_string(),
                    name: "J2Y Crate".to_string(),
                    price: 25_000,
                },
                ItemConfig {
                    id: "key".to_string(),
                    name: "Crate Key".to_string(),
                    price: 5_000,
                },
            ],
            ..OrderSettings::default()
        };
        Catalog::from_settings(&settings)
    }

    #[test]
    fn test_item_lookup() {
        let catalog = catalog();
        assert_eq!(catalog.items().len(), 2);
        assert_eq!(catalog.item("CRATE").unwrap().price, 25_000);
        assert_eq!(catalog.item("crate key").unwrap().id, "key");
        assert!(matches!(
            catalog.item("sword"),
            Err(Error::UnknownItem { id }) if id == "sword"
        ));
    }

    #[test]
    fn test_payment_method_lookup() {
        let catalog = catalog();
        assert_eq!(catalog.payment_method("qris").unwrap(), "QRIS");
        assert_eq!(catalog.payment_method(" bank transfer ").unwrap(), "Bank Transfer");
        assert!(matches!(
            catalog.payment_method("cash"),
            Err(Error::UnknownPaymentMethod { .. })
        ));
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0), "Rp 0");
        assert_eq!(format_price(500), "Rp 500");
        assert_eq!(format_price(5_000), "Rp 5.000");
        assert_eq!(format_price(25_000), "Rp 25.000");
        assert_eq!(format_price(1_250_000), "Rp 1.250.000");
    }
}
