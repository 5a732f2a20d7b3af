//! # Item Catalog
//!
//! Read-only view over the loaded item list, and validation of item
//! create/update bodies.

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::types::{Item, ItemId, ItemPayload};
use crate::validation::{require_text, validate_percentage, ValidationResult};

/// Items as loaded from `GET /Item/GetList`.
///
/// The draft only reads from here to seed line defaults; nothing in the
/// catalog is ever written by the editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    pub fn new(items: Vec<Item>) -> Self {
        Catalog { items }
    }

    pub fn get(&self, item_id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.item_id == item_id)
    }

    /// Exact, case-insensitive name lookup. Used by the CLI's `--line`.
    pub fn find_by_name(&self, name: &str) -> Option<&Item> {
        let name = name.trim();
        self.items
            .iter()
            .find(|item| item.item_name.trim().eq_ignore_ascii_case(name))
    }

    /// Case-insensitive substring match on name or description.
    pub fn search(&self, term: &str) -> Vec<&Item> {
        let term = term.trim().to_lowercase();
        self.items
            .iter()
            .filter(|item| {
                term.is_empty()
                    || item.item_name.to_lowercase().contains(&term)
                    || item
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&term))
            })
            .collect()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ItemPayload {
    /// Builds a validated item body.
    ///
    /// ## Rules
    /// - name is required and trimmed
    /// - blank description becomes `null`
    /// - sales rate must not be negative
    /// - a zero discount becomes `null`; otherwise 0-100
    pub fn new(
        item_id: Option<ItemId>,
        item_name: &str,
        description: Option<&str>,
        sales_rate: Decimal,
        discount_pct: Option<Decimal>,
    ) -> ValidationResult<ItemPayload> {
        let payload = ItemPayload {
            item_id: item_id.filter(|id| *id > 0),
            item_name: item_name.trim().to_string(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            sales_rate,
            discount_pct: discount_pct.filter(|d| !d.is_zero()),
        };
        payload.validate()?;
        Ok(payload)
    }

    pub fn validate(&self) -> ValidationResult<()> {
        require_text("itemName", &self.item_name)?;

        if self.sales_rate < Decimal::ZERO {
            return Err(ValidationError::Negative {
                field: "salesRate".to_string(),
            });
        }

        if let Some(pct) = self.discount_pct {
            validate_percentage("discountPct", pct)?;
        }

        Ok(())
    }

    /// `PUT` when the body names an existing item.
    pub fn is_update(&self) -> bool {
        matches!(self.item_id, Some(id) if id > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(id: ItemId, name: &str, description: Option<&str>) -> Item {
        Item {
            item_id: id,
            item_name: name.to_string(),
            description: description.map(str::to_string),
            sales_rate: dec!(1),
            discount_pct: None,
            thumbnail_url: None,
            created_by_user_name: None,
            created_on: None,
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            item(1, "Widget", Some("Blue steel")),
            item(2, "Gadget", None),
            item(3, "Gizmo", Some("widget adapter")),
        ])
    }

    #[test]
    fn test_lookup() {
        let catalog = catalog();
        assert_eq!(catalog.get(2).map(|i| i.item_name.as_str()), Some("Gadget"));
        assert!(catalog.get(99).is_none());
        assert_eq!(catalog.find_by_name(" gizmo ").map(|i| i.item_id), Some(3));
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_search_name_and_description() {
        let catalog = catalog();
        let ids: Vec<ItemId> = catalog.search("WIDGET").iter().map(|i| i.item_id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(catalog.search("").len(), 3);
    }

    #[test]
    fn test_item_payload_normalizes() {
        let payload =
            ItemPayload::new(None, "  Widget ", Some("   "), dec!(10), Some(dec!(0))).unwrap();

        assert_eq!(payload.item_name, "Widget");
        assert_eq!(payload.description, None);
        assert_eq!(payload.discount_pct, None);
        assert!(!payload.is_update());
    }

    #[test]
    fn test_item_payload_rejects_invalid() {
        assert!(ItemPayload::new(None, " ", None, dec!(0), None).is_err());
        assert!(ItemPayload::new(None, "W", None, dec!(-0.01), None).is_err());
        assert!(ItemPayload::new(Some(4), "W", None, dec!(0), Some(dec!(101))).is_err());
    }

    #[test]
    fn test_item_payload_update() {
        let payload = ItemPayload::new(Some(4), "W", None, dec!(0.125), Some(dec!(5))).unwrap();
        assert!(payload.is_update());
        assert_eq!(payload.sales_rate, dec!(0.125));
        assert_eq!(payload.discount_pct, Some(dec!(5)));
    }
}
