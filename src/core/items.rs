//! Indexed item keys (`item1`, `amt1`, `qty1`, `dcnt1`, ...)
//!
//! Order-style query strings carry line items as numbered parameter groups.
//! This module splits them out of the decoded parameters, groups them by
//! index and renders them back as `;`-joined columns.

use crate::error::RowError;
use crate::types::{CombinedRow, ItemField, ItemGroup, ItemMode, ParsedParams};

/// Highest item index accepted in a row
pub const MAX_ITEM_INDEX: u32 = 10_000;

/// Separator used when joining item values
pub const ITEM_SEPARATOR: &str = ";";

pub const ITEMS_COLUMN: &str = "items";
pub const ITEM_SKU_COLUMN: &str = "itemSku";
pub const ITEM_UNIT_PRICE_COLUMN: &str = "itemUnitPrice";
pub const ITEM_QUANTITY_COLUMN: &str = "itemQuantity";
pub const ITEM_DISCOUNT_COLUMN: &str = "itemDiscount";

/// Classification of a parameter name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyClass<'a> {
    /// Ordinary field, passed through as its own column
    Plain,
    /// Known prefix immediately followed by ASCII digits and nothing else
    Indexed { field: ItemField, digits: &'a str },
}

/// Classify a (lower-cased) parameter name
pub fn classify_key(name: &str) -> KeyClass<'_> {
    for field in ItemField::ALL {
        if let Some(digits) = name.strip_prefix(field.prefix()) {
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                return KeyClass::Indexed { field, digits };
            }
        }
    }
    KeyClass::Plain
}

fn parse_index(key: &str, digits: &str) -> Result<u32, RowError> {
    let index: u32 = digits.parse().map_err(|_| RowError::IndexOverflow {
        key: key.to_string(),
    })?;
    if index > MAX_ITEM_INDEX {
        return Err(RowError::IndexOutOfRange {
            key: key.to_string(),
            index,
            limit: MAX_ITEM_INDEX,
        });
    }
    Ok(index)
}

/// Split decoded parameters into indexed item data and plain fields
pub fn split_items(params: ParsedParams) -> Result<(ItemGroup, CombinedRow), RowError> {
    let mut group = ItemGroup::default();
    let mut plain = CombinedRow::new();

    for (key, value) in params {
        match classify_key(&key) {
            KeyClass::Indexed { field, digits } => {
                let index = parse_index(&key, digits)?;
                group.insert(index, field, value);
            }
            KeyClass::Plain => {
                plain.insert(key, value);
            }
        }
    }

    Ok((group, plain))
}

/// Render an item group into `row` according to `mode`
///
/// Indices run from 1 to the group's max index; gaps render as empty
/// strings. Existing entries with the same column names are overwritten.
pub fn render_items(group: &ItemGroup, mode: ItemMode, row: &mut CombinedRow) {
    let indices = 1..=group.max_index;

    match mode {
        ItemMode::Combined => {
            let values: Vec<&str> = indices
                .flat_map(|idx| ItemField::ALL.map(|field| group.value(idx, field)))
                .collect();
            row.insert(ITEMS_COLUMN.to_string(), values.join(ITEM_SEPARATOR));
        }
        ItemMode::Separate => {
            let column = |field: ItemField| {
                indices
                    .clone()
                    .map(|idx| group.value(idx, field))
                    .collect::<Vec<_>>()
            };

            row.insert(
                ITEM_SKU_COLUMN.to_string(),
                column(ItemField::Item).join(ITEM_SEPARATOR),
            );
            row.insert(
                ITEM_UNIT_PRICE_COLUMN.to_string(),
                column(ItemField::Amt).join(ITEM_SEPARATOR),
            );
            row.insert(
                ITEM_QUANTITY_COLUMN.to_string(),
                column(ItemField::Qty).join(ITEM_SEPARATOR),
            );

            let discounts = column(ItemField::Dcnt);
            if discounts.iter().any(|d| !d.is_empty()) {
                row.insert(
                    ITEM_DISCOUNT_COLUMN.to_string(),
                    discounts.join(ITEM_SEPARATOR),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::query::decode_query;

    fn render(qs: &str, mode: ItemMode) -> CombinedRow {
        let (group, mut row) = split_items(decode_query(qs)).unwrap();
        render_items(&group, mode, &mut row);
        row
    }

    #[test]
    fn test_classify_key() {
        assert_eq!(
            classify_key("item1"),
            KeyClass::Indexed {
                field: ItemField::Item,
                digits: "1"
            }
        );
        assert_eq!(
            classify_key("dcnt12"),
            KeyClass::Indexed {
                field: ItemField::Dcnt,
                digits: "12"
            }
        );
        assert!(matches!(
            classify_key("amt007"),
            KeyClass::Indexed {
                field: ItemField::Amt,
                ..
            }
        ));
        assert!(matches!(
            classify_key("qty3"),
            KeyClass::Indexed {
                field: ItemField::Qty,
                ..
            }
        ));
    }

    #[test]
    fn test_classify_key_plain() {
        for name in ["item", "items", "item1a", "xitem1", "amt_1", "qty-2", "order", ""] {
            assert_eq!(classify_key(name), KeyClass::Plain, "{}", name);
        }
    }

    #[test]
    fn test_combined_mode() {
        let row = render(
            "item1=SKU1&amt1=10&qty1=2&item2=SKU2&amt2=5&qty2=1",
            ItemMode::Combined,
        );
        assert_eq!(row[ITEMS_COLUMN], "SKU1;10;2;;SKU2;5;1;");
        assert_eq!(row.len(), 1);
    }

    #[test]
    fn test_separate_mode_without_discount() {
        let row = render(
            "item1=SKU1&amt1=10&qty1=2&item2=SKU2&amt2=5&qty2=1",
            ItemMode::Separate,
        );
        assert_eq!(row[ITEM_SKU_COLUMN], "SKU1;SKU2");
        assert_eq!(row[ITEM_UNIT_PRICE_COLUMN], "10;5");
        assert_eq!(row[ITEM_QUANTITY_COLUMN], "2;1");
        assert!(!row.contains_key(ITEM_DISCOUNT_COLUMN));
    }

    #[test]
    fn test_separate_mode_with_discount() {
        let row = render("item1=A&item2=B&dcnt2=5", ItemMode::Separate);
        assert_eq!(row[ITEM_DISCOUNT_COLUMN], ";5");
    }

    #[test]
    fn test_gaps_render_empty() {
        let row = render("item3=C&qty1=4", ItemMode::Separate);
        assert_eq!(row[ITEM_SKU_COLUMN], ";;C");
        assert_eq!(row[ITEM_QUANTITY_COLUMN], "4;;");
        assert_eq!(row[ITEM_UNIT_PRICE_COLUMN], ";;");
    }

    #[test]
    fn test_no_items() {
        let row = render("order=1", ItemMode::Combined);
        assert_eq!(row[ITEMS_COLUMN], "");
        assert_eq!(row["order"], "1");

        let row = render("order=1", ItemMode::Separate);
        assert_eq!(row[ITEM_SKU_COLUMN], "");
        assert_eq!(row[ITEM_UNIT_PRICE_COLUMN], "");
        assert_eq!(row[ITEM_QUANTITY_COLUMN], "");
        assert!(!row.contains_key(ITEM_DISCOUNT_COLUMN));
    }

    #[test]
    fn test_index_zero_is_dropped() {
        let row = render("item0=X&item1=A", ItemMode::Combined);
        assert_eq!(row[ITEMS_COLUMN], "A;;;");
        assert!(!row.contains_key("item0"));
    }

    #[test]
    fn test_leading_zeros_share_index() {
        let (group, _) = split_items(decode_query("item01=A&amt1=3")).unwrap();
        assert_eq!(group.max_index, 1);
        assert_eq!(group.value(1, ItemField::Item), "A");
        assert_eq!(group.value(1, ItemField::Amt), "3");
    }

    #[test]
    fn test_same_index_later_key_wins() {
        let row = render("item1=A&item01=B", ItemMode::Combined);
        assert_eq!(row["items"], "B;;;");

        let row = render("item01=B&item1=A", ItemMode::Combined);
        assert_eq!(row["items"], "A;;;");
    }

    #[test]
    fn test_plain_fields_pass_through() {
        let (_, plain) = split_items(decode_query("Order=7&itemx=1&item2=B")).unwrap();
        assert_eq!(plain.len(), 2);
        assert_eq!(plain["order"], "7");
        assert_eq!(plain["itemx"], "1");
    }

    #[test]
    fn test_item_output_overwrites_plain_field() {
        let row = render("items=legacy&item1=A", ItemMode::Combined);
        assert_eq!(row[ITEMS_COLUMN], "A;;;");
    }

    #[test]
    fn test_index_overflow_is_row_error() {
        let err = split_items(decode_query("item99999999999=A")).unwrap_err();
        assert_eq!(
            err,
            RowError::IndexOverflow {
                key: "item99999999999".to_string()
            }
        );
    }

    #[test]
    fn test_index_over_limit_is_row_error() {
        let err = split_items(decode_query("qty10001=1")).unwrap_err();
        assert!(matches!(err, RowError::IndexOutOfRange { index: 10001, .. }));
        assert!(split_items(decode_query("qty10000=1")).is_ok());
    }
}
