//! Input validation for the Fabric Roll Ledger
//!
//! Everything the presentation layer submits passes through here before the
//! reconciliation engine sees it. Zero-consumption items are rejected at this
//! point, never inside the engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::models::{
    sheet_totals, AddStockInput, CreateSheetInput, EditSheetInput, SheetHeader, SheetHeaderInput, SheetItem,
    SheetItemInput, SheetRevision, StockEntry,
};
use crate::types::RollQuantity;

pub const MAX_PRODUCT_LEN: usize = 150;
pub const MAX_GRADE_LEN: usize = 50;
pub const MAX_COLOR_LEN: usize = 50;
/// Weights are stored with gram precision
pub const MAX_WEIGHT_DECIMALS: u32 = 3;
/// Largest roll count accepted on a single item or stock entry
pub const MAX_ROLLS: i64 = 1_000_000;
/// Largest weight a `NUMERIC(12, 3)` column holds: 999 999 999.999 kg
pub const MAX_WEIGHT: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 3);

// ============================================================================
// Field Validations
// ============================================================================

/// Trim a required text field and check its length
pub fn validate_required_text(value: &str, max_len: usize) -> Result<String, &'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("Field is required");
    }
    if trimmed.chars().count() > max_len {
        return Err("Field is too long");
    }
    Ok(trimmed.to_string())
}

/// Parse a sheet date, accepting the form format `dd/mm/yyyy` and ISO `yyyy-mm-dd`
pub fn parse_sheet_date(value: &str) -> Result<NaiveDate, &'static str> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .map_err(|_| "Date must be in dd/mm/yyyy format")
}

/// Validate cut number
pub fn validate_cut_number(cut_number: i32) -> Result<(), &'static str> {
    if cut_number <= 0 {
        return Err("Cut number must be positive");
    }
    Ok(())
}

/// Validate a size bucket piece count
pub fn validate_size_bucket(count: i32) -> Result<(), &'static str> {
    if count < 0 {
        return Err("Piece count cannot be negative");
    }
    Ok(())
}

/// Validate a roll count. Zero is rejected: an item or entry must move stock.
pub fn validate_rolls(rolls: i64) -> Result<(), &'static str> {
    if rolls <= 0 {
        return Err("Roll count must be positive");
    }
    if rolls > MAX_ROLLS {
        return Err("Roll count is too large");
    }
    Ok(())
}

/// Validate a weight in kg
pub fn validate_weight(weight: Decimal) -> Result<(), &'static str> {
    if weight <= Decimal::ZERO {
        return Err("Weight must be positive");
    }
    if weight > MAX_WEIGHT {
        return Err("Weight is too large");
    }
    if weight.normalize().scale() > MAX_WEIGHT_DECIMALS {
        return Err("Weight supports at most 3 decimal places");
    }
    Ok(())
}

// ============================================================================
// Sheet Validations
// ============================================================================

/// Validate a sheet header
pub fn validate_header(input: &SheetHeaderInput) -> Result<SheetHeader, ValidationError> {
    let product = validate_required_text(&input.product, MAX_PRODUCT_LEN)
        .map_err(|reason| ValidationError::new("product", reason))?;
    let grade = validate_required_text(&input.grade, MAX_GRADE_LEN)
        .map_err(|reason| ValidationError::new("grade", reason))?;
    validate_cut_number(input.cut_number)
        .map_err(|reason| ValidationError::new("cut_number", reason))?;
    let date = parse_sheet_date(&input.date).map_err(|reason| ValidationError::new("date", reason))?;

    Ok(SheetHeader {
        product,
        cut_number: input.cut_number,
        grade,
        date,
    })
}

/// Validate one item; `index` locates it in error messages
pub fn validate_item(index: usize, input: &SheetItemInput) -> Result<SheetItem, ValidationError> {
    let field = |name: &str| format!("items[{index}].{name}");

    let color = validate_required_text(&input.color, MAX_COLOR_LEN)
        .map_err(|reason| ValidationError::new(field("color"), reason))?;
    for (name, count) in [
        ("size_bucket_1", input.size_bucket_1),
        ("size_bucket_2", input.size_bucket_2),
        ("size_bucket_3", input.size_bucket_3),
    ] {
        validate_size_bucket(count).map_err(|reason| ValidationError::new(field(name), reason))?;
    }
    validate_rolls(i64::from(input.rolls_consumed))
        .map_err(|reason| ValidationError::new(field("rolls_consumed"), reason))?;
    validate_weight(input.weight_consumed)
        .map_err(|reason| ValidationError::new(field("weight_consumed"), reason))?;

    Ok(SheetItem {
        color,
        size_bucket_1: input.size_bucket_1,
        size_bucket_2: input.size_bucket_2,
        size_bucket_3: input.size_bucket_3,
        rolls_consumed: input.rolls_consumed,
        weight_consumed: input.weight_consumed,
    })
}

/// Validate an item set. A sheet always carries at least one item.
pub fn validate_items(items: &[SheetItemInput]) -> Result<Vec<SheetItem>, ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::new("items", "At least one item is required"));
    }
    let items = items
        .iter()
        .enumerate()
        .map(|(index, item)| validate_item(index, item))
        .collect::<Result<Vec<_>, _>>()?;

    if sheet_totals(&items).weight > MAX_WEIGHT {
        return Err(ValidationError::new("items", "Total weight is too large"));
    }
    Ok(items)
}

impl CreateSheetInput {
    pub fn validate(&self) -> Result<(SheetHeader, Vec<SheetItem>), ValidationError> {
        let header = validate_header(&self.header)?;
        let items = validate_items(&self.items)?;
        Ok((header, items))
    }
}

impl EditSheetInput {
    pub fn validate(&self) -> Result<SheetRevision, ValidationError> {
        let header = self.header.as_ref().map(validate_header).transpose()?;
        let items = validate_items(&self.items)?;
        Ok(SheetRevision { header, items })
    }
}

// ============================================================================
// Stock Validations
// ============================================================================

impl AddStockInput {
    pub fn validate(&self) -> Result<StockEntry, ValidationError> {
        let color = validate_required_text(&self.color, MAX_COLOR_LEN)
            .map_err(|reason| ValidationError::new("color", reason))?;
        validate_rolls(self.rolls).map_err(|reason| ValidationError::new("rolls", reason))?;
        validate_weight(self.weight).map_err(|reason| ValidationError::new("weight", reason))?;

        Ok(StockEntry {
            color,
            quantity: RollQuantity::new(self.rolls, self.weight),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn item(color: &str, rolls: i32, weight: &str) -> SheetItemInput {
        SheetItemInput {
            color: color.to_string(),
            size_bucket_1: 10,
            size_bucket_2: 12,
            size_bucket_3: 8,
            rolls_consumed: rolls,
            weight_consumed: weight.parse().unwrap(),
        }
    }

    fn header() -> SheetHeaderInput {
        SheetHeaderInput {
            product: "  Basic T-shirt ".to_string(),
            cut_number: 42,
            grade: "P-M-G".to_string(),
            date: "23/12/2024".to_string(),
        }
    }

    #[test]
    fn parses_form_and_iso_dates() {
        let form = parse_sheet_date("05/03/2025").unwrap();
        assert_eq!((form.day(), form.month(), form.year()), (5, 3, 2025));
        assert_eq!(parse_sheet_date("2025-03-05").unwrap(), form);
        assert!(parse_sheet_date("03-05-2025").is_err());
        assert!(parse_sheet_date("31/02/2025").is_err());
    }

    #[test]
    fn header_is_trimmed() {
        let header = validate_header(&header()).unwrap();
        assert_eq!(header.product, "Basic T-shirt");
        assert_eq!(header.cut_number, 42);
    }

    #[test]
    fn blank_product_names_the_field() {
        let mut input = header();
        input.product = "   ".to_string();
        let err = validate_header(&input).unwrap_err();
        assert_eq!(err.field, "product");
    }

    #[test]
    fn zero_roll_item_is_rejected() {
        let err = validate_items(&[item("red", 2, "4.0"), item("blue", 0, "1.0")]).unwrap_err();
        assert_eq!(err.field, "items[1].rolls_consumed");
    }

    #[test]
    fn non_positive_weight_is_rejected() {
        let err = validate_item(0, &item("red", 2, "0")).unwrap_err();
        assert_eq!(err.field, "items[0].weight_consumed");
    }

    #[test]
    fn weight_precision_is_limited_to_grams() {
        assert!(validate_weight("4.2500".parse().unwrap()).is_ok());
        assert!(validate_weight("4.2505".parse().unwrap()).is_err());
    }

    #[test]
    fn weight_is_limited_to_column_range() {
        assert_eq!(MAX_WEIGHT, "999999999.999".parse::<Decimal>().unwrap());
        assert!(validate_weight(MAX_WEIGHT).is_ok());
        assert!(validate_weight("1000000000".parse().unwrap()).is_err());
        assert!(validate_weight("99999999999999.999".parse().unwrap()).is_err());
    }

    #[test]
    fn roll_count_has_an_upper_bound() {
        assert!(validate_rolls(MAX_ROLLS).is_ok());
        assert!(validate_rolls(MAX_ROLLS + 1).is_err());
        assert!(validate_rolls(i64::MAX).is_err());
    }

    #[test]
    fn oversized_stock_entry_is_a_validation_error() {
        let input = AddStockInput {
            color: "red".to_string(),
            rolls: i64::MAX,
            weight: Decimal::ONE,
        };
        assert_eq!(input.validate().unwrap_err().field, "rolls");

        let input = AddStockInput {
            color: "red".to_string(),
            rolls: 5,
            weight: "99999999999999.999".parse().unwrap(),
        };
        assert_eq!(input.validate().unwrap_err().field, "weight");
    }

    #[test]
    fn sheet_total_weight_must_fit() {
        let items = vec![item("red", 1, "600000000"), item("blue", 1, "600000000")];
        assert_eq!(validate_items(&items).unwrap_err().field, "items");
    }

    #[test]
    fn negative_size_bucket_is_rejected() {
        let mut input = item("red", 1, "2.5");
        input.size_bucket_2 = -1;
        let err = validate_item(3, &input).unwrap_err();
        assert_eq!(err.field, "items[3].size_bucket_2");
    }

    #[test]
    fn empty_item_set_is_rejected() {
        let input = CreateSheetInput {
            header: header(),
            items: vec![],
        };
        assert_eq!(input.validate().unwrap_err().field, "items");
    }

    #[test]
    fn edit_without_header_keeps_it_absent() {
        let input = EditSheetInput {
            header: None,
            items: vec![item(" red ", 3, "6.5")],
        };
        let revision = input.validate().unwrap();
        assert!(revision.header.is_none());
        assert_eq!(revision.items[0].color, "red");
    }

    #[test]
    fn stock_entry_requires_positive_quantities() {
        let input = AddStockInput {
            color: "navy".to_string(),
            rolls: 0,
            weight: Decimal::ONE,
        };
        assert_eq!(input.validate().unwrap_err().field, "rolls");

        let input = AddStockInput {
            color: "navy".to_string(),
            rolls: 3,
            weight: Decimal::new(-5, 1),
        };
        assert_eq!(input.validate().unwrap_err().field, "weight");
    }

    #[test]
    fn create_input_decodes_from_json() {
        let input: CreateSheetInput = serde_json::from_str(
            r#"{
                "product": "Polo",
                "cut_number": 7,
                "grade": "M-G",
                "date": "2025-01-15",
                "items": [
                    {"color": "red", "size_bucket_1": 5, "rolls_consumed": 2, "weight_consumed": "4.250"}
                ]
            }"#,
        )
        .unwrap();

        let (header, items) = input.validate().unwrap();
        assert_eq!(header.product, "Polo");
        assert_eq!(items[0].line_total(), 5);
        assert_eq!(items[0].weight_consumed, Decimal::new(4250, 3));
    }
}
