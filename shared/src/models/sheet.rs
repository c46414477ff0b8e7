//! Production sheet models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};

use crate::types::{RollQuantity, SheetId};

/// Header fields of a production sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetHeader {
    pub product: String,
    pub cut_number: i32,
    pub grade: String,
    pub date: NaiveDate,
}

/// One line of a production sheet: pieces cut in each size bucket for a
/// color, and the fabric consumed to cut them
///
/// Serialized with its derived `line_total`; the total is never read back.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SheetItem {
    pub color: String,
    pub size_bucket_1: i32,
    pub size_bucket_2: i32,
    pub size_bucket_3: i32,
    pub rolls_consumed: i32,
    pub weight_consumed: Decimal,
}

impl SheetItem {
    /// Pieces across all size buckets
    pub fn line_total(&self) -> i64 {
        i64::from(self.size_bucket_1) + i64::from(self.size_bucket_2) + i64::from(self.size_bucket_3)
    }

    pub fn consumption(&self) -> RollQuantity {
        RollQuantity::new(i64::from(self.rolls_consumed), self.weight_consumed)
    }
}

impl Serialize for SheetItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SheetItem", 7)?;
        state.serialize_field("color", &self.color)?;
        state.serialize_field("size_bucket_1", &self.size_bucket_1)?;
        state.serialize_field("size_bucket_2", &self.size_bucket_2)?;
        state.serialize_field("size_bucket_3", &self.size_bucket_3)?;
        state.serialize_field("line_total", &self.line_total())?;
        state.serialize_field("rolls_consumed", &self.rolls_consumed)?;
        state.serialize_field("weight_consumed", &self.weight_consumed)?;
        state.end()
    }
}

/// Rolls and weight consumed by a whole item set
pub fn sheet_totals(items: &[SheetItem]) -> RollQuantity {
    items.iter().map(SheetItem::consumption).sum()
}

/// A persisted production sheet with its items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionSheet {
    pub id: SheetId,
    #[serde(flatten)]
    pub header: SheetHeader,
    pub total_rolls: i64,
    pub total_weight: Decimal,
    pub items: Vec<SheetItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Header fields as submitted by the presentation layer
#[derive(Debug, Clone, Deserialize)]
pub struct SheetHeaderInput {
    pub product: String,
    pub cut_number: i32,
    pub grade: String,
    /// `dd/mm/yyyy` or `yyyy-mm-dd`
    pub date: String,
}

/// Item fields as submitted by the presentation layer
#[derive(Debug, Clone, Deserialize)]
pub struct SheetItemInput {
    pub color: String,
    #[serde(default)]
    pub size_bucket_1: i32,
    #[serde(default)]
    pub size_bucket_2: i32,
    #[serde(default)]
    pub size_bucket_3: i32,
    pub rolls_consumed: i32,
    pub weight_consumed: Decimal,
}

/// Input for creating a sheet
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSheetInput {
    #[serde(flatten)]
    pub header: SheetHeaderInput,
    pub items: Vec<SheetItemInput>,
}

/// Input for editing a sheet. The item set replaces the current one; the
/// header is only rewritten when present.
#[derive(Debug, Clone, Deserialize)]
pub struct EditSheetInput {
    #[serde(default)]
    pub header: Option<SheetHeaderInput>,
    pub items: Vec<SheetItemInput>,
}

/// Validated sheet revision handed to the reconciliation engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRevision {
    pub header: Option<SheetHeader>,
    pub items: Vec<SheetItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_json_carries_its_line_total() {
        let item = SheetItem {
            color: "red".to_string(),
            size_bucket_1: 12,
            size_bucket_2: 8,
            size_bucket_3: 5,
            rolls_consumed: 2,
            weight_consumed: Decimal::new(4250, 3),
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["line_total"], 25);
        assert_eq!(json["rolls_consumed"], 2);

        let decoded: SheetItem = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, item);
    }
}
