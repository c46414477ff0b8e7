//! Stock reconciliation planner
//!
//! Given the item set a sheet currently holds and the item set it should hold
//! next, works out the per-color net change in consumption, checks it against
//! available stock and derives the journal records that describe it. Create
//! is a reconciliation from an empty item set, delete a reconciliation to one.
//!
//! Only the marginal change is ever checked or applied. A sheet already
//! holding 10 red rolls that is edited to 12 needs 2 more rolls in stock, not
//! 12.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::LedgerError;
use crate::models::{MovementKind, NewMovement, SheetItem};
use crate::types::RollQuantity;
use crate::validation::MAX_WEIGHT;

/// Consumption summed per color, ordered by color
pub type ConsumptionByColor = BTreeMap<String, RollQuantity>;

/// Sum rolls and weight per color. A color may appear on several item rows.
pub fn aggregate_by_color(items: &[SheetItem]) -> ConsumptionByColor {
    let mut by_color = ConsumptionByColor::new();
    for item in items {
        *by_color.entry(item.color.clone()).or_default() += item.consumption();
    }
    by_color
}

/// Apply a signed change to a stock level.
///
/// `change` is the ledger change (negative withdraws). Fails without
/// producing a level when either component would drop below zero or grow
/// past what the ledger can store; a missing ledger row is simply a zero
/// level.
pub fn apply_to_level(
    color: &str,
    level: RollQuantity,
    change: RollQuantity,
) -> Result<RollQuantity, LedgerError> {
    let limit_exceeded = || LedgerError::StockLimitExceeded {
        color: color.to_string(),
    };

    let rolls = level.rolls.checked_add(change.rolls).ok_or_else(limit_exceeded)?;
    let weight = level.weight.checked_add(change.weight).ok_or_else(limit_exceeded)?;
    let next = RollQuantity::new(rolls, weight);

    if next.rolls < 0 {
        return Err(LedgerError::InsufficientStock {
            color: color.to_string(),
            requested: -change.rolls,
            available: level.rolls,
        });
    }
    if next.weight < Decimal::ZERO {
        return Err(LedgerError::InsufficientWeight {
            color: color.to_string(),
            requested: -change.weight,
            available: level.weight,
        });
    }
    if next.weight > MAX_WEIGHT {
        return Err(limit_exceeded());
    }
    Ok(next)
}

/// Net change in consumption of one color
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorDelta {
    pub color: String,
    /// Positive when the sheet consumes more than before
    pub consumption: RollQuantity,
}

impl ColorDelta {
    /// The same change seen from the stock ledger
    pub fn ledger_change(&self) -> RollQuantity {
        -self.consumption
    }

    /// Journal records describing this delta.
    ///
    /// One record when rolls and weight move the same way (or one of them
    /// does not move). When they move in opposite directions, one record per
    /// direction so that both the roll and the weight journals stay exact.
    pub fn movements(
        &self,
        product_ref: Option<&str>,
        reference: &str,
    ) -> Result<Vec<NewMovement>, LedgerError> {
        let rolls = self.consumption.rolls;
        let weight = self.consumption.weight;
        let roll_kind = direction(rolls.signum());
        let weight_kind = direction(sign_of(weight));

        let record = |kind, quantity: i64, weight: Decimal| {
            NewMovement::new(
                kind,
                self.color.clone(),
                quantity,
                weight,
                product_ref.map(str::to_string),
                reference,
            )
        };

        match (roll_kind, weight_kind) {
            (Some(roll_kind), Some(weight_kind)) if roll_kind != weight_kind => Ok(vec![
                record(roll_kind, rolls.abs(), Decimal::ZERO)?,
                record(weight_kind, 0, weight.abs())?,
            ]),
            (Some(kind), _) | (None, Some(kind)) => {
                Ok(vec![record(kind, rolls.abs(), weight.abs())?])
            }
            (None, None) => Err(LedgerError::InvalidMovement {
                reason: format!("zero delta for {} reached the journal", self.color),
            }),
        }
    }
}

fn sign_of(value: Decimal) -> i64 {
    if value > Decimal::ZERO {
        1
    } else if value < Decimal::ZERO {
        -1
    } else {
        0
    }
}

fn direction(consumption_sign: i64) -> Option<MovementKind> {
    match consumption_sign {
        1 => Some(MovementKind::Withdrawal),
        -1 => Some(MovementKind::Entry),
        _ => None,
    }
}

/// The per-color changes needed to move a sheet from one item set to another
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationPlan {
    deltas: Vec<ColorDelta>,
}

impl ReconciliationPlan {
    /// Plan the move from `current` to `proposed`. Colors whose totals do not
    /// change are left out, so regrouping or reordering rows plans nothing.
    pub fn between(current: &[SheetItem], proposed: &[SheetItem]) -> Self {
        let old = aggregate_by_color(current);
        let new = aggregate_by_color(proposed);

        let colors: BTreeSet<&String> = old.keys().chain(new.keys()).collect();
        let deltas = colors
            .into_iter()
            .filter_map(|color| {
                let before = old.get(color).copied().unwrap_or_default();
                let after = new.get(color).copied().unwrap_or_default();
                let consumption = after - before;
                (!consumption.is_zero()).then(|| ColorDelta {
                    color: color.clone(),
                    consumption,
                })
            })
            .collect();

        Self { deltas }
    }

    /// Plan for a new sheet: everything it consumes is withdrawn
    pub fn for_new_sheet(items: &[SheetItem]) -> Self {
        Self::between(&[], items)
    }

    /// Plan for a deleted sheet: everything it consumed returns to stock
    pub fn for_removed_sheet(items: &[SheetItem]) -> Self {
        Self::between(items, &[])
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Non-zero deltas in ascending color order
    pub fn deltas(&self) -> &[ColorDelta] {
        &self.deltas
    }

    /// Colors touched, in ascending order. Ledger rows are locked in this
    /// order so overlapping operations cannot deadlock.
    pub fn colors(&self) -> Vec<String> {
        self.deltas.iter().map(|d| d.color.clone()).collect()
    }

    /// Check every delta against available stock before anything is written.
    ///
    /// `available` returns the current level of a color (zero when the color
    /// has no ledger row). Reports the first short color in color order.
    pub fn check_against<F>(&self, mut available: F) -> Result<(), LedgerError>
    where
        F: FnMut(&str) -> RollQuantity,
    {
        for delta in &self.deltas {
            apply_to_level(&delta.color, available(&delta.color), delta.ledger_change())?;
        }
        Ok(())
    }

    /// Journal records for the whole plan, in color order
    pub fn movements(
        &self,
        product_ref: Option<&str>,
        reference: &str,
    ) -> Result<Vec<NewMovement>, LedgerError> {
        let mut movements = Vec::with_capacity(self.deltas.len());
        for delta in &self.deltas {
            movements.extend(delta.movements(product_ref, reference)?);
        }
        Ok(movements)
    }

    /// Sum of all ledger changes, used for logging
    pub fn net_ledger_change(&self) -> RollQuantity {
        self.deltas.iter().map(ColorDelta::ledger_change).sum()
    }
}
