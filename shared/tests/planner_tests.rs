//! Reconciliation planner tests
//!
//! - Plans carry only non-zero deltas, in color order
//! - Journal records reproduce each delta exactly
//! - Consecutive edits compose into the direct edit

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{aggregate_by_color, sheet_totals, ReconciliationPlan, RollQuantity, SheetItem};
use std::collections::BTreeMap;

const COLORS: [&str; 5] = ["black", "blue", "navy", "red", "white"];

fn items_strategy() -> impl Strategy<Value = Vec<SheetItem>> {
    prop::collection::vec(
        (0..COLORS.len(), 1..12i32, 1..30_000i64, 0..50i32),
        0..6,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(color, rolls, grams, pieces)| SheetItem {
                color: COLORS[color].to_string(),
                size_bucket_1: pieces,
                size_bucket_2: pieces / 2,
                size_bucket_3: 0,
                rolls_consumed: rolls,
                weight_consumed: Decimal::new(grams, 3),
            })
            .collect()
    })
}

fn ledger_changes(plan: &ReconciliationPlan) -> BTreeMap<String, RollQuantity> {
    plan.deltas()
        .iter()
        .map(|d| (d.color.clone(), d.ledger_change()))
        .collect()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    fn item(color: &str, rolls: i32, weight: &str) -> SheetItem {
        SheetItem {
            color: color.to_string(),
            size_bucket_1: 0,
            size_bucket_2: 0,
            size_bucket_3: 0,
            rolls_consumed: rolls,
            weight_consumed: weight.parse().unwrap(),
        }
    }

    #[test]
    fn test_rows_of_one_color_are_aggregated() {
        let by_color = aggregate_by_color(&[
            item("red", 2, "4.0"),
            item("blue", 1, "1.5"),
            item("red", 3, "5.25"),
        ]);

        assert_eq!(by_color["red"], RollQuantity::new(5, "9.25".parse().unwrap()));
        assert_eq!(by_color["blue"], RollQuantity::new(1, "1.5".parse().unwrap()));
    }

    #[test]
    fn test_removed_color_is_returned() {
        let plan = ReconciliationPlan::between(&[item("red", 2, "4.0")], &[item("blue", 2, "4.0")]);
        let changes = ledger_changes(&plan);

        assert_eq!(changes["red"], RollQuantity::new(2, "4.0".parse().unwrap()));
        assert_eq!(changes["blue"], RollQuantity::new(-2, "-4.0".parse().unwrap()));
        assert_eq!(plan.colors(), vec!["blue".to_string(), "red".to_string()]);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Total ledger change is the difference of the two sheet totals
    #[test]
    fn prop_net_change_matches_totals(current in items_strategy(), proposed in items_strategy()) {
        let plan = ReconciliationPlan::between(&current, &proposed);
        prop_assert_eq!(plan.net_ledger_change(), sheet_totals(&current) - sheet_totals(&proposed));
    }

    /// Plans never carry zero deltas and list colors in ascending order
    #[test]
    fn prop_deltas_are_sorted_and_non_zero(current in items_strategy(), proposed in items_strategy()) {
        let plan = ReconciliationPlan::between(&current, &proposed);

        for delta in plan.deltas() {
            prop_assert!(!delta.consumption.is_zero());
        }
        let colors = plan.colors();
        let mut sorted = colors.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(colors, sorted);
    }

    /// An item set compared with a reordering of itself plans nothing
    #[test]
    fn prop_reordered_items_plan_nothing(items in items_strategy()) {
        let mut reordered = items.clone();
        reordered.reverse();

        let plan = ReconciliationPlan::between(&items, &reordered);
        prop_assert!(plan.is_empty());
        prop_assert!(plan.movements(Some("Shirt"), "sheet 1").unwrap().is_empty());
    }

    /// Journal records add up to each color's ledger change
    #[test]
    fn prop_movements_reproduce_deltas(current in items_strategy(), proposed in items_strategy()) {
        let plan = ReconciliationPlan::between(&current, &proposed);
        let movements = plan.movements(Some("Shirt"), "sheet 7").unwrap();

        let mut journaled: BTreeMap<String, RollQuantity> = BTreeMap::new();
        for movement in &movements {
            prop_assert!(movement.quantity() > 0 || movement.weight() > Decimal::ZERO);
            prop_assert_eq!(movement.reference(), "sheet 7");
            *journaled.entry(movement.color().to_string()).or_default() += movement.ledger_effect();
        }
        prop_assert_eq!(journaled, ledger_changes(&plan));
    }

    /// Editing a to b and then b to c changes the ledger like editing a to c
    #[test]
    fn prop_edits_compose(
        a in items_strategy(),
        b in items_strategy(),
        c in items_strategy(),
    ) {
        let mut stepwise: BTreeMap<String, RollQuantity> = BTreeMap::new();
        for plan in [ReconciliationPlan::between(&a, &b), ReconciliationPlan::between(&b, &c)] {
            for delta in plan.deltas() {
                *stepwise.entry(delta.color.clone()).or_default() += delta.ledger_change();
            }
        }
        stepwise.retain(|_, change| !change.is_zero());

        prop_assert_eq!(stepwise, ledger_changes(&ReconciliationPlan::between(&a, &c)));
    }

    /// Creating then deleting a sheet nets out to nothing
    #[test]
    fn prop_create_then_delete_cancels(items in items_strategy()) {
        let created = ReconciliationPlan::for_new_sheet(&items);
        let removed = ReconciliationPlan::for_removed_sheet(&items);

        prop_assert_eq!(created.net_ledger_change() + removed.net_ledger_change(), RollQuantity::ZERO);
        prop_assert_eq!(created.colors(), removed.colors());
    }
}
