//! Property-based tests for the ledger core invariants.
//!
//! These model the admission rule and the fold over generated operation
//! sequences, checking the invariants that the integration tests only probe
//! at single points.

use proptest::prelude::*;
use rust_decimal::Decimal;

use partsledger_api::entities::inventory_movement::MovementKind;
use partsledger_api::services::sequences::format_document_number;
use partsledger_api::services::validate_positive_quantity;

// Strategies for generating test data
fn kind_strategy() -> impl Strategy<Value = MovementKind> {
    prop_oneof![
        Just(MovementKind::Entry),
        Just(MovementKind::Exit),
        Just(MovementKind::AdjustmentIncrease),
        Just(MovementKind::AdjustmentDecrease),
        Just(MovementKind::TransferOut),
        Just(MovementKind::TransferIn),
    ]
}

fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    // whole units and fractional quantities down to hundredths
    (1i64..=10_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn operations_strategy() -> impl Strategy<Value = Vec<(MovementKind, Decimal)>> {
    prop::collection::vec((kind_strategy(), quantity_strategy()), 0..64)
}

/// The admission rule: outbound operations are rejected when the running
/// balance cannot cover them, everything else is appended.
fn admit(ops: &[(MovementKind, Decimal)]) -> Vec<(MovementKind, Decimal)> {
    let mut balance = Decimal::ZERO;
    let mut ledger = Vec::new();
    for (kind, quantity) in ops {
        if kind.is_outbound() && balance < *quantity {
            continue;
        }
        balance += Decimal::from(kind.sign()) * *quantity;
        ledger.push((*kind, *quantity));
    }
    ledger
}

fn fold(ledger: &[(MovementKind, Decimal)]) -> Decimal {
    ledger
        .iter()
        .map(|(kind, quantity)| Decimal::from(kind.sign()) * *quantity)
        .sum()
}

/// The kind each workflow posts to undo a movement: cancellation answers a
/// remission EXIT with an ENTRY, a transfer pairs OUT with IN, and count
/// corrections pair the two adjustment kinds.
fn compensating(kind: MovementKind) -> MovementKind {
    match kind {
        MovementKind::Entry => MovementKind::Exit,
        MovementKind::Exit => MovementKind::Entry,
        MovementKind::AdjustmentIncrease => MovementKind::AdjustmentDecrease,
        MovementKind::AdjustmentDecrease => MovementKind::AdjustmentIncrease,
        MovementKind::TransferOut => MovementKind::TransferIn,
        MovementKind::TransferIn => MovementKind::TransferOut,
    }
}

// Property: the guarded balance never goes negative
proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn admitted_balance_never_goes_negative(ops in operations_strategy()) {
        let mut balance = Decimal::ZERO;
        for (kind, quantity) in admit(&ops) {
            balance += Decimal::from(kind.sign()) * quantity;
            prop_assert!(
                balance >= Decimal::ZERO,
                "balance dipped to {} after {:?}",
                balance,
                kind
            );
        }
    }

    #[test]
    fn accumulator_equals_the_fold_after_any_sequence(ops in operations_strategy()) {
        // the accumulator is maintained operation by operation; the fold
        // replays the admitted ledger from zero
        let mut accumulator = Decimal::ZERO;
        let ledger = admit(&ops);
        for (kind, quantity) in &ledger {
            accumulator += Decimal::from(kind.sign()) * *quantity;
        }
        prop_assert_eq!(accumulator, fold(&ledger));
    }

    #[test]
    fn kardex_balances_are_prefix_sums_of_the_ledger(ops in operations_strategy()) {
        let ledger = admit(&ops);
        let mut running = Decimal::ZERO;
        let mut previous = Decimal::ZERO;
        for (kind, quantity) in &ledger {
            let signed = Decimal::from(kind.sign()) * *quantity;
            running += signed;
            prop_assert_eq!(running - previous, signed);
            previous = running;
        }
        prop_assert_eq!(running, fold(&ledger));
    }

    #[test]
    fn compensation_restores_the_fold(ops in operations_strategy()) {
        // posting the compensating kind for every admitted movement brings
        // the component back to zero, and compensating twice is the identity
        let ledger = admit(&ops);
        let mut undone = ledger.clone();
        undone.extend(
            ledger
                .iter()
                .map(|(kind, quantity)| (compensating(*kind), *quantity)),
        );
        prop_assert_eq!(fold(&undone), Decimal::ZERO);

        for (kind, _) in &ledger {
            prop_assert_eq!(compensating(compensating(*kind)), *kind);
            prop_assert_eq!(compensating(*kind).sign(), -kind.sign());
        }
    }
}

// Property: the kind sign table is the single source of direction
proptest! {
    #[test]
    fn kinds_are_either_inbound_or_outbound(kind in kind_strategy()) {
        prop_assert!(kind.sign() == 1 || kind.sign() == -1);
        prop_assert_eq!(kind.is_outbound(), kind.sign() == -1);
    }

    #[test]
    fn positive_quantities_always_validate(quantity in quantity_strategy()) {
        prop_assert!(validate_positive_quantity(&quantity).is_ok());
    }

    #[test]
    fn non_positive_quantities_never_validate(cents in 0i64..=10_000) {
        let quantity = Decimal::new(-cents, 2);
        prop_assert!(validate_positive_quantity(&quantity).is_err());
    }
}

// Property: zero-padded document numbers sort like their sequence values
proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn document_numbers_sort_with_their_sequence((a, b) in (1i64..=999_999, 1i64..=999_999)) {
        let doc_a = format_document_number("REM", a);
        let doc_b = format_document_number("REM", b);
        prop_assert_eq!(a.cmp(&b), doc_a.cmp(&doc_b));
    }

    #[test]
    fn document_numbers_keep_their_prefix(value in 1i64..=999_999) {
        let formatted = format_document_number("RET", value);
        prop_assert!(formatted.starts_with("RET-"));
        prop_assert_eq!(formatted.len(), "RET-".len() + 6);
    }
}
