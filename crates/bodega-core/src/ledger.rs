//! # Customer Ledger
//!
//! Aggregation and mutation rules for a customer's tab ("fiado").
//!
//! ## Balance
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  movements:  Charge 500 (products)   Payment 200 (Abono)                │
//! │                    │                        │                           │
//! │                    ▼                        ▼                           │
//! │             totalDebit = 500         totalCredit = 200                  │
//! │                    └──────────┬─────────────┘                           │
//! │                               ▼                                         │
//! │                     balance = 500 - 200 = 300                           │
//! │                                                                         │
//! │   balance == 0            ──► paid off (exact, no tolerance)            │
//! │   0 < balance < debit     ──► partially paid                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pay In Full
//! ```text
//!   balance 300 ──► stock-out lines merged from every product-carrying movement
//!               ──► append Payment(300) "Pago total"  ──► balance 0
//! ```
//!
//! The store write-backs happen in the API layer; this module only decides
//! what to write.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::inventory::SaleLine;
use crate::money::Money;
use crate::types::{Currency, Customer, Entry, Movement, ProductSnapshot, RecordId};
use crate::validation::validate_customer_name;

/// Concept of a partial payment when none is typed.
pub const PAYMENT_CONCEPT: &str = "Abono";
/// Concept of the movement that settles a tab.
pub const SETTLEMENT_CONCEPT: &str = "Pago total";
/// Concept of a new customer's first charge.
pub const OPENING_CONCEPT: &str = "Deuda inicial";
/// Concept of the charge produced by consolidation.
pub const CONSOLIDATED_CONCEPT: &str = "Deuda acumulada";

// =============================================================================
// Summary
// =============================================================================

/// Debit, credit and balance of a movement list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub total_debit: Money,
    pub total_credit: Money,
    pub balance: Money,
    pub is_paid_off: bool,
    pub is_partially_paid: bool,
}

impl LedgerSummary {
    pub fn of(movements: &[Movement]) -> Self {
        let (total_debit, total_credit) = movements.iter().fold(
            (Money::zero(), Money::zero()),
            |(debit, credit), m| match m.entry {
                Entry::Charge(amount) => (debit + amount, credit),
                Entry::Payment(amount) => (debit, credit + amount),
            },
        );
        let balance = total_debit - total_credit;

        LedgerSummary {
            total_debit,
            total_credit,
            balance,
            is_paid_off: balance.is_zero(),
            is_partially_paid: balance.is_positive() && balance < total_debit,
        }
    }
}

impl Customer {
    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary::of(&self.movements)
    }

    pub fn balance(&self) -> Money {
        self.summary().balance
    }
}

// =============================================================================
// Payments
// =============================================================================

/// Appends a partial payment (abono).
///
/// ## Rules
/// - amount > 0
/// - amount ≤ current balance
///
/// Nothing is appended when a rule fails.
pub fn record_payment(
    customer: &mut Customer,
    amount: Money,
    concept: Option<&str>,
) -> CoreResult<Movement> {
    if !amount.is_positive() {
        return Err(CoreError::PaymentNotPositive);
    }

    let balance = customer.balance();
    if amount > balance {
        return Err(CoreError::PaymentExceedsBalance { balance });
    }

    let movement = Movement::payment(concept_or(concept, PAYMENT_CONCEPT), amount);
    customer.movements.push(movement.clone());
    Ok(movement)
}

/// What settling a tab requires: stock to take out and the payment made.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub stock_out: Vec<SaleLine>,
    pub payment: Movement,
}

/// Pays the whole balance.
///
/// Returns `None` (and changes nothing) when nothing is owed. Otherwise the
/// payment is appended and the balance becomes exactly zero.
pub fn settle_in_full(customer: &mut Customer) -> Option<Settlement> {
    let balance = customer.balance();
    if !balance.is_positive() {
        return None;
    }

    let stock_out = merged_sale_lines(&customer.movements);
    let payment = Movement::payment(SETTLEMENT_CONCEPT, balance);
    customer.movements.push(payment.clone());

    Some(Settlement { stock_out, payment })
}

/// Product quantities across all movements, one line per product in
/// first-seen order.
pub fn merged_sale_lines(movements: &[Movement]) -> Vec<SaleLine> {
    let mut lines: Vec<SaleLine> = Vec::new();
    for snapshot in movements.iter().flat_map(|m| m.products.iter()) {
        match lines.iter_mut().find(|l| l.product_id == snapshot.id) {
            Some(line) => line.quantity += snapshot.quantity,
            None => lines.push(SaleLine {
                product_id: snapshot.id.clone(),
                quantity: snapshot.quantity,
            }),
        }
    }
    lines.retain(|l| l.quantity > 0);
    lines
}

/// Clears the tab. Products are not touched.
pub fn reset_debt(customer: &mut Customer) {
    customer.movements.clear();
}

// =============================================================================
// Consolidation
// =============================================================================

/// Pre-filled edit form: merged product lines and the last concept used.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidationDraft {
    pub lines: Vec<ProductSnapshot>,
    pub concept: Option<String>,
    pub total: Money,
}

/// Merges the product lines of every movement.
///
/// Quantities are summed per product. A product keeps its first-seen
/// position; name and price come from its latest movement.
pub fn consolidation_draft(movements: &[Movement]) -> ConsolidationDraft {
    let mut lines = Vec::new();
    let mut concept = None;

    for movement in movements.iter().filter(|m| m.has_products()) {
        concept = Some(movement.concept.clone());
        for snapshot in &movement.products {
            merge_line(&mut lines, snapshot.clone());
        }
    }

    let total = lines.iter().map(ProductSnapshot::line_total).sum();
    ConsolidationDraft {
        lines,
        concept,
        total,
    }
}

fn merge_line(lines: &mut Vec<ProductSnapshot>, line: ProductSnapshot) {
    match lines.iter_mut().find(|l| l.id == line.id) {
        Some(existing) => {
            existing.quantity += line.quantity;
            existing.name = line.name;
            existing.price = line.price;
        }
        None => lines.push(line),
    }
}

/// Customer create/edit form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerForm {
    pub name: String,
    /// Only read on creation.
    #[serde(default, rename = "typeMony")]
    pub currency: Currency,
    #[serde(default)]
    pub concept: Option<String>,
    #[serde(default)]
    pub lines: Vec<ProductSnapshot>,
    /// Used when there are no product lines.
    #[serde(default)]
    pub amount: Option<Money>,
}

impl CustomerForm {
    fn charge(&self, default_concept: &str) -> CoreResult<Movement> {
        let lines: Vec<ProductSnapshot> = self
            .lines
            .iter()
            .filter(|l| l.quantity > 0)
            .cloned()
            .collect();

        let amount = if lines.is_empty() {
            self.amount.unwrap_or_default()
        } else {
            lines.iter().map(ProductSnapshot::line_total).sum()
        };

        if !amount.is_positive() {
            return Err(ValidationError::MustBePositive {
                field: "amount".to_string(),
            }
            .into());
        }

        Ok(Movement::charge(
            concept_or(self.concept.as_deref(), default_concept),
            amount,
            lines,
        ))
    }
}

/// New customer with a single opening charge.
pub fn open_account(form: &CustomerForm) -> CoreResult<Customer> {
    validate_customer_name(&form.name)?;
    let opening = form.charge(OPENING_CONCEPT)?;

    Ok(Customer {
        id: RecordId::generate(),
        name: form.name.trim().to_string(),
        currency: form.currency,
        movements: vec![opening],
    })
}

/// Replaces every product-carrying movement with one consolidated charge.
///
/// Movements without products (payments, manual debts) are kept in order.
///
/// ## Example
/// ```text
/// before: [Charge 300 (2 pan), Payment 100, Charge 150 (1 pan)]
/// form:   3 pan @ 150
/// after:  [Payment 100, Charge 450 (3 pan) "Deuda acumulada"]
/// ```
pub fn consolidate(customer: &mut Customer, form: &CustomerForm) -> CoreResult<()> {
    validate_customer_name(&form.name)?;
    let charge = form.charge(CONSOLIDATED_CONCEPT)?;

    customer.name = form.name.trim().to_string();
    customer.movements.retain(|m| !m.has_products());
    customer.movements.push(charge);
    Ok(())
}

/// Adds cart lines to an existing tab by consolidating them with what the
/// customer already owes for products.
pub fn charge_lines(
    customer: &mut Customer,
    cart: Vec<ProductSnapshot>,
    concept: Option<String>,
) -> CoreResult<()> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    let draft = consolidation_draft(&customer.movements);
    let mut lines = draft.lines;
    for line in cart {
        merge_line(&mut lines, line);
    }

    let form = CustomerForm {
        name: customer.name.clone(),
        currency: customer.currency,
        concept: concept.or(draft.concept),
        lines,
        amount: None,
    };
    consolidate(customer, &form)
}

/// Starts the tab over with only the cart lines.
pub fn restart_with_lines(
    customer: &mut Customer,
    cart: Vec<ProductSnapshot>,
    concept: Option<String>,
) -> CoreResult<()> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    let form = CustomerForm {
        name: customer.name.clone(),
        currency: customer.currency,
        concept,
        lines: cart,
        amount: None,
    };
    let opening = form.charge(OPENING_CONCEPT)?;
    customer.movements = vec![opening];
    Ok(())
}

/// Case-insensitive name filter; a blank query matches everyone.
pub fn search_customers<'a>(customers: &'a [Customer], query: &str) -> Vec<&'a Customer> {
    let needle = query.trim().to_lowercase();
    customers
        .iter()
        .filter(|c| needle.is_empty() || c.name.to_lowercase().contains(&needle))
        .collect()
}

fn concept_or(concept: Option<&str>, default: &str) -> String {
    concept
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(default)
        .to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn snapshot(id: i64, price: i64, quantity: u32) -> ProductSnapshot {
        ProductSnapshot {
            id: RecordId::Number(id),
            name: format!("p{}", id),
            price: Money::from_int(price),
            quantity,
        }
    }

    fn customer(movements: Vec<Movement>) -> Customer {
        Customer {
            id: RecordId::from("c-1"),
            name: "Maria".to_string(),
            currency: Currency::Cop,
            movements,
        }
    }

    #[test]
    fn test_summary_scenario() {
        let mut c = customer(vec![
            Movement::charge("Deuda inicial", Money::from_int(500), vec![]),
            Movement::payment("Abono", Money::from_int(200)),
        ]);

        let summary = c.summary();
        assert_eq!(summary.total_debit, Money::from_int(500));
        assert_eq!(summary.total_credit, Money::from_int(200));
        assert_eq!(summary.balance, Money::from_int(300));
        assert!(!summary.is_paid_off);
        assert!(summary.is_partially_paid);

        let settlement = settle_in_full(&mut c).unwrap();
        assert_eq!(settlement.payment.entry, Entry::Payment(Money::from_int(300)));
        assert_eq!(settlement.payment.concept, "Pago total");
        assert_eq!(c.movements.len(), 3);
        assert!(c.balance().is_zero());
        assert!(c.summary().is_paid_off);
    }

    #[test]
    fn test_paid_off_is_exact() {
        let c = customer(vec![
            Movement::charge("x", Money::from_int(1), vec![]),
            Movement::payment("y", Money::new(dec!(0.9999999))),
        ]);
        assert_eq!(c.balance(), Money::new(dec!(0.0000001)));
        assert!(!c.summary().is_paid_off);
    }

    #[test]
    fn test_empty_tab_is_paid_off() {
        let summary = LedgerSummary::of(&[]);
        assert!(summary.is_paid_off);
        assert!(!summary.is_partially_paid);
    }

    #[test]
    fn test_record_payment_rules() {
        let mut c = customer(vec![Movement::charge("x", Money::from_int(300), vec![])]);

        assert!(matches!(
            record_payment(&mut c, Money::zero(), None),
            Err(CoreError::PaymentNotPositive)
        ));
        match record_payment(&mut c, Money::from_int(350), None) {
            Err(CoreError::PaymentExceedsBalance { balance }) => {
                assert_eq!(balance, Money::from_int(300))
            }
            other => panic!("expected PaymentExceedsBalance, got {:?}", other),
        }
        assert_eq!(c.movements.len(), 1);

        let m = record_payment(&mut c, Money::from_int(300), Some("  ")).unwrap();
        assert_eq!(m.concept, "Abono");
        assert!(c.balance().is_zero());
    }

    #[test]
    fn test_settle_nothing_owed() {
        let mut c = customer(vec![
            Movement::charge("x", Money::from_int(100), vec![]),
            Movement::payment("y", Money::from_int(100)),
        ]);
        assert!(settle_in_full(&mut c).is_none());
        assert_eq!(c.movements.len(), 2);
    }

    #[test]
    fn test_settlement_merges_stock_out_lines() {
        let mut c = customer(vec![
            Movement::charge("a", Money::from_int(300), vec![snapshot(1, 100, 2), snapshot(2, 50, 2)]),
            Movement::charge("b", Money::from_int(100), vec![snapshot(1, 100, 1)]),
        ]);
        let settlement = settle_in_full(&mut c).unwrap();

        assert_eq!(
            settlement.stock_out,
            vec![
                SaleLine { product_id: RecordId::Number(1), quantity: 3 },
                SaleLine { product_id: RecordId::Number(2), quantity: 2 },
            ]
        );
        assert_eq!(settlement.payment.entry, Entry::Payment(Money::from_int(400)));
    }

    #[test]
    fn test_reset_debt() {
        let mut c = customer(vec![Movement::charge("x", Money::from_int(100), vec![snapshot(1, 100, 1)])]);
        reset_debt(&mut c);
        assert!(c.movements.is_empty());
        assert!(c.balance().is_zero());
    }

    #[test]
    fn test_consolidation_draft() {
        let movements = vec![
            Movement::charge("primera", Money::from_int(200), vec![snapshot(1, 100, 2)]),
            Movement::payment("Abono", Money::from_int(50)),
            Movement::charge("segunda", Money::from_int(170), vec![snapshot(2, 50, 1), snapshot(1, 120, 1)]),
        ];
        let draft = consolidation_draft(&movements);

        assert_eq!(draft.concept.as_deref(), Some("segunda"));
        assert_eq!(draft.lines.len(), 2);
        assert_eq!(draft.lines[0].id, RecordId::Number(1));
        assert_eq!(draft.lines[0].quantity, 3);
        assert_eq!(draft.lines[0].price, Money::from_int(120));
        assert_eq!(draft.total, Money::from_int(410));
    }

    #[test]
    fn test_consolidate_keeps_plain_movements() {
        let mut c = customer(vec![
            Movement::charge("a", Money::from_int(300), vec![snapshot(1, 150, 2)]),
            Movement::payment("Abono", Money::from_int(100)),
            Movement::charge("b", Money::from_int(150), vec![snapshot(1, 150, 1)]),
        ]);
        let form = CustomerForm {
            name: "Maria Perez".to_string(),
            lines: vec![snapshot(1, 150, 3)],
            ..Default::default()
        };
        consolidate(&mut c, &form).unwrap();

        assert_eq!(c.name, "Maria Perez");
        assert_eq!(c.movements.len(), 2);
        assert_eq!(c.movements[0].entry, Entry::Payment(Money::from_int(100)));
        assert_eq!(c.movements[1].entry, Entry::Charge(Money::from_int(450)));
        assert_eq!(c.movements[1].concept, "Deuda acumulada");
        assert_eq!(c.balance(), Money::from_int(350));
    }

    #[test]
    fn test_consolidate_validation() {
        let mut c = customer(vec![]);
        let nameless = CustomerForm {
            amount: Some(Money::from_int(10)),
            ..Default::default()
        };
        assert!(matches!(consolidate(&mut c, &nameless), Err(CoreError::Validation(_))));

        let no_amount = CustomerForm {
            name: "Ana".to_string(),
            ..Default::default()
        };
        assert!(matches!(consolidate(&mut c, &no_amount), Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_open_account() {
        let form = CustomerForm {
            name: "Pedro".to_string(),
            currency: Currency::Usd,
            amount: Some(Money::from_int(25)),
            ..Default::default()
        };
        let c = open_account(&form).unwrap();

        assert_eq!(c.currency, Currency::Usd);
        assert_eq!(c.movements.len(), 1);
        assert_eq!(c.movements[0].concept, "Deuda inicial");
        assert_eq!(c.balance(), Money::from_int(25));
    }

    #[test]
    fn test_charge_lines_into_existing_tab() {
        let mut c = customer(vec![
            Movement::charge("pan", Money::from_int(200), vec![snapshot(1, 100, 2)]),
            Movement::payment("Abono", Money::from_int(50)),
        ]);
        charge_lines(&mut c, vec![snapshot(1, 100, 1), snapshot(3, 30, 2)], None).unwrap();

        assert_eq!(c.movements.len(), 2);
        let charge = &c.movements[1];
        assert_eq!(charge.concept, "pan");
        assert_eq!(charge.entry, Entry::Charge(Money::from_int(360)));
        assert_eq!(charge.products.len(), 2);
        assert!(matches!(
            charge_lines(&mut c, vec![], None),
            Err(CoreError::EmptyCart)
        ));
    }

    #[test]
    fn test_restart_with_lines() {
        let mut c = customer(vec![Movement::charge("x", Money::from_int(999), vec![])]);
        restart_with_lines(&mut c, vec![snapshot(1, 100, 2)], None).unwrap();
        assert_eq!(c.movements.len(), 1);
        assert_eq!(c.balance(), Money::from_int(200));
        assert_eq!(c.movements[0].concept, "Deuda inicial");
    }

    #[test]
    fn test_search_customers() {
        let mut ana = customer(vec![]);
        ana.name = "Ana Gomez".to_string();
        let customers = vec![customer(vec![]), ana];

        assert_eq!(search_customers(&customers, "  GOM ").len(), 1);
        assert_eq!(search_customers(&customers, "").len(), 2);
        assert!(search_customers(&customers, "zzz").is_empty());
    }
}
