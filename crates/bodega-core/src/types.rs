//! # Domain Types
//!
//! Core domain types used throughout Bodega POS. Field names follow the
//! JSON data store (`camelCase`, `typeMony`, signed `amount`) so records
//! round-trip through the store without a mapping layer.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Customer     │   │   Withdrawal    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (RecordId)  │   │  id (RecordId)  │   │  id (RecordId)  │       │
//! │  │  name, price    │   │  name           │   │  amount         │       │
//! │  │  stock          │   │  currency       │   │  date           │       │
//! │  │  details ───┐   │   │  movements ─┐   │   └─────────────────┘       │
//! │  └─────────────┼───┘   └─────────────┼───┘                             │
//! │                ▼                     ▼                                  │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ ProductDetails  │   │    Movement     │   │ ProductSnapshot │       │
//! │  │  basePrice      │   │  concept, date  │   │  id, name       │       │
//! │  │  profitPerUnit  │   │  entry ──────┐  │   │  price          │       │
//! │  │  sold           │   │  products ───┼──┼──►│  quantity       │       │
//! │  │  totalProfit    │   └──────────────┼──┘   └─────────────────┘       │
//! │  │  packages ...   │                  ▼                                 │
//! │  └─────────────────┘   Entry::Charge(Money) | Entry::Payment(Money)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;
use crate::numfmt::parse_grouped_input;

// =============================================================================
// Record Id
// =============================================================================

/// Identifier assigned by the data store.
///
/// The store hands out numeric ids for records it creates and keeps
/// whatever id a client posts (customers use UUID strings). Both forms
/// compare by their textual value, so `7` and `"7"` are the same record.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    /// Creates a fresh UUID v4 id (customers, movements).
    pub fn generate() -> Self {
        RecordId::Text(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl PartialEq for RecordId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RecordId::Number(a), RecordId::Number(b)) => a == b,
            (RecordId::Text(a), RecordId::Text(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl Eq for RecordId {}

impl Hash for RecordId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

/// Path segments arrive as text; all-digit ids become numbers.
impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(n) => RecordId::Number(n),
            Err(_) => RecordId::Text(s.to_string()),
        })
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Number(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

/// Alias used where the id always belongs to a product.
pub type ProductId = RecordId;

// =============================================================================
// Currency
// =============================================================================

/// Currency a product is priced in or a customer's tab is kept in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Colombian pesos.
    #[default]
    Cop,
    /// US dollars.
    Usd,
}

impl Currency {
    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Cop => "COP",
            Currency::Usd => "USD",
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// Cost and sales bookkeeping attached to a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    /// Packages bought in the last purchase batch.
    #[serde(default, deserialize_with = "lenient_decimal")]
    #[ts(type = "number | null")]
    pub packages: Option<Decimal>,

    /// Units inside one package.
    #[serde(default, deserialize_with = "lenient_decimal")]
    #[ts(type = "number | null")]
    pub unit_packages: Option<Decimal>,

    /// Cost of one package.
    #[serde(default, deserialize_with = "lenient_decimal")]
    #[ts(type = "number | null")]
    pub package_cost: Option<Decimal>,

    /// Unit cost.
    #[serde(default)]
    pub base_price: Money,

    /// Profit per unit; `price - basePrice` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_per_unit: Option<Money>,

    /// Cumulative units sold.
    #[serde(default, deserialize_with = "lenient_count")]
    pub sold: u64,

    /// Cumulative profit; derived from `sold` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_profit: Option<Money>,

    /// `packages × packageCost` of the last purchase batch.
    #[serde(default)]
    pub total_cost: Money,

    #[serde(default)]
    pub currency: Currency,
}

/// A product in the catalog, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,

    pub name: String,

    /// Sale price per unit.
    pub price: Money,

    /// Units on hand. Never negative after a sale.
    #[serde(default, deserialize_with = "lenient_count")]
    pub stock: u64,

    /// Display-only, carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Display-only, carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_image: Option<String>,

    #[serde(default)]
    pub details: ProductDetails,
}

/// A product before the store has assigned it an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub price: Money,
    pub stock: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_image: Option<String>,
    pub details: ProductDetails,
}

// =============================================================================
// Ledger
// =============================================================================

/// Frozen copy of a product line charged to a customer's tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    pub price: Money,
    pub quantity: u32,
}

impl ProductSnapshot {
    /// Snapshot of `product` at `quantity`.
    pub fn of(product: &Product, quantity: u32) -> Self {
        ProductSnapshot {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            quantity,
        }
    }

    /// `price × quantity`.
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

/// What a movement does to the balance.
///
/// Amounts are magnitudes; the sign only exists on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// Increases the debt.
    Charge(Money),
    /// Decreases the debt (abono).
    Payment(Money),
}

impl Entry {
    /// Signed store representation: charges positive, payments negative.
    pub fn signed(&self) -> Money {
        match self {
            Entry::Charge(m) => m.abs(),
            Entry::Payment(m) => -m.abs(),
        }
    }

    /// Reads a signed store amount.
    pub fn from_signed(amount: Money) -> Self {
        if amount.is_negative() {
            Entry::Payment(amount.abs())
        } else {
            Entry::Charge(amount)
        }
    }
}

/// A single ledger entry on a customer's tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "MovementRecord", into = "MovementRecord")]
pub struct Movement {
    pub id: String,
    /// Free-form date text; new movements use RFC 3339.
    pub date: String,
    pub concept: String,
    pub entry: Entry,
    pub products: Vec<ProductSnapshot>,
}

impl Movement {
    /// New charge stamped with a fresh id and the current time.
    pub fn charge(concept: impl Into<String>, amount: Money, products: Vec<ProductSnapshot>) -> Self {
        Movement::stamped(concept.into(), Entry::Charge(amount.abs()), products)
    }

    /// New payment stamped with a fresh id and the current time.
    pub fn payment(concept: impl Into<String>, amount: Money) -> Self {
        Movement::stamped(concept.into(), Entry::Payment(amount.abs()), Vec::new())
    }

    fn stamped(concept: String, entry: Entry, products: Vec<ProductSnapshot>) -> Self {
        Movement {
            id: Uuid::new_v4().to_string(),
            date: Utc::now().to_rfc3339(),
            concept,
            entry,
            products,
        }
    }

    /// Whether this movement carries product lines.
    pub fn has_products(&self) -> bool {
        !self.products.is_empty()
    }
}

/// Store shape of a movement (signed `amount`).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, rename = "Movement")]
#[serde(rename_all = "camelCase")]
pub struct MovementRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub concept: String,
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<ProductSnapshot>>,
}

impl From<MovementRecord> for Movement {
    fn from(record: MovementRecord) -> Self {
        Movement {
            id: record.id,
            date: record.date,
            concept: record.concept,
            entry: Entry::from_signed(record.amount),
            products: record.products.unwrap_or_default(),
        }
    }
}

impl From<Movement> for MovementRecord {
    fn from(movement: Movement) -> Self {
        MovementRecord {
            id: movement.id,
            date: movement.date,
            concept: movement.concept,
            amount: movement.entry.signed(),
            products: if movement.products.is_empty() {
                None
            } else {
                Some(movement.products)
            },
        }
    }
}

/// A customer with a credit tab ("fiado").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    pub id: RecordId,
    pub name: String,
    #[serde(rename = "typeMony", default)]
    pub currency: Currency,
    /// Insertion order is chronological order.
    #[serde(default)]
    #[ts(as = "Vec<MovementRecord>")]
    pub movements: Vec<Movement>,
}

// =============================================================================
// Withdrawal
// =============================================================================

/// Cash taken out of accumulated profit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Withdrawal {
    pub id: RecordId,
    pub amount: Money,
    #[serde(default)]
    pub date: String,
}

/// A withdrawal before the store has assigned it an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWithdrawal {
    pub amount: Money,
    pub date: String,
}

impl NewWithdrawal {
    /// Withdrawal of `amount` dated now.
    pub fn now(amount: Money) -> Self {
        NewWithdrawal {
            amount,
            date: Utc::now().to_rfc3339(),
        }
    }
}

// =============================================================================
// Serde helpers
// =============================================================================

/// Accepts a JSON number or a grouped string such as `"20.500"`.
///
/// Purchase-batch fields were typed as text in the forms, with `.` as the
/// thousands separator. Blank or unreadable text becomes `None`.
pub(crate) fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    // Text first: Decimal would also accept "20.500" and read it as 20.5.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(Decimal),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => parse_grouped_input(&s),
        None => None,
    })
}

/// Unit counts the forms may have stored as text or left negative.
///
/// Negative, blank or unreadable values count as 0; fractions are truncated.
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = lenient_decimal(deserializer)?.unwrap_or_default();
    Ok(value.trunc().max(Decimal::ZERO).to_u64().unwrap_or(u64::MAX))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_record_id_compares_across_forms() {
        assert_eq!(RecordId::Number(7), RecordId::Text("7".into()));
        assert_ne!(RecordId::Number(7), RecordId::Number(8));
        assert_eq!("12".parse::<RecordId>().unwrap(), RecordId::Number(12));
        assert_eq!(
            "abc-1".parse::<RecordId>().unwrap(),
            RecordId::Text("abc-1".into())
        );
    }

    #[test]
    fn test_product_reads_store_shape() {
        let product: Product = serde_json::from_value(json!({
            "id": 3,
            "name": "Harina PAN",
            "price": 4500,
            "stock": 24,
            "image": "",
            "details": {
                "packages": "2",
                "unitPackages": "12",
                "packageCost": "20.500",
                "basePrice": 1708.33,
                "profitPerUnit": 2791.67,
                "sold": 0,
                "totalProfit": 0,
                "totalCost": 41000,
                "currency": "COP"
            }
        }))
        .unwrap();

        assert_eq!(product.id, RecordId::Number(3));
        assert_eq!(product.details.package_cost, Some(dec!(20500)));
        assert_eq!(product.details.unit_packages, Some(dec!(12)));
        assert_eq!(product.details.currency, Currency::Cop);
    }

    #[test]
    fn test_product_without_details_defaults() {
        let product: Product = serde_json::from_value(json!({
            "id": "p1", "name": "Pan", "price": 10
        }))
        .unwrap();
        assert_eq!(product.stock, 0);
        assert_eq!(product.details.sold, 0);
        assert!(product.details.total_profit.is_none());
    }

    #[test]
    fn test_counts_read_leniently() {
        let products: Vec<Product> = serde_json::from_value(json!([
            { "id": 1, "name": "Pan", "price": 10, "stock": "12", "details": { "sold": "3" } },
            { "id": 2, "name": "Queso", "price": 10, "stock": -4, "details": { "sold": null } },
            { "id": 3, "name": "Leche", "price": 10, "stock": "abc", "details": { "sold": 2.7 } }
        ]))
        .unwrap();

        assert_eq!((products[0].stock, products[0].details.sold), (12, 3));
        assert_eq!((products[1].stock, products[1].details.sold), (0, 0));
        assert_eq!((products[2].stock, products[2].details.sold), (0, 2));
    }

    #[test]
    fn test_movement_sign_convention() {
        let record = json!({ "id": "m1", "date": "1/2/2025", "concept": "Abono", "amount": -200 });
        let movement: Movement = serde_json::from_value(record).unwrap();
        assert_eq!(movement.entry, Entry::Payment(Money::from_int(200)));

        let back = serde_json::to_value(&movement).unwrap();
        assert_eq!(back["amount"], json!(-200.0));
        assert!(back.get("products").is_none());
    }

    #[test]
    fn test_customer_reads_type_mony() {
        let customer: Customer = serde_json::from_value(json!({
            "id": "c-1",
            "name": "Maria",
            "typeMony": "USD",
            "movements": [{ "id": "m", "date": "", "concept": "Deuda inicial", "amount": 500 }]
        }))
        .unwrap();
        assert_eq!(customer.currency, Currency::Usd);
        assert_eq!(customer.movements[0].entry, Entry::Charge(Money::from_int(500)));
    }
}
