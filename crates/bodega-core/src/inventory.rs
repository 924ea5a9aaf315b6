//! # Inventory & Profit
//!
//! Stock/profit bookkeeping per product, the dashboard totals, withdrawal
//! checks, and the purchase-batch product form.
//!
//! ## Sale Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sell q units                                                           │
//! │                                                                         │
//! │    stock'        = max(0, stock - q)                                    │
//! │    sold'         = sold + q                                             │
//! │    totalProfit'  = totalProfit + profitPerUnit × q                      │
//! │                                                                         │
//! │  {stock 10, sold 5, ppu 50, totalProfit 250}  - 3                       │
//! │     ──► {stock 7, sold 8, totalProfit 400}                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Purchase Batch
//! ```text
//!   packages × unitsPerPackage   ──► batch stock
//!   packageCost ÷ unitsPerPackage ──► unit cost (basePrice)
//!   packages × packageCost       ──► totalCost
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{
    lenient_decimal, Currency, NewProduct, NewWithdrawal, Product, ProductDetails, ProductId,
    Withdrawal,
};
use crate::validation::validate_product_name;

/// Decimal places kept on a computed unit cost.
pub const UNIT_COST_DECIMALS: u32 = 2;

// =============================================================================
// Sale
// =============================================================================

/// Units of one product leaving stock (checkout or settled tab).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl Product {
    /// Stored profit per unit, or `price - basePrice`.
    pub fn profit_per_unit(&self) -> Money {
        self.details
            .profit_per_unit
            .unwrap_or(self.price - self.details.base_price)
    }

    /// Stored total profit, or `profitPerUnit × sold`.
    pub fn accumulated_profit(&self) -> Money {
        self.details
            .total_profit
            .unwrap_or_else(|| self.profit_per_unit() * Decimal::from(self.details.sold))
    }

    /// `price × sold`.
    pub fn revenue(&self) -> Money {
        self.price * Decimal::from(self.details.sold)
    }

    /// Applies the sale rule for `quantity` units.
    pub fn apply_sale(&mut self, quantity: u32) {
        let profit = self.profit_per_unit().multiply_quantity(quantity);
        self.stock = self.stock.saturating_sub(u64::from(quantity));
        self.details.sold += u64::from(quantity);
        self.details.total_profit = Some(self.details.total_profit.unwrap_or_default() + profit);
    }

    /// Restocks by whole packages using the stored units-per-package.
    ///
    /// Stock and package count grow; `sold` and `totalProfit` are kept.
    /// `totalCost` is recomputed for the new package count when the
    /// package cost is known.
    pub fn add_packages(&mut self, packages: Decimal) -> CoreResult<()> {
        if packages <= Decimal::ZERO {
            return Err(ValidationError::MustBePositive {
                field: "packages".to_string(),
            }
            .into());
        }

        let units = self
            .details
            .unit_packages
            .filter(|u| *u > Decimal::ZERO)
            .ok_or_else(|| CoreError::MissingPackageSize(self.id.to_string()))?;

        let added = whole_units(packages * units, "packages")?;
        let total_packages = self.details.packages.unwrap_or_default() + packages;

        self.stock += added;
        self.details.packages = Some(total_packages);
        if let Some(cost) = self.details.package_cost {
            self.details.total_cost = Money::new(total_packages * cost);
        }
        Ok(())
    }
}

// =============================================================================
// Dashboard Totals
// =============================================================================

/// Totals shown on the dashboard cards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_stock: u64,
    pub units_sold: u64,
    pub revenue: Money,
    pub gross_profit: Money,
    pub withdrawn: Money,
    pub available_profit: Money,
}

impl InventorySummary {
    pub fn of(products: &[Product], withdrawals: &[Withdrawal]) -> Self {
        let gross_profit: Money = products.iter().map(Product::accumulated_profit).sum();
        let withdrawn: Money = withdrawals.iter().map(|w| w.amount).sum();

        InventorySummary {
            total_stock: products.iter().map(|p| p.stock).sum(),
            units_sold: products.iter().map(|p| p.details.sold).sum(),
            revenue: products.iter().map(Product::revenue).sum(),
            gross_profit,
            withdrawn,
            available_profit: gross_profit - withdrawn,
        }
    }
}

/// Checks a withdrawal against the available profit and dates it now.
///
/// ## When This Fails
/// ```text
/// available 400 ── withdraw 0     ──► WithdrawalNotPositive
///               ── withdraw -5    ──► WithdrawalNotPositive
///               ── withdraw 401   ──► WithdrawalExceedsAvailable { 400 }
///               ── withdraw 400   ──► Ok
/// ```
pub fn plan_withdrawal(amount: Money, available: Money) -> CoreResult<NewWithdrawal> {
    if !amount.is_positive() {
        return Err(CoreError::WithdrawalNotPositive);
    }
    if amount > available {
        return Err(CoreError::WithdrawalExceedsAvailable { available });
    }
    Ok(NewWithdrawal::now(amount))
}

// =============================================================================
// Product Form
// =============================================================================

/// A complete purchase batch; every figure positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackagePlan {
    pub packages: Decimal,
    pub units_per_package: Decimal,
    pub package_cost: Decimal,
}

impl PackagePlan {
    /// `None` unless all three figures are positive.
    pub fn new(packages: Decimal, units_per_package: Decimal, package_cost: Decimal) -> Option<Self> {
        let all_positive = [packages, units_per_package, package_cost]
            .iter()
            .all(|v| *v > Decimal::ZERO);
        all_positive.then_some(PackagePlan {
            packages,
            units_per_package,
            package_cost,
        })
    }

    pub fn unit_cost(&self) -> Money {
        Money::new(self.package_cost)
            .checked_div(self.units_per_package)
            .unwrap_or_default()
            .round_dp(UNIT_COST_DECIMALS)
    }

    pub fn batch_stock(&self) -> CoreResult<u64> {
        whole_units(self.packages * self.units_per_package, "stock")
    }

    pub fn total_cost(&self) -> Money {
        Money::new(self.packages * self.package_cost)
    }
}

/// Create/edit form. The price field is the final sale price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub name: String,

    /// Final price; zero or absent means "sell at cost".
    #[serde(default)]
    pub price: Option<Money>,

    /// Used only when no complete purchase batch is given.
    #[serde(default)]
    pub stock: Option<u64>,

    #[serde(default, deserialize_with = "lenient_decimal")]
    #[ts(type = "number | string | null")]
    pub packages: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient_decimal")]
    #[ts(type = "number | string | null")]
    pub unit_packages: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient_decimal")]
    #[ts(type = "number | string | null")]
    pub package_cost: Option<Decimal>,

    #[serde(default)]
    pub currency: Currency,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub url_image: Option<String>,
}

impl ProductForm {
    pub fn plan(&self) -> Option<PackagePlan> {
        PackagePlan::new(self.packages?, self.unit_packages?, self.package_cost?)
    }

    fn final_price(&self, unit_cost: Money) -> Money {
        self.price.filter(Money::is_positive).unwrap_or(unit_cost)
    }

    /// Builds a new catalog entry. Sales counters start at zero.
    pub fn build_new(&self) -> CoreResult<NewProduct> {
        validate_product_name(&self.name)?;

        let plan = self.plan();
        let unit_cost = plan.map(|p| p.unit_cost()).unwrap_or_default();
        let price = self.final_price(unit_cost);
        let stock = match plan {
            Some(p) => p.batch_stock()?,
            None => self.stock.unwrap_or(0),
        };

        Ok(NewProduct {
            name: self.name.trim().to_string(),
            price,
            stock,
            image: self.image.clone(),
            url_image: self.url_image.clone(),
            details: ProductDetails {
                packages: self.packages,
                unit_packages: self.unit_packages,
                package_cost: self.package_cost,
                base_price: unit_cost,
                profit_per_unit: Some(price - unit_cost),
                sold: 0,
                total_profit: Some(Money::zero()),
                total_cost: plan.map(|p| p.total_cost()).unwrap_or_default(),
                currency: self.currency,
            },
        })
    }

    /// Rewrites `product` from the form, keeping `sold` and `totalProfit`.
    ///
    /// Without a complete purchase batch the stored cost figures stay.
    pub fn apply_edit(&self, product: &mut Product) -> CoreResult<()> {
        validate_product_name(&self.name)?;

        let plan = self.plan();
        let unit_cost = plan
            .map(|p| p.unit_cost())
            .unwrap_or(product.details.base_price);
        let price = self.final_price(unit_cost);

        if let Some(p) = plan {
            product.stock = p.batch_stock()?;
            product.details.total_cost = p.total_cost();
        } else if let Some(stock) = self.stock {
            product.stock = stock;
        }

        product.name = self.name.trim().to_string();
        product.price = price;
        product.details.base_price = unit_cost;
        product.details.profit_per_unit = Some(price - unit_cost);
        product.details.currency = self.currency;
        product.details.packages = self.packages.or(product.details.packages);
        product.details.unit_packages = self.unit_packages.or(product.details.unit_packages);
        product.details.package_cost = self.package_cost.or(product.details.package_cost);
        if self.image.is_some() {
            product.image = self.image.clone();
        }
        if self.url_image.is_some() {
            product.url_image = self.url_image.clone();
        }
        Ok(())
    }
}

fn whole_units(value: Decimal, field: &str) -> CoreResult<u64> {
    value.trunc().to_u64().ok_or_else(|| {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a whole number of units".to_string(),
        }
        .into()
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordId;
    use rust_decimal_macros::dec;

    fn product(stock: u64, sold: u64, total_profit: Option<i64>) -> Product {
        Product {
            id: RecordId::Number(1),
            name: "Harina".to_string(),
            price: Money::from_int(150),
            stock,
            image: None,
            url_image: None,
            details: ProductDetails {
                base_price: Money::from_int(100),
                profit_per_unit: Some(Money::from_int(50)),
                sold,
                total_profit: total_profit.map(Money::from_int),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_sale_scenario() {
        let mut p = product(10, 5, Some(250));
        p.apply_sale(3);
        assert_eq!(p.stock, 7);
        assert_eq!(p.details.sold, 8);
        assert_eq!(p.details.total_profit, Some(Money::from_int(400)));
    }

    #[test]
    fn test_sale_clamps_stock_at_zero() {
        let mut p = product(2, 0, Some(0));
        p.apply_sale(5);
        assert_eq!(p.stock, 0);
        assert_eq!(p.details.sold, 5);
        assert_eq!(p.details.total_profit, Some(Money::from_int(250)));
    }

    #[test]
    fn test_profit_fallbacks() {
        let mut p = product(0, 4, None);
        p.details.profit_per_unit = None;
        assert_eq!(p.profit_per_unit(), Money::from_int(50));
        assert_eq!(p.accumulated_profit(), Money::from_int(200));
        assert_eq!(p.revenue(), Money::from_int(600));
    }

    #[test]
    fn test_inventory_summary() {
        let products = vec![product(10, 5, Some(250)), product(3, 2, None)];
        let withdrawals = vec![Withdrawal {
            id: RecordId::Number(1),
            amount: Money::from_int(120),
            date: String::new(),
        }];
        let summary = InventorySummary::of(&products, &withdrawals);

        assert_eq!(summary.total_stock, 13);
        assert_eq!(summary.units_sold, 7);
        assert_eq!(summary.gross_profit, Money::from_int(350));
        assert_eq!(summary.withdrawn, Money::from_int(120));
        assert_eq!(summary.available_profit, Money::from_int(230));
        assert_eq!(summary.revenue, Money::from_int(1050));
    }

    #[test]
    fn test_plan_withdrawal() {
        let available = Money::from_int(400);
        assert!(matches!(
            plan_withdrawal(Money::zero(), available),
            Err(CoreError::WithdrawalNotPositive)
        ));
        assert!(matches!(
            plan_withdrawal(Money::from_int(-5), available),
            Err(CoreError::WithdrawalNotPositive)
        ));
        assert!(matches!(
            plan_withdrawal(Money::from_int(401), available),
            Err(CoreError::WithdrawalExceedsAvailable { .. })
        ));
        let ok = plan_withdrawal(Money::from_int(400), available).unwrap();
        assert_eq!(ok.amount, Money::from_int(400));
        assert!(!ok.date.is_empty());
    }

    #[test]
    fn test_package_plan() {
        let plan = PackagePlan::new(dec!(2), dec!(12), dec!(20500)).unwrap();
        assert_eq!(plan.unit_cost(), Money::new(dec!(1708.33)));
        assert_eq!(plan.batch_stock().unwrap(), 24);
        assert_eq!(plan.total_cost(), Money::from_int(41000));
        assert!(PackagePlan::new(dec!(2), dec!(0), dec!(20500)).is_none());
    }

    #[test]
    fn test_build_new_product() {
        let form = ProductForm {
            name: " Harina PAN ".to_string(),
            price: Some(Money::from_int(2500)),
            packages: Some(dec!(2)),
            unit_packages: Some(dec!(12)),
            package_cost: Some(dec!(20500)),
            ..Default::default()
        };
        let new = form.build_new().unwrap();

        assert_eq!(new.name, "Harina PAN");
        assert_eq!(new.stock, 24);
        assert_eq!(new.price, Money::from_int(2500));
        assert_eq!(new.details.base_price, Money::new(dec!(1708.33)));
        assert_eq!(new.details.profit_per_unit, Some(Money::new(dec!(791.67))));
        assert_eq!(new.details.sold, 0);
        assert_eq!(new.details.total_profit, Some(Money::zero()));
    }

    #[test]
    fn test_build_new_without_price_sells_at_cost() {
        let form = ProductForm {
            name: "Arroz".to_string(),
            packages: Some(dec!(1)),
            unit_packages: Some(dec!(10)),
            package_cost: Some(dec!(1000)),
            ..Default::default()
        };
        let new = form.build_new().unwrap();
        assert_eq!(new.price, Money::from_int(100));
        assert_eq!(new.details.profit_per_unit, Some(Money::zero()));
    }

    #[test]
    fn test_build_new_requires_name() {
        let form = ProductForm::default();
        assert!(matches!(form.build_new(), Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_form_reads_grouped_strings() {
        let form: ProductForm = serde_json::from_value(serde_json::json!({
            "name": "Queso",
            "packages": "3",
            "unitPackages": "10",
            "packageCost": "20.500"
        }))
        .unwrap();
        assert_eq!(form.package_cost, Some(dec!(20500)));
        assert!(form.plan().is_some());
    }

    #[test]
    fn test_apply_edit_keeps_counters() {
        let mut p = product(10, 5, Some(250));
        let form = ProductForm {
            name: "Harina 1kg".to_string(),
            price: Some(Money::from_int(180)),
            ..Default::default()
        };
        form.apply_edit(&mut p).unwrap();

        assert_eq!(p.name, "Harina 1kg");
        assert_eq!(p.price, Money::from_int(180));
        assert_eq!(p.stock, 10);
        assert_eq!(p.details.base_price, Money::from_int(100));
        assert_eq!(p.details.profit_per_unit, Some(Money::from_int(80)));
        assert_eq!(p.details.sold, 5);
        assert_eq!(p.details.total_profit, Some(Money::from_int(250)));
    }

    #[test]
    fn test_add_packages() {
        let mut p = product(4, 5, Some(250));
        p.details.packages = Some(dec!(1));
        p.details.unit_packages = Some(dec!(12));
        p.details.package_cost = Some(dec!(1000));

        p.add_packages(dec!(2)).unwrap();
        assert_eq!(p.stock, 28);
        assert_eq!(p.details.packages, Some(dec!(3)));
        assert_eq!(p.details.total_cost, Money::from_int(3000));
        assert_eq!(p.details.sold, 5);

        let mut bare = product(4, 0, None);
        assert!(matches!(
            bare.add_packages(dec!(1)),
            Err(CoreError::MissingPackageSize(_))
        ));
    }
}
