//! # Cart State
//!
//! The sidebar cart: selected products, their quantities and the running
//! total.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Dashboard Action         Command                 Cart State Change     │
//! │  ────────────────         ───────                 ─────────────────     │
//! │                                                                         │
//! │  Click Product ──────────► add_to_cart() ───────► lines.push(qty 1)    │
//! │                                                   (ignored if present) │
//! │                                                                         │
//! │  Click + / − ────────────► increase/decrease ───► qty ± 1 (min 1)      │
//! │                                                                         │
//! │  Click Remove ───────────► remove_from_cart() ──► lines.remove(i)      │
//! │                                                                         │
//! │  Close Sidebar ──────────► close_cart() ────────► everything cleared   │
//! │                                                                         │
//! │  NOTE: All operations acquire the Mutex lock exclusively and release   │
//! │        it before any store request is made.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use bodega_core::{CoreError, CoreResult, Money, Product, ProductId, ProductSnapshot};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by product id (adding a present product is a no-op)
/// - Every quantity is at least 1
/// - `active_total` is false exactly when the sidebar is closed, and a
///   closed cart holds nothing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub lines: Vec<ProductSnapshot>,
    pub selected: Vec<ProductId>,
    pub active_total: bool,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product at quantity 1 and opens the sidebar.
    ///
    /// Returns `false` when the product was already in the cart.
    pub fn add(&mut self, product: &Product) -> bool {
        self.active_total = true;
        if self.contains(&product.id) {
            return false;
        }

        self.selected.push(product.id.clone());
        self.lines.push(ProductSnapshot::of(product, 1));
        true
    }

    pub fn increase(&mut self, id: &ProductId) -> CoreResult<()> {
        let line = self.line_mut(id)?;
        line.quantity = line.quantity.saturating_add(1);
        Ok(())
    }

    /// Lowers the quantity by one, never below 1.
    pub fn decrease(&mut self, id: &ProductId) -> CoreResult<()> {
        let line = self.line_mut(id)?;
        line.quantity = line.quantity.saturating_sub(1).max(1);
        Ok(())
    }

    pub fn remove(&mut self, id: &ProductId) -> CoreResult<()> {
        let before = self.lines.len();
        self.lines.retain(|l| &l.id != id);
        if self.lines.len() == before {
            return Err(CoreError::ProductNotInCart(id.to_string()));
        }
        self.selected.retain(|s| s != id);
        Ok(())
    }

    /// Drops the lines a checkout wrote. The sidebar closes once nothing
    /// is left.
    pub fn remove_sold(&mut self, sold: &[ProductId]) {
        self.lines.retain(|l| !sold.contains(&l.id));
        self.selected.retain(|s| !sold.contains(s));
        if self.lines.is_empty() {
            self.close();
        }
    }

    /// Closes the sidebar, which empties the cart.
    pub fn close(&mut self) {
        self.lines.clear();
        self.selected.clear();
        self.active_total = false;
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.lines.iter().any(|l| &l.id == id)
    }

    /// `Σ price × quantity`.
    pub fn total(&self) -> Money {
        self.lines.iter().map(ProductSnapshot::line_total).sum()
    }

    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line_mut(&mut self, id: &ProductId) -> CoreResult<&mut ProductSnapshot> {
        self.lines
            .iter_mut()
            .find(|l| &l.id == id)
            .ok_or_else(|| CoreError::ProductNotInCart(id.to_string()))
    }
}

/// Cart totals summary for API responses.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: u64,
    pub total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.lines.len(),
            total_quantity: cart.total_quantity(),
            total: cart.total(),
        }
    }
}

/// Shared cart state.
///
/// ## Thread Safety
/// Uses `Arc<Mutex<Cart>>`; every handler that touches the cart takes the
/// lock for a short synchronous section only.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = cart_state.with_cart(CartTotals::from);
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().unwrap_or_else(|p| p.into_inner());
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.increase(&id))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(|p| p.into_inner());
        f(&mut cart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bodega_core::{Currency, ProductDetails, RecordId};

    fn test_product(id: i64, price: i64) -> Product {
        Product {
            id: RecordId::from(id),
            name: format!("Product {}", id),
            price: Money::from_int(price),
            stock: 10,
            image: None,
            url_image: None,
            details: ProductDetails {
                currency: Currency::Cop,
                base_price: Money::from_int(price / 2),
                ..ProductDetails::default()
            },
        }
    }

    #[test]
    fn test_cart_add_item() {
        let mut cart = Cart::new();
        assert!(cart.add(&test_product(1, 3800)));

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 1);
        assert_eq!(cart.total(), Money::from_int(3800));
        assert!(cart.active_total);
        assert_eq!(cart.selected, vec![RecordId::from(1)]);
    }

    #[test]
    fn test_cart_add_same_product_is_ignored() {
        let mut cart = Cart::new();
        let product = test_product(1, 3800);

        cart.add(&product);
        cart.increase(&product.id).unwrap();
        assert!(!cart.add(&product));

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 2);
    }

    #[test]
    fn test_decrease_stops_at_one() {
        let mut cart = Cart::new();
        let product = test_product(1, 1000);
        cart.add(&product);

        cart.decrease(&product.id).unwrap();
        cart.decrease(&product.id).unwrap();

        assert_eq!(cart.lines[0].quantity, 1);
    }

    #[test]
    fn test_total_sums_lines() {
        let mut cart = Cart::new();
        let a = test_product(1, 1500);
        let b = test_product(2, 2000);
        cart.add(&a);
        cart.add(&b);
        cart.increase(&a.id).unwrap();
        cart.increase(&a.id).unwrap();

        assert_eq!(cart.total(), Money::from_int(6500));
        let totals = CartTotals::from(&cart);
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, 4);
    }

    #[test]
    fn test_unknown_line() {
        let mut cart = Cart::new();
        let missing = RecordId::from(9);

        assert!(matches!(
            cart.increase(&missing),
            Err(CoreError::ProductNotInCart(_))
        ));
        assert!(cart.remove(&missing).is_err());
    }

    #[test]
    fn test_remove_and_close() {
        let mut cart = Cart::new();
        let a = test_product(1, 1500);
        let b = test_product(2, 2000);
        cart.add(&a);
        cart.add(&b);

        cart.remove(&a.id).unwrap();
        assert_eq!(cart.selected, vec![b.id.clone()]);
        assert!(cart.active_total);

        cart.close();
        assert!(cart.is_empty());
        assert!(cart.selected.is_empty());
        assert!(!cart.active_total);
    }

    #[test]
    fn test_remove_sold_keeps_failed_lines() {
        let mut cart = Cart::new();
        cart.add(&test_product(1, 1500));
        cart.add(&test_product(2, 2000));

        cart.remove_sold(&[RecordId::from(1)]);
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].id, RecordId::from(2));
        assert!(cart.active_total);

        cart.remove_sold(&[RecordId::from(2)]);
        assert!(cart.is_empty());
        assert!(!cart.active_total);
    }

    #[test]
    fn test_state_is_shared_between_clones() {
        let state = CartState::new();
        let other = state.clone();

        state.with_cart_mut(|c| c.add(&test_product(1, 1000)));

        assert_eq!(other.with_cart(|c| c.lines.len()), 1);
    }
}
