//! Catalog search and page slicing.

use serde::{Deserialize, Serialize};

use crate::types::Product;

/// One page of results. `page` is 1-based and always within range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Case-insensitive name filter; a blank query keeps everything.
pub fn search_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    products
        .iter()
        .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
        .collect()
}

/// Slices `items` into pages of `per_page`.
///
/// There is always at least one page. Out-of-range page numbers are
/// clamped to the first or last page.
///
/// ## Example
/// ```rust
/// use bodega_core::catalog::paginate;
///
/// let items: Vec<u32> = (1..=20).collect();
/// let page = paginate(items, 3, 9);
/// assert_eq!(page.items, vec![19, 20]);
/// assert_eq!(page.total_pages, 3);
///
/// let clamped = paginate((1..=20).collect::<Vec<u32>>(), 7, 9);
/// assert_eq!(clamped.page, 3);
/// ```
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);

    let items = items
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    Page {
        items,
        page,
        per_page,
        total_pages,
        total_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{ProductDetails, RecordId};

    fn product(id: i64, name: &str) -> Product {
        Product {
            id: RecordId::Number(id),
            name: name.to_string(),
            price: Money::from_int(100),
            stock: 1,
            image: None,
            url_image: None,
            details: ProductDetails::default(),
        }
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let products = vec![product(1, "Harina PAN"), product(2, "Arroz"), product(3, "harina de trigo")];
        let found = search_products(&products, "HARINA");
        assert_eq!(found.len(), 2);
        assert_eq!(search_products(&products, "  ").len(), 3);
    }

    #[test]
    fn test_paginate_bounds() {
        let page = paginate((1..=12).collect::<Vec<_>>(), 2, 6);
        assert_eq!(page.items, vec![7, 8, 9, 10, 11, 12]);
        assert_eq!(page.total_pages, 2);

        let first = paginate((1..=12).collect::<Vec<_>>(), 0, 6);
        assert_eq!(first.page, 1);
        assert_eq!(first.items.len(), 6);
    }

    #[test]
    fn test_paginate_empty_has_one_page() {
        let page = paginate(Vec::<u32>::new(), 4, 9);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
    }
}
