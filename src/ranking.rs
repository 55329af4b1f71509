//! Turns the per-product accumulators into the rows of the summary table.

use std::collections::HashMap;

use rust_decimal::Decimal;
use time::Date;

use crate::{
    aggregation::{ProductAccumulator, Purchase},
    html::format_currency,
};

/// One row of the summary table.
///
/// Product names are passed through as they appear in the export, escaping
/// is left to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    /// The canonical product name.
    pub product: String,
    /// The guessed category.
    pub category: String,
    /// The total number of units bought, without trailing zeros.
    pub qty: Decimal,
    /// The lowest unit price paid, formatted as currency.
    pub min_each: String,
    /// The mean unit price over all purchases, formatted as currency.
    pub avg_each: String,
    /// The highest unit price paid, formatted as currency.
    pub max_each: String,
    /// The total amount spent, formatted as currency.
    pub total: String,
    /// The date of the most recent purchase.
    pub last_bought: Option<Date>,
}

/// Unit price statistics over a purchase history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    /// The lowest price.
    pub min: Decimal,
    /// The mean price.
    pub avg: Decimal,
    /// The highest price.
    pub max: Decimal,
}

/// Compute the minimum, mean, and maximum unit price of `purchases`.
///
/// The mean is taken over the per-purchase prices and is not weighted by
/// quantity, so it generally differs from total spend ÷ total quantity.
/// An empty history gives zero for all three. Never panics on overflow.
pub fn price_range(purchases: &[Purchase]) -> PriceRange {
    let prices = purchases.iter().map(|purchase| purchase.price);

    let min = prices.clone().min().unwrap_or(Decimal::ZERO);
    let max = prices.clone().max().unwrap_or(Decimal::ZERO);
    let avg = if purchases.is_empty() {
        Decimal::ZERO
    } else {
        let count = Decimal::from(purchases.len());

        // Very large prices can overflow the sum, so fall back to dividing first.
        prices
            .clone()
            .try_fold(Decimal::ZERO, |sum, price| sum.checked_add(price))
            .map(|sum| sum / count)
            .unwrap_or_else(|| {
                prices.fold(Decimal::ZERO, |sum, price| sum.saturating_add(price / count))
            })
    };

    PriceRange { min, avg, max }
}

/// Rank products by total spend, highest first.
///
/// Products with equal spend are ordered by name. Products whose total
/// quantity is zero or negative are left out.
pub fn rank_products(products: &HashMap<String, ProductAccumulator>) -> Vec<DisplayRow> {
    let mut ranked: Vec<(&String, &ProductAccumulator)> = products
        .iter()
        .filter(|(_, product)| product.total_quantity > Decimal::ZERO)
        .collect();

    ranked.sort_by(|(a_name, a), (b_name, b)| {
        b.total_spent
            .cmp(&a.total_spent)
            .then_with(|| a_name.cmp(b_name))
    });

    ranked
        .into_iter()
        .map(|(name, product)| {
            let prices = price_range(&product.purchases);

            DisplayRow {
                product: name.clone(),
                category: product.category.clone(),
                qty: product.total_quantity.normalize(),
                min_each: format_currency(prices.min),
                avg_each: format_currency(prices.avg),
                max_each: format_currency(prices.max),
                total: format_currency(product.total_spent),
                last_bought: product.purchases.first().map(|purchase| purchase.date),
            }
        })
        .collect()
}
