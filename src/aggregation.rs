//! Folds receipts from the last year into per-product totals and purchase histories.

use std::collections::HashMap;

use rust_decimal::Decimal;
use time::{Date, Duration, OffsetDateTime, UtcOffset};

use crate::{
    Error,
    category::CategoryRules,
    export::Receipt,
    normalize::{NormalizedLineItem, normalize_line_item, parse_timestamp},
};

/// How far back from "now" receipts are included.
pub const REPORTING_WINDOW: Duration = Duration::days(365);

/// A single purchase of a product.
#[derive(Debug, Clone, PartialEq)]
pub struct Purchase {
    /// The number of units bought.
    pub quantity: Decimal,
    /// The price of one unit.
    pub price: Decimal,
    /// The local date of the receipt.
    pub date: Date,
}

/// The running totals for one product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductAccumulator {
    /// The sum of price × quantity over all purchases.
    pub total_spent: Decimal,
    /// The sum of quantities over all purchases.
    pub total_quantity: Decimal,
    /// The category guessed when the product was first seen.
    pub category: String,
    /// Every purchase, most recent first once aggregation completes.
    pub purchases: Vec<Purchase>,
}

impl ProductAccumulator {
    fn new(category: &str) -> Self {
        Self {
            total_spent: Decimal::ZERO,
            total_quantity: Decimal::ZERO,
            category: category.to_owned(),
            purchases: Vec::new(),
        }
    }

    /// Add `item` to the totals, or leave them untouched if either total would overflow.
    fn add(&mut self, item: &NormalizedLineItem) -> Result<(), Error> {
        let total_spent = item
            .unit_price
            .checked_mul(item.quantity)
            .and_then(|spent| self.total_spent.checked_add(spent))
            .ok_or_else(|| Error::Overflow(item.name.clone()))?;
        let total_quantity = self
            .total_quantity
            .checked_add(item.quantity)
            .ok_or_else(|| Error::Overflow(item.name.clone()))?;

        self.total_spent = total_spent;
        self.total_quantity = total_quantity;
        self.purchases.push(Purchase {
            quantity: item.quantity,
            price: item.unit_price,
            date: item.date,
        });

        Ok(())
    }
}

/// The outcome of one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    /// The accumulated purchases keyed by canonical product name.
    pub products: HashMap<String, ProductAccumulator>,
    /// The number of receipts inside the reporting window.
    pub receipts_included: usize,
    /// The number of receipts skipped because their timestamp was invalid.
    pub receipts_skipped: usize,
    /// The number of line items skipped because a numeric field was invalid
    /// or would overflow the product's totals.
    pub line_items_skipped: usize,
}

/// The earliest instant excluded from the report, receipts must be strictly after it.
pub fn window_start(now: OffsetDateTime) -> OffsetDateTime {
    now - REPORTING_WINDOW
}

/// Aggregate the line items of every receipt issued in the year before `now`.
///
/// Receipts and their line items are visited in order. A line item with a
/// non-numeric price or quantity, or one whose spend would overflow the
/// product's totals, is skipped with a warning, as is a receipt
/// with an unreadable timestamp. Each product's purchases are sorted most
/// recent first, purchases on the same date keep their receipt order.
///
/// `local_offset` decides the calendar date of each purchase and the offset
/// of timestamps that do not specify one. `rules` guesses the category of a
/// product the first time it is seen.
pub fn aggregate_receipts(
    receipts: &[Receipt],
    now: OffsetDateTime,
    local_offset: UtcOffset,
    rules: &CategoryRules,
) -> Aggregation {
    let start = window_start(now);
    let mut aggregation = Aggregation::default();

    for receipt in receipts {
        let timestamp = match parse_timestamp(&receipt.time_stamp, local_offset) {
            Ok(timestamp) => timestamp,
            Err(error) => {
                tracing::warn!("Skipping receipt: {error}");
                aggregation.receipts_skipped += 1;
                continue;
            }
        };

        if timestamp <= start {
            continue;
        }

        aggregation.receipts_included += 1;

        for item in &receipt.product {
            let normalized = match normalize_line_item(item, receipt, timestamp, local_offset) {
                Ok(normalized) => normalized,
                Err(error) => {
                    tracing::warn!(
                        "Skipping line item {:?} on receipt {}: {error}",
                        item.name,
                        receipt.time_stamp
                    );
                    aggregation.line_items_skipped += 1;
                    continue;
                }
            };

            let product = aggregation
                .products
                .entry(normalized.name.clone())
                .or_insert_with(|| ProductAccumulator::new(rules.guess(&normalized.name)));

            if let Err(error) = product.add(&normalized) {
                tracing::warn!(
                    "Skipping line item {:?} on receipt {}: {error}",
                    item.name,
                    receipt.time_stamp
                );
                aggregation.line_items_skipped += 1;

                if product.purchases.is_empty() {
                    aggregation.products.remove(&normalized.name);
                }
            }
        }
    }

    for product in aggregation.products.values_mut() {
        // `sort_by` is stable, so same-day purchases keep their order.
        product.purchases.sort_by(|a, b| b.date.cmp(&a.date));
    }

    aggregation
}
