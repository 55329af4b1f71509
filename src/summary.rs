//! Runs the whole pipeline once, from parsed export to ranked rows.

use time::{Date, OffsetDateTime, UtcOffset};

use crate::{
    aggregation::{aggregate_receipts, window_start},
    category::CategoryRules,
    export::Export,
    ranking::{DisplayRow, rank_products},
};

/// The immutable result served on every request.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// The products bought in the reporting window, highest spend first.
    pub rows: Vec<DisplayRow>,
    /// The local date of the start of the reporting window.
    pub since: Date,
    /// The number of receipts inside the reporting window.
    pub receipts_included: usize,
    /// The number of receipts and line items left out because they could not be read.
    pub entries_skipped: usize,
}

/// Build the summary of `export` for the year before `now`.
///
/// `now` is the single reference instant for the run, callers should read the
/// clock once and pass the same value everywhere.
pub fn build_summary(
    export: &Export,
    now: OffsetDateTime,
    local_offset: UtcOffset,
    rules: &CategoryRules,
) -> Summary {
    let aggregation = aggregate_receipts(&export.in_store_receipts, now, local_offset, rules);
    let rows = rank_products(&aggregation.products);

    tracing::info!(
        "Aggregated {} products from {} of {} receipts ({} receipts and {} line items skipped)",
        aggregation.products.len(),
        aggregation.receipts_included,
        export.in_store_receipts.len(),
        aggregation.receipts_skipped,
        aggregation.line_items_skipped
    );

    Summary {
        rows,
        since: window_start(now).to_offset(local_offset).date(),
        receipts_included: aggregation.receipts_included,
        entries_skipped: aggregation.receipts_skipped + aggregation.line_items_skipped,
    }
}
