//! The page that shows the purchase summary table.

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState,
    html::{
        CATEGORY_BADGE_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_NUMBER_CELL_STYLE, TABLE_ROW_STYLE, TABLE_STYLE, base,
    },
    ranking::DisplayRow,
    summary::Summary,
};

/// The state needed for the summary page.
#[derive(Debug, Clone)]
pub struct SummaryPageState {
    pub summary: Arc<Summary>,
}

impl FromRef<AppState> for SummaryPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            summary: state.summary.clone(),
        }
    }
}

/// Render the summary page.
pub async fn get_summary_page(State(state): State<SummaryPageState>) -> Response {
    summary_view(&state.summary).into_response()
}

fn summary_view(summary: &Summary) -> Markup {
    let table_row = |row: &DisplayRow| {
        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                th scope="row" class=(TABLE_CELL_STYLE) { (row.product) }

                td class=(TABLE_CELL_STYLE)
                {
                    span class=(CATEGORY_BADGE_STYLE) { (row.category) }
                }

                td class=(TABLE_NUMBER_CELL_STYLE) { (row.qty) }
                td class=(TABLE_NUMBER_CELL_STYLE) { (row.min_each) }
                td class=(TABLE_NUMBER_CELL_STYLE) { (row.avg_each) }
                td class=(TABLE_NUMBER_CELL_STYLE) { (row.max_each) }
                td class=(TABLE_NUMBER_CELL_STYLE) { (row.total) }

                td class=(TABLE_NUMBER_CELL_STYLE)
                {
                    @if let Some(date) = row.last_bought {
                        (date)
                    }
                }
            }
        )
    };

    let content = html!(
        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 { "Purchases" }

            p
            {
                "Products bought since " (summary.since) " across "
                (summary.receipts_included) " receipts, highest spend first."
            }

            @if summary.entries_skipped > 0 {
                p id="skipped-entries"
                {
                    (summary.entries_skipped)
                    " receipt entries could not be read and were left out, see the server log for details."
                }
            }

            @if summary.rows.is_empty() {
                p id="no-purchases" { "No purchases in the last year." }
            } @else {
                table class=(TABLE_STYLE)
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Product" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_NUMBER_CELL_STYLE) { "Qty" }
                            th scope="col" class=(TABLE_NUMBER_CELL_STYLE) { "Min ea" }
                            th scope="col" class=(TABLE_NUMBER_CELL_STYLE) { "Avg ea" }
                            th scope="col" class=(TABLE_NUMBER_CELL_STYLE) { "Max ea" }
                            th scope="col" class=(TABLE_NUMBER_CELL_STYLE) { "Total spent" }
                            th scope="col" class=(TABLE_NUMBER_CELL_STYLE) { "Last bought" }
                        }
                    }

                    tbody
                    {
                        @for row in &summary.rows {
                            (table_row(row))
                        }
                    }
                }
            }
        }
    );

    base("Purchases", &content)
}
