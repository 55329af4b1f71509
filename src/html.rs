use maud::{DOCTYPE, Markup, PreEscaped, html};

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

// Table styles
pub const TABLE_STYLE: &str = "summary-table";

pub const TABLE_HEADER_STYLE: &str = "summary-header";

pub const TABLE_ROW_STYLE: &str = "summary-row";

pub const TABLE_CELL_STYLE: &str = "cell";

pub const TABLE_NUMBER_CELL_STYLE: &str = "cell number";

// Category badge style
pub const CATEGORY_BADGE_STYLE: &str = "badge";

// Page container
pub const PAGE_CONTAINER_STYLE: &str = "page";

const STYLESHEET: &str = r#"
    body {
        margin: 0;
        font-family: system-ui, sans-serif;
        color: #111827;
        background: #f9fafb;
    }

    .page {
        max-width: 72rem;
        margin: 0 auto;
        padding: 2rem 1.5rem;
    }

    .summary-table {
        width: 100%;
        border-collapse: collapse;
        font-size: 0.875rem;
        background: white;
        box-shadow: 0 1px 3px rgb(0 0 0 / 0.1);
    }

    .summary-header {
        font-size: 0.75rem;
        text-transform: uppercase;
        background: #f3f4f6;
        color: #374151;
    }

    .summary-row {
        border-bottom: 1px solid #e5e7eb;
    }

    .cell {
        padding: 0.75rem 1rem;
        text-align: left;
    }

    .cell.number {
        text-align: right;
        white-space: nowrap;
    }

    .badge {
        display: inline-block;
        padding: 0.125rem 0.625rem;
        font-size: 0.75rem;
        font-weight: 600;
        color: #1e40af;
        background: #dbeafe;
        border-radius: 9999px;
    }

    .error {
        text-align: center;
        padding: 4rem 1rem;
    }

    .error h1 {
        font-size: 6rem;
        margin: 0;
        color: #2563eb;
    }
"#;

pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en-GB"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Receipt Summary" }
                style { (PreEscaped(STYLESHEET)) }
            }

            body
            {
                (content)
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    let content = html!(
        section class="error"
        {
            h1 { (header) }

            p { strong { (description) } }

            p { (fix) }

            a href="/" { "Back to the summary" }
        }
    );

    base(title, &content)
}

/// Format `amount` as pounds sterling, e.g. "£1,234.50" or "-£0.99".
///
/// The amount is rounded to the nearest penny, halves away from zero.
pub fn format_currency(amount: Decimal) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("£")
            .expect("£ is a valid currency prefix")
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-£")
            .expect("-£ is a valid currency prefix")
            .precision(Precision::Decimals(2))
    });

    let pennies = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    if pennies.is_zero() {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        return "£0.00".to_owned();
    }

    let number = pennies.abs().to_f64().unwrap_or_default();

    let formatted_string = if pennies.is_sign_negative() {
        negative_fmt.fmt_string(number)
    } else {
        positive_fmt.fmt_string(number)
    };

    pad_pennies(formatted_string)
}

/// numfmt drops trailing zeros after the decimal point, e.g. "£12.30" is
/// rendered as "£12.3" and "£5.00" as "£5".
fn pad_pennies(mut formatted_string: String) -> String {
    match formatted_string.rfind('.') {
        None => formatted_string.push_str(".00"),
        Some(point) if formatted_string.len() - point == 2 => formatted_string.push('0'),
        Some(_) => {}
    }

    formatted_string
}
