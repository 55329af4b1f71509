//! Turns raw receipt line items into canonical (name, unit price, quantity) entries.
//!
//! Two quirks of the export are resolved here:
//! - Fuel appears under more than one spelling, these are merged into [FUEL_PRODUCT_NAME].
//! - Fuel receipts record a per-litre price on the line item, the amount
//!   actually paid is the basket total. Receipts from a [FUEL_STORE_FORMAT]
//!   store therefore use the basket total as the unit price. This assumes a
//!   fuel receipt holds a single priced item and overstates spend if it also
//!   holds other products.

use std::str::FromStr;

use rust_decimal::Decimal;
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::{
    Error,
    export::{LineItem, NumericText, Receipt},
};

/// The product name that all fuel spellings are merged into.
pub const FUEL_PRODUCT_NAME: &str = "Diesel";

/// The store format of petrol stations.
pub const FUEL_STORE_FORMAT: &str = "Petrol";

/// Raw product names that mean [FUEL_PRODUCT_NAME]. Matched exactly, padding included.
const FUEL_NAME_SYNONYMS: &[&str] = &["DIESEL  ", "DIESEL"];

const LOCAL_DATE_TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");

const LOCAL_DATE_TIME_SPACE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]");

/// A line item after name and price resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedLineItem {
    /// The product identity used to group purchases.
    pub name: String,
    /// The price attributed to one unit.
    pub unit_price: Decimal,
    /// The number of units bought.
    pub quantity: Decimal,
    /// When the receipt was issued.
    pub timestamp: OffsetDateTime,
    /// The local calendar date of `timestamp`.
    pub date: Date,
}

/// Resolve a raw product name to its canonical name.
///
/// Only known synonyms are replaced, any other name is returned unchanged
/// including leading or trailing whitespace.
pub fn canonical_name(raw_name: &str) -> &str {
    if FUEL_NAME_SYNONYMS.contains(&raw_name) {
        FUEL_PRODUCT_NAME
    } else {
        raw_name
    }
}

/// Parse a receipt timestamp.
///
/// Timestamps with an offset are parsed as RFC 3339, timestamps without an
/// offset are assumed to be in `local_offset`.
///
/// # Errors
/// Returns [Error::InvalidTimestamp] if `text` matches none of the formats.
pub fn parse_timestamp(text: &str, local_offset: UtcOffset) -> Result<OffsetDateTime, Error> {
    let text = text.trim();

    if let Ok(timestamp) = OffsetDateTime::parse(text, &Rfc3339) {
        return Ok(timestamp);
    }

    PrimitiveDateTime::parse(text, LOCAL_DATE_TIME_FORMAT)
        .or_else(|_| PrimitiveDateTime::parse(text, LOCAL_DATE_TIME_SPACE_FORMAT))
        .map(|date_time| date_time.assume_offset(local_offset))
        .map_err(|_| Error::InvalidTimestamp(text.to_owned()))
}

/// Coerce the numeric text of `field` into a decimal.
///
/// # Errors
/// Returns [Error::InvalidNumber] if the text is empty or not a number.
pub fn parse_decimal(field: &'static str, text: &NumericText) -> Result<Decimal, Error> {
    let trimmed = text.as_str().trim();

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| Error::InvalidNumber {
            field,
            value: text.to_string(),
        })
}

/// Normalize `item` from `receipt`, which was issued at `timestamp`.
///
/// `local_offset` decides which calendar date the purchase is shown under.
///
/// # Errors
/// Returns [Error::InvalidNumber] if the price, basket total, or quantity
/// used for this item is not a number.
pub fn normalize_line_item(
    item: &LineItem,
    receipt: &Receipt,
    timestamp: OffsetDateTime,
    local_offset: UtcOffset,
) -> Result<NormalizedLineItem, Error> {
    let unit_price = if receipt.store_format == FUEL_STORE_FORMAT {
        parse_decimal("basketValueGross", &receipt.basket_value_gross)?
    } else {
        parse_decimal("price", &item.price)?
    };

    let quantity = parse_decimal("quantity", &item.quantity)?;

    Ok(NormalizedLineItem {
        name: canonical_name(&item.name).to_owned(),
        unit_price,
        quantity,
        timestamp,
        date: timestamp.to_offset(local_offset).date(),
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use time::{
        UtcOffset,
        macros::{date, datetime, offset},
    };

    use crate::{
        Error,
        export::{LineItem, NumericText, Receipt},
        normalize::{
            FUEL_PRODUCT_NAME, canonical_name, normalize_line_item, parse_decimal,
            parse_timestamp,
        },
    };

    fn line_item(name: &str, price: &str, quantity: &str) -> LineItem {
        LineItem {
            name: name.to_owned(),
            price: NumericText::new(price),
            quantity: NumericText::new(quantity),
        }
    }

    fn receipt(store_format: &str, basket_value_gross: &str, product: Vec<LineItem>) -> Receipt {
        Receipt {
            time_stamp: "2024-03-10T09:15:00Z".to_owned(),
            store_format: store_format.to_owned(),
            basket_value_gross: NumericText::new(basket_value_gross),
            product,
        }
    }

    #[test]
    fn fuel_synonyms_become_diesel() {
        assert_eq!(canonical_name("DIESEL  "), FUEL_PRODUCT_NAME);
        assert_eq!(canonical_name("DIESEL"), FUEL_PRODUCT_NAME);
    }

    #[test]
    fn other_names_are_untouched() {
        assert_eq!(canonical_name("Milk"), "Milk");
        assert_eq!(canonical_name("  Milk "), "  Milk ");
        assert_eq!(canonical_name("diesel"), "diesel");
    }

    #[test]
    fn petrol_receipt_uses_basket_total() {
        let item = line_item("DIESEL  ", "1.459", "1");
        let receipt = receipt("Petrol", "50.00", vec![item.clone()]);
        let timestamp = datetime!(2024-03-10 09:15 UTC);

        let got = normalize_line_item(&item, &receipt, timestamp, UtcOffset::UTC).unwrap();

        assert_eq!(got.name, "Diesel");
        assert_eq!(got.unit_price, dec!(50.00));
        assert_eq!(got.quantity, dec!(1));
    }

    #[test]
    fn other_receipts_use_item_price() {
        let item = line_item("Milk", "1.20", "2");
        let receipt = receipt("Superstore", "99.99", vec![item.clone()]);
        let timestamp = datetime!(2024-03-10 09:15 UTC);

        let got = normalize_line_item(&item, &receipt, timestamp, UtcOffset::UTC).unwrap();

        assert_eq!(got.name, "Milk");
        assert_eq!(got.unit_price, dec!(1.20));
        assert_eq!(got.quantity, dec!(2));
        assert_eq!(got.timestamp, timestamp);
        assert_eq!(got.date, date!(2024 - 03 - 10));
    }

    #[test]
    fn date_uses_local_offset() {
        let item = line_item("Milk", "1.20", "1");
        let receipt = receipt("Express", "1.20", vec![item.clone()]);
        let timestamp = datetime!(2024-07-01 23:30 UTC);

        let got = normalize_line_item(&item, &receipt, timestamp, offset!(+1)).unwrap();

        assert_eq!(got.date, date!(2024 - 07 - 02));
    }

    #[test]
    fn non_numeric_price_is_an_error() {
        let item = line_item("Milk", "one pound", "1");
        let receipt = receipt("Superstore", "1.00", vec![item.clone()]);

        let result = normalize_line_item(
            &item,
            &receipt,
            datetime!(2024-03-10 09:15 UTC),
            UtcOffset::UTC,
        );

        assert_eq!(
            result,
            Err(Error::InvalidNumber {
                field: "price",
                value: "one pound".to_owned()
            })
        );
    }

    #[test]
    fn non_numeric_quantity_is_an_error() {
        let item = line_item("Milk", "1.00", "");
        let receipt = receipt("Superstore", "1.00", vec![item.clone()]);

        let result = normalize_line_item(
            &item,
            &receipt,
            datetime!(2024-03-10 09:15 UTC),
            UtcOffset::UTC,
        );

        assert!(matches!(
            result,
            Err(Error::InvalidNumber {
                field: "quantity",
                ..
            })
        ));
    }

    #[test]
    fn non_numeric_basket_total_is_an_error_for_fuel() {
        let item = line_item("DIESEL", "1.45", "1");
        let receipt = receipt("Petrol", "NaN", vec![item.clone()]);

        let result = normalize_line_item(
            &item,
            &receipt,
            datetime!(2024-03-10 09:15 UTC),
            UtcOffset::UTC,
        );

        assert!(matches!(
            result,
            Err(Error::InvalidNumber {
                field: "basketValueGross",
                ..
            })
        ));
    }

    #[test]
    fn parses_padded_and_scientific_numbers() {
        assert_eq!(
            parse_decimal("price", &NumericText::new(" 2.50 ")),
            Ok(dec!(2.50))
        );
        assert_eq!(
            parse_decimal("quantity", &NumericText::new("1e1")),
            Ok(dec!(10))
        );
    }

    #[test]
    fn parses_timestamps_with_offset() {
        assert_eq!(
            parse_timestamp("2024-03-10T09:15:00.000Z", UtcOffset::UTC),
            Ok(datetime!(2024-03-10 09:15 UTC))
        );
        assert_eq!(
            parse_timestamp("2024-03-10T09:15:00+01:00", UtcOffset::UTC),
            Ok(datetime!(2024-03-10 09:15 +1))
        );
    }

    #[test]
    fn parses_timestamps_without_offset_as_local() {
        assert_eq!(
            parse_timestamp("2024-07-10T09:15:00", offset!(+1)),
            Ok(datetime!(2024-07-10 09:15 +1))
        );
        assert_eq!(
            parse_timestamp("2024-07-10 09:15:00.5", UtcOffset::UTC),
            Ok(datetime!(2024-07-10 09:15:00.5 UTC))
        );
    }

    #[test]
    fn rejects_invalid_timestamps() {
        assert_eq!(
            parse_timestamp("last tuesday", UtcOffset::UTC),
            Err(Error::InvalidTimestamp("last tuesday".to_owned()))
        );
    }
}
