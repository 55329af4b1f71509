//! The receipt export model and the function that loads it from disk.
//!
//! The export is a JSON document with two collections of buckets:
//! - `Purchase`: index 0 holds the in-store receipts. The other buckets hold
//!   archived or non-grocery receipts whose shape varies, so they are never
//!   deserialized.
//! - `Order`: online order summaries without product details, unused.
//!
//! Numeric fields are kept as text until [crate::normalize] coerces them so
//! that a single malformed line item does not fail the whole export.

use std::{fmt, fs, path::Path};

use serde::Deserialize;

use crate::Error;

/// A number as it appears in the export, either quoted text or a JSON number.
///
/// Any other JSON value (null, a boolean, an object) is kept as its JSON text
/// so that coercion into a decimal fails for that line item alone, see
/// [NumericText::as_str].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawNumber")]
pub struct NumericText(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Text(String),
    Number(serde_json::Number),
    Other(serde_json::Value),
}

impl From<RawNumber> for NumericText {
    fn from(value: RawNumber) -> Self {
        match value {
            RawNumber::Text(text) => Self(text),
            RawNumber::Number(number) => Self(number.to_string()),
            RawNumber::Other(value) => Self(value.to_string()),
        }
    }
}

impl NumericText {
    /// Create numeric text from a string.
    pub fn new(text: &str) -> Self {
        Self(text.to_owned())
    }

    /// The raw text of the number.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NumericText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One point-of-sale transaction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// When the purchase happened, e.g. "2023-05-01T12:30:00Z".
    pub time_stamp: String,
    /// The kind of store, e.g. "Superstore" or "Petrol".
    #[serde(default)]
    pub store_format: String,
    /// The gross total of the whole basket.
    #[serde(default)]
    pub basket_value_gross: NumericText,
    /// The products bought in this transaction.
    #[serde(default)]
    pub product: Vec<LineItem>,
}

/// One product entry on a receipt.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LineItem {
    /// The product name as printed on the receipt, possibly padded with spaces.
    pub name: String,
    /// The price of one unit.
    #[serde(default)]
    pub price: NumericText,
    /// How many units were bought, may be fractional for weighed goods.
    #[serde(default)]
    pub quantity: NumericText,
}

#[derive(Deserialize)]
struct RawExport {
    #[serde(rename = "Purchase", default)]
    purchase: Vec<serde_json::Value>,
    #[serde(rename = "Order", default)]
    order: Vec<serde_json::Value>,
}

/// The parts of a receipt export used to build the summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Export {
    /// The in-store receipts in the order they appear in the export.
    pub in_store_receipts: Vec<Receipt>,
    /// The number of `Purchase` buckets, including the in-store bucket.
    pub purchase_buckets: usize,
    /// The number of `Order` buckets.
    pub order_buckets: usize,
}

/// Read and parse the export at `path`.
///
/// # Errors
/// Returns [Error::ReadExport] if the file cannot be read and
/// [Error::InvalidExport] if it is not a valid export.
pub fn load_export(path: &Path) -> Result<Export, Error> {
    let text = fs::read_to_string(path)
        .map_err(|error| Error::ReadExport(path.display().to_string(), error.to_string()))?;

    parse_export(&text)
}

/// Parse the JSON text of an export.
///
/// # Errors
/// Returns [Error::InvalidExport] if the text is not JSON, or if the in-store
/// bucket does not contain receipts.
pub fn parse_export(text: &str) -> Result<Export, Error> {
    let raw: RawExport =
        serde_json::from_str(text).map_err(|error| Error::InvalidExport(error.to_string()))?;

    let purchase_buckets = raw.purchase.len();
    let order_buckets = raw.order.len();

    let in_store_receipts = match raw.purchase.into_iter().next() {
        Some(bucket) => serde_json::from_value::<Vec<Receipt>>(bucket).map_err(|error| {
            Error::InvalidExport(format!("the in-store receipts are malformed: {error}"))
        })?,
        None => Vec::new(),
    };

    tracing::debug!(
        "Parsed export with {} purchase buckets and {} order buckets",
        purchase_buckets,
        order_buckets
    );

    Ok(Export {
        in_store_receipts,
        purchase_buckets,
        order_buckets,
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::{
        Error,
        export::{LineItem, NumericText, load_export, parse_export},
    };

    #[test]
    fn parses_in_store_receipts() {
        let text = r#"{
            "Customer Profile And Contact Data": {"name": "someone"},
            "Purchase": [
                [
                    {
                        "timeStamp": "2023-05-01T12:30:00Z",
                        "storeFormat": "Superstore",
                        "basketValueGross": "3.20",
                        "product": [
                            {"name": "Milk", "price": "1.00", "quantity": "2", "weight": "0"},
                            {"name": "Bread", "price": 1.2, "quantity": 1}
                        ]
                    }
                ],
                [{"something": "else"}],
                []
            ],
            "Order": [[{"orderTotal": 42}], []]
        }"#;

        let export = parse_export(text).unwrap();

        assert_eq!(export.purchase_buckets, 3);
        assert_eq!(export.order_buckets, 2);
        assert_eq!(export.in_store_receipts.len(), 1);

        let receipt = &export.in_store_receipts[0];
        assert_eq!(receipt.time_stamp, "2023-05-01T12:30:00Z");
        assert_eq!(receipt.store_format, "Superstore");
        assert_eq!(receipt.basket_value_gross, NumericText::new("3.20"));
        assert_eq!(
            receipt.product,
            vec![
                LineItem {
                    name: "Milk".to_owned(),
                    price: NumericText::new("1.00"),
                    quantity: NumericText::new("2"),
                },
                LineItem {
                    name: "Bread".to_owned(),
                    price: NumericText::new("1.2"),
                    quantity: NumericText::new("1"),
                },
            ]
        );
    }

    #[test]
    fn keeps_padded_names() {
        let text = r#"{"Purchase": [[{
            "timeStamp": "2023-05-01T12:30:00Z",
            "storeFormat": "Petrol",
            "basketValueGross": "50.00",
            "product": [{"name": "DIESEL  ", "price": "1.50", "quantity": "1"}]
        }]]}"#;

        let export = parse_export(text).unwrap();

        assert_eq!(export.in_store_receipts[0].product[0].name, "DIESEL  ");
    }

    #[test]
    fn keeps_non_numeric_json_values_as_text() {
        let text = r#"{"Purchase": [[{
            "timeStamp": "2023-05-01T12:30:00Z",
            "storeFormat": "Superstore",
            "basketValueGross": {"amount": 1},
            "product": [
                {"name": "Milk", "price": "1.00", "quantity": "1"},
                {"name": "Bag", "price": null, "quantity": true}
            ]
        }]]}"#;

        let export = parse_export(text).unwrap();

        let receipt = &export.in_store_receipts[0];
        assert_eq!(receipt.basket_value_gross, NumericText::new(r#"{"amount":1}"#));
        assert_eq!(receipt.product[0].price, NumericText::new("1.00"));
        assert_eq!(receipt.product[1].price, NumericText::new("null"));
        assert_eq!(receipt.product[1].quantity, NumericText::new("true"));
    }

    #[test]
    fn missing_collections_yield_empty_export() {
        let export = parse_export("{}").unwrap();

        assert!(export.in_store_receipts.is_empty());
        assert_eq!(export.purchase_buckets, 0);
        assert_eq!(export.order_buckets, 0);
    }

    #[test]
    fn rejects_invalid_json() {
        let result = parse_export("{\"Purchase\": [");

        assert!(matches!(result, Err(Error::InvalidExport(_))));
    }

    #[test]
    fn rejects_malformed_in_store_bucket() {
        let result = parse_export(r#"{"Purchase": [[{"storeFormat": "Superstore"}]]}"#);

        assert!(matches!(result, Err(Error::InvalidExport(_))));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = load_export(Path::new("this/file/does/not/exist.json"));

        assert!(matches!(result, Err(Error::ReadExport(_, _))));
    }
}
