//! Defines the app level error type.

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The export file could not be read from disk.
    ///
    /// Callers should pass in the file path and the original error as a string.
    #[error("could not read the export file \"{0}\": {1}")]
    ReadExport(String, String),

    /// The export file was read but is not a valid receipt export.
    #[error("could not parse the export file: {0}")]
    InvalidExport(String),

    /// A price or quantity field did not contain a number.
    ///
    /// The line item that contained the field is skipped, the rest of the
    /// aggregation carries on.
    #[error("the {field} \"{value}\" is not a number")]
    InvalidNumber {
        /// The name of the field, e.g. "price".
        field: &'static str,
        /// The raw text of the field.
        value: String,
    },

    /// Adding a line item would take a product's totals beyond what a decimal can hold.
    ///
    /// The line item is skipped and the product's totals are left as they were.
    #[error("the spend on \"{0}\" is too large to add up")]
    Overflow(String),

    /// A receipt timestamp could not be parsed as a date-time.
    ///
    /// The whole receipt is skipped since none of its line items can be
    /// placed in the reporting window.
    #[error("could not parse the timestamp \"{0}\"")]
    InvalidTimestamp(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),
}
