use crate::values::JsonKind;
use failure::Fail;

/// Error type for iam2tf
#[derive(Fail, Debug)]
pub enum ConvertError {
    /// The input was not valid JSON or did not have the shape of a policy document
    #[fail(display = "failed to decode policy document: {}", _0)]
    Decode(#[cause] serde_json::Error),

    /// A string-or-array field held a JSON type that cannot be converted
    #[fail(display = "unsupported value for {}: found {}", field, found)]
    UnsupportedFieldShape {
        /// Path to the offending field (e.g. `Statement[0].Resource`)
        field: String,

        /// The JSON type that was observed
        found: JsonKind,
    },

    /// The encoder failed to render the data source
    #[fail(display = "failed to encode data source: {}", _0)]
    Encode(String),
}

impl From<serde_json::Error> for ConvertError {
    fn from(err: serde_json::Error) -> ConvertError {
        ConvertError::Decode(err)
    }
}

/// Result type for iam2tf
pub type Result<T> = std::result::Result<T, ConvertError>;
