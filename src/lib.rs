#![deny(missing_docs)]
//! Convert AWS IAM policy documents (JSON) into Terraform `aws_iam_policy_document` data sources
//!
//! ```
//! let json = br#"{"Statement": {"Effect": "Allow", "Action": "s3:GetObject", "Resource": "*"}}"#;
//! let hcl = iam2tf::convert("read", json).unwrap();
//! assert!(hcl.starts_with(r#"data "aws_iam_policy_document" "read" {"#));
//! ```

mod converter;
mod document;
mod encoder;
mod error;
mod policy;
mod transform;
mod values;

pub use converter::{convert, Converter};
pub use document::{
    ConditionBlock, DataSource, DocumentStatement, PrincipalBlock, DATA_SOURCE_TYPE,
};
pub use encoder::{Encoder, HclEncoder};
pub use error::{ConvertError, Result};
pub use policy::{decode, decode_str, Conditions, Statement};
pub use transform::{
    convert_conditions, convert_principals, convert_statement, convert_string_or_seq, escape,
    transform,
};
pub use values::{JsonKind, PrincipalValue, StringOrSeq};
