use crate::values::{JsonKind, PrincipalValue, StringOrSeq};
use crate::Result;
use log::debug;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Statement conditions, keyed by test (e.g. "StringEquals") and then by variable
/// (e.g. "aws:username"). Both levels iterate in lexicographic order.
pub type Conditions = BTreeMap<String, BTreeMap<String, StringOrSeq>>;

/// Statement contains information about a single permission as it appears in a JSON policy
#[derive(Deserialize, PartialEq, Debug, Clone, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Statement {
    /// An optional statement id. This is used to differentiate statements e.g. "AllowBucketRead"
    pub sid: Option<String>,

    /// "Allow" or "Deny". Passed through as-is.
    pub effect: Option<String>,

    /// The resources the statement applies to
    pub resource: StringOrSeq,

    /// The resources the statement does not apply to
    pub not_resource: StringOrSeq,

    /// One or more actions that apply to the resources
    pub action: StringOrSeq,

    /// Actions excluded from the statement
    pub not_action: StringOrSeq,

    /// Conditions under which the statement is in effect
    pub condition: Option<Conditions>,

    /// The principal the statement applies to
    pub principal: PrincipalValue,

    /// The principals the statement does not apply to
    pub not_principal: PrincipalValue,
}

// Top level policy document. Everything but the statements (Version, Id) is ignored.
#[derive(Deserialize, Debug)]
struct PolicyDocument {
    #[serde(rename = "Statement", deserialize_with = "statement_or_seq")]
    statements: Vec<Statement>,
}

// AWS allows a policy with a single statement to drop the enclosing array
fn statement_or_seq<'de, D>(deserializer: D) -> std::result::Result<Vec<Statement>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                Statement::deserialize(item)
                    .map_err(|e| de::Error::custom(format_args!("statement {}: {}", i, e)))
            })
            .collect(),
        obj @ Value::Object(_) => Statement::deserialize(obj)
            .map(|s| vec![s])
            .map_err(|e| de::Error::custom(format_args!("statement 0: {}", e))),
        other => Err(de::Error::custom(format_args!(
            "invalid type: {}, expected a statement object or an array of statement objects",
            JsonKind::of(&other)
        ))),
    }
}

/// Decode the statements of a JSON policy document
pub fn decode(bytes: &[u8]) -> Result<Vec<Statement>> {
    let document: PolicyDocument = serde_json::from_slice(bytes)?;
    debug!("decoded policy document with {} statement(s)", document.statements.len());
    Ok(document.statements)
}

/// Decode the statements of a JSON policy document that is already in memory as text
pub fn decode_str(s: &str) -> Result<Vec<Statement>> {
    decode(s.as_bytes())
}
