//! Conversion from decoded JSON statements to `aws_iam_policy_document` statements

use crate::document::{ConditionBlock, DocumentStatement, PrincipalBlock};
use crate::policy::{Conditions, Statement};
use crate::values::{JsonKind, PrincipalValue, StringOrSeq};
use crate::{ConvertError, Result};
use log::trace;

/// Escape a string for use inside an HCL string literal. A literal `$` is doubled so that
/// Terraform does not treat `${...}` as an interpolation sequence.
pub fn escape(s: &str) -> String {
    s.replace('$', "$$")
}

fn unsupported(field: &str, index: Option<usize>, found: JsonKind) -> ConvertError {
    let field = match index {
        Some(i) => format!("{}[{}]", field, i),
        None => field.to_owned(),
    };
    ConvertError::UnsupportedFieldShape { field, found }
}

// Flatten a union value into a sequence of strings, applying `f` to every string (booleans are
// rendered as "true"/"false" and never passed to `f`).
fn flatten<F>(field: &str, value: &StringOrSeq, f: F) -> Result<Vec<String>>
where
    F: Fn(&str) -> String,
{
    let strings = match value {
        StringOrSeq::Absent => Vec::new(),
        StringOrSeq::Scalar(s) => vec![f(s)],
        StringOrSeq::Flag(b) => vec![b.to_string()],
        StringOrSeq::List(items) => items.iter().map(|s| f(s)).collect(),
        StringOrSeq::Unsupported { index, found } => return Err(unsupported(field, *index, *found)),
    };
    Ok(strings)
}

/// Convert a string-or-array field into a sequence of escaped strings.
///
/// `field` is the path reported if the value has an unsupported shape.
pub fn convert_string_or_seq(field: &str, value: &StringOrSeq) -> Result<Vec<String>> {
    flatten(field, value, escape)
}

/// Flatten the two level condition map into one block per (test, variable) pair, ordered by
/// test and then variable.
pub fn convert_conditions(field: &str, conditions: &Conditions) -> Result<Vec<ConditionBlock>> {
    let mut blocks = Vec::new();
    for (test, variables) in conditions {
        for (variable, values) in variables {
            let path = format!("{}.{}.{}", field, test, variable);
            blocks.push(ConditionBlock {
                test: test.clone(),
                variable: variable.clone(),
                values: convert_string_or_seq(&path, values)?,
            });
        }
    }
    Ok(blocks)
}

/// Convert a `Principal` or `NotPrincipal` field into principal blocks ordered by type.
///
/// Identifiers are copied verbatim, they do not go through [`escape`].
pub fn convert_principals(field: &str, value: &PrincipalValue) -> Result<Vec<PrincipalBlock>> {
    match value {
        PrincipalValue::Absent => Ok(Vec::new()),
        PrincipalValue::Any(identifier) => Ok(vec![PrincipalBlock {
            principal_type: "*".to_owned(),
            identifiers: vec![identifier.clone()],
        }]),
        PrincipalValue::ByType(by_type) => {
            let mut blocks = Vec::with_capacity(by_type.len());
            for (principal_type, identifiers) in by_type {
                let path = format!("{}.{}", field, principal_type);
                blocks.push(PrincipalBlock {
                    principal_type: principal_type.clone(),
                    identifiers: flatten(&path, identifiers, str::to_owned)?,
                });
            }
            Ok(blocks)
        }
        PrincipalValue::Unsupported(found) => Err(unsupported(field, None, *found)),
    }
}

/// Convert the statement at position `index` of a policy
pub fn convert_statement(index: usize, statement: &Statement) -> Result<DocumentStatement> {
    let path = format!("Statement[{}]", index);
    let field = |name: &str| format!("{}.{}", path, name);

    let conditions = match statement.condition {
        Some(ref c) => convert_conditions(&field("Condition"), c)?,
        None => Vec::new(),
    };

    Ok(DocumentStatement {
        sid: statement.sid.clone(),
        effect: statement.effect.clone(),
        resources: convert_string_or_seq(&field("Resource"), &statement.resource)?,
        not_resources: convert_string_or_seq(&field("NotResource"), &statement.not_resource)?,
        actions: convert_string_or_seq(&field("Action"), &statement.action)?,
        not_actions: convert_string_or_seq(&field("NotAction"), &statement.not_action)?,
        conditions,
        principals: convert_principals(&field("Principal"), &statement.principal)?,
        not_principals: convert_principals(&field("NotPrincipal"), &statement.not_principal)?,
    })
}

/// Convert every statement of a policy, preserving order
pub fn transform(statements: &[Statement]) -> Result<Vec<DocumentStatement>> {
    statements
        .iter()
        .enumerate()
        .map(|(i, s)| {
            trace!("converting statement {} (sid: {:?})", i, s.sid);
            convert_statement(i, s)
        })
        .collect()
}
