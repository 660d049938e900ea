//! The `aws_iam_policy_document` data source produced from a JSON policy

/// Terraform type of the generated data source
pub const DATA_SOURCE_TYPE: &str = "aws_iam_policy_document";

/// A Terraform data source wrapping the converted statements
#[derive(PartialEq, Debug, Clone)]
pub struct DataSource {
    /// The data source type, always [`DATA_SOURCE_TYPE`]
    pub data_type: &'static str,

    /// The resource name chosen by the caller (e.g. `data.aws_iam_policy_document.<name>`)
    pub name: String,

    /// Converted statements in the same order as the policy
    pub statements: Vec<DocumentStatement>,
}

impl DataSource {
    /// Create a new `aws_iam_policy_document` data source
    pub fn new<S: Into<String>>(name: S, statements: Vec<DocumentStatement>) -> Self {
        DataSource {
            data_type: DATA_SOURCE_TYPE,
            name: name.into(),
            statements,
        }
    }
}

/// A `statement` block. Empty sequences are left out when rendered.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct DocumentStatement {
    /// Statement id
    pub sid: Option<String>,

    /// "Allow" or "Deny"
    pub effect: Option<String>,

    /// `resources`
    pub resources: Vec<String>,

    /// `not_resources`
    pub not_resources: Vec<String>,

    /// `actions`
    pub actions: Vec<String>,

    /// `not_actions`
    pub not_actions: Vec<String>,

    /// One `condition` block per (test, variable) pair
    pub conditions: Vec<ConditionBlock>,

    /// `principals` blocks
    pub principals: Vec<PrincipalBlock>,

    /// `not_principals` blocks
    pub not_principals: Vec<PrincipalBlock>,
}

/// A `condition` block
#[derive(PartialEq, Debug, Clone)]
pub struct ConditionBlock {
    /// Condition operator, e.g. "StringEquals"
    pub test: String,

    /// Context key the operator is applied to, e.g. "aws:username"
    pub variable: String,

    /// Values the key is compared against
    pub values: Vec<String>,
}

/// A `principals` or `not_principals` block
#[derive(PartialEq, Debug, Clone)]
pub struct PrincipalBlock {
    /// Principal type, e.g. "AWS", "Service" or "*"
    pub principal_type: String,

    /// Principal identifiers
    pub identifiers: Vec<String>,
}
