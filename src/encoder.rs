use crate::document::{ConditionBlock, DataSource, DocumentStatement, PrincipalBlock};
use crate::{ConvertError, Result};
use hcl::expr::TemplateExpr;
use hcl::format::{Format, Formatter};
use hcl::{Attribute, Block, Body, Expression, Identifier};

/// Render a data source to configuration text
pub trait Encoder {
    /// Encode the data source. Any failure is reported as [`ConvertError::Encode`].
    fn encode(&self, data_source: &DataSource) -> Result<String>;
}

/// Encoder that renders Terraform HCL.
///
/// ```text
/// data "aws_iam_policy_document" "example" {
///   statement {
///     effect = "Allow"
///     resources = ["*"]
///     actions = ["s3:GetObject"]
///   }
/// }
/// ```
///
/// Absent attributes and empty lists are left out and nested blocks are separated by a blank
/// line.
#[derive(Debug, Clone, PartialEq)]
pub struct HclEncoder {
    indent: usize,
}

impl Default for HclEncoder {
    fn default() -> Self {
        HclEncoder { indent: 2 }
    }
}

impl HclEncoder {
    /// Create a new encoder indenting with two spaces per level
    pub fn new() -> Self {
        HclEncoder::default()
    }

    /// Create a new encoder indenting with `indent` spaces per level
    pub fn with_indent(indent: usize) -> Self {
        HclEncoder { indent }
    }
}

impl Encoder for HclEncoder {
    fn encode(&self, data_source: &DataSource) -> Result<String> {
        let name = Identifier::new(data_source.name.as_str()).map_err(|e| {
            ConvertError::Encode(format!(
                "'{}' is not a valid resource name: {}",
                data_source.name, e
            ))
        })?;

        let data = Block::builder("data")
            .add_label(data_source.data_type)
            .add_label(name.into_inner())
            .add_blocks(data_source.statements.iter().map(statement_block))
            .build();
        let body = Body::builder().add_block(data).build();

        let indent = " ".repeat(self.indent);
        let mut formatter = Formatter::builder()
            .indent(indent.as_bytes())
            .compact_arrays(true)
            .build_vec();
        body.format_string(&mut formatter)
            .map_err(|e| ConvertError::Encode(e.to_string()))
    }
}

fn statement_block(statement: &DocumentStatement) -> Block {
    let mut attrs = Vec::new();
    if let Some(ref sid) = statement.sid {
        attrs.push(Attribute::new("sid", template(sid)));
    }
    if let Some(ref effect) = statement.effect {
        attrs.push(Attribute::new("effect", template(effect)));
    }
    let lists = [
        ("resources", &statement.resources),
        ("not_resources", &statement.not_resources),
        ("actions", &statement.actions),
        ("not_actions", &statement.not_actions),
    ];
    for &(key, values) in lists.iter() {
        if !values.is_empty() {
            attrs.push(Attribute::new(key, list(values)));
        }
    }

    Block::builder("statement")
        .add_attributes(attrs)
        .add_blocks(statement.conditions.iter().map(condition_block))
        .add_blocks(principal_blocks("principals", &statement.principals))
        .add_blocks(principal_blocks("not_principals", &statement.not_principals))
        .build()
}

fn condition_block(condition: &ConditionBlock) -> Block {
    Block::builder("condition")
        .add_attribute(("test", template(&condition.test)))
        .add_attribute(("variable", template(&condition.variable)))
        .add_attribute(("values", list(&condition.values)))
        .build()
}

fn principal_blocks(name: &'static str, principals: &[PrincipalBlock]) -> Vec<Block> {
    principals
        .iter()
        .map(|p| {
            Block::builder(name)
                .add_attribute(("type", template(&p.principal_type)))
                .add_attribute(("identifiers", list(&p.identifiers)))
                .build()
        })
        .collect()
}

// Values are emitted as raw quoted templates so that `$$` produced by the transformer (and any
// unescaped `${` in principal identifiers) reaches the output unchanged. Everything else a
// quoted template treats specially is escaped here.
fn template(s: &str) -> Expression {
    Expression::from(TemplateExpr::QuotedString(literal(s)))
}

fn list(values: &[String]) -> Expression {
    Expression::Array(values.iter().map(|v| template(v)).collect())
}

fn literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '%' if chars.peek() == Some(&'{') => out.push_str("%%"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! vec_of_strings {
        ($($x:expr),*) => (vec![$($x.to_string()),*]);
    }

    #[test]
    fn test_literal() {
        let cases = vec![
            ("plain", "plain"),
            (r#"say "hi""#, r#"say \"hi\""#),
            (r"C:\dir", r"C:\\dir"),
            ("line\nbreak", r"line\nbreak"),
            ("bell\u{7}", r"bell\u0007"),
            ("%{if}", "%%{if}"),
            ("100%", "100%"),
            ("$${aws:username}", "$${aws:username}"),
        ];

        for (input, expected) in cases {
            assert_eq!(expected, literal(input), "input: {}", input);
        }
    }

    #[test]
    fn test_encode_empty() {
        let ds = DataSource::new("empty", Vec::new());
        let actual = HclEncoder::new().encode(&ds).unwrap();
        assert_eq!("data \"aws_iam_policy_document\" \"empty\" {}\n", actual);
    }

    #[test]
    fn test_encode_statement() {
        let ds = DataSource::new(
            "policy",
            vec![
                DocumentStatement {
                    sid: Some("Read".into()),
                    effect: Some("Allow".into()),
                    resources: vec_of_strings!["arn:aws:s3:::bucket", "arn:aws:s3:::bucket/*"],
                    actions: vec_of_strings!["s3:GetObject"],
                    conditions: vec![ConditionBlock {
                        test: "StringEquals".into(),
                        variable: "aws:username".into(),
                        values: vec_of_strings!["alice"],
                    }],
                    principals: vec![PrincipalBlock {
                        principal_type: "AWS".into(),
                        identifiers: vec_of_strings!["arn1"],
                    }],
                    ..DocumentStatement::default()
                },
                DocumentStatement {
                    effect: Some("Deny".into()),
                    not_actions: vec_of_strings!["iam:*"],
                    ..DocumentStatement::default()
                },
            ],
        );

        let expected = [
            r#"data "aws_iam_policy_document" "policy" {"#,
            r#"  statement {"#,
            r#"    sid = "Read""#,
            r#"    effect = "Allow""#,
            r#"    resources = ["arn:aws:s3:::bucket", "arn:aws:s3:::bucket/*"]"#,
            r#"    actions = ["s3:GetObject"]"#,
            r#""#,
            r#"    condition {"#,
            r#"      test = "StringEquals""#,
            r#"      variable = "aws:username""#,
            r#"      values = ["alice"]"#,
            r#"    }"#,
            r#""#,
            r#"    principals {"#,
            r#"      type = "AWS""#,
            r#"      identifiers = ["arn1"]"#,
            r#"    }"#,
            r#"  }"#,
            r#""#,
            r#"  statement {"#,
            r#"    effect = "Deny""#,
            r#"    not_actions = ["iam:*"]"#,
            r#"  }"#,
            r#"}"#,
            r#""#,
        ]
        .join("\n");

        let actual = HclEncoder::new().encode(&ds).unwrap();
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_encode_keeps_escaped_markers() {
        let ds = DataSource::new(
            "markers",
            vec![DocumentStatement {
                resources: vec_of_strings!["arn:aws:s3:::home/$${aws:username}/*"],
                principals: vec![PrincipalBlock {
                    principal_type: "*".into(),
                    identifiers: vec_of_strings!["arn:aws:iam::123:$root"],
                }],
                ..DocumentStatement::default()
            }],
        );

        let actual = HclEncoder::new().encode(&ds).unwrap();
        let resources = r#"resources = ["arn:aws:s3:::home/$${aws:username}/*"]"#;
        let identifiers = r#"identifiers = ["arn:aws:iam::123:$root"]"#;
        assert!(actual.contains(resources), "{}", actual);
        assert!(actual.contains(identifiers), "{}", actual);
    }

    #[test]
    fn test_encode_output_parses() {
        let ds = DataSource::new(
            "quoted",
            vec![DocumentStatement {
                sid: Some("tab\there".into()),
                resources: vec_of_strings![r#"a "quoted" \ value"#, "100%{x}", "$$100"],
                ..DocumentStatement::default()
            }],
        );

        let text = HclEncoder::new().encode(&ds).unwrap();
        let body = hcl::parse(&text).unwrap();
        assert_eq!(1, body.blocks().count());
    }

    #[test]
    fn test_encode_with_indent() {
        let ds = DataSource::new(
            "deny_all",
            vec![DocumentStatement {
                effect: Some("Deny".into()),
                not_actions: vec_of_strings!["iam:*"],
                ..DocumentStatement::default()
            }],
        );

        let expected = "data \"aws_iam_policy_document\" \"deny_all\" {\n    statement {\n        \
                        effect = \"Deny\"\n        not_actions = [\"iam:*\"]\n    }\n}\n";
        let actual = HclEncoder::with_indent(4).encode(&ds).unwrap();
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_encode_invalid_name() {
        for name in &["not valid", "", "2policy", "a\"b"] {
            let ds = DataSource::new(*name, Vec::new());
            match HclEncoder::new().encode(&ds) {
                Err(ConvertError::Encode(msg)) => {
                    assert!(msg.contains("not a valid resource name"), "msg: {}", msg)
                }
                other => panic!("unexpected result for {:?}: {:?}", name, other),
            }
        }

        let ds = DataSource::new("_read-only_2", Vec::new());
        assert!(HclEncoder::new().encode(&ds).is_ok());
    }
}
