use crate::document::DataSource;
use crate::encoder::{Encoder, HclEncoder};
use crate::policy::decode;
use crate::transform::transform;
use crate::Result;
use log::debug;

/// Converter turns JSON policy documents into `aws_iam_policy_document` data sources rendered by
/// the given encoder.
///
/// Each call works on its own decoded policy, a converter can be reused for any number of
/// documents.
pub struct Converter<E: Encoder> {
    encoder: E,
}

impl<E: Encoder> Converter<E> {
    /// Create a new converter with the given encoder
    pub fn new(encoder: E) -> Self {
        Converter { encoder }
    }

    /// Convert a JSON policy document into a data source named `name`.
    ///
    /// No output is produced if the document fails to decode, holds a field of an unsupported
    /// shape or cannot be encoded.
    pub fn convert(&self, name: &str, bytes: &[u8]) -> Result<String> {
        let statements = decode(bytes)?;
        let data_source = DataSource::new(name, transform(&statements)?);

        let text = self.encoder.encode(&data_source)?;
        debug!(
            "converted {} statement(s) into data source '{}' ({} bytes)",
            data_source.statements.len(),
            name,
            text.len()
        );
        Ok(text)
    }
}

impl Default for Converter<HclEncoder> {
    fn default() -> Self {
        Converter::new(HclEncoder::default())
    }
}

/// Convert a JSON policy document into Terraform HCL for a data source named `name`
pub fn convert(name: &str, bytes: &[u8]) -> Result<String> {
    Converter::default().convert(name, bytes)
}
