//! Wire encoders for renamed combinations.

use std::collections::BTreeMap;

use crate::candidate::CandidateValue;
use crate::error::EncodeError;

/// Turns a field map into its wire bytes
pub trait Encoder {
    fn encode(&self, fields: &BTreeMap<String, CandidateValue>) -> Result<Vec<u8>, EncodeError>;
}

impl<F> Encoder for F
where
    F: Fn(&BTreeMap<String, CandidateValue>) -> Result<Vec<u8>, EncodeError>,
{
    fn encode(&self, fields: &BTreeMap<String, CandidateValue>) -> Result<Vec<u8>, EncodeError> {
        self(fields)
    }
}

/// JSON encoder backed by `serde_json`
///
/// Keys are emitted in sorted order. [`CandidateValue::Raw`] blobs are
/// embedded as nested JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonEncoder {
    pretty: bool,
}

impl JsonEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Encoder for JsonEncoder {
    fn encode(&self, fields: &BTreeMap<String, CandidateValue>) -> Result<Vec<u8>, EncodeError> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(fields)?
        } else {
            serde_json::to_vec(fields)?
        };
        Ok(bytes)
    }
}
