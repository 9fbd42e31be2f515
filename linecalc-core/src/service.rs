//! Calculator contract shared by all six services: a pure request -> response
//! function plus the identity used in logs and ERROR envelopes. The server
//! crate owns the socket loop; implementations own no mutable state beyond
//! read access to the codec table.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::schema::MessageType;

pub trait Calculator: Send + Sync + 'static {
    /// Service identifier carried in the `source` field of ERROR envelopes.
    const ID: &'static str;
    /// Wire type inbound datagrams are validated against.
    const REQUEST_TYPE: MessageType;

    type Request: DeserializeOwned + Send;
    type Response: Serialize + Send;

    fn compute(&self, request: Self::Request) -> Result<Self::Response, CalcError>;
}

/// Failure inside a calculator task. Every variant is contained at the task
/// boundary and answered as an ERROR envelope; nothing propagates to the
/// service loop.
#[derive(Debug, thiserror::Error)]
pub enum CalcError {
    #[error("codec '{0}' not found")]
    UnknownCodec(String),
    #[error("trunk search exhausted at {max} trunks for {erlangs} Erlangs")]
    TrunkSearchExhausted { erlangs: f64, max: u32 },
    #[error("call bandwidth must be positive, got {0}")]
    NonPositiveCallBandwidth(f64),
    #[error("negative {0} in request")]
    NegativeInput(&'static str),
    #[error("bitstream contains a symbol other than '0' and '1'")]
    BadBitstream,
    #[error("loss model degenerate: recovery probability is zero")]
    DegenerateLossModel,
    #[error("bad payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Build the ERROR envelope sent back for any contained failure.
pub fn error_envelope(source: &str, error: &str) -> Value {
    serde_json::json!({ "source": source, "error": error })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ErrorMessage;
    use crate::schema::{validate, MessageType};

    #[test]
    fn error_envelope_matches_schema() {
        let msg = error_envelope("RT_CALCULATOR", "codec 'G.999' not found");
        validate(&msg, MessageType::Error).unwrap();
        let typed: ErrorMessage = serde_json::from_value(msg).unwrap();
        assert_eq!(typed.source, "RT_CALCULATOR");
        assert_eq!(typed.error, "codec 'G.999' not found");
    }
}
