//! Message schema registry: per-type field lists fixed at compile time, a
//! generic envelope builder, and structural validation of decoded payloads.
//!
//! Validation is presence-based only: it compares key sets and rejects null
//! or blank values. It never checks value types or semantics; a wrongly typed
//! field surfaces when the task deserializes the envelope into its struct.

use serde_json::{Map, Value};

/// Every wire message type and its exact field set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    RtRequest,
    RtResponse,
    ErlangRequest,
    ErlangResponse,
    BwRequest,
    BwResponse,
    CostRequest,
    CostResponse,
    PlrRequest,
    PlrResponse,
    ReportRequest,
    ReportResponse,
    Error,
}

impl MessageType {
    pub const ALL: &'static [MessageType] = &[
        MessageType::RtRequest,
        MessageType::RtResponse,
        MessageType::ErlangRequest,
        MessageType::ErlangResponse,
        MessageType::BwRequest,
        MessageType::BwResponse,
        MessageType::CostRequest,
        MessageType::CostResponse,
        MessageType::PlrRequest,
        MessageType::PlrResponse,
        MessageType::ReportRequest,
        MessageType::ReportResponse,
        MessageType::Error,
    ];

    /// Wire name, as used by clients and in the aggregate report request.
    pub fn name(self) -> &'static str {
        match self {
            MessageType::RtRequest => "RT_REQUEST",
            MessageType::RtResponse => "RT_RESPONSE",
            MessageType::ErlangRequest => "ERLANG_REQUEST",
            MessageType::ErlangResponse => "ERLANG_RESPONSE",
            MessageType::BwRequest => "BW_REQUEST",
            MessageType::BwResponse => "BW_RESPONSE",
            MessageType::CostRequest => "COST_REQUEST",
            MessageType::CostResponse => "COST_RESPONSE",
            MessageType::PlrRequest => "PLR_REQUEST",
            MessageType::PlrResponse => "PLR_RESPONSE",
            MessageType::ReportRequest => "REPORT_REQUEST",
            MessageType::ReportResponse => "REPORT_RESPONSE",
            MessageType::Error => "ERROR",
        }
    }

    pub fn from_name(name: &str) -> Option<MessageType> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }

    /// Required field names. An envelope of this type carries exactly these
    /// keys, no more and no fewer, once validated.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            MessageType::RtRequest => &["codec", "jitter", "netDelay"],
            MessageType::RtResponse => &["rt2jit", "rt1_5jit", "csi", "rphy", "rpac", "algD"],
            MessageType::ErlangRequest => {
                &["numLines", "numCalls", "avgDuration", "blockingPercentage"]
            }
            MessageType::ErlangResponse => &["Erlangs", "maxLines"],
            MessageType::BwRequest => &["codec", "pppoe", "vlan8021q", "reservedBW", "totalCalls"],
            MessageType::BwResponse => &["compressed", "uncompressed", "pps"],
            MessageType::CostRequest => &["callBW", "BWst", "Pmax"],
            MessageType::CostResponse => &["mbpsCost", "RTP", "cRTP"],
            MessageType::PlrRequest => &["bitstream"],
            MessageType::PlrResponse => &["p", "q", "pi1", "pi0", "E"],
            MessageType::ReportRequest => &[
                "email",
                "RT_REQUEST",
                "RT_RESPONSE",
                "ERLANG_REQUEST",
                "ERLANG_RESPONSE",
                "BW_REQUEST",
                "BW_RESPONSE",
                "COST_REQUEST",
                "COST_RESPONSE",
                "PLR_REQUEST",
                "PLR_RESPONSE",
            ],
            MessageType::ReportResponse => &["report"],
            MessageType::Error => &["source", "error"],
        }
    }
}

/// Structural schema failure (build or validate).
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("message is not a JSON object")]
    NotAMapping,
    #[error("unknown message type '{0}'")]
    UnknownMessageType(String),
    #[error("unknown field '{field}' for message '{message}'")]
    UnknownField {
        message: &'static str,
        field: String,
    },
    #[error("key mismatch for '{message}': missing {missing:?}, unexpected {unexpected:?}")]
    SchemaMismatch {
        message: &'static str,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
    #[error("empty value for required field '{0}'")]
    EmptyRequiredField(String),
}

/// Build an envelope of the named type: a null-valued template for the type,
/// overlaid with the given fields. Values are not type-checked; only field
/// names are enforced. The typed structs in `protocol` are the preferred
/// constructors; this generic path remains for the registry contract and the
/// aggregate report case.
pub fn build(type_name: &str, fields: &Map<String, Value>) -> Result<Value, SchemaError> {
    let ty = MessageType::from_name(type_name)
        .ok_or_else(|| SchemaError::UnknownMessageType(type_name.to_string()))?;
    let mut out = Map::with_capacity(ty.fields().len());
    for &field in ty.fields() {
        out.insert(field.to_string(), Value::Null);
    }
    for (key, value) in fields {
        if !out.contains_key(key) {
            return Err(SchemaError::UnknownField {
                message: ty.name(),
                field: key.clone(),
            });
        }
        out.insert(key.clone(), value.clone());
    }
    Ok(Value::Object(out))
}

/// Check that `value` is a JSON object whose key set equals the schema of
/// `expected`, with no null or all-whitespace values. Nested objects are
/// checked only as top-level keys; their own field sets are enforced when
/// the envelope is deserialized into its typed struct.
pub fn validate(value: &Value, expected: MessageType) -> Result<(), SchemaError> {
    let map = value.as_object().ok_or(SchemaError::NotAMapping)?;

    let missing: Vec<String> = expected
        .fields()
        .iter()
        .filter(|f| !map.contains_key(**f))
        .map(|f| f.to_string())
        .collect();
    let unexpected: Vec<String> = map
        .keys()
        .filter(|k| !expected.fields().contains(&k.as_str()))
        .cloned()
        .collect();
    if !missing.is_empty() || !unexpected.is_empty() {
        return Err(SchemaError::SchemaMismatch {
            message: expected.name(),
            missing,
            unexpected,
        });
    }

    for (key, value) in map {
        let empty = match value {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            _ => false,
        };
        if empty {
            return Err(SchemaError::EmptyRequiredField(key.clone()));
        }
    }
    Ok(())
}
