//! Codec reference table: per-codec payload, rate and delay figures. Loaded
//! once at service start and read-only for the process lifetime; RT and BW
//! share the same instance.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

/// Reference figures for one codec. Delays in ms, payload in bytes.
#[derive(Debug, Clone, Deserialize)]
pub struct CodecEntry {
    /// Voice payload per packet.
    #[serde(rename = "payloadBytes")]
    pub payload_bytes: f64,
    /// Packets per second.
    pub pps: f64,
    /// One-way algorithmic (look-ahead) delay.
    #[serde(rename = "algorithmicDelay")]
    pub algorithmic_delay: f64,
    /// Call-setup/interaction delay (csi).
    #[serde(rename = "interactionDelay")]
    pub interaction_delay: f64,
    /// Total payload accumulation delay; packetization delay is this minus
    /// the interaction delay.
    #[serde(rename = "payloadDelay")]
    pub payload_delay: f64,
}

/// Immutable name -> codec mapping.
#[derive(Debug, Clone)]
pub struct CodecTable {
    entries: HashMap<String, CodecEntry>,
}

impl CodecTable {
    /// Parse a table from its JSON fixture text.
    pub fn from_json(text: &str) -> Result<CodecTable, CodecTableError> {
        let entries: HashMap<String, CodecEntry> = serde_json::from_str(text)?;
        if entries.is_empty() {
            return Err(CodecTableError::Empty);
        }
        Ok(CodecTable { entries })
    }

    /// Load a table from a JSON fixture file.
    pub fn load(path: &Path) -> Result<CodecTable, CodecTableError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Compiled-in defaults, used when no fixture file is configured.
    pub fn builtin() -> CodecTable {
        let mut entries = HashMap::new();
        entries.insert(
            "G.711".to_string(),
            CodecEntry {
                payload_bytes: 160.0,
                pps: 50.0,
                algorithmic_delay: 0.0,
                interaction_delay: 25.0,
                payload_delay: 45.0,
            },
        );
        entries.insert(
            "G.729".to_string(),
            CodecEntry {
                payload_bytes: 20.0,
                pps: 50.0,
                algorithmic_delay: 5.0,
                interaction_delay: 25.0,
                payload_delay: 45.0,
            },
        );
        entries.insert(
            "G.723.1".to_string(),
            CodecEntry {
                payload_bytes: 24.0,
                pps: 33.3,
                algorithmic_delay: 7.5,
                interaction_delay: 25.0,
                payload_delay: 55.0,
            },
        );
        CodecTable { entries }
    }

    pub fn get(&self, name: &str) -> Option<&CodecEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CodecTableError {
    #[error("read error: {0}")]
    Read(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("codec table is empty")]
    Empty,
}
