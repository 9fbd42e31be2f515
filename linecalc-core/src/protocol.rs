//! Wire messages: one serde struct per type. Field names match the wire; the
//! destination port selects the type, so no tag is carried in the payload.

use serde::{Deserialize, Serialize};

/// Mouth-to-ear delay request. Delays and jitter in ms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RtRequest {
    pub codec: String,
    pub jitter: f64,
    #[serde(rename = "netDelay")]
    pub net_delay: f64,
}

/// Mouth-to-ear delay response: totals at both jitter multipliers plus the
/// intermediate components, kept for report traceability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RtResponse {
    pub rt2jit: f64,
    pub rt1_5jit: f64,
    pub csi: f64,
    pub rphy: f64,
    pub rpac: f64,
    #[serde(rename = "algD")]
    pub alg_d: f64,
}

/// Trunk sizing request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErlangRequest {
    #[serde(rename = "numLines")]
    pub num_lines: f64,
    #[serde(rename = "numCalls")]
    pub num_calls: f64,
    /// Average call duration in seconds.
    #[serde(rename = "avgDuration")]
    pub avg_duration: f64,
    /// Target blocking probability in (0, 1).
    #[serde(rename = "blockingPercentage")]
    pub blocking_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErlangResponse {
    #[serde(rename = "Erlangs")]
    pub erlangs: f64,
    #[serde(rename = "maxLines")]
    pub max_lines: u32,
}

/// Bandwidth request: codec plus L2 encapsulation options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BwRequest {
    pub codec: String,
    pub pppoe: bool,
    #[serde(rename = "vlan8021q")]
    pub vlan_8021q: bool,
    /// Reserved-bandwidth fraction in (0, 1).
    #[serde(rename = "reservedBW")]
    pub reserved_bw: f64,
    #[serde(rename = "totalCalls")]
    pub total_calls: f64,
}

/// Per-profile bandwidth figures: packet length (bits), per-call bandwidth
/// (bps), aggregate bandwidth (Mbps).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BwProfile {
    #[serde(rename = "packetLength")]
    pub packet_length: f64,
    #[serde(rename = "callBW")]
    pub call_bw: f64,
    #[serde(rename = "BWst")]
    pub bw_st: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BwResponse {
    pub compressed: BwProfile,
    pub uncompressed: BwProfile,
    pub pps: f64,
}

/// A value per header profile, as nested in COST_REQUEST.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilePair {
    #[serde(rename = "RTP")]
    pub rtp: f64,
    #[serde(rename = "cRTP")]
    pub crtp: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostRequest {
    #[serde(rename = "callBW")]
    pub call_bw: ProfilePair,
    #[serde(rename = "BWst")]
    pub bw_st: ProfilePair,
    #[serde(rename = "Pmax")]
    pub pmax: f64,
}

/// Feasibility verdict for one header profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostVerdict {
    pub valid: bool,
    #[serde(rename = "possibleCalls")]
    pub possible_calls: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostResponse {
    #[serde(rename = "mbpsCost")]
    pub mbps_cost: f64,
    #[serde(rename = "RTP")]
    pub rtp: CostVerdict,
    #[serde(rename = "cRTP")]
    pub crtp: CostVerdict,
}

/// Loss-burst request: '0' = received, '1' = lost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlrRequest {
    pub bitstream: String,
}

/// Two-state Markov estimate: transition probabilities, stationary
/// probabilities, mean burst length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlrResponse {
    pub p: f64,
    pub q: f64,
    pub pi1: f64,
    pub pi0: f64,
    #[serde(rename = "E")]
    pub mean_burst: f64,
}

/// Aggregate report request: the five request/response pairs plus the
/// delivery destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    pub email: String,
    #[serde(rename = "RT_REQUEST")]
    pub rt_request: RtRequest,
    #[serde(rename = "RT_RESPONSE")]
    pub rt_response: RtResponse,
    #[serde(rename = "ERLANG_REQUEST")]
    pub erlang_request: ErlangRequest,
    #[serde(rename = "ERLANG_RESPONSE")]
    pub erlang_response: ErlangResponse,
    #[serde(rename = "BW_REQUEST")]
    pub bw_request: BwRequest,
    #[serde(rename = "BW_RESPONSE")]
    pub bw_response: BwResponse,
    #[serde(rename = "COST_REQUEST")]
    pub cost_request: CostRequest,
    #[serde(rename = "COST_RESPONSE")]
    pub cost_response: CostResponse,
    #[serde(rename = "PLR_REQUEST")]
    pub plr_request: PlrRequest,
    #[serde(rename = "PLR_RESPONSE")]
    pub plr_response: PlrResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResponse {
    pub report: String,
}

/// Sent back whenever validation or a calculator fails: the failing service
/// and a human-readable reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub source: String,
    pub error: String,
}
