//! Link bandwidth per call and aggregate, for the uncompressed RTP/UDP/IP
//! stack and the header-compressed (cRTP) profile, under optional PPPoE and
//! 802.1Q encapsulation.

use std::sync::Arc;

use crate::codecs::CodecTable;
use crate::protocol::{BwProfile, BwRequest, BwResponse};
use crate::schema::MessageType;
use crate::service::{CalcError, Calculator};

/// Header sizes in bits.
const ETHERNET_CRC_BITS: f64 = 144.0;
const IP_BITS: f64 = 160.0;
const UDP_BITS: f64 = 64.0;
const RTP_BITS: f64 = 96.0;
const COMPRESSED_IP_UDP_RTP_BITS: f64 = 32.0;
const PPPOE_BITS: f64 = 48.0;
const VLAN_8021Q_BITS: f64 = 32.0;

fn profile(
    header_bits: f64,
    payload_bits: f64,
    pps: f64,
    reserved_bw: f64,
    total_calls: f64,
) -> BwProfile {
    let packet_length = header_bits + payload_bits;
    let call_bw = packet_length * pps * (1.0 + reserved_bw);
    let bw_st = call_bw * total_calls * 1e-6;
    BwProfile {
        packet_length,
        call_bw,
        bw_st,
    }
}

pub struct BwCalculator {
    codecs: Arc<CodecTable>,
}

impl BwCalculator {
    pub fn new(codecs: Arc<CodecTable>) -> BwCalculator {
        BwCalculator { codecs }
    }
}

impl Calculator for BwCalculator {
    const ID: &'static str = "BW_CALCULATOR";
    const REQUEST_TYPE: MessageType = MessageType::BwRequest;

    type Request = BwRequest;
    type Response = BwResponse;

    fn compute(&self, request: BwRequest) -> Result<BwResponse, CalcError> {
        let codec = self
            .codecs
            .get(&request.codec)
            .ok_or_else(|| CalcError::UnknownCodec(request.codec.clone()))?;
        if request.reserved_bw < 0.0 {
            return Err(CalcError::NegativeInput("reservedBW"));
        }
        if request.total_calls < 0.0 {
            return Err(CalcError::NegativeInput("totalCalls"));
        }

        let mut option_bits = 0.0;
        if request.pppoe {
            option_bits += PPPOE_BITS;
        }
        if request.vlan_8021q {
            option_bits += VLAN_8021Q_BITS;
        }

        let payload_bits = codec.payload_bytes * 8.0;
        let full_header = ETHERNET_CRC_BITS + IP_BITS + UDP_BITS + RTP_BITS + option_bits;
        let compressed_header = ETHERNET_CRC_BITS + COMPRESSED_IP_UDP_RTP_BITS + option_bits;

        Ok(BwResponse {
            uncompressed: profile(
                full_header,
                payload_bits,
                codec.pps,
                request.reserved_bw,
                request.total_calls,
            ),
            compressed: profile(
                compressed_header,
                payload_bits,
                codec.pps,
                request.reserved_bw,
                request.total_calls,
            ),
            pps: codec.pps,
        })
    }
}
