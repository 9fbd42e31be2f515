//! Mouth-to-ear delay: fixed codec components plus jitter and network delay,
//! totalled at a worst-case and an adjusted jitter multiplier.

use std::sync::Arc;

use crate::codecs::CodecTable;
use crate::protocol::{RtRequest, RtResponse};
use crate::schema::MessageType;
use crate::service::{CalcError, Calculator};

const WORST_CASE_MULTIPLIER: f64 = 2.0;
const ADJUSTED_MULTIPLIER: f64 = 1.5;
/// Physical propagation share of the interaction delay.
const PHYSICAL_RATIO: f64 = 0.1;

pub struct RtCalculator {
    codecs: Arc<CodecTable>,
}

impl RtCalculator {
    pub fn new(codecs: Arc<CodecTable>) -> RtCalculator {
        RtCalculator { codecs }
    }
}

impl Calculator for RtCalculator {
    const ID: &'static str = "RT_CALCULATOR";
    const REQUEST_TYPE: MessageType = MessageType::RtRequest;

    type Request = RtRequest;
    type Response = RtResponse;

    fn compute(&self, request: RtRequest) -> Result<RtResponse, CalcError> {
        let codec = self
            .codecs
            .get(&request.codec)
            .ok_or_else(|| CalcError::UnknownCodec(request.codec.clone()))?;

        let csi = codec.interaction_delay;
        let rphy = PHYSICAL_RATIO * csi;
        let rpac = codec.payload_delay - csi;
        let alg_d = codec.algorithmic_delay;
        let total =
            |k: f64| csi + rpac + alg_d + k * request.jitter + request.net_delay + rphy;

        Ok(RtResponse {
            rt2jit: total(WORST_CASE_MULTIPLIER),
            rt1_5jit: total(ADJUSTED_MULTIPLIER),
            csi,
            rphy,
            rpac,
            alg_d,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculator() -> RtCalculator {
        RtCalculator::new(Arc::new(CodecTable::builtin()))
    }

    #[test]
    fn g711_components_and_totals() {
        // G.711 builtin entry: csi 25, payload delay 45, algorithmic 0.
        let response = calculator()
            .compute(RtRequest {
                codec: "G.711".into(),
                jitter: 30.0,
                net_delay: 40.0,
            })
            .unwrap();
        assert_eq!(response.csi, 25.0);
        assert_eq!(response.rphy, 2.5);
        assert_eq!(response.rpac, 20.0);
        assert_eq!(response.alg_d, 0.0);
        // 25 + 20 + 0 + k*30 + 40 + 2.5
        assert!((response.rt2jit - 147.5).abs() < 1e-9);
        assert!((response.rt1_5jit - 132.5).abs() < 1e-9);
    }

    #[test]
    fn worst_case_dominates_adjusted() {
        let response = calculator()
            .compute(RtRequest {
                codec: "G.729".into(),
                jitter: 12.0,
                net_delay: 80.0,
            })
            .unwrap();
        assert!(response.rt2jit > response.rt1_5jit);
        assert!((response.rt2jit - response.rt1_5jit - 0.5 * 12.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_codec_is_an_error() {
        let err = calculator()
            .compute(RtRequest {
                codec: "G.999".into(),
                jitter: 0.0,
                net_delay: 0.0,
            })
            .unwrap_err();
        assert!(matches!(err, CalcError::UnknownCodec(name) if name == "G.999"));
    }
}
