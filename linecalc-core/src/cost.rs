//! Budget feasibility: price the aggregate bandwidth of each header profile
//! against a maximum budget and report how many calls fit.

use crate::protocol::{CostRequest, CostResponse, CostVerdict};
use crate::schema::MessageType;
use crate::service::{CalcError, Calculator};

/// Fixed price per Mbps, in the deployment's currency units.
pub const COST_PER_MBPS: f64 = 100.0;

/// Verdict for one profile. Within budget, the call count implied by the
/// aggregate and per-call bandwidths is reported as-is; over budget, it is
/// recomputed as the count affordable strictly within `pmax`.
fn verdict(bw_st: f64, call_bw: f64, pmax: f64) -> Result<CostVerdict, CalcError> {
    if call_bw <= 0.0 {
        return Err(CalcError::NonPositiveCallBandwidth(call_bw));
    }
    let cost = bw_st * COST_PER_MBPS;
    let valid = cost <= pmax;
    let possible = if valid {
        bw_st * 1e6 / call_bw
    } else {
        pmax / (call_bw * 1e-6 * COST_PER_MBPS)
    };
    Ok(CostVerdict {
        valid,
        possible_calls: possible.max(0.0) as u64,
    })
}

pub struct CostCalculator;

impl Calculator for CostCalculator {
    const ID: &'static str = "COST_CALCULATOR";
    const REQUEST_TYPE: MessageType = MessageType::CostRequest;

    type Request = CostRequest;
    type Response = CostResponse;

    fn compute(&self, request: CostRequest) -> Result<CostResponse, CalcError> {
        Ok(CostResponse {
            mbps_cost: COST_PER_MBPS,
            rtp: verdict(request.bw_st.rtp, request.call_bw.rtp, request.pmax)?,
            crtp: verdict(request.bw_st.crtp, request.call_bw.crtp, request.pmax)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ProfilePair;

    fn request() -> CostRequest {
        CostRequest {
            call_bw: ProfilePair {
                rtp: 112_000.0,
                crtp: 94_000.0,
            },
            bw_st: ProfilePair {
                rtp: 5.6,
                crtp: 4.7,
            },
            pmax: 500.0,
        }
    }

    #[test]
    fn reference_budget_split() {
        let response = CostCalculator.compute(request()).unwrap();
        assert_eq!(response.mbps_cost, 100.0);

        // RTP: cost 560 > 500, invalid; calls affordable within budget:
        // 500 / (112000e-6 * 100) = 44.64 -> 44.
        assert!(!response.rtp.valid);
        assert_eq!(response.rtp.possible_calls, 44);

        // cRTP: cost 470 <= 500, valid; calls implied directly:
        // 4.7e6 / 94000 = 50.
        assert!(response.crtp.valid);
        assert_eq!(response.crtp.possible_calls, 50);
    }

    #[test]
    fn exact_budget_is_valid() {
        let mut req = request();
        req.pmax = 560.0;
        let response = CostCalculator.compute(req).unwrap();
        assert!(response.rtp.valid);
        assert_eq!(response.rtp.possible_calls, 50);
    }

    #[test]
    fn zero_budget_yields_zero_calls() {
        let mut req = request();
        req.pmax = 0.0;
        let response = CostCalculator.compute(req).unwrap();
        assert!(!response.rtp.valid);
        assert_eq!(response.rtp.possible_calls, 0);
        assert_eq!(response.crtp.possible_calls, 0);
    }

    #[test]
    fn non_positive_call_bandwidth_rejected() {
        let mut req = request();
        req.call_bw.crtp = 0.0;
        assert!(matches!(
            CostCalculator.compute(req),
            Err(CalcError::NonPositiveCallBandwidth(_))
        ));
    }
}
