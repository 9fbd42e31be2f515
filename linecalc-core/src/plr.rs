//! Loss burstiness: estimate a two-state Markov chain (Good = received,
//! Bad = lost) from an observed bitstream of '0's and '1's.

use crate::protocol::{PlrRequest, PlrResponse};
use crate::schema::MessageType;
use crate::service::{CalcError, Calculator};

/// Estimate the loss model from run statistics.
///
/// General case: with `nBursts` maximal runs of '1's and `extra` lost
/// symbols beyond the first of each burst,
/// p = nBursts/zeros, q = 1 - extra/ones, pi1 = p/(p+q), E = 1/q.
/// Since extra = ones - nBursts, q equals nBursts/ones and is positive
/// whenever this path is taken; a non-positive q is still refused rather
/// than divided by.
pub fn loss_model(bitstream: &str) -> Result<PlrResponse, CalcError> {
    if bitstream.bytes().any(|b| b != b'0' && b != b'1') {
        return Err(CalcError::BadBitstream);
    }
    let zeros = bitstream.bytes().filter(|&b| b == b'0').count();
    let ones = bitstream.len() - zeros;

    if ones == 0 {
        // No losses observed (covers the empty stream).
        return Ok(PlrResponse {
            p: 0.0,
            q: 1.0,
            pi1: 0.0,
            pi0: 1.0,
            mean_burst: 0.0,
        });
    }
    if zeros == 0 {
        // Nothing but loss: one burst spanning the whole stream.
        return Ok(PlrResponse {
            p: 1.0,
            q: 0.0,
            pi1: 1.0,
            pi0: 0.0,
            mean_burst: bitstream.len() as f64,
        });
    }

    let bursts = bitstream.split('0').filter(|burst| !burst.is_empty());
    let (n_bursts, extra) = bursts.fold((0usize, 0usize), |(n, extra), burst| {
        (n + 1, extra + burst.len() - 1)
    });

    let p = n_bursts as f64 / zeros as f64;
    let q = 1.0 - extra as f64 / ones as f64;
    if q <= 0.0 {
        return Err(CalcError::DegenerateLossModel);
    }
    let pi1 = p / (p + q);
    Ok(PlrResponse {
        p,
        q,
        pi1,
        pi0: 1.0 - pi1,
        mean_burst: 1.0 / q,
    })
}

pub struct PlrCalculator;

impl Calculator for PlrCalculator {
    const ID: &'static str = "PLR_CALCULATOR";
    const REQUEST_TYPE: MessageType = MessageType::PlrRequest;

    type Request = PlrRequest;
    type Response = PlrResponse;

    fn compute(&self, request: PlrRequest) -> Result<PlrResponse, CalcError> {
        loss_model(&request.bitstream)
    }
}
