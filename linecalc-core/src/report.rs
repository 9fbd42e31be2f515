//! Report aggregation: render the five request/response pairs into one
//! ordered text report and hand it to the external delivery collaborator.

use std::fmt::Write;
use std::sync::Arc;

use crate::protocol::{ReportRequest, ReportResponse};
use crate::schema::MessageType;
use crate::service::{CalcError, Calculator};

/// Boundary to the external PDF/e-mail pipeline: consumes the rendered text
/// and a destination address. A failure here is logged by the aggregator and
/// never alters the computed response.
pub trait ReportSink: Send + Sync {
    fn deliver(&self, report: &str, destination: &str) -> Result<(), DeliveryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("delivery rejected: {0}")]
    Rejected(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Render the deterministic text report: one section per calculator, in the
/// client's sequencing order, each naming the formula and the substituted
/// result. All numbers are taken as already validated upstream.
pub fn render_report(request: &ReportRequest) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "VOIP DEPLOYMENT SIZING REPORT");
    let _ = writeln!(out, "=============================");
    let _ = writeln!(out, "prepared for: {}", request.email);

    let rt_in = &request.rt_request;
    let rt = &request.rt_response;
    let _ = writeln!(out);
    let _ = writeln!(out, "1. MOUTH-TO-EAR DELAY ({})", rt_in.codec);
    let _ = writeln!(out, "   rt(k) = csi + rpac + algD + k*jitter + netDelay + rphy");
    let _ = writeln!(
        out,
        "   csi = {:.2} ms, rpac = {:.2} ms, algD = {:.2} ms, rphy = {:.2} ms",
        rt.csi, rt.rpac, rt.alg_d, rt.rphy
    );
    let _ = writeln!(
        out,
        "   jitter = {:.2} ms, network delay = {:.2} ms",
        rt_in.jitter, rt_in.net_delay
    );
    let _ = writeln!(out, "   worst case (k = 2.0): {:.2} ms", rt.rt2jit);
    let _ = writeln!(out, "   adjusted   (k = 1.5): {:.2} ms", rt.rt1_5jit);

    let er_in = &request.erlang_request;
    let er = &request.erlang_response;
    let _ = writeln!(out);
    let _ = writeln!(out, "2. TRUNK SIZING (Erlang B)");
    let _ = writeln!(
        out,
        "   A = numLines * numCalls * avgDuration / 3600 = {} * {} * {} / 3600 = {:.3} Erl",
        er_in.num_lines, er_in.num_calls, er_in.avg_duration, er.erlangs
    );
    let _ = writeln!(
        out,
        "   minimal trunks with B(A, N) <= {}: N = {}",
        er_in.blocking_percentage, er.max_lines
    );

    let bw_in = &request.bw_request;
    let bw = &request.bw_response;
    let _ = writeln!(out);
    let _ = writeln!(out, "3. LINK BANDWIDTH ({})", bw_in.codec);
    let _ = writeln!(
        out,
        "   callBW = packetLength * pps * (1 + reservedBW); BWst = callBW * totalCalls * 1e-6"
    );
    let _ = writeln!(
        out,
        "   options: pppoe = {}, 802.1q = {}; reservedBW = {}, calls = {}, pps = {}",
        bw_in.pppoe, bw_in.vlan_8021q, bw_in.reserved_bw, bw_in.total_calls, bw.pps
    );
    let _ = writeln!(
        out,
        "   RTP : {:.0} bits/packet, {:.2} bps/call, {:.4} Mbps aggregate",
        bw.uncompressed.packet_length, bw.uncompressed.call_bw, bw.uncompressed.bw_st
    );
    let _ = writeln!(
        out,
        "   cRTP: {:.0} bits/packet, {:.2} bps/call, {:.4} Mbps aggregate",
        bw.compressed.packet_length, bw.compressed.call_bw, bw.compressed.bw_st
    );

    let cost_in = &request.cost_request;
    let cost = &request.cost_response;
    let _ = writeln!(out);
    let _ = writeln!(out, "4. COST FEASIBILITY");
    let _ = writeln!(
        out,
        "   cost = BWst * {:.2} per Mbps, budget Pmax = {:.2}",
        cost.mbps_cost, cost_in.pmax
    );
    let _ = writeln!(
        out,
        "   RTP : cost {:.2}, {}, {} calls possible",
        cost_in.bw_st.rtp * cost.mbps_cost,
        if cost.rtp.valid { "within budget" } else { "over budget" },
        cost.rtp.possible_calls
    );
    let _ = writeln!(
        out,
        "   cRTP: cost {:.2}, {}, {} calls possible",
        cost_in.bw_st.crtp * cost.mbps_cost,
        if cost.crtp.valid { "within budget" } else { "over budget" },
        cost.crtp.possible_calls
    );

    let plr_in = &request.plr_request;
    let plr = &request.plr_response;
    let _ = writeln!(out);
    let _ = writeln!(out, "5. PACKET LOSS BURSTINESS");
    let _ = writeln!(
        out,
        "   two-state Markov fit over {} observed packets",
        plr_in.bitstream.len()
    );
    let _ = writeln!(
        out,
        "   p = {:.4}, q = {:.4}, pi1 = {:.4}, pi0 = {:.4}",
        plr.p, plr.q, plr.pi1, plr.pi0
    );
    let _ = writeln!(out, "   mean loss burst length E = 1/q = {:.2}", plr.mean_burst);

    out
}

pub struct ReportAggregator {
    sink: Arc<dyn ReportSink>,
}

impl ReportAggregator {
    pub fn new(sink: Arc<dyn ReportSink>) -> ReportAggregator {
        ReportAggregator { sink }
    }
}

impl Calculator for ReportAggregator {
    const ID: &'static str = "REPORT_CREATOR";
    const REQUEST_TYPE: MessageType = MessageType::ReportRequest;

    type Request = ReportRequest;
    type Response = ReportResponse;

    fn compute(&self, request: ReportRequest) -> Result<ReportResponse, CalcError> {
        let report = render_report(&request);
        if let Err(e) = self.sink.deliver(&report, &request.email) {
            tracing::warn!(destination = %request.email, error = %e, "report delivery failed");
        }
        Ok(ReportResponse { report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sample_request() -> ReportRequest {
        ReportRequest {
            email: "noc@example.net".into(),
            rt_request: RtRequest {
                codec: "G.711".into(),
                jitter: 30.0,
                net_delay: 40.0,
            },
            rt_response: RtResponse {
                rt2jit: 147.5,
                rt1_5jit: 132.5,
                csi: 25.0,
                rphy: 2.5,
                rpac: 20.0,
                alg_d: 0.0,
            },
            erlang_request: ErlangRequest {
                num_lines: 100.0,
                num_calls: 10.0,
                avg_duration: 180.0,
                blocking_percentage: 0.01,
            },
            erlang_response: ErlangResponse {
                erlangs: 50.0,
                max_lines: 64,
            },
            bw_request: BwRequest {
                codec: "G.711".into(),
                pppoe: false,
                vlan_8021q: false,
                reserved_bw: 0.25,
                total_calls: 50.0,
            },
            bw_response: BwResponse {
                compressed: BwProfile {
                    packet_length: 1456.0,
                    call_bw: 91_000.0,
                    bw_st: 4.55,
                },
                uncompressed: BwProfile {
                    packet_length: 1744.0,
                    call_bw: 109_000.0,
                    bw_st: 5.45,
                },
                pps: 50.0,
            },
            cost_request: CostRequest {
                call_bw: ProfilePair {
                    rtp: 109_000.0,
                    crtp: 91_000.0,
                },
                bw_st: ProfilePair {
                    rtp: 5.45,
                    crtp: 4.55,
                },
                pmax: 500.0,
            },
            cost_response: CostResponse {
                mbps_cost: 100.0,
                rtp: CostVerdict {
                    valid: false,
                    possible_calls: 45,
                },
                crtp: CostVerdict {
                    valid: true,
                    possible_calls: 50,
                },
            },
            plr_request: PlrRequest {
                bitstream: "000110010000111000".into(),
            },
            plr_response: PlrResponse {
                p: 0.23076923076923078,
                q: 0.5,
                pi1: 0.3157894736842105,
                pi0: 0.6842105263157895,
                mean_burst: 2.0,
            },
        }
    }

    #[test]
    fn report_is_ordered_and_substituted() {
        let text = render_report(&sample_request());
        let rt = text.find("1. MOUTH-TO-EAR DELAY").unwrap();
        let erlang = text.find("2. TRUNK SIZING").unwrap();
        let bw = text.find("3. LINK BANDWIDTH").unwrap();
        let cost = text.find("4. COST FEASIBILITY").unwrap();
        let plr = text.find("5. PACKET LOSS BURSTINESS").unwrap();
        assert!(rt < erlang && erlang < bw && bw < cost && cost < plr);

        assert!(text.contains("worst case (k = 2.0): 147.50 ms"));
        assert!(text.contains("50.000 Erl"));
        assert!(text.contains("N = 64"));
        assert!(text.contains("1744 bits/packet"));
        assert!(text.contains("over budget, 45 calls possible"));
        assert!(text.contains("E = 1/q = 2.00"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let req = sample_request();
        assert_eq!(render_report(&req), render_report(&req));
    }

    struct FailingSink(AtomicUsize);

    impl ReportSink for FailingSink {
        fn deliver(&self, _report: &str, _destination: &str) -> Result<(), DeliveryError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(DeliveryError::Rejected("smtp unreachable".into()))
        }
    }

    #[test]
    fn delivery_failure_does_not_alter_response() {
        let sink = Arc::new(FailingSink(AtomicUsize::new(0)));
        let aggregator = ReportAggregator::new(sink.clone());
        let response = aggregator.compute(sample_request()).unwrap();
        assert_eq!(sink.0.load(Ordering::SeqCst), 1);
        assert_eq!(response.report, render_report(&sample_request()));
    }
}
