//! Report delivery boundary. The PDF/e-mail pipeline is an external
//! collaborator; the daemon ships a sink that records the hand-off in the
//! service log so the response path never depends on it.

use linecalc_core::report::{DeliveryError, ReportSink};
use tracing::info;

pub struct LogDeliverySink;

impl ReportSink for LogDeliverySink {
    fn deliver(&self, report: &str, destination: &str) -> Result<(), DeliveryError> {
        info!(%destination, bytes = report.len(), "report handed to delivery");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_sink_accepts() {
        assert!(LogDeliverySink.deliver("report text", "noc@example.net").is_ok());
    }
}
