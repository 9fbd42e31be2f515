//! Shared service loop: receive one datagram, validate it against the
//! service's request schema, dispatch a concurrent task, answer the sender.
//! The loop never blocks on task completion and never dies on a bad request.

use std::sync::Arc;

use linecalc_core::schema;
use linecalc_core::service::{error_envelope, CalcError, Calculator};
use linecalc_core::wire::MAX_DATAGRAM_LEN;
use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::net::ServiceSocket;

/// Run one calculator service until the socket fails. Validation failures
/// are answered inline with an ERROR envelope; accepted requests run in
/// their own task, bounded by `max_in_flight` permits. Acquiring the permit
/// before spawning puts backpressure on the socket read, not on task count.
pub async fn run_service<C: Calculator>(
    socket: ServiceSocket,
    calculator: Arc<C>,
    max_in_flight: usize,
) -> std::io::Result<()> {
    let permits = Arc::new(Semaphore::new(max_in_flight.max(1)));
    let mut buf = vec![0u8; MAX_DATAGRAM_LEN];
    info!(service = C::ID, addr = ?socket.local_addr().ok(), "listening");

    loop {
        let (envelope, from) = match socket.recv_envelope(&mut buf).await? {
            Ok(received) => received,
            Err(e) => {
                warn!(service = C::ID, error = %e, "dropped undecodable datagram");
                continue;
            }
        };

        if let Err(e) = schema::validate(&envelope, C::REQUEST_TYPE) {
            warn!(service = C::ID, %from, error = %e, "rejected request");
            socket
                .send_envelope(&error_envelope(C::ID, &e.to_string()), from)
                .await;
            continue;
        }

        let Ok(permit) = permits.clone().acquire_owned().await else {
            // Semaphore closed only on teardown.
            return Ok(());
        };
        let socket = socket.clone();
        let calculator = calculator.clone();
        tokio::spawn(async move {
            let _permit = permit;
            let response = match run_task(calculator.as_ref(), envelope) {
                Ok(response) => response,
                Err(e) => {
                    warn!(service = C::ID, %from, error = %e, "task failed");
                    error_envelope(C::ID, &e.to_string())
                }
            };
            socket.send_envelope(&response, from).await;
        });
    }
}

/// The task body: typed deserialization, pure compute, typed serialization.
/// Every failure is contained here and turned into an ERROR answer by the
/// caller.
fn run_task<C: Calculator>(calculator: &C, envelope: Value) -> Result<Value, CalcError> {
    let request: C::Request = serde_json::from_value(envelope)?;
    let response = calculator.compute(request)?;
    Ok(serde_json::to_value(response)?)
}
