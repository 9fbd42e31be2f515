//! VoIP deployment sizing: message protocol and calculators.
//! I/O-free: the server crate owns sockets and scheduling; this crate owns
//! message shapes, validation and the numeric algorithms.

pub mod bandwidth;
pub mod codecs;
pub mod cost;
pub mod erlang;
pub mod plr;
pub mod protocol;
pub mod report;
pub mod rt;
pub mod schema;
pub mod service;
pub mod wire;

pub use codecs::{CodecEntry, CodecTable, CodecTableError};
pub use schema::{build, validate, MessageType, SchemaError};
pub use service::{error_envelope, CalcError, Calculator};
pub use wire::{decode_datagram, encode_datagram, WireError, MAX_DATAGRAM_LEN};
