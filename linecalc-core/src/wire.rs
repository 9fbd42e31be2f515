//! Wire encoding: one JSON object per datagram. No framing and no type tag;
//! the destination port selects the message type.

use serde_json::Value;

/// Largest datagram we encode or accept. Sized for the aggregate report
/// request, the biggest message on the wire.
pub const MAX_DATAGRAM_LEN: usize = 16 * 1024;

/// Encode an envelope into one datagram payload.
pub fn encode_datagram(value: &Value) -> Result<Vec<u8>, WireError> {
    let bytes = serde_json::to_vec(value).map_err(WireError::Encode)?;
    if bytes.len() > MAX_DATAGRAM_LEN {
        return Err(WireError::TooLarge);
    }
    Ok(bytes)
}

/// Decode one datagram payload into an envelope. The caller must treat a
/// failure as a skipped datagram, never a crash: the bytes came off an
/// unreliable socket and the sender may not be answerable.
pub fn decode_datagram(bytes: &[u8]) -> Result<Value, WireError> {
    if bytes.len() > MAX_DATAGRAM_LEN {
        return Err(WireError::TooLarge);
    }
    serde_json::from_slice(bytes).map_err(WireError::Decode)
}

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("decode error: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("datagram too large")]
    TooLarge,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn roundtrip_envelope() {
        let msg = json!({ "codec": "G.711", "jitter": 30.0, "netDelay": 40.0 });
        let bytes = encode_datagram(&msg).unwrap();
        let decoded = decode_datagram(&bytes).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn malformed_bytes_are_a_decode_error() {
        assert!(matches!(
            decode_datagram(b"{\"codec\": "),
            Err(WireError::Decode(_))
        ));
        assert!(matches!(
            decode_datagram(&[0xff, 0xfe, 0x00]),
            Err(WireError::Decode(_))
        ));
    }

    #[test]
    fn oversize_datagram_rejected() {
        let big = vec![b'0'; MAX_DATAGRAM_LEN + 1];
        assert!(matches!(decode_datagram(&big), Err(WireError::TooLarge)));

        let msg = json!({ "bitstream": "1".repeat(MAX_DATAGRAM_LEN) });
        assert!(matches!(encode_datagram(&msg), Err(WireError::TooLarge)));
    }
}
