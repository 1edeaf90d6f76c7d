//! Snapshot payload codec.
//!
//! Payloads are stored as a small JSON envelope:
//!
//! ```json
//! {"format":1,"payload":{"topology":{...},"weight_range":{...},"environments":[...],"hap_sql":""}}
//! ```
//!
//! All maps in the payload are ordered, so encoding is deterministic: equal
//! payloads always produce identical blobs.

use crate::errors::{ExError, ExErrorKind, Result};
use crate::model::SnapshotPayload;
use serde::{Deserialize, Serialize};

/// Current envelope format number
pub const PAYLOAD_FORMAT: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    format: u32,
    payload: &'a SnapshotPayload,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Envelope {
    format: u32,
    payload: SnapshotPayload,
}

/// Encode a payload into its storable form.
///
/// # Errors
///
/// - `Serialization` if the payload cannot be rendered as JSON
pub fn encode(payload: &SnapshotPayload) -> Result<String> {
    serde_json::to_string(&EnvelopeRef {
        format: PAYLOAD_FORMAT,
        payload,
    })
    .map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("encode_payload")
            .with_message(format!("Failed to serialize payload: {}", e))
    })
}

/// Decode a stored blob back into a payload.
///
/// # Errors
///
/// - `CorruptPayload` if the blob is not a well-formed envelope of the
///   current format
pub fn decode(blob: &str) -> Result<SnapshotPayload> {
    let envelope: Envelope = serde_json::from_str(blob).map_err(|e| {
        ExError::new(ExErrorKind::CorruptPayload)
            .with_op("decode_payload")
            .with_message(format!("Malformed payload: {}", e))
    })?;

    if envelope.format != PAYLOAD_FORMAT {
        return Err(ExError::new(ExErrorKind::CorruptPayload)
            .with_op("decode_payload")
            .with_message(format!(
                "Unsupported payload format {} (expected {})",
                envelope.format, PAYLOAD_FORMAT
            )));
    }

    Ok(envelope.payload)
}
