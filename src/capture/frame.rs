use base64::{engine::general_purpose::STANDARD, Engine};

/// Encoded image bytes as received from a client, in whatever format the browser produced.
#[derive(Debug, Clone)]
pub struct RawFrame {
    bytes: Vec<u8>,
}

impl RawFrame {
    /// Decode a data URL (`data:image/jpeg;base64,...`) or bare base64 payload.
    pub fn from_payload(payload: &str) -> Result<Self, base64::DecodeError> {
        let encoded = match payload.split_once(',') {
            Some((_scheme, rest)) => rest.split(',').next().unwrap_or(rest),
            None => payload,
        };

        let bytes = STANDARD.decode(encoded.trim())?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
