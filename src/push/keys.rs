use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::core::RelayError;

/// Length of an uncompressed P-256 public key (0x04 || X || Y)
pub const APPLICATION_SERVER_KEY_LEN: usize = 65;

/// Decodes the server's URL-safe base64 public key into the raw bytes the
/// push platform expects. Padding is optional on input.
pub fn url_base64_to_bytes(encoded: &str) -> Result<Vec<u8>, RelayError> {
    let padding = "=".repeat((4 - encoded.len() % 4) % 4);
    let standard = format!("{}{}", encoded, padding)
        .replace('-', "+")
        .replace('_', "/");

    STANDARD
        .decode(standard.as_bytes())
        .map_err(|e| RelayError::InvalidKey(e.to_string()))
}

/// Checks the decoded key looks like an uncompressed P-256 point
pub fn validate_application_server_key(key: &[u8]) -> Result<(), RelayError> {
    if key.len() != APPLICATION_SERVER_KEY_LEN || key[0] != 0x04 {
        return Err(RelayError::InvalidKey(format!(
            "expected {} byte uncompressed P-256 key, got {} bytes",
            APPLICATION_SERVER_KEY_LEN,
            key.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    fn bytes_of_len(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 7 + 3) as u8).collect()
    }

    #[test]
    fn it_round_trips_url_safe_base64() {
        for len in [0, 1, 16, 255] {
            let original = bytes_of_len(len);
            let encoded = URL_SAFE_NO_PAD.encode(&original);
            assert!(!encoded.contains('='));
            let decoded = url_base64_to_bytes(&encoded).unwrap();
            assert_eq!(decoded, original, "length {}", len);
        }
    }

    #[test]
    fn it_decodes_url_safe_alphabet() {
        // 0xfb 0xff encodes to "-_8" in the URL-safe alphabet
        let decoded = url_base64_to_bytes("-_8").unwrap();
        assert_eq!(decoded, vec![0xfb, 0xff]);
    }

    #[test]
    fn it_accepts_padded_input() {
        let decoded = url_base64_to_bytes("AQ==").unwrap();
        assert_eq!(decoded, vec![1]);
    }

    #[test]
    fn it_rejects_garbage() {
        assert!(matches!(
            url_base64_to_bytes("not base64!"),
            Err(RelayError::InvalidKey(_))
        ));
    }

    #[test]
    fn it_validates_key_shape() {
        let mut key = vec![0u8; APPLICATION_SERVER_KEY_LEN];
        key[0] = 0x04;
        assert!(validate_application_server_key(&key).is_ok());

        key[0] = 0x02;
        assert!(validate_application_server_key(&key).is_err());
        assert!(validate_application_server_key(&[0x04; 33]).is_err());
        assert!(validate_application_server_key(&[]).is_err());
    }
}
