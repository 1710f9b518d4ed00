use base64::{engine::general_purpose, Engine as _};

/// Encodes a string to Base64 format.
pub fn base64_encode(input: &str) -> String {
    general_purpose::STANDARD.encode(input)
}

/// Encodes a string to URL-safe Base64 without padding, as SIP002 and SSR links expect.
pub fn url_safe_base64_encode(input: &str) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(input)
}

/// Decodes Base64 published by arbitrary clients.
///
/// Share links in the wild mix the standard and URL-safe alphabets and are
/// inconsistent about padding, so every combination is tried in turn.
///
/// # Returns
/// The decoded UTF-8 string, or `None` if no engine accepts the input.
pub fn base64_decode_lenient(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let engines = [
        general_purpose::STANDARD,
        general_purpose::STANDARD_NO_PAD,
        general_purpose::URL_SAFE,
        general_purpose::URL_SAFE_NO_PAD,
    ];

    engines
        .iter()
        .find_map(|engine| engine.decode(input).ok())
        .and_then(|bytes| String::from_utf8(bytes).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_padded_and_unpadded() {
        assert_eq!(base64_decode_lenient("aGVsbG8="), Some("hello".to_string()));
        assert_eq!(base64_decode_lenient("aGVsbG8"), Some("hello".to_string()));
    }

    #[test]
    fn test_decode_url_safe_alphabet() {
        // "??>" encodes to "Pz8+" in the standard alphabet
        assert_eq!(base64_decode_lenient("Pz8-"), Some("??>".to_string()));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(base64_decode_lenient("not base64 at all!"), None);
        assert_eq!(base64_decode_lenient(""), None);
    }

    #[test]
    fn test_url_safe_encode_has_no_padding() {
        let encoded = url_safe_base64_encode("aes-128-gcm:pass");
        assert!(!encoded.contains('='));
        assert_eq!(
            base64_decode_lenient(&encoded),
            Some("aes-128-gcm:pass".to_string())
        );
    }
}
