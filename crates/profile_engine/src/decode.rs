use chardetng::EncodingDetector;
use encoding_rs::Encoding;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("failed to decode bytes with {encoding}")]
    DecodeFailure { encoding: String },
}

/// Decode a text body into UTF-8 using: BOM -> Content-Type charset -> chardetng guess.
pub fn decode_text(bytes: &[u8], content_type: Option<&str>) -> Result<String, DecodeError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(label) = content_type.and_then(extract_charset) {
        if let Some(enc) = Encoding::for_label(label.as_bytes()) {
            return decode_with(bytes, enc);
        }
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    decode_with(bytes, detector.guess(None, true))
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim_matches([' ', '"', '\''].as_ref()).to_string())
    })
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> Result<String, DecodeError> {
    // Strips a matching BOM, if any.
    let (text, _, had_errors) = enc.decode(bytes);
    if had_errors {
        return Err(DecodeError::DecodeFailure {
            encoding: enc.name().to_string(),
        });
    }
    Ok(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::{decode_text, extract_charset, DecodeError};

    #[test]
    fn utf8_with_bom_is_stripped() {
        let bytes = b"\xEF\xBB\xBFhello";
        assert_eq!(decode_text(bytes, None).unwrap(), "hello");
    }

    #[test]
    fn header_charset_wins_over_detection() {
        // "café" in latin-1.
        let bytes = b"caf\xE9";
        let text = decode_text(bytes, Some("text/plain; charset=ISO-8859-1")).unwrap();
        assert_eq!(text, "café");
    }

    #[test]
    fn korean_utf8_without_hints() {
        let text = "자기소개서 내용";
        assert_eq!(decode_text(text.as_bytes(), Some("text/plain")).unwrap(), text);
    }

    #[test]
    fn invalid_utf8_with_declared_charset_fails() {
        let err = decode_text(b"ab\xC3", Some("text/plain; charset=utf-8")).unwrap_err();
        assert_eq!(
            err,
            DecodeError::DecodeFailure {
                encoding: "UTF-8".to_string()
            }
        );
    }

    #[test]
    fn charset_parameter_is_case_insensitive() {
        assert_eq!(
            extract_charset("text/plain; Charset=\"utf-8\""),
            Some("utf-8".to_string())
        );
        assert_eq!(extract_charset("text/plain"), None);
    }
}
