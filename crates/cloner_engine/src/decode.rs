use chardetng::EncodingDetector;
use encoding_rs::Encoding;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding_label: String,
    /// Malformed sequences were replaced with U+FFFD.
    pub had_errors: bool,
}

/// Decode fetched HTML or CSS into UTF-8 using: BOM -> Content-Type charset -> chardetng guess.
///
/// Decoding is lossy and never fails.
pub fn decode_text(bytes: &[u8], content_type: Option<&str>) -> DecodedText {
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
    let enc = detector.guess(None, true);
    decode_with(bytes, enc)
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let (key, value) = part.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim_matches([' ', '"', '\''].as_ref()).to_string())
        })
        .next()
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> DecodedText {
    let (text, _, had_errors) = enc.decode(bytes);
    DecodedText {
        text: text.into_owned(),
        encoding_label: enc.name().to_string(),
        had_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_text, extract_charset};

    #[test]
    fn charset_parameter_is_case_insensitive() {
        assert_eq!(
            extract_charset("text/css; Charset=\"ISO-8859-1\"").as_deref(),
            Some("ISO-8859-1")
        );
        assert_eq!(extract_charset("text/css"), None);
    }

    #[test]
    fn plain_ascii_css_decodes() {
        let decoded = decode_text(b"body { margin: 0 }", Some("text/css"));
        assert_eq!(decoded.text, "body { margin: 0 }");
        assert!(!decoded.had_errors);
    }

    #[test]
    fn malformed_bytes_are_replaced() {
        let decoded = decode_text(b"<p>caf\xE9</p>", Some("text/html; charset=utf-8"));
        assert_eq!(decoded.text, "<p>caf\u{FFFD}</p>");
        assert_eq!(decoded.encoding_label, "UTF-8");
        assert!(decoded.had_errors);
    }
}
