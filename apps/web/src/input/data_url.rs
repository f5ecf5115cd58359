//! `data:<mime>;base64,<payload>` encoding for the stored resume.

use base64::{engine::general_purpose::STANDARD, Engine as _};

pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Returns the MIME type and decoded bytes, or `None` for anything that is
/// not a base64 data URL.
pub fn decode(url: &str) -> Option<(String, Vec<u8>)> {
    let rest = url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(payload.trim()).ok()?;
    let mime = if mime.is_empty() {
        "application/octet-stream"
    } else {
        mime
    };
    Some((mime.to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_shape() {
        assert_eq!(encode("application/pdf", b"%PDF"), "data:application/pdf;base64,JVBERg==");
    }

    #[test]
    fn test_decode_reads_back_mime_and_bytes() {
        let (mime, bytes) = decode("data:application/pdf;base64,JVBERg==").unwrap();
        assert_eq!(mime, "application/pdf");
        assert_eq!(bytes, b"%PDF");
    }

    #[test]
    fn test_decode_rejects_non_base64_urls() {
        assert!(decode("https://example.com/cv.pdf").is_none());
        assert!(decode("data:text/plain,hello").is_none());
        assert!(decode("data:application/pdf;base64,@@@").is_none());
    }
}
