use std::fs;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use tracing::warn;

use crate::error::Result;

/// Guesses the encoding of a text file's bytes. A UTF-8 BOM wins outright.
pub fn detect(bytes: &[u8]) -> &'static Encoding {
    if let Some((enc, _bom_len)) = Encoding::for_bom(bytes) {
        return enc;
    }

    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// Reads a hand-edited text file (department lists and the like) whatever its encoding.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    let encoding = detect(&bytes);

    let (text, _, had_errors) = encoding.decode(&bytes);
    if had_errors {
        warn!(
            path = %path.display(),
            encoding = encoding.name(),
            "text decoded with replacement characters"
        );
    }

    Ok(text.into_owned())
}
