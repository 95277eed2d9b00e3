//! Incremental lossy UTF-8 decoding for chunked stream input.

/// Decodes UTF-8 text arriving in arbitrary chunk boundaries.
///
/// Invalid byte sequences are replaced with U+FFFD, matching how the rest of
/// the workspace treats non-UTF-8 HTML. A multi-byte sequence split across
/// two chunks is held back until its continuation bytes arrive, so chunking
/// never corrupts well-formed input.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk and returns everything decodable so far.
    pub fn push(&mut self, chunk: &[u8]) -> String {
        let mut buf = std::mem::take(&mut self.pending);
        buf.extend_from_slice(chunk);
        let mut out = String::with_capacity(buf.len());
        let mut rest: &[u8] = &buf;
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                },
                Err(error) => {
                    let (valid, after) = rest.split_at(error.valid_up_to());
                    out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                    match error.error_len() {
                        // Genuinely invalid bytes: substitute and continue.
                        Some(skip) => {
                            out.push('\u{FFFD}');
                            rest = &after[skip..];
                        },
                        // Incomplete sequence at the end of the chunk: hold it
                        // back for the next push.
                        None => {
                            self.pending = after.to_vec();
                            return out;
                        },
                    }
                },
            }
        }
        out
    }

    /// Flushes any held-back partial sequence as replacement characters.
    pub fn finish(self) -> String {
        String::from_utf8_lossy(&self.pending).into_owned()
    }
}
