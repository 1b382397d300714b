//! Bridge between UTF-8 files and the host's legacy code page
//!
//! Files on disk are UTF-8. The host reads and writes a single-byte legacy
//! encoding (windows-1252 unless configured otherwise). Characters the legacy
//! encoding cannot represent become `?` on the way in, and are reported so the
//! user learns about the loss.

use std::borrow::Cow;

use encoding_rs::{EncoderResult, Encoding, UTF_8, WINDOWS_1252};

use crate::{Error, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Scratch buffer size for the encoder loop.
const ENCODE_CHUNK: usize = 4096;

/// Result of encoding text to the legacy code page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub bytes: Vec<u8>,
    /// Characters replaced by `?`, in input order, with repeats
    pub unmappable: Vec<char>,
}

impl Encoded {
    pub fn is_lossy(&self) -> bool {
        !self.unmappable.is_empty()
    }

    /// Replaced characters without repeats, in first-seen order.
    pub fn lost_chars(&self) -> Vec<char> {
        let mut seen = Vec::new();
        for c in &self.unmappable {
            if !seen.contains(c) {
                seen.push(*c);
            }
        }
        seen
    }
}

/// Which decoder produced a local file's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    Utf8,
    Legacy,
}

/// Single-byte legacy codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyCodec {
    encoding: &'static Encoding,
}

impl Default for LegacyCodec {
    fn default() -> Self {
        Self::windows_1252()
    }
}

impl LegacyCodec {
    pub fn windows_1252() -> Self {
        Self {
            encoding: WINDOWS_1252,
        }
    }

    /// Look up a codec by WHATWG label (`"windows-1252"`, `"latin1"`, ...).
    pub fn for_label(label: &str) -> Result<Self> {
        let encoding =
            Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| Error::UnknownEncoding {
                label: label.to_string(),
            })?;
        if !encoding.is_single_byte() {
            return Err(Error::NotSingleByte {
                name: encoding.name().to_string(),
            });
        }
        Ok(Self { encoding })
    }

    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Decode host bytes. Every byte maps to some character.
    pub fn decode(&self, bytes: &[u8]) -> String {
        let (text, _) = self.encoding.decode_without_bom_handling(bytes);
        text.into_owned()
    }

    /// Encode text for the host, replacing unmappable characters with `?`.
    pub fn encode(&self, text: &str) -> Encoded {
        let mut encoder = self.encoding.new_encoder();
        let mut bytes = Vec::with_capacity(text.len());
        let mut unmappable = Vec::new();
        let mut buf = [0u8; ENCODE_CHUNK];
        let mut remaining = text;

        loop {
            let (result, read, written) =
                encoder.encode_from_utf8_without_replacement(remaining, &mut buf, true);
            bytes.extend_from_slice(&buf[..written]);
            remaining = &remaining[read..];
            match result {
                EncoderResult::InputEmpty => break,
                EncoderResult::OutputFull => continue,
                EncoderResult::Unmappable(c) => {
                    bytes.push(b'?');
                    unmappable.push(c);
                }
            }
        }

        if !unmappable.is_empty() {
            tracing::debug!(
                encoding = self.name(),
                count = unmappable.len(),
                "replaced unmappable characters"
            );
        }

        Encoded { bytes, unmappable }
    }
}

/// Decode a local file: UTF-8 (with or without BOM) first, then the legacy
/// code page for files written by older tools.
pub fn decode_local(bytes: &[u8], codec: &LegacyCodec) -> (String, TextSource) {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(Cow::Borrowed(text)) => (text.to_string(), TextSource::Utf8),
        Some(Cow::Owned(text)) => (text, TextSource::Utf8),
        None => {
            tracing::debug!(encoding = codec.name(), "local file is not UTF-8, decoding as legacy");
            (codec.decode(bytes), TextSource::Legacy)
        }
    }
}
