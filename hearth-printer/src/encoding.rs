//! Code pages for thermal printers
//!
//! Text is laid out in UTF-8 and converted to the printer's single- or
//! double-byte code page at the very end. Column maths must use the encoded
//! width, not the char count: a CJK character takes two cells in GBK.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

use crate::error::PrintError;

/// Character set the printer is switched into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodePage {
    /// Simplified Chinese double-byte mode
    Gbk,
    /// Western European (WPC1252), the default for Latin menus
    #[default]
    #[serde(alias = "cp1252", alias = "windows-1252")]
    Windows1252,
}

/// ESC t n table number of WPC1252 on Epson-compatible printers
const WPC1252_TABLE: u8 = 16;

impl CodePage {
    fn encoding(&self) -> &'static encoding_rs::Encoding {
        match self {
            Self::Gbk => encoding_rs::GBK,
            Self::Windows1252 => encoding_rs::WINDOWS_1252,
        }
    }

    /// Encoded width of `s`, i.e. the number of printer cells it occupies
    pub fn width(&self, s: &str) -> usize {
        let (bytes, _, _) = self.encoding().encode(s);
        bytes.len()
    }

    fn char_width(&self, c: char) -> usize {
        let mut tmp = [0u8; 4];
        self.width(c.encode_utf8(&mut tmp))
    }

    /// Longest prefix of `s` that fits in `max` cells
    pub fn truncate(&self, s: &str, max: usize) -> String {
        let mut width = 0;
        let mut out = String::new();
        for c in s.chars() {
            let w = self.char_width(c);
            if width + w > max {
                break;
            }
            out.push(c);
            width += w;
        }
        out
    }

    /// Pad (or cut) `s` to exactly `width` cells
    pub fn pad(&self, s: &str, width: usize, align_right: bool) -> String {
        let current = self.width(s);
        if current >= width {
            return self.truncate(s, width);
        }
        let fill = " ".repeat(width - current);
        if align_right {
            format!("{}{}", fill, s)
        } else {
            format!("{}{}", s, fill)
        }
    }

    /// Bytes that switch the printer into this code page
    fn select(&self) -> &'static [u8] {
        match self {
            // FS & (Chinese mode on) + FS C 1 (GBK)
            Self::Gbk => &[0x1C, 0x26, 0x1C, 0x43, 0x01],
            // FS . (Chinese mode off) + ESC t 16
            Self::Windows1252 => &[0x1C, 0x2E, 0x1B, 0x74, WPC1252_TABLE],
        }
    }

    /// Convert a UTF-8 stream holding ESC/POS commands to this code page
    ///
    /// ASCII bytes, command bytes included, pass through untouched; only runs
    /// of non-ASCII bytes are re-encoded. The code page is re-selected after
    /// every `ESC @` since initialising the printer resets it.
    #[instrument(skip(bytes), fields(len = bytes.len()))]
    pub fn encode(&self, bytes: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(bytes.len() + 16);
        out.extend_from_slice(self.select());

        let mut pending = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            if b == 0x1B && bytes.get(i + 1) == Some(&0x40) {
                self.flush(&mut pending, &mut out);
                out.extend_from_slice(&[0x1B, 0x40]);
                out.extend_from_slice(self.select());
                i += 2;
                continue;
            }
            if b.is_ascii() {
                self.flush(&mut pending, &mut out);
                out.push(b);
            } else {
                pending.push(b);
            }
            i += 1;
        }
        self.flush(&mut pending, &mut out);

        if *self == Self::Gbk {
            out.extend_from_slice(&[0x1C, 0x2E]);
        }
        out
    }

    fn flush(&self, pending: &mut Vec<u8>, out: &mut Vec<u8>) {
        if pending.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(pending);
        let (encoded, _, _) = self.encoding().encode(&text);
        out.extend_from_slice(&encoded);
        pending.clear();
    }
}

impl FromStr for CodePage {
    type Err = PrintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gbk" => Ok(Self::Gbk),
            "windows1252" | "windows-1252" | "cp1252" | "latin" => Ok(Self::Windows1252),
            other => Err(PrintError::InvalidConfig(format!("unknown code page: {}", other))),
        }
    }
}
