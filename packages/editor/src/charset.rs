//! Character encodings used when typing into the text preview.

use serde::{Deserialize, Serialize};

/// Encoding that maps typed characters to document bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Charset {
    #[default]
    Utf8,
    Ascii,
    /// ISO-8859-1
    Latin1,
    Utf16Le,
    Utf16Be,
}

const REPLACEMENT: char = '?';

impl Charset {
    pub fn max_bytes_per_char(self) -> usize {
        match self {
            Charset::Utf8 | Charset::Utf16Le | Charset::Utf16Be => 4,
            Charset::Ascii | Charset::Latin1 => 1,
        }
    }

    /// Encode one character; unmappable characters become `?`
    pub fn encode_char(self, ch: char) -> Vec<u8> {
        match self {
            Charset::Utf8 => {
                let mut buffer = [0u8; 4];
                ch.encode_utf8(&mut buffer).as_bytes().to_vec()
            }
            Charset::Ascii => vec![if ch.is_ascii() { ch as u8 } else { REPLACEMENT as u8 }],
            Charset::Latin1 => vec![u8::try_from(u32::from(ch)).unwrap_or(REPLACEMENT as u8)],
            Charset::Utf16Le | Charset::Utf16Be => {
                let mut units = [0u16; 2];
                ch.encode_utf16(&mut units)
                    .iter()
                    .flat_map(|unit| match self {
                        Charset::Utf16Le => unit.to_le_bytes(),
                        _ => unit.to_be_bytes(),
                    })
                    .collect()
            }
        }
    }

    /// Lossy decoding for display
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Charset::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Charset::Ascii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { char::REPLACEMENT_CHARACTER })
                .collect(),
            Charset::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
            Charset::Utf16Le | Charset::Utf16Be => {
                let units = bytes.chunks(2).map(|pair| {
                    let pair = [pair[0], pair.get(1).copied().unwrap_or(0)];
                    match self {
                        Charset::Utf16Le => u16::from_le_bytes(pair),
                        _ => u16::from_be_bytes(pair),
                    }
                });
                char::decode_utf16(units)
                    .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
                    .collect()
            }
        }
    }
}
