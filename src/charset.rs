//! Text codecs for the SMPP `data_coding` alphabets.
//!
//! Three encodings are implemented here: GSM 03.38 7-bit (one septet per
//! output byte, high bit zero), UCS-2 (big-endian UTF-16), and Latin-1
//! (ISO-8859-1). PDU fields carry raw bytes; [`decode_message`]/
//! [`encode_message`] pick the codec that matches a PDU's `data_coding`
//! value and convert at the boundary.

use crate::codec::CodecError;
use crate::datatypes::DataCoding;

/// GSM 03.38 default alphabet, indexed by septet value (0x00-0x7F).
const GSM7_BASIC: &[char] = &[
    '@', '£', '$', '¥', 'è', 'é', 'ù', 'ì', 'ò', 'Ç', '\n', 'Ø', 'ø', '\r', 'Å', 'å', 'Δ', '_',
    'Φ', 'Γ', 'Λ', 'Ω', 'Π', 'Ψ', 'Σ', 'Θ', 'Ξ', '\u{1b}', 'Æ', 'æ', 'ß', 'É', ' ', '!', '"', '#',
    '¤', '%', '&', '\'', '(', ')', '*', '+', ',', '-', '.', '/', '0', '1', '2', '3', '4', '5',
    '6', '7', '8', '9', ':', ';', '<', '=', '>', '?', '¡', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H',
    'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'Ä',
    'Ö', 'Ñ', 'Ü', '§', '¿', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n',
    'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'ä', 'ö', 'ñ', 'ü', 'à',
];

/// GSM 03.38 extension table, reached by the 0x1B escape septet. Every other
/// escape index decodes to a space and cannot be produced by `encode_gsm7`.
const GSM7_EXTENSION: &[(u8, char)] = &[
    (0x0A, '\x0C'), // form feed
    (0x14, '^'),
    (0x28, '{'),
    (0x29, '}'),
    (0x2F, '\\'),
    (0x3C, '['),
    (0x3D, '~'),
    (0x3E, ']'),
    (0x40, '|'),
    (0x65, '€'),
];

/// Encode text into GSM 7-bit septets, one septet per output byte (high bit
/// always zero).
///
/// Each character not in the default alphabet is looked up in the extension
/// table and emitted as two septets (0x1B followed by the extension index).
/// A character present in neither table fails the whole encode.
pub fn encode_gsm7(text: &str) -> Result<Vec<u8>, CodecError> {
    let mut septets = Vec::with_capacity(text.chars().count());

    for ch in text.chars() {
        if let Some(pos) = GSM7_BASIC.iter().position(|&c| c == ch) {
            septets.push(pos as u8);
        } else if let Some(&(code, _)) = GSM7_EXTENSION.iter().find(|&&(_, c)| c == ch) {
            septets.push(0x1B);
            septets.push(code);
        } else {
            return Err(CodecError::EncodeError {
                charset: "gsm7",
                codepoint: ch as u32,
            });
        }
    }

    Ok(pack_septets(&septets))
}

/// Decode GSM 7-bit septets (one per input byte; the high bit is ignored)
/// into text.
///
/// An escape index with no matching extension entry decodes to a space, per
/// the standard's treatment of reserved extension slots. A trailing dangling
/// escape (0x1B as the final septet) is dropped silently, matching how most
/// SMSCs handle a truncated extension sequence.
pub fn decode_gsm7(bytes: &[u8]) -> String {
    let septets = unpack_septets(bytes);
    let mut result = String::with_capacity(septets.len());
    let mut escaped = false;

    for septet in septets {
        if escaped {
            escaped = false;
            let ch = GSM7_EXTENSION
                .iter()
                .find(|&&(code, _)| code == septet)
                .map(|&(_, c)| c)
                .unwrap_or(' ');
            result.push(ch);
        } else if septet == 0x1B {
            escaped = true;
        } else {
            result.push(GSM7_BASIC[(septet & 0x7F) as usize]);
        }
    }

    result
}

/// Whether `text` can round-trip through [`encode_gsm7`] without error.
pub fn can_encode_gsm7(text: &str) -> bool {
    text.chars().all(|ch| {
        GSM7_BASIC.contains(&ch) || GSM7_EXTENSION.iter().any(|&(_, c)| c == ch)
    })
}

/// Number of septets `text` would occupy if encoded as GSM 7-bit, or -1 if
/// `text` contains a character the alphabet cannot represent.
pub fn count_gsm7_septets(text: &str) -> i32 {
    let mut count = 0i32;
    for ch in text.chars() {
        if GSM7_BASIC.contains(&ch) {
            count += 1;
        } else if GSM7_EXTENSION.iter().any(|&(_, c)| c == ch) {
            count += 2;
        } else {
            return -1;
        }
    }
    count
}

/// One septet per output byte (high bit zero). Bytes use low 7 bits; the
/// high bit is ignored on read, so `count_gsm7_septets(t) == encode_gsm7(t).len()`.
fn pack_septets(septets: &[u8]) -> Vec<u8> {
    septets.to_vec()
}

fn unpack_septets(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().map(|&b| b & 0x7F).collect()
}

/// Encode text as big-endian UTF-16 (UCS-2), including surrogate pairs for
/// characters outside the basic multilingual plane.
pub fn encode_ucs2(text: &str) -> Vec<u8> {
    let mut result = Vec::with_capacity(text.len() * 2);
    for unit in text.encode_utf16() {
        result.extend_from_slice(&unit.to_be_bytes());
    }
    result
}

/// Decode big-endian UTF-16 (UCS-2) bytes into text.
pub fn decode_ucs2(bytes: &[u8]) -> Result<String, CodecError> {
    if bytes.len() % 2 != 0 {
        return Err(CodecError::DecodeError {
            charset: "ucs2",
            reason: format!("odd byte length {}", bytes.len()),
        });
    }

    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();

    String::from_utf16(&units).map_err(|e| CodecError::DecodeError {
        charset: "ucs2",
        reason: e.to_string(),
    })
}

/// Encode text as ISO-8859-1 (Latin-1). Fails on any code point above U+00FF.
pub fn encode_latin1(text: &str) -> Result<Vec<u8>, CodecError> {
    let mut result = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let code = ch as u32;
        if code > 0xFF {
            return Err(CodecError::EncodeError {
                charset: "latin1",
                codepoint: code,
            });
        }
        result.push(code as u8);
    }
    Ok(result)
}

/// Decode ISO-8859-1 (Latin-1) bytes into text. Every byte value maps to a
/// valid Latin-1 code point, so this never fails.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Decode a PDU's message bytes (`effective_message()`) into text, per the
/// alphabet its `data_coding` selects. `Binary` and data codings this module
/// has no alphabet table for are reported as a decode error; callers that
/// only need raw bytes should read `effective_message()` directly instead.
pub fn decode_message(bytes: &[u8], data_coding: DataCoding) -> Result<String, CodecError> {
    match data_coding {
        DataCoding::SmscDefault | DataCoding::Ascii | DataCoding::Gsm7BitWithClass(_) => {
            Ok(decode_gsm7(bytes))
        }
        DataCoding::Ucs2 | DataCoding::Ucs2WithClass(_) => decode_ucs2(bytes),
        DataCoding::Latin1 => Ok(decode_latin1(bytes)),
        other => Err(CodecError::DecodeError {
            charset: "data_coding",
            reason: format!("no text alphabet for {other:?}"),
        }),
    }
}

/// Encode text into message bytes suitable for `short_message`/
/// `message_payload`, per the alphabet `data_coding` selects.
pub fn encode_message(text: &str, data_coding: DataCoding) -> Result<Vec<u8>, CodecError> {
    match data_coding {
        DataCoding::SmscDefault | DataCoding::Ascii | DataCoding::Gsm7BitWithClass(_) => {
            encode_gsm7(text)
        }
        DataCoding::Ucs2 | DataCoding::Ucs2WithClass(_) => Ok(encode_ucs2(text)),
        DataCoding::Latin1 => encode_latin1(text),
        other => Err(CodecError::EncodeError {
            charset: "data_coding",
            codepoint: match other {
                DataCoding::Custom(v) => v as u32,
                _ => 0,
            },
        }),
    }
}
