//! Obfuscating codec for backup files.
//!
//! XOR over a fixed embedded passphrase, then base64. The passphrase ships
//! inside the binary, so this is tamper evidence and casual obfuscation
//! only, NOT encryption. The transform is kept byte-compatible with
//! existing `.crw` backups.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::CodecError;

const PASSPHRASE: &[u8] = b"CheckInCalendar2025";

/// Obfuscates plaintext into ASCII-safe text.
///
/// XORs every UTF-8 byte with the passphrase byte at the same cycling
/// index, then base64-encodes the result. Total function: any input
/// string encodes.
pub fn encode(plaintext: &str) -> String {
    STANDARD.encode(xor_cycle(plaintext.as_bytes()))
}

/// Reverses [`encode`].
///
/// Surrounding whitespace is tolerated so files that grew a trailing
/// newline still decode. Fails on non-base64 input and on payloads that
/// do not XOR back to valid UTF-8; either way the caller surfaces it as
/// an import failure.
pub fn decode(ciphertext: &str) -> Result<String, CodecError> {
    let raw = STANDARD.decode(ciphertext.trim())?;
    Ok(String::from_utf8(xor_cycle(&raw))?)
}

fn xor_cycle(data: &[u8]) -> Vec<u8> {
    data.iter()
        .enumerate()
        .map(|(i, byte)| byte ^ PASSPHRASE[i % PASSPHRASE.len()])
        .collect()
}
