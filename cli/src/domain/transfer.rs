//! Push-protocol framing for single small files.
//!
//! A push is one control record followed by the raw bytes and a NUL
//! terminator, which is what a remote `scp -t` receiver expects on stdin:
//!
//! ```text
//! C0644 <len> <name>\n<bytes>\0
//! ```
//!
//! Pure functions only; reading the source file is up to the caller.

use crate::domain::error::TransferError;

/// Permission mode used for every pushed file.
pub const PUSH_FILE_MODE: u32 = 0o644;

/// Encode `content` as a push record for `file_name` with permission `mode`.
///
/// # Errors
///
/// Returns an error if `file_name` is empty or contains `/`, NUL or a line
/// break, none of which the receiver can represent in a control record.
pub fn encode_push(content: &[u8], file_name: &str, mode: u32) -> Result<Vec<u8>, TransferError> {
    validate_file_name(file_name)?;
    let header = format!("C{:04o} {} {file_name}\n", mode & 0o7777, content.len());
    let mut out = Vec::with_capacity(header.len() + content.len() + 1);
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(content);
    out.push(0);
    Ok(out)
}

/// One decoded push record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRecord {
    pub mode: u32,
    pub file_name: String,
    pub content: Vec<u8>,
}

/// Decode a single push record produced by [`encode_push`].
///
/// The whole stream must be consumed: trailing bytes after the NUL
/// terminator are rejected.
///
/// # Errors
///
/// Returns [`TransferError::Malformed`] describing the first framing problem.
pub fn decode_push(stream: &[u8]) -> Result<PushRecord, TransferError> {
    let newline = stream
        .iter()
        .position(|&b| b == b'\n')
        .ok_or_else(|| malformed("missing control record terminator"))?;
    let header = std::str::from_utf8(&stream[..newline])
        .map_err(|_| malformed("control record is not UTF-8"))?;
    let header = header
        .strip_prefix('C')
        .ok_or_else(|| malformed("control record must start with 'C'"))?;

    let mut fields = header.splitn(3, ' ');
    let mode = fields
        .next()
        .filter(|m| m.len() == 4)
        .and_then(|m| u32::from_str_radix(m, 8).ok())
        .ok_or_else(|| malformed("invalid mode"))?;
    let len: usize = fields
        .next()
        .and_then(|l| l.parse().ok())
        .ok_or_else(|| malformed("invalid length"))?;
    let file_name = fields
        .next()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| malformed("missing file name"))?;

    let body = &stream[newline + 1..];
    if body.len() != len + 1 {
        return Err(malformed(&format!(
            "declared {len} bytes but stream carries {}",
            body.len().saturating_sub(1)
        )));
    }
    if body[len] != 0 {
        return Err(malformed("missing NUL terminator"));
    }

    Ok(PushRecord {
        mode,
        file_name: file_name.to_string(),
        content: body[..len].to_vec(),
    })
}

fn validate_file_name(name: &str) -> Result<(), TransferError> {
    if name.is_empty() || name.contains(['/', '\n', '\r', '\0']) {
        return Err(TransferError::InvalidFileName(name.to_string()));
    }
    Ok(())
}

fn malformed(reason: &str) -> TransferError {
    TransferError::Malformed(reason.to_string())
}
