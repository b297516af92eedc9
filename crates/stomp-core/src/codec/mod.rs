//! Frame wire codec
//!
//! Wire layout: `COMMAND\n`, zero or more `key:value\n` lines, a blank line,
//! the body, then a single NUL terminator. Header values are not escaped, so
//! a value containing `\n` or NUL corrupts the frame.

use crate::error::FrameError;
use crate::frame::{Command, Frame, Headers};

/// Frame terminator byte
pub const TERMINATOR: char = '\0';

/// Line separator
pub const EOL: char = '\n';

/// Separator between the header block and the body
const HEADER_END: &str = "\n\n";

/// Decode raw bytes into a frame
///
/// Never fails. Bytes that are not valid UTF-8 are replaced with U+FFFD and
/// the rest of the frame is kept.
pub fn decode(raw: &[u8]) -> Frame {
    decode_str(&String::from_utf8_lossy(raw))
}

/// Decode raw bytes, rejecting payloads longer than `max_size` bytes
pub fn decode_with_limit(raw: &[u8], max_size: usize) -> Result<Frame, FrameError> {
    if raw.len() > max_size {
        return Err(FrameError::TooLarge {
            size: raw.len(),
            max: max_size,
        });
    }
    Ok(decode(raw))
}

/// Decode frame text
///
/// Never fails: missing pieces simply come back empty. A payload without a
/// blank line has an empty body; header lines without a `:` (or with an
/// empty key) are skipped.
pub fn decode_str(text: &str) -> Frame {
    let (head, body) = text.split_once(HEADER_END).unwrap_or((text, ""));

    let mut lines = head.split(EOL);
    let command = Command::parse(lines.next().unwrap_or_default());

    let mut headers = Headers::new();
    for line in lines {
        match line.find(':') {
            Some(idx) if idx > 0 => {
                headers.insert(line[..idx].trim(), line[idx + 1..].trim());
            }
            _ => {}
        }
    }

    // Only one terminator is stripped
    let body = body.strip_suffix(TERMINATOR).unwrap_or(body);

    Frame::new(command, headers, body)
}

/// Encode a frame's parts into wire text
pub fn encode(command: &Command, headers: &Headers, body: &str) -> String {
    let header_len: usize = headers.iter().map(|(k, v)| k.len() + v.len() + 2).sum();
    let mut out = String::with_capacity(command.as_str().len() + header_len + body.len() + 3);

    out.push_str(command.as_str());
    out.push(EOL);
    for (key, value) in headers.iter() {
        out.push_str(key);
        out.push(':');
        out.push_str(value);
        out.push(EOL);
    }
    out.push(EOL);
    out.push_str(body);
    out.push(TERMINATOR);

    out
}

/// Encode a whole frame into wire text
pub fn encode_frame(frame: &Frame) -> String {
    encode(&frame.command, &frame.headers, &frame.body)
}
