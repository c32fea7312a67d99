//! Kitty clipboard protocols: the legacy `OSC 52` and the `OSC 5522` v2
//! protocol. Both carry base64 payloads; this module decodes them eagerly
//! so `vtterm` never has to touch base64 itself.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// `OSC 52 ; Pc ; Pd` — legacy clipboard get/set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardCommand {
    /// The selection letters (`c`, `p`, `q`, `s`, `0`-`7`), as given.
    pub selections: String,
    pub payload: ClipboardPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardPayload {
    /// `Pd == "?"` — read back the current clipboard contents.
    Query,
    /// Empty base64 payload — clear the clipboard.
    Clear,
    /// Decoded clipboard bytes. Malformed base64 is treated the same as
    /// an empty payload (clear) rather than failing the whole command,
    /// per §4.2's "never fail the whole sequence" rule.
    Data(Vec<u8>),
}

pub fn parse_legacy(body: &[u8]) -> Option<ClipboardCommand> {
    let text = std::str::from_utf8(body).ok()?;
    let mut parts = text.splitn(2, ';');
    let selections = parts.next().unwrap_or("").to_string();
    let data = parts.next().unwrap_or("");

    let payload = if data == "?" {
        ClipboardPayload::Query
    } else if data.is_empty() {
        ClipboardPayload::Clear
    } else {
        match STANDARD.decode(data) {
            Ok(bytes) => ClipboardPayload::Data(bytes),
            Err(_) => ClipboardPayload::Clear,
        }
    };

    Some(ClipboardCommand { selections, payload })
}

/// `OSC 5522` operations, keyed by the `a=` metadata field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardV2Op {
    Read,
    Write,
    WData,
    WAlias,
    /// A status frame (`s=` present instead of `a=`) rather than a
    /// request; `vtterm` only ever parses requests, but a misbehaving
    /// producer that echoes a status back is still absorbed rather than
    /// rejected.
    Status(ClipboardV2Status),
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardV2Status {
    Ok,
    Done,
    Data,
    EBusy,
    EInval,
    EIo,
    ENoSys,
    EPerm,
}

impl ClipboardV2Status {
    fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "OK" => Self::Ok,
            "DONE" => Self::Done,
            "DATA" => Self::Data,
            "EBUSY" => Self::EBusy,
            "EINVAL" => Self::EInval,
            "EIO" => Self::EIo,
            "ENOSYS" => Self::ENoSys,
            "EPERM" => Self::EPerm,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardV2Command {
    pub metadata: Vec<(String, String)>,
    pub op: ClipboardV2Op,
    pub payload: Option<Vec<u8>>,
}

impl ClipboardV2Command {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// `metadata:key=value:key=value;payload` — metadata pairs separated by
/// `:`, then a `;` before the (optionally empty) base64 payload.
pub fn parse_v2(body: &[u8]) -> Option<ClipboardV2Command> {
    let text = std::str::from_utf8(body).ok()?;
    let (meta_str, payload_str) = text.split_once(';').unwrap_or((text, ""));

    let mut metadata = Vec::new();
    for kv in meta_str.split(':') {
        if kv.is_empty() {
            continue;
        }
        if let Some((k, v)) = kv.split_once('=') {
            metadata.push((k.to_string(), v.to_string()));
        }
    }

    let op = metadata
        .iter()
        .find(|(k, _)| k == "s")
        .and_then(|(_, v)| ClipboardV2Status::from_str(v))
        .map(ClipboardV2Op::Status)
        .or_else(|| {
            metadata.iter().find(|(k, _)| k == "a").map(|(_, v)| match v.as_str() {
                "read" => ClipboardV2Op::Read,
                "write" => ClipboardV2Op::Write,
                "wdata" => ClipboardV2Op::WData,
                "walias" => ClipboardV2Op::WAlias,
                other => ClipboardV2Op::Unknown(other.to_string()),
            })
        })
        .unwrap_or(ClipboardV2Op::Unknown(String::new()));

    let payload = if payload_str.is_empty() {
        None
    } else {
        STANDARD.decode(payload_str).ok()
    };

    Some(ClipboardV2Command { metadata, op, payload })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_query() {
        let cmd = parse_legacy(b"c;?").unwrap();
        assert_eq!(cmd.selections, "c");
        assert_eq!(cmd.payload, ClipboardPayload::Query);
    }

    #[test]
    fn legacy_clear_on_empty() {
        let cmd = parse_legacy(b"c;").unwrap();
        assert_eq!(cmd.payload, ClipboardPayload::Clear);
    }

    #[test]
    fn legacy_decodes_base64() {
        let cmd = parse_legacy(b"c;aGVsbG8=").unwrap();
        assert_eq!(cmd.payload, ClipboardPayload::Data(b"hello".to_vec()));
    }

    #[test]
    fn v2_write_request() {
        let cmd = parse_v2(b"a=write:t=c;aGVsbG8=").unwrap();
        assert_eq!(cmd.op, ClipboardV2Op::Write);
        assert_eq!(cmd.get("t"), Some("c"));
        assert_eq!(cmd.payload, Some(b"hello".to_vec()));
    }

    #[test]
    fn v2_status_frame() {
        let cmd = parse_v2(b"s=EBUSY").unwrap();
        assert_eq!(cmd.op, ClipboardV2Op::Status(ClipboardV2Status::EBusy));
    }
}
