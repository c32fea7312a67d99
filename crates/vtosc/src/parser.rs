//! Top-level dispatch: leading numeric code, then a command-specific body.

use crate::clipboard;
use crate::color::ColorRequest;
use crate::command::{Command, SpecialColorSlot, TitleTarget};
use crate::conemu;
use crate::hyperlink;
use crate::iterm2;
use crate::semantic_prompt;

/// Parse one complete OSC payload (the bytes between `OSC` and its
/// terminator, not including either) into a [`Command`].
///
/// Never fails: a payload this function can't make sense of becomes
/// [`Command::Unknown`] rather than an error, per §4.2's robustness rules.
pub fn parse(payload: &[u8]) -> Command {
    let (code, rest) = split_code(payload);

    let Some(code) = code else {
        return Command::Unknown { code: None, payload: payload.to_vec() };
    };

    parse_with_code(code, rest).unwrap_or(Command::Unknown {
        code: Some(code),
        payload: payload.to_vec(),
    })
}

/// Splits a leading `NNN;` or bare `NNN` off the front of the payload.
fn split_code(payload: &[u8]) -> (Option<u16>, &[u8]) {
    let mut end = 0;
    while end < payload.len() && payload[end].is_ascii_digit() {
        end += 1;
    }
    if end == 0 {
        return (None, payload);
    }
    let code = std::str::from_utf8(&payload[..end]).ok().and_then(|s| s.parse().ok());
    let rest = if end < payload.len() && payload[end] == b';' {
        &payload[end + 1..]
    } else {
        &payload[end..]
    };
    (code, rest)
}

fn parse_with_code(code: u16, body: &[u8]) -> Option<Command> {
    match code {
        0 => Some(title(TitleTarget::IconAndWindow, body)),
        1 => Some(title(TitleTarget::IconOnly, body)),
        2 => Some(title(TitleTarget::WindowOnly, body)),
        4 => Some(Command::PaletteColor(parse_palette(body))),
        5 => Some(Command::SpecialColor(parse_special(body))),
        7 => Some(Command::WorkingDirectory(String::from_utf8_lossy(body).into_owned())),
        8 => hyperlink::parse(body).map(Command::Hyperlink),
        9 => Some(parse_osc9(body)),
        10..=19 => {
            let req = ColorRequest::parse(body)?;
            Some(Command::DynamicColor(code, req))
        }
        52 => clipboard::parse_legacy(body).map(Command::ClipboardLegacy),
        104 => Some(Command::ResetPaletteColor(parse_optional_index(body))),
        110..=119 => Some(Command::ResetDynamicColor(code - 100)),
        133 => semantic_prompt::parse(body).map(Command::SemanticPrompt),
        1337 => iterm2::parse(body).map(Command::Iterm2),
        5522 => clipboard::parse_v2(body).map(Command::ClipboardV2),
        _ => None,
    }
}

fn title(target: TitleTarget, body: &[u8]) -> Command {
    Command::SetTitle {
        target,
        text: String::from_utf8_lossy(body).into_owned(),
    }
}

/// `OSC 9` is overloaded: a bare string is an iTerm2 notification, but a
/// body starting with `N;` is a ConEmu extension subcode.
fn parse_osc9(body: &[u8]) -> Command {
    let text = String::from_utf8_lossy(body);
    if let Some(rest) = text.strip_prefix(|c: char| c.is_ascii_digit()).map(|_| text.as_ref()) {
        // Only treat it as a ConEmu subcode if it parses as `digits(;...)`.
        if rest.split(';').next().map(|s| s.chars().all(|c| c.is_ascii_digit())).unwrap_or(false) {
            return Command::ConEmu(conemu::parse(rest));
        }
    }
    Command::DesktopNotification(text.into_owned())
}

/// `OSC 4` body: a list of `index;spec` pairs, accumulating valid ones up
/// to the first malformed entry.
fn parse_palette(body: &[u8]) -> Vec<(u8, ColorRequest)> {
    let mut out = Vec::new();
    let mut fields = body.split(|&b| b == b';');
    loop {
        let Some(index_field) = fields.next() else { break };
        let Ok(index_str) = std::str::from_utf8(index_field) else { break };
        let Ok(index) = index_str.parse::<u8>() else { break };
        let Some(spec_field) = fields.next() else { break };
        let Some(req) = ColorRequest::parse(spec_field) else { break };
        out.push((index, req));
    }
    out
}

fn parse_special(body: &[u8]) -> Vec<(SpecialColorSlot, ColorRequest)> {
    let mut out = Vec::new();
    let mut fields = body.split(|&b| b == b';');
    let mut idx: u16 = 0;
    loop {
        let Some(spec_field) = fields.next() else { break };
        if spec_field.is_empty() && idx == 0 {
            // Leading empty field before the first spec: skip.
            continue;
        }
        let Some(slot) = SpecialColorSlot::from_index(idx) else { break };
        let Some(req) = ColorRequest::parse(spec_field) else { break };
        out.push((slot, req));
        idx += 1;
    }
    out
}

fn parse_optional_index(body: &[u8]) -> Option<u8> {
    if body.is_empty() {
        return None;
    }
    std::str::from_utf8(body).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorRequest;
    use xparsecolor::XColor;

    #[test]
    fn osc4_set_then_query() {
        match parse(b"4;1;#ff0000") {
            Command::PaletteColor(entries) => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].0, 1);
                assert_eq!(entries[0].1, ColorRequest::Set(XColor::from_rgb8(0xff, 0, 0)));
            }
            other => panic!("unexpected: {other:?}"),
        }

        match parse(b"4;1;?") {
            Command::PaletteColor(entries) => {
                assert_eq!(entries[0].1, ColorRequest::Query);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn osc4_stops_at_first_malformed_entry() {
        match parse(b"4;1;#ff0000;2;not-a-color;3;#00ff00") {
            Command::PaletteColor(entries) => {
                assert_eq!(entries.len(), 1);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn osc9_plain_text_is_notification() {
        match parse(b"9;hello world") {
            Command::DesktopNotification(s) => assert_eq!(s, "hello world"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn osc9_conemu_subcode() {
        match parse(b"9;4;500") {
            Command::ConEmu(crate::conemu::ConEmuCommand::Sleep(ms)) => assert_eq!(ms, 500),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn osc133_semantic_prompt() {
        match parse(b"133;A;aid=14;cl=line") {
            Command::SemanticPrompt(cmd) => {
                assert_eq!(cmd.options.aid.as_deref(), Some("14"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn unknown_code_preserves_payload() {
        match parse(b"9999;whatever") {
            Command::Unknown { code, payload } => {
                assert_eq!(code, Some(9999));
                assert_eq!(payload, b"9999;whatever");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn idempotent_reparse() {
        let bytes: &[u8] = b"133;A;aid=14;cl=line";
        assert_eq!(parse(bytes), parse(bytes));
    }
}
