//! `OSC 1337` — iTerm2's proprietary command family.
//!
//! Payloads are `key[=value]` pairs, optionally several separated by `;`
//! (e.g. `Block=id=foo;attr=start`), so parsing stays key/value generic
//! rather than hand-rolling a case per command name.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorShapeValue {
    Block,
    VerticalBar,
    Underline,
}

impl CursorShapeValue {
    fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "0" => Self::Block,
            "1" => Self::VerticalBar,
            "2" => Self::Underline,
            _ => return None,
        })
    }
}

/// One `key` or `key=value` field from an OSC 1337 payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Iterm2Command {
    SetMark,
    StealFocus,
    ClearScrollback,
    EndCopy,
    ReportCellSize,
    PushKeyLabels,
    PopKeyLabels,
    ClearCapturedOutput,
    CursorShape(Option<CursorShapeValue>),
    CurrentDir(String),
    SetProfile(String),
    CopyToClipboard(String),
    SetBackgroundImageFile(String),
    RequestAttention(String),
    UnicodeVersion(String),
    HighlightCursorLine(bool),
    Copy(String),
    ReportVariable(String),
    RequestUpload(String),
    OpenUrl(String),
    /// Any command name/pair set not covered by a typed variant above,
    /// kept as raw key[=value] pairs rather than dropped.
    Generic(Vec<(String, Option<String>)>),
}

pub fn parse(body: &[u8]) -> Option<Iterm2Command> {
    let text = std::str::from_utf8(body).ok()?;
    let mut pairs = Vec::new();
    for field in text.split(';') {
        if field.is_empty() {
            continue;
        }
        match field.split_once('=') {
            Some((k, v)) => pairs.push((k.to_string(), Some(v.to_string()))),
            None => pairs.push((field.to_string(), None)),
        }
    }

    let (first_key, first_val) = pairs.first()?;
    let rest_generic = || Iterm2Command::Generic(pairs.clone());

    Some(match (first_key.as_str(), first_val) {
        ("SetMark", _) => Iterm2Command::SetMark,
        ("StealFocus", _) => Iterm2Command::StealFocus,
        ("ClearScrollback", _) => Iterm2Command::ClearScrollback,
        ("EndCopy", _) => Iterm2Command::EndCopy,
        ("ReportCellSize", _) => Iterm2Command::ReportCellSize,
        ("PushKeyLabels", _) => Iterm2Command::PushKeyLabels,
        ("PopKeyLabels", _) => Iterm2Command::PopKeyLabels,
        ("ClearCapturedOutput", _) => Iterm2Command::ClearCapturedOutput,
        ("CursorShape", Some(v)) => Iterm2Command::CursorShape(CursorShapeValue::from_str(v)),
        ("CurrentDir", Some(v)) => Iterm2Command::CurrentDir(v.clone()),
        ("SetProfile", Some(v)) => Iterm2Command::SetProfile(v.clone()),
        ("CopyToClipboard", Some(v)) => Iterm2Command::CopyToClipboard(v.clone()),
        ("SetBackgroundImageFile", Some(v)) => Iterm2Command::SetBackgroundImageFile(v.clone()),
        ("RequestAttention", Some(v)) => Iterm2Command::RequestAttention(v.clone()),
        ("UnicodeVersion", Some(v)) => Iterm2Command::UnicodeVersion(v.clone()),
        ("HighlightCursorLine", Some(v)) => Iterm2Command::HighlightCursorLine(v != "no"),
        ("Copy", Some(v)) => Iterm2Command::Copy(v.clone()),
        ("ReportVariable", Some(v)) => Iterm2Command::ReportVariable(v.clone()),
        ("RequestUpload", Some(v)) => Iterm2Command::RequestUpload(v.clone()),
        ("OpenUrl", Some(v)) => Iterm2Command::OpenUrl(v.clone()),
        _ => rest_generic(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_command() {
        assert_eq!(parse(b"SetMark"), Some(Iterm2Command::SetMark));
    }

    #[test]
    fn param_command() {
        assert_eq!(
            parse(b"CursorShape=1"),
            Some(Iterm2Command::CursorShape(Some(CursorShapeValue::VerticalBar)))
        );
    }

    #[test]
    fn unrecognized_falls_back_to_generic() {
        match parse(b"Block=id=foo;attr=start").unwrap() {
            Iterm2Command::Generic(pairs) => {
                assert_eq!(pairs[0], ("Block".to_string(), Some("id=foo".to_string())));
                assert_eq!(pairs[1], ("attr".to_string(), Some("start".to_string())));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
