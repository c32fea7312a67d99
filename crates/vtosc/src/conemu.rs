//! `OSC 9 ; N ; ...` ConEmu extension sub-codes.
//!
//! `OSC 9` with a bare string body (no leading `N;`) is an iTerm2-style
//! desktop notification; that case is handled by the caller before this
//! module is reached. Everything here parses the `N;rest` shape.

/// Progress-bar state, per §6's wire table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressState {
    Remove,
    Set,
    Error,
    Indeterminate,
    Pause,
}

impl ProgressState {
    fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::Remove,
            1 => Self::Set,
            2 => Self::Error,
            3 => Self::Indeterminate,
            4 => Self::Pause,
            _ => return None,
        })
    }
}

/// `xterm-emulation` subcode argument: absent, or `0..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XtermEmulation {
    Unspecified,
    Mode0,
    Mode1,
    Mode2,
    Mode3,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConEmuCommand {
    /// `9;1;state[;progress]` — taskbar progress. `progress` is clamped to
    /// `[0, 100]`.
    Progress { state: ProgressState, progress: u8 },
    /// `9;2;title` — silently set the tab title.
    TabTitle(String),
    /// `9;3;text` — a message box.
    MessageBox(String),
    /// `9;4;duration` — sleep, clamped to `<= 10000` ms (default `100`
    /// when the argument is malformed or missing).
    Sleep(u32),
    /// `9;5` — wait for user input before continuing a script.
    WaitInput,
    /// `9;6;macro` — run a registered GUI macro.
    GuiMacro(String),
    /// `9;7;command` — run a process.
    RunProcess(String),
    /// `9;8;name;value` — set an environment variable.
    SetEnvVar { name: String, value: String },
    /// `9;9;path` — report the current working directory.
    Pwd(String),
    /// `9;10;mode` — select xterm-emulation behavior.
    XtermEmulation(XtermEmulation),
    /// `9;11;text` — a comment, informational only.
    Comment(String),
    /// `9;12` — mark the start of a shell prompt.
    PromptStart,
    /// An unrecognized subcode (`1..12` is the documented range, but
    /// unknown subcodes are preserved rather than dropped).
    Unknown { subcode: u16, rest: String },
}

pub fn parse(body: &str) -> ConEmuCommand {
    let mut fields = body.splitn(2, ';');
    let subcode: u16 = fields.next().unwrap_or("").parse().unwrap_or(0);
    let rest = fields.next().unwrap_or("");

    match subcode {
        1 => {
            let mut parts = rest.splitn(2, ';');
            let state = parts
                .next()
                .and_then(|s| s.parse::<u8>().ok())
                .and_then(ProgressState::from_code)
                .unwrap_or(ProgressState::Remove);
            let progress = parts
                .next()
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap_or(0)
                .min(100) as u8;
            ConEmuCommand::Progress { state, progress }
        }
        2 => ConEmuCommand::TabTitle(rest.to_string()),
        3 => ConEmuCommand::MessageBox(rest.to_string()),
        4 => {
            let ms = rest.parse::<u32>().unwrap_or(100).min(10_000);
            ConEmuCommand::Sleep(ms)
        }
        5 => ConEmuCommand::WaitInput,
        6 => ConEmuCommand::GuiMacro(rest.to_string()),
        7 => ConEmuCommand::RunProcess(rest.to_string()),
        8 => {
            let (name, value) = rest.split_once(';').unwrap_or((rest, ""));
            ConEmuCommand::SetEnvVar {
                name: name.to_string(),
                value: value.to_string(),
            }
        }
        9 => ConEmuCommand::Pwd(rest.to_string()),
        10 => {
            let mode = match rest {
                "0" => XtermEmulation::Mode0,
                "1" => XtermEmulation::Mode1,
                "2" => XtermEmulation::Mode2,
                "3" => XtermEmulation::Mode3,
                _ => XtermEmulation::Unspecified,
            };
            ConEmuCommand::XtermEmulation(mode)
        }
        11 => ConEmuCommand::Comment(rest.to_string()),
        12 => ConEmuCommand::PromptStart,
        other => ConEmuCommand::Unknown {
            subcode: other,
            rest: rest.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_clamps_to_100() {
        match parse("1;1;250") {
            ConEmuCommand::Progress { state, progress } => {
                assert_eq!(state, ProgressState::Set);
                assert_eq!(progress, 100);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn sleep_clamps_and_defaults() {
        assert_eq!(parse("4;99999"), ConEmuCommand::Sleep(10_000));
        assert_eq!(parse("4;not-a-number"), ConEmuCommand::Sleep(100));
    }

    #[test]
    fn xterm_emulation_defaults_unspecified() {
        assert_eq!(
            parse("10;garbage"),
            ConEmuCommand::XtermEmulation(XtermEmulation::Unspecified)
        );
        assert_eq!(
            parse("10;2"),
            ConEmuCommand::XtermEmulation(XtermEmulation::Mode2)
        );
    }
}
