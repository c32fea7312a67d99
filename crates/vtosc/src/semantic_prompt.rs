//! `OSC 133` shell-integration semantic-prompt parsing.
//!
//! Unifies on a single option-union model (SPEC_FULL §9 Open Question (a)):
//! one action letter plus a bag of optional key/value annotations, rather
//! than two divergent representations for "plain" vs "annotated" marks.

/// Which row-level semantic-prompt action an `OSC 133` payload names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticPromptAction {
    /// `L` — blank-line reset, no prompt semantics attached.
    FreshLine,
    /// `A` — fresh line marking the start of a new prompt.
    PromptStart,
    /// `P` — continuation line of a multi-line prompt.
    PromptContinuation,
    /// `B` — end of prompt, start of user input.
    Input,
    /// `I` — continuation line of multi-line input.
    InputContinuation,
    /// `C` — end of input, start of command output.
    Command,
    /// `D` — end of command output.
    CommandEnd,
    /// `N` — a free-form shell-integration notice row.
    Notice,
    /// A recognized but unmapped action letter.
    Unknown(char),
}

impl SemanticPromptAction {
    fn from_letter(c: char) -> Self {
        match c {
            'L' => Self::FreshLine,
            'A' => Self::PromptStart,
            'P' => Self::PromptContinuation,
            'B' => Self::Input,
            'I' => Self::InputContinuation,
            'C' => Self::Command,
            'D' => Self::CommandEnd,
            'N' => Self::Notice,
            other => Self::Unknown(other),
        }
    }
}

/// Free-form annotations trailing the action letter, `;key=value` pairs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SemanticPromptOptions {
    pub aid: Option<String>,
    pub cl: Option<String>,
    pub k: Option<char>,
    pub err: Option<String>,
    pub redraw: Option<bool>,
    pub special_key: Option<String>,
    pub click_events: Option<bool>,
    pub exit_code: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticPromptCommand {
    pub action: SemanticPromptAction,
    pub options: SemanticPromptOptions,
}

/// Parse everything after `OSC 133;` — a single action letter, optionally
/// followed by `;key=value` or (for `D`) a bare exit-code field.
pub fn parse(body: &[u8]) -> Option<SemanticPromptCommand> {
    let text = std::str::from_utf8(body).ok()?;
    let mut fields = text.split(';');
    let letter = fields.next()?.chars().next()?;
    let action = SemanticPromptAction::from_letter(letter);

    let mut options = SemanticPromptOptions::default();
    for field in fields {
        if field.is_empty() {
            continue;
        }
        // `D` may be followed by a bare exit code instead of `key=value`.
        if let Ok(code) = field.parse::<i32>() {
            options.exit_code = Some(code);
            continue;
        }
        let Some((key, value)) = field.split_once('=') else {
            continue;
        };
        match key {
            "aid" => options.aid = Some(value.to_string()),
            "cl" => options.cl = Some(value.to_string()),
            "k" => options.k = value.chars().next(),
            "err" => options.err = Some(value.to_string()),
            "redraw" => options.redraw = Some(value != "0"),
            "special_key" => options.special_key = Some(value.to_string()),
            "click_events" => options.click_events = Some(value != "0"),
            "exit_code" => {
                if let Ok(code) = value.parse() {
                    options.exit_code = Some(code);
                }
            }
            // Unknown options are ignored per §4.2's robustness rules.
            _ => {}
        }
    }

    Some(SemanticPromptCommand { action, options })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_start_with_options() {
        let cmd = parse(b"A;aid=14;cl=line").unwrap();
        assert_eq!(cmd.action, SemanticPromptAction::PromptStart);
        assert_eq!(cmd.options.aid.as_deref(), Some("14"));
        assert_eq!(cmd.options.cl.as_deref(), Some("line"));
    }

    #[test]
    fn command_end_with_bare_exit_code() {
        let cmd = parse(b"D;0").unwrap();
        assert_eq!(cmd.action, SemanticPromptAction::CommandEnd);
        assert_eq!(cmd.options.exit_code, Some(0));
    }

    #[test]
    fn unknown_option_is_ignored_not_fatal() {
        let cmd = parse(b"B;bogus=1;aid=9").unwrap();
        assert_eq!(cmd.action, SemanticPromptAction::Input);
        assert_eq!(cmd.options.aid.as_deref(), Some("9"));
    }
}
