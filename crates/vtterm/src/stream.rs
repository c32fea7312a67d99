//! The `Stream` dispatcher (§4.3): owns the byte-level [`Parser`] plus the
//! OSC/DCS/APC payload buffers, and turns each [`Action`] into a call on
//! [`Terminal`]. Charset translation of printed codepoints happens here,
//! just before handing the translated codepoint to the executor.

use vtparser::{Action, Parser, Terminator};

use crate::error::ResourceError;
use crate::print::{classify_width, PrintWidth};
use crate::terminal::{Terminal, MAX_APC_PAYLOAD, MAX_DCS_PAYLOAD, MAX_OSC_PAYLOAD};

/// A `DcsHook` action's framing, held until the matching `DcsUnhook` so the
/// accumulated payload can be dispatched alongside it.
#[derive(Debug, Clone)]
struct DcsHook {
    intermediates: vtparser::Intermediates,
    params: vtparser::CsiParams,
    final_byte: u8,
}

/// Per-stream parser state: the DFA itself plus growable, capped buffers
/// for the three string-payload sequence kinds. One `Stream` per logical
/// input (one per [`Terminal`]); never shared across threads.
#[derive(Default)]
pub(crate) struct Stream {
    parser: Parser,
    osc_payload: Vec<u8>,
    osc_overflowed: bool,
    dcs_hook: Option<DcsHook>,
    dcs_payload: Vec<u8>,
    dcs_overflowed: bool,
    apc_payload: Vec<u8>,
    apc_overflowed: bool,
}

impl Stream {
    /// Feed `bytes` through the parser, applying every resulting action to
    /// `terminal`. The parser is taken out of `self` for the duration of
    /// the call so the dispatch closure can hold `&mut self` at the same
    /// time as `&mut Terminal`.
    pub(crate) fn feed(&mut self, bytes: &[u8], terminal: &mut Terminal) -> Result<(), ResourceError> {
        let mut parser = std::mem::take(&mut self.parser);
        let mut error = None;
        parser.advance_bytes(bytes, |action| {
            if error.is_some() {
                return;
            }
            if let Err(err) = self.apply(action, terminal) {
                error = Some(err);
            }
        });
        self.parser = parser;
        match error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn apply(&mut self, action: Action, terminal: &mut Terminal) -> Result<(), ResourceError> {
        match action {
            Action::Print(cp) => self.print(cp, terminal),
            Action::Execute(byte) => terminal.handle_execute(byte),
            Action::CsiDispatch { intermediates, params, final_byte, private_marker } => {
                terminal.handle_csi(&intermediates, &params, final_byte, private_marker);
            }
            Action::EscDispatch { intermediates, final_byte } => {
                terminal.handle_esc(&intermediates, final_byte);
            }
            Action::OscStart => {
                self.osc_payload.clear();
                self.osc_overflowed = false;
            }
            Action::OscPut(byte) => {
                if self.osc_payload.len() < MAX_OSC_PAYLOAD {
                    self.osc_payload.push(byte);
                } else {
                    self.osc_overflowed = true;
                }
            }
            Action::OscEnd(terminator) => return self.finish_osc(terminator, terminal),
            Action::DcsHook { intermediates, params, final_byte, private_marker: _ } => {
                self.dcs_payload.clear();
                self.dcs_overflowed = false;
                self.dcs_hook = Some(DcsHook { intermediates, params, final_byte });
            }
            Action::DcsPut(byte) => {
                if self.dcs_payload.len() < MAX_DCS_PAYLOAD {
                    self.dcs_payload.push(byte);
                } else {
                    self.dcs_overflowed = true;
                }
            }
            Action::DcsUnhook => return self.finish_dcs(terminal),
            Action::ApcStart => {
                self.apc_payload.clear();
                self.apc_overflowed = false;
            }
            Action::ApcPut(byte) => {
                if self.apc_payload.len() < MAX_APC_PAYLOAD {
                    self.apc_payload.push(byte);
                } else {
                    self.apc_overflowed = true;
                }
            }
            Action::ApcEnd => return self.finish_apc(terminal),
        }
        Ok(())
    }

    /// Translate `cp` through the active charset slot (consuming any
    /// pending single-shift) before handing it to the executor, then
    /// track it for `REP` if it actually occupied a cell.
    fn print(&mut self, cp: char, terminal: &mut Terminal) {
        let charset = terminal.active_screen_mut().charset.active_and_consume_single_shift();
        let translated = charset.translate(cp);
        terminal.print_char(translated);
        if matches!(classify_width(translated), PrintWidth::Narrow | PrintWidth::Wide) {
            terminal.set_last_printed(translated);
        }
    }

    fn finish_osc(&mut self, terminator: Terminator, terminal: &mut Terminal) -> Result<(), ResourceError> {
        let overflowed = std::mem::take(&mut self.osc_overflowed);
        let payload = std::mem::take(&mut self.osc_payload);
        if overflowed {
            return Err(ResourceError::PayloadTooLarge { limit: MAX_OSC_PAYLOAD });
        }
        if !matches!(terminator, Terminator::Cancelled) {
            let command = vtosc::parse(&payload);
            terminal.handle_osc(command, terminator);
        }
        Ok(())
    }

    fn finish_dcs(&mut self, terminal: &mut Terminal) -> Result<(), ResourceError> {
        let hook = self.dcs_hook.take();
        let overflowed = std::mem::take(&mut self.dcs_overflowed);
        let payload = std::mem::take(&mut self.dcs_payload);
        let Some(hook) = hook else { return Ok(()) };
        if overflowed {
            return Err(ResourceError::PayloadTooLarge { limit: MAX_DCS_PAYLOAD });
        }
        terminal.handle_dcs(&hook.intermediates, &hook.params, hook.final_byte, &payload);
        Ok(())
    }

    fn finish_apc(&mut self, terminal: &mut Terminal) -> Result<(), ResourceError> {
        let overflowed = std::mem::take(&mut self.apc_overflowed);
        let payload = std::mem::take(&mut self.apc_payload);
        if overflowed {
            return Err(ResourceError::PayloadTooLarge { limit: MAX_APC_PAYLOAD });
        }
        terminal.handle_apc(&payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::options::TerminalOptions;
    use crate::terminal::Terminal;

    #[test]
    fn dec_special_graphics_translates_print() {
        let mut term = Terminal::new(TerminalOptions::default());
        term.write(b"\x1b(0").unwrap();
        term.write(b"q").unwrap();
        let screen = term.active_screen();
        let (node, _) = screen.pages().node_for_active_row(0);
        let cell = *screen.pages().page(node).unwrap().row(0).cell(0);
        assert_eq!(cell.codepoint, '\u{2500}' as u32);
    }

    #[test]
    fn oversized_osc_payload_surfaces_as_resource_error() {
        let mut term = Terminal::new(TerminalOptions::default());
        let mut payload = Vec::from(&b"\x1b]0;"[..]);
        payload.extend(std::iter::repeat(b'x').take(super::MAX_OSC_PAYLOAD + 16));
        payload.extend_from_slice(b"\x07");
        assert!(term.write(&payload).is_err());
    }
}
