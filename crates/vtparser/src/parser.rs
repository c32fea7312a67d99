//! The DFA itself: state transitions over the VT500-family grammar.

use crate::action::{Action, Intermediates, Terminator};
use crate::params::CsiParams;
use crate::state::State;
use crate::utf8::{Step, Utf8Decoder};

const MAX_INTERMEDIATES: usize = 2;

/// A byte-at-a-time parser. Feed it bytes via [`Parser::advance`]; it calls
/// `emit` zero or more times per byte with the [`Action`]s that byte
/// produced.
///
/// Holds no allocations beyond its inline parameter/intermediate buffers,
/// so it's cheap to keep one per logical input stream (e.g. one per pane).
#[derive(Debug, Default)]
pub struct Parser {
    state: State,
    params: CsiParams,
    intermediates: Intermediates,
    private_marker: Option<u8>,
    utf8: Utf8Decoder,
    /// The string state `StringEscape` should return to (or finish) once
    /// it knows whether the pending `ESC` was the start of `ST`.
    string_return: State,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a single byte through the state machine.
    pub fn advance<F: FnMut(Action)>(&mut self, byte: u8, mut emit: F) {
        self.advance_inner(byte, &mut emit);
    }

    /// Feed a run of bytes through the state machine.
    pub fn advance_bytes<F: FnMut(Action)>(&mut self, bytes: &[u8], mut emit: F) {
        for &byte in bytes {
            self.advance_inner(byte, &mut emit);
        }
    }

    fn advance_inner(&mut self, byte: u8, emit: &mut dyn FnMut(Action)) {
        // CAN/SUB abort whatever sequence is in progress from any state
        // other than ground, where they're just ordinary control bytes.
        if matches!(byte, 0x18 | 0x1a) && self.state != State::Ground {
            self.abort_current(emit);
            emit(Action::Execute(byte));
            self.to_ground();
            return;
        }

        match self.state {
            State::Ground => self.ground(byte, emit),
            State::Escape => self.escape(byte, emit),
            State::EscapeIntermediate => self.escape_intermediate(byte, emit),
            State::CsiEntry => self.csi_entry(byte, emit),
            State::CsiParam => self.csi_param(byte, emit),
            State::CsiIntermediate => self.csi_intermediate(byte, emit),
            State::CsiIgnore => self.csi_ignore(byte, emit),
            State::DcsEntry => self.dcs_entry(byte, emit),
            State::DcsParam => self.dcs_param(byte, emit),
            State::DcsIntermediate => self.dcs_intermediate(byte, emit),
            State::DcsPassthrough => self.dcs_passthrough(byte, emit),
            State::DcsIgnore => self.dcs_ignore(byte, emit),
            State::OscString => self.osc_string(byte, emit),
            State::ApcString => self.apc_string(byte, emit),
            State::SosPmApcString => self.sos_pm_apc_string(byte),
            State::StringEscape => self.string_escape(byte, emit),
        }
    }

    fn to_ground(&mut self) {
        self.state = State::Ground;
    }

    fn enter_escape(&mut self) {
        self.params.clear();
        self.intermediates.clear();
        self.private_marker = None;
        self.state = State::Escape;
    }

    /// Cleanly close whatever string/passthrough the parser was mid-way
    /// through, so a `CAN`/`SUB` abort or an unrelated new introducer
    /// leaves the consumer's buffers (e.g. a DCS handler) in a known
    /// state rather than silently truncated.
    fn abort_current(&mut self, emit: &mut dyn FnMut(Action)) {
        let closing = if self.state == State::StringEscape { self.string_return } else { self.state };
        match closing {
            State::OscString => emit(Action::OscEnd(Terminator::Cancelled)),
            State::ApcString => emit(Action::ApcEnd),
            State::DcsPassthrough => emit(Action::DcsUnhook),
            _ => {}
        }
    }

    fn is_c0_execute(byte: u8) -> bool {
        matches!(byte, 0x00..=0x17 | 0x19 | 0x1c..=0x1f)
    }

    fn push_intermediate(&mut self, byte: u8) {
        if self.intermediates.len() < MAX_INTERMEDIATES {
            self.intermediates.push(byte);
        }
    }

    // -- ground --------------------------------------------------------

    fn ground(&mut self, byte: u8, emit: &mut dyn FnMut(Action)) {
        if byte == 0x1b {
            self.enter_escape();
            return;
        }
        if Self::is_c0_execute(byte) || byte == 0x7f {
            emit(Action::Execute(byte));
            return;
        }
        if (0x20..=0x7e).contains(&byte) {
            emit(Action::Print(byte as char));
            return;
        }
        // 0x80..=0xff: route through the UTF-8 decoder.
        match self.utf8.feed(byte) {
            Step::Pending => {}
            Step::Char(c) => emit(Action::Print(c)),
            Step::InvalidConsumed => emit(Action::Print(char::REPLACEMENT_CHARACTER)),
            Step::InvalidRetry(retry) => {
                emit(Action::Print(char::REPLACEMENT_CHARACTER));
                self.advance_inner(retry, emit);
            }
        }
    }

    // -- escape ----------------------------------------------------------

    fn escape(&mut self, byte: u8, emit: &mut dyn FnMut(Action)) {
        if Self::is_c0_execute(byte) {
            emit(Action::Execute(byte));
            return;
        }
        match byte {
            0x1b => self.enter_escape(),
            0x20..=0x2f => {
                self.push_intermediate(byte);
                self.state = State::EscapeIntermediate;
            }
            0x50 => {
                self.params.clear();
                self.intermediates.clear();
                self.private_marker = None;
                self.state = State::DcsEntry;
            }
            0x5b => {
                self.params.clear();
                self.intermediates.clear();
                self.private_marker = None;
                self.state = State::CsiEntry;
            }
            0x5d => {
                self.state = State::OscString;
                emit(Action::OscStart);
            }
            0x5f => {
                self.state = State::ApcString;
                emit(Action::ApcStart);
            }
            0x58 | 0x5e => self.state = State::SosPmApcString,
            0x30..=0x7e => {
                let intermediates = std::mem::take(&mut self.intermediates);
                emit(Action::EscDispatch { intermediates, final_byte: byte });
                self.to_ground();
            }
            0x7f => {}
            _ => self.to_ground(),
        }
    }

    fn escape_intermediate(&mut self, byte: u8, emit: &mut dyn FnMut(Action)) {
        if Self::is_c0_execute(byte) {
            emit(Action::Execute(byte));
            return;
        }
        match byte {
            0x20..=0x2f => self.push_intermediate(byte),
            0x30..=0x7e => {
                let intermediates = std::mem::take(&mut self.intermediates);
                emit(Action::EscDispatch { intermediates, final_byte: byte });
                self.to_ground();
            }
            0x7f => {}
            _ => self.to_ground(),
        }
    }

    // -- csi -------------------------------------------------------------

    fn csi_entry(&mut self, byte: u8, emit: &mut dyn FnMut(Action)) {
        if Self::is_c0_execute(byte) {
            emit(Action::Execute(byte));
            return;
        }
        match byte {
            0x30..=0x39 => {
                self.params.digit(byte);
                self.state = State::CsiParam;
            }
            0x3b => {
                self.params.semicolon();
                self.state = State::CsiParam;
            }
            0x3a => {
                self.params.colon();
                self.state = State::CsiParam;
            }
            0x3c..=0x3f => {
                self.private_marker = Some(byte);
                self.state = State::CsiParam;
            }
            0x20..=0x2f => {
                self.push_intermediate(byte);
                self.state = State::CsiIntermediate;
            }
            0x40..=0x7e => self.finish_csi(byte, emit),
            0x7f => {}
            _ => self.state = State::CsiIgnore,
        }
    }

    fn csi_param(&mut self, byte: u8, emit: &mut dyn FnMut(Action)) {
        if Self::is_c0_execute(byte) {
            emit(Action::Execute(byte));
            return;
        }
        match byte {
            0x30..=0x39 => self.params.digit(byte),
            0x3b => self.params.semicolon(),
            0x3a => self.params.colon(),
            0x3c..=0x3f => self.state = State::CsiIgnore,
            0x20..=0x2f => {
                self.push_intermediate(byte);
                self.state = State::CsiIntermediate;
            }
            0x40..=0x7e => self.finish_csi(byte, emit),
            0x7f => {}
            _ => self.state = State::CsiIgnore,
        }
    }

    fn csi_intermediate(&mut self, byte: u8, emit: &mut dyn FnMut(Action)) {
        if Self::is_c0_execute(byte) {
            emit(Action::Execute(byte));
            return;
        }
        match byte {
            0x20..=0x2f => self.push_intermediate(byte),
            0x40..=0x7e => self.finish_csi(byte, emit),
            0x7f => {}
            _ => self.state = State::CsiIgnore,
        }
    }

    fn csi_ignore(&mut self, byte: u8, emit: &mut dyn FnMut(Action)) {
        if Self::is_c0_execute(byte) {
            emit(Action::Execute(byte));
            return;
        }
        match byte {
            0x40..=0x7e => self.to_ground(),
            0x7f => {}
            _ => {}
        }
    }

    fn finish_csi(&mut self, final_byte: u8, emit: &mut dyn FnMut(Action)) {
        self.params.finish();
        let params = std::mem::take(&mut self.params);
        let intermediates = std::mem::take(&mut self.intermediates);
        let private_marker = self.private_marker.take();
        emit(Action::CsiDispatch { intermediates, params, final_byte, private_marker });
        self.to_ground();
    }

    // -- dcs ---------------------------------------------------------------

    fn dcs_entry(&mut self, byte: u8, emit: &mut dyn FnMut(Action)) {
        if Self::is_c0_execute(byte) {
            return;
        }
        match byte {
            0x30..=0x39 => {
                self.params.digit(byte);
                self.state = State::DcsParam;
            }
            0x3b => {
                self.params.semicolon();
                self.state = State::DcsParam;
            }
            0x3a => {
                self.params.colon();
                self.state = State::DcsParam;
            }
            0x3c..=0x3f => {
                self.private_marker = Some(byte);
                self.state = State::DcsParam;
            }
            0x20..=0x2f => {
                self.push_intermediate(byte);
                self.state = State::DcsIntermediate;
            }
            0x40..=0x7e => self.finish_dcs(byte, emit),
            0x7f => {}
            _ => self.state = State::DcsIgnore,
        }
    }

    fn dcs_param(&mut self, byte: u8, emit: &mut dyn FnMut(Action)) {
        if Self::is_c0_execute(byte) {
            return;
        }
        match byte {
            0x30..=0x39 => self.params.digit(byte),
            0x3b => self.params.semicolon(),
            0x3a => self.params.colon(),
            0x3c..=0x3f => self.state = State::DcsIgnore,
            0x20..=0x2f => {
                self.push_intermediate(byte);
                self.state = State::DcsIntermediate;
            }
            0x40..=0x7e => self.finish_dcs(byte, emit),
            0x7f => {}
            _ => self.state = State::DcsIgnore,
        }
    }

    fn dcs_intermediate(&mut self, byte: u8, emit: &mut dyn FnMut(Action)) {
        if Self::is_c0_execute(byte) {
            return;
        }
        match byte {
            0x20..=0x2f => self.push_intermediate(byte),
            0x40..=0x7e => self.finish_dcs(byte, emit),
            0x7f => {}
            _ => self.state = State::DcsIgnore,
        }
    }

    fn finish_dcs(&mut self, final_byte: u8, emit: &mut dyn FnMut(Action)) {
        self.params.finish();
        let params = std::mem::take(&mut self.params);
        let intermediates = std::mem::take(&mut self.intermediates);
        let private_marker = self.private_marker.take();
        emit(Action::DcsHook { intermediates, params, final_byte, private_marker });
        self.state = State::DcsPassthrough;
    }

    fn dcs_passthrough(&mut self, byte: u8, emit: &mut dyn FnMut(Action)) {
        if byte == 0x1b {
            self.string_return = State::DcsPassthrough;
            self.state = State::StringEscape;
            return;
        }
        emit(Action::DcsPut(byte));
    }

    fn dcs_ignore(&mut self, byte: u8, emit: &mut dyn FnMut(Action)) {
        let _ = emit;
        if byte == 0x1b {
            self.string_return = State::DcsIgnore;
            self.state = State::StringEscape;
        }
    }

    fn osc_string(&mut self, byte: u8, emit: &mut dyn FnMut(Action)) {
        match byte {
            0x07 => {
                emit(Action::OscEnd(Terminator::Bel));
                self.to_ground();
            }
            0x1b => {
                self.string_return = State::OscString;
                self.state = State::StringEscape;
            }
            _ => emit(Action::OscPut(byte)),
        }
    }

    fn apc_string(&mut self, byte: u8, emit: &mut dyn FnMut(Action)) {
        if byte == 0x1b {
            self.string_return = State::ApcString;
            self.state = State::StringEscape;
            return;
        }
        emit(Action::ApcPut(byte));
    }

    fn sos_pm_apc_string(&mut self, byte: u8) {
        if byte == 0x1b {
            self.string_return = State::SosPmApcString;
            self.state = State::StringEscape;
        }
    }

    /// Resolve the `ESC` seen mid-string: `\` closes it with `ST`; any
    /// other byte abandons the string (emitting a `Cancelled` close, or
    /// `DcsUnhook`/`ApcEnd` with no further payload) and is reprocessed
    /// as a fresh byte from `Escape`.
    fn string_escape(&mut self, byte: u8, emit: &mut dyn FnMut(Action)) {
        if byte == 0x5c {
            match self.string_return {
                State::OscString => emit(Action::OscEnd(Terminator::St)),
                State::ApcString => emit(Action::ApcEnd),
                State::DcsPassthrough => emit(Action::DcsUnhook),
                State::DcsIgnore | State::SosPmApcString => {}
                _ => {}
            }
            self.to_ground();
            return;
        }
        match self.string_return {
            State::OscString => emit(Action::OscEnd(Terminator::Cancelled)),
            State::ApcString => emit(Action::ApcEnd),
            State::DcsPassthrough => emit(Action::DcsUnhook),
            State::DcsIgnore | State::SosPmApcString => {}
            _ => {}
        }
        self.enter_escape();
        self.escape(byte, emit);
    }
}
