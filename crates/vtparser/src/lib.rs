//! Byte-at-a-time parsing of the ECMA-48 / VT500-family escape sequence
//! grammar into a tagged-union [`Action`] stream.
//!
//! The parser never fails: malformed or unrecognized sequences are
//! absorbed by an ignore state and the byte stream keeps flowing. Higher
//! layers (see `vtterm::Stream`) own the actual semantics of each action;
//! this crate only recognizes structure.

mod action;
mod params;
mod parser;
mod state;
mod utf8;

pub use action::{Action, Intermediates, Terminator};
pub use params::{CsiParams, MAX_PARAMS};
pub use parser::Parser;

#[cfg(test)]
mod tests {
    use super::*;

    fn run(bytes: &[u8]) -> Vec<Action> {
        let mut parser = Parser::new();
        let mut actions = Vec::new();
        parser.advance_bytes(bytes, |a| actions.push(a));
        actions
    }

    #[test]
    fn plain_print_round_trip() {
        let actions = run(b"hi");
        assert_eq!(actions, vec![Action::Print('h'), Action::Print('i')]);
    }

    #[test]
    fn utf8_multibyte_print() {
        let actions = run("é".as_bytes());
        assert_eq!(actions, vec![Action::Print('é')]);
    }

    #[test]
    fn c0_execute_in_ground() {
        let actions = run(b"a\nb");
        assert_eq!(
            actions,
            vec![Action::Print('a'), Action::Execute(b'\n'), Action::Print('b')]
        );
    }

    #[test]
    fn csi_sgr_with_semicolons() {
        let actions = run(b"\x1b[1;31m");
        match &actions[..] {
            [Action::CsiDispatch { params, final_byte, private_marker, intermediates }] => {
                assert_eq!(*final_byte, b'm');
                assert_eq!(*private_marker, None);
                assert!(intermediates.is_empty());
                assert_eq!(params.as_slice(), &[1, 31]);
            }
            other => panic!("unexpected actions: {other:?}"),
        }
    }

    #[test]
    fn csi_sgr_with_colon_subparams() {
        // `38:2::r:g:b` — truecolor foreground with empty colorspace id.
        let actions = run(b"\x1b[38:2::10:20:30m");
        match &actions[..] {
            [Action::CsiDispatch { params, final_byte, .. }] => {
                assert_eq!(*final_byte, b'm');
                let groups: Vec<&[u16]> = params.groups().collect();
                assert_eq!(groups, vec![&[38u16, 2, 0, 10, 20, 30][..]]);
            }
            other => panic!("unexpected actions: {other:?}"),
        }
    }

    #[test]
    fn csi_private_marker_and_intermediate() {
        let actions = run(b"\x1b[?1049h");
        match &actions[..] {
            [Action::CsiDispatch { private_marker, params, final_byte, .. }] => {
                assert_eq!(*private_marker, Some(b'?'));
                assert_eq!(params.as_slice(), &[1049]);
                assert_eq!(*final_byte, b'h');
            }
            other => panic!("unexpected actions: {other:?}"),
        }
    }

    #[test]
    fn osc_with_bel_terminator() {
        let actions = run(b"\x1b]0;title\x07");
        assert_eq!(actions[0], Action::OscStart);
        assert_eq!(
            &actions[1..9],
            &[
                Action::OscPut(b'0'),
                Action::OscPut(b';'),
                Action::OscPut(b't'),
                Action::OscPut(b'i'),
                Action::OscPut(b't'),
                Action::OscPut(b'l'),
                Action::OscPut(b'e'),
                Action::OscEnd(Terminator::Bel),
            ]
        );
    }

    #[test]
    fn osc_with_st_terminator() {
        let actions = run(b"\x1b]8;;http://x\x1b\\");
        assert_eq!(*actions.last().unwrap(), Action::OscEnd(Terminator::St));
    }

    #[test]
    fn dcs_hook_put_unhook() {
        let actions = run(b"\x1bP1$qq\x1b\\");
        assert!(matches!(actions[0], Action::DcsHook { final_byte: b'q', .. }));
        assert!(actions.iter().any(|a| matches!(a, Action::DcsPut(b'q'))));
        assert_eq!(*actions.last().unwrap(), Action::DcsUnhook);
    }

    #[test]
    fn overflowed_params_are_ignored_but_sequence_still_dispatches() {
        let mut seq = Vec::from(*b"\x1b[");
        for _ in 0..20 {
            seq.extend_from_slice(b"9;");
        }
        seq.push(b'm');
        let actions = run(&seq);
        match &actions[..] {
            [Action::CsiDispatch { params, .. }] => {
                assert!(params.len() <= MAX_PARAMS);
                assert!(params.overflowed());
            }
            other => panic!("unexpected actions: {other:?}"),
        }
    }

    #[test]
    fn can_aborts_an_in_progress_csi_sequence() {
        let actions = run(b"\x1b[1;2\x18m");
        // CAN (0x18) cancels the CSI; the trailing `m` is printed fresh
        // from ground rather than completing the sequence.
        assert_eq!(actions, vec![Action::Execute(0x18), Action::Print('m')]);
    }

    #[test]
    fn malformed_utf8_resyncs() {
        // A lone continuation byte followed by a valid ASCII byte.
        let actions = run(&[0x80, b'x']);
        assert_eq!(
            actions,
            vec![Action::Print(char::REPLACEMENT_CHARACTER), Action::Print('x')]
        );
    }

    #[test]
    fn new_escape_during_osc_abandons_it_and_starts_fresh() {
        let actions = run(b"\x1b]0;abc\x1b[2J");
        assert_eq!(actions[0], Action::OscStart);
        assert!(actions.contains(&Action::OscEnd(Terminator::Cancelled)));
        assert!(actions
            .iter()
            .any(|a| matches!(a, Action::CsiDispatch { final_byte: b'J', .. })));
    }
}
