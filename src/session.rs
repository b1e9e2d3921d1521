//! Session state owned by the main window.

use crate::dictionary::Dictionary;
use crate::input::{self, CharEvent, InputSequence, RenderFlags};
use crate::render::{self, Frame};

/// Typed sequence, paint gates and dictionary for one run of the program.
#[derive(Debug, Default)]
pub struct Session {
    sequence: InputSequence,
    flags: RenderFlags,
    dictionary: Dictionary,
    ignore_key_repeat: bool,
}

impl Session {
    pub fn new(dictionary: Dictionary, ignore_key_repeat: bool) -> Self {
        Self {
            sequence: InputSequence::new(),
            flags: RenderFlags::default(),
            dictionary,
            ignore_key_repeat,
        }
    }

    /// Applies a character event. Returns `true` if a repaint should be scheduled.
    #[cfg_attr(not(windows), allow(dead_code))]
    pub fn handle_char(&mut self, event: CharEvent) -> bool {
        input::handle_char(
            event,
            &mut self.sequence,
            &mut self.flags,
            self.ignore_key_repeat,
        )
    }

    /// Decides the next paint. Both paint gates are clear afterwards.
    #[cfg_attr(not(windows), allow(dead_code))]
    pub fn paint(&mut self) -> Frame {
        render::decide(&self.sequence, &mut self.flags, &self.dictionary)
    }

    #[allow(dead_code)]
    pub fn sequence(&self) -> &InputSequence {
        &self.sequence
    }

    #[allow(dead_code)]
    pub fn flags(&self) -> RenderFlags {
        self.flags
    }

    #[allow(dead_code)]
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyFlags;
    use crate::render::RenderBranch;
    use std::path::PathBuf;

    fn session() -> Session {
        let mut dictionary = Dictionary::default();
        dictionary.insert("a", PathBuf::from("/sounds/a.wav"));
        dictionary.insert("t", PathBuf::from("/sounds/t.wav"));
        Session::new(dictionary, true)
    }

    fn type_str(session: &mut Session, keys: &str) {
        for ch in keys.chars() {
            session.handle_char(CharEvent::press(ch));
        }
    }

    #[test]
    fn typing_then_painting() {
        let mut session = session();
        type_str(&mut session, "Cat");
        assert_eq!(session.sequence().as_str(), "cat");

        let frame = session.paint();
        assert_eq!(frame.text, "cat");
        assert_eq!(frame.sound(), Some(&PathBuf::from("/sounds/t.wav")));
        assert_eq!(session.flags(), RenderFlags::default());
    }

    #[test]
    fn flags_are_clear_after_every_paint() {
        let mut session = session();
        for keys in ["a", "b", "\u{8}", "\r", "", "xa\u{8}"] {
            type_str(&mut session, keys);
            session.paint();
            assert_eq!(session.flags(), RenderFlags::default(), "after {:?}", keys);
        }
    }

    #[test]
    fn ignored_keys_do_not_request_repaint() {
        let mut session = session();
        assert!(!session.handle_char(CharEvent::press('7')));
        assert!(!session.handle_char(CharEvent::new('a' as u32, KeyFlags::from_raw(1 << 30))));
        assert!(session.handle_char(CharEvent::press('a')));
        assert!(session.handle_char(CharEvent::press('\u{8}')));
        assert!(!session.handle_char(CharEvent::press('\u{8}')));
        assert!(session.sequence().is_empty());
        assert_eq!(session.flags(), RenderFlags { needs_redraw: true, last_edit_was_backspace: true });
    }

    #[test]
    fn repeats_pass_when_guard_is_off() {
        let mut session = Session::new(Dictionary::default(), false);
        let held = CharEvent::new('z' as u32, KeyFlags::from_raw(1 << 30));
        assert!(session.handle_char(held));
        assert!(session.handle_char(held));
        assert_eq!(session.sequence().as_str(), "zz");
        assert_eq!(session.paint().branch, RenderBranch::Default);
        assert!(session.dictionary().is_empty());
    }
}
