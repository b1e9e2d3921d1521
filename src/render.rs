//! Paint decision.
//!
//! Picks the background and the sound for one paint from the typed sequence,
//! the dictionary and the paint gates. Drawing itself is left to the window.

use crate::dictionary::Dictionary;
use crate::input::{InputSequence, RenderFlags};
use std::path::PathBuf;

/// Which of the two paint styles to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderBranch {
    /// Last letter is a known key: red background.
    Match {
        #[allow(dead_code)]
        key: String,
        /// Sound to play, `None` when the edit that led here was a backspace.
        sound: Option<PathBuf>,
    },
    /// Window color background, no sound.
    Default,
}

/// Everything the window needs for one paint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub text: String,
    pub branch: RenderBranch,
}

#[cfg_attr(not(windows), allow(dead_code))]
impl Frame {
    pub fn is_match(&self) -> bool {
        matches!(self.branch, RenderBranch::Match { .. })
    }

    pub fn sound(&self) -> Option<&PathBuf> {
        match &self.branch {
            RenderBranch::Match { sound, .. } => sound.as_ref(),
            RenderBranch::Default => None,
        }
    }
}

/// Decides the next paint and resets `flags`.
pub fn decide(sequence: &InputSequence, flags: &mut RenderFlags, dictionary: &Dictionary) -> Frame {
    let branch = match_branch(sequence, flags, dictionary).unwrap_or(RenderBranch::Default);
    flags.reset();

    log::debug!("Paint \"{}\": {:?}", sequence.as_str(), branch);
    Frame {
        text: sequence.as_str().to_string(),
        branch,
    }
}

fn match_branch(
    sequence: &InputSequence,
    flags: &RenderFlags,
    dictionary: &Dictionary,
) -> Option<RenderBranch> {
    if !flags.needs_redraw {
        return None;
    }
    let key = sequence.last_char()?.to_string();
    let entry = dictionary.get(&key)?;
    let sound = (!flags.last_edit_was_backspace).then(|| entry.sound_path.clone());
    Some(RenderBranch::Match { key, sound })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{handle_char, CharEvent};

    fn dictionary() -> Dictionary {
        let mut dictionary = Dictionary::default();
        dictionary.insert("a", PathBuf::from("snd_a.wav"));
        dictionary
    }

    fn typed(keys: &str) -> (InputSequence, RenderFlags) {
        let mut sequence = InputSequence::new();
        let mut flags = RenderFlags::default();
        for ch in keys.chars() {
            handle_char(CharEvent::press(ch), &mut sequence, &mut flags, true);
        }
        (sequence, flags)
    }

    #[test]
    fn last_letter_in_dictionary_matches_and_plays() {
        let (sequence, mut flags) = typed("ba");
        let frame = decide(&sequence, &mut flags, &dictionary());

        assert_eq!(frame.text, "ba");
        assert_eq!(
            frame.branch,
            RenderBranch::Match {
                key: "a".to_string(),
                sound: Some(PathBuf::from("snd_a.wav")),
            }
        );
        assert_eq!(flags, RenderFlags::default());
    }

    #[test]
    fn unmatched_last_letter_is_default() {
        let (sequence, mut flags) = typed("ab");
        let frame = decide(&sequence, &mut flags, &dictionary());

        assert_eq!(frame.text, "ab");
        assert_eq!(frame.branch, RenderBranch::Default);
        assert_eq!(frame.sound(), None);
        assert_eq!(flags, RenderFlags::default());
    }

    #[test]
    fn backspace_into_match_is_silent() {
        let (sequence, mut flags) = typed("ab\u{8}");
        assert_eq!(sequence.as_str(), "a");

        let frame = decide(&sequence, &mut flags, &dictionary());
        assert!(frame.is_match());
        assert_eq!(frame.sound(), None);
        assert_eq!(flags, RenderFlags::default());
    }

    #[test]
    fn repaint_without_edit_is_default() {
        let (sequence, mut flags) = typed("a");
        let first = decide(&sequence, &mut flags, &dictionary());
        assert!(first.is_match());

        let second = decide(&sequence, &mut flags, &dictionary());
        assert_eq!(second.branch, RenderBranch::Default);
        assert_eq!(second.text, "a");
    }

    #[test]
    fn empty_sequence_is_default() {
        let (sequence, mut flags) = typed("a\r");
        assert!(flags.needs_redraw);

        let frame = decide(&sequence, &mut flags, &dictionary());
        assert_eq!(frame.text, "");
        assert_eq!(frame.branch, RenderBranch::Default);
    }

    #[test]
    fn only_the_last_letter_is_looked_up() {
        let mut dictionary = Dictionary::default();
        dictionary.insert("cat", PathBuf::from("cat.wav"));

        let (sequence, mut flags) = typed("cat");
        let frame = decide(&sequence, &mut flags, &dictionary);
        assert_eq!(frame.branch, RenderBranch::Default);
    }
}
