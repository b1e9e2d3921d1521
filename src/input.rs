//! Keystroke handling.
//!
//! Turns character events into edits of the typed sequence.

/// Carriage return, sent for Enter.
const CHAR_ENTER: u32 = 0x0D;
/// Backspace.
const CHAR_BACKSPACE: u32 = 0x08;

/// Bit 30 of the character message flags: the key was already down.
const FLAG_PREVIOUS_STATE: u32 = 1 << 30;
/// Bit 31 of the character message flags: the key is being released.
const FLAG_TRANSITION: u32 = 1 << 31;

/// Repeat / transition state carried with a character event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyFlags {
    /// Auto-repeat of a held key.
    pub repeat: bool,
    /// Key release.
    pub released: bool,
}

impl KeyFlags {
    /// Decodes the flags word that accompanies a character message.
    #[cfg_attr(not(windows), allow(dead_code))]
    pub fn from_raw(raw: isize) -> Self {
        let raw = raw as u32;
        Self {
            repeat: raw & FLAG_PREVIOUS_STATE != 0,
            released: raw & FLAG_TRANSITION != 0,
        }
    }

    fn already_handled(&self) -> bool {
        self.repeat || self.released
    }
}

/// One character event from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharEvent {
    pub code: u32,
    pub flags: KeyFlags,
}

impl CharEvent {
    pub fn new(code: u32, flags: KeyFlags) -> Self {
        Self { code, flags }
    }

    /// A fresh key press with no repeat or release flag.
    #[allow(dead_code)]
    pub fn press(ch: char) -> Self {
        Self::new(ch as u32, KeyFlags::default())
    }
}

/// What a character event does to the sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Edit {
    Clear,
    DeleteLast,
    Append(char),
}

impl Edit {
    fn classify(code: u32) -> Option<Self> {
        match code {
            CHAR_ENTER => Some(Edit::Clear),
            CHAR_BACKSPACE => Some(Edit::DeleteLast),
            _ => char::from_u32(code)
                .filter(|c| c.is_alphabetic())
                .map(Edit::Append),
        }
    }
}

/// Paint gates set by edits and reset after every paint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderFlags {
    pub needs_redraw: bool,
    pub last_edit_was_backspace: bool,
}

impl RenderFlags {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Everything typed since the last Enter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSequence {
    text: String,
}

impl InputSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of characters (not bytes).
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn last_char(&self) -> Option<char> {
        self.text.chars().next_back()
    }

    /// Appends the lowercase form of `ch`, always exactly one character.
    ///
    /// Letters whose lowercase spans several characters keep only the first.
    pub fn push(&mut self, ch: char) {
        self.text.push(ch.to_lowercase().next().unwrap_or(ch));
    }

    /// Removes the last character. No-op when empty.
    pub fn pop(&mut self) -> Option<char> {
        self.text.pop()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

/// Applies one character event.
///
/// Returns `true` when the host should schedule a repaint. Flagged repeats are
/// dropped before the character is looked at when `ignore_repeat` is set.
pub fn handle_char(
    event: CharEvent,
    sequence: &mut InputSequence,
    flags: &mut RenderFlags,
    ignore_repeat: bool,
) -> bool {
    if ignore_repeat && event.flags.already_handled() {
        log::trace!("Ignoring repeated key {:#x}", event.code);
        return false;
    }

    let Some(edit) = Edit::classify(event.code) else {
        log::trace!("Ignoring key {:#x}", event.code);
        return false;
    };

    match edit {
        Edit::Clear => sequence.clear(),
        Edit::DeleteLast => {
            if sequence.pop().is_none() {
                log::trace!("Backspace on empty sequence");
                return false;
            }
            flags.last_edit_was_backspace = true;
        }
        Edit::Append(ch) => sequence.push(ch),
    }
    flags.needs_redraw = true;

    log::debug!("{:?} -> \"{}\"", edit, sequence.as_str());
    true
}
