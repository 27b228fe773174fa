use clavier_keyboard::NOTES_PER_OCTAVE;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    N0,
    N1,
    N2,
    N3,
    N4,
    N5,
    N6,
    N7,
    N8,
    N9,
    LeftBracket,
    RightBracket,
    Semicolon,
    Apostrophe,
    Comma,
    Period,
    Minus,
    Equals,
    Slash,
    Space,
    Backspace,
    Backslash,
    Escape,
}

impl Key {
    /// The character printed on this key on a US keyboard. Used to label keys on screen.
    pub fn label(self) -> char {
        use Key::*;
        match self {
            A => 'A',
            B => 'B',
            C => 'C',
            D => 'D',
            E => 'E',
            F => 'F',
            G => 'G',
            H => 'H',
            I => 'I',
            J => 'J',
            K => 'K',
            L => 'L',
            M => 'M',
            N => 'N',
            O => 'O',
            P => 'P',
            Q => 'Q',
            R => 'R',
            S => 'S',
            T => 'T',
            U => 'U',
            V => 'V',
            W => 'W',
            X => 'X',
            Y => 'Y',
            Z => 'Z',
            N0 => '0',
            N1 => '1',
            N2 => '2',
            N3 => '3',
            N4 => '4',
            N5 => '5',
            N6 => '6',
            N7 => '7',
            N8 => '8',
            N9 => '9',
            LeftBracket => '[',
            RightBracket => ']',
            Semicolon => ';',
            Apostrophe => '\'',
            Comma => ',',
            Period => '.',
            Minus => '-',
            Equals => '=',
            Slash => '/',
            Space => ' ',
            Backspace => '\u{8}',
            Backslash => '\\',
            Escape => '\u{1b}',
        }
    }
}

/// The keys that play notes, in ascending pitch order. The letter row plays the white notes and
/// the number row above it plays the black notes, covering an octave plus the first 5 semitones
/// of the next one.
pub const KEY_SEQUENCE: [Key; 17] = {
    use Key::*;
    [Q, N2, W, N3, E, R, N5, T, N6, Y, N7, U, I, N9, O, N0, P]
};

pub const OCTAVE_DOWN_KEY: Key = Key::Comma;
pub const OCTAVE_UP_KEY: Key = Key::Period;
pub const EXIT_KEY: Key = Key::Escape;

/// The octave that the first key in the sequence plays in. The note played by a key is its
/// position in the key sequence plus 12 times the octave, so octave 5 puts the first key on midi
/// note 60 (middle C).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Octave(u8);

impl Octave {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(10);

    pub fn new(index: u8) -> Option<Self> {
        if (Self::MIN.0..=Self::MAX.0).contains(&index) {
            Some(Self(index))
        } else {
            None
        }
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Returns the next octave down, or `None` if this is already the lowest octave.
    pub fn down(self) -> Option<Self> {
        Self::new(self.0 - 1)
    }

    /// Returns the next octave up, or `None` if this is already the highest octave.
    pub fn up(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }
}

impl Default for Octave {
    fn default() -> Self {
        Self(5)
    }
}

/// Which note each key in the key sequence plays at the current octave. Note values can exceed
/// the midi range (127) in the highest octave; it's up to the caller to decide what to do with
/// those.
#[derive(Debug, Clone)]
pub struct KeyMap {
    octave: Octave,
    note_by_key: HashMap<Key, u8>,
}

impl KeyMap {
    pub fn new(octave: Octave) -> Self {
        let mut key_map = Self {
            octave,
            note_by_key: HashMap::new(),
        };
        key_map.set_key_values(octave);
        key_map
    }

    /// Rebuild the whole mapping for the given octave.
    pub fn set_key_values(&mut self, octave: Octave) {
        self.octave = octave;
        self.note_by_key = KEY_SEQUENCE
            .iter()
            .enumerate()
            .map(|(i, &key)| {
                (key, i as u8 + (octave.index() * NOTES_PER_OCTAVE))
            })
            .collect();
        log::debug!(
            "key map rebuilt for octave {} (first note {:?})",
            octave.index(),
            self.lookup(KEY_SEQUENCE[0])
        );
    }

    pub fn octave(&self) -> Octave {
        self.octave
    }

    pub fn lookup(&self, key: Key) -> Option<u8> {
        self.note_by_key.get(&key).cloned()
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::new(Octave::default())
    }
}
