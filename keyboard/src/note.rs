//! 12-tone equal temperament note naming. Only MIDI notes are representable. C_4 is middle C
//! (midi index 60), so the lowest note is C in octave "-1".
use std::fmt::Display;

pub const NOTES_PER_OCTAVE: u8 = 12;
const MAX_MIDI_INDEX: u8 = 127;

/// Returns true if the note at this many semitones above a C is a black key on a piano. Periodic
/// with a period of one octave.
pub const fn is_accidental(semitones_above_c: usize) -> bool {
    matches!(semitones_above_c % NOTES_PER_OCTAVE as usize, 1 | 3 | 6 | 8 | 10)
}

/// A note without an octave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteName {
    relative_midi_index: u8,
}

impl NoteName {
    /// Returns a str representation of the note name where all accidentals are sharp, formatted
    /// like "C" or "C_sharp"
    pub const fn to_str_sharp(self) -> &'static str {
        match self.relative_midi_index {
            0 => "C",
            1 => "C_sharp",
            2 => "D",
            3 => "D_sharp",
            4 => "E",
            5 => "F",
            6 => "F_sharp",
            7 => "G",
            8 => "G_sharp",
            9 => "A",
            10 => "A_sharp",
            11 => "B",
            _ => unreachable!(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Note {
    midi_index: u8,
}

impl Note {
    pub const C_4: Self = Self { midi_index: 60 };

    /// Returns `None` for values outside the midi note range.
    pub const fn from_midi_index(midi_index: u8) -> Option<Self> {
        if midi_index <= MAX_MIDI_INDEX {
            Some(Self { midi_index })
        } else {
            None
        }
    }

    pub const fn to_midi_index(self) -> u8 {
        self.midi_index
    }

    pub const fn note_name(self) -> NoteName {
        NoteName {
            relative_midi_index: self.midi_index % NOTES_PER_OCTAVE,
        }
    }

    /// The octave in scientific pitch notation, from -1 to 9.
    pub const fn octave_index(self) -> i8 {
        (self.midi_index / NOTES_PER_OCTAVE) as i8 - 1
    }
}

impl Display for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}",
            self.note_name().to_str_sharp(),
            self.octave_index()
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn accidentals_in_one_octave() {
        let accidentals =
            (0..12).filter(|&i| is_accidental(i)).collect::<Vec<_>>();
        assert_eq!(accidentals, vec![1, 3, 6, 8, 10]);
    }

    #[test]
    fn accidentals_repeat_every_octave() {
        for i in 0..120 {
            assert_eq!(is_accidental(i), is_accidental(i + 12));
        }
        assert!(is_accidental(13));
        assert!(!is_accidental(12));
    }

    #[test]
    fn middle_c() {
        assert_eq!(Note::C_4.to_string(), "C:4");
        assert_eq!(Note::from_midi_index(61).unwrap().to_string(), "C_sharp:4");
    }

    #[test]
    fn midi_range() {
        assert_eq!(Note::from_midi_index(0).unwrap().octave_index(), -1);
        assert_eq!(Note::from_midi_index(127).unwrap().to_string(), "G:9");
        assert_eq!(Note::from_midi_index(128), None);
    }
}
