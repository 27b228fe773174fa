//! Where each key of an on-screen piano goes. Black keys sit on a raised row and overlap half of
//! the white keys either side of them, so the keys form the familiar interleaved pattern even
//! though every key is drawn as the same size of rectangle.
use crate::note::is_accidental;

pub const KEY_WIDTH_PX: u32 = 59;
pub const KEY_HEIGHT_PX: u32 = 79;
pub const ACCIDENTAL_Y_PX: i32 = 0;
pub const NATURAL_Y_PX: i32 = 80;

/// Cursor advance between two white keys with no black key between them (E to F, B to C).
const NATURAL_PAIR_ADVANCE_PX: i32 = 60;
/// Cursor advance in all other cases.
const HALF_ADVANCE_PX: i32 = 30;

/// Offset of a key's label from the top left corner of the key.
pub const LABEL_OFFSET_PX: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRect {
    /// Position of the key in the sequence, which is also its distance in semitones from the
    /// first key.
    pub index: usize,
    pub accidental: bool,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl KeyRect {
    pub fn label_position(&self) -> (i32, i32) {
        (self.x + LABEL_OFFSET_PX, self.y + LABEL_OFFSET_PX)
    }
}

/// Lay out `num_keys` consecutive semitones starting from a C.
pub fn layout(num_keys: usize) -> Vec<KeyRect> {
    let mut x = 0;
    (0..num_keys)
        .map(|index| {
            let accidental = is_accidental(index);
            let rect = KeyRect {
                index,
                accidental,
                x,
                y: if accidental {
                    ACCIDENTAL_Y_PX
                } else {
                    NATURAL_Y_PX
                },
                width: KEY_WIDTH_PX,
                height: KEY_HEIGHT_PX,
            };
            x += if !accidental && !is_accidental(index + 1) {
                NATURAL_PAIR_ADVANCE_PX
            } else {
                HALF_ADVANCE_PX
            };
            rect
        })
        .collect()
}

/// How a key should be drawn. A pressed key is highlighted regardless of its colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStyle {
    Pressed,
    Accidental,
    Natural,
}

impl KeyStyle {
    pub fn new(accidental: bool, pressed: bool) -> Self {
        if pressed {
            Self::Pressed
        } else if accidental {
            Self::Accidental
        } else {
            Self::Natural
        }
    }
}
