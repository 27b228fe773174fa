//! Abstract representation of a (musical) keyboard: note naming and the geometry of an on-screen
//! piano. Nothing in here knows about windows or midi devices.

pub mod layout;
pub mod note;

pub use layout::{KeyRect, KeyStyle, layout};
pub use note::{NOTES_PER_OCTAVE, Note, NoteName, is_accidental};
