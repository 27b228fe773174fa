//! The window of the clavier midi keyboard. This library doesn't know about midi devices. It
//! draws the keyboard, turns window events into input for the controller, and hands back the midi
//! events that input produced. The `clavier` executable sends those events to a device.

mod instrument_list;
mod piano;
mod window;

pub use piano::*;
