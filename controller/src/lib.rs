//! Turns keyboard input into midi events. This is where the octave lives, along with the set of
//! keys that are currently held down and which note each of them started. Nothing in here talks
//! to a device or a window: midi events are pushed into a buffer for the caller to send, and
//! redraws are requested by setting a flag the caller checks each frame.

mod selector;

pub use selector::{InstrumentSelector, VISIBLE_ROWS};

use clavier_computer_keyboard::{
    EXIT_KEY, Key, KeyMap, OCTAVE_DOWN_KEY, OCTAVE_UP_KEY, Octave,
};
use clavier_keyboard::Note;
use clavier_midi::{
    MidiEvent, MidiEvents,
    midly::num::{u4, u7},
};
use std::collections::BTreeMap;

/// All messages go out on the first channel.
pub const CHANNEL: u4 = u4::from_int_lossy(0);

pub const NOTE_ON_VELOCITY: u7 = u7::from_int_lossy(127);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Keyboard,
    InstrumentSelector,
}

/// Interactions with the instrument drop-down list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorCommand {
    Open,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Scroll(isize),
    ClickRow(usize),
    Confirm,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// `repeat` is set when the event was generated by the OS's key repeat rather than by the key
    /// going down.
    KeyDown { key: Key, repeat: bool },
    KeyUp { key: Key },
    Selector(SelectorCommand),
    /// The window stopped receiving keyboard input, so no key-up events will arrive for keys
    /// that are currently held.
    FocusLost,
    Quit,
}

pub struct Controller {
    key_map: KeyMap,
    /// Keys that are currently down, and the midi note each one is sounding. The note is `None`
    /// for keys whose note is above the midi range at the current octave.
    held: BTreeMap<Key, Option<u7>>,
    selector: InstrumentSelector,
    focus: Focus,
    redraw: bool,
    quit: bool,
}

impl Controller {
    pub fn new(octave: Octave, program: u7) -> Self {
        Self {
            key_map: KeyMap::new(octave),
            held: BTreeMap::new(),
            selector: InstrumentSelector::new(program),
            focus: Focus::Keyboard,
            redraw: true,
            quit: false,
        }
    }

    /// Events to send before any input is handled: selects the initial instrument.
    pub fn startup(&mut self, out: &mut MidiEvents) {
        out.push(MidiEvent::program_change(CHANNEL, self.selector.selected()));
    }

    /// End every note that is still sounding. Call this before closing the midi output.
    pub fn shutdown(&mut self, out: &mut MidiEvents) {
        self.release_all(out);
    }

    pub fn octave(&self) -> Octave {
        self.key_map.octave()
    }

    pub fn key_map(&self) -> &KeyMap {
        &self.key_map
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.held.contains_key(&key)
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn selector(&self) -> &InstrumentSelector {
        &self.selector
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Returns whether a redraw was requested since the last call.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }

    pub fn request_redraw(&mut self) {
        self.redraw = true;
    }

    /// The octave is shown as the scientific pitch octave of the lowest key, so the default
    /// octave, whose lowest note is middle C (C4), is shown as 4.
    pub fn octave_readout(&self) -> String {
        format!(
            "Octave: {} (< and > to change)",
            self.key_map.octave().index() - 1
        )
    }

    pub fn handle(&mut self, event: InputEvent, out: &mut MidiEvents) {
        match event {
            InputEvent::KeyDown { key, repeat } => {
                if self.focus == Focus::Keyboard && !repeat {
                    self.key_down(key, out);
                }
            }
            InputEvent::KeyUp { key } => self.key_up(key, out),
            InputEvent::Selector(command) => {
                self.selector_command(command, out)
            }
            InputEvent::FocusLost => self.release_all(out),
            InputEvent::Quit => self.quit = true,
        }
    }

    fn set_octave(&mut self, octave: Option<Octave>) {
        if let Some(octave) = octave {
            self.key_map.set_key_values(octave);
            log::debug!("octave changed to {}", octave.index());
            self.redraw = true;
        }
    }

    fn key_down(&mut self, key: Key, out: &mut MidiEvents) {
        if key == EXIT_KEY {
            self.quit = true;
        } else if key == OCTAVE_DOWN_KEY {
            self.set_octave(self.octave().down());
        } else if key == OCTAVE_UP_KEY {
            self.set_octave(self.octave().up());
        } else if let Some(note) = self.key_map.lookup(key) {
            if self.held.contains_key(&key) {
                return;
            }
            let sounding = Note::from_midi_index(note);
            match sounding {
                Some(note) => {
                    log::debug!("note on {} ({:?})", note, key);
                    out.push(MidiEvent::note_on(
                        CHANNEL,
                        note.to_midi_index().into(),
                        NOTE_ON_VELOCITY,
                    ));
                }
                None => log::debug!(
                    "note {} of {:?} is outside the midi range",
                    note,
                    key
                ),
            }
            self.held
                .insert(key, sounding.map(|n| n.to_midi_index().into()));
            self.redraw = true;
        }
    }

    /// Release ends the note the key started, which differs from the key's current note if the
    /// octave changed while it was held.
    fn key_up(&mut self, key: Key, out: &mut MidiEvents) {
        if let Some(sounding) = self.held.remove(&key) {
            if let Some(note) = sounding {
                out.push(MidiEvent::note_on_zero_velocity(CHANNEL, note));
            }
            self.redraw = true;
        }
    }

    fn release_all(&mut self, out: &mut MidiEvents) {
        let keys = self.held.keys().cloned().collect::<Vec<_>>();
        for key in keys {
            self.key_up(key, out);
        }
    }

    fn selector_command(
        &mut self,
        command: SelectorCommand,
        out: &mut MidiEvents,
    ) {
        if command == SelectorCommand::Open {
            if self.focus == Focus::Keyboard {
                self.selector.open();
                self.focus = Focus::InstrumentSelector;
                self.redraw = true;
            }
            return;
        }
        if self.focus != Focus::InstrumentSelector {
            return;
        }
        let page = VISIBLE_ROWS as isize;
        let selected = match command {
            SelectorCommand::Open => None,
            SelectorCommand::Up => {
                self.selector.move_highlight(-1);
                None
            }
            SelectorCommand::Down => {
                self.selector.move_highlight(1);
                None
            }
            SelectorCommand::PageUp => {
                self.selector.move_highlight(-page);
                None
            }
            SelectorCommand::PageDown => {
                self.selector.move_highlight(page);
                None
            }
            SelectorCommand::Home => {
                self.selector.highlight_first();
                None
            }
            SelectorCommand::End => {
                self.selector.highlight_last();
                None
            }
            SelectorCommand::Scroll(delta_rows) => {
                self.selector.scroll(delta_rows);
                None
            }
            SelectorCommand::ClickRow(row) => {
                match self.selector.click_row(row) {
                    Some(program) => Some(program),
                    // A click on an empty row dismisses the list like a click elsewhere.
                    None => {
                        self.selector.cancel();
                        self.focus = Focus::Keyboard;
                        None
                    }
                }
            }
            SelectorCommand::Confirm => Some(self.selector.confirm()),
            SelectorCommand::Cancel => {
                self.selector.cancel();
                self.focus = Focus::Keyboard;
                None
            }
        };
        if let Some(program) = selected {
            log::debug!(
                "instrument {} ({}) selected",
                program.as_int(),
                self.selector.selected_name()
            );
            out.push(MidiEvent::program_change(CHANNEL, program));
            self.focus = Focus::Keyboard;
        }
        self.redraw = true;
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(Octave::default(), 0.into())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use clavier_midi::{NOTE_ON, PROGRAM_CHANGE, midly::MidiMessage};

    fn press(key: Key) -> InputEvent {
        InputEvent::KeyDown { key, repeat: false }
    }

    fn release(key: Key) -> InputEvent {
        InputEvent::KeyUp { key }
    }

    fn handle(
        controller: &mut Controller,
        event: InputEvent,
    ) -> Vec<MidiEvent> {
        let mut out = MidiEvents::empty();
        controller.handle(event, &mut out);
        out.into_iter().collect()
    }

    fn select(command: SelectorCommand) -> InputEvent {
        InputEvent::Selector(command)
    }

    fn note_on(key: u8, vel: u8) -> MidiEvent {
        MidiEvent::note_on(0.into(), key.into(), vel.into())
    }

    #[test]
    fn press_and_release_q() {
        let mut controller = Controller::default();
        assert_eq!(
            handle(&mut controller, press(Key::Q)),
            vec![note_on(60, 127)]
        );
        assert!(controller.is_pressed(Key::Q));
        assert_eq!(
            handle(&mut controller, release(Key::Q)),
            vec![note_on(60, 0)]
        );
        assert!(!controller.is_pressed(Key::Q));
    }

    #[test]
    fn wire_format_of_press_and_release() {
        let mut controller = Controller::default();
        let on = handle(&mut controller, press(Key::Q));
        let off = handle(&mut controller, release(Key::Q));
        assert_eq!(on[0].to_bytes().unwrap().as_slice(), &[NOTE_ON, 60, 127]);
        assert_eq!(off[0].to_bytes().unwrap().as_slice(), &[NOTE_ON, 60, 0]);
    }

    #[test]
    fn octave_up_twice() {
        let mut controller = Controller::default();
        assert!(handle(&mut controller, press(Key::Period)).is_empty());
        handle(&mut controller, release(Key::Period));
        handle(&mut controller, press(Key::Period));
        assert_eq!(controller.octave().index(), 7);
        assert_eq!(
            handle(&mut controller, press(Key::Q)),
            vec![note_on(84, 127)]
        );
    }

    #[test]
    fn octave_is_clamped() {
        let mut controller = Controller::new(Octave::MIN, 0.into());
        controller.take_redraw();
        handle(&mut controller, press(Key::Comma));
        assert_eq!(controller.octave(), Octave::MIN);
        assert!(!controller.take_redraw());
        let mut controller = Controller::new(Octave::MAX, 0.into());
        controller.take_redraw();
        handle(&mut controller, press(Key::Period));
        assert_eq!(controller.octave(), Octave::MAX);
        assert!(!controller.take_redraw());
        for _ in 0..20 {
            handle(&mut controller, press(Key::Comma));
        }
        assert_eq!(controller.octave(), Octave::MIN);
    }

    #[test]
    fn auto_repeat_plays_one_note() {
        let mut controller = Controller::default();
        let mut out = MidiEvents::empty();
        controller.handle(press(Key::W), &mut out);
        for _ in 0..10 {
            controller.handle(
                InputEvent::KeyDown {
                    key: Key::W,
                    repeat: true,
                },
                &mut out,
            );
        }
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn second_key_down_without_repeat_flag_is_ignored() {
        let mut controller = Controller::default();
        assert_eq!(handle(&mut controller, press(Key::W)).len(), 1);
        assert!(handle(&mut controller, press(Key::W)).is_empty());
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        let mut controller = Controller::default();
        controller.take_redraw();
        for key in [Key::A, Key::Z, Key::N1, Key::Space] {
            assert!(handle(&mut controller, press(key)).is_empty());
            assert!(handle(&mut controller, release(key)).is_empty());
        }
        assert!(!controller.take_redraw());
        assert!(!controller.quit_requested());
    }

    #[test]
    fn escape_quits() {
        let mut controller = Controller::default();
        assert!(handle(&mut controller, press(Key::Escape)).is_empty());
        assert!(controller.quit_requested());
    }

    #[test]
    fn release_after_octave_change_ends_original_note() {
        let mut controller = Controller::default();
        handle(&mut controller, press(Key::Q));
        handle(&mut controller, press(Key::Period));
        assert_eq!(
            handle(&mut controller, release(Key::Q)),
            vec![note_on(60, 0)]
        );
    }

    #[test]
    fn notes_above_midi_range_are_silent() {
        let mut controller = Controller::new(Octave::MAX, 0.into());
        assert_eq!(
            handle(&mut controller, press(Key::T)),
            vec![note_on(127, 127)]
        );
        assert!(handle(&mut controller, press(Key::N6)).is_empty());
        assert!(controller.is_pressed(Key::N6));
        assert!(handle(&mut controller, release(Key::N6)).is_empty());
    }

    #[test]
    fn select_violin() {
        let mut controller = Controller::default();
        handle(&mut controller, select(SelectorCommand::Open));
        assert_eq!(controller.focus(), Focus::InstrumentSelector);
        for _ in 0..5 {
            handle(&mut controller, select(SelectorCommand::PageDown));
        }
        let events = handle(&mut controller, select(SelectorCommand::Confirm));
        assert_eq!(
            events,
            vec![MidiEvent {
                channel: 0.into(),
                message: MidiMessage::ProgramChange {
                    program: 40.into()
                },
            }]
        );
        assert_eq!(
            events[0].to_short_message().unwrap(),
            (40 << 8) | PROGRAM_CHANGE as u32
        );
        assert_eq!(controller.focus(), Focus::Keyboard);
        assert_eq!(controller.selector().selected_name(), "Violin");
    }

    #[test]
    fn keys_go_to_selector_while_open() {
        let mut controller = Controller::default();
        handle(&mut controller, select(SelectorCommand::Open));
        assert!(handle(&mut controller, press(Key::Q)).is_empty());
        assert!(handle(&mut controller, press(Key::Escape)).is_empty());
        assert!(!controller.quit_requested());
        let events = handle(&mut controller, select(SelectorCommand::Cancel));
        assert!(events.is_empty());
        assert_eq!(controller.focus(), Focus::Keyboard);
        assert_eq!(handle(&mut controller, press(Key::Q)).len(), 1);
    }

    #[test]
    fn selector_ignored_while_closed() {
        let mut controller = Controller::default();
        assert!(
            handle(&mut controller, select(SelectorCommand::Confirm)).is_empty()
        );
        assert_eq!(controller.focus(), Focus::Keyboard);
    }

    #[test]
    fn startup_selects_initial_program() {
        let mut controller = Controller::new(Octave::default(), 19.into());
        let mut out = MidiEvents::empty();
        controller.startup(&mut out);
        assert_eq!(
            out.into_iter().collect::<Vec<_>>(),
            vec![MidiEvent::program_change(0.into(), 19.into())]
        );
    }

    #[test]
    fn shutdown_and_focus_loss_release_held_notes() {
        let mut controller = Controller::default();
        handle(&mut controller, press(Key::Q));
        handle(&mut controller, press(Key::E));
        assert_eq!(
            handle(&mut controller, InputEvent::FocusLost),
            vec![note_on(64, 0), note_on(60, 0)]
        );
        handle(&mut controller, press(Key::P));
        let mut out = MidiEvents::empty();
        controller.shutdown(&mut out);
        assert_eq!(out.into_iter().collect::<Vec<_>>(), vec![note_on(76, 0)]);
        assert!(!controller.is_pressed(Key::P));
    }

    #[test]
    fn octave_readout() {
        let mut controller = Controller::default();
        assert_eq!(
            controller.octave_readout(),
            "Octave: 4 (< and > to change)"
        );
        handle(&mut controller, press(Key::Comma));
        assert_eq!(
            controller.octave_readout(),
            "Octave: 3 (< and > to change)"
        );
    }
}
