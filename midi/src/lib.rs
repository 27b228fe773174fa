pub mod general_midi;

use midly::{
    MidiMessage,
    live::LiveEvent,
    num::{u4, u7},
};
use smallvec::{SmallVec, smallvec};

pub use midly;

/// Status nibble of a note-on message.
pub const NOTE_ON: u8 = 0x90;
/// Status nibble of a program change message.
pub const PROGRAM_CHANGE: u8 = 0xC0;

/// A midi message on a channel.
#[derive(Clone, Debug, PartialEq)]
pub struct MidiEvent {
    pub channel: u4,
    pub message: MidiMessage,
}

impl MidiEvent {
    pub fn note_on(channel: u4, key: u7, vel: u7) -> Self {
        Self {
            channel,
            message: MidiMessage::NoteOn { key, vel },
        }
    }

    /// Ends a note with a note-on message of velocity 0 rather than a note-off message. The two
    /// are equivalent to receivers but the former is what keyboards conventionally send.
    pub fn note_on_zero_velocity(channel: u4, key: u7) -> Self {
        Self::note_on(channel, key, 0.into())
    }

    pub fn program_change(channel: u4, program: u7) -> Self {
        Self {
            channel,
            message: MidiMessage::ProgramChange { program },
        }
    }

    /// The bytes of this event as sent over the wire to a device.
    pub fn to_bytes(&self) -> anyhow::Result<SmallVec<[u8; 3]>> {
        let event = LiveEvent::Midi {
            channel: self.channel,
            message: self.message,
        };
        let mut buf = Vec::with_capacity(3);
        match event.write_std(&mut buf) {
            Ok(()) => (),
            Err(e) => anyhow::bail!("{e}"),
        }
        Ok(SmallVec::from_vec(buf))
    }

    /// Pack this event into a single integer with the status byte (including the channel) in the
    /// lowest byte followed by the two data bytes. Unused data bytes are 0. This is the layout of
    /// a "short message" in most platform midi apis, and is convenient for logging.
    pub fn to_short_message(&self) -> anyhow::Result<u32> {
        let bytes = self.to_bytes()?;
        let byte = |i: usize| bytes.get(i).cloned().unwrap_or(0) as u32;
        Ok(byte(0) | (byte(1) << 8) | (byte(2) << 16))
    }
}

/// A collection of midi events produced by handling a single input event. This collection only
/// uses the heap when more than one event is produced at once which is uncommon.
#[derive(Clone, Debug, Default)]
pub struct MidiEvents(SmallVec<[MidiEvent; 1]>);

impl MidiEvents {
    pub fn empty() -> Self {
        Self(smallvec![])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear()
    }

    pub fn push(&mut self, midi_event: MidiEvent) {
        self.0.push(midi_event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &MidiEvent> {
        self.0.iter()
    }
}

impl IntoIterator for MidiEvents {
    type Item = MidiEvent;

    type IntoIter = smallvec::IntoIter<[MidiEvent; 1]>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn note_on_bytes() {
        let event = MidiEvent::note_on(0.into(), 60.into(), 127.into());
        assert_eq!(event.to_bytes().unwrap().as_slice(), &[NOTE_ON, 60, 127]);
        assert_eq!(event.to_short_message().unwrap(), 0x7F3C90);
    }

    #[test]
    fn zero_velocity_note_on_is_not_note_off() {
        let event = MidiEvent::note_on_zero_velocity(0.into(), 60.into());
        assert_eq!(event.to_bytes().unwrap().as_slice(), &[NOTE_ON, 60, 0]);
    }

    #[test]
    fn channel_in_status_byte() {
        let event = MidiEvent::note_on(3.into(), 64.into(), 1.into());
        assert_eq!(event.to_bytes().unwrap()[0], 0x93);
    }

    #[test]
    fn program_change_has_one_data_byte() {
        let event = MidiEvent::program_change(0.into(), 40.into());
        assert_eq!(event.to_bytes().unwrap().as_slice(), &[PROGRAM_CHANGE, 40]);
        assert_eq!(event.to_short_message().unwrap(), 0x28C0);
    }
}
