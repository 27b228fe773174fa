use crate::{instrument_list::InstrumentList, window::Window};
use clavier_computer_keyboard::KEY_SEQUENCE;
use clavier_controller::{Controller, Focus, InputEvent, SelectorCommand};
use clavier_keyboard::{KeyRect, KeyStyle, layout};
use clavier_midi::MidiEvents;
use clavier_sdl2::sdl2_scancode_to_key;
use sdl2::{
    event::{Event, WindowEvent},
    mouse::MouseButton,
    pixels::Color,
    rect::Rect,
};
use std::time::Instant;

const WIDTH_PX: u32 = 600;
const HEIGHT_PX: u32 = 185;

const OCTAVE_READOUT_X_PX: i32 = 200;
const OCTAVE_READOUT_Y_PX: i32 = 165;

const SELECTOR_X_PX: i32 = 0;
const SELECTOR_Y_PX: i32 = 160;
const SELECTOR_WIDTH_PX: u32 = 200;

const BACKGROUND: Color = Color::WHITE;
const PRESSED: Color = Color::RED;

/// Fill and text colour for each style of key.
fn key_colors(style: KeyStyle) -> (Color, Color) {
    match style {
        KeyStyle::Pressed => (PRESSED, Color::WHITE),
        KeyStyle::Accidental => (Color::BLACK, Color::WHITE),
        KeyStyle::Natural => (Color::WHITE, Color::BLACK),
    }
}

/// A window showing a piano keyboard that's played with the computer keyboard, with a drop-down
/// list for choosing an instrument.
pub struct Piano {
    window: Window,
    controller: Controller,
    keys: Vec<KeyRect>,
    instrument_list: InstrumentList,
}

impl Piano {
    pub fn new(title: &str, controller: Controller) -> anyhow::Result<Self> {
        let window = Window::new(title, WIDTH_PX, HEIGHT_PX)?;
        Ok(Self {
            window,
            controller,
            keys: layout(KEY_SEQUENCE.len()),
            instrument_list: InstrumentList::new(
                SELECTOR_X_PX,
                SELECTOR_Y_PX,
                SELECTOR_WIDTH_PX,
            ),
        })
    }

    pub fn quit_requested(&self) -> bool {
        self.controller.quit_requested()
    }

    /// Midi events to send once the window is up and before the first tick.
    pub fn startup(&mut self, buf: &mut MidiEvents) {
        buf.clear();
        self.controller.startup(buf);
    }

    /// Midi events to send before the program exits.
    pub fn shutdown(&mut self, buf: &mut MidiEvents) {
        buf.clear();
        self.controller.shutdown(buf);
    }

    fn translate_event(&self, event: Event) -> Option<InputEvent> {
        let selector_focused =
            self.controller.focus() == Focus::InstrumentSelector;
        match event {
            Event::Quit { .. } => Some(InputEvent::Quit),
            Event::Window {
                win_event: WindowEvent::FocusLost,
                ..
            } => Some(InputEvent::FocusLost),
            Event::KeyDown {
                scancode: Some(scancode),
                repeat,
                ..
            } => {
                if selector_focused {
                    InstrumentList::command_from_scancode(scancode)
                        .map(InputEvent::Selector)
                } else {
                    sdl2_scancode_to_key(scancode)
                        .map(|key| InputEvent::KeyDown { key, repeat })
                }
            }
            Event::KeyUp {
                scancode: Some(scancode),
                ..
            } => sdl2_scancode_to_key(scancode)
                .map(|key| InputEvent::KeyUp { key }),
            Event::MouseButtonDown {
                mouse_btn: MouseButton::Left,
                x,
                y,
                ..
            } => self
                .instrument_list
                .click(x, y, selector_focused)
                .map(InputEvent::Selector),
            Event::MouseWheel { y, .. } if selector_focused => Some(
                InputEvent::Selector(SelectorCommand::Scroll(-y as isize)),
            ),
            _ => None,
        }
    }

    fn handle_events(&mut self, buf: &mut MidiEvents) {
        for event in self.window.event_pump.poll_iter().collect::<Vec<_>>() {
            if let Event::Window {
                win_event: WindowEvent::Exposed,
                ..
            } = event
            {
                self.controller.request_redraw();
            }
            if let Some(input_event) = self.translate_event(event) {
                self.controller.handle(input_event, buf);
            }
        }
    }

    fn render_keys(&mut self) -> anyhow::Result<()> {
        for (rect, &key) in self.keys.iter().zip(KEY_SEQUENCE.iter()) {
            let style =
                KeyStyle::new(rect.accidental, self.controller.is_pressed(key));
            let (fill, text) = key_colors(style);
            self.window.outlined_rect(
                Rect::new(rect.x, rect.y, rect.width, rect.height),
                fill,
                Color::BLACK,
            )?;
            let (label_x, label_y) = rect.label_position();
            self.window.text(
                label_x,
                label_y,
                key.label().to_string().as_str(),
                text,
            )?;
        }
        Ok(())
    }

    fn render(&mut self) -> anyhow::Result<()> {
        self.window.clear(BACKGROUND);
        self.render_keys()?;
        let octave_readout = self.controller.octave_readout();
        self.window.text(
            OCTAVE_READOUT_X_PX,
            OCTAVE_READOUT_Y_PX,
            octave_readout.as_str(),
            Color::BLACK,
        )?;
        self.instrument_list
            .render(&mut self.window, self.controller.selector())?;
        self.window.canvas.present();
        Ok(())
    }

    /// Waits until the next frame, then handles events and redraws the keyboard if anything
    /// changed. Midi events produced by input during this frame are written to `buf`.
    pub fn tick(&mut self, buf: &mut MidiEvents) -> anyhow::Result<()> {
        buf.clear();
        self.window.wait_until_next_frame();
        self.handle_events(buf);
        if self.controller.take_redraw() {
            self.render()?;
        }
        self.window.prev_tick_complete = Instant::now();
        Ok(())
    }
}
