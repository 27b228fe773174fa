//! A drop-down list of instruments. When closed it's a box showing the selected instrument. When
//! open, the list of instruments is drawn upwards from the box, over the top of the keys.
use crate::window::{CHAR_HEIGHT_PX, Window};
use clavier_controller::{InstrumentSelector, SelectorCommand, VISIBLE_ROWS};
use sdl2::{keyboard::Scancode, pixels::Color, rect::Rect};

const ROW_HEIGHT_PX: u32 = 20;
/// Wide enough for the longest instrument name and its program number.
const LIST_WIDTH_PX: u32 = 232;
const TEXT_PADDING_PX: i32 = 4;
const HIGHLIGHT: Color = Color::RGB(0, 120, 215);

pub struct InstrumentList {
    box_rect: Rect,
}

impl InstrumentList {
    pub fn new(x: i32, y: i32, width_px: u32) -> Self {
        Self {
            box_rect: Rect::new(x, y, width_px, ROW_HEIGHT_PX),
        }
    }

    fn list_rect(&self) -> Rect {
        let height_px = ROW_HEIGHT_PX * VISIBLE_ROWS as u32;
        Rect::new(
            self.box_rect.x(),
            self.box_rect.y() - height_px as i32,
            self.box_rect.width().max(LIST_WIDTH_PX),
            height_px,
        )
    }

    /// Work out what a left click at the given position means to the selector.
    pub fn click(&self, x: i32, y: i32, open: bool) -> Option<SelectorCommand> {
        if !open {
            return self
                .box_rect
                .contains_point((x, y))
                .then_some(SelectorCommand::Open);
        }
        let list_rect = self.list_rect();
        if list_rect.contains_point((x, y)) {
            let row = (y - list_rect.y()) as usize / ROW_HEIGHT_PX as usize;
            Some(SelectorCommand::ClickRow(row))
        } else {
            Some(SelectorCommand::Cancel)
        }
    }

    /// Navigation keys while the list has focus.
    pub fn command_from_scancode(
        scancode: Scancode,
    ) -> Option<SelectorCommand> {
        let command = match scancode {
            Scancode::Up => SelectorCommand::Up,
            Scancode::Down => SelectorCommand::Down,
            Scancode::PageUp => SelectorCommand::PageUp,
            Scancode::PageDown => SelectorCommand::PageDown,
            Scancode::Home => SelectorCommand::Home,
            Scancode::End => SelectorCommand::End,
            Scancode::Return | Scancode::KpEnter => SelectorCommand::Confirm,
            Scancode::Escape => SelectorCommand::Cancel,
            _ => return None,
        };
        Some(command)
    }

    fn text_y(row_y: i32) -> i32 {
        row_y + (ROW_HEIGHT_PX as i32 - CHAR_HEIGHT_PX) / 2
    }

    pub fn render(
        &self,
        window: &mut Window,
        selector: &InstrumentSelector,
    ) -> anyhow::Result<()> {
        window.outlined_rect(self.box_rect, Color::WHITE, Color::BLACK)?;
        let text_y = Self::text_y(self.box_rect.y());
        window.text(
            self.box_rect.x() + TEXT_PADDING_PX,
            text_y,
            selector.selected_name(),
            Color::BLACK,
        )?;
        window.text(
            self.box_rect.right() - (2 * TEXT_PADDING_PX) - 4,
            text_y,
            if selector.is_open() { "^" } else { "v" },
            Color::BLACK,
        )?;
        if selector.is_open() {
            self.render_list(window, selector)?;
        }
        Ok(())
    }

    fn render_list(
        &self,
        window: &mut Window,
        selector: &InstrumentSelector,
    ) -> anyhow::Result<()> {
        let list_rect = self.list_rect();
        window.outlined_rect(list_rect, Color::WHITE, Color::BLACK)?;
        for (row, (program, name, highlighted)) in
            selector.visible().enumerate()
        {
            let row_y = list_rect.y() + (row as i32 * ROW_HEIGHT_PX as i32);
            let text_color = if highlighted {
                let row_rect = Rect::new(
                    list_rect.x() + 1,
                    row_y + 1,
                    list_rect.width() - 2,
                    ROW_HEIGHT_PX - 2,
                );
                window.outlined_rect(row_rect, HIGHLIGHT, HIGHLIGHT)?;
                Color::WHITE
            } else {
                Color::BLACK
            };
            window.text(
                list_rect.x() + TEXT_PADDING_PX,
                Self::text_y(row_y),
                format!("{:3} {}", program, name).as_str(),
                text_color,
            )?;
        }
        Ok(())
    }
}
