//! State of the drop-down list for choosing an instrument. The list shows a window of
//! `VISIBLE_ROWS` instruments and keeps the highlighted one in view.
use clavier_midi::{
    general_midi::{INSTRUMENT_NAMES, NUM_INSTRUMENTS, instrument_name},
    midly::num::u7,
};

pub const VISIBLE_ROWS: usize = 8;

#[derive(Debug, Clone)]
pub struct InstrumentSelector {
    selected: u7,
    highlighted: usize,
    first_visible: usize,
    open: bool,
}

impl InstrumentSelector {
    pub fn new(selected: u7) -> Self {
        let mut selector = Self {
            selected,
            highlighted: selected.as_int() as usize,
            first_visible: 0,
            open: false,
        };
        selector.scroll_to_highlighted();
        selector
    }

    pub fn selected(&self) -> u7 {
        self.selected
    }

    pub fn selected_name(&self) -> &'static str {
        instrument_name(self.selected)
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn first_visible(&self) -> usize {
        self.first_visible
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    fn max_first_visible() -> usize {
        NUM_INSTRUMENTS - VISIBLE_ROWS
    }

    fn scroll_to_highlighted(&mut self) {
        if self.highlighted < self.first_visible {
            self.first_visible = self.highlighted;
        } else if self.highlighted >= self.first_visible + VISIBLE_ROWS {
            self.first_visible = self.highlighted + 1 - VISIBLE_ROWS;
        }
    }

    pub fn open(&mut self) {
        self.open = true;
        self.highlighted = self.selected.as_int() as usize;
        self.scroll_to_highlighted();
    }

    /// Close the list without changing the selection.
    pub fn cancel(&mut self) {
        self.open = false;
        self.highlighted = self.selected.as_int() as usize;
        self.scroll_to_highlighted();
    }

    pub fn move_highlight(&mut self, delta: isize) {
        self.highlighted = self
            .highlighted
            .saturating_add_signed(delta)
            .min(NUM_INSTRUMENTS - 1);
        self.scroll_to_highlighted();
    }

    pub fn highlight_first(&mut self) {
        self.highlighted = 0;
        self.scroll_to_highlighted();
    }

    pub fn highlight_last(&mut self) {
        self.highlighted = NUM_INSTRUMENTS - 1;
        self.scroll_to_highlighted();
    }

    /// Scroll the visible window without moving the highlight.
    pub fn scroll(&mut self, delta_rows: isize) {
        self.first_visible = self
            .first_visible
            .saturating_add_signed(delta_rows)
            .min(Self::max_first_visible());
    }

    /// Select the highlighted instrument and close the list. Returns the newly selected program.
    pub fn confirm(&mut self) -> u7 {
        self.selected = (self.highlighted as u8).into();
        self.open = false;
        self.selected
    }

    /// Select the instrument shown on the given row of the visible window, counting from the top.
    pub fn click_row(&mut self, row: usize) -> Option<u7> {
        if row >= VISIBLE_ROWS {
            return None;
        }
        let index = self.first_visible + row;
        if index >= NUM_INSTRUMENTS {
            return None;
        }
        self.highlighted = index;
        Some(self.confirm())
    }

    /// The instruments in the visible window as (program, name, highlighted).
    pub fn visible(
        &self,
    ) -> impl Iterator<Item = (usize, &'static str, bool)> + '_ {
        INSTRUMENT_NAMES
            .iter()
            .enumerate()
            .skip(self.first_visible)
            .take(VISIBLE_ROWS)
            .map(|(i, &name)| (i, name, i == self.highlighted))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn opens_on_current_selection() {
        let mut selector = InstrumentSelector::new(40.into());
        selector.open();
        assert!(selector.is_open());
        assert_eq!(selector.highlighted(), 40);
        let visible = selector.visible().map(|(i, _, _)| i).collect::<Vec<_>>();
        assert!(visible.contains(&40));
        assert_eq!(visible.len(), VISIBLE_ROWS);
    }

    #[test]
    fn highlight_is_clamped() {
        let mut selector = InstrumentSelector::new(0.into());
        selector.open();
        selector.move_highlight(-1);
        assert_eq!(selector.highlighted(), 0);
        selector.move_highlight(1000);
        assert_eq!(selector.highlighted(), 127);
        assert_eq!(selector.first_visible(), 120);
        selector.highlight_first();
        assert_eq!(selector.first_visible(), 0);
    }

    #[test]
    fn cancel_keeps_selection() {
        let mut selector = InstrumentSelector::new(5.into());
        selector.open();
        selector.move_highlight(3);
        selector.cancel();
        assert!(!selector.is_open());
        assert_eq!(selector.selected(), u7::from(5));
        assert_eq!(selector.highlighted(), 5);
    }

    #[test]
    fn confirm_selects_highlighted() {
        let mut selector = InstrumentSelector::new(0.into());
        selector.open();
        selector.move_highlight(40);
        assert_eq!(selector.confirm(), u7::from(40));
        assert_eq!(selector.selected_name(), "Violin");
        assert!(!selector.is_open());
    }

    #[test]
    fn click_row_in_scrolled_list() {
        let mut selector = InstrumentSelector::new(0.into());
        selector.open();
        selector.scroll(1000);
        assert_eq!(selector.first_visible(), 120);
        assert_eq!(selector.click_row(7), Some(127.into()));
        assert_eq!(selector.click_row(VISIBLE_ROWS), None);
    }
}
