use anyhow::anyhow;
use sdl2::{
    EventPump,
    gfx::primitives::DrawRenderer,
    pixels::Color,
    rect::Rect,
    render::Canvas,
    video::Window as SdlWindow,
};
use std::{
    thread,
    time::{Duration, Instant},
};

const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / 60);

/// Height in pixels of text drawn with the built-in sdl2_gfx font.
pub const CHAR_HEIGHT_PX: i32 = 8;

pub struct Window {
    pub canvas: Canvas<SdlWindow>,
    pub event_pump: EventPump,
    pub prev_tick_complete: Instant,
}

impl Window {
    pub fn new(
        title: &str,
        width_px: u32,
        height_px: u32,
    ) -> anyhow::Result<Self> {
        let sdl_context = sdl2::init().map_err(|e| anyhow!(e))?;
        let video_subsystem = sdl_context.video().map_err(|e| anyhow!(e))?;
        let window = video_subsystem
            .window(title, width_px, height_px)
            .position_centered()
            .build()?;
        let canvas = window
            .into_canvas()
            .target_texture()
            .present_vsync()
            .build()?;
        let event_pump = sdl_context.event_pump().map_err(|e| anyhow!(e))?;
        Ok(Self {
            canvas,
            event_pump,
            prev_tick_complete: Instant::now(),
        })
    }

    pub fn wait_until_next_frame(&self) {
        if let Some(period_to_sleep) = (self.prev_tick_complete
            + FRAME_DURATION)
            .checked_duration_since(Instant::now())
        {
            thread::sleep(period_to_sleep);
        }
    }

    pub fn clear(&mut self, color: Color) {
        self.canvas.set_draw_color(color);
        self.canvas.clear();
    }

    /// Draw a filled rectangle with a 1 pixel outline.
    pub fn outlined_rect(
        &mut self,
        rect: Rect,
        fill: Color,
        outline: Color,
    ) -> anyhow::Result<()> {
        self.canvas.set_draw_color(fill);
        self.canvas.fill_rect(rect).map_err(|e| anyhow!("{e}"))?;
        self.canvas.set_draw_color(outline);
        self.canvas.draw_rect(rect).map_err(|e| anyhow!("{e}"))?;
        Ok(())
    }

    /// Draw text with its top left corner at the given position.
    pub fn text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        color: Color,
    ) -> anyhow::Result<()> {
        self.canvas
            .string(x as i16, y as i16, text, color)
            .map_err(|e| anyhow!("{e}"))
    }
}
