use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Opaque id for a glyph the renderer has put on screen.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphHandle(pub u64);

/// A number shown during the result reveal.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub value: u32,
    pub opacity: f64,
    pub scale: f64,
    pub position: (f64, f64),
}

/// Draws the wheel, the arrow and the reveal glyphs.
pub trait Renderer {
    fn set_wheel_orientation(&mut self, radians: f64);
    fn set_arrow_tilt(&mut self, radians: f64);
    fn show_glyph(&mut self, glyph: &Glyph) -> GlyphHandle;
    fn update_glyph(&mut self, handle: GlyphHandle, opacity: f64, scale: f64);
    fn remove_glyph(&mut self, handle: GlyphHandle);
    fn viewport(&self) -> Viewport;
}

/// A single audio element holding the whole sound sprite.
pub trait AudioSink {
    fn pause(&mut self);
    fn seek(&mut self, seconds: f64);
    fn resume(&mut self);
}
