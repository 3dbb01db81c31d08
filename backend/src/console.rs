use std::collections::HashMap;

use tracing::{debug, info, trace};
use wheel_shared::{AudioSink, Glyph, GlyphHandle, Renderer, Viewport};

/// Stands in for a real stage: keeps the scene as plain numbers and logs it.
#[derive(Debug)]
pub struct ConsoleRenderer {
    viewport: Viewport,
    orientation: f64,
    arrow_tilt: f64,
    glyphs: HashMap<GlyphHandle, Glyph>,
    next_handle: u64,
}

impl ConsoleRenderer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            orientation: 0.0,
            arrow_tilt: 0.0,
            glyphs: HashMap::new(),
            next_handle: 0,
        }
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}

impl Renderer for ConsoleRenderer {
    fn set_wheel_orientation(&mut self, radians: f64) {
        self.orientation = radians;
        trace!("🎡 wheel at {:.3} rad", radians);
    }

    fn set_arrow_tilt(&mut self, radians: f64) {
        self.arrow_tilt = radians;
        trace!("➡️ arrow tilt {:.2} rad", radians);
    }

    fn show_glyph(&mut self, glyph: &Glyph) -> GlyphHandle {
        self.next_handle += 1;
        let handle = GlyphHandle(self.next_handle);
        info!("🔢 {} (wheel at {:.3} rad)", glyph.value, self.orientation);
        self.glyphs.insert(handle, *glyph);
        handle
    }

    fn update_glyph(&mut self, handle: GlyphHandle, opacity: f64, scale: f64) {
        if let Some(glyph) = self.glyphs.get_mut(&handle) {
            glyph.opacity = opacity;
            glyph.scale = scale;
        }
    }

    fn remove_glyph(&mut self, handle: GlyphHandle) {
        if let Some(glyph) = self.glyphs.remove(&handle) {
            debug!("Glyph {} faded out", glyph.value);
        }
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}

/// Logs what a sound-sprite audio element would be asked to do.
#[derive(Debug, Default)]
pub struct ConsoleAudio {
    position: f64,
    playing: bool,
}

impl AudioSink for ConsoleAudio {
    fn pause(&mut self) {
        if self.playing {
            debug!("🔇 audio paused");
        }
        self.playing = false;
    }

    fn seek(&mut self, seconds: f64) {
        self.position = seconds;
    }

    fn resume(&mut self) {
        self.playing = true;
        debug!("🔊 audio playing from {:.3}s", self.position);
    }
}
