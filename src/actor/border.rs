//! Focus border overlay (§4.5). A single overlay window is kept in sync
//! with whichever window is currently focused; when bordering is disabled
//! the renderer simply never emits a frame.

use crate::actor::app::WindowId;
use crate::geometry::{CGRectExt, Frame};

#[derive(Debug, Clone, Copy)]
pub struct BorderStyle {
    pub enabled: bool,
    pub width: f64,
    pub radius: f64,
}

impl Default for BorderStyle {
    fn default() -> Self { Self { enabled: false, width: 2.0, radius: 6.0 } }
}

#[derive(Debug, Default)]
pub struct BorderRenderer {
    style: BorderStyle,
    focused: Option<(WindowId, Frame)>,
}

impl BorderRenderer {
    pub fn new(style: BorderStyle) -> Self { Self { style, focused: None } }

    pub fn set_style(&mut self, style: BorderStyle) { self.style = style; }

    /// Updates which window the overlay should track; `None` hides it.
    pub fn set_focused(&mut self, focused: Option<(WindowId, Frame)>) { self.focused = focused; }

    /// The overlay's own frame for this tick, outset by the configured
    /// width so the border sits just outside the tracked window, or
    /// `None` if nothing should be drawn.
    pub fn overlay_frame(&self) -> Option<Frame> {
        if !self.style.enabled {
            return None;
        }
        self.focused.map(|(_, frame)| frame.inset(-self.style.width, -self.style.width))
    }
}

#[cfg(test)]
mod tests {
    use objc2_core_foundation::{CGPoint, CGRect, CGSize};

    use super::*;

    fn wid() -> WindowId { WindowId::new(1, 1) }
    fn frame() -> Frame { CGRect::new(CGPoint::new(100.0, 100.0), CGSize::new(400.0, 300.0)) }

    #[test]
    fn disabled_style_never_emits_an_overlay_frame() {
        let mut r = BorderRenderer::new(BorderStyle { enabled: false, ..Default::default() });
        r.set_focused(Some((wid(), frame())));
        assert!(r.overlay_frame().is_none());
    }

    #[test]
    fn enabled_style_outsets_by_the_configured_width() {
        let mut r = BorderRenderer::new(BorderStyle { enabled: true, width: 2.0, radius: 6.0 });
        r.set_focused(Some((wid(), frame())));
        let overlay = r.overlay_frame().unwrap();
        assert_eq!(overlay.origin.x, 98.0);
        assert_eq!(overlay.size.width, 404.0);
    }

    #[test]
    fn no_focused_window_hides_the_overlay() {
        let r = BorderRenderer::new(BorderStyle { enabled: true, ..Default::default() });
        assert!(r.overlay_frame().is_none());
    }
}
