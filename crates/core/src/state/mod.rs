//! Cursor state threaded through a single interpretation pass.
//!
//! A [`CursorState`] is created fresh for every call to the interpreter and
//! dropped when it returns; nothing here is shared between calls.

use serde::Serialize;

use crate::markup::args;

/// Position and font in effect for the next emitting command.
///
/// Values are already scaled for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CursorState {
    /// Current x position.
    pub x: f64,
    /// Current y position.
    pub y: f64,
    /// Current font size.
    pub font_size: f64,
    /// Display scale applied to every command argument.
    pub scale: f64,
}

impl CursorState {
    /// Cursor at the origin with the given initial font size.
    pub fn new(scale: f64, font_size: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            font_size,
            scale,
        }
    }

    /// Apply a `^FO` argument string (`x,y`). Malformed input leaves the
    /// cursor where it was.
    pub fn apply_field_origin(&mut self, raw: &str) {
        if let Some((x, y)) = args::pair(raw) {
            self.x = x * self.scale;
            self.y = y * self.scale;
        }
    }

    /// Apply a `^A0` argument string (`o,h,w`). Only the height is tracked.
    pub fn apply_font(&mut self, raw: &str) {
        if let Some((height, _width)) = args::upper(raw)
            .and_then(args::comma)
            .and_then(args::pair)
        {
            self.font_size = height * self.scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_origin_scales() {
        let mut c = CursorState::new(0.5, 30.0);
        c.apply_field_origin("50,90");
        assert_eq!((c.x, c.y), (25.0, 45.0));
    }

    #[test]
    fn malformed_field_origin_is_ignored() {
        let mut c = CursorState::new(0.5, 30.0);
        c.apply_field_origin("10,10");
        c.apply_field_origin("abc");
        c.apply_field_origin("20");
        assert_eq!((c.x, c.y), (5.0, 5.0));
    }

    #[test]
    fn font_requires_orientation_letter() {
        let mut c = CursorState::new(0.5, 30.0);
        c.apply_font("N,50,50");
        assert_eq!(c.font_size, 25.0);
        c.apply_font(",40,40");
        assert_eq!(c.font_size, 25.0);
        c.apply_font("N,40");
        assert_eq!(c.font_size, 25.0);
    }
}
