//! Screen-anchored echo texts.

use super::labels::draw_text;
use super::{RenderContext, Renderer};
use crate::error::ShapeError;
use crate::g3d::ScreenPoint;
use crate::shape::AnyShape;

/// Depth of echo text: in front of everything.
const ECHO_Z: i32 = 1;

/// Draws every non-empty echo at its anchor.
#[derive(Debug, Default)]
pub struct EchoRenderer;

impl Renderer for EchoRenderer {
    fn render(&mut self, shape: &AnyShape, ctx: &mut RenderContext<'_>) -> Result<(), ShapeError> {
        let AnyShape::Echo(echo) = shape else {
            return Ok(());
        };
        let screen = ctx.g3d.display_size();
        for text in echo.texts().iter().filter(|t| !t.text.is_empty()) {
            let width = ctx.g3d.string_width(&text.font, &text.text);
            let ascent = ctx.g3d.font_ascent(&text.font);
            let (x, y) = text.position(screen, width, ascent);
            let at = ScreenPoint::new(x, y, ECHO_Z);
            draw_text(ctx.g3d, text.colix, text.bg_colix, &text.font, &text.text, width, at);
        }
        Ok(())
    }
}
