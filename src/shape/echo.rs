//! Screen-anchored text.
//!
//! Each echo has an id. Targeting `top`, `middle` or `bottom` creates an
//! echo at that edge; other ids start at the top until positioned.

use super::labels::TextAlign;
use super::{ShapeContext, StyleRecord};
use crate::g3d::{Colix, ColorValue, Font};

/// Margin from the display edge, in pixels.
pub const ECHO_MARGIN: i32 = 4;

/// Vertical placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    /// Along the top edge.
    #[default]
    Top,
    /// Centered vertically.
    Middle,
    /// Along the bottom edge.
    Bottom,
    /// At an explicit pixel position; `halign` applies around `x`.
    Xy(i32, i32),
}

/// Property writes accepted by [`Echo`].
#[derive(Debug, Clone, PartialEq)]
pub enum EchoProperty {
    /// Make the echo with this id current, creating it if needed.
    Target(String),
    /// Text of the current echo.
    Text(String),
    /// Vertical placement of the current echo.
    Valign(VAlign),
    /// Horizontal alignment of the current echo.
    Halign(TextAlign),
    /// Font of the current echo.
    Font(Font),
    /// Background box of the current echo.
    BgColor(ColorValue),
    /// Remove the current echo.
    Delete,
}

impl EchoProperty {
    /// Property name for logs and errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Target(_) => "target",
            Self::Text(_) => "text",
            Self::Valign(_) => "valign",
            Self::Halign(_) => "align",
            Self::Font(_) => "font",
            Self::BgColor(_) => "bgcolor",
            Self::Delete => "delete",
        }
    }
}

/// One echo text.
#[derive(Debug, Clone, PartialEq)]
pub struct EchoText {
    /// Id.
    pub id: String,
    /// Text; empty draws nothing.
    pub text: String,
    /// Vertical placement.
    pub valign: VAlign,
    /// Horizontal alignment.
    pub halign: TextAlign,
    /// Text color.
    pub colix: Colix,
    /// Box color; INHERIT for none.
    pub bg_colix: Colix,
    /// Font.
    pub font: Font,
}

impl EchoText {
    fn new(id: &str, style: &StyleRecord) -> Self {
        let valign = match id {
            "middle" => VAlign::Middle,
            "bottom" => VAlign::Bottom,
            _ => VAlign::Top,
        };
        Self {
            id: id.to_owned(),
            text: String::new(),
            valign,
            halign: TextAlign::Left,
            colix: style.colix,
            bg_colix: style.bg_colix,
            font: style.font,
        }
    }

    /// Baseline start of a string `width` wide with font `ascent` on a
    /// `screen` sized display.
    #[must_use]
    pub fn position(&self, screen: (i32, i32), width: i32, ascent: i32) -> (i32, i32) {
        let (w, h) = screen;
        let edge_x = match self.halign {
            TextAlign::Left => ECHO_MARGIN,
            TextAlign::Center => (w - width) / 2,
            TextAlign::Right => w - width - ECHO_MARGIN,
        };
        match self.valign {
            VAlign::Top => (edge_x, ECHO_MARGIN + ascent),
            VAlign::Middle => (edge_x, (h + ascent) / 2),
            VAlign::Bottom => (edge_x, h - ECHO_MARGIN),
            VAlign::Xy(x, y) => (self.halign.start_x(x, width), y),
        }
    }
}

/// All echo texts.
#[derive(Debug, Clone)]
pub struct Echo {
    style: StyleRecord,
    texts: Vec<EchoText>,
    current: Option<usize>,
}

impl Echo {
    /// No echoes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            style: StyleRecord {
                colix: Colix::WHITE,
                ..StyleRecord::default()
            },
            texts: Vec::new(),
            current: None,
        }
    }

    /// Echo texts in creation order.
    #[must_use]
    pub fn texts(&self) -> &[EchoText] {
        &self.texts
    }

    /// Id of the current echo.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.map(|i| self.texts[i].id.as_str())
    }

    fn current_mut(&mut self) -> &mut EchoText {
        let i = match self.current {
            Some(i) => i,
            None => {
                self.texts.push(EchoText::new("top", &self.style));
                self.texts.len() - 1
            }
        };
        self.current = Some(i);
        &mut self.texts[i]
    }

    /// Color of the current echo, and the default for new ones.
    pub fn set_colix(&mut self, colix: Colix) {
        let colix = if colix.is_unrecognized() || colix.is_inherit() {
            Colix::WHITE
        } else {
            colix
        };
        self.style.colix = colix;
        if let Some(i) = self.current {
            self.texts[i].colix = colix;
        }
    }

    /// Apply a property write.
    pub fn set_property(&mut self, property: EchoProperty, ctx: &mut ShapeContext<'_>) {
        match property {
            EchoProperty::Target(id) => {
                let i = match self.texts.iter().position(|t| t.id == id) {
                    Some(i) => i,
                    None => {
                        self.texts.push(EchoText::new(&id, &self.style));
                        self.texts.len() - 1
                    }
                };
                self.current = Some(i);
            }
            EchoProperty::Text(text) => self.current_mut().text = text,
            EchoProperty::Valign(v) => self.current_mut().valign = v,
            EchoProperty::Halign(h) => self.current_mut().halign = h,
            EchoProperty::Font(f) => {
                self.style.font = f;
                self.current_mut().font = f;
            }
            EchoProperty::BgColor(color) => {
                let (colix, _) = ctx.resolve_color(color);
                let bg = if colix.is_unrecognized() { Colix::INHERIT } else { colix };
                self.current_mut().bg_colix = bg;
            }
            EchoProperty::Delete => {
                if let Some(i) = self.current.take() {
                    let _ = self.texts.remove(i);
                }
            }
        }
    }
}

impl Default for Echo {
    fn default() -> Self {
        Self::new()
    }
}
