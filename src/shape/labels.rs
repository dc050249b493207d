//! Per-atom text labels.
//!
//! A label is a format string expanded against its atom when set:
//!
//! | token | expands to |
//! |-------|------------|
//! | `%a` | atom name |
//! | `%e` | element symbol |
//! | `%n` | group name |
//! | `%r` | residue number |
//! | `%c` | chain id |
//! | `%i` | atom number, from 1 |
//! | `%b` | temperature factor |
//! | `%%` | `%` |

use super::{Colorable, ShapeContext, StyleRecord};
use crate::g3d::{Colix, ColorValue, Font};
use crate::model::Atom;
use crate::util::BitSet;

/// Default label offset from the atom, in pixels.
pub const DEFAULT_OFFSET: (i32, i32) = (4, 4);

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// Text starts at the anchor.
    #[default]
    Left,
    /// Text is centered on the anchor.
    Center,
    /// Text ends at the anchor.
    Right,
}

impl TextAlign {
    /// X of the text start for a string `width` wide anchored at `x`.
    #[must_use]
    pub fn start_x(self, x: i32, width: i32) -> i32 {
        match self {
            Self::Left => x,
            Self::Center => x - width / 2,
            Self::Right => x - width,
        }
    }
}

/// Property writes accepted by [`Labels`].
#[derive(Debug, Clone, PartialEq)]
pub enum LabelProperty {
    /// Label the selection with a format string.
    Text(String),
    /// Remove the selection's labels.
    Off,
    /// Label unlabelled atoms with `%a`, remove the others.
    Toggle,
    /// Pixel offset from the atom.
    Offset(i32, i32),
    /// Horizontal alignment.
    Align(TextAlign),
    /// Text font.
    Font(Font),
    /// Background box color; [`ColorValue::None`] removes the box.
    BgColor(ColorValue),
}

impl LabelProperty {
    /// Property name for logs and errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text(_) => "label",
            Self::Off => "off",
            Self::Toggle => "toggleLabel",
            Self::Offset(..) => "offset",
            Self::Align(_) => "align",
            Self::Font(_) => "font",
            Self::BgColor(_) => "bgcolor",
        }
    }
}

/// One atom's label.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Format as given.
    pub format: String,
    /// Expanded text.
    pub text: String,
    /// Text color; INHERIT takes the atom's.
    pub colix: Colix,
    /// Box color; INHERIT for none.
    pub bg_colix: Colix,
    /// Font.
    pub font: Font,
    /// Pixel offset from the atom.
    pub offset: (i32, i32),
    /// Alignment around the offset anchor.
    pub align: TextAlign,
}

/// Expand a label format against one atom.
#[must_use]
pub fn format_label(format: &str, atom: &Atom, index: usize) -> String {
    let mut out = String::with_capacity(format.len());
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('a') => out.push_str(&atom.name),
            Some('e') => out.push_str(atom.element.symbol()),
            Some('n') => out.push_str(&atom.group),
            Some('r') => out.push_str(&atom.residue.to_string()),
            Some('c') => out.push(atom.chain),
            Some('i') => out.push_str(&(index + 1).to_string()),
            Some('b') => out.push_str(&format!("{:.2}", atom.bfactor)),
            Some('%') => out.push('%'),
            Some(other) => {
                out.push('%');
                out.push(other);
            }
            None => out.push('%'),
        }
    }
    out
}

/// Labels of every atom.
#[derive(Debug, Clone)]
pub struct Labels {
    style: StyleRecord,
    labels: Vec<Option<Label>>,
    offset: (i32, i32),
    align: TextAlign,
}

impl Labels {
    /// No labels.
    #[must_use]
    pub fn new(model: &crate::model::MolecularModel) -> Self {
        Self {
            style: StyleRecord::default(),
            labels: vec![None; model.atom_count()],
            offset: DEFAULT_OFFSET,
            align: TextAlign::Left,
        }
    }

    /// Shape-wide style; new labels take its font and colors.
    #[must_use]
    pub fn style(&self) -> &StyleRecord {
        &self.style
    }

    /// Label of atom `i`.
    #[must_use]
    pub fn label(&self, i: usize) -> Option<&Label> {
        self.labels.get(i).and_then(Option::as_ref)
    }

    /// Labelled atoms with their labels.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Label)> + '_ {
        self.labels
            .iter()
            .enumerate()
            .filter_map(|(i, l)| l.as_ref().map(|l| (i, l)))
    }

    fn make_label(&self, format: &str, atom: &Atom, i: usize) -> Label {
        Label {
            format: format.to_owned(),
            text: format_label(format, atom, i),
            colix: self.style.colix,
            bg_colix: self.style.bg_colix,
            font: self.style.font,
            offset: self.offset,
            align: self.align,
        }
    }

    fn selected_labels<'s>(
        &'s mut self,
        selection: &'s BitSet,
    ) -> impl Iterator<Item = &'s mut Label> + 's {
        self.labels
            .iter_mut()
            .enumerate()
            .filter(move |(i, _)| selection.get(*i))
            .filter_map(|(_, l)| l.as_mut())
    }

    /// Apply a property write.
    pub fn set_property(
        &mut self,
        property: LabelProperty,
        selection: &BitSet,
        ctx: &mut ShapeContext<'_>,
    ) {
        let model = ctx.model;
        let atoms = model.atoms();
        if self.labels.len() < atoms.len() {
            self.labels.resize(atoms.len(), None);
        }
        match property {
            LabelProperty::Text(format) => {
                for i in selection.iter().filter(|&i| i < atoms.len()) {
                    self.labels[i] = Some(self.make_label(&format, &atoms[i], i));
                }
            }
            LabelProperty::Off => {
                for i in selection.iter().filter(|&i| i < atoms.len()) {
                    self.labels[i] = None;
                }
            }
            LabelProperty::Toggle => {
                for i in selection.iter().filter(|&i| i < atoms.len()) {
                    self.labels[i] = match self.labels[i] {
                        Some(_) => None,
                        None => Some(self.make_label("%a", &atoms[i], i)),
                    };
                }
            }
            LabelProperty::Offset(x, y) => {
                self.offset = (x, y);
                for label in self.selected_labels(selection) {
                    label.offset = (x, y);
                }
            }
            LabelProperty::Align(align) => {
                self.align = align;
                for label in self.selected_labels(selection) {
                    label.align = align;
                }
            }
            LabelProperty::Font(font) => {
                self.style.font = font;
                for label in self.selected_labels(selection) {
                    label.font = font;
                }
            }
            LabelProperty::BgColor(color) => {
                let (colix, _) = ctx.resolve_color(color);
                let bg = if colix.is_unrecognized() { Colix::INHERIT } else { colix };
                self.style.bg_colix = bg;
                for label in self.selected_labels(selection) {
                    label.bg_colix = bg;
                }
            }
        }
    }
}

impl Colorable for Labels {
    fn set_color(&mut self, color: ColorValue, selection: &BitSet, ctx: &mut ShapeContext<'_>) {
        let (colix, palette) = ctx.resolve_color(color);
        self.style.colix = colix;
        for i in selection.iter() {
            let Some(Some(_)) = self.labels.get(i) else {
                continue;
            };
            let resolved = ctx.colix_or_palette(colix, palette, i, None);
            if let Some(Some(label)) = self.labels.get_mut(i) {
                label.colix = resolved;
            }
        }
    }

    fn set_translucent(
        &mut self,
        translucent: bool,
        selection: &BitSet,
        _ctx: &mut ShapeContext<'_>,
    ) {
        for label in self.selected_labels(selection) {
            label.colix = label.colix.with_translucency(translucent);
        }
    }
}
