//! Font loading, `parley` shaping and glyph drawing.
//!
//! A [`TextEngine`] serves two callers. Words are shaped one character at a time so
//! [`layout_word`](crate::entity::typography::layout_word) can move each letter on its own;
//! status and placeholder text is laid out as whole blocks with line breaks.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use kurbo::Size;

use crate::entity::typography::{GlyphMetrics, WordLayout};
use crate::foundation::core::{Affine, Point, Rgb8};
use crate::foundation::error::{EngineError, EngineResult};
use crate::render::vector::VectorPass;

/// Advance multiplier used between word letters.
pub const WORD_LETTER_SPACING: f64 = 1.037;

/// Sans-serif faces tried, in order, when no font path is configured.
const SYSTEM_SANS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Raw bytes of one font file.
#[derive(Clone)]
pub struct FontFace {
    label: String,
    bytes: Arc<Vec<u8>>,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("label", &self.label)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl FontFace {
    /// Wrap font bytes; `label` names the face in errors.
    pub fn from_bytes(label: impl Into<String>, bytes: Vec<u8>) -> EngineResult<Self> {
        let label = label.into();
        if bytes.is_empty() {
            return Err(EngineError::asset(format!("font '{label}' is empty")));
        }
        Ok(Self {
            label,
            bytes: Arc::new(bytes),
        })
    }

    /// Read a font file.
    pub fn load(path: &Path) -> EngineResult<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| EngineError::asset(format!("read font '{}': {e}", path.display())))?;
        Self::from_bytes(path.display().to_string(), bytes)
    }

    /// First readable face from the usual system locations.
    pub fn system_sans() -> Option<Self> {
        SYSTEM_SANS
            .iter()
            .map(Path::new)
            .filter(|p| p.is_file())
            .find_map(|p| Self::load(p).ok())
    }

    /// Load `path` when given, otherwise look for a system face.
    pub fn resolve(path: Option<&Path>) -> EngineResult<Option<Self>> {
        match path {
            Some(p) => Self::load(p).map(Some),
            None => Ok(Self::system_sans()),
        }
    }

    /// Name used in logs and errors.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// One character shaped at the engine's size, relative to its baseline-left origin.
struct ShapedChar {
    size: Size,
    glyphs: Vec<vello_cpu::Glyph>,
}

/// Shapes text with `parley` and draws it through `vello_cpu`.
pub struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family: String,
    font: vello_cpu::peniko::FontData,
    size_px: f32,
    letter_spacing: f64,
    shaped: HashMap<char, ShapedChar>,
}

impl std::fmt::Debug for TextEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEngine")
            .field("family", &self.family)
            .field("size_px", &self.size_px)
            .field("letter_spacing", &self.letter_spacing)
            .field("shaped", &self.shaped.len())
            .finish_non_exhaustive()
    }
}

impl TextEngine {
    /// Engine drawing `face` at `size_px` pixels per em.
    pub fn new(face: &FontFace, size_px: f32) -> EngineResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(EngineError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(face.bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            EngineError::asset(format!("font '{}' has no usable families", face.label))
        })?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| {
                EngineError::asset(format!("font '{}' family has no name", face.label))
            })?
            .to_string();

        let font =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(face.bytes.to_vec()), 0);
        tracing::debug!(font = %face.label, %family, size_px, "text engine ready");
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
            font,
            size_px,
            letter_spacing: 1.0,
            shaped: HashMap::new(),
        })
    }

    /// Scale each letter advance by `factor`; non-positive factors are ignored.
    pub fn with_letter_spacing(mut self, factor: f64) -> Self {
        if factor.is_finite() && factor > 0.0 {
            self.letter_spacing = factor;
            self.shaped.clear();
        }
        self
    }

    /// Em size in pixels.
    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    /// Shape every character of `text` not seen yet.
    pub fn prepare(&mut self, text: &str) {
        for ch in text.chars() {
            if !self.shaped.contains_key(&ch) {
                let shaped = self.shape_char(ch);
                self.shaped.insert(ch, shaped);
            }
        }
    }

    /// Draw every prepared letter of `layout`. Unprepared letters are skipped.
    pub fn draw_word(&self, pass: &mut VectorPass, layout: &WordLayout) {
        if layout.alpha <= 0.0 {
            return;
        }
        for placement in &layout.glyphs {
            let Some(shaped) = self.shaped.get(&placement.ch) else {
                continue;
            };
            if shaped.glyphs.is_empty() {
                continue;
            }
            let transform = layout.transform * Affine::translate(placement.origin.to_vec2());
            pass.fill_glyphs(
                &self.font,
                self.size_px,
                transform,
                placement.color,
                layout.alpha,
                shaped.glyphs.iter().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                }),
            );
        }
    }

    /// Extent of a [`draw_block`](Self::draw_block) of `text`.
    pub fn block_size(&mut self, text: &str) -> Size {
        let layout = self.layout(text);
        Size::new(f64::from(layout.full_width()), f64::from(layout.height()))
    }

    /// Draw left-aligned lines of `text` with the block's top-left corner at `origin`.
    pub fn draw_block(
        &mut self,
        pass: &mut VectorPass,
        origin: Point,
        text: &str,
        color: Rgb8,
        alpha: f64,
    ) {
        let layout = self.layout(text);
        let transform = Affine::translate(origin.to_vec2());
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                pass.fill_glyphs(
                    &self.font,
                    run.run().font_size(),
                    transform,
                    color,
                    alpha,
                    run.glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    }),
                );
            }
        }
    }

    fn layout(&mut self, text: &str) -> parley::Layout<()> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));
        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    fn shape_char(&mut self, ch: char) -> ShapedChar {
        let mut buf = [0u8; 4];
        let layout = self.layout(ch.encode_utf8(&mut buf));
        let mut glyphs = Vec::new();
        let mut height: f64 = 0.0;
        for line in layout.lines() {
            let metrics = line.metrics();
            height = height.max(f64::from(metrics.ascent + metrics.descent));
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                glyphs.extend(run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y - metrics.baseline,
                }));
            }
        }
        ShapedChar {
            size: Size::new(
                f64::from(layout.full_width()) * self.letter_spacing,
                height,
            ),
            glyphs,
        }
    }

    fn fallback_size(&self) -> Size {
        let em = f64::from(self.size_px);
        Size::new(em * 0.6 * self.letter_spacing, em)
    }
}

impl GlyphMetrics for TextEngine {
    fn glyph_size(&self, ch: char) -> Size {
        self.shaped
            .get(&ch)
            .map_or_else(|| self.fallback_size(), |s| s.size)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
