//! # Font Management
//!
//! Text width measurement for the text flow. The layout code only sees the
//! [`TextMeasure`] trait; [`FontContext`] is the production implementation.
//!
//! Two built-in families are always available (Helvetica and Courier) with
//! static metrics. Custom TrueType/OpenType fonts can be registered from
//! scene input and are measured with real advance widths via ttf-parser.

pub mod metrics;

pub use metrics::StandardFontMetrics;

use std::collections::HashMap;

use crate::error::VellumError;
use crate::style::FontSpec;

/// The measurement oracle used by text layout.
///
/// Must return the same width for identical inputs within one layout pass,
/// in the same units as the scene geometry.
pub trait TextMeasure {
    fn measure(&self, font: &FontSpec, text: &str) -> f64;
}

/// A font registry that maps font family + weight + style to font data.
pub struct FontRegistry {
    fonts: HashMap<FontKey, FontData>,
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct FontKey {
    pub family: String,
    pub weight: u32,
    pub italic: bool,
}

#[derive(Debug, Clone)]
pub enum FontData {
    /// A built-in font with static metrics.
    Standard(StandardFontMetrics),
    /// A TrueType/OpenType font supplied by the scene.
    Custom(CustomFontMetrics),
}

/// Parsed metrics from a TrueType/OpenType font via ttf-parser.
#[derive(Debug, Clone)]
pub struct CustomFontMetrics {
    pub units_per_em: u16,
    pub advance_widths: HashMap<char, u16>,
    pub default_advance: u16,
}

impl CustomFontMetrics {
    /// Get the advance width of a character in scene units.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let w = self
            .advance_widths
            .get(&ch)
            .copied()
            .unwrap_or(self.default_advance);
        (w as f64 / self.units_per_em as f64) * font_size
    }

    /// Parse metrics from font data using ttf-parser.
    pub fn from_font_data(data: &[u8]) -> Result<Self, ttf_parser::FaceParsingError> {
        let face = ttf_parser::Face::parse(data, 0)?;
        let units_per_em = face.units_per_em();

        let mut advance_widths = HashMap::new();
        let mut default_advance = 0u16;

        for code in 32u32..=0xFFFF {
            let Some(ch) = char::from_u32(code) else {
                continue;
            };
            if let Some(glyph_id) = face.glyph_index(ch) {
                let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0);
                advance_widths.insert(ch, advance);
                if ch == ' ' {
                    default_advance = advance;
                }
            }
        }

        if default_advance == 0 {
            default_advance = units_per_em / 2;
        }

        Ok(CustomFontMetrics {
            units_per_em,
            advance_widths,
            default_advance,
        })
    }
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRegistry {
    pub fn new() -> Self {
        let mut fonts = HashMap::new();

        let standard_mappings = [
            (("Helvetica", 400, false), StandardFontMetrics::HELVETICA),
            (("Helvetica", 700, false), StandardFontMetrics::HELVETICA_BOLD),
            (("Helvetica", 400, true), StandardFontMetrics::HELVETICA),
            (("Helvetica", 700, true), StandardFontMetrics::HELVETICA_BOLD),
            (("Courier", 400, false), StandardFontMetrics::COURIER),
            (("Courier", 700, false), StandardFontMetrics::COURIER),
            (("Courier", 400, true), StandardFontMetrics::COURIER),
            (("Courier", 700, true), StandardFontMetrics::COURIER),
        ];

        for ((family, weight, italic), metrics) in standard_mappings {
            fonts.insert(
                FontKey {
                    family: family.to_string(),
                    weight,
                    italic,
                },
                FontData::Standard(metrics),
            );
        }

        Self { fonts }
    }

    fn get(&self, family: &str, weight: u32, italic: bool) -> Option<&FontData> {
        self.fonts.get(&FontKey {
            family: family.to_string(),
            weight,
            italic,
        })
    }

    /// Look up a font, falling back to Helvetica if not found.
    pub fn resolve(&self, family: &str, weight: u32, italic: bool) -> &FontData {
        if let Some(font) = self.get(family, weight, italic) {
            return font;
        }

        // Snap to the nearest registered weight
        let snapped_weight = if weight >= 600 { 700 } else { 400 };
        if let Some(font) = self.get(family, snapped_weight, italic) {
            return font;
        }

        static FALLBACK: FontData = FontData::Standard(StandardFontMetrics::HELVETICA);
        self.get("Helvetica", snapped_weight, italic)
            .unwrap_or(&FALLBACK)
    }

    /// Register a custom font from raw TrueType/OpenType bytes.
    pub fn register(
        &mut self,
        family: &str,
        weight: u32,
        italic: bool,
        data: &[u8],
    ) -> Result<(), VellumError> {
        let metrics = CustomFontMetrics::from_font_data(data).map_err(|e| {
            VellumError::FontError(format!("Failed to parse font '{}': {}", family, e))
        })?;
        log::debug!(
            "Registered font '{}' weight {} italic {} ({} glyphs)",
            family,
            weight,
            italic,
            metrics.advance_widths.len()
        );
        self.fonts.insert(
            FontKey {
                family: family.to_string(),
                weight,
                italic,
            },
            FontData::Custom(metrics),
        );
        Ok(())
    }

    /// Register a custom font from a base64 string or a `data:` URI.
    pub fn register_encoded(
        &mut self,
        family: &str,
        weight: u32,
        italic: bool,
        src: &str,
    ) -> Result<(), VellumError> {
        let data = decode_font_source(src)
            .map_err(|e| VellumError::FontError(format!("Font '{}': {}", family, e)))?;
        self.register(family, weight, italic, &data)
    }
}

/// Resolve a font source string (data URI or raw base64) to bytes.
fn decode_font_source(src: &str) -> Result<Vec<u8>, String> {
    use base64::Engine;

    let payload = if src.starts_with("data:") {
        let comma_pos = src
            .find(',')
            .ok_or_else(|| "Invalid data URI: missing comma".to_string())?;
        &src[comma_pos + 1..]
    } else {
        src
    };

    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| format!("Base64 decode error: {}", e))
}

/// Shared font context used by text layout.
pub struct FontContext {
    registry: FontRegistry,
}

impl Default for FontContext {
    fn default() -> Self {
        Self::new()
    }
}

impl FontContext {
    pub fn new() -> Self {
        Self {
            registry: FontRegistry::new(),
        }
    }

    /// Get the advance width of a single character.
    pub fn char_width(&self, ch: char, family: &str, weight: u32, italic: bool, font_size: f64) -> f64 {
        match self.registry.resolve(family, weight, italic) {
            FontData::Standard(m) => m.char_width(ch, font_size),
            FontData::Custom(m) => m.char_width(ch, font_size),
        }
    }

    /// Measure the width of a string.
    pub fn measure_string(
        &self,
        text: &str,
        family: &str,
        weight: u32,
        italic: bool,
        font_size: f64,
    ) -> f64 {
        match self.registry.resolve(family, weight, italic) {
            FontData::Standard(m) => m.measure_string(text, font_size),
            FontData::Custom(m) => text.chars().map(|ch| m.char_width(ch, font_size)).sum(),
        }
    }

    /// Access the underlying font registry.
    pub fn registry(&self) -> &FontRegistry {
        &self.registry
    }

    /// Access the underlying font registry mutably.
    pub fn registry_mut(&mut self) -> &mut FontRegistry {
        &mut self.registry
    }
}

impl TextMeasure for FontContext {
    fn measure(&self, font: &FontSpec, text: &str) -> f64 {
        self.measure_string(text, &font.family, font.weight, font.italic, font.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_context_helvetica() {
        let ctx = FontContext::new();
        let w = ctx.char_width(' ', "Helvetica", 400, false, 12.0);
        assert!((w - 3.336).abs() < 0.001);
    }

    #[test]
    fn test_font_context_bold_wider() {
        let ctx = FontContext::new();
        let regular = ctx.measure_string("bold", "Helvetica", 400, false, 12.0);
        let bold = ctx.measure_string("bold", "Helvetica", 700, false, 12.0);
        assert!(bold > regular, "Bold text should be wider than regular");
    }

    #[test]
    fn test_font_context_fallback() {
        let ctx = FontContext::new();
        let w1 = ctx.char_width('A', "Helvetica", 400, false, 12.0);
        let w2 = ctx.char_width('A', "UnknownFont", 400, false, 12.0);
        assert!((w1 - w2).abs() < 0.001);
    }

    #[test]
    fn test_font_context_weight_resolution() {
        let ctx = FontContext::new();
        let w700 = ctx.char_width('A', "Helvetica", 700, false, 12.0);
        let w800 = ctx.char_width('A', "Helvetica", 800, false, 12.0);
        assert!((w700 - w800).abs() < 0.001);
    }

    #[test]
    fn test_measure_through_trait() {
        let ctx = FontContext::new();
        let spec = FontSpec {
            family: "Courier".into(),
            weight: 400,
            italic: false,
            size: 10.0,
        };
        assert!((ctx.measure(&spec, "abcd") - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_register_rejects_garbage() {
        let mut registry = FontRegistry::new();
        let err = registry.register("Broken", 400, false, b"not a font").unwrap_err();
        assert!(matches!(err, VellumError::FontError(_)));
    }

    #[test]
    fn test_register_encoded_rejects_bad_base64() {
        let mut registry = FontRegistry::new();
        let err = registry
            .register_encoded("Broken", 400, false, "data:font/ttf;base64,@@@")
            .unwrap_err();
        assert!(err.to_string().contains("Base64 decode error"));
    }
}
