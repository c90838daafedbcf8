use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

/// Text measurement oracle consumed by the layout core. Implementations
/// must be deterministic for identical inputs within one layout run.
pub trait TextMeasure {
    /// Advance width of a single line of text, in pixels.
    fn text_width(&self, text: &str, font_size: f32) -> f32;

    /// Height of one text line including ascenders and descenders.
    fn text_height(&self, font_size: f32) -> f32;

    fn average_char_width(&self, font_size: f32) -> f32;

    /// Character budget for word-wrapping a label into `pixel_width`.
    fn max_chars_for_width(&self, pixel_width: f32, font_size: f32) -> usize {
        let avg = self.average_char_width(font_size).max(1e-3);
        ((pixel_width / avg).floor() as usize).max(1)
    }
}

/// Width factor per character cell, relative to the font size. Coarse
/// buckets calibrated against common sans-serif faces; used whenever no
/// real font face is available.
fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' => 0.31,
        'i' | 'j' | 'l' | '\'' => 0.24,
        'f' | 't' | 'r' | 'I' => 0.33,
        '.' | ',' | ':' | ';' | '|' | '!' | '(' | ')' | '[' | ']' | '{' | '}' => 0.32,
        'm' | 'w' => 0.85,
        'M' | 'W' | '@' | '%' | '&' => 0.92,
        'a'..='z' => 0.56,
        'A'..='Z' => 0.67,
        '0'..='9' => 0.60,
        _ => 0.57,
    }
}

const LINE_HEIGHT_FACTOR: f32 = 1.2;
const AVERAGE_WIDTH_FACTOR: f32 = 0.56;

/// Table-driven measurer. No font IO, fully deterministic; the default
/// oracle for tests and headless layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharMetrics;

impl TextMeasure for CharMetrics {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().map(char_width_factor).sum::<f32>() * font_size
    }

    fn text_height(&self, font_size: f32) -> f32 {
        font_size * LINE_HEIGHT_FACTOR
    }

    fn average_char_width(&self, font_size: f32) -> f32 {
        font_size * AVERAGE_WIDTH_FACTOR
    }
}

static FONT_DB: Lazy<Mutex<Database>> = Lazy::new(|| {
    let mut db = Database::new();
    db.load_system_fonts();
    Mutex::new(db)
});

struct LoadedFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: f32,
    line_units: f32,
    ascii_advances: [u16; 128],
    advance_cache: HashMap<char, Option<u16>>,
}

impl LoadedFace {
    fn from_face_data(data: Vec<u8>, index: u32) -> Option<Self> {
        let face = Face::parse(&data, index).ok()?;
        let units_per_em = face.units_per_em().max(1) as f32;
        let line_units = (face.ascender() as i32 - face.descender() as i32).max(1) as f32;
        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph) = face.glyph_index(byte as char) {
                ascii_advances[byte as usize] = face.glyph_hor_advance(glyph).unwrap_or(0);
            }
        }
        Some(Self {
            data,
            index,
            units_per_em,
            line_units,
            ascii_advances,
            advance_cache: HashMap::new(),
        })
    }

    fn advance(&mut self, ch: char) -> Option<u16> {
        if ch.is_ascii() {
            let advance = self.ascii_advances[ch as usize];
            return (advance > 0).then_some(advance);
        }
        if let Some(cached) = self.advance_cache.get(&ch) {
            return *cached;
        }
        // Non-ASCII misses re-parse the face; the result is cached so
        // each distinct character pays the cost once.
        let advance = Face::parse(&self.data, self.index)
            .ok()
            .and_then(|face| face.glyph_index(ch))
            .and_then(|glyph| {
                Face::parse(&self.data, self.index)
                    .ok()
                    .and_then(|face| face.glyph_hor_advance(glyph))
            });
        self.advance_cache.insert(ch, advance);
        advance
    }
}

/// Measurer backed by a real system font face, queried once per
/// instance through fontdb and read with ttf-parser. Falls back to the
/// character table for characters (or whole families) the system cannot
/// resolve.
pub struct FontMetrics {
    face: Option<Mutex<LoadedFace>>,
}

impl FontMetrics {
    pub fn new(font_family: &str) -> Self {
        Self {
            face: load_face(font_family).map(Mutex::new),
        }
    }
}

impl TextMeasure for FontMetrics {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let Some(face) = &self.face else {
            return CharMetrics.text_width(text, font_size);
        };
        let Ok(mut face) = face.lock() else {
            return CharMetrics.text_width(text, font_size);
        };
        let scale = font_size / face.units_per_em;
        let mut width = 0.0f32;
        for ch in text.chars() {
            match face.advance(ch) {
                Some(advance) => width += advance as f32 * scale,
                None => width += char_width_factor(ch) * font_size,
            }
        }
        width.max(0.0)
    }

    fn text_height(&self, font_size: f32) -> f32 {
        let Some(face) = &self.face else {
            return CharMetrics.text_height(font_size);
        };
        let Ok(face) = face.lock() else {
            return CharMetrics.text_height(font_size);
        };
        font_size * face.line_units / face.units_per_em
    }

    fn average_char_width(&self, font_size: f32) -> f32 {
        let sample = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
        self.text_width(sample, font_size) / sample.len() as f32
    }
}

fn load_face(font_family: &str) -> Option<LoadedFace> {
    let mut names: Vec<String> = Vec::new();
    let mut generics: Vec<Option<Family<'static>>> = Vec::new();
    for part in font_family.split(',') {
        let raw = part.trim().trim_matches('"').trim_matches('\'');
        if raw.is_empty() {
            continue;
        }
        match raw.to_ascii_lowercase().as_str() {
            "serif" => generics.push(Some(Family::Serif)),
            "monospace" | "ui-monospace" => generics.push(Some(Family::Monospace)),
            "cursive" => generics.push(Some(Family::Cursive)),
            "fantasy" => generics.push(Some(Family::Fantasy)),
            "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                generics.push(Some(Family::SansSerif))
            }
            _ => {
                names.push(raw.to_string());
                generics.push(None);
            }
        }
    }

    let mut name_iter = names.iter();
    let mut families: Vec<Family<'_>> = Vec::with_capacity(generics.len().max(1));
    for generic in &generics {
        match generic {
            Some(family) => families.push(*family),
            None => {
                if let Some(name) = name_iter.next() {
                    families.push(Family::Name(name.as_str()));
                }
            }
        }
    }
    if families.is_empty() {
        families.push(Family::SansSerif);
    }

    let db = FONT_DB.lock().ok()?;
    let id = db.query(&Query {
        families: &families,
        weight: Weight::NORMAL,
        stretch: Stretch::Normal,
        style: Style::Normal,
    })?;
    let mut loaded = None;
    db.with_face_data(id, |data, index| {
        loaded = LoadedFace::from_face_data(data.to_vec(), index);
    });
    loaded
}
