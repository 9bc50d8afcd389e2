//! Content stream interpretation into positioned words.
//!
//! Tracks the graphics and text state needed to place glyph runs on the
//! page (CTM, text and line matrices, font, leading, spacing) and splits
//! shown text into words. Glyph widths are estimated from the font size,
//! which is accurate enough for line and block grouping.

use lopdf::content::Operation;
use lopdf::Object;
use unicode_normalization::UnicodeNormalization;

use crate::model::{BBox, Word};

/// Average glyph advance as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// Ascender and descender as fractions of the font size.
const ASCENT: f32 = 0.8;
const DESCENT: f32 = 0.2;

/// TJ adjustments larger than this (thousandths of an em) separate words.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// A run positioned within this fraction of an em of the previous run's end,
/// on the same baseline, continues the same word.
const WORD_JOIN_TOLERANCE: f32 = 0.15;

/// Size used to advance glyphs drawn before any `Tf`.
const FALLBACK_GLYPH_SIZE: f32 = 12.0;

/// Font lookup and text decoding for one page.
pub trait GlyphDecoder {
    /// Base font name for a font resource (e.g., `F1` -> `Helvetica-Bold`).
    fn font_name(&self, resource: &[u8]) -> Option<String>;

    /// Decode the bytes of a text-showing operator.
    fn decode(&self, resource: &[u8], bytes: &[u8]) -> String;
}

/// Page box used to convert PDF user space into top-down page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Page index (0-based)
    pub index: usize,
    /// Left edge of the media box
    pub left: f32,
    /// Top edge of the media box (PDF y of the upper edge)
    pub top: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_operands(operands: &[Object]) -> Option<Matrix> {
        if operands.len() < 6 {
            return None;
        }
        Some(Matrix {
            a: number(&operands[0])?,
            b: number(&operands[1])?,
            c: number(&operands[2])?,
            d: number(&operands[3])?,
            e: number(&operands[4])?,
            f: number(&operands[5])?,
        })
    }

    fn translation(tx: f32, ty: f32) -> Matrix {
        Matrix {
            e: tx,
            f: ty,
            ..Matrix::IDENTITY
        }
    }

    /// `self x other` in PDF row-vector convention.
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn origin(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

#[derive(Debug, Clone)]
struct PendingWord {
    text: String,
    x0: f32,
    x1: f32,
    baseline: f32,
    font_name: String,
    font_size: f32,
}

struct Interpreter<'a, D: GlyphDecoder + ?Sized> {
    decoder: &'a D,
    geometry: PageGeometry,
    ctm: Matrix,
    ctm_stack: Vec<Matrix>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    font_resource: Vec<u8>,
    font_name: String,
    font_size: f32,
    leading: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scale: f32,
    pending: Option<PendingWord>,
    words: Vec<Word>,
}

impl<'a, D: GlyphDecoder + ?Sized> Interpreter<'a, D> {
    fn new(decoder: &'a D, geometry: PageGeometry) -> Self {
        Self {
            decoder,
            geometry,
            ctm: Matrix::IDENTITY,
            ctm_stack: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            font_resource: Vec::new(),
            font_name: String::new(),
            font_size: 0.0,
            leading: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scale: 1.0,
            pending: None,
            words: Vec::new(),
        }
    }

    fn run(mut self, operations: &[Operation]) -> Vec<Word> {
        for op in operations {
            self.apply(op);
        }
        self.flush();
        self.words
    }

    fn apply(&mut self, op: &Operation) {
        let operands = &op.operands;
        match op.operator.as_str() {
            "q" => self.ctm_stack.push(self.ctm),
            "Q" => {
                self.flush();
                if let Some(ctm) = self.ctm_stack.pop() {
                    self.ctm = ctm;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.flush();
                    self.ctm = m.then(&self.ctm);
                }
            }
            "BT" => {
                self.flush();
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "ET" => self.flush(),
            "Tf" => {
                if operands.len() >= 2 {
                    self.flush();
                    if let Object::Name(resource) = &operands[0] {
                        self.font_name = self
                            .decoder
                            .font_name(resource)
                            .unwrap_or_else(|| String::from_utf8_lossy(resource).to_string());
                        self.font_resource = resource.clone();
                    }
                    self.font_size = number(&operands[1]).unwrap_or(0.0);
                }
            }
            "TL" => self.leading = first_number(operands).unwrap_or(self.leading),
            "Tc" => self.char_spacing = first_number(operands).unwrap_or(0.0),
            "Tw" => self.word_spacing = first_number(operands).unwrap_or(0.0),
            "Tz" => self.horizontal_scale = first_number(operands).unwrap_or(100.0) / 100.0,
            "Td" | "TD" => {
                if operands.len() >= 2 {
                    let tx = number(&operands[0]).unwrap_or(0.0);
                    let ty = number(&operands[1]).unwrap_or(0.0);
                    if op.operator == "TD" {
                        self.leading = -ty;
                    }
                    self.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.text_matrix = m;
                    self.line_matrix = m;
                    self.flush_unless_continued();
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(bytes);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => self.show(bytes),
                            other => {
                                if let Some(adjustment) = number(other) {
                                    self.adjust(adjustment);
                                }
                            }
                        }
                    }
                }
            }
            "'" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(bytes);
                }
            }
            "\"" => {
                if operands.len() >= 3 {
                    self.word_spacing = number(&operands[0]).unwrap_or(0.0);
                    self.char_spacing = number(&operands[1]).unwrap_or(0.0);
                    self.next_line();
                    if let Object::String(bytes, _) = &operands[2] {
                        self.show(bytes);
                    }
                }
            }
            _ => {}
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).then(&self.line_matrix);
        self.text_matrix = self.line_matrix;
        self.flush_unless_continued();
    }

    /// After a repositioning, keep the open word only if the new origin
    /// lies where it ends: same baseline, same font and size, and a gap
    /// smaller than `WORD_JOIN_TOLERANCE` em.
    fn flush_unless_continued(&mut self) {
        let Some(pending) = self.pending.as_ref() else {
            return;
        };
        let device = self.text_matrix.then(&self.ctm);
        let (x, y) = device.origin();
        let size = self.font_size * device.vertical_scale();
        let em = if pending.font_size > 0.0 {
            pending.font_size
        } else {
            FALLBACK_GLYPH_SIZE
        };
        let tolerance = WORD_JOIN_TOLERANCE * em;

        let continues = pending.font_name == self.font_name
            && (size - pending.font_size).abs() < 0.01
            && (y - pending.baseline).abs() <= tolerance
            && (x - pending.x1).abs() <= tolerance;
        if !continues {
            self.flush();
        }
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    /// Advance the text matrix horizontally by `tx` text-space units.
    fn advance(&mut self, tx: f32) {
        self.text_matrix = Matrix::translation(tx, 0.0).then(&self.text_matrix);
    }

    fn adjust(&mut self, thousandths: f32) {
        if -thousandths > TJ_SPACE_THRESHOLD {
            self.flush();
        }
        self.advance(-thousandths / 1000.0 * self.font_size * self.horizontal_scale);
    }

    fn show(&mut self, bytes: &[u8]) {
        let text = self.decoder.decode(&self.font_resource, bytes);
        let glyph_size = if self.font_size > 0.0 {
            self.font_size
        } else {
            FALLBACK_GLYPH_SIZE
        };
        for ch in text.chars() {
            let mut tx = glyph_size * AVG_GLYPH_WIDTH + self.char_spacing;
            if ch == ' ' {
                tx += self.word_spacing;
            }
            tx *= self.horizontal_scale;

            if ch.is_whitespace() {
                self.flush();
                self.advance(tx);
                continue;
            }

            let device = self.text_matrix.then(&self.ctm);
            let (x, y) = device.origin();
            let size = self.font_size * device.vertical_scale();
            self.advance(tx);
            let (end_x, _) = self.text_matrix.then(&self.ctm).origin();

            if self.pending.is_none() {
                self.pending = Some(PendingWord {
                    text: String::new(),
                    x0: x.min(end_x),
                    x1: x.max(end_x),
                    baseline: y,
                    font_name: self.font_name.clone(),
                    font_size: size,
                });
            }
            if let Some(pending) = self.pending.as_mut() {
                pending.text.push(ch);
                pending.x0 = pending.x0.min(x.min(end_x));
                pending.x1 = pending.x1.max(x.max(end_x));
            }
        }
    }

    fn flush(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        let text: String = pending.text.nfkc().collect();
        if text.trim().is_empty() {
            return;
        }

        let size = round_size(pending.font_size);
        let page_top = self.geometry.top;
        let bbox = BBox::new(
            pending.x0 - self.geometry.left,
            page_top - (pending.baseline + size * ASCENT),
            pending.x1 - self.geometry.left,
            page_top - (pending.baseline - size * DESCENT),
        );
        self.words.push(Word::new(
            text,
            bbox,
            pending.font_name,
            size,
            self.geometry.index,
        ));
    }
}

/// Interpret decoded content stream operations and return the words they
/// draw, in drawing order.
pub fn collect_words<D: GlyphDecoder + ?Sized>(
    operations: &[Operation],
    decoder: &D,
    geometry: PageGeometry,
) -> Vec<Word> {
    Interpreter::new(decoder, geometry).run(operations)
}

/// Round a font size to 0.01 pt so that sizes computed through different
/// matrices compare equal.
fn round_size(size: f32) -> f32 {
    (size.abs() * 100.0).round() / 100.0
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

fn first_number(operands: &[Object]) -> Option<f32> {
    operands.first().and_then(number)
}
