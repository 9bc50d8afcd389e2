//! Positioned words.

/// Axis-aligned bounding box in page units (points).
///
/// Origin is the top-left corner of the page and `y` grows downward, so
/// `y0` is the top edge and `y1` the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Horizontal midpoint.
    pub fn center_x(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }

    /// Vertical midpoint.
    pub fn center_y(&self) -> f32 {
        (self.y0 + self.y1) / 2.0
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// A word with its position and font metadata.
///
/// An empty `font_name` or a non-positive `font_size` means the source could
/// not determine the font.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    /// The word text
    pub text: String,
    /// Bounding box on the page
    pub bbox: BBox,
    /// Font name (e.g., "ABCDEF+Helvetica-Bold")
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Page index (0-based)
    pub page: usize,
}

impl Word {
    /// Create a new word.
    pub fn new(
        text: impl Into<String>,
        bbox: BBox,
        font_name: impl Into<String>,
        font_size: f32,
        page: usize,
    ) -> Self {
        Self {
            text: text.into(),
            bbox,
            font_name: font_name.into(),
            font_size,
            page,
        }
    }

    /// Whether the word carries usable text and a non-degenerate box.
    pub fn is_usable(&self) -> bool {
        !self.text.trim().is_empty() && self.bbox.width() > 0.0
    }

    /// Whether both font name and size are known.
    pub fn has_font_metadata(&self) -> bool {
        !self.font_name.is_empty() && self.font_size > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_union() {
        let a = BBox::new(10.0, 20.0, 30.0, 40.0);
        let b = BBox::new(5.0, 25.0, 50.0, 35.0);
        assert_eq!(a.union(&b), BBox::new(5.0, 20.0, 50.0, 40.0));
        assert_eq!(a.width(), 20.0);
        assert_eq!(a.center_y(), 30.0);
    }

    #[test]
    fn test_word_usability() {
        let word = Word::new("Hello", BBox::new(0.0, 0.0, 20.0, 10.0), "Helvetica", 10.0, 0);
        assert!(word.is_usable());
        assert!(word.has_font_metadata());

        let blank = Word::new("  ", BBox::new(0.0, 0.0, 20.0, 10.0), "Helvetica", 10.0, 0);
        assert!(!blank.is_usable());

        let flat = Word::new("x", BBox::new(5.0, 0.0, 5.0, 10.0), "Helvetica", 10.0, 0);
        assert!(!flat.is_usable());

        let unknown = Word::new("x", BBox::new(0.0, 0.0, 5.0, 10.0), "", 0.0, 0);
        assert!(!unknown.has_font_metadata());
    }
}
