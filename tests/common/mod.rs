//! Synthetic PDF fixtures built with lopdf.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// Bold face, resource name `F1`.
pub const BOLD: &str = "F1";
/// Regular face, resource name `F2`.
pub const REGULAR: &str = "F2";

pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;

const BODY: &str = "the quick brown fox jumps over the lazy dog again";

/// One line of text placed with `Td`, in PDF user space (baseline up from
/// the bottom of the page).
#[derive(Debug, Clone)]
pub struct TextLine {
    pub text: String,
    pub font: &'static str,
    pub size: f32,
    pub x: f32,
    pub baseline: f32,
}

impl TextLine {
    pub fn new(text: &str, font: &'static str, size: f32, x: f32, baseline: f32) -> Self {
        Self {
            text: text.to_string(),
            font,
            size,
            x,
            baseline,
        }
    }

    /// A line centered horizontally, assuming half-em glyphs.
    pub fn centered(text: &str, font: &'static str, size: f32, baseline: f32) -> Self {
        let width = text.chars().count() as f32 * size * 0.5;
        Self::new(text, font, size, (PAGE_WIDTH - width) / 2.0, baseline)
    }
}

/// `count` lines of 10 pt body text starting at `baseline`, 12 pt apart.
pub fn body(baseline: f32, count: usize) -> Vec<TextLine> {
    (0..count)
        .map(|i| TextLine::new(BODY, REGULAR, 10.0, 72.0, baseline - i as f32 * 12.0))
        .collect()
}

fn page_content(lines: &[TextLine]) -> Vec<u8> {
    let mut operations = Vec::new();
    for line in lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![Object::Name(line.font.as_bytes().to_vec()), Object::Real(line.size)],
        ));
        operations.push(Operation::new(
            "Td",
            vec![Object::Real(line.x), Object::Real(line.baseline)],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(line.text.as_str())],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    Content { operations }.encode().unwrap()
}

/// Build a US Letter PDF with one content stream per page.
pub fn build_pdf(pages: &[Vec<TextLine>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();

    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Times-Roman",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            BOLD => bold_id,
            REGULAR => regular_id,
        },
    });

    let mut kids = Vec::new();
    for lines in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, page_content(lines)));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(PAGE_WIDTH),
            Object::Real(PAGE_HEIGHT),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// A two-page report with a title, a running header, and three headings.
///
/// Expected outline: "Introduction" (H1, page 1), "Methods" (H1, page 2),
/// "Data Sources" (H2, page 2).
pub fn sample_report() -> Vec<u8> {
    let header = || TextLine::new("ACME CORP", BOLD, 9.0, 72.0, 770.0);

    let mut first = vec![
        header(),
        TextLine::centered("Annual Report", BOLD, 28.0, 672.0),
        TextLine::new("Introduction", BOLD, 18.0, 72.0, 600.0),
    ];
    first.extend(body(560.0, 4));

    let mut second = vec![header(), TextLine::new("Methods", BOLD, 18.0, 72.0, 700.0)];
    second.extend(body(660.0, 4));
    second.push(TextLine::new("Data Sources", BOLD, 14.0, 72.0, 560.0));
    second.extend(body(530.0, 4));

    build_pdf(&[first, second])
}
