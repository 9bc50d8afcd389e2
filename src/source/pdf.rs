//! lopdf-backed word source.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use super::content::{collect_words, GlyphDecoder, PageGeometry};
use super::{PageWords, WordSource};
use crate::detect::{sniff_bytes, sniff_file};
use crate::error::{Error, Result};

/// US Letter, used when a page has no usable MediaBox.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Inheritance chains deeper than this are treated as cyclic.
const MAX_PARENT_DEPTH: usize = 32;

/// A [`WordSource`] that decodes PDF content streams with lopdf.
pub struct PdfWordSource {
    doc: LopdfDocument,
    pages: Vec<ObjectId>,
}

impl PdfWordSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        sniff_file(path)?;
        let doc = LopdfDocument::load(path)?;
        Self::from_document(doc)
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        sniff_bytes(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Self::from_document(doc)
    }

    /// Load a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    fn from_document(doc: LopdfDocument) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        let pages = doc.get_pages().into_values().collect();
        Ok(Self { doc, pages })
    }

    /// PDF version string from the file header.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Page media box as `[x0, y0, x1, y1]`, following `Parent` inheritance.
    fn media_box(&self, page_id: ObjectId) -> [f32; 4] {
        let mut current = self.doc.get_dictionary(page_id).ok();
        for _ in 0..MAX_PARENT_DEPTH {
            let Some(dict) = current else {
                break;
            };
            if let Some(rect) = dict
                .get(b"MediaBox")
                .ok()
                .and_then(|obj| self.resolve(obj))
                .and_then(|obj| obj.as_array().ok())
                .and_then(|arr| parse_rect(arr))
            {
                return rect;
            }
            current = dict
                .get(b"Parent")
                .ok()
                .and_then(|p| p.as_reference().ok())
                .and_then(|id| self.doc.get_dictionary(id).ok());
        }
        DEFAULT_MEDIA_BOX
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> Option<&'a Object> {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).ok(),
            other => Some(other),
        }
    }

    /// Raw (decompressed) content stream bytes for a page.
    ///
    /// A page without `/Contents` is blank and yields an empty stream.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let Ok(contents) = page_dict.get(b"Contents") else {
            return Ok(Vec::new());
        };

        let stream_bytes = |id: ObjectId| -> Result<Vec<u8>> {
            match self.doc.get_object(id) {
                Ok(Object::Stream(s)) => s
                    .decompressed_content()
                    .or_else(|_| Ok(s.content.clone())),
                Ok(_) => Err(Error::Corrupted(format!(
                    "content object {} {} is not a stream",
                    id.0, id.1
                ))),
                Err(e) => Err(Error::PdfParse(e.to_string())),
            }
        };

        match contents {
            Object::Reference(id) => match self.doc.get_object(*id) {
                Ok(Object::Array(arr)) => concat_streams(arr, stream_bytes),
                _ => stream_bytes(*id),
            },
            Object::Array(arr) => concat_streams(arr, stream_bytes),
            _ => Err(Error::Corrupted("invalid /Contents entry".to_string())),
        }
    }
}

fn concat_streams<F>(refs: &[Object], stream_bytes: F) -> Result<Vec<u8>>
where
    F: Fn(ObjectId) -> Result<Vec<u8>>,
{
    let mut content = Vec::new();
    for obj in refs {
        if let Object::Reference(id) = obj {
            match stream_bytes(*id) {
                Ok(data) => {
                    content.extend_from_slice(&data);
                    content.push(b'\n');
                }
                Err(e) => log::debug!("skipping content part {} {}: {}", id.0, id.1, e),
            }
        }
    }
    Ok(content)
}

fn parse_rect(arr: &[Object]) -> Option<[f32; 4]> {
    if arr.len() < 4 {
        return None;
    }
    let mut values = [0.0f32; 4];
    for (slot, obj) in values.iter_mut().zip(arr) {
        *slot = match obj {
            Object::Integer(i) => *i as f32,
            Object::Real(r) => *r,
            _ => return None,
        };
    }
    let [x0, y0, x1, y1] = values;
    Some([x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)])
}

impl WordSource for PdfWordSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<PageWords> {
        let page_id = *self
            .pages
            .get(index)
            .ok_or(Error::PageOutOfRange(index, self.pages.len()))?;

        let [x0, y0, x1, y1] = self.media_box(page_id);
        let mut page = PageWords::new(index, x1 - x0, y1 - y0);

        let content = self.page_content(page_id)?;
        if content.is_empty() {
            return Ok(page);
        }

        let operations = lopdf::content::Content::decode(&content)
            .map_err(|e| Error::PdfParse(e.to_string()))?
            .operations;

        let fonts = PageFonts {
            doc: &self.doc,
            fonts: self.doc.get_page_fonts(page_id).unwrap_or_default(),
        };
        let geometry = PageGeometry {
            index,
            left: x0,
            top: y1,
        };

        page.words = collect_words(&operations, &fonts, geometry);
        log::debug!("page {}: {} words", index + 1, page.words.len());
        Ok(page)
    }
}

/// Font resources of one page.
struct PageFonts<'a> {
    doc: &'a LopdfDocument,
    fonts: BTreeMap<Vec<u8>, &'a Dictionary>,
}

impl GlyphDecoder for PageFonts<'_> {
    fn font_name(&self, resource: &[u8]) -> Option<String> {
        let font = self.fonts.get(resource)?;
        Some(
            font.get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .unwrap_or_default(),
        )
    }

    fn decode(&self, resource: &[u8], bytes: &[u8]) -> String {
        if let Some(font) = self.fonts.get(resource) {
            if let Ok(encoding) = font.get_font_encoding(self.doc) {
                if let Ok(text) = LopdfDocument::decode_text(&encoding, bytes) {
                    return text;
                }
            }
        }
        decode_text_simple(bytes)
    }
}

/// Decoding fallback when the font has no usable encoding.
fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}
