//! The page-handle adapter the redaction engine is built against.
//!
//! [`PageHandle`] is deliberately thin: every operation it exposes is a
//! direct translation to something [`crate::document::PdfDocument`] or
//! [`crate::editor::document_editor::DocumentEditor`] already does. The
//! engine never reaches into the object graph, xref table, or resource
//! manager itself; it only ever talks to a `PageHandle`.

use crate::editor::document_editor::DocumentEditor;
use crate::error::{Error, Result};
use crate::fonts::font_dict::FontInfo;
use crate::object::Object;

/// Ascent/descent and glyph-width data for one named font on a page, as used
/// by [`crate::redact::fontmetrics::FontMetricsProvider`].
///
/// Mirrors [`FontInfo`]'s width fields (it wraps one) and adds the
/// ascent/descent pair that text extraction never needed but bounding-box
/// computation does.
#[derive(Debug, Clone)]
pub struct FontDescriptorHandle {
    /// Parsed width/encoding data for the font, reused from the font-dict
    /// parser the rest of the crate already relies on for text extraction.
    pub info: FontInfo,
    /// Glyph-space ascent (1000-unit em), from `/FontDescriptor /Ascent`.
    pub ascent: f32,
    /// Glyph-space descent (1000-unit em, typically negative), from
    /// `/FontDescriptor /Descent`.
    pub descent: f32,
}

impl FontDescriptorHandle {
    /// Whether this font uses multi-byte (CID) character codes, i.e. a
    /// Type0 composite font. Determines whether word spacing (`Tw`) applies
    /// to the encoded byte `0x20` at all (PDF spec: never, for multi-byte
    /// encodings) and which width table `advance_for` consults.
    pub fn is_composite(&self) -> bool {
        self.info.subtype == "Type0"
    }

    /// Horizontal advance, in glyph-space (1000-unit em) units, for one
    /// character code. For composite fonts the code is a 2-byte CID; for
    /// simple fonts it is a single byte.
    pub fn advance_for(&self, code: u16) -> f32 {
        self.info.get_glyph_width(code)
    }
}

/// Adapter over an open [`DocumentEditor`] that exposes exactly the
/// operations the redaction engine needs from one page: its geometry, its
/// content-stream bytes, and its font resources.
///
/// Holds `&mut DocumentEditor` for its lifetime, which is what gives
/// `redact_area` exclusive access to the page for the call's duration —
/// Rust's borrow checker enforces the single-writer invariant rather than an
/// explicit lock.
pub struct PageHandle<'a> {
    editor: &'a mut DocumentEditor,
    page_index: usize,
}

impl<'a> PageHandle<'a> {
    /// Open a handle to one page of an already-open document. Fails if the
    /// page index is out of range.
    pub fn new(editor: &'a mut DocumentEditor, page_index: usize) -> Result<Self> {
        if page_index >= editor.current_page_count() {
            return Err(Error::InvalidPdf(format!(
                "page index {} out of range ({} pages)",
                page_index,
                editor.current_page_count()
            )));
        }
        Ok(Self { editor, page_index })
    }

    /// Page index this handle addresses.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// `(width_pts, height_pts)` of the page's unrotated MediaBox.
    ///
    /// Reads via `DocumentEditor::get_page_media_box`, which is not gated
    /// behind the `rendering` feature (unlike `PdfDocument::get_page_info`,
    /// which `get_page_rotation` below deliberately avoids for the same
    /// reason).
    pub fn media_box(&mut self) -> Result<(f64, f64)> {
        let [llx, lly, urx, ury] = self.editor.get_page_media_box(self.page_index)?;
        Ok(((urx - llx) as f64, (ury - lly) as f64))
    }

    /// Current page rotation in degrees: 0, 90, 180, or 270.
    ///
    /// `DocumentEditor::get_page_rotation` falls back to
    /// `PdfDocument::get_page_info`, which only exists under the `rendering`
    /// feature; this reimplements the same fallback (pending rotation
    /// override, else the page dictionary's inherited `/Rotate`) against the
    /// always-available `PdfDocument::get_page`.
    pub fn rotation(&mut self) -> Result<i32> {
        if let Some(rotation) = self.editor.pending_rotation(self.page_index) {
            return Ok(rotation);
        }
        let page_obj = self.editor.source_mut().get_page(self.page_index)?;
        let dict = page_obj.as_dict().ok_or_else(|| {
            Error::InvalidPdf("page object is not a dictionary".to_string())
        })?;
        let rotation = match dict.get("Rotate") {
            Some(obj) => obj.as_integer().unwrap_or(0) as i32,
            None => 0,
        };
        Ok(((rotation % 360) + 360) % 360)
    }

    /// The page's content-stream bytes, concatenated into one program.
    pub fn content_streams(&mut self) -> Result<Vec<u8>> {
        self.editor.get_page_content_bytes(self.page_index)
    }

    /// Replace the page's entire content program with `bytes`, discarding
    /// whatever streams it previously had.
    pub fn replace_content_streams(&mut self, bytes: &[u8]) -> Result<()> {
        self.editor.replace_page_content(self.page_index, bytes.to_vec())
    }

    /// Append an additional content-stream blob after any pending
    /// replacement (used for the confirmation mark).
    pub fn append_content_stream(&mut self, bytes: &[u8]) -> Result<()> {
        self.editor.append_page_content(self.page_index, bytes.to_vec())
    }

    /// Discard any pending replacement/append content for this page, used
    /// to roll back a redaction call that failed after content was already
    /// staged.
    pub fn clear_pending_content(&mut self) {
        self.editor.clear_redact_content(self.page_index);
    }

    /// Resolve a font resource name (e.g. `"F1"`) against the page's
    /// inherited `/Resources/Font` dictionary, returning its ascent/descent
    /// and width tables, or `None` if the page has no such font resource.
    pub fn resources_font_entry(&mut self, name: &str) -> Result<Option<FontDescriptorHandle>> {
        let page_obj = self.editor.source_mut().get_page(self.page_index)?;
        let page_dict = page_obj.as_dict().ok_or_else(|| {
            Error::InvalidPdf("page object is not a dictionary".to_string())
        })?;

        let Some(resources) = page_dict.get("Resources") else {
            return Ok(None);
        };
        let resources = resolve(self.editor.source_mut(), resources)?;
        let Some(resources_dict) = resources.as_dict() else {
            return Ok(None);
        };

        let Some(font_dict_obj) = resources_dict.get("Font") else {
            return Ok(None);
        };
        let font_dict_obj = resolve(self.editor.source_mut(), font_dict_obj)?;
        let Some(font_dict) = font_dict_obj.as_dict() else {
            return Ok(None);
        };

        let Some(font_entry) = font_dict.get(name) else {
            return Ok(None);
        };
        let font_obj = resolve(self.editor.source_mut(), font_entry)?;
        if font_obj.as_dict().is_none() {
            return Ok(None);
        }

        let info = FontInfo::from_dict(&font_obj, self.editor.source_mut())?;
        let (ascent, descent) = font_ascent_descent(self.editor.source_mut(), &font_obj)?;

        Ok(Some(FontDescriptorHandle { info, ascent, descent }))
    }

    /// `/Subtype` of a named entry in the page's `/Resources/XObject`
    /// dictionary (`"Image"` or `"Form"`), or `None` if no such resource
    /// exists. Used to tell an image `Do` (which paints pixels and gets a
    /// bbox) from a form `Do` (opaque to this engine, treated as a state
    /// change with no bbox).
    pub fn xobject_subtype(&mut self, name: &str) -> Result<Option<String>> {
        let page_obj = self.editor.source_mut().get_page(self.page_index)?;
        let page_dict = page_obj.as_dict().ok_or_else(|| {
            Error::InvalidPdf("page object is not a dictionary".to_string())
        })?;

        let Some(resources) = page_dict.get("Resources") else {
            return Ok(None);
        };
        let resources = resolve(self.editor.source_mut(), resources)?;
        let Some(resources_dict) = resources.as_dict() else {
            return Ok(None);
        };

        let Some(xobject_dict_obj) = resources_dict.get("XObject") else {
            return Ok(None);
        };
        let xobject_dict_obj = resolve(self.editor.source_mut(), xobject_dict_obj)?;
        let Some(xobject_dict) = xobject_dict_obj.as_dict() else {
            return Ok(None);
        };

        let Some(entry) = xobject_dict.get(name) else {
            return Ok(None);
        };
        let entry = resolve(self.editor.source_mut(), entry)?;
        let Some(entry_dict) = entry.as_dict() else {
            return Ok(None);
        };

        Ok(entry_dict.get("Subtype").and_then(|o| o.as_name()).map(|s| s.to_string()))
    }
}

/// Resolve `obj` if it is an indirect reference, otherwise return it cloned.
fn resolve(doc: &mut crate::document::PdfDocument, obj: &Object) -> Result<Object> {
    match obj.as_reference() {
        Some(r) => doc.load_object(r),
        None => Ok(obj.clone()),
    }
}

/// Read `/FontDescriptor /Ascent` and `/Descent` from a (possibly Type0)
/// font dictionary. For a Type0 font the descriptor lives on
/// `/DescendantFonts[0]`, not the Type0 dict itself.
///
/// Returns `(0.0, 0.0)` if no descriptor is present, signaling to
/// [`crate::redact::fontmetrics`] that it should fall through to the
/// standard-14 or conservative-default tier.
fn font_ascent_descent(doc: &mut crate::document::PdfDocument, font_obj: &Object) -> Result<(f32, f32)> {
    let font_dict = font_obj.as_dict().expect("caller already checked as_dict");

    let descriptor_owner = if font_dict.get("Subtype").and_then(|o| o.as_name()) == Some("Type0") {
        let Some(descendants) = font_dict.get("DescendantFonts") else {
            return Ok((0.0, 0.0));
        };
        let descendants = resolve(doc, descendants)?;
        let Some(arr) = descendants.as_array() else {
            return Ok((0.0, 0.0));
        };
        let Some(first) = arr.first() else {
            return Ok((0.0, 0.0));
        };
        resolve(doc, first)?
    } else {
        font_obj.clone()
    };

    let Some(owner_dict) = descriptor_owner.as_dict() else {
        return Ok((0.0, 0.0));
    };
    let Some(descriptor) = owner_dict.get("FontDescriptor") else {
        return Ok((0.0, 0.0));
    };
    let descriptor = resolve(doc, descriptor)?;
    let Some(descriptor_dict) = descriptor.as_dict() else {
        return Ok((0.0, 0.0));
    };

    let ascent = descriptor_dict
        .get("Ascent")
        .and_then(|o| o.as_real().or_else(|| o.as_integer().map(|i| i as f64)))
        .unwrap_or(0.0) as f32;
    let descent = descriptor_dict
        .get("Descent")
        .and_then(|o| o.as_real().or_else(|| o.as_integer().map(|i| i as f64)))
        .unwrap_or(0.0) as f32;

    Ok((ascent, descent))
}
