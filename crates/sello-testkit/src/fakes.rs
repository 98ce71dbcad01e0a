//! Fake proof collaborators over a toy document format.
//!
//! The toy format is any byte blob; drawing appends a tagged marker region
//! and rasterizing reads the last one back. This makes the full
//! embed-then-scan loop testable without a real PDF or QR library.

use std::sync::Arc;

use sello_proof::{
    DocumentSurface, PageRasterizer, ProofCarrier, ProofError, RasterImage, SymbolCodec,
};

const SYMBOL_MAGIC: &[u8; 4] = b"SLQR";
const MARKER_MAGIC: &[u8; 4] = b"SLMK";

/// Symbol side length used by [`FakeSymbolCodec`], in pixels.
pub const FAKE_SYMBOL_SIDE: u32 = 120;

/// A codec that stores the payload bytes directly in the pixel buffer.
pub struct FakeSymbolCodec;

impl SymbolCodec for FakeSymbolCodec {
    fn encode(&self, payload: &str) -> sello_proof::Result<RasterImage> {
        let bytes = payload.as_bytes();
        let capacity = (FAKE_SYMBOL_SIDE * FAKE_SYMBOL_SIDE * 4) as usize;
        if bytes.len() + 8 > capacity {
            return Err(ProofError::Encode(format!(
                "payload of {} bytes exceeds symbol capacity",
                bytes.len()
            )));
        }
        let mut pixels = vec![0u8; capacity];
        pixels[..4].copy_from_slice(SYMBOL_MAGIC);
        pixels[4..8].copy_from_slice(&(bytes.len() as u32).to_le_bytes());
        pixels[8..8 + bytes.len()].copy_from_slice(bytes);
        Ok(RasterImage::new(FAKE_SYMBOL_SIDE, FAKE_SYMBOL_SIDE, pixels).expect("sized buffer"))
    }

    fn decode(&self, image: &RasterImage) -> sello_proof::Result<Option<String>> {
        let pixels = image.pixels();
        if pixels.len() < 8 || &pixels[..4] != SYMBOL_MAGIC {
            return Ok(None);
        }
        let len = u32::from_le_bytes(pixels[4..8].try_into().expect("4 bytes")) as usize;
        if pixels.len() < 8 + len {
            return Err(ProofError::Decode("truncated symbol payload".into()));
        }
        String::from_utf8(pixels[8..8 + len].to_vec())
            .map(Some)
            .map_err(|e| ProofError::Decode(e.to_string()))
    }
}

/// A drawable surface over the toy format.
///
/// Pages all share one size; drawing appends a marker region to the document
/// bytes, leaving the original untouched.
pub struct FakeDocumentSurface {
    pages: usize,
    page_size: (f64, f64),
}

impl FakeDocumentSurface {
    pub fn new(pages: usize, page_size: (f64, f64)) -> Self {
        Self { pages, page_size }
    }
}

impl Default for FakeDocumentSurface {
    /// One US Letter page at 72 dpi.
    fn default() -> Self {
        Self::new(1, (612.0, 792.0))
    }
}

impl DocumentSurface for FakeDocumentSurface {
    fn page_size(&self, _document: &[u8], page_index: usize) -> sello_proof::Result<(f64, f64)> {
        if page_index >= self.pages {
            return Err(ProofError::PageOutOfRange(page_index));
        }
        Ok(self.page_size)
    }

    fn draw_image(
        &self,
        document: &[u8],
        page_index: usize,
        image: &RasterImage,
        x: f64,
        y: f64,
    ) -> sello_proof::Result<Vec<u8>> {
        if page_index >= self.pages {
            return Err(ProofError::PageOutOfRange(page_index));
        }
        let mut out = document.to_vec();
        out.extend_from_slice(MARKER_MAGIC);
        out.extend_from_slice(&(page_index as u32).to_le_bytes());
        out.extend_from_slice(&x.to_le_bytes());
        out.extend_from_slice(&y.to_le_bytes());
        out.extend_from_slice(&image.width().to_le_bytes());
        out.extend_from_slice(&image.height().to_le_bytes());
        out.extend_from_slice(image.pixels());
        Ok(out)
    }
}

/// A marker region parsed back out of a toy document.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedMarker {
    pub page_index: usize,
    pub x: f64,
    pub y: f64,
    pub image: RasterImage,
}

/// Parse the last marker region appended to a toy document, if any.
pub fn last_marker(document: &[u8]) -> Option<EmbeddedMarker> {
    let start = document
        .windows(MARKER_MAGIC.len())
        .rposition(|w| w == MARKER_MAGIC)?;
    let body = &document[start + 4..];
    if body.len() < 28 {
        return None;
    }
    let page_index = u32::from_le_bytes(body[0..4].try_into().ok()?) as usize;
    let x = f64::from_le_bytes(body[4..12].try_into().ok()?);
    let y = f64::from_le_bytes(body[12..20].try_into().ok()?);
    let width = u32::from_le_bytes(body[20..24].try_into().ok()?);
    let height = u32::from_le_bytes(body[24..28].try_into().ok()?);
    let len = (width as usize) * (height as usize) * 4;
    if body.len() < 28 + len {
        return None;
    }
    let image = RasterImage::new(width, height, body[28..28 + len].to_vec())?;
    Some(EmbeddedMarker {
        page_index,
        x,
        y,
        image,
    })
}

/// Rasterizes a toy-format page by returning its last embedded marker
/// region, or a blank page if none was drawn.
pub struct FakePageRasterizer;

impl PageRasterizer for FakePageRasterizer {
    fn rasterize(&self, document: &[u8], page_index: usize) -> sello_proof::Result<RasterImage> {
        match last_marker(document) {
            Some(marker) if marker.page_index == page_index => Ok(marker.image),
            _ => Ok(RasterImage::blank(612, 792)),
        }
    }
}

/// A carrier wired to the fake codec, surface, and rasterizer.
pub fn fake_carrier() -> ProofCarrier {
    ProofCarrier::new(
        Arc::new(FakeSymbolCodec),
        Arc::new(FakeDocumentSurface::default()),
        Arc::new(FakePageRasterizer),
    )
}
