//! Collaborator traits consumed by the proof carrier.
//!
//! The pixel-level symbol algorithm, page rasterization, and document
//! compositing are external collaborators. The carrier owns only the
//! placement geometry and the orchestration between them.

use crate::error::Result;
use crate::raster::RasterImage;

/// Encodes a payload into a scannable 2D symbol and reads it back.
pub trait SymbolCodec: Send + Sync {
    /// Render the payload as a raster symbol.
    fn encode(&self, payload: &str) -> Result<RasterImage>;

    /// Extract a payload from a raster, if one is present.
    ///
    /// A clean miss is `Ok(None)`; `Err` is reserved for broken input.
    fn decode(&self, image: &RasterImage) -> Result<Option<String>>;
}

/// Renders one page of a document to pixels.
pub trait PageRasterizer: Send + Sync {
    /// Rasterize the given page of the document.
    fn rasterize(&self, document: &[u8], page_index: usize) -> Result<RasterImage>;
}

/// The document's drawable surface, in its native coordinate space.
///
/// The native space has its origin at the bottom-left (y grows upward), as
/// in PDF; the carrier converts from displayed-canvas coordinates before
/// calling [`DocumentSurface::draw_image`].
pub trait DocumentSurface: Send + Sync {
    /// The native (width, height) of a page.
    fn page_size(&self, document: &[u8], page_index: usize) -> Result<(f64, f64)>;

    /// Composite an image onto a page at native coordinates, returning the
    /// new document bytes. The input document is never modified.
    fn draw_image(
        &self,
        document: &[u8],
        page_index: usize,
        image: &RasterImage,
        x: f64,
        y: f64,
    ) -> Result<Vec<u8>>;
}
