//! The proof carrier: placement geometry and collaborator orchestration.
//!
//! Positions arrive in the displayed-canvas coordinate space (origin
//! top-left, y grows downward). The document's native space is bottom-up, so
//! embedding converts with
//! `proof_y = page_height - (position.y * scale_y + image_height)`.
//! Drag-supplied positions are clamped so the marker stays fully inside the
//! visible page before any conversion happens.

use std::sync::Arc;

use crate::error::{ProofError, Result};
use crate::raster::RasterImage;
use crate::traits::{DocumentSurface, PageRasterizer, SymbolCodec};

/// A position in displayed-canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasPosition {
    pub x: f64,
    pub y: f64,
}

/// The size of the displayed canvas the position was picked on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasViewport {
    pub width: f64,
    pub height: f64,
}

/// Where to place the proof marker on a document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerPlacement {
    /// Marker position on the displayed canvas (top-left of the marker).
    pub position: CanvasPosition,
    /// Canvas dimensions used to scale into page space.
    pub viewport: CanvasViewport,
    /// Zero-based page to embed on.
    pub page_index: usize,
}

impl MarkerPlacement {
    /// Placement on the first page.
    pub fn on_first_page(position: CanvasPosition, viewport: CanvasViewport) -> Self {
        Self {
            position,
            viewport,
            page_index: 0,
        }
    }
}

/// Clamp a canvas position so an image of the given size stays fully inside
/// the viewport.
pub fn clamp_to_viewport(
    position: CanvasPosition,
    viewport: CanvasViewport,
    image: &RasterImage,
) -> CanvasPosition {
    let max_x = (viewport.width - f64::from(image.width())).max(0.0);
    let max_y = (viewport.height - f64::from(image.height())).max(0.0);
    CanvasPosition {
        x: position.x.clamp(0.0, max_x),
        y: position.y.clamp(0.0, max_y),
    }
}

/// Convert a (clamped) canvas position to native page coordinates.
///
/// Returns the bottom-left anchor for the image in the document's bottom-up
/// space.
pub fn to_page_coordinates(
    position: CanvasPosition,
    viewport: CanvasViewport,
    page_size: (f64, f64),
    image: &RasterImage,
) -> Result<(f64, f64)> {
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return Err(ProofError::InvalidPlacement(format!(
            "viewport {}x{}",
            viewport.width, viewport.height
        )));
    }
    let (page_w, page_h) = page_size;
    let scale_x = page_w / viewport.width;
    let scale_y = page_h / viewport.height;

    let x = position.x * scale_x;
    let y = page_h - (position.y * scale_y + f64::from(image.height()));
    Ok((x, y))
}

/// Composes the symbol codec, document surface, and page rasterizer into the
/// embed/decode operations of the signing flow.
///
/// Cloning is cheap; the collaborators are shared, so a clone can move onto
/// another thread while the original stays usable.
#[derive(Clone)]
pub struct ProofCarrier {
    codec: Arc<dyn SymbolCodec>,
    surface: Arc<dyn DocumentSurface>,
    rasterizer: Arc<dyn PageRasterizer>,
}

impl ProofCarrier {
    /// Create a carrier over the given collaborators.
    pub fn new(
        codec: Arc<dyn SymbolCodec>,
        surface: Arc<dyn DocumentSurface>,
        rasterizer: Arc<dyn PageRasterizer>,
    ) -> Self {
        Self {
            codec,
            surface,
            rasterizer,
        }
    }

    /// Render a payload into a scannable raster symbol.
    pub fn encode(&self, payload: &str) -> Result<RasterImage> {
        self.codec.encode(payload)
    }

    /// Composite `image` onto the document at the given placement.
    ///
    /// The position is clamped to the viewport, scaled into page space, and
    /// flipped into the document's bottom-up coordinates. Returns the new
    /// document bytes; the input is untouched.
    pub fn embed_in_document(
        &self,
        document: &[u8],
        image: &RasterImage,
        placement: &MarkerPlacement,
    ) -> Result<Vec<u8>> {
        let clamped = clamp_to_viewport(placement.position, placement.viewport, image);
        let page_size = self.surface.page_size(document, placement.page_index)?;
        let (x, y) = to_page_coordinates(clamped, placement.viewport, page_size, image)?;

        tracing::debug!(
            page = placement.page_index,
            x,
            y,
            "embedding proof marker"
        );
        self.surface
            .draw_image(document, placement.page_index, image, x, y)
    }

    /// Decode a payload from a standalone image or live capture frame.
    pub fn decode_image(&self, image: &RasterImage) -> Result<Option<String>> {
        self.codec.decode(image)
    }

    /// Decode a payload from a document by rasterizing its first page.
    pub fn decode_document(&self, document: &[u8]) -> Result<Option<String>> {
        let page = self.rasterizer.rasterize(document, 0)?;
        self.codec.decode(&page)
    }
}
