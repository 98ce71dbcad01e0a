//! # Sello Proof
//!
//! The proof carrier: renders a content digest into a scannable symbol and
//! composites it onto a document page, and later reads a payload back from
//! an image, a capture frame, or a rasterized page.
//!
//! The pixel-level symbol algorithm, page rasterization, and document
//! compositing are external collaborators behind the [`SymbolCodec`],
//! [`PageRasterizer`], and [`DocumentSurface`] traits. This crate owns the
//! placement geometry: viewport clamping and the canvas-to-page coordinate
//! conversion (including the y-axis flip into the document's bottom-up
//! space).

pub mod carrier;
pub mod error;
pub mod raster;
pub mod traits;

pub use carrier::{
    clamp_to_viewport, to_page_coordinates, CanvasPosition, CanvasViewport, MarkerPlacement,
    ProofCarrier,
};
pub use error::{ProofError, Result};
pub use raster::RasterImage;
pub use traits::{DocumentSurface, PageRasterizer, SymbolCodec};
