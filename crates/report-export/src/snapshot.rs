//! Visual snapshot export: capture the rendered report as an RGB raster
//! and compose it into a paginated A4 document.
//!
//! Pagination math is pure and lives in [`paginate`], so the scaling and
//! page-splitting behavior is testable without any rendering surface; the
//! PDF composition injects whatever [`ViewCapture`] provides.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::{ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm, PdfDocument, Px};

use digest_core::DigestError;

/// Fixed default file name for the visual snapshot export.
pub const SNAPSHOT_FILE_NAME: &str = "financial-report.pdf";

/// A captured view raster: tightly packed 8-bit RGB rows.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

/// Capability to rasterize the currently rendered report view.
/// `None` means no view is mounted.
pub trait ViewCapture {
    fn capture(&self) -> Option<CapturedImage>;
}

/// Logical page geometry, millimetres, portrait.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSpec {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PageSpec {
    /// ISO A4 portrait.
    pub const A4: PageSpec = PageSpec {
        width_mm: 210.0,
        height_mm: 297.0,
    };
}

/// Placement plan for one captured image across page slices.
#[derive(Debug, Clone, PartialEq)]
pub struct Pagination {
    /// Uniform scale applied to the image's native (dpi-derived) size.
    pub scale: f64,
    /// Image height after scaling to full page width, in mm.
    pub scaled_height_mm: f64,
    /// Per-page vertical position of the image's bottom edge, in mm from
    /// the page bottom. Negative values push earlier slices off-page; each
    /// page's media box clips to its own slice.
    pub page_offsets_mm: Vec<f64>,
}

const IMAGE_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;

/// Scale an image to full page width preserving aspect ratio, then split
/// it across as many pages as the scaled height requires.
pub fn paginate(width_px: u32, height_px: u32, page: PageSpec) -> Pagination {
    let native_width_mm = width_px as f64 * MM_PER_INCH / IMAGE_DPI;
    let scale = page.width_mm / native_width_mm;
    let scaled_height_mm = page.width_mm * height_px as f64 / width_px as f64;

    let pages = (scaled_height_mm / page.height_mm).ceil().max(1.0) as usize;
    let page_offsets_mm = (0..pages)
        .map(|i| page.height_mm - scaled_height_mm + i as f64 * page.height_mm)
        .collect();

    Pagination {
        scale,
        scaled_height_mm,
        page_offsets_mm,
    }
}

/// Compose the captured view into a paginated PDF under `dir`.
///
/// When no view is mounted the operation is a silent no-op returning
/// `Ok(None)`, an intentional behavior of the export flow, not an error.
pub fn export_snapshot(view: &dyn ViewCapture, dir: &Path) -> Result<Option<PathBuf>, DigestError> {
    let Some(image) = view.capture() else {
        tracing::debug!("snapshot export skipped: no view mounted");
        return Ok(None);
    };
    if image.width == 0 || image.height == 0 {
        tracing::debug!("snapshot export skipped: empty capture");
        return Ok(None);
    }

    let page = PageSpec::A4;
    let plan = paginate(image.width, image.height, page);

    let (doc, first_page, first_layer) = PdfDocument::new(
        "Financial Report",
        Mm(page.width_mm),
        Mm(page.height_mm),
        "report",
    );

    let mut pages = vec![(first_page, first_layer)];
    for _ in 1..plan.page_offsets_mm.len() {
        pages.push(doc.add_page(Mm(page.width_mm), Mm(page.height_mm), "report"));
    }

    for ((page_idx, layer_idx), offset) in pages.iter().zip(&plan.page_offsets_mm) {
        let xobject = ImageXObject {
            width: Px(image.width as usize),
            height: Px(image.height as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: image.rgb.clone(),
            image_filter: None,
            clipping_bbox: None,
        };
        Image::from(xobject).add_to_layer(
            doc.get_page(*page_idx).get_layer(*layer_idx),
            ImageTransform {
                translate_x: Some(Mm(0.0)),
                translate_y: Some(Mm(*offset)),
                scale_x: Some(plan.scale),
                scale_y: Some(plan.scale),
                dpi: Some(IMAGE_DPI),
                ..ImageTransform::default()
            },
        );
    }

    let path = dir.join(SNAPSHOT_FILE_NAME);
    let file = File::create(&path).map_err(|e| DigestError::Export(e.to_string()))?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| DigestError::Export(e.to_string()))?;
    tracing::info!(path = %path.display(), pages = plan.page_offsets_mm.len(), "wrote snapshot export");
    Ok(Some(path))
}
