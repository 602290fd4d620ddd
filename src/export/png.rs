//! PNG rasterization of a grid.
//!
//! Each cell becomes a `cell_size * scale` square filled with its background
//! color and outlined with a border `scale` pixels thick. The cell's character
//! is drawn centered on top in a fixed glyph color, using the configured font
//! or the bundled DejaVu Sans Mono.

use crate::color::parse_color;
use crate::export::{ensure_parent_dir, ExportError, ExportOptions, Exporter, Result};
use crate::grid::Grid;
use ab_glyph::{point, Font, FontArc, OutlinedGlyph, PxScale, ScaleFont};
use image::{ImageEncoder, Rgba, RgbaImage};
use std::path::Path;
use std::sync::OnceLock;

/// Magenta used for colors that fail to parse
const MAGENTA: Rgba<u8> = Rgba([255, 0, 255, 255]);

/// Glyph height as a fraction of the scaled cell size.
const GLYPH_FRACTION: f32 = 1.0 / 3.0;

/// Default unscaled cell edge length in pixels.
pub const DEFAULT_CELL_SIZE: u32 = 30;

/// Largest image `render_grid` will allocate, in pixels (256 MiB of RGBA).
pub const MAX_RENDER_PIXELS: u64 = 64 * 1024 * 1024;

static BUILTIN_FONT_DATA: &[u8] = include_bytes!("../../assets/fonts/DejaVuSansMono.ttf");

/// Settings for raster export.
#[derive(Clone)]
pub struct RenderOptions {
    /// Unscaled cell edge length in pixels
    pub cell_size: u32,
    /// Integer resolution multiplier
    pub scale: u32,
    pub border_color: Rgba<u8>,
    pub glyph_color: Rgba<u8>,
    /// Font for drawing characters; [`builtin_font`] when absent
    pub font: Option<FontArc>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            scale: 1,
            border_color: Rgba([0, 0, 0, 255]),
            glyph_color: Rgba([255, 255, 255, 255]),
            font: None,
        }
    }
}

impl std::fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderOptions")
            .field("cell_size", &self.cell_size)
            .field("scale", &self.scale)
            .field("border_color", &self.border_color)
            .field("glyph_color", &self.glyph_color)
            .field("font", &self.font.is_some())
            .finish()
    }
}

impl RenderOptions {
    /// Edge length of one rendered cell in output pixels.
    pub fn cell_pixels(&self) -> u32 {
        self.cell_size.saturating_mul(self.scale.max(1))
    }

    /// Border thickness in output pixels, never more than half a cell.
    pub fn border_pixels(&self) -> u32 {
        self.scale.max(1).min(self.cell_pixels() / 2)
    }
}

/// The monospace font compiled into the crate.
pub fn builtin_font() -> Option<FontArc> {
    static FONT: OnceLock<Option<FontArc>> = OnceLock::new();
    FONT.get_or_init(|| {
        FontArc::try_from_slice(BUILTIN_FONT_DATA)
            .inspect_err(|e| log::warn!("built-in font unusable: {}", e))
            .ok()
    })
    .clone()
}

/// Load a TrueType/OpenType font for glyph rendering.
pub fn load_font(path: &Path) -> Result<FontArc> {
    let bytes = std::fs::read(path)?;
    FontArc::try_from_vec(bytes)
        .map_err(|e| ExportError::Font(format!("'{}': {}", path.display(), e)))
}

/// Output image size for `grid`, or [`ExportError::TooLarge`] past [`MAX_RENDER_PIXELS`].
pub fn render_dimensions(grid: &Grid, options: &RenderOptions) -> Result<(u32, u32)> {
    let cell_px = u64::from(options.cell_size) * u64::from(options.scale.max(1));
    let width = (grid.cols() as u64).saturating_mul(cell_px);
    let height = (grid.rows() as u64).saturating_mul(cell_px);

    let fits = width.saturating_mul(height) <= MAX_RENDER_PIXELS
        && u32::try_from(width).is_ok()
        && u32::try_from(height).is_ok();
    if !fits {
        return Err(ExportError::TooLarge { width, height, limit: MAX_RENDER_PIXELS });
    }
    Ok((width as u32, height as u32))
}

/// Render the grid to an RGBA image.
///
/// The image is `cols * cell_pixels` wide and `rows * cell_pixels` tall.
///
/// # Examples
///
/// ```
/// use charmatrix::export::{render_grid, RenderOptions};
/// use charmatrix::grid::Grid;
///
/// let grid = Grid::new(2, 3, "", "#FF0000");
/// let options = RenderOptions { scale: 2, ..Default::default() };
/// let image = render_grid(&grid, &options)?;
/// assert_eq!(image.dimensions(), (3 * 30 * 2, 2 * 30 * 2));
/// # Ok::<(), charmatrix::export::ExportError>(())
/// ```
pub fn render_grid(grid: &Grid, options: &RenderOptions) -> Result<RgbaImage> {
    let (width, height) = render_dimensions(grid, options)?;
    let cell_px = options.cell_pixels();
    let border_px = options.border_pixels();
    let font = options.font.clone().or_else(builtin_font);
    let mut image = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));

    for (r, row) in grid.iter_rows().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let x0 = c as u32 * cell_px;
            let y0 = r as u32 * cell_px;

            let fill = parse_color(&cell.background_color).unwrap_or_else(|e| {
                log::warn!("cell ({}, {}) color '{}': {}", r, c, cell.background_color, e);
                MAGENTA
            });
            fill_cell(&mut image, (x0, y0), cell_px, border_px, fill, options.border_color);

            if let (Some(font), false) = (&font, cell.is_empty()) {
                draw_glyphs(&mut image, font, &cell.character, x0, y0, cell_px, options.glyph_color);
            }
        }
    }

    Ok(image)
}

/// Fill one cell square and outline it `border` pixels deep.
fn fill_cell(image: &mut RgbaImage, (x0, y0): (u32, u32), size: u32, border: u32, fill: Rgba<u8>, edge: Rgba<u8>) {
    for dy in 0..size {
        for dx in 0..size {
            let on_edge = dx < border || dy < border || dx >= size - border || dy >= size - border;
            image.put_pixel(x0 + dx, y0 + dy, if on_edge { edge } else { fill });
        }
    }
}

/// Draw `text` centered in the cell at `(x0, y0)`.
fn draw_glyphs(
    image: &mut RgbaImage,
    font: &FontArc,
    text: &str,
    x0: u32,
    y0: u32,
    cell_px: u32,
    color: Rgba<u8>,
) {
    let scale = PxScale::from(cell_px as f32 * GLYPH_FRACTION);
    let scaled = font.as_scaled(scale);

    let mut caret = point(0.0, scaled.ascent());
    let mut outlines: Vec<OutlinedGlyph> = Vec::new();
    for ch in text.chars() {
        let mut glyph = scaled.scaled_glyph(ch);
        glyph.position = caret;
        caret.x += scaled.h_advance(glyph.id);
        if let Some(outlined) = font.outline_glyph(glyph) {
            outlines.push(outlined);
        }
    }
    if outlines.is_empty() {
        return;
    }

    // Union of glyph bounds, used to center the whole string in the cell
    let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
    let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
    for outlined in &outlines {
        let b = outlined.px_bounds();
        min_x = min_x.min(b.min.x);
        min_y = min_y.min(b.min.y);
        max_x = max_x.max(b.max.x);
        max_y = max_y.max(b.max.y);
    }
    let dx = x0 as f32 + (cell_px as f32 - (max_x - min_x)) / 2.0 - min_x;
    let dy = y0 as f32 + (cell_px as f32 - (max_y - min_y)) / 2.0 - min_y;

    let (width, height) = image.dimensions();
    for outlined in &outlines {
        let b = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let px = (b.min.x + dx).round() as i64 + i64::from(gx);
            let py = (b.min.y + dy).round() as i64 + i64::from(gy);
            if px < 0 || py < 0 || px >= i64::from(width) || py >= i64::from(height) {
                return;
            }
            let dst = image.get_pixel_mut(px as u32, py as u32);
            *dst = blend(*dst, color, coverage.clamp(0.0, 1.0));
        });
    }
}

/// Blend `src` over `dst` with the given coverage.
fn blend(dst: Rgba<u8>, src: Rgba<u8>, coverage: f32) -> Rgba<u8> {
    let mix = |d: u8, s: u8| (f32::from(s) * coverage + f32::from(d) * (1.0 - coverage)).round() as u8;
    Rgba([mix(dst[0], src[0]), mix(dst[1], src[1]), mix(dst[2], src[2]), dst[3].max(src[3])])
}

/// Encode an image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut png_data = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png_data);
    encoder.write_image(image.as_raw(), image.width(), image.height(), image::ColorType::Rgba8)?;
    Ok(png_data)
}

/// Save an RGBA image to a PNG file, creating parent directories as needed.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// PNG exporter.
#[derive(Debug, Default)]
pub struct PngExporter {
    pub render: RenderOptions,
}

impl PngExporter {
    pub fn new(render: RenderOptions) -> Self {
        Self { render }
    }
}

impl Exporter for PngExporter {
    fn export(&self, grid: &Grid, output_path: &Path, _options: &ExportOptions) -> Result<()> {
        let image = render_grid(grid, &self.render)?;
        save_png(&image, output_path)
    }

    fn format_name(&self) -> &'static str {
        "png"
    }

    fn extension(&self) -> &'static str {
        "png"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interior_pixels(image: &RgbaImage, border: u32) -> impl Iterator<Item = &Rgba<u8>> {
        let (w, h) = image.dimensions();
        image
            .enumerate_pixels()
            .filter(move |(x, y, _)| *x >= border && *y >= border && *x < w - border && *y < h - border)
            .map(|(_, _, p)| p)
    }

    #[test]
    fn test_dimensions_follow_scale() {
        let grid = Grid::new(3, 5, "", "#FFFFFF");
        let options = RenderOptions { cell_size: 10, scale: 4, ..Default::default() };
        let image = render_grid(&grid, &options).unwrap();
        assert_eq!(image.dimensions(), (5 * 10 * 4, 3 * 10 * 4));
    }

    #[test]
    fn test_cell_fill_and_border() {
        let mut grid = Grid::new(1, 2, "", "#FFFFFF");
        grid.set_cell(0, 1, "", "#3498db", None);
        let options = RenderOptions { cell_size: 8, ..Default::default() };
        let image = render_grid(&grid, &options).unwrap();

        // Border pixel of the first cell, interior of both cells
        assert_eq!(*image.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(*image.get_pixel(4, 4), Rgba([255, 255, 255, 255]));
        assert_eq!(*image.get_pixel(12, 4), Rgba([0x34, 0x98, 0xdb, 255]));
        assert_eq!(*image.get_pixel(15, 4), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_border_thickens_with_scale() {
        let grid = Grid::new(1, 1, "", "#FFFFFF");
        let options = RenderOptions { cell_size: 8, scale: 3, ..Default::default() };
        let image = render_grid(&grid, &options).unwrap();
        let black = Rgba([0, 0, 0, 255]);
        let white = Rgba([255, 255, 255, 255]);

        assert_eq!(*image.get_pixel(2, 12), black);
        assert_eq!(*image.get_pixel(3, 12), white);
        assert_eq!(*image.get_pixel(20, 12), white);
        assert_eq!(*image.get_pixel(21, 12), black);
        assert_eq!(*image.get_pixel(12, 23), black);
    }

    #[test]
    fn test_border_capped_at_half_cell() {
        let options = RenderOptions { cell_size: 1, scale: 4, ..Default::default() };
        assert_eq!(options.border_pixels(), 2);
        let options = RenderOptions { cell_size: 1, scale: 1, ..Default::default() };
        assert_eq!(options.border_pixels(), 0);
    }

    #[test]
    fn test_bad_color_renders_magenta() {
        let grid = Grid::new(1, 1, "", "not-a-color");
        let options = RenderOptions { cell_size: 4, ..Default::default() };
        let image = render_grid(&grid, &options).unwrap();
        assert_eq!(*image.get_pixel(1, 1), MAGENTA);
    }

    #[test]
    fn test_default_options_draw_glyph_with_builtin_font() {
        assert!(builtin_font().is_some());

        let grid = Grid::new(1, 1, "X", "#000000");
        let image = render_grid(&grid, &RenderOptions::default()).unwrap();
        let black = Rgba([0, 0, 0, 255]);
        let lit = interior_pixels(&image, 1).filter(|p| **p != black).count();
        assert!(lit > 0, "no glyph pixels drawn for 'X'");
    }

    #[test]
    fn test_glyph_is_centered() {
        let grid = Grid::new(1, 1, "X", "#000000");
        let image = render_grid(&grid, &RenderOptions::default()).unwrap();
        let black = Rgba([0, 0, 0, 255]);

        let lit: Vec<(u32, u32)> = image
            .enumerate_pixels()
            .filter(|(_, _, p)| **p != black)
            .map(|(x, y, _)| (x, y))
            .collect();
        let min_x = lit.iter().map(|p| p.0).min().unwrap();
        let max_x = lit.iter().map(|p| p.0).max().unwrap();
        let min_y = lit.iter().map(|p| p.1).min().unwrap();
        let max_y = lit.iter().map(|p| p.1).max().unwrap();
        let center = (DEFAULT_CELL_SIZE as i64) / 2;
        assert!(((min_x + max_x) as i64 / 2 - center).abs() <= 2);
        assert!(((min_y + max_y) as i64 / 2 - center).abs() <= 2);
    }

    #[test]
    fn test_empty_cells_have_no_glyph() {
        let grid = Grid::new(1, 1, "", "#00FF00");
        let options = RenderOptions { cell_size: 6, ..Default::default() };
        let image = render_grid(&grid, &options).unwrap();
        assert!(interior_pixels(&image, 1).all(|p| *p == Rgba([0, 255, 0, 255])));
    }

    #[test]
    fn test_empty_grid_renders_empty_image() {
        let image = render_grid(&Grid::new(0, 0, "", "#FFFFFF"), &RenderOptions::default()).unwrap();
        assert_eq!(image.dimensions(), (0, 0));
    }

    #[test]
    fn test_oversized_render_is_rejected() {
        let grid = Grid::new(15, 20, "", "#FFFFFF");
        let options = RenderOptions { cell_size: 512, scale: 64, ..Default::default() };
        match render_grid(&grid, &options) {
            Err(ExportError::TooLarge { width, height, limit }) => {
                assert_eq!(width, 20 * 512 * 64);
                assert_eq!(height, 15 * 512 * 64);
                assert_eq!(limit, MAX_RENDER_PIXELS);
            }
            other => panic!("expected TooLarge, got {:?}", other.map(|i| i.dimensions())),
        }
    }

    #[test]
    fn test_render_dimensions_overflow_is_rejected() {
        let grid = Grid::new(1, 70_000, "", "#FFFFFF");
        let options = RenderOptions { cell_size: u32::MAX, scale: u32::MAX, ..Default::default() };
        assert!(matches!(render_dimensions(&grid, &options), Err(ExportError::TooLarge { .. })));
    }

    #[test]
    fn test_blend() {
        let dst = Rgba([0, 0, 0, 255]);
        let src = Rgba([255, 255, 255, 255]);
        assert_eq!(blend(dst, src, 0.0), dst);
        assert_eq!(blend(dst, src, 1.0), src);
        assert_eq!(blend(dst, src, 0.5), Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn test_encode_png_signature() {
        let image = render_grid(&Grid::new(1, 1, "", "#FFFFFF"), &RenderOptions::default()).unwrap();
        let bytes = encode_png(&image).unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_save_png_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out").join("grid.png");
        let grid = Grid::new(2, 2, "", "#e74c3c");
        PngExporter::new(RenderOptions { cell_size: 5, ..Default::default() })
            .export(&grid, &path, &ExportOptions::default())
            .unwrap();
        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (10, 10));
        assert_eq!(*loaded.get_pixel(2, 2), Rgba([0xe7, 0x4c, 0x3c, 255]));
    }

    #[test]
    fn test_exporter_reports_too_large() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("huge.png");
        let grid = Grid::new(100, 100, "", "#FFFFFF");
        let exporter = PngExporter::new(RenderOptions { cell_size: 512, scale: 64, ..Default::default() });
        assert!(matches!(
            exporter.export(&grid, &path, &ExportOptions::default()),
            Err(ExportError::TooLarge { .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_load_font_rejects_garbage() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        assert!(matches!(load_font(&path), Err(ExportError::Font(_))));
        assert!(matches!(load_font(&dir.path().join("missing.ttf")), Err(ExportError::Io(_))));
    }
}
