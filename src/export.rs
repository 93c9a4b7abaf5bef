//! Fixed-size image snapshots of a laid-out grid.
//!
//! The PNG exporter draws a [`GridLayout`] with `vello_cpu`: background, the
//! phase swatches next to separator and legend rows, and every cell, scaled to
//! fit the requested size and centered. Glyphs are not rasterized (no font is
//! bundled); the SVG output carries the label text.

use std::future::Future;
use std::path::Path;

use anyhow::{Context, Result, bail};
use peniko::Color;
use peniko::color::{Srgb, parse_color};
use png::{BitDepth, ColorType};
use tracing::{error, info};
use vello_cpu::kurbo::Rect;
use vello_cpu::{Pixmap, RenderContext};

use crate::svg::GridLayout;

pub const EXPORT_WIDTH: u32 = 1200;
pub const EXPORT_HEIGHT: u32 = 1600;

pub trait ImageExporter {
    /// Encodes `layout` as an image of exactly `width` x `height` pixels.
    fn capture(
        &self,
        layout: &GridLayout,
        width: u32,
        height: u32,
    ) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PngExporter;

impl ImageExporter for PngExporter {
    fn capture(
        &self,
        layout: &GridLayout,
        width: u32,
        height: u32,
    ) -> impl Future<Output = Result<Vec<u8>>> + Send {
        let layout = layout.clone();
        async move {
            tokio::task::spawn_blocking(move || {
                let pixels = rasterize(&layout, width, height)?;
                encode_png(&pixels, width, height)
            })
            .await
            .context("PNG rasterizer task failed")?
        }
    }
}

/// Captures `layout` at the fixed export size and writes it to `path`.
pub async fn export_to_file<E: ImageExporter>(
    exporter: &E,
    layout: &GridLayout,
    path: &Path,
) -> Result<()> {
    let bytes = match exporter.capture(layout, EXPORT_WIDTH, EXPORT_HEIGHT).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("image export failed: {e:#}");
            return Err(e);
        }
    };
    tokio::fs::write(path, &bytes)
        .await
        .with_context(|| format!("Failed to write image to {}", path.display()))?;
    info!(path = %path.display(), bytes = bytes.len(), "wrote image snapshot");
    Ok(())
}

/// Parses a CSS color such as `#161b22`. Anything unparseable is black.
fn paint_color(css: &str) -> Color {
    parse_color(css)
        .map(|color| color.to_alpha_color::<Srgb>())
        .unwrap_or(Color::BLACK)
}

fn square(x: f32, y: f32, side: f32) -> Rect {
    Rect::new(
        f64::from(x),
        f64::from(y),
        f64::from(x + side),
        f64::from(y + side),
    )
}

/// Draws `layout` scaled to fit `width` x `height` and returns RGBA8 rows.
fn rasterize(layout: &GridLayout, width: u32, height: u32) -> Result<Vec<u8>> {
    if width == 0 || height == 0 {
        bail!("export size must be non-zero, got {width}x{height}");
    }
    if layout.width <= 0.0 || layout.height <= 0.0 {
        bail!("layout has no area to export");
    }
    let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
        bail!("export size {width}x{height} exceeds {}x{}", u16::MAX, u16::MAX);
    };

    let scale = (width as f32 / layout.width).min(height as f32 / layout.height);
    let offset_x = (width as f32 - layout.width * scale) / 2.0;
    let offset_y = (height as f32 - layout.height * scale) / 2.0;
    let to_frame = |x: f32, y: f32, side: f32| {
        square(offset_x + x * scale, offset_y + y * scale, side * scale)
    };

    let mut ctx = RenderContext::new(w, h);
    ctx.set_paint(paint_color(layout.colors.bg));
    ctx.fill_rect(&Rect::new(0.0, 0.0, f64::from(width), f64::from(height)));

    for swatch in layout.lines.iter().filter_map(|line| line.swatch_box()) {
        ctx.set_paint(paint_color(swatch.fill));
        ctx.fill_rect(&to_frame(swatch.x, swatch.y, swatch.size));
    }

    for cell in &layout.cells {
        match cell.stroke {
            Some(stroke) => {
                let border = 1.0_f32.max(1.0 / scale).min(cell.size / 2.0);
                ctx.set_paint(paint_color(stroke));
                ctx.fill_rect(&to_frame(cell.x, cell.y, cell.size));
                ctx.set_paint(paint_color(cell.fill));
                ctx.fill_rect(&to_frame(
                    cell.x + border,
                    cell.y + border,
                    cell.size - 2.0 * border,
                ));
            }
            None => {
                ctx.set_paint(paint_color(cell.fill));
                ctx.fill_rect(&to_frame(cell.x, cell.y, cell.size));
            }
        }
    }

    let mut pixmap = Pixmap::new(w, h);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    let unpremul = pixmap.take_unpremultiplied();
    let mut data = Vec::with_capacity(unpremul.len() * 4);
    for p in unpremul {
        data.extend_from_slice(&[p.r, p.g, p.b, p.a]);
    }
    Ok(data)
}

fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut encoder = png::Encoder::new(&mut out, width, height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    let mut writer = encoder
        .write_header()
        .context("Failed to write PNG header")?;
    writer
        .write_image_data(pixels)
        .context("Failed to write PNG image data")?;
    writer.finish().context("Failed to finish PNG stream")?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_math::ViewGranularity;
    use crate::events::default_events;
    use crate::grid::{GridRequest, build};
    use crate::phase::DEFAULT_PHASES;
    use crate::svg::{CellBox, TextLine, TextStyle, Theme, layout};
    use crate::tooltip::TooltipContent;
    use chrono::NaiveDate;

    fn layout_with_cell(stroke: Option<&'static str>) -> GridLayout {
        GridLayout {
            width: 100.0,
            height: 100.0,
            colors: Theme::Light.colors(),
            lines: Vec::new(),
            cells: vec![CellBox {
                index: 0,
                x: 0.0,
                y: 0.0,
                size: 50.0,
                fill: "#ff0000",
                stroke,
                classes: vec!["cell"],
                tooltip: TooltipContent::for_unit("Week 1".to_string(), &[]),
            }],
        }
    }

    fn pixel(pixels: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * width + x) * 4) as usize;
        [pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]]
    }

    fn rgba(css: &str) -> [u8; 4] {
        paint_color(css).to_rgba8().to_u8_array()
    }

    #[test]
    fn theme_colors_become_paints() {
        assert_eq!(rgba("#161b22"), [0x16, 0x1b, 0x22, 255]);
        assert_eq!(rgba("#c6f1d6"), [0xc6, 0xf1, 0xd6, 255]);
        assert_eq!(rgba("not a color"), [0, 0, 0, 255]);
    }

    #[test]
    fn cells_scale_into_the_frame() {
        let pixels = rasterize(&layout_with_cell(None), 200, 200).unwrap();
        assert_eq!(pixels.len(), 200 * 200 * 4);
        assert_eq!(pixel(&pixels, 200, 10, 10), [255, 0, 0, 255]);
        assert_eq!(pixel(&pixels, 200, 98, 98), [255, 0, 0, 255]);
        assert_eq!(pixel(&pixels, 200, 150, 150), [255, 255, 255, 255]);
    }

    #[test]
    fn aspect_ratio_is_kept_with_centering() {
        // 100x100 layout into 200x100 leaves 50px bars on each side.
        let pixels = rasterize(&layout_with_cell(None), 200, 100).unwrap();
        assert_eq!(pixel(&pixels, 200, 10, 10), [255, 255, 255, 255]);
        assert_eq!(pixel(&pixels, 200, 60, 10), [255, 0, 0, 255]);
    }

    #[test]
    fn stroked_cells_get_a_border() {
        let pixels = rasterize(&layout_with_cell(Some("#0000ff")), 100, 100).unwrap();
        assert_eq!(pixel(&pixels, 100, 0, 0), [0, 0, 255, 255]);
        assert_eq!(pixel(&pixels, 100, 25, 25), [255, 0, 0, 255]);
    }

    #[test]
    fn label_swatches_are_painted() {
        let mut layout = layout_with_cell(None);
        layout.cells.clear();
        layout.lines.push(TextLine {
            x: 33.0,
            y: 50.0,
            spans: vec![(TextStyle::Key, "Childhood".to_string())],
            swatch: Some("#c6f1d6"),
        });
        let swatch = layout.lines[0].swatch_box().unwrap();
        let pixels = rasterize(&layout, 100, 100).unwrap();
        let cx = (swatch.x + swatch.size / 2.0) as u32;
        let cy = (swatch.y + swatch.size / 2.0) as u32;
        assert_eq!(pixel(&pixels, 100, cx, cy), [0xc6, 0xf1, 0xd6, 255]);
        // Text itself leaves the background untouched.
        assert_eq!(pixel(&pixels, 100, 80, cy), [255, 255, 255, 255]);
    }

    #[test]
    fn phase_rows_of_a_real_grid_show_their_swatches() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let model = build(
            &GridRequest {
                birth_date: NaiveDate::from_ymd_opt(1985, 3, 3),
                today,
                granularity: ViewGranularity::Years,
                lifespan_years: 80,
                show_phases: true,
                show_events: false,
            },
            &DEFAULT_PHASES,
            &default_events(),
        );
        let theme = Theme::Light;
        let layout = layout(&model, today, theme);
        let pixels = rasterize(&layout, EXPORT_WIDTH, EXPORT_HEIGHT).unwrap();

        let scale =
            (EXPORT_WIDTH as f32 / layout.width).min(EXPORT_HEIGHT as f32 / layout.height);
        let offset_x = (EXPORT_WIDTH as f32 - layout.width * scale) / 2.0;
        let offset_y = (EXPORT_HEIGHT as f32 - layout.height * scale) / 2.0;
        let swatches: Vec<_> = layout.lines.iter().filter_map(TextLine::swatch_box).collect();
        assert!(!swatches.is_empty());
        for swatch in swatches {
            let cx = (offset_x + (swatch.x + swatch.size / 2.0) * scale) as u32;
            let cy = (offset_y + (swatch.y + swatch.size / 2.0) * scale) as u32;
            assert_eq!(pixel(&pixels, EXPORT_WIDTH, cx, cy), rgba(swatch.fill));
        }
        assert_eq!(
            pixel(&pixels, EXPORT_WIDTH, 0, 0),
            rgba(theme.colors().bg),
            "corner is background"
        );
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(rasterize(&layout_with_cell(None), 0, 10).is_err());
    }

    #[test]
    fn oversized_frames_are_rejected() {
        let err = rasterize(&layout_with_cell(None), 70_000, 10).unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[tokio::test]
    async fn capture_produces_png_bytes() {
        let bytes = PngExporter
            .capture(&layout_with_cell(None), 64, 48)
            .await
            .unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
