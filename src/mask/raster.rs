use kurbo::{Affine, BezPath, PathEl, Point};

use crate::foundation::error::{SurfmaskError, SurfmaskResult};

/// Produces per-pixel path coverage for the mask accumulator.
pub trait CoverageRasterizer {
    /// Fill `path` transformed by `transform` into a tightly packed `width * height` coverage
    /// buffer. Every byte of `coverage` is overwritten.
    #[allow(clippy::too_many_arguments)]
    fn fill_coverage(
        &mut self,
        path: &BezPath,
        transform: Affine,
        even_odd: bool,
        anti_alias: bool,
        width: u32,
        height: u32,
        coverage: &mut [u8],
    ) -> SurfmaskResult<()>;
}

/// Rasterizer backed by `vello_cpu`, reading coverage from the alpha channel of an opaque
/// white fill.
#[derive(Default)]
pub struct VelloRasterizer {
    scratch: Option<vello_cpu::Pixmap>,
}

impl std::fmt::Debug for VelloRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VelloRasterizer")
            .field(
                "scratch",
                &self.scratch.as_ref().map(|p| (p.width(), p.height())),
            )
            .finish()
    }
}

impl VelloRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    fn scratch(&mut self, width: u16, height: u16) -> &mut vello_cpu::Pixmap {
        let reuse = self
            .scratch
            .as_ref()
            .is_some_and(|p| p.width() == width && p.height() == height);
        if !reuse {
            self.scratch = None;
        }
        let pixmap = self
            .scratch
            .get_or_insert_with(|| vello_cpu::Pixmap::new(width, height));
        clear_pixmap(pixmap);
        pixmap
    }
}

impl CoverageRasterizer for VelloRasterizer {
    fn fill_coverage(
        &mut self,
        path: &BezPath,
        transform: Affine,
        even_odd: bool,
        anti_alias: bool,
        width: u32,
        height: u32,
        coverage: &mut [u8],
    ) -> SurfmaskResult<()> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| SurfmaskError::raster("coverage size overflows"))?;
        if coverage.len() != expected {
            return Err(SurfmaskError::raster(format!(
                "coverage buffer holds {} bytes, expected {expected}",
                coverage.len()
            )));
        }
        if expected == 0 {
            return Ok(());
        }
        let w = u16::try_from(width)
            .map_err(|_| SurfmaskError::raster(format!("width {width} exceeds u16")))?;
        let h = u16::try_from(height)
            .map_err(|_| SurfmaskError::raster(format!("height {height} exceeds u16")))?;

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        ctx.set_transform(affine_to_cpu(transform));
        ctx.set_fill_rule(if even_odd {
            vello_cpu::peniko::Fill::EvenOdd
        } else {
            vello_cpu::peniko::Fill::NonZero
        });
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
        ctx.fill_path(&bezpath_to_cpu(path));
        ctx.flush();

        let pixmap = self.scratch(w, h);
        ctx.render_to_pixmap(pixmap);

        for (dst, px) in coverage
            .iter_mut()
            .zip(pixmap.data_as_u8_slice().chunks_exact(4))
        {
            let a = px[3];
            *dst = if anti_alias {
                a
            } else if a >= 128 {
                255
            } else {
                0
            };
        }
        Ok(())
    }
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
