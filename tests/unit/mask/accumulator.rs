use super::*;
use crate::gpu::texture::{ExecutionMode, RecordingTextureProvider};
use crate::mask::shape::FillType;
use kurbo::{BezPath, Stroke};

/// Rasterizer that ignores geometry and reports a fixed coverage pattern.
struct FixedCoverage(Vec<u8>);

impl CoverageRasterizer for FixedCoverage {
    fn fill_coverage(
        &mut self,
        _path: &BezPath,
        _transform: Affine,
        _even_odd: bool,
        _anti_alias: bool,
        _width: u32,
        _height: u32,
        coverage: &mut [u8],
    ) -> SurfmaskResult<()> {
        coverage.copy_from_slice(&self.0);
        Ok(())
    }
}

fn accumulator(bounds: IRect) -> MaskAccumulator {
    let mut acc = MaskAccumulator::new(MaskOpts::default());
    acc.init(bounds).unwrap();
    acc
}

fn full_rect(acc: &MaskAccumulator) -> Rect {
    // Overshoots the bounds so every pixel is fully covered.
    let b = acc.bounds().to_rect();
    Rect::new(b.x0 - 1.0, b.y0 - 1.0, b.x1 + 1.0, b.y1 + 1.0)
}

#[test]
fn init_allocates_zeroed_buffer_of_bounds_size() {
    let acc = accumulator(IRect::from_xywh(10, 20, 7, 5));
    assert_eq!((acc.width(), acc.height()), (7, 5));
    assert_eq!(acc.pixels().len(), 35);
    assert!(acc.pixels().iter().all(|&p| p == 0));
    assert_eq!(acc.translation(), Vec2::new(-10.0, -20.0));
}

#[test]
fn init_rejects_bounds_over_max_dimension() {
    let opts = MaskOpts {
        max_dimension: 16,
        ..MaskOpts::default()
    };
    let mut acc = MaskAccumulator::new(opts);
    let err = acc.init(IRect::from_wh(17, 4)).unwrap_err();
    assert!(matches!(err, SurfmaskError::Allocation(_)));
    assert!(acc.pixels().is_empty());
}

#[test]
fn replace_full_cover_finalizes_to_opaque_texture() {
    let mut acc = accumulator(IRect::from_xywh(-3, 4, 6, 5));
    let rect = full_rect(&acc);
    acc.composite_rect(rect, Affine::IDENTITY, ClipOp::Replace, true, 0xFF)
        .unwrap();

    let mut provider = RecordingTextureProvider::immediate();
    let proxy = acc.finalize(&mut provider, BackingFit::Exact).unwrap();
    assert_eq!((proxy.width(), proxy.height()), (6, 5));
    let image = provider.image(proxy.id()).unwrap();
    assert!(image.to_tight_bytes().iter().all(|&p| p == 0xFF));
}

#[test]
fn difference_removes_only_its_region() {
    let mut acc = accumulator(IRect::from_wh(16, 8));
    let a = Rect::new(0.0, 0.0, 8.0, 8.0);
    let b = Rect::new(8.0, 0.0, 16.0, 8.0);
    acc.composite_rect(a, Affine::IDENTITY, ClipOp::Union, true, 0xFF)
        .unwrap();
    acc.composite_rect(b, Affine::IDENTITY, ClipOp::Union, true, 0xFF)
        .unwrap();
    acc.composite_rect(a, Affine::IDENTITY, ClipOp::Difference, true, 0xFF)
        .unwrap();

    for y in 1..7 {
        assert_eq!(acc.pixel(3, y), Some(0));
        assert_eq!(acc.pixel(12, y), Some(0xFF));
    }
}

#[test]
fn intersect_keeps_overlap() {
    let mut acc = accumulator(IRect::from_wh(16, 16));
    acc.composite_rect(
        Rect::new(0.0, 0.0, 10.0, 16.0),
        Affine::IDENTITY,
        ClipOp::Replace,
        true,
        0xFF,
    )
    .unwrap();
    acc.composite_rect(
        Rect::new(6.0, 0.0, 16.0, 16.0),
        Affine::IDENTITY,
        ClipOp::Intersect,
        true,
        0xFF,
    )
    .unwrap();
    assert_eq!(acc.pixel(2, 8), Some(0xFF));
    assert_eq!(acc.pixel(8, 8), Some(0xFF));
    assert_eq!(acc.pixel(13, 8), Some(0));
}

#[test]
fn transform_and_translation_are_combined() {
    let mut acc = accumulator(IRect::from_xywh(100, 100, 8, 8));
    // Device-space rect at (96..100) shifted by +4 lands on buffer columns 0..4.
    acc.composite_rect(
        Rect::new(96.0, 90.0, 100.0, 120.0),
        Affine::translate((4.0, 0.0)),
        ClipOp::Union,
        true,
        0xFF,
    )
    .unwrap();
    assert_eq!(acc.pixel(1, 4), Some(0xFF));
    assert_eq!(acc.pixel(6, 4), Some(0));
}

#[test]
fn partial_alpha_scales_union() {
    let mut acc = accumulator(IRect::from_wh(4, 4));
    let rect = full_rect(&acc);
    acc.composite_rect(rect, Affine::IDENTITY, ClipOp::Union, true, 0x80)
        .unwrap();
    assert!(acc.pixels().iter().all(|&p| p == 0x80));
}

#[test]
fn finalize_twice_returns_none() {
    let mut acc = accumulator(IRect::from_wh(4, 4));
    let mut provider = RecordingTextureProvider::immediate();
    assert!(acc.finalize(&mut provider, BackingFit::Exact).is_some());
    assert!(acc.finalize(&mut provider, BackingFit::Exact).is_none());
    assert_eq!(provider.len(), 1);
}

#[test]
fn zero_area_init_succeeds_and_finalizes_to_none() {
    let mut acc = accumulator(IRect::from_xywh(5, 5, 0, 0));
    assert_eq!((acc.width(), acc.height()), (0, 0));
    acc.composite_rect(
        Rect::new(0.0, 0.0, 10.0, 10.0),
        Affine::IDENTITY,
        ClipOp::Union,
        true,
        0xFF,
    )
    .unwrap();
    let mut provider = RecordingTextureProvider::immediate();
    assert!(acc.finalize(&mut provider, BackingFit::Exact).is_none());
    assert!(provider.is_empty());
}

#[test]
fn composite_requires_live_buffer() {
    let mut acc = MaskAccumulator::default();
    let err = acc
        .composite_rect(
            Rect::new(0.0, 0.0, 1.0, 1.0),
            Affine::IDENTITY,
            ClipOp::Union,
            true,
            0xFF,
        )
        .unwrap_err();
    assert!(matches!(err, SurfmaskError::Validation(_)));

    acc.init(IRect::from_wh(2, 2)).unwrap();
    let mut provider = RecordingTextureProvider::immediate();
    acc.finalize(&mut provider, BackingFit::Exact).unwrap();
    assert!(
        acc.composite_rect(
            Rect::new(0.0, 0.0, 1.0, 1.0),
            Affine::IDENTITY,
            ClipOp::Union,
            true,
            0xFF
        )
        .is_err()
    );
}

#[test]
fn no_pending_io_only_when_deferred() {
    let mut immediate = RecordingTextureProvider::immediate();
    let mut acc = accumulator(IRect::from_wh(3, 3));
    let proxy = acc.finalize(&mut immediate, BackingFit::Exact).unwrap();
    assert!(proxy.internal_flags().is_empty());

    let mut deferred = RecordingTextureProvider::new(ExecutionMode::Deferred);
    let mut acc = accumulator(IRect::from_wh(3, 3));
    let proxy = acc.finalize(&mut deferred, BackingFit::Exact).unwrap();
    assert!(
        proxy
            .internal_flags()
            .contains(InternalSurfaceFlags::NO_PENDING_IO)
    );
    assert_eq!(proxy.budgeted(), Budgeted::Yes);
    assert_eq!(proxy.sample_count(), 1);
}

#[test]
fn initial_clear_follows_opts() {
    for initial_clear in [false, true] {
        let opts = MaskOpts {
            initial_clear,
            ..MaskOpts::default()
        };
        let mut acc = MaskAccumulator::new(opts);
        acc.init(IRect::from_wh(5, 3)).unwrap();
        let mut provider = RecordingTextureProvider::immediate();
        let proxy = acc.finalize(&mut provider, BackingFit::Approx).unwrap();
        assert_eq!(
            proxy
                .surface_flags()
                .contains(SurfaceFlags::PERFORM_INITIAL_CLEAR),
            initial_clear
        );
    }
}

#[test]
fn default_initial_clear_tracks_webgl_feature() {
    assert_eq!(MaskOpts::default().initial_clear, cfg!(feature = "webgl"));
}

#[test]
fn env_overrides_are_applied_and_bad_values_ignored() {
    let opts = MaskOpts::from_lookup(|key| match key {
        "SURFMASK_MASK_MAX_DIM" => Some("512".to_owned()),
        "SURFMASK_INITIAL_CLEAR" => Some("true".to_owned()),
        _ => None,
    });
    assert_eq!(opts.max_dimension, 512);
    assert!(opts.initial_clear);

    let opts = MaskOpts::from_lookup(|key| match key {
        "SURFMASK_MASK_MAX_DIM" => Some("lots".to_owned()),
        "SURFMASK_INITIAL_CLEAR" => Some("maybe".to_owned()),
        _ => None,
    });
    assert_eq!(opts, MaskOpts::default());
}

#[test]
fn inverse_fill_covers_outside_the_path() {
    let mut acc = accumulator(IRect::from_wh(16, 16));
    let shape = Shape::rect(Rect::new(4.0, 4.0, 12.0, 12.0)).with_fill_type(FillType::InverseWinding);
    acc.composite_shape(&shape, Affine::IDENTITY, ClipOp::Replace, true, 0xFF)
        .unwrap();
    assert_eq!(acc.pixel(8, 8), Some(0));
    assert_eq!(acc.pixel(1, 1), Some(0xFF));
    assert_eq!(acc.pixel(14, 8), Some(0xFF));
}

#[test]
fn stroke_covers_outline_only() {
    let mut acc = accumulator(IRect::from_wh(20, 20));
    let shape = Shape::rect(Rect::new(4.0, 4.0, 16.0, 16.0)).with_stroke(Stroke::new(2.0));
    acc.composite_shape(&shape, Affine::IDENTITY, ClipOp::Union, true, 0xFF)
        .unwrap();
    // The 2px stroke spans 3..5 on the left edge.
    assert_eq!(acc.pixel(3, 10), Some(0xFF));
    assert_eq!(acc.pixel(4, 10), Some(0xFF));
    assert_eq!(acc.pixel(10, 10), Some(0));
    assert_eq!(acc.pixel(0, 10), Some(0));
}

#[test]
fn replace_fast_path_matches_generic_path_on_cleared_mask() {
    let pattern: Vec<u8> = (0..16u32).map(|i| (i * 17) as u8).collect();
    let shape = Shape::rect(Rect::new(0.0, 0.0, 1.0, 1.0));

    let mut fast = MaskAccumulator::with_rasterizer(MaskOpts::default(), FixedCoverage(pattern.clone()));
    fast.init(IRect::from_wh(4, 4)).unwrap();
    fast.composite_shape(&shape, Affine::IDENTITY, ClipOp::Replace, true, 0xFF)
        .unwrap();

    // Src at full alpha goes through the blend path.
    let mut generic = MaskAccumulator::with_rasterizer(MaskOpts::default(), FixedCoverage(pattern.clone()));
    generic.init(IRect::from_wh(4, 4)).unwrap();
    let row_bytes = 4;
    for (dst_row, cov_row) in generic
        .pixmap
        .pixels_mut()
        .chunks_mut(row_bytes)
        .zip(pattern.chunks(4))
    {
        blend_row(op_to_mode(ClipOp::Replace), 0xFF, cov_row, dst_row);
    }

    assert_eq!(fast.pixels(), generic.pixels());
    assert_eq!(fast.pixels(), &pattern[..]);
}

#[test]
fn replace_fast_path_differs_from_blend_at_partial_edges_over_content() {
    let pattern = vec![0u8, 128, 255, 0];
    let shape = Shape::rect(Rect::new(0.0, 0.0, 1.0, 1.0));
    let mut acc = MaskAccumulator::with_rasterizer(MaskOpts::default(), FixedCoverage(pattern));
    acc.init(IRect::from_wh(4, 1)).unwrap();
    acc.pixmap.erase(200);
    acc.composite_shape(&shape, Affine::IDENTITY, ClipOp::Replace, true, 0xFF)
        .unwrap();
    // Fast path writes raw coverage; a blended Src would give lerp(200, 255, 128) = 228.
    assert_eq!(acc.pixels(), &[200, 128, 255, 200]);
    assert_eq!(blend_with_coverage_src(200, 128), 228);
}

#[test]
fn replace_rect_blends_instead_of_writing_coverage() {
    let pattern = vec![0u8, 128, 255, 0];
    let mut acc = MaskAccumulator::with_rasterizer(MaskOpts::default(), FixedCoverage(pattern));
    acc.init(IRect::from_wh(4, 1)).unwrap();
    acc.pixmap.erase(200);
    acc.composite_rect(
        Rect::new(0.0, 0.0, 1.0, 1.0),
        Affine::IDENTITY,
        ClipOp::Replace,
        true,
        0xFF,
    )
    .unwrap();
    assert_eq!(acc.pixels(), &[200, 228, 255, 200]);
}

#[test]
fn replace_rect_keeps_opaque_content_at_half_covered_edge() {
    let mut acc = accumulator(IRect::from_wh(8, 1));
    acc.composite_rect(
        Rect::new(-1.0, -1.0, 9.0, 2.0),
        Affine::IDENTITY,
        ClipOp::Union,
        true,
        0xFF,
    )
    .unwrap();
    acc.composite_rect(
        Rect::new(0.0, -1.0, 2.5, 2.0),
        Affine::IDENTITY,
        ClipOp::Replace,
        true,
        0xFF,
    )
    .unwrap();
    assert!(acc.pixels().iter().all(|&p| p == 0xFF));

    // The same geometry as a shape takes the coverage-write path and exposes the edge.
    acc.composite_shape(
        &Shape::rect(Rect::new(0.0, -1.0, 2.5, 2.0)),
        Affine::IDENTITY,
        ClipOp::Replace,
        true,
        0xFF,
    )
    .unwrap();
    assert_eq!(acc.pixel(1, 0), Some(0xFF));
    assert!(acc.pixel(2, 0).is_some_and(|p| p > 0 && p < 0xFF));
}

#[test]
fn init_rejects_inverted_bounds() {
    let mut acc = MaskAccumulator::new(MaskOpts::default());
    let err = acc.init(IRect::from_ltrb(10, 10, 5, 5)).unwrap_err();
    assert!(matches!(err, SurfmaskError::Validation(_)));
    assert!(!acc.pixmap.is_allocated());

    let err = acc.init(IRect::from_ltrb(0, 0, 4, -1)).unwrap_err();
    assert!(matches!(err, SurfmaskError::Validation(_)));
    assert!(
        acc.composite_rect(
            Rect::new(0.0, 0.0, 1.0, 1.0),
            Affine::IDENTITY,
            ClipOp::Union,
            true,
            0xFF
        )
        .is_err()
    );

    acc.init(IRect::from_ltrb(3, 3, 3, 7)).unwrap();
    assert_eq!((acc.width(), acc.height()), (0, 4));
}

fn blend_with_coverage_src(d: u8, c: u8) -> u8 {
    crate::mask::ops::blend_with_coverage(crate::mask::ops::BlendMode::Src, 0xFF, d, c)
}

#[test]
fn xor_and_reverse_difference_use_fixed_coverage() {
    let mut acc = MaskAccumulator::with_rasterizer(MaskOpts::default(), FixedCoverage(vec![255, 0]));
    acc.init(IRect::from_wh(2, 1)).unwrap();
    acc.pixmap.erase(255);
    let shape = Shape::rect(Rect::new(0.0, 0.0, 1.0, 1.0));
    acc.composite_shape(&shape, Affine::IDENTITY, ClipOp::Xor, true, 0xFF)
        .unwrap();
    assert_eq!(acc.pixels(), &[0, 255]);

    acc.composite_shape(&shape, Affine::IDENTITY, ClipOp::ReverseDifference, true, 0xFF)
        .unwrap();
    assert_eq!(acc.pixels(), &[0, 255]);

    acc.pixmap.erase(90);
    acc.composite_shape(&shape, Affine::IDENTITY, ClipOp::ReverseDifference, true, 0xFF)
        .unwrap();
    assert_eq!(acc.pixels(), &[0, 90]);
}
