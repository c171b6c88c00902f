use super::*;

#[test]
fn irect_dimensions_follow_edges() {
    let r = IRect::from_ltrb(10, 20, 42, 28);
    assert_eq!(r.width(), 32);
    assert_eq!(r.height(), 8);
    assert!(!r.is_empty());
    assert!(r.contains(10, 20));
    assert!(!r.contains(42, 20));

    let inverted = IRect::from_ltrb(5, 5, 1, 9);
    assert_eq!(inverted.width(), -4);
    assert!(inverted.is_empty());
}

#[test]
fn irect_from_xywh_saturates() {
    let r = IRect::from_xywh(i32::MAX - 1, 0, 10, 1);
    assert_eq!(r.right, i32::MAX);
}

#[test]
fn a8_info_is_one_byte_per_pixel() {
    let info = ImageInfo::make_a8(7, 3);
    assert_eq!(info.color_type(), ColorType::Alpha8);
    assert_eq!(info.min_row_bytes(), Some(7));
    assert_eq!(info.compute_byte_size(7), Some(21));
    // Padded stride: the last row is not padded.
    assert_eq!(info.compute_byte_size(8), Some(8 * 2 + 7));
}

#[test]
fn byte_size_of_empty_info_is_zero() {
    assert_eq!(ImageInfo::make_a8(0, 0).compute_byte_size(0), Some(0));
    assert!(ImageInfo::make_a8(4, 0).is_empty());
}

#[test]
fn byte_size_overflow_is_none() {
    let info = ImageInfo::new(
        u32::MAX,
        u32::MAX,
        ColorType::RgbaF16,
        AlphaType::Premul,
        ColorSpace::None,
    );
    let row = info.min_row_bytes().unwrap();
    assert_eq!(info.compute_byte_size(row.saturating_mul(4)), None);
}

#[test]
fn make_wh_keeps_pixel_interpretation() {
    let info = ImageInfo::make_n32_premul(4, 4, ColorSpace::Srgb);
    let resized = info.make_wh(16, 2);
    assert_eq!(resized.width(), 16);
    assert_eq!(resized.height(), 2);
    assert_eq!(resized.color_type(), ColorType::Rgba8888);
    assert_eq!(resized.color_space(), ColorSpace::Srgb);
}
