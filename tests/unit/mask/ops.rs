use super::*;

#[test]
fn op_to_mode_table_is_fixed() {
    assert_eq!(op_to_mode(ClipOp::Difference), BlendMode::DstOut);
    assert_eq!(op_to_mode(ClipOp::Intersect), BlendMode::Modulate);
    assert_eq!(op_to_mode(ClipOp::Union), BlendMode::SrcOver);
    assert_eq!(op_to_mode(ClipOp::Xor), BlendMode::Xor);
    assert_eq!(op_to_mode(ClipOp::ReverseDifference), BlendMode::Clear);
    assert_eq!(op_to_mode(ClipOp::Replace), BlendMode::Src);
}

#[test]
fn from_index_follows_declaration_order() {
    for (i, op) in ClipOp::ALL.iter().enumerate() {
        assert_eq!(ClipOp::from_index(i as u8), Some(*op));
    }
    assert_eq!(ClipOp::from_index(6), None);
    assert_eq!(ClipOp::from_index(u8::MAX), None);
}

#[test]
fn parses_kebab_and_snake_names() {
    assert_eq!("union".parse::<ClipOp>().unwrap(), ClipOp::Union);
    assert_eq!(
        "reverse-difference".parse::<ClipOp>().unwrap(),
        ClipOp::ReverseDifference
    );
    assert_eq!(
        "Reverse_Difference".parse::<ClipOp>().unwrap(),
        ClipOp::ReverseDifference
    );
    assert!("subtract".parse::<ClipOp>().is_err());
    for op in ClipOp::ALL {
        assert_eq!(op.to_string().parse::<ClipOp>().unwrap(), op);
    }
}

#[test]
fn full_coverage_blend_rules() {
    assert_eq!(blend_a8(BlendMode::Clear, 200, 100), 0);
    assert_eq!(blend_a8(BlendMode::Src, 200, 100), 200);
    assert_eq!(blend_a8(BlendMode::SrcOver, 255, 0), 255);
    assert_eq!(blend_a8(BlendMode::SrcOver, 0, 77), 77);
    assert_eq!(blend_a8(BlendMode::SrcOver, 128, 255), 255);
    assert_eq!(blend_a8(BlendMode::DstOut, 255, 200), 0);
    assert_eq!(blend_a8(BlendMode::DstOut, 0, 200), 200);
    assert_eq!(blend_a8(BlendMode::Modulate, 255, 200), 200);
    assert_eq!(blend_a8(BlendMode::Modulate, 128, 128), 64);
    assert_eq!(blend_a8(BlendMode::Xor, 255, 255), 0);
    assert_eq!(blend_a8(BlendMode::Xor, 255, 0), 255);
    assert_eq!(blend_a8(BlendMode::Xor, 0, 255), 255);
}

#[test]
fn zero_coverage_leaves_destination() {
    for op in ClipOp::ALL {
        assert_eq!(blend_with_coverage(op_to_mode(op), 255, 123, 0), 123);
    }
}

#[test]
fn partial_coverage_interpolates() {
    assert_eq!(blend_with_coverage(BlendMode::Src, 255, 0, 128), 128);
    assert_eq!(blend_with_coverage(BlendMode::Clear, 0, 255, 128), 127);
    assert_eq!(blend_with_coverage(BlendMode::SrcOver, 255, 255, 64), 255);
}

#[test]
fn blend_row_applies_per_pixel_coverage() {
    let mut dst = [100u8, 100, 100];
    blend_row(BlendMode::Src, 255, &[0, 255, 0], &mut dst);
    assert_eq!(dst, [100, 255, 100]);
}
