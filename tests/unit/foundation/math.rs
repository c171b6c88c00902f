use super::*;

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(255, 0), 0);
    assert_eq!(mul_div255_u8(128, 255), 128);
    assert_eq!(mul_div255_u8(128, 128), 64);
}

#[test]
fn lerp_endpoints_are_exact() {
    assert_eq!(lerp_u8(10, 200, 0), 10);
    assert_eq!(lerp_u8(10, 200, 255), 200);
    assert_eq!(lerp_u8(0, 255, 128), 128);
    assert_eq!(lerp_u8(255, 0, 128), 127);
}
