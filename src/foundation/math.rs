pub(crate) fn mul_div255_u8(x: u8, y: u8) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

/// Interpolate from `a` toward `b` by `t / 255`.
pub(crate) fn lerp_u8(a: u8, b: u8, t: u8) -> u8 {
    let t = u32::from(t);
    ((u32::from(a) * (255 - t) + u32::from(b) * t + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
