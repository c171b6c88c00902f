use crate::foundation::error::SurfmaskError;
use crate::foundation::math::{lerp_u8, mul_div255_u8};

/// Set operation combining a new clip element with the accumulated mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClipOp {
    /// Keep the mask outside the element.
    Difference,
    /// Keep the mask inside the element.
    Intersect,
    Union,
    Xor,
    /// Keep the element outside the mask.
    ReverseDifference,
    /// Discard the mask and use the element.
    Replace,
}

impl ClipOp {
    pub const ALL: [ClipOp; 6] = [
        ClipOp::Difference,
        ClipOp::Intersect,
        ClipOp::Union,
        ClipOp::Xor,
        ClipOp::ReverseDifference,
        ClipOp::Replace,
    ];

    /// Convert a raw operation index (declaration order). Out-of-range indices yield `None`.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            ClipOp::Difference => "difference",
            ClipOp::Intersect => "intersect",
            ClipOp::Union => "union",
            ClipOp::Xor => "xor",
            ClipOp::ReverseDifference => "reverse-difference",
            ClipOp::Replace => "replace",
        }
    }
}

impl std::fmt::Display for ClipOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ClipOp {
    type Err = SurfmaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|op| op.name() == normalized)
            .ok_or_else(|| SurfmaskError::validation(format!("unknown clip op '{s}'")))
    }
}

/// Porter-Duff style blend modes used for A8 compositing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlendMode {
    Clear,
    Src,
    SrcOver,
    DstOut,
    Modulate,
    Xor,
}

/// Blend mode that realises `op` when the element is drawn as source over the mask.
pub const fn op_to_mode(op: ClipOp) -> BlendMode {
    match op {
        ClipOp::Difference => BlendMode::DstOut,
        ClipOp::Intersect => BlendMode::Modulate,
        ClipOp::Union => BlendMode::SrcOver,
        ClipOp::Xor => BlendMode::Xor,
        ClipOp::ReverseDifference => BlendMode::Clear,
        ClipOp::Replace => BlendMode::Src,
    }
}

/// Blend source alpha `s` onto destination alpha `d` at full coverage.
pub fn blend_a8(mode: BlendMode, s: u8, d: u8) -> u8 {
    match mode {
        BlendMode::Clear => 0,
        BlendMode::Src => s,
        BlendMode::SrcOver => s.saturating_add(mul_div255_u8(d, 255 - s)),
        BlendMode::DstOut => mul_div255_u8(d, 255 - s),
        BlendMode::Modulate => mul_div255_u8(s, d),
        BlendMode::Xor => mul_div255_u8(s, 255 - d).saturating_add(mul_div255_u8(d, 255 - s)),
    }
}

/// Blend with partial coverage `c`: the full-coverage result is interpolated from `d` by `c`.
pub fn blend_with_coverage(mode: BlendMode, s: u8, d: u8, c: u8) -> u8 {
    match c {
        0 => d,
        255 => blend_a8(mode, s, d),
        _ => lerp_u8(d, blend_a8(mode, s, d), c),
    }
}

/// Blend a coverage row into a destination row.
pub(crate) fn blend_row(mode: BlendMode, alpha: u8, coverage: &[u8], dst: &mut [u8]) {
    for (d, &c) in dst.iter_mut().zip(coverage) {
        *d = blend_with_coverage(mode, alpha, *d, c);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mask/ops.rs"]
mod tests;
