use kurbo::{BezPath, Ellipse, Rect, RoundedRect, Stroke, StrokeOpts};

/// Winding rule plus an optional inversion (coverage outside the path).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum FillType {
    #[default]
    Winding,
    EvenOdd,
    InverseWinding,
    InverseEvenOdd,
}

impl FillType {
    pub fn is_inverse(self) -> bool {
        matches!(self, FillType::InverseWinding | FillType::InverseEvenOdd)
    }

    pub fn is_even_odd(self) -> bool {
        matches!(self, FillType::EvenOdd | FillType::InverseEvenOdd)
    }

    pub fn toggle_inverse(self) -> Self {
        match self {
            FillType::Winding => FillType::InverseWinding,
            FillType::EvenOdd => FillType::InverseEvenOdd,
            FillType::InverseWinding => FillType::Winding,
            FillType::InverseEvenOdd => FillType::EvenOdd,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ShapeStyle {
    Fill,
    /// Outline with the given width, joins, caps and dashes.
    Stroke(Stroke),
}

/// Geometry plus styling for one clip element.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    path: BezPath,
    style: ShapeStyle,
    fill_type: FillType,
}

impl Shape {
    pub fn fill(path: BezPath) -> Self {
        Self {
            path,
            style: ShapeStyle::Fill,
            fill_type: FillType::Winding,
        }
    }

    pub fn rect(rect: Rect) -> Self {
        Self::fill(kurbo::Shape::to_path(&rect, 0.1))
    }

    pub fn rounded_rect(rect: Rect, radius: f64) -> Self {
        Self::fill(kurbo::Shape::to_path(
            &RoundedRect::from_rect(rect, radius),
            0.1,
        ))
    }

    pub fn ellipse(bounds: Rect) -> Self {
        Self::fill(kurbo::Shape::to_path(&Ellipse::from_rect(bounds), 0.1))
    }

    /// Parse SVG path data (`M 0 0 L 10 0 ...`).
    pub fn from_svg(data: &str) -> crate::SurfmaskResult<Self> {
        let path = BezPath::from_svg(data).map_err(|e| {
            crate::SurfmaskError::validation(format!("invalid svg path '{data}': {e}"))
        })?;
        Ok(Self::fill(path))
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.style = ShapeStyle::Stroke(stroke);
        self
    }

    pub fn with_fill_type(mut self, fill_type: FillType) -> Self {
        self.fill_type = fill_type;
        self
    }

    pub fn path(&self) -> &BezPath {
        &self.path
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn fill_type(&self) -> FillType {
        self.fill_type
    }

    /// Resolve styling into a path that is filled with the returned fill type.
    ///
    /// Strokes (dashes included) are expanded to their outline, which is always filled with the
    /// winding rule; inversion is preserved.
    pub fn to_fill_path(&self, tolerance: f64) -> (BezPath, FillType) {
        match &self.style {
            ShapeStyle::Fill => (self.path.clone(), self.fill_type),
            ShapeStyle::Stroke(stroke) => {
                let outline =
                    kurbo::stroke(self.path.iter(), stroke, &StrokeOpts::default(), tolerance);
                let fill_type = if self.fill_type.is_inverse() {
                    FillType::InverseWinding
                } else {
                    FillType::Winding
                };
                (outline, fill_type)
            }
        }
    }
}
