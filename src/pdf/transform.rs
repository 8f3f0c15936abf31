//! Affine transforms used to place source pages on the output canvas

use crate::plan::Scale;

/// Represents a PDF transformation matrix [a b c d e f]
/// where: x' = a*x + c*y + e, y' = b*x + d*y + f
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformMatrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl TransformMatrix {
    /// Identity matrix (no transformation)
    pub fn identity() -> Self {
        Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 }
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self { a: sx, b: 0.0, c: 0.0, d: sy, e: 0.0, f: 0.0 }
    }

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: tx, f: ty }
    }

    /// Map a page box to the origin with the page's `/Rotate` applied
    ///
    /// `bbox` is `[x0, y0, x1, y1]` in the page's own coordinates. The result
    /// puts the visible (rotated) page with its lower-left corner at (0, 0).
    /// Rotation is clockwise, as in the PDF `/Rotate` entry.
    pub fn orient(bbox: [f64; 4], rotation: i64) -> Self {
        let [x0, y0, x1, y1] = bbox;
        match rotation {
            90 => Self { a: 0.0, b: -1.0, c: 1.0, d: 0.0, e: -y0, f: x1 },
            180 => Self { a: -1.0, b: 0.0, c: 0.0, d: -1.0, e: x1, f: y1 },
            270 => Self { a: 0.0, b: 1.0, c: -1.0, d: 0.0, e: y1, f: -x0 },
            _ => Self::translate(-x0, -y0),
        }
    }

    /// Apply `self` first, then `next`
    pub fn then(&self, next: &TransformMatrix) -> Self {
        Self {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            e: next.a * self.e + next.c * self.f + next.e,
            f: next.b * self.e + next.d * self.f + next.f,
        }
    }

    /// Transform a point
    #[cfg(test)]
    fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Check if this is (approximately) the identity matrix
    #[cfg(test)]
    fn is_identity(&self) -> bool {
        (self.a - 1.0).abs() < 0.001 &&
        self.b.abs() < 0.001 &&
        self.c.abs() < 0.001 &&
        (self.d - 1.0).abs() < 0.001 &&
        self.e.abs() < 0.001 &&
        self.f.abs() < 0.001
    }

    /// Content stream operands for the `cm` operator
    pub fn to_operands(&self) -> String {
        [self.a, self.b, self.c, self.d, self.e, self.f]
            .iter()
            .map(|v| format_number(*v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Full placement of a source page onto a `target_width` × `target_height` canvas
///
/// `visible` is the source page's displayed size (after rotation). When the
/// scaled page is smaller than the canvas it is centred.
pub fn placement(
    bbox: [f64; 4],
    rotation: i64,
    visible: (f64, f64),
    scale: Scale,
    target: (f64, f64),
) -> TransformMatrix {
    let offset_x = (target.0 - visible.0 * scale.x) / 2.0;
    let offset_y = (target.1 - visible.1 * scale.y) / 2.0;

    TransformMatrix::orient(bbox, rotation)
        .then(&TransformMatrix::scale(scale.x, scale.y))
        .then(&TransformMatrix::translate(offset_x, offset_y))
}

/// Format a number for a content stream: fixed precision, no trailing zeros
fn format_number(value: f64) -> String {
    let text = format!("{:.6}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "" | "-" | "-0" => "0".to_string(),
        _ => text.to_string(),
    }
}
