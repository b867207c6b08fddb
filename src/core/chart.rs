use std::f64::consts::PI;

use serde::Serialize;

use super::engine::Projection;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Maps an angle (0° at 12 o'clock, clockwise) on a circle to SVG coordinates.
pub fn polar_to_cartesian(cx: f64, cy: f64, r: f64, angle_degrees: f64) -> Point {
    let radians = (angle_degrees - 90.0) * PI / 180.0;
    Point {
        x: cx + r * radians.cos(),
        y: cy + r * radians.sin(),
    }
}

/// SVG path data for the arc from `start_degrees` to `end_degrees`.
///
/// Empty when the sweep is not positive. Sweeps of a full turn or more are
/// drawn as two half arcs, since an arc whose endpoints coincide renders nothing.
pub fn describe_arc(cx: f64, cy: f64, r: f64, start_degrees: f64, end_degrees: f64) -> String {
    let sweep = end_degrees - start_degrees;
    if !(sweep > 0.0) {
        return String::new();
    }
    if sweep >= 360.0 {
        let middle = start_degrees + 180.0;
        let first = describe_arc(cx, cy, r, start_degrees, middle);
        let second = describe_arc(cx, cy, r, middle, start_degrees + 360.0);
        return format!("{first} {second}");
    }

    let start = polar_to_cartesian(cx, cy, r, end_degrees);
    let end = polar_to_cartesian(cx, cy, r, start_degrees);
    let large_arc_flag = if sweep <= 180.0 { 0 } else { 1 };

    format!(
        "M {} {} A {r} {r} 0 {large_arc_flag} 0 {} {}",
        start.x, start.y, end.x, end.y
    )
}

/// Fractions of the maturity amount going to the annuity and the lump sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieSplit {
    pub annuity_share: f64,
    pub lump_sum_share: f64,
}

impl PieSplit {
    pub fn from_projection(projection: &Projection) -> Self {
        Self::from_parts(projection.annuity_value, projection.lump_sum)
    }

    pub fn from_parts(annuity: f64, lump_sum: f64) -> Self {
        let annuity = annuity.max(0.0);
        let lump_sum = lump_sum.max(0.0);
        let whole = annuity + lump_sum;
        if !(whole > 0.0) || !whole.is_finite() {
            return Self {
                annuity_share: 0.0,
                lump_sum_share: 0.0,
            };
        }

        let annuity_share = (annuity / whole).clamp(0.0, 1.0);
        Self {
            annuity_share,
            lump_sum_share: 1.0 - annuity_share,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.annuity_share == 0.0 && self.lump_sum_share == 0.0
    }
}

const ANNUITY_COLOR: &str = "#4f8cff";
const LUMP_SUM_COLOR: &str = "#00c853";

/// Ring chart of the annuity / lump-sum split with the maturity amount in the middle.
#[derive(Debug, Clone, Copy)]
pub struct PieChart {
    pub size: f64,
    pub radius: f64,
    pub ring_width: f64,
}

impl Default for PieChart {
    fn default() -> Self {
        Self {
            size: 120.0,
            radius: 54.0,
            ring_width: 12.0,
        }
    }
}

impl PieChart {
    pub fn render_svg(&self, split: PieSplit, maturity_amount: i64) -> String {
        let size = self.size;
        let c = size / 2.0;
        let r = self.radius;

        let mut svg = format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"##
        );
        svg.push_str(&format!(
            r##"<circle cx="{c}" cy="{c}" r="{r}" fill="#f1f3f6" stroke="#e0e0e0" stroke-width="2"/>"##
        ));

        if !split.is_empty() {
            let boundary = split.annuity_share * 360.0;
            for (start, end, color) in [
                (0.0, boundary, ANNUITY_COLOR),
                (boundary, 360.0, LUMP_SUM_COLOR),
            ] {
                let path = describe_arc(c, c, r, start, end);
                if path.is_empty() {
                    continue;
                }
                svg.push_str(&format!(
                    r#"<path d="{path}" fill="none" stroke="{color}" stroke-width="{}"/>"#,
                    self.ring_width
                ));
            }
        }

        svg.push_str(&format!(
            r##"<text x="{c}" y="{}" text-anchor="middle" font-size="16" fill="#222">₹{}</text></svg>"##,
            c + 5.0,
            group_thousands(maturity_amount)
        ));
        svg
    }
}

/// Formats an integer with comma thousands separators: `1234567` -> `1,234,567`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
