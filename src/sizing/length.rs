//! CSS length values as they appear in `width`/`height` declarations.

/// A declared length this subsystem understands
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CssLength {
    /// `px` or a unitless number (HTML `width` attributes)
    Px(f64),
    /// `%`
    Percent(f64),
}

impl CssLength {
    /// Parse `"300px"`, `"300"`, `"33.5%"`. Other units, negative or
    /// non-finite values yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Some(num) = raw.strip_suffix('%') {
            return parse_number(num).map(CssLength::Percent);
        }
        let num = raw
            .strip_suffix("px")
            .or_else(|| raw.strip_suffix("PX"))
            .unwrap_or(raw);
        parse_number(num).map(CssLength::Px)
    }

    pub fn value(self) -> f64 {
        match self {
            CssLength::Px(v) | CssLength::Percent(v) => v,
        }
    }

    /// Resolve to pixels against the width a percentage is relative to
    pub fn to_px(self, basis: f64) -> f64 {
        match self {
            CssLength::Px(v) => v,
            CssLength::Percent(p) => basis * p / 100.0,
        }
    }
}

fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

/// True if the raw width is a percentage (`"50%"`)
pub fn is_percentage(raw: &str) -> bool {
    matches!(CssLength::parse(raw), Some(CssLength::Percent(_)))
}

/// True if the raw width is a pixel value (`"300px"`)
pub fn is_pixel(raw: &str) -> bool {
    matches!(CssLength::parse(raw), Some(CssLength::Px(_)))
}

/// Tolerance for float noise when flooring (`99.99999999` is 100px)
const PX_EPSILON: f64 = 1e-6;

/// Whole pixels, floored; the only place pixel values lose precision.
#[allow(clippy::cast_possible_truncation)]
pub fn floor_px(v: f64) -> i64 {
    (v + PX_EPSILON).clamp(-1e12, 1e12).floor() as i64
}

/// Format a pixel value for the document (`"300px"`)
pub fn format_px(v: f64) -> String {
    format!("{}px", floor_px(v))
}

/// Format a percentage for the document, keeping up to 4 decimals (`"33.3333%"`)
pub fn format_percent(v: f64) -> String {
    let rounded = (v * 10_000.0).round() / 10_000.0;
    // Adding zero turns -0 into 0
    let rounded = rounded + 0.0;
    format!("{rounded}%")
}

/// Floor a set of pixel widths so they still add up to the floored total.
///
/// The pixels lost to flooring go to the widths with the largest fractional
/// parts, earliest first on ties.
pub fn settle_pixels(widths: &[f64]) -> Vec<i64> {
    let total = floor_px(widths.iter().sum());
    let mut floored: Vec<i64> = widths.iter().map(|&w| floor_px(w)).collect();
    let mut deficit = total - floored.iter().sum::<i64>();
    if deficit <= 0 {
        return floored;
    }

    let mut order: Vec<usize> = (0..widths.len()).collect();
    order.sort_by(|&a, &b| {
        let fa = widths.get(a).map_or(0.0, |w| w - w.floor());
        let fb = widths.get(b).map_or(0.0, |w| w - w.floor());
        fb.partial_cmp(&fa).unwrap_or(std::cmp::Ordering::Equal)
    });
    for idx in order {
        if deficit == 0 {
            break;
        }
        if let Some(w) = floored.get_mut(idx) {
            *w += 1;
            deficit -= 1;
        }
    }
    floored
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("300px", Some(CssLength::Px(300.0)); "pixels")]
    #[test_case("300", Some(CssLength::Px(300.0)); "unitless")]
    #[test_case(" 12.5% ", Some(CssLength::Percent(12.5)); "percent with spaces")]
    #[test_case("0px", Some(CssLength::Px(0.0)); "zero")]
    #[test_case("", None; "empty")]
    #[test_case("10em", None; "other unit")]
    #[test_case("-5px", None; "negative")]
    #[test_case("auto", None; "keyword")]
    fn test_parse(raw: &str, expected: Option<CssLength>) {
        assert_eq!(CssLength::parse(raw), expected);
    }

    #[test]
    fn test_unit_predicates() {
        assert!(is_percentage("50%"));
        assert!(!is_percentage("50px"));
        assert!(is_pixel("50px"));
        assert!(!is_pixel(""));
    }

    #[test]
    fn test_format() {
        assert_eq!(format_px(149.9), "149px");
        assert_eq!(format_percent(100.0 / 3.0), "33.3333%");
        assert_eq!(format_percent(50.0), "50%");
    }

    #[test]
    fn test_settle_pixels_keeps_sum() {
        let widths = [100.0 / 3.0, 100.0 / 3.0, 100.0 / 3.0 + 50.0];
        let settled = settle_pixels(&widths);
        assert_eq!(settled.iter().sum::<i64>(), 150);
        assert_eq!(settle_pixels(&[100.0, 200.0]), vec![100, 200]);
    }

    #[test]
    fn test_to_px() {
        assert_eq!(CssLength::Percent(50.0).to_px(800.0), 400.0);
        assert_eq!(CssLength::Px(120.0).to_px(800.0), 120.0);
    }
}
