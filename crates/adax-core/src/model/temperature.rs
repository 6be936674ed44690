// ── Temperature units ──
//
// The cloud speaks integer centidegrees Celsius (2150 = 21.50 °C). The
// accessory side speaks floating degrees. Conversion lives here only.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer hundredths of a degree Celsius.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Centidegrees(i32);

impl Centidegrees {
    pub const ZERO: Self = Self(0);

    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i32 {
        self.0
    }

    pub fn to_celsius(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// Nearest centidegree value, or `None` for NaN, infinities and
    /// magnitudes that do not fit an `i32`.
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    pub fn from_celsius(celsius: f64) -> Option<Self> {
        if !celsius.is_finite() {
            return None;
        }
        let scaled = (celsius * 100.0).round();
        if scaled < f64::from(i32::MIN) || scaled > f64::from(i32::MAX) {
            return None;
        }
        Some(Self(scaled as i32))
    }
}

impl fmt::Display for Centidegrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} °C", self.to_celsius())
    }
}

impl From<i32> for Centidegrees {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::float_cmp)]
    fn converts_to_celsius() {
        assert_eq!(Centidegrees::new(2150).to_celsius(), 21.5);
        assert_eq!(Centidegrees::new(-250).to_celsius(), -2.5);
    }

    #[test]
    fn rounds_from_celsius() {
        assert_eq!(Centidegrees::from_celsius(21.5), Some(Centidegrees::new(2150)));
        assert_eq!(Centidegrees::from_celsius(19.996), Some(Centidegrees::new(2000)));
        assert_eq!(Centidegrees::from_celsius(f64::NAN), None);
        assert_eq!(Centidegrees::from_celsius(f64::INFINITY), None);
        assert_eq!(Centidegrees::from_celsius(1e12), None);
    }

    #[test]
    fn displays_one_decimal() {
        assert_eq!(Centidegrees::new(2150).to_string(), "21.5 °C");
    }
}
