use std::{fmt, str::FromStr};

use crate::{
    error::SliceError,
    interp::lerp,
    types::{Rgb, Value},
};

/// Anchors `(t, intensity)` of one color channel, `t` ascending from 0 to 1.
type Segment = &'static [(Value, Value)];

/// Per-channel anchors `[red, green, blue]`.
type SegmentTable = [Segment; 3];

const JET: SegmentTable = [
    &[(0.0, 0.0), (0.35, 0.0), (0.66, 1.0), (0.89, 1.0), (1.0, 0.5)],
    &[(0.0, 0.0), (0.125, 0.0), (0.375, 1.0), (0.64, 1.0), (0.91, 0.0), (1.0, 0.0)],
    &[(0.0, 0.5), (0.11, 1.0), (0.34, 1.0), (0.65, 0.0), (1.0, 0.0)],
];

const HOT: SegmentTable = [
    &[(0.0, 0.0416), (0.365079, 1.0), (1.0, 1.0)],
    &[(0.0, 0.0), (0.365079, 0.0), (0.746032, 1.0), (1.0, 1.0)],
    &[(0.0, 0.0), (0.746032, 0.0), (1.0, 1.0)],
];

const COOL: SegmentTable = [
    &[(0.0, 0.0), (1.0, 1.0)],
    &[(0.0, 1.0), (1.0, 0.0)],
    &[(0.0, 1.0), (1.0, 1.0)],
];

const GRAY: SegmentTable = [
    &[(0.0, 0.0), (1.0, 1.0)],
    &[(0.0, 0.0), (1.0, 1.0)],
    &[(0.0, 0.0), (1.0, 1.0)],
];

/// Named scalar-to-color lookup tables.
///
/// Each table is a set of per-channel anchors; colors between anchors are
/// linearly interpolated and rounded to bytes, so the same `t` always maps
/// to the same triple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Colormap {
    /// Dark blue -> blue -> cyan -> yellow -> red -> dark red.
    #[default]
    Jet,
    /// Black -> red -> yellow -> white.
    Hot,
    /// Cyan -> magenta.
    Cool,
    Gray,
}

impl Colormap {
    pub const ALL: [Colormap; 4] = [Colormap::Jet, Colormap::Hot, Colormap::Cool, Colormap::Gray];

    pub fn name(self) -> &'static str {
        match self {
            Colormap::Jet => "jet",
            Colormap::Hot => "hot",
            Colormap::Cool => "cool",
            Colormap::Gray => "gray",
        }
    }

    fn table(self) -> SegmentTable {
        match self {
            Colormap::Jet => JET,
            Colormap::Hot => HOT,
            Colormap::Cool => COOL,
            Colormap::Gray => GRAY,
        }
    }

    /// Color of `t`, clamped to `[0, 1]` first. NaN maps like `0`.
    pub fn rgb(self, t: Value) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        self.table().map(|segment| to_byte(sample(segment, t)))
    }
}

fn sample(segment: Segment, t: Value) -> Value {
    // First anchor at or past `t`; tables start at 0 and end at 1, so it exists for clamped `t`.
    let upper = segment
        .iter()
        .position(|&(x, _)| x >= t)
        .unwrap_or(segment.len() - 1);
    if upper == 0 {
        return segment[0].1;
    }
    let (x0, y0) = segment[upper - 1];
    let (x1, y1) = segment[upper];
    lerp(y0, y1, (t - x0) / (x1 - x0))
}

fn to_byte(intensity: Value) -> u8 {
    (intensity.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Colormap {
    type Err = SliceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jet" => Ok(Colormap::Jet),
            "hot" => Ok(Colormap::Hot),
            "cool" => Ok(Colormap::Cool),
            "gray" | "grey" => Ok(Colormap::Gray),
            _ => Err(SliceError::UnknownColormap(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jet_end_colors() {
        assert_eq!(Colormap::Jet.rgb(0.0), [0, 0, 128]);
        assert_eq!(Colormap::Jet.rgb(1.0), [128, 0, 0]);
    }

    #[test]
    fn jet_interior_anchors() {
        // green saturates between 0.375 and 0.64
        assert_eq!(Colormap::Jet.rgb(0.5), [123, 255, 123]);
        assert_eq!(Colormap::Jet.rgb(0.11), [0, 0, 255]);
        assert_eq!(Colormap::Jet.rgb(0.89)[0], 255);
    }

    #[test]
    fn out_of_range_is_clamped() {
        for cmap in Colormap::ALL {
            assert_eq!(cmap.rgb(-0.3), cmap.rgb(0.0));
            assert_eq!(cmap.rgb(7.0), cmap.rgb(1.0));
            assert_eq!(cmap.rgb(Value::NAN), cmap.rgb(0.0));
        }
    }

    #[test]
    fn gray_is_linear() {
        assert_eq!(Colormap::Gray.rgb(0.0), [0, 0, 0]);
        assert_eq!(Colormap::Gray.rgb(1.0), [255, 255, 255]);
        assert_eq!(Colormap::Gray.rgb(0.2), [51, 51, 51]);
    }

    #[test]
    fn deterministic_for_same_input() {
        for i in 0..=100 {
            let t = i as Value / 100.0;
            assert_eq!(Colormap::Hot.rgb(t), Colormap::Hot.rgb(t));
        }
    }

    #[test]
    fn parses_names() {
        assert_eq!("jet".parse::<Colormap>(), Ok(Colormap::Jet));
        assert_eq!("Grey".parse::<Colormap>(), Ok(Colormap::Gray));
        for cmap in Colormap::ALL {
            assert_eq!(cmap.to_string().parse::<Colormap>(), Ok(cmap));
        }
        assert_eq!(
            "turbo".parse::<Colormap>(),
            Err(SliceError::UnknownColormap("turbo".into()))
        );
    }
}
