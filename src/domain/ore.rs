/// Ore and build tiles.
/// Ore value is derived from colour, never stored separately,
/// so the colour → points table lives in one place.

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum OreColor {
    Red,
    Green,
    Purple,
}

impl OreColor {
    pub const ALL: [OreColor; 3] = [OreColor::Red, OreColor::Green, OreColor::Purple];

    /// Points awarded for mining ore of this colour.
    pub fn value(self) -> u32 {
        match self {
            OreColor::Red => 1,
            OreColor::Green => 5,
            OreColor::Purple => 10,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OreColor::Red => "red",
            OreColor::Green => "green",
            OreColor::Purple => "purple",
        }
    }

    /// Parse a config colour name (case-insensitive).
    pub fn from_name(s: &str) -> Option<OreColor> {
        match s.trim().to_lowercase().as_str() {
            "red" => Some(OreColor::Red),
            "green" => Some(OreColor::Green),
            "purple" => Some(OreColor::Purple),
            _ => None,
        }
    }
}

/// A collectible ore tile. `(x, y)` is the bottom-left corner in world units.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Ore {
    pub x: i64,
    pub y: i64,
    pub color: OreColor,
}

impl Ore {
    pub fn new(x: i64, y: i64, color: OreColor) -> Self {
        Ore { x, y, color }
    }

    #[inline]
    pub fn value(&self) -> u32 {
        self.color.value()
    }

    /// Both axis deltas strictly below `tolerance`.
    #[inline]
    pub fn within(&self, x: i64, y: i64, tolerance: i64) -> bool {
        self.x.abs_diff(x) < tolerance.unsigned_abs() && self.y.abs_diff(y) < tolerance.unsigned_abs()
    }
}

/// A placed build tile. Permanent for the session.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BuildTile {
    pub x: i64,
    pub y: i64,
}
