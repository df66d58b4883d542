//! Quarter-turn rotation angles.

use serde::{Deserialize, Serialize};

/// Clockwise rotation in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum RotationAngle {
    /// Upright.
    #[default]
    Deg0,
    /// One quarter turn clockwise.
    Deg90,
    /// Half turn.
    Deg180,
    /// Three quarter turns clockwise.
    Deg270,
}

impl RotationAngle {
    /// All four angles in clockwise order.
    pub const ALL: [RotationAngle; 4] = [
        RotationAngle::Deg0,
        RotationAngle::Deg90,
        RotationAngle::Deg180,
        RotationAngle::Deg270,
    ];

    /// Converts a raw angle in degrees.
    ///
    /// Multiples of 90 are normalized into `0..360` (so `-90` is 270).
    /// Any other value yields `None`.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        if degrees % 90 != 0 {
            return None;
        }
        Some(Self::from_quarter_turns(degrees.rem_euclid(360) / 90))
    }

    /// Builds an angle from a quarter-turn count, modulo 4.
    pub fn from_quarter_turns(turns: i32) -> Self {
        Self::ALL[turns.rem_euclid(4) as usize]
    }

    /// Number of clockwise quarter turns (0..=3).
    #[inline]
    pub fn quarter_turns(self) -> u8 {
        match self {
            RotationAngle::Deg0 => 0,
            RotationAngle::Deg90 => 1,
            RotationAngle::Deg180 => 2,
            RotationAngle::Deg270 => 3,
        }
    }

    /// Angle in degrees.
    #[inline]
    pub fn degrees(self) -> u16 {
        u16::from(self.quarter_turns()) * 90
    }

    /// Returns true if rotating by this angle swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, RotationAngle::Deg90 | RotationAngle::Deg270)
    }

    /// Composes two rotations.
    pub fn then(self, other: RotationAngle) -> Self {
        Self::from_quarter_turns(i32::from(self.quarter_turns() + other.quarter_turns()))
    }

    /// The rotation that undoes this one.
    pub fn inverse(self) -> Self {
        Self::from_quarter_turns(4 - i32::from(self.quarter_turns()))
    }
}

impl From<RotationAngle> for u16 {
    fn from(angle: RotationAngle) -> u16 {
        angle.degrees()
    }
}

impl TryFrom<u16> for RotationAngle {
    type Error = String;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(RotationAngle::Deg0),
            90 => Ok(RotationAngle::Deg90),
            180 => Ok(RotationAngle::Deg180),
            270 => Ok(RotationAngle::Deg270),
            other => Err(format!("rotation must be 0, 90, 180 or 270, got {other}")),
        }
    }
}

impl std::fmt::Display for RotationAngle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}
