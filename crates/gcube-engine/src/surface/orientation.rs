use serde::{Deserialize, Deserializer, Serialize};

use crate::error::EngineError;

/// A screen orientation the game can be laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenOrientation {
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
}

impl ScreenOrientation {
    pub const ALL: [ScreenOrientation; 4] = [
        ScreenOrientation::Portrait,
        ScreenOrientation::PortraitUpsideDown,
        ScreenOrientation::LandscapeLeft,
        ScreenOrientation::LandscapeRight,
    ];

    fn bit(self) -> u32 {
        match self {
            ScreenOrientation::Portrait => OrientationMask::PORTRAIT,
            ScreenOrientation::PortraitUpsideDown => OrientationMask::PORTRAIT_UPSIDE_DOWN,
            ScreenOrientation::LandscapeLeft => OrientationMask::LANDSCAPE_LEFT,
            ScreenOrientation::LandscapeRight => OrientationMask::LANDSCAPE_RIGHT,
        }
    }
}

/// Android `ActivityInfo.SCREEN_ORIENTATION_*` values.
pub mod android {
    pub const UNSPECIFIED: i32 = -1;
    pub const LANDSCAPE: i32 = 0;
    pub const PORTRAIT: i32 = 1;
    pub const SENSOR: i32 = 4;
    pub const SENSOR_LANDSCAPE: i32 = 6;
    pub const SENSOR_PORTRAIT: i32 = 7;
    pub const REVERSE_LANDSCAPE: i32 = 8;
    pub const REVERSE_PORTRAIT: i32 = 9;
}

/// Set of orientations the game supports.
/// Serialized as a list of orientation names; also read from a raw bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "Vec<ScreenOrientation>")]
pub struct OrientationMask(u32);

#[derive(Deserialize)]
#[serde(untagged)]
enum MaskRepr {
    Bits(u32),
    Names(Vec<ScreenOrientation>),
}

impl OrientationMask {
    pub const PORTRAIT: u32 = 1 << 0;
    pub const PORTRAIT_UPSIDE_DOWN: u32 = 1 << 1;
    pub const LANDSCAPE_LEFT: u32 = 1 << 2;
    pub const LANDSCAPE_RIGHT: u32 = 1 << 3;
    const KNOWN: u32 = Self::PORTRAIT
        | Self::PORTRAIT_UPSIDE_DOWN
        | Self::LANDSCAPE_LEFT
        | Self::LANDSCAPE_RIGHT;

    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build a mask from raw bits, rejecting any bit outside the known set.
    pub fn from_bits(bits: u32) -> Result<Self, EngineError> {
        if bits & !Self::KNOWN != 0 {
            return Err(EngineError::Config(format!(
                "unknown orientation bits {:#x}",
                bits & !Self::KNOWN
            )));
        }
        Ok(Self(bits))
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, orientation: ScreenOrientation) -> bool {
        self.0 & orientation.bit() != 0
    }

    pub fn with(self, orientation: ScreenOrientation) -> Self {
        Self(self.0 | orientation.bit())
    }

    /// The `SCREEN_ORIENTATION_*` value the Android activity should request.
    ///
    /// Any portrait combined with any landscape lets the sensor decide freely.
    /// Otherwise the sensor is only used when both directions of one axis are allowed.
    pub fn android_screen_orientation(self) -> i32 {
        let portrait = self.contains(ScreenOrientation::Portrait);
        let upside_down = self.contains(ScreenOrientation::PortraitUpsideDown);
        let left = self.contains(ScreenOrientation::LandscapeLeft);
        let right = self.contains(ScreenOrientation::LandscapeRight);
        let any_landscape = left || right;

        match (portrait, upside_down) {
            (true, _) | (_, true) if any_landscape => android::SENSOR,
            (true, true) => android::SENSOR_PORTRAIT,
            (true, false) => android::PORTRAIT,
            (false, true) => android::REVERSE_PORTRAIT,
            (false, false) => match (left, right) {
                (true, true) => android::SENSOR_LANDSCAPE,
                (true, false) => android::REVERSE_LANDSCAPE,
                (false, true) => android::LANDSCAPE,
                (false, false) => android::UNSPECIFIED,
            },
        }
    }
}

impl Default for OrientationMask {
    fn default() -> Self {
        Self(Self::PORTRAIT)
    }
}

impl From<Vec<ScreenOrientation>> for OrientationMask {
    fn from(list: Vec<ScreenOrientation>) -> Self {
        list.into_iter().fold(Self::empty(), Self::with)
    }
}

impl<'de> Deserialize<'de> for OrientationMask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match MaskRepr::deserialize(deserializer)? {
            MaskRepr::Bits(bits) => Self::from_bits(bits).map_err(serde::de::Error::custom),
            MaskRepr::Names(list) => Ok(Self::from(list)),
        }
    }
}

impl From<OrientationMask> for Vec<ScreenOrientation> {
    fn from(mask: OrientationMask) -> Self {
        ScreenOrientation::ALL
            .into_iter()
            .filter(|o| mask.contains(*o))
            .collect()
    }
}
