//! Region color keys.
//!
//! A color key identifies a region by the color it is painted with on the
//! proxy mesh. It is only a grouping key; the color has no rendering
//! meaning inside this crate beyond [`ColorKey::display_color`].

use std::fmt;
use std::str::FromStr;

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// 8-bit RGB triple used as a region key.
///
/// Textual form is `"(r, g, b)"`, which is how the vertex map stores keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorKey {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorKey {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Normalized RGBA color (alpha 1) for painting the proxy mesh.
    pub fn display_color(&self) -> Vec4 {
        Vec4::new(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            1.0,
        )
    }
}

impl FromStr for ColorKey {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || LoadError::MalformedColorKey(s.to_string());

        let inner = s
            .trim()
            .trim_start_matches('(')
            .trim_end_matches(')');

        let mut components = inner.split(',').map(|c| c.trim().parse::<u8>());
        let (Some(Ok(r)), Some(Ok(g)), Some(Ok(b)), None) = (
            components.next(),
            components.next(),
            components.next(),
            components.next(),
        ) else {
            return Err(malformed());
        };

        Ok(Self { r, g, b })
    }
}

impl TryFrom<String> for ColorKey {
    type Error = LoadError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ColorKey> for String {
    fn from(key: ColorKey) -> Self {
        key.to_string()
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}
