//! Color handling for infrastructure diagrams
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate, and the per-[`Category`] palette renderers use to
//! fill and outline nodes.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{AlphaColor, DynamicColor, Srgb};
use serde::{Serialize, Serializer};

use crate::category::Category;

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_hex().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use cartography_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Creates an opaque sRGB color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        let color = AlphaColor::<Srgb>::new([
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            1.0,
        ]);
        Self {
            color: DynamicColor::from_alpha_color(color),
        }
    }

    fn from_hex_u32(rgb: u32) -> Self {
        Self::from_rgb8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Returns the 8-bit sRGB channels of this color.
    pub fn rgb8(self) -> [u8; 3] {
        let [r, g, b, _] = self.color.to_alpha_color::<Srgb>().components;
        [r, g, b].map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    /// Moves every channel toward white by `percent` (0.0 to 1.0).
    ///
    /// # Examples
    ///
    /// ```
    /// use cartography_core::color::Color;
    ///
    /// let color = Color::new("#000000").unwrap();
    /// assert_eq!(color.lighten(1.0).to_hex(), "#ffffff");
    /// ```
    pub fn lighten(self, percent: f32) -> Self {
        let [r, g, b] = self
            .rgb8()
            .map(|c| (f32::from(c) + (255.0 - f32::from(c)) * percent) as u8);
        Self::from_rgb8(r, g, b)
    }

    /// Moves every channel toward black by `percent` (0.0 to 1.0).
    pub fn darken(self, percent: f32) -> Self {
        let [r, g, b] = self
            .rgb8()
            .map(|c| (f32::from(c) * (1.0 - percent)) as u8);
        Self::from_rgb8(r, g, b)
    }

    /// Returns the `#rrggbb` form of this color.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Returns the alpha (transparency) component of this color.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::from_rgb8(0, 0, 0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Fill color for nodes of the given category.
pub fn fill_color(category: Category) -> Color {
    Color::from_hex_u32(match category {
        Category::Network => 0x1E88E5,
        Category::Security => 0xE53935,
        Category::Compute => 0x43A047,
        Category::LoadBalancer => 0xFB8C00,
        Category::Storage => 0x8E24AA,
        Category::Database => 0x00ACC1,
        Category::Dns => 0xFDD835,
        Category::Certificate => 0x7CB342,
        Category::Secret => 0x5E35B1,
        Category::Container => 0x039BE5,
        Category::Cdn => 0xF4511E,
        Category::Unknown => 0x757575,
    })
}

/// Accent color (icons, borders, edge highlights) for the given category.
pub fn accent_color(category: Category) -> Color {
    Color::from_hex_u32(match category {
        Category::Network => 0x2196F3,
        Category::Security => 0xF44336,
        Category::Compute => 0x4CAF50,
        Category::LoadBalancer => 0xFF9800,
        Category::Storage => 0x9C27B0,
        Category::Database => 0x00BCD4,
        Category::Dns => 0xFFC107,
        Category::Certificate => 0x8BC34A,
        Category::Secret => 0x673AB7,
        Category::Container => 0x03A9F4,
        Category::Cdn => 0xFF5722,
        Category::Unknown => 0x607D8B,
    })
}
