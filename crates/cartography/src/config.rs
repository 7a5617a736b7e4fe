//! Configuration types for Cartography layouts.
//!
//! This module provides configuration structures that control how graphs are
//! laid out and styled. All types implement [`serde::Deserialize`] so they can
//! be loaded from TOML or any other serde source; every field is optional.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and style settings.
//! - [`LayoutConfig`] - Engine choice, direction, node size and spacing.
//! - [`StyleConfig`] - Visual styling options such as background color.
//!
//! # Example
//!
//! ```
//! # use cartography::config::AppConfig;
//! # use cartography::layout::Direction;
//! let config = AppConfig::from_toml_str(
//!     r#"
//!     [layout]
//!     direction = "LR"
//!     node_width = 180
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.layout().direction(), Direction::LeftToRight);
//! assert_eq!(config.layout().node_height(), 160.0);
//! assert!(config.style().background_color().is_ok());
//! ```

use serde::Deserialize;

use cartography_core::{color::Color, geometry::Size};

use crate::{
    error::CartographyError,
    layout::{Direction, LayoutEngineKind, LayoutOptions, engines::DEFAULT_SPACING_SCALE},
};

/// Top-level configuration combining layout and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and style configurations.
    ///
    /// # Arguments
    ///
    /// * `layout` - Engine, direction, sizes and spacing.
    /// * `style` - Visual styling options.
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`CartographyError::ConfigParse`] if the document is not valid
    /// TOML or does not match the configuration schema, and
    /// [`CartographyError::InvalidConfig`] if a value is out of range.
    pub fn from_toml_str(source: &str) -> Result<Self, CartographyError> {
        let config: AppConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that sizes and spacings are positive finite numbers.
    ///
    /// # Errors
    ///
    /// Returns [`CartographyError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), CartographyError> {
        let layout = &self.layout;
        for (field, value) in [
            ("node_width", layout.node_width),
            ("node_height", layout.node_height),
            ("horizontal_spacing", layout.horizontal_spacing),
            ("vertical_spacing", layout.vertical_spacing),
            ("spacing_scale", layout.spacing_scale),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CartographyError::invalid_config(format!(
                    "layout.{field} must be a positive number, got {value}"
                )));
            }
        }
        self.style
            .background_color()
            .map_err(CartographyError::InvalidConfig)?;
        Ok(())
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Layout configuration section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// [`LayoutEngineKind`] used to lay out graphs.
    engine: LayoutEngineKind,

    /// Flow [`Direction`] of the layers.
    direction: Direction,

    node_width: f32,
    node_height: f32,

    /// Gap between nodes along the x axis.
    horizontal_spacing: f32,

    /// Gap between nodes along the y axis.
    vertical_spacing: f32,

    /// Multiplier applied to both spacings by the hierarchical engine.
    spacing_scale: f32,
}

impl LayoutConfig {
    /// Returns the [`LayoutEngineKind`].
    pub fn engine(&self) -> LayoutEngineKind {
        self.engine
    }

    /// Returns the layer [`Direction`].
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn node_width(&self) -> f32 {
        self.node_width
    }

    pub fn node_height(&self) -> f32 {
        self.node_height
    }

    pub fn horizontal_spacing(&self) -> f32 {
        self.horizontal_spacing
    }

    pub fn vertical_spacing(&self) -> f32 {
        self.vertical_spacing
    }

    pub fn spacing_scale(&self) -> f32 {
        self.spacing_scale
    }

    /// Sets the [`LayoutEngineKind`].
    pub fn with_engine(mut self, engine: LayoutEngineKind) -> Self {
        self.engine = engine;
        self
    }

    /// Sets the layer [`Direction`].
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Sets the node size.
    pub fn with_node_size(mut self, width: f32, height: f32) -> Self {
        self.node_width = width;
        self.node_height = height;
        self
    }

    /// Sets the horizontal and vertical spacing.
    pub fn with_spacing(mut self, horizontal: f32, vertical: f32) -> Self {
        self.horizontal_spacing = horizontal;
        self.vertical_spacing = vertical;
        self
    }

    /// Sets the spacing multiplier of the hierarchical engine.
    pub fn with_spacing_scale(mut self, scale: f32) -> Self {
        self.spacing_scale = scale;
        self
    }

    /// Returns the unscaled [`LayoutOptions`] described by this section.
    pub fn options(&self) -> LayoutOptions {
        LayoutOptions {
            direction: self.direction,
            node_size: Size::new(self.node_width, self.node_height),
            horizontal_spacing: self.horizontal_spacing,
            vertical_spacing: self.vertical_spacing,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let options = LayoutOptions::default();
        Self {
            engine: LayoutEngineKind::default(),
            direction: options.direction,
            node_width: options.node_size.width(),
            node_height: options.node_size.height(),
            horizontal_spacing: options.horizontal_spacing,
            vertical_spacing: options.vertical_spacing,
            spacing_scale: DEFAULT_SPACING_SCALE,
        }
    }
}

/// Visual styling configuration.
///
/// Controls appearance options such as background color. Fields that are not
/// set fall back to renderer defaults.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Background [`Color`] for diagrams, as a color string.
    #[serde(default)]
    background_color: Option<String>,
}

impl StyleConfig {
    /// Creates a style with the given background color string.
    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }
}
