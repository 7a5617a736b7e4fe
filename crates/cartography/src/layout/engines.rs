//! Layout engine factory module
//!
//! Two engines turn a [`Graph`] into a [`Layout`]: the hierarchical engine runs
//! the full layering, crossing reduction, collision and routing pipeline, the
//! basic engine places nodes by breadth-first discovery and joins them with
//! straight lines. Engines are created and cached by [`EngineBuilder`].

mod basic;
mod hierarchical;

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    cancel::{CancellationToken, Outcome},
    error::CartographyError,
    layout::{Layout, LayoutOptions},
    structure::Graph,
};

/// Default multiplier applied to spacing by the hierarchical engine.
pub const DEFAULT_SPACING_SCALE: f32 = 1.5;

/// Interface shared by the layout engines.
pub trait LayoutEngine {
    /// Calculate the layout of `graph`
    ///
    /// The token is polled between phases. A cancelled run still places every
    /// node, returns no edge geometry and is wrapped in [`Outcome::Cancelled`].
    fn calculate(&self, graph: &Graph, cancel: Option<&CancellationToken>) -> Outcome<Layout>;
}

/// Available layout algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutEngineKind {
    #[default]
    Hierarchical,
    Basic,
}

impl LayoutEngineKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutEngineKind::Hierarchical => "hierarchical",
            LayoutEngineKind::Basic => "basic",
        }
    }
}

impl fmt::Display for LayoutEngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutEngineKind {
    type Err = CartographyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hierarchical" => Ok(LayoutEngineKind::Hierarchical),
            "basic" => Ok(LayoutEngineKind::Basic),
            _ => Err(CartographyError::invalid_config(format!(
                "unknown layout engine `{s}`"
            ))),
        }
    }
}

/// Builder for creating and configuring layout engines.
///
/// Engines are created on first request and reused afterwards, so options must
/// be set before the first call to [`EngineBuilder::engine`].
pub struct EngineBuilder {
    engines: HashMap<LayoutEngineKind, Box<dyn LayoutEngine>>,

    options: LayoutOptions,
    spacing_scale: f32,
    crossing_sweeps: usize,
    collision_passes: usize,
}

impl EngineBuilder {
    /// Create a new engine builder with default options
    pub fn new() -> Self {
        Self {
            engines: HashMap::new(),
            options: LayoutOptions::default(),
            spacing_scale: DEFAULT_SPACING_SCALE,
            crossing_sweeps: 3,
            collision_passes: 100,
        }
    }

    /// Set node size, spacing and direction
    pub fn with_options(mut self, options: LayoutOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the spacing multiplier of the hierarchical engine
    pub fn with_spacing_scale(mut self, scale: f32) -> Self {
        self.spacing_scale = scale;
        self
    }

    /// Set the number of crossing reduction sweeps
    pub fn with_crossing_sweeps(mut self, sweeps: usize) -> Self {
        self.crossing_sweeps = sweeps;
        self
    }

    /// Set the maximum number of collision relaxation passes
    pub fn with_collision_passes(mut self, passes: usize) -> Self {
        self.collision_passes = passes;
        self
    }

    /// Get an engine of the specified kind with the configured options
    pub fn engine(&mut self, kind: LayoutEngineKind) -> &dyn LayoutEngine {
        let engine = self.engines.entry(kind).or_insert_with(|| {
            let engine: Box<dyn LayoutEngine> = match kind {
                LayoutEngineKind::Hierarchical => {
                    let mut e = hierarchical::Engine::new(self.options);
                    e.set_spacing_scale(self.spacing_scale)
                        .set_crossing_sweeps(self.crossing_sweeps)
                        .set_collision_passes(self.collision_passes);
                    Box::new(e)
                }
                LayoutEngineKind::Basic => Box::new(basic::Engine::new(self.options)),
            };
            engine
        });
        &**engine
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
