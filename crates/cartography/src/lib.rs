//! Cartography - dependency graphs and layered layouts for infrastructure.
//!
//! Turns a list of infrastructure [`Resource`](resource::Resource) records into a
//! typed dependency [`Graph`](structure::Graph) and computes a layered
//! [`Layout`](layout::Layout) for it: node positions, and a point path for
//! every edge. Rendering is left to downstream consumers, which read the graph
//! and the layout together.
//!
//! Every phase polls an optional [`CancellationToken`] and returns an
//! [`Outcome`]: a cancelled run still yields a best-effort value, flagged as
//! non-final.

pub mod config;
pub mod layout;
pub mod structure;

mod cancel;
mod error;

pub use cartography_core::{attributes, category, color, geometry, resource};

pub use cancel::{CancellationToken, Outcome};
pub use error::CartographyError;

use log::{debug, info};
use serde::Serialize;

use config::AppConfig;
use layout::{EngineBuilder, Layout};
use resource::Resource;
use structure::{Graph, GraphBuilder};

/// A graph together with its layout.
#[derive(Debug, Clone, Serialize)]
pub struct Diagram {
    graph: Graph,
    layout: Layout,
}

impl Diagram {
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Splits the diagram into its graph and layout.
    pub fn into_parts(self) -> (Graph, Layout) {
        (self.graph, self.layout)
    }
}

/// Builder for turning resources into laid out diagrams.
///
/// Runs graph construction and layout with the settings of an [`AppConfig`].
///
/// # Examples
///
/// ```rust
/// use cartography::{Cartographer, config::AppConfig, resource::Resource};
///
/// let resources = vec![
///     Resource::new("vpc", "aws_vpc", "main", "aws"),
///     Resource::new("web", "aws_instance", "web", "aws").with_dependency("vpc"),
/// ];
///
/// let cartographer = Cartographer::new(AppConfig::default());
/// let diagram = cartographer.generate(&resources);
///
/// assert_eq!(diagram.graph().node_count(), 2);
/// assert_eq!(diagram.layout().edges().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Cartographer {
    config: AppConfig,
}

impl Cartographer {
    /// Create a new cartographer with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Layout and style settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Build the dependency graph of `resources`.
    ///
    /// Unsupported resource types are skipped, dependencies on unknown IDs are
    /// dropped, and implicit edges are derived from attributes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cartography::{Cartographer, resource::Resource};
    ///
    /// let graph = Cartographer::default().build_graph(&[
    ///     Resource::new("net", "azurerm_virtual_network", "net", "azure"),
    ///     Resource::new("vm", "azurerm_linux_virtual_machine", "vm", "azure")
    ///         .with_dependency("net")
    ///         .with_dependency("missing"),
    /// ]);
    ///
    /// assert_eq!(graph.edge_count(), 1);
    /// ```
    pub fn build_graph(&self, resources: &[Resource]) -> Graph {
        self.build_graph_with_cancel(resources, None).into_inner()
    }

    /// Build the dependency graph of `resources`, polling `cancel`.
    ///
    /// A cancelled build returns the nodes and edges created so far.
    pub fn build_graph_with_cancel(
        &self,
        resources: &[Resource],
        cancel: Option<&CancellationToken>,
    ) -> Outcome<Graph> {
        let outcome = GraphBuilder::new()
            .with_cancellation(cancel.cloned())
            .build(resources);
        debug!(
            nodes = outcome.value().node_count(),
            edges = outcome.value().edge_count(),
            cancelled = outcome.is_cancelled();
            "Resource graph ready"
        );
        outcome
    }

    /// Lay out `graph` with the configured engine.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cartography::{Cartographer, resource::Resource};
    ///
    /// let cartographer = Cartographer::default();
    /// let graph = cartographer.build_graph(&[Resource::new("vpc", "aws_vpc", "vpc", "aws")]);
    /// let layout = cartographer.layout(&graph);
    ///
    /// assert!(layout.width() > 0.0 && layout.height() > 0.0);
    /// ```
    pub fn layout(&self, graph: &Graph) -> Layout {
        self.layout_with_cancel(graph, None).into_inner()
    }

    /// Lay out `graph`, polling `cancel` between phases.
    ///
    /// A cancelled layout places every node but carries no edge paths.
    pub fn layout_with_cancel(
        &self,
        graph: &Graph,
        cancel: Option<&CancellationToken>,
    ) -> Outcome<Layout> {
        let layout_config = self.config.layout();
        let mut engines = EngineBuilder::new()
            .with_options(layout_config.options())
            .with_spacing_scale(layout_config.spacing_scale());

        info!(engine:% = layout_config.engine(); "Calculating layout");
        let outcome = engines
            .engine(layout_config.engine())
            .calculate(graph, cancel);
        info!(
            nodes = outcome.value().nodes().len(),
            edges = outcome.value().edges().len(),
            cancelled = outcome.is_cancelled();
            "Layout calculated"
        );
        outcome
    }

    /// Build the graph of `resources` and lay it out.
    pub fn generate(&self, resources: &[Resource]) -> Diagram {
        self.generate_with_cancel(resources, None).into_inner()
    }

    /// Build and lay out `resources`, polling `cancel`.
    ///
    /// If graph construction is cancelled, the partial graph is still laid out
    /// (nodes placed, no edge paths) so the layout covers exactly its nodes.
    ///
    /// Combine with [`Outcome::into_result`] to treat cancellation as a
    /// [`CartographyError::Cancelled`]:
    ///
    /// ```rust
    /// use cartography::{Cartographer, CancellationToken, CartographyError};
    ///
    /// let token = CancellationToken::new();
    /// token.cancel();
    ///
    /// let result = Cartographer::default()
    ///     .generate_with_cancel(&[], Some(&token))
    ///     .into_result("generate");
    /// assert!(matches!(result, Err(CartographyError::Cancelled { .. })));
    /// ```
    pub fn generate_with_cancel(
        &self,
        resources: &[Resource],
        cancel: Option<&CancellationToken>,
    ) -> Outcome<Diagram> {
        let graph = match self.build_graph_with_cancel(resources, cancel) {
            Outcome::Complete(graph) => graph,
            Outcome::Cancelled(graph) => return self.partial_diagram(graph, cancel),
        };

        self.layout_with_cancel(&graph, cancel)
            .map(|layout| Diagram { graph, layout })
    }

    /// Lays out a partially built graph; the result is always cancelled.
    fn partial_diagram(
        &self,
        graph: Graph,
        cancel: Option<&CancellationToken>,
    ) -> Outcome<Diagram> {
        let layout = self.layout_with_cancel(&graph, cancel).into_inner();
        Outcome::Cancelled(Diagram { graph, layout })
    }
}
