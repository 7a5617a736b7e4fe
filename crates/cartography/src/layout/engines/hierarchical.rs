//! Hierarchical layout engine
//!
//! Runs the layered pipeline: layer assignment, crossing reduction,
//! coordinate assignment, collision resolution and edge routing. Spacing is
//! widened by a configurable factor to leave room for curved edges.

use indexmap::IndexMap;
use log::{debug, info, warn};

use crate::{
    cancel::{CancellationToken, Outcome},
    layout::{
        CollisionResolver, CoordinateAssigner, CrossingMinimizer, EdgeRouter, Layerer, Layout,
        LayoutOptions, NodeLayout, adjacency::Adjacency, engines::LayoutEngine,
    },
    structure::Graph,
};

use super::DEFAULT_SPACING_SCALE;

pub struct Engine {
    options: LayoutOptions,
    spacing_scale: f32,
    crossing_sweeps: usize,
    collision_passes: usize,
}

impl Engine {
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            options,
            spacing_scale: DEFAULT_SPACING_SCALE,
            crossing_sweeps: 3,
            collision_passes: 100,
        }
    }

    /// Set the spacing multiplier
    pub fn set_spacing_scale(&mut self, scale: f32) -> &mut Self {
        self.spacing_scale = scale;
        self
    }

    /// Set the number of crossing reduction sweeps
    pub fn set_crossing_sweeps(&mut self, sweeps: usize) -> &mut Self {
        self.crossing_sweeps = sweeps;
        self
    }

    /// Set the maximum number of collision relaxation passes
    pub fn set_collision_passes(&mut self, passes: usize) -> &mut Self {
        self.collision_passes = passes;
        self
    }

    /// Pairs node layouts with the graph's node IDs, keeping graph order.
    fn keyed(graph: &Graph, placed: Vec<NodeLayout>) -> IndexMap<String, NodeLayout> {
        graph
            .node_ids()
            .map(str::to_string)
            .zip(placed)
            .collect()
    }
}

impl LayoutEngine for Engine {
    fn calculate(&self, graph: &Graph, cancel: Option<&CancellationToken>) -> Outcome<Layout> {
        let options = self.options.scaled_spacing(self.spacing_scale);
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            direction:% = options.direction;
            "Calculating hierarchical layout"
        );
        if graph.is_empty() {
            return Outcome::Complete(Layout::new(IndexMap::new(), Vec::new(), &options));
        }

        let adjacency = Adjacency::from_graph(graph);
        let layering = Layerer::new()
            .with_cancellation(cancel.cloned())
            .assign(graph, &adjacency);
        let mut cancelled = layering.is_cancelled();
        let mut layers = layering.into_inner();

        if !cancelled {
            CrossingMinimizer::new()
                .with_sweeps(self.crossing_sweeps)
                .minimize(&mut layers, &adjacency);
        }

        let mut placed = CoordinateAssigner::new(options).assign(&layers, graph.node_count());
        CollisionResolver::new()
            .with_max_passes(self.collision_passes)
            .resolve(&mut placed);
        let nodes = Self::keyed(graph, placed);

        cancelled |= cancel.is_some_and(CancellationToken::is_cancelled);
        if cancelled {
            warn!(nodes = nodes.len(); "Layout cancelled, skipping edge routing");
            return Outcome::Cancelled(Layout::new(nodes, Vec::new(), &options));
        }

        let edges = EdgeRouter::new(options).route(graph, &nodes);
        let layout = Layout::new(nodes, edges, &options);
        debug!(
            width = layout.width(),
            height = layout.height(),
            layers = layout.layer_count();
            "Hierarchical layout complete"
        );
        Outcome::Complete(layout)
    }
}
