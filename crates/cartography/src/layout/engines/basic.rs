//! Basic layout engine
//!
//! A simple, deterministic alternative to the hierarchical engine. Layers come
//! from breadth-first discovery, each layer is ordered by node degree, and
//! edges are straight lines between side centers. Spacing is used as
//! configured.

use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;
use log::{debug, warn};

use cartography_core::geometry::Point;

use crate::{
    cancel::{CancellationToken, Outcome},
    layout::{
        CoordinateAssigner, Direction, EdgeLayout, Layout, LayoutOptions, NodeLayout, PathShape,
        adjacency::Adjacency, engines::LayoutEngine, layering::Layers,
    },
    structure::Graph,
};

pub struct Engine {
    options: LayoutOptions,
}

impl Engine {
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    /// Assigns layers by breadth-first search from the roots.
    ///
    /// A node lands one layer below the node that discovered it first. Nodes
    /// unreachable from any root start a new search at layer 0.
    fn assign_layers(adjacency: &Adjacency) -> Layers {
        let node_count = adjacency.node_count();
        let mut layers: Layers = Vec::new();
        let mut visited = HashSet::new();

        let roots: Vec<usize> = (0..node_count)
            .filter(|&node| adjacency.in_degree(node) == 0)
            .collect();
        let starts = roots.into_iter().chain(0..node_count);

        let mut queue = VecDeque::new();
        for start in starts {
            if visited.contains(&start) {
                continue;
            }
            queue.push_back((start, 0));

            while let Some((node, layer)) = queue.pop_front() {
                if !visited.insert(node) {
                    continue;
                }
                while layers.len() <= layer {
                    layers.push(Vec::new());
                }
                layers[layer].push(node);

                for child in adjacency.successors(node) {
                    if !visited.contains(&child) {
                        queue.push_back((child, layer + 1));
                    }
                }
            }
        }

        layers
    }

    /// Sorts each layer by degree, highest first. Ties keep discovery order.
    fn order_layers(layers: &mut Layers, adjacency: &Adjacency) {
        for layer in layers.iter_mut() {
            layer.sort_by_key(|&node| std::cmp::Reverse(adjacency.degree(node)));
        }
    }

    /// Straight segment between the facing side centers of two nodes.
    fn connect(&self, source: &NodeLayout, target: &NodeLayout) -> Vec<Point> {
        let (s, t) = (source.bounds(), target.bounds());
        let (sc, tc) = (s.center(), t.center());
        let (start, end) = match self.options.direction {
            Direction::TopToBottom => (sc.with_y(s.max_y()), tc.with_y(t.min_y())),
            Direction::BottomToTop => (sc.with_y(s.min_y()), tc.with_y(t.max_y())),
            Direction::LeftToRight => (sc.with_x(s.max_x()), tc.with_x(t.min_x())),
            Direction::RightToLeft => (sc.with_x(s.min_x()), tc.with_x(t.max_x())),
        };
        vec![start, end]
    }
}

impl LayoutEngine for Engine {
    fn calculate(&self, graph: &Graph, cancel: Option<&CancellationToken>) -> Outcome<Layout> {
        let options = self.options;
        let adjacency = Adjacency::from_graph(graph);

        let mut layers = Self::assign_layers(&adjacency);
        Self::order_layers(&mut layers, &adjacency);

        let placed = CoordinateAssigner::new(options).assign(&layers, graph.node_count());
        let nodes: IndexMap<String, NodeLayout> = graph
            .node_ids()
            .map(str::to_string)
            .zip(placed)
            .collect();

        if cancel.is_some_and(CancellationToken::is_cancelled) {
            warn!(nodes = nodes.len(); "Layout cancelled, skipping edges");
            return Outcome::Cancelled(Layout::new(nodes, Vec::new(), &options));
        }

        let edges: Vec<EdgeLayout> = graph
            .edges()
            .iter()
            .filter_map(|edge| {
                let source = nodes.get(edge.from())?;
                let target = nodes.get(edge.to())?;
                Some(EdgeLayout::new(
                    edge.from(),
                    edge.to(),
                    self.connect(source, target),
                    PathShape::Straight,
                ))
            })
            .collect();

        debug!(layers = layers.len(), edges = edges.len(); "Basic layout complete");
        Outcome::Complete(Layout::new(nodes, edges, &options))
    }
}
