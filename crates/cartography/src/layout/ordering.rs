//! Crossing reduction with the barycenter heuristic.

use std::collections::HashMap;

use log::debug;

use crate::{
    layout::{adjacency::Adjacency, layering::Layers},
    structure::Graph,
};

/// Default number of forward/backward sweep pairs.
const DEFAULT_SWEEPS: usize = 3;

/// Reorders nodes within layers to reduce edge crossings.
///
/// Each sweep runs a forward pass that sorts every layer by the mean position
/// of its predecessors in the layer above, followed by a backward pass using
/// successors in the layer below. Sorting is stable, so ties keep their prior
/// order and the result is deterministic.
#[derive(Debug, Clone, Copy)]
pub struct CrossingMinimizer {
    sweeps: usize,
}

impl CrossingMinimizer {
    pub fn new() -> Self {
        Self {
            sweeps: DEFAULT_SWEEPS,
        }
    }

    /// Set the number of sweeps
    pub fn with_sweeps(mut self, sweeps: usize) -> Self {
        self.sweeps = sweeps;
        self
    }

    /// Reorders `layers` in place against the edges of `graph`.
    pub fn apply(&self, graph: &Graph, layers: &mut Layers) {
        self.minimize(layers, &Adjacency::from_graph(graph));
    }

    pub(crate) fn minimize(&self, layers: &mut Layers, adjacency: &Adjacency) {
        if layers.len() < 2 {
            return;
        }

        for _ in 0..self.sweeps {
            for i in 1..layers.len() {
                let (above, rest) = layers.split_at_mut(i);
                Self::reorder(&mut rest[0], &above[i - 1], |node| {
                    adjacency.predecessors(node).collect()
                });
            }
            for i in (0..layers.len() - 1).rev() {
                let (upto, below) = layers.split_at_mut(i + 1);
                Self::reorder(&mut upto[i], &below[0], |node| {
                    adjacency.successors(node).collect()
                });
            }
        }

        debug!(layers = layers.len(), sweeps = self.sweeps; "Crossings reduced");
    }

    /// Sorts `layer` by the barycenter of each node's neighbours in `reference`.
    ///
    /// A node without neighbours in `reference` keeps its current index as its
    /// barycenter.
    fn reorder(
        layer: &mut [usize],
        reference: &[usize],
        neighbours: impl Fn(usize) -> Vec<usize>,
    ) {
        let positions: HashMap<usize, usize> = reference
            .iter()
            .enumerate()
            .map(|(position, &node)| (node, position))
            .collect();

        let mut keyed: Vec<(f32, usize)> = layer
            .iter()
            .enumerate()
            .map(|(index, &node)| {
                let (sum, count) = neighbours(node)
                    .iter()
                    .filter_map(|neighbour| positions.get(neighbour))
                    .fold((0usize, 0usize), |(sum, count), &position| {
                        (sum + position, count + 1)
                    });
                let barycenter = if count == 0 {
                    index as f32
                } else {
                    sum as f32 / count as f32
                };
                (barycenter, node)
            })
            .collect();

        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        for (slot, (_, node)) in layer.iter_mut().zip(keyed) {
            *slot = node;
        }
    }
}

impl Default for CrossingMinimizer {
    fn default() -> Self {
        Self::new()
    }
}
