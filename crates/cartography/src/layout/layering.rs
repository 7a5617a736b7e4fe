//! Layer assignment.
//!
//! Nodes are ranked by breadth-first propagation from the graph's roots: a
//! node joins the layer after the one in which its last parent was placed.
//! Cycles and disconnected parts are handled by seeding from a fallback node
//! whenever the frontier runs dry.

use std::collections::HashSet;

use log::{debug, trace, warn};

use crate::{
    cancel::{CancellationToken, Outcome},
    layout::adjacency::Adjacency,
    structure::Graph,
};

/// Node positions in graph order, grouped by layer.
pub type Layers = Vec<Vec<usize>>;

/// Number of foundation nodes used as seeds when the graph has no roots.
const MAX_FOUNDATION_SEEDS: usize = 3;

/// Assigns every node of a graph to a layer.
#[derive(Debug, Clone, Default)]
pub struct Layerer {
    cancel: Option<CancellationToken>,
}

impl Layerer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the token polled between layers
    pub fn with_cancellation(mut self, token: Option<CancellationToken>) -> Self {
        self.cancel = token;
        self
    }

    /// Assigns layers to all nodes of `graph`.
    ///
    /// Every node appears in exactly one layer, and within a layer nodes are
    /// sorted by category priority, then by name. For acyclic graphs every
    /// edge points from a lower layer to a higher one.
    ///
    /// On cancellation the nodes not yet placed are appended to the last layer
    /// and the result is returned as [`Outcome::Cancelled`].
    pub fn layer(&self, graph: &Graph) -> Outcome<Layers> {
        self.assign(graph, &Adjacency::from_graph(graph))
    }

    pub(crate) fn assign(&self, graph: &Graph, adjacency: &Adjacency) -> Outcome<Layers> {
        let node_count = adjacency.node_count();
        let mut layers: Layers = Vec::new();
        if node_count == 0 {
            return Outcome::Complete(layers);
        }

        let mut processed = vec![false; node_count];
        let mut processed_count = 0;
        let mut current = Self::seeds(graph, adjacency);

        // Every iteration places at least one node.
        for _ in 0..node_count {
            if processed_count == node_count {
                break;
            }
            if self
                .cancel
                .as_ref()
                .is_some_and(CancellationToken::is_cancelled)
            {
                warn!(placed = processed_count, total = node_count; "Layering cancelled");
                Self::append_unplaced(&mut layers, &processed);
                return Outcome::Cancelled(layers);
            }

            if current.is_empty() {
                // Frontier exhausted inside a cycle or at a disconnected part.
                if let Some(next_seed) = processed.iter().position(|done| !done) {
                    trace!(node = next_seed; "Reseeding layering frontier");
                    current.push(next_seed);
                }
            }

            Self::sort_layer(graph, &mut current);
            for &node in &current {
                processed[node] = true;
            }
            processed_count += current.len();

            let mut next = Vec::new();
            let mut queued = HashSet::new();
            for &node in &current {
                for child in adjacency.successors(node) {
                    if processed[child] || queued.contains(&child) {
                        continue;
                    }
                    if adjacency.predecessors(child).all(|parent| processed[parent]) {
                        queued.insert(child);
                        next.push(child);
                    }
                }
            }

            trace!(layer = layers.len(), nodes:? = current; "Layer assigned");
            layers.push(current);
            current = next;
        }

        if processed_count < node_count {
            warn!(unplaced = node_count - processed_count; "Layering bound reached");
            Self::append_unplaced(&mut layers, &processed);
        }

        debug!(layers = layers.len(), nodes = node_count; "Layers assigned");
        Outcome::Complete(layers)
    }

    /// Returns the initial frontier.
    ///
    /// Nodes without incoming edges come first. A graph made only of cycles is
    /// seeded with foundation (network or security) nodes, or its first node.
    fn seeds(graph: &Graph, adjacency: &Adjacency) -> Vec<usize> {
        let roots: Vec<usize> = (0..adjacency.node_count())
            .filter(|&node| adjacency.in_degree(node) == 0)
            .collect();
        if !roots.is_empty() {
            return roots;
        }

        let foundation: Vec<usize> = graph
            .nodes()
            .enumerate()
            .filter(|(_, node)| node.category().is_foundation())
            .map(|(index, _)| index)
            .take(MAX_FOUNDATION_SEEDS)
            .collect();
        warn!(seeds = foundation.len(); "Graph has no roots, seeding from foundation nodes");
        if foundation.is_empty() {
            vec![0]
        } else {
            foundation
        }
    }

    /// Sorts a layer by category priority, then name, then graph order.
    fn sort_layer(graph: &Graph, layer: &mut [usize]) {
        let nodes: Vec<_> = graph.nodes().collect();
        layer.sort_by(|&a, &b| {
            let (na, nb) = (nodes[a], nodes[b]);
            na.category()
                .priority()
                .cmp(&nb.category().priority())
                .then_with(|| na.name().cmp(nb.name()))
                .then_with(|| a.cmp(&b))
        });
    }

    fn append_unplaced(layers: &mut Layers, processed: &[bool]) {
        let unplaced: Vec<usize> = processed
            .iter()
            .enumerate()
            .filter(|(_, done)| !**done)
            .map(|(index, _)| index)
            .collect();
        if unplaced.is_empty() {
            return;
        }
        match layers.last_mut() {
            Some(last) => last.extend(unplaced),
            None => layers.push(unplaced),
        }
    }
}

#[cfg(test)]
mod tests {
    use cartography_core::resource::Resource;

    use super::*;
    use crate::structure::GraphBuilder;

    fn layers_of(resources: &[Resource]) -> (Graph, Layers) {
        let graph = GraphBuilder::new().build(resources).into_inner();
        let layers = Layerer::new().layer(&graph).into_inner();
        (graph, layers)
    }

    fn ids(graph: &Graph, layer: &[usize]) -> Vec<String> {
        let nodes: Vec<_> = graph.node_ids().collect();
        layer.iter().map(|&i| nodes[i].to_string()).collect()
    }

    #[test]
    fn test_chain_layers() {
        let (graph, layers) = layers_of(&[
            Resource::new("vm", "aws_instance", "vm", "aws").with_dependency("sg"),
            Resource::new("sg", "aws_security_group", "sg", "aws").with_dependency("vpc"),
            Resource::new("vpc", "aws_vpc", "vpc", "aws"),
        ]);

        assert_eq!(layers.len(), 3);
        assert_eq!(ids(&graph, &layers[0]), vec!["vpc"]);
        assert_eq!(ids(&graph, &layers[1]), vec!["sg"]);
        assert_eq!(ids(&graph, &layers[2]), vec!["vm"]);
    }

    #[test]
    fn test_waits_for_all_parents() {
        // vm depends on both the vpc (layer 0) and the subnet (layer 1).
        let (graph, layers) = layers_of(&[
            Resource::new("vpc", "aws_vpc", "vpc", "aws"),
            Resource::new("subnet", "aws_subnet", "subnet", "aws").with_dependency("vpc"),
            Resource::new("vm", "aws_instance", "vm", "aws")
                .with_dependency("vpc")
                .with_dependency("subnet"),
        ]);

        assert_eq!(layers.len(), 3);
        assert_eq!(ids(&graph, &layers[2]), vec!["vm"]);
    }

    #[test]
    fn test_layer_sorted_by_priority_then_name() {
        let (graph, layers) = layers_of(&[
            Resource::new("b", "aws_instance", "b", "aws"),
            Resource::new("z", "aws_vpc", "z", "aws"),
            Resource::new("a", "aws_instance", "a", "aws"),
            Resource::new("k", "aws_security_group", "k", "aws"),
        ]);

        assert_eq!(layers.len(), 1);
        assert_eq!(ids(&graph, &layers[0]), vec!["z", "k", "a", "b"]);
    }

    #[test]
    fn test_cycle_terminates_with_every_node() {
        let (graph, layers) = layers_of(&[
            Resource::new("a", "aws_instance", "a", "aws").with_dependency("c"),
            Resource::new("b", "aws_instance", "b", "aws").with_dependency("a"),
            Resource::new("c", "aws_instance", "c", "aws").with_dependency("b"),
        ]);

        let mut placed: Vec<usize> = layers.iter().flatten().copied().collect();
        placed.sort();
        assert_eq!(placed, vec![0, 1, 2]);
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn test_cycle_seeded_from_foundation() {
        let (graph, layers) = layers_of(&[
            Resource::new("vm", "aws_instance", "vm", "aws").with_dependency("sg"),
            Resource::new("sg", "aws_security_group", "sg", "aws").with_dependency("vm"),
        ]);

        assert_eq!(ids(&graph, &layers[0]), vec!["sg"]);
        assert_eq!(ids(&graph, &layers[1]), vec!["vm"]);
    }

    #[test]
    fn test_disconnected_components() {
        let (_, layers) = layers_of(&[
            Resource::new("vpc1", "aws_vpc", "vpc1", "aws"),
            Resource::new("vm1", "aws_instance", "vm1", "aws").with_dependency("vpc1"),
            Resource::new("vpc2", "aws_vpc", "vpc2", "aws"),
            Resource::new("vm2", "aws_instance", "vm2", "aws").with_dependency("vpc2"),
        ]);

        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].len(), 2);
        assert_eq!(layers[1].len(), 2);
    }

    #[test]
    fn test_cancelled_keeps_every_node() {
        let graph = GraphBuilder::new()
            .build(&[
                Resource::new("vpc", "aws_vpc", "vpc", "aws"),
                Resource::new("vm", "aws_instance", "vm", "aws").with_dependency("vpc"),
            ])
            .into_inner();
        let adjacency = Adjacency::from_graph(&graph);
        let token = CancellationToken::new();
        token.cancel();

        let outcome = Layerer::new()
            .with_cancellation(Some(token))
            .assign(&graph, &adjacency);

        assert!(outcome.is_cancelled());
        let layers = outcome.into_inner();
        assert_eq!(layers.iter().map(Vec::len).sum::<usize>(), 2);
    }
}
