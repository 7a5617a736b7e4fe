//! Derived adjacency over a [`Graph`].
//!
//! Layout phases work with node positions in graph order (`usize`) instead of
//! string IDs. The adjacency is recomputed from the graph whenever a layout
//! runs and never outlives it.

use petgraph::{
    Direction::{Incoming, Outgoing},
    graph::{DiGraph, NodeIndex},
};

use crate::structure::Graph;

#[derive(Debug)]
pub(crate) struct Adjacency {
    graph: DiGraph<(), ()>,
}

impl Adjacency {
    /// Builds the adjacency of `graph`. Node `i` is the `i`-th node in graph order.
    pub(crate) fn from_graph(graph: &Graph) -> Self {
        let mut adjacency = DiGraph::with_capacity(graph.node_count(), graph.edge_count());
        for _ in 0..graph.node_count() {
            adjacency.add_node(());
        }
        for edge in graph.edges() {
            if let (Some(from), Some(to)) = (graph.node_index(edge.from()), graph.node_index(edge.to()))
            {
                adjacency.add_edge(NodeIndex::new(from), NodeIndex::new(to), ());
            }
        }
        Self { graph: adjacency }
    }

    pub(crate) fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the source nodes of edges entering `node`.
    pub(crate) fn predecessors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.graph
            .neighbors_directed(NodeIndex::new(node), Incoming)
            .map(NodeIndex::index)
    }

    /// Returns the target nodes of edges leaving `node`.
    pub(crate) fn successors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.graph
            .neighbors_directed(NodeIndex::new(node), Outgoing)
            .map(NodeIndex::index)
    }

    pub(crate) fn in_degree(&self, node: usize) -> usize {
        self.predecessors(node).count()
    }

    /// Number of edges touching `node` in either direction.
    pub(crate) fn degree(&self, node: usize) -> usize {
        self.predecessors(node).count() + self.successors(node).count()
    }
}

#[cfg(test)]
mod tests {
    use cartography_core::resource::Resource;

    use super::*;
    use crate::structure::GraphBuilder;

    #[test]
    fn test_adjacency_follows_graph_order() {
        let graph = GraphBuilder::new()
            .build(&[
                Resource::new("vpc", "aws_vpc", "vpc", "aws"),
                Resource::new("subnet", "aws_subnet", "subnet", "aws").with_dependency("vpc"),
                Resource::new("vm", "aws_instance", "vm", "aws").with_dependency("subnet"),
            ])
            .into_inner();
        let adjacency = Adjacency::from_graph(&graph);

        assert_eq!(adjacency.node_count(), 3);
        assert_eq!(adjacency.successors(0).collect::<Vec<_>>(), vec![1]);
        assert_eq!(adjacency.predecessors(2).collect::<Vec<_>>(), vec![1]);
        assert_eq!(adjacency.in_degree(0), 0);
        assert_eq!(adjacency.degree(1), 2);
    }
}
