use std::{collections::HashSet, fmt, sync::Arc};

use log::{debug, info, trace, warn};

use cartography_core::resource::Resource;

use crate::{
    cancel::{CancellationToken, Outcome},
    structure::{
        Relationship,
        graph::{Edge, Graph, Node},
        implicit::{self, AttributeIndex},
        metadata,
    },
};

/// A phase of graph construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    Nodes,
    ExplicitEdges,
    ImplicitEdges,
}

impl BuildPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            BuildPhase::Nodes => "node creation",
            BuildPhase::ExplicitEdges => "explicit edges",
            BuildPhase::ImplicitEdges => "implicit edges",
        }
    }
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type PhaseObserver = Arc<dyn Fn(BuildPhase) + Send + Sync>;

/// Builds a [`Graph`] from resource records.
///
/// Construction runs in three phases: node creation, explicit dependency
/// edges and implicit connection detection. An optional observer is told when
/// each phase starts. The cancellation token is polled before every phase and
/// between resources; a cancelled build returns the graph built so far as
/// [`Outcome::Cancelled`].
///
/// Explicit edges point from the dependency to the resource that declares it,
/// so foundation resources end up upstream of what runs on them.
#[derive(Clone, Default)]
pub struct GraphBuilder {
    cancel: Option<CancellationToken>,
    on_phase: Option<PhaseObserver>,
}

impl fmt::Debug for GraphBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphBuilder")
            .field("cancel", &self.cancel)
            .field("on_phase", &self.on_phase.is_some())
            .finish()
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the token polled between construction steps
    pub fn with_cancellation(mut self, token: Option<CancellationToken>) -> Self {
        self.cancel = token;
        self
    }

    /// Set a callback invoked at the start of every construction phase
    pub fn with_phase_observer(
        mut self,
        observer: impl Fn(BuildPhase) + Send + Sync + 'static,
    ) -> Self {
        self.on_phase = Some(Arc::new(observer));
        self
    }

    fn enter(&self, phase: BuildPhase) {
        trace!(phase:% = phase; "Entering graph construction phase");
        if let Some(observer) = &self.on_phase {
            observer(phase);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Builds the graph for `resources`.
    pub fn build(&self, resources: &[Resource]) -> Outcome<Graph> {
        info!(resources = resources.len(); "Building dependency graph");
        let mut graph = Graph::new();

        self.enter(BuildPhase::Nodes);
        for resource in resources {
            if self.is_cancelled() {
                return Self::cancelled(graph, BuildPhase::Nodes);
            }
            if !resource.is_diagrammable() {
                trace!(id = resource.id.as_str(), resource_type = resource.resource_type.as_str(); "Skipping resource");
                continue;
            }
            graph.add_node(Node::from_resource(resource));
        }
        debug!(nodes = graph.node_count(); "Nodes created");

        self.enter(BuildPhase::ExplicitEdges);
        for resource in resources {
            if self.is_cancelled() {
                return Self::cancelled(graph, BuildPhase::ExplicitEdges);
            }
            self.add_dependency_edges(&mut graph, resource);
        }
        debug!(edges = graph.edge_count(); "Explicit edges added");

        self.enter(BuildPhase::ImplicitEdges);
        if self.is_cancelled() {
            return Self::cancelled(graph, BuildPhase::ImplicitEdges);
        }
        let explicit_pairs: HashSet<(String, String)> = graph
            .edges()
            .iter()
            .map(|edge| (edge.from().to_string(), edge.to().to_string()))
            .collect();
        let link_records: Vec<&Resource> = resources
            .iter()
            .filter(|resource| resource.is_link_record())
            .collect();
        let implicit_edges = {
            let index = AttributeIndex::build(&graph);
            debug!(entries = index.len(); "Attribute index built");
            implicit::detect(&graph, &index, &link_records)
        };
        let (mut added, mut replaced) = (0, 0);
        for edge in implicit_edges {
            // An implicit edge supersedes the declared dependency running the
            // other way between the same two nodes.
            let reverse = (edge.to().to_string(), edge.from().to_string());
            if explicit_pairs.contains(&reverse)
                && graph.remove_edge(&reverse.0, &reverse.1).is_some()
            {
                trace!(from = edge.from(), to = edge.to(); "Implicit edge replaces reverse dependency");
                replaced += 1;
            }
            if graph.add_edge(edge) {
                added += 1;
            }
        }
        debug!(implicit_edges = added, replaced; "Implicit edges added");

        info!(nodes = graph.node_count(), edges = graph.edge_count(); "Dependency graph built");
        Outcome::Complete(graph)
    }

    fn add_dependency_edges(&self, graph: &mut Graph, resource: &Resource) {
        let Some(dependent) = graph.node(&resource.id) else {
            return;
        };

        let edges: Vec<Edge> = resource
            .dependencies
            .iter()
            .filter(|dependency| **dependency != resource.id)
            .filter_map(|dependency| graph.node(dependency))
            .map(|dependency| {
                Edge::new(
                    dependency.id(),
                    dependent.id(),
                    Relationship::infer(dependency.category(), dependent.category()),
                    metadata::extract(dependent),
                )
            })
            .collect();

        for edge in edges {
            graph.add_edge(edge);
        }
    }

    fn cancelled(graph: Graph, phase: BuildPhase) -> Outcome<Graph> {
        warn!(
            phase:% = phase,
            nodes = graph.node_count(),
            edges = graph.edge_count();
            "Graph construction cancelled"
        );
        Outcome::Cancelled(graph)
    }
}
