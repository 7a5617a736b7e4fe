//! Implicit connection detection.
//!
//! Some relationships are never declared as dependencies but can be read from
//! attribute cross-references: a firewall listing droplet IDs, an instance
//! listing security groups, or an association record linking two resources.
//! Detection resolves those references through an [`AttributeIndex`] built
//! once per graph.

use std::collections::HashMap;

use log::trace;
use serde_json::Value;

use cartography_core::{
    attributes,
    resource::{Attributes, Resource},
};

use crate::structure::{
    Relationship,
    graph::{Edge, Graph, Node},
    metadata,
};

/// Attribute keys whose values identify a resource.
const IDENTITY_KEYS: &[&str] = &["id", "arn"];

/// Index of `(attribute key, string value)` pairs to the node that carries them.
///
/// When several nodes carry the same pair, the first one in graph order wins.
#[derive(Debug, Default)]
pub(super) struct AttributeIndex<'g> {
    entries: HashMap<&'g str, HashMap<&'g str, &'g str>>,
}

impl<'g> AttributeIndex<'g> {
    /// Builds the index over the string-valued attributes of every node.
    pub(super) fn build(graph: &'g Graph) -> Self {
        let mut entries: HashMap<&'g str, HashMap<&'g str, &'g str>> = HashMap::new();
        for node in graph.nodes() {
            for (key, value) in node.attributes() {
                if let Value::String(value) = value {
                    entries
                        .entry(key.as_str())
                        .or_default()
                        .entry(value.as_str())
                        .or_insert(node.id());
                }
            }
        }
        Self { entries }
    }

    /// Returns the ID of the node whose `key` attribute equals `value`.
    pub(super) fn lookup(&self, key: &str, value: &str) -> Option<&'g str> {
        self.entries.get(key)?.get(value).copied()
    }

    /// Returns the number of indexed `(key, value)` pairs.
    pub(super) fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }
}

/// Resolves resource references against an index and the graph's node IDs.
struct Resolver<'a, 'g> {
    graph: &'g Graph,
    index: &'a AttributeIndex<'g>,
}

impl<'g> Resolver<'_, 'g> {
    /// Resolves a reference by identity attribute, falling back to node IDs.
    fn resolve(&self, reference: &str) -> Option<&'g str> {
        if reference.is_empty() {
            return None;
        }
        IDENTITY_KEYS
            .iter()
            .find_map(|key| self.index.lookup(key, reference))
            .or_else(|| self.graph.node(reference).map(Node::id))
    }

    fn resolve_all(&self, attrs: &Attributes, key: &str) -> Vec<&'g str> {
        attributes::string_list(attrs, key)
            .unwrap_or_default()
            .iter()
            .filter_map(|reference| self.resolve(reference))
            .collect()
    }

    fn resolve_one(&self, attrs: &Attributes, key: &str) -> Option<&'g str> {
        self.resolve(&attributes::string(attrs, key)?)
    }
}

/// The resource an implicit rule inspects: a graph node or a link record.
struct Subject<'a> {
    id: &'a str,
    provider: &'a str,
    resource_type: &'a str,
    attributes: &'a Attributes,
}

impl<'a> From<&'a Node> for Subject<'a> {
    fn from(node: &'a Node) -> Self {
        Self {
            id: node.id(),
            provider: node.provider(),
            resource_type: node.resource_type(),
            attributes: node.attributes(),
        }
    }
}

impl<'a> From<&'a Resource> for Subject<'a> {
    fn from(resource: &'a Resource) -> Self {
        Self {
            id: &resource.id,
            provider: &resource.provider,
            resource_type: &resource.resource_type,
            attributes: &resource.attributes,
        }
    }
}

type Link<'g> = (&'g str, &'g str);

struct ImplicitRule {
    provider: &'static str,
    resource_type: &'static str,
    relationship: Relationship,
    detect: for<'g> fn(&Subject<'g>, &Resolver<'_, 'g>) -> Vec<Link<'g>>,
}

const RULES: &[ImplicitRule] = &[
    ImplicitRule {
        provider: "azure",
        resource_type: "azurerm_subnet_network_security_group_association",
        relationship: Relationship::Protects,
        detect: subnet_security_group,
    },
    ImplicitRule {
        provider: "azure",
        resource_type: "azurerm_network_interface_security_group_association",
        relationship: Relationship::Protects,
        detect: interface_security_group,
    },
    ImplicitRule {
        provider: "aws",
        resource_type: "aws_instance",
        relationship: Relationship::Protects,
        detect: instance_security_groups,
    },
    ImplicitRule {
        provider: "aws",
        resource_type: "aws_lb_target_group_attachment",
        relationship: Relationship::RoutesTo,
        detect: target_group_attachment,
    },
    ImplicitRule {
        provider: "digitalocean",
        resource_type: "digitalocean_firewall",
        relationship: Relationship::Protects,
        detect: outgoing_droplets,
    },
    ImplicitRule {
        provider: "digitalocean",
        resource_type: "digitalocean_loadbalancer",
        relationship: Relationship::RoutesTo,
        detect: outgoing_droplets,
    },
];

fn subnet_security_group<'g>(subject: &Subject<'g>, resolver: &Resolver<'_, 'g>) -> Vec<Link<'g>> {
    associate(subject, resolver, "network_security_group_id", "subnet_id")
}

fn interface_security_group<'g>(
    subject: &Subject<'g>,
    resolver: &Resolver<'_, 'g>,
) -> Vec<Link<'g>> {
    associate(subject, resolver, "network_security_group_id", "network_interface_id")
}

fn target_group_attachment<'g>(
    subject: &Subject<'g>,
    resolver: &Resolver<'_, 'g>,
) -> Vec<Link<'g>> {
    associate(subject, resolver, "target_group_arn", "target_id")
}

/// Links every security group the instance lists to the instance.
fn instance_security_groups<'g>(
    subject: &Subject<'g>,
    resolver: &Resolver<'_, 'g>,
) -> Vec<Link<'g>> {
    resolver
        .resolve_all(subject.attributes, "vpc_security_group_ids")
        .into_iter()
        .map(|group| (group, subject.id))
        .collect()
}

/// Links the resource referenced by `from_key` to the one referenced by `to_key`.
fn associate<'g>(
    subject: &Subject<'_>,
    resolver: &Resolver<'_, 'g>,
    from_key: &str,
    to_key: &str,
) -> Vec<Link<'g>> {
    match (
        resolver.resolve_one(subject.attributes, from_key),
        resolver.resolve_one(subject.attributes, to_key),
    ) {
        (Some(from), Some(to)) => vec![(from, to)],
        _ => Vec::new(),
    }
}

/// Links the subject to every droplet it lists in `droplet_ids`.
fn outgoing_droplets<'g>(subject: &Subject<'g>, resolver: &Resolver<'_, 'g>) -> Vec<Link<'g>> {
    resolver
        .resolve_all(subject.attributes, "droplet_ids")
        .into_iter()
        .map(|droplet| (subject.id, droplet))
        .collect()
}

/// Detects implicit edges among the nodes of `graph`.
///
/// `link_records` are association and attachment resources that are not
/// diagram nodes themselves but still describe connections. Each returned
/// edge carries the metadata its source node declares.
pub(super) fn detect(
    graph: &Graph,
    index: &AttributeIndex<'_>,
    link_records: &[&Resource],
) -> Vec<Edge> {
    let resolver = Resolver { graph, index };
    let subjects = graph
        .nodes()
        .map(Subject::from)
        .chain(link_records.iter().map(|record| Subject::from(*record)));

    let mut edges = Vec::new();
    for subject in subjects {
        for rule in RULES.iter().filter(|rule| {
            rule.provider == subject.provider && rule.resource_type == subject.resource_type
        }) {
            for (from, to) in (rule.detect)(&subject, &resolver) {
                if from == to {
                    continue;
                }
                let Some(source) = graph.node(from) else {
                    continue;
                };
                trace!(from, to, relationship:% = rule.relationship; "Implicit connection");
                edges.push(Edge::new(
                    from,
                    to,
                    rule.relationship,
                    metadata::extract(source),
                ));
            }
        }
    }
    edges
}
