//! Connection metadata extraction.
//!
//! A table of rules maps `(provider, type)` patterns to pure extraction
//! functions. Every matching rule contributes to the metadata of an edge, so
//! adding support for a provider means adding rows, not branches.

use std::borrow::Cow;

use cartography_core::{
    attributes,
    resource::Attributes,
};

use crate::structure::graph::{Metadata, Node, empty_metadata};

/// How a rule matches a resource type.
#[derive(Debug, Clone, Copy)]
enum TypeMatch {
    Exact(&'static str),
    Contains(&'static str),
}

impl TypeMatch {
    fn matches(self, resource_type: &str) -> bool {
        match self {
            TypeMatch::Exact(expected) => resource_type == expected,
            TypeMatch::Contains(fragment) => resource_type.contains(fragment),
        }
    }
}

struct MetadataRule {
    provider: Option<&'static str>,
    resource_type: TypeMatch,
    extract: fn(&Attributes, &mut Metadata),
}

impl MetadataRule {
    fn applies_to(&self, node: &Node) -> bool {
        self.provider.is_none_or(|provider| provider == node.provider())
            && self.resource_type.matches(node.resource_type())
    }
}

const RULES: &[MetadataRule] = &[
    MetadataRule {
        provider: Some("azure"),
        resource_type: TypeMatch::Contains("security"),
        extract: azure_security_rule,
    },
    MetadataRule {
        provider: Some("aws"),
        resource_type: TypeMatch::Exact("aws_security_group_rule"),
        extract: aws_security_group_rule,
    },
    MetadataRule {
        provider: None,
        resource_type: TypeMatch::Contains("lb_rule"),
        extract: lb_ports,
    },
    MetadataRule {
        provider: None,
        resource_type: TypeMatch::Contains("lb_listener"),
        extract: lb_ports,
    },
    MetadataRule {
        provider: Some("digitalocean"),
        resource_type: TypeMatch::Exact("digitalocean_firewall"),
        extract: digitalocean_firewall,
    },
    MetadataRule {
        provider: Some("digitalocean"),
        resource_type: TypeMatch::Exact("digitalocean_loadbalancer"),
        extract: digitalocean_loadbalancer,
    },
];

/// Extracts connection metadata declared by `node`.
///
/// Returns the shared empty map when no rule yields a value.
pub(super) fn extract(node: &Node) -> Cow<'static, Metadata> {
    let mut metadata = Metadata::new();
    for rule in RULES.iter().filter(|rule| rule.applies_to(node)) {
        (rule.extract)(node.attributes(), &mut metadata);
    }

    if metadata.is_empty() {
        empty_metadata()
    } else {
        Cow::Owned(metadata)
    }
}

/// Copies `key` from `attrs` into `metadata` as `name`, if it coerces to a string.
fn copy(attrs: &Attributes, key: &str, metadata: &mut Metadata, name: &str) {
    if let Some(value) = attributes::string(attrs, key) {
        metadata.insert(name.to_string(), value);
    }
}

fn azure_security_rule(attrs: &Attributes, metadata: &mut Metadata) {
    copy(attrs, "destination_port_range", metadata, "port");
    copy(attrs, "protocol", metadata, "protocol");
}

fn aws_security_group_rule(attrs: &Attributes, metadata: &mut Metadata) {
    copy(attrs, "from_port", metadata, "port");
    copy(attrs, "protocol", metadata, "protocol");
}

fn lb_ports(attrs: &Attributes, metadata: &mut Metadata) {
    copy(attrs, "frontend_port", metadata, "frontend_port");
    copy(attrs, "backend_port", metadata, "backend_port");
    copy(attrs, "port", metadata, "port");
}

// TODO: Aggregate every inbound and forwarding rule instead of the first one;
// needs a list-valued metadata representation on `Edge`.
fn digitalocean_firewall(attrs: &Attributes, metadata: &mut Metadata) {
    if let Some(rule) = attributes::first_block(attrs, "inbound_rule") {
        copy(rule, "port_range", metadata, "port");
        copy(rule, "protocol", metadata, "protocol");
    }
}

fn digitalocean_loadbalancer(attrs: &Attributes, metadata: &mut Metadata) {
    if let Some(rule) = attributes::first_block(attrs, "forwarding_rule") {
        copy(rule, "entry_port", metadata, "frontend_port");
        copy(rule, "target_port", metadata, "backend_port");
        copy(rule, "entry_protocol", metadata, "protocol");
    }
}
