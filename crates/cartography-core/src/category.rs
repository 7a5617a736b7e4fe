//! Visual classification of infrastructure resources.
//!
//! Every node in a diagram carries a [`Category`], resolved from its provider
//! and resource type through static lookup tables. The tables are built once
//! on first use and are read-only afterwards.

use std::{collections::HashMap, fmt, str::FromStr, sync::OnceLock};

use log::trace;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Visual category of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    Network,
    Security,
    Compute,
    LoadBalancer,
    Storage,
    Database,
    #[serde(rename = "DNS")]
    Dns,
    Certificate,
    Secret,
    Container,
    #[serde(rename = "CDN")]
    Cdn,
    #[default]
    Unknown,
}

impl Category {
    /// All categories, in declaration order.
    pub const ALL: [Category; 12] = [
        Category::Network,
        Category::Security,
        Category::Compute,
        Category::LoadBalancer,
        Category::Storage,
        Category::Database,
        Category::Dns,
        Category::Certificate,
        Category::Secret,
        Category::Container,
        Category::Cdn,
        Category::Unknown,
    ];

    /// Ordering weight used when seeding node order within a layer.
    ///
    /// Foundation resources (network, security) sort first; unknown types
    /// always sort last.
    pub fn priority(self) -> u8 {
        match self {
            Category::Network => 1,
            Category::Security => 2,
            Category::Dns => 3,
            Category::Certificate => 4,
            Category::LoadBalancer => 5,
            Category::Compute => 6,
            Category::Container => 7,
            Category::Database => 8,
            Category::Storage => 9,
            Category::Cdn => 10,
            Category::Secret => 11,
            Category::Unknown => 99,
        }
    }

    /// Returns true for categories that make up the infrastructure foundation.
    pub fn is_foundation(self) -> bool {
        matches!(self, Category::Network | Category::Security)
    }

    /// Canonical display name of the category.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Network => "Network",
            Category::Security => "Security",
            Category::Compute => "Compute",
            Category::LoadBalancer => "LoadBalancer",
            Category::Storage => "Storage",
            Category::Database => "Database",
            Category::Dns => "DNS",
            Category::Certificate => "Certificate",
            Category::Secret => "Secret",
            Category::Container => "Container",
            Category::Cdn => "CDN",
            Category::Unknown => "Unknown",
        }
    }

    /// Resolves the category of a resource type.
    ///
    /// The `(provider, type)` pair is looked up first. Provider names are not
    /// always normalized upstream, so a miss falls back to a lookup by type
    /// alone. Unmatched types resolve to [`Category::Unknown`].
    pub fn resolve(provider: &str, resource_type: &str) -> Self {
        if let Some(category) = category_table()
            .get(provider)
            .and_then(|table| table.get(resource_type))
        {
            return *category;
        }
        if let Some(category) = category_by_type().get(resource_type) {
            return *category;
        }
        trace!(provider, resource_type; "Unmapped resource type");
        Category::Unknown
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category `{0}`")]
pub struct ParseCategoryError(String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

const AZURE: &[(&str, Category)] = &[
    ("azurerm_virtual_network", Category::Network),
    ("azurerm_subnet", Category::Network),
    ("azurerm_public_ip", Category::Network),
    ("azurerm_network_interface", Category::Network),
    ("azurerm_network_security_group", Category::Security),
    ("azurerm_network_security_rule", Category::Security),
    ("azurerm_virtual_machine", Category::Compute),
    ("azurerm_linux_virtual_machine", Category::Compute),
    ("azurerm_windows_virtual_machine", Category::Compute),
    ("azurerm_lb", Category::LoadBalancer),
    ("azurerm_lb_backend_address_pool", Category::LoadBalancer),
    ("azurerm_lb_rule", Category::LoadBalancer),
    ("azurerm_lb_probe", Category::LoadBalancer),
    ("azurerm_storage_account", Category::Storage),
    ("azurerm_managed_disk", Category::Storage),
    ("azurerm_sql_server", Category::Database),
    ("azurerm_sql_database", Category::Database),
    ("azurerm_dns_zone", Category::Dns),
    ("azurerm_key_vault", Category::Secret),
    ("azurerm_key_vault_certificate", Category::Certificate),
    ("azurerm_key_vault_key", Category::Secret),
    ("azurerm_key_vault_secret", Category::Secret),
    ("azurerm_container_registry", Category::Container),
    ("azurerm_cdn_profile", Category::Cdn),
];

const AWS: &[(&str, Category)] = &[
    ("aws_vpc", Category::Network),
    ("aws_subnet", Category::Network),
    ("aws_internet_gateway", Category::Network),
    ("aws_route_table", Category::Network),
    ("aws_security_group", Category::Security),
    ("aws_security_group_rule", Category::Security),
    ("aws_network_acl", Category::Security),
    ("aws_instance", Category::Compute),
    ("aws_launch_template", Category::Compute),
    ("aws_lb", Category::LoadBalancer),
    ("aws_alb", Category::LoadBalancer),
    ("aws_lb_target_group", Category::LoadBalancer),
    ("aws_lb_listener", Category::LoadBalancer),
    ("aws_s3_bucket", Category::Storage),
    ("aws_ebs_volume", Category::Storage),
    ("aws_db_instance", Category::Database),
    ("aws_dynamodb_table", Category::Database),
    ("aws_route53_zone", Category::Dns),
    ("aws_route53_record", Category::Dns),
    ("aws_acm_certificate", Category::Certificate),
    ("aws_acm_certificate_validation", Category::Certificate),
    ("aws_iam_server_certificate", Category::Certificate),
    ("aws_secretsmanager_secret", Category::Secret),
    ("aws_secretsmanager_secret_version", Category::Secret),
    ("aws_kms_key", Category::Secret),
    ("aws_kms_alias", Category::Secret),
    ("aws_ecr_repository", Category::Container),
    ("aws_ecs_cluster", Category::Container),
    ("aws_cloudfront_distribution", Category::Cdn),
];

const DIGITALOCEAN: &[(&str, Category)] = &[
    ("digitalocean_vpc", Category::Network),
    ("digitalocean_firewall", Category::Security),
    ("digitalocean_droplet", Category::Compute),
    ("digitalocean_kubernetes_cluster", Category::Compute),
    ("digitalocean_app", Category::Compute),
    ("digitalocean_loadbalancer", Category::LoadBalancer),
    ("digitalocean_spaces_bucket", Category::Storage),
    ("digitalocean_volume", Category::Storage),
    ("digitalocean_database_cluster", Category::Database),
    ("digitalocean_database_db", Category::Database),
    ("digitalocean_database_replica", Category::Database),
    ("digitalocean_domain", Category::Dns),
    ("digitalocean_record", Category::Dns),
    ("digitalocean_certificate", Category::Certificate),
    ("digitalocean_cdn", Category::Cdn),
    ("digitalocean_container_registry", Category::Container),
];

const GOOGLE: &[(&str, Category)] = &[
    ("google_compute_network", Category::Network),
    ("google_compute_subnetwork", Category::Network),
    ("google_compute_firewall", Category::Security),
    ("google_compute_instance", Category::Compute),
    ("google_compute_forwarding_rule", Category::LoadBalancer),
    ("google_compute_backend_service", Category::LoadBalancer),
    ("google_storage_bucket", Category::Storage),
    ("google_sql_database_instance", Category::Database),
    ("google_dns_managed_zone", Category::Dns),
    ("google_secret_manager_secret", Category::Secret),
    ("google_container_cluster", Category::Container),
];

const PROVIDERS: &[(&str, &[(&str, Category)])] = &[
    ("azure", AZURE),
    ("aws", AWS),
    ("digitalocean", DIGITALOCEAN),
    ("google", GOOGLE),
];

type TypeTable = HashMap<&'static str, Category>;

static CATEGORY_TABLE: OnceLock<HashMap<&'static str, TypeTable>> = OnceLock::new();

static CATEGORY_BY_TYPE: OnceLock<TypeTable> = OnceLock::new();

/// Per-provider type tables.
fn category_table() -> &'static HashMap<&'static str, TypeTable> {
    CATEGORY_TABLE.get_or_init(|| {
        PROVIDERS
            .iter()
            .map(|(provider, table)| (*provider, table.iter().copied().collect()))
            .collect()
    })
}

/// Every provider's types merged into one table.
fn category_by_type() -> &'static TypeTable {
    CATEGORY_BY_TYPE.get_or_init(|| {
        PROVIDERS
            .iter()
            .flat_map(|(_, table)| table.iter().copied())
            .collect()
    })
}
