use std::fmt;

use serde::Serialize;

use cartography_core::category::Category;

/// Semantic label of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    Protects,
    Filters,
    RoutesTo,
    Contains,
    UsesStorage,
    ConnectsToDb,
    DependsOn,
}

impl Relationship {
    /// Infers the relationship between two categories.
    ///
    /// Specific pairs take precedence over the catch-all network rule, and
    /// anything unmatched is a plain dependency.
    pub fn infer(from: Category, to: Category) -> Self {
        match (from, to) {
            (Category::Security, Category::Compute) => Relationship::Protects,
            (Category::Security, Category::LoadBalancer) => Relationship::Filters,
            (Category::LoadBalancer, Category::Compute) => Relationship::RoutesTo,
            (Category::Network, _) => Relationship::Contains,
            (Category::Compute, Category::Storage) => Relationship::UsesStorage,
            (Category::Compute, Category::Database) => Relationship::ConnectsToDb,
            _ => Relationship::DependsOn,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Relationship::Protects => "protects",
            Relationship::Filters => "filters",
            Relationship::RoutesTo => "routes_to",
            Relationship::Contains => "contains",
            Relationship::UsesStorage => "uses_storage",
            Relationship::ConnectsToDb => "connects_to_db",
            Relationship::DependsOn => "depends_on",
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_relationship() {
        let cases = [
            (Category::Security, Category::Compute, Relationship::Protects),
            (Category::Security, Category::LoadBalancer, Relationship::Filters),
            (Category::LoadBalancer, Category::Compute, Relationship::RoutesTo),
            (Category::Network, Category::Compute, Relationship::Contains),
            (Category::Network, Category::Network, Relationship::Contains),
            (Category::Compute, Category::Storage, Relationship::UsesStorage),
            (Category::Compute, Category::Database, Relationship::ConnectsToDb),
            (Category::Compute, Category::Security, Relationship::DependsOn),
            (Category::Unknown, Category::Unknown, Relationship::DependsOn),
        ];

        for (from, to, expected) in cases {
            assert_eq!(Relationship::infer(from, to), expected, "{from} -> {to}");
        }
    }

    #[test]
    fn test_display_matches_serialized_name() {
        for relationship in [
            Relationship::Protects,
            Relationship::RoutesTo,
            Relationship::UsesStorage,
            Relationship::ConnectsToDb,
        ] {
            let json = serde_json::to_string(&relationship).unwrap();
            assert_eq!(json, format!("\"{relationship}\""));
        }
    }
}
