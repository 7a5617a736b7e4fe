//! Cartography Core Types and Definitions
//!
//! This crate provides the foundational types shared by the diagram pipeline.
//! It includes:
//!
//! - **Resources**: Deserializable infrastructure resource records ([`resource::Resource`])
//! - **Attributes**: Lenient accessors for untyped attribute maps ([`attributes`] module)
//! - **Categories**: Visual classification of resource types ([`category::Category`])
//! - **Colors**: Category palette with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)

pub mod attributes;
pub mod category;
pub mod color;
pub mod geometry;
pub mod resource;
