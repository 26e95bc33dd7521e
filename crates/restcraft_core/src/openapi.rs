//! OpenAPI document structure definitions

use crate::route::PathItem;
use crate::schema::{Components, Schema};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// OpenAPI document version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OpenApiVersion {
    #[serde(rename = "3.0.3")]
    #[default]
    V3_0_3,
}

/// API information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    /// API title
    pub title: String,
    /// API version
    pub version: String,
    /// API description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Tag definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Tag name
    pub name: String,
    /// Tag description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// OpenAPI document (root structure)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenApi {
    /// OpenAPI version
    pub openapi: OpenApiVersion,
    /// API information
    pub info: Info,
    /// Path definitions
    pub paths: BTreeMap<String, PathItem>,
    /// Components (reusable components)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
    /// Tag definitions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl OpenApi {
    /// Empty document carrying only `info`
    #[must_use]
    pub fn new(info: Info) -> Self {
        Self {
            openapi: OpenApiVersion::V3_0_3,
            info,
            paths: BTreeMap::new(),
            components: None,
            tags: None,
        }
    }

    /// Add a tag unless one with the same name is already listed.
    /// Returns whether the tag was added.
    pub fn add_tag(&mut self, name: &str) -> bool {
        let tags = self.tags.get_or_insert_with(Vec::new);
        if tags.iter().any(|t| t.name == name) {
            return false;
        }
        tags.push(Tag {
            name: name.to_string(),
            description: None,
        });
        true
    }

    /// Component schema by name
    #[must_use]
    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.components.as_ref()?.schemas.as_ref()?.get(name)
    }

    /// Number of component schemas
    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.components
            .as_ref()
            .and_then(|c| c.schemas.as_ref())
            .map_or(0, BTreeMap::len)
    }
}
