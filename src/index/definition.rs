//! Declared composite indexes
//!
//! An `IndexDefinition` lists properties in physical column order; that
//! order is what the prefix/postfix decomposition runs against.
//! `IndexDefinitions` is a parsed declaration document.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::errors::{IndexError, IndexResult};
use super::property::PropertySpec;

/// A declared composite index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDefinition {
    /// Entity kind the index covers
    pub kind: String,
    /// Whether the index supports ancestor-scoped queries
    #[serde(default)]
    pub ancestor: bool,
    /// Properties in column order
    #[serde(default)]
    pub properties: Vec<PropertySpec>,
}

/// Canonical, comparable form of an index definition
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexKey {
    pub kind: String,
    pub ancestor: bool,
    pub properties: Vec<PropertySpec>,
}

impl IndexDefinition {
    pub fn new(
        kind: impl Into<String>,
        ancestor: bool,
        properties: impl IntoIterator<Item = PropertySpec>,
    ) -> Self {
        Self {
            kind: kind.into(),
            ancestor,
            properties: properties.into_iter().collect(),
        }
    }

    /// Checks structural validity of the definition.
    pub fn validate(&self) -> IndexResult<()> {
        if self.kind.is_empty() {
            return Err(IndexError::invalid_definition("Index kind must not be empty"));
        }
        if let Some(pos) = self.properties.iter().position(|p| p.name().is_empty()) {
            return Err(IndexError::invalid_definition(format!(
                "Index on '{}' has an unnamed property at position {}",
                self.kind, pos
            )));
        }
        Ok(())
    }

    /// Properties as the storage engine sees them: every ordered column
    /// carries an explicit direction (ascending when unspecified).
    pub fn key_properties(&self) -> Vec<PropertySpec> {
        self.properties
            .iter()
            .cloned()
            .map(PropertySpec::with_default_direction)
            .collect()
    }

    pub fn to_key(&self) -> IndexKey {
        IndexKey {
            kind: self.kind.clone(),
            ancestor: self.ancestor,
            properties: self.key_properties(),
        }
    }
}

/// A parsed index declaration document: `{"indexes": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDefinitions {
    #[serde(default)]
    pub indexes: Vec<IndexDefinition>,
}

impl IndexDefinitions {
    pub fn new(indexes: impl IntoIterator<Item = IndexDefinition>) -> Self {
        Self {
            indexes: indexes.into_iter().collect(),
        }
    }

    /// Parses and validates a JSON declaration document.
    pub fn parse(json: &str) -> IndexResult<Self> {
        let definitions: IndexDefinitions = serde_json::from_str(json)?;
        for definition in &definitions.indexes {
            definition.validate()?;
        }
        Ok(definitions)
    }

    /// Distinct canonical keys; duplicate declarations collapse.
    pub fn keys(&self) -> BTreeSet<IndexKey> {
        self.indexes.iter().map(IndexDefinition::to_key).collect()
    }

    /// Definitions declared for `kind`, in declaration order
    pub fn for_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a IndexDefinition> {
        self.indexes.iter().filter(move |d| d.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }
}

impl<'a> IntoIterator for &'a IndexDefinitions {
    type Item = &'a IndexDefinition;
    type IntoIter = std::slice::Iter<'a, IndexDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.indexes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexErrorCode;

    #[test]
    fn test_key_properties_default_ascending() {
        let def = IndexDefinition::new(
            "Cat",
            false,
            [
                PropertySpec::new("name"),
                PropertySpec::desc("age"),
                PropertySpec::geospatial("home"),
            ],
        );
        assert_eq!(
            def.key_properties(),
            vec![
                PropertySpec::asc("name"),
                PropertySpec::desc("age"),
                PropertySpec::geospatial("home"),
            ]
        );
    }

    #[test]
    fn test_canonical_key_fills_direction() {
        let implicit = IndexDefinition::new("Cat", false, [PropertySpec::new("name")]);
        let explicit = IndexDefinition::new("Cat", false, [PropertySpec::asc("name")]);
        let ancestor = IndexDefinition::new("Cat", true, [PropertySpec::asc("name")]);
        assert_eq!(implicit.to_key(), explicit.to_key());
        assert_ne!(explicit.to_key(), ancestor.to_key());
    }

    #[test]
    fn test_parse_document() {
        let json = r#"{
            "indexes": [
                {"kind": "Cat", "properties": [{"name": "name"}, {"name": "age", "direction": "desc"}]},
                {"kind": "Park", "ancestor": false, "properties": [{"name": "location", "mode": "geospatial"}]}
            ]
        }"#;
        let defs = IndexDefinitions::parse(json).unwrap();
        assert_eq!(defs.len(), 2);
        assert!(!defs.indexes[0].ancestor);
        assert_eq!(defs.indexes[0].properties[1], PropertySpec::desc("age"));
        assert!(defs.indexes[1].properties[0].is_geospatial());
        assert_eq!(defs.for_kind("Cat").count(), 1);
    }

    #[test]
    fn test_parse_rejects_direction_and_mode() {
        let json = r#"{"indexes": [{"kind": "Park", "properties": [
            {"name": "location", "direction": "asc", "mode": "geospatial"}
        ]}]}"#;
        let err = IndexDefinitions::parse(json).unwrap_err();
        assert_eq!(err.code(), IndexErrorCode::IdxDefinitionParse);
        assert!(err.message().contains("both a direction and a mode"));
    }

    #[test]
    fn test_parse_rejects_empty_kind() {
        let json = r#"{"indexes": [{"kind": "", "properties": [{"name": "a"}]}]}"#;
        let err = IndexDefinitions::parse(json).unwrap_err();
        assert_eq!(err.code(), IndexErrorCode::IdxDefinitionInvalid);
    }

    #[test]
    fn test_keys_deduplicate() {
        let defs = IndexDefinitions::new([
            IndexDefinition::new("Cat", false, [PropertySpec::new("name")]),
            IndexDefinition::new("Cat", false, [PropertySpec::asc("name")]),
            IndexDefinition::new("Dog", false, [PropertySpec::asc("name")]),
        ]);
        assert_eq!(defs.keys().len(), 2);
    }
}
