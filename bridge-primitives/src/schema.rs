//! Parameter schema advertised to the native runtime for each tool.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias for schema construction.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors produced while building a parameter schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A property declaration failed validation.
    #[error("invalid schema property: {reason}")]
    InvalidProperty {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// A property name was declared twice.
    #[error("schema property `{name}` is already declared")]
    DuplicateProperty {
        /// Name of the offending property.
        name: String,
    },

    /// A required entry referenced an undeclared property.
    #[error("required property `{name}` is not declared")]
    UnknownRequired {
        /// Name of the missing property.
        name: String,
    },
}

/// Description of a single tool parameter.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PropertySpec {
    #[serde(rename = "type")]
    kind: String,
    description: String,
}

impl PropertySpec {
    /// Returns the JSON type name of the parameter.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// JSON-Schema-like description of a tool's input object.
///
/// Serializes to the exact wire form the native runtime expects:
/// `{"type": "object", "properties": {...}, "required": [...]}`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    #[serde(rename = "type")]
    kind: String,
    properties: BTreeMap<String, PropertySpec>,
    required: Vec<String>,
}

impl ParameterSchema {
    /// Starts building an object schema.
    #[must_use]
    pub fn object() -> ParameterSchemaBuilder {
        ParameterSchemaBuilder {
            properties: BTreeMap::new(),
            required: Vec::new(),
        }
    }

    /// Returns the JSON type of the schema root (always `object`).
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the declared properties.
    #[must_use]
    pub fn properties(&self) -> &BTreeMap<String, PropertySpec> {
        &self.properties
    }

    /// Returns the names of required properties.
    #[must_use]
    pub fn required(&self) -> &[String] {
        &self.required
    }
}

/// Builder for [`ParameterSchema`].
#[derive(Debug)]
pub struct ParameterSchemaBuilder {
    properties: BTreeMap<String, PropertySpec>,
    required: Vec<String>,
}

impl ParameterSchemaBuilder {
    /// Declares an optional property.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidProperty`] when the name or type is
    /// empty, or [`SchemaError::DuplicateProperty`] when the name was already
    /// declared.
    pub fn property(
        mut self,
        name: impl Into<String>,
        kind: impl Into<String>,
        description: impl Into<String>,
    ) -> SchemaResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SchemaError::InvalidProperty {
                reason: "property name cannot be empty".into(),
            });
        }

        let kind = kind.into();
        if kind.trim().is_empty() {
            return Err(SchemaError::InvalidProperty {
                reason: format!("property `{name}` must declare a type"),
            });
        }

        if self.properties.contains_key(&name) {
            return Err(SchemaError::DuplicateProperty { name });
        }

        self.properties.insert(
            name,
            PropertySpec {
                kind,
                description: description.into(),
            },
        );
        Ok(self)
    }

    /// Declares a property and marks it required in one step.
    ///
    /// # Errors
    ///
    /// Propagates the same errors as [`ParameterSchemaBuilder::property`].
    pub fn required_property(
        self,
        name: impl Into<String>,
        kind: impl Into<String>,
        description: impl Into<String>,
    ) -> SchemaResult<Self> {
        let name = name.into();
        let mut builder = self.property(name.clone(), kind, description)?;
        builder.required.push(name);
        Ok(builder)
    }

    /// Marks an already declared property as required.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownRequired`] when no property with the
    /// supplied name has been declared.
    pub fn require(mut self, name: impl Into<String>) -> SchemaResult<Self> {
        let name = name.into();
        if !self.properties.contains_key(&name) {
            return Err(SchemaError::UnknownRequired { name });
        }
        if !self.required.contains(&name) {
            self.required.push(name);
        }
        Ok(self)
    }

    /// Finalises the schema.
    #[must_use]
    pub fn build(self) -> ParameterSchema {
        ParameterSchema {
            kind: "object".to_owned(),
            properties: self.properties,
            required: self.required,
        }
    }
}
