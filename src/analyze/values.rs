//! Conversion of literal subtrees into plain structured values.

use crate::ast::{Literal, Node};

/// A value extracted from a source tree.
///
/// Function literals are carried as raw source text, not evaluated: they are
/// later embedded as live expressions in the generated configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedValue {
    /// The `null` value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(serde_json::Number),
    /// A string.
    String(String),
    /// An ordered sequence of values.
    Array(Vec<ExtractedValue>),
    /// An ordered mapping of property name to value.
    Object(Vec<(String, ExtractedValue)>),
    /// Verbatim source text of a function literal.
    Code(String),
}

impl ExtractedValue {
    /// Returns the string content when the value is a plain string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ExtractedValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Extracts a plain value from `node`, or `None` when the node kind carries
/// no extractable value.
///
/// Object properties whose values are unextractable are omitted; array
/// elements that are unextractable become [`ExtractedValue::Null`] so element
/// positions survive serialization.
#[must_use]
pub fn extract(node: &Node, source: &str) -> Option<ExtractedValue> {
    match node {
        Node::Literal { value, .. } => Some(match value {
            Literal::String(s) => ExtractedValue::String(s.clone()),
            Literal::Number(n) => ExtractedValue::Number(n.clone()),
            Literal::Bool(b) => ExtractedValue::Bool(*b),
            Literal::Null => ExtractedValue::Null,
        }),
        Node::Object { properties, .. } => {
            let mut pairs = Vec::with_capacity(properties.len());
            for property in properties {
                if let Some(value) = extract(&property.value, source) {
                    pairs.push((property.key.clone(), value));
                }
            }
            Some(ExtractedValue::Object(pairs))
        }
        Node::Array { elements, .. } => Some(ExtractedValue::Array(
            elements
                .iter()
                .map(|element| extract(element, source).unwrap_or(ExtractedValue::Null))
                .collect(),
        )),
        Node::Function { span, .. } => source
            .get(span.start..span.end)
            .map(|text| ExtractedValue::Code(text.to_string())),
        _ => None,
    }
}
