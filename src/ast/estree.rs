//! Bridge from ESTree JSON documents into the crate's node tree.
//!
//! The external parser emits a standard ESTree `Program` with `range`
//! position information (e.g. `esparse --range`). This module converts that
//! JSON into [`Node`] values. Node kinds the pipeline inspects are mapped
//! one-to-one; binding constructs (`var`, assignments, labels) become
//! [`Node::Other`] with their children in source order so the condition
//! extractor can see `META` bindings; everything else is folded generically.

use serde_json::Value;

use crate::ast::{Literal, Node, Program, Property, Span};

/// Converts a top-level ESTree `Program` document into a [`Program`].
///
/// # Errors
///
/// Returns an error if the document is not a `Program`, or if a recognized
/// node is missing its `range` information.
pub fn program(value: &Value) -> Result<Program, String> {
    if value.get("type").and_then(Value::as_str) != Some("Program") {
        return Err("parser output is not an ESTree Program document".to_string());
    }
    let body = value
        .get("body")
        .and_then(Value::as_array)
        .ok_or_else(|| "ESTree Program has no body array".to_string())?;
    let body = body.iter().map(node).collect::<Result<Vec<_>, _>>()?;
    Ok(Program { body })
}

/// Converts a single ESTree node into a [`Node`].
///
/// # Errors
///
/// Returns an error if a recognized node kind is missing its `range`.
pub fn node(value: &Value) -> Result<Node, String> {
    let kind = value.get("type").and_then(Value::as_str).unwrap_or_default();
    match kind {
        // Statement wrappers add nothing the pipeline needs; unwrap them.
        "ExpressionStatement" => {
            let expression = value
                .get("expression")
                .ok_or_else(|| "ExpressionStatement has no expression".to_string())?;
            node(expression)
        }
        "CallExpression" => {
            let callee = value
                .get("callee")
                .ok_or_else(|| "CallExpression has no callee".to_string())?;
            Ok(Node::Call {
                callee: Box::new(node(callee)?),
                args: node_list(value.get("arguments"))?,
                span: span(value, kind)?,
            })
        }
        "MemberExpression" => {
            let object = value
                .get("object")
                .ok_or_else(|| "MemberExpression has no object".to_string())?;
            let computed = value.get("computed").and_then(Value::as_bool).unwrap_or(false);
            let property = if computed {
                String::new()
            } else {
                value
                    .get("property")
                    .and_then(|p| p.get("name"))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            Ok(Node::Member {
                object: Box::new(node(object)?),
                property,
                computed,
                span: span(value, kind)?,
            })
        }
        "Identifier" => Ok(Node::Ident {
            name: value.get("name").and_then(Value::as_str).unwrap_or_default().to_string(),
            span: span(value, kind)?,
        }),
        "Literal" => {
            let literal = match value.get("value") {
                Some(Value::String(s)) => Literal::String(s.clone()),
                Some(Value::Number(n)) => Literal::Number(n.clone()),
                Some(Value::Bool(b)) => Literal::Bool(*b),
                Some(Value::Null) => Literal::Null,
                // Regex literals carry a non-primitive value; the pipeline
                // treats them as unextractable.
                _ => return Ok(Node::Other { children: Vec::new(), span: span(value, kind)? }),
            };
            Ok(Node::Literal { value: literal, span: span(value, kind)? })
        }
        "ObjectExpression" => {
            let mut properties = Vec::new();
            if let Some(props) = value.get("properties").and_then(Value::as_array) {
                for prop in props {
                    if let Some(property) = object_property(prop)? {
                        properties.push(property);
                    }
                }
            }
            Ok(Node::Object { properties, span: span(value, kind)? })
        }
        "ArrayExpression" => {
            let mut elements = Vec::new();
            if let Some(items) = value.get("elements").and_then(Value::as_array) {
                for item in items {
                    if item.is_null() {
                        // Array holes serialize as null elements.
                        elements
                            .push(Node::Literal { value: Literal::Null, span: Span::default() });
                    } else {
                        elements.push(node(item)?);
                    }
                }
            }
            Ok(Node::Array { elements, span: span(value, kind)? })
        }
        "FunctionExpression" | "FunctionDeclaration" | "ArrowFunctionExpression" => {
            let mut params = Vec::new();
            if let Some(list) = value.get("params").and_then(Value::as_array) {
                for param in list {
                    if let Some(name) = param.get("name").and_then(Value::as_str) {
                        params.push(name.to_string());
                    }
                }
            }
            let body = match value.get("body") {
                Some(b) if b.get("type").and_then(Value::as_str) == Some("BlockStatement") => {
                    node_list(b.get("body"))?
                }
                // Arrow functions may use an expression body.
                Some(b) if b.get("type").is_some() => vec![node(b)?],
                _ => Vec::new(),
            };
            Ok(Node::Function { params, body, span: span(value, kind)? })
        }
        "ReturnStatement" => {
            let argument = match value.get("argument") {
                Some(Value::Null) | None => None,
                Some(arg) => Some(Box::new(node(arg)?)),
            };
            Ok(Node::Return { argument, span: span(value, kind)? })
        }
        "VariableDeclaration" => Ok(Node::Other {
            children: node_list(value.get("declarations"))?,
            span: span_or_default(value),
        }),
        "VariableDeclarator" => {
            let mut children = Vec::new();
            if let Some(id) = value.get("id") {
                children.push(node(id)?);
            }
            match value.get("init") {
                Some(Value::Null) | None => {}
                Some(init) => children.push(node(init)?),
            }
            Ok(Node::Other { children, span: span_or_default(value) })
        }
        "LabeledStatement" => {
            let mut children = Vec::new();
            if let Some(label) = value.get("label") {
                children.push(node(label)?);
            }
            if let Some(body) = value.get("body") {
                children.push(node(body)?);
            }
            Ok(Node::Other { children, span: span_or_default(value) })
        }
        "AssignmentExpression" => {
            let mut children = Vec::new();
            if let Some(left) = value.get("left") {
                children.push(node(left)?);
            }
            if let Some(right) = value.get("right") {
                children.push(node(right)?);
            }
            Ok(Node::Other { children, span: span_or_default(value) })
        }
        "BlockStatement" => {
            Ok(Node::Other { children: node_list(value.get("body"))?, span: span_or_default(value) })
        }
        _ => Ok(Node::Other { children: generic_children(value)?, span: span_or_default(value) }),
    }
}

/// Converts an optional JSON array of nodes, skipping nothing.
fn node_list(value: Option<&Value>) -> Result<Vec<Node>, String> {
    match value.and_then(Value::as_array) {
        Some(items) => items.iter().map(node).collect(),
        None => Ok(Vec::new()),
    }
}

/// Converts one entry of an `ObjectExpression` property list.
///
/// Spread elements, computed keys, and keys that are neither identifiers nor
/// string/number literals yield `None`.
fn object_property(value: &Value) -> Result<Option<Property>, String> {
    if value.get("type").and_then(Value::as_str) != Some("Property") {
        return Ok(None);
    }
    if value.get("computed").and_then(Value::as_bool) == Some(true) {
        return Ok(None);
    }
    let key = match value.get("key") {
        Some(k) => match (k.get("name").and_then(Value::as_str), k.get("value")) {
            (Some(name), _) => name.to_string(),
            (None, Some(Value::String(s))) => s.clone(),
            (None, Some(Value::Number(n))) => n.to_string(),
            _ => return Ok(None),
        },
        None => return Ok(None),
    };
    let Some(prop_value) = value.get("value") else {
        return Ok(None);
    };
    Ok(Some(Property { key, value: node(prop_value)? }))
}

/// Collects child nodes of an unrecognized construct. Field order follows
/// the deserialized map, which is good enough for kinds the pipeline only
/// needs to traverse through.
fn generic_children(value: &Value) -> Result<Vec<Node>, String> {
    let mut children = Vec::new();
    if let Some(map) = value.as_object() {
        for (key, field) in map {
            if matches!(key.as_str(), "type" | "range" | "loc" | "start" | "end") {
                continue;
            }
            match field {
                Value::Object(_) if field.get("type").is_some() => children.push(node(field)?),
                Value::Array(items) => {
                    for item in items {
                        if item.is_object() && item.get("type").is_some() {
                            children.push(node(item)?);
                        }
                    }
                }
                _ => {}
            }
        }
    }
    Ok(children)
}

/// Reads a node's `range` as a [`Span`], required for recognized kinds.
fn span(value: &Value, kind: &str) -> Result<Span, String> {
    range_of(value)
        .ok_or_else(|| format!("{kind} node has no range information (enable parser ranges)"))
}

/// Reads a node's `range` as a [`Span`], defaulting to an empty span.
fn span_or_default(value: &Value) -> Span {
    range_of(value).unwrap_or_default()
}

fn range_of(value: &Value) -> Option<Span> {
    let range = value.get("range")?.as_array()?;
    let start = usize::try_from(range.first()?.as_u64()?).ok()?;
    let end = usize::try_from(range.get(1)?.as_u64()?).ok()?;
    Some(Span { start, end })
}
