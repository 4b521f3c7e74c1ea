//! Extraction of conditional-loading metadata from `META` factories.
//!
//! A module can describe when it should be loaded by binding a function to
//! the conventional identifier `META`, either by naming `META` in the
//! dependency list or parameter list of the registration call, or by binding
//! it locally inside the factory body. The first object literal returned by
//! the bound function supplies the recognized keys.

use crate::analyze::values::{extract, ExtractedValue};
use crate::ast::Node;

/// The conventional identifier that marks a condition factory.
const META_IDENT: &str = "META";

/// The metadata keys that are read from the returned object literal.
const RECOGNIZED_KEYS: [&str; 4] = ["path", "fullPath", "condition", "group"];

/// Extracts condition metadata from the arguments of a matched registration
/// call.
///
/// Returns the recognized key/value pairs in declaration order, or an empty
/// vector when no `META` binding or no qualifying `return` exists; absence
/// is not an error.
#[must_use]
pub fn extract_condition(args: &[Node], source: &str) -> Vec<(String, ExtractedValue)> {
    let Some(bound) = find_meta_binding(args) else {
        return Vec::new();
    };
    let Node::Function { body, .. } = bound else {
        return Vec::new();
    };
    let Some(object) = body.iter().find_map(first_object_return) else {
        return Vec::new();
    };
    let Node::Object { properties, .. } = object else {
        return Vec::new();
    };

    let mut values = Vec::new();
    for property in properties {
        if !RECOGNIZED_KEYS.contains(&property.key.as_str()) {
            continue;
        }
        if values.iter().any(|(key, _)| *key == property.key) {
            continue;
        }
        if let Some(value) = extract(&property.value, source) {
            values.push((property.key.clone(), value));
        }
    }
    values
}

/// Finds the function bound to `META`, searching the call arguments.
///
/// Form (a): the dependency array or the factory parameter list names `META`
/// directly, in which case the factory itself is the bound function. Form
/// (b): the first construct inside the factory body that binds `META` to a
/// function literal, depth-first, left-to-right. The first binding found
/// wins; later candidates are ignored.
fn find_meta_binding(args: &[Node]) -> Option<&Node> {
    let factory = args.iter().rev().find(|node| matches!(node, Node::Function { .. }))?;

    if let Some(Node::Array { elements, .. }) =
        args.iter().find(|node| matches!(node, Node::Array { .. }))
    {
        if elements.iter().any(is_meta_ident) {
            return Some(factory);
        }
    }
    if let Node::Function { params, .. } = factory {
        if params.iter().any(|param| param == META_IDENT) {
            return Some(factory);
        }
    }

    let Node::Function { body, .. } = factory else {
        return None;
    };
    body.iter().find_map(find_local_binding)
}

/// Depth-first search for a construct whose children bind `META` to a
/// function: an identifier child named `META` followed by a function among
/// its later siblings (covers `var META = …`, `META = …`, and `META:` label
/// forms).
fn find_local_binding(node: &Node) -> Option<&Node> {
    let children = node.children();
    if let Some(position) = children.iter().position(|child| is_meta_ident(child)) {
        for sibling in &children[position + 1..] {
            if let Some(function) = first_function(sibling) {
                return Some(function);
            }
        }
    }
    children.into_iter().find_map(find_local_binding)
}

/// Returns the first function literal in `node`'s subtree, depth-first.
fn first_function(node: &Node) -> Option<&Node> {
    if matches!(node, Node::Function { .. }) {
        return Some(node);
    }
    node.children().into_iter().find_map(first_function)
}

/// Returns the first `return <object literal>` in `node`'s subtree,
/// depth-first; non-object returns are skipped.
fn first_object_return(node: &Node) -> Option<&Node> {
    if let Node::Return { argument: Some(argument), .. } = node {
        if matches!(&**argument, Node::Object { .. }) {
            return Some(&**argument);
        }
    }
    node.children().into_iter().find_map(first_object_return)
}

fn is_meta_ident(node: &Node) -> bool {
    matches!(node, Node::Ident { name, .. } if name == META_IDENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Literal, Property, Span};

    fn string_node(value: &str) -> Node {
        Node::Literal { value: Literal::String(value.into()), span: Span::default() }
    }

    fn meta_object(pairs: &[(&str, &str)]) -> Node {
        Node::Object {
            properties: pairs
                .iter()
                .map(|(key, value)| Property { key: (*key).into(), value: string_node(value) })
                .collect(),
            span: Span::default(),
        }
    }

    fn returning_function(object: Node) -> Node {
        Node::Function {
            params: Vec::new(),
            body: vec![Node::Return { argument: Some(Box::new(object)), span: Span::default() }],
            span: Span::default(),
        }
    }

    /// `var META = function () { return {…}; }` inside the factory body.
    fn var_meta_binding(object: Node) -> Node {
        Node::Other {
            children: vec![Node::Other {
                children: vec![
                    Node::Ident { name: "META".into(), span: Span::default() },
                    returning_function(object),
                ],
                span: Span::default(),
            }],
            span: Span::default(),
        }
    }

    #[test]
    fn local_var_binding_is_found() {
        let factory = Node::Function {
            params: vec!["exports".into()],
            body: vec![var_meta_binding(meta_object(&[
                ("condition", "navigator.X"),
                ("group", "g1"),
            ]))],
            span: Span::default(),
        };
        let args = vec![
            Node::Array { elements: vec![string_node("exports")], span: Span::default() },
            factory,
        ];
        let values = extract_condition(&args, "");
        assert_eq!(
            values,
            vec![
                ("condition".into(), ExtractedValue::String("navigator.X".into())),
                ("group".into(), ExtractedValue::String("g1".into())),
            ]
        );
    }

    #[test]
    fn meta_named_in_dependency_list_searches_the_factory() {
        let factory = Node::Function {
            params: vec!["exports".into(), "META".into()],
            body: vec![var_meta_binding(meta_object(&[("condition", "navigator.X")]))],
            span: Span::default(),
        };
        let args = vec![
            Node::Array {
                elements: vec![
                    string_node("exports"),
                    Node::Ident { name: "META".into(), span: Span::default() },
                ],
                span: Span::default(),
            },
            factory,
        ];
        let values = extract_condition(&args, "");
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].0, "condition");
    }

    #[test]
    fn first_binding_wins_over_later_candidates() {
        let factory = Node::Function {
            params: Vec::new(),
            body: vec![
                var_meta_binding(meta_object(&[("group", "first")])),
                var_meta_binding(meta_object(&[("group", "second")])),
            ],
            span: Span::default(),
        };
        let args = vec![Node::Array { elements: Vec::new(), span: Span::default() }, factory];
        let values = extract_condition(&args, "");
        assert_eq!(values, vec![("group".into(), ExtractedValue::String("first".into()))]);
    }

    #[test]
    fn unrecognized_keys_are_ignored() {
        let factory = Node::Function {
            params: Vec::new(),
            body: vec![var_meta_binding(meta_object(&[
                ("condition", "navigator.X"),
                ("weight", "9"),
            ]))],
            span: Span::default(),
        };
        let args = vec![Node::Array { elements: Vec::new(), span: Span::default() }, factory];
        let values = extract_condition(&args, "");
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].0, "condition");
    }

    #[test]
    fn missing_meta_or_missing_return_yields_empty() {
        let factory =
            Node::Function { params: Vec::new(), body: Vec::new(), span: Span::default() };
        let args = vec![Node::Array { elements: Vec::new(), span: Span::default() }, factory];
        assert!(extract_condition(&args, "").is_empty());

        // META bound, but to a function that never returns an object.
        let factory = Node::Function {
            params: Vec::new(),
            body: vec![Node::Other {
                children: vec![Node::Other {
                    children: vec![
                        Node::Ident { name: "META".into(), span: Span::default() },
                        Node::Function {
                            params: Vec::new(),
                            body: Vec::new(),
                            span: Span::default(),
                        },
                    ],
                    span: Span::default(),
                }],
                span: Span::default(),
            }],
            span: Span::default(),
        };
        let args = vec![Node::Array { elements: Vec::new(), span: Span::default() }, factory];
        assert!(extract_condition(&args, "").is_empty());
    }

    #[test]
    fn condition_may_be_a_function_literal() {
        let source = "return {condition: function () { return !!window.Worker; }};";
        let function_span = {
            let start = source.find("function").unwrap();
            Span::new(start, source.rfind('}').unwrap())
        };
        let object = Node::Object {
            properties: vec![Property {
                key: "condition".into(),
                value: Node::Function {
                    params: Vec::new(),
                    body: Vec::new(),
                    span: function_span,
                },
            }],
            span: Span::default(),
        };
        let factory = Node::Function {
            params: vec!["META".into()],
            body: vec![Node::Return { argument: Some(Box::new(object)), span: Span::default() }],
            span: Span::default(),
        };
        let args = vec![Node::Array { elements: Vec::new(), span: Span::default() }, factory];
        let values = extract_condition(&args, source);
        let ExtractedValue::Code(code) = &values[0].1 else {
            panic!("expected raw code");
        };
        assert!(code.starts_with("function ()"));
    }
}
