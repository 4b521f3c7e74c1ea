//! Idempotent source rewriting through byte-span edits.
//!
//! Rewrites never reprint the tree: they splice replacement text into the
//! original source at node spans, so formatting outside the touched ranges
//! survives byte-for-byte. A file that already carries explicit ids and the
//! configured namespace produces zero edits, which is what makes re-running
//! the pipeline a no-op.

use crate::analyze::matcher::{CalleeForm, CallSite};
use crate::ast::Span;

/// A single text replacement; an insertion is an empty span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// The byte range to replace.
    pub span: Span,
    /// The replacement text.
    pub text: String,
}

/// Plans the insertion of a synthesized module id as the new first argument
/// of a 2-argument call. Returns `None` for calls that already carry an id.
#[must_use]
pub fn id_insertion(site: &CallSite<'_>, name: &str) -> Option<Edit> {
    if site.has_id() {
        return None;
    }
    let first = site.args.first()?;
    let position = first.span().start;
    let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
    Some(Edit { span: Span::new(position, position), text: format!("'{escaped}', ") })
}

/// Plans the namespace rewrite of a call site's callee.
///
/// Bare callees and callees namespaced with a different prefix are replaced
/// by `<namespace>.<callee>`; a callee already carrying the configured
/// namespace is left untouched.
#[must_use]
pub fn namespace_edit(site: &CallSite<'_>, namespace: Option<&str>) -> Option<Edit> {
    let namespace = namespace?;
    match site.form {
        CalleeForm::BareGlobal | CalleeForm::NamespacedDiffering => Some(Edit {
            span: site.callee_span,
            text: format!("{namespace}.{}", site.callee_name),
        }),
        CalleeForm::NamespacedMatching => None,
    }
}

/// Applies `edits` to `source`, back to front so earlier spans stay valid.
///
/// # Errors
///
/// Returns an error when edits overlap or fall outside the source text;
/// both indicate a parser span contract violation.
pub fn apply(source: &str, edits: &[Edit]) -> Result<String, String> {
    let mut ordered: Vec<&Edit> = edits.iter().collect();
    ordered.sort_by_key(|edit| (edit.span.start, edit.span.end));

    let mut previous_end = 0;
    for edit in &ordered {
        let Span { start, end } = edit.span;
        if start > end || end > source.len() {
            return Err(format!("edit span {start}..{end} is outside the source text"));
        }
        if !source.is_char_boundary(start) || !source.is_char_boundary(end) {
            return Err(format!("edit span {start}..{end} splits a character"));
        }
        if start < previous_end {
            return Err(format!("edit span {start}..{end} overlaps a previous edit"));
        }
        previous_end = end;
    }

    let mut output = source.to_string();
    for edit in ordered.iter().rev() {
        output.replace_range(edit.span.start..edit.span.end, &edit.text);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Literal, Node};

    fn sp(source: &str, fragment: &str) -> Span {
        let start = source.find(fragment).expect("fragment not in source");
        Span::new(start, start + fragment.len())
    }

    /// Builds the argument nodes for `define(['exports'], function() {})`
    /// with spans taken from `source`.
    fn two_arg_nodes(source: &str) -> Vec<Node> {
        vec![
            Node::Array {
                elements: vec![Node::Literal {
                    value: Literal::String("exports".into()),
                    span: sp(source, "'exports'"),
                }],
                span: sp(source, "['exports']"),
            },
            Node::Function {
                params: Vec::new(),
                body: Vec::new(),
                span: sp(source, "function() {}"),
            },
        ]
    }

    fn site<'a>(source: &str, form: CalleeForm, callee: &str, args: &'a [Node]) -> CallSite<'a> {
        CallSite {
            form,
            callee_span: sp(source, callee),
            callee_name: "define",
            args,
        }
    }

    #[test]
    fn inserts_the_synthesized_id_before_the_first_argument() {
        let source = "define(['exports'], function() {});\n";
        let args = two_arg_nodes(source);
        let call_site = site(source, CalleeForm::BareGlobal, "define", &args);

        let edit = id_insertion(&call_site, "js/a").unwrap();
        let rewritten = apply(source, &[edit]).unwrap();
        assert_eq!(rewritten, "define('js/a', ['exports'], function() {});\n");
    }

    #[test]
    fn id_and_namespace_edits_compose() {
        let source = "define(['exports'], function() {});\n";
        let args = two_arg_nodes(source);
        let call_site = site(source, CalleeForm::BareGlobal, "define", &args);

        let edits = vec![
            id_insertion(&call_site, "js/a").unwrap(),
            namespace_edit(&call_site, Some("NS")).unwrap(),
        ];
        let rewritten = apply(source, &edits).unwrap();
        assert_eq!(rewritten, "NS.define('js/a', ['exports'], function() {});\n");
    }

    #[test]
    fn differing_namespace_prefix_is_replaced() {
        let source = "Old.define('js/a', ['exports'], function() {});\n";
        let args = vec![
            Node::Literal {
                value: Literal::String("js/a".into()),
                span: sp(source, "'js/a'"),
            },
            Node::Array { elements: Vec::new(), span: sp(source, "['exports']") },
            Node::Function {
                params: Vec::new(),
                body: Vec::new(),
                span: sp(source, "function() {}"),
            },
        ];
        let call_site = site(source, CalleeForm::NamespacedDiffering, "Old.define", &args);

        assert!(id_insertion(&call_site, "ignored").is_none());
        let edit = namespace_edit(&call_site, Some("NS")).unwrap();
        let rewritten = apply(source, &[edit]).unwrap();
        assert_eq!(rewritten, "NS.define('js/a', ['exports'], function() {});\n");
    }

    #[test]
    fn matching_namespace_plans_no_edit() {
        let source = "NS.define('js/a', [], function() {});\n";
        let args = vec![
            Node::Literal {
                value: Literal::String("js/a".into()),
                span: sp(source, "'js/a'"),
            },
            Node::Array { elements: Vec::new(), span: sp(source, "[]") },
            Node::Function {
                params: Vec::new(),
                body: Vec::new(),
                span: sp(source, "function() {}"),
            },
        ];
        let call_site = site(source, CalleeForm::NamespacedMatching, "NS.define", &args);

        assert!(namespace_edit(&call_site, Some("NS")).is_none());
        assert!(id_insertion(&call_site, "ignored").is_none());
    }

    #[test]
    fn quotes_in_synthesized_names_are_escaped() {
        let source = "define([], function() {});";
        let args = vec![
            Node::Array { elements: Vec::new(), span: sp(source, "[]") },
            Node::Function {
                params: Vec::new(),
                body: Vec::new(),
                span: sp(source, "function() {}"),
            },
        ];
        let call_site = site(source, CalleeForm::BareGlobal, "define", &args);
        let edit = id_insertion(&call_site, "it's").unwrap();
        assert_eq!(edit.text, "'it\\'s', ");
    }

    #[test]
    fn out_of_bounds_and_overlapping_edits_are_rejected() {
        let source = "define";
        let oob = Edit { span: Span::new(3, 99), text: String::new() };
        assert!(apply(source, &[oob]).is_err());

        let first = Edit { span: Span::new(0, 4), text: "x".into() };
        let second = Edit { span: Span::new(2, 6), text: "y".into() };
        assert!(apply(source, &[first, second]).is_err());
    }
}
