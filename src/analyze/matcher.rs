//! Structural matching of registration call sites.
//!
//! A registration call is a `define` or `require` call with exactly two
//! arguments (dependencies, factory) or three (id, dependencies, factory).
//! The callee must be the bare global identifier or, when a namespace is
//! configured, the non-computed member form `<ident>.define` /
//! `<ident>.require`. Every other callee shape is deliberately never
//! matched, which is what protects hand-written wrapper calls from
//! extraction and rewriting.

use crate::ast::{Literal, Node, Program, Span};

/// The recognized registration call names.
const REGISTRATION_NAMES: [&str; 2] = ["define", "require"];

/// Shape of a matched call's callee, driving the rewrite decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalleeForm {
    /// Bare `define(...)` / `require(...)`.
    BareGlobal,
    /// Member call whose prefix equals the configured namespace.
    NamespacedMatching,
    /// Member call with a different prefix than configured.
    NamespacedDiffering,
}

/// A matched registration call site.
#[derive(Debug, Clone)]
pub struct CallSite<'a> {
    /// Shape of the callee.
    pub form: CalleeForm,
    /// Source range of the whole callee expression.
    pub callee_span: Span,
    /// The registration name (`define` or `require`).
    pub callee_name: &'a str,
    /// The call's arguments, in order.
    pub args: &'a [Node],
}

impl<'a> CallSite<'a> {
    /// Returns `true` for the 3-argument form carrying an explicit id.
    #[must_use]
    pub fn has_id(&self) -> bool {
        self.args.len() == 3
    }

    /// Returns the explicit module identifier of a 3-argument call.
    #[must_use]
    pub fn id(&self) -> Option<&'a str> {
        if !self.has_id() {
            return None;
        }
        match self.args.first() {
            Some(Node::Literal { value: Literal::String(s), .. }) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the dependency argument node.
    #[must_use]
    pub fn dependencies(&self) -> &'a Node {
        if self.has_id() {
            &self.args[1]
        } else {
            &self.args[0]
        }
    }
}

/// Returns a lazy depth-first iterator over the registration call sites of
/// `program`, in source order.
#[must_use]
pub fn call_sites<'a>(program: &'a Program, namespace: Option<&'a str>) -> CallSites<'a> {
    CallSites { stack: program.body.iter().rev().collect(), namespace }
}

/// Iterator state for [`call_sites`].
pub struct CallSites<'a> {
    stack: Vec<&'a Node>,
    namespace: Option<&'a str>,
}

impl<'a> Iterator for CallSites<'a> {
    type Item = CallSite<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            // Preorder traversal; children are pushed reversed so the
            // leftmost child is visited first. Matched calls are descended
            // into as well; nested registrations are legal.
            let mut children = node.children();
            children.reverse();
            self.stack.extend(children);

            if let Node::Call { callee, args, .. } = node {
                if let Some(site) = match_call(callee, args, self.namespace) {
                    return Some(site);
                }
            }
        }
        None
    }
}

fn match_call<'a>(
    callee: &'a Node,
    args: &'a [Node],
    namespace: Option<&str>,
) -> Option<CallSite<'a>> {
    if !(args.len() == 2 || args.len() == 3) {
        return None;
    }
    let (form, callee_span, callee_name) = classify_callee(callee, namespace)?;
    let site = CallSite { form, callee_span, callee_name, args };
    // A 3-argument call must carry a string-literal id; anything else cannot
    // be named statically and is left alone.
    if site.has_id() && site.id().is_none() {
        return None;
    }
    Some(site)
}

fn classify_callee<'a>(
    callee: &'a Node,
    namespace: Option<&str>,
) -> Option<(CalleeForm, Span, &'a str)> {
    match callee {
        Node::Ident { name, span } if is_registration_name(name) => {
            Some((CalleeForm::BareGlobal, *span, name.as_str()))
        }
        Node::Member { object, property, computed: false, span }
            if is_registration_name(property) =>
        {
            // Member forms are only recognized when a namespace is in play.
            let namespace = namespace?;
            let Node::Ident { name: object_name, .. } = &**object else {
                return None;
            };
            let form = if object_name == namespace {
                CalleeForm::NamespacedMatching
            } else {
                CalleeForm::NamespacedDiffering
            };
            Some((form, *span, property.as_str()))
        }
        _ => None,
    }
}

fn is_registration_name(name: &str) -> bool {
    REGISTRATION_NAMES.contains(&name)
}
