//! Manifest aggregation and rendering.
//!
//! Per-file module descriptors are merged, in discovery order, into one
//! ordered mapping from module name to stored attributes. Rendering emits a
//! compact JavaScript fragment; function-literal values are embedded as raw
//! code, everything else as JSON-style literals. Beautification is left to
//! external tooling.

use crate::analyze::values::ExtractedValue;

/// One discovered module registration, produced by the per-file pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDescriptor {
    /// Base name of the source file the module was found in.
    pub file: String,
    /// Canonical module name (explicit id or synthesized).
    pub name: String,
    /// The dependency list; an empty array when nothing was extractable.
    pub dependencies: ExtractedValue,
    /// Conditional-loading trigger from the `META` factory.
    pub condition: Option<ExtractedValue>,
    /// Loading group from the `META` factory.
    pub group: Option<ExtractedValue>,
    /// Explicit relative path from the `META` factory.
    pub path: Option<String>,
    /// Explicit full path from the `META` factory.
    pub full_path: Option<String>,
}

/// Attributes stored in the manifest for one module.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestEntry {
    /// The dependency list.
    pub dependencies: ExtractedValue,
    /// Conditional-loading trigger, when declared.
    pub condition: Option<ExtractedValue>,
    /// Loading group, when declared.
    pub group: Option<ExtractedValue>,
    /// Resolved relative path, unless path metadata is suppressed.
    pub path: Option<String>,
    /// Full path, overriding `path` when declared.
    pub full_path: Option<String>,
}

/// Ordered mapping from module name to its stored attributes.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    entries: Vec<(String, ManifestEntry)>,
}

impl Manifest {
    /// Creates an empty manifest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one descriptor, applying the precedence rules.
    ///
    /// `fullPath` wins over an explicit `path`, which wins over the computed
    /// `dirname(name)/file` fallback. A descriptor whose name is already
    /// present replaces the stored attributes but keeps the original entry
    /// position (JavaScript object-assignment semantics).
    pub fn insert(&mut self, descriptor: ModuleDescriptor, ignore_path: bool) {
        let ModuleDescriptor { file, name, dependencies, condition, group, path, full_path } =
            descriptor;

        let mut entry =
            ManifestEntry { dependencies, condition, group, path: None, full_path: None };
        if !ignore_path {
            if full_path.is_some() {
                entry.full_path = full_path;
            } else {
                let computed = match name.rsplit_once('/') {
                    Some((dir, _)) if !dir.is_empty() && dir != "." => format!("{dir}/{file}"),
                    _ => file,
                };
                entry.path = Some(path.unwrap_or(computed));
            }
        }

        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, stored)) => *stored = entry,
            None => self.entries.push((name, entry)),
        }
    }

    /// Returns the number of modules in the manifest.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no module has been discovered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[(String, ManifestEntry)] {
        &self.entries
    }

    /// Renders the manifest as a JavaScript object literal.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("{");
        for (index, (name, entry)) in self.entries.iter().enumerate() {
            if index > 0 {
                out.push_str(", ");
            }
            write_json_string(&mut out, name);
            out.push_str(": ");
            write_entry(&mut out, entry);
        }
        out.push('}');
        out
    }
}

/// Renders the full configuration fragment.
///
/// With a `base`, the base content is followed by an assignment to
/// `<config>.modules`; without one, a new configuration variable is
/// declared.
#[must_use]
pub fn render_config(manifest: &Manifest, config: &str, base: Option<&str>) -> String {
    match base {
        Some(base) => format!("{base}{config}.modules = {};", manifest.render()),
        None => format!("var {config} = {{modules: {}}};", manifest.render()),
    }
}

fn write_entry(out: &mut String, entry: &ManifestEntry) {
    out.push_str("{\"dependencies\": ");
    write_value(out, &entry.dependencies);
    if let Some(condition) = &entry.condition {
        out.push_str(", \"condition\": ");
        write_value(out, condition);
    }
    if let Some(group) = &entry.group {
        out.push_str(", \"group\": ");
        write_value(out, group);
    }
    if let Some(full_path) = &entry.full_path {
        out.push_str(", \"fullPath\": ");
        write_json_string(out, full_path);
    }
    if let Some(path) = &entry.path {
        out.push_str(", \"path\": ");
        write_json_string(out, path);
    }
    out.push('}');
}

fn write_value(out: &mut String, value: &ExtractedValue) {
    match value {
        ExtractedValue::Null => out.push_str("null"),
        ExtractedValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        ExtractedValue::Number(n) => out.push_str(&n.to_string()),
        ExtractedValue::String(s) => write_json_string(out, s),
        ExtractedValue::Array(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                write_value(out, item);
            }
            out.push(']');
        }
        ExtractedValue::Object(pairs) => {
            out.push('{');
            for (index, (key, item)) in pairs.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                write_json_string(out, key);
                out.push_str(": ");
                write_value(out, item);
            }
            out.push('}');
        }
        // Function literals are live code in the generated configuration.
        ExtractedValue::Code(code) => out.push_str(code),
    }
}

fn write_json_string(out: &mut String, text: &str) {
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(name: &str, file: &str) -> ModuleDescriptor {
        ModuleDescriptor {
            file: file.to_string(),
            name: name.to_string(),
            dependencies: ExtractedValue::Array(vec![ExtractedValue::String("exports".into())]),
            condition: None,
            group: None,
            path: None,
            full_path: None,
        }
    }

    #[test]
    fn stores_dependencies_and_computed_path() {
        let mut manifest = Manifest::new();
        manifest.insert(descriptor("js/address_1.es.js", "address_1.es.js"), false);

        assert_eq!(
            manifest.render(),
            r#"{"js/address_1.es.js": {"dependencies": ["exports"], "path": "js/address_1.es.js"}}"#
        );
    }

    #[test]
    fn top_level_modules_use_the_bare_file_as_path() {
        let mut manifest = Manifest::new();
        manifest.insert(descriptor("address", "address.js"), false);
        assert_eq!(
            manifest.render(),
            r#"{"address": {"dependencies": ["exports"], "path": "address.js"}}"#
        );
    }

    #[test]
    fn full_path_wins_over_explicit_and_computed_paths() {
        let mut manifest = Manifest::new();
        let module = ModuleDescriptor {
            path: Some("other/address.js".into()),
            full_path: Some("http://cdn/address.js".into()),
            ..descriptor("js/address", "address.js")
        };
        manifest.insert(module, false);

        let (_, entry) = &manifest.entries()[0];
        assert_eq!(entry.full_path.as_deref(), Some("http://cdn/address.js"));
        assert_eq!(entry.path, None);
    }

    #[test]
    fn explicit_path_overrides_the_computed_one() {
        let mut manifest = Manifest::new();
        let module = ModuleDescriptor {
            path: Some("custom/address.js".into()),
            ..descriptor("js/address", "address.js")
        };
        manifest.insert(module, false);
        assert_eq!(manifest.entries()[0].1.path.as_deref(), Some("custom/address.js"));
    }

    #[test]
    fn ignore_path_suppresses_path_metadata() {
        let mut manifest = Manifest::new();
        let module = ModuleDescriptor {
            full_path: Some("http://cdn/a.js".into()),
            ..descriptor("js/a", "a.js")
        };
        manifest.insert(module, true);
        let (_, entry) = &manifest.entries()[0];
        assert_eq!(entry.path, None);
        assert_eq!(entry.full_path, None);
    }

    #[test]
    fn condition_and_group_are_stored_when_present() {
        let mut manifest = Manifest::new();
        let module = ModuleDescriptor {
            condition: Some(ExtractedValue::String("navigator.X".into())),
            group: Some(ExtractedValue::String("g1".into())),
            ..descriptor("js/a", "a.js")
        };
        manifest.insert(module, false);
        assert_eq!(
            manifest.render(),
            r#"{"js/a": {"dependencies": ["exports"], "condition": "navigator.X", "group": "g1", "path": "js/a.js"}}"#
        );
    }

    #[test]
    fn later_module_with_same_name_replaces_the_earlier_entry_in_place() {
        let mut manifest = Manifest::new();
        manifest.insert(descriptor("js/a", "a.js"), false);
        manifest.insert(descriptor("js/b", "b.js"), false);
        let replacement = ModuleDescriptor {
            dependencies: ExtractedValue::Array(Vec::new()),
            ..descriptor("js/a", "a2.js")
        };
        manifest.insert(replacement, false);

        assert_eq!(manifest.len(), 2);
        let (name, entry) = &manifest.entries()[0];
        assert_eq!(name, "js/a");
        assert_eq!(entry.dependencies, ExtractedValue::Array(Vec::new()));
        assert_eq!(entry.path.as_deref(), Some("js/a2.js"));
    }

    #[test]
    fn function_conditions_render_as_raw_code() {
        let mut manifest = Manifest::new();
        let module = ModuleDescriptor {
            condition: Some(ExtractedValue::Code(
                "function() { return !!window.Worker; }".into(),
            )),
            ..descriptor("js/a", "a.js")
        };
        manifest.insert(module, true);
        assert_eq!(
            manifest.render(),
            r#"{"js/a": {"dependencies": ["exports"], "condition": function() { return !!window.Worker; }}}"#
        );
    }

    #[test]
    fn config_renders_as_declaration_or_base_assignment() {
        let mut manifest = Manifest::new();
        manifest.insert(descriptor("js/a", "a.js"), true);

        assert_eq!(
            render_config(&manifest, "__CONFIG__", None),
            r#"var __CONFIG__ = {modules: {"js/a": {"dependencies": ["exports"]}}};"#
        );
        assert_eq!(
            render_config(&manifest, "__CONFIG__", Some("var __CONFIG__ = {};\n")),
            "var __CONFIG__ = {};\n__CONFIG__.modules = {\"js/a\": {\"dependencies\": [\"exports\"]}};"
        );
    }
}
