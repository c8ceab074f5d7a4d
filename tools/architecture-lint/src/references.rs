//! Collects what a source file refers to.
//!
//! Paths are resolved against the file's module path, so `super::email::Email`
//! inside `domain/user.rs` becomes `domain::email::Email`. A path whose first
//! segment is neither a relative keyword, the backend crate nor a child module
//! declared in scope is recorded as an external crate root.

use std::collections::BTreeSet;

use camino::Utf8Path;
use syn::punctuated::Punctuated;
use syn::visit::Visit;

use crate::BACKEND_CRATE;

/// Something a file refers to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Target {
    /// A backend module path, relative to the crate root.
    Internal(Vec<String>),
    /// The first segment of a path into another crate.
    External(String),
}

/// Everything the rules need to know about one file.
#[derive(Debug, Default)]
pub(crate) struct FileScan {
    pub(crate) targets: BTreeSet<Target>,
    /// Final segment of every derived macro.
    pub(crate) derives: BTreeSet<String>,
    /// Full path of every other attribute, joined with `::`.
    pub(crate) attributes: BTreeSet<String>,
    /// Final segment of every implemented trait.
    pub(crate) trait_impls: BTreeSet<String>,
    /// `use` bindings that name backend items: local name, resolved path.
    pub(crate) bindings: Vec<(String, Vec<String>)>,
}

/// Module path of a file under `backend/src`.
///
/// `domain/mod.rs` maps to `["domain"]` and `domain/user.rs` to
/// `["domain", "user"]`.
pub(crate) fn module_path(file: &Utf8Path) -> Vec<String> {
    let mut segments: Vec<String> = file
        .with_extension("")
        .components()
        .map(|component| component.as_str().to_owned())
        .collect();
    if segments.last().is_some_and(|last| last == "mod") {
        segments.pop();
    }
    segments
}

pub(crate) fn scan_file(module: &[String], file: &syn::File) -> FileScan {
    let mut scanner = Scanner {
        module: module.to_vec(),
        children: vec![child_modules(&file.items)],
        scan: FileScan::default(),
    };
    for attr in &file.attrs {
        scanner.visit_attribute(attr);
    }
    for item in &file.items {
        scanner.visit_item(item);
    }
    scanner.scan
}

struct Scanner {
    module: Vec<String>,
    /// Child modules declared at each level of inline module nesting.
    children: Vec<BTreeSet<String>>,
    scan: FileScan,
}

impl Scanner {
    fn resolve(&self, segments: &[String]) -> Option<Target> {
        let first = segments.first()?.as_str();
        match first {
            "crate" | BACKEND_CRATE => Some(Target::Internal(segments[1..].to_vec())),
            "self" | "super" => {
                let mut base = self.module.clone();
                let mut rest = segments;
                while let Some((head, tail)) = rest.split_first() {
                    match head.as_str() {
                        "self" => {}
                        "super" => {
                            base.pop()?;
                        }
                        _ => break,
                    }
                    rest = tail;
                }
                base.extend(rest.iter().cloned());
                Some(Target::Internal(base))
            }
            name if self.declares_child(name) => {
                let mut base = self.module.clone();
                base.extend(segments.iter().cloned());
                Some(Target::Internal(base))
            }
            name => Some(Target::External(name.to_owned())),
        }
    }

    fn declares_child(&self, name: &str) -> bool {
        self.children
            .last()
            .is_some_and(|children| children.contains(name))
    }

    fn record_use(&mut self, tree: &syn::UseTree, prefix: &mut Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.record_use(&path.tree, prefix);
                prefix.pop();
            }
            syn::UseTree::Name(name) => self.bind(prefix, &name.ident, &name.ident),
            syn::UseTree::Rename(rename) => self.bind(prefix, &rename.ident, &rename.rename),
            syn::UseTree::Glob(_) => {
                if let Some(target) = self.resolve(prefix) {
                    self.scan.targets.insert(target);
                }
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.record_use(item, prefix);
                }
            }
        }
    }

    fn bind(&mut self, prefix: &[String], ident: &syn::Ident, alias: &syn::Ident) {
        let mut segments = prefix.to_vec();
        let local = if ident == "self" {
            if alias == "self" {
                prefix.last().cloned().unwrap_or_default()
            } else {
                alias.to_string()
            }
        } else {
            segments.push(ident.to_string());
            alias.to_string()
        };
        let Some(target) = self.resolve(&segments) else {
            return;
        };
        if let Target::Internal(path) = &target {
            self.scan.bindings.push((local, path.clone()));
        }
        self.scan.targets.insert(target);
    }

    fn record_derives(&mut self, attr: &syn::Attribute) {
        let Ok(paths) =
            attr.parse_args_with(Punctuated::<syn::Path, syn::Token![,]>::parse_terminated)
        else {
            return;
        };
        for path in &paths {
            if let Some(last) = path.segments.last() {
                self.scan.derives.insert(last.ident.to_string());
            }
            self.visit_path(path);
        }
    }
}

impl<'ast> Visit<'ast> for Scanner {
    fn visit_item(&mut self, item: &'ast syn::Item) {
        if is_test_only(item_attrs(item)) {
            return;
        }
        syn::visit::visit_item(self, item);
    }

    fn visit_item_mod(&mut self, node: &'ast syn::ItemMod) {
        for attr in &node.attrs {
            self.visit_attribute(attr);
        }
        let Some((_, items)) = &node.content else {
            return;
        };
        self.module.push(node.ident.to_string());
        self.children.push(child_modules(items));
        for item in items {
            self.visit_item(item);
        }
        self.children.pop();
        self.module.pop();
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.record_use(&node.tree, &mut Vec::new());
    }

    fn visit_item_impl(&mut self, node: &'ast syn::ItemImpl) {
        if let Some(last) = node
            .trait_
            .as_ref()
            .and_then(|(_, path, _)| path.segments.last())
        {
            self.scan.trait_impls.insert(last.ident.to_string());
        }
        syn::visit::visit_item_impl(self, node);
    }

    fn visit_attribute(&mut self, attr: &'ast syn::Attribute) {
        if attr.path().is_ident("derive") {
            self.record_derives(attr);
            return;
        }
        self.scan.attributes.insert(join(attr.path()));
        syn::visit::visit_attribute(self, attr);
    }

    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<String> = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        // A lone identifier is a local name or prelude item, never a crate path.
        if let Some(target) = self.resolve(&segments) {
            if segments.len() > 1 || matches!(target, Target::Internal(_)) {
                self.scan.targets.insert(target);
            }
        }
        syn::visit::visit_path(self, node);
    }
}

fn join(path: &syn::Path) -> String {
    path.segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect::<Vec<_>>()
        .join("::")
}

fn child_modules(items: &[syn::Item]) -> BTreeSet<String> {
    items
        .iter()
        .filter_map(|item| match item {
            syn::Item::Mod(module) => Some(module.ident.to_string()),
            _ => None,
        })
        .collect()
}

fn is_test_only(attrs: &[syn::Attribute]) -> bool {
    attrs.iter().any(|attr| match &attr.meta {
        syn::Meta::List(list) => list.path.is_ident("cfg") && list.tokens.to_string() == "test",
        _ => false,
    })
}

fn item_attrs(item: &syn::Item) -> &[syn::Attribute] {
    match item {
        syn::Item::Const(item) => &item.attrs,
        syn::Item::Enum(item) => &item.attrs,
        syn::Item::ExternCrate(item) => &item.attrs,
        syn::Item::Fn(item) => &item.attrs,
        syn::Item::ForeignMod(item) => &item.attrs,
        syn::Item::Impl(item) => &item.attrs,
        syn::Item::Macro(item) => &item.attrs,
        syn::Item::Mod(item) => &item.attrs,
        syn::Item::Static(item) => &item.attrs,
        syn::Item::Struct(item) => &item.attrs,
        syn::Item::Trait(item) => &item.attrs,
        syn::Item::TraitAlias(item) => &item.attrs,
        syn::Item::Type(item) => &item.attrs,
        syn::Item::Union(item) => &item.attrs,
        syn::Item::Use(item) => &item.attrs,
        _ => &[],
    }
}
