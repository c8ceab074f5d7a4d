//! Dependency graph between the modules directly under `domain`.
//!
//! Each `domain/<name>.rs` file, or `domain/<name>/` directory, is one node.
//! References through the re-exports in `domain/mod.rs`, such as
//! `crate::domain::Error`, are attributed to the module that defines the item.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use camino::{Utf8Path, Utf8PathBuf};

use crate::Violation;
use crate::references::Target;
use crate::rules::Rule;

#[derive(Debug, Default)]
pub(crate) struct DomainGraph {
    modules: BTreeSet<String>,
    /// Name re-exported from `domain/mod.rs` to the module defining it.
    reexports: BTreeMap<String, String>,
    /// Edge to first file that created it.
    edges: BTreeMap<String, BTreeMap<String, Utf8PathBuf>>,
}

impl DomainGraph {
    /// Register a domain file before any edges are linked.
    pub(crate) fn declare(&mut self, module: &[String], bindings: &[(String, Vec<String>)]) {
        match module {
            [_] => {
                for (name, path) in bindings {
                    if let [root, owner, ..] = path.as_slice() {
                        if root == "domain" {
                            self.reexports.insert(name.clone(), owner.clone());
                        }
                    }
                }
            }
            [_, owner, ..] => {
                self.modules.insert(owner.clone());
            }
            [] => {}
        }
    }

    pub(crate) fn link(&mut self, file: &Utf8Path, module: &[String], targets: &BTreeSet<Target>) {
        let Some(from) = module.get(1) else {
            return;
        };
        for target in targets {
            let Target::Internal(path) = target else {
                continue;
            };
            let Some(to) = self.owner_of(path) else {
                continue;
            };
            if to == *from {
                continue;
            }
            self.edges
                .entry(from.clone())
                .or_default()
                .entry(to)
                .or_insert_with(|| file.to_path_buf());
        }
    }

    fn owner_of(&self, path: &[String]) -> Option<String> {
        let [root, name, ..] = path else {
            return None;
        };
        if root != "domain" {
            return None;
        }
        if self.modules.contains(name) {
            return Some(name.clone());
        }
        self.reexports.get(name).cloned()
    }

    fn successors(&self, node: &str) -> impl Iterator<Item = &str> {
        self.edges
            .get(node)
            .into_iter()
            .flat_map(|targets| targets.keys().map(String::as_str))
    }

    /// One violation per distinct set of modules forming a cycle.
    pub(crate) fn cycles(&self) -> Vec<Violation> {
        let mut reported = BTreeSet::new();
        let mut found = Vec::new();
        for start in self.edges.keys() {
            let Some(cycle) = self.shortest_cycle_through(start) else {
                continue;
            };
            let members: BTreeSet<&str> = cycle.iter().map(String::as_str).collect();
            let key: Vec<String> = members.into_iter().map(str::to_owned).collect();
            if !reported.insert(key) {
                continue;
            }
            let Some(file) = cycle
                .get(1)
                .and_then(|next| self.edges.get(start)?.get(next))
            else {
                continue;
            };
            found.push(Violation {
                file: file.clone(),
                rule: Rule::DomainCycle,
                message: format!("domain modules form a cycle: {}", cycle.join(" -> ")),
            });
        }
        found
    }

    /// Breadth-first search for the shortest path from `start` back to itself.
    fn shortest_cycle_through(&self, start: &str) -> Option<Vec<String>> {
        let mut parent: BTreeMap<&str, &str> = BTreeMap::new();
        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            for next in self.successors(node) {
                if next == start {
                    let mut path = vec![node];
                    let mut cursor = node;
                    while cursor != start {
                        cursor = parent.get(cursor).copied()?;
                        path.push(cursor);
                    }
                    path.reverse();
                    path.push(start);
                    return Some(path.into_iter().map(str::to_owned).collect());
                }
                if !parent.contains_key(next) {
                    parent.insert(next, node);
                    queue.push_back(next);
                }
            }
        }
        None
    }
}
