//! Per-file rules for each layer of the hexagon.

use std::fmt;

use camino::Utf8Path;

use crate::Violation;
use crate::references::{FileScan, Target};

/// Rule broken by a [`Violation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rule {
    LayerDependency,
    FrameworkCrate,
    FrameworkAttribute,
    FrameworkTrait,
    DomainCycle,
}

impl Rule {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LayerDependency => "layer-dependency",
            Self::FrameworkCrate => "framework-crate",
            Self::FrameworkAttribute => "framework-attribute",
            Self::FrameworkTrait => "framework-trait",
            Self::DomainCycle => "domain-cycle",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const HTTP_CRATES: [&str; 4] = ["actix_http", "actix_web", "utoipa", "utoipa_swagger_ui"];
const STORAGE_CRATES: [&str; 4] = ["bb8", "diesel", "diesel_async", "diesel_migrations"];
/// Crates that belong to the process host rather than to any adapter.
const HOST_CRATES: [&str; 3] = ["clap", "ortho_config", "tracing_subscriber"];

const FRAMEWORK_DERIVES: [&str; 13] = [
    "Args",
    "AsChangeset",
    "Identifiable",
    "Insertable",
    "IntoParams",
    "OrthoConfig",
    "Parser",
    "Queryable",
    "QueryableByName",
    "Selectable",
    "Subcommand",
    "ToSchema",
    "ValueEnum",
];

/// Helper and route attributes of the HTTP, storage, OpenAPI, CLI and
/// configuration crates, by first path segment.
const FRAMEWORK_ATTRIBUTES: [&str; 13] = [
    "arg",
    "command",
    "delete",
    "diesel",
    "get",
    "ortho_config",
    "param",
    "patch",
    "post",
    "put",
    "route",
    "routes",
    "schema",
];

const FRAMEWORK_TRAITS: [&str; 11] = [
    "AsChangeset",
    "FromRequest",
    "FromSql",
    "Insertable",
    "IntoParams",
    "OrthoConfig",
    "Queryable",
    "ResponseError",
    "Responder",
    "ToSchema",
    "ToSql",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Layer {
    Domain,
    Inbound,
    Outbound,
}

impl Layer {
    pub(crate) fn of(module: &[String]) -> Option<Self> {
        match module.first()?.as_str() {
            "domain" => Some(Self::Domain),
            "inbound" => Some(Self::Inbound),
            "outbound" => Some(Self::Outbound),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    fn may_reference(self, module: &str) -> bool {
        match self {
            Self::Domain => module == "domain",
            Self::Inbound => module != "outbound",
            Self::Outbound => module != "inbound",
        }
    }

    fn forbids_crate(self, name: &str) -> bool {
        match self {
            Self::Domain => {
                HTTP_CRATES.contains(&name)
                    || STORAGE_CRATES.contains(&name)
                    || HOST_CRATES.contains(&name)
            }
            Self::Inbound => STORAGE_CRATES.contains(&name),
            Self::Outbound => HTTP_CRATES.contains(&name),
        }
    }
}

pub(crate) fn check_file(file: &Utf8Path, layer: Layer, scan: &FileScan) -> Vec<Violation> {
    let violation = |rule, message: String| Violation {
        file: file.to_path_buf(),
        rule,
        message,
    };
    let mut found = Vec::new();

    for target in &scan.targets {
        match target {
            Target::Internal(path) => {
                let Some(module) = path.first() else {
                    continue;
                };
                if !layer.may_reference(module) {
                    found.push(violation(
                        Rule::LayerDependency,
                        format!("{} code must not reference crate::{module}", layer.name()),
                    ));
                }
            }
            Target::External(name) if layer.forbids_crate(name) => {
                found.push(violation(
                    Rule::FrameworkCrate,
                    format!("{} code must not use the `{name}` crate", layer.name()),
                ));
            }
            Target::External(_) => {}
        }
    }

    if layer != Layer::Domain {
        return found;
    }

    for derive in &scan.derives {
        if FRAMEWORK_DERIVES.contains(&derive.as_str()) {
            found.push(violation(
                Rule::FrameworkAttribute,
                format!("domain types must not derive `{derive}`"),
            ));
        }
    }
    for attribute in &scan.attributes {
        let root = attribute.split("::").next().unwrap_or_default();
        if FRAMEWORK_ATTRIBUTES.contains(&root) || layer.forbids_crate(root) {
            found.push(violation(
                Rule::FrameworkAttribute,
                format!("domain items must not carry #[{attribute}]"),
            ));
        }
    }
    for name in &scan.trait_impls {
        if FRAMEWORK_TRAITS.contains(&name.as_str()) {
            found.push(violation(
                Rule::FrameworkTrait,
                format!("domain types must not implement `{name}`"),
            ));
        }
    }
    found
}
