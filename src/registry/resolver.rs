//! Registry dependency resolution.
//!
//! Starting from the requested names, walks `registryDependencies`
//! breadth-first and returns every reachable item exactly once, in the
//! order it was discovered.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use crate::error::Result;
use crate::registry::client::Catalog;
use crate::registry::schema::{CssVars, RegistryItem};
use crate::registry::source::is_remote_name;

/// Name of the base item every project starts from.
pub const INDEX_ITEM: &str = "index";

/// An item in a resolved set, with how it was reached.
#[derive(Debug, Clone)]
pub struct ResolvedItem {
    pub item: Arc<RegistryItem>,
    /// Reached through a namespace, URL, or local path.
    pub remote: bool,
}

/// The dependency closure of a request.
#[derive(Debug, Clone, Default)]
pub struct ResolvedSet {
    items: Vec<ResolvedItem>,
}

impl ResolvedSet {
    pub fn items(&self) -> &[ResolvedItem] {
        &self.items
    }

    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(|r| r.item.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Union of every member's runtime packages.
    pub fn dependencies(&self) -> DependencySet {
        self.items
            .iter()
            .flat_map(|r| r.item.dependencies.iter().cloned())
            .collect()
    }

    /// Development packages of every member, deduplicated the same way.
    pub fn dev_dependencies(&self) -> DependencySet {
        self.items
            .iter()
            .flat_map(|r| r.item.dev_dependencies.iter().cloned())
            .collect()
    }

    /// Theme variables of every member; later members win per key.
    pub fn css_vars(&self) -> CssVars {
        let mut merged = CssVars::default();
        for r in &self.items {
            merged.merge(&r.item.css_vars);
        }
        merged
    }
}

/// Insertion-ordered set of package specifiers, unique by package name.
///
/// `clsx` and `clsx@2` count as the same package; the first one seen wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    packages: Vec<String>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package; returns false when it was already present.
    pub fn insert(&mut self, spec: impl Into<String>) -> bool {
        let spec = spec.into();
        let name = package_name(&spec);
        if self.packages.iter().any(|p| package_name(p) == name) {
            return false;
        }
        self.packages.push(spec);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.packages.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.packages
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for DependencySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for spec in iter {
            set.insert(spec);
        }
        set
    }
}

/// Package name of a specifier: `@scope/pkg@1` → `@scope/pkg`, `pkg@^2` → `pkg`.
pub fn package_name(spec: &str) -> &str {
    match spec.rfind('@') {
        Some(i) if i > 0 => &spec[..i],
        _ => spec,
    }
}

/// Resolve `requested` and everything it transitively depends on.
///
/// Each name is fetched at most once. The first fetch error aborts the
/// whole resolution.
pub fn resolve(requested: &[String], style: &str, catalog: &dyn Catalog) -> Result<ResolvedSet> {
    let mut queue: VecDeque<String> = VecDeque::new();
    let mut seen: HashSet<String> = HashSet::new();

    let (index, rest): (Vec<&String>, Vec<&String>) =
        requested.iter().partition(|n| n.as_str() == INDEX_ITEM);
    for name in index.into_iter().chain(rest) {
        if seen.insert(name.clone()) {
            queue.push_back(name.clone());
        }
    }

    let mut appended: HashSet<String> = HashSet::new();
    let mut items = Vec::new();

    while let Some(name) = queue.pop_front() {
        tracing::debug!("Resolving {}", name);
        let item = catalog.fetch_item(&name, style)?;

        for dep in &item.registry_dependencies {
            if seen.insert(dep.clone()) {
                queue.push_back(dep.clone());
            }
        }

        if appended.insert(item.name.clone()) {
            items.push(ResolvedItem {
                remote: is_remote_name(&name),
                item,
            });
        } else {
            tracing::debug!("{} already resolved as {}", name, item.name);
        }
    }

    tracing::debug!("Resolved {} item(s)", items.len());
    Ok(ResolvedSet { items })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StencilError;
    use crate::registry::client::InMemoryCatalog;
    use crate::registry::schema::ItemType;
    use std::collections::BTreeMap;

    fn item(name: &str, deps: &[&str], packages: &[&str]) -> RegistryItem {
        RegistryItem {
            name: name.to_string(),
            item_type: ItemType::Ui,
            description: None,
            dependencies: packages.iter().map(|s| s.to_string()).collect(),
            dev_dependencies: Vec::new(),
            registry_dependencies: deps.iter().map(|s| s.to_string()).collect(),
            files: Vec::new(),
            css_vars: CssVars::default(),
            meta: Default::default(),
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn chain_is_closed_in_discovery_order() {
        let catalog = InMemoryCatalog::new()
            .with_item(item("a", &["b"], &[]))
            .with_item(item("b", &["c"], &[]))
            .with_item(item("c", &[], &[]));

        let set = resolve(&names(&["a"]), "default", &catalog).unwrap();
        assert_eq!(set.names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn diamond_fetches_shared_dependency_once() {
        let catalog = InMemoryCatalog::new()
            .with_item(item("a", &["b", "c"], &[]))
            .with_item(item("b", &["d"], &[]))
            .with_item(item("c", &["d"], &[]))
            .with_item(item("d", &[], &[]));

        let set = resolve(&names(&["a"]), "default", &catalog).unwrap();
        assert_eq!(set.names(), vec!["a", "b", "c", "d"]);
        assert_eq!(catalog.requests(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn cycle_terminates() {
        let catalog = InMemoryCatalog::new()
            .with_item(item("a", &["b"], &[]))
            .with_item(item("b", &["a"], &[]));

        let set = resolve(&names(&["a"]), "default", &catalog).unwrap();
        assert_eq!(set.names(), vec!["a", "b"]);
    }

    #[test]
    fn unknown_name_aborts_with_its_name() {
        let catalog = InMemoryCatalog::new().with_item(item("a", &["ghost"], &[]));

        let err = resolve(&names(&["a"]), "default", &catalog).unwrap_err();
        match err {
            StencilError::NotFound { name, .. } => assert_eq!(name, "ghost"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn index_is_resolved_first() {
        let catalog = InMemoryCatalog::new()
            .with_item(item("button", &[], &[]))
            .with_item(item(INDEX_ITEM, &[], &[]));

        let set = resolve(&names(&["button", "index"]), "default", &catalog).unwrap();
        assert_eq!(set.names(), vec!["index", "button"]);
    }

    #[test]
    fn same_item_by_two_names_is_appended_once() {
        let catalog = InMemoryCatalog::new()
            .with_item(item("button", &[], &[]))
            .with_alias("@acme/button", item("button", &[], &[]));

        let set = resolve(&names(&["button", "@acme/button"]), "default", &catalog).unwrap();
        assert_eq!(set.names(), vec!["button"]);
        assert!(!set.items()[0].remote);
    }

    #[test]
    fn remote_flag_follows_requested_name() {
        let catalog =
            InMemoryCatalog::new().with_alias("@acme/card", item("card", &[], &[]));
        let set = resolve(&names(&["@acme/card"]), "default", &catalog).unwrap();
        assert!(set.items()[0].remote);
    }

    #[test]
    fn shared_packages_are_deduplicated() {
        let catalog = InMemoryCatalog::new()
            .with_item(item("a", &["b"], &["clsx", "tailwind-merge"]))
            .with_item(item("b", &[], &["clsx@2.1.0", "@radix-ui/react-slot"]));

        let set = resolve(&names(&["a"]), "default", &catalog).unwrap();
        assert_eq!(
            set.dependencies().as_slice(),
            &["clsx", "tailwind-merge", "@radix-ui/react-slot"]
        );
    }

    #[test]
    fn dev_packages_are_collected_apart_from_runtime_ones() {
        let mut a = item("a", &["b"], &["clsx"]);
        a.dev_dependencies = vec!["tw-animate-css".to_string()];
        let mut b = item("b", &[], &[]);
        b.dev_dependencies = vec!["tw-animate-css@1.2.0".to_string(), "@types/node".to_string()];

        let catalog = InMemoryCatalog::new().with_item(a).with_item(b);
        let set = resolve(&names(&["a"]), "default", &catalog).unwrap();
        assert_eq!(set.dependencies().as_slice(), &["clsx"]);
        assert_eq!(
            set.dev_dependencies().as_slice(),
            &["tw-animate-css", "@types/node"]
        );
    }

    #[test]
    fn css_vars_later_items_win() {
        let mut a = item("a", &["b"], &[]);
        a.css_vars.light = BTreeMap::from([
            ("radius".to_string(), "0.5rem".to_string()),
            ("primary".to_string(), "red".to_string()),
        ]);
        let mut b = item("b", &[], &[]);
        b.css_vars.light = BTreeMap::from([("radius".to_string(), "1rem".to_string())]);

        let catalog = InMemoryCatalog::new().with_item(a).with_item(b);
        let vars = resolve(&names(&["a"]), "default", &catalog)
            .unwrap()
            .css_vars();
        assert_eq!(vars.light["radius"], "1rem");
        assert_eq!(vars.light["primary"], "red");
    }

    #[test]
    fn package_name_strips_versions() {
        assert_eq!(package_name("clsx"), "clsx");
        assert_eq!(package_name("clsx@^2"), "clsx");
        assert_eq!(package_name("@radix-ui/react-slot"), "@radix-ui/react-slot");
        assert_eq!(package_name("@radix-ui/react-slot@1.0.0"), "@radix-ui/react-slot");
    }
}
