// Manifest component pass-through and helpers

use crate::manifest::ManifestComponents;
use std::collections::{BTreeMap, BTreeSet};

/// Package bucket for class names without a package prefix
pub const DEFAULT_PACKAGE: &str = "default";

/// Components reported for a scan. Only the main archive's manifest counts;
/// split archives never contribute.
pub fn select_components(main_manifest: &ManifestComponents) -> ManifestComponents {
    main_manifest.clone()
}

/// Sorted, distinct copy of a component list
pub fn deduplicate_components(components: &[String]) -> Vec<String> {
    components
        .iter()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Group class names by package (everything before the last `.`)
pub fn group_components_by_package(components: &[String]) -> BTreeMap<String, Vec<String>> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for component in components {
        let package = match component.rfind('.') {
            Some(index) if index > 0 => &component[..index],
            _ => DEFAULT_PACKAGE,
        };

        groups
            .entry(package.to_string())
            .or_default()
            .push(component.clone());
    }

    groups
}
