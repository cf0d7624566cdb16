//! The fixed template catalog

use crate::answers::Framework;

/// (framework, styling add-on) → template folder name.
///
/// Total over both axes. Adding a template is one more row.
const CATALOG: &[(Framework, bool, &str)] = &[
    (Framework::React, false, "react"),
    (Framework::React, true, "react-tailwind"),
    (Framework::NextJs, false, "nextjs"),
    (Framework::NextJs, true, "nextjs-tailwind"),
];

/// Look up the template for a framework and styling add-on choice
pub fn resolve(framework: Framework, wants_styling_addon: bool) -> &'static str {
    CATALOG
        .iter()
        .find(|(fw, addon, _)| *fw == framework && *addon == wants_styling_addon)
        .map(|(_, _, id)| *id)
        // The table covers every combination; see test_catalog_is_total
        .unwrap_or_else(|| unreachable!("catalog has no entry for {framework:?}/{wants_styling_addon}"))
}

/// Every template identifier in the catalog
pub fn template_ids() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|(_, _, id)| *id)
}
