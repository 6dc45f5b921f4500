use super::reference::ResourceReference;
use css_events::{PartKind, PropertyEvent};
use smol_str::SmolStr;

/// Properties whose values may reference an external resource.
pub const RESOURCE_PROPERTIES: &[&str] = &[
    "background",
    "background-image",
    "border-image",
    "border-image-source",
    "content",
    // @font-face
    "src",
];

/// Returns true if `name` (any case) is a resource-bearing property.
pub fn is_resource_property(name: &str) -> bool {
    RESOURCE_PROPERTIES
        .iter()
        .any(|property| property.eq_ignore_ascii_case(name))
}

/// Returns one reference per `url()` in the value of a resource-bearing
/// property, in source order. Other properties yield nothing.
pub fn extract_references(event: &PropertyEvent) -> Vec<ResourceReference> {
    if !is_resource_property(&event.property.text) {
        return Vec::new();
    }
    let name = SmolStr::new(event.property.text.to_ascii_lowercase());

    // every part, since `src` lists one url per fallback format
    event
        .value
        .parts
        .iter()
        .filter(|part| part.kind == PartKind::Uri)
        .map(|part| ResourceReference {
            name: name.clone(),
            raw_value: part.text.clone(),
            position: part.position,
            path: part.uri.clone().unwrap_or_default(),
        })
        .collect()
}
