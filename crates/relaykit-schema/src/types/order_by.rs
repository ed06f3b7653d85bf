//! Order-by enumeration synthesis.

use std::sync::Arc;

use tracing::debug;

use relaykit_core::{
    ModelType, SchemaType, TypeKind, TypeRegistry, additions_type, canonical_name, is_simple,
};

/// Squashes a trailing `ID` from an uppercased member stem, leaving leading
/// ones alone: `CUSTOMERID` becomes `CUSTOMER`, `ID` stays `ID`.
fn squash_trailing_id(name: &str) -> &str {
    if !name.starts_with("ID") && name.ends_with("ID") {
        &name[..name.len() - 2]
    } else {
        name
    }
}

/// Builds the order-by enumeration of a model: an `<STEM>_ASC` and
/// `<STEM>_DESC` value for every simple member, extended with any
/// caller-supplied sortable names through additions synthesis.
pub fn order_by_type(
    registry: &TypeRegistry,
    model: &ModelType,
    additions: &[String],
) -> Arc<SchemaType> {
    let canonical = canonical_name("OrderByType", &model.name);

    if let Some(existing) = registry.get(&canonical) {
        return existing;
    }

    // synthesize the additions descriptor before taking the cache entry
    let extra = if additions.is_empty() {
        None
    } else {
        Some(additions_type(registry, &model.name, additions))
    };

    registry.get_or_synthesize(&canonical, move || {
        debug!(type_name = %model.name, "synthesizing order-by type");

        let mut ty = SchemaType::new(format!("orderBy{}", model.name), TypeKind::Enum);

        let stems = model
            .members
            .iter()
            .filter(|member| is_simple(&member.ty))
            .map(|member| member.name.to_uppercase())
            .chain(
                extra
                    .iter()
                    .flat_map(|ty| ty.fields.iter().map(|f| f.name.to_uppercase())),
            );

        for stem in stems {
            let stem = squash_trailing_id(&stem);
            ty.values.push(format!("{stem}_ASC"));
            ty.values.push(format!("{stem}_DESC"));
        }
        ty
    })
}
