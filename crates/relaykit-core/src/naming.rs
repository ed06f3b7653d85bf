//! Naming helpers for schema and canonical type names.
//!
//! Schema types require globally unique, stable names. Derived shapes get a
//! canonical name built from their wrapper's base name plus the name of the
//! type argument, with any generic arity marker stripped.

/// Lowers the first character of a string.
///
/// `"SomeString"` becomes `"someString"`. Field names on the schema surface
/// are the member's declared name run through this.
pub fn to_first_lower(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Builds the canonical name of a derived type from a wrapper base name and
/// the name of its type argument.
///
/// Arity markers are stripped from the base, so a base of `Wrapper<Foo>`,
/// of "Wrapper" followed by a backtick arity suffix, or of plain `Wrapper`
/// all combine with `Foo` to `"WrapperFoo"`.
pub fn canonical_name(base: &str, argument: &str) -> String {
    let clean = match base.find(['<', '`']) {
        Some(index) => &base[..index],
        None => base,
    };
    format!("{clean}{argument}")
}
