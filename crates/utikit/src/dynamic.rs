//! Dynamic identifiers synthesized for tags no declared type claims.
//!
//! A dynamic identifier is `dyn.` followed by the lowercase hex encoding of
//! `tag_class NUL tag_value NUL parent`. The encoding is lowercase by
//! construction and decodes back to the tag, so conformance and preferred
//! extensions work without keeping state.

/// Prefix shared by all dynamic identifiers.
pub const DYNAMIC_PREFIX: &str = "dyn.";

const SEPARATOR: char = '\0';

/// Decoded contents of a dynamic identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicType {
    /// Tag class the identifier was synthesized for.
    pub tag_class: String,
    /// Tag value the identifier was synthesized for.
    pub tag_value: String,
    /// Type the synthesized identifier conforms to.
    pub conforms_to: String,
}

/// Synthesizes the dynamic identifier for a tag.
pub fn encode(tag_class: &str, tag_value: &str, conforms_to: &str) -> String {
    let payload = format!("{tag_class}{SEPARATOR}{tag_value}{SEPARATOR}{conforms_to}");
    format!("{DYNAMIC_PREFIX}{}", hex::encode(payload))
}

/// Decodes a dynamic identifier; `None` for declared or malformed ones.
pub fn decode(identifier: &str) -> Option<DynamicType> {
    let encoded = identifier.strip_prefix(DYNAMIC_PREFIX)?;
    let bytes = hex::decode(encoded).ok()?;
    let payload = String::from_utf8(bytes).ok()?;
    let mut parts = payload.splitn(3, SEPARATOR);
    Some(DynamicType {
        tag_class: parts.next()?.to_string(),
        tag_value: parts.next()?.to_string(),
        conforms_to: parts.next()?.to_string(),
    })
}

/// Returns true if `identifier` carries the dynamic prefix.
pub fn is_dynamic(identifier: &str) -> bool {
    identifier.starts_with(DYNAMIC_PREFIX)
}
