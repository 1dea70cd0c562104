//! Discriminator-keyed decoding for tagged unions.
//!
//! The service marks polymorphic bodies with a `type` key that may appear
//! anywhere in the object. Each union keeps a static table of
//! `(tag, decoder)` pairs; the decoder builds only that variant's fields.

use serde_json::Value;

pub const DISCRIMINATOR: &str = "type";

pub type VariantDecoder<K> = fn(&Value) -> serde_json::Result<K>;

/// Read the discriminator of `value` and run the matching decoder.
pub fn decode_variant<K>(
    value: &Value,
    union: &str,
    table: &[(&str, VariantDecoder<K>)],
) -> Result<K, String> {
    let object = value
        .as_object()
        .ok_or_else(|| format!("{} must be a JSON object", union))?;

    let tag = match object.get(DISCRIMINATOR) {
        Some(Value::String(tag)) => tag.as_str(),
        Some(Value::Null) | None => {
            return Err(format!("{} is missing the '{}' field", union, DISCRIMINATOR))
        }
        Some(other) => {
            return Err(format!(
                "{} '{}' must be a string, got {}",
                union, DISCRIMINATOR, other
            ))
        }
    };

    let (_, decoder) = table.iter().find(|(name, _)| *name == tag).ok_or_else(|| {
        let known: Vec<&str> = table.iter().map(|(name, _)| *name).collect();
        format!(
            "unknown {} type '{}', expected one of: {}",
            union,
            tag,
            known.join(", ")
        )
    })?;

    decoder(value).map_err(|e| format!("invalid {} '{}': {}", union, tag, e))
}
