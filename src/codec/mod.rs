//! Request/response codec.
//!
//! `serialize` validates before encoding; `deserialize` parses to a generic
//! JSON tree, builds the typed value (resolving tagged unions through
//! [`tagged`]), optionally rejects unknown fields, then runs the same
//! validation pass.

pub mod rules;
pub mod tagged;

use crate::telemetry::{ClientEvent, LogSink};
use crate::{Error, ErrorContext, Result};
use rules::{Rules, Validate};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// How strictly a letter's address lines are enforced.
///
/// The service itself accepts letters with fewer lines; `Require` keeps the
/// stricter client-side check, `Warn` only reports it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LetterAddressPolicy {
    #[default]
    Require,
    Warn,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodecConfig {
    /// Fail on response keys the target type does not declare.
    pub strict_unknown_fields: bool,
    pub letter_address: LetterAddressPolicy,
}

pub struct Codec {
    config: CodecConfig,
    sink: Arc<dyn LogSink>,
}

impl Codec {
    pub fn new(config: CodecConfig) -> Self {
        Self {
            config,
            sink: crate::telemetry::tracing_sink(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> CodecConfig {
        self.config
    }

    /// Run every rule of `value`. Warnings go to the log sink.
    pub fn validate<T: Validate + ?Sized>(&self, value: &T) -> Result<()> {
        let mut rules = Rules::new(self.config.letter_address);
        value.validate(&mut rules);
        let (outcome, warnings) = rules.finish();
        for w in warnings {
            self.sink.record(&ClientEvent::ValidationWarning {
                path: w.path,
                message: w.message,
            });
        }
        outcome.map_err(Error::Validation)
    }

    pub fn serialize<T: Serialize + Validate + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        self.validate(value)?;
        Ok(serde_json::to_vec(value)?)
    }

    pub fn deserialize<T>(&self, bytes: &[u8]) -> Result<T>
    where
        T: DeserializeOwned + Serialize + Validate,
    {
        let tree: Value = serde_json::from_slice(bytes).map_err(|e| {
            Error::serialization_with_context(
                format!("response body is not valid JSON: {}", e),
                ErrorContext::new().with_source("codec"),
            )
        })?;

        let value = T::deserialize(&tree).map_err(|e| {
            Error::serialization_with_context(
                e.to_string(),
                ErrorContext::new()
                    .with_details(std::any::type_name::<T>())
                    .with_source("codec"),
            )
        })?;

        if self.config.strict_unknown_fields {
            let known = serde_json::to_value(&value)?;
            let mut unknown = Vec::new();
            collect_unknown(&tree, &known, "", &mut unknown);
            if !unknown.is_empty() {
                return Err(Error::serialization_with_context(
                    format!("unknown fields: {}", unknown.join(", ")),
                    ErrorContext::new()
                        .with_field_path(unknown[0].clone())
                        .with_source("codec"),
                ));
            }
        }

        self.validate(&value)?;
        Ok(value)
    }
}

/// Paths present in `received` but absent from the re-encoded `known` tree.
/// Null-valued keys are skipped: they are indistinguishable from absent
/// optionals.
fn collect_unknown(received: &Value, known: &Value, path: &str, out: &mut Vec<String>) {
    match (received, known) {
        (Value::Object(r), Value::Object(k)) => {
            for (key, value) in r {
                let child = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };
                match k.get(key) {
                    Some(known_value) => collect_unknown(value, known_value, &child, out),
                    None if value.is_null() => {}
                    None => out.push(child),
                }
            }
        }
        (Value::Array(r), Value::Array(k)) => {
            for (i, (rv, kv)) in r.iter().zip(k.iter()).enumerate() {
                collect_unknown(rv, kv, &format!("{}[{}]", path, i), out);
            }
        }
        _ => {}
    }
}
