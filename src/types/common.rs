//! Shared building blocks.

use crate::codec::rules::{Rules, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

/// Placeholder values substituted into a template. Values may be any JSON
/// scalar or object.
pub type Personalisation = HashMap<String, serde_json::Value>;

/// Declares a string-valued wire enum with an `Unknown(raw)` fallback, so new
/// server-side values decode instead of failing.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A value this client does not recognise; the raw string is kept.
            Unknown(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $wire, )+
                    Self::Unknown(raw) => raw,
                }
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                match raw {
                    $( $wire => Self::$variant, )+
                    other => Self::Unknown(other.to_string()),
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, s: S) -> ::std::result::Result<S::Ok, S::Error> {
                s.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(d: D) -> ::std::result::Result<Self, D::Error> {
                let raw = <String as ::serde::Deserialize>::deserialize(d)?;
                Ok(Self::from(raw.as_str()))
            }
        }

        impl $crate::codec::rules::KnownValue for $name {
            fn unknown_value(&self) -> Option<&str> {
                match self {
                    Self::Unknown(raw) => Some(raw),
                    _ => None,
                }
            }
        }
    };
}

pub(crate) use string_enum;

string_enum! {
    /// Channel of a template or notification.
    pub enum TemplateType {
        Email => "email",
        Sms => "sms",
        Letter => "letter",
    }
}

string_enum! {
    /// Letter postage class.
    pub enum Postage {
        First => "first",
        Second => "second",
        Economy => "economy",
        Europe => "europe",
        RestOfWorld => "rest-of-world",
    }
}

/// An offset-aware ISO-8601 timestamp kept verbatim as received.
///
/// No timezone normalisation happens: what the server sent is what gets
/// serialized back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parsed value, if the text is RFC 3339 with an explicit offset.
    pub fn to_offset_datetime(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::parse(&self.0, &Rfc3339).ok()
    }

    pub fn is_offset_aware(&self) -> bool {
        self.to_offset_datetime().is_some()
    }
}

impl From<OffsetDateTime> for Timestamp {
    fn from(dt: OffsetDateTime) -> Self {
        Self(dt.format(&Rfc3339).unwrap_or_else(|_| dt.to_string()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to the template (and version) a notification was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRef {
    pub id: Uuid,
    pub version: i64,
    pub uri: String,
}

impl Validate for TemplateRef {
    fn validate(&self, rules: &mut Rules) {
        rules.check("version", self.version >= 1, "must be >= 1");
        rules.non_empty("uri", &self.uri);
    }
}

/// Pagination links of a list page. No `next` means the last page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    pub current: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl Links {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

impl Validate for Links {
    fn validate(&self, rules: &mut Rules) {
        rules.non_empty("current", &self.current);
        rules.non_empty_if_present("next", self.next.as_deref());
    }
}
