//! Closed-mapping schemas.
//!
//! Every payload is a JSON object whose keys are owned by exactly one schema
//! part. A *leaf* part is a plain `#[serde(deny_unknown_fields)]` struct that
//! lists its keys in [`SchemaFields::FIELDS`]. A *composed* schema is a record
//! of leaf parts built with [`composed_schema!`]: it serializes flat, decodes
//! by handing each part only the keys that part owns, and asserts at compile
//! time that no two parts declare the same key.
//!
//! Open mappings (`optimizer_parameters`, `optimizer_success`) are not schemas
//! at all; they are carried as `serde_json::Map` values inside a leaf.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::validation::decode_value;
use crate::error::Violation;

/// Top-level keys declared by a leaf schema part.
pub trait SchemaFields {
    const FIELDS: &'static [&'static str];
}

/// A closed top-level schema: a leaf part or a composition of leaf parts.
pub trait Schema: Serialize + Sized {
    /// Whether `key` is declared by this schema.
    fn owns(key: &str) -> bool;

    /// Remove and decode the keys this schema owns. Unowned keys are left in
    /// `object` for the caller to report.
    fn decode_fields(object: &mut Map<String, Value>) -> Result<Self, Vec<Violation>>;

    /// Constraint violations of an already decoded value (ranges, bounds).
    fn violations(&self) -> Vec<Violation>;
}

/// Decode the keys owned by `T` out of `object`.
pub fn decode_leaf<T>(object: &mut Map<String, Value>) -> Result<T, Vec<Violation>>
where
    T: DeserializeOwned + SchemaFields,
{
    let mut owned = Map::new();
    for key in T::FIELDS {
        if let Some(value) = object.remove(*key) {
            owned.insert((*key).to_string(), value);
        }
    }
    decode_value(Value::Object(owned)).map_err(|violation| vec![violation])
}

pub fn owns_field(fields: &[&str], key: &str) -> bool {
    fields.iter().any(|field| *field == key)
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// True if no key appears in more than one of `parts`.
pub const fn fields_disjoint(parts: &[&[&str]]) -> bool {
    let mut p = 0;
    while p < parts.len() {
        let mut q = p + 1;
        while q < parts.len() {
            let mut i = 0;
            while i < parts[p].len() {
                let mut j = 0;
                while j < parts[q].len() {
                    if str_eq(parts[p][i], parts[q][j]) {
                        return false;
                    }
                    j += 1;
                }
                i += 1;
            }
            q += 1;
        }
        p += 1;
    }
    true
}

/// Implement [`Schema`] for leaf parts that derive `Deserialize` and `Validate`.
///
/// `Type => check` adds the violations returned by `check(&self)` to the
/// `validator` ones.
macro_rules! leaf_schema {
    ($($ty:ty $(=> $check:path)?),+ $(,)?) => {$(
        impl $crate::core::schema::Schema for $ty {
            fn owns(key: &str) -> bool {
                $crate::core::schema::owns_field(
                    <$ty as $crate::core::schema::SchemaFields>::FIELDS,
                    key,
                )
            }

            fn decode_fields(
                object: &mut serde_json::Map<String, serde_json::Value>,
            ) -> Result<Self, Vec<$crate::error::Violation>> {
                $crate::core::schema::decode_leaf::<$ty>(object)
            }

            fn violations(&self) -> Vec<$crate::error::Violation> {
                #[allow(unused_mut)]
                let mut found = $crate::core::validation::constraint_violations(self);
                $( found.extend($check(self)); )?
                found
            }
        }
    )+};
}

pub(crate) use leaf_schema;

/// Declare a schema composed of leaf parts. Parts are flattened on the wire.
macro_rules! composed_schema {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $(#[$field_meta:meta])* pub $field:ident : $part:ty ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize)]
        pub struct $name {
            $(
                $(#[$field_meta])*
                #[serde(flatten)]
                pub $field: $part,
            )+
        }

        const _: () = assert!(
            $crate::core::schema::fields_disjoint(&[
                $( <$part as $crate::core::schema::SchemaFields>::FIELDS ),+
            ]),
            "composed schema parts declare overlapping fields"
        );

        impl $crate::core::schema::Schema for $name {
            fn owns(key: &str) -> bool {
                false $( || $crate::core::schema::owns_field(
                    <$part as $crate::core::schema::SchemaFields>::FIELDS,
                    key,
                ) )+
            }

            fn decode_fields(
                object: &mut serde_json::Map<String, serde_json::Value>,
            ) -> Result<Self, Vec<$crate::error::Violation>> {
                let mut violations = Vec::new();
                // Constraint failures of the parts that did decode, reported
                // only when some other part failed.
                let mut decoded_violations = Vec::new();
                $(
                    let $field = match <$part as $crate::core::schema::Schema>::decode_fields(object) {
                        Ok(part) => {
                            decoded_violations.extend($crate::core::schema::Schema::violations(&part));
                            Some(part)
                        }
                        Err(found) => {
                            violations.extend(found);
                            None
                        }
                    };
                )+
                match ($($field,)+) {
                    ($(Some($field),)+) => Ok(Self { $($field),+ }),
                    _ => {
                        violations.extend(decoded_violations);
                        Err(violations)
                    }
                }
            }

            fn violations(&self) -> Vec<$crate::error::Violation> {
                let mut found = Vec::new();
                $(
                    found.extend($crate::core::schema::Schema::violations(&self.$field));
                )+
                found
            }
        }
    };
}

pub(crate) use composed_schema;
