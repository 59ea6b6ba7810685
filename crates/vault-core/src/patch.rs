//! # Patch Wrapper
//!
//! `Patch<T>` tells "field absent" apart from "field present", including
//! present-but-empty values such as `""` or `0`.
//!
//! ## JSON Mapping
//! ```text
//! {}                    → Patch::Unset   (needs #[serde(default)] on the field)
//! {"name": ""}          → Patch::Set("")  (rejected later by validation)
//! {"name": "Watch"}     → Patch::Set("Watch")
//! {"name": null}        → deserialization error (null is not a T)
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A field of a partial update: either left alone or set to a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Patch<T> {
    /// Field absent; keep the stored value.
    #[default]
    Unset,
    /// Field present with this value.
    Set(T),
}

impl<T> Patch<T> {
    /// Returns true if the field was supplied.
    #[inline]
    pub fn is_set(&self) -> bool {
        matches!(self, Patch::Set(_))
    }

    /// Returns true if the field was absent.
    #[inline]
    pub fn is_unset(&self) -> bool {
        matches!(self, Patch::Unset)
    }

    /// Borrows the inner value.
    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Patch::Set(value) => Patch::Set(value),
            Patch::Unset => Patch::Unset,
        }
    }

    /// Maps a set value, leaving `Unset` alone.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Patch::Set(value) => Patch::Set(f(value)),
            Patch::Unset => Patch::Unset,
        }
    }

    /// Maps a set value through a fallible conversion.
    ///
    /// Only supplied fields run `f`, which is how per-field validation
    /// skips the fields a client did not send.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Patch<U>, E> {
        match self {
            Patch::Set(value) => f(value).map(Patch::Set),
            Patch::Unset => Ok(Patch::Unset),
        }
    }

    /// Returns the set value, or `current` when unset.
    pub fn unwrap_or(self, current: T) -> T {
        match self {
            Patch::Set(value) => value,
            Patch::Unset => current,
        }
    }

    /// Converts into an `Option`.
    pub fn into_option(self) -> Option<T> {
        match self {
            Patch::Set(value) => Some(value),
            Patch::Unset => None,
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Patch::Set(value),
            None => Patch::Unset,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Patch::Set)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Patch::Set(value) => value.serialize(serializer),
            Patch::Unset => serializer.serialize_none(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    struct Body {
        #[serde(default, skip_serializing_if = "Patch::is_unset")]
        name: Patch<String>,
        #[serde(default, skip_serializing_if = "Patch::is_unset")]
        price: Patch<i64>,
    }

    #[test]
    fn test_absent_field_is_unset() {
        let body: Body = serde_json::from_str(r#"{"price": 5}"#).unwrap();
        assert!(body.name.is_unset());
        assert_eq!(body.price, Patch::Set(5));
    }

    #[test]
    fn test_empty_values_stay_distinguishable() {
        let body: Body = serde_json::from_str(r#"{"name": "", "price": 0}"#).unwrap();
        assert_eq!(body.name, Patch::Set(String::new()));
        assert_eq!(body.price, Patch::Set(0));
    }

    #[test]
    fn test_null_is_rejected() {
        assert!(serde_json::from_str::<Body>(r#"{"name": null}"#).is_err());
    }

    #[test]
    fn test_unset_fields_are_skipped_when_serializing() {
        let body = Body {
            name: Patch::Set("Watch".to_string()),
            price: Patch::Unset,
        };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"name":"Watch"}"#);
    }

    #[test]
    fn test_try_map_only_runs_on_set() {
        let unset: Patch<i64> = Patch::Unset;
        let mapped: Result<Patch<i64>, &str> = unset.try_map(|_| Err("never called"));
        assert_eq!(mapped, Ok(Patch::Unset));

        let set = Patch::Set(-1_i64);
        let mapped: Result<Patch<i64>, &str> =
            set.try_map(|v| if v < 0 { Err("negative") } else { Ok(v) });
        assert_eq!(mapped, Err("negative"));
    }

    #[test]
    fn test_unwrap_or_keeps_current_value() {
        assert_eq!(Patch::Unset.unwrap_or(3), 3);
        assert_eq!(Patch::Set(4).unwrap_or(3), 4);
        assert_eq!(Patch::from(Some(1)).into_option(), Some(1));
        assert_eq!(Patch::<i32>::from(None).into_option(), None);
    }
}
