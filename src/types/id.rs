// ABOUTME: Phantom-typed identifiers for compile-time type safety.
// ABOUTME: Keeps OpsWorks stack, app and deployment IDs from being swapped.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Marker types for phantom type parameters.
/// Using empty enums prevents instantiation and requires no trait bounds.
pub enum StackMarker {}
pub enum AppMarker {}
pub enum DeploymentMarker {}

/// An identifier issued by the fleet service.
///
/// The phantom parameter ensures a `StackId` can never be passed where an
/// `AppId` or `DeploymentId` is expected.
#[must_use = "IDs reference remote resources and should not be ignored"]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_inner(self) -> String {
        self.value
    }
}

// Manual impls so T needs no bounds; it is only a marker.

impl<T> std::fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Id").field("value", &self.value).finish()
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> std::fmt::Display for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

pub type StackId = Id<StackMarker>;
pub type AppId = Id<AppMarker>;
pub type DeploymentId = Id<DeploymentMarker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_compare_by_value() {
        assert_eq!(DeploymentId::new("d-1"), DeploymentId::new("d-1"));
        assert_ne!(DeploymentId::new("d-1"), DeploymentId::new("d-2"));
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = StackId::new("2f18b4cb-4de5-4429-a149-ff7da9f0d8ee");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"2f18b4cb-4de5-4429-a149-ff7da9f0d8ee\"");

        let back: StackId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
