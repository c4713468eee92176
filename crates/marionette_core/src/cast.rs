//! The ordered roster of scripted actors.

use crate::Actor;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::fmt;

/// Actors keyed by script key, in declaration order.
///
/// Declaration order is the staging order, so the map is deserialized into a
/// vector rather than a hash map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cast(Vec<(String, Actor)>);

impl Cast {
    /// Build a cast from key/actor pairs in the given order.
    pub fn new(entries: Vec<(String, Actor)>) -> Self {
        Self(entries)
    }

    /// Look up an actor by key.
    pub fn get(&self, key: &str) -> Option<&Actor> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, actor)| actor)
    }

    /// Whether the key is declared.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Actor)> {
        self.0.iter().map(|(key, actor)| (key.as_str(), actor))
    }

    /// Number of declared actors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no actors are declared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Cast {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CastVisitor;

        impl<'de> Visitor<'de> for CastVisitor {
            type Value = Cast;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of actor keys to actor descriptors")
            }

            fn visit_map<M>(self, mut access: M) -> Result<Cast, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut entries: Vec<(String, Actor)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, actor)) = access.next_entry::<String, Actor>()? {
                    if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == key) {
                        slot.1 = actor;
                    } else {
                        entries.push((key, actor));
                    }
                }
                Ok(Cast(entries))
            }
        }

        deserializer.deserialize_map(CastVisitor)
    }
}
