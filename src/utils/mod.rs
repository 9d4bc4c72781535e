//! Project-specific utilities live here.

use serde::{Deserialize, Deserializer};

/// Deserializer for patch fields that must tell "absent" from "null".
///
/// Pair with `#[serde(default)]`: an absent key stays `None`, while any
/// present value, `null` included, becomes `Some(..)`.
pub fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
