//! Campos anulables en actualizaciones parciales
//!
//! Con `#[serde(default, deserialize_with = "nullable")]` un campo
//! `Option<Option<T>>` distingue "ausente" (`None`) de "null" (`Some(None)`).

use serde::{Deserialize, Deserializer};

pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
