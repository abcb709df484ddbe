//! Node references in input records
//!
//! Node names are strings, but models written with integer node ids
//! (`"n1": 0`) are accepted too and read as the decimal name.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NodeRef {
    Name(String),
    Signed(i64),
    Unsigned(u64),
}

/// Deserialize a node reference given as a string or an integer
pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match NodeRef::deserialize(deserializer)? {
        NodeRef::Name(name) => name,
        NodeRef::Signed(id) => id.to_string(),
        NodeRef::Unsigned(id) => id.to_string(),
    })
}
