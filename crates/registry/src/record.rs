use serde::{Deserialize, Serialize};

/// The value stored under every registry key.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashRecord {
    pub hash: String,
    pub district: String,
}

impl HashRecord {
    pub fn new(district: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            district: district.into(),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decodes stored bytes, falling back to the empty record when they are
    /// missing or not a JSON object.
    pub fn decode(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }
}
