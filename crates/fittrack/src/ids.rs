use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a food item, day, exercise or workout.
///
/// Older records stored numeric ids; both forms are read as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Float(f64),
    Str(String),
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(v) => ItemId(v.to_string()),
            RawId::Float(v) => ItemId(v.to_string()),
            RawId::Str(s) => ItemId(s),
        })
    }
}

/// Source of fresh identities.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> ItemId;
}

/// Monotonic `prefix-N` identities. Deterministic, so tests can assert on them.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> ItemId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        ItemId(format!("{}-{n}", self.prefix))
    }
}

/// Random UUID v4 identities, used by the CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&self) -> ItemId {
        ItemId(uuid::Uuid::new_v4().to_string())
    }
}
