use chrono::Utc;
use serde::{Deserialize, Deserializer};

/// Lower bound (seconds since epoch) of the next review status fetch window
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct Cursor {
    value: i64,
}

impl Cursor {
    pub fn from_secs(secs: i64) -> Self {
        Self { value: secs }
    }

    pub fn now() -> Self {
        Self::from_secs(Utc::now().timestamp())
    }

    pub fn as_secs(&self) -> i64 {
        self.value
    }
}

impl<'de> Deserialize<'de> for Cursor {
    fn deserialize<D>(deserializer: D) -> Result<Cursor, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = i64::deserialize(deserializer)?;
        Ok(Cursor::from_secs(secs))
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}
