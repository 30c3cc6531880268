use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClipId(String);

impl ClipId {
    pub fn new() -> Self {
        uuid::Uuid::new_v4().into()
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<uuid::Uuid> for ClipId {
    fn from(value: uuid::Uuid) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
