//! Course and lesson types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique course identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseId(pub Uuid);

impl CourseId {
    /// Create a new random course ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a course ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for CourseId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CourseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for CourseId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Unique lesson identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LessonId(pub Uuid);

impl LessonId {
    /// Create a new random lesson ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a lesson ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for LessonId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LessonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for LessonId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}
