// src/models/category.rs

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// The closed set of quiz topics shared by the admin and student surfaces.
///
/// Stored and transmitted in lowercase. Every parse lowercases first, so
/// `"React"` and `"react"` name the same category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Mern,
    React,
    Node,
    Mongodb,
    Express,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Mern,
        Category::React,
        Category::Node,
        Category::Mongodb,
        Category::Express,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Mern => "mern",
            Category::React => "react",
            Category::Node => "node",
            Category::Mongodb => "mongodb",
            Category::Express => "express",
        }
    }

    /// Display name used by the student-facing category picker.
    pub fn label(self) -> &'static str {
        match self {
            Category::Mern => "MERN Stack",
            Category::React => "React.js",
            Category::Node => "Node.js",
            Category::Mongodb => "MongoDB",
            Category::Express => "Express.js",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Category::Mern | Category::React => "⚛️",
            Category::Node => "🟢",
            Category::Mongodb => "🍃",
            Category::Express => "🚀",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown category '{}'", s.trim())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("React".parse::<Category>().unwrap(), Category::React);
        assert_eq!(" MONGODB ".parse::<Category>().unwrap(), Category::Mongodb);
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "python".parse::<Category>().unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Category::Express).unwrap();
        assert_eq!(json, "\"express\"");
    }
}
