use std::fmt;
use std::str::FromStr;

use super::GenerateError;

/// Backend stacks the generator can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
    /// Express + Mongoose
    Node,
    /// FastAPI + SQLAlchemy + Pydantic
    Python,
    /// Gin + GORM
    Go,
    /// Spring Boot + JPA
    Java,
    /// ASP.NET Core + Entity Framework Core
    CSharp,
}

impl Target {
    pub const ALL: [Target; 5] = [
        Target::Node,
        Target::Python,
        Target::Go,
        Target::Java,
        Target::CSharp,
    ];

    /// Selector used on the command line and in generate requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Node => "node",
            Target::Python => "python",
            Target::Go => "go",
            Target::Java => "java",
            Target::CSharp => "csharp",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Target::Node => "Node.js (Express + Mongoose)",
            Target::Python => "Python (FastAPI + SQLAlchemy)",
            Target::Go => "Go (Gin + GORM)",
            Target::Java => "Java (Spring Boot + JPA)",
            Target::CSharp => "C# (ASP.NET Core + EF Core)",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let selector = s.trim().to_ascii_lowercase();
        Target::ALL
            .into_iter()
            .find(|t| t.as_str() == selector)
            .ok_or_else(|| GenerateError::UnsupportedTarget(s.to_string()))
    }
}
