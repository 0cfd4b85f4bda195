// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

///
/// The C# language versions we know how to gate on. Ordering follows
/// release order, so `version >= LanguageVersion::CSharp6` reads the
/// way you'd expect.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LanguageVersion {
    CSharp1,
    CSharp2,
    CSharp3,
    CSharp4,
    CSharp5,
    CSharp6,
    CSharp7,
    CSharp7_1,
    CSharp7_2,
    CSharp7_3,
    CSharp8,
    CSharp9,
    CSharp10,
    CSharp11,
    CSharp12,
    Preview,
}

/// `nameof` arrived in C# 6.
pub const NAMEOF_INTRODUCED: LanguageVersion = LanguageVersion::CSharp6;

impl LanguageVersion {
    /// What `latest` and `default` resolve to.
    pub const LATEST: LanguageVersion = LanguageVersion::CSharp12;

    pub fn supports_nameof(self) -> bool {
        self >= NAMEOF_INTRODUCED
    }

    pub fn all() -> &'static [LanguageVersion] {
        use LanguageVersion::*;
        &[
            CSharp1, CSharp2, CSharp3, CSharp4, CSharp5, CSharp6, CSharp7, CSharp7_1, CSharp7_2,
            CSharp7_3, CSharp8, CSharp9, CSharp10, CSharp11, CSharp12, Preview,
        ]
    }

    /// The number as written on the command line, e.g. "7.3".
    pub fn as_number(self) -> &'static str {
        use LanguageVersion::*;
        match self {
            CSharp1 => "1",
            CSharp2 => "2",
            CSharp3 => "3",
            CSharp4 => "4",
            CSharp5 => "5",
            CSharp6 => "6",
            CSharp7 => "7",
            CSharp7_1 => "7.1",
            CSharp7_2 => "7.2",
            CSharp7_3 => "7.3",
            CSharp8 => "8",
            CSharp9 => "9",
            CSharp10 => "10",
            CSharp11 => "11",
            CSharp12 => "12",
            Preview => "preview",
        }
    }
}

impl Default for LanguageVersion {
    fn default() -> Self {
        LanguageVersion::LATEST
    }
}

impl fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageVersion::Preview => write!(f, "C# preview"),
            other => write!(f, "C# {}", other.as_number()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLanguageVersionError(pub String);

impl fmt::Display for ParseLanguageVersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown C# language version '{}' (expected e.g. 5, 6, 7.3, latest, preview)",
            self.0
        )
    }
}

impl std::error::Error for ParseLanguageVersionError {}

impl FromStr for LanguageVersion {
    type Err = ParseLanguageVersionError;

    /// Accepts the spellings `<LangVersion>` takes in a project file,
    /// plus the enum names themselves.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let number = normalized
            .strip_prefix("csharp")
            .unwrap_or(&normalized)
            .replace('_', ".");

        match number.as_str() {
            "latest" | "latestmajor" | "default" => return Ok(LanguageVersion::LATEST),
            "preview" => return Ok(LanguageVersion::Preview),
            _ => {}
        }

        LanguageVersion::all()
            .iter()
            .copied()
            .find(|version| version.as_number() == number)
            .ok_or_else(|| ParseLanguageVersionError(s.to_string()))
    }
}

///
/// The concrete source dialects we carry diagnostic descriptors for.
/// Only C# is parsed today; Visual Basic descriptors exist so the
/// registry can be shared by a future VB front end.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    CSharp,
    VisualBasic,
}

impl Dialect {
    pub fn typeof_keyword(self) -> &'static str {
        match self {
            Dialect::CSharp => "typeof",
            Dialect::VisualBasic => "GetType",
        }
    }

    pub fn nameof_keyword(self) -> &'static str {
        match self {
            Dialect::CSharp => "nameof",
            Dialect::VisualBasic => "NameOf",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbers_and_aliases() {
        assert_eq!("6".parse::<LanguageVersion>().unwrap(), LanguageVersion::CSharp6);
        assert_eq!("7.3".parse::<LanguageVersion>().unwrap(), LanguageVersion::CSharp7_3);
        assert_eq!("CSharp7_1".parse::<LanguageVersion>().unwrap(), LanguageVersion::CSharp7_1);
        assert_eq!("csharp5".parse::<LanguageVersion>().unwrap(), LanguageVersion::CSharp5);
        assert_eq!("latest".parse::<LanguageVersion>().unwrap(), LanguageVersion::LATEST);
        assert_eq!("Default".parse::<LanguageVersion>().unwrap(), LanguageVersion::LATEST);
        assert_eq!("preview".parse::<LanguageVersion>().unwrap(), LanguageVersion::Preview);
    }

    #[test]
    fn rejects_unknown_versions() {
        let err = "6.5".parse::<LanguageVersion>().unwrap_err();
        assert!(err.to_string().contains("6.5"));
        assert!("".parse::<LanguageVersion>().is_err());
    }

    #[test]
    fn nameof_is_gated_on_csharp6() {
        for version in LanguageVersion::all() {
            assert_eq!(version.supports_nameof(), *version >= LanguageVersion::CSharp6);
        }
        assert!(!LanguageVersion::CSharp5.supports_nameof());
        assert!(LanguageVersion::Preview.supports_nameof());
    }

    #[test]
    fn display_round_trips_through_as_number() {
        for version in LanguageVersion::all() {
            assert_eq!(version.as_number().parse::<LanguageVersion>().unwrap(), *version);
        }
        assert_eq!(LanguageVersion::CSharp7_3.to_string(), "C# 7.3");
    }

    #[test]
    fn dialect_keywords() {
        assert_eq!(Dialect::CSharp.nameof_keyword(), "nameof");
        assert_eq!(Dialect::VisualBasic.typeof_keyword(), "GetType");
    }
}
