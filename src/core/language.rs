//! Source language tags.
//!
//! A project declares the languages it compiles; every source file is
//! classified by its suffix so that sources in an undeclared language can
//! be reported.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Source language declared by a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// C language
    C,
    /// C++ language
    #[serde(rename = "cpp", alias = "cxx", alias = "c++")]
    Cxx,
    /// COBOL (GnuCOBOL)
    Cobol,
    /// Fortran
    Fortran,
    /// D language
    D,
    /// Rust
    Rust,
    /// Objective-C
    ObjC,
    /// Objective-C++
    #[serde(rename = "objcpp")]
    ObjCxx,
    /// Vala
    Vala,
    /// Swift
    Swift,
    /// CUDA
    Cuda,
}

impl Language {
    /// Every known language, in a stable order.
    pub const ALL: &'static [Language] = &[
        Language::C,
        Language::Cxx,
        Language::Cobol,
        Language::Fortran,
        Language::D,
        Language::Rust,
        Language::ObjC,
        Language::ObjCxx,
        Language::Vala,
        Language::Swift,
        Language::Cuda,
    ];

    /// Get the language tag as written in a script.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cxx => "cpp",
            Language::Cobol => "cobol",
            Language::Fortran => "fortran",
            Language::D => "d",
            Language::Rust => "rust",
            Language::ObjC => "objc",
            Language::ObjCxx => "objcpp",
            Language::Vala => "vala",
            Language::Swift => "swift",
            Language::Cuda => "cuda",
        }
    }

    /// File suffixes compiled by this language.
    pub fn suffixes(&self) -> &'static [&'static str] {
        match self {
            Language::C => &["c"],
            Language::Cxx => &["cc", "cpp", "cxx", "c++", "C"],
            Language::Cobol => &["cob", "cbl", "cpy"],
            Language::Fortran => &["f", "for", "ftn", "fpp", "f77", "f90", "f95", "f03", "f08"],
            Language::D => &["d", "di"],
            Language::Rust => &["rs"],
            Language::ObjC => &["m"],
            Language::ObjCxx => &["mm"],
            Language::Vala => &["vala", "vapi", "gs"],
            Language::Swift => &["swift"],
            Language::Cuda => &["cu"],
        }
    }

    /// Classify a source path by suffix.
    ///
    /// Headers and unknown suffixes have no language.
    pub fn from_source(path: &Path) -> Option<Language> {
        let ext = path.extension()?.to_str()?;
        Language::ALL
            .iter()
            .copied()
            .find(|lang| lang.suffixes().contains(&ext))
    }
}

impl std::str::FromStr for Language {
    type Err = LanguageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "c" => Ok(Language::C),
            "cpp" | "cxx" | "c++" => Ok(Language::Cxx),
            "cobol" => Ok(Language::Cobol),
            "fortran" => Ok(Language::Fortran),
            "d" => Ok(Language::D),
            "rust" => Ok(Language::Rust),
            "objc" => Ok(Language::ObjC),
            "objcpp" => Ok(Language::ObjCxx),
            "vala" => Ok(Language::Vala),
            "swift" => Ok(Language::Swift),
            "cuda" => Ok(Language::Cuda),
            _ => Err(LanguageParseError(s.to_string())),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown language tag.
#[derive(Debug, Clone)]
pub struct LanguageParseError(pub String);

impl std::fmt::Display for LanguageParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let valid: Vec<&str> = Language::ALL.iter().map(|l| l.as_str()).collect();
        write!(
            f,
            "unknown language '{}', valid values: {}",
            self.0,
            valid.join(", ")
        )
    }
}

impl std::error::Error for LanguageParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_str() {
        assert_eq!("cobol".parse::<Language>().unwrap(), Language::Cobol);
        assert_eq!("c++".parse::<Language>().unwrap(), Language::Cxx);
        assert_eq!("CPP".parse::<Language>().unwrap(), Language::Cxx);
        assert!("brainfuck".parse::<Language>().is_err());
    }

    #[test]
    fn test_language_from_source() {
        assert_eq!(
            Language::from_source(Path::new("prog.cob")),
            Some(Language::Cobol)
        );
        assert_eq!(
            Language::from_source(Path::new("src/main.cbl")),
            Some(Language::Cobol)
        );
        assert_eq!(
            Language::from_source(Path::new("copybooks/record.cpy")),
            Some(Language::Cobol)
        );
        assert_eq!(Language::from_source(Path::new("a.cpp")), Some(Language::Cxx));
        assert_eq!(Language::from_source(Path::new("app.src")), None);
        assert_eq!(Language::from_source(Path::new("header.h")), None);
        assert_eq!(Language::from_source(Path::new("Makefile")), None);
    }

    #[test]
    fn test_parse_error_lists_valid_values() {
        let err = "pascal".parse::<Language>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("pascal"));
        assert!(msg.contains("cobol"));
    }
}
