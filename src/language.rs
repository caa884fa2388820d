// src/language.rs

use std::path::Path;

/// Programming languages whose files count toward developer effort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    C,
    Cpp,
    CSharp,
    Go,
    Groovy,
    Java,
    JavaScript,
    Kotlin,
    ObjectiveC,
    Php,
    Python,
    Ruby,
    Rust,
    Scala,
    Shell,
    Swift,
    TypeScript,
}

impl Language {
    /// Files without an extension, or with one outside the allow-list, map to `None`
    pub fn from_path(path: &Path) -> Option<Language> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_ascii_lowercase().as_str() {
                "c" | "h" => Some(Language::C),
                "cc" | "cpp" | "cxx" | "hh" | "hpp" | "hxx" => Some(Language::Cpp),
                "cs" => Some(Language::CSharp),
                "go" => Some(Language::Go),
                "groovy" | "gradle" => Some(Language::Groovy),
                "java" => Some(Language::Java),
                "js" | "jsx" | "mjs" | "cjs" => Some(Language::JavaScript),
                "kt" | "kts" => Some(Language::Kotlin),
                "m" | "mm" => Some(Language::ObjectiveC),
                "php" => Some(Language::Php),
                "py" => Some(Language::Python),
                "rb" => Some(Language::Ruby),
                "rs" => Some(Language::Rust),
                "scala" => Some(Language::Scala),
                "sh" | "bash" => Some(Language::Shell),
                "swift" => Some(Language::Swift),
                "ts" | "tsx" => Some(Language::TypeScript),
                _ => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_extensions() {
        assert_eq!(Language::from_path(Path::new("src/Main.java")), Some(Language::Java));
        assert_eq!(Language::from_path(Path::new("lib/core.RS")), Some(Language::Rust));
        assert_eq!(Language::from_path(Path::new("include/util.hpp")), Some(Language::Cpp));
    }

    #[test]
    fn test_unrecognized_files_are_ignored() {
        assert_eq!(Language::from_path(Path::new("README.md")), None);
        assert_eq!(Language::from_path(Path::new("Makefile")), None);
        assert_eq!(Language::from_path(Path::new("pom.xml")), None);
    }
}
