use std::path::Path;
use walkdir::WalkDir;

/// Extension table in declaration order. Ties (including the zero-tally
/// empty-directory case) resolve to the earliest entry.
const LANGUAGES: &[(&str, &[&str])] = &[
    ("Python", &["py"]),
    ("JavaScript", &["js"]),
    ("Java", &["java"]),
    ("Go", &["go"]),
    ("Ruby", &["rb"]),
    ("PHP", &["php"]),
    ("C++", &["cpp", "hpp"]),
    ("C#", &["cs"]),
];

/// Walks the full tree and returns the language with the most files by
/// extension. Unrecognized extensions are ignored; unreadable entries are
/// skipped rather than reported.
pub fn detect_language(dir: &Path) -> &'static str {
    let mut tallies = vec![0usize; LANGUAGES.len()];

    for entry in WalkDir::new(dir).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(ext) = entry.path().extension().and_then(|ext| ext.to_str()) else {
            continue;
        };
        for (index, (_, extensions)) in LANGUAGES.iter().enumerate() {
            if extensions.contains(&ext) {
                tallies[index] += 1;
            }
        }
    }

    let mut best = 0;
    for index in 1..LANGUAGES.len() {
        if tallies[index] > tallies[best] {
            best = index;
        }
    }
    LANGUAGES[best].0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn majority_extension_wins() {
        let dir = TempDir::new().unwrap();
        for name in ["a.py", "b.py", "c.py", "d.js"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }

        assert_eq!(detect_language(dir.path()), "Python");
    }

    #[test]
    fn subdirectories_are_counted() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("src").join("handlers");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("main.go"), "package main").unwrap();
        fs::write(nested.join("a.go"), "package handlers").unwrap();
        fs::write(nested.join("b.go"), "package handlers").unwrap();
        fs::write(dir.path().join("script.py"), "pass").unwrap();

        assert_eq!(detect_language(dir.path()), "Go");
    }

    #[test]
    fn empty_directory_falls_back_to_first_declared() {
        let dir = TempDir::new().unwrap();
        assert_eq!(detect_language(dir.path()), "Python");
    }

    #[test]
    fn ties_resolve_in_declaration_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.rb"), "x").unwrap();
        fs::write(dir.path().join("b.php"), "x").unwrap();

        // Ruby precedes PHP in the table.
        assert_eq!(detect_language(dir.path()), "Ruby");
    }

    #[test]
    fn unrecognized_extensions_are_ignored() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::write(dir.path().join("app.js"), "x").unwrap();

        assert_eq!(detect_language(dir.path()), "JavaScript");
    }
}
