//! `.dvcignore` predicate
//!
//! One pattern per line; blank lines and lines starting with `#` are skipped.
//!
//! - `name` without a slash matches a file or directory of that name at any depth
//! - `dir/` matches a directory (and everything beneath it)
//! - patterns containing a slash are anchored at the repository root
//! - `*` and `?` match within one path component, `**` matches across components

use anyhow::Context;
use regex::Regex;
use std::path::Path;

pub const IGNORE_FILE_NAME: &str = ".dvcignore";

#[derive(Debug, Clone)]
struct IgnorePattern {
    regex: Regex,
    directory_only: bool,
}

impl IgnorePattern {
    fn parse(line: &str) -> anyhow::Result<Self> {
        let directory_only = line.ends_with('/');
        let pattern = line.trim_end_matches('/');
        let anchored = pattern.contains('/');
        let pattern = pattern.trim_start_matches('/');

        let mut regex = String::from(if anchored { "^" } else { "(^|/)" });
        let mut chars = pattern.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '*' if chars.peek() == Some(&'*') => {
                    chars.next();
                    regex.push_str(".*");
                }
                '*' => regex.push_str("[^/]*"),
                '?' => regex.push_str("[^/]"),
                c => regex.push_str(&regex::escape(&c.to_string())),
            }
        }
        // a match on a directory covers everything below it
        regex.push_str("(/|$)");

        Ok(IgnorePattern {
            regex: Regex::new(&regex).with_context(|| format!("invalid ignore pattern {line}"))?,
            directory_only,
        })
    }

    fn matches(&self, path: &str) -> bool {
        match self.regex.find(path) {
            // a directory-only pattern must match a path component followed by more
            Some(m) if self.directory_only => m.as_str().ends_with('/'),
            Some(_) => true,
            None => false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IgnoreFilter {
    patterns: Vec<IgnorePattern>,
}

impl IgnoreFilter {
    /// Read `<root>/.dvcignore`; a missing file ignores nothing
    pub fn load(root: &Path) -> anyhow::Result<Self> {
        let ignore_path = root.join(IGNORE_FILE_NAME);
        if !ignore_path.is_file() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&ignore_path)
            .with_context(|| format!("unable to read {}", ignore_path.display()))?;

        Self::from_patterns(content.lines())
    }

    pub fn from_patterns<'a>(lines: impl IntoIterator<Item = &'a str>) -> anyhow::Result<Self> {
        let patterns = lines
            .into_iter()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(IgnorePattern::parse)
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(IgnoreFilter { patterns })
    }

    /// Whether a repository-relative, `/`-separated file path is ignored
    pub fn is_ignored(&self, path: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(path))
    }
}
