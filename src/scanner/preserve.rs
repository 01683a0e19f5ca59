use glob::Pattern;
use std::path::Path;
use tracing::debug;

/// Compiled set of preserve patterns, matched against a file's base name.
///
/// Patterns use shell-glob syntax (`*`, `?`, `[...]`). A pattern that does
/// not compile can never match, so it never exempts anything.
#[derive(Debug, Clone, Default)]
pub struct PreserveSet {
    patterns: Vec<Pattern>,
}

impl PreserveSet {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|raw| match Pattern::new(raw.as_ref()) {
                Ok(p) => Some(p),
                Err(e) => {
                    debug!("Ignoring malformed preserve pattern {:?}: {}", raw.as_ref(), e);
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    /// True if the final path segment matches any pattern
    pub fn is_preserved(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.to_string_lossy();
        self.patterns.iter().any(|p| p.matches(&name))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// One-shot form of [`PreserveSet::is_preserved`]
pub fn is_preserved<S: AsRef<str>>(path: &Path, patterns: &[S]) -> bool {
    PreserveSet::new(patterns).is_preserved(path)
}
