//! File-backed system prompt
//!
//! The prompt is read once at session start and pinned at the head of the
//! conversation. A missing or unreadable file is not fatal: the session
//! starts without a system prompt and a warning is logged.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct SystemPromptLoader {
    path: PathBuf,
}

impl SystemPromptLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolve a relative path against `base`.
    pub fn relative_to(path: impl AsRef<Path>, base: &Path) -> Self {
        let path = path.as_ref();
        if path.is_absolute() {
            Self::new(path)
        } else {
            Self::new(base.join(path))
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Prompt text, trimmed. `None` when missing, unreadable or blank.
    pub fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let content = content.trim();
                if content.is_empty() {
                    warn!("System prompt file {} is empty", self.path.display());
                    return None;
                }
                debug!(
                    "Loaded system prompt from {} ({} bytes)",
                    self.path.display(),
                    content.len()
                );
                Some(content.to_string())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    "System prompt file {} not found, continuing without one",
                    self.path.display()
                );
                None
            }
            Err(e) => {
                warn!(
                    "Could not read system prompt file {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_trims_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("system_msg.txt");
        fs::write(&path, "\nYou are a sales analyst for Zava.\n\n").unwrap();

        let prompt = SystemPromptLoader::new(&path).load();
        assert_eq!(prompt.as_deref(), Some("You are a sales analyst for Zava."));
    }

    #[test]
    fn test_missing_and_blank_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SystemPromptLoader::new(dir.path().join("missing.txt")).load().is_none());

        let blank = dir.path().join("blank.txt");
        fs::write(&blank, "   \n").unwrap();
        assert!(SystemPromptLoader::new(&blank).load().is_none());
    }

    #[test]
    fn test_relative_to() {
        let base = Path::new("/srv/agent");
        let loader = SystemPromptLoader::relative_to("system_msg.txt", base);
        assert_eq!(loader.path(), Path::new("/srv/agent/system_msg.txt"));

        let loader = SystemPromptLoader::relative_to("/etc/prompt.txt", base);
        assert_eq!(loader.path(), Path::new("/etc/prompt.txt"));
    }
}
