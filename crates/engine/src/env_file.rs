//! Variable-definition file parsing
//!
//! Registry entries named `*.source.sh` are shell fragments like the one
//! `init --work-dir` writes:
//!
//! ```sh
//! #!/usr/bin/env bash
//!
//! export WORK_DIR=/srv/deploy/demo
//! ```
//!
//! The shell dispatcher used to source them; the native dispatcher parses
//! them instead. Only `export KEY=value` and `KEY=value` lines take
//! effect. Anything else is skipped with a debug log so a stray comment
//! or shell construct never aborts a push.

use shipit_core::{Error, Result};
use std::path::Path;

/// Parse the `KEY=value` assignments in a variable-definition file
pub(crate) fn parse(path: &Path) -> Result<Vec<(String, String)>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::HookEnv(format!("Failed to read {}: {e}", path.display()))
    })?;

    let mut vars = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let assignment = line.strip_prefix("export ").unwrap_or(line).trim_start();
        let Some((key, value)) = assignment.split_once('=') else {
            tracing::debug!(
                file = %path.display(),
                line,
                "skipping line without an assignment"
            );
            continue;
        };
        let key = key.trim();
        if !is_valid_var_name(key) {
            tracing::debug!(
                file = %path.display(),
                line,
                "skipping assignment with invalid variable name"
            );
            continue;
        }
        vars.push((key.to_string(), unquote(value.trim()).to_string()));
    }
    Ok(vars)
}

/// Shell identifier rules: starts with a letter or underscore, then
/// alphanumerics and underscores
fn is_valid_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Strip one level of matching surrounding quotes
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    fn parse_str(content: &str) -> Vec<(String, String)> {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("10-vars.source.sh");
        std::fs::write(&file, content).unwrap();
        parse(&file).unwrap()
    }

    #[test]
    fn test_export_assignment() {
        let vars = parse_str("#!/usr/bin/env bash\n\nexport WORK_DIR=/srv/deploy\n");
        assert_eq!(vars, vec![("WORK_DIR".to_string(), "/srv/deploy".to_string())]);
    }

    #[test]
    fn test_plain_assignment() {
        let vars = parse_str("DEPLOY_ENV=production\n");
        assert_eq!(
            vars,
            vec![("DEPLOY_ENV".to_string(), "production".to_string())]
        );
    }

    #[test]
    fn test_quoted_values() {
        let vars = parse_str("export A=\"with space\"\nexport B='single'\n");
        assert_eq!(vars[0].1, "with space");
        assert_eq!(vars[1].1, "single");
    }

    #[test]
    fn test_comments_and_junk_skipped() {
        let vars = parse_str("# comment\nif true; then\n  echo hi\nfi\nX=1\n");
        assert_eq!(vars, vec![("X".to_string(), "1".to_string())]);
    }

    #[test]
    fn test_invalid_names_skipped() {
        let vars = parse_str("1BAD=x\nBAD-NAME=y\nGOOD_1=z\n");
        assert_eq!(vars, vec![("GOOD_1".to_string(), "z".to_string())]);
    }

    #[test]
    fn test_empty_value_kept() {
        let vars = parse_str("EMPTY=\n");
        assert_eq!(vars, vec![("EMPTY".to_string(), String::new())]);
    }

    #[test]
    fn test_missing_file_is_hook_env_error() {
        let err = parse(Path::new("/nonexistent/10-x.source.sh")).unwrap_err();
        assert!(matches!(err, Error::HookEnv(_)));
    }
}
