use std::path::Path;

use ollabench_core::{ConfigError, Result};

/// One prompt per line; blank lines and repeats are skipped.
pub fn load_prompts(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)?;
    let prompts = parse_prompts(&raw);

    if prompts.is_empty() {
        return Err(ConfigError::EmptyPrompts.into());
    }

    tracing::debug!("Loaded {} prompts from {:?}", prompts.len(), path);
    Ok(prompts)
}

fn parse_prompts(raw: &str) -> Vec<String> {
    let mut prompts: Vec<String> = Vec::new();
    for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if !prompts.iter().any(|p| p == line) {
            prompts.push(line.to_string());
        }
    }
    prompts
}

#[cfg(test)]
mod tests {
    use super::*;
    use ollabench_core::OllabenchError;
    use std::io::Write;

    #[test]
    fn test_parse_trims_and_dedups() {
        let raw = "  What is Rust?\n\nExplain TCP.\r\nWhat is Rust?\n   \n";
        assert_eq!(parse_prompts(raw), vec!["What is Rust?", "Explain TCP."]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "first").unwrap();
        writeln!(file, "second").unwrap();

        let prompts = load_prompts(file.path()).unwrap();
        assert_eq!(prompts, vec!["first", "second"]);
    }

    #[test]
    fn test_empty_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "   ").unwrap();

        let err = load_prompts(file.path()).unwrap_err();
        assert!(matches!(err, OllabenchError::Config(ConfigError::EmptyPrompts)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_prompts(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, OllabenchError::Io(_)));
    }
}
