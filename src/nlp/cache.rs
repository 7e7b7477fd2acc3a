use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::analysis::KeywordAnalysis;
use super::extract::analyze;

/// Keyed by a hash of the content so an edited file never reads a stale
/// analysis.
pub fn cache_file_name(text: &str) -> String {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    format!("{:016x}.keywords.json", hasher.finish())
}

pub fn cache_path(cache_dir: &Path, text: &str) -> PathBuf {
    cache_dir.join(cache_file_name(text))
}

/// Reads the text file and returns its analysis, serving from the cache
/// when possible. A missing or corrupt cache file is regenerated.
pub fn load_or_analyze(text_path: &Path, cache_dir: &Path) -> Result<KeywordAnalysis> {
    let text = fs::read_to_string(text_path)
        .with_context(|| format!("failed to read text file {}", text_path.display()))?;
    let source_name = text_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| text_path.display().to_string());

    let path = cache_path(cache_dir, &text);
    if let Some(cached) = read_cached(&path) {
        return Ok(cached);
    }

    let analysis = analyze(&source_name, &text);
    store(&path, &analysis)?;
    Ok(analysis)
}

fn read_cached(path: &Path) -> Option<KeywordAnalysis> {
    let raw = fs::read_to_string(path).ok()?;
    serde_json::from_str(&raw).ok()
}

fn store(path: &Path, analysis: &KeywordAnalysis) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create cache directory {}", parent.display()))?;
    }
    let raw = serde_json::to_string(analysis).context("failed to serialize keyword analysis")?;
    fs::write(path, raw)
        .with_context(|| format!("failed to write keyword cache {}", path.display()))
}
