//! CLI 명령어 구현 모듈.

pub mod adapt;
pub mod metrics;
pub mod project;
pub mod score;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// JSON 파일을 읽어 역직렬화합니다.
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// 값을 JSON 파일로 저장합니다.
pub fn write_json<T: serde::Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
