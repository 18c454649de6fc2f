//! 가치 시계열 지표 명령.

use anyhow::{bail, Result};
use riskpilot_analytics::snapshot_metrics;
use riskpilot_core::SnapshotMetrics;
use std::path::Path;
use tracing::warn;

use super::read_json;

/// 가치 시계열 JSON 배열 파일에서 스냅샷 지표를 계산합니다.
pub fn run_metrics(values_path: &Path, risk_free_rate: f64) -> Result<SnapshotMetrics> {
    let values: Vec<f64> = read_json(values_path)?;
    if values.iter().any(|v| !v.is_finite()) {
        bail!("Value series contains non-finite numbers");
    }
    if values.len() < 2 {
        warn!(count = values.len(), "가치 데이터 부족, 지표를 0으로 반환");
    }
    Ok(snapshot_metrics(&values, risk_free_rate))
}
