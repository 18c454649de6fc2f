//! 포트폴리오 리스크 점수 명령.

use anyhow::Result;
use riskpilot_analytics::{score, RiskSummary};
use riskpilot_core::SnapshotMetrics;

/// 쉼표로 구분된 비중 목록을 파싱합니다 (예: `"0.5,0.3,0.2"`).
pub fn parse_allocations(s: &str) -> Result<Vec<f64>> {
    s.split(',')
        .map(|w| {
            w.trim()
                .parse::<f64>()
                .map_err(|_| anyhow::anyhow!("Invalid allocation weight: {w}"))
        })
        .collect()
}

/// 리스크 점수 명령을 실행합니다.
pub fn run_score(allocations: &[f64], snapshot: &SnapshotMetrics) -> Result<RiskSummary> {
    Ok(score(allocations, snapshot)?)
}
