//! 포트폴리오 리스크 점수.
//!
//! 분산도는 역 허핀달 지수 `min(1, 1 / Σw²)`이며,
//! 나머지 지표는 최근 스냅샷 값을 그대로 전달합니다.

use riskpilot_core::{RiskError, RiskLevel, RiskResult, SnapshotMetrics};
use serde::{Deserialize, Serialize};

/// 비중 합계 허용 오차.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// 포트폴리오 리스크 요약.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    /// 분산도 점수 (0~1)
    pub diversification_score: f64,
    /// 허핀달 집중도 Σw²
    pub concentration: f64,
    /// 유효 자산 수 1 / Σw²
    pub effective_assets: f64,
    /// 최대 단일 비중
    pub largest_weight: f64,
    /// 자산 수
    pub asset_count: usize,
    /// 연율 변동성
    pub volatility: f64,
    /// 95% VaR
    pub value_at_risk: f64,
    /// 최대 낙폭
    pub max_drawdown: f64,
    /// 샤프 비율
    pub sharpe: f64,
    /// 리스크 수준
    pub risk_level: RiskLevel,
}

/// 비중 목록을 검증합니다.
fn validate_allocations(allocations: &[f64]) -> RiskResult<()> {
    if allocations.is_empty() {
        return Err(RiskError::InvalidInput(
            "allocations must not be empty".to_string(),
        ));
    }
    if let Some(w) = allocations.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(RiskError::InvalidInput(format!(
            "allocation weights must be non-negative, got {w}"
        )));
    }
    let sum: f64 = allocations.iter().sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(RiskError::InvalidInput(format!(
            "allocation weights must sum to 1, got {sum:.4}"
        )));
    }
    Ok(())
}

/// 역 허핀달 분산도 점수.
pub fn diversification_score(allocations: &[f64]) -> f64 {
    let concentration: f64 = allocations.iter().map(|w| w * w).sum();
    if concentration > 0.0 {
        (1.0 / concentration).min(1.0)
    } else {
        0.0
    }
}

/// 비중과 스냅샷 지표로 리스크 요약을 계산합니다.
///
/// 비중이 비었거나 음수가 있거나 합이 1에서 벗어나면 `InvalidInput`입니다.
/// 스냅샷의 누락 값은 0 (리스크 수준은 보통)으로 대체합니다.
pub fn score(allocations: &[f64], snapshot: &SnapshotMetrics) -> RiskResult<RiskSummary> {
    validate_allocations(allocations)?;

    let concentration: f64 = allocations.iter().map(|w| w * w).sum();
    let largest_weight = allocations.iter().copied().fold(0.0, f64::max);

    Ok(RiskSummary {
        diversification_score: diversification_score(allocations),
        concentration,
        effective_assets: 1.0 / concentration,
        largest_weight,
        asset_count: allocations.len(),
        volatility: snapshot.volatility.unwrap_or(0.0),
        value_at_risk: snapshot.value_at_risk.unwrap_or(0.0),
        max_drawdown: snapshot.max_drawdown.unwrap_or(0.0),
        sharpe: snapshot.sharpe.unwrap_or(0.0),
        risk_level: snapshot.risk_level.unwrap_or_default(),
    })
}
