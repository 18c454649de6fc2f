//! 가치 시계열 기반 리스크 지표 계산.
//!
//! 모든 비율은 소수로 표현합니다 (0.10 = 10%). 연율화는 달력 기준 365일을 사용합니다.

use riskpilot_core::{RiskLevel, SnapshotMetrics};

/// 연간 일수 (달력 기준).
pub const DAYS_PER_YEAR: f64 = 365.0;

/// VaR 신뢰 수준에 대응하는 하위 백분위.
const VAR_PERCENTILE: f64 = 5.0;

/// 연속된 가치 사이의 단순 수익률을 계산합니다.
///
/// 직전 값이 0 이하이거나 유한하지 않은 구간은 건너뜁니다.
pub fn daily_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .filter(|w| w[0] > 0.0 && w[0].is_finite() && w[1].is_finite())
        .map(|w| w[1] / w[0] - 1.0)
        .collect()
}

/// 모표준편차. 표본이 2개 미만이면 0입니다.
pub fn std_dev(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// 정렬된 표본에서 선형 보간 백분위를 구합니다.
///
/// `pct`는 0~100 범위로 잘립니다. 빈 표본이면 0입니다.
pub fn percentile(sorted: &[f64], pct: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = pct.clamp(0.0, 100.0) / 100.0 * (n - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            let weight = rank - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * weight
        }
    }
}

/// 가치 곡선에서 최대 낙폭(MDD)을 계산합니다.
///
/// # 계산 공식
///
/// MDD = (고점 - 저점) / 고점
///
/// # 예시
///
/// 1000 → 1200(고점) → 1080(저점) → 1300 이면 MDD = 0.10
pub fn max_drawdown(values: &[f64]) -> f64 {
    let Some(&first) = values.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_drawdown: f64 = 0.0;
    for &value in values {
        if value > peak {
            peak = value;
        }
        if peak > 0.0 {
            max_drawdown = max_drawdown.max((peak - value) / peak);
        }
    }
    max_drawdown
}

/// 가치 시계열에서 스냅샷 지표를 산출합니다.
///
/// 값이 2개 미만이면 모든 지표가 0이고 리스크 수준은 비워 둡니다.
pub fn snapshot_metrics(values: &[f64], risk_free_rate: f64) -> SnapshotMetrics {
    let returns = daily_returns(values);
    if returns.is_empty() {
        return SnapshotMetrics {
            volatility: Some(0.0),
            max_drawdown: Some(0.0),
            sharpe: Some(0.0),
            value_at_risk: Some(0.0),
            risk_level: None,
        };
    }

    let daily_vol = std_dev(&returns);
    let volatility = daily_vol * DAYS_PER_YEAR.sqrt();

    let mut sorted = returns.clone();
    sorted.sort_by(f64::total_cmp);
    let value_at_risk = (-percentile(&sorted, VAR_PERCENTILE)).max(0.0);

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let sharpe = if volatility > 0.0 {
        (mean * DAYS_PER_YEAR - risk_free_rate) / volatility
    } else {
        0.0
    };

    SnapshotMetrics {
        volatility: Some(volatility),
        max_drawdown: Some(max_drawdown(values)),
        sharpe: Some(sharpe),
        value_at_risk: Some(value_at_risk),
        risk_level: Some(RiskLevel::from_volatility(volatility)),
    }
}
