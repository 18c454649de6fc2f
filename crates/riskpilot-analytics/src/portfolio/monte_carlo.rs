//! 시드 고정 Monte Carlo 요약.
//!
//! 각 경로는 일간 `1 + μ + σ·z` 배수로 가치를 갱신합니다 (z ~ N(0,1)).
//! 같은 시드와 입력은 항상 같은 요약을 만듭니다.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use riskpilot_core::{ProjectionScenario, RiskError, RiskResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::projection::MAX_DAILY_DECLINE;
use crate::performance::metrics::{percentile, DAYS_PER_YEAR};

/// 최종 가치 분포 요약.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloSummary {
    /// 경로 수
    pub paths: usize,
    /// 사용한 시드
    pub seed: u64,
    /// 투영 일수
    pub days: u32,
    /// 최종 가치 평균
    pub mean: f64,
    /// 최종 가치 중앙값
    pub median: f64,
    /// 최종 가치 5번째 백분위
    pub p5: f64,
    /// 최종 가치 95번째 백분위
    pub p95: f64,
    /// 최종 가치가 투입 원금(초기 + 적립)보다 작은 경로 비율
    pub probability_of_loss: f64,
}

/// 시나리오의 최종 가치 분포를 시뮬레이션합니다.
pub fn simulate(
    scenario: &ProjectionScenario,
    paths: usize,
    seed: u64,
) -> RiskResult<MonteCarloSummary> {
    scenario.validate()?;
    if paths == 0 {
        return Err(RiskError::InvalidInput(
            "monte carlo path count must be positive".to_string(),
        ));
    }
    let days = scenario.horizon.to_days()?;

    let daily_return = (1.0 + scenario.annual_return).powf(1.0 / DAYS_PER_YEAR) - 1.0;
    let daily_volatility = scenario.annual_volatility / DAYS_PER_YEAR.sqrt();
    let floor = 1.0 + MAX_DAILY_DECLINE;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut terminals = Vec::with_capacity(paths);
    let mut invested = scenario.initial_value;
    if let Some(c) = &scenario.contribution {
        invested += (1..=days).filter(|d| c.is_due(*d)).count() as f64 * c.amount;
    }

    for _ in 0..paths {
        let mut value = scenario.initial_value;
        for day in 1..=days {
            let z: f64 = StandardNormal.sample(&mut rng);
            let growth = 1.0 + daily_return + daily_volatility * z;
            value *= growth.max(floor);
            if let Some(c) = &scenario.contribution {
                if c.is_due(day) {
                    value += c.amount;
                }
            }
        }
        terminals.push(value);
    }

    terminals.sort_by(f64::total_cmp);
    let mean = terminals.iter().sum::<f64>() / paths as f64;
    let losses = terminals.iter().filter(|v| **v < invested).count();

    let summary = MonteCarloSummary {
        paths,
        seed,
        days,
        mean,
        median: percentile(&terminals, 50.0),
        p5: percentile(&terminals, 5.0),
        p95: percentile(&terminals, 95.0),
        probability_of_loss: losses as f64 / paths as f64,
    };

    debug!(
        paths,
        seed,
        mean = summary.mean,
        p5 = summary.p5,
        p95 = summary.p95,
        "Monte Carlo 시뮬레이션 완료"
    );

    Ok(summary)
}
