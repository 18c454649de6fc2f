//! 포트폴리오 가치 투영.
//!
//! 기대 경로는 일간 기대 수익률을 복리로 적용하고, 낙관/비관 경로는
//! 일간 기대 수익률 ± 1.645 × 일간 변동성의 고정 드리프트를 전체 기간에 적용합니다.
//! 난수를 쓰지 않는 결정적 백분위 구간입니다.

use riskpilot_core::{ProjectionScenario, ProjectionSettings, RiskResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::monte_carlo::{simulate, MonteCarloSummary};
use crate::performance::metrics::DAYS_PER_YEAR;

/// 단측 90% 정규 구간 z값.
pub const ONE_SIDED_Z_90: f64 = 1.645;

/// 비관 경로의 일간 하락 한도 (-99%).
pub const MAX_DAILY_DECLINE: f64 = -0.99;

/// 경로 위의 한 점.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    /// 경과 일수 (0 = 시작)
    pub day: u32,
    /// 포트폴리오 가치
    pub value: f64,
}

/// 투영 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// 투영 일수
    pub days: u32,
    /// 요청 시드
    pub seed: Option<u64>,
    /// 일간 기대 수익률
    pub daily_return: f64,
    /// 일간 변동성
    pub daily_volatility: f64,
    /// 기대 경로
    pub expected_path: Vec<ProjectionPoint>,
    /// 낙관 경로 (상위 5%)
    pub optimistic_path: Vec<ProjectionPoint>,
    /// 비관 경로 (하위 5%)
    pub pessimistic_path: Vec<ProjectionPoint>,
    /// 기대 최종 가치
    pub expected_terminal: f64,
    /// 낙관 최종 가치
    pub optimistic_terminal: f64,
    /// 비관 최종 가치
    pub pessimistic_terminal: f64,
    /// 기간 중 적립 총액
    pub total_contributions: f64,
}

/// 시나리오를 투영합니다.
///
/// 결과는 입력과 시드에만 의존합니다. 음수 기간이나 잘못된 입력은 `InvalidInput`입니다.
pub fn project(scenario: &ProjectionScenario, seed: Option<u64>) -> RiskResult<ProjectionResult> {
    scenario.validate()?;
    let days = scenario.horizon.to_days()?;

    let daily_return = (1.0 + scenario.annual_return).powf(1.0 / DAYS_PER_YEAR) - 1.0;
    let daily_volatility = scenario.annual_volatility / DAYS_PER_YEAR.sqrt();

    let optimistic_drift = daily_return + ONE_SIDED_Z_90 * daily_volatility;
    let pessimistic_drift = (daily_return - ONE_SIDED_Z_90 * daily_volatility).max(MAX_DAILY_DECLINE);

    let expected_path = compound_path(scenario, days, daily_return);
    let optimistic_path = compound_path(scenario, days, optimistic_drift);
    let pessimistic_path = compound_path(scenario, days, pessimistic_drift);

    let total_contributions = scenario
        .contribution
        .map(|c| (1..=days).filter(|d| c.is_due(*d)).count() as f64 * c.amount)
        .unwrap_or(0.0);

    let terminal = |path: &[ProjectionPoint]| {
        path.last()
            .map(|p| p.value)
            .unwrap_or(scenario.initial_value)
    };
    let result = ProjectionResult {
        days,
        seed,
        daily_return,
        daily_volatility,
        expected_terminal: terminal(&expected_path),
        optimistic_terminal: terminal(&optimistic_path),
        pessimistic_terminal: terminal(&pessimistic_path),
        expected_path,
        optimistic_path,
        pessimistic_path,
        total_contributions,
    };

    debug!(
        days,
        expected = result.expected_terminal,
        optimistic = result.optimistic_terminal,
        pessimistic = result.pessimistic_terminal,
        "포트폴리오 투영 완료"
    );

    Ok(result)
}

/// 고정 일간 드리프트로 경로를 만듭니다. 적립금은 해당일 마지막에 더합니다.
fn compound_path(scenario: &ProjectionScenario, days: u32, drift: f64) -> Vec<ProjectionPoint> {
    let mut value = scenario.initial_value;
    let mut path = Vec::with_capacity(days as usize + 1);
    path.push(ProjectionPoint { day: 0, value });

    for day in 1..=days {
        value *= 1.0 + drift;
        if let Some(contribution) = &scenario.contribution {
            if contribution.is_due(day) {
                value += contribution.amount;
            }
        }
        path.push(ProjectionPoint { day, value });
    }
    path
}

/// 설정을 보관하는 투영기.
///
/// 요청에 시드가 없으면 설정의 기본 시드를 사용합니다.
#[derive(Debug, Clone, Default)]
pub struct PortfolioProjector {
    settings: ProjectionSettings,
}

impl PortfolioProjector {
    /// 새 투영기를 생성합니다.
    pub fn new(settings: ProjectionSettings) -> Self {
        Self { settings }
    }

    /// 설정을 반환합니다.
    pub fn settings(&self) -> &ProjectionSettings {
        &self.settings
    }

    /// 백분위 경로를 투영합니다.
    pub fn project(
        &self,
        scenario: &ProjectionScenario,
        seed: Option<u64>,
    ) -> RiskResult<ProjectionResult> {
        project(scenario, Some(seed.unwrap_or(self.settings.default_seed)))
    }

    /// 설정된 경로 수로 Monte Carlo 요약을 계산합니다.
    pub fn simulate(
        &self,
        scenario: &ProjectionScenario,
        seed: Option<u64>,
    ) -> RiskResult<MonteCarloSummary> {
        simulate(
            scenario,
            self.settings.monte_carlo_paths,
            seed.unwrap_or(self.settings.default_seed),
        )
    }
}
