//! 포트폴리오 가치 투영 명령.

use anyhow::Result;
use riskpilot_analytics::{MonteCarloSummary, PortfolioProjector, ProjectionResult};
use riskpilot_core::{Horizon, HorizonUnit, ProjectionScenario};
use serde::Serialize;

/// 투영 명령 설정.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    /// 시나리오
    pub scenario: ProjectionScenario,
    /// 시드 (없으면 설정 기본값)
    pub seed: Option<u64>,
    /// Monte Carlo 요약 포함 여부
    pub monte_carlo: bool,
    /// 경로 전체 출력 여부 (false면 최종 값만)
    pub full_paths: bool,
}

/// 투영 출력.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    /// 투영 결과
    pub projection: ProjectionResult,
    /// Monte Carlo 요약
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monte_carlo: Option<MonteCarloSummary>,
}

/// `"365d"`, `"2y"`, `"6m"`, `"12w"` 형식의 기간을 파싱합니다. 단위가 없으면 일입니다.
///
/// 환산 일수가 [`MAX_HORIZON_DAYS`](riskpilot_core::MAX_HORIZON_DAYS)를 넘으면 거부합니다.
pub fn parse_horizon(s: &str) -> Result<Horizon> {
    let s = s.trim();
    let split = s
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(s.len());
    let (value, unit) = s.split_at(split);
    let value: i64 = value
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid horizon: {s}. Use e.g. 365d, 12w, 6m, 2y"))?;
    let unit = if unit.is_empty() {
        HorizonUnit::Days
    } else {
        unit.parse()?
    };
    let horizon = Horizon { value, unit };
    horizon.to_days()?;
    Ok(horizon)
}

/// 투영 명령을 실행합니다.
pub fn run_project(config: ProjectConfig, projector: &PortfolioProjector) -> Result<ProjectReport> {
    let mut projection = projector.project(&config.scenario, config.seed)?;
    let monte_carlo = if config.monte_carlo {
        Some(projector.simulate(&config.scenario, config.seed)?)
    } else {
        None
    };

    if !config.full_paths {
        // 시작점과 최종점만 남김
        for path in [
            &mut projection.expected_path,
            &mut projection.optimistic_path,
            &mut projection.pessimistic_path,
        ] {
            if path.len() > 2 {
                let last = path[path.len() - 1];
                path.truncate(1);
                path.push(last);
            }
        }
    }

    Ok(ProjectReport {
        projection,
        monte_carlo,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_horizon() {
        assert_eq!(parse_horizon("365").unwrap(), Horizon::days(365));
        assert_eq!(parse_horizon("30d").unwrap(), Horizon::days(30));
        let horizon = parse_horizon("2y").unwrap();
        assert_eq!(horizon.unit, HorizonUnit::Years);
        assert_eq!(horizon.value, 2);
        assert!(parse_horizon("abc").is_err());
        assert!(parse_horizon("10q").is_err());
    }

    #[test]
    fn test_parse_horizon_rejects_oversized() {
        assert!(parse_horizon("100y").is_ok());
        assert!(parse_horizon("11000000y").is_err());
        assert!(parse_horizon("4000000000d").is_err());
    }

    #[test]
    fn test_compact_paths() {
        let config = ProjectConfig {
            scenario: ProjectionScenario::new(10_000.0, 0.10, 0.30, Horizon::days(365)),
            seed: Some(42),
            monte_carlo: true,
            full_paths: false,
        };
        let report = run_project(config, &PortfolioProjector::default()).unwrap();

        assert_eq!(report.projection.expected_path.len(), 2);
        assert_eq!(report.projection.expected_path[1].day, 365);
        assert!(report.monte_carlo.is_some());
    }
}
