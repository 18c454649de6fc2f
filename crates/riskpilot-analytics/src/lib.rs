//! 포트폴리오 분석 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 포트폴리오 가치 투영 (백분위 경로 + 시드 고정 Monte Carlo 요약)
//! - 포트폴리오 리스크 점수 (분산도 + 스냅샷 지표)
//! - 가치 시계열에서 스냅샷 지표 산출
//!
//! # Re-exports
//!
//! - [`performance`]: 스냅샷 지표 계산 (변동성, VaR, MDD, 샤프 비율)
//! - [`portfolio`]: 투영과 리스크 점수 (PortfolioProjector, RiskSummary 등)

pub mod performance;
pub mod portfolio;

// Performance 모듈 re-exports
pub use performance::metrics::{
    daily_returns, max_drawdown, percentile, snapshot_metrics, std_dev, DAYS_PER_YEAR,
};

// Portfolio 모듈 re-exports
pub use portfolio::monte_carlo::{simulate, MonteCarloSummary};
pub use portfolio::projection::{
    project, PortfolioProjector, ProjectionPoint, ProjectionResult, MAX_DAILY_DECLINE,
    ONE_SIDED_Z_90,
};
pub use portfolio::risk_score::{diversification_score, score, RiskSummary, WEIGHT_SUM_TOLERANCE};
