//! 포트폴리오 분석 모듈
//!
//! # 모듈 구성
//!
//! - [`projection`]: 기대/낙관/비관 경로 투영
//! - [`monte_carlo`]: 시드 고정 Monte Carlo 요약
//! - [`risk_score`]: 분산도 기반 리스크 요약
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use riskpilot_analytics::portfolio::{project, score};
//! use riskpilot_core::{Horizon, ProjectionScenario, SnapshotMetrics};
//!
//! let scenario = ProjectionScenario::new(10_000.0, 0.10, 0.30, Horizon::days(365));
//! let result = project(&scenario, Some(42))?;
//! println!("기대 가치: {:.2}", result.expected_terminal);
//!
//! let summary = score(&[0.5, 0.3, 0.2], &SnapshotMetrics::default())?;
//! println!("분산도: {:.2}", summary.diversification_score);
//! ```

pub mod monte_carlo;
pub mod projection;
pub mod risk_score;

pub use monte_carlo::*;
pub use projection::*;
pub use risk_score::*;
