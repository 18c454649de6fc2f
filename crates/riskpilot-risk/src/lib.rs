//! 적응형 리스크 파라미터 시스템.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 거래 원장 및 연속 승패 추적
//! - 수익률 표준편차 기반 변동성 추정
//! - 연속 승패/변동성 규칙에 따른 파라미터 조정
//! - 선형 회귀 + 그리드 탐색 기반 파라미터 최적화
//! - 경보 수준에 따른 세션 단위 조정
//!
//! # 예제
//!
//! ```rust,ignore
//! use riskpilot_risk::{AdaptiveRiskConfig, AdaptiveRiskManager};
//! use riskpilot_core::AlertLevel;
//!
//! let mut manager = AdaptiveRiskManager::new("BTC/USDT", AdaptiveRiskConfig::default());
//!
//! manager.record_trade(outcome)?;
//! manager.update_volatility(&recent_prices);
//! let report = manager.adapt();
//!
//! // 다음 주문에 사용할 파라미터
//! let params = manager.session_parameters(AlertLevel::High);
//! ```

pub mod adapter;
pub mod config;
pub mod context;
pub mod ledger;
pub mod manager;
pub mod optimizer;
pub mod regression;
pub mod volatility;

// 주요 타입 재내보내기
pub use adapter::{AppliedRule, RuleBasedAdapter};
pub use config::{AdaptiveRiskConfig, ConfigValidationError};
pub use context::{apply_context_override, multipliers, OverrideMultipliers};
pub use ledger::{LedgerStats, StreakState, TradeLedger};
pub use manager::{AdaptationReport, AdaptiveRiskManager, AdaptiveRiskState, RiskBook};
pub use optimizer::{
    optimize_detached, OptimizationOutcome, OptimizationStatus, RegressionOptimizer, BLEND_WEIGHT,
};
pub use regression::LinearModel;
pub use volatility::{returns_std_dev, VolatilityEstimator, VolatilityReading, VolatilityStatus};
