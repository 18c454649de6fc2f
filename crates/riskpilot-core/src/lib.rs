//! # RiskPilot Core
//!
//! 적응형 리스크 엔진의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 리스크/포트폴리오 크레이트 전반에서 사용되는 기본 타입을 제공합니다:
//! - 거래 결과 기록 (`TradeOutcome`)
//! - 리스크 파라미터와 경계값 (`RiskParameters`, `RiskBounds`)
//! - 외부 경보 수준 (`AlertLevel`)
//! - 포트폴리오 시나리오 및 스냅샷 지표
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
