//! RiskPilot CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 거래 기록 재생 및 리스크 파라미터 적응
//! - 포트폴리오 가치 투영
//! - 포트폴리오 리스크 점수
//! - 가치 시계열 지표 계산

pub mod commands;
