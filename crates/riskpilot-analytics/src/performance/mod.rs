//! 성과 지표 모듈
//!
//! 포트폴리오 가치 시계열에서 리스크 지표를 계산합니다.
//!
//! # 주요 지표
//!
//! - **변동성**: 일간 수익률 표준편차 × √365
//! - **VaR (95%)**: 일간 수익률 5번째 백분위의 손실 크기
//! - **MDD**: 고점 대비 최대 하락 비율
//! - **샤프 비율**: (연율 수익률 - 무위험 이자율) / 연율 변동성

pub mod metrics;

pub use metrics::*;
