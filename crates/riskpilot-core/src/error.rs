//! 리스크 코어의 에러 타입.
//!
//! 에러는 두 부류로 나뉩니다:
//! - 호출자 입력 오류: 즉시 반환되며 입력을 고치기 전에는 재시도하면 안 됩니다.
//! - 소프트 오류(데이터 부족, 모델 적합 실패): 이전 상태를 유지한 채 흡수됩니다.

use thiserror::Error;

/// 리스크 코어 에러.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    /// 잘못된 거래 결과 (진입가 ≤ 0 등)
    #[error("잘못된 거래 결과: {0}")]
    InvalidOutcome(String),

    /// 잘못된 입력 (배분 비중 합계, 음수 기간 등)
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 신호를 계산하기 위한 데이터 부족
    #[error("데이터 부족: {required}개 필요, {actual}개 보유")]
    InsufficientData { required: usize, actual: usize },

    /// 회귀 모델 적합 실패 (특이 행렬, 상수 타깃 등)
    #[error("모델 적합 실패: {0}")]
    ModelFit(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),
}

/// 리스크 코어 작업을 위한 Result 타입.
pub type RiskResult<T> = Result<T, RiskError>;

impl RiskError {
    /// 이전 상태를 유지하고 계속 진행해야 하는 소프트 에러인지 확인합니다.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            RiskError::InsufficientData { .. } | RiskError::ModelFit(_)
        )
    }

    /// 호출자가 입력을 고쳐야 하는 에러인지 확인합니다.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            RiskError::InvalidOutcome(_) | RiskError::InvalidInput(_)
        )
    }
}

impl From<serde_json::Error> for RiskError {
    fn from(err: serde_json::Error) -> Self {
        RiskError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for RiskError {
    fn from(err: config::ConfigError) -> Self {
        RiskError::Config(err.to_string())
    }
}
