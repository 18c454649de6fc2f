//! 설정 관리.
//!
//! 기본값 → (선택적) TOML 파일 → `RISKPILOT__` 접두사 환경 변수 순으로 병합합니다.
//!
//! ```toml
//! [logging]
//! level = "info"
//! format = "json"
//!
//! [risk.bounds]
//! max_stop_loss = 0.08
//!
//! [projection]
//! monte_carlo_paths = 2000
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::{RiskBounds, RiskParameters};
use crate::error::RiskResult;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 리스크 파라미터 설정
    pub risk: RiskSettings,
    /// 포트폴리오 투영 설정
    pub projection: ProjectionSettings,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
    /// 적응 span 생성/종료 이벤트 출력 여부
    pub span_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            span_events: false,
        }
    }
}

/// 리스크 파라미터 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RiskSettings {
    /// 파라미터 허용 범위
    pub bounds: RiskBounds,
    /// 시작 파라미터
    pub initial: RiskParameters,
    /// 변동성 계산 윈도우 (가격 샘플 수)
    pub volatility_window: usize,
    /// 원장 최대 보관 거래 수 (None = 무제한)
    pub max_history: Option<usize>,
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self {
            bounds: RiskBounds::default(),
            initial: RiskParameters::default(),
            volatility_window: 24,
            max_history: None,
        }
    }
}

/// 포트폴리오 투영 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProjectionSettings {
    /// 요청에 시드가 없을 때 사용할 시드
    pub default_seed: u64,
    /// Monte Carlo 경로 수
    pub monte_carlo_paths: usize,
    /// 샤프 비율 계산용 연율 무위험 이자율
    pub risk_free_rate: f64,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            default_seed: 42,
            monte_carlo_paths: 1000,
            risk_free_rate: 0.0,
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다. 파일이 없으면 기본값을 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> RiskResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("RISKPILOT")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.risk.bounds.check()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> RiskResult<Self> {
        Self::load("config/riskpilot.toml")
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn from_toml_str(toml: &str) -> RiskResult<Self> {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.risk.bounds.check()?;
        Ok(config)
    }
}
