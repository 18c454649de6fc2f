//! 로깅 초기화.
//!
//! `[logging]` 설정 섹션에서 `EnvFilter`와 fmt 레이어 하나를 구성합니다.
//! 적응 경로의 로그는 [`adaptation_span!`](crate::adaptation_span)으로 심볼 컨텍스트를 얻습니다.

use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::config::LoggingConfig;
use crate::error::{RiskError, RiskResult};

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 색상이 포함된 사람이 읽기 쉬운 형식 (개발용)
    #[default]
    Pretty,
    /// 로그 집계용 JSON 형식 (운영용)
    Json,
    /// 간결한 한 줄 형식
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(RiskError::Config(format!("unknown log format: {other}"))),
        }
    }
}

/// 구독자 초기화 옵션.
///
/// 보통 [`LoggingConfig`]에서 만들고, CLI 플래그로 형식과 span 출력만 덮어씁니다.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// `EnvFilter` 지시문 (예: "info", "riskpilot_risk=debug")
    pub filter: String,
    /// 출력 형식
    pub format: LogFormat,
    /// 적응 span의 생성/종료 이벤트 출력 여부
    pub span_events: bool,
}

impl LogConfig {
    /// 필터 지시문으로 생성합니다.
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            ..Default::default()
        }
    }

    /// 출력 형식을 바꿉니다.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// span 이벤트 출력을 켜거나 끕니다.
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }
}

impl From<&LoggingConfig> for LogConfig {
    /// 알 수 없는 형식 문자열은 pretty로 대체됩니다.
    fn from(config: &LoggingConfig) -> Self {
        Self {
            filter: config.level.clone(),
            format: config.format.parse().unwrap_or_default(),
            span_events: config.span_events,
        }
    }
}

fn fmt_layer<S>(config: &LogConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };
    let layer = fmt::layer().with_span_events(span_events);

    match config.format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Json => layer.json().flatten_event(true).boxed(),
        LogFormat::Compact => layer.compact().with_target(false).boxed(),
    }
}

/// 전역 tracing 구독자를 설치합니다.
///
/// `RUST_LOG`가 있으면 `config.filter`보다 우선합니다.
/// 잘못된 필터나 중복 설치는 `RiskError::Config`입니다.
///
/// ```no_run
/// use riskpilot_core::logging::{init_logging, LogConfig, LogFormat};
///
/// init_logging(LogConfig::new("riskpilot_risk=debug").with_format(LogFormat::Json))?;
/// # Ok::<(), riskpilot_core::RiskError>(())
/// ```
pub fn init_logging(config: LogConfig) -> RiskResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|e| RiskError::Config(format!("invalid log filter {:?}: {e}", config.filter)))?;

    tracing_subscriber::registry()
        .with(fmt_layer(&config))
        .with(env_filter)
        .try_init()
        .map_err(|e| RiskError::Config(format!("logging already initialized: {e}")))?;

    tracing::debug!(format = ?config.format, filter = %config.filter, "Logging initialized");
    Ok(())
}

/// 심볼 컨텍스트가 포함된 적응 span을 생성하는 매크로.
#[macro_export]
macro_rules! adaptation_span {
    ($name:expr, $symbol:expr) => {
        tracing::info_span!($name, symbol = %$symbol)
    };
    ($name:expr, $symbol:expr, $alert:expr) => {
        tracing::info_span!($name, symbol = %$symbol, alert = ?$alert)
    };
}
