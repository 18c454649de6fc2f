//! 적응형 리스크 설정.
//!
//! 파라미터 경계, 시작 파라미터, 규칙 임계값을 정의합니다.
//! 회귀 최적화의 EMA 혼합 가중치는 설정이 아닌 상수입니다 ([`crate::optimizer::BLEND_WEIGHT`]).

use riskpilot_core::{RiskBounds, RiskParameters, RiskSettings};
use serde::{Deserialize, Serialize};

/// 적응형 리스크 관리 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveRiskConfig {
    /// 파라미터 허용 범위
    #[serde(default)]
    pub bounds: RiskBounds,

    /// 시작 파라미터
    #[serde(default)]
    pub initial_parameters: RiskParameters,

    /// 규칙 기반 조정을 시작하기 위한 최소 거래 수 (기본값: 5)
    #[serde(default = "default_min_history_for_adaptation")]
    pub min_history_for_adaptation: usize,

    /// 포지션 축소를 유발하는 연속 손실 횟수 (기본값: 3)
    #[serde(default = "default_streak_threshold")]
    pub loss_streak_threshold: u32,

    /// 포지션 확대를 유발하는 연속 수익 횟수 (기본값: 3)
    #[serde(default = "default_streak_threshold")]
    pub win_streak_threshold: u32,

    /// 연속 손실 시 포지션 크기 배수 (기본값: 0.8)
    #[serde(default = "default_loss_streak_size_factor")]
    pub loss_streak_size_factor: f64,

    /// 연속 수익 시 포지션 크기 배수 (기본값: 1.1)
    #[serde(default = "default_win_streak_size_factor")]
    pub win_streak_size_factor: f64,

    /// 연속 손실 후 요구되는 최소 손익비 (기본값: 2.5)
    #[serde(default = "default_loss_streak_risk_reward")]
    pub loss_streak_risk_reward: f64,

    /// 변동성 → 손절 배수 변환 계수 (기본값: 10)
    #[serde(default = "default_volatility_multiplier")]
    pub volatility_multiplier: f64,

    /// 변동성 손절 배수 상한 (기본값: 3, 하한은 항상 1)
    #[serde(default = "default_max_volatility_factor")]
    pub max_volatility_factor: f64,

    /// 변동성 계산 윈도우 (기본값: 24)
    #[serde(default = "default_volatility_window")]
    pub volatility_window: usize,

    /// 회귀 최적화를 시작하기 위한 최소 거래 수 (기본값: 20)
    #[serde(default = "default_min_history_for_optimization")]
    pub min_history_for_optimization: usize,

    /// 축당 그리드 포인트 수 (기본값: 5 → 125개 후보)
    #[serde(default = "default_grid_resolution")]
    pub grid_resolution: usize,

    /// 그리드 탐색의 최소 포지션 크기 (기본값: 0.05)
    #[serde(default = "default_min_grid_position_size")]
    pub min_grid_position_size: f64,

    /// 원장 최대 보관 거래 수 (None = 무제한)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_history: Option<usize>,
}

// 기본값 함수들
fn default_min_history_for_adaptation() -> usize {
    5
}

fn default_streak_threshold() -> u32 {
    3
}

fn default_loss_streak_size_factor() -> f64 {
    0.8
}

fn default_win_streak_size_factor() -> f64 {
    1.1
}

fn default_loss_streak_risk_reward() -> f64 {
    2.5
}

fn default_volatility_multiplier() -> f64 {
    10.0
}

fn default_max_volatility_factor() -> f64 {
    3.0
}

fn default_volatility_window() -> usize {
    24
}

fn default_min_history_for_optimization() -> usize {
    20
}

fn default_grid_resolution() -> usize {
    5
}

fn default_min_grid_position_size() -> f64 {
    0.05
}

impl Default for AdaptiveRiskConfig {
    fn default() -> Self {
        Self {
            bounds: RiskBounds::default(),
            initial_parameters: RiskParameters::default(),
            min_history_for_adaptation: default_min_history_for_adaptation(),
            loss_streak_threshold: default_streak_threshold(),
            win_streak_threshold: default_streak_threshold(),
            loss_streak_size_factor: default_loss_streak_size_factor(),
            win_streak_size_factor: default_win_streak_size_factor(),
            loss_streak_risk_reward: default_loss_streak_risk_reward(),
            volatility_multiplier: default_volatility_multiplier(),
            max_volatility_factor: default_max_volatility_factor(),
            volatility_window: default_volatility_window(),
            min_history_for_optimization: default_min_history_for_optimization(),
            grid_resolution: default_grid_resolution(),
            min_grid_position_size: default_min_grid_position_size(),
            max_history: None,
        }
    }
}

impl AdaptiveRiskConfig {
    /// 기본값으로 새 설정을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 애플리케이션 설정의 리스크 섹션으로 생성합니다. 규칙 임계값은 기본값을 사용합니다.
    pub fn from_settings(settings: &RiskSettings) -> Self {
        Self {
            bounds: settings.bounds,
            initial_parameters: settings.initial,
            volatility_window: settings.volatility_window,
            max_history: settings.max_history,
            ..Self::default()
        }
    }

    /// 보수적인 설정 (작은 포지션, 빠른 축소).
    pub fn conservative() -> Self {
        Self {
            bounds: RiskBounds {
                min_stop_loss: 0.01,
                max_stop_loss: 0.05,
                min_position_size: 0.001,
                max_position_size: 0.10,
            },
            initial_parameters: RiskParameters::new(0.015, 0.03, 0.05),
            loss_streak_threshold: 2,
            win_streak_threshold: 4,
            loss_streak_size_factor: 0.7,
            win_streak_size_factor: 1.05,
            min_grid_position_size: 0.02,
            ..Self::default()
        }
    }

    /// 공격적인 설정 (큰 포지션, 넓은 손절).
    pub fn aggressive() -> Self {
        Self {
            bounds: RiskBounds {
                min_stop_loss: 0.02,
                max_stop_loss: 0.15,
                min_position_size: 0.001,
                max_position_size: 0.40,
            },
            initial_parameters: RiskParameters::new(0.03, 0.06, 0.15),
            loss_streak_threshold: 4,
            win_streak_threshold: 2,
            win_streak_size_factor: 1.2,
            ..Self::default()
        }
    }

    /// 설정 값을 검증합니다.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.bounds
            .check()
            .map_err(|e| ConfigValidationError::InvalidValue(e.to_string()))?;

        self.bounds
            .validate(&self.initial_parameters)
            .map_err(|e| {
                ConfigValidationError::InvalidValue(format!("initial_parameters: {e}"))
            })?;

        if !(self.loss_streak_size_factor > 0.0 && self.loss_streak_size_factor < 1.0) {
            return Err(ConfigValidationError::InvalidValue(
                "loss_streak_size_factor must be between 0 and 1".into(),
            ));
        }

        if self.win_streak_size_factor < 1.0 {
            return Err(ConfigValidationError::InvalidValue(
                "win_streak_size_factor must be at least 1".into(),
            ));
        }

        if self.loss_streak_risk_reward < riskpilot_core::MIN_RISK_REWARD {
            return Err(ConfigValidationError::InvalidValue(format!(
                "loss_streak_risk_reward must be at least {}",
                riskpilot_core::MIN_RISK_REWARD
            )));
        }

        if self.volatility_multiplier <= 0.0 || self.max_volatility_factor < 1.0 {
            return Err(ConfigValidationError::InvalidValue(
                "volatility_multiplier must be positive and max_volatility_factor at least 1"
                    .into(),
            ));
        }

        if self.volatility_window < 2 {
            return Err(ConfigValidationError::InvalidValue(
                "volatility_window must be at least 2".into(),
            ));
        }

        if self.grid_resolution < 2 {
            return Err(ConfigValidationError::InvalidValue(
                "grid_resolution must be at least 2".into(),
            ));
        }

        if self.min_grid_position_size <= 0.0 {
            return Err(ConfigValidationError::InvalidValue(
                "min_grid_position_size must be greater than 0".into(),
            ));
        }

        if self.max_history == Some(0) {
            return Err(ConfigValidationError::InvalidValue(
                "max_history must be greater than 0 when set".into(),
            ));
        }

        Ok(())
    }
}

/// 설정 검증 오류.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AdaptiveRiskConfig::default();

        assert_eq!(config.min_history_for_adaptation, 5);
        assert_eq!(config.min_history_for_optimization, 20);
        assert_eq!(config.loss_streak_threshold, 3);
        assert_eq!(config.win_streak_threshold, 3);
        assert_eq!(config.volatility_window, 24);
        assert_eq!(config.grid_resolution, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(AdaptiveRiskConfig::conservative().validate().is_ok());
        assert!(AdaptiveRiskConfig::aggressive().validate().is_ok());
        assert!(
            AdaptiveRiskConfig::conservative().bounds.max_position_size
                < AdaptiveRiskConfig::aggressive().bounds.max_position_size
        );
    }

    #[test]
    fn test_config_validation() {
        let mut invalid = AdaptiveRiskConfig::default();
        invalid.loss_streak_size_factor = 1.2;
        assert!(invalid.validate().is_err());

        let mut invalid = AdaptiveRiskConfig::default();
        invalid.initial_parameters = RiskParameters::new(0.5, 1.0, 0.1);
        assert!(invalid.validate().is_err());

        let mut invalid = AdaptiveRiskConfig::default();
        invalid.volatility_window = 1;
        assert!(invalid.validate().is_err());

        let mut invalid = AdaptiveRiskConfig::default();
        invalid.max_history = Some(0);
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_from_settings() {
        let settings = RiskSettings {
            volatility_window: 48,
            max_history: Some(200),
            ..Default::default()
        };
        let config = AdaptiveRiskConfig::from_settings(&settings);

        assert_eq!(config.volatility_window, 48);
        assert_eq!(config.max_history, Some(200));
        assert_eq!(config.min_history_for_adaptation, 5);
    }

    #[test]
    fn test_config_serialization_defaults() {
        let config: AdaptiveRiskConfig =
            serde_json::from_str(r#"{"loss_streak_threshold": 4}"#).unwrap();
        assert_eq!(config.loss_streak_threshold, 4);
        assert_eq!(config.win_streak_threshold, 3);
        assert_eq!(config.bounds, RiskBounds::default());
    }
}
