//! 리스크 파라미터와 경계값.
//!
//! 세 파라미터(손절, 익절, 포지션 크기)는 모두 (0, 1] 구간의 비율입니다.
//! 모든 변경 이후 다음 불변식이 유지되어야 합니다:
//! - `min_stop_loss ≤ stop_loss ≤ max_stop_loss`
//! - `0 < position_size ≤ max_position_size`
//! - `take_profit ≥ 1.5 × stop_loss`

use serde::{Deserialize, Serialize};

use crate::error::{RiskError, RiskResult};

/// 최소 손익비 (take_profit / stop_loss).
pub const MIN_RISK_REWARD: f64 = 1.5;

/// 거래 결정에 사용되는 리스크 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskParameters {
    /// 진입가 대비 손절 비율 (예: 0.02 = 2%)
    pub stop_loss: f64,
    /// 진입가 대비 익절 비율
    pub take_profit: f64,
    /// 자본 대비 포지션 크기 비율
    pub position_size: f64,
}

impl RiskParameters {
    /// 새 파라미터를 생성합니다. 경계 검증은 [`RiskBounds::validate`]에서 수행합니다.
    pub fn new(stop_loss: f64, take_profit: f64, position_size: f64) -> Self {
        Self {
            stop_loss,
            take_profit,
            position_size,
        }
    }

    /// 손익비 (take_profit / stop_loss).
    pub fn risk_reward(&self) -> f64 {
        if self.stop_loss > 0.0 {
            self.take_profit / self.stop_loss
        } else {
            0.0
        }
    }
}

impl Default for RiskParameters {
    fn default() -> Self {
        Self {
            stop_loss: 0.02,
            take_profit: 0.04,
            position_size: 0.10,
        }
    }
}

/// 리스크 파라미터의 허용 범위.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskBounds {
    /// 최소 손절 비율
    pub min_stop_loss: f64,
    /// 최대 손절 비율
    pub max_stop_loss: f64,
    /// 최소 포지션 크기 (0보다 커야 함)
    pub min_position_size: f64,
    /// 최대 포지션 크기
    pub max_position_size: f64,
}

impl Default for RiskBounds {
    fn default() -> Self {
        Self {
            min_stop_loss: 0.01,
            max_stop_loss: 0.10,
            min_position_size: 0.001,
            max_position_size: 0.20,
        }
    }
}

impl RiskBounds {
    /// 경계값 자체의 일관성을 검증합니다.
    pub fn check(&self) -> RiskResult<()> {
        if !(self.min_stop_loss > 0.0 && self.min_stop_loss <= self.max_stop_loss) {
            return Err(RiskError::Config(format!(
                "stop loss bounds must satisfy 0 < min ({}) <= max ({})",
                self.min_stop_loss, self.max_stop_loss
            )));
        }
        if self.max_stop_loss > 1.0 {
            return Err(RiskError::Config(format!(
                "max_stop_loss must be <= 1, got {}",
                self.max_stop_loss
            )));
        }
        if !(self.min_position_size > 0.0 && self.min_position_size <= self.max_position_size)
            || self.max_position_size > 1.0
        {
            return Err(RiskError::Config(format!(
                "position size bounds must satisfy 0 < min ({}) <= max ({}) <= 1",
                self.min_position_size, self.max_position_size
            )));
        }
        Ok(())
    }

    /// 파라미터가 모든 불변식을 만족하는지 검증합니다.
    pub fn validate(&self, params: &RiskParameters) -> RiskResult<()> {
        if params.stop_loss < self.min_stop_loss || params.stop_loss > self.max_stop_loss {
            return Err(RiskError::InvalidInput(format!(
                "stop_loss {} outside [{}, {}]",
                params.stop_loss, self.min_stop_loss, self.max_stop_loss
            )));
        }
        if params.position_size <= 0.0 || params.position_size > self.max_position_size {
            return Err(RiskError::InvalidInput(format!(
                "position_size {} outside (0, {}]",
                params.position_size, self.max_position_size
            )));
        }
        if params.take_profit < MIN_RISK_REWARD * params.stop_loss {
            return Err(RiskError::InvalidInput(format!(
                "take_profit {} below {} x stop_loss {}",
                params.take_profit, MIN_RISK_REWARD, params.stop_loss
            )));
        }
        Ok(())
    }

    /// 손절 비율을 허용 범위로 제한합니다.
    pub fn clamp_stop_loss(&self, stop_loss: f64) -> f64 {
        stop_loss.clamp(self.min_stop_loss, self.max_stop_loss)
    }

    /// 포지션 크기를 허용 범위로 제한합니다.
    pub fn clamp_position_size(&self, position_size: f64) -> f64 {
        position_size.clamp(self.min_position_size, self.max_position_size)
    }

    /// 모든 불변식이 성립하도록 파라미터를 보정합니다.
    ///
    /// 범위를 벗어난 값은 경계로 잘리고, 익절은 최소 손익비까지만 올라갑니다.
    pub fn enforce(&self, params: RiskParameters) -> RiskParameters {
        let stop_loss = self.clamp_stop_loss(params.stop_loss);
        let position_size = self.clamp_position_size(params.position_size);
        let take_profit = params.take_profit.max(MIN_RISK_REWARD * stop_loss);

        RiskParameters {
            stop_loss,
            take_profit,
            position_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters_satisfy_default_bounds() {
        let bounds = RiskBounds::default();
        assert!(bounds.check().is_ok());
        assert!(bounds.validate(&RiskParameters::default()).is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_bounds() {
        let bounds = RiskBounds::default();

        let params = RiskParameters::new(0.5, 1.0, 0.1);
        assert!(bounds.validate(&params).is_err());

        let params = RiskParameters::new(0.02, 0.04, 0.0);
        assert!(bounds.validate(&params).is_err());

        // 손익비 1.0 < 1.5
        let params = RiskParameters::new(0.02, 0.02, 0.1);
        assert!(bounds.validate(&params).is_err());
    }

    #[test]
    fn test_enforce_clamps_and_raises_take_profit() {
        let bounds = RiskBounds::default();
        let params = bounds.enforce(RiskParameters::new(0.3, 0.05, 0.9));

        assert_eq!(params.stop_loss, 0.10);
        assert_eq!(params.position_size, 0.20);
        assert!((params.take_profit - 0.15).abs() < 1e-12);
        assert!(bounds.validate(&params).is_ok());
    }

    #[test]
    fn test_check_rejects_inverted_bounds() {
        let bounds = RiskBounds {
            min_stop_loss: 0.2,
            max_stop_loss: 0.1,
            ..Default::default()
        };
        assert!(bounds.check().is_err());
    }

    #[test]
    fn test_risk_reward() {
        let params = RiskParameters::new(0.02, 0.05, 0.1);
        assert!((params.risk_reward() - 2.5).abs() < 1e-12);
    }
}
