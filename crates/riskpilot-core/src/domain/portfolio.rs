//! 포트폴리오 투영 시나리오와 스냅샷 지표.

use serde::{Deserialize, Serialize};

use crate::error::{RiskError, RiskResult};

/// 투영 기간 단위.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizonUnit {
    /// 일
    Days,
    /// 주 (7일)
    Weeks,
    /// 월 (30일)
    Months,
    /// 년 (365일)
    Years,
}

impl HorizonUnit {
    /// 단위당 일수.
    pub fn days(&self) -> u32 {
        match self {
            HorizonUnit::Days => 1,
            HorizonUnit::Weeks => 7,
            HorizonUnit::Months => 30,
            HorizonUnit::Years => 365,
        }
    }
}

impl std::str::FromStr for HorizonUnit {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "d" | "day" | "days" => Ok(HorizonUnit::Days),
            "w" | "week" | "weeks" => Ok(HorizonUnit::Weeks),
            "m" | "month" | "months" => Ok(HorizonUnit::Months),
            "y" | "year" | "years" => Ok(HorizonUnit::Years),
            other => Err(RiskError::InvalidInput(format!(
                "unknown horizon unit: {other}"
            ))),
        }
    }
}

/// 투영 기간 상한 (일). 약 100년입니다.
pub const MAX_HORIZON_DAYS: u32 = 36_500;

/// 투영 기간 (값 + 단위).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horizon {
    /// 기간 값 (음수 불가)
    pub value: i64,
    /// 기간 단위
    pub unit: HorizonUnit,
}

impl Horizon {
    /// 일 단위 기간.
    pub fn days(value: i64) -> Self {
        Self {
            value,
            unit: HorizonUnit::Days,
        }
    }

    /// 일수로 환산합니다.
    ///
    /// 음수 기간이나 [`MAX_HORIZON_DAYS`]를 넘는 기간은 `InvalidInput`입니다.
    pub fn to_days(&self) -> RiskResult<u32> {
        if self.value < 0 {
            return Err(RiskError::InvalidInput(format!(
                "horizon must not be negative, got {}",
                self.value
            )));
        }
        u32::try_from(self.value)
            .ok()
            .and_then(|v| v.checked_mul(self.unit.days()))
            .filter(|days| *days <= MAX_HORIZON_DAYS)
            .ok_or_else(|| {
                RiskError::InvalidInput(format!(
                    "horizon {} {:?} exceeds {MAX_HORIZON_DAYS} days",
                    self.value, self.unit
                ))
            })
    }
}

/// 정기 적립금.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    /// 적립 금액
    pub amount: f64,
    /// 적립 주기 (일)
    pub every_days: u32,
}

impl Contribution {
    /// 해당 일자(1부터 시작)가 적립일인지 확인합니다.
    pub fn is_due(&self, day: u32) -> bool {
        self.every_days > 0 && day % self.every_days == 0
    }
}

/// 포트폴리오 가치 투영 시나리오 입력.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionScenario {
    /// 초기 포트폴리오 가치
    pub initial_value: f64,
    /// 연율 기대 수익률 (예: 0.10 = 10%)
    pub annual_return: f64,
    /// 연율 변동성 (예: 0.30 = 30%)
    pub annual_volatility: f64,
    /// 투영 기간
    pub horizon: Horizon,
    /// 선택적 정기 적립금
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contribution: Option<Contribution>,
}

impl ProjectionScenario {
    /// 적립금 없는 시나리오를 생성합니다.
    pub fn new(
        initial_value: f64,
        annual_return: f64,
        annual_volatility: f64,
        horizon: Horizon,
    ) -> Self {
        Self {
            initial_value,
            annual_return,
            annual_volatility,
            horizon,
            contribution: None,
        }
    }

    /// 정기 적립금을 설정합니다.
    pub fn with_contribution(mut self, amount: f64, every_days: u32) -> Self {
        self.contribution = Some(Contribution { amount, every_days });
        self
    }

    /// 입력값을 검증합니다.
    pub fn validate(&self) -> RiskResult<()> {
        if !self.initial_value.is_finite() || self.initial_value < 0.0 {
            return Err(RiskError::InvalidInput(format!(
                "initial value must be a non-negative number, got {}",
                self.initial_value
            )));
        }
        if !self.annual_return.is_finite() || self.annual_return <= -1.0 {
            return Err(RiskError::InvalidInput(format!(
                "annual return must be greater than -100%, got {}",
                self.annual_return
            )));
        }
        if !self.annual_volatility.is_finite() || self.annual_volatility < 0.0 {
            return Err(RiskError::InvalidInput(format!(
                "annual volatility must not be negative, got {}",
                self.annual_volatility
            )));
        }
        if let Some(contribution) = &self.contribution {
            if !contribution.amount.is_finite() || contribution.amount < 0.0 {
                return Err(RiskError::InvalidInput(format!(
                    "contribution must not be negative, got {}",
                    contribution.amount
                )));
            }
        }
        self.horizon.to_days().map(|_| ())
    }
}

/// 리스크 수준.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// 낮음
    Low,
    /// 보통
    #[default]
    Medium,
    /// 높음
    High,
}

impl RiskLevel {
    /// 연율 변동성으로 리스크 수준을 분류합니다.
    pub fn from_volatility(annual_volatility: f64) -> Self {
        if annual_volatility < 0.15 {
            RiskLevel::Low
        } else if annual_volatility < 0.35 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

/// 최근 포트폴리오 스냅샷에서 미리 계산된 리스크 지표.
///
/// 모든 필드는 선택적입니다. 누락된 값은 점수 계산 시 기본값으로 대체됩니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotMetrics {
    /// 연율 변동성
    pub volatility: Option<f64>,
    /// 최대 낙폭 (양수 비율)
    pub max_drawdown: Option<f64>,
    /// 샤프 비율
    pub sharpe: Option<f64>,
    /// 95% Value at Risk (양수 비율)
    pub value_at_risk: Option<f64>,
    /// 리스크 수준
    pub risk_level: Option<RiskLevel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizon_to_days() {
        assert_eq!(Horizon::days(365).to_days().unwrap(), 365);
        let horizon = Horizon {
            value: 2,
            unit: HorizonUnit::Years,
        };
        assert_eq!(horizon.to_days().unwrap(), 730);
        let horizon = Horizon {
            value: 3,
            unit: HorizonUnit::Weeks,
        };
        assert_eq!(horizon.to_days().unwrap(), 21);
    }

    #[test]
    fn test_negative_horizon_rejected() {
        let err = Horizon::days(-1).to_days().unwrap_err();
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_horizon_upper_bound() {
        let century = Horizon {
            value: 100,
            unit: HorizonUnit::Years,
        };
        assert_eq!(century.to_days().unwrap(), MAX_HORIZON_DAYS);

        assert!(matches!(
            Horizon::days(i64::from(MAX_HORIZON_DAYS) + 1).to_days(),
            Err(RiskError::InvalidInput(_))
        ));
        let huge = Horizon {
            value: 11_000_000,
            unit: HorizonUnit::Years,
        };
        assert!(matches!(huge.to_days(), Err(RiskError::InvalidInput(_))));
    }

    #[test]
    fn test_scenario_validation() {
        let scenario = ProjectionScenario::new(10_000.0, 0.10, 0.30, Horizon::days(365));
        assert!(scenario.validate().is_ok());

        let scenario = ProjectionScenario::new(10_000.0, 0.10, -0.30, Horizon::days(365));
        assert!(scenario.validate().is_err());

        let scenario = ProjectionScenario::new(10_000.0, 0.10, 0.30, Horizon::days(30))
            .with_contribution(-5.0, 7);
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn test_contribution_due() {
        let contribution = Contribution {
            amount: 100.0,
            every_days: 30,
        };
        assert!(!contribution.is_due(29));
        assert!(contribution.is_due(30));
        assert!(contribution.is_due(60));

        let never = Contribution {
            amount: 100.0,
            every_days: 0,
        };
        assert!(!never.is_due(30));
    }

    #[test]
    fn test_snapshot_metrics_missing_fields_default() {
        let metrics: SnapshotMetrics = serde_json::from_str(r#"{"volatility": 0.2}"#).unwrap();
        assert_eq!(metrics.volatility, Some(0.2));
        assert_eq!(metrics.sharpe, None);
        assert_eq!(metrics.risk_level, None);
    }

    #[test]
    fn test_risk_level_from_volatility() {
        assert_eq!(RiskLevel::from_volatility(0.10), RiskLevel::Low);
        assert_eq!(RiskLevel::from_volatility(0.20), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_volatility(0.50), RiskLevel::High);
    }
}
