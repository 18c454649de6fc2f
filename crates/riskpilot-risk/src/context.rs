//! 경보 수준에 따른 세션 단위 파라미터 조정.
//!
//! 규칙 기반 조정과 회귀 최적화 이후 마지막으로 적용되며,
//! 결과는 현재 결정에만 쓰이고 정식 파라미터에 저장되지 않습니다.

use riskpilot_core::{AlertLevel, RiskParameters};

/// 경보 수준별 배수.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverrideMultipliers {
    /// 포지션 크기 배수
    pub position_size: f64,
    /// 손절 배수
    pub stop_loss: f64,
}

/// 경보 수준의 배수를 반환합니다.
pub fn multipliers(alert: AlertLevel) -> OverrideMultipliers {
    let (position_size, stop_loss) = match alert {
        AlertLevel::Critical => (0.5, 0.8),
        AlertLevel::High => (0.7, 0.9),
        AlertLevel::Medium => (0.9, 1.0),
        AlertLevel::None => (1.0, 1.0),
    };
    OverrideMultipliers {
        position_size,
        stop_loss,
    }
}

/// 경보 수준을 반영한 세션용 파라미터 사본을 만듭니다.
///
/// 순수 함수입니다. 익절은 변경하지 않습니다.
pub fn apply_context_override(params: RiskParameters, alert: AlertLevel) -> RiskParameters {
    let m = multipliers(alert);
    RiskParameters {
        stop_loss: params.stop_loss * m.stop_loss,
        take_profit: params.take_profit,
        position_size: params.position_size * m.position_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_identity() {
        let params = RiskParameters::new(0.05, 0.10, 0.10);
        assert_eq!(apply_context_override(params, AlertLevel::None), params);
    }

    #[test]
    fn test_multipliers_per_level() {
        let params = RiskParameters::new(0.05, 0.10, 0.10);

        let critical = apply_context_override(params, AlertLevel::Critical);
        assert!((critical.position_size - 0.05).abs() < 1e-12);
        assert!((critical.stop_loss - 0.04).abs() < 1e-12);

        let high = apply_context_override(params, AlertLevel::High);
        assert!((high.position_size - 0.07).abs() < 1e-12);
        assert!((high.stop_loss - 0.045).abs() < 1e-12);

        let medium = apply_context_override(params, AlertLevel::Medium);
        assert!((medium.position_size - 0.09).abs() < 1e-12);
        assert_eq!(medium.stop_loss, 0.05);

        for level in AlertLevel::ALL {
            assert_eq!(apply_context_override(params, level).take_profit, 0.10);
        }
    }

    #[test]
    fn test_severity_is_monotonic() {
        let params = RiskParameters::new(0.05, 0.10, 0.10);
        let sizes: Vec<f64> = AlertLevel::ALL
            .iter()
            .map(|l| apply_context_override(params, *l).position_size)
            .collect();
        assert!(sizes.windows(2).all(|w| w[1] < w[0]));
    }
}
