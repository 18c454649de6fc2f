//! 규칙 기반 파라미터 조정.
//!
//! 규칙은 고정된 순서로 적용되며, 각 규칙은 이전 규칙이 갱신한 값을 읽습니다:
//! 1. 연속 손실 축소: 포지션 크기 축소, 익절을 `2.5 × 손절` 이상으로 (갱신 전 손절 기준)
//! 2. 연속 수익 확대: 포지션 크기 확대 (최대값으로 제한)
//! 3. 변동성 스케일링: 손절에 `clamp(변동성 × 10, 1, 3)`을 곱하고,
//!    새 손절 기준으로 익절을 `1.5 × 손절` 이상으로 올림
//!
//! 범위를 벗어나는 값은 경계로 잘립니다.

use riskpilot_core::{RiskParameters, MIN_RISK_REWARD};
use serde::{Deserialize, Serialize};

use crate::config::AdaptiveRiskConfig;
use crate::ledger::StreakState;

/// 이번 조정에서 발동한 규칙.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "rule")]
pub enum AppliedRule {
    /// 연속 손실 축소
    LossStreakDampening { losses: u32 },
    /// 연속 수익 확대
    WinStreakGrowth { wins: u32 },
    /// 변동성 스케일링
    VolatilityScaling { factor: f64 },
}

/// 규칙 기반 파라미터 조정기.
#[derive(Debug, Clone)]
pub struct RuleBasedAdapter {
    config: AdaptiveRiskConfig,
}

impl RuleBasedAdapter {
    /// 주어진 설정으로 조정기를 생성합니다.
    pub fn new(config: AdaptiveRiskConfig) -> Self {
        Self { config }
    }

    /// 설정 참조.
    pub fn config(&self) -> &AdaptiveRiskConfig {
        &self.config
    }

    /// 파라미터를 조정한 새 값을 반환합니다.
    ///
    /// `history_len`이 최소 거래 수보다 작으면 입력을 그대로 돌려줍니다.
    pub fn adapt(
        &self,
        params: RiskParameters,
        streaks: StreakState,
        volatility: f64,
        history_len: usize,
    ) -> RiskParameters {
        self.adapt_explained(params, streaks, volatility, history_len)
            .0
    }

    /// [`adapt`](Self::adapt)와 같지만 발동한 규칙 목록도 함께 반환합니다.
    pub fn adapt_explained(
        &self,
        params: RiskParameters,
        streaks: StreakState,
        volatility: f64,
        history_len: usize,
    ) -> (RiskParameters, Vec<AppliedRule>) {
        if history_len < self.config.min_history_for_adaptation {
            tracing::debug!(
                history_len,
                required = self.config.min_history_for_adaptation,
                "Skipping rule adaptation: not enough trades"
            );
            return (params, Vec::new());
        }

        let bounds = &self.config.bounds;
        let mut next = params;
        let mut applied = Vec::new();

        // 1. 연속 손실 축소
        if streaks.consecutive_losses >= self.config.loss_streak_threshold {
            next.position_size =
                bounds.clamp_position_size(next.position_size * self.config.loss_streak_size_factor);
            next.take_profit = next
                .take_profit
                .max(self.config.loss_streak_risk_reward * next.stop_loss);
            applied.push(AppliedRule::LossStreakDampening {
                losses: streaks.consecutive_losses,
            });
        }

        // 2. 연속 수익 확대
        if streaks.consecutive_wins >= self.config.win_streak_threshold {
            next.position_size =
                bounds.clamp_position_size(next.position_size * self.config.win_streak_size_factor);
            applied.push(AppliedRule::WinStreakGrowth {
                wins: streaks.consecutive_wins,
            });
        }

        // 3. 변동성 스케일링 (새 손절 기준으로 익절 재계산)
        if volatility.is_finite() && volatility > 0.0 {
            let factor = (volatility * self.config.volatility_multiplier)
                .clamp(1.0, self.config.max_volatility_factor);
            next.stop_loss = bounds.clamp_stop_loss(next.stop_loss * factor);
            next.take_profit = next.take_profit.max(MIN_RISK_REWARD * next.stop_loss);
            applied.push(AppliedRule::VolatilityScaling { factor });
        }

        let next = bounds.enforce(next);

        if !applied.is_empty() {
            tracing::debug!(
                rules = ?applied,
                stop_loss = next.stop_loss,
                take_profit = next.take_profit,
                position_size = next.position_size,
                "Rule-based adaptation applied"
            );
        }

        (next, applied)
    }
}
