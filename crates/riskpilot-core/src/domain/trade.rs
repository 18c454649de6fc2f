//! 청산된 거래의 결과 기록.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::parameters::RiskParameters;
use crate::error::{RiskError, RiskResult};

/// 청산된 거래 하나의 불변 결과.
///
/// `profit_pct`와 `is_profit`은 진입/청산가에서 파생되며
/// [`TradeOutcome::normalized`]가 항상 다시 계산합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeOutcome {
    /// 내부 결과 ID
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// 진입 가격
    pub entry_price: Decimal,
    /// 청산 가격
    pub exit_price: Decimal,
    /// 체결 수량
    pub volume: Decimal,
    /// 청산 타임스탬프
    pub timestamp: DateTime<Utc>,
    /// 체결 당시 적용된 손절 비율
    pub stop_loss_used: f64,
    /// 체결 당시 적용된 익절 비율
    pub take_profit_used: f64,
    /// 체결 당시 적용된 포지션 크기
    pub position_size_used: f64,
    /// 수익률 ((청산 - 진입) / 진입)
    #[serde(default)]
    pub profit_pct: f64,
    /// 수익 여부 (profit_pct > 0)
    #[serde(default)]
    pub is_profit: bool,
}

impl TradeOutcome {
    /// 새 거래 결과를 생성합니다.
    ///
    /// 진입가가 0 이하이면 `InvalidOutcome`을 반환합니다.
    pub fn new(
        entry_price: Decimal,
        exit_price: Decimal,
        volume: Decimal,
        params_used: RiskParameters,
        timestamp: DateTime<Utc>,
    ) -> RiskResult<Self> {
        Self {
            id: Uuid::new_v4(),
            entry_price,
            exit_price,
            volume,
            timestamp,
            stop_loss_used: params_used.stop_loss,
            take_profit_used: params_used.take_profit,
            position_size_used: params_used.position_size,
            profit_pct: 0.0,
            is_profit: false,
        }
        .normalized()
    }

    /// 입력을 검증하고 파생 필드를 다시 계산합니다.
    ///
    /// 역직렬화된 기록은 파생 필드가 비어 있거나 틀릴 수 있으므로
    /// 원장에 추가하기 전에 항상 이 함수를 거칩니다.
    pub fn normalized(mut self) -> RiskResult<Self> {
        if self.entry_price <= Decimal::ZERO {
            return Err(RiskError::InvalidOutcome(format!(
                "entry price must be positive, got {}",
                self.entry_price
            )));
        }
        if self.exit_price < Decimal::ZERO {
            return Err(RiskError::InvalidOutcome(format!(
                "exit price must not be negative, got {}",
                self.exit_price
            )));
        }

        let ratio = self
            .exit_price
            .checked_sub(self.entry_price)
            .and_then(|diff| diff.checked_div(self.entry_price))
            .ok_or_else(|| {
                RiskError::InvalidOutcome(format!(
                    "profit ratio overflows: entry {}, exit {}",
                    self.entry_price, self.exit_price
                ))
            })?;
        self.profit_pct = ratio.to_f64().ok_or_else(|| {
            RiskError::InvalidOutcome(format!("profit ratio {ratio} is not representable"))
        })?;
        self.is_profit = self.profit_pct > 0.0;
        Ok(self)
    }

    /// 체결 당시의 파라미터 묶음.
    pub fn params_used(&self) -> RiskParameters {
        RiskParameters::new(
            self.stop_loss_used,
            self.take_profit_used,
            self.position_size_used,
        )
    }

    /// 회귀 모델의 피처 벡터 (손절, 익절, 포지션 크기).
    pub fn features(&self) -> [f64; 3] {
        [
            self.stop_loss_used,
            self.take_profit_used,
            self.position_size_used,
        ]
    }
}
