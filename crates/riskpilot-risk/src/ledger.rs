//! 거래 원장과 연속 승패 추적.
//!
//! 원장은 청산된 거래 결과를 삽입 순서대로 보관하고,
//! 결과 하나가 추가될 때마다 연속 수익/손실 카운터를 갱신합니다.
//! 리스크 파라미터는 여기서 변경하지 않습니다.

use riskpilot_core::{RiskError, RiskResult, TradeOutcome};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 연속 승패 상태.
///
/// 두 카운터 중 최대 하나만 0이 아닙니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    /// 연속 수익 횟수
    pub consecutive_wins: u32,
    /// 연속 손실 횟수
    pub consecutive_losses: u32,
}

impl StreakState {
    /// 거래 결과 하나를 반영합니다. 반대 부호의 결과는 상대 카운터를 0으로 되돌립니다.
    pub fn apply(&mut self, is_profit: bool) {
        if is_profit {
            self.consecutive_wins = self.consecutive_wins.saturating_add(1);
            self.consecutive_losses = 0;
        } else {
            self.consecutive_losses = self.consecutive_losses.saturating_add(1);
            self.consecutive_wins = 0;
        }
    }

    /// 두 카운터가 동시에 0이 아닌 상태가 아닌지 확인합니다.
    pub fn is_consistent(&self) -> bool {
        self.consecutive_wins == 0 || self.consecutive_losses == 0
    }
}

/// 원장 요약 통계.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerStats {
    /// 총 거래 수
    pub total_trades: usize,
    /// 수익 거래 수
    pub winning_trades: usize,
    /// 손실(또는 본전) 거래 수
    pub losing_trades: usize,
    /// 승률 (0.0 ~ 1.0)
    pub win_rate: f64,
    /// 평균 수익률
    pub avg_profit_pct: f64,
    /// 총 체결 수량
    pub total_volume: Decimal,
}

/// 거래 결과 원장.
#[derive(Debug, Clone, Default)]
pub struct TradeLedger {
    outcomes: Vec<TradeOutcome>,
    streaks: StreakState,
    max_history: Option<usize>,
}

impl TradeLedger {
    /// 보관 한도 없는 빈 원장을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 최대 보관 거래 수를 지정합니다. 한도를 넘으면 가장 오래된 거래부터 제거됩니다.
    pub fn with_max_history(mut self, max_history: Option<usize>) -> Self {
        self.max_history = max_history;
        self.prune();
        self
    }

    /// 저장된 기록과 연속 상태로 원장을 복원합니다.
    pub fn restore(
        outcomes: Vec<TradeOutcome>,
        streaks: StreakState,
        max_history: Option<usize>,
    ) -> RiskResult<Self> {
        if !streaks.is_consistent() {
            return Err(RiskError::InvalidInput(format!(
                "restored streaks must not count wins and losses together: {} wins, {} losses",
                streaks.consecutive_wins, streaks.consecutive_losses
            )));
        }

        let outcomes = outcomes
            .into_iter()
            .map(TradeOutcome::normalized)
            .collect::<RiskResult<Vec<_>>>()?;

        Ok(Self {
            outcomes,
            streaks,
            max_history,
        }
        .with_max_history(max_history))
    }

    /// 거래 결과를 기록하고 갱신된 연속 상태를 반환합니다.
    ///
    /// 진입가가 0 이하이면 `InvalidOutcome`을 반환하며 원장은 변하지 않습니다.
    pub fn record(&mut self, outcome: TradeOutcome) -> RiskResult<StreakState> {
        let outcome = outcome.normalized()?;

        self.streaks.apply(outcome.is_profit);
        tracing::debug!(
            profit_pct = outcome.profit_pct,
            wins = self.streaks.consecutive_wins,
            losses = self.streaks.consecutive_losses,
            "Trade outcome recorded"
        );

        self.outcomes.push(outcome);
        self.prune();

        Ok(self.streaks)
    }

    fn prune(&mut self) {
        if let Some(max) = self.max_history {
            if self.outcomes.len() > max {
                let excess = self.outcomes.len() - max;
                self.outcomes.drain(..excess);
            }
        }
    }

    /// 현재 연속 상태.
    pub fn streaks(&self) -> StreakState {
        self.streaks
    }

    /// 보관 중인 거래 결과 (오래된 순).
    pub fn history(&self) -> &[TradeOutcome] {
        &self.outcomes
    }

    /// 백그라운드 작업에 넘길 불변 스냅샷.
    pub fn snapshot(&self) -> Arc<[TradeOutcome]> {
        Arc::from(self.outcomes.as_slice())
    }

    /// 보관 중인 거래 수.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// 원장이 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// 최대 보관 거래 수.
    pub fn max_history(&self) -> Option<usize> {
        self.max_history
    }

    /// 요약 통계를 계산합니다.
    pub fn stats(&self) -> LedgerStats {
        let total_trades = self.outcomes.len();
        if total_trades == 0 {
            return LedgerStats::default();
        }

        let winning_trades = self.outcomes.iter().filter(|o| o.is_profit).count();
        let profit_sum: f64 = self.outcomes.iter().map(|o| o.profit_pct).sum();
        // 합계가 표현 범위를 넘으면 최대값으로 고정
        let total_volume = self.outcomes.iter().fold(Decimal::ZERO, |acc, o| {
            acc.checked_add(o.volume).unwrap_or(Decimal::MAX)
        });

        LedgerStats {
            total_trades,
            winning_trades,
            losing_trades: total_trades - winning_trades,
            win_rate: winning_trades as f64 / total_trades as f64,
            avg_profit_pct: profit_sum / total_trades as f64,
            total_volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use riskpilot_core::RiskParameters;
    use rust_decimal_macros::dec;

    fn outcome(entry: Decimal, exit: Decimal) -> TradeOutcome {
        TradeOutcome::new(entry, exit, dec!(1), RiskParameters::default(), Utc::now()).unwrap()
    }

    #[test]
    fn test_win_streak() {
        let mut ledger = TradeLedger::new();

        ledger.record(outcome(dec!(100), dec!(101))).unwrap();
        ledger.record(outcome(dec!(100), dec!(102))).unwrap();
        let streaks = ledger.record(outcome(dec!(100), dec!(103))).unwrap();

        assert_eq!(streaks.consecutive_wins, 3);
        assert_eq!(streaks.consecutive_losses, 0);
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_streak_resets_on_opposite_result() {
        let mut ledger = TradeLedger::new();

        ledger.record(outcome(dec!(100), dec!(101))).unwrap();
        ledger.record(outcome(dec!(100), dec!(102))).unwrap();
        let streaks = ledger.record(outcome(dec!(100), dec!(99))).unwrap();

        assert_eq!(streaks.consecutive_wins, 0);
        assert_eq!(streaks.consecutive_losses, 1);
        assert!(streaks.is_consistent());
    }

    #[test]
    fn test_break_even_counts_as_loss() {
        let mut ledger = TradeLedger::new();
        let streaks = ledger.record(outcome(dec!(100), dec!(100))).unwrap();
        assert_eq!(streaks.consecutive_losses, 1);
    }

    #[test]
    fn test_invalid_outcome_leaves_ledger_untouched() {
        let mut ledger = TradeLedger::new();
        ledger.record(outcome(dec!(100), dec!(101))).unwrap();

        let mut bad = outcome(dec!(100), dec!(101));
        bad.entry_price = dec!(-5);
        let err = ledger.record(bad).unwrap_err();

        assert!(matches!(err, RiskError::InvalidOutcome(_)));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.streaks().consecutive_wins, 1);
    }

    #[test]
    fn test_max_history_drops_oldest() {
        let mut ledger = TradeLedger::new().with_max_history(Some(3));

        for exit in [dec!(90), dec!(91), dec!(110), dec!(111)] {
            ledger.record(outcome(dec!(100), exit)).unwrap();
        }

        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.history()[0].exit_price, dec!(91));
        // 보관 한도는 연속 상태에 영향을 주지 않음
        assert_eq!(ledger.streaks().consecutive_wins, 2);
    }

    #[test]
    fn test_stats() {
        let mut ledger = TradeLedger::new();
        ledger.record(outcome(dec!(100), dec!(110))).unwrap();
        ledger.record(outcome(dec!(100), dec!(95))).unwrap();

        let stats = ledger.stats();
        assert_eq!(stats.total_trades, 2);
        assert_eq!(stats.winning_trades, 1);
        assert_eq!(stats.losing_trades, 1);
        assert!((stats.win_rate - 0.5).abs() < 1e-12);
        assert!((stats.avg_profit_pct - 0.025).abs() < 1e-12);
        assert_eq!(stats.total_volume, dec!(2));
    }

    #[test]
    fn test_stats_volume_saturates() {
        let mut ledger = TradeLedger::new();
        for _ in 0..2 {
            let big = TradeOutcome::new(
                dec!(100),
                dec!(110),
                Decimal::MAX,
                RiskParameters::default(),
                Utc::now(),
            )
            .unwrap();
            ledger.record(big).unwrap();
        }

        assert_eq!(ledger.stats().total_volume, Decimal::MAX);
    }

    #[test]
    fn test_restore_rejects_mixed_streaks() {
        let streaks = StreakState {
            consecutive_wins: 2,
            consecutive_losses: 1,
        };
        let err = TradeLedger::restore(Vec::new(), streaks, None).unwrap_err();
        assert!(matches!(err, RiskError::InvalidInput(_)));

        let ok = TradeLedger::restore(Vec::new(), StreakState::default(), Some(10));
        assert!(ok.is_ok());
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut ledger = TradeLedger::new();
        ledger.record(outcome(dec!(100), dec!(110))).unwrap();
        let snapshot = ledger.snapshot();

        ledger.record(outcome(dec!(100), dec!(90))).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(ledger.len(), 2);
    }
}
