//! 적응형 리스크 매니저.
//!
//! 심볼 하나의 적응 루프에 필요한 상태를 소유합니다:
//! - 거래 원장과 연속 승패
//! - 변동성 추정기
//! - 정식 리스크 파라미터
//!
//! 파라미터 갱신은 `&mut self`를 통해서만 가능하므로 인스턴스당 쓰기 주체는 하나입니다.
//! 여러 심볼을 동시에 운용할 때는 심볼마다 매니저를 하나씩 둡니다 ([`RiskBook`]).

use chrono::{DateTime, Utc};
use riskpilot_core::{AlertLevel, RiskParameters, RiskResult, TradeOutcome};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::Instrument;

use crate::adapter::{AppliedRule, RuleBasedAdapter};
use crate::config::AdaptiveRiskConfig;
use crate::context::apply_context_override;
use crate::ledger::{LedgerStats, StreakState, TradeLedger};
use crate::optimizer::{optimize_detached, OptimizationStatus, RegressionOptimizer};
use crate::volatility::{VolatilityEstimator, VolatilityReading};

/// 한 번의 적응 실행 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptationReport {
    /// 실행 전 파라미터
    pub previous: RiskParameters,
    /// 규칙 기반 조정 직후 파라미터
    pub rule_adjusted: RiskParameters,
    /// 최종 파라미터 (회귀 최적화까지 반영)
    pub parameters: RiskParameters,
    /// 발동한 규칙
    pub applied_rules: Vec<AppliedRule>,
    /// 회귀 최적화 상태
    pub optimization: OptimizationStatus,
}

impl AdaptationReport {
    /// 파라미터가 변경되었는지 확인합니다.
    pub fn changed(&self) -> bool {
        self.previous != self.parameters
    }
}

/// 영속화를 위한 매니저 상태 스냅샷.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveRiskState {
    /// 심볼
    pub symbol: String,
    /// 정식 파라미터
    pub parameters: RiskParameters,
    /// 연속 승패 상태
    pub streaks: StreakState,
    /// 마지막 유효 변동성
    pub volatility: f64,
    /// 거래 기록
    pub history: Vec<TradeOutcome>,
    /// 저장 시각
    pub saved_at: DateTime<Utc>,
}

/// 심볼 하나의 적응형 리스크 매니저.
#[derive(Debug, Clone)]
pub struct AdaptiveRiskManager {
    /// 심볼
    symbol: String,
    /// 설정
    config: AdaptiveRiskConfig,
    /// 거래 원장
    ledger: TradeLedger,
    /// 변동성 추정기
    volatility: VolatilityEstimator,
    /// 규칙 기반 조정기
    adapter: RuleBasedAdapter,
    /// 회귀 최적화기
    optimizer: RegressionOptimizer,
    /// 정식 파라미터
    parameters: RiskParameters,
}

impl AdaptiveRiskManager {
    /// 설정으로 새 매니저를 생성합니다. 시작 파라미터는 경계에 맞게 보정됩니다.
    pub fn new(symbol: impl Into<String>, config: AdaptiveRiskConfig) -> Self {
        let parameters = config.bounds.enforce(config.initial_parameters);

        Self {
            symbol: symbol.into(),
            ledger: TradeLedger::new().with_max_history(config.max_history),
            volatility: VolatilityEstimator::new(config.volatility_window),
            adapter: RuleBasedAdapter::new(config.clone()),
            optimizer: RegressionOptimizer::new(config.clone()),
            parameters,
            config,
        }
    }

    /// 기본 설정으로 생성합니다.
    pub fn with_defaults(symbol: impl Into<String>) -> Self {
        Self::new(symbol, AdaptiveRiskConfig::default())
    }

    /// 저장된 상태에서 매니저를 복원합니다.
    pub fn from_state(config: AdaptiveRiskConfig, state: AdaptiveRiskState) -> RiskResult<Self> {
        let mut manager = Self::new(state.symbol, config);
        manager.ledger =
            TradeLedger::restore(state.history, state.streaks, manager.config.max_history)?;
        manager.volatility = manager.volatility.with_last(state.volatility);
        manager.parameters = manager.config.bounds.enforce(state.parameters);
        Ok(manager)
    }

    /// 현재 상태를 스냅샷으로 내보냅니다.
    pub fn export_state(&self) -> AdaptiveRiskState {
        AdaptiveRiskState {
            symbol: self.symbol.clone(),
            parameters: self.parameters,
            streaks: self.ledger.streaks(),
            volatility: self.volatility.last(),
            history: self.ledger.history().to_vec(),
            saved_at: Utc::now(),
        }
    }

    /// 심볼.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// 설정 참조.
    pub fn config(&self) -> &AdaptiveRiskConfig {
        &self.config
    }

    /// 정식 파라미터 사본.
    pub fn parameters(&self) -> RiskParameters {
        self.parameters
    }

    /// 현재 연속 승패 상태.
    pub fn streaks(&self) -> StreakState {
        self.ledger.streaks()
    }

    /// 마지막 유효 변동성.
    pub fn volatility(&self) -> f64 {
        self.volatility.last()
    }

    /// 거래 원장 참조.
    pub fn ledger(&self) -> &TradeLedger {
        &self.ledger
    }

    /// 원장 요약 통계.
    pub fn stats(&self) -> LedgerStats {
        self.ledger.stats()
    }

    // ==================== Inputs ====================

    /// 청산된 거래 결과를 기록합니다. 파라미터는 [`adapt`](Self::adapt)에서 갱신됩니다.
    pub fn record_trade(&mut self, outcome: TradeOutcome) -> RiskResult<StreakState> {
        self.ledger.record(outcome)
    }

    /// 최근 가격으로 변동성을 갱신합니다.
    pub fn update_volatility(&mut self, prices: &[f64]) -> VolatilityReading {
        let reading = self.volatility.estimate(prices);
        tracing::debug!(
            symbol = %self.symbol,
            volatility = reading.value,
            status = ?reading.status,
            "Volatility updated"
        );
        reading
    }

    // ==================== Adaptation ====================

    /// 규칙 기반 조정 후 회귀 최적화를 실행하고 정식 파라미터를 갱신합니다.
    pub fn adapt(&mut self) -> AdaptationReport {
        let span = riskpilot_core::adaptation_span!("adapt", self.symbol);
        let _guard = span.enter();

        let previous = self.parameters;
        let (rule_adjusted, applied_rules) = self.adapter.adapt_explained(
            previous,
            self.ledger.streaks(),
            self.volatility.last(),
            self.ledger.len(),
        );

        let optimization = self.optimizer.optimize(self.ledger.history(), rule_adjusted);
        self.parameters = optimization.parameters;

        AdaptationReport {
            previous,
            rule_adjusted,
            parameters: self.parameters,
            applied_rules,
            optimization: optimization.status,
        }
    }

    /// [`adapt`](Self::adapt)와 같지만 회귀 최적화를 블로킹 스레드에서 실행합니다.
    ///
    /// 최적화기는 원장의 불변 스냅샷을 읽으므로 이후 기록과 경합하지 않습니다.
    pub async fn adapt_detached(&mut self) -> AdaptationReport {
        let span = riskpilot_core::adaptation_span!("adapt_detached", self.symbol);

        let previous = self.parameters;
        let (rule_adjusted, applied_rules) = span.in_scope(|| {
            self.adapter.adapt_explained(
                previous,
                self.ledger.streaks(),
                self.volatility.last(),
                self.ledger.len(),
            )
        });

        let optimization =
            optimize_detached(self.optimizer.clone(), self.ledger.snapshot(), rule_adjusted)
                .instrument(span)
                .await;
        self.parameters = optimization.parameters;

        AdaptationReport {
            previous,
            rule_adjusted,
            parameters: self.parameters,
            applied_rules,
            optimization: optimization.status,
        }
    }

    /// 경보 수준을 반영한 이번 결정용 파라미터를 반환합니다.
    ///
    /// 정식 파라미터는 변경되지 않습니다. 결과는 경계 안으로 보정됩니다.
    pub fn session_parameters(&self, alert: AlertLevel) -> RiskParameters {
        let session = self
            .config
            .bounds
            .enforce(apply_context_override(self.parameters, alert));
        if alert != AlertLevel::None {
            tracing::debug!(
                symbol = %self.symbol,
                alert = %alert,
                stop_loss = session.stop_loss,
                position_size = session.position_size,
                "Context override applied"
            );
        }
        session
    }
}

/// 심볼별 매니저 모음.
///
/// 심볼마다 독립된 매니저를 두어 트레이딩 루프 간에 상태를 공유하지 않습니다.
#[derive(Debug, Clone, Default)]
pub struct RiskBook {
    config: AdaptiveRiskConfig,
    managers: HashMap<String, AdaptiveRiskManager>,
}

impl RiskBook {
    /// 새 매니저 생성 시 사용할 설정으로 생성합니다.
    pub fn new(config: AdaptiveRiskConfig) -> Self {
        Self {
            config,
            managers: HashMap::new(),
        }
    }

    /// 심볼의 매니저를 반환합니다. 없으면 생성합니다.
    pub fn manager_mut(&mut self, symbol: &str) -> &mut AdaptiveRiskManager {
        let config = &self.config;
        self.managers
            .entry(symbol.to_string())
            .or_insert_with(|| AdaptiveRiskManager::new(symbol, config.clone()))
    }

    /// 심볼의 매니저를 조회합니다.
    pub fn get(&self, symbol: &str) -> Option<&AdaptiveRiskManager> {
        self.managers.get(symbol)
    }

    /// 저장된 상태로 매니저를 복원해 등록합니다.
    pub fn restore(&mut self, state: AdaptiveRiskState) -> RiskResult<()> {
        let manager = AdaptiveRiskManager::from_state(self.config.clone(), state)?;
        self.managers.insert(manager.symbol().to_string(), manager);
        Ok(())
    }

    /// 매니저를 제거하고 반환합니다.
    pub fn remove(&mut self, symbol: &str) -> Option<AdaptiveRiskManager> {
        self.managers.remove(symbol)
    }

    /// 등록된 심볼 목록 (정렬됨).
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.managers.keys().map(String::as_str).collect();
        symbols.sort_unstable();
        symbols
    }

    /// 등록된 매니저 수.
    pub fn len(&self) -> usize {
        self.managers.len()
    }

    /// 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn trade(manager: &AdaptiveRiskManager, exit: Decimal) -> TradeOutcome {
        TradeOutcome::new(
            dec!(100),
            exit,
            dec!(1),
            manager.parameters(),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_manager_creation() {
        let manager = AdaptiveRiskManager::with_defaults("BTC/USDT");

        assert_eq!(manager.symbol(), "BTC/USDT");
        assert_eq!(manager.parameters(), RiskParameters::default());
        assert_eq!(manager.streaks(), StreakState::default());
        assert!(manager.ledger().is_empty());
    }

    #[test]
    fn test_adapt_is_no_op_with_little_history() {
        let mut manager = AdaptiveRiskManager::with_defaults("BTC/USDT");
        for _ in 0..4 {
            let outcome = trade(&manager, dec!(95));
            manager.record_trade(outcome).unwrap();
        }

        let report = manager.adapt();
        assert!(!report.changed());
        assert!(report.applied_rules.is_empty());
        assert!(matches!(
            report.optimization,
            OptimizationStatus::Skipped { .. }
        ));
    }

    #[test]
    fn test_loss_streak_shrinks_position() {
        let config = AdaptiveRiskConfig {
            initial_parameters: RiskParameters::new(0.05, 0.10, 0.10),
            ..Default::default()
        };
        let mut manager = AdaptiveRiskManager::new("ETH/USDT", config);

        for exit in [dec!(103), dec!(104), dec!(97), dec!(96), dec!(95)] {
            let outcome = trade(&manager, exit);
            manager.record_trade(outcome).unwrap();
        }

        let report = manager.adapt();
        assert!((report.parameters.position_size - 0.08).abs() < 1e-12);
        assert!(report.parameters.take_profit >= 0.125 - 1e-12);
        assert_eq!(manager.parameters(), report.parameters);
    }

    #[test]
    fn test_session_parameters_do_not_persist() {
        let manager = AdaptiveRiskManager::with_defaults("BTC/USDT");
        let before = manager.parameters();

        let session = manager.session_parameters(AlertLevel::Critical);
        assert!(session.position_size < before.position_size);
        assert_eq!(manager.parameters(), before);
    }

    #[test]
    fn test_session_parameters_respect_min_stop_loss() {
        let config = AdaptiveRiskConfig {
            initial_parameters: RiskParameters::new(0.01, 0.02, 0.10),
            ..Default::default()
        };
        let manager = AdaptiveRiskManager::new("BTC/USDT", config);

        let session = manager.session_parameters(AlertLevel::Critical);
        assert_eq!(session.stop_loss, 0.01);
        assert!((session.position_size - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_state_round_trip() {
        let mut manager = AdaptiveRiskManager::with_defaults("BTC/USDT");
        manager.update_volatility(&[100.0, 101.0, 99.5, 100.5]);
        for exit in [dec!(101), dec!(102)] {
            let outcome = trade(&manager, exit);
            manager.record_trade(outcome).unwrap();
        }

        let state = manager.export_state();
        let json = serde_json::to_string(&state).unwrap();
        let restored_state: AdaptiveRiskState = serde_json::from_str(&json).unwrap();
        let restored =
            AdaptiveRiskManager::from_state(AdaptiveRiskConfig::default(), restored_state)
                .unwrap();

        assert_eq!(restored.symbol(), "BTC/USDT");
        assert_eq!(restored.parameters(), manager.parameters());
        assert_eq!(restored.streaks().consecutive_wins, 2);
        assert_eq!(restored.ledger().len(), 2);
        assert_eq!(restored.volatility(), manager.volatility());
    }

    #[test]
    fn test_risk_book_isolates_symbols() {
        let mut book = RiskBook::new(AdaptiveRiskConfig::default());

        let btc = book.manager_mut("BTC/USDT");
        let outcome = trade(btc, dec!(90));
        btc.record_trade(outcome).unwrap();

        book.manager_mut("ETH/USDT");

        assert_eq!(book.len(), 2);
        assert_eq!(book.symbols(), vec!["BTC/USDT", "ETH/USDT"]);
        assert_eq!(book.get("BTC/USDT").map(|m| m.ledger().len()), Some(1));
        assert_eq!(book.get("ETH/USDT").map(|m| m.ledger().len()), Some(0));

        assert!(book.remove("BTC/USDT").is_some());
        assert!(book.get("BTC/USDT").is_none());
    }
}
