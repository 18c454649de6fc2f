//! 거래 기록 재생 및 파라미터 적응.
//!
//! 거래 결과 JSON을 순서대로 기록하면서 매 거래 후 적응을 실행하고,
//! 최종 정식 파라미터와 경보 수준을 반영한 세션 파라미터를 출력합니다.

use anyhow::{Context, Result};
use riskpilot_core::{AlertLevel, RiskParameters, TradeOutcome};
use riskpilot_risk::{
    AdaptationReport, AdaptiveRiskConfig, AdaptiveRiskManager, AdaptiveRiskState, LedgerStats,
    StreakState, VolatilityReading,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use super::{read_json, write_json};

/// 적응 명령 설정.
#[derive(Debug, Clone)]
pub struct AdaptConfig {
    /// 심볼 (상태 파일이 있으면 상태의 심볼 사용)
    pub symbol: String,
    /// 거래 결과 JSON 배열 파일
    pub trades_path: PathBuf,
    /// 최근 가격 JSON 배열 파일
    pub prices_path: Option<PathBuf>,
    /// 복원할 상태 파일
    pub state_path: Option<PathBuf>,
    /// 결과 상태 저장 경로
    pub save_state: Option<PathBuf>,
    /// 외부 경보 수준
    pub alert: AlertLevel,
    /// 최적화를 블로킹 스레드에서 실행
    pub detached: bool,
}

/// 적응 결과 요약.
#[derive(Debug, Clone, Serialize)]
pub struct AdaptSummary {
    /// 심볼
    pub symbol: String,
    /// 재생한 거래 수
    pub trades_replayed: usize,
    /// 변동성 갱신 결과
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volatility: Option<VolatilityReading>,
    /// 정식 파라미터
    pub parameters: RiskParameters,
    /// 경보 수준
    pub alert: AlertLevel,
    /// 경보 반영 세션 파라미터
    pub session_parameters: RiskParameters,
    /// 연속 승패
    pub streaks: StreakState,
    /// 원장 통계
    pub stats: LedgerStats,
    /// 마지막 적응 보고서
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_report: Option<AdaptationReport>,
}

/// 매니저에 가격과 거래를 순서대로 반영합니다.
pub async fn replay(
    manager: &mut AdaptiveRiskManager,
    trades: Vec<TradeOutcome>,
    prices: Option<&[f64]>,
    detached: bool,
) -> Result<(Option<VolatilityReading>, Option<AdaptationReport>)> {
    let volatility = prices.map(|p| manager.update_volatility(p));

    let mut last_report = None;
    for (index, trade) in trades.into_iter().enumerate() {
        manager
            .record_trade(trade)
            .with_context(|| format!("Invalid trade outcome at index {index}"))?;

        let report = if detached {
            manager.adapt_detached().await
        } else {
            manager.adapt()
        };
        last_report = Some(report);
    }

    Ok((volatility, last_report))
}

/// 적응 명령을 실행합니다.
pub async fn run_adapt(config: AdaptConfig, risk: AdaptiveRiskConfig) -> Result<AdaptSummary> {
    risk.validate().context("Invalid adaptive risk configuration")?;

    let mut manager = match &config.state_path {
        Some(path) => {
            let state: AdaptiveRiskState = read_json(path)?;
            info!(symbol = %state.symbol, trades = state.history.len(), "상태 복원");
            AdaptiveRiskManager::from_state(risk, state)?
        }
        None => AdaptiveRiskManager::new(config.symbol.clone(), risk),
    };

    let trades: Vec<TradeOutcome> = read_json(&config.trades_path)?;
    let prices: Option<Vec<f64>> = config
        .prices_path
        .as_ref()
        .map(|path| read_json(path))
        .transpose()?;

    let trades_replayed = trades.len();
    let (volatility, last_report) =
        replay(&mut manager, trades, prices.as_deref(), config.detached).await?;

    info!(
        symbol = manager.symbol(),
        trades = trades_replayed,
        stop_loss = manager.parameters().stop_loss,
        position_size = manager.parameters().position_size,
        "적응 완료"
    );

    if let Some(path) = &config.save_state {
        write_json(path, &manager.export_state())?;
        info!(path = %path.display(), "상태 저장");
    }

    Ok(AdaptSummary {
        symbol: manager.symbol().to_string(),
        trades_replayed,
        volatility,
        parameters: manager.parameters(),
        alert: config.alert,
        session_parameters: manager.session_parameters(config.alert),
        streaks: manager.streaks(),
        stats: manager.stats(),
        last_report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn trade(exit: rust_decimal::Decimal, params: RiskParameters) -> TradeOutcome {
        TradeOutcome::new(dec!(100), exit, dec!(1), params, Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn test_replay_tracks_streaks() {
        let mut manager = AdaptiveRiskManager::with_defaults("BTC/USDT");
        let params = manager.parameters();
        let trades = vec![
            trade(dec!(101), params),
            trade(dec!(99), params),
            trade(dec!(98), params),
        ];

        let (volatility, report) = replay(&mut manager, trades, None, false).await.unwrap();
        assert!(volatility.is_none());
        assert!(report.is_some());
        assert_eq!(manager.streaks().consecutive_losses, 2);
        assert_eq!(manager.ledger().len(), 3);
    }

    #[tokio::test]
    async fn test_replay_rejects_invalid_trade() {
        let mut manager = AdaptiveRiskManager::with_defaults("BTC/USDT");
        let mut bad = trade(dec!(101), manager.parameters());
        bad.entry_price = dec!(0);

        let err = replay(&mut manager, vec![bad], None, false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("index 0"));
    }
}
