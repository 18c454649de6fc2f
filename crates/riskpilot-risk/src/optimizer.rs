//! 회귀 기반 파라미터 최적화.
//!
//! 과거 거래의 (손절, 익절, 포지션 크기) → 수익률 선형 모델을 적합한 뒤
//! 5×5×5 그리드에서 예측 수익률이 가장 높은 후보를 찾고,
//! 현재 파라미터와 `0.7 × 현재 + 0.3 × 후보`로 혼합합니다.
//!
//! 적합에 실패하면 파라미터를 바꾸지 않고 경고만 남깁니다.

use riskpilot_core::{RiskParameters, TradeOutcome};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::AdaptiveRiskConfig;
use crate::regression::LinearModel;

/// 후보 파라미터의 혼합 가중치 (현재 파라미터는 `1 - BLEND_WEIGHT`).
pub const BLEND_WEIGHT: f64 = 0.3;

/// 최적화 결과 상태.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum OptimizationStatus {
    /// 거래 수 부족으로 건너뜀
    Skipped { required: usize, actual: usize },
    /// 후보를 찾아 혼합함
    Applied {
        candidate: RiskParameters,
        predicted_profit_pct: f64,
        r_squared: f64,
    },
    /// 모델 적합 실패: 입력 파라미터 유지
    FitFailed { reason: String },
}

/// 최적화 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationOutcome {
    /// 최적화 후 파라미터 (건너뛰거나 실패하면 입력 그대로)
    pub parameters: RiskParameters,
    /// 상태
    pub status: OptimizationStatus,
}

impl OptimizationOutcome {
    fn unchanged(parameters: RiskParameters, status: OptimizationStatus) -> Self {
        Self { parameters, status }
    }

    /// 모델 적합 실패 여부.
    pub fn is_failure(&self) -> bool {
        matches!(self.status, OptimizationStatus::FitFailed { .. })
    }
}

/// `[start, end]`를 `steps`개로 균등 분할합니다.
pub fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (steps - 1) as f64;
            (0..steps).map(|i| start + step * i as f64).collect()
        }
    }
}

/// 회귀 기반 파라미터 최적화기.
#[derive(Debug, Clone)]
pub struct RegressionOptimizer {
    config: AdaptiveRiskConfig,
}

impl RegressionOptimizer {
    /// 주어진 설정으로 최적화기를 생성합니다.
    pub fn new(config: AdaptiveRiskConfig) -> Self {
        Self { config }
    }

    /// 거래 기록으로 파라미터를 최적화합니다.
    ///
    /// 이 함수는 패닉하거나 에러를 전파하지 않습니다. 모든 실패는 상태로 보고됩니다.
    pub fn optimize(&self, history: &[TradeOutcome], params: RiskParameters) -> OptimizationOutcome {
        let required = self.config.min_history_for_optimization;
        if history.len() < required {
            tracing::debug!(
                required,
                actual = history.len(),
                "Skipping regression optimization: not enough trades"
            );
            return OptimizationOutcome::unchanged(
                params,
                OptimizationStatus::Skipped {
                    required,
                    actual: history.len(),
                },
            );
        }

        let features: Vec<[f64; 3]> = history.iter().map(TradeOutcome::features).collect();
        let targets: Vec<f64> = history.iter().map(|o| o.profit_pct).collect();

        let model = match LinearModel::fit(&features, &targets) {
            Ok(model) => model,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    trades = history.len(),
                    "Regression fit failed, keeping current parameters"
                );
                return OptimizationOutcome::unchanged(
                    params,
                    OptimizationStatus::FitFailed {
                        reason: e.to_string(),
                    },
                );
            }
        };

        let (candidate, predicted) = self.grid_search(&model, params);
        let bounds = &self.config.bounds;
        let blended = bounds.enforce(RiskParameters {
            stop_loss: blend(params.stop_loss, candidate.stop_loss),
            take_profit: blend(params.take_profit, candidate.take_profit),
            position_size: blend(params.position_size, candidate.position_size),
        });

        tracing::info!(
            stop_loss = blended.stop_loss,
            take_profit = blended.take_profit,
            position_size = blended.position_size,
            predicted_profit_pct = predicted,
            r_squared = model.r_squared,
            "Regression optimization applied"
        );

        OptimizationOutcome {
            parameters: blended,
            status: OptimizationStatus::Applied {
                candidate,
                predicted_profit_pct: predicted,
                r_squared: model.r_squared,
            },
        }
    }

    /// 그리드 전체를 평가하여 예측 수익률이 최대인 후보를 반환합니다.
    fn grid_search(&self, model: &LinearModel<3>, params: RiskParameters) -> (RiskParameters, f64) {
        let steps = self.config.grid_resolution;
        let bounds = &self.config.bounds;

        let stop_losses = linspace(bounds.min_stop_loss, bounds.max_stop_loss, steps);
        let take_profits = linspace(1.5 * params.stop_loss, 3.0 * params.stop_loss, steps);
        let position_sizes = linspace(
            self.config.min_grid_position_size,
            bounds.max_position_size,
            steps,
        );

        let mut best = (params, f64::NEG_INFINITY);
        for &stop_loss in &stop_losses {
            for &take_profit in &take_profits {
                for &position_size in &position_sizes {
                    let predicted = model.predict(&[stop_loss, take_profit, position_size]);
                    if predicted > best.1 {
                        best = (
                            RiskParameters::new(stop_loss, take_profit, position_size),
                            predicted,
                        );
                    }
                }
            }
        }
        best
    }
}

fn blend(current: f64, candidate: f64) -> f64 {
    (1.0 - BLEND_WEIGHT) * current + BLEND_WEIGHT * candidate
}

/// 불변 스냅샷에 대해 블로킹 스레드에서 최적화를 실행합니다.
///
/// 작업이 취소되거나 패닉하면 `FitFailed`로 보고하고 입력 파라미터를 유지합니다.
/// 호출 시점의 현재 span은 블로킹 스레드에서도 유지됩니다.
pub async fn optimize_detached(
    optimizer: RegressionOptimizer,
    history: Arc<[TradeOutcome]>,
    params: RiskParameters,
) -> OptimizationOutcome {
    let span = tracing::Span::current();
    let task = move || span.in_scope(|| optimizer.optimize(&history, params));
    match tokio::task::spawn_blocking(task).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!(error = %e, "Background optimization task failed");
            OptimizationOutcome::unchanged(
                params,
                OptimizationStatus::FitFailed {
                    reason: e.to_string(),
                },
            )
        }
    }
}
