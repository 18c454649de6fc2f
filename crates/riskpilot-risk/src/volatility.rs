//! 수익률 표준편차 기반 변동성 추정.
//!
//! 변동성은 보조 신호이므로 데이터가 부족해도 에러를 내지 않습니다.
//! 마지막으로 유효했던 추정치를 유지하고 상태만 알려줍니다.

use serde::{Deserialize, Serialize};

/// 추정 결과 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum VolatilityStatus {
    /// 이번 호출로 새로 계산됨
    Updated,
    /// 가격 샘플 부족: 이전 값 유지
    InsufficientData { required: usize, actual: usize },
    /// 0 이하이거나 유한하지 않은 가격 포함: 이전 값 유지
    InvalidPrices,
}

/// 변동성 추정 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityReading {
    /// 현재 유효한 변동성 (갱신 실패 시 이전 값)
    pub value: f64,
    /// 추정 상태
    pub status: VolatilityStatus,
}

impl VolatilityReading {
    /// 이번 호출에서 값이 갱신되었는지 확인합니다.
    pub fn is_fresh(&self) -> bool {
        self.status == VolatilityStatus::Updated
    }
}

/// 가격 시계열의 수익률 모표준편차를 계산합니다.
///
/// 수익률은 `(p[i] - p[i-1]) / p[i-1]`입니다.
/// 가격이 2개 미만이거나 0 이하/유한하지 않은 가격이 있으면 `None`입니다.
pub fn returns_std_dev(prices: &[f64]) -> Option<f64> {
    if prices.len() < 2 || prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
        return None;
    }

    let returns: Vec<f64> = prices.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect();
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;

    Some(variance.sqrt())
}

/// 최근 N개 가격 샘플로 변동성을 추정하는 추정기.
#[derive(Debug, Clone)]
pub struct VolatilityEstimator {
    window: usize,
    last: f64,
}

impl Default for VolatilityEstimator {
    fn default() -> Self {
        Self::new(24)
    }
}

impl VolatilityEstimator {
    /// 주어진 윈도우 크기로 추정기를 생성합니다. 윈도우는 최소 2입니다.
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(2),
            last: 0.0,
        }
    }

    /// 이전 추정치를 지정하여 생성합니다 (상태 복원용).
    pub fn with_last(mut self, last: f64) -> Self {
        self.last = if last.is_finite() { last.max(0.0) } else { 0.0 };
        self
    }

    /// 윈도우 크기.
    pub fn window(&self) -> usize {
        self.window
    }

    /// 마지막 유효 추정치.
    pub fn last(&self) -> f64 {
        self.last
    }

    /// 최근 `window`개 가격으로 변동성을 다시 계산합니다.
    ///
    /// 가격이 부족하면 갱신하지 않고 이전 값과 `InsufficientData`를 반환합니다.
    pub fn estimate(&mut self, prices: &[f64]) -> VolatilityReading {
        if prices.len() < self.window {
            tracing::debug!(
                required = self.window,
                actual = prices.len(),
                last = self.last,
                "Not enough prices for volatility, keeping last estimate"
            );
            return VolatilityReading {
                value: self.last,
                status: VolatilityStatus::InsufficientData {
                    required: self.window,
                    actual: prices.len(),
                },
            };
        }

        let recent = &prices[prices.len() - self.window..];
        match returns_std_dev(recent) {
            Some(value) => {
                self.last = value;
                VolatilityReading {
                    value,
                    status: VolatilityStatus::Updated,
                }
            }
            None => {
                tracing::warn!(
                    window = self.window,
                    last = self.last,
                    "Price window contains invalid prices, keeping last estimate"
                );
                VolatilityReading {
                    value: self.last,
                    status: VolatilityStatus::InvalidPrices,
                }
            }
        }
    }
}
