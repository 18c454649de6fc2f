//! 최소제곱 선형 회귀.
//!
//! 피처를 표준화한 뒤 정규방정식을 `nalgebra` LU 분해로 풉니다.
//! 상수 피처, 상수 타깃, 공선성 피처는 적합 실패로 처리합니다.

use nalgebra::{DMatrix, DVector};
use riskpilot_core::{RiskError, RiskResult};

/// 표준화된 정규방정식에서 허용하는 최소 피벗 크기.
const PIVOT_EPSILON: f64 = 1e-10;

/// 적합된 선형 모델 `y = intercept + Σ coefficients[i] × x[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel<const N: usize> {
    /// 절편
    pub intercept: f64,
    /// 피처 계수
    pub coefficients: [f64; N],
    /// 결정계수
    pub r_squared: f64,
}

impl<const N: usize> LinearModel<N> {
    /// 최소제곱으로 모델을 적합합니다.
    pub fn fit(features: &[[f64; N]], targets: &[f64]) -> RiskResult<Self> {
        if features.len() != targets.len() {
            return Err(RiskError::ModelFit(format!(
                "feature/target length mismatch: {} vs {}",
                features.len(),
                targets.len()
            )));
        }
        let n = targets.len();
        if n <= N {
            return Err(RiskError::ModelFit(format!(
                "need more than {N} samples, got {n}"
            )));
        }
        if features.iter().flatten().chain(targets).any(|v| !v.is_finite()) {
            return Err(RiskError::ModelFit("non-finite input".into()));
        }

        let count = n as f64;
        let mut means = [0.0; N];
        for row in features {
            for (m, x) in means.iter_mut().zip(row) {
                *m += x / count;
            }
        }
        let mut scales = [0.0; N];
        for row in features {
            for j in 0..N {
                scales[j] += (row[j] - means[j]).powi(2) / count;
            }
        }
        for (j, s) in scales.iter_mut().enumerate() {
            *s = s.sqrt();
            if *s < f64::EPSILON {
                return Err(RiskError::ModelFit(format!("feature {j} is constant")));
            }
        }

        let y_mean = targets.iter().sum::<f64>() / count;
        let ss_tot: f64 = targets.iter().map(|y| (y - y_mean).powi(2)).sum();
        if ss_tot < f64::EPSILON * f64::EPSILON {
            return Err(RiskError::ModelFit("target is constant".into()));
        }

        // 표준화 피처로 XᵀX / n, Xᵀy / n 구성
        let x = DMatrix::from_fn(n, N, |i, j| (features[i][j] - means[j]) / scales[j]);
        let y = DVector::from_fn(n, |i, _| targets[i] - y_mean);
        let xt = x.transpose();
        let xtx = (&xt * &x) / count;
        let xty = (&xt * &y) / count;

        let beta = solve(xtx, &xty)?;

        let mut coefficients = [0.0; N];
        let mut intercept = y_mean;
        for j in 0..N {
            coefficients[j] = beta[j] / scales[j];
            intercept -= coefficients[j] * means[j];
        }

        let mut model = Self {
            intercept,
            coefficients,
            r_squared: 0.0,
        };
        let ss_res: f64 = features
            .iter()
            .zip(targets)
            .map(|(x, y)| (y - model.predict(x)).powi(2))
            .sum();
        model.r_squared = 1.0 - ss_res / ss_tot;

        Ok(model)
    }

    /// 피처 벡터에 대한 예측값.
    pub fn predict(&self, x: &[f64; N]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(x)
                .map(|(c, v)| c * v)
                .sum::<f64>()
    }
}

/// LU 분해로 `a · x = b`를 풉니다. 피벗이 [`PIVOT_EPSILON`]보다 작으면 특이 행렬입니다.
fn solve(a: DMatrix<f64>, b: &DVector<f64>) -> RiskResult<DVector<f64>> {
    let lu = a.lu();
    if lu.u().diagonal().iter().any(|pivot| pivot.abs() < PIVOT_EPSILON) {
        return Err(RiskError::ModelFit("singular matrix".into()));
    }
    lu.solve(b)
        .ok_or_else(|| RiskError::ModelFit("singular matrix".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovers_exact_linear_relation() {
        // y = 0.5 + 2a - 3b + c
        let features: Vec<[f64; 3]> = (0..30)
            .map(|i| {
                let i = i as f64;
                [i * 0.1, (i * 0.37).sin(), (i * 0.11).cos() * 2.0]
            })
            .collect();
        let targets: Vec<f64> = features
            .iter()
            .map(|x| 0.5 + 2.0 * x[0] - 3.0 * x[1] + x[2])
            .collect();

        let model = LinearModel::fit(&features, &targets).unwrap();

        assert!((model.intercept - 0.5).abs() < 1e-8);
        assert!((model.coefficients[0] - 2.0).abs() < 1e-8);
        assert!((model.coefficients[1] + 3.0).abs() < 1e-8);
        assert!((model.coefficients[2] - 1.0).abs() < 1e-8);
        assert!((model.r_squared - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_feature_fails() {
        let features: Vec<[f64; 2]> = (0..10).map(|i| [i as f64, 1.0]).collect();
        let targets: Vec<f64> = (0..10).map(|i| i as f64 * 2.0).collect();

        let err = LinearModel::fit(&features, &targets).unwrap_err();
        assert!(matches!(err, RiskError::ModelFit(_)));
    }

    #[test]
    fn test_collinear_features_fail() {
        let features: Vec<[f64; 2]> = (0..10).map(|i| [i as f64, i as f64 * 2.0]).collect();
        let targets: Vec<f64> = (0..10).map(|i| (i as f64).sqrt()).collect();

        let err = LinearModel::fit(&features, &targets).unwrap_err();
        assert_eq!(err, RiskError::ModelFit("singular matrix".into()));
    }

    #[test]
    fn test_nearly_collinear_features_fail() {
        // 두 번째 피처가 첫 번째의 배수에 1e-13 수준의 잡음만 더한 경우
        let features: Vec<[f64; 2]> = (0..20)
            .map(|i| {
                let x = i as f64;
                [x, 3.0 * x + 1e-13 * (x * 0.7).sin()]
            })
            .collect();
        let targets: Vec<f64> = (0..20).map(|i| (i as f64 * 0.3).cos()).collect();

        let err = LinearModel::fit(&features, &targets).unwrap_err();
        assert_eq!(err, RiskError::ModelFit("singular matrix".into()));
    }

    #[test]
    fn test_constant_target_fails() {
        let features: Vec<[f64; 1]> = (0..10).map(|i| [i as f64]).collect();
        let targets = vec![0.01; 10];

        let err = LinearModel::fit(&features, &targets).unwrap_err();
        assert_eq!(err, RiskError::ModelFit("target is constant".into()));
    }

    #[test]
    fn test_too_few_samples_fail() {
        let features = vec![[1.0, 2.0, 3.0]; 3];
        let targets = vec![0.1, 0.2, 0.3];
        assert!(LinearModel::fit(&features, &targets).is_err());
    }
}
