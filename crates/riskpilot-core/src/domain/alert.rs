//! 뉴스/이벤트 모니터링에서 유도된 외부 경보 수준.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RiskError;

/// 세션 단위 경보 수준.
///
/// 알 수 없는 문자열은 조용히 무시되지 않고 파싱 에러가 됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    /// 경보 없음
    #[default]
    None,
    /// 주의
    Medium,
    /// 경고
    High,
    /// 위기
    Critical,
}

impl AlertLevel {
    /// 모든 경보 수준 (심각도 오름차순).
    pub const ALL: [AlertLevel; 4] = [
        AlertLevel::None,
        AlertLevel::Medium,
        AlertLevel::High,
        AlertLevel::Critical,
    ];

    /// 문자열 표현.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::None => "none",
            AlertLevel::Medium => "medium",
            AlertLevel::High => "high",
            AlertLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertLevel {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "low" => Ok(AlertLevel::None),
            "medium" => Ok(AlertLevel::Medium),
            "high" => Ok(AlertLevel::High),
            "critical" => Ok(AlertLevel::Critical),
            other => Err(RiskError::InvalidInput(format!(
                "unknown alert level: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_alert_level() {
        assert_eq!("none".parse::<AlertLevel>().unwrap(), AlertLevel::None);
        assert_eq!("LOW".parse::<AlertLevel>().unwrap(), AlertLevel::None);
        assert_eq!(" High ".parse::<AlertLevel>().unwrap(), AlertLevel::High);
        assert_eq!(
            "critical".parse::<AlertLevel>().unwrap(),
            AlertLevel::Critical
        );
        assert!("severe".parse::<AlertLevel>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&AlertLevel::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
        let level: AlertLevel = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(level, AlertLevel::Medium);
    }

    #[test]
    fn test_display_round_trip() {
        for level in AlertLevel::ALL {
            assert_eq!(level.to_string().parse::<AlertLevel>().unwrap(), level);
        }
    }
}
