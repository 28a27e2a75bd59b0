use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 紧急程度
///
/// 值对象：咨询服务对回复的分级，`Critical` 触发紧急升级提示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// 无需升级
    #[default]
    None,
    /// 中
    Medium,
    /// 高
    High,
    /// 危急，需要立即人工介入
    Critical,
}

impl Urgency {
    /// 获取所有紧急程度（按严重度升序）
    pub fn all() -> &'static [Urgency] {
        &[
            Urgency::None,
            Urgency::Medium,
            Urgency::High,
            Urgency::Critical,
        ]
    }

    /// 严重度数值，用于排序和比较
    pub fn severity(&self) -> u8 {
        match self {
            Urgency::None => 0,
            Urgency::Medium => 1,
            Urgency::High => 2,
            Urgency::Critical => 3,
        }
    }

    pub fn is_critical(&self) -> bool {
        matches!(self, Urgency::Critical)
    }

    /// 渲染层使用的样式提示
    pub fn badge(&self) -> &'static str {
        match self {
            Urgency::None => "neutral",
            Urgency::Medium => "caution",
            Urgency::High => "warning",
            Urgency::Critical => "alert",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Urgency::None => "none",
            Urgency::Medium => "medium",
            Urgency::High => "high",
            Urgency::Critical => "critical",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Urgency::None),
            "medium" => Ok(Urgency::Medium),
            "high" => Ok(Urgency::High),
            "critical" => Ok(Urgency::Critical),
            _ => Err(format!("Unknown urgency: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgency_ordering() {
        let severities: Vec<u8> = Urgency::all().iter().map(|u| u.severity()).collect();
        assert_eq!(severities, vec![0, 1, 2, 3]);
        assert!(Urgency::Critical.is_critical());
        assert!(!Urgency::High.is_critical());
    }

    #[test]
    fn test_urgency_parse() {
        assert_eq!("CRITICAL".parse::<Urgency>(), Ok(Urgency::Critical));
        assert_eq!("none".parse::<Urgency>(), Ok(Urgency::None));
        assert!("panic".parse::<Urgency>().is_err());
    }

    #[test]
    fn test_urgency_serde_lowercase() {
        let json = serde_json::to_string(&Urgency::High).unwrap();
        assert_eq!(json, "\"high\"");
        let parsed: Urgency = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(parsed, Urgency::Medium);
    }
}
