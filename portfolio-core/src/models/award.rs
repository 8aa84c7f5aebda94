use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Award {
    pub title: String,
    pub date: String,
}

impl Award {
    pub fn new(title: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: date.into(),
        }
    }
}

impl fmt::Display for Award {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.date)
    }
}

/// A grant or other funding received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSupport {
    pub title: String,
    pub fund_received: String,
    pub duration: String,
}

impl FinancialSupport {
    pub fn new(
        title: impl Into<String>,
        fund_received: impl Into<String>,
        duration: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            fund_received: fund_received.into(),
            duration: duration.into(),
        }
    }
}

impl fmt::Display for FinancialSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.title, self.fund_received, self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_financial_support_wire_names() {
        let support = FinancialSupport::new("DST Grant", "INR 20 Lakh", "2021-2024");
        let value = serde_json::to_value(&support).unwrap();
        assert_eq!(value["fundReceived"], "INR 20 Lakh");
    }
}
