// Metric domain models
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::StatsError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub date: String,
    pub value: f64,
}

impl MetricPoint {
    pub fn new(date: impl Into<String>, value: f64) -> Self {
        Self {
            date: date.into(),
            value,
        }
    }
}

/// How values falling into the same bucket are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationPolicy {
    Sum,
    Max,
}

impl AggregationPolicy {
    /// Name-based fallback: running totals are called "cumulative..." upstream.
    pub fn infer(metric_name: &str) -> Self {
        if metric_name.to_lowercase().contains("cumulative") {
            AggregationPolicy::Max
        } else {
            AggregationPolicy::Sum
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKey {
    ActiveAddresses,
    ActiveSenders,
    TxCount,
    CumulativeAddresses,
    CumulativeTxCount,
    CumulativeContracts,
    CumulativeDeployers,
    Contracts,
    Deployers,
    GasUsed,
    AvgGps,
    MaxGps,
    AvgTps,
    MaxTps,
    AvgGasPrice,
    MaxGasPrice,
    FeesPaid,
    IcmMessages,
}

impl MetricKey {
    pub const ALL: [MetricKey; 18] = [
        MetricKey::ActiveAddresses,
        MetricKey::ActiveSenders,
        MetricKey::TxCount,
        MetricKey::CumulativeAddresses,
        MetricKey::CumulativeTxCount,
        MetricKey::CumulativeContracts,
        MetricKey::CumulativeDeployers,
        MetricKey::Contracts,
        MetricKey::Deployers,
        MetricKey::GasUsed,
        MetricKey::AvgGps,
        MetricKey::MaxGps,
        MetricKey::AvgTps,
        MetricKey::MaxTps,
        MetricKey::AvgGasPrice,
        MetricKey::MaxGasPrice,
        MetricKey::FeesPaid,
        MetricKey::IcmMessages,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::ActiveAddresses => "activeAddresses",
            MetricKey::ActiveSenders => "activeSenders",
            MetricKey::TxCount => "txCount",
            MetricKey::CumulativeAddresses => "cumulativeAddresses",
            MetricKey::CumulativeTxCount => "cumulativeTxCount",
            MetricKey::CumulativeContracts => "cumulativeContracts",
            MetricKey::CumulativeDeployers => "cumulativeDeployers",
            MetricKey::Contracts => "contracts",
            MetricKey::Deployers => "deployers",
            MetricKey::GasUsed => "gasUsed",
            MetricKey::AvgGps => "avgGps",
            MetricKey::MaxGps => "maxGps",
            MetricKey::AvgTps => "avgTps",
            MetricKey::MaxTps => "maxTps",
            MetricKey::AvgGasPrice => "avgGasPrice",
            MetricKey::MaxGasPrice => "maxGasPrice",
            MetricKey::FeesPaid => "feesPaid",
            MetricKey::IcmMessages => "icmMessages",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MetricKey::ActiveAddresses => "Active Addresses",
            MetricKey::ActiveSenders => "Active Senders",
            MetricKey::TxCount => "Transactions",
            MetricKey::CumulativeAddresses => "Total Addresses",
            MetricKey::CumulativeTxCount => "Total Transactions",
            MetricKey::CumulativeContracts => "Total Contracts",
            MetricKey::CumulativeDeployers => "Total Deployers",
            MetricKey::Contracts => "Contracts Deployed",
            MetricKey::Deployers => "Contract Deployers",
            MetricKey::GasUsed => "Gas Used",
            MetricKey::AvgGps => "Avg Gas/s",
            MetricKey::MaxGps => "Max Gas/s",
            MetricKey::AvgTps => "Avg TPS",
            MetricKey::MaxTps => "Max TPS",
            MetricKey::AvgGasPrice => "Avg Gas Price",
            MetricKey::MaxGasPrice => "Max Gas Price",
            MetricKey::FeesPaid => "Fees Paid",
            MetricKey::IcmMessages => "ICM Messages",
        }
    }

    /// Running totals take the bucket max, everything else is summed.
    pub fn aggregation(&self) -> AggregationPolicy {
        match self {
            MetricKey::CumulativeAddresses
            | MetricKey::CumulativeTxCount
            | MetricKey::CumulativeContracts
            | MetricKey::CumulativeDeployers => AggregationPolicy::Max,
            _ => AggregationPolicy::Sum,
        }
    }

    /// ICM message counts come from a separate endpoint with its own item shape.
    pub fn is_message_count(&self) -> bool {
        matches!(self, MetricKey::IcmMessages)
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKey {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| StatsError::UnknownMetric(s.to_string()))
    }
}

/// Temporal bucket granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Resolution {
    #[default]
    D,
    W,
    M,
    Q,
    Y,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::D => "D",
            Resolution::W => "W",
            Resolution::M => "M",
            Resolution::Q => "Q",
            Resolution::Y => "Y",
        }
    }
}

impl FromStr for Resolution {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "d" | "daily" => Ok(Resolution::D),
            "w" | "weekly" => Ok(Resolution::W),
            "m" | "monthly" => Ok(Resolution::M),
            "q" | "quarterly" => Ok(Resolution::Q),
            "y" | "yearly" => Ok(Resolution::Y),
            _ => Err(StatsError::UnknownResolution(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_key_round_trips_through_str() {
        for key in MetricKey::ALL {
            assert_eq!(key.as_str().parse::<MetricKey>().unwrap(), key);
        }
        assert!(matches!(
            "txcount".parse::<MetricKey>(),
            Err(StatsError::UnknownMetric(_))
        ));
    }

    #[test]
    fn test_metric_key_serde_matches_as_str() {
        let json = serde_json::to_string(&MetricKey::CumulativeTxCount).unwrap();
        assert_eq!(json, "\"cumulativeTxCount\"");
        let key: MetricKey = serde_json::from_str("\"icmMessages\"").unwrap();
        assert_eq!(key, MetricKey::IcmMessages);
    }

    #[test]
    fn test_explicit_policy_agrees_with_name_heuristic() {
        for key in MetricKey::ALL {
            assert_eq!(key.aggregation(), AggregationPolicy::infer(key.as_str()));
        }
    }

    #[test]
    fn test_infer_is_case_insensitive() {
        assert_eq!(AggregationPolicy::infer("CumulativeFoo"), AggregationPolicy::Max);
        assert_eq!(AggregationPolicy::infer("totalCUMULATIVE"), AggregationPolicy::Max);
        assert_eq!(AggregationPolicy::infer("txCount"), AggregationPolicy::Sum);
    }

    #[test]
    fn test_resolution_parse() {
        assert_eq!("D".parse::<Resolution>().unwrap(), Resolution::D);
        assert_eq!("weekly".parse::<Resolution>().unwrap(), Resolution::W);
        assert_eq!("Quarterly".parse::<Resolution>().unwrap(), Resolution::Q);
        assert!("hourly".parse::<Resolution>().is_err());
    }
}
