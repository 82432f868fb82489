use core_types::Asset;
use serde::{Deserialize, Serialize};

/// A user edit to the portfolio, applied by [`WeightRebalancer::apply`](crate::WeightRebalancer::apply).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PortfolioAction {
    /// A slider moved. The other weights absorb the difference.
    SetWeight { symbol: String, weight: f64 },
    AddAsset { asset: Asset },
    RemoveAsset { symbol: String },
    /// Reset every asset to `1 / len`.
    Equalize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_use_a_type_tag() {
        let action: PortfolioAction =
            serde_json::from_str(r#"{"type":"set_weight","symbol":"AAPL","weight":0.4}"#).unwrap();
        assert_eq!(
            action,
            PortfolioAction::SetWeight {
                symbol: "AAPL".to_string(),
                weight: 0.4
            }
        );

        let add: PortfolioAction =
            serde_json::from_str(r#"{"type":"add_asset","asset":{"symbol":"MSFT","weight":0.0}}"#).unwrap();
        assert!(matches!(add, PortfolioAction::AddAsset { asset } if asset.symbol == "MSFT"));

        let reset: PortfolioAction = serde_json::from_str(r#"{"type":"equalize"}"#).unwrap();
        assert_eq!(reset, PortfolioAction::Equalize);
    }
}
