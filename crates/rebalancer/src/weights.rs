use crate::action::PortfolioAction;
use crate::error::RebalanceError;
use configuration::RebalanceSettings;
use core_types::{Asset, WeightVector};

/// Keeps a portfolio's weights summing to 1.0 as individual weights are edited.
///
/// The rebalancer holds no portfolio state. Every call takes the current assets
/// by reference and returns a freshly built `WeightVector`.
#[derive(Debug, Clone, Default)]
pub struct WeightRebalancer {
    settings: RebalanceSettings,
}

impl WeightRebalancer {
    pub fn new(settings: RebalanceSettings) -> Self {
        Self { settings }
    }

    /// Sets `edited` to `new_weight` and redistributes the complement across the
    /// other assets in proportion to their current weights.
    ///
    /// This never fails:
    /// - `new_weight` is clamped to `[0, 1]`; `NaN` keeps the asset's current weight.
    /// - If every other asset is at zero, the complement is split equally among them.
    /// - A lone asset always ends up at 1.0.
    /// - An unknown symbol edits nothing and the vector is only normalized.
    pub fn rebalance(&self, assets: &[Asset], edited: &str, new_weight: f64) -> WeightVector {
        let Some(edited_idx) = assets.iter().position(|a| a.symbol == edited) else {
            if !assets.is_empty() {
                tracing::warn!(symbol = edited, "Rebalance requested for an asset not in the portfolio.");
            }
            return self.normalize(assets);
        };

        let mut rebalanced = assets.to_vec();

        if rebalanced.len() == 1 {
            rebalanced[0].weight = 1.0;
            return rebalanced;
        }

        let target = if new_weight.is_nan() {
            sanitize(assets[edited_idx].weight).min(1.0)
        } else {
            new_weight.clamp(0.0, 1.0)
        };
        let remaining = 1.0 - target;

        let others_total: f64 = assets
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != edited_idx)
            .map(|(_, a)| sanitize(a.weight))
            .sum();
        let others_count = assets.len() - 1;

        tracing::debug!(
            symbol = edited,
            target,
            remaining,
            others_total,
            "Redistributing complement across {} other assets.",
            others_count
        );

        for (i, asset) in rebalanced.iter_mut().enumerate() {
            asset.weight = if i == edited_idx {
                target
            } else if others_total > 0.0 {
                remaining * (sanitize(asset.weight) / others_total)
            } else {
                remaining / others_count as f64
            };
        }

        rebalanced
    }

    /// Rescales all weights proportionally so they sum to 1.0, or splits evenly
    /// when every weight is zero.
    pub fn normalize(&self, assets: &[Asset]) -> WeightVector {
        let total: f64 = assets.iter().map(|a| sanitize(a.weight)).sum();
        if total <= 0.0 {
            return self.equalize(assets);
        }

        assets
            .iter()
            .map(|a| Asset {
                weight: sanitize(a.weight) / total,
                ..a.clone()
            })
            .collect()
    }

    /// Gives every asset the same weight, `1 / len`.
    pub fn equalize(&self, assets: &[Asset]) -> WeightVector {
        let equal_weight = 1.0 / assets.len().max(1) as f64;
        assets
            .iter()
            .map(|a| Asset {
                weight: equal_weight,
                ..a.clone()
            })
            .collect()
    }

    /// Appends `asset` and resets the portfolio to equal weights.
    pub fn add_asset(&self, assets: &[Asset], asset: Asset) -> Result<WeightVector, RebalanceError> {
        if assets.iter().any(|a| a.symbol == asset.symbol) {
            return Err(RebalanceError::DuplicateSymbol(asset.symbol));
        }

        let mut grown = assets.to_vec();
        grown.push(asset);
        Ok(self.equalize(&grown))
    }

    /// Drops `symbol` and resets the remaining assets to equal weights.
    pub fn remove_asset(&self, assets: &[Asset], symbol: &str) -> Result<WeightVector, RebalanceError> {
        let idx = assets
            .iter()
            .position(|a| a.symbol == symbol)
            .ok_or_else(|| RebalanceError::UnknownSymbol(symbol.to_string()))?;

        let mut shrunk = assets.to_vec();
        shrunk.remove(idx);
        Ok(self.equalize(&shrunk))
    }

    /// The portfolio transition function: `(state, action) -> state`.
    pub fn apply(&self, state: &[Asset], action: PortfolioAction) -> Result<WeightVector, RebalanceError> {
        match action {
            PortfolioAction::SetWeight { symbol, weight } => Ok(self.rebalance(state, &symbol, weight)),
            PortfolioAction::AddAsset { asset } => self.add_asset(state, asset),
            PortfolioAction::RemoveAsset { symbol } => self.remove_asset(state, &symbol),
            PortfolioAction::Equalize => Ok(self.equalize(state)),
        }
    }

    /// True when no weight is negative and the total is within the configured
    /// `RebalanceSettings::tolerance` of 1.0.
    /// An empty portfolio has nothing to satisfy.
    pub fn is_normalized(&self, assets: &[Asset]) -> bool {
        if assets.is_empty() {
            return true;
        }
        if assets.iter().any(|a| !a.weight.is_finite() || a.weight < 0.0) {
            return false;
        }
        let total: f64 = assets.iter().map(|a| a.weight).sum();
        (total - 1.0).abs() <= self.settings.tolerance
    }
}

/// Negative and non-finite weights carry no share.
fn sanitize(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 { weight } else { 0.0 }
}
