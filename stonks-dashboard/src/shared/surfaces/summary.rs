use super::ViewSurface;
use crate::shared::format::round_half_up;
use crate::shared::types::PortfolioSnapshot;

/// Headline portfolio figures
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub market_value: f64,
    pub net_return: f64,
    pub net_return_percent: f64,
}

impl From<&PortfolioSnapshot> for Totals {
    fn from(snapshot: &PortfolioSnapshot) -> Self {
        Self {
            market_value: snapshot.market_value,
            net_return: snapshot.net_return,
            net_return_percent: snapshot.net_return_percent,
        }
    }
}

/// Summary plates: market value, net return, unrealized and unrealized after tax
#[derive(Debug, Clone, PartialEq)]
pub struct SummarySurface {
    totals: Totals,
    tax_rate: f64,
}

impl SummarySurface {
    pub fn new(tax_rate: f64) -> Self {
        Self {
            totals: Totals::default(),
            tax_rate,
        }
    }

    pub fn set_totals(&mut self, totals: Totals) {
        self.totals = totals;
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    /// Derived on read, never stored
    pub fn net_return_after_tax(&self) -> f64 {
        let net = self.totals.net_return;
        round_half_up(net - net * self.tax_rate)
    }
}

impl ViewSurface for SummarySurface {
    type Update = Totals;

    fn update(&mut self, update: Totals) {
        self.set_totals(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_totals_replaces() {
        let mut summary = SummarySurface::new(0.3168);
        summary.set_totals(Totals {
            market_value: 100_000.0,
            net_return: 5_000.0,
            net_return_percent: 5.26,
        });
        summary.update(Totals {
            market_value: 90_000.0,
            net_return: -1_000.0,
            net_return_percent: -1.1,
        });

        assert_eq!(
            summary.totals(),
            Totals {
                market_value: 90_000.0,
                net_return: -1_000.0,
                net_return_percent: -1.1,
            }
        );
    }

    #[test]
    fn test_net_return_after_tax() {
        let mut summary = SummarySurface::new(0.3168);
        summary.set_totals(Totals {
            market_value: 110_000.0,
            net_return: 10_000.0,
            net_return_percent: 10.0,
        });
        // 10000 - 3168
        assert_eq!(summary.net_return_after_tax(), 6832.0);

        summary.set_totals(Totals {
            net_return: -1_000.0,
            ..summary.totals()
        });
        // -1000 + 316.8 = -683.2
        assert_eq!(summary.net_return_after_tax(), -683.0);
    }

    #[test]
    fn test_tax_rate_is_configurable() {
        let mut summary = SummarySurface::new(0.352);
        summary.set_totals(Totals {
            net_return: 1_000.0,
            ..Totals::default()
        });
        assert_eq!(summary.net_return_after_tax(), 648.0);
    }
}
