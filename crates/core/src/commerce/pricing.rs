use serde::{Deserialize, Serialize};

use crate::domain::order::CityZone;
use crate::lexicon::Lexicon;

pub const DEFAULT_INSIDE_FEE: u64 = 70;
pub const DEFAULT_OUTSIDE_FEE: u64 = 150;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryFees {
    pub inside: u64,
    pub outside: u64,
}

impl Default for DeliveryFees {
    fn default() -> Self {
        Self { inside: DEFAULT_INSIDE_FEE, outside: DEFAULT_OUTSIDE_FEE }
    }
}

impl DeliveryFees {
    pub fn fee_for(&self, zone: CityZone) -> u64 {
        match zone {
            CityZone::Inside => self.inside,
            CityZone::Outside => self.outside,
        }
    }
}

/// Locality keywords served at the inside-zone fee. No geocoding: an address
/// is inside when it mentions one of the keywords.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeliveryZones {
    inside: Lexicon,
}

impl DeliveryZones {
    pub fn new(inside: Lexicon) -> Self {
        Self { inside }
    }

    pub fn classify(&self, address: &str) -> CityZone {
        if self.inside.matches_raw(address) {
            CityZone::Inside
        } else {
            CityZone::Outside
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub subtotal: u64,
    pub delivery_fee: u64,
    pub total: u64,
}

#[derive(Clone, Debug, Default)]
pub struct PricingCalculator {
    fees: DeliveryFees,
    zones: DeliveryZones,
}

impl PricingCalculator {
    pub fn new(fees: DeliveryFees, zones: DeliveryZones) -> Self {
        Self { fees, zones }
    }

    pub fn zones(&self) -> &DeliveryZones {
        &self.zones
    }

    pub fn fees(&self) -> DeliveryFees {
        self.fees
    }

    /// Returns `None` when the unit price is unknown, i.e. the product could
    /// not be resolved.
    pub fn compute_total(
        &self,
        unit_price: Option<u64>,
        quantity: u32,
        address: &str,
    ) -> Option<PriceBreakdown> {
        let unit_price = unit_price?;
        let subtotal = unit_price.saturating_mul(u64::from(quantity));
        let delivery_fee = self.fees.fee_for(self.zones.classify(address));

        Some(PriceBreakdown { subtotal, delivery_fee, total: subtotal.saturating_add(delivery_fee) })
    }
}

#[cfg(test)]
mod tests {
    use super::{DeliveryFees, DeliveryZones, PriceBreakdown, PricingCalculator};
    use crate::domain::order::CityZone;
    use crate::lexicon::Lexicons;

    fn calculator() -> PricingCalculator {
        PricingCalculator::new(
            DeliveryFees::default(),
            DeliveryZones::new(Lexicons::default().inside_zone),
        )
    }

    #[test]
    fn inside_zone_address_uses_inside_fee() {
        let breakdown = calculator().compute_total(Some(1050), 1, "মিরপুর ১০");
        assert_eq!(
            breakdown,
            Some(PriceBreakdown { subtotal: 1050, delivery_fee: 70, total: 1120 })
        );
    }

    #[test]
    fn unknown_locality_uses_outside_fee() {
        let breakdown = calculator().compute_total(Some(800), 2, "Chattogram, Agrabad");
        assert_eq!(
            breakdown,
            Some(PriceBreakdown { subtotal: 1600, delivery_fee: 150, total: 1750 })
        );
    }

    #[test]
    fn missing_unit_price_yields_no_breakdown() {
        assert_eq!(calculator().compute_total(None, 3, "Dhaka"), None);
    }

    #[test]
    fn subtotal_grows_by_unit_price_per_extra_item() {
        let calculator = calculator();
        for quantity in 1..20u32 {
            let current = calculator.compute_total(Some(1050), quantity, "Uttara").map(|b| b.subtotal);
            let next =
                calculator.compute_total(Some(1050), quantity + 1, "Uttara").map(|b| b.subtotal);
            assert_eq!(next.zip(current).map(|(next, current)| next - current), Some(1050));
        }
    }

    #[test]
    fn zone_classification_ignores_case() {
        let zones = DeliveryZones::new(Lexicons::default().inside_zone);
        assert_eq!(zones.classify("House 4, Road 2, DHANMONDI"), CityZone::Inside);
        assert_eq!(zones.classify(""), CityZone::Outside);
    }
}
