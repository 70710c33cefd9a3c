//! The speed-limit model used before gas constraints existed.
use crate::PricingState;
use arbos_primitives_core::arith::{natural_to_bips, saturating_i64, Bips};
use arbos_primitives_core::types::{TimeDelta, Wei};
use arbos_store::StorageError;

impl PricingState {
    /// Decays the legacy backlog by the speed limit and prices the part of it
    /// above `backlog_tolerance` seconds of gas, with `pricing_inertia`
    /// seconds per factor of e.
    pub(crate) fn update_pricing_model_legacy(
        &self,
        time_passed: TimeDelta,
    ) -> Result<Wei, StorageError> {
        let speed_limit = self.speed_limit_per_second()?;
        let backlog = self.gas_backlog()?.saturating_sub(speed_limit.saturating_mul(time_passed));
        self.set_gas_backlog(backlog)?;

        let inertia = self.pricing_inertia()?;
        let tolerance = self.backlog_tolerance()?;
        let tolerated = tolerance.saturating_mul(speed_limit);
        let exponent = if backlog > tolerated {
            let divisor = Bips(saturating_i64(inertia.saturating_mul(speed_limit)));
            natural_to_bips(backlog - tolerated).saturating_div(divisor)
        } else {
            Bips::ZERO
        };
        let base_fee = self.calc_base_fee_from_exponent(exponent)?;
        self.set_base_fee_wei(base_fee)?;
        Ok(base_fee)
    }
}
