//! Pricing model selection, backlog accounting and base fee updates.
use crate::config::{EXP_APPROXIMATION_ACCURACY, MAX_PRICING_EXPONENT_BIPS};
use crate::{PricingError, PricingState};
use arbos_o11y::log_assert;
use arbos_primitives_core::arith::{
    approx_exp_basis_points, natural_to_bips, saturating_i64, wei_mul_by_bips, Bips,
};
use arbos_primitives_core::multigas::{MultiGas, ResourceKind};
use arbos_primitives_core::types::{Gas, TimeDelta, Wei};
use arbos_primitives_core::version::PricingFeature;
use arbos_store::StorageError;
use enum_map::EnumMap;
use strum::IntoEnumIterator;

/// Which pricing model drives the base fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum GasModel {
    /// Single speed limit with tolerance and inertia.
    Legacy,
    /// One or more constraints on total gas.
    SingleGasConstraints,
    /// Constraints on weighted sums of resources.
    MultiGasConstraints,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BacklogOperation {
    Grow,
    Shrink,
}

impl BacklogOperation {
    fn apply(self, backlog: Gas, amount: Gas) -> Gas {
        match self {
            BacklogOperation::Grow => backlog.saturating_add(amount),
            BacklogOperation::Shrink => backlog.saturating_sub(amount),
        }
    }
}

impl PricingState {
    /// Selects the model from the ArbOS version and the configured constraints.
    pub fn gas_model_to_use(&self) -> Result<GasModel, StorageError> {
        if PricingFeature::MultiGasConstraints.enabled(self.arbos_version)
            && self.multi_gas_constraints.length()? > 0
        {
            return Ok(GasModel::MultiGasConstraints);
        }
        if PricingFeature::SingleGasConstraints.enabled(self.arbos_version)
            && self.gas_constraints.length()? > 0
        {
            return Ok(GasModel::SingleGasConstraints);
        }
        Ok(GasModel::Legacy)
    }

    /// Adds the usage of a transaction or block to the backlogs of the
    /// active model. `used_gas` feeds the legacy and single-gas models,
    /// `used_multi_gas` the multi-gas one.
    pub fn grow_backlog(&self, used_gas: Gas, used_multi_gas: &MultiGas) -> Result<(), StorageError> {
        self.update_backlog(BacklogOperation::Grow, used_gas, used_multi_gas)
    }

    /// Removes previously accounted usage from the backlogs, clamping at zero.
    pub fn shrink_backlog(
        &self,
        used_gas: Gas,
        used_multi_gas: &MultiGas,
    ) -> Result<(), StorageError> {
        self.update_backlog(BacklogOperation::Shrink, used_gas, used_multi_gas)
    }

    fn update_backlog(
        &self,
        op: BacklogOperation,
        used_gas: Gas,
        used_multi_gas: &MultiGas,
    ) -> Result<(), StorageError> {
        match self.gas_model_to_use()? {
            GasModel::Legacy => {
                let backlog = self.gas_backlog()?;
                self.set_gas_backlog(op.apply(backlog, used_gas))
            }
            GasModel::SingleGasConstraints => {
                for index in 0..self.gas_constraints.length()? {
                    let constraint = self.gas_constraints.at(index);
                    let backlog = constraint.backlog()?;
                    constraint.set_backlog(op.apply(backlog, used_gas))?;
                }
                Ok(())
            }
            GasModel::MultiGasConstraints => {
                for index in 0..self.multi_gas_constraints.length()? {
                    let constraint = self.multi_gas_constraints.at(index);
                    match op {
                        BacklogOperation::Grow => constraint.grow_backlog(used_multi_gas)?,
                        BacklogOperation::Shrink => constraint.shrink_backlog(used_multi_gas)?,
                    }
                }
                Ok(())
            }
        }
    }

    /// Decays the backlogs by `time_passed` seconds of target throughput and
    /// recomputes the base fee, plus the next per-resource fees when the
    /// multi-gas model is active.
    pub fn update_pricing_model(&self, time_passed: TimeDelta) -> Result<(), StorageError> {
        let model = self.gas_model_to_use()?;
        let _span =
            tracing::debug_span!(target: "l2pricing", "update_pricing_model", %model, time_passed)
                .entered();
        let base_fee = match model {
            GasModel::Legacy => self.update_pricing_model_legacy(time_passed)?,
            GasModel::SingleGasConstraints => self.update_pricing_model_single(time_passed)?,
            GasModel::MultiGasConstraints => self.update_pricing_model_multi(time_passed)?,
        };
        tracing::debug!(target: "l2pricing", %base_fee, "base fee updated");
        Ok(())
    }

    fn update_pricing_model_single(&self, time_passed: TimeDelta) -> Result<Wei, StorageError> {
        for index in 0..self.gas_constraints.length()? {
            let constraint = self.gas_constraints.at(index);
            let decay = constraint.target()?.saturating_mul(time_passed);
            let backlog = constraint.backlog()?;
            constraint.set_backlog(backlog.saturating_sub(decay))?;
        }
        let exponent = self.calc_gas_constraints_exponent()?;
        let base_fee = self.calc_base_fee_from_exponent(exponent)?;
        self.set_base_fee_wei(base_fee)?;
        Ok(base_fee)
    }

    /// Sum of the exponents of every single-gas constraint with a backlog.
    pub fn calc_gas_constraints_exponent(&self) -> Result<Bips, StorageError> {
        let mut total = Bips::ZERO;
        for index in 0..self.gas_constraints.length()? {
            let constraint = self.gas_constraints.at(index);
            let backlog = constraint.backlog()?;
            if backlog == 0 {
                continue;
            }
            let target = constraint.target()?;
            let window = constraint.adjustment_window()?;
            let divisor = Bips(saturating_i64(window.saturating_mul(target)));
            total = total.saturating_add(natural_to_bips(backlog).saturating_div(divisor));
        }
        Ok(total)
    }

    fn update_pricing_model_multi(&self, time_passed: TimeDelta) -> Result<Wei, StorageError> {
        for index in 0..self.multi_gas_constraints.length()? {
            let constraint = self.multi_gas_constraints.at(index);
            let decay = constraint.target()?.saturating_mul(time_passed);
            let backlog = constraint.backlog()?;
            constraint.set_backlog(backlog.saturating_sub(decay))?;
        }
        let exponents = self.calc_multi_gas_constraints_exponents()?;

        let mut max_exponent = Bips::ZERO;
        for kind in ResourceKind::known() {
            let exponent = exponents[kind];
            let next_fee = if exponent.is_zero() {
                Wei::zero()
            } else {
                self.calc_base_fee_from_exponent(exponent)?
            };
            self.multi_gas_fees.set_next_base_fee(kind, next_fee)?;
            max_exponent = max_exponent.max(exponent);
        }
        let base_fee = self.calc_base_fee_from_exponent(max_exponent)?;
        self.set_base_fee_wei(base_fee)?;
        Ok(base_fee)
    }

    /// Per-resource exponents, each summed over every multi-gas constraint
    /// that has a backlog and weighs the resource.
    pub fn calc_multi_gas_constraints_exponents(
        &self,
    ) -> Result<EnumMap<ResourceKind, Bips>, StorageError> {
        let mut exponents: EnumMap<ResourceKind, Bips> = EnumMap::default();
        for index in 0..self.multi_gas_constraints.length()? {
            let constraint = self.multi_gas_constraints.at(index);
            let backlog = constraint.backlog()?;
            if backlog == 0 {
                continue;
            }
            let target = constraint.target()?;
            let window = u64::from(constraint.adjustment_window()?);
            let max_weight = constraint.max_weight()?;
            let divisor =
                Bips(saturating_i64(window.saturating_mul(target).saturating_mul(max_weight)));
            for (kind, weight) in constraint.resources_with_weights()? {
                let exponent = natural_to_bips(backlog.saturating_mul(weight)).saturating_div(divisor);
                exponents[kind] = exponents[kind].saturating_add(exponent);
            }
        }
        Ok(exponents)
    }

    /// `min_base_fee * e^exponent`, with the exponent capped at
    /// [`MAX_PRICING_EXPONENT_BIPS`]. A non-positive exponent yields exactly
    /// the minimum base fee.
    pub fn calc_base_fee_from_exponent(&self, exponent: Bips) -> Result<Wei, StorageError> {
        let min_base_fee = self.min_base_fee_wei()?;
        if exponent <= Bips::ZERO {
            return Ok(min_base_fee);
        }
        let exponent = exponent.min(MAX_PRICING_EXPONENT_BIPS);
        let multiplier = approx_exp_basis_points(exponent, EXP_APPROXIMATION_ACCURACY);
        let base_fee = wei_mul_by_bips(min_base_fee, multiplier);
        log_assert!(base_fee >= min_base_fee, "base fee {base_fee} below minimum {min_base_fee}");
        Ok(base_fee)
    }

    /// Price of `usage` for refund purposes.
    ///
    /// Under the multi-gas model each resource is priced at its committed
    /// per-resource fee. L1 calldata, and any resource whose fee is zero,
    /// is priced at the scalar base fee instead, as is usage recorded under
    /// [`ResourceKind::Unknown`]. Under the other models every resource is
    /// priced at the scalar base fee.
    pub fn multi_dimensional_price_for_refund(
        &self,
        usage: &MultiGas,
    ) -> Result<Wei, PricingError> {
        let base_fee = self.base_fee_wei()?;
        let multi_gas = self.gas_model_to_use()? == GasModel::MultiGasConstraints;
        let mut total = Wei::zero();
        for kind in ResourceKind::iter() {
            let amount = usage.get(kind);
            if amount == 0 {
                continue;
            }
            let fee = if !multi_gas
                || matches!(kind, ResourceKind::L1Calldata | ResourceKind::Unknown)
            {
                base_fee
            } else {
                let fee = self.multi_gas_fees.current_base_fee(kind)?;
                if fee.is_zero() {
                    base_fee
                } else {
                    fee
                }
            };
            total = total.saturating_add(Wei::from(amount).saturating_mul(fee));
        }
        Ok(total)
    }
}
