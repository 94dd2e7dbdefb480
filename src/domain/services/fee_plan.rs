use solana_compute_budget_interface::ComputeBudgetInstruction;
use solana_sdk::instruction::Instruction;

use crate::domain::value_objects::PriorityFeeMicrolamports;

/// Compute budget prefix a caller attaches to a transaction before signing.
/// A signed payload cannot be changed afterwards, so the fee has to be baked
/// in at build time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PriorityFeePlan {
    compute_unit_limit: u32,
    compute_unit_price: PriorityFeeMicrolamports,
}

impl PriorityFeePlan {
    #[inline(always)]
    pub const fn new(compute_unit_limit: u32, compute_unit_price: PriorityFeeMicrolamports) -> Self {
        Self {
            compute_unit_limit,
            compute_unit_price,
        }
    }

    #[inline(always)]
    pub const fn compute_unit_price(&self) -> PriorityFeeMicrolamports {
        self.compute_unit_price
    }

    pub fn instructions(&self) -> Vec<Instruction> {
        let mut instructions = Vec::with_capacity(2);
        if self.compute_unit_limit > 0 {
            instructions.push(ComputeBudgetInstruction::set_compute_unit_limit(
                self.compute_unit_limit,
            ));
        }
        if !self.compute_unit_price.is_zero() {
            instructions.push(ComputeBudgetInstruction::set_compute_unit_price(
                self.compute_unit_price.as_u64(),
            ));
        }
        instructions
    }

    /// Prepends the budget instructions to `instructions`.
    pub fn apply(&self, instructions: Vec<Instruction>) -> Vec<Instruction> {
        let mut planned = self.instructions();
        planned.extend(instructions);
        planned
    }
}

#[cfg(test)]
mod tests {
    use super::PriorityFeePlan;
    use crate::domain::value_objects::PriorityFeeMicrolamports;

    #[test]
    fn emits_limit_and_price_when_both_set() {
        let plan = PriorityFeePlan::new(200_000, PriorityFeeMicrolamports::new(10_000));
        assert_eq!(plan.instructions().len(), 2);
    }

    #[test]
    fn skips_zero_fields() {
        let plan = PriorityFeePlan::new(0, PriorityFeeMicrolamports::new(0));
        assert!(plan.instructions().is_empty());

        let price_only = PriorityFeePlan::new(0, PriorityFeeMicrolamports::new(5));
        assert_eq!(price_only.instructions().len(), 1);
    }

    #[test]
    fn budget_instructions_come_first() {
        let plan = PriorityFeePlan::new(200_000, PriorityFeeMicrolamports::new(10_000));
        let budget = plan.instructions();
        let applied = plan.apply(Vec::new());

        assert_eq!(applied, budget);
    }
}
