use std::fmt::{Display, Formatter};

const LAMPORTS_PER_SOL: u64 = 1_000_000_000;
const SOL_DECIMALS: usize = 9;

#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
pub struct Lamports(u64);

impl Lamports {
    #[inline(always)]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[inline(always)]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    #[inline(always)]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Parses a decimal SOL string ("0.0001", ".5", "2") into lamports using
    /// integer math only. Zero, negative, and sub-lamport inputs are rejected.
    pub fn parse_positive_sol(sol: &str) -> Option<Self> {
        let lamports = sol_to_lamports(sol.trim())?;
        if lamports == 0 {
            return None;
        }

        Some(Self(lamports))
    }

    pub fn as_sol_string(self) -> String {
        let whole = self.0 / LAMPORTS_PER_SOL;
        let fractional = self.0 % LAMPORTS_PER_SOL;

        if fractional == 0 {
            return whole.to_string();
        }

        let padded = format!("{fractional:09}");
        format!("{whole}.{}", padded.trim_end_matches('0'))
    }
}

impl Display for Lamports {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} SOL", self.as_sol_string())
    }
}

fn sol_to_lamports(sol: &str) -> Option<u64> {
    let (whole_digits, fractional_digits) = sol.split_once('.').unwrap_or((sol, ""));

    if whole_digits.is_empty() && fractional_digits.is_empty() {
        return None;
    }
    if fractional_digits.len() > SOL_DECIMALS {
        return None;
    }

    let whole = digits_to_u64(whole_digits)?;
    let fractional = digits_to_u64(fractional_digits)?;
    let missing_decimals = u32::try_from(SOL_DECIMALS.saturating_sub(fractional_digits.len())).ok()?;
    let scale = 10_u64.checked_pow(missing_decimals)?;

    whole
        .checked_mul(LAMPORTS_PER_SOL)?
        .checked_add(fractional.checked_mul(scale)?)
}

/// Empty input is zero; anything other than ASCII digits is rejected.
fn digits_to_u64(digits: &str) -> Option<u64> {
    digits.bytes().try_fold(0_u64, |acc, byte| {
        if !byte.is_ascii_digit() {
            return None;
        }

        acc.checked_mul(10)?
            .checked_add(u64::from(byte.saturating_sub(b'0')))
    })
}
