use std::fmt::{Display, Formatter};

use solana_sdk::hash::Hash;

/// Validity bound of a signed transaction: the blockhash it references and
/// the last block height at which the cluster still accepts it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BlockhashWindow {
    reference_hash: Hash,
    last_valid_height: u64,
}

impl BlockhashWindow {
    #[inline(always)]
    pub const fn new(reference_hash: Hash, last_valid_height: u64) -> Self {
        Self {
            reference_hash,
            last_valid_height,
        }
    }

    #[inline(always)]
    pub const fn reference_hash(&self) -> Hash {
        self.reference_hash
    }

    #[inline(always)]
    pub const fn last_valid_height(&self) -> u64 {
        self.last_valid_height
    }

    #[inline(always)]
    pub const fn is_expired(&self, current_height: u64) -> bool {
        current_height > self.last_valid_height
    }

    /// Raises the bound when the cluster reports a later valid height for the
    /// same blockhash. The bound never moves backwards.
    pub fn extend_to(self, last_valid_height: u64) -> Self {
        Self {
            reference_hash: self.reference_hash,
            last_valid_height: self.last_valid_height.max(last_valid_height),
        }
    }
}

impl Display for BlockhashWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.reference_hash, self.last_valid_height)
    }
}

#[cfg(test)]
mod tests {
    use solana_sdk::hash::Hash;

    use super::BlockhashWindow;

    #[test]
    fn expires_strictly_after_last_valid_height() {
        let window = BlockhashWindow::new(Hash::new_unique(), 100);

        assert!(!window.is_expired(99));
        assert!(!window.is_expired(100));
        assert!(window.is_expired(101));
    }

    #[test]
    fn extension_never_lowers_the_bound() {
        let window = BlockhashWindow::new(Hash::new_unique(), 100);

        assert_eq!(window.extend_to(150).last_valid_height(), 150);
        assert_eq!(window.extend_to(50).last_valid_height(), 100);
        assert_eq!(window.extend_to(150).reference_hash(), window.reference_hash());
    }
}
