use solana_sdk::pubkey::Pubkey;

/// Separator between address and display amount in an [`Entry::key`].
///
/// Base58 never produces ':' so the key is unambiguous.
const KEY_SEPARATOR: char = ':';

/// One validated (recipient, amount) transfer instruction.
///
/// Entries are constructed once per run by validation and are immutable
/// afterwards. `amount_display` keeps the cleaned decimal string from the
/// input because it participates in the idempotence key: re-sending the same
/// address with a different amount is a *new* entry, not an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Canonical recipient address
    pub address: Pubkey,

    /// Amount in base units (scaled by the asset's decimals)
    pub amount_units: u64,

    /// Cleaned decimal string as it appeared in the input
    pub amount_display: String,
}

impl Entry {
    /// Deterministic idempotence key recorded in the checkpoint once this
    /// entry's chunk is confirmed.
    pub fn key(&self) -> String {
        format!("{}{}{}", self.address, KEY_SEPARATOR, self.amount_display)
    }
}

/// The asset being distributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asset {
    /// Native currency; the aggregate chunk amount is attached to the
    /// submission as transferred value.
    Native,

    /// Token-style asset; requires a sufficient pre-authorization before the
    /// first chunk instead of attached value.
    Token { mint: Pubkey },
}

impl Asset {
    /// Stable identifier used in session fingerprints.
    pub fn identifier(&self) -> String {
        match self {
            Asset::Native => "native".to_string(),
            Asset::Token { mint } => mint.to_string(),
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Native)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_entry_key_includes_display_amount() {
        let address = Pubkey::from_str("11111111111111111111111111111112").unwrap();
        let a = Entry {
            address,
            amount_units: 100_000_000_000,
            amount_display: "100".to_string(),
        };
        let b = Entry {
            address,
            amount_units: 100_000_000_000,
            amount_display: "100.0".to_string(),
        };

        // Same address, same units, different display text: distinct keys.
        assert_ne!(a.key(), b.key());
        assert_eq!(a.key(), format!("{}:100", address));
    }

    #[test]
    fn test_asset_identifier() {
        let mint = Pubkey::new_unique();
        assert_eq!(Asset::Native.identifier(), "native");
        assert_eq!(Asset::Token { mint }.identifier(), mint.to_string());
        assert!(Asset::Native.is_native());
        assert!(!Asset::Token { mint }.is_native());
    }
}
