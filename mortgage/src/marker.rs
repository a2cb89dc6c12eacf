//! Collateral marker denom derivation.

use parcel_keys::blake2b_256_multi;

/// Derive the single-unit collateral marker denom for a mortgage.
///
/// Deterministic over `(collateral, mortgage index)` so every party —
/// gateway, ledger, auditors — derives the same denom without coordination.
pub fn marker_denom(collateral: &str, mortgage_index: u64) -> String {
    let digest = blake2b_256_multi(&[collateral.as_bytes(), &mortgage_index.to_be_bytes()]);
    format!("clm{}", &hex::encode(digest)[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        assert_eq!(marker_denom("deed-7", 3), marker_denom("deed-7", 3));
    }

    #[test]
    fn distinct_inputs_distinct_denoms() {
        assert_ne!(marker_denom("deed-7", 3), marker_denom("deed-7", 4));
        assert_ne!(marker_denom("deed-7", 3), marker_denom("deed-8", 3));
    }

    #[test]
    fn denom_shape() {
        let denom = marker_denom("deed-7", 1);
        assert!(denom.starts_with("clm"));
        assert_eq!(denom.len(), 3 + 16);
    }
}
