/*!
# Session Identity

A session identifies one logical "send this batch" intent. Re-running with
identical parameters reuses the session, which is what lets the checkpoint
store resume an interrupted run instead of double-sending.
*/

use crate::entries::Asset;
use sha2::{Digest, Sha256};
use solana_sdk::pubkey::Pubkey;

/// Deterministic fingerprint of (sender, target program, asset, input source).
///
/// Any change to the parameters yields a different session, so a run against
/// a different list file or a different mint never inherits another run's
/// confirmed-entry set.
pub fn session_fingerprint(
    sender: &Pubkey,
    target_program: &Pubkey,
    asset: &Asset,
    input_source: &str,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(sender.as_ref());
    hasher.update(target_program.as_ref());
    hasher.update(asset.identifier().as_bytes());
    hasher.update(input_source.as_bytes());
    hex::encode(hasher.finalize())
}
