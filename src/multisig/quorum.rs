//! Two-thirds approval quorum
//!
//! A proposal may execute once `3 * approvals >= 2 * owners`. The test is
//! done in integer arithmetic so the exact 2/3 boundary passes.

/// Numerator of the quorum fraction
pub const QUORUM_NUMERATOR: u128 = 2;
/// Denominator of the quorum fraction
pub const QUORUM_DENOMINATOR: u128 = 3;

/// Check whether `approvals` out of `owners` meets quorum
pub fn is_quorum(approvals: u32, owners: usize) -> bool {
    QUORUM_DENOMINATOR * approvals as u128 >= QUORUM_NUMERATOR * owners as u128
}

/// Minimum number of approvals that meets quorum for `owners` owners
pub fn quorum_threshold(owners: usize) -> u32 {
    let needed = (QUORUM_NUMERATOR * owners as u128).div_ceil(QUORUM_DENOMINATOR);
    u32::try_from(needed).unwrap_or(u32::MAX)
}
