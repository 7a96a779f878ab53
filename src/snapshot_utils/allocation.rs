use crate::error::{SnapshotError, SnapshotResult};
use crate::snapshot_utils::holder_eligibility::HolderEligibility;
use crate::snapshot_utils::report::HolderRow;
use num_bigint::BigUint;
use std::collections::HashMap;

pub type AllocationMap = HashMap<String, BigUint>;

/// Splits `total_raw` across eligible rows proportionally to their balance.
///
/// Shares are floored, the rounding remainder goes to the first eligible row
/// in `rows` order, so the allocation always sums to exactly `total_raw`.
/// Excluded rows are present with a zero share.
pub fn allocate(
    rows: &[HolderRow],
    total_raw: &BigUint,
    excluded: &HolderEligibility,
) -> SnapshotResult<AllocationMap> {
    let eligible_total: BigUint = rows
        .iter()
        .filter(|row| excluded.is_eligible(&row.address))
        .map(|row| &row.raw_balance)
        .sum();
    if eligible_total == BigUint::default() {
        return Err(SnapshotError::NoEligibleHolders);
    }

    let mut allocation = AllocationMap::with_capacity(rows.len());
    let mut allocated = BigUint::default();
    let mut first_eligible: Option<&str> = None;

    for row in rows.iter() {
        if excluded.is_excluded(&row.address) {
            allocation.insert(row.address.clone(), BigUint::default());
            continue;
        }
        let share = total_raw * &row.raw_balance / &eligible_total;
        allocated += &share;
        first_eligible.get_or_insert(&row.address);
        allocation.insert(row.address.clone(), share);
    }

    // floor division never over-allocates
    let remainder = total_raw - &allocated;
    if remainder > BigUint::default() {
        if let Some(share) = first_eligible.and_then(|address| allocation.get_mut(address)) {
            *share += remainder;
        }
    }

    Ok(allocation)
}
