//! Gas cost of analyzed transactions
//!
//! Reported next to each notification in the log.

use crate::amount::NativeAmount;
use crate::types::{Block, Receipt, Transaction};
use alloy_primitives::U256;

/// Effective gas price paid by a transaction.
///
/// Priority order:
/// 1. `effectiveGasPrice` from the receipt
/// 2. `gasPrice` for legacy transactions
/// 3. `min(max_fee, base_fee + max_priority_fee)` for EIP-1559
///
/// Returns `None` when the inputs needed for the applicable rule are missing.
pub fn effective_gas_price(tx: &Transaction, receipt: &Receipt, block: &Block) -> Option<U256> {
    if let Some(egp) = receipt.effective_gas_price {
        return Some(egp);
    }

    if tx.is_legacy() {
        return tx.gas_price;
    }

    if tx.is_eip1559() {
        let base_fee = block.base_fee_per_gas?;
        let max_fee = tx.max_fee_per_gas?;
        let priority = tx.max_priority_fee_per_gas.unwrap_or(U256::ZERO);
        return Some(base_fee.saturating_add(priority).min(max_fee));
    }

    None
}

/// Total gas cost in the native unit: `gas_used * effective_gas_price`.
pub fn gas_cost(tx: &Transaction, receipt: &Receipt, block: &Block) -> Option<NativeAmount> {
    let price = effective_gas_price(tx, receipt, block)?;
    Some(NativeAmount::from_raw(receipt.gas_used.saturating_mul(price)))
}
