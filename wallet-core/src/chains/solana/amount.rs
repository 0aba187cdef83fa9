// wallet-core/src/chains/solana/amount.rs
//
// SOL <-> lamports conversion (fixed-point, 9 decimals)

use crate::error::{TransactionError, WalletResult};
use crate::network::models::Balance;

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;
pub const SOL_DECIMALS: u8 = 9;
pub const SOL_SYMBOL: &str = "SOL";

/// Chuyển số SOL dạng decimal string sang lamports
///
/// Làm tròn half-to-nearest (half away from zero) ở chữ số thứ 10,
/// không truncate: "0.0000000015" -> 2 lamports.
/// Không dùng f64 nên "1.5" luôn ra đúng 1_500_000_000.
///
/// # Errors
/// - `InvalidAmount`: rỗng, âm, không phải số, hoặc làm tròn ra 0
/// - `AmountOverflow`: vượt quá u64 lamports
pub fn sol_to_lamports(amount: &str) -> WalletResult<u64> {
    let trimmed = amount.trim();
    let invalid = || TransactionError::InvalidAmount(trimmed.to_string());

    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (trimmed, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid().into());
    }
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) {
        return Err(invalid().into());
    }

    let overflow = || TransactionError::AmountOverflow(trimmed.to_string());

    let mut whole: u64 = 0;
    for digit in int_part.bytes() {
        whole = whole
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(digit - b'0')))
            .ok_or_else(overflow)?;
    }

    let frac = frac_part.as_bytes();
    let mut fraction: u64 = 0;
    for i in 0..SOL_DECIMALS as usize {
        let digit = frac.get(i).map(|b| u64::from(b - b'0')).unwrap_or(0);
        fraction = fraction * 10 + digit;
    }
    let round_up = frac
        .get(SOL_DECIMALS as usize)
        .map(|b| *b >= b'5')
        .unwrap_or(false);

    let lamports = whole
        .checked_mul(LAMPORTS_PER_SOL)
        .and_then(|v| v.checked_add(fraction))
        .and_then(|v| v.checked_add(u64::from(round_up)))
        .ok_or_else(overflow)?;

    if lamports == 0 {
        return Err(invalid().into());
    }
    Ok(lamports)
}

/// Như `sol_to_lamports` nhưng cho caller đã có f64 (VD: slider UI)
pub fn sol_f64_to_lamports(amount: f64) -> WalletResult<u64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(TransactionError::InvalidAmount(amount.to_string()).into());
    }
    let lamports = (amount * LAMPORTS_PER_SOL as f64).round();
    if lamports >= u64::MAX as f64 {
        return Err(TransactionError::AmountOverflow(amount.to_string()).into());
    }
    if lamports < 1.0 {
        return Err(TransactionError::InvalidAmount(amount.to_string()).into());
    }
    Ok(lamports as u64)
}

/// Format lamports thành chuỗi SOL (bỏ số 0 thừa): 1_500_000_000 -> "1.5"
pub fn lamports_to_sol(lamports: u64) -> String {
    Balance::lamports(lamports).formatted
}

// =============================================================================
// TESTS
// =============================================================================
