// File: freedrink-core/src/crypto/mod.rs

use std::collections::HashSet;

use rand::rngs::OsRng;
use rand_core::TryRngCore;

use crate::Error;

/// 24 bytes of OS randomness rendered as 48 lowercase hex chars. At this
/// length collisions are negligible, so tokens skip the uniqueness set.
pub const TOKEN_BYTES: usize = 24;

pub const SHORT_CODE_PREFIX: &str = "FD-";
pub const SHORT_CODE_LEN: usize = 7;

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Mint the long unguessable token bound to a claim.
pub fn mint_token() -> Result<String, Error> {
    let mut bytes = [0u8; TOKEN_BYTES];
    let mut rng = OsRng;
    rng.try_fill_bytes(&mut bytes)
        .map_err(|e| Error::Rng(e.to_string()))?;

    let mut out = String::with_capacity(TOKEN_BYTES * 2);
    for b in bytes {
        out.push_str(&format!("{:02x}", b));
    }
    Ok(out)
}

/// Mint a human-typable short code: `FD-` plus 7 uppercase base36 chars drawn
/// from 64 random bits, regenerated until it misses `existing`. Codes are
/// stored uppercase and matched case-insensitively downstream.
pub fn mint_short_code(existing: &HashSet<String>) -> Result<String, Error> {
    let mut rng = OsRng;
    loop {
        let mut bytes = [0u8; 8];
        rng.try_fill_bytes(&mut bytes)
            .map_err(|e| Error::Rng(e.to_string()))?;

        let mut n = u64::from_le_bytes(bytes);
        let mut code = String::with_capacity(SHORT_CODE_PREFIX.len() + SHORT_CODE_LEN);
        code.push_str(SHORT_CODE_PREFIX);
        for _ in 0..SHORT_CODE_LEN {
            code.push(BASE36[(n % 36) as usize] as char);
            n /= 36;
        }

        if !existing.contains(&code) {
            return Ok(code);
        }
    }
}
