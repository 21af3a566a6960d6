// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Size column rendering.

const UNITS: [char; 9] = [' ', 'K', 'M', 'G', 'T', 'P', 'E', 'Z', 'Y'];

/// Render a byte count for a text column.
///
/// Without `human_readable` the exact value is right-aligned in 11 columns.
/// Otherwise the value is scaled by 1024 per unit step and printed with one
/// fractional digit in 6 columns followed by the unit letter, a space when
/// unscaled. Scaling stops at `Y`.
pub fn format_size(bytes: u64, human_readable: bool) -> String {
    if !human_readable {
        return format!("{bytes:>11}");
    }

    let mut power = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && power < UNITS.len() - 1 {
        power += 1;
        value /= 1024.0;
    }
    format!("{value:6.1}{}", UNITS[power])
}
