//! Gregorian Date Calculations
//!
//! This module contains the logic for Gregorian Date Calculations based
//! off Cassio Neri and Lorenz Schneider's paper, [Euclidean affine functions
//! and their application to calendar algorithms][eaf-calendar-algorithms].
//!
//! ## General Usage Note
//!
//! Unless specified, Rata Die refers to the computational rata die as referenced
//! in the paper.
//!
//! ## Shift window
//!
//! Neri and Schneider describe a cycle shift of 82 for a range of 32_767
//! years. Zone data is never queried that far out, but we keep Cassio Neri's
//! [shift of 3670][neri-shift-context], which places the Unix epoch in the
//! center of the shift, so negative epoch days need no special casing.
//!
//! [neri-shift-context]: https://hg.mozilla.org/integration/autoland/rev/54ebf8bd2e11#l3.70
//! [eaf-calendar-algorithms]: https://onlinelibrary.wiley.com/doi/full/10.1002/spe.3172

pub const EPOCH_COMPUTATIONAL_RATA_DIE: i32 = 719_468;
pub const DAYS_IN_A_400Y_CYCLE: u32 = 146_097;

const TWO_POWER_THIRTY_TWO: u64 = 4_294_967_296; // 2^32 constant
const TWO_POWER_SIXTEEN: u32 = 65_536; // 2^16 constant

const SHIFT_CONSTANT: i32 = 3670;
const SHIFT_CONSTANT_EXTENDED: i64 = 5_368_710;

/// Calculate the epoch days for a gregorian date.
pub const fn epoch_days_from_gregorian_date(year: i32, month: u8, day: u8) -> i64 {
    let shift =
        SHIFT_CONSTANT_EXTENDED * DAYS_IN_A_400Y_CYCLE as i64 + EPOCH_COMPUTATIONAL_RATA_DIE as i64;
    let (comp_year, comp_month, comp_day, century) = rata_die_first_equations(year, month, day);
    let y_star = 1461 * comp_year / 4 - century + century / 4;
    let m_star = (979 * comp_month - 2919) / 32;
    (y_star as i64 + m_star + comp_day) - shift
}

// Returns Y, M, D, C
const fn rata_die_first_equations(year: i32, month: u8, day: u8) -> (u64, i64, i64, u64) {
    let j = (month <= 2) as i64;
    let computational_year = (year as i64 + 400 * SHIFT_CONSTANT_EXTENDED) - j;
    let computation_month = month as i64 + 12 * j;
    let computation_day = day as i64 - 1;
    (
        computational_year as u64,
        computation_month,
        computation_day,
        computational_year as u64 / 100,
    )
}

// Computational days to gregorian YMD

const fn n_one(rata_die: u32) -> u32 {
    4 * rata_die + 3
}

// Returns C, N_c AKA century number and century remainder
const fn first_equations(rata_die: u32) -> (u32, u32) {
    let n_one = n_one(rata_die);
    let century_rem = n_one.rem_euclid(DAYS_IN_A_400Y_CYCLE);
    let century_num = n_one.div_euclid(DAYS_IN_A_400Y_CYCLE);
    (century_num, century_rem)
}

/// returns Y, N_y AKA, year and day_of_year
const fn second_equations(rata_die: u32) -> (u32, u32) {
    let (century, rem) = first_equations(rata_die);
    let n_two = rem | 3;
    let p2 = 2_939_745 * n_two as u64;
    let year_of_century = p2.div_euclid(TWO_POWER_THIRTY_TWO) as u32;
    let day_of_year = p2
        .rem_euclid(TWO_POWER_THIRTY_TWO)
        .div_euclid(2_939_745)
        .div_euclid(4) as u32;
    let year = 100 * century + year_of_century;
    (year, day_of_year)
}

// Returns Y, M, D, N_y, AKA year, month, day, day_of_year
const fn third_equations(rata_die: u32) -> (u32, u32, u32, u32) {
    let (year, day_of_year) = second_equations(rata_die);
    let n_three = 2141 * day_of_year + 197_913;
    let month = n_three.div_euclid(TWO_POWER_SIXTEEN);
    let day = n_three.rem_euclid(TWO_POWER_SIXTEEN).div_euclid(2141);
    (year, month, day, day_of_year)
}

const fn gregorian_ymd(rata_die: u32) -> (i32, u8, u8) {
    let (year, month, day, day_of_year) = third_equations(rata_die);
    let j = (day_of_year >= 306) as u32;
    let year = year + j;
    let month = month - 12 * j;
    let day = day + 1;
    (year as i32, month as u8, day as u8)
}

/// Get the computational Rata Die for given Epoch Days with the cycle shift.
pub const fn rata_die_for_epoch_days(epoch_days: i32) -> (u32, i32) {
    let rata_die = (epoch_days
        + EPOCH_COMPUTATIONAL_RATA_DIE
        + DAYS_IN_A_400Y_CYCLE as i32 * SHIFT_CONSTANT) as u32; // epoch_days + K
    (rata_die, 400 * SHIFT_CONSTANT)
}

/// Calculate a Gregorian year, month, and date for the provided epoch days.
pub const fn ymd_from_epoch_days(epoch_days: i32) -> (i32, u8, u8) {
    let (rata_die, year_shift_constant) = rata_die_for_epoch_days(epoch_days);

    let (year, month, day) = gregorian_ymd(rata_die);
    // Shift the year back to the proper date
    (year - year_shift_constant, month, day)
}
