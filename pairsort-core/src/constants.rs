/// Decimal places kept when rounding a category score percentage.
pub const SCORE_PERCENT_DECIMALS: i32 = 2;

/// Multiplier turning a points ratio into a percentage.
pub const PERCENT_SCALE: f64 = 100.0;
