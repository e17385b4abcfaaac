/// Number of cost categories tracked by [`CostProfile`].
const COST_CATEGORY_COUNT: usize = 6;

/// Categories of operator cost, for profiling what a program spends its budget on.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum CostCategory {
    /// Integer and float folds (add, subtract, ...).
    Arithmetic = 0,
    /// Bitwise folds and shifts.
    Bitwise = 1,
    /// Comparisons writing 0/1.
    Comparison = 2,
    /// Moves and conversions between registers.
    Transfer = 3,
    /// No-ops and halts.
    Control = 4,
    /// Operators registered by the host.
    Extension = 5,
}

impl CostCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CostCategory::Arithmetic => "Arithmetic",
            CostCategory::Bitwise => "Bitwise",
            CostCategory::Comparison => "Comparison",
            CostCategory::Transfer => "Transfer",
            CostCategory::Control => "Control",
            CostCategory::Extension => "Extension",
        }
    }

    /// All categories in discriminant order.
    const ALL: [CostCategory; COST_CATEGORY_COUNT] = [
        CostCategory::Arithmetic,
        CostCategory::Bitwise,
        CostCategory::Comparison,
        CostCategory::Transfer,
        CostCategory::Control,
        CostCategory::Extension,
    ];
}

/// Accumulated operator cost per category.
///
/// Backed by a flat array indexed by [`CostCategory`] discriminant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CostProfile {
    totals: [f64; COST_CATEGORY_COUNT],
}

impl CostProfile {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn add(&mut self, category: CostCategory, amount: f64) {
        self.totals[category as usize] += amount;
    }

    pub fn get(&self, category: CostCategory) -> f64 {
        self.totals[category as usize]
    }

    pub fn total(&self) -> f64 {
        self.totals.iter().sum()
    }

    /// Iterates all categories with their accumulated cost.
    pub fn iter(&self) -> impl Iterator<Item = (CostCategory, f64)> {
        CostCategory::ALL.into_iter().zip(self.totals)
    }
}

/// Tracks cost spent against an optional limit for one run.
#[derive(Clone, Debug)]
pub struct CostMeter {
    limit: Option<f64>,
    used: f64,
}

impl CostMeter {
    /// A NaN or negative limit is a zero budget.
    pub fn new(limit: Option<f64>) -> Self {
        let limit = limit.map(|l| if l.is_nan() || l < 0.0 { 0.0 } else { l });
        Self { limit, used: 0.0 }
    }

    pub fn used(&self) -> f64 {
        self.used
    }

    /// Remaining budget, `None` when unlimited.
    pub fn remaining(&self) -> Option<f64> {
        self.limit.map(|limit| (limit - self.used).max(0.0))
    }

    /// Charges `amount` if it fits within the limit.
    ///
    /// Returns false, charging nothing, when the limit would be exceeded.
    pub fn try_charge(&mut self, amount: f64) -> bool {
        if let Some(limit) = self.limit
            && self.used + amount > limit
        {
            return false;
        }
        self.used += amount;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_accumulates_per_category() {
        let mut profile = CostProfile::new();
        profile.add(CostCategory::Arithmetic, 3.0);
        profile.add(CostCategory::Arithmetic, 3.0);
        profile.add(CostCategory::Control, 0.5);
        assert_eq!(profile.get(CostCategory::Arithmetic), 6.0);
        assert_eq!(profile.total(), 6.5);
        assert_eq!(profile.iter().count(), COST_CATEGORY_COUNT);
    }

    #[test]
    fn unlimited_meter_always_charges() {
        let mut meter = CostMeter::new(None);
        assert!(meter.try_charge(1e9));
        assert_eq!(meter.remaining(), None);
    }

    #[test]
    fn meter_refuses_charge_past_limit() {
        let mut meter = CostMeter::new(Some(5.0));
        assert!(meter.try_charge(3.0));
        assert!(!meter.try_charge(3.0));
        assert_eq!(meter.used(), 3.0);
        assert!(meter.try_charge(2.0));
        assert_eq!(meter.remaining(), Some(0.0));
    }

    #[test]
    fn invalid_limits_are_a_zero_budget() {
        for limit in [f64::NAN, -1.0] {
            let mut meter = CostMeter::new(Some(limit));
            assert_eq!(meter.remaining(), Some(0.0));
            assert!(!meter.try_charge(1.0));
            assert!(meter.try_charge(0.0));
        }
    }
}
