use rust_decimal::Decimal;

/// The fixed five-way classification the planner allocates across.
///
/// Order matters: it is the iteration order for allocation and the
/// tie-break order for remainder correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CoreCategory {
    Food,
    Bills,
    Travel,
    Shopping,
    Other,
}

impl CoreCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Bills => "Bills",
            Self::Travel => "Travel",
            Self::Shopping => "Shopping",
            Self::Other => "Other",
        }
    }

    /// Case-insensitive lookup. Unknown labels are `None`, not `Other`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "food" => Some(Self::Food),
            "bills" => Some(Self::Bills),
            "travel" => Some(Self::Travel),
            "shopping" => Some(Self::Shopping),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn all() -> &'static [CoreCategory] {
        &[
            Self::Food,
            Self::Bills,
            Self::Travel,
            Self::Shopping,
            Self::Other,
        ]
    }

    /// Share of leftover assigned when there is no spending history.
    /// Sums to exactly 1 across `all()`.
    pub fn default_share(&self) -> Decimal {
        match self {
            Self::Food => Decimal::new(35, 2),
            Self::Bills => Decimal::new(30, 2),
            Self::Travel => Decimal::new(20, 2),
            Self::Shopping => Decimal::new(10, 2),
            Self::Other => Decimal::new(5, 2),
        }
    }
}

impl std::fmt::Display for CoreCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
