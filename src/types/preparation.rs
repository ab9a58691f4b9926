use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreparationResult {
    Prepared,
    Failed(FailureReason),
}

impl PreparationResult {
    pub fn is_prepared(&self) -> bool {
        matches!(self, Self::Prepared)
    }
}

impl From<Result<(), FailureReason>> for PreparationResult {
    fn from(outcome: Result<(), FailureReason>) -> Self {
        match outcome {
            Ok(()) => Self::Prepared,
            Err(reason) => Self::Failed(reason),
        }
    }
}

/// Why a beverage could not be dispensed. A shortfall is an expected outcome,
/// not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    IngredientUnavailable { ingredient: String },
    IngredientInsufficient { ingredient: String },
}

impl FailureReason {
    pub fn ingredient(&self) -> &str {
        match self {
            Self::IngredientUnavailable { ingredient }
            | Self::IngredientInsufficient { ingredient } => ingredient,
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IngredientUnavailable { ingredient } => write!(f, "{ingredient} is not available"),
            Self::IngredientInsufficient { ingredient } => {
                write!(f, "item {ingredient} is not sufficient")
            }
        }
    }
}
