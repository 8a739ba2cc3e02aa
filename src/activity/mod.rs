pub mod classifier;
pub mod state;

use std::fmt;

pub use classifier::classify;
pub use state::{ActivityState, ActivityStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityCategory {
    UsingPhone,
    Working,
    PhoneWhileWorking,
    Sleeping,
    Eating,
    Drinking,
    Other,
}

impl ActivityCategory {
    pub const ALL: [ActivityCategory; 7] = [
        ActivityCategory::UsingPhone,
        ActivityCategory::Working,
        ActivityCategory::PhoneWhileWorking,
        ActivityCategory::Sleeping,
        ActivityCategory::Eating,
        ActivityCategory::Drinking,
        ActivityCategory::Other,
    ];

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    pub fn code(self) -> u32 {
        match self {
            ActivityCategory::UsingPhone => 1,
            ActivityCategory::Working => 2,
            ActivityCategory::PhoneWhileWorking => 3,
            ActivityCategory::Sleeping => 4,
            ActivityCategory::Eating => 5,
            ActivityCategory::Drinking => 6,
            ActivityCategory::Other => 7,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ActivityCategory::UsingPhone => "Using phone",
            ActivityCategory::Working => "Working",
            ActivityCategory::PhoneWhileWorking => "Using phone while working",
            ActivityCategory::Sleeping => "Sleeping",
            ActivityCategory::Eating => "Eating",
            ActivityCategory::Drinking => "Drinking",
            ActivityCategory::Other => "Other",
        }
    }

    /// Display-only marker.
    pub fn emoji(self) -> &'static str {
        match self {
            ActivityCategory::UsingPhone => "📱",
            ActivityCategory::Working => "💻",
            ActivityCategory::PhoneWhileWorking => "📱💻",
            ActivityCategory::Sleeping => "😴",
            ActivityCategory::Eating => "🍽️",
            ActivityCategory::Drinking => "🥤",
            ActivityCategory::Other => "🤷",
        }
    }
}

impl fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {} {}", self.code(), self.name(), self.emoji())
    }
}

/// Extra context attached to an `Other` result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtherDetail {
    /// The model produced no usable text at all.
    NoResponse,
    /// The answer only described the person; first 50 characters kept.
    Description(String),
    /// Nothing recognisable; first 100 characters kept.
    Unmatched(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: ActivityCategory,
    pub detail: Option<OtherDetail>,
}

impl Classification {
    pub fn of(category: ActivityCategory) -> Self {
        Self {
            category,
            detail: None,
        }
    }

    pub fn other(detail: OtherDetail) -> Self {
        Self {
            category: ActivityCategory::Other,
            detail: Some(detail),
        }
    }

    pub fn is_no_response(&self) -> bool {
        matches!(self.detail, Some(OtherDetail::NoResponse))
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            None => write!(f, "{}", self.category),
            Some(OtherDetail::NoResponse) => write!(
                f,
                "⚠️ No response from AI. Model may not support vision or took too long."
            ),
            Some(OtherDetail::Description(excerpt)) => write!(f, "{} - {}", self.category, excerpt),
            Some(OtherDetail::Unmatched(excerpt)) => write!(f, "{} ({})", self.category, excerpt),
        }
    }
}
