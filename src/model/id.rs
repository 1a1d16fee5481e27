//! Newtype identifiers so store, employee and customer ids cannot be mixed up.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }
    };
}

define_id!(StoreId);
define_id!(EmployeeId);
define_id!(CustomerId);

/// Whether a write creates a new record or updates the one with the given id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<I> {
    New,
    Existing(I),
}

impl<I> From<Option<I>> for Target<I> {
    fn from(id: Option<I>) -> Self {
        match id {
            Some(id) => Target::Existing(id),
            None => Target::New,
        }
    }
}
