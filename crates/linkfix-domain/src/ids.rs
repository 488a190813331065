//! Identifier newtypes
//!
//! The remote API identifies projects, items and users by plain integers.
//! Wrapping them keeps a project id from being passed where an item id is
//! expected, which is exactly the mix-up broken links are made of.

use std::fmt;
use std::str::FromStr;

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw identifier
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Get the raw identifier
            pub const fn value(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<u64>()
                    .map(Self)
                    .map_err(|e| format!("Invalid {} '{}': {}", stringify!($name), s, e))
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

integer_id!(
    /// Identifier of a project
    ///
    /// # Examples
    ///
    /// ```
    /// use linkfix_domain::ProjectId;
    ///
    /// let id: ProjectId = "42".parse().unwrap();
    /// assert_eq!(id.value(), 42);
    /// assert_eq!(id.to_string(), "42");
    /// ```
    ProjectId
);

integer_id!(
    /// Identifier of an item (the `docId` of a link)
    ItemId
);

integer_id!(
    /// Identifier of a user account
    UserId
);
