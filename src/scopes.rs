//! Flag set selecting which kinds of index entries are extracted.

use crate::error::IndexError;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

/// Bit flags over the item kinds that end up in the search index.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchScopes(u8);

impl SearchScopes {
    pub const NONE: Self = Self(0);
    pub const TYPES: Self = Self(1);
    pub const METHODS: Self = Self(2);
    pub const PROPERTIES: Self = Self(4);
    pub const EVENTS: Self = Self(8);
    pub const FIELDS: Self = Self(16);
    pub const ENUM_VALUES: Self = Self(32);
    pub const ALL: Self = Self(63);

    /// Named single flags, in bit order.
    const NAMED: [(&'static str, Self); 6] = [
        ("Types", Self::TYPES),
        ("Methods", Self::METHODS),
        ("Properties", Self::PROPERTIES),
        ("Events", Self::EVENTS),
        ("Fields", Self::FIELDS),
        ("EnumValues", Self::ENUM_VALUES),
    ];

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns true when every flag in `other` is also set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true when `Types` is the only flag set, so member scanning can be skipped.
    pub const fn is_types_only(self) -> bool {
        self.0 == Self::TYPES.0
    }

    /// Parses one list member.
    fn parse_one(name: &str) -> Result<Self, IndexError> {
        if let Ok(bits) = name.parse::<u8>() {
            return if bits & !Self::ALL.0 == 0 {
                Ok(Self(bits))
            } else {
                Err(IndexError::InvalidScope(name.to_string()))
            };
        }
        if name.eq_ignore_ascii_case("None") {
            return Ok(Self::NONE);
        }
        if name.eq_ignore_ascii_case("All") {
            return Ok(Self::ALL);
        }
        Self::NAMED
            .iter()
            .find(|(flag_name, _)| flag_name.eq_ignore_ascii_case(name))
            .map(|(_, flag)| *flag)
            .ok_or_else(|| IndexError::InvalidScope(name.to_string()))
    }

    /// Builds a scope set from scope names, as found in `_searchIndexScopes`.
    pub fn from_names<'a, I>(names: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .try_fold(Self::NONE, |acc, name| Ok(acc | name.parse::<Self>()?))
    }
}

impl BitOr for SearchScopes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for SearchScopes {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl FromStr for SearchScopes {
    type Err = IndexError;

    /// Parses a scope value: a name ignoring ASCII case, a numeric flag value,
    /// or a comma-separated list of either.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .try_fold(Self::NONE, |acc, part| Ok(acc | Self::parse_one(part.trim())?))
    }
}

impl fmt::Display for SearchScopes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("None");
        }
        if *self == Self::ALL {
            return f.write_str("All");
        }
        let mut first = true;
        for (name, flag) in Self::NAMED {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for SearchScopes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SearchScopes({})", self)
    }
}
