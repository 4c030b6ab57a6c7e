//! Capability kinds and the bit-flag set that combines them.
//!
//! The CRUD kinds double as data-source permission flags; the remaining kinds
//! name table operations a remote source may execute itself.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CapabilityKind {
    Create,
    Read,
    Update,
    Delete,
    Sort,
    Filter,
    Group,
    ArrayLookup,
}

impl CapabilityKind {
    pub const ALL: [CapabilityKind; 8] = [
        CapabilityKind::Create,
        CapabilityKind::Read,
        CapabilityKind::Update,
        CapabilityKind::Delete,
        CapabilityKind::Sort,
        CapabilityKind::Filter,
        CapabilityKind::Group,
        CapabilityKind::ArrayLookup,
    ];

    pub const fn bit(self) -> u32 {
        match self {
            CapabilityKind::Create => 0x01,
            CapabilityKind::Read => 0x02,
            CapabilityKind::Update => 0x04,
            CapabilityKind::Delete => 0x08,
            CapabilityKind::Sort => 0x10,
            CapabilityKind::Filter => 0x20,
            CapabilityKind::Group => 0x40,
            CapabilityKind::ArrayLookup => 0x80,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CapabilityKind::Create => "create",
            CapabilityKind::Read => "read",
            CapabilityKind::Update => "update",
            CapabilityKind::Delete => "delete",
            CapabilityKind::Sort => "sort",
            CapabilityKind::Filter => "filter",
            CapabilityKind::Group => "group",
            CapabilityKind::ArrayLookup => "arrayLookup",
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Combinable set of [`CapabilityKind`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CapabilitySet(u32);

impl CapabilitySet {
    pub const NONE: CapabilitySet = CapabilitySet(0);
    pub const CREATE: CapabilitySet = CapabilitySet(CapabilityKind::Create.bit());
    pub const READ: CapabilitySet = CapabilitySet(CapabilityKind::Read.bit());
    pub const UPDATE: CapabilitySet = CapabilitySet(CapabilityKind::Update.bit());
    pub const DELETE: CapabilitySet = CapabilitySet(CapabilityKind::Delete.bit());
    pub const SORT: CapabilitySet = CapabilitySet(CapabilityKind::Sort.bit());
    pub const FILTER: CapabilitySet = CapabilitySet(CapabilityKind::Filter.bit());
    pub const GROUP: CapabilitySet = CapabilitySet(CapabilityKind::Group.bit());
    pub const ARRAY_LOOKUP: CapabilitySet = CapabilitySet(CapabilityKind::ArrayLookup.bit());

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn union(self, other: CapabilitySet) -> CapabilitySet {
        CapabilitySet(self.0 | other.0)
    }

    pub const fn contains(self, kind: CapabilityKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// True when every kind in `other` is also in `self`.
    pub const fn contains_all(self, other: CapabilitySet) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, kind: CapabilityKind) {
        self.0 |= kind.bit();
    }

    pub fn with(self, kind: CapabilityKind) -> CapabilitySet {
        CapabilitySet(self.0 | kind.bit())
    }

    /// Kinds in bit order.
    pub fn iter(self) -> impl Iterator<Item = CapabilityKind> {
        CapabilityKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

impl From<CapabilityKind> for CapabilitySet {
    fn from(kind: CapabilityKind) -> Self {
        CapabilitySet(kind.bit())
    }
}

impl FromIterator<CapabilityKind> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = CapabilityKind>>(iter: I) -> Self {
        iter.into_iter()
            .fold(CapabilitySet::NONE, CapabilitySet::with)
    }
}

impl std::ops::BitOr for CapabilitySet {
    type Output = CapabilitySet;

    fn bitor(self, rhs: CapabilitySet) -> CapabilitySet {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for CapabilitySet {
    fn bitor_assign(&mut self, rhs: CapabilitySet) {
        self.0 |= rhs.0;
    }
}

impl Serialize for CapabilitySet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for CapabilitySet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let kinds = Vec::<CapabilityKind>::deserialize(deserializer)?;
        Ok(kinds.into_iter().collect())
    }
}

/// Comparison and logical operators a source may evaluate inside a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Not,
    In,
    StartsWith,
    EndsWith,
    Contains,
}

impl FilterOperator {
    pub const ALL: [FilterOperator; 13] = [
        FilterOperator::Eq,
        FilterOperator::Ne,
        FilterOperator::Lt,
        FilterOperator::Le,
        FilterOperator::Gt,
        FilterOperator::Ge,
        FilterOperator::And,
        FilterOperator::Or,
        FilterOperator::Not,
        FilterOperator::In,
        FilterOperator::StartsWith,
        FilterOperator::EndsWith,
        FilterOperator::Contains,
    ];

    /// Case-insensitive lookup by document name.
    pub fn parse(name: &str) -> Option<Self> {
        let lowered = name.trim().to_ascii_lowercase();
        let op = match lowered.as_str() {
            "eq" => FilterOperator::Eq,
            "ne" => FilterOperator::Ne,
            "lt" => FilterOperator::Lt,
            "le" => FilterOperator::Le,
            "gt" => FilterOperator::Gt,
            "ge" => FilterOperator::Ge,
            "and" => FilterOperator::And,
            "or" => FilterOperator::Or,
            "not" => FilterOperator::Not,
            "in" => FilterOperator::In,
            "startswith" => FilterOperator::StartsWith,
            "endswith" => FilterOperator::EndsWith,
            "contains" => FilterOperator::Contains,
            _ => return None,
        };
        Some(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_owns_a_distinct_bit() {
        let mut seen = 0u32;
        for kind in CapabilityKind::ALL {
            assert_eq!(kind.bit().count_ones(), 1, "{kind} must own one bit");
            assert_eq!(seen & kind.bit(), 0, "{kind} bit collides");
            seen |= kind.bit();
        }
    }

    #[test]
    fn set_algebra_matches_flag_semantics() {
        let crud = CapabilitySet::CREATE | CapabilitySet::READ;
        assert!(crud.contains(CapabilityKind::Read));
        assert!(!crud.contains(CapabilityKind::Sort));
        assert!(crud.contains_all(CapabilitySet::READ));
        assert!(!CapabilitySet::READ.contains_all(crud));
        assert!(crud.contains_all(CapabilitySet::NONE));

        let mut set = CapabilitySet::NONE;
        set.insert(CapabilityKind::ArrayLookup);
        set |= CapabilitySet::SORT;
        let kinds: Vec<CapabilityKind> = set.iter().collect();
        assert_eq!(kinds, vec![CapabilityKind::Sort, CapabilityKind::ArrayLookup]);
    }

    #[test]
    fn set_serializes_as_kind_names_in_bit_order() {
        let set: CapabilitySet = [CapabilityKind::Group, CapabilityKind::Read]
            .into_iter()
            .collect();
        let json = serde_json::to_value(set).expect("serialize set");
        assert_eq!(json, serde_json::json!(["read", "group"]));
        let back: CapabilitySet = serde_json::from_value(json).expect("deserialize set");
        assert_eq!(back, set);
    }

    #[test]
    fn filter_operator_names_are_case_insensitive() {
        assert_eq!(FilterOperator::parse("StartsWith"), Some(FilterOperator::StartsWith));
        assert_eq!(FilterOperator::parse(" EQ "), Some(FilterOperator::Eq));
        assert_eq!(FilterOperator::parse("like"), None);
    }
}
