//! # sc-type Algebra
//!
//! Element kinds are a flat bitmask rather than a type hierarchy.
//!
//! - `layout` - raw bits of the current protocol revision
//! - `named` - the frozen table of named types (current and legacy names)
//! - `ScType` - the value type: predicates, merge and constancy rewrites
//!
//! ## Merge Rules
//!
//! Two types can be merged when every bit group they both constrain agrees:
//! element kind and constancy always, permanence/actuality/polarity when
//! either side is a connector. The unknown type (`0`) constrains nothing
//! and merges with everything.

pub mod layout;
mod named;

use crate::ScError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A packed sc-type value.
///
/// Equality is by value. The raw number is what the server sends and
/// expects, so `ScType` serializes transparently.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ScType(u32);

impl ScType {
    /// Wrap a raw type value received from the server.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Raw bitmask value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Look up a type by name, e.g. `"ConstNode"` or the legacy `"NodeConst"`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        named::NAMED_TYPES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, t)| *t)
    }

    /// Preferred (current-generation) name of this exact value, if any.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        named::NAMED_TYPES
            .iter()
            .find(|(_, t)| *t == self)
            .map(|(n, _)| *n)
    }

    /// Every named type, current names first, then legacy aliases.
    pub fn named_types() -> impl Iterator<Item = (&'static str, ScType)> {
        named::NAMED_TYPES.iter().copied()
    }

    #[inline]
    const fn masked(self, mask: u32) -> u32 {
        self.0 & mask
    }

    #[inline]
    const fn has(self, bits: u32) -> bool {
        self.0 & bits != 0
    }

    // =========================================================================
    // ELEMENT KIND
    // =========================================================================

    /// `false` only for the unknown type.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }

    #[must_use]
    pub const fn is_node(self) -> bool {
        self.has(layout::NODE)
    }

    /// A node carrying content. Links are nodes.
    #[must_use]
    pub const fn is_link(self) -> bool {
        self.is_node() && self.has(layout::LINK)
    }

    #[must_use]
    pub const fn is_link_class(self) -> bool {
        self.is_link() && self.has(layout::LINK_CLASS)
    }

    #[must_use]
    pub const fn is_connector(self) -> bool {
        !self.is_node() && self.has(layout::CONNECTOR_MASK)
    }

    /// Undirected common edge.
    #[must_use]
    pub const fn is_edge(self) -> bool {
        self.is_connector() && self.has(layout::COMMON_EDGE)
    }

    /// Directed connector (common or membership arc).
    #[must_use]
    pub const fn is_arc(self) -> bool {
        self.is_connector() && self.has(layout::ARC_MASK)
    }

    #[must_use]
    pub const fn is_common_arc(self) -> bool {
        self.is_connector() && self.has(layout::COMMON_ARC)
    }

    #[must_use]
    pub const fn is_membership_arc(self) -> bool {
        self.is_connector() && self.has(layout::MEMBERSHIP_ARC)
    }

    #[must_use]
    pub const fn has_direction(self) -> bool {
        self.is_arc()
    }

    // =========================================================================
    // CONSTANCY
    // =========================================================================

    #[must_use]
    pub const fn has_constancy(self) -> bool {
        self.has(layout::CONSTANCY_MASK)
    }

    #[must_use]
    pub const fn is_const(self) -> bool {
        self.masked(layout::CONSTANCY_MASK) == layout::CONST
    }

    #[must_use]
    pub const fn is_var(self) -> bool {
        self.masked(layout::CONSTANCY_MASK) == layout::VAR
    }

    #[must_use]
    pub const fn is_metavar(self) -> bool {
        self.masked(layout::CONSTANCY_MASK) == layout::METAVAR
    }

    // =========================================================================
    // PERMANENCE & POLARITY
    // =========================================================================

    #[must_use]
    pub const fn is_perm(self) -> bool {
        self.is_connector() && self.masked(layout::PERMANENCY_MASK) == layout::PERM
    }

    #[must_use]
    pub const fn is_temp(self) -> bool {
        self.is_connector() && self.masked(layout::PERMANENCY_MASK) == layout::TEMP
    }

    #[must_use]
    pub const fn is_actual(self) -> bool {
        self.is_temp() && self.masked(layout::ACTUALITY_MASK) == layout::ACTUAL
    }

    #[must_use]
    pub const fn is_inactual(self) -> bool {
        self.is_temp() && self.masked(layout::ACTUALITY_MASK) == layout::INACTUAL
    }

    #[must_use]
    pub const fn is_pos(self) -> bool {
        self.is_connector() && self.masked(layout::POSITIVITY_MASK) == layout::POS
    }

    #[must_use]
    pub const fn is_neg(self) -> bool {
        self.is_connector() && self.masked(layout::POSITIVITY_MASK) == layout::NEG
    }

    #[must_use]
    pub const fn is_fuz(self) -> bool {
        self.is_connector() && self.masked(layout::POSITIVITY_MASK) == layout::FUZ
    }

    // =========================================================================
    // NODE SUBTYPES
    // =========================================================================

    #[inline]
    const fn is_node_subtype(self, bits: u32) -> bool {
        self.is_node() && !self.is_link() && self.masked(layout::NODE_SEMANTIC_MASK) == bits
    }

    #[must_use]
    pub const fn is_tuple(self) -> bool {
        self.is_node_subtype(layout::TUPLE)
    }

    #[must_use]
    pub const fn is_structure(self) -> bool {
        self.is_node_subtype(layout::STRUCTURE)
    }

    #[must_use]
    pub const fn is_role(self) -> bool {
        self.is_node_subtype(layout::ROLE)
    }

    #[must_use]
    pub const fn is_norole(self) -> bool {
        self.is_node_subtype(layout::NON_ROLE)
    }

    #[must_use]
    pub const fn is_class(self) -> bool {
        self.is_node_subtype(layout::CLASS)
    }

    #[must_use]
    pub const fn is_superclass(self) -> bool {
        self.is_node_subtype(layout::SUPERCLASS)
    }

    #[must_use]
    pub const fn is_abstract(self) -> bool {
        self.is_node_subtype(layout::ABSTRACT)
    }

    #[must_use]
    pub const fn is_material(self) -> bool {
        self.is_node_subtype(layout::MATERIAL)
    }

    // =========================================================================
    // MERGE & CONSTANCY REWRITES
    // =========================================================================

    /// Element-kind bits. For nodes only the node bit counts, since the
    /// connector bits of a node value are never set.
    const fn element_bits(self) -> u32 {
        if self.is_node() {
            layout::NODE
        } else {
            self.masked(layout::CONNECTOR_MASK)
        }
    }

    /// Check whether `self` and `other` agree on every bit group both
    /// constrain, i.e. whether `merge` would succeed.
    #[must_use]
    pub const fn is_expandable_to(self, other: ScType) -> bool {
        const fn compatible(a: u32, b: u32) -> bool {
            a == 0 || b == 0 || a == b
        }

        if !compatible(self.element_bits(), other.element_bits()) {
            return false;
        }
        if !compatible(
            self.masked(layout::CONSTANCY_MASK),
            other.masked(layout::CONSTANCY_MASK),
        ) {
            return false;
        }

        if self.is_connector() || other.is_connector() {
            let groups = [
                layout::PERMANENCY_MASK,
                layout::ACTUALITY_MASK,
                layout::POSITIVITY_MASK,
            ];
            let mut i = 0;
            while i < groups.len() {
                if !compatible(self.masked(groups[i]), other.masked(groups[i])) {
                    return false;
                }
                i += 1;
            }
        }

        true
    }

    /// Bitwise union of two compatible types.
    ///
    /// Fails with `ScError::TypeConflict` naming both operands when
    /// `is_expandable_to` does not hold.
    pub fn merge(self, other: ScType) -> Result<ScType, ScError> {
        if !self.is_expandable_to(other) {
            return Err(ScError::TypeConflict {
                left: self,
                right: other,
            });
        }
        Ok(Self(self.0 | other.0))
    }

    /// Replace the constancy with exactly `const` or `var`.
    #[must_use]
    pub const fn change_const(self, is_const: bool) -> ScType {
        let bits = if is_const { layout::CONST } else { layout::VAR };
        Self((self.0 & !layout::CONSTANCY_MASK) | bits)
    }

    /// Promote the constancy one level: metavar to var, var to const.
    /// Constant and unconstrained types are returned unchanged.
    #[must_use]
    pub const fn up_const_type(self) -> ScType {
        let cleared = self.0 & !layout::CONSTANCY_MASK;
        match self.masked(layout::CONSTANCY_MASK) {
            layout::METAVAR => Self(cleared | layout::VAR),
            layout::VAR => Self(cleared | layout::CONST),
            _ => self,
        }
    }
}

impl From<u32> for ScType {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Debug for ScType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "ScType::{name}({:#x})", self.0),
            None => write!(f, "ScType({:#x})", self.0),
        }
    }
}

impl fmt::Display for ScType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "{:#x}", self.0),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const NODE_TYPES: &[ScType] = &[
        ScType::NODE,
        ScType::CONST_NODE,
        ScType::VAR_NODE,
        ScType::CONST_NODE_TUPLE,
        ScType::CONST_NODE_STRUCTURE,
        ScType::CONST_NODE_ROLE,
        ScType::CONST_NODE_NON_ROLE,
        ScType::CONST_NODE_CLASS,
        ScType::CONST_NODE_SUPERCLASS,
        ScType::CONST_NODE_MATERIAL,
        ScType::VAR_NODE_TUPLE,
        ScType::VAR_NODE_STRUCTURE,
        ScType::VAR_NODE_ROLE,
        ScType::VAR_NODE_NON_ROLE,
        ScType::VAR_NODE_CLASS,
        ScType::VAR_NODE_MATERIAL,
    ];

    const CONNECTOR_TYPES: &[ScType] = &[
        ScType::COMMON_EDGE,
        ScType::CONST_COMMON_EDGE,
        ScType::VAR_COMMON_EDGE,
        ScType::COMMON_ARC,
        ScType::CONST_COMMON_ARC,
        ScType::VAR_COMMON_ARC,
        ScType::MEMBERSHIP_ARC,
        ScType::CONST_PERM_POS_ARC,
        ScType::CONST_PERM_NEG_ARC,
        ScType::CONST_TEMP_POS_ARC,
        ScType::CONST_FUZ_ARC,
        ScType::VAR_PERM_POS_ARC,
        ScType::VAR_TEMP_NEG_ARC,
        ScType::CONST_ACTUAL_TEMP_POS_ARC,
        ScType::VAR_INACTUAL_TEMP_NEG_ARC,
    ];

    #[test]
    fn unknown_is_invalid() {
        assert!(!ScType::UNKNOWN.is_valid());
        assert!(!ScType::default().is_valid());
        assert!(ScType::CONST_NODE.is_valid());
    }

    #[test]
    fn nodes_are_not_connectors() {
        for t in NODE_TYPES {
            assert!(t.is_node(), "{t}");
            assert!(!t.is_connector(), "{t}");
            assert!(!t.is_link(), "{t}");
        }
    }

    #[test]
    fn connectors_are_not_nodes() {
        for t in CONNECTOR_TYPES {
            assert!(t.is_connector(), "{t}");
            assert!(!t.is_node(), "{t}");
            assert!(!t.is_link(), "{t}");
        }
    }

    #[test]
    fn links_are_nodes_but_not_positive() {
        let link = ScType::CONST_NODE_LINK;
        assert!(link.is_node());
        assert!(link.is_link());
        assert!(!link.is_pos());
        assert!(!link.is_tuple());
        assert!(ScType::CONST_NODE_LINK_CLASS.is_link_class());
        assert!(!link.is_link_class());
    }

    #[test]
    fn edge_and_arc_kinds() {
        assert!(ScType::CONST_COMMON_EDGE.is_edge());
        assert!(!ScType::CONST_COMMON_EDGE.has_direction());
        assert!(ScType::CONST_COMMON_ARC.is_common_arc());
        assert!(ScType::CONST_COMMON_ARC.has_direction());
        assert!(ScType::CONST_PERM_POS_ARC.is_membership_arc());
        assert!(!ScType::CONST_PERM_POS_ARC.is_common_arc());
    }

    #[test]
    fn polarity_predicates_are_exclusive() {
        let pos = ScType::CONST_PERM_POS_ARC;
        assert!(pos.is_pos() && !pos.is_neg() && !pos.is_fuz());

        let neg = ScType::CONST_PERM_NEG_ARC;
        assert!(neg.is_neg() && !neg.is_pos());

        let fuz = ScType::CONST_FUZ_ARC;
        assert!(fuz.is_fuz() && !fuz.is_pos());

        // Both bits set: neither predicate holds
        let both = ScType::new(ScType::CONST_PERM_POS_ARC.value() | ScType::CONST_PERM_NEG_ARC.value());
        assert!(!both.is_pos());
        assert!(!both.is_neg());
    }

    #[test]
    fn permanence_and_actuality() {
        assert!(ScType::CONST_PERM_POS_ARC.is_perm());
        assert!(ScType::CONST_TEMP_POS_ARC.is_temp());
        assert!(!ScType::CONST_TEMP_POS_ARC.is_actual());
        assert!(ScType::CONST_ACTUAL_TEMP_POS_ARC.is_actual());
        assert!(ScType::VAR_INACTUAL_TEMP_NEG_ARC.is_inactual());
        // Structure bit equals the actual bit, but nodes are never temporary
        assert!(!ScType::CONST_NODE_STRUCTURE.is_actual());
    }

    #[test]
    fn constancy_predicates() {
        assert!(ScType::CONST_NODE.is_const());
        assert!(ScType::VAR_NODE.is_var());
        assert!(ScType::METAVAR_NODE.is_metavar());
        assert!(!ScType::NODE.has_constancy());
    }

    #[test]
    fn node_subtypes() {
        assert!(ScType::CONST_NODE_TUPLE.is_tuple());
        assert!(ScType::CONST_NODE_STRUCTURE.is_structure());
        assert!(ScType::VAR_NODE_ROLE.is_role());
        assert!(ScType::VAR_NODE_NON_ROLE.is_norole());
        assert!(ScType::CONST_NODE_CLASS.is_class());
        assert!(ScType::CONST_NODE_SUPERCLASS.is_superclass());
        assert!(ScType::NODE_CONST_ABSTRACT.is_abstract());
        assert!(ScType::CONST_NODE_MATERIAL.is_material());
        assert!(!ScType::CONST_NODE.is_class());
    }

    #[test]
    fn merge_adds_constancy_to_kind() {
        let merged = ScType::NODE.merge(ScType::CONST).expect("merge");
        assert_eq!(merged, ScType::CONST_NODE);

        let merged = ScType::MEMBERSHIP_ARC
            .merge(ScType::VAR_PERM_POS_ARC)
            .expect("merge");
        assert_eq!(merged, ScType::VAR_PERM_POS_ARC);
    }

    #[test]
    fn merge_rejects_different_kinds() {
        let err = ScType::CONST_NODE
            .merge(ScType::CONST_COMMON_ARC)
            .expect_err("kinds differ");
        assert!(matches!(
            err,
            ScError::TypeConflict { left, right }
                if left == ScType::CONST_NODE && right == ScType::CONST_COMMON_ARC
        ));
    }

    #[test]
    fn merge_rejects_different_constancy() {
        assert!(ScType::CONST_NODE.merge(ScType::VAR_NODE).is_err());
        assert!(ScType::VAR_NODE.merge(ScType::CONST_NODE).is_err());
    }

    #[test]
    fn merge_rejects_different_polarity_and_permanence() {
        assert!(
            ScType::CONST_PERM_POS_ARC
                .merge(ScType::CONST_PERM_NEG_ARC)
                .is_err()
        );
        assert!(
            ScType::CONST_PERM_POS_ARC
                .merge(ScType::CONST_TEMP_POS_ARC)
                .is_err()
        );
        assert!(
            ScType::CONST_ACTUAL_TEMP_POS_ARC
                .merge(ScType::CONST_INACTUAL_TEMP_POS_ARC)
                .is_err()
        );
    }

    #[test]
    fn merge_ignores_polarity_bits_on_nodes() {
        // The link bit is the positive bit; two links must merge fine.
        let merged = ScType::NODE_LINK.merge(ScType::CONST_NODE_LINK).expect("merge");
        assert_eq!(merged, ScType::CONST_NODE_LINK);
    }

    #[test]
    fn unknown_merges_with_everything() {
        for (_, t) in ScType::named_types() {
            assert_eq!(ScType::UNKNOWN.merge(t).expect("merge"), t);
            assert_eq!(t.merge(ScType::UNKNOWN).expect("merge"), t);
        }
    }

    #[test]
    fn change_const_sets_exactly_one_bit() {
        assert_eq!(ScType::VAR_NODE.change_const(true), ScType::CONST_NODE);
        assert_eq!(ScType::CONST_NODE.change_const(false), ScType::VAR_NODE);
        assert_eq!(ScType::NODE.change_const(true), ScType::CONST_NODE);
        assert_eq!(
            ScType::VAR_PERM_POS_ARC.change_const(true),
            ScType::CONST_PERM_POS_ARC
        );
    }

    #[test]
    fn up_const_type_promotes_one_level() {
        assert_eq!(ScType::METAVAR_NODE.up_const_type(), ScType::VAR_NODE);
        assert_eq!(ScType::VAR_NODE.up_const_type(), ScType::CONST_NODE);
        assert_eq!(ScType::CONST_NODE.up_const_type(), ScType::CONST_NODE);
        assert_eq!(ScType::NODE.up_const_type(), ScType::NODE);
    }

    #[test]
    fn display_uses_current_name() {
        assert_eq!(ScType::NODE_CONST.to_string(), "ConstNode");
        assert_eq!(ScType::new(0x80000).to_string(), "0x80000");
    }
}
