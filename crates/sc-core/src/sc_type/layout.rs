//! # Bit Layout
//!
//! Raw bit values of the sc-type encoding, as exchanged with the server.
//!
//! The server and the client must agree on one protocol revision: these
//! numbers go on the wire verbatim. Retargeting another revision means
//! replacing this file only; predicates, merge rules and the named table
//! are expressed in terms of the constants below.
//!
//! Node-only and connector-only groups reuse the same bits (`LINK` is the
//! same bit as `POS`). Predicates therefore always check the element kind
//! before looking at a subtype group.

// =============================================================================
// ELEMENT KIND
// =============================================================================

pub const NODE: u32 = 0x1;
pub const COMMON_EDGE: u32 = 0x2;
pub const COMMON_ARC: u32 = 0x4;
pub const MEMBERSHIP_ARC: u32 = 0x8;

// =============================================================================
// CONSTANCY
// =============================================================================

pub const CONST: u32 = 0x10;
pub const VAR: u32 = 0x20;
pub const METAVAR: u32 = 0x40;

// =============================================================================
// PERMANENCE (connectors only)
// =============================================================================

pub const TEMP: u32 = 0x80;
pub const PERM: u32 = 0x100;

/// Refinement of temporary arcs.
pub const ACTUAL: u32 = 0x1000;
pub const INACTUAL: u32 = 0x2000;

// =============================================================================
// POLARITY (membership arcs only)
// =============================================================================

pub const POS: u32 = 0x200;
pub const NEG: u32 = 0x400;
pub const FUZ: u32 = 0x800;

// =============================================================================
// NODE SUBTYPES (nodes only)
// =============================================================================

pub const LINK: u32 = 0x200;
pub const LINK_CLASS: u32 = 0x400;
pub const TUPLE: u32 = 0x800;
pub const STRUCTURE: u32 = 0x1000;
pub const ROLE: u32 = 0x2000;
pub const NON_ROLE: u32 = 0x4000;
pub const CLASS: u32 = 0x8000;
pub const SUPERCLASS: u32 = 0x10000;
pub const ABSTRACT: u32 = 0x20000;
pub const MATERIAL: u32 = 0x40000;

// =============================================================================
// MASKS
// =============================================================================

pub const CONNECTOR_MASK: u32 = COMMON_EDGE | COMMON_ARC | MEMBERSHIP_ARC;
pub const ARC_MASK: u32 = COMMON_ARC | MEMBERSHIP_ARC;
pub const ELEMENT_MASK: u32 = NODE | CONNECTOR_MASK;

pub const CONSTANCY_MASK: u32 = CONST | VAR | METAVAR;
pub const PERMANENCY_MASK: u32 = TEMP | PERM;
pub const ACTUALITY_MASK: u32 = ACTUAL | INACTUAL;
pub const POSITIVITY_MASK: u32 = POS | NEG | FUZ;

/// Semantic node subtype, excluding the link bits.
pub const NODE_SEMANTIC_MASK: u32 =
    TUPLE | STRUCTURE | ROLE | NON_ROLE | CLASS | SUPERCLASS | ABSTRACT | MATERIAL;
pub const LINK_MASK: u32 = LINK | LINK_CLASS;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_do_not_overlap_within_a_kind() {
        // Connector groups
        let connector_groups = [
            CONNECTOR_MASK,
            CONSTANCY_MASK,
            PERMANENCY_MASK,
            ACTUALITY_MASK,
            POSITIVITY_MASK,
        ];
        for (i, a) in connector_groups.iter().enumerate() {
            for b in &connector_groups[i + 1..] {
                assert_eq!(a & b, 0, "{a:#x} overlaps {b:#x}");
            }
        }

        // Node groups
        let node_groups = [NODE, CONSTANCY_MASK, LINK_MASK, NODE_SEMANTIC_MASK];
        for (i, a) in node_groups.iter().enumerate() {
            for b in &node_groups[i + 1..] {
                assert_eq!(a & b, 0, "{a:#x} overlaps {b:#x}");
            }
        }
    }

    #[test]
    fn link_shares_the_positive_bit() {
        assert_eq!(LINK, POS);
    }
}
