//! Frozen table of named sc-types.
//!
//! Every entry becomes an associated constant of `ScType` and a row of
//! `NAMED_TYPES`. Current names come first so that `ScType::name` prefers
//! them; legacy names follow as aliases of the same values.

use super::ScType;
use super::layout::{
    ABSTRACT, ACTUAL, CLASS, COMMON_ARC, COMMON_EDGE, CONST, FUZ, INACTUAL, LINK, LINK_CLASS,
    MATERIAL, MEMBERSHIP_ARC, METAVAR, NEG, NODE, NON_ROLE, PERM, POS, ROLE, STRUCTURE,
    SUPERCLASS, TEMP, TUPLE, VAR,
};

macro_rules! named_types {
    ($( $ident:ident = $name:literal => $value:expr; )*) => {
        impl ScType {
            $(
                #[doc = concat!("`", $name, "`")]
                pub const $ident: ScType = ScType::new($value);
            )*
        }

        pub(super) const NAMED_TYPES: &[(&str, ScType)] = &[
            $( ($name, ScType::$ident), )*
        ];
    };
}

named_types! {
    // -------------------------------------------------------------------------
    // Current names
    // -------------------------------------------------------------------------
    UNKNOWN = "Unknown" => 0;
    CONST = "Const" => CONST;
    VAR = "Var" => VAR;
    METAVAR = "Metavar" => METAVAR;

    NODE = "Node" => NODE;
    CONST_NODE = "ConstNode" => NODE | CONST;
    VAR_NODE = "VarNode" => NODE | VAR;
    METAVAR_NODE = "MetavarNode" => NODE | METAVAR;

    NODE_LINK = "NodeLink" => NODE | LINK;
    CONST_NODE_LINK = "ConstNodeLink" => NODE | LINK | CONST;
    VAR_NODE_LINK = "VarNodeLink" => NODE | LINK | VAR;
    NODE_LINK_CLASS = "NodeLinkClass" => NODE | LINK | LINK_CLASS;
    CONST_NODE_LINK_CLASS = "ConstNodeLinkClass" => NODE | LINK | LINK_CLASS | CONST;
    VAR_NODE_LINK_CLASS = "VarNodeLinkClass" => NODE | LINK | LINK_CLASS | VAR;

    NODE_TUPLE = "NodeTuple" => NODE | TUPLE;
    CONST_NODE_TUPLE = "ConstNodeTuple" => NODE | TUPLE | CONST;
    VAR_NODE_TUPLE = "VarNodeTuple" => NODE | TUPLE | VAR;
    NODE_STRUCTURE = "NodeStructure" => NODE | STRUCTURE;
    CONST_NODE_STRUCTURE = "ConstNodeStructure" => NODE | STRUCTURE | CONST;
    VAR_NODE_STRUCTURE = "VarNodeStructure" => NODE | STRUCTURE | VAR;
    NODE_ROLE = "NodeRole" => NODE | ROLE;
    CONST_NODE_ROLE = "ConstNodeRole" => NODE | ROLE | CONST;
    VAR_NODE_ROLE = "VarNodeRole" => NODE | ROLE | VAR;
    NODE_NON_ROLE = "NodeNonRole" => NODE | NON_ROLE;
    CONST_NODE_NON_ROLE = "ConstNodeNonRole" => NODE | NON_ROLE | CONST;
    VAR_NODE_NON_ROLE = "VarNodeNonRole" => NODE | NON_ROLE | VAR;
    NODE_CLASS = "NodeClass" => NODE | CLASS;
    CONST_NODE_CLASS = "ConstNodeClass" => NODE | CLASS | CONST;
    VAR_NODE_CLASS = "VarNodeClass" => NODE | CLASS | VAR;
    NODE_SUPERCLASS = "NodeSuperclass" => NODE | SUPERCLASS;
    CONST_NODE_SUPERCLASS = "ConstNodeSuperclass" => NODE | SUPERCLASS | CONST;
    VAR_NODE_SUPERCLASS = "VarNodeSuperclass" => NODE | SUPERCLASS | VAR;
    NODE_MATERIAL = "NodeMaterial" => NODE | MATERIAL;
    CONST_NODE_MATERIAL = "ConstNodeMaterial" => NODE | MATERIAL | CONST;
    VAR_NODE_MATERIAL = "VarNodeMaterial" => NODE | MATERIAL | VAR;

    COMMON_EDGE = "CommonEdge" => COMMON_EDGE;
    CONST_COMMON_EDGE = "ConstCommonEdge" => COMMON_EDGE | CONST;
    VAR_COMMON_EDGE = "VarCommonEdge" => COMMON_EDGE | VAR;
    COMMON_ARC = "CommonArc" => COMMON_ARC;
    CONST_COMMON_ARC = "ConstCommonArc" => COMMON_ARC | CONST;
    VAR_COMMON_ARC = "VarCommonArc" => COMMON_ARC | VAR;
    MEMBERSHIP_ARC = "MembershipArc" => MEMBERSHIP_ARC;
    CONST_MEMBERSHIP_ARC = "ConstMembershipArc" => MEMBERSHIP_ARC | CONST;
    VAR_MEMBERSHIP_ARC = "VarMembershipArc" => MEMBERSHIP_ARC | VAR;

    CONST_PERM_POS_ARC = "ConstPermPosArc" => MEMBERSHIP_ARC | CONST | PERM | POS;
    CONST_PERM_NEG_ARC = "ConstPermNegArc" => MEMBERSHIP_ARC | CONST | PERM | NEG;
    VAR_PERM_POS_ARC = "VarPermPosArc" => MEMBERSHIP_ARC | VAR | PERM | POS;
    VAR_PERM_NEG_ARC = "VarPermNegArc" => MEMBERSHIP_ARC | VAR | PERM | NEG;
    CONST_TEMP_POS_ARC = "ConstTempPosArc" => MEMBERSHIP_ARC | CONST | TEMP | POS;
    CONST_TEMP_NEG_ARC = "ConstTempNegArc" => MEMBERSHIP_ARC | CONST | TEMP | NEG;
    VAR_TEMP_POS_ARC = "VarTempPosArc" => MEMBERSHIP_ARC | VAR | TEMP | POS;
    VAR_TEMP_NEG_ARC = "VarTempNegArc" => MEMBERSHIP_ARC | VAR | TEMP | NEG;
    CONST_ACTUAL_TEMP_POS_ARC = "ConstActualTempPosArc" => MEMBERSHIP_ARC | CONST | TEMP | ACTUAL | POS;
    CONST_ACTUAL_TEMP_NEG_ARC = "ConstActualTempNegArc" => MEMBERSHIP_ARC | CONST | TEMP | ACTUAL | NEG;
    CONST_INACTUAL_TEMP_POS_ARC = "ConstInactualTempPosArc" => MEMBERSHIP_ARC | CONST | TEMP | INACTUAL | POS;
    CONST_INACTUAL_TEMP_NEG_ARC = "ConstInactualTempNegArc" => MEMBERSHIP_ARC | CONST | TEMP | INACTUAL | NEG;
    VAR_ACTUAL_TEMP_POS_ARC = "VarActualTempPosArc" => MEMBERSHIP_ARC | VAR | TEMP | ACTUAL | POS;
    VAR_ACTUAL_TEMP_NEG_ARC = "VarActualTempNegArc" => MEMBERSHIP_ARC | VAR | TEMP | ACTUAL | NEG;
    VAR_INACTUAL_TEMP_POS_ARC = "VarInactualTempPosArc" => MEMBERSHIP_ARC | VAR | TEMP | INACTUAL | POS;
    VAR_INACTUAL_TEMP_NEG_ARC = "VarInactualTempNegArc" => MEMBERSHIP_ARC | VAR | TEMP | INACTUAL | NEG;
    CONST_FUZ_ARC = "ConstFuzArc" => MEMBERSHIP_ARC | CONST | FUZ;
    VAR_FUZ_ARC = "VarFuzArc" => MEMBERSHIP_ARC | VAR | FUZ;

    // -------------------------------------------------------------------------
    // Legacy names
    // -------------------------------------------------------------------------
    NODE_CONST = "NodeConst" => NODE | CONST;
    NODE_VAR = "NodeVar" => NODE | VAR;
    LINK = "Link" => NODE | LINK;
    LINK_CONST = "LinkConst" => NODE | LINK | CONST;
    LINK_VAR = "LinkVar" => NODE | LINK | VAR;

    NODE_STRUCT = "NodeStruct" => NODE | STRUCTURE;
    NODE_NO_ROLE = "NodeNoRole" => NODE | NON_ROLE;
    NODE_ABSTRACT = "NodeAbstract" => NODE | ABSTRACT;

    NODE_CONST_STRUCT = "NodeConstStruct" => NODE | CONST | STRUCTURE;
    NODE_CONST_TUPLE = "NodeConstTuple" => NODE | CONST | TUPLE;
    NODE_CONST_ROLE = "NodeConstRole" => NODE | CONST | ROLE;
    NODE_CONST_NO_ROLE = "NodeConstNoRole" => NODE | CONST | NON_ROLE;
    NODE_CONST_CLASS = "NodeConstClass" => NODE | CONST | CLASS;
    NODE_CONST_ABSTRACT = "NodeConstAbstract" => NODE | CONST | ABSTRACT;
    NODE_CONST_MATERIAL = "NodeConstMaterial" => NODE | CONST | MATERIAL;

    NODE_VAR_STRUCT = "NodeVarStruct" => NODE | VAR | STRUCTURE;
    NODE_VAR_TUPLE = "NodeVarTuple" => NODE | VAR | TUPLE;
    NODE_VAR_ROLE = "NodeVarRole" => NODE | VAR | ROLE;
    NODE_VAR_NO_ROLE = "NodeVarNoRole" => NODE | VAR | NON_ROLE;
    NODE_VAR_CLASS = "NodeVarClass" => NODE | VAR | CLASS;
    NODE_VAR_ABSTRACT = "NodeVarAbstract" => NODE | VAR | ABSTRACT;
    NODE_VAR_MATERIAL = "NodeVarMaterial" => NODE | VAR | MATERIAL;

    EDGE_U_COMMON = "EdgeUCommon" => COMMON_EDGE;
    EDGE_D_COMMON = "EdgeDCommon" => COMMON_ARC;
    EDGE_U_COMMON_CONST = "EdgeUCommonConst" => COMMON_EDGE | CONST;
    EDGE_D_COMMON_CONST = "EdgeDCommonConst" => COMMON_ARC | CONST;
    EDGE_U_COMMON_VAR = "EdgeUCommonVar" => COMMON_EDGE | VAR;
    EDGE_D_COMMON_VAR = "EdgeDCommonVar" => COMMON_ARC | VAR;

    EDGE_ACCESS = "EdgeAccess" => MEMBERSHIP_ARC;
    EDGE_ACCESS_CONST_POS_PERM = "EdgeAccessConstPosPerm" => MEMBERSHIP_ARC | CONST | PERM | POS;
    EDGE_ACCESS_CONST_NEG_PERM = "EdgeAccessConstNegPerm" => MEMBERSHIP_ARC | CONST | PERM | NEG;
    EDGE_ACCESS_CONST_FUZ_PERM = "EdgeAccessConstFuzPerm" => MEMBERSHIP_ARC | CONST | PERM | FUZ;
    EDGE_ACCESS_CONST_POS_TEMP = "EdgeAccessConstPosTemp" => MEMBERSHIP_ARC | CONST | TEMP | POS;
    EDGE_ACCESS_CONST_NEG_TEMP = "EdgeAccessConstNegTemp" => MEMBERSHIP_ARC | CONST | TEMP | NEG;
    EDGE_ACCESS_CONST_FUZ_TEMP = "EdgeAccessConstFuzTemp" => MEMBERSHIP_ARC | CONST | TEMP | FUZ;
    EDGE_ACCESS_VAR_POS_PERM = "EdgeAccessVarPosPerm" => MEMBERSHIP_ARC | VAR | PERM | POS;
    EDGE_ACCESS_VAR_NEG_PERM = "EdgeAccessVarNegPerm" => MEMBERSHIP_ARC | VAR | PERM | NEG;
    EDGE_ACCESS_VAR_FUZ_PERM = "EdgeAccessVarFuzPerm" => MEMBERSHIP_ARC | VAR | PERM | FUZ;
    EDGE_ACCESS_VAR_POS_TEMP = "EdgeAccessVarPosTemp" => MEMBERSHIP_ARC | VAR | TEMP | POS;
    EDGE_ACCESS_VAR_NEG_TEMP = "EdgeAccessVarNegTemp" => MEMBERSHIP_ARC | VAR | TEMP | NEG;
    EDGE_ACCESS_VAR_FUZ_TEMP = "EdgeAccessVarFuzTemp" => MEMBERSHIP_ARC | VAR | TEMP | FUZ;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn names_are_unique() {
        let mut seen = BTreeSet::new();
        for (name, _) in NAMED_TYPES {
            assert!(seen.insert(*name), "duplicate name {name}");
        }
    }

    #[test]
    fn legacy_names_alias_current_values() {
        assert_eq!(ScType::NODE_CONST, ScType::CONST_NODE);
        assert_eq!(ScType::LINK_VAR, ScType::VAR_NODE_LINK);
        assert_eq!(ScType::NODE_CONST_STRUCT, ScType::CONST_NODE_STRUCTURE);
        assert_eq!(ScType::NODE_VAR_NO_ROLE, ScType::VAR_NODE_NON_ROLE);
        assert_eq!(ScType::EDGE_D_COMMON_CONST, ScType::CONST_COMMON_ARC);
        assert_eq!(ScType::EDGE_U_COMMON_VAR, ScType::VAR_COMMON_EDGE);
        assert_eq!(
            ScType::EDGE_ACCESS_VAR_POS_PERM,
            ScType::VAR_PERM_POS_ARC
        );
        assert_eq!(
            ScType::EDGE_ACCESS_CONST_NEG_TEMP,
            ScType::CONST_TEMP_NEG_ARC
        );
    }

    #[test]
    fn lookup_prefers_current_name() {
        assert_eq!(ScType::from_name("NodeConst"), Some(ScType::CONST_NODE));
        assert_eq!(ScType::NODE_CONST.name(), Some("ConstNode"));
        assert_eq!(
            ScType::EDGE_ACCESS_CONST_POS_PERM.name(),
            Some("ConstPermPosArc")
        );
        assert_eq!(
            ScType::EDGE_ACCESS_CONST_FUZ_PERM.name(),
            Some("EdgeAccessConstFuzPerm")
        );
        assert_eq!(ScType::from_name("NoSuchType"), None);
    }

    #[test]
    fn every_named_type_round_trips_through_its_preferred_name() {
        for (_, t) in NAMED_TYPES {
            let name = t.name().expect("named");
            assert_eq!(ScType::from_name(name), Some(*t));
        }
    }
}
