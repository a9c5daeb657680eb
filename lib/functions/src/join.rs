//! Join functions that can be evaluated iteratively, one new binding set at a time.

use crate::combine_visibilities;
use rdf_streams_model::VisibilityBindingSet;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};

/// The kind of a SPARQL join.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JoinType {
    /// Only pairs of compatible binding sets are emitted.
    Natural,
    /// Like [JoinType::Natural], but left binding sets without a compatible right binding set are
    /// emitted on their own.
    LeftOuter,
}

impl JoinType {
    /// Creates the [IterativeJoin] that implements this kind of join.
    pub fn iterative_join(self) -> Box<dyn IterativeJoin> {
        match self {
            JoinType::Natural => Box::new(NaturalJoin),
            JoinType::LeftOuter => Box::new(LeftOuterJoin),
        }
    }
}

impl Display for JoinType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Natural => write!(f, "natural"),
            JoinType::LeftOuter => write!(f, "left outer"),
        }
    }
}

/// A join that is evaluated incrementally.
///
/// Whenever a new binding set arrives on one side of the join, it is joined with all binding sets
/// that have previously arrived on the other side. The implementations must not assume that the
/// candidates from the other side are compatible with the new binding set; incompatible pairs
/// must be skipped.
pub trait IterativeJoin: Debug + Send + Sync {
    /// Joins a new binding set from the left side with the binding sets seen on the right side.
    fn new_left_result(
        &self,
        left: &VisibilityBindingSet,
        right_candidates: &[VisibilityBindingSet],
    ) -> Vec<VisibilityBindingSet>;

    /// Joins a new binding set from the right side with the binding sets seen on the left side.
    fn new_right_result(
        &self,
        left_candidates: &[VisibilityBindingSet],
        right: &VisibilityBindingSet,
    ) -> Vec<VisibilityBindingSet>;
}

/// Implements the SPARQL inner join.
#[derive(Clone, Copy, Debug, Default)]
pub struct NaturalJoin;

impl IterativeJoin for NaturalJoin {
    fn new_left_result(
        &self,
        left: &VisibilityBindingSet,
        right_candidates: &[VisibilityBindingSet],
    ) -> Vec<VisibilityBindingSet> {
        right_candidates
            .iter()
            .filter_map(|right| join_binding_sets(left, right))
            .collect()
    }

    fn new_right_result(
        &self,
        left_candidates: &[VisibilityBindingSet],
        right: &VisibilityBindingSet,
    ) -> Vec<VisibilityBindingSet> {
        left_candidates
            .iter()
            .filter_map(|left| join_binding_sets(left, right))
            .collect()
    }
}

/// Implements the SPARQL left join (`OPTIONAL`) without a filter condition.
///
/// A left binding set that has no partner yet is emitted alone. If a compatible right binding set
/// arrives later, the joined binding set is emitted in addition; already emitted results are never
/// retracted.
#[derive(Clone, Copy, Debug, Default)]
pub struct LeftOuterJoin;

impl IterativeJoin for LeftOuterJoin {
    fn new_left_result(
        &self,
        left: &VisibilityBindingSet,
        right_candidates: &[VisibilityBindingSet],
    ) -> Vec<VisibilityBindingSet> {
        let joined = NaturalJoin.new_left_result(left, right_candidates);
        if joined.is_empty() {
            vec![left.clone()]
        } else {
            joined
        }
    }

    fn new_right_result(
        &self,
        left_candidates: &[VisibilityBindingSet],
        right: &VisibilityBindingSet,
    ) -> Vec<VisibilityBindingSet> {
        NaturalJoin.new_right_result(left_candidates, right)
    }
}

/// Merges two binding sets if they are compatible, i.e., all shared names are bound to equal terms.
pub fn join_binding_sets(
    left: &VisibilityBindingSet,
    right: &VisibilityBindingSet,
) -> Option<VisibilityBindingSet> {
    let mut bindings = left.bindings().clone();
    for (name, term) in right.bindings() {
        match bindings.get(name) {
            Some(existing) if existing != term => return None,
            Some(_) => {}
            None => {
                bindings.insert(name.as_str(), term.clone());
            }
        }
    }

    let visibility = combine_visibilities(left.visibility(), right.visibility());
    Some(VisibilityBindingSet::new(bindings, visibility))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_streams_model::{BindingSet, NamedNode, Term};

    fn binding_set(bindings: &[(&str, &str)], visibility: &str) -> VisibilityBindingSet {
        let bindings: BindingSet = bindings
            .iter()
            .map(|(name, value)| {
                let node = NamedNode::new_unchecked(format!("http://example.com/{value}"));
                (*name, Term::from(node))
            })
            .collect();
        VisibilityBindingSet::new(bindings, visibility)
    }

    #[test]
    fn natural_join_compatible_pairs() {
        let left = binding_set(&[("a", "alice"), ("b", "bob")], "x");
        let candidates = [
            binding_set(&[("b", "bob"), ("c", "carol")], "y"),
            binding_set(&[("b", "bea"), ("c", "dave")], "y"),
        ];

        let joined = NaturalJoin.new_left_result(&left, &candidates);

        assert_eq!(
            joined,
            vec![binding_set(
                &[("a", "alice"), ("b", "bob"), ("c", "carol")],
                "(x)&(y)"
            )]
        );
    }

    #[test]
    fn natural_join_drops_unmatched_left() {
        let left = binding_set(&[("a", "alice"), ("b", "bob")], "");

        assert!(NaturalJoin.new_left_result(&left, &[]).is_empty());
    }

    #[test]
    fn natural_join_is_symmetric() {
        let left = binding_set(&[("a", "alice"), ("b", "bob")], "");
        let right = binding_set(&[("b", "bob"), ("c", "carol")], "");

        assert_eq!(
            NaturalJoin.new_left_result(&left, &[right.clone()]),
            NaturalJoin.new_right_result(&[left], &right)
        );
    }

    #[test]
    fn left_outer_join_keeps_unmatched_left() {
        let left = binding_set(&[("a", "alice"), ("b", "bob")], "");
        let candidates = [binding_set(&[("b", "bea"), ("c", "carol")], "")];

        let joined = LeftOuterJoin.new_left_result(&left, &candidates);

        assert_eq!(joined, vec![left]);
    }

    #[test]
    fn left_outer_join_matched_left() {
        let left = binding_set(&[("a", "alice"), ("b", "bob")], "");
        let candidates = [binding_set(&[("b", "bob"), ("c", "carol")], "")];

        let joined = LeftOuterJoin.new_left_result(&left, &candidates);

        assert_eq!(
            joined,
            vec![binding_set(&[("a", "alice"), ("b", "bob"), ("c", "carol")], "")]
        );
    }

    #[test]
    fn left_outer_join_ignores_unmatched_right() {
        let right = binding_set(&[("b", "bob"), ("c", "carol")], "");

        assert!(LeftOuterJoin.new_right_result(&[], &right).is_empty());
    }

    #[test]
    fn join_without_shared_names_is_cross_product() {
        let left = binding_set(&[("a", "alice")], "");
        let candidates = [binding_set(&[("c", "carol")], ""), binding_set(&[("c", "dave")], "")];

        assert_eq!(NaturalJoin.new_left_result(&left, &candidates).len(), 2);
    }
}
