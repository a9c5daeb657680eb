use itertools::Itertools;
use std::collections::HashSet;
use std::hash::BuildHasher;

/// The variable orderings that a join stage uses to build the keys of its state store.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct JoinKeys {
    join_vars: Vec<String>,
    all_vars: Vec<String>,
}

impl JoinKeys {
    /// The variables shared by both sides of the join, sorted by name.
    ///
    /// An empty list indicates a cross join.
    pub fn join_vars(&self) -> &[String] {
        &self.join_vars
    }

    /// The join variables followed by the remaining variables of both sides, sorted by name.
    pub fn all_vars(&self) -> &[String] {
        &self.all_vars
    }
}

/// Computes the [JoinKeys] of a join whose operands produce `left_vars` and `right_vars`.
pub fn plan_join_keys<S: BuildHasher>(
    left_vars: &HashSet<String, S>,
    right_vars: &HashSet<String, S>,
) -> JoinKeys {
    let join_vars: Vec<String> = left_vars
        .iter()
        .filter(|v| right_vars.contains(*v))
        .sorted()
        .cloned()
        .collect();

    let remainder = left_vars
        .iter()
        .chain(right_vars.iter())
        .filter(|v| !join_vars.contains(*v))
        .unique()
        .sorted()
        .cloned();
    let all_vars = join_vars.iter().cloned().chain(remainder).collect();

    JoinKeys {
        join_vars,
        all_vars,
    }
}
