//! # Group Algebra
//!
//! Side-effect free operations over the group model:
//!
//! - [`Group::reduce`] distributes AND over OR and yields the flat list of
//!   alternatives a structure denotes.
//! - [`Group::collapse`] merges nested conjunctions and drops duplicates.
//! - [`and`] is the cartesian product across groups.
//! - [`GroupOfGroups::nof`] generates the m-out-of-n combinations.
//!
//! Traversal is left-to-right everywhere, so the order of produced
//! alternatives is stable for a given input.

use crate::domain::{
    contains_group, contains_item, Group, GroupOfGroups, Item, PeerGroup, SelectionError,
    SelectionResult,
};

impl Group {
    /// Alternatives this group denotes once AND has been distributed over OR.
    ///
    /// Every returned group is a conjunction (or a bare peer leaf); none of
    /// them contains a disjunction.
    pub fn reduce(&self) -> Vec<Group> {
        match self {
            Group::Peers(_) => vec![self.clone()],
            Group::OfGroups(gog) => gog.reduce(),
            Group::Items(items) => reduce_conjunction(items),
        }
    }

    /// Flatten nested conjunctions into one group without duplicates.
    ///
    /// Disjunctions and peer leaves are left as they are.
    pub fn collapse(&self) -> Group {
        let Group::Items(items) = self else {
            return self.clone();
        };

        let (nested, leaves): (Vec<&Item>, Vec<&Item>) = items
            .iter()
            .partition(|item| matches!(item, Item::Group(Group::Items(_))));

        let mut flat: Vec<Item> = Vec::with_capacity(items.len());
        for item in leaves {
            if !contains_item(&flat, item) {
                flat.push(item.clone());
            }
        }
        for item in nested {
            let Item::Group(group) = item else { continue };
            if let Group::Items(sub_items) = group.collapse() {
                for sub in sub_items {
                    if !contains_item(&flat, &sub) {
                        flat.push(sub);
                    }
                }
            }
        }

        Group::Items(flat)
    }
}

impl GroupOfGroups {
    /// Alternatives of the disjunction: the union of every child's alternatives.
    ///
    /// A single child is reduced directly, `(A)` being `A`.
    pub fn reduce(&self) -> Vec<Group> {
        if let [only] = self.groups.as_slice() {
            return only.reduce();
        }

        let mut alternatives: Vec<Group> = Vec::new();
        for group in &self.groups {
            for alternative in group.reduce() {
                if !contains_group(&alternatives, &alternative) {
                    alternatives.push(alternative);
                }
            }
        }
        alternatives
    }

    /// Every `threshold`-sized combination of the child groups, each as a conjunction.
    ///
    /// # Errors
    ///
    /// `InvalidThreshold` when `threshold` is not in `1..=len`.
    pub fn nof(&self, threshold: i32) -> SelectionResult<GroupOfGroups> {
        let available = self.groups.len();
        if threshold <= 0 || threshold as usize > available {
            return Err(SelectionError::InvalidThreshold {
                threshold,
                available,
            });
        }

        let groups = combinations(&self.groups, threshold as usize)
            .into_iter()
            .map(|combination| Group::Items(combination.into_iter().map(Item::Group).collect()))
            .collect();
        Ok(GroupOfGroups::new(groups))
    }
}

/// Cartesian product across groups: one item from each, in input order.
///
/// `and([(A,B),(C,D)]) == [(A,C),(A,D),(B,C),(B,D)]`
pub fn and(groups: &[Group]) -> Vec<Group> {
    let item_lists: Vec<Vec<Item>> = groups.iter().map(Group::items).collect();
    cartesian_product(&item_lists)
        .into_iter()
        .map(Group::Items)
        .collect()
}

/// Cartesian product over lists, enumerated depth-first with an explicit stack.
///
/// Yields nothing when any list is empty.
pub fn cartesian_product<T: Clone>(lists: &[Vec<T>]) -> Vec<Vec<T>> {
    if lists.is_empty() || lists.iter().any(Vec::is_empty) {
        return Vec::new();
    }

    let mut product = Vec::new();
    // chosen index per visited level
    let mut stack: Vec<usize> = vec![0];

    loop {
        if stack.len() < lists.len() {
            stack.push(0);
            continue;
        }

        product.push(
            stack
                .iter()
                .enumerate()
                .map(|(level, &index)| lists[level][index].clone())
                .collect(),
        );

        loop {
            let Some(index) = stack.pop() else {
                return product;
            };
            let level = stack.len();
            if index + 1 < lists[level].len() {
                stack.push(index + 1);
                break;
            }
        }
    }
}

/// Combinations without repetition, each preserving input order.
pub fn combinations<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    if size == 0 || size > items.len() {
        return Vec::new();
    }
    if size == 1 {
        return items.iter().map(|item| vec![item.clone()]).collect();
    }

    let mut result = Vec::new();
    for (i, first) in items.iter().enumerate() {
        let rest = &items[i + 1..];
        if rest.len() < size - 1 {
            break;
        }
        for tail in combinations(rest, size - 1) {
            let mut combination = Vec::with_capacity(size);
            combination.push(first.clone());
            combination.extend(tail);
            result.push(combination);
        }
    }
    result
}

/// Reduce a conjunction: reduce each item, AND the per-item alternatives,
/// collapse every combination and drop duplicates.
fn reduce_conjunction(items: &[Item]) -> Vec<Group> {
    let branches: Vec<Group> = items
        .iter()
        .map(|item| match item {
            Item::Group(group) => Group::OfGroups(GroupOfGroups::new(group.reduce())),
            Item::Peer(peer) => Group::OfGroups(GroupOfGroups::new(vec![Group::Peers(
                PeerGroup::new(vec![peer.clone()]),
            )])),
        })
        .collect();

    let mut alternatives: Vec<Group> = Vec::new();
    for combination in and(&branches) {
        let collapsed = combination.collapse();
        if !contains_group(&alternatives, &collapsed) {
            alternatives.push(collapsed);
        }
    }
    alternatives
}
