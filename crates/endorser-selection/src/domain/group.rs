//! # Group Model
//!
//! The algebra elements endorsement policies are compiled into.
//!
//! - [`Item`] is either a [`Peer`] or a nested [`Group`].
//! - [`Group::Items`] is a conjunction: every item must hold.
//! - [`Group::OfGroups`] wraps a [`GroupOfGroups`], a disjunction over child groups.
//! - [`Group::Peers`] wraps a [`PeerGroup`], the leaves that resolve to peers.
//!
//! Equality is set equality: same items, order ignored.

use super::entities::Peer;
use std::fmt;
use std::sync::Arc;

/// Live lookup of the peers currently known for an MSP.
pub type PeerRetriever = Arc<dyn Fn(&str) -> Vec<Peer> + Send + Sync>;

/// Atomic algebra element.
#[derive(Clone, Debug)]
pub enum Item {
    /// A single peer
    Peer(Peer),
    /// A nested group
    Group(Group),
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Item::Peer(a), Item::Peer(b)) => a == b,
            (Item::Group(a), Item::Group(b)) => a.equals(b),
            _ => false,
        }
    }
}

/// A set of items.
#[derive(Clone, Debug)]
pub enum Group {
    /// Conjunction of items
    Items(Vec<Item>),
    /// Disjunction of groups
    OfGroups(GroupOfGroups),
    /// Peer leaf
    Peers(PeerGroup),
}

impl Group {
    /// Conjunction over `items`.
    pub fn new(items: Vec<Item>) -> Self {
        Group::Items(items)
    }

    /// Items of this group.
    ///
    /// For MSP peer groups this performs a live membership lookup.
    pub fn items(&self) -> Vec<Item> {
        match self {
            Group::Items(items) => items.clone(),
            Group::OfGroups(gog) => gog.groups.iter().cloned().map(Item::Group).collect(),
            Group::Peers(pg) => pg.peers().into_iter().map(Item::Peer).collect(),
        }
    }

    /// Set equality with another group of the same shape.
    pub fn equals(&self, other: &Group) -> bool {
        match (self, other) {
            (Group::Items(a), Group::Items(b)) => same_items(a, b),
            (Group::OfGroups(a), Group::OfGroups(b)) => a.equals(b),
            (Group::Peers(a), Group::Peers(b)) => a.equals(b),
            _ => false,
        }
    }
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl From<PeerGroup> for Group {
    fn from(pg: PeerGroup) -> Self {
        Group::Peers(pg)
    }
}

impl From<GroupOfGroups> for Group {
    fn from(gog: GroupOfGroups) -> Self {
        Group::OfGroups(gog)
    }
}

/// A group whose items are always groups.
#[derive(Clone, Debug, Default)]
pub struct GroupOfGroups {
    pub(crate) groups: Vec<Group>,
}

impl GroupOfGroups {
    /// Disjunction over `groups`.
    pub fn new(groups: Vec<Group>) -> Self {
        Self { groups }
    }

    /// Child groups.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Number of child groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there are no child groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Set equality over child groups.
    pub fn equals(&self, other: &GroupOfGroups) -> bool {
        self.groups.len() == other.groups.len()
            && self.groups.iter().all(|g| contains_group(&other.groups, g))
            && other.groups.iter().all(|g| contains_group(&self.groups, g))
    }
}

impl PartialEq for GroupOfGroups {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

/// A group whose items are all peers.
#[derive(Clone)]
pub enum PeerGroup {
    /// Fixed peer list
    Static(Vec<Peer>),
    /// All live peers of an MSP, looked up on demand
    Msp {
        /// MSP the group stands for
        msp_id: String,
        /// Membership lookup
        retriever: PeerRetriever,
    },
}

impl PeerGroup {
    /// Fixed group of `peers`.
    pub fn new(peers: Vec<Peer>) -> Self {
        PeerGroup::Static(peers)
    }

    /// Group with no peers.
    pub fn empty() -> Self {
        PeerGroup::Static(Vec::new())
    }

    /// Deferred group of every live peer belonging to `msp_id`.
    pub fn msp(msp_id: impl Into<String>, retriever: PeerRetriever) -> Self {
        PeerGroup::Msp {
            msp_id: msp_id.into(),
            retriever,
        }
    }

    /// Current peers; possibly empty for MSP groups with no live peers.
    pub fn peers(&self) -> Vec<Peer> {
        match self {
            PeerGroup::Static(peers) => peers.clone(),
            PeerGroup::Msp { msp_id, retriever } => retriever(msp_id.as_str()),
        }
    }

    /// MSP this group resolves, if deferred.
    pub fn msp_id(&self) -> Option<&str> {
        match self {
            PeerGroup::Static(_) => None,
            PeerGroup::Msp { msp_id, .. } => Some(msp_id),
        }
    }

    /// Whether the group holds no peers right now.
    pub fn is_empty(&self) -> bool {
        self.peers().is_empty()
    }

    /// Static groups compare by peer set, MSP groups by MSP ID.
    pub fn equals(&self, other: &PeerGroup) -> bool {
        match (self, other) {
            (PeerGroup::Static(a), PeerGroup::Static(b)) => {
                a.len() == b.len()
                    && a.iter().all(|p| b.contains(p))
                    && b.iter().all(|p| a.contains(p))
            }
            (PeerGroup::Msp { msp_id: a, .. }, PeerGroup::Msp { msp_id: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for PeerGroup {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl fmt::Debug for PeerGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeerGroup::Static(peers) => f.debug_tuple("Static").field(peers).finish(),
            PeerGroup::Msp { msp_id, .. } => f.debug_struct("Msp").field("msp_id", msp_id).finish(),
        }
    }
}

/// Whether `items` holds an item equal to `item`.
pub fn contains_item(items: &[Item], item: &Item) -> bool {
    items.iter().any(|i| i == item)
}

/// Whether `groups` holds a group equal to `group`.
pub fn contains_group(groups: &[Group], group: &Group) -> bool {
    groups.iter().any(|g| g.equals(group))
}

fn same_items(a: &[Item], b: &[Item]) -> bool {
    a.len() == b.len()
        && a.iter().all(|i| contains_item(b, i))
        && b.iter().all(|i| contains_item(a, i))
}
