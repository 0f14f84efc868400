//! Specialized collection types

pub use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Stable handle to a node stored in a scene
    pub struct NodeId;
}

/// Handle-based map using slot map for stable node references
pub type NodeMap<T> = SlotMap<NodeId, T>;
