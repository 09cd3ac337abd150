//! Ring index model
//!
//! A ring is a fixed-size circular sequence of same-role elements (cards,
//! background images or info panels). Each slot carries the role label and
//! z-order that the page renders; the page markup is only ever a projection of
//! these slots.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CarouselError, Result};

/// Which parallel ring a slot belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RingKind {
    Card,
    Background,
    Info,
}

impl RingKind {
    /// Class suffix used by the markup (`current--card`, `next--image`, ...)
    pub fn class_suffix(&self) -> &'static str {
        match self {
            RingKind::Card => "card",
            RingKind::Background => "image",
            RingKind::Info => "info",
        }
    }
}

impl fmt::Display for RingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RingKind::Card => "card",
            RingKind::Background => "background",
            RingKind::Info => "info",
        })
    }
}

/// Role label held by at most one slot per ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Current,
    Previous,
    Next,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Current, Role::Previous, Role::Next];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Current => "current",
            Role::Previous => "previous",
            Role::Next => "next",
        }
    }

    /// Full class name for this role in the given ring, e.g. `previous--info`
    pub fn class_name(&self, kind: RingKind) -> String {
        format!("{}--{}", self.as_str(), kind.class_suffix())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Previous/current/next indices of a ring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbors {
    pub previous: usize,
    pub current: usize,
    pub next: usize,
}

impl Neighbors {
    /// Compute neighbors of `current` in a ring of `len` elements.
    ///
    /// Neighbor computation does not depend on the swap direction; only the
    /// role assignment done by the tagger does.
    pub fn around(current: usize, len: usize, kind: RingKind) -> Result<Self> {
        if len == 0 {
            return Err(CarouselError::EmptyRing(kind));
        }
        let current = current % len;
        Ok(Self {
            previous: (current + len - 1) % len,
            current,
            next: (current + 1) % len,
        })
    }
}

/// One element of a ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Slot {
    pub role: Option<Role>,
    /// Stacking order; `None` leaves whatever the page already has
    pub z_order: Option<i32>,
}

/// Fixed-size circular sequence of slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ring {
    kind: RingKind,
    slots: Vec<Slot>,
}

impl Ring {
    /// Build a ring from the roles found in the markup, in document order.
    pub fn from_roles(kind: RingKind, roles: Vec<Option<Role>>) -> Result<Self> {
        if roles.is_empty() {
            return Err(CarouselError::EmptyRing(kind));
        }
        let slots = roles
            .into_iter()
            .map(|role| Slot {
                role,
                z_order: None,
            })
            .collect();
        Ok(Self { kind, slots })
    }

    /// Ring of `len` slots with the conventional starting layout: index 0
    /// current, index 1 next, last index previous.
    pub fn with_len(kind: RingKind, len: usize) -> Result<Self> {
        let neighbors = Neighbors::around(0, len, kind)?;
        let mut roles = vec![None; len];
        roles[neighbors.previous] = Some(Role::Previous);
        roles[neighbors.next] = Some(Role::Next);
        roles[neighbors.current] = Some(Role::Current);
        Self::from_roles(kind, roles)
    }

    pub fn kind(&self) -> RingKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always false; construction rejects empty rings
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Index of the slot holding `role`, if any
    pub fn find(&self, role: Role) -> Option<usize> {
        self.slots.iter().position(|s| s.role == Some(role))
    }

    /// Index of the slot holding `role`, or a `MissingRoleElement` error
    pub fn require(&self, role: Role) -> Result<usize> {
        self.find(role).ok_or(CarouselError::MissingRoleElement {
            ring: self.kind,
            role,
        })
    }

    /// Index marked current, defaulting to 0 when nothing is marked yet
    pub fn current_index(&self) -> usize {
        self.find(Role::Current).unwrap_or(0)
    }

    pub fn neighbors(&self) -> Neighbors {
        // len > 0 is guaranteed by construction
        let len = self.slots.len();
        let current = self.current_index();
        Neighbors {
            previous: (current + len - 1) % len,
            current,
            next: (current + 1) % len,
        }
    }

    /// Remove every role label. Z-order is left alone.
    pub fn clear_roles(&mut self) {
        for slot in &mut self.slots {
            slot.role = None;
        }
    }

    /// Give `role` to the slot at `index`, with an optional z-order
    pub(crate) fn assign(&mut self, index: usize, role: Role, z_order: Option<i32>) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.role = Some(role);
            if z_order.is_some() {
                slot.z_order = z_order;
            }
        }
    }

    /// Roles in slot order, for comparing rings
    pub fn roles(&self) -> Vec<Option<Role>> {
        self.slots.iter().map(|s| s.role).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_neighbors_five() {
        let n = Neighbors::around(0, 5, RingKind::Card).unwrap();
        assert_eq!(n.previous, 4);
        assert_eq!(n.current, 0);
        assert_eq!(n.next, 1);
    }

    #[test]
    fn test_neighbors_single() {
        let n = Neighbors::around(0, 1, RingKind::Card).unwrap();
        assert_eq!(n.previous, 0);
        assert_eq!(n.next, 0);
    }

    #[test]
    fn test_empty_ring_rejected() {
        assert_eq!(
            Neighbors::around(0, 0, RingKind::Info),
            Err(CarouselError::EmptyRing(RingKind::Info))
        );
        assert_eq!(
            Ring::from_roles(RingKind::Background, vec![]),
            Err(CarouselError::EmptyRing(RingKind::Background))
        );
    }

    #[test]
    fn test_current_defaults_to_first() {
        let ring = Ring::from_roles(RingKind::Card, vec![None, None, None]).unwrap();
        assert_eq!(ring.current_index(), 0);
        assert_eq!(ring.neighbors().previous, 2);
    }

    #[test]
    fn test_with_len_layout() {
        let ring = Ring::with_len(RingKind::Card, 4).unwrap();
        assert_eq!(
            ring.roles(),
            vec![Some(Role::Current), Some(Role::Next), None, Some(Role::Previous)]
        );
    }

    #[test]
    fn test_require_missing_role() {
        let ring = Ring::from_roles(RingKind::Info, vec![Some(Role::Current), None]).unwrap();
        assert_eq!(ring.require(Role::Current), Ok(0));
        assert_eq!(
            ring.require(Role::Next),
            Err(CarouselError::MissingRoleElement {
                ring: RingKind::Info,
                role: Role::Next
            })
        );
    }

    #[test]
    fn test_class_names() {
        assert_eq!(Role::Current.class_name(RingKind::Card), "current--card");
        assert_eq!(Role::Previous.class_name(RingKind::Background), "previous--image");
        assert_eq!(Role::Next.class_name(RingKind::Info), "next--info");
    }

    proptest! {
        #[test]
        fn neighbors_stay_in_bounds(len in 1usize..64, current in 0usize..64) {
            let n = Neighbors::around(current, len, RingKind::Card).unwrap();
            prop_assert!(n.previous < len && n.current < len && n.next < len);
            prop_assert_eq!((n.previous + 1) % len, n.current);
            prop_assert_eq!((n.current + 1) % len, n.next);
        }
    }
}
