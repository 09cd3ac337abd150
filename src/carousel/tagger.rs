//! State tagger: role and z-order rotation applied to one ring at a time

use serde::{Deserialize, Serialize};

use super::ring::{Neighbors, Ring, RingKind, Role};
use crate::consts::*;
use crate::error::Result;

/// Swap direction supplied per user action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Show the previous item
    Left,
    /// Show the next item
    Right,
}

impl Direction {
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Z-order written to the three slots touched by a rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZTiers {
    /// New current
    pub incoming: Option<i32>,
    /// Old current
    pub outgoing: Option<i32>,
    /// The remaining neighbor of the new current
    pub other: Option<i32>,
}

impl ZTiers {
    pub fn for_kind(kind: RingKind) -> Self {
        match kind {
            RingKind::Card => Self {
                incoming: Some(CARD_Z_CURRENT),
                outgoing: Some(CARD_Z_OUTGOING),
                other: Some(CARD_Z_OTHER),
            },
            // Backgrounds only order the two images taking part in the cross-fade
            RingKind::Background => Self {
                incoming: Some(BG_Z_CURRENT),
                outgoing: Some(BG_Z_OUTGOING),
                other: None,
            },
            RingKind::Info => Self {
                incoming: None,
                outgoing: None,
                other: None,
            },
        }
    }
}

/// Indices that changed hands in one rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation {
    pub outgoing: usize,
    pub incoming: usize,
}

/// Index that becomes current when `ring` rotates toward `direction`
pub fn incoming_index(ring: &Ring, direction: Direction) -> usize {
    let old = ring.neighbors();
    match direction {
        Direction::Right => old.next,
        Direction::Left => old.previous,
    }
}

/// Rotate the roles of `ring` one step toward `direction`.
///
/// Right: old current becomes previous and old next becomes current. Left is
/// the mirror image. After the call the three roles sit on the new current and
/// its two neighbors, so applying the opposite direction restores the original
/// assignment. A ring of one element keeps its single current slot.
pub fn apply_rotation(ring: &mut Ring, direction: Direction) -> Result<Rotation> {
    let outgoing = ring.neighbors().current;
    let incoming = incoming_index(ring, direction);
    let new = Neighbors::around(incoming, ring.len(), ring.kind())?;
    let tiers = ZTiers::for_kind(ring.kind());

    let (outgoing_role, other_role, other_index) = match direction {
        Direction::Right => (Role::Previous, Role::Next, new.next),
        Direction::Left => (Role::Next, Role::Previous, new.previous),
    };

    ring.clear_roles();
    // Written lowest to highest so small rings (where indices coincide) end up
    // with the new current on top.
    ring.assign(other_index, other_role, tiers.other);
    ring.assign(outgoing, outgoing_role, tiers.outgoing);
    ring.assign(incoming, Role::Current, tiers.incoming);

    Ok(Rotation { outgoing, incoming })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn role_count(ring: &Ring, role: Role) -> usize {
        ring.slots().iter().filter(|s| s.role == Some(role)).count()
    }

    #[test]
    fn test_rotate_right_three() {
        let mut ring = Ring::with_len(RingKind::Card, 3).unwrap();
        // [current, next, previous]
        let rot = apply_rotation(&mut ring, Direction::Right).unwrap();
        assert_eq!(rot, Rotation { outgoing: 0, incoming: 1 });
        assert_eq!(
            ring.roles(),
            vec![Some(Role::Previous), Some(Role::Current), Some(Role::Next)]
        );
        assert_eq!(ring.slots()[1].z_order, Some(50));
        assert_eq!(ring.slots()[0].z_order, Some(30));
        assert_eq!(ring.slots()[2].z_order, Some(20));
    }

    #[test]
    fn test_rotate_left_three() {
        let mut ring = Ring::with_len(RingKind::Card, 3).unwrap();
        let rot = apply_rotation(&mut ring, Direction::Left).unwrap();
        assert_eq!(rot, Rotation { outgoing: 0, incoming: 2 });
        assert_eq!(
            ring.roles(),
            vec![Some(Role::Next), Some(Role::Previous), Some(Role::Current)]
        );
    }

    #[test]
    fn test_background_tiers() {
        let mut ring = Ring::with_len(RingKind::Background, 3).unwrap();
        apply_rotation(&mut ring, Direction::Right).unwrap();
        assert_eq!(ring.slots()[0].z_order, Some(-2));
        assert_eq!(ring.slots()[1].z_order, Some(-1));
        assert_eq!(ring.slots()[2].z_order, None);
    }

    #[test]
    fn test_info_has_no_z_order() {
        let mut ring = Ring::with_len(RingKind::Info, 3).unwrap();
        apply_rotation(&mut ring, Direction::Left).unwrap();
        assert!(ring.slots().iter().all(|s| s.z_order.is_none()));
    }

    #[test]
    fn test_single_slot_is_noop() {
        let mut ring = Ring::with_len(RingKind::Card, 1).unwrap();
        let rot = apply_rotation(&mut ring, Direction::Right).unwrap();
        assert_eq!(rot, Rotation { outgoing: 0, incoming: 0 });
        assert_eq!(ring.roles(), vec![Some(Role::Current)]);
    }

    #[test]
    fn test_two_slots_keep_a_current() {
        let mut ring = Ring::with_len(RingKind::Card, 2).unwrap();
        apply_rotation(&mut ring, Direction::Right).unwrap();
        assert_eq!(ring.find(Role::Current), Some(1));
        assert_eq!(role_count(&ring, Role::Current), 1);
    }

    #[test]
    fn test_inconsistent_labels_are_cleared() {
        let mut ring = Ring::from_roles(
            RingKind::Card,
            vec![Some(Role::Next), Some(Role::Next), Some(Role::Current), None],
        )
        .unwrap();
        apply_rotation(&mut ring, Direction::Right).unwrap();
        assert_eq!(
            ring.roles(),
            vec![Some(Role::Next), None, Some(Role::Previous), Some(Role::Current)]
        );
    }

    proptest! {
        #[test]
        fn rotation_is_a_bijection(len in 3usize..16, start in 0usize..16, right in any::<bool>()) {
            let direction = if right { Direction::Right } else { Direction::Left };
            let mut ring = Ring::with_len(RingKind::Card, len).unwrap();
            for _ in 0..start {
                apply_rotation(&mut ring, Direction::Right).unwrap();
            }
            let before = ring.roles();

            apply_rotation(&mut ring, direction).unwrap();
            for role in Role::ALL {
                prop_assert_eq!(role_count(&ring, role), 1);
            }

            apply_rotation(&mut ring, direction.opposite()).unwrap();
            prop_assert_eq!(ring.roles(), before);
        }
    }
}
