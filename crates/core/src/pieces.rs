//! Pieces module - piece shapes and SRS rotation system
//!
//! Shapes are defined once in their spawn (North) orientation inside an n x n box and
//! the other orientations are derived by rotating that box. Mino order is preserved by
//! the rotation, so index `i` of a shape names the same logical mino in every
//! orientation; item markers rely on this.
//!
//! Piece positions are the top-left corner of the shape box.
//! Reference: https://tetris.wiki/SRS

use arrayvec::ArrayVec;

use crate::types::{PieceKind, Rotation, SPAWN_X, SPAWN_Y};

/// Offset of a single mino relative to the shape box origin
pub type MinoOffset = (i8, i8);

/// Shape of a piece - up to 4 mino offsets from the box origin
pub type PieceShape = ArrayVec<MinoOffset, 4>;

/// Spawn position for new pieces (box origin)
pub const SPAWN_POSITION: (i8, i8) = (SPAWN_X, SPAWN_Y);

struct ShapeDef {
    box_size: i8,
    pivot: MinoOffset,
    north: &'static [MinoOffset],
}

fn definition(kind: PieceKind) -> ShapeDef {
    match kind {
        PieceKind::I => ShapeDef {
            box_size: 4,
            pivot: (1, 1),
            north: &[(0, 1), (1, 1), (2, 1), (3, 1)],
        },
        PieceKind::O => ShapeDef {
            box_size: 4,
            pivot: (1, 0),
            north: &[(1, 0), (2, 0), (1, 1), (2, 1)],
        },
        PieceKind::T => ShapeDef {
            box_size: 3,
            pivot: (1, 1),
            north: &[(1, 0), (0, 1), (1, 1), (2, 1)],
        },
        PieceKind::S => ShapeDef {
            box_size: 3,
            pivot: (1, 1),
            north: &[(1, 0), (2, 0), (0, 1), (1, 1)],
        },
        PieceKind::Z => ShapeDef {
            box_size: 3,
            pivot: (1, 1),
            north: &[(0, 0), (1, 0), (1, 1), (2, 1)],
        },
        PieceKind::J => ShapeDef {
            box_size: 3,
            pivot: (1, 1),
            north: &[(0, 0), (0, 1), (1, 1), (2, 1)],
        },
        PieceKind::L => ShapeDef {
            box_size: 3,
            pivot: (1, 1),
            north: &[(2, 0), (0, 1), (1, 1), (2, 1)],
        },
        PieceKind::Item => ShapeDef {
            box_size: 3,
            pivot: (1, 1),
            north: &[(1, 1)],
        },
        PieceKind::Weight => ShapeDef {
            box_size: 4,
            pivot: (1, 0),
            north: &[(0, 0), (1, 0), (2, 0), (3, 0)],
        },
    }
}

/// Whether a piece kind can change orientation
///
/// The square and the weight keep their spawn orientation forever.
pub fn can_rotate(kind: PieceKind) -> bool {
    !matches!(kind, PieceKind::O | PieceKind::Weight)
}

/// Get the shape (mino offsets) for a piece kind and rotation
///
/// # Examples
///
/// ```
/// use blockfall_core::pieces::get_shape;
/// use blockfall_core::types::{PieceKind, Rotation};
///
/// let east = get_shape(PieceKind::T, Rotation::East);
/// assert_eq!(east.as_slice(), &[(2, 1), (1, 0), (1, 1), (1, 2)]);
/// ```
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    let def = definition(kind);
    let turns = if can_rotate(kind) {
        rotation.quarter_turns()
    } else {
        0
    };
    let n = def.box_size;

    def.north
        .iter()
        .map(|&(x, y)| {
            (0..turns).fold((x, y), |(x, y), _| {
                // Clockwise quarter turn inside the n x n box.
                (n - 1 - y, x)
            })
        })
        .collect()
}

/// Pivot of a piece kind relative to its box origin
///
/// For the 3-wide pieces this is the rotation center; T-spin corners are measured
/// around it.
pub fn pivot_offset(kind: PieceKind) -> MinoOffset {
    definition(kind).pivot
}

/// Number of minos in a piece kind
pub fn mino_count(kind: PieceKind) -> usize {
    definition(kind).north.len()
}

/// SRS wall kick data
/// Each entry is (dx, dy) offset to try when rotation fails
/// Order: 0=initial rotation, 1-4=wall kicks
pub type KickTable = [[(i8, i8); 5]; 8];

/// Get kick table for a piece kind
/// Returns table indexed by the transition index from [`kick_index`]
pub fn get_kick_table(kind: PieceKind) -> &'static KickTable {
    match kind {
        PieceKind::I => &I_KICKS,
        PieceKind::T | PieceKind::S | PieceKind::Z | PieceKind::J | PieceKind::L => &JLSTZ_KICKS,
        PieceKind::O | PieceKind::Item | PieceKind::Weight => &NO_KICKS,
    }
}

/// Pieces without kick data only try the unkicked position
const NO_KICKS: KickTable = [[(0, 0); 5]; 8];

/// JLSTZ kick table (shared by J, L, S, T, Z)
const JLSTZ_KICKS: KickTable = [
    // 0->1 (N->E, clockwise)
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 0->3 (N->W, counter-clockwise)
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 1->0 (E->N, counter-clockwise)
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 1->2 (E->S, clockwise)
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 2->1 (S->E, counter-clockwise)
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 2->3 (S->W, clockwise)
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 3->2 (W->S, counter-clockwise)
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 3->0 (W->N, clockwise)
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
];

/// I piece kick table (different from JLSTZ)
const I_KICKS: KickTable = [
    // 0->1 (N->E)
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 0->3 (N->W)
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // 1->0 (E->N)
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 1->2 (E->S)
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // 2->1 (S->E)
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    // 2->3 (S->W)
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 3->2 (W->S)
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 3->0 (W->N)
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
];

/// Index of the (from, to) transition in a [`KickTable`]
///
/// Returns `None` unless `to` is a single quarter turn away from `from`.
pub fn kick_index(from: Rotation, to: Rotation) -> Option<usize> {
    let index = match (from, to) {
        (Rotation::North, Rotation::East) => 0,
        (Rotation::North, Rotation::West) => 1,
        (Rotation::East, Rotation::North) => 2,
        (Rotation::East, Rotation::South) => 3,
        (Rotation::South, Rotation::East) => 4,
        (Rotation::South, Rotation::West) => 5,
        (Rotation::West, Rotation::South) => 6,
        (Rotation::West, Rotation::North) => 7,
        _ => return None,
    };
    Some(index)
}

/// The five ordered offsets tried for a (piece, from, to) rotation
pub fn kick_offsets(kind: PieceKind, from: Rotation, to: Rotation) -> Option<&'static [(i8, i8); 5]> {
    kick_index(from, to).map(|idx| &get_kick_table(kind)[idx])
}

/// Outcome of a successful rotation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationResult {
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
    /// Which of the five table offsets was used (0 = no kick)
    pub kick_index: u8,
}

/// Try to rotate a piece with wall kicks
///
/// With `srs` disabled only the unkicked position is tried. Otherwise the kick table is
/// walked in order and the first offset whose placement `fits` wins, even when a later
/// offset would also fit.
pub fn try_rotate(
    kind: PieceKind,
    rotation: Rotation,
    x: i8,
    y: i8,
    clockwise: bool,
    srs: bool,
    fits: impl Fn(i8, i8) -> bool,
) -> Option<RotationResult> {
    if !can_rotate(kind) {
        return None;
    }

    let new_rotation = if clockwise {
        rotation.rotate_cw()
    } else {
        rotation.rotate_ccw()
    };

    let new_shape = get_shape(kind, new_rotation);
    let kicks = kick_offsets(kind, rotation, new_rotation)?;
    let attempts = if srs { kicks.len() } else { 1 };

    kicks
        .iter()
        .take(attempts)
        .enumerate()
        .find(|&(_, &(dx, dy))| {
            new_shape
                .iter()
                .all(|&(mx, my)| fits(x + dx + mx, y + dy + my))
        })
        .map(|(idx, &(dx, dy))| RotationResult {
            rotation: new_rotation,
            x: x + dx,
            y: y + dy,
            kick_index: idx as u8,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ROTATIONS: [Rotation; 4] = [
        Rotation::North,
        Rotation::East,
        Rotation::South,
        Rotation::West,
    ];

    #[test]
    fn test_derived_shapes_match_srs_orientations() {
        assert_eq!(
            get_shape(PieceKind::I, Rotation::East).as_slice(),
            &[(2, 0), (2, 1), (2, 2), (2, 3)]
        );
        assert_eq!(
            get_shape(PieceKind::I, Rotation::South).as_slice(),
            &[(3, 2), (2, 2), (1, 2), (0, 2)]
        );
        let mut s_west = get_shape(PieceKind::S, Rotation::West);
        s_west.sort();
        assert_eq!(s_west.as_slice(), &[(0, 0), (0, 1), (1, 1), (1, 2)]);
    }

    #[test]
    fn test_pivot_is_fixed_under_rotation() {
        for kind in [PieceKind::T, PieceKind::S, PieceKind::Z, PieceKind::J, PieceKind::L] {
            let pivot = pivot_offset(kind);
            for rotation in ALL_ROTATIONS {
                assert!(
                    get_shape(kind, rotation).contains(&pivot),
                    "{kind:?} {rotation:?} lost its pivot"
                );
            }
        }
    }

    #[test]
    fn test_square_and_weight_keep_orientation() {
        for rotation in ALL_ROTATIONS {
            assert_eq!(
                get_shape(PieceKind::O, rotation),
                get_shape(PieceKind::O, Rotation::North)
            );
            assert_eq!(
                get_shape(PieceKind::Weight, rotation),
                get_shape(PieceKind::Weight, Rotation::North)
            );
        }
        assert!(try_rotate(PieceKind::O, Rotation::North, 3, 0, true, true, |_, _| true).is_none());
    }

    #[test]
    fn test_carrier_sizes() {
        assert_eq!(mino_count(PieceKind::Item), 1);
        assert_eq!(mino_count(PieceKind::Weight), 4);
        assert_eq!(mino_count(PieceKind::T), 4);
    }

    #[test]
    fn test_kick_index_rejects_half_turns() {
        assert_eq!(kick_index(Rotation::North, Rotation::South), None);
        assert_eq!(kick_index(Rotation::East, Rotation::East), None);
        assert_eq!(kick_index(Rotation::West, Rotation::North), Some(7));
    }

    #[test]
    fn test_first_valid_kick_wins() {
        // Offsets 0-2 of T N->E are blocked; 3 and 4 both fit.
        let kicks = kick_offsets(PieceKind::T, Rotation::North, Rotation::East).copied();
        let Some(kicks) = kicks else {
            panic!("missing kick data");
        };
        let shape = get_shape(PieceKind::T, Rotation::East);
        let blocked: Vec<(i8, i8)> = kicks[..3]
            .iter()
            .map(|&(dx, dy)| (5 + dx + shape[0].0, 10 + dy + shape[0].1))
            .collect();

        let result = try_rotate(PieceKind::T, Rotation::North, 5, 10, true, true, |x, y| {
            !blocked.contains(&(x, y))
        });
        let result = result.map(|r| r.kick_index);
        assert_eq!(result, Some(3));
    }

    #[test]
    fn test_srs_disabled_tries_only_pivot_position() {
        let result = try_rotate(PieceKind::T, Rotation::North, 5, 10, true, false, |x, _| x != 7);
        assert!(result.is_none());

        let result = try_rotate(PieceKind::T, Rotation::North, 5, 10, true, false, |_, _| true);
        assert_eq!(result.map(|r| (r.x, r.y, r.kick_index)), Some((5, 10, 0)));
    }
}
