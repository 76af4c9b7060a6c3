//! Input path finding: breadth-first search over primitive inputs from the
//! spawn state to a target placement.

use std::collections::VecDeque;

use smallvec::SmallVec;
use stacker_core::{BoardMask, Input, Piece, Placement, SpinType, Turn, WIDTH};

use crate::geometry::PieceTable;
use crate::spin::detect_tspin;
use crate::state::{Active, BoardState};

/// Inputs ending in `HardDrop`, with `Hold` first when used
pub type InputPath = SmallVec<[Input; 16]>;

const EDGES: [Input; 8] = [
    Input::Left,
    Input::Right,
    Input::DasLeft,
    Input::DasRight,
    Input::RotateCw,
    Input::RotateCcw,
    Input::Rotate180,
    Input::SoftDrop,
];

// x is offset by 2 so the I piece's negative origins fit
const X_SLOTS: usize = 14;
const Y_SLOTS: usize = 26;
const SPIN_SLOTS: usize = 3;

type Visited = [[[[bool; SPIN_SLOTS]; Y_SLOTS]; X_SLOTS]; 4];

#[derive(Clone, Copy, Debug)]
struct Node {
    piece: Piece,
    x: i8,
    y: i8,
    /// Spin earned by the edge that reached this node
    spin: SpinType,
    parent: usize,
    input: Option<Input>,
}

fn spin_slot(spin: SpinType) -> usize {
    match spin {
        SpinType::None => 0,
        SpinType::Mini => 1,
        SpinType::Full => 2,
    }
}

fn visit(visited: &mut Visited, node: &Node) -> bool {
    let xi = (node.x + 2) as usize;
    let yi = node.y as usize;
    if xi >= X_SLOTS || yi >= Y_SLOTS {
        return false;
    }
    let slot = &mut visited[node.piece.rotation.index()][xi][yi][spin_slot(node.spin)];
    !std::mem::replace(slot, true)
}

fn slide(table: &PieceTable, board: &BoardMask, node: &Node, dx: i8, max: usize) -> Option<Node> {
    let mut x = node.x;
    for _ in 0..max {
        if !table.fits(board, node.piece, x + dx, node.y) {
            break;
        }
        x += dx;
    }
    (x != node.x).then_some(Node {
        x,
        spin: SpinType::None,
        ..*node
    })
}

fn step(table: &PieceTable, board: &BoardMask, node: &Node, input: Input) -> Option<Node> {
    let turn = match input {
        Input::Left => return slide(table, board, node, -1, 1),
        Input::Right => return slide(table, board, node, 1, 1),
        Input::DasLeft => return slide(table, board, node, -1, WIDTH),
        Input::DasRight => return slide(table, board, node, 1, WIDTH),
        Input::SoftDrop => {
            let y = table.drop_y(board, node.piece, node.x, node.y);
            return (y != node.y).then_some(Node {
                y,
                spin: SpinType::None,
                ..*node
            });
        }
        Input::RotateCw => Turn::Cw,
        Input::RotateCcw => Turn::Ccw,
        Input::Rotate180 => Turn::Half,
        Input::Hold | Input::HardDrop => return None,
    };
    let r = table.rotate(board, node.piece, node.x, node.y, turn)?;
    Some(Node {
        piece: r.piece,
        x: r.x,
        y: r.y,
        spin: detect_tspin(board, r.piece, r.x, r.y, r.kick),
        ..*node
    })
}

/// Shortest input sequence that locks the current (or held) piece exactly
/// at `target`; `None` when no path exists.
pub fn find_path(state: &BoardState, target: &Placement) -> Option<InputPath> {
    let table = state.table();
    let board = state.mask();
    let mut path = InputPath::new();

    let kind = if target.hold_used {
        path.push(Input::Hold);
        state.hold_candidate()?
    } else {
        state.current()?
    };
    if kind != target.piece.kind {
        return None;
    }
    let goal = *table.mask(target.piece, target.x, target.y)?;
    let spawn = Active::spawn(kind);
    if !table.fits(board, spawn.piece, spawn.x, spawn.y) {
        return None;
    }

    let mut visited: Visited = [[[[false; SPIN_SLOTS]; Y_SLOTS]; X_SLOTS]; 4];
    let mut nodes = Vec::with_capacity(256);
    let mut queue = VecDeque::new();

    let root = Node {
        piece: spawn.piece,
        x: spawn.x,
        y: spawn.y,
        spin: SpinType::None,
        parent: 0,
        input: None,
    };
    visit(&mut visited, &root);
    nodes.push(root);
    queue.push_back(0usize);

    while let Some(i) = queue.pop_front() {
        let node = nodes[i];

        // hard drop from here; falling any distance voids the spin
        let land_y = table.drop_y(board, node.piece, node.x, node.y);
        let spin = if land_y == node.y {
            node.spin
        } else {
            SpinType::None
        };
        if spin == target.spin && table.mask(node.piece, node.x, land_y) == Some(&goal) {
            let mut inputs: SmallVec<[Input; 16]> = SmallVec::new();
            let mut j = i;
            while let Some(input) = nodes[j].input {
                inputs.push(input);
                j = nodes[j].parent;
            }
            path.extend(inputs.into_iter().rev());
            path.push(Input::HardDrop);
            return Some(path);
        }

        for input in EDGES {
            let Some(mut next) = step(table, board, &node, input) else {
                continue;
            };
            next.parent = i;
            next.input = Some(input);
            if visit(&mut visited, &next) {
                nodes.push(next);
                queue.push_back(nodes.len() - 1);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use stacker_core::{PieceKind, Rotation};

    fn state(rows: &[u16], current: PieceKind, queue: &[PieceKind]) -> BoardState {
        BoardState::from_parts(BoardMask::from_rows(rows), Some(current), None, queue)
    }

    fn replay(state: &BoardState, path: &[Input]) -> BoardState {
        let mut s = state.clone();
        for &input in &path[..path.len() - 1] {
            assert!(s.apply_input(input).is_none());
        }
        s
    }

    #[test]
    fn test_straight_drop_is_one_input() {
        let s = state(&[], PieceKind::T, &[]);
        let target = Placement::new(Piece::spawn(PieceKind::T), 4, 0);
        let path = find_path(&s, &target).unwrap();
        assert_eq!(path.as_slice(), &[Input::HardDrop]);
    }

    #[test]
    fn test_wall_uses_das() {
        let s = state(&[], PieceKind::T, &[]);
        let target = Placement::new(Piece::spawn(PieceKind::T), 1, 0);
        let path = find_path(&s, &target).unwrap();
        assert_eq!(path.as_slice(), &[Input::DasLeft, Input::HardDrop]);
    }

    #[test]
    fn test_tsd_path_ends_in_rotation() {
        let s = state(&[0x3EF, 0x3C7, 0x00F], PieceKind::T, &[]);
        let target =
            Placement::new(Piece::new(PieceKind::T, Rotation::South), 4, 1).with_spin(SpinType::Full);
        let path = find_path(&s, &target).unwrap();
        assert!(path[path.len() - 2].is_rotation());

        let mut after = replay(&s, &path);
        let active = after.active().unwrap();
        assert_eq!((active.piece, active.x, active.y), (target.piece, 4, 1));
        let outcome = after.apply_input(Input::HardDrop).unwrap();
        assert_eq!(outcome.spin, SpinType::Full);
        assert_eq!(outcome.lines, 2);
    }

    #[test]
    fn test_hold_comes_first() {
        let s = state(&[], PieceKind::T, &[PieceKind::O]);
        let target = Placement::new(Piece::spawn(PieceKind::O), 0, 0).with_hold();
        let path = find_path(&s, &target).unwrap();
        assert_eq!(path[0], Input::Hold);
        assert_eq!(path.last(), Some(&Input::HardDrop));
        let after = replay(&s, &path);
        assert_eq!(after.active().map(|a| a.x), Some(0));
    }

    #[test]
    fn test_wrong_kind_fails() {
        let s = state(&[], PieceKind::T, &[PieceKind::O]);
        let target = Placement::new(Piece::spawn(PieceKind::I), 4, 0);
        assert!(find_path(&s, &target).is_none());
    }

    #[test]
    fn test_sealed_cave_unreachable() {
        let s = state(&[0x3C3, 0x3FF, 0x3FF], PieceKind::I, &[]);
        let target = Placement::new(Piece::spawn(PieceKind::I), 3, 0);
        assert!(s.fits(target.piece, 3, 0));
        assert!(find_path(&s, &target).is_none());
    }
}
