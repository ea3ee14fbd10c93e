use crate::common::Coord;

/// Width and height of the board.
pub const BOARD_SIZE: u8 = 11;

/// Number of trailing status characters in a CHFEN string.
pub const SUFFIX_LEN: usize = 4;

/// Row separator inside the board part of a CHFEN string.
pub const ROW_SEPARATOR: char = '/';

pub const ATTACKER_MARKER: char = 'b';
pub const DEFENDER_MARKER: char = 'w';
pub const KING_MARKER: char = 'k';

/// Run-length letter for ten empty cells.
pub const RUN_TEN: char = 'A';
/// Run-length letter for eleven empty cells (a whole row).
pub const RUN_ELEVEN: char = 'B';

/// The throne in the centre of the board.
pub const THRONE: Coord = Coord::new(5, 5);

/// Corner squares; only the king may stand on them.
pub const CORNERS: [Coord; 4] = [
    Coord::new(0, 0),
    Coord::new(0, 10),
    Coord::new(10, 0),
    Coord::new(10, 10),
];

/// All squares reserved for the king: the four corners and the throne.
pub const RESTRICTED: [Coord; 5] = [CORNERS[0], CORNERS[1], CORNERS[2], CORNERS[3], THRONE];

/// Wire protocol version spoken by [`crate::Stub`] and [`crate::Skeleton`].
pub const PROTOCOL_VERSION: u8 = 1;

/// Returns `true` if `coord` is a corner or the throne.
pub const fn is_restricted(coord: Coord) -> bool {
    let (r, c) = (coord.row, coord.col);
    (r == 5 && c == 5) || ((r == 0 || r == 10) && (c == 0 || c == 10))
}
