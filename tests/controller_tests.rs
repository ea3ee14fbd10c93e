use tafl_client::{
    ApiError, Applied, BoardController, Cell, CellView, Command, Completion, Coord, GameStatus,
    Phase, PositionResponse, ResponseError, Side, Ticket, START_POSITION,
};

/// Start position after the attacker on (0, 3) moved to (1, 3).
const AFTER_FIRST_MOVE: &str =
    "4bbbb3/3b1b5/B/b4w4b/b3www3b/bb1wwkww1bb/b3www3b/b4w4b/B/5b5/3bbbbb3/ppw";

fn position(fen: &str, status: GameStatus) -> Completion {
    Completion::Position(Ok(PositionResponse::new(fen, status)))
}

fn destinations(list: &str) -> Completion {
    Completion::Destinations(Ok(list.to_string()))
}

fn ticket(cmd: Option<Command>) -> Ticket {
    cmd.expect("a command").ticket()
}

fn ready_at(fen: &str, status: GameStatus) -> BoardController {
    let mut ctl = BoardController::new();
    let t = ticket(ctl.activate());
    assert_eq!(ctl.phase(), Phase::Loading);
    assert_eq!(ctl.apply(t, position(fen, status)), Applied::Position);
    assert_eq!(ctl.phase(), Phase::Ready);
    ctl
}

fn ready() -> BoardController {
    ready_at(START_POSITION, GameStatus::InProgress)
}

/// Select the attacker on (0, 3) with destinations (1, 3) and (2, 3).
fn with_selection() -> BoardController {
    let mut ctl = ready();
    let t = ticket(ctl.click(Coord::new(0, 3)));
    assert_eq!(ctl.apply(t, destinations("[(1, 3), (2, 3)]")), Applied::Selected);
    ctl
}

#[test]
fn test_activation_fetches_once() {
    let mut ctl = BoardController::new();
    assert_eq!(ctl.phase(), Phase::Idle);
    assert!(matches!(ctl.activate(), Some(Command::FetchPosition { .. })));
    assert_eq!(ctl.activate(), None);
    // no board yet, clicks do nothing
    assert_eq!(ctl.click(Coord::new(0, 3)), None);
    assert!(ctl.grid().is_none());
    assert_eq!(ctl.view(), None);
}

#[test]
fn test_initial_position_is_displayed() {
    let ctl = ready();
    assert_eq!(ctl.turn(), Some(Side::Attackers));
    assert_eq!(ctl.status(), GameStatus::InProgress);
    assert_eq!(ctl.grid().unwrap().king(), Some(Coord::new(5, 5)));
    assert!(ctl.selection().is_none());
    assert_eq!(ctl.view().unwrap()[5][5], CellView::KingOnRestricted);
}

#[test]
fn test_select_own_piece() {
    let mut ctl = ready();
    let cmd = ctl.click(Coord::new(0, 3));
    let t = match cmd {
        Some(Command::LegalMoves { ticket, from }) => {
            assert_eq!(from, Coord::new(0, 3));
            ticket
        }
        other => panic!("expected LegalMoves, got {:?}", other),
    };
    assert_eq!(ctl.apply(t, destinations("[(1, 3), (2, 3)]")), Applied::Selected);

    let sel = ctl.selection().unwrap();
    assert_eq!(sel.origin, Coord::new(0, 3));
    assert_eq!(sel.destinations.count_ones(), 2);

    let view = ctl.view().unwrap();
    assert_eq!(view[0][3], CellView::Selected(Cell::Attacker));
    assert_eq!(view[1][3], CellView::Highlighted);
    assert_eq!(view[2][3], CellView::Highlighted);
    assert_eq!(view[3][3], CellView::Empty);
}

#[test]
fn test_selection_is_turn_gated() {
    let mut ctl = ready();
    // defender and king while attackers are to move
    assert_eq!(ctl.click(Coord::new(3, 5)), None);
    assert_eq!(ctl.click(Coord::new(5, 5)), None);
    assert!(ctl.selection().is_none());

    let mut ctl = ready_at(AFTER_FIRST_MOVE, GameStatus::InProgress);
    assert_eq!(ctl.turn(), Some(Side::Defenders));
    assert_eq!(ctl.click(Coord::new(1, 3)), None);
    assert!(matches!(
        ctl.click(Coord::new(5, 5)),
        Some(Command::LegalMoves { .. })
    ));
}

#[test]
fn test_empty_and_restricted_cells_select_nothing() {
    let mut ctl = ready();
    assert_eq!(ctl.click(Coord::new(2, 2)), None);
    assert_eq!(ctl.click(Coord::new(0, 0)), None);
    assert_eq!(ctl.click(Coord::new(10, 10)), None);
    assert!(ctl.selection().is_none());
}

#[test]
fn test_every_click_clears_selection() {
    let mut ctl = with_selection();
    // not a destination and not a piece
    assert_eq!(ctl.click(Coord::new(4, 4)), None);
    assert!(ctl.selection().is_none());

    let mut ctl = with_selection();
    // not a destination, but another own piece: new request, old selection gone
    assert!(matches!(
        ctl.click(Coord::new(0, 4)),
        Some(Command::LegalMoves { from, .. }) if from == Coord::new(0, 4)
    ));
    assert!(ctl.selection().is_none());
}

#[test]
fn test_clicking_destination_submits_move() {
    let mut ctl = with_selection();
    let cmd = ctl.click(Coord::new(1, 3));
    let t = match cmd {
        Some(Command::MakeMove { ticket, from, to }) => {
            assert_eq!((from, to), (Coord::new(0, 3), Coord::new(1, 3)));
            ticket
        }
        other => panic!("expected MakeMove, got {:?}", other),
    };
    // cleared before the engine answers
    assert!(ctl.selection().is_none());

    assert_eq!(
        ctl.apply(t, position(AFTER_FIRST_MOVE, GameStatus::InProgress)),
        Applied::Position
    );
    assert_eq!(ctl.turn(), Some(Side::Defenders));
    let grid = ctl.grid().unwrap();
    assert_eq!(grid.get(Coord::new(0, 3)), Some(Cell::Empty));
    assert_eq!(grid.get(Coord::new(1, 3)), Some(Cell::Attacker));
}

#[test]
fn test_rejected_move_keeps_board() {
    let mut ctl = with_selection();
    let before_grid = *ctl.grid().unwrap();
    let t = ticket(ctl.click(Coord::new(2, 3)));

    let failure = Completion::Position(Err(ApiError::status(400, "illegal move")));
    assert!(matches!(
        ctl.apply(t, failure),
        Applied::Rejected(ResponseError::Api(ApiError::Status { code: 400, .. }))
    ));
    assert_eq!(ctl.phase(), Phase::Ready);
    assert_eq!(ctl.grid(), Some(&before_grid));
    assert_eq!(ctl.turn(), Some(Side::Attackers));
    assert!(ctl.selection().is_none());
}

#[test]
fn test_rejected_move_after_dropped_answer_refetches() {
    let mut ctl = with_selection();
    let first = ticket(ctl.click(Coord::new(1, 3)));

    // a second move goes out before the first is answered
    let select = ticket(ctl.click(Coord::new(0, 4)));
    assert_eq!(ctl.apply(select, destinations("[(1, 4)]")), Applied::Selected);
    let second = ticket(ctl.click(Coord::new(1, 4)));

    // the engine took the first move, but that answer is superseded
    assert_eq!(
        ctl.apply(first, position(AFTER_FIRST_MOVE, GameStatus::InProgress)),
        Applied::Stale
    );
    let failure = Completion::Position(Err(ApiError::status(409, "not your turn")));
    let fetch = match ctl.apply(second, failure) {
        Applied::Resync(ResponseError::Api(_), cmd @ Command::FetchPosition { .. }) => cmd,
        other => panic!("expected a re-fetch, got {:?}", other),
    };
    assert_eq!(ctl.turn(), Some(Side::Attackers));

    assert_eq!(
        ctl.apply(fetch.ticket(), position(AFTER_FIRST_MOVE, GameStatus::InProgress)),
        Applied::Position
    );
    assert_eq!(ctl.turn(), Some(Side::Defenders));
    assert_eq!(ctl.grid().unwrap().get(Coord::new(1, 3)), Some(Cell::Attacker));
}

#[test]
fn test_move_can_end_the_game() {
    let mut ctl = with_selection();
    let t = ticket(ctl.click(Coord::new(1, 3)));
    ctl.apply(t, position(AFTER_FIRST_MOVE, GameStatus::AttackersWon));
    assert_eq!(ctl.status(), GameStatus::AttackersWon);
    assert_eq!(ctl.status().winner(), Some(Side::Attackers));
}

#[test]
fn test_finished_game_ignores_clicks() {
    let mut ctl = ready_at(START_POSITION, GameStatus::DefendersWon);
    let before = ctl.clone();
    for coord in [Coord::new(0, 3), Coord::new(5, 5), Coord::new(2, 2), Coord::new(0, 0)] {
        assert_eq!(ctl.click(coord), None);
        assert_eq!(ctl, before);
    }
}

#[test]
fn test_superseded_fetch_is_stale() {
    let mut ctl = ready();
    let first = ticket(ctl.refresh());
    let second = ticket(ctl.refresh());
    assert!(second > first);

    assert_eq!(
        ctl.apply(first, position(AFTER_FIRST_MOVE, GameStatus::InProgress)),
        Applied::Stale
    );
    assert_eq!(ctl.turn(), Some(Side::Attackers));
    assert_eq!(
        ctl.apply(second, position(AFTER_FIRST_MOVE, GameStatus::InProgress)),
        Applied::Position
    );
    assert_eq!(ctl.turn(), Some(Side::Defenders));
    // answered once, a replay is stale
    assert_eq!(
        ctl.apply(second, position(START_POSITION, GameStatus::InProgress)),
        Applied::Stale
    );
}

#[test]
fn test_move_supersedes_pending_refresh() {
    let mut ctl = with_selection();
    let refresh = ticket(ctl.refresh());
    let mv = ticket(ctl.click(Coord::new(1, 3)));
    assert_eq!(
        ctl.apply(mv, position(AFTER_FIRST_MOVE, GameStatus::InProgress)),
        Applied::Position
    );
    assert_eq!(
        ctl.apply(refresh, position(START_POSITION, GameStatus::InProgress)),
        Applied::Stale
    );
    assert_eq!(ctl.turn(), Some(Side::Defenders));
}

#[test]
fn test_destinations_for_earlier_click_are_stale() {
    let mut ctl = ready();
    let first = ticket(ctl.click(Coord::new(0, 3)));
    let second = ticket(ctl.click(Coord::new(0, 4)));

    assert_eq!(ctl.apply(first, destinations("[(1, 3)]")), Applied::Stale);
    assert!(ctl.selection().is_none());

    assert_eq!(ctl.apply(second, destinations("[(1, 4)]")), Applied::Selected);
    assert_eq!(ctl.selection().unwrap().origin, Coord::new(0, 4));
}

#[test]
fn test_click_elsewhere_cancels_pending_destinations() {
    let mut ctl = ready();
    let t = ticket(ctl.click(Coord::new(0, 3)));
    assert_eq!(ctl.click(Coord::new(2, 2)), None);
    assert_eq!(ctl.apply(t, destinations("[(1, 3)]")), Applied::Stale);
    assert!(ctl.selection().is_none());
}

#[test]
fn test_new_position_clears_selection() {
    let mut ctl = with_selection();
    let t = ticket(ctl.refresh());
    assert_eq!(
        ctl.apply(t, position(START_POSITION, GameStatus::InProgress)),
        Applied::Position
    );
    assert!(ctl.selection().is_none());
}

#[test]
fn test_bad_destination_payload() {
    let mut ctl = ready();
    let t = ticket(ctl.click(Coord::new(0, 3)));
    assert!(matches!(
        ctl.apply(t, destinations("[(1, 3), (42, 0)]")),
        Applied::Rejected(ResponseError::Destinations(_))
    ));
    assert!(ctl.selection().is_none());

    let t = ticket(ctl.click(Coord::new(0, 3)));
    let failure = Completion::Destinations(Err(ApiError::status(500, "boom")));
    assert!(matches!(ctl.apply(t, failure), Applied::Rejected(ResponseError::Api(_))));
    assert!(ctl.selection().is_none());
}

#[test]
fn test_empty_destination_list_selects_piece() {
    let mut ctl = ready();
    let t = ticket(ctl.click(Coord::new(0, 3)));
    assert_eq!(ctl.apply(t, destinations("[]")), Applied::Selected);
    assert!(ctl.selection().unwrap().destinations.is_empty());
    // nothing to move to, so the next click is a fresh selection attempt
    assert_eq!(ctl.click(Coord::new(1, 3)), None);
}

#[test]
fn test_failed_initial_fetch_invalidates_session() {
    let mut ctl = BoardController::new();
    let t = ticket(ctl.activate());
    let failure = Completion::Position(Err(ApiError::status(404, "no such game")));
    assert!(matches!(
        ctl.apply(t, failure),
        Applied::SessionInvalid(ResponseError::Api(_))
    ));
    assert_eq!(ctl.phase(), Phase::Invalid);
    assert_eq!(ctl.refresh(), None);
    assert_eq!(ctl.click(Coord::new(0, 3)), None);
}

#[test]
fn test_malformed_initial_position_invalidates_session() {
    let mut ctl = BoardController::new();
    let t = ticket(ctl.activate());
    assert!(matches!(
        ctl.apply(t, position("B/B/ppb", GameStatus::InProgress)),
        Applied::SessionInvalid(ResponseError::Notation(_))
    ));
    assert_eq!(ctl.phase(), Phase::Invalid);
}

#[test]
fn test_malformed_update_is_rejected() {
    let mut ctl = ready();
    let before = *ctl.grid().unwrap();
    let t = ticket(ctl.refresh());
    let odd = Completion::Position(Ok(PositionResponse {
        fen: START_POSITION.to_string(),
        winner: 'z',
    }));
    assert_eq!(
        ctl.apply(t, odd),
        Applied::Rejected(ResponseError::UnknownWinner('z'))
    );
    assert_eq!(ctl.phase(), Phase::Ready);
    assert_eq!(ctl.grid(), Some(&before));
}

#[test]
fn test_abort_drops_everything() {
    let mut ctl = with_selection();
    let pending = ticket(ctl.refresh());
    ctl.abort();

    assert_eq!(ctl.phase(), Phase::Aborted);
    assert!(ctl.grid().is_none());
    assert!(ctl.selection().is_none());
    assert_eq!(
        ctl.apply(pending, position(START_POSITION, GameStatus::InProgress)),
        Applied::Stale
    );
    assert_eq!(ctl.activate(), None);
    assert_eq!(ctl.refresh(), None);
    assert_eq!(ctl.click(Coord::new(0, 3)), None);
}
