//! Move rules: legal destinations and validated move application.
//!
//! Every function takes the board explicitly and touches nothing else.
//! [`apply_move`] re-validates from scratch rather than trusting a prior
//! [`legal_targets`] answer, so a client can't skip the query and send an
//! arbitrary move.

use std::collections::BTreeSet;

use backgammon_protocol::{Color, Destination};

use crate::{BoardState, MoveError, POINTS};

/// `true` iff the opponent holds two or more checkers on `point`.
pub fn is_blocked(board: &BoardState, color: Color, point: usize) -> bool {
    board.points[point][color.opponent()] >= 2
}

/// Where a checker of `color` lands when entering from the bar with `die`.
///
/// White enters on `24 - die` (its far quadrant, indices 18..=23), Black on
/// `die - 1` (indices 0..=5). `None` if the die doesn't map onto the board.
pub fn entry_point(color: Color, die: u8) -> Option<usize> {
    let die = usize::from(die);
    let point = match color {
        Color::White => POINTS.checked_sub(die)?,
        Color::Black => die.checked_sub(1)?,
    };
    (point < POINTS).then_some(point)
}

/// The point reached by moving `die` pips from `from`, or `None` if that
/// runs off the board.
fn step(color: Color, from: usize, die: u8) -> Option<usize> {
    let die = usize::from(die);
    match color {
        Color::White => from.checked_sub(die),
        Color::Black => Some(from + die).filter(|to| *to < POINTS),
    }
}

fn home_range(color: Color) -> std::ops::Range<usize> {
    match color {
        Color::White => 0..6,
        Color::Black => 18..24,
    }
}

/// `true` iff `color` has nothing on the bar and nothing outside its home
/// quadrant.
pub fn all_in_home(board: &BoardState, color: Color) -> bool {
    if board.bar[color] > 0 {
        return false;
    }
    let home = home_range(color);
    board
        .points
        .iter()
        .enumerate()
        .all(|(i, p)| home.contains(&i) || p[color] == 0)
}

/// Whether a checker on `source` may bear off using `die`.
///
/// An exact roll always works. A larger die works only when no checker of
/// the same color sits further from home than `source`.
pub fn can_bear_off(board: &BoardState, color: Color, source: usize, die: u8) -> bool {
    if !all_in_home(board, color) {
        return false;
    }
    let src = source as i32;
    let die = i32::from(die);
    match color {
        Color::White => {
            let landing = src - die;
            if landing == -1 {
                return true;
            }
            landing < -1 && (source + 1..6).all(|i| board.points[i].white == 0)
        }
        Color::Black => {
            let landing = src + die;
            if landing == POINTS as i32 {
                return true;
            }
            landing > POINTS as i32 && (18..source).all(|i| board.points[i].black == 0)
        }
    }
}

/// Distinct remaining die values, ascending.
fn distinct_dice(board: &BoardState) -> BTreeSet<u8> {
    board.dice_left.iter().copied().collect()
}

/// Where a checker may come from, once validated.
#[derive(Clone, Copy)]
enum Origin {
    Bar,
    Point(usize),
}

/// Where a checker may go, once validated.
#[derive(Clone, Copy)]
enum Landing {
    Point(usize),
    Off,
}

/// Resolves `source` to an origin holding at least one of `color`'s
/// checkers.
fn origin(board: &BoardState, color: Color, source: Destination) -> Option<Origin> {
    match source {
        Destination::Bar if board.bar[color] > 0 => Some(Origin::Bar),
        Destination::BoardPoint(i) => {
            let i = usize::from(i);
            (i < POINTS && board.points[i][color] > 0).then_some(Origin::Point(i))
        }
        _ => None,
    }
}

/// The landing `die` produces from `origin`, ignoring blocking.
fn landing(board: &BoardState, color: Color, origin: Origin, die: u8) -> Option<Landing> {
    match origin {
        Origin::Bar => entry_point(color, die).map(Landing::Point),
        Origin::Point(from) => match step(color, from, die) {
            Some(to) => Some(Landing::Point(to)),
            None => can_bear_off(board, color, from, die).then_some(Landing::Off),
        },
    }
}

/// The smallest distinct remaining die that takes `origin` to `wanted`.
fn select_die(board: &BoardState, color: Color, origin: Origin, wanted: Landing) -> Option<u8> {
    distinct_dice(board)
        .into_iter()
        .find(|&die| match (landing(board, color, origin, die), wanted) {
            (Some(Landing::Point(a)), Landing::Point(b)) => a == b,
            (Some(Landing::Off), Landing::Off) => true,
            _ => false,
        })
}

/// Legal destinations for one checker of `color` on `source`, sorted with
/// `Off` after every point.
///
/// Empty when no dice remain, when `source` holds none of `color`'s
/// checkers, or when `color` has a checker on the bar and `source` isn't
/// the bar.
pub fn legal_targets(board: &BoardState, color: Color, source: Destination) -> Vec<Destination> {
    if board.dice_left.is_empty() {
        return Vec::new();
    }
    if board.bar[color] > 0 && source != Destination::Bar {
        return Vec::new();
    }
    let Some(origin) = origin(board, color, source) else {
        return Vec::new();
    };

    let targets: BTreeSet<Destination> = distinct_dice(board)
        .into_iter()
        .filter_map(|die| match landing(board, color, origin, die)? {
            Landing::Point(to) if !is_blocked(board, color, to) => {
                Some(Destination::BoardPoint(to as u8))
            }
            Landing::Point(_) => None,
            Landing::Off => Some(Destination::Off),
        })
        .collect();
    targets.into_iter().collect()
}

/// Validates and applies one checker move, returning the die value used.
///
/// The die is the smallest distinct remaining value that takes `source` to
/// `dest`, so the same board, dice, and request always consume the same
/// die. On success the prior state is pushed onto the undo history, a lone
/// opposing checker on the landing point is sent to the bar, and one
/// instance of the die is removed from `dice_left`.
///
/// # Errors
/// Returns a [`MoveError`] and leaves the board untouched when the move
/// isn't legal.
pub fn apply_move(
    board: &mut BoardState,
    color: Color,
    source: Destination,
    dest: Destination,
) -> Result<u8, MoveError> {
    if board.dice_left.is_empty() {
        return Err(MoveError::NoDiceLeft);
    }
    if board.bar[color] > 0 && source != Destination::Bar {
        return Err(MoveError::MustEnterFromBar);
    }
    let in_range = match source {
        Destination::BoardPoint(i) => usize::from(i) < POINTS,
        Destination::Bar => true,
        Destination::Off => false,
    };
    if !in_range {
        return Err(MoveError::BadSource);
    }
    let origin = origin(board, color, source).ok_or(MoveError::InvalidSource)?;
    let wanted = match dest {
        Destination::BoardPoint(i) if usize::from(i) < POINTS => Landing::Point(usize::from(i)),
        Destination::Off => Landing::Off,
        _ => return Err(MoveError::InvalidDestination),
    };

    let used = match (origin, wanted) {
        (Origin::Bar, Landing::Off) => return Err(MoveError::BarToOff),
        (Origin::Bar, _) => select_die(board, color, origin, wanted).ok_or(MoveError::IllegalEntry)?,
        _ => select_die(board, color, origin, wanted).ok_or(MoveError::IllegalMove)?,
    };

    if let Landing::Point(to) = wanted {
        if is_blocked(board, color, to) {
            return Err(MoveError::Blocked);
        }
    }

    board.push_history();

    match origin {
        Origin::Bar => board.bar[color] -= 1,
        Origin::Point(from) => board.points[from][color] -= 1,
    }
    match wanted {
        Landing::Off => board.off[color] += 1,
        Landing::Point(to) => {
            let opponent = color.opponent();
            if board.points[to][opponent] == 1 {
                board.points[to][opponent] = 0;
                board.bar[opponent] += 1;
                tracing::debug!(%color, point = to, "hit");
            }
            board.points[to][color] += 1;
        }
    }
    if let Some(pos) = board.dice_left.iter().position(|&d| d == used) {
        board.dice_left.remove(pos);
    }

    debug_assert_eq!(board.verify(), Ok(()), "board invariant broken by apply_move");
    Ok(used)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColorPair, roll_dice};
    use Destination::{Bar, BoardPoint, Off};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Board from `(index, white, black)` triples; the rest is borne off.
    fn position(layout: &[(usize, u8, u8)], bar: ColorPair) -> BoardState {
        let mut points = [ColorPair::default(); POINTS];
        for &(i, w, b) in layout {
            points[i] = ColorPair::new(w, b);
        }
        BoardState::from_position(points, bar).expect("valid test position")
    }

    fn with_dice(mut board: BoardState, dice: &[u8]) -> BoardState {
        board.record_roll(dice.to_vec());
        board
    }

    // =====================================================================
    // Helpers: entry_point, is_blocked, all_in_home, can_bear_off
    // =====================================================================

    #[test]
    fn test_entry_point_by_color() {
        assert_eq!(entry_point(Color::White, 1), Some(23));
        assert_eq!(entry_point(Color::White, 6), Some(18));
        assert_eq!(entry_point(Color::Black, 1), Some(0));
        assert_eq!(entry_point(Color::Black, 6), Some(5));
        assert_eq!(entry_point(Color::Black, 0), None);
    }

    #[test]
    fn test_is_blocked_needs_two_opposing() {
        let board = BoardState::new();
        // Black has 5 on index 11, 2 on index 0.
        assert!(is_blocked(&board, Color::White, 11));
        assert!(is_blocked(&board, Color::White, 0));
        assert!(!is_blocked(&board, Color::White, 9));
        // Own checkers never block.
        assert!(!is_blocked(&board, Color::White, 5));
    }

    #[test]
    fn test_all_in_home_opening_is_false() {
        let board = BoardState::new();
        assert!(!all_in_home(&board, Color::White));
        assert!(!all_in_home(&board, Color::Black));
    }

    #[test]
    fn test_all_in_home_bar_checker_is_false() {
        let board = position(&[(3, 5, 0)], ColorPair::new(1, 0));
        assert!(!all_in_home(&board, Color::White));
    }

    #[test]
    fn test_can_bear_off_exact_and_overshoot() {
        let board = position(&[(1, 1, 0), (4, 1, 0), (20, 0, 2)], ColorPair::default());
        // Exact: index 1 with a 2.
        assert!(can_bear_off(&board, Color::White, 1, 2));
        // Overshoot from 1 not allowed while a checker sits on 4.
        assert!(!can_bear_off(&board, Color::White, 1, 6));
        // Overshoot from the highest checker is fine.
        assert!(can_bear_off(&board, Color::White, 4, 6));
        // Short of the edge is not a bear-off at all.
        assert!(!can_bear_off(&board, Color::White, 4, 3));

        // Black mirrors: index 20 needs a 4 exactly.
        assert!(can_bear_off(&board, Color::Black, 20, 4));
        assert!(can_bear_off(&board, Color::Black, 20, 6));
        assert!(!can_bear_off(&board, Color::Black, 20, 2));
    }

    #[test]
    fn test_can_bear_off_black_overshoot_blocked_by_lower_checker() {
        let board = position(&[(19, 0, 1), (22, 0, 1)], ColorPair::default());
        assert!(!can_bear_off(&board, Color::Black, 22, 6));
        assert!(can_bear_off(&board, Color::Black, 19, 6));
    }

    // =====================================================================
    // legal_targets()
    // =====================================================================

    #[test]
    fn test_legal_targets_opening_white_from_12() {
        let board = with_dice(BoardState::new(), &[3, 5]);
        assert_eq!(
            legal_targets(&board, Color::White, BoardPoint(12)),
            vec![BoardPoint(7), BoardPoint(9)]
        );
    }

    #[test]
    fn test_legal_targets_opening_white_from_7_never_bears_off() {
        let board = with_dice(BoardState::new(), &[3, 6]);
        assert_eq!(
            legal_targets(&board, Color::White, BoardPoint(7)),
            vec![BoardPoint(1), BoardPoint(4)]
        );
        // From index 5 a 6 runs off the board, but White isn't all home.
        assert_eq!(
            legal_targets(&board, Color::White, BoardPoint(5)),
            vec![BoardPoint(2)]
        );
    }

    #[test]
    fn test_legal_targets_skips_blocked_points() {
        // White on 16 with a 5 would land on Black's 5-stack at 11.
        let board = with_dice(BoardState::new(), &[1, 5]);
        assert!(
            legal_targets(&board, Color::White, BoardPoint(16)).is_empty(),
            "index 16 holds Black, not White"
        );
        assert_eq!(
            legal_targets(&board, Color::White, BoardPoint(12)),
            vec![BoardPoint(7)],
            "12-1 = 11 is blocked"
        );
    }

    #[test]
    fn test_legal_targets_no_dice_is_empty() {
        let board = BoardState::new();
        assert!(legal_targets(&board, Color::White, BoardPoint(12)).is_empty());
    }

    #[test]
    fn test_legal_targets_bar_entry_is_mandatory() {
        let board = with_dice(
            position(&[(12, 14, 0), (20, 0, 2), (0, 0, 13)], ColorPair::new(1, 0)),
            &[2, 4],
        );
        for source in 0..24u8 {
            assert!(legal_targets(&board, Color::White, BoardPoint(source)).is_empty());
        }
        // 24-2 = 22 open, 24-4 = 20 blocked.
        assert_eq!(legal_targets(&board, Color::White, Bar), vec![BoardPoint(22)]);
    }

    #[test]
    fn test_legal_targets_bar_with_empty_bar_is_empty() {
        let board = with_dice(BoardState::new(), &[2, 4]);
        assert!(legal_targets(&board, Color::White, Bar).is_empty());
    }

    #[test]
    fn test_legal_targets_doubles_deduplicated() {
        let board = with_dice(BoardState::new(), &[2, 2, 2, 2]);
        assert_eq!(
            legal_targets(&board, Color::White, BoardPoint(12)),
            vec![BoardPoint(10)]
        );
    }

    #[test]
    fn test_legal_targets_off_sorts_last() {
        let board = with_dice(
            position(&[(3, 2, 0), (20, 0, 2)], ColorPair::default()),
            &[1, 4],
        );
        assert_eq!(
            legal_targets(&board, Color::White, BoardPoint(3)),
            vec![BoardPoint(2), Off]
        );
    }

    #[test]
    fn test_legal_targets_off_source_is_empty() {
        let board = with_dice(BoardState::new(), &[1, 2]);
        assert!(legal_targets(&board, Color::White, Off).is_empty());
    }

    // =====================================================================
    // apply_move(): rejections
    // =====================================================================

    #[test]
    fn test_apply_move_no_dice_left() {
        let mut board = BoardState::new();
        let result = apply_move(&mut board, Color::White, BoardPoint(12), BoardPoint(9));
        assert_eq!(result, Err(MoveError::NoDiceLeft));
    }

    #[test]
    fn test_apply_move_must_enter_from_bar() {
        let mut board = with_dice(
            position(&[(12, 14, 0)], ColorPair::new(1, 0)),
            &[2, 4],
        );
        let result = apply_move(&mut board, Color::White, BoardPoint(12), BoardPoint(10));
        assert_eq!(result, Err(MoveError::MustEnterFromBar));
    }

    #[test]
    fn test_apply_move_invalid_sources() {
        let mut board = with_dice(BoardState::new(), &[3, 5]);
        // Empty point.
        assert_eq!(
            apply_move(&mut board, Color::White, BoardPoint(10), BoardPoint(7)),
            Err(MoveError::InvalidSource)
        );
        // Opponent's point.
        assert_eq!(
            apply_move(&mut board, Color::White, BoardPoint(11), BoardPoint(8)),
            Err(MoveError::InvalidSource)
        );
        // Off the board.
        assert_eq!(
            apply_move(&mut board, Color::White, BoardPoint(30), BoardPoint(27)),
            Err(MoveError::BadSource)
        );
        assert_eq!(
            apply_move(&mut board, Color::White, Off, BoardPoint(20)),
            Err(MoveError::BadSource)
        );
        // Bar with nothing on it.
        assert_eq!(
            apply_move(&mut board, Color::White, Bar, BoardPoint(21)),
            Err(MoveError::InvalidSource)
        );
        assert_eq!(board.history_len(), 0);
    }

    #[test]
    fn test_apply_move_invalid_destination() {
        let mut board = with_dice(BoardState::new(), &[3, 5]);
        assert_eq!(
            apply_move(&mut board, Color::White, BoardPoint(12), Bar),
            Err(MoveError::InvalidDestination)
        );
        assert_eq!(
            apply_move(&mut board, Color::White, BoardPoint(12), BoardPoint(24)),
            Err(MoveError::InvalidDestination)
        );
    }

    #[test]
    fn test_apply_move_illegal_distance() {
        let mut board = with_dice(BoardState::new(), &[3, 5]);
        let before = board.clone();
        assert_eq!(
            apply_move(&mut board, Color::White, BoardPoint(12), BoardPoint(8)),
            Err(MoveError::IllegalMove)
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_apply_move_bear_off_before_all_home_is_illegal() {
        let mut board = with_dice(BoardState::new(), &[6, 5]);
        assert_eq!(
            apply_move(&mut board, Color::White, BoardPoint(5), Off),
            Err(MoveError::IllegalMove)
        );
    }

    #[test]
    fn test_apply_move_onto_block_is_rejected() {
        let mut board = with_dice(BoardState::new(), &[1, 2]);
        let before = board.clone();
        assert_eq!(
            apply_move(&mut board, Color::White, BoardPoint(12), BoardPoint(11)),
            Err(MoveError::Blocked)
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_apply_move_bar_to_off_is_illegal() {
        let mut board = with_dice(
            position(&[(3, 5, 0)], ColorPair::new(1, 0)),
            &[2, 4],
        );
        assert_eq!(
            apply_move(&mut board, Color::White, Bar, Off),
            Err(MoveError::BarToOff)
        );
        assert_eq!(MoveError::BarToOff.to_string(), "Cannot bear off from bar.");
    }

    #[test]
    fn test_apply_move_bar_entry_without_matching_die_is_illegal_entry() {
        let mut board = with_dice(
            position(&[(3, 5, 0)], ColorPair::new(1, 0)),
            &[2, 4],
        );
        let before = board.clone();
        // Entry points for 2 and 4 are 22 and 20; 18 needs a 6.
        assert_eq!(
            apply_move(&mut board, Color::White, Bar, BoardPoint(18)),
            Err(MoveError::IllegalEntry)
        );
        assert_eq!(MoveError::IllegalEntry.to_string(), "Illegal entry.");
        assert_eq!(board, before);
    }

    // =====================================================================
    // apply_move(): success paths
    // =====================================================================

    #[test]
    fn test_apply_move_simple_move_consumes_die() {
        let mut board = with_dice(BoardState::new(), &[3, 5]);
        let used = apply_move(&mut board, Color::White, BoardPoint(7), BoardPoint(4)).unwrap();
        assert_eq!(used, 3);
        assert_eq!(board.points[7].white, 2);
        assert_eq!(board.points[4].white, 1);
        assert_eq!(board.dice_left, vec![5]);
        assert_eq!(board.dice, vec![3, 5], "shown dice are untouched");
        assert_eq!(board.history_len(), 1);
    }

    #[test]
    fn test_apply_move_smallest_matching_die_wins() {
        // Both 2 and 5 bear the checker on index 1 off.
        let mut board = with_dice(
            position(&[(1, 1, 0), (20, 0, 2)], ColorPair::default()),
            &[5, 2],
        );
        let used = apply_move(&mut board, Color::White, BoardPoint(1), Off).unwrap();
        assert_eq!(used, 2);
        assert_eq!(board.dice_left, vec![5]);
        assert_eq!(board.off.white, 15);
    }

    #[test]
    fn test_apply_move_doubles_remove_one_instance() {
        let mut board = with_dice(BoardState::new(), &[2, 2, 2, 2]);
        apply_move(&mut board, Color::White, BoardPoint(12), BoardPoint(10)).unwrap();
        apply_move(&mut board, Color::White, BoardPoint(10), BoardPoint(8)).unwrap();
        assert_eq!(board.dice_left, vec![2, 2]);
    }

    #[test]
    fn test_apply_move_hit_sends_blot_to_bar() {
        let mut board = with_dice(
            position(&[(12, 5, 0), (9, 0, 1), (0, 0, 2)], ColorPair::default()),
            &[3, 6],
        );
        apply_move(&mut board, Color::White, BoardPoint(12), BoardPoint(9)).unwrap();
        assert_eq!(board.points[9], ColorPair::new(1, 0));
        assert_eq!(board.bar.black, 1);
        assert_eq!(board.verify(), Ok(()));
    }

    #[test]
    fn test_apply_move_bar_entry_and_hit() {
        // Black on the bar enters with a 3 onto index 2, hitting White's blot.
        let mut board = with_dice(
            position(&[(2, 1, 0), (5, 4, 0), (18, 0, 5)], ColorPair::new(0, 1)),
            &[3, 4],
        );
        let used = apply_move(&mut board, Color::Black, Bar, BoardPoint(2)).unwrap();
        assert_eq!(used, 3);
        assert_eq!(board.bar, ColorPair::new(1, 0));
        assert_eq!(board.points[2], ColorPair::new(0, 1));
    }

    #[test]
    fn test_apply_move_black_moves_upward() {
        let mut board = with_dice(BoardState::new(), &[1, 6]);
        board.turn = Color::Black;
        apply_move(&mut board, Color::Black, BoardPoint(0), BoardPoint(6)).unwrap();
        assert_eq!(board.points[6].black, 1);
        assert_eq!(board.points[0].black, 1);
    }

    #[test]
    fn test_apply_move_then_undo_restores_everything() {
        let mut board = with_dice(BoardState::new(), &[3, 5]);
        let snap = board.snapshot();
        apply_move(&mut board, Color::White, BoardPoint(12), BoardPoint(9)).unwrap();
        apply_move(&mut board, Color::White, BoardPoint(12), BoardPoint(7)).unwrap();
        assert!(board.undo());
        assert!(board.undo());
        assert_eq!(board.snapshot(), snap);
        assert_eq!(board.dice_left, vec![3, 5]);
        assert!(board.rolled);
    }

    // =====================================================================
    // Properties over random play
    // =====================================================================

    /// Plays random legal moves for many turns and checks conservation and
    /// the history bound after every step.
    #[test]
    fn test_random_play_conserves_checkers() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut board = BoardState::new();
        let sources: Vec<Destination> =
            std::iter::once(Bar).chain((0..24u8).map(BoardPoint)).collect();

        for _turn in 0..400 {
            let color = board.turn;
            board.record_roll(roll_dice(&mut rng));
            loop {
                let options: Vec<(Destination, Destination)> = sources
                    .iter()
                    .flat_map(|&s| {
                        legal_targets(&board, color, s)
                            .into_iter()
                            .map(move |d| (s, d))
                    })
                    .collect();
                let Some(&(source, dest)) =
                    options.get(rand::Rng::random_range(&mut rng, 0..options.len().max(1)))
                else {
                    break;
                };
                apply_move(&mut board, color, source, dest)
                    .expect("legal_targets answer must be accepted");
                assert_eq!(board.verify(), Ok(()));
                assert!(board.history_len() <= crate::HISTORY_CAPACITY);
            }
            if board.has_won(color) {
                break;
            }
            board.end_turn();
        }
    }
}
