mod pick;

use std::{mem, slice};

use corvid::core::mono_traits::*;
use corvid::core::score::{BISHOP, KNIGHT, PAWN, QUEEN, ROOK};
use corvid::board::movegen::{Legality, MoveGen, PseudoLegal};
use corvid::{BitMove, Board, PieceType, ScoringMove, ScoringMoveList, SQ};

use tables::prelude::*;

use self::pick::Pick;

// TODO: use Generators once stabilized.

pub trait MovePickerType: Sized {
    fn next(&mut self, board: &Board, skip_quiets: bool) -> BitMove;
}

pub struct MovePicker<MPT: MovePickerType> {
    picker: MPT,
    board: *const Board,
    moves: ScoringMoveList,
}

impl MovePicker<MainSearchPicker> {
    /// Move picker for the main search: tries the TT move, then captures ordered by
    /// MVV-LVA/capture history, then the killer and counter moves, then quiet moves
    /// ordered by butterfly/continuation history.
    pub fn main_search(
        board: &Board,
        depth: i16,
        main_history: &ButterflyHistory,
        capture_history: &CapturePieceToHistory,
        cont_hists: *const [*const PieceToHistory; 4],
        mut ttm: BitMove,
        killers: [BitMove; 2],
        counter_move: BitMove,
    ) -> Self {
        assert!(!board.in_check());

        if ttm == BitMove::null() || !board.pseudo_legal_move(ttm) {
            ttm = BitMove::null();
        }
        let mut moves = ScoringMoveList::default();
        let first: *mut ScoringMove = unsafe { moves.as_mut_ptr() };
        let picker = MainSearchPicker::new(
            depth,
            ttm,
            killers[0],
            killers[1],
            counter_move,
            main_history,
            capture_history,
            cont_hists,
            first,
        );
        MovePicker::new(board, picker, moves)
    }
}

impl MovePicker<QSearchPicker> {
    /// Move picker for quiescence search: the TT move (if a capture), then captures
    /// ordered by MVV-LVA/capture history, restricted to the recapture square once deep
    /// enough into the q-search line.
    pub fn qsearch(
        board: &Board,
        depth: i16,
        mut ttm: BitMove,
        _main_history: &ButterflyHistory,
        capture_history: &CapturePieceToHistory,
        recapture_sq: SQ,
    ) -> Self {
        if ttm == BitMove::null() || !ttm.is_capture() || !board.pseudo_legal_move(ttm) {
            ttm = BitMove::null();
        }
        let mut moves = ScoringMoveList::default();
        let first: *mut ScoringMove = unsafe { moves.as_mut_ptr() };
        // Past this depth, only recaptures on the square just captured on are worth
        // trying; mirrors Stockfish's `DEPTH_QS_RECAPTURES` cutoff.
        let recaptures_only = depth <= -4;
        let picker =
            QSearchPicker::new(ttm, capture_history, recapture_sq, recaptures_only, first);
        MovePicker::new(board, picker, moves)
    }
}

impl<MPT: MovePickerType> MovePicker<MPT> {
    fn new(board: *const Board, picker: MPT, moves: ScoringMoveList) -> Self {
        MovePicker {
            picker,
            board,
            moves,
        }
    }

    /// Returns the next move to try, or `None` once the picker is exhausted.
    pub fn next(&mut self, skip_quiets: bool) -> Option<BitMove> {
        let board: &Board = unsafe { &*self.board };
        match self.picker.next(board, skip_quiets) {
            mov if mov == BitMove::null() => None,
            mov => Some(mov),
        }
    }
}

/// Rough MVV-LVA value of a piece type for ordering captures; unrecognized / missing
/// piece types (en-passant's captured pawn aside) score as zero.
fn piece_type_value(pt: PieceType) -> i32 {
    i32::from(match pt {
        PieceType::P => PAWN,
        PieceType::N => KNIGHT,
        PieceType::B => BISHOP,
        PieceType::R => ROOK,
        PieceType::Q => QUEEN,
        _ => 0,
    })
}

fn mvv_lva_score(board: &Board, capture_history: &CapturePieceToHistory, mov: BitMove) -> i16 {
    let moved = board
        .piece_at_sq(mov.get_src())
        .expect("capture move must move a piece");
    let captured_pt = if mov.is_en_passant() {
        PieceType::P
    } else {
        board
            .piece_at_sq(mov.get_dest())
            .map_or(PieceType::None, |p| p.type_of())
    };
    let score = piece_type_value(captured_pt) * 8 - piece_type_value(moved.type_of()) / 8
        + i32::from(capture_history[(moved, mov.get_dest(), captured_pt)]);
    score.max(i32::from(i16::min_value())).min(i32::from(i16::max_value())) as i16
}

fn quiet_score(
    board: &Board,
    main_history: &ButterflyHistory,
    cont_hists: *const [*const PieceToHistory; 4],
    mov: BitMove,
) -> i16 {
    let us = board.turn();
    let moved = board
        .piece_at_sq(mov.get_src())
        .expect("quiet move must move a piece");
    let mut score = i32::from(main_history[(us, mov)]);
    if !cont_hists.is_null() {
        unsafe {
            for &h in (*cont_hists).iter() {
                if !h.is_null() {
                    score += i32::from((*h)[(moved, mov.get_dest())]);
                }
            }
        }
    }
    score.max(i32::from(i16::min_value())).min(i32::from(i16::max_value())) as i16
}

/// Sorts the moves in `[begin, end)` by descending score. `begin`/`end` must point into
/// the same `ScoringMoveList` backing buffer.
unsafe fn sort_moves_desc(begin: *mut ScoringMove, end: *mut ScoringMove) {
    let len = (end as usize - begin as usize) / mem::size_of::<ScoringMove>();
    let slice = slice::from_raw_parts_mut(begin, len);
    slice.sort_unstable_by(|a, b| b.score.cmp(&a.score));
}

pub struct MainSearchPicker {
    pick: Pick,
    #[allow(dead_code)]
    depth: i16,
    ttm: BitMove,
    killer1: BitMove,
    killer2: BitMove,
    counter_move: BitMove,
    main_history: *const ButterflyHistory,
    capture_history: *const CapturePieceToHistory,
    cont_hists: *const [*const PieceToHistory; 4],
    begin_ptr: *mut ScoringMove,
    cur_ptr: *mut ScoringMove,
    end_ptr: *mut ScoringMove,
}

impl MainSearchPicker {
    pub fn new(
        depth: i16,
        ttm: BitMove,
        killer1: BitMove,
        killer2: BitMove,
        counter_move: BitMove,
        main_history: &ButterflyHistory,
        capture_history: &CapturePieceToHistory,
        cont_hists: *const [*const PieceToHistory; 4],
        mvs: *mut ScoringMove,
    ) -> Self {
        let pick = if ttm == BitMove::null() {
            Pick::CapturesInit
        } else {
            Pick::MainSearch
        };
        MainSearchPicker {
            pick,
            depth,
            ttm,
            killer1,
            killer2,
            counter_move,
            main_history: main_history as *const ButterflyHistory,
            capture_history: capture_history as *const CapturePieceToHistory,
            cont_hists,
            begin_ptr: mvs,
            cur_ptr: mvs,
            end_ptr: mvs,
        }
    }

    /// Whether `mov` is a killer/counter candidate worth trying: a real, still
    /// pseudo-legal quiet move that isn't the move we already tried as the TT move.
    fn is_usable_quiet_hint(&self, board: &Board, mov: BitMove) -> bool {
        mov != BitMove::null()
            && mov != self.ttm
            && !mov.is_capture()
            && board.pseudo_legal_move(mov)
    }
}

impl MovePickerType for MainSearchPicker {
    fn next(&mut self, board: &Board, skip_quiets: bool) -> BitMove {
        match self.pick {
            Pick::MainSearch => {
                self.pick.incr();
                self.ttm
            }
            Pick::CapturesInit => {
                self.cur_ptr = self.begin_ptr;
                unsafe {
                    self.end_ptr = MoveGen::extend_from_ptr::<PseudoLegal, CapturesGenType, ScoringMoveList>(
                        board,
                        self.begin_ptr,
                    );
                    let capture_history = &*self.capture_history;
                    let mut ptr = self.begin_ptr;
                    while ptr < self.end_ptr {
                        (*ptr).score = mvv_lva_score(board, capture_history, (*ptr).bit_move);
                        ptr = ptr.add(1);
                    }
                    sort_moves_desc(self.begin_ptr, self.end_ptr);
                }
                self.pick.incr();
                self.next(board, skip_quiets)
            }
            Pick::GoodCaptures => {
                unsafe {
                    while self.cur_ptr < self.end_ptr {
                        let sm = *self.cur_ptr;
                        self.cur_ptr = self.cur_ptr.add(1);
                        if sm.bit_move != self.ttm {
                            return sm.bit_move;
                        }
                    }
                }
                self.pick.incr();
                self.next(board, skip_quiets)
            }
            Pick::KillerOne => {
                self.pick.incr();
                if self.is_usable_quiet_hint(board, self.killer1) {
                    return self.killer1;
                }
                self.next(board, skip_quiets)
            }
            Pick::KillerTwo => {
                self.pick.incr();
                if self.killer2 != self.killer1 && self.is_usable_quiet_hint(board, self.killer2) {
                    return self.killer2;
                }
                self.next(board, skip_quiets)
            }
            Pick::CounterMove => {
                self.pick.incr();
                if self.counter_move != self.killer1
                    && self.counter_move != self.killer2
                    && self.is_usable_quiet_hint(board, self.counter_move)
                {
                    return self.counter_move;
                }
                self.next(board, skip_quiets)
            }
            Pick::QuietInit => {
                if !skip_quiets {
                    self.cur_ptr = self.end_ptr;
                    unsafe {
                        let quiets_end =
                            MoveGen::extend_from_ptr::<PseudoLegal, QuietsGenType, ScoringMoveList>(
                                board,
                                self.end_ptr,
                            );
                        let main_history = &*self.main_history;
                        let mut ptr = self.end_ptr;
                        while ptr < quiets_end {
                            (*ptr).score =
                                quiet_score(board, main_history, self.cont_hists, (*ptr).bit_move);
                            ptr = ptr.add(1);
                        }
                        sort_moves_desc(self.end_ptr, quiets_end);
                        self.end_ptr = quiets_end;
                    }
                }
                self.pick.incr();
                self.next(board, skip_quiets)
            }
            Pick::QuietMoves => {
                if !skip_quiets {
                    unsafe {
                        while self.cur_ptr < self.end_ptr {
                            let sm = *self.cur_ptr;
                            self.cur_ptr = self.cur_ptr.add(1);
                            if sm.bit_move != self.ttm
                                && sm.bit_move != self.killer1
                                && sm.bit_move != self.killer2
                                && sm.bit_move != self.counter_move
                            {
                                return sm.bit_move;
                            }
                        }
                    }
                }
                self.pick.incr();
                BitMove::null()
            }
            _ => BitMove::null(),
        }
    }
}

pub struct QSearchPicker {
    pick: Pick,
    ttm: BitMove,
    recapture_sq: SQ,
    recaptures_only: bool,
    capture_history: *const CapturePieceToHistory,
    begin_ptr: *mut ScoringMove,
    cur_ptr: *mut ScoringMove,
    end_ptr: *mut ScoringMove,
}

impl QSearchPicker {
    pub fn new(
        ttm: BitMove,
        capture_history: &CapturePieceToHistory,
        recapture_sq: SQ,
        recaptures_only: bool,
        mvs: *mut ScoringMove,
    ) -> Self {
        let pick = if ttm == BitMove::null() {
            Pick::QSearchInit
        } else {
            Pick::QSearch
        };
        QSearchPicker {
            pick,
            ttm,
            recapture_sq,
            recaptures_only,
            capture_history: capture_history as *const CapturePieceToHistory,
            begin_ptr: mvs,
            cur_ptr: mvs,
            end_ptr: mvs,
        }
    }
}

impl MovePickerType for QSearchPicker {
    fn next(&mut self, board: &Board, skip_quiets: bool) -> BitMove {
        match self.pick {
            Pick::QSearch => {
                self.pick.incr();
                self.ttm
            }
            Pick::QSearchInit => {
                self.cur_ptr = self.begin_ptr;
                unsafe {
                    self.end_ptr = MoveGen::extend_from_ptr::<PseudoLegal, CapturesGenType, ScoringMoveList>(
                        board,
                        self.begin_ptr,
                    );
                    let capture_history = &*self.capture_history;
                    let mut ptr = self.begin_ptr;
                    while ptr < self.end_ptr {
                        (*ptr).score = mvv_lva_score(board, capture_history, (*ptr).bit_move);
                        ptr = ptr.add(1);
                    }
                    sort_moves_desc(self.begin_ptr, self.end_ptr);
                }
                self.pick.incr();
                self.next(board, skip_quiets)
            }
            Pick::QCaptures => {
                unsafe {
                    while self.cur_ptr < self.end_ptr {
                        let sm = *self.cur_ptr;
                        self.cur_ptr = self.cur_ptr.add(1);
                        if sm.bit_move == self.ttm {
                            continue;
                        }
                        if self.recaptures_only && sm.bit_move.get_dest() != self.recapture_sq {
                            continue;
                        }
                        return sm.bit_move;
                    }
                }
                BitMove::null()
            }
            _ => BitMove::null(),
        }
    }
}
