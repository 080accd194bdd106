
use std::ops::{Index, IndexMut};

use corvid::core::masks::*;
use corvid::{BitMove, Player};

use super::{StatBoard, NumStatBoard};

/// ButterflyBoards are 2 tables (one for each color) indexed by the move's from
/// and to squares, see chessprogramming.wikispaces.com/Butterfly+Boards
pub struct ButterflyHistory {
    a: [[i16; (SQ_CNT * SQ_CNT)]; PLAYER_CNT]
}

impl StatBoard<i16> for ButterflyHistory {
    const FILL: i16 = 0;
}

impl NumStatBoard for ButterflyHistory {
    const D: i16 = 324;
}

// [Player][from_to]
#[allow(non_camel_case_types)]
type BF_idx = (Player, BitMove);

impl ButterflyHistory {
    pub fn new() -> Self {
        ButterflyHistory {
            a: [[Self::FILL; SQ_CNT * SQ_CNT]; PLAYER_CNT],
        }
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Applies a Stockfish-style damped bonus/malus to the entry for `idx`.
    pub fn update(&mut self, idx: BF_idx, bonus: i16) {
        debug_assert!(bonus.abs() <= Self::D);
        let entry = &mut self[idx];
        *entry += bonus - (*entry * bonus.abs()) / Self::D;
    }
}

impl Index<BF_idx> for ButterflyHistory {
    type Output = i16;

    #[inline(always)]
    fn index(&self, idx: BF_idx) -> &i16 {
        unsafe {
            self.a
                .get_unchecked(idx.0 as usize)
                .get_unchecked(idx.1.from_to() as usize)
        }
    }
}

impl IndexMut<BF_idx> for ButterflyHistory {
    #[inline(always)]
    fn index_mut(&mut self, idx: BF_idx) -> &mut i16 {
        unsafe {
            self.a
                .get_unchecked_mut(idx.0 as usize)
                .get_unchecked_mut(idx.1.from_to() as usize)
        }
    }
}