
extern crate corvid;

mod board_build;
mod move_generating;
mod fen_building;
mod board_move_apply;
mod pseudo_legal_checks;
mod board_hash;

