//! Detective Quest: explore a mansion laid out as a binary tree of rooms,
//! collect the clues left in them and work out the most likely suspect.
//!
//! The game state lives in three structures:
//! - [`room_map::RoomMap`]: the rooms, built once from a layout table
//! - [`clue_ledger::ClueLedger`]: distinct clues in a binary search tree
//! - [`suspect_tally::SuspectTally`]: clue counts per suspect in a
//!   fixed-size hash table with chained buckets
//!
//! [`controller::Investigation`] drives them from single-character commands.

pub mod clue_ledger;
pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod room_map;
pub mod rules;
pub mod suspect_tally;

#[cfg(test)]
mod random_test;
