#![deny(warnings)]
//! Suggestion layer for BombBuster: ranks the calls a player could make
//! from the domains the inference engine maintains.

pub mod suggest;
