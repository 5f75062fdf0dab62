use super::*;

mod admin;
mod admission;
mod movement;
mod settlement;
