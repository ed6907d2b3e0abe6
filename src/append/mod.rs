//! # Movie Data Appender
//!
//! Appends movie bytes to a player file following a layout of data, marker
//! and length fields. Players locate the embedded movie by reading backward
//! from end-of-file, so field order and endianness must match the player's
//! convention exactly.
//!
//! Layout tags:
//!
//! - `d`: movie data
//! - `m`: marker bytes `56 34 12 FA`
//! - `s` / `S`: 32-bit size, little / big endian
//! - `l` / `L`: 64-bit size, little / big endian (value always fits in 32 bits)

mod layout;
mod writer;

pub use layout::{AppendLayout, LayoutField, MOVIE_APPEND_MARKER};
pub use writer::{append_movie_data, append_with_format};
