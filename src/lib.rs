#![deny(missing_docs)]

//! Ordered map backed by a height-balanced (AVL) binary search tree, see [`collections::AvlMap`].
//!
//! Traversal uses explicit-stack cursors rather than recursion, so walking a map
//! never needs more than a fixed amount of memory regardless of its size.

//!# Features
//!
//! This crate supports the following cargo features:
//! - `serde` : enables serialisation of [`collections::AvlMap`] via serde crate.

/// Containers.
pub mod collections;
