//! Deduction finders.
//!
//! Finders scan the candidate masks for deductions and queue them for the
//! appliers; they are only ever run while the queues are empty. The one
//! exception is the subset finder, which performs its eliminations eagerly
//! while it holds a house's search state and queues bare markers instead.

mod guess;
mod intersections;
mod singles;
mod subsets;
