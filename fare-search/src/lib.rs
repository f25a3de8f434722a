//! Multi-stage flight fare search.
//!
//! Answers: "What are the cheapest round trips between these two cities,
//! flown directly or stitched together at an intermediate city?"

pub mod cache;
pub mod domain;
pub mod input;
pub mod search;
pub mod sink;
pub mod trip;
pub mod web;
