//! Shared wire types and interfaces for the ICFPC 2025 Aedificium contest.
//!
//! This crate has no opinion on how a map is *reconstructed* (see
//! `icfpc2025-reconstruct`) or how it is *fetched* (see `icfpc2025-client`,
//! `icfpc2025-simulator`). It only defines the JSON-shaped request/response
//! types both sides agree on, the `AedificiumClient` trait they implement
//! against, and the fixed table of problem sizes.

mod interfaces;
mod problems;
mod types;

pub use interfaces::AedificiumClient;
pub use problems::{problem_size, ProblemName, PROBLEMS};
pub use types::{
    ExploreRequest, ExploreResponse, GuessRequest, GuessResponse, Map, MapConnection,
    RegisterRequest, RegisterResponse, RoomDoor, SelectRequest, SelectResponse,
};
