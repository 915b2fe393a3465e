mod client;

pub use client::AedificiumRemoteClient;
pub use icfpc2025_common::{
    AedificiumClient, ExploreRequest, ExploreResponse, GuessRequest, GuessResponse, Map,
    MapConnection, RoomDoor, SelectRequest, SelectResponse,
};
