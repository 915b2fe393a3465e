use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub pl: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectRequest {
    pub id: String,
    #[serde(rename = "problemName")]
    pub problem_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectResponse {
    #[serde(flatten)]
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExploreRequest {
    pub id: String,
    pub plans: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExploreResponse {
    pub results: Vec<Vec<u8>>,
    #[serde(rename = "queryCount")]
    pub query_count: usize,
}

/// One end of a door-pair: room `room`'s door number `door`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomDoor {
    pub room: usize,
    pub door: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapConnection {
    pub from: RoomDoor,
    pub to: RoomDoor,
}

/// The wire format of a candidate map, exactly as `/guess` expects it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Map {
    pub rooms: Vec<u8>,
    #[serde(rename = "startingRoom")]
    pub starting_room: usize,
    pub connections: Vec<MapConnection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GuessRequest {
    pub id: String,
    pub map: Map,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessResponse {
    pub correct: bool,
}
