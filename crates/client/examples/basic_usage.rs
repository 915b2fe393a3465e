use anyhow::Result;
use icfpc2025_client::{AedificiumClient, AedificiumRemoteClient, Map, MapConnection, RoomDoor};

#[tokio::main]
async fn main() -> Result<()> {
    let mut client = AedificiumRemoteClient::new("example-id".to_string());

    // Select a problem
    let _select_response = client.select("probatio".to_string()).await?;

    println!("Problem selected");

    // Explore with a single plan made of door digits 0..5
    let explore_response = client.explore(vec!["012345".to_string()]).await?;

    println!("Explore results: {:?}", explore_response.results);
    println!("Query count: {}", explore_response.query_count);

    // Submit a guess
    let guess_response = client
        .guess(Map {
            rooms: vec![1, 2, 3],
            starting_room: 1,
            connections: vec![MapConnection {
                from: RoomDoor { room: 1, door: 0 },
                to: RoomDoor { room: 2, door: 1 },
            }],
        })
        .await?;

    println!("Guess correct: {}", guess_response.correct);

    Ok(())
}
