//! Round-trips the solvers against `icfpc2025_simulator`'s local oracle:
//! generate a random map, walk it, reconstruct from the walk, and check the
//! reconstructed map reproduces the same walk.

use icfpc2025_common::AedificiumClient;
use icfpc2025_reconstruct::{reconstruct, solve, Connection, MapData};
use icfpc2025_simulator::Simulator;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

fn random_plan(len: usize, rng: &mut StdRng) -> String {
    (0..len)
        .map(|_| std::char::from_digit(rng.gen_range(0..6), 10).unwrap())
        .collect()
}

fn simulate(map: &MapData, doors: &str) -> Vec<u8> {
    let door_to_target: Vec<[Option<usize>; 6]> = {
        let mut adjacency = vec![[None; 6]; map.rooms.len()];
        for connection in &map.connections {
            adjacency[connection.src.room][connection.src.door] = Some(connection.dst.room);
            adjacency[connection.dst.room][connection.dst.door] = Some(connection.src.room);
        }
        adjacency
    };

    let mut current = map.starting_room;
    let mut labels = vec![map.rooms[current]];
    for ch in doors.chars() {
        let door = ch.to_digit(10).unwrap() as usize;
        current = door_to_target[current][door].expect("map is fully wired");
        labels.push(map.rooms[current]);
    }
    labels
}

fn assert_well_formed_matching(connections: &[Connection], n: usize) {
    assert_eq!(connections.len(), 3 * n);
    let mut seen = vec![[false; 6]; n];
    for c in connections {
        assert!(!seen[c.src.room][c.src.door], "door used twice");
        assert!(!seen[c.dst.room][c.dst.door], "door used twice");
        seen[c.src.room][c.src.door] = true;
        seen[c.dst.room][c.dst.door] = true;
    }
    for doors in &seen {
        assert!(doors.iter().all(|&d| d), "every door must appear once");
    }
}

fn assert_connected(connections: &[Connection], n: usize) {
    let mut parent: Vec<usize> = (0..n).collect();
    fn find(parent: &mut [usize], x: usize) -> usize {
        if parent[x] != x {
            parent[x] = find(parent, parent[x]);
        }
        parent[x]
    }
    for c in connections {
        let (ra, rb) = (find(&mut parent, c.src.room), find(&mut parent, c.dst.room));
        if ra != rb {
            parent[ra] = rb;
        }
    }
    let root = find(&mut parent, 0);
    for room in 0..n {
        assert_eq!(find(&mut parent, room), root, "room {room} is disconnected");
    }
}

fn assert_label_histogram(rooms: &[u8], n: usize) {
    let floor = n / 4;
    let ceil = (n + 3) / 4;
    let mut counts = [0usize; 4];
    for &label in rooms {
        counts[label as usize] += 1;
    }
    for count in counts {
        assert!(count == floor || count == ceil, "label count {count} outside [{floor}, {ceil}]");
    }
}

#[tokio::test]
async fn dfs_round_trips_a_generated_map() {
    let n = 6;
    let mut gen_rng = StdRng::seed_from_u64(42);
    let mut simulator = Simulator::new(n, &mut gen_rng).unwrap();

    let mut plan_rng = StdRng::seed_from_u64(43);
    let plan = random_plan(18 * n, &mut plan_rng);

    let response = simulator.explore(vec![plan.clone()]).await.unwrap();
    let labels = response.results[0].clone();

    let map = solve(n, &plan, &labels).unwrap();

    assert_eq!(simulate(&map, &plan), labels);
    assert_well_formed_matching(&map.connections, n);
    assert_connected(&map.connections, n);
    assert_label_histogram(&map.rooms, n);
}

#[tokio::test]
async fn orchestrator_round_trips_a_generated_map() {
    let n = 6;
    let mut gen_rng = StdRng::seed_from_u64(7);
    let mut simulator = Simulator::new(n, &mut gen_rng).unwrap();

    let mut plan_rng = StdRng::seed_from_u64(8);
    let plan = random_plan(18 * n, &mut plan_rng);

    let response = simulator.explore(vec![plan.clone()]).await.unwrap();
    let labels = response.results[0].clone();

    let map = reconstruct(n, &plan, &labels).unwrap();

    assert_eq!(simulate(&map, &plan), labels);
    assert_well_formed_matching(&map.connections, n);
    assert_connected(&map.connections, n);
}

#[test]
fn literal_scenario_three_rooms_visited_in_order() {
    let map = solve(3, "012", &[0, 1, 2, 0]).unwrap();
    assert_eq!(simulate(&map, "012"), vec![0, 1, 2, 0]);
    let mut labels = map.rooms.clone();
    labels.sort_unstable();
    assert_eq!(labels, vec![0, 1, 2]);
}

#[test]
fn literal_scenario_self_loop_on_repeated_door() {
    let doors = "000000";
    let labels = vec![0u8; 7];
    let map = solve(3, doors, &labels).unwrap();
    assert_eq!(simulate(&map, doors), labels);
}

#[test]
#[ignore = "statistical: slow, only meaningful across many seeds"]
fn annealing_converges_on_a_random_six_room_target() {
    use icfpc2025_reconstruct::solve2;

    let mut successes = 0;
    for seed in 0..20u64 {
        let mut gen_rng = StdRng::seed_from_u64(1000 + seed);
        let mut simulator = Simulator::new(6, &mut gen_rng).unwrap();
        let mut plan_rng = StdRng::seed_from_u64(2000 + seed);
        let plan = random_plan(18 * 6, &mut plan_rng);

        let response =
            tokio_test_block_on(simulator.explore(vec![plan.clone()])).unwrap();
        let labels = response.results[0].clone();

        if let Ok(map) = solve2(6, &plan, &labels) {
            if simulate(&map, &plan) == labels {
                successes += 1;
            }
        }
    }
    assert!(successes >= 15, "only {successes}/20 seeds converged");
}

fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(f)
}
