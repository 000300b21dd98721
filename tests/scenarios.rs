use line_kmedian::{
    place_servers, service_cost, PlacementError, PlacementSolver, Segment, Strategy,
};

#[test]
fn single_client() {
    let placement = place_servers(1, 1, &[5u64]).unwrap();
    assert_eq!(placement.min_cost, 0);
    assert_eq!(placement.servers, vec![0]);
    assert_eq!(
        placement.segments,
        vec![Segment {
            start: 0,
            end: 1,
            server: 0
        }]
    );
}

#[test]
fn one_server_sits_in_the_middle() {
    let placement = place_servers(3, 1, &[1u64, 1, 1]).unwrap();
    assert_eq!(placement.min_cost, 2);
    assert_eq!(placement.servers, vec![1]);
}

#[test]
fn two_servers_on_four_uniform_clients() {
    let placement = place_servers(4, 2, &[1u64, 1, 1, 1]).unwrap();
    assert_eq!(placement.min_cost, 2);
    assert_eq!(placement.servers, vec![0, 2]);
}

#[test]
fn one_server_per_client() {
    let placement = place_servers(5, 5, &[3u64, 1, 4, 1, 5]).unwrap();
    assert_eq!(placement.min_cost, 0);
    assert_eq!(placement.servers, vec![0, 1, 2, 3, 4]);
}

#[test]
fn float_scenarios_match_integer_ones() {
    let placement = place_servers(3, 1, &[1.0f64, 1.0, 1.0]).unwrap();
    assert_eq!(placement.min_cost, 2.0);
    assert_eq!(placement.servers, vec![1]);

    let placement = place_servers(4, 2, &[1.0f32, 1.0, 1.0, 1.0]).unwrap();
    assert_eq!(placement.min_cost, 2.0);
    assert_eq!(placement.servers, vec![0, 2]);
}

#[test]
fn heavy_endpoints_do_not_hide_light_clients() {
    let weights = [1e17f64, 1.0, 1.0, 1.0, 1e17];
    let placement = place_servers(5, 2, &weights).unwrap();
    assert_eq!(placement.min_cost, 4.0);
    assert_eq!(placement.servers, vec![0, 4]);
    assert_eq!(
        service_cost(&weights, &placement.servers),
        Some(placement.min_cost)
    );

    let weights = [1e17f64, 1.0, 1.0, 1.0];
    let placement = place_servers(4, 2, &weights).unwrap();
    assert_eq!(placement.min_cost, 2.0);
    assert_eq!(placement.servers, vec![0, 2]);
    assert_eq!(
        service_cost(&weights, &placement.servers),
        Some(placement.min_cost)
    );
}

#[test]
fn narrow_integer_weights() {
    assert_eq!(place_servers(3, 1, &[1u32, 1, 1]).unwrap().min_cost, 2);
    assert_eq!(place_servers(3, 1, &[1i32, 1, 1]).unwrap().servers, vec![1]);
    let placement = place_servers(4, 2, &[1usize, 1, 1, 1]).unwrap();
    assert_eq!((placement.min_cost, placement.servers), (2, vec![0, 2]));
    assert!(matches!(
        place_servers(2, 1, &[1isize, -1]).unwrap_err(),
        PlacementError::InvalidWeight { index: 1, .. }
    ));
}

#[test]
fn unrepresentable_sums_are_errors() {
    assert_eq!(
        place_servers(3, 3, &[u64::MAX / 2; 3]).unwrap_err(),
        PlacementError::CostOverflow
    );
    assert_eq!(
        place_servers(2, 2, &[f64::MAX; 2]).unwrap_err(),
        PlacementError::CostOverflow
    );
    // Large weights whose sums still fit are solved exactly.
    let placement = place_servers(2, 1, &[u64::MAX / 2; 2]).unwrap();
    assert_eq!(placement.min_cost, u64::MAX / 2);
    assert_eq!(placement.servers, vec![0]);
}

#[test]
fn zero_weights_cost_nothing() {
    for k in 1..=6 {
        let placement = place_servers(6, k, &[0u64; 6]).unwrap();
        assert_eq!(placement.min_cost, 0);
        assert_eq!(placement.servers.len(), k);
    }
}

#[test]
fn two_clusters() {
    // Heavy traffic around clients 1 and 7.
    let weights = [1u64, 10, 1, 0, 0, 0, 1, 10, 1];
    let placement = place_servers(weights.len(), 2, &weights).unwrap();
    assert_eq!(placement.servers, vec![1, 7]);
    assert_eq!(placement.min_cost, 4);
}

#[test]
fn checkpointed_strategy_reproduces_scenarios() {
    let solver = PlacementSolver::new().with_strategy(Strategy::Checkpointed { block_size: None });
    assert_eq!(solver.solve(1, 1, &[5u64]).unwrap().servers, vec![0]);
    assert_eq!(solver.solve(3, 1, &[1u64, 1, 1]).unwrap().min_cost, 2);
    let placement = solver.solve(4, 2, &[1u64, 1, 1, 1]).unwrap();
    assert_eq!((placement.min_cost, placement.servers), (2, vec![0, 2]));
    let placement = solver.solve(5, 5, &[3u64, 1, 4, 1, 5]).unwrap();
    assert_eq!(placement.servers, vec![0, 1, 2, 3, 4]);
}

#[test]
fn invalid_input_is_reported() {
    assert_eq!(
        place_servers::<u64>(0, 1, &[]).unwrap_err(),
        PlacementError::NoClients
    );
    assert_eq!(
        place_servers(3, 0, &[1u64, 2, 3]).unwrap_err(),
        PlacementError::NoServers { clients: 3 }
    );
    assert_eq!(
        place_servers(2, 3, &[1u64, 2]).unwrap_err(),
        PlacementError::TooManyServers {
            servers: 3,
            clients: 2
        }
    );
    assert_eq!(
        place_servers(3, 1, &[1u64, 2]).unwrap_err(),
        PlacementError::LengthMismatch {
            declared: 3,
            actual: 2
        }
    );
    assert!(matches!(
        place_servers(3, 1, &[1.0f64, -0.5, 2.0]).unwrap_err(),
        PlacementError::InvalidWeight { index: 1, .. }
    ));
    assert!(matches!(
        place_servers(2, 1, &[f64::INFINITY, 1.0]).unwrap_err(),
        PlacementError::InvalidWeight { index: 0, .. }
    ));
    assert!(place_servers(2, 1, &[-3i64, 1])
        .unwrap_err()
        .is_invalid_input());
}

#[test]
fn no_clients_and_no_servers_is_trivial() {
    let placement = place_servers::<f64>(0, 0, &[]).unwrap();
    assert_eq!(placement.min_cost, 0.0);
    assert!(placement.servers.is_empty());
    assert!(placement.segments.is_empty());
}
