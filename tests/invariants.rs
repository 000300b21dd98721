use line_kmedian::{place_servers, PlacementTable, SegmentCostTable};
use proptest::prelude::*;

fn weights_and_servers() -> impl Strategy<Value = (Vec<u64>, usize)> {
    prop::collection::vec(0u64..30, 1..=24)
        .prop_flat_map(|w| {
            let n = w.len();
            (Just(w), 1..=n)
        })
}

proptest! {
    #[test]
    fn servers_are_strictly_increasing_and_tile_the_line((weights, k) in weights_and_servers()) {
        let n = weights.len();
        let placement = place_servers(n, k, &weights).unwrap();
        prop_assert_eq!(placement.servers.len(), k);
        prop_assert!(placement.servers.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(placement.servers.iter().all(|&s| s < n));

        prop_assert_eq!(placement.segments.len(), k);
        prop_assert_eq!(placement.segments.first().map(|s| s.start), Some(0));
        prop_assert_eq!(placement.segments.last().map(|s| s.end), Some(n));
        prop_assert!(placement.segments.windows(2).all(|w| w[0].end == w[1].start));
        for (segment, &server) in placement.segments.iter().zip(&placement.servers) {
            prop_assert!(!segment.is_empty());
            prop_assert!(segment.contains(server));
            prop_assert_eq!(segment.server, server);
        }
    }

    #[test]
    fn more_servers_never_cost_more(weights in prop::collection::vec(0u64..30, 1..=20)) {
        let n = weights.len();
        let costs: Vec<u64> = (1..=n)
            .map(|k| place_servers(n, k, &weights).unwrap().min_cost)
            .collect();
        prop_assert!(costs.windows(2).all(|w| w[1] <= w[0]), "costs {:?}", costs);
        prop_assert_eq!(costs.last().copied(), Some(0));
    }

    #[test]
    fn repeated_runs_are_identical((weights, k) in weights_and_servers()) {
        let first = place_servers(weights.len(), k, &weights).unwrap();
        let second = place_servers(weights.len(), k, &weights).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn dp_table_is_monotone((weights, k) in weights_and_servers()) {
        let n = weights.len();
        let segments = SegmentCostTable::new(&weights).unwrap();
        let table = PlacementTable::build(&segments, k).unwrap();
        for t in 1..=k {
            for j in t..=n {
                let here = table.cost(t, j).unwrap();
                // Non-increasing in t wherever both cells are feasible.
                let fewer = table.cost(t - 1, j);
                if t > 1 || j == 0 {
                    prop_assert!(here <= fewer.unwrap());
                }
                // Non-decreasing in j.
                if j < n {
                    prop_assert!(here <= table.cost(t, j + 1).unwrap());
                }
                let p = table.split(t, j).unwrap();
                prop_assert!(p + 1 >= t && p < j);
                prop_assert_eq!(here, table.cost(t - 1, p).unwrap() + segments.cost(p, j));
            }
        }
    }

    #[test]
    fn widening_a_segment_never_lowers_its_cost(weights in prop::collection::vec(0u64..40, 1..=16)) {
        let n = weights.len();
        let table = SegmentCostTable::new(&weights).unwrap();
        for p in 0..n {
            for j in (p + 1)..=n {
                let cost = table.cost(p, j);
                if j < n {
                    prop_assert!(cost <= table.cost(p, j + 1));
                }
                if p > 0 {
                    prop_assert!(cost <= table.cost(p - 1, j));
                }
            }
        }
    }

    #[test]
    fn all_zero_weights_cost_nothing(n in 1usize..30, k_seed in 0usize..30) {
        let k = k_seed % n + 1;
        let placement = place_servers(n, k, &vec![0u64; n]).unwrap();
        prop_assert_eq!(placement.min_cost, 0);
        prop_assert_eq!(placement.servers.len(), k);
    }
}
