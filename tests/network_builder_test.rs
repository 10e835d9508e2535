//! Tests for the network builder

use std::collections::HashMap;

use rstest::rstest;

use mlmsim::domain::{build_network, DomainError, Downline, GenerationRecord, ROOT_LABEL};

fn downline(counts: &[u32]) -> Downline {
    counts
        .iter()
        .map(|&affiliate_count| GenerationRecord {
            affiliate_count,
            bv_per_affiliate: 200.0,
        })
        .collect::<Vec<_>>()
        .into()
}

#[test]
fn given_two_by_two_when_building_then_round_robin_edges() {
    let network = build_network(&downline(&[2, 2])).unwrap();

    let labels: Vec<_> = network.nodes().map(|n| n.label.as_str()).collect();
    assert_eq!(labels, vec!["self", "G1-1", "G1-2", "G2-1", "G2-2"]);

    let edges: Vec<_> = network
        .edges()
        .into_iter()
        .map(|e| (e.parent, e.child))
        .collect();
    assert_eq!(
        edges,
        vec![
            ("self".to_string(), "G1-1".to_string()),
            ("self".to_string(), "G1-2".to_string()),
            ("G1-1".to_string(), "G2-1".to_string()),
            ("G1-2".to_string(), "G2-2".to_string()),
        ]
    );
}

#[rstest]
#[case(&[5, 3, 3])]
#[case(&[1, 4, 2, 7])]
#[case(&[3, 0])]
#[case(&[])]
fn given_downline_when_building_then_one_incoming_edge_per_affiliate(#[case] counts: &[u32]) {
    let data = downline(counts);
    let network = build_network(&data).unwrap();
    let edges = network.edges();
    let expected: usize = counts.iter().map(|&c| c as usize).sum();

    assert_eq!(network.affiliate_count(), expected);
    assert_eq!(edges.len(), expected);

    let mut in_degree: HashMap<&str, usize> = HashMap::new();
    for edge in &edges {
        *in_degree.entry(edge.child.as_str()).or_default() += 1;
    }
    for node in network.nodes() {
        let degree = in_degree.get(node.label.as_str()).copied().unwrap_or(0);
        if node.label == ROOT_LABEL {
            assert_eq!(degree, 0);
        } else {
            assert_eq!(degree, 1, "{}", node.label);
        }
    }
}

#[test]
fn given_network_when_walking_to_root_then_generation_decreases_by_one() {
    let network = build_network(&downline(&[5, 3, 3])).unwrap();
    for node in network.nodes().filter(|n| n.generation > 0) {
        let parent = network.parent_of(&node.label).unwrap();
        let parent_gen = network.find(parent).unwrap().data.generation;
        assert_eq!(parent_gen + 1, node.generation);
    }
    assert_eq!(network.depth(), 4);
}

#[test]
fn given_default_fan_out_when_building_then_first_nodes_get_children() {
    let network = build_network(&downline(&[5, 3])).unwrap();
    assert_eq!(network.children_of("G1-1"), vec!["G2-1"]);
    assert_eq!(network.children_of("G1-3"), vec!["G2-3"]);
    assert!(network.children_of("G1-4").is_empty());
}

#[rstest]
#[case(&[2, 0, 3], 3)]
#[case(&[0, 1], 2)]
fn given_populated_generation_after_empty_when_building_then_invalid_topology(
    #[case] counts: &[u32],
    #[case] generation: usize,
) {
    let err = build_network(&downline(counts)).unwrap_err();
    assert!(
        matches!(err, DomainError::InvalidTopology { generation: g, .. } if g == generation),
        "{err:?}"
    );
}

#[test]
fn given_network_when_serialized_then_nodes_and_edges() {
    let network = build_network(&downline(&[1])).unwrap();
    let json = serde_json::to_value(&network).unwrap();
    assert_eq!(json["nodes"][1]["label"], "G1-1");
    assert_eq!(json["nodes"][1]["generation"], 1);
    assert_eq!(json["edges"][0]["parent"], "self");
    assert_eq!(json["edges"][0]["child"], "G1-1");
}
