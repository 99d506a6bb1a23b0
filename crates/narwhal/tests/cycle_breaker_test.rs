use narwhal::cycles;
use narwhal::ranking::{self, RankEdge, RankNode, RankingGraph};
use narwhal::{Graph, Lifeline, LifelineId, Message, MessageId, MessageKind, Origin};
use narwhal_graphlib::alg;

fn lifeline(graph: &mut Graph, name: &str) -> LifelineId {
    graph.add_lifeline(Lifeline::new(name, 40.0, 0.0))
}

fn send(graph: &mut Graph, from: LifelineId, to: LifelineId, y: f64) -> MessageId {
    graph.add_message(Message::new(from, to, MessageKind::Asynchronous, y))
}

/// a -> b, b -> c, and c -> a arriving at `a` before the first message leaves it.
fn contradictory_triangle() -> (Graph, [LifelineId; 3], [MessageId; 3]) {
    let mut graph = Graph::interaction(Origin(1));
    let a = lifeline(&mut graph, "a");
    let b = lifeline(&mut graph, "b");
    let c = lifeline(&mut graph, "c");
    let m1 = send(&mut graph, a, b, 10.0);
    let m2 = send(&mut graph, b, c, 20.0);
    let mut back = Message::new(c, a, MessageKind::Asynchronous, 30.0);
    back.target_y = 5.0;
    let m3 = graph.add_message(back);
    (graph, [a, b, c], [m1, m2, m3])
}

#[test]
fn cycle_breaker_splits_the_uppermost_message_of_a_cycle() {
    let (mut graph, [_, b, _], [m1, m2, _]) = contradictory_triangle();
    let mut rg = ranking::build(&mut graph);
    assert!(!alg::is_acyclic(&rg));

    let outcome = cycles::run(&mut graph, &mut rg);

    assert_eq!(outcome.split_nodes, 1);
    assert_eq!(outcome.dropped_edges, 0);
    assert!(alg::is_acyclic(&rg));
    assert_eq!(rg.node_count(), 4);

    let split = graph[m1].target_node.expect("m1 should have been split");
    assert_eq!(rg.node(split).unwrap().message, Some(m1));
    assert_eq!(rg.node(split).unwrap().lifeline, Some(b));
    let m2_node = graph[m2].node.unwrap();
    assert_eq!(
        rg.successors(split).collect::<Vec<_>>(),
        vec![m2_node],
        "the edge along b should leave from the target half"
    );
    assert_eq!(rg.out_edges(graph[m1].node.unwrap()).len(), 0);
}

#[test]
fn cycle_breaker_leaves_acyclic_graphs_alone() {
    let mut graph = Graph::interaction(Origin(1));
    let a = lifeline(&mut graph, "a");
    let b = lifeline(&mut graph, "b");
    send(&mut graph, a, b, 10.0);
    send(&mut graph, b, a, 20.0);
    send(&mut graph, a, b, 30.0);
    let mut rg = ranking::build(&mut graph);
    let edges = rg.edge_count();

    let outcome = cycles::run(&mut graph, &mut rg);

    assert_eq!(outcome, cycles::CycleBreaking::default());
    assert_eq!(rg.node_count(), 3);
    assert_eq!(rg.edge_count(), edges);
    assert!(graph.messages.iter().all(|m| m.target_node.is_none()));
}

#[test]
fn cycle_breaker_drops_edges_of_cycles_without_splittable_nodes() {
    let mut graph = Graph::interaction(Origin(1));
    let mut rg = RankingGraph::new();
    let s0 = rg.add_node(RankNode::spacer());
    let s1 = rg.add_node(RankNode::spacer());
    rg.add_edge(s0, s1, RankEdge::default());
    rg.add_edge(s1, s0, RankEdge::default());

    let outcome = cycles::run(&mut graph, &mut rg);

    assert_eq!(outcome.split_nodes, 0);
    assert_eq!(outcome.dropped_edges, 1);
    assert!(alg::is_acyclic(&rg));
    assert_eq!(rg.successors(s0).collect::<Vec<_>>(), vec![s1]);
}

#[test]
fn split_node_refuses_self_loops_and_already_split_nodes() {
    let mut graph = Graph::interaction(Origin(1));
    let a = lifeline(&mut graph, "a");
    let b = lifeline(&mut graph, "b");
    let own = send(&mut graph, a, a, 10.0);
    let m = send(&mut graph, a, b, 20.0);
    let mut rg = ranking::build(&mut graph);

    let own_node = graph[own].node.unwrap();
    assert_eq!(cycles::split_node(&mut graph, &mut rg, own_node), None);

    let node = graph[m].node.unwrap();
    let split = cycles::split_node(&mut graph, &mut rg, node);
    assert!(split.is_some());
    assert_eq!(rg.node(node).unwrap().lifeline, Some(a));
    assert_eq!(cycles::split_node(&mut graph, &mut rg, node), None);
}

/// Messages hop between lifelines in a fixed stride; their arrival times are a permutation of
/// the send times, so the orders on the lifelines contradict each other in many places.
fn scrambled_interaction(lifelines: usize, messages: usize) -> Graph {
    let mut graph = Graph::interaction(Origin(1));
    let ids: Vec<LifelineId> = (0..lifelines)
        .map(|i| lifeline(&mut graph, &format!("l{i}")))
        .collect();
    for i in 0..messages {
        let from = ids[i % lifelines];
        let to = ids[(i * 7 + 1) % lifelines];
        let mut msg = Message::new(from, to, MessageKind::Asynchronous, i as f64 * 10.0);
        msg.target_y = ((i * 137) % messages) as f64 * 10.0 + 5.0;
        graph.add_message(msg);
    }
    graph
}

#[test]
fn cycle_breaker_untangles_interlocking_cycles() {
    for (lifelines, messages) in [(5, 60), (12, 300)] {
        let mut graph = scrambled_interaction(lifelines, messages);
        let mut rg = ranking::build(&mut graph);
        assert!(!alg::is_acyclic(&rg));

        let outcome = cycles::run(&mut graph, &mut rg);

        assert!(alg::is_acyclic(&rg), "{lifelines} x {messages} still cyclic");
        assert_eq!(outcome.dropped_edges, 0);
        assert!(outcome.split_nodes > 1, "only {} splits", outcome.split_nodes);
        assert_eq!(rg.node_count(), messages + outcome.split_nodes);
        let split = graph.messages.iter().filter(|m| m.target_node.is_some()).count();
        assert_eq!(split, outcome.split_nodes);
    }
}
