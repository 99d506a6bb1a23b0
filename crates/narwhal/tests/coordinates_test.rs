use narwhal::coordinates::papyrus;
use narwhal::{
    Area, Attachment, Comment, CommentKind, CoordinateSystem, Destruction, Execution,
    ExecutionKind, Graph, LabelAlignment, LayoutOptions, Lifeline, LifelineId, Message, MessageId,
    MessageKind, Origin, Point, Size,
};

fn lifeline(graph: &mut Graph, name: &str, x: f64) -> LifelineId {
    let mut ll = Lifeline::new(name, 40.0, 0.0);
    ll.position.x = x;
    graph.add_lifeline(ll)
}

fn message(
    graph: &mut Graph,
    from: LifelineId,
    to: LifelineId,
    kind: MessageKind,
    y: f64,
) -> MessageId {
    graph.add_message(Message::new(from, to, kind, y))
}

fn send(graph: &mut Graph, from: LifelineId, to: LifelineId, y: f64) -> MessageId {
    message(graph, from, to, MessageKind::Asynchronous, y)
}

fn labeled(
    graph: &mut Graph,
    from: LifelineId,
    to: LifelineId,
    kind: MessageKind,
    y: f64,
    (width, height): (f64, f64),
) -> MessageId {
    graph.add_message(Message::new(from, to, kind, y).with_label(width, height))
}

fn run(graph: &mut Graph) {
    narwhal::layout(graph, &LayoutOptions::default()).unwrap();
}

#[test]
fn lifelines_are_placed_left_to_right_with_spacing() {
    let mut graph = Graph::interaction(Origin(1));
    let a = lifeline(&mut graph, "a", 0.0);
    let b = lifeline(&mut graph, "b", 100.0);
    let m = send(&mut graph, a, b, 10.0);

    run(&mut graph);

    assert_eq!(graph[a].position, Point::new(12.0, 10.0));
    assert_eq!(graph[b].position, Point::new(102.0, 10.0));
    assert_eq!(graph[m].source_point, Point::new(32.0, 90.0));
    assert_eq!(graph[m].target_point, Point::new(122.0, 90.0));
    assert_eq!(graph[a].bottom(), 140.0);
    assert_eq!(graph.size, Size::new(154.0, 152.0));
}

#[test]
fn source_center_labels_fall_back_to_the_source_at_the_last_lifeline() {
    let mut graph = Graph::interaction(Origin(1));
    let a = lifeline(&mut graph, "a", 0.0);
    let b = lifeline(&mut graph, "b", 100.0);
    let lost = graph.add_lifeline(Lifeline::dummy("lost"));
    let m1 = labeled(&mut graph, a, b, MessageKind::Asynchronous, 10.0, (30.0, 10.0));
    let m2 = labeled(&mut graph, b, lost, MessageKind::Lost, 20.0, (30.0, 10.0));

    run(&mut graph);

    assert_eq!(graph[m1].labels[0].position, Point::new(62.0, 78.0));
    assert_eq!(graph[m2].labels[0].position, Point::new(127.0, 128.0));
    assert_eq!(graph[m2].target_point.x, 167.0);
    assert!(graph.size.width >= 167.0 + 12.0);
}

#[test]
fn labels_of_leftward_messages_sit_below_the_line() {
    let mut graph = Graph::interaction(Origin(1));
    let a = lifeline(&mut graph, "a", 0.0);
    let b = lifeline(&mut graph, "b", 100.0);
    let m = labeled(&mut graph, b, a, MessageKind::Reply, 10.0, (30.0, 10.0));

    run(&mut graph);

    assert_eq!(graph[m].labels[0].position, Point::new(62.0, 92.0));
}

#[test]
fn wide_labels_widen_the_gap_to_the_next_lifeline() {
    let mut graph = Graph::interaction(Origin(1));
    let a = lifeline(&mut graph, "a", 0.0);
    let b = lifeline(&mut graph, "b", 100.0);
    labeled(&mut graph, a, b, MessageKind::Synchronous, 10.0, (120.0, 12.0));

    run(&mut graph);

    assert_eq!(graph[b].position.x - graph[a].right(), 90.0);
}

#[test]
fn diagram_width_covers_every_placed_element() {
    let mut graph = Graph::interaction(Origin(1));
    let a = lifeline(&mut graph, "a", 0.0);
    let b = lifeline(&mut graph, "b", 100.0);
    let c = lifeline(&mut graph, "c", 200.0);
    let m1 = labeled(&mut graph, a, b, MessageKind::Synchronous, 10.0, (120.0, 12.0));
    labeled(&mut graph, c, c, MessageKind::Asynchronous, 20.0, (60.0, 10.0));
    let m3 = labeled(&mut graph, c, a, MessageKind::Reply, 30.0, (50.0, 10.0));
    let exec = graph.add_execution(Execution::new(b, ExecutionKind::Execution));
    graph.attach(exec, m1);
    let mut note = Comment::new(CommentKind::Comment, Point::default(), Size::new(200.0, 20.0));
    note.attached_to.push(Attachment::Message(m3));
    graph.add_comment(note);

    run(&mut graph);

    let border = LayoutOptions::default().border_spacing;
    let width = graph.size.width;
    for ll in &graph.lifelines {
        assert!(ll.right() + border <= width, "{} sticks out", ll.name);
    }
    for msg in &graph.messages {
        assert!(msg.source_point.x + border <= width);
        assert!(msg.target_point.x + border <= width);
        for bend in &msg.bend_points {
            assert!(bend.x + border <= width);
        }
        for label in &msg.labels {
            assert!(label.position.x + label.size.width + border <= width);
        }
    }
    for e in &graph.executions {
        let right = graph[e.lifeline].position.x + e.position.x + e.size.width;
        assert!(right + border <= width);
    }
    for comment in &graph.comments {
        assert!(comment.position.x + comment.size.width + border <= width);
        assert!(comment.position.y + comment.size.height + border <= graph.size.height);
    }
}

#[test]
fn created_lifelines_start_at_their_create_message() {
    let mut graph = Graph::interaction(Origin(1));
    let a = lifeline(&mut graph, "a", 0.0);
    let b = lifeline(&mut graph, "b", 100.0);
    let m = labeled(&mut graph, a, b, MessageKind::Create, 10.0, (20.0, 10.0));

    run(&mut graph);

    let header = LayoutOptions::default().lifeline_header_height;
    assert_eq!(graph[b].position.y, graph[m].target_y - header / 2.0);
    assert_eq!(graph[b].bottom(), graph[a].bottom());
    assert_eq!(graph[m].target_point.x, graph[b].position.x);
    assert_eq!(graph[m].labels[0].position.x, 37.0, "create labels stay at the source");
}

#[test]
fn deleted_lifelines_end_at_their_delete_message() {
    let mut graph = Graph::interaction(Origin(1));
    let a = lifeline(&mut graph, "a", 0.0);
    let b = lifeline(&mut graph, "b", 100.0);
    let c = lifeline(&mut graph, "c", 200.0);
    graph[b].destruction = Some(Destruction {
        size: Size::new(20.0, 20.0),
        ..Default::default()
    });
    send(&mut graph, a, b, 10.0);
    let delete = message(&mut graph, a, b, MessageKind::Delete, 20.0);
    send(&mut graph, a, c, 30.0);

    run(&mut graph);

    let deleted_at = graph[delete].target_y;
    assert_eq!(deleted_at, 140.0);
    assert!(graph[b].bottom() <= deleted_at);
    assert_eq!(graph[c].bottom(), 240.0);

    let marker = graph[b].destruction.as_ref().unwrap();
    assert_eq!(marker.position, Point::new(112.0, 120.0));
}

#[test]
fn overlapping_executions_are_offset_horizontally() {
    let mut graph = Graph::interaction(Origin(1));
    let a = lifeline(&mut graph, "a", 0.0);
    let mut outer = Execution::new(a, ExecutionKind::Execution);
    outer.position.y = 0.0;
    outer.size.height = 100.0;
    let mut inner = Execution::new(a, ExecutionKind::Execution);
    inner.position.y = 20.0;
    inner.size.height = 40.0;
    let outer = graph.add_execution(outer);
    let inner = graph.add_execution(inner);

    run(&mut graph);

    assert_eq!(graph[outer].position.x, 12.0);
    assert_eq!(graph[inner].position.x, 20.0);
    assert_ne!(graph[outer].position.x, graph[inner].position.x);
    assert_eq!(graph[inner].size.width, 16.0);
}

#[test]
fn executions_with_identical_extents_are_staggered() {
    let mut graph = Graph::interaction(Origin(1));
    let a = lifeline(&mut graph, "a", 0.0);
    let b = lifeline(&mut graph, "b", 100.0);
    let call = message(&mut graph, a, b, MessageKind::Synchronous, 10.0);
    let reply = message(&mut graph, b, a, MessageKind::Reply, 20.0);
    let first = graph.add_execution(Execution::new(b, ExecutionKind::Execution));
    let second = graph.add_execution(Execution::new(b, ExecutionKind::Execution));
    for e in [first, second] {
        graph.attach(e, call);
        graph.attach(e, reply);
    }
    let mut later = Execution::new(b, ExecutionKind::Execution);
    later.position.y = 110.0;
    later.size.height = 100.0;
    let later = graph.add_execution(later);

    run(&mut graph);

    assert_eq!(graph[first].position, Point::new(12.0, 90.0));
    assert_eq!(graph[second].position, Point::new(20.0, 90.0));
    assert_eq!(graph[first].size, graph[second].size);
    assert_eq!(graph[later].position.x, 28.0);
}

#[test]
fn partially_overlapping_executions_are_staggered() {
    let mut graph = Graph::interaction(Origin(1));
    let a = lifeline(&mut graph, "a", 0.0);
    let extents = [(0.0, 60.0), (40.0, 60.0), (100.0, 50.0)];
    let ids = extents.map(|(y, height)| {
        let mut exec = Execution::new(a, ExecutionKind::Execution);
        exec.position.y = y;
        exec.size.height = height;
        graph.add_execution(exec)
    });

    run(&mut graph);

    assert_eq!(ids.map(|e| graph[e].position.x), [12.0, 20.0, 12.0]);
}

#[test]
fn labels_follow_a_source_snapped_to_its_execution() {
    let mut graph = Graph::interaction(Origin(1));
    let a = lifeline(&mut graph, "a", 0.0);
    let b = lifeline(&mut graph, "b", 100.0);
    let call = labeled(&mut graph, a, b, MessageKind::Synchronous, 10.0, (30.0, 10.0));
    let exec = graph.add_execution(Execution::new(a, ExecutionKind::Execution));
    graph.attach(exec, call);
    let options = LayoutOptions {
        label_alignment: LabelAlignment::Source,
        ..Default::default()
    };

    narwhal::layout(&mut graph, &options).unwrap();

    let exec_right = graph[a].position.x + graph[exec].position.x + graph[exec].size.width;
    assert_eq!(graph[call].source_point.x, 40.0);
    assert_eq!(exec_right, 40.0);
    assert_eq!(graph[call].labels[0].position.x, 45.0);
}

#[test]
fn executions_span_their_messages_and_catch_the_endpoints() {
    let mut graph = Graph::interaction(Origin(1));
    let a = lifeline(&mut graph, "a", 0.0);
    let b = lifeline(&mut graph, "b", 100.0);
    let call = message(&mut graph, a, b, MessageKind::Synchronous, 10.0);
    let reply = message(&mut graph, b, a, MessageKind::Reply, 20.0);
    let exec = graph.add_execution(Execution::new(b, ExecutionKind::Execution));
    graph.attach(exec, call);
    graph.attach(exec, reply);
    let mut short = Execution::new(a, ExecutionKind::Duration);
    short.size = Size::new(30.0, 5.0);
    let short = graph.add_execution(short);

    run(&mut graph);

    assert_eq!(graph[exec].position, Point::new(12.0, 90.0));
    assert_eq!(graph[exec].size, Size::new(16.0, 50.0));
    assert_eq!(graph[call].target_point.x, 114.0);
    assert_eq!(graph[reply].source_point.x, 114.0);
    assert_eq!(graph[short].size, Size::new(30.0, 20.0));
}

#[test]
fn self_loops_bend_to_the_right_and_follow_their_execution() {
    let mut graph = Graph::interaction(Origin(1));
    let a = lifeline(&mut graph, "a", 0.0);
    let b = lifeline(&mut graph, "b", 0.0);
    let plain = labeled(&mut graph, a, a, MessageKind::Asynchronous, 10.0, (20.0, 10.0));
    let nested = labeled(&mut graph, b, b, MessageKind::Synchronous, 10.0, (20.0, 10.0));
    let exec = graph.add_execution(Execution::new(b, ExecutionKind::Execution));
    graph.attach(exec, nested);

    run(&mut graph);

    let msg = &graph[plain];
    assert_eq!(msg.source_point, Point::new(32.0, 90.0));
    assert_eq!(msg.target_point, Point::new(32.0, 115.0));
    assert_eq!(msg.bend_points, vec![Point::new(57.0, 90.0), Point::new(57.0, 115.0)]);
    assert_eq!(msg.labels[0].position, Point::new(62.0, 95.0));

    let b_center = graph[b].center_x();
    let msg = &graph[nested];
    assert_eq!(msg.source_point.x, b_center + 8.0);
    assert_eq!(msg.bend_points[0].x, b_center + 33.0);
    assert_eq!(msg.labels[0].position.x, b_center + 38.0);
    assert_eq!(graph[exec].position.y, 90.0);
    assert_eq!(graph[exec].size.height, 25.0);
}

#[test]
fn found_and_gate_messages_reach_the_diagram_borders() {
    let mut graph = Graph::interaction(Origin(1));
    let found = graph.add_lifeline(Lifeline::dummy("found"));
    let a = lifeline(&mut graph, "a", 0.0);
    let gate = graph.add_lifeline(Lifeline::dummy("gate"));
    let incoming = message(&mut graph, found, a, MessageKind::Found, 10.0);
    let outgoing = send(&mut graph, a, gate, 20.0);

    run(&mut graph);

    assert_eq!(graph[a].position.x, 37.0);
    assert_eq!(graph[incoming].source_point.x, 12.0);
    assert_eq!(graph[incoming].target_point.x, 57.0);
    assert_eq!(graph[outgoing].target_point.x, graph.size.width);
}

#[test]
fn operands_split_their_fragment_vertically() {
    let mut graph = Graph::interaction(Origin(1));
    let a = lifeline(&mut graph, "a", 0.0);
    let b = lifeline(&mut graph, "b", 100.0);
    let m1 = send(&mut graph, a, b, 10.0);
    let m2 = send(&mut graph, a, b, 20.0);
    let first = graph.add_area(Area {
        lifelines: vec![a, b],
        messages: vec![m1],
        ..Default::default()
    });
    let second = graph.add_area(Area {
        lifelines: vec![a, b],
        messages: vec![m2],
        ..Default::default()
    });
    let fragment = graph.add_area(Area {
        lifelines: vec![a, b],
        messages: vec![m1, m2],
        sub_areas: vec![first, second],
        ..Default::default()
    });

    run(&mut graph);

    assert_eq!(graph[m1].source_y, 140.0, "the header reserves one layer");
    let area = &graph[fragment];
    assert_eq!(area.position, Point::new(7.0, 115.0));
    assert_eq!(area.size, Size::new(140.0, 100.0));
    assert_eq!(graph[first].position, Point::new(7.0, 140.0));
    assert_eq!(graph[first].size, Size::new(140.0, 25.0));
    assert_eq!(graph[second].position, Point::new(7.0, 165.0));
    assert_eq!(graph[second].size, Size::new(140.0, 50.0));
}

#[test]
fn containing_areas_wrap_nested_ones() {
    let mut graph = Graph::interaction(Origin(1));
    let a = lifeline(&mut graph, "a", 0.0);
    let b = lifeline(&mut graph, "b", 100.0);
    let m1 = send(&mut graph, a, b, 10.0);
    let m2 = send(&mut graph, a, b, 20.0);
    let inner = graph.add_area(Area {
        lifelines: vec![a, b],
        messages: vec![m2],
        ..Default::default()
    });
    let outer = graph.add_area(Area {
        lifelines: vec![a, b],
        messages: vec![m1, m2],
        contained_areas: vec![inner],
        ..Default::default()
    });

    run(&mut graph);

    let offset = LayoutOptions::default().containment_offset;
    let (i, o) = (&graph[inner], &graph[outer]);
    assert!(o.position.x <= i.position.x - offset);
    assert!(o.position.y <= i.position.y - offset);
    assert!(o.position.x + o.size.width >= i.position.x + i.size.width + offset);
    assert!(o.position.y + o.size.height >= i.position.y + i.size.height + offset);
    assert_eq!(o.position, Point::new(2.0, 65.0));
}

#[test]
fn empty_areas_sit_above_their_next_message() {
    let mut graph = Graph::interaction(Origin(1));
    let a = lifeline(&mut graph, "a", 0.0);
    let b = lifeline(&mut graph, "b", 100.0);
    let m1 = send(&mut graph, a, b, 10.0);
    let m2 = send(&mut graph, a, b, 20.0);
    let empty = graph.add_area(Area {
        lifelines: vec![a],
        next_message: Some(m2),
        ..Default::default()
    });

    run(&mut graph);

    assert_eq!(graph[m2].source_y, 240.0);
    let area = &graph[empty];
    assert_eq!(area.position, Point::new(7.0, 140.0));
    assert_eq!(area.size, Size::new(50.0, 75.0));
    assert!(area.position.y > graph[m1].source_y);
}

#[test]
fn message_comments_hang_above_their_message() {
    let mut graph = Graph::interaction(Origin(1));
    let a = lifeline(&mut graph, "a", 0.0);
    let b = lifeline(&mut graph, "b", 100.0);
    send(&mut graph, a, b, 10.0);
    let m2 = send(&mut graph, a, b, 20.0);
    let mut note = Comment::new(CommentKind::Comment, Point::default(), Size::new(60.0, 30.0));
    note.attached_to.push(Attachment::Message(m2));
    let c = graph.add_comment(note);

    run(&mut graph);

    assert_eq!(graph[m2].source_y, 190.0);
    assert_eq!(graph[m2].comments, vec![c]);
    let comment = &graph[c];
    assert_eq!(comment.message, Some(m2));
    assert_eq!(comment.position, Point::new(47.0, 155.0));
    let connection = comment.connection.unwrap();
    assert_eq!(connection.source, Point::new(77.0, 185.0));
    assert_eq!(connection.target, Point::new(77.0, 190.0));
}

#[test]
fn time_observations_snap_to_the_nearest_message() {
    let mut graph = Graph::interaction(Origin(1));
    let a = lifeline(&mut graph, "a", 0.0);
    let b = lifeline(&mut graph, "b", 100.0);
    send(&mut graph, a, b, 10.0);
    let m2 = send(&mut graph, b, a, 20.0);
    let c = graph.add_comment(Comment::new(
        CommentKind::TimeObservation,
        Point::new(150.0, 12.0),
        Size::new(10.0, 16.0),
    ));

    let stats = narwhal::layout(&mut graph, &LayoutOptions::default()).unwrap();

    assert_eq!(stats.resolved_anchors, 1);
    let comment = &graph[c];
    assert_eq!(comment.lifeline, Some(b));
    assert_eq!(comment.message, Some(m2));
    assert_eq!(comment.size.width, 20.0);
    assert_eq!(comment.position, Point::new(138.0, 132.0));
    let connection = comment.connection.unwrap();
    assert_eq!(connection.source, Point::new(138.0, 140.0));
    assert_eq!(connection.target, Point::new(122.0, 140.0));
}

#[test]
fn papyrus_coordinates_are_relative_to_the_execution() {
    let mut graph = Graph::interaction(Origin(1));
    let a = lifeline(&mut graph, "a", 0.0);
    let b = lifeline(&mut graph, "b", 100.0);
    let call = message(&mut graph, a, b, MessageKind::Synchronous, 10.0);
    let reply = message(&mut graph, b, a, MessageKind::Reply, 20.0);
    let exec = graph.add_execution(Execution::new(b, ExecutionKind::Execution));
    graph.attach(exec, call);
    graph.attach(exec, reply);
    let options = LayoutOptions {
        coordinate_system: CoordinateSystem::Papyrus,
        ..Default::default()
    };

    narwhal::layout(&mut graph, &options).unwrap();

    assert_eq!(graph[call].target_point.y, 0.0);
    assert_eq!(graph[reply].source_point.y, 190.0);
    assert_eq!(graph[call].source_point.y, 90.0, "unattached ends stay absolute");
}

#[test]
fn papyrus_scale_factor_treats_degenerate_spans_as_identity() {
    assert_eq!(papyrus::scale_factor(160.0, 50.0), 3.2);
    assert_eq!(papyrus::scale_factor(160.0, 0.0), 1.0);
    assert_eq!(papyrus::scale_factor(160.0, f64::NAN), 1.0);
}
