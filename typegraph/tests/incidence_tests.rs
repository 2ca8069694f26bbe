//! Tests for per-vertex incidence lists

#[path = "testutils/mod.rs"]
mod testutils;

use std::collections::BTreeSet;
use testutils::graph_fixture::{incidence_ids, incidence_ids_backward, GraphFixture};
use typegraph::{EdgeDirection, GraphError, IncidenceFilter};

#[test]
fn test_put_incidence_before_reorders_only_x() {
    let mut fixture = GraphFixture::new();
    let v = fixture.stations(5);
    let hub = v[0];
    let edges: Vec<_> = v[1..].iter().map(|&w| fixture.track(hub, w)).collect();
    let incoming = fixture.track(v[3], hub);

    let before: BTreeSet<i32> = incidence_ids(&fixture.graph, hub).into_iter().collect();
    assert_eq!(incidence_ids(&fixture.graph, hub), vec![1, 2, 3, 4, -5]);

    fixture
        .graph
        .put_incidence_before(incoming.reversed(), edges[1])
        .unwrap();

    let after = incidence_ids(&fixture.graph, hub);
    assert_eq!(after, vec![1, -5, 2, 3, 4]);
    assert_eq!(after.iter().copied().collect::<BTreeSet<_>>(), before);
    assert_eq!(incidence_ids_backward(&fixture.graph, hub), after);
    assert!(fixture
        .graph
        .is_before_incidence(incoming.reversed(), edges[1])
        .unwrap());
    assert_eq!(fixture.graph.last_incidence(hub).unwrap(), Some(edges[3]));
}

#[test]
fn test_put_incidence_after() {
    let mut fixture = GraphFixture::new();
    let v = fixture.stations(4);
    let edges: Vec<_> = v[1..].iter().map(|&w| fixture.track(v[0], w)).collect();

    fixture.graph.put_incidence_after(edges[0], edges[2]).unwrap();
    assert_eq!(incidence_ids(&fixture.graph, v[0]), vec![2, 3, 1]);
    assert!(fixture.graph.is_after_incidence(edges[0], edges[2]).unwrap());

    let version = fixture.graph.incidence_list_version(v[0]).unwrap();
    fixture.graph.put_incidence_after(edges[0], edges[2]).unwrap();
    assert!(!fixture
        .graph
        .is_incidence_list_modified(v[0], version)
        .unwrap());
}

#[test]
fn test_incidences_at_other_vertex_are_rejected() {
    let (mut fixture, _, edges) = GraphFixture::ring(3);
    let graph_version = fixture.graph.graph_version();
    let err = fixture
        .graph
        .put_incidence_before(edges[0], edges[1])
        .unwrap_err();
    assert!(matches!(err, GraphError::IncidenceMismatch { .. }));
    assert_eq!(fixture.graph.graph_version(), graph_version);

    // e1 reversed and e2 both sit at v2
    fixture
        .graph
        .put_incidence_before(edges[1], edges[0].reversed())
        .unwrap();
    let v2 = fixture.graph.this(edges[1]).unwrap();
    assert_eq!(fixture.graph.first_incidence(v2).unwrap(), Some(edges[1]));
}

#[test]
fn test_self_loop_counts_twice() {
    let mut fixture = GraphFixture::new();
    let v = fixture.stations(2);
    let other = fixture.track(v[0], v[1]);
    let self_loop = fixture.track(v[0], v[0]);
    let graph = &mut fixture.graph;

    assert_eq!(incidence_ids(graph, v[0]), vec![1, 2, -2]);
    assert_eq!(graph.degree(v[0]).unwrap(), 3);
    assert_eq!(graph.degree_in_direction(v[0], EdgeDirection::Out).unwrap(), 2);
    assert_eq!(graph.degree_in_direction(v[0], EdgeDirection::In).unwrap(), 1);
    assert_eq!(graph.this(self_loop.reversed()).unwrap(), v[0]);
    assert_eq!(graph.that(self_loop.reversed()).unwrap(), v[0]);

    graph.delete_edge(self_loop).unwrap();
    assert_eq!(graph.degree(v[0]).unwrap(), 1);
    assert_eq!(graph.degree(v[1]).unwrap(), 1);
    assert_eq!(graph.first_incidence(v[0]).unwrap(), Some(other));
}

#[test]
fn test_this_and_that() {
    let mut fixture = GraphFixture::new();
    let v = fixture.stations(2);
    let e = fixture.track(v[0], v[1]);
    let graph = &fixture.graph;

    assert_eq!(graph.this(e).unwrap(), v[0]);
    assert_eq!(graph.that(e).unwrap(), v[1]);
    assert_eq!(graph.this(e.reversed()).unwrap(), v[1]);
    assert_eq!(graph.that(e.reversed()).unwrap(), v[0]);
    assert_eq!(graph.first_incidence(v[1]).unwrap(), Some(e.reversed()));
}

#[test]
fn test_filtered_incidence_walk() {
    let mut fixture = GraphFixture::new();
    let hub_a = fixture.graph.create_vertex(fixture.hub).unwrap();
    let hub_b = fixture.graph.create_vertex(fixture.hub).unwrap();
    let station = fixture.graph.create_vertex(fixture.station).unwrap();

    let t_out = fixture.track(hub_a, station);
    let x_out = fixture
        .graph
        .create_edge(fixture.express, hub_a, hub_b)
        .unwrap();
    let t_in = fixture.track(station, hub_a);
    let x_in = fixture
        .graph
        .create_edge(fixture.express, hub_b, hub_a)
        .unwrap();
    let graph = &fixture.graph;

    let express_in = IncidenceFilter::of_type(fixture.express).with_direction(EdgeDirection::In);
    assert_eq!(
        graph.first_incidence_matching(hub_a, &express_in).unwrap(),
        Some(x_in.reversed())
    );
    assert_eq!(graph.degree_with(hub_a, &express_in).unwrap(), 1);

    let tracks = IncidenceFilter::of_type(fixture.track);
    let all: Vec<_> = graph.incidences_matching(hub_a, tracks).unwrap().collect();
    assert_eq!(all, vec![t_out, x_out, t_in.reversed(), x_in.reversed()]);

    let exact_tracks = IncidenceFilter::of_exact_type(fixture.track);
    assert_eq!(
        graph.last_incidence_matching(hub_a, &exact_tracks).unwrap(),
        Some(t_in.reversed())
    );
    assert_eq!(
        graph.prev_incidence_matching(t_in.reversed(), &exact_tracks).unwrap(),
        Some(t_out)
    );
    assert_eq!(
        graph.next_incidence_matching(t_out, &exact_tracks).unwrap(),
        Some(t_in.reversed())
    );

    let out = IncidenceFilter::direction(EdgeDirection::Out);
    let total = graph.degree(hub_a).unwrap();
    let outgoing = graph.degree_with(hub_a, &out).unwrap();
    let incoming = graph.degree_in_direction(hub_a, EdgeDirection::In).unwrap();
    assert_eq!(total, outgoing + incoming);
}

#[test]
fn test_set_alpha_appends_to_new_list() {
    let mut fixture = GraphFixture::new();
    let v = fixture.stations(3);
    let e1 = fixture.track(v[0], v[1]);
    let e2 = fixture.track(v[2], v[1]);
    let untouched = fixture.graph.incidence_list_version(v[1]).unwrap();

    fixture.graph.set_alpha(e1, v[2]).unwrap();
    assert_eq!(fixture.graph.alpha(e1).unwrap(), v[2]);
    assert_eq!(incidence_ids(&fixture.graph, v[2]), vec![2, 1]);
    assert_eq!(fixture.graph.degree(v[0]).unwrap(), 0);
    assert_eq!(
        fixture.graph.incidence_list_version(v[1]).unwrap(),
        untouched
    );

    // omega of the reversed view is the record's alpha
    fixture.graph.set_omega(e2.reversed(), v[0]).unwrap();
    assert_eq!(fixture.graph.alpha(e2).unwrap(), v[0]);
    assert_eq!(incidence_ids(&fixture.graph, v[0]), vec![2]);

    let version = fixture.graph.graph_version();
    fixture.graph.set_alpha(e2, v[0]).unwrap();
    assert_eq!(fixture.graph.graph_version(), version);
}

#[test]
fn test_sort_by_far_vertex() {
    let mut fixture = GraphFixture::new();
    let v = fixture.stations(5);
    for &w in v[1..].iter().rev() {
        fixture.track(w, v[0]);
    }
    assert_eq!(incidence_ids(&fixture.graph, v[0]), vec![-1, -2, -3, -4]);

    let changed = fixture
        .graph
        .sort_incidences(v[0], |g, x, y| {
            let fx = g.that(x).map(|w| w.id()).unwrap_or(0);
            let fy = g.that(y).map(|w| w.id()).unwrap_or(0);
            fx.cmp(&fy)
        })
        .unwrap();
    assert!(changed);
    assert_eq!(incidence_ids(&fixture.graph, v[0]), vec![-4, -3, -2, -1]);
    assert_eq!(incidence_ids_backward(&fixture.graph, v[0]), vec![-4, -3, -2, -1]);
}

#[test]
fn test_sort_keeps_ties_in_list_order() {
    let mut fixture = GraphFixture::new();
    let v = fixture.stations(3);
    let e1 = fixture.track(v[0], v[1]);
    let e2 = fixture.track(v[0], v[2]);
    let e3 = fixture.track(v[0], v[1]);
    let e4 = fixture.track(v[0], v[2]);
    let e5 = fixture.track(v[0], v[1]);
    assert_eq!(incidence_ids(&fixture.graph, v[0]), vec![1, 2, 3, 4, 5]);

    let changed = fixture
        .graph
        .sort_incidences(v[0], |g, x, y| {
            let fx = g.that(x).map(|w| w.id()).unwrap_or(0);
            let fy = g.that(y).map(|w| w.id()).unwrap_or(0);
            fx.cmp(&fy)
        })
        .unwrap();
    assert!(changed);
    let expected: Vec<i32> = [e1, e3, e5, e2, e4].iter().map(|e| e.id()).collect();
    assert_eq!(incidence_ids(&fixture.graph, v[0]), expected);
    assert_eq!(incidence_ids_backward(&fixture.graph, v[0]), expected);
}
