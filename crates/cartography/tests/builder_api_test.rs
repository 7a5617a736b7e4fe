//! Integration tests for the Cartographer API
//!
//! These tests drive the public facade end to end: graph construction,
//! layout with both engines and all directions, configuration and
//! cancellation.

use serde_json::json;

use cartography::{
    CancellationToken, Cartographer, CartographyError,
    config::{AppConfig, LayoutConfig, StyleConfig},
    layout::{Direction, LayoutEngineKind, PathShape},
    resource::Resource,
    structure::Relationship,
};

fn three_tier() -> Vec<Resource> {
    vec![
        Resource::new("vpc", "aws_vpc", "main", "aws"),
        Resource::new("sg", "aws_security_group", "web-sg", "aws").with_dependency("vpc"),
        Resource::new("web", "aws_instance", "web", "aws").with_dependency("sg"),
    ]
}

fn cartographer(engine: LayoutEngineKind, direction: Direction) -> Cartographer {
    let layout = LayoutConfig::default()
        .with_engine(engine)
        .with_direction(direction);
    Cartographer::new(AppConfig::new(layout, StyleConfig::default()))
}

#[test]
fn test_builder_api_exists() {
    let _cartographer = Cartographer::default();
}

#[test]
fn test_three_layers_top_to_bottom() {
    let diagram = Cartographer::default().generate(&three_tier());
    let (graph, layout) = diagram.into_parts();

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(layout.layer_count(), 3);

    let ys: Vec<f32> = ["vpc", "sg", "web"]
        .iter()
        .map(|id| layout.node(id).expect("node laid out").position().y())
        .collect();
    assert!(ys[0] < ys[1] && ys[1] < ys[2], "layers should descend: {ys:?}");

    assert_eq!(layout.edges().len(), 2);
    for edge in layout.edges() {
        assert!(edge.points().len() >= 2);
    }

    let relationships: Vec<Relationship> =
        graph.edges().iter().map(|edge| edge.relationship()).collect();
    assert_eq!(relationships, vec![Relationship::Contains, Relationship::Protects]);
}

#[test]
fn test_layout_keys_match_graph() {
    let resources = vec![
        Resource::new("vpc", "aws_vpc", "vpc", "aws"),
        Resource::new("key", "tls_private_key", "key", "tls"),
        Resource::new("bucket", "aws_s3_bucket", "bucket", "aws"),
        Resource::new("web", "aws_instance", "web", "aws")
            .with_dependency("vpc")
            .with_dependency("key")
            .with_dependency("nowhere"),
    ];

    let diagram = Cartographer::default().generate(&resources);

    let graph_ids: Vec<&str> = diagram.graph().node_ids().collect();
    let layout_ids: Vec<&str> = diagram.layout().nodes().keys().map(String::as_str).collect();
    assert_eq!(graph_ids, vec!["vpc", "bucket", "web"]);
    assert_eq!(layout_ids, graph_ids);
    assert_eq!(diagram.graph().edge_count(), 1);
}

#[test]
fn test_graph_without_edges() {
    let resources = vec![
        Resource::new("a", "aws_s3_bucket", "a", "aws"),
        Resource::new("b", "aws_s3_bucket", "b", "aws"),
    ];

    let layout = Cartographer::default().generate(&resources).into_parts().1;

    assert!(layout.width() > 0.0);
    assert!(layout.height() > 0.0);
    assert!(layout.edges().is_empty());
    assert_eq!(layout.nodes().len(), 2);
}

#[test]
fn test_shared_target_end_anchors_are_symmetric() {
    let resources = vec![
        Resource::new("lb", "aws_lb", "lb", "aws"),
        Resource::new("bucket", "aws_s3_bucket", "assets", "aws"),
        Resource::new("web", "aws_instance", "web", "aws")
            .with_dependency("lb")
            .with_dependency("bucket"),
    ];

    let layout = Cartographer::default().generate(&resources).into_parts().1;

    let center = layout.node("web").expect("web laid out").center().x();
    let offsets: Vec<f32> = layout
        .edges()
        .iter()
        .filter(|edge| edge.to() == "web")
        .filter_map(|edge| edge.end())
        .map(|end| end.x() - center)
        .collect();

    assert_eq!(offsets.len(), 2);
    assert!(offsets[0] != offsets[1]);
    assert!((offsets[0] + offsets[1]).abs() < 1e-3, "offsets {offsets:?}");
}

#[test]
fn test_firewall_droplets_create_implicit_edge() {
    let resources = vec![
        Resource::new("fw", "digitalocean_firewall", "web-fw", "digitalocean")
            .with_attribute("droplet_ids", json!([4242]))
            .with_attribute(
                "inbound_rule",
                json!([{ "protocol": "tcp", "port_range": "443" }]),
            ),
        Resource::new("web", "digitalocean_droplet", "web", "digitalocean")
            .with_attribute("id", "4242"),
    ];

    let graph = Cartographer::default().build_graph(&resources);

    assert_eq!(graph.edge_count(), 1);
    let edge = &graph.edges()[0];
    assert_eq!((edge.from(), edge.to()), ("fw", "web"));
    assert_eq!(edge.relationship(), Relationship::Protects);
    assert_eq!(edge.label(), "protects :443 tcp");
}

#[test]
fn test_firewall_and_load_balancer_above_listed_droplet() {
    let resources = vec![
        Resource::new("droplet", "digitalocean_droplet", "web", "digitalocean")
            .with_attribute("id", "1001"),
        Resource::new("fw", "digitalocean_firewall", "web-fw", "digitalocean")
            .with_attribute("droplet_ids", json!(["1001"]))
            .with_dependency("droplet"),
        Resource::new("lb", "digitalocean_loadbalancer", "web-lb", "digitalocean")
            .with_attribute("droplet_ids", json!(["1001"]))
            .with_dependency("droplet"),
    ];

    let diagram = Cartographer::default().generate(&resources);
    let graph = diagram.graph();
    let layout = diagram.layout();

    assert_eq!(graph.edge_count(), 2);
    assert!(graph.has_edge("fw", "droplet"));
    assert!(graph.has_edge("lb", "droplet"));

    let layer = |id: &str| layout.node(id).expect("node laid out").layer();
    assert_eq!(layer("fw"), 0);
    assert_eq!(layer("lb"), 0);
    assert_eq!(layer("droplet"), 1);
}

#[test]
fn test_all_directions_and_engines() {
    let directions = [
        Direction::TopToBottom,
        Direction::BottomToTop,
        Direction::LeftToRight,
        Direction::RightToLeft,
    ];

    for engine in [LayoutEngineKind::Hierarchical, LayoutEngineKind::Basic] {
        for direction in directions {
            let diagram = cartographer(engine, direction).generate(&three_tier());
            let layout = diagram.layout();

            assert_eq!(layout.direction(), direction);
            assert_eq!(layout.nodes().len(), 3, "{engine} {direction}");
            assert_eq!(layout.edges().len(), 2, "{engine} {direction}");
            for edge in layout.edges() {
                assert!(edge.points().len() >= 2);
            }

            let vpc = layout.node("vpc").expect("vpc").center();
            let web = layout.node("web").expect("web").center();
            match direction {
                Direction::TopToBottom => assert!(vpc.y() < web.y()),
                Direction::BottomToTop => assert!(vpc.y() > web.y()),
                Direction::LeftToRight => assert!(vpc.x() < web.x()),
                Direction::RightToLeft => assert!(vpc.x() > web.x()),
            }
        }
    }
}

#[test]
fn test_basic_engine_draws_straight_edges() {
    let diagram =
        cartographer(LayoutEngineKind::Basic, Direction::TopToBottom).generate(&three_tier());

    assert!(
        diagram
            .layout()
            .edges()
            .iter()
            .all(|edge| edge.shape() == PathShape::Straight && edge.points().len() == 2)
    );
}

#[test]
fn test_config_from_toml() {
    let config = AppConfig::from_toml_str(
        r#"
        [layout]
        engine = "basic"
        direction = "LR"
        node_width = 100
        node_height = 50
        horizontal_spacing = 20
        vertical_spacing = 10
        "#,
    )
    .expect("valid config");

    let layout = Cartographer::new(config).generate(&three_tier()).into_parts().1;

    // Main step along x: 100 + 20, no spacing scale for the basic engine.
    let sg = layout.node("sg").expect("sg laid out");
    assert_eq!(sg.position().x(), 120.0);
    assert_eq!(sg.size().height(), 50.0);
}

#[test]
fn test_invalid_config_rejected() {
    let result = AppConfig::from_toml_str("[layout]\nhorizontal_spacing = 0\n");
    assert!(matches!(result, Err(CartographyError::InvalidConfig(_))));

    let result = AppConfig::from_toml_str("[layout\n");
    assert!(matches!(result, Err(CartographyError::ConfigParse(_))));
}

#[test]
fn test_cancelled_generation() {
    let token = CancellationToken::new();
    token.cancel();

    let outcome = Cartographer::default().generate_with_cancel(&three_tier(), Some(&token));

    assert!(outcome.is_cancelled());
    let diagram = outcome.clone().into_inner();
    let graph_ids: Vec<&str> = diagram.graph().node_ids().collect();
    let layout_ids: Vec<&str> = diagram.layout().nodes().keys().map(String::as_str).collect();
    assert_eq!(layout_ids, graph_ids);
    assert!(diagram.layout().edges().is_empty());
    assert!(outcome.complete().is_none());
}

#[test]
fn test_cancelled_layout_keeps_nodes() {
    let cartographer = Cartographer::default();
    let graph = cartographer.build_graph(&three_tier());
    let token = CancellationToken::new();
    token.cancel();

    let outcome = cartographer.layout_with_cancel(&graph, Some(&token));

    assert!(outcome.is_cancelled());
    let layout = outcome.into_inner();
    assert_eq!(layout.nodes().len(), 3);
    assert!(layout.edges().is_empty());

    let err = cartographer
        .layout_with_cancel(&graph, Some(&token))
        .into_result("layout")
        .unwrap_err();
    assert_eq!(err.to_string(), "Operation cancelled during layout");
}

#[test]
fn test_diagram_serializes_to_json() {
    let diagram = Cartographer::default().generate(&three_tier());

    let value = serde_json::to_value(&diagram).expect("serializable");

    assert!(value["graph"]["nodes"]["vpc"].is_object());
    assert_eq!(value["graph"]["nodes"]["web"]["type"], "aws_instance");
    assert_eq!(value["layout"]["direction"], "TB");
    assert_eq!(value["layout"]["edges"].as_array().map(Vec::len), Some(2));
}
