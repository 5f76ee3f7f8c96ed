use std::fs;
use std::path::Path;

use render_workflow_rs::connector::ConnectorPath;
use render_workflow_rs::{
    export, render, ImageFormat, NodeKind, RenderOptions, Scene, Workflow, WorkflowNode,
};

fn fixture() -> Workflow {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("signup.json");
    let json = fs::read_to_string(&path).expect("read fixture");
    Workflow::from_json(&json).expect("parse fixture")
}

fn three_step() -> Workflow {
    Workflow::new(
        "user_journey",
        vec![
            WorkflowNode::new("start", NodeKind::Start, "Start").connect("p1"),
            WorkflowNode::new("p1", NodeKind::Process, "Process").connect("end"),
            WorkflowNode::new("end", NodeKind::End, "End"),
        ],
    )
}

#[test]
fn three_node_chain_renders_and_exports() {
    let workflow = three_step();
    let scene = Scene::build(&workflow);
    let cells: Vec<_> = scene.nodes.iter().map(|n| (n.row, n.column)).collect();
    assert_eq!(cells, vec![(0, 0), (0, 1), (0, 2)]);
    assert_eq!(scene.connectors.len(), 2);
    assert!(scene
        .connectors
        .iter()
        .all(|c| c.path == ConnectorPath::Straight));

    let rendered = render(&workflow, &RenderOptions::default()).unwrap();
    assert_eq!(rendered.stats.nodes, 3);
    assert_eq!(rendered.stats.connectors, 2);
    let png = export(&rendered.raster, ImageFormat::Png).unwrap();
    assert!(!png.is_empty());
    assert!(png.starts_with(b"\x89PNG\r\n\x1a\n"));
}

#[test]
fn ghost_connection_only_drops_itself() {
    let mut workflow = three_step();
    workflow.workflow_nodes[0].connections.push("ghost".to_string());

    let scene = Scene::build(&workflow);
    assert_eq!(scene.connectors.len(), 2);
    assert_eq!(scene.skipped_connections, 1);

    let with_ghost = render(&workflow, &RenderOptions::default()).unwrap();
    let without_ghost = render(&three_step(), &RenderOptions::default()).unwrap();
    assert_eq!(with_ghost.stats.skipped_connections, 1);
    assert_eq!(with_ghost.raster, without_ghost.raster);
}

#[test]
fn fixture_wraps_rows_and_curves_across_them() {
    let workflow = fixture();
    let payment = &workflow.workflow_nodes[5];
    assert_eq!(payment.kind, NodeKind::Process);
    assert_eq!(payment.badge_text(), "PAYMENT");

    let scene = Scene::build(&workflow);
    assert_eq!(scene.nodes.len(), 7);
    assert_eq!((scene.nodes[5].row, scene.nodes[5].column), (1, 0));
    assert_eq!(scene.skipped_connections, 1);
    assert_eq!(scene.connectors.len(), 7);

    // p2 (row 0) -> p4 (row 1) crosses rows; p3 -> d1 stays on row 0.
    let curved: Vec<_> = scene
        .connectors
        .iter()
        .filter(|c| c.is_curved())
        .map(|c| (c.source, c.target))
        .collect();
    assert_eq!(curved, vec![(3, 5)]);
}

#[test]
fn rendering_is_idempotent_for_the_fixture() {
    let workflow = fixture();
    let options = RenderOptions {
        legend: true,
        summary: true,
        ..RenderOptions::default()
    };
    let first = render(&workflow, &options).unwrap();
    let second = render(&workflow, &options).unwrap();
    assert_eq!(first.raster, second.raster);
    assert_eq!(
        export(&first.raster, ImageFormat::Png).unwrap(),
        export(&second.raster, ImageFormat::Png).unwrap()
    );
}

#[test]
fn legend_and_summary_only_touch_the_bottom_band() {
    let workflow = fixture();
    let plain = render(&workflow, &RenderOptions::default()).unwrap().raster;
    let decorated = render(
        &workflow,
        &RenderOptions {
            legend: true,
            summary: true,
            ..RenderOptions::default()
        },
    )
    .unwrap()
    .raster;

    assert_ne!(plain, decorated);
    let stride = plain.stride();
    let band_start = 1000 * stride;
    assert_eq!(plain.data()[..band_start], decorated.data()[..band_start]);
}

#[test]
fn loose_timestamps_still_render_with_a_summary() {
    for (raw, generated) in [
        (r#""yesterday""#, "Generated: unknown"),
        (r#""2024-03-05""#, "Generated: 2024-03-05 00:00:00 UTC"),
        ("1700000000000.5", "Generated: 2023-11-14 22:13:20 UTC"),
    ] {
        let json = format!(
            r#"{{"workflow_type": "user_journey", "timestamp": {raw}, "workflow_nodes": [
                {{"id": "a", "type": "start", "label": "Begin", "connections": ["b"]}},
                {{"id": "b", "type": "end", "label": "Done"}}
            ]}}"#
        );
        let workflow = Workflow::from_json(&json).expect("loose timestamp loads");
        assert_eq!(workflow.summary_lines()[2], generated, "{raw}");

        let options = RenderOptions {
            summary: true,
            ..RenderOptions::default()
        };
        let rendered = render(&workflow, &options).unwrap();
        assert_eq!(rendered.stats.nodes, 2);
        assert!(export(&rendered.raster, ImageFormat::Png).unwrap().starts_with(b"\x89PNG"));
    }
}
