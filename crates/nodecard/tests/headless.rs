use nodecard::render::{
    HeadlessRenderer, LayoutOptions, Role, SvgRenderOptions, layout_entity, layout_entity_sync,
    render_entity_svg_sync, sanitize_svg_id,
};
use nodecard::{Accent, CardConfig, CardInput, DetailsAffordance, EntityContext};
use std::path::PathBuf;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn read_json(parts: &[&str]) -> serde_json::Value {
    let mut path = workspace_root().join("fixtures");
    for part in parts {
        path = path.join(part);
    }
    let text = std::fs::read_to_string(&path).expect("fixture");
    serde_json::from_str(&text).expect("fixture json")
}

fn options_with_control_plane() -> LayoutOptions {
    let config = CardConfig::from_value(&read_json(&["config", "control-plane.json"])).expect("config");
    LayoutOptions::default().with_config(config)
}

#[test]
fn sanitize_svg_id_handles_entity_refs() {
    assert_eq!(sanitize_svg_id("component:default/orders"), "component-default-orders");
    assert_eq!(sanitize_svg_id("api:payments/orders-v2.1"), "api-payments-orders-v2.1");
    assert_eq!(sanitize_svg_id("resource:default/__db"), "resource-default-__db");
    assert_eq!(sanitize_svg_id("_svc"), "n-_svc");
    assert_eq!(sanitize_svg_id("  "), "n-untitled");
    assert_eq!(sanitize_svg_id("42 cards"), "n-42-cards");
    assert_eq!(sanitize_svg_id("///"), "n-untitled");
}

#[test]
fn entity_layout_sync_and_async_agree() {
    let entity = read_json(&["entities", "component.json"]);
    let ctx = EntityContext {
        accent: Accent::Primary,
        details: DetailsAffordance::Closed,
        ..Default::default()
    };
    let options = options_with_control_plane();

    let sync = layout_entity_sync(&entity, &ctx, &options).expect("layout");
    let async_ = futures::executor::block_on(layout_entity(&entity, &ctx, &options)).expect("layout");
    assert_eq!(sync, async_);

    assert_eq!(sync.card_id, "component:default/orders");
    assert_eq!(sync.by_role(Role::Deployment).filter(|p| !p.is_tooltip()).count(), 1);
    assert_eq!(sync.by_role(Role::InternalLink).filter(|p| !p.is_tooltip()).count(), 4);
    let label = sync
        .by_role(Role::ExternalLinksLabel)
        .next()
        .and_then(|p| p.as_text())
        .map(|t| t.text());
    assert_eq!(label.as_deref(), Some("Elsewhere"));
}

#[test]
fn deployments_need_the_control_plane() {
    let entity = read_json(&["entities", "component.json"]);
    let layout = layout_entity_sync(&entity, &EntityContext::default(), &LayoutOptions::default())
        .expect("layout");
    assert_eq!(layout.by_role(Role::Deployment).count(), 0);
    assert_eq!(layout.by_role(Role::DeploymentLabel).count(), 0);
}

#[test]
fn entity_svg_renders() {
    let entity = read_json(&["entities", "component.json"]);
    let svg = render_entity_svg_sync(
        &entity,
        &EntityContext::default(),
        &options_with_control_plane(),
        &SvgRenderOptions::default(),
    )
    .expect("svg");
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Orders Service"));
    assert!(svg.contains("https://cp.example.com/cp/bwce/appdetails/processes?dp_id=dp1&amp;capability_instance_id=cap1&amp;app_id=app1"));
}

#[test]
fn invalid_entities_surface_input_errors() {
    let err = layout_entity_sync(
        &serde_json::json!([1, 2, 3]),
        &EntityContext::default(),
        &LayoutOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, nodecard::render::HeadlessError::Input(_)));
}

#[test]
fn renderer_sanitizes_root_ids() {
    let renderer = HeadlessRenderer::new();
    let mut input = CardInput::new("component:default/orders");
    input.title = Some("Orders".to_string());
    let svg = renderer.render_card_svg(&input);
    assert!(svg.starts_with(r#"<svg id="component-default-orders""#));

    let entity = read_json(&["entities", "component.json"]);
    let svg = renderer
        .render_entity_svg_sync(&entity, &EntityContext::default())
        .expect("svg");
    assert!(svg.starts_with(r#"<svg id="component-default-orders""#));
}
