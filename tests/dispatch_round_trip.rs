//! End-to-end dispatch scenarios against the built-in sample graph.
//!
//! Drives the dispatcher the way both transports do: normalized input in,
//! ordered command array out, session state carried between calls.
//! Run with: cargo test -p sdui --test dispatch_round_trip

use sdui::graph::sample_graph;
use sdui::{normalize, ActivePanel, CallMethod, Dispatcher};
use sdui_types::{Command, InstanceAddress};
use serde_json::{json, Value};

// ── Helpers ────────────────────────────────────────────────────

fn dispatcher() -> Dispatcher {
    Dispatcher::standard(sample_graph().expect("sample graph loads"))
}

async fn send(dispatcher: &Dispatcher, instance: &str, body: Value) -> Vec<Command> {
    let address = InstanceAddress::parse(instance);
    dispatcher
        .dispatch(&address, normalize(Some(body), &[], CallMethod::WebSocket))
        .await
}

async fn active_panel(dispatcher: &Dispatcher, instance: &str) -> ActivePanel {
    let address = InstanceAddress::parse(instance);
    let handle = dispatcher.sessions().resolve(&address).await;
    let mut session = handle.lock().await;
    session.app_state(&address.app).active_panel().clone()
}

fn steps(command: &Command) -> &[sdui_types::Step] {
    match command {
        Command::ShowPanel { steps } => steps,
        other => panic!("expected show-panel, got {:?}", other),
    }
}

// ── Scenarios ──────────────────────────────────────────────────

#[tokio::test]
async fn show_app_round_trip_is_reproducible() {
    let dispatcher = dispatcher();
    let instance = "session-abc123:default";

    let first = send(&dispatcher, instance, json!({"action": "show-app"})).await;
    assert_eq!(first.len(), 2);
    assert_eq!(first[0], Command::show_status("session-abc123"));
    assert_eq!(steps(&first[1])[0].data["id"], "workspace");

    let second = send(&dispatcher, instance, json!({"action": "show-app"})).await;
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

#[tokio::test]
async fn unknown_action_returns_warn_first() {
    let dispatcher = dispatcher();
    for instance in ["s1", "s1:trek", "s1:dream", "s1:nonesuch"] {
        let commands = send(&dispatcher, instance, json!({"action": "warp-drive"})).await;
        assert!(!commands.is_empty());
        assert_eq!(commands[0].name(), "warn", "instance {}", instance);
    }
}

#[tokio::test]
async fn select_missing_panel_sets_sentinel_and_clears() {
    let dispatcher = dispatcher();
    let commands = send(
        &dispatcher,
        "s1",
        json!({"action": "select-panel", "id": "does-not-exist"}),
    )
    .await;

    assert!(commands.contains(&Command::ClearPanel));
    assert_eq!(active_panel(&dispatcher, "s1").await, ActivePanel::NotFound);

    // A later bootstrap keeps the panel cleared.
    let commands = send(&dispatcher, "s1", json!({"action": "show-app"})).await;
    assert_eq!(commands, vec![Command::show_status("s1"), Command::ClearPanel]);
}

#[tokio::test]
async fn selection_survives_reconnect() {
    let dispatcher = dispatcher();
    send(
        &dispatcher,
        "s1",
        json!({"action": "select-panel", "panel-id": "home-card"}),
    )
    .await;

    // A fresh connection for the same instance starts with show-app again.
    let commands = send(&dispatcher, "s1", json!({"action": "show-app"})).await;
    let title = &steps(&commands[1])[0];
    assert_eq!(title.data["title"], "home card");
}

#[tokio::test]
async fn apps_keep_disjoint_state() {
    let dispatcher = dispatcher();
    send(
        &dispatcher,
        "s1:default",
        json!({"action": "select-panel", "id": "src"}),
    )
    .await;

    // The dream app shares the default select-panel handler but not its state.
    assert_eq!(active_panel(&dispatcher, "s1:dream").await, ActivePanel::Unset);
    assert_eq!(
        active_panel(&dispatcher, "s1:default").await,
        ActivePanel::Panel("src".into())
    );
    assert_eq!(active_panel(&dispatcher, "s2:default").await, ActivePanel::Unset);
}

#[tokio::test]
async fn link_click_action_navigates() {
    let dispatcher = dispatcher();
    let commands = send(&dispatcher, "s1", json!({"action": "show-app"})).await;

    let link = steps(&commands[1])
        .iter()
        .find(|s| s.template == "link")
        .expect("root has link steps");
    let click = link.click_action.clone().expect("link steps are clickable");

    let mut body = serde_json::Map::new();
    body.insert("action".into(), Value::String(click.action));
    body.extend(click.data);
    let commands = send(&dispatcher, "s1", Value::Object(body)).await;

    assert_eq!(commands.len(), 1);
    let target = link.data["to"].as_str().unwrap().to_string();
    assert_eq!(steps(&commands[0])[0].data["id"], target.as_str());
    assert_eq!(
        active_panel(&dispatcher, "s1").await,
        ActivePanel::Panel(target)
    );
}

#[tokio::test]
async fn trek_overrides_show_app() {
    let dispatcher = dispatcher();
    let commands = send(&dispatcher, "s1:trek", json!({"action": "show-app"})).await;
    assert_eq!(commands[0].name(), "show-trek-welcome");

    let commands = send(&dispatcher, "s1:trek", json!({"action": "trek-status"})).await;
    match &commands[0] {
        Command::ShowTrekInfo { is_active, .. } => assert!(!is_active),
        other => panic!("expected trek info, got {:?}", other),
    }

    let commands = send(&dispatcher, "s1:trek", json!({"action": "set-course", "dir": 3})).await;
    assert_eq!(commands[0].name(), "warn");

    send(&dispatcher, "s1:trek", json!({"action": "trek-start"})).await;
    let commands = send(
        &dispatcher,
        "s1:trek",
        json!({"action": "set-course", "dir": "5", "warp": 2}),
    )
    .await;
    assert_eq!(commands, vec![Command::log("Course set: dir 5, warp 2.")]);

    let commands = send(&dispatcher, "s1:trek", json!({"action": "trek-status"})).await;
    match &commands[0] {
        Command::ShowTrekInfo {
            is_active, course, ..
        } => {
            assert!(is_active);
            assert_eq!(course.dir, 5.0);
        }
        other => panic!("expected trek info, got {:?}", other),
    }

    let commands = send(
        &dispatcher,
        "s1:trek",
        json!({"action": "set-course", "warp": 12}),
    )
    .await;
    assert_eq!(commands[0].name(), "warn");
}

#[tokio::test]
async fn dream_pages_switch_on_open_panel() {
    let dispatcher = dispatcher();
    let page_one = send(&dispatcher, "s1:dream", json!({"action": "open-app"})).await;
    let page_two = send(
        &dispatcher,
        "s1:dream",
        json!({"action": "open-panel", "panel": "page2"}),
    )
    .await;
    assert_eq!(steps(&page_one[0])[1].data["arg"], "Page 1: The title is the thing.");
    assert_eq!(
        steps(&page_two[0])[1].data["arg"],
        "Page 2: Welcome to the second page!"
    );
}

#[tokio::test]
async fn debug_flag_appends_echo_on_query_path() {
    let dispatcher = dispatcher();
    let address = InstanceAddress::parse("s1");
    let query = vec![
        ("action".to_string(), "show-app".to_string()),
        ("debug".to_string(), "1".to_string()),
    ];
    let commands = dispatcher
        .dispatch(&address, normalize(None, &query, CallMethod::Get))
        .await;

    let last = commands.last().unwrap();
    match last {
        Command::Debug { data } => {
            assert_eq!(data["call-method"], "GET");
            assert_eq!(data["debug"], "1");
        }
        other => panic!("expected debug last, got {:?}", other),
    }
    assert_eq!(commands[0].name(), "show-status");
}
