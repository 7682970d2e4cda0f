//! Integration tests for the push pipeline and agent lifecycle:
//! raw payload → parser → notification surface; install/activate → control.

use std::sync::Arc;

use serde_json::json;
use url::Url;

use followup_relay::{Agent, AgentEvent, ClientKind, SimHost};

fn sim_agent() -> (Arc<SimHost>, Agent<SimHost>) {
    let host = Arc::new(SimHost::new(Url::parse("https://app.example").unwrap()));
    let agent = Agent::new(Arc::clone(&host));
    (host, agent)
}

#[tokio::test]
async fn push_payload_is_normalized_and_shown() {
    let (host, agent) = sim_agent();
    let payload = json!({
        "title": "Follow-up",
        "body": "How is it going?",
        "data": {"incidentId": "abc123"},
        "actions": [
            {"id": "resolved", "label": "Resolved"},
            {"id": "improved", "label": "Improved"},
            {"id": "no_change", "label": "No change"}
        ]
    });

    agent
        .dispatch(AgentEvent::Push(Some(serde_json::to_vec(&payload).unwrap())))
        .await
        .settle()
        .await;

    let visible = host.visible_notifications();
    assert_eq!(visible.len(), 1);
    let request = &visible[0];
    assert_eq!(request.tag, "default");
    assert!(request.require_interaction);
    assert_eq!(request.actions.len(), 3);
    assert_eq!(request.data.incident_id.as_deref(), Some("abc123"));
    assert_eq!(request.data.follow_up_index, 0);
}

#[tokio::test]
async fn absent_payload_shows_nothing_and_does_not_fail() {
    let (host, agent) = sim_agent();
    agent.dispatch(AgentEvent::Push(None)).await.settle().await;
    assert!(host.visible_notifications().is_empty());
}

#[tokio::test]
async fn malformed_payload_is_contained() {
    let (host, agent) = sim_agent();
    agent
        .dispatch(AgentEvent::Push(Some(b"\x00\x01 not json".to_vec())))
        .await
        .settle()
        .await;
    assert!(host.visible_notifications().is_empty());

    // The agent keeps working after the bad push.
    let payload = json!({"title": "T", "body": "B"});
    agent
        .dispatch(AgentEvent::Push(Some(serde_json::to_vec(&payload).unwrap())))
        .await
        .settle()
        .await;
    assert_eq!(host.visible_notifications().len(), 1);
}

#[tokio::test]
async fn same_tag_pushes_replace_each_other() {
    let (host, agent) = sim_agent();
    for body in ["first", "second"] {
        let payload = json!({"title": "Follow-up", "body": body, "tag": "incident-7"});
        agent
            .dispatch(AgentEvent::Push(Some(serde_json::to_vec(&payload).unwrap())))
            .await
            .settle()
            .await;
    }

    let visible = host.visible_notifications();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].body, "second");
}

#[tokio::test]
async fn update_takes_control_of_open_tabs_immediately() {
    let (host, agent) = sim_agent();
    host.add_client("old-tab", "https://app.example/", ClientKind::Window, false);

    agent.dispatch(AgentEvent::Install).await.settle().await;
    agent.dispatch(AgentEvent::Activate).await.settle().await;

    assert_eq!(host.skip_waiting_calls(), 1);
    assert_eq!(host.claim_calls(), 1);
    assert!(host.list_all_clients().iter().all(|c| c.controlled));
}
