//! Unit tests for the reconciliation engine

use onto_sync::config::ServerConfig;
use onto_sync::reconcile::reconcile;
use onto_sync::remote::TerminologyClient;
use onto_sync::resource::TerminologyResource;
use onto_sync::store::ResourceStore;
use serde_json::Value;

use crate::common::fixtures::{code_system, value_set};
use crate::common::mock_server::MockTerminologyServer;

fn client_for(server: &MockTerminologyServer) -> TerminologyClient {
    TerminologyClient::new(&ServerConfig {
        url: server.url(),
        timeout: 5,
    })
    .unwrap()
}

fn store_of(resources: &[Value]) -> ResourceStore {
    let mut store = ResourceStore::new();
    for resource in resources {
        store.insert(TerminologyResource::from_json(resource.clone()));
    }
    store
}

#[tokio::test]
async fn absent_resource_is_created_exactly_once_with_id_cleared() {
    let server = MockTerminologyServer::start().await;
    let canonical = "http://example.com/cs/A";
    server.stub_search("CodeSystem", canonical, &[]).await;
    server
        .stub_conditional_create("CodeSystem", canonical, 201)
        .await;

    let store = store_of(&[code_system(canonical)]);
    let report = reconcile(&store, &client_for(&server)).await;

    assert_eq!(report.created, 1);
    assert_eq!(report.present, 0);
    assert_eq!(report.failed, 0);

    let creates = server.received_creates("CodeSystem").await;
    assert_eq!(creates.len(), 1);
    assert!(creates[0].get("id").is_none());
}

#[tokio::test]
async fn present_resource_is_left_alone() {
    let server = MockTerminologyServer::start().await;
    let canonical = "http://example.com/cs/B";
    server
        .stub_search("CodeSystem", canonical, &[code_system(canonical)])
        .await;

    let store = store_of(&[code_system(canonical)]);
    let report = reconcile(&store, &client_for(&server)).await;

    assert_eq!(report.present, 1);
    assert_eq!(report.created, 0);
    assert!(server.received_creates("CodeSystem").await.is_empty());
}

#[tokio::test]
async fn ambiguous_remote_matches_suppress_the_create() {
    let server = MockTerminologyServer::start().await;
    let canonical = "http://example.com/cs/C";
    server
        .stub_search(
            "CodeSystem",
            canonical,
            &[code_system(canonical), code_system(canonical)],
        )
        .await;

    let store = store_of(&[code_system(canonical)]);
    let report = reconcile(&store, &client_for(&server)).await;

    assert_eq!(report.present, 1);
    assert_eq!(report.created, 0);
    assert!(server.received_creates("CodeSystem").await.is_empty());
}

#[tokio::test]
async fn one_failing_lookup_does_not_block_the_rest() {
    let server = MockTerminologyServer::start().await;
    let failing = "http://example.com/cs/failing";
    let missing = "http://example.com/cs/missing";
    server.stub_search_failure("CodeSystem", failing).await;
    server.stub_search("CodeSystem", missing, &[]).await;
    server
        .stub_conditional_create("CodeSystem", missing, 201)
        .await;

    let store = store_of(&[code_system(failing), code_system(missing)]);
    let report = reconcile(&store, &client_for(&server)).await;

    assert_eq!(report.failed, 1);
    assert_eq!(report.created, 1);
    let creates = server.received_creates("CodeSystem").await;
    assert_eq!(creates.len(), 1);
    assert_eq!(creates[0]["url"], missing);
}

#[tokio::test]
async fn failing_create_is_counted_and_the_loop_continues() {
    let server = MockTerminologyServer::start().await;
    let rejected = "http://example.com/vs/rejected";
    let accepted = "http://example.com/vs/accepted";
    server.stub_search("ValueSet", rejected, &[]).await;
    server.stub_search("ValueSet", accepted, &[]).await;
    server
        .stub_conditional_create("ValueSet", rejected, 500)
        .await;
    server
        .stub_conditional_create("ValueSet", accepted, 201)
        .await;

    let store = store_of(&[value_set(rejected), value_set(accepted)]);
    let report = reconcile(&store, &client_for(&server)).await;

    assert_eq!(report.failed, 1);
    assert_eq!(report.created, 1);
    assert!(report.has_failures());
}

#[tokio::test]
async fn create_racing_a_concurrent_writer_counts_as_present() {
    let server = MockTerminologyServer::start().await;
    let canonical = "http://example.com/cs/raced";
    server.stub_search("CodeSystem", canonical, &[]).await;
    server
        .stub_conditional_create("CodeSystem", canonical, 200)
        .await;

    let store = store_of(&[code_system(canonical)]);
    let report = reconcile(&store, &client_for(&server)).await;

    assert_eq!(report.present, 1);
    assert_eq!(report.created, 0);
    assert_eq!(report.failed, 0);
}

#[tokio::test]
async fn second_run_against_reconciled_state_creates_nothing() {
    let cs_url = "http://example.com/cs/idempotent";
    let vs_url = "http://example.com/vs/idempotent";
    let store = store_of(&[code_system(cs_url), value_set(vs_url)]);

    // First run: empty remote, everything is created.
    let before = MockTerminologyServer::start().await;
    before.stub_search("CodeSystem", cs_url, &[]).await;
    before.stub_search("ValueSet", vs_url, &[]).await;
    before.stub_conditional_create("CodeSystem", cs_url, 201).await;
    before.stub_conditional_create("ValueSet", vs_url, 201).await;
    let report = reconcile(&store, &client_for(&before)).await;
    assert_eq!(report.created, 2);

    // Second run: the remote now holds both, nothing is created.
    let after = MockTerminologyServer::start().await;
    after
        .stub_search("CodeSystem", cs_url, &[code_system(cs_url)])
        .await;
    after
        .stub_search("ValueSet", vs_url, &[value_set(vs_url)])
        .await;
    let report = reconcile(&store, &client_for(&after)).await;

    assert_eq!(report.created, 0);
    assert_eq!(report.present, 2);
    assert!(after.received_creates("CodeSystem").await.is_empty());
    assert!(after.received_creates("ValueSet").await.is_empty());
}
