//! Integration tests for the synchronization API.

use std::fs;

use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use tmplsync::gateway::{GatewayCall, HttpGateway, MemoryGateway};
use tmplsync::store::{ConfigRecord, ConfigStore, DetachChange, Repository, ScopedIds};
use tmplsync::sync::{BulkImporter, IdentityResolver, Publisher, UsageGraph};
use tmplsync::template::{Environment, TemplateKind};
use tmplsync::SyncError;

const SP: TemplateKind = TemplateKind::SharedPart;
const RECON: TemplateKind = TemplateKind::ReconciliationText;

fn firm() -> Environment {
    Environment::firm(111)
}

fn is_find(call: &GatewayCall) -> bool {
    matches!(call, GatewayCall::Find { .. })
}

#[test]
fn attach_discovers_missing_shared_part_id() {
    let temp = TempDir::new().unwrap();
    let repo = Repository::new(temp.path());
    repo.write(SP, "sp_x", &ConfigRecord::default()).unwrap();
    let mut recon = ConfigRecord::default();
    recon.set_remote_id(firm(), 42);
    repo.write(RECON, "recon_y", &recon).unwrap();

    let gateway = MemoryGateway::new();
    gateway.insert(firm(), SP, json!({"id": 7, "name": "sp_x"}));

    UsageGraph::new(&gateway, &repo)
        .attach(firm(), "sp_x", "recon_y", RECON)
        .unwrap();

    assert!(gateway.is_attached(firm(), RECON, 7, 42));
    let sp = repo.read(SP, "sp_x").unwrap();
    assert_eq!(sp.remote_id(firm()), Some(7));
    assert_eq!(sp.used_in.len(), 1);
    let entry = &sp.used_in[0];
    assert_eq!(entry.kind, RECON);
    assert_eq!(entry.handle.as_deref(), Some("recon_y"));
    assert_eq!(entry.id.get("111"), Some(&42));
    assert!(entry.partner_id.is_empty());

    let recon = repo.read(RECON, "recon_y").unwrap();
    assert_eq!(recon.shared_part("sp_x").and_then(|l| l.remote_id(firm())), Some(7));
}

#[test]
fn attaching_twice_keeps_one_usage_entry() {
    let temp = TempDir::new().unwrap();
    let repo = Repository::new(temp.path());
    let mut sp = ConfigRecord::default();
    sp.set_remote_id(firm(), 7);
    sp.set_remote_id(Environment::partner(5), 70);
    repo.write(SP, "sp_x", &sp).unwrap();
    let mut recon = ConfigRecord::default();
    recon.set_remote_id(firm(), 42);
    recon.set_remote_id(Environment::partner(5), 420);
    repo.write(RECON, "recon_y", &recon).unwrap();
    let gateway = MemoryGateway::new();
    let graph = UsageGraph::new(&gateway, &repo);

    graph.attach(firm(), "sp_x", "recon_y", RECON).unwrap();
    graph.attach(firm(), "sp_x", "recon_y", RECON).unwrap();
    graph
        .attach(Environment::partner(5), "sp_x", "recon_y", RECON)
        .unwrap();

    let sp = repo.read(SP, "sp_x").unwrap();
    assert_eq!(sp.used_in.len(), 1);
    assert_eq!(sp.used_in[0].id.get("111"), Some(&42));
    assert_eq!(sp.used_in[0].partner_id.get("5"), Some(&420));
}

#[test]
fn detaching_last_environment_removes_entry() {
    let temp = TempDir::new().unwrap();
    let repo = Repository::new(temp.path());
    let mut sp = ConfigRecord::default();
    sp.set_remote_id(firm(), 7);
    sp.record_usage(RECON, "recon_y", firm(), 42);
    repo.write(SP, "sp_x", &sp).unwrap();
    let mut recon = ConfigRecord::default();
    recon.set_remote_id(firm(), 42);
    recon.record_shared_part("sp_x", firm(), 7);
    repo.write(RECON, "recon_y", &recon).unwrap();
    let gateway = MemoryGateway::new();
    gateway.link(firm(), RECON, 7, 42);

    let change = UsageGraph::new(&gateway, &repo)
        .detach(firm(), "sp_x", "recon_y", RECON)
        .unwrap();

    assert_eq!(change, DetachChange::Removed);
    assert!(!gateway.is_attached(firm(), RECON, 7, 42));
    assert!(repo.read(SP, "sp_x").unwrap().used_in.is_empty());
    assert!(repo.read(RECON, "recon_y").unwrap().shared_parts.is_empty());
}

#[test]
fn detaching_one_of_two_firms_prunes_entry() {
    let temp = TempDir::new().unwrap();
    let repo = Repository::new(temp.path());
    let mut sp = ConfigRecord::default();
    sp.set_remote_id(firm(), 7);
    sp.record_usage(RECON, "recon_y", firm(), 42);
    sp.record_usage(RECON, "recon_y", Environment::firm(222), 43);
    repo.write(SP, "sp_x", &sp).unwrap();
    let mut recon = ConfigRecord::default();
    recon.set_remote_id(firm(), 42);
    repo.write(RECON, "recon_y", &recon).unwrap();
    let gateway = MemoryGateway::new();
    gateway.link(firm(), RECON, 7, 42);

    let change = UsageGraph::new(&gateway, &repo)
        .detach(firm(), "sp_x", "recon_y", RECON)
        .unwrap();

    assert_eq!(change, DetachChange::Pruned);
    let sp = repo.read(SP, "sp_x").unwrap();
    assert_eq!(sp.used_in.len(), 1);
    assert_eq!(sp.used_in[0].id.len(), 1);
    assert_eq!(sp.used_in[0].id.get("222"), Some(&43));
}

#[test]
fn resolve_twice_looks_up_once() {
    let temp = TempDir::new().unwrap();
    let repo = Repository::new(temp.path());
    let gateway = MemoryGateway::new();
    gateway.insert(firm(), RECON, json!({"id": 42, "handle": "recon_y"}));
    let resolver = IdentityResolver::new(&gateway, &repo);

    let first = resolver.resolve(firm(), RECON, "recon_y").unwrap();
    let second = resolver.resolve(firm(), RECON, "recon_y").unwrap();

    assert_eq!(first, 42);
    assert_eq!(second, 42);
    assert_eq!(gateway.count(is_find), 1);
}

#[test]
fn firm_and_partner_ids_are_independent() {
    let temp = TempDir::new().unwrap();
    let repo = Repository::new(temp.path());
    let mut config = ConfigRecord::default();
    config.set_remote_id(Environment::partner(111), 9);
    repo.write(RECON, "recon_y", &config).unwrap();
    let gateway = MemoryGateway::new();
    gateway.insert(firm(), RECON, json!({"id": 42, "handle": "recon_y"}));

    IdentityResolver::new(&gateway, &repo)
        .resolve(firm(), RECON, "recon_y")
        .unwrap();

    let config = repo.read(RECON, "recon_y").unwrap();
    assert_eq!(config.remote_id(firm()), Some(42));
    assert_eq!(config.remote_id(Environment::partner(111)), Some(9));
}

#[test]
fn import_all_stops_after_empty_page() {
    let temp = TempDir::new().unwrap();
    let repo = Repository::new(temp.path());
    let gateway = MemoryGateway::new();
    for (id, name) in [(1, "a"), (2, "b"), (3, "c")] {
        gateway.insert(firm(), SP, json!({"id": id, "name": name, "text": name}));
    }

    let report = BulkImporter::new(&gateway, &repo)
        .import_all(firm(), SP, |_| {})
        .unwrap();

    assert_eq!(report.succeeded(), 3);
    assert_eq!(
        gateway.count(|c| matches!(c, GatewayCall::ReadPage { .. })),
        3
    );
    assert_eq!(repo.list_handles(SP).unwrap(), ["a", "b", "c"]);
}

#[test]
fn publish_without_local_id_makes_no_call() {
    let temp = TempDir::new().unwrap();
    let repo = Repository::new(temp.path());
    repo.write(RECON, "recon_y", &ConfigRecord::default()).unwrap();
    fs::write(repo.template_dir(RECON, "recon_y").join("main.liquid"), "x").unwrap();
    let gateway = MemoryGateway::new();

    let err = Publisher::new(&gateway, &repo, &repo)
        .publish(firm(), RECON, "recon_y", None)
        .unwrap_err();

    assert!(matches!(err, SyncError::MissingLocalIdentity { .. }));
    assert!(gateway.calls().is_empty());
}

#[test]
fn import_all_over_http_follows_pages() {
    let server = MockServer::start();
    let page1 = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v4/f/111/shared_parts")
            .query_param("page", "1");
        then.status(200)
            .json_body(json!([{"id": 1, "name": "a"}, {"id": 2, "name": "b"}]));
    });
    let page2 = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v4/f/111/shared_parts")
            .query_param("page", "2");
        then.status(200).json_body(json!([{"id": 3, "name": "c"}]));
    });
    let page3 = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v4/f/111/shared_parts")
            .query_param("page", "3");
        then.status(200).json_body(json!([]));
    });
    let gateway = HttpGateway::new(&server.base_url()).unwrap().with_per_page(2);
    let temp = TempDir::new().unwrap();
    let repo = Repository::new(temp.path());

    let report = BulkImporter::new(&gateway, &repo)
        .import_all(firm(), SP, |_| {})
        .unwrap();

    page1.assert();
    page2.assert();
    page3.assert();
    assert_eq!(report.succeeded(), 3);
    assert_eq!(repo.read(SP, "c").unwrap().remote_id(firm()), Some(3));
}
