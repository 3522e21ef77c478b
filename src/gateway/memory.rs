//! In-memory platform for tests.
//!
//! `MemoryGateway` implements [`PlatformGateway`] over plain collections
//! and records every call so tests can assert on network traffic.
//!
//! # Example
//!
//! ```
//! use tmplsync::gateway::{GatewayCall, MemoryGateway, PlatformGateway};
//! use tmplsync::template::{Environment, TemplateKind};
//! use serde_json::json;
//!
//! let env = Environment::firm(111);
//! let gateway = MemoryGateway::new();
//! gateway.insert(env, TemplateKind::SharedPart, json!({"id": 7, "name": "sp_x"}));
//!
//! let found = gateway
//!     .find_by_handle_or_name(env, TemplateKind::SharedPart, "sp_x")
//!     .unwrap();
//! assert_eq!(found.unwrap().id(), Some(7));
//! assert_eq!(gateway.count(|c| matches!(c, GatewayCall::Find { .. })), 1);
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use serde_json::{json, Value};

use crate::error::{Result, SyncError};
use crate::template::{Environment, RemoteId, TemplateBody, TemplateKind};

use super::{GatewayResponse, PlatformGateway, RemoteRecord};

/// A call made against the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    Find {
        env: Environment,
        kind: TemplateKind,
        text: String,
    },
    ReadById {
        env: Environment,
        kind: TemplateKind,
        id: RemoteId,
    },
    ReadPage {
        env: Environment,
        kind: TemplateKind,
        page: u32,
    },
    Create {
        env: Environment,
        kind: TemplateKind,
    },
    Update {
        env: Environment,
        kind: TemplateKind,
        id: RemoteId,
    },
    Attach {
        env: Environment,
        kind: TemplateKind,
        shared_part_id: RemoteId,
        template_id: RemoteId,
    },
    Detach {
        env: Environment,
        kind: TemplateKind,
        shared_part_id: RemoteId,
        template_id: RemoteId,
    },
}

/// Mutating operations whose status can be forced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Update,
    Attach,
    Detach,
}

type LinkKey = (Environment, TemplateKind, RemoteId, RemoteId);

#[derive(Debug)]
struct MemoryState {
    records: HashMap<(Environment, TemplateKind), Vec<Value>>,
    links: HashSet<LinkKey>,
    forced: HashMap<Operation, u16>,
    calls: Vec<GatewayCall>,
    next_id: RemoteId,
    page_size: usize,
    echo_updates: bool,
    offline: bool,
}

/// In-memory [`PlatformGateway`].
#[derive(Debug)]
pub struct MemoryGateway {
    state: RefCell<MemoryState>,
}

impl MemoryGateway {
    /// Create an empty platform with a page size of 2.
    pub fn new() -> Self {
        Self {
            state: RefCell::new(MemoryState {
                records: HashMap::new(),
                links: HashSet::new(),
                forced: HashMap::new(),
                calls: Vec::new(),
                next_id: 1000,
                page_size: 2,
                echo_updates: true,
                offline: false,
            }),
        }
    }

    pub fn with_page_size(self, page_size: usize) -> Self {
        self.state.borrow_mut().page_size = page_size.max(1);
        self
    }

    /// Add a record to a collection. The record must carry an `id`.
    pub fn insert(&self, env: Environment, kind: TemplateKind, record: Value) {
        self.state
            .borrow_mut()
            .records
            .entry((env, kind))
            .or_default()
            .push(record);
    }

    /// Mark a shared part as attached without going through `attach`.
    pub fn link(
        &self,
        env: Environment,
        kind: TemplateKind,
        shared_part_id: RemoteId,
        template_id: RemoteId,
    ) {
        self.state
            .borrow_mut()
            .links
            .insert((env, kind, shared_part_id, template_id));
    }

    /// Force a status code for every call of `operation`.
    pub fn respond_with(&self, operation: Operation, status: u16) {
        self.state.borrow_mut().forced.insert(operation, status);
    }

    /// Make updates answer without echoing the handle/name.
    pub fn drop_update_echo(&self) {
        self.state.borrow_mut().echo_updates = false;
    }

    /// Make every call fail with a transport error.
    pub fn set_offline(&self, offline: bool) {
        self.state.borrow_mut().offline = offline;
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state.borrow().calls.clone()
    }

    /// Number of calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&GatewayCall) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|&c| pred(c)).count()
    }

    pub fn is_attached(
        &self,
        env: Environment,
        kind: TemplateKind,
        shared_part_id: RemoteId,
        template_id: RemoteId,
    ) -> bool {
        self.state
            .borrow()
            .links
            .contains(&(env, kind, shared_part_id, template_id))
    }

    /// The stored record with `id`, if any.
    pub fn record(&self, env: Environment, kind: TemplateKind, id: RemoteId) -> Option<Value> {
        self.state
            .borrow()
            .records
            .get(&(env, kind))
            .and_then(|records| records.iter().find(|r| r["id"].as_u64() == Some(id)).cloned())
    }

    fn enter(&self, call: GatewayCall) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(call);
        if state.offline {
            return Err(SyncError::TransportFailure {
                status: None,
                message: "platform unreachable".to_string(),
            });
        }
        Ok(())
    }

    fn forced(&self, operation: Operation) -> Option<u16> {
        self.state.borrow().forced.get(&operation).copied()
    }
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformGateway for MemoryGateway {
    fn find_by_handle_or_name(
        &self,
        env: Environment,
        kind: TemplateKind,
        text: &str,
    ) -> Result<Option<RemoteRecord>> {
        self.enter(GatewayCall::Find {
            env,
            kind,
            text: text.to_string(),
        })?;
        let state = self.state.borrow();
        Ok(state.records.get(&(env, kind)).and_then(|records| {
            records
                .iter()
                .find(|r| r[kind.handle_field()].as_str() == Some(text))
                .cloned()
                .map(RemoteRecord)
        }))
    }

    fn read_by_id(
        &self,
        env: Environment,
        kind: TemplateKind,
        id: RemoteId,
    ) -> Result<Option<RemoteRecord>> {
        self.enter(GatewayCall::ReadById { env, kind, id })?;
        Ok(self.record(env, kind, id).map(RemoteRecord))
    }

    fn read_page(
        &self,
        env: Environment,
        kind: TemplateKind,
        page: u32,
    ) -> Result<Vec<RemoteRecord>> {
        self.enter(GatewayCall::ReadPage { env, kind, page })?;
        let state = self.state.borrow();
        let records = state.records.get(&(env, kind)).cloned().unwrap_or_default();
        let start = (page.saturating_sub(1) as usize) * state.page_size;
        Ok(records
            .into_iter()
            .skip(start)
            .take(state.page_size)
            .map(RemoteRecord)
            .collect())
    }

    fn create(
        &self,
        env: Environment,
        kind: TemplateKind,
        body: &TemplateBody,
    ) -> Result<GatewayResponse> {
        self.enter(GatewayCall::Create { env, kind })?;
        if let Some(status) = self.forced(Operation::Create) {
            return Ok(GatewayResponse::new(status, json!({"error": "forced"})));
        }

        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;

        let mut record = body.clone();
        record.insert("id".to_string(), json!(id));
        let record = Value::Object(record);
        state
            .records
            .entry((env, kind))
            .or_default()
            .push(record.clone());

        Ok(GatewayResponse::new(201, record))
    }

    fn update(
        &self,
        env: Environment,
        kind: TemplateKind,
        id: RemoteId,
        body: &TemplateBody,
    ) -> Result<GatewayResponse> {
        self.enter(GatewayCall::Update { env, kind, id })?;
        if let Some(status) = self.forced(Operation::Update) {
            return Ok(GatewayResponse::new(status, json!({"error": "forced"})));
        }

        let mut state = self.state.borrow_mut();
        let echo = state.echo_updates;
        let Some(record) = state
            .records
            .get_mut(&(env, kind))
            .and_then(|records| records.iter_mut().find(|r| r["id"].as_u64() == Some(id)))
        else {
            return Ok(GatewayResponse::new(404, json!({"error": "not found"})));
        };

        if let Some(fields) = record.as_object_mut() {
            for (key, value) in body {
                fields.insert(key.clone(), value.clone());
            }
        }

        let data = if echo {
            record.clone()
        } else {
            json!({"status": "ok"})
        };
        Ok(GatewayResponse::new(200, data))
    }

    fn attach(
        &self,
        env: Environment,
        kind: TemplateKind,
        shared_part_id: RemoteId,
        template_id: RemoteId,
    ) -> Result<GatewayResponse> {
        self.enter(GatewayCall::Attach {
            env,
            kind,
            shared_part_id,
            template_id,
        })?;
        if let Some(status) = self.forced(Operation::Attach) {
            return Ok(GatewayResponse::new(status, Value::Null));
        }

        self.state
            .borrow_mut()
            .links
            .insert((env, kind, shared_part_id, template_id));
        Ok(GatewayResponse::new(201, Value::Null))
    }

    fn detach(
        &self,
        env: Environment,
        kind: TemplateKind,
        shared_part_id: RemoteId,
        template_id: RemoteId,
    ) -> Result<GatewayResponse> {
        self.enter(GatewayCall::Detach {
            env,
            kind,
            shared_part_id,
            template_id,
        })?;
        if let Some(status) = self.forced(Operation::Detach) {
            return Ok(GatewayResponse::new(status, Value::Null));
        }

        let removed = self
            .state
            .borrow_mut()
            .links
            .remove(&(env, kind, shared_part_id, template_id));
        let status = if removed { 200 } else { 404 };
        Ok(GatewayResponse::new(status, Value::Null))
    }
}
