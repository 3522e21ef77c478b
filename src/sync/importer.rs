//! Bulk and single-item import from the platform.

use crate::error::{Result, SyncError};
use crate::gateway::{PlatformGateway, RemoteRecord};
use crate::store::BodyStore;
use crate::template::{Environment, RemoteId, TemplateKind};

use super::report::{BatchReport, ItemOutcome};

/// Lazy iterator over the pages of a remote collection.
///
/// Yields each non-empty page in order and stops after the first empty
/// page. A failed fetch is yielded once and ends the iteration.
pub struct RemotePages<'a> {
    gateway: &'a dyn PlatformGateway,
    env: Environment,
    kind: TemplateKind,
    next_page: u32,
    done: bool,
}

impl<'a> RemotePages<'a> {
    pub fn new(gateway: &'a dyn PlatformGateway, env: Environment, kind: TemplateKind) -> Self {
        Self {
            gateway,
            env,
            kind,
            next_page: 1,
            done: false,
        }
    }
}

impl Iterator for RemotePages<'_> {
    type Item = Result<Vec<RemoteRecord>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let page = self.next_page;
        match self.gateway.read_page(self.env, self.kind, page) {
            Ok(records) if records.is_empty() => {
                tracing::debug!("{} page {} is empty; done", self.kind, page);
                self.done = true;
                None
            }
            Ok(records) => {
                self.next_page += 1;
                Some(Ok(records))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Materializes remote templates into the local repository.
pub struct BulkImporter<'a> {
    gateway: &'a dyn PlatformGateway,
    bodies: &'a dyn BodyStore,
}

impl<'a> BulkImporter<'a> {
    pub fn new(gateway: &'a dyn PlatformGateway, bodies: &'a dyn BodyStore) -> Self {
        Self { gateway, bodies }
    }

    pub fn pages(&self, env: Environment, kind: TemplateKind) -> RemotePages<'a> {
        RemotePages::new(self.gateway, env, kind)
    }

    /// Save one record, reporting the outcome instead of failing.
    pub fn save(&self, env: Environment, kind: TemplateKind, record: &RemoteRecord) -> ItemOutcome {
        let label = record
            .handle(kind)
            .map(String::from)
            .or_else(|| record.id().map(|id| format!("#{}", id)))
            .unwrap_or_else(|| "<unnamed>".to_string());
        ItemOutcome::from_result(kind, label, self.bodies.save_remote(env, kind, record))
    }

    /// Import every template of `kind`, page by page.
    ///
    /// `on_item` sees each outcome as soon as the record is saved. A
    /// failed save is reported and the import moves on; a failed page
    /// fetch ends the import with an error.
    pub fn import_all(
        &self,
        env: Environment,
        kind: TemplateKind,
        mut on_item: impl FnMut(&ItemOutcome),
    ) -> Result<BatchReport> {
        let mut report = BatchReport::new();
        let mut pages = 0;

        for page in self.pages(env, kind) {
            let records = page?;
            pages += 1;
            for record in &records {
                let outcome = self.save(env, kind, record);
                on_item(&outcome);
                report.push(outcome);
            }
        }

        if pages == 0 {
            tracing::warn!("No {} templates found in {}", kind, env);
            report.nothing_found = true;
        }
        Ok(report)
    }

    /// Import a single template by handle/name.
    pub fn import_one(&self, env: Environment, kind: TemplateKind, handle: &str) -> Result<String> {
        let record = self
            .gateway
            .find_by_handle_or_name(env, kind, handle)?
            .ok_or_else(|| SyncError::NotFound {
                kind,
                handle: handle.to_string(),
                env,
            })?;
        self.bodies.save_remote(env, kind, &record)
    }

    /// Import a single template by remote id.
    pub fn import_by_id(&self, env: Environment, kind: TemplateKind, id: RemoteId) -> Result<String> {
        let record = self
            .gateway
            .read_by_id(env, kind, id)?
            .ok_or_else(|| SyncError::NotFound {
                kind,
                handle: format!("#{}", id),
                env,
            })?;
        self.bodies.save_remote(env, kind, &record)
    }
}
