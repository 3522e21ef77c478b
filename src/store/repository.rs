//! File-backed template repository.
//!
//! Layout, relative to the repository root:
//!
//! ```text
//! reconciliation_texts/<handle>/main.liquid
//! reconciliation_texts/<handle>/text_parts/<part>.liquid
//! reconciliation_texts/<handle>/config.json
//! shared_parts/<name>/<name>.liquid
//! shared_parts/<name>/config.json
//! ```
//!
//! Export files and account templates follow the reconciliation layout.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use serde_json::{json, Value};

use crate::error::{Result, SyncError};
use crate::gateway::RemoteRecord;
use crate::template::{Environment, RemoteId, TemplateBody, TemplateKind};

use super::{BodyStore, ConfigRecord, ConfigStore, ScopedIds};

const CONFIG_FILE: &str = "config.json";
const MAIN_FILE: &str = "main.liquid";
const TEXT_PARTS_DIR: &str = "text_parts";

/// Remote fields that never land in `config.json` metadata.
const REMOTE_ONLY_FIELDS: &[&str] = &[
    "id",
    "partnerId",
    "used_in",
    "shared_parts",
    "text",
    "text_parts",
    "created_at",
    "updated_at",
    "version_comment",
    "version_significant_change",
];

/// Config keys that are never sent to the platform.
const LOCAL_ONLY_FIELDS: &[&str] = &["test", "test_firm_id", "externally_managed"];

/// Templates stored under a root directory.
#[derive(Debug, Clone)]
pub struct Repository {
    root: PathBuf,
}

impl Repository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one template.
    pub fn template_dir(&self, kind: TemplateKind, handle: &str) -> PathBuf {
        self.root.join(kind.directory()).join(handle)
    }

    fn config_path(&self, kind: TemplateKind, handle: &str) -> PathBuf {
        self.template_dir(kind, handle).join(CONFIG_FILE)
    }

    fn main_path(&self, kind: TemplateKind, handle: &str) -> PathBuf {
        let dir = self.template_dir(kind, handle);
        match kind {
            TemplateKind::SharedPart => dir.join(format!("{}.liquid", handle)),
            _ => dir.join(MAIN_FILE),
        }
    }

    /// Find the local handle whose config maps `env` to `id`.
    pub fn find_handle_by_id(
        &self,
        kind: TemplateKind,
        env: Environment,
        id: RemoteId,
    ) -> Result<Option<String>> {
        for handle in self.list_handles(kind)? {
            if self.read(kind, &handle)?.remote_id(env) == Some(id) {
                return Ok(Some(handle));
            }
        }
        Ok(None)
    }

    fn read_text_parts(&self, kind: TemplateKind, handle: &str) -> Result<Vec<Value>> {
        let dir = self.template_dir(kind, handle).join(TEXT_PARTS_DIR);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "liquid"))
            .collect();
        paths.sort();

        let mut parts = Vec::with_capacity(paths.len());
        for path in paths {
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            parts.push(json!({
                "name": name,
                "content": fs::read_to_string(&path)?,
            }));
        }
        Ok(parts)
    }

    fn write_body(&self, kind: TemplateKind, handle: &str, record: &RemoteRecord) -> Result<()> {
        let dir = self.template_dir(kind, handle);
        fs::create_dir_all(&dir)?;

        let text = record.get("text").and_then(Value::as_str).unwrap_or_default();
        write_atomic(&self.main_path(kind, handle), text)?;

        if kind == TemplateKind::SharedPart {
            return Ok(());
        }

        let parts = record
            .get("text_parts")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        if parts.is_empty() {
            return Ok(());
        }

        let parts_dir = dir.join(TEXT_PARTS_DIR);
        fs::create_dir_all(&parts_dir)?;
        for part in parts {
            let Some(name) = part.get("name").and_then(Value::as_str) else {
                continue;
            };
            if name.is_empty() || name.contains(['/', '\\']) {
                tracing::warn!("Skipping text part with unusable name {:?}", name);
                continue;
            }
            let content = part.get("content").and_then(Value::as_str).unwrap_or_default();
            write_atomic(&parts_dir.join(format!("{}.liquid", name)), content)?;
        }
        Ok(())
    }

    /// Merge the platform's `used_in` list of a shared part into its config.
    fn merge_remote_usage(
        &self,
        env: Environment,
        config: &mut ConfigRecord,
        record: &RemoteRecord,
    ) -> Result<()> {
        let Some(items) = record.get("used_in").and_then(Value::as_array) else {
            return Ok(());
        };

        for item in items {
            let kind = item
                .get("type")
                .and_then(Value::as_str)
                .and_then(TemplateKind::from_usage_type);
            let template_id = item.get("id").and_then(Value::as_u64);
            let (Some(kind), Some(template_id)) = (kind, template_id) else {
                tracing::warn!("Skipping used_in item without type/id: {}", item);
                continue;
            };

            let named = item
                .get(kind.handle_field())
                .or_else(|| item.get("handle"))
                .or_else(|| item.get("name"))
                .and_then(Value::as_str)
                .map(String::from);
            let handle = match named {
                Some(handle) => Some(handle),
                None => self.find_handle_by_id(kind, env, template_id)?,
            };

            match handle {
                Some(handle) => config.record_usage(kind, &handle, env, template_id),
                None => tracing::warn!(
                    "{} {} in {} is not in the local repository; skipping",
                    kind,
                    template_id,
                    env
                ),
            }
        }
        Ok(())
    }
}

/// Reject handles that would not map to exactly one directory under the kind's root.
fn check_handle(kind: TemplateKind, handle: &str) -> Result<()> {
    if handle.is_empty() || handle == "." || handle == ".." || handle.contains(['/', '\\', '\0'])
    {
        return Err(SyncError::InvalidHandle {
            kind,
            handle: handle.to_string(),
        });
    }
    Ok(())
}

/// Write to a temp file, then rename over the target.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

impl ConfigStore for Repository {
    fn read(&self, kind: TemplateKind, handle: &str) -> Result<ConfigRecord> {
        let path = self.config_path(kind, handle);
        if !path.exists() {
            return Ok(ConfigRecord::default());
        }

        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| SyncError::ConfigParse {
            path,
            message: e.to_string(),
        })
    }

    fn write(&self, kind: TemplateKind, handle: &str, config: &ConfigRecord) -> Result<()> {
        check_handle(kind, handle)?;
        let dir = self.template_dir(kind, handle);
        fs::create_dir_all(&dir)?;

        let content = serde_json::to_string_pretty(config).map_err(|e| anyhow!(e))?;
        write_atomic(&self.config_path(kind, handle), &content)?;
        tracing::debug!("Wrote config for {} '{}'", kind, handle);
        Ok(())
    }

    fn exists(&self, kind: TemplateKind, handle: &str) -> bool {
        self.config_path(kind, handle).is_file() || self.main_path(kind, handle).is_file()
    }

    fn list_handles(&self, kind: TemplateKind) -> Result<Vec<String>> {
        let dir = self.root.join(kind.directory());
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut handles = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.path().join(CONFIG_FILE).is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                handles.push(name.to_string());
            }
        }
        handles.sort();
        Ok(handles)
    }
}

impl BodyStore for Repository {
    fn read_body(&self, kind: TemplateKind, handle: &str) -> Result<Option<TemplateBody>> {
        let main = self.main_path(kind, handle);
        if !main.is_file() {
            return Ok(None);
        }

        let config = self.read(kind, handle)?;
        let mut body = TemplateBody::new();
        for (key, value) in &config.metadata {
            if !LOCAL_ONLY_FIELDS.contains(&key.as_str()) {
                body.insert(key.clone(), value.clone());
            }
        }
        body.insert(kind.handle_field().to_string(), json!(handle));
        body.insert("text".to_string(), json!(fs::read_to_string(&main)?));
        if kind != TemplateKind::SharedPart {
            body.insert(
                "text_parts".to_string(),
                Value::Array(self.read_text_parts(kind, handle)?),
            );
        }
        Ok(Some(body))
    }

    fn save_remote(
        &self,
        env: Environment,
        kind: TemplateKind,
        record: &RemoteRecord,
    ) -> Result<String> {
        let handle = record
            .handle(kind)
            .ok_or_else(|| anyhow!("{} record without '{}'", kind, kind.handle_field()))?
            .to_string();
        check_handle(kind, &handle)?;
        let id = record.id().ok_or_else(|| SyncError::InconsistentResponse {
            kind,
            handle: handle.clone(),
            field: "id".to_string(),
        })?;

        self.write_body(kind, &handle, record)?;

        let mut config = self.read(kind, &handle)?;
        if let Some(fields) = record.fields() {
            for (key, value) in fields {
                if !REMOTE_ONLY_FIELDS.contains(&key.as_str()) {
                    config.metadata.insert(key.clone(), value.clone());
                }
            }
        }
        config
            .metadata
            .insert(kind.handle_field().to_string(), json!(handle));
        config.set_remote_id(env, id);
        if kind == TemplateKind::SharedPart {
            self.merge_remote_usage(env, &mut config, record)?;
        }

        self.write(kind, &handle, &config)?;
        tracing::info!("Saved {} '{}' ({} id {})", kind, handle, env, id);
        Ok(handle)
    }
}
