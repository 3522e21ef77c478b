//! Config records and the `used_in` relation.
//!
//! A [`ConfigRecord`] is the `config.json` of one template. It maps
//! environments to remote ids per scope (`id` for firms, `partnerId` for
//! partners) and, for shared parts, lists the templates the part is
//! attached to as [`UsageEntry`] values. Templates carry the reverse
//! relation as [`SharedPartLink`] values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::template::{Environment, RemoteId, Scope, TemplateKind};

/// Environment id (as string) to remote id.
pub type IdMap = BTreeMap<String, RemoteId>;

/// Anything holding one id map per scope.
pub trait ScopedIds {
    fn ids(&self, scope: Scope) -> &IdMap;
    fn ids_mut(&mut self, scope: Scope) -> &mut IdMap;

    /// Remote id for an environment, if recorded.
    fn remote_id(&self, env: Environment) -> Option<RemoteId> {
        self.ids(env.scope).get(&env.key()).copied()
    }

    /// Record the remote id for an environment, replacing any previous one.
    fn set_remote_id(&mut self, env: Environment, id: RemoteId) {
        self.ids_mut(env.scope).insert(env.key(), id);
    }

    /// Number of ids recorded across both scopes.
    fn id_count(&self) -> usize {
        self.ids(Scope::Firm).len() + self.ids(Scope::Partner).len()
    }
}

/// Outcome of removing one environment from a relation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetachChange {
    /// No entry matched.
    Absent,
    /// The whole entry was removed.
    Removed,
    /// Only the environment key was deleted; the entry remains.
    Pruned,
}

/// Decide whether detaching `env` drops the whole link.
///
/// The link goes when at most one id is left across both maps and that
/// id is the one being detached. Otherwise only the active scope's key
/// is deleted, and the link goes only if nothing is left afterwards.
fn detach_link<T: ScopedIds>(link: &mut T, env: Environment, target: RemoteId) -> bool {
    let remaining = link
        .ids(Scope::Firm)
        .values()
        .chain(link.ids(Scope::Partner).values())
        .next()
        .copied();
    if link.id_count() <= 1 && remaining.is_none_or(|id| id == target) {
        return true;
    }
    link.ids_mut(env.scope).remove(&env.key());
    link.id_count() == 0
}

/// One template a shared part is attached to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageEntry {
    #[serde(rename = "type")]
    pub kind: TemplateKind,
    #[serde(default, alias = "name", skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(default)]
    pub id: IdMap,
    #[serde(default, rename = "partnerId")]
    pub partner_id: IdMap,
}

impl UsageEntry {
    pub fn new(kind: TemplateKind, handle: &str) -> Self {
        Self {
            kind,
            handle: Some(handle.to_string()),
            id: IdMap::new(),
            partner_id: IdMap::new(),
        }
    }

    fn matches(&self, kind: TemplateKind, handle: &str) -> bool {
        self.kind == kind && self.handle.as_deref() == Some(handle)
    }
}

impl ScopedIds for UsageEntry {
    fn ids(&self, scope: Scope) -> &IdMap {
        match scope {
            Scope::Firm => &self.id,
            Scope::Partner => &self.partner_id,
        }
    }

    fn ids_mut(&mut self, scope: Scope) -> &mut IdMap {
        match scope {
            Scope::Firm => &mut self.id,
            Scope::Partner => &mut self.partner_id,
        }
    }
}

/// Reverse relation stored on a template: a shared part it embeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedPartLink {
    pub name: String,
    #[serde(default)]
    pub id: IdMap,
    #[serde(default, rename = "partnerId")]
    pub partner_id: IdMap,
}

impl ScopedIds for SharedPartLink {
    fn ids(&self, scope: Scope) -> &IdMap {
        match scope {
            Scope::Firm => &self.id,
            Scope::Partner => &self.partner_id,
        }
    }

    fn ids_mut(&mut self, scope: Scope) -> &mut IdMap {
        match scope {
            Scope::Firm => &mut self.id,
            Scope::Partner => &mut self.partner_id,
        }
    }
}

/// The persisted `config.json` of one template.
///
/// Keys this crate does not interpret are kept in `metadata` and written
/// back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigRecord {
    #[serde(default)]
    pub id: IdMap,
    #[serde(default, rename = "partnerId")]
    pub partner_id: IdMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub used_in: Vec<UsageEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shared_parts: Vec<SharedPartLink>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl ScopedIds for ConfigRecord {
    fn ids(&self, scope: Scope) -> &IdMap {
        match scope {
            Scope::Firm => &self.id,
            Scope::Partner => &self.partner_id,
        }
    }

    fn ids_mut(&mut self, scope: Scope) -> &mut IdMap {
        match scope {
            Scope::Firm => &mut self.id,
            Scope::Partner => &mut self.partner_id,
        }
    }
}

impl ConfigRecord {
    /// The handle/name stored in the metadata for this kind.
    pub fn handle(&self, kind: TemplateKind) -> Option<&str> {
        self.metadata.get(kind.handle_field()).and_then(Value::as_str)
    }

    /// Look up the usage entry for `(kind, handle)`.
    pub fn usage(&self, kind: TemplateKind, handle: &str) -> Option<&UsageEntry> {
        self.used_in.iter().find(|e| e.matches(kind, handle))
    }

    /// Find or create the usage entry for `(kind, handle)`.
    pub fn usage_mut(&mut self, kind: TemplateKind, handle: &str) -> &mut UsageEntry {
        let index = match self.used_in.iter().position(|e| e.matches(kind, handle)) {
            Some(index) => index,
            None => {
                self.used_in.push(UsageEntry::new(kind, handle));
                self.used_in.len() - 1
            }
        };
        &mut self.used_in[index]
    }

    /// Record that this shared part is attached to a template in `env`.
    pub fn record_usage(
        &mut self,
        kind: TemplateKind,
        handle: &str,
        env: Environment,
        template_id: RemoteId,
    ) {
        self.usage_mut(kind, handle).set_remote_id(env, template_id);
    }

    /// Remove `env` from the usage entry for `(kind, handle)`.
    pub fn detach_usage(
        &mut self,
        kind: TemplateKind,
        handle: &str,
        env: Environment,
        template_id: RemoteId,
    ) -> DetachChange {
        let Some(index) = self.used_in.iter().position(|e| e.matches(kind, handle)) else {
            return DetachChange::Absent;
        };
        if detach_link(&mut self.used_in[index], env, template_id) {
            self.used_in.remove(index);
            DetachChange::Removed
        } else {
            DetachChange::Pruned
        }
    }

    /// Look up the reverse link to a shared part.
    pub fn shared_part(&self, name: &str) -> Option<&SharedPartLink> {
        self.shared_parts.iter().find(|l| l.name == name)
    }

    /// Record that this template embeds `name` in `env`.
    pub fn record_shared_part(&mut self, name: &str, env: Environment, shared_part_id: RemoteId) {
        let index = match self.shared_parts.iter().position(|l| l.name == name) {
            Some(index) => index,
            None => {
                self.shared_parts.push(SharedPartLink {
                    name: name.to_string(),
                    id: IdMap::new(),
                    partner_id: IdMap::new(),
                });
                self.shared_parts.len() - 1
            }
        };
        self.shared_parts[index].set_remote_id(env, shared_part_id);
    }

    /// Remove `env` from the reverse link to `name`.
    pub fn detach_shared_part(
        &mut self,
        name: &str,
        env: Environment,
        shared_part_id: RemoteId,
    ) -> DetachChange {
        let Some(index) = self.shared_parts.iter().position(|l| l.name == name) else {
            return DetachChange::Absent;
        };
        if detach_link(&mut self.shared_parts[index], env, shared_part_id) {
            self.shared_parts.remove(index);
            DetachChange::Removed
        } else {
            DetachChange::Pruned
        }
    }
}
