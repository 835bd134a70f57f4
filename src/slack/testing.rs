//! In-memory Slack workspace for handler tests

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::api::SlackApi;
use super::types::{AuthIdentity, Channel, User, UserGroup, UserGroupSpec};
use crate::error::{Error, Result};
use crate::resolve::Page;

#[derive(Default)]
struct Workspace {
    channels: Vec<Channel>,
    users: Vec<User>,
    usergroups: Vec<UserGroup>,
    members: HashMap<String, Vec<String>>,
    next_id: u32,
}

/// Fake Slack backed by vectors, paginating with numeric cursors
pub(crate) struct MockSlack {
    workspace: Mutex<Workspace>,
    page_size: usize,
    calls: Mutex<Vec<String>>,
    rate_limit_once: Mutex<HashSet<&'static str>>,
    failures: Mutex<HashMap<&'static str, String>>,
}

impl Default for MockSlack {
    fn default() -> Self {
        Self::new(2)
    }
}

pub(crate) fn channel(id: &str, name: &str) -> Channel {
    Channel {
        id: id.to_string(),
        name: name.to_string(),
        ..Channel::default()
    }
}

pub(crate) fn user(id: &str, name: &str, email: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        real_name: format!("{} Example", name),
        email: email.to_string(),
        tz: "Europe/Warsaw".to_string(),
        ..User::default()
    }
}

pub(crate) fn usergroup(id: &str, handle: &str, name: &str) -> UserGroup {
    UserGroup {
        id: id.to_string(),
        handle: handle.to_string(),
        name: name.to_string(),
        ..UserGroup::default()
    }
}

impl MockSlack {
    pub fn new(page_size: usize) -> Self {
        Self {
            workspace: Mutex::new(Workspace {
                next_id: 100,
                ..Workspace::default()
            }),
            page_size,
            calls: Mutex::new(Vec::new()),
            rate_limit_once: Mutex::new(HashSet::new()),
            failures: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_channels(self, channels: Vec<Channel>) -> Self {
        self.workspace.lock().unwrap().channels = channels;
        self
    }

    pub fn with_users(self, users: Vec<User>) -> Self {
        self.workspace.lock().unwrap().users = users;
        self
    }

    pub fn with_usergroups(self, usergroups: Vec<UserGroup>) -> Self {
        self.workspace.lock().unwrap().usergroups = usergroups;
        self
    }

    pub fn with_members(self, channel_id: &str, members: &[&str]) -> Self {
        self.workspace.lock().unwrap().members.insert(
            channel_id.to_string(),
            members.iter().map(|m| m.to_string()).collect(),
        );
        self
    }

    /// Next call to `method` answers with a zero-length rate limit.
    pub fn rate_limit_once(self, method: &'static str) -> Self {
        self.rate_limit_once.lock().unwrap().insert(method);
        self
    }

    /// Every call to `method` fails with this Slack error code.
    pub fn fail(self, method: &'static str, code: &str) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(method, code.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == method).count()
    }

    pub fn channel(&self, id: &str) -> Option<Channel> {
        let ws = self.workspace.lock().unwrap();
        ws.channels.iter().find(|c| c.id == id).cloned()
    }

    pub fn usergroups(&self) -> Vec<UserGroup> {
        self.workspace.lock().unwrap().usergroups.clone()
    }

    fn record(&self, method: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(method.to_string());
        if self.rate_limit_once.lock().unwrap().remove(method) {
            return Err(Error::RateLimited {
                retry_after: Duration::ZERO,
            });
        }
        if let Some(code) = self.failures.lock().unwrap().get(method) {
            return Err(Error::Slack(code.clone()));
        }
        Ok(())
    }

    fn paginate<T: Clone>(&self, items: &[T], cursor: Option<&str>) -> Page<T> {
        let start: usize = cursor.and_then(|c| c.parse().ok()).unwrap_or(0);
        let end = (start + self.page_size).min(items.len());
        let next = (end < items.len()).then(|| end.to_string());
        Page::new(items[start.min(end)..end].to_vec(), next)
    }

    fn next_id(&self, prefix: char) -> String {
        let mut ws = self.workspace.lock().unwrap();
        ws.next_id += 1;
        format!("{}{}", prefix, ws.next_id)
    }

    fn with_channel<T>(&self, id: &str, f: impl FnOnce(&mut Channel) -> T) -> Result<T> {
        let mut ws = self.workspace.lock().unwrap();
        ws.channels
            .iter_mut()
            .find(|c| c.id == id)
            .map(f)
            .ok_or_else(|| Error::Slack("channel_not_found".to_string()))
    }
}

#[async_trait]
impl SlackApi for MockSlack {
    async fn auth_test(&self) -> Result<AuthIdentity> {
        self.record("auth.test")?;
        Ok(AuthIdentity {
            team: "Test Team".to_string(),
            team_id: "T12345".to_string(),
            user: "terraform".to_string(),
            user_id: "U0BOT".to_string(),
        })
    }

    async fn list_conversations(
        &self,
        cursor: Option<&str>,
        exclude_archived: bool,
    ) -> Result<Page<Channel>> {
        self.record("conversations.list")?;
        let visible: Vec<Channel> = {
            let ws = self.workspace.lock().unwrap();
            ws.channels
                .iter()
                .filter(|c| !(exclude_archived && c.is_archived))
                .cloned()
                .collect()
        };
        Ok(self.paginate(&visible, cursor))
    }

    async fn conversation_info(&self, channel_id: &str) -> Result<Channel> {
        self.record("conversations.info")?;
        self.with_channel(channel_id, |c| c.clone())
    }

    async fn create_conversation(&self, name: &str, is_private: bool) -> Result<Channel> {
        self.record("conversations.create")?;
        if self
            .workspace
            .lock()
            .unwrap()
            .channels
            .iter()
            .any(|c| c.name == name)
        {
            return Err(Error::Slack("name_taken".to_string()));
        }
        let created = Channel {
            id: self.next_id('C'),
            name: name.to_string(),
            is_private,
            ..Channel::default()
        };
        self.workspace
            .lock()
            .unwrap()
            .channels
            .push(created.clone());
        Ok(created)
    }

    async fn set_conversation_purpose(&self, channel_id: &str, purpose: &str) -> Result<()> {
        self.record("conversations.setPurpose")?;
        self.with_channel(channel_id, |c| c.purpose = purpose.to_string())
    }

    async fn set_conversation_topic(&self, channel_id: &str, topic: &str) -> Result<()> {
        self.record("conversations.setTopic")?;
        self.with_channel(channel_id, |c| c.topic = topic.to_string())
    }

    async fn rename_conversation(&self, channel_id: &str, name: &str) -> Result<Channel> {
        self.record("conversations.rename")?;
        self.with_channel(channel_id, |c| {
            c.name = name.to_string();
            c.clone()
        })
    }

    async fn archive_conversation(&self, channel_id: &str) -> Result<()> {
        self.record("conversations.archive")?;
        self.with_channel(channel_id, |c| c.is_archived = true)
    }

    async fn conversation_members(
        &self,
        channel_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<String>> {
        self.record("conversations.members")?;
        let members = self
            .workspace
            .lock()
            .unwrap()
            .members
            .get(channel_id)
            .cloned()
            .ok_or_else(|| Error::Slack("channel_not_found".to_string()))?;
        Ok(self.paginate(&members, cursor))
    }

    async fn list_users(&self, cursor: Option<&str>) -> Result<Page<User>> {
        self.record("users.list")?;
        let users = self.workspace.lock().unwrap().users.clone();
        Ok(self.paginate(&users, cursor))
    }

    async fn user_info(&self, user_id: &str) -> Result<User> {
        self.record("users.info")?;
        let ws = self.workspace.lock().unwrap();
        ws.users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or_else(|| Error::Slack("user_not_found".to_string()))
    }

    async fn lookup_user_by_email(&self, email: &str) -> Result<User> {
        self.record("users.lookupByEmail")?;
        let ws = self.workspace.lock().unwrap();
        ws.users
            .iter()
            .find(|u| u.email == email && !u.deleted)
            .cloned()
            .ok_or_else(|| Error::Slack("users_not_found".to_string()))
    }

    async fn list_usergroups(&self) -> Result<Vec<UserGroup>> {
        self.record("usergroups.list")?;
        Ok(self.usergroups())
    }

    async fn create_usergroup(&self, spec: &UserGroupSpec) -> Result<UserGroup> {
        self.record("usergroups.create")?;
        let created = UserGroup {
            id: self.next_id('S'),
            handle: spec.handle.clone(),
            name: spec.name.clone(),
            description: spec.description.clone(),
            is_external: false,
        };
        self.workspace
            .lock()
            .unwrap()
            .usergroups
            .push(created.clone());
        Ok(created)
    }

    async fn update_usergroup(
        &self,
        usergroup_id: &str,
        spec: &UserGroupSpec,
    ) -> Result<UserGroup> {
        self.record("usergroups.update")?;
        let mut ws = self.workspace.lock().unwrap();
        let group = ws
            .usergroups
            .iter_mut()
            .find(|g| g.id == usergroup_id)
            .ok_or_else(|| Error::Slack("no_such_subteam".to_string()))?;
        group.name = spec.name.clone();
        if !spec.handle.is_empty() {
            group.handle = spec.handle.clone();
        }
        group.description = spec.description.clone();
        Ok(group.clone())
    }

    async fn disable_usergroup(&self, usergroup_id: &str) -> Result<UserGroup> {
        self.record("usergroups.disable")?;
        let mut ws = self.workspace.lock().unwrap();
        let idx = ws
            .usergroups
            .iter()
            .position(|g| g.id == usergroup_id)
            .ok_or_else(|| Error::Slack("no_such_subteam".to_string()))?;
        Ok(ws.usergroups.remove(idx))
    }
}
