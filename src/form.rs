//! Form state and the reducer that drives it.
//!
//! Every change to the form goes through [`reduce`]: field edits, submissions
//! and the completions reported by the synchronizer. The reducer is pure, so
//! the terminal form and the one-shot commands share the same behaviour.

use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::roles::{Role, SubPermission};

pub const ADD_SUCCESS: &str = "User added successfully!";
pub const DELETE_SUCCESS: &str = "User deleted successfully!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftEntry {
    pub email: String,
    pub role: Role,
    pub sub_permission: SubPermission,
}

impl Default for DraftEntry {
    fn default() -> Self {
        Self {
            email: String::new(),
            role: Role::User,
            sub_permission: Role::User.default_sub_permission(),
        }
    }
}

impl DraftEntry {
    /// Draft shown after a successful add. `Commentor` is kept only when the
    /// role was already `User`; otherwise the reset is a role change and the
    /// derived sub-permission applies.
    pub fn after_add(previous_role: Role) -> Self {
        let sub_permission = if previous_role == Role::User {
            SubPermission::Commentor
        } else {
            Role::User.default_sub_permission()
        };

        Self {
            email: String::new(),
            role: Role::User,
            sub_permission,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,
    pub role: Role,
    pub permission: SubPermission,
}

impl From<&DraftEntry> for UserRecord {
    fn from(draft: &DraftEntry) -> Self {
        Self {
            email: draft.email.clone(),
            role: draft.role,
            permission: draft.sub_permission,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Error(String),
    Success(String),
}

impl StatusMessage {
    pub fn text(&self) -> &str {
        match self {
            StatusMessage::Error(text) | StatusMessage::Success(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, StatusMessage::Error(_))
    }
}

/// A backend call waiting to be performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Add(UserRecord),
    Delete(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting(Operation),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormState {
    pub draft: DraftEntry,
    pub status: Option<StatusMessage>,
    pub users: Vec<UserRecord>,
    pub phase: Phase,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, Phase::Submitting(_))
    }

    pub fn pending(&self) -> Option<&Operation> {
        match &self.phase {
            Phase::Submitting(op) => Some(op),
            Phase::Idle => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetEmail(String),
    SetRole(Role),
    SetSubPermission(SubPermission),
    SubmitAdd,
    SubmitDelete(String),
    AddSucceeded(UserRecord),
    AddFailed(SyncError),
    DeleteSucceeded(String),
    DeleteFailed(SyncError),
}

/// Only rule applied to the email: it must contain an `@`.
pub fn validate_email(email: &str) -> Result<(), SyncError> {
    if email.contains('@') {
        Ok(())
    } else {
        Err(SyncError::invalid_email())
    }
}

pub fn reduce(mut state: FormState, action: Action) -> FormState {
    match action {
        Action::SetEmail(email) => {
            state.draft.email = email;
        }
        Action::SetRole(role) => {
            if state.draft.role != role {
                state.draft.role = role;
                state.draft.sub_permission = role.default_sub_permission();
            }
        }
        Action::SetSubPermission(sub_permission) => {
            if state.draft.role.allows(sub_permission) {
                state.draft.sub_permission = sub_permission;
            } else {
                tracing::debug!(
                    "Ignoring sub-permission {} not offered for role {}",
                    sub_permission,
                    state.draft.role
                );
            }
        }
        Action::SubmitAdd => {
            if state.is_submitting() {
                tracing::debug!("Ignoring add while another request is in flight");
                return state;
            }
            state.status = None;
            match validate_email(&state.draft.email) {
                Ok(()) => {
                    let record = UserRecord::from(&state.draft);
                    state.phase = Phase::Submitting(Operation::Add(record));
                }
                Err(err) => {
                    state.status = Some(StatusMessage::Error(err.message().to_string()));
                }
            }
        }
        Action::SubmitDelete(email) => {
            if state.is_submitting() {
                tracing::debug!("Ignoring delete while another request is in flight");
                return state;
            }
            if state.status.as_ref().is_some_and(StatusMessage::is_error) {
                state.status = None;
            }
            state.phase = Phase::Submitting(Operation::Delete(email));
        }
        Action::AddSucceeded(record) => {
            state.phase = Phase::Idle;
            state.users.push(record);
            state.draft = DraftEntry::after_add(state.draft.role);
            state.status = Some(StatusMessage::Success(ADD_SUCCESS.to_string()));
        }
        Action::DeleteSucceeded(email) => {
            state.phase = Phase::Idle;
            state.users.retain(|user| user.email != email);
            state.status = Some(StatusMessage::Success(DELETE_SUCCESS.to_string()));
        }
        Action::AddFailed(err) | Action::DeleteFailed(err) => {
            state.phase = Phase::Idle;
            state.status = Some(StatusMessage::Error(err.message().to_string()));
        }
    }

    state
}
