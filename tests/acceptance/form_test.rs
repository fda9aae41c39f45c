use roleform::error::SyncError;
use roleform::form::{
    reduce, validate_email, Action, DraftEntry, FormState, Operation, StatusMessage, UserRecord,
    ADD_SUCCESS, DELETE_SUCCESS,
};
use roleform::roles::{Role, SubPermission, ROLE_CHOICES};

fn record(email: &str, role: Role, permission: SubPermission) -> UserRecord {
    UserRecord {
        email: email.to_string(),
        role,
        permission,
    }
}

fn apply(state: FormState, actions: Vec<Action>) -> FormState {
    actions.into_iter().fold(state, reduce)
}

#[test]
fn test_initial_draft_defaults() {
    let state = FormState::new();
    assert_eq!(state.draft.email, "");
    assert_eq!(state.draft.role, Role::User);
    assert_eq!(state.draft.sub_permission, SubPermission::Viewer);
    assert_eq!(state.draft, DraftEntry::default());
    assert!(state.users.is_empty());
    assert!(state.status.is_none());
}

#[test]
fn test_role_change_derives_first_sub_permission() {
    for role in ROLE_CHOICES {
        let other = if role == Role::Admin { Role::User } else { Role::Admin };
        let state = apply(FormState::new(), vec![Action::SetRole(other), Action::SetRole(role)]);
        assert_eq!(state.draft.sub_permission, role.sub_permissions()[0]);
    }
}

#[test]
fn test_validate_email() {
    assert!(validate_email("foo").is_err());
    assert!(validate_email("a@b").is_ok());
    assert_eq!(
        validate_email("foo").unwrap_err().to_string(),
        "Invalid email format."
    );
}

#[test]
fn test_invalid_email_never_submits() {
    let state = apply(
        FormState::new(),
        vec![Action::SetEmail("not-an-email".to_string()), Action::SubmitAdd],
    );

    assert!(!state.is_submitting());
    assert_eq!(
        state.status,
        Some(StatusMessage::Error("Invalid email format.".to_string()))
    );
    assert_eq!(state.draft.email, "not-an-email");
}

#[test]
fn test_submit_add_clears_previous_status() {
    let mut state = FormState::new();
    state.status = Some(StatusMessage::Success(DELETE_SUCCESS.to_string()));

    let state = apply(
        state,
        vec![Action::SetEmail("a@b.com".to_string()), Action::SubmitAdd],
    );

    assert!(state.status.is_none());
    assert_eq!(
        state.pending(),
        Some(&Operation::Add(record("a@b.com", Role::User, SubPermission::Viewer)))
    );
}

#[test]
fn test_add_success_appends_and_resets() {
    let state = apply(
        FormState::new(),
        vec![
            Action::SetEmail("a@b.com".to_string()),
            Action::SetSubPermission(SubPermission::Viewer),
            Action::SubmitAdd,
            Action::AddSucceeded(record("a@b.com", Role::User, SubPermission::Viewer)),
        ],
    );

    assert_eq!(state.users, vec![record("a@b.com", Role::User, SubPermission::Viewer)]);
    assert_eq!(
        state.draft,
        DraftEntry {
            email: String::new(),
            role: Role::User,
            sub_permission: SubPermission::Commentor,
        }
    );
    assert_eq!(state.status, Some(StatusMessage::Success(ADD_SUCCESS.to_string())));
    assert!(!state.is_submitting());
}

#[test]
fn test_admin_add_success_resets_to_derived_user_sub_permission() {
    let state = apply(
        FormState::new(),
        vec![
            Action::SetEmail("a@b.com".to_string()),
            Action::SetRole(Role::Admin),
            Action::SubmitAdd,
            Action::AddSucceeded(record("a@b.com", Role::Admin, SubPermission::Editor)),
        ],
    );

    assert_eq!(state.users, vec![record("a@b.com", Role::Admin, SubPermission::Editor)]);
    assert_eq!(state.draft.email, "");
    assert_eq!(state.draft.role, Role::User);
    assert_eq!(state.draft.sub_permission, SubPermission::Viewer);
}

#[test]
fn test_add_failure_keeps_list_and_draft() {
    let state = apply(
        FormState::new(),
        vec![
            Action::SetEmail("a@b.com".to_string()),
            Action::SubmitAdd,
            Action::AddFailed(SyncError::Backend("duplicate".to_string())),
        ],
    );

    assert!(state.users.is_empty());
    assert_eq!(state.draft.email, "a@b.com");
    assert_eq!(state.status, Some(StatusMessage::Error("duplicate".to_string())));
}

#[test]
fn test_delete_keeps_prior_success_message() {
    let mut state = FormState::new();
    state.status = Some(StatusMessage::Success(ADD_SUCCESS.to_string()));

    let state = reduce(state, Action::SubmitDelete("a@b.com".to_string()));
    assert_eq!(state.status, Some(StatusMessage::Success(ADD_SUCCESS.to_string())));

    let mut state = FormState::new();
    state.status = Some(StatusMessage::Error("boom".to_string()));
    let state = reduce(state, Action::SubmitDelete("a@b.com".to_string()));
    assert!(state.status.is_none());
}

#[test]
fn test_delete_removes_every_matching_record() {
    let mut state = FormState::new();
    state.users = vec![
        record("a@b.com", Role::User, SubPermission::Viewer),
        record("c@d.com", Role::Admin, SubPermission::Editor),
        record("a@b.com", Role::Admin, SubPermission::Editor),
    ];

    let state = apply(
        state,
        vec![
            Action::SubmitDelete("a@b.com".to_string()),
            Action::DeleteSucceeded("a@b.com".to_string()),
        ],
    );

    assert_eq!(state.users, vec![record("c@d.com", Role::Admin, SubPermission::Editor)]);
    assert_eq!(state.status, Some(StatusMessage::Success(DELETE_SUCCESS.to_string())));
}

#[test]
fn test_submissions_are_serialized() {
    let state = apply(
        FormState::new(),
        vec![
            Action::SetEmail("a@b.com".to_string()),
            Action::SubmitAdd,
            Action::SubmitDelete("x@y.com".to_string()),
            Action::SubmitAdd,
        ],
    );

    assert_eq!(
        state.pending(),
        Some(&Operation::Add(record("a@b.com", Role::User, SubPermission::Viewer)))
    );
}
