use crate::client::RoleBackend;
use crate::form::{reduce, Action, FormState, Operation};

/// Performs a pending operation against the backend and returns the action
/// that reports its outcome to the reducer.
pub async fn perform<B: RoleBackend + ?Sized>(backend: &B, operation: Operation) -> Action {
    match operation {
        Operation::Add(record) => {
            match backend
                .create_assignment(&record.email, record.role, record.permission)
                .await
            {
                Ok(()) => {
                    tracing::info!("Added {} as {} ({})", record.email, record.role, record.permission);
                    Action::AddSucceeded(record)
                }
                Err(err) => {
                    tracing::error!("Error adding user: {}", err);
                    Action::AddFailed(err)
                }
            }
        }
        Operation::Delete(email) => match backend.delete_assignment(&email).await {
            Ok(()) => {
                tracing::info!("Deleted role assignments for {}", email);
                Action::DeleteSucceeded(email)
            }
            Err(err) => {
                tracing::error!("Error deleting user: {}", err);
                Action::DeleteFailed(err)
            }
        },
    }
}

/// Owns the form state and the backend, running each submission to
/// completion before returning.
pub struct ListSynchronizer<B> {
    backend: B,
    state: FormState,
}

impl<B: RoleBackend> ListSynchronizer<B> {
    pub fn new(backend: B) -> Self {
        Self::with_state(backend, FormState::new())
    }

    pub fn with_state(backend: B, state: FormState) -> Self {
        Self { backend, state }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn into_state(self) -> FormState {
        self.state
    }

    pub fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    pub async fn add(&mut self) {
        self.dispatch(Action::SubmitAdd);
        self.flush().await;
    }

    pub async fn delete(&mut self, email: &str) {
        self.dispatch(Action::SubmitDelete(email.to_string()));
        self.flush().await;
    }

    async fn flush(&mut self) {
        if let Some(operation) = self.state.pending().cloned() {
            let outcome = perform(&self.backend, operation).await;
            self.dispatch(outcome);
        }
    }
}
