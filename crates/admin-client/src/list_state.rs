//! Loading state for the user list view.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::api::UsersApi;
use crate::error::ClientError;
use crate::model::User;

/// Callback fired with the list and loading flag after every change.
type Observer = Box<dyn Fn(&[User], bool) + Send + Sync>;

/// The user list with its loading flag.
///
/// Failures leave the last fetched list in place and clear the flag, so the
/// view stays usable after a transient error. The flag is only `true` while a
/// request is in flight, so views follow it through [`Self::with_observer`].
pub struct UserListState {
    api: Arc<dyn UsersApi>,
    users: Vec<User>,
    is_loading: bool,
    observer: Option<Observer>,
}

impl UserListState {
    pub fn new(api: Arc<dyn UsersApi>) -> Self {
        Self {
            api,
            users: Vec::new(),
            is_loading: false,
            observer: None,
        }
    }

    /// Redraw hook, called before each request and after each outcome.
    #[must_use]
    pub fn with_observer(
        mut self,
        observer: impl Fn(&[User], bool) + Send + Sync + 'static,
    ) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    fn set_loading(&mut self, is_loading: bool) {
        self.is_loading = is_loading;
        if let Some(observer) = &self.observer {
            observer(&self.users, self.is_loading);
        }
    }

    /// Replace the list with the API's current users.
    ///
    /// # Errors
    /// Returns the API failure after logging it; the previous list is kept.
    pub async fn fetch_users(&mut self) -> Result<(), ClientError> {
        self.set_loading(true);
        match self.api.list_users().await {
            Ok(users) => {
                self.users = users;
                self.set_loading(false);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch users");
                self.set_loading(false);
                Err(err)
            }
        }
    }

    /// Delete `id`, then refresh the list.
    ///
    /// # Errors
    /// Returns the delete failure (list untouched, no refresh) or the refresh
    /// failure.
    pub async fn remove(&mut self, id: Uuid) -> Result<(), ClientError> {
        self.set_loading(true);
        if let Err(err) = self.api.delete_user(id).await {
            warn!(error = %err, user_id = %id, "failed to delete user");
            self.set_loading(false);
            return Err(err);
        }
        self.fetch_users().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockUsersApi;
    use chrono::{TimeZone, Utc};
    use mockall::Sequence;
    use rstest::rstest;
    use std::sync::Mutex;

    /// Observer recording `(user count, is_loading)` for every redraw.
    fn recorder() -> (Arc<Mutex<Vec<(usize, bool)>>>, impl Fn(&[User], bool) + Send + Sync) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |users: &[User], loading: bool| {
            sink.lock().expect("recorder lock").push((users.len(), loading));
        })
    }

    fn user(email: &str) -> User {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().expect("timestamp");
        User {
            id: Uuid::new_v4(),
            email: email.to_owned(),
            created_at: at,
            updated_at: at,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn fetch_replaces_users_and_clears_loading() {
        let listed = vec![user("default@email.com"), user("other@email.com")];
        let expected = listed.clone();
        let mut api = MockUsersApi::new();
        api.expect_list_users()
            .times(1)
            .returning(move || Ok(listed.clone()));
        let mut state = UserListState::new(Arc::new(api));

        state.fetch_users().await.expect("fetch succeeds");

        assert_eq!(state.users(), expected.as_slice());
        assert!(!state.is_loading());
    }

    #[rstest]
    #[tokio::test]
    async fn failed_fetch_keeps_previous_users() {
        let first = vec![user("default@email.com")];
        let expected = first.clone();
        let mut api = MockUsersApi::new();
        let mut seq = Sequence::new();
        api.expect_list_users()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move || Ok(first.clone()));
        api.expect_list_users()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(ClientError::transport("connection refused")));
        let mut state = UserListState::new(Arc::new(api));

        state.fetch_users().await.expect("first fetch");
        let err = state.fetch_users().await.expect_err("second fetch fails");

        assert!(matches!(err, ClientError::Transport { .. }));
        assert_eq!(state.users(), expected.as_slice());
        assert!(!state.is_loading());
    }

    #[rstest]
    #[tokio::test]
    async fn remove_deletes_then_refetches() {
        let kept = user("kept@email.com");
        let doomed = user("doomed@email.com");
        let doomed_id = doomed.id;
        let after = vec![kept.clone()];
        let mut api = MockUsersApi::new();
        let mut seq = Sequence::new();
        api.expect_delete_user()
            .withf(move |id| *id == doomed_id)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        api.expect_list_users()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move || Ok(after.clone()));
        let mut state = UserListState::new(Arc::new(api));

        state.remove(doomed_id).await.expect("remove succeeds");

        assert_eq!(state.users(), [kept].as_slice());
        assert!(!state.is_loading());
    }

    #[rstest]
    #[tokio::test]
    async fn failed_remove_skips_refetch() {
        let mut api = MockUsersApi::new();
        api.expect_delete_user()
            .times(1)
            .returning(|_| Err(ClientError::api(404, "User not found")));
        api.expect_list_users().never();
        let mut state = UserListState::new(Arc::new(api));

        let err = state.remove(Uuid::new_v4()).await.expect_err("delete fails");

        assert_eq!(err.status_code(), Some(404));
        assert!(state.users().is_empty());
        assert!(!state.is_loading());
    }

    #[rstest]
    #[tokio::test]
    async fn observer_sees_loading_while_a_request_is_in_flight() {
        let mut api = MockUsersApi::new();
        let mut seq = Sequence::new();
        api.expect_delete_user()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        api.expect_list_users()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![user("kept@email.com")]));
        let (seen, observer) = recorder();
        let mut state = UserListState::new(Arc::new(api)).with_observer(observer);

        state.remove(Uuid::new_v4()).await.expect("remove succeeds");

        let seen = seen.lock().expect("recorder lock").clone();
        assert_eq!(seen, vec![(0, true), (0, true), (1, false)]);
    }

    #[rstest]
    #[tokio::test]
    async fn observer_sees_loading_cleared_after_a_failure() {
        let mut api = MockUsersApi::new();
        api.expect_list_users()
            .times(1)
            .returning(|| Err(ClientError::api(503, "Service Unavailable")));
        let (seen, observer) = recorder();
        let mut state = UserListState::new(Arc::new(api)).with_observer(observer);

        state.fetch_users().await.expect_err("fetch fails");

        let seen = seen.lock().expect("recorder lock").clone();
        assert_eq!(seen, vec![(0, true), (0, false)]);
    }
}
