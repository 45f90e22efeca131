//! Profile page state: the signed-in user and, for master accounts, the users
//! linked to it.

use crate::{
    features::{
        FlowFailure, FlowResult, FlowSuccess,
        users::{UserProfile, UserService},
    },
    state::{Observable, merge_object},
};
use secrecy::SecretString;
use serde_json::{Map, Value};
use std::time::SystemTime;
use tracing::{debug, warn};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileState {
    pub current_user: Option<UserProfile>,
    pub associated_users: Vec<UserProfile>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_updated: Option<SystemTime>,
}

/// Everything the profile page renders, fetched in one go.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileData {
    pub user: UserProfile,
    pub users: Vec<UserProfile>,
}

#[derive(Clone, Debug)]
pub struct ProfileStore {
    service: UserService,
    state: Observable<ProfileState>,
}

impl ProfileStore {
    #[must_use]
    pub fn new(service: UserService) -> Self {
        Self {
            service,
            state: Observable::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &Observable<ProfileState> {
        &self.state
    }

    #[must_use]
    pub fn current(&self) -> Option<UserProfile> {
        self.state.with(|state| state.current_user.clone())
    }

    #[must_use]
    pub fn associated(&self) -> Vec<UserProfile> {
        self.state.with(|state| state.associated_users.clone())
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.state.with(|state| state.loading)
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state.with(|state| state.error.clone())
    }

    #[must_use]
    pub fn is_master(&self) -> bool {
        self.state.with(|state| {
            state
                .current_user
                .as_ref()
                .is_some_and(|user| user.is_master)
        })
    }

    pub async fn current_user(&self) -> FlowResult<UserProfile> {
        self.begin();
        let result = self.service.current_user().await;
        match &result {
            Ok(success) => {
                let user = success.data.clone();
                self.state.update(|state| {
                    state.current_user = Some(user);
                    state.loading = false;
                    state.error = None;
                    state.last_updated = Some(SystemTime::now());
                });
            }
            Err(failure) => self.fail(failure),
        }
        result
    }

    pub async fn associated_users(&self) -> FlowResult<Vec<UserProfile>> {
        self.begin();
        let result = self.service.users().await;
        match &result {
            Ok(success) => {
                let users = success.data.clone();
                self.state.update(|state| {
                    state.associated_users = users;
                    state.loading = false;
                    state.error = None;
                    state.last_updated = Some(SystemTime::now());
                });
            }
            Err(failure) => self.fail(failure),
        }
        result
    }

    pub async fn change_password(
        &self,
        old_password: &SecretString,
        new_password: &SecretString,
    ) -> FlowResult<Value> {
        self.begin();
        let result = self
            .service
            .change_password(old_password, new_password)
            .await;
        let error = result.as_ref().err().map(|failure| failure.message.clone());
        self.state.update(|state| {
            state.loading = false;
            state.error = error;
        });
        result
    }

    /// Loads the current user and, for a master account, its linked users. A
    /// failure fetching the linked users is ignored and leaves the list empty.
    pub async fn load_profile_data(&self) -> FlowResult<ProfileData> {
        self.begin();

        let user = match self.service.current_user().await {
            Ok(success) => success.data,
            Err(failure) => {
                self.fail(&failure);
                return Err(failure);
            }
        };

        let users = if user.is_master {
            match self.service.users().await {
                Ok(success) => success.data,
                Err(failure) => {
                    debug!("linked users unavailable: {}", failure.message);
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        let (current_user, associated_users) = (user.clone(), users.clone());
        self.state.update(|state| {
            state.current_user = Some(current_user);
            state.associated_users = associated_users;
            state.loading = false;
            state.error = None;
            state.last_updated = Some(SystemTime::now());
        });

        Ok(FlowSuccess::new("", ProfileData { user, users }))
    }

    pub fn clear_error(&self) {
        self.state.update(|state| state.error = None);
    }

    pub fn clear(&self) {
        self.state.set(ProfileState::default());
    }

    /// Shallow-merges `patch` into the current user. A patch that would make
    /// the profile unreadable (for example a non-boolean `is_master`) is dropped.
    pub fn update_current_user(&self, patch: Map<String, Value>) {
        self.state.update(|state| {
            let current = state
                .current_user
                .as_ref()
                .and_then(|user| serde_json::to_value(user).ok());
            match serde_json::from_value::<UserProfile>(merge_object(current, patch)) {
                Ok(user) => state.current_user = Some(user),
                Err(err) => warn!("ignoring profile update: {err}"),
            }
        });
    }

    fn begin(&self) {
        self.state.update(|state| {
            state.loading = true;
            state.error = None;
        });
    }

    fn fail(&self, failure: &FlowFailure) {
        let message = failure.message.clone();
        self.state.update(|state| {
            state.loading = false;
            state.error = Some(message);
        });
    }
}
