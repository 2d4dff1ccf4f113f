//! Session identity. Any non-blank username is accepted; the session id
//! is opaque to everything downstream.

use crate::{
    error::{EngineError, EngineResult},
    types::Username,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub username:   Username,
    pub session_id: String,
    pub login_time: DateTime<Utc>,
}

impl Session {
    pub fn login(username: &str) -> EngineResult<Self> {
        let username = username.trim();
        if username.is_empty() {
            return Err(EngineError::BlankUsername);
        }
        let now = Utc::now();
        Ok(Self {
            username:   username.to_string(),
            session_id: format!("session_{username}_{}", now.timestamp_millis()),
            login_time: now,
        })
    }
}
