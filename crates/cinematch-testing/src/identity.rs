//! Mock gateway identity for integration tests.
//!
//! Services behind the gateway receive an `x-cinematch-user-id` header
//! injected after authentication. In tests the header is injected directly,
//! so no real gateway is needed.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use uuid::Uuid;

/// Identity injected into test requests as if the gateway did it.
pub struct MockIdentity {
    pub user_id: Uuid,
}

impl MockIdentity {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }

    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static("x-cinematch-user-id"),
            HeaderValue::from_str(&self.user_id.to_string()).unwrap(),
        );
        map
    }
}
