use bizdesk_core::UserIdentity;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for password login.
#[derive(Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/login-request.ts"
)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// API representation of the authenticated user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-identity-response.ts"
)]
pub struct UserIdentityResponse {
    pub user_id: String,
    pub display_name: String,
    pub email: Option<String>,
}

impl From<UserIdentity> for UserIdentityResponse {
    fn from(identity: UserIdentity) -> Self {
        Self {
            user_id: identity.user_id().to_owned(),
            display_name: identity.display_name().to_owned(),
            email: identity.email().map(ToOwned::to_owned),
        }
    }
}
