use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Namespace for deriving local identity ids from e-mail addresses.
const IDENTITY_NAMESPACE: Uuid = Uuid::from_u128(0x6b1f_3c2e_9d4a_4e7b_8f10_5a2c_7e9d_0b31);

/// Default generation constraints a profile carries between sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePreferences {
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub avoid_ingredients: String,
}

/// Local identity stub. There is no verification: the id is derived from the
/// e-mail so signing in again lands in the same saved-recipe scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub preferences: ProfilePreferences,
}

impl UserIdentity {
    pub fn sign_in(name: &str, email: &str) -> Self {
        let email = email.trim().to_lowercase();
        Self {
            id: Uuid::new_v5(&IDENTITY_NAMESPACE, email.as_bytes()),
            name: name.trim().to_string(),
            email,
            preferences: ProfilePreferences::default(),
        }
    }
}
