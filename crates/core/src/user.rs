//! User record created on first successful login.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Entity, OwnerId};

/// A user known to the system.
///
/// The id is the identity provider's numeric user id, used verbatim as the
/// owner id of everything the user creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub handle: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn owner_id(&self) -> OwnerId {
        OwnerId::from(self.id)
    }
}

impl Entity for User {
    type Id = i64;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
