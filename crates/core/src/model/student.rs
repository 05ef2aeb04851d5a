use serde::{Deserialize, Serialize};

use crate::model::ids::{StudentId, UserId};

/// The student record attached to an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    id: StudentId,
    user_id: UserId,
    display_name: Option<String>,
}

impl Student {
    #[must_use]
    pub fn new(id: StudentId, user_id: UserId, display_name: Option<String>) -> Self {
        let display_name = display_name
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty());
        Self {
            id,
            user_id,
            display_name,
        }
    }

    #[must_use]
    pub fn id(&self) -> &StudentId {
        &self.id
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }
}
