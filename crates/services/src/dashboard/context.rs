use dashboard_core::model::UserId;

/// The authenticated user as the dashboard sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: UserId,
    pub email: Option<String>,
}

impl SessionUser {
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            email: None,
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        let email = email.into();
        self.email = Some(email.trim().to_owned()).filter(|e| !e.is_empty());
        self
    }
}

/// Who is looking at the dashboard and on which plan.
///
/// Passed explicitly into every fetch; there is no ambient session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardContext {
    pub user: Option<SessionUser>,
    pub plan: Option<String>,
}

impl DashboardContext {
    /// Nobody is logged in.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn for_user(user: SessionUser) -> Self {
        Self {
            user: Some(user),
            plan: None,
        }
    }

    #[must_use]
    pub fn with_plan(mut self, plan: impl Into<String>) -> Self {
        self.plan = Some(plan.into());
        self
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&UserId> {
        self.user.as_ref().map(|u| &u.user_id)
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.email.as_deref())
    }

    #[must_use]
    pub fn plan(&self) -> Option<&str> {
        self.plan.as_deref()
    }

    /// The inputs a cached snapshot depends on.
    #[must_use]
    pub fn load_key(&self) -> LoadKey {
        LoadKey {
            user: self.user_id().cloned(),
            plan: self.plan.clone(),
        }
    }
}

/// Identity of a load: a snapshot for one key is stale for any other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadKey {
    pub user: Option<UserId>,
    pub plan: Option<String>,
}
