//! # User & Role Manager
//!
//! Account bootstrap from OAuth logins, session (de)serialization, and
//! the store-backed permission check.
//!
//! Every identity provider (Google, Microsoft, LinkedIn, Okta) funnels
//! through the single [`UserManager::resolve_oauth_login`] path, so the
//! first-user-becomes-admin rule lives in exactly one place.

use audex_core::{DomainError, RoleId, UserId};
use audex_roles::{Permission, PermissionResolver, RoleCatalog};
use audex_schema::{
    AssignmentContext, ProviderMetadata, RoleAssignment, SystemRole, User, UserStatus,
};
use audex_store::DocumentStore;

/// The identity a provider hands back on a successful login.
#[derive(Debug, Clone)]
pub struct OAuthProfile {
    /// Verified email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Provider name (`google`, `microsoft`, `linkedin`, `okta`).
    pub provider: String,
    /// Provider-side subject identifier.
    pub subject: String,
}

/// User, session, and role-assignment workflows atop the store.
#[derive(Debug, Clone)]
pub struct UserManager {
    store: DocumentStore,
    resolver: PermissionResolver,
}

impl UserManager {
    /// Build a manager over a shared store handle and an injected role
    /// catalog.
    pub fn new(store: DocumentStore, catalog: RoleCatalog) -> Self {
        Self {
            store,
            resolver: PermissionResolver::new(catalog),
        }
    }

    /// The catalog behind this manager's resolver.
    pub fn catalog(&self) -> &RoleCatalog {
        self.resolver.catalog()
    }

    /// Resolve an OAuth callback into a user record.
    ///
    /// An existing account (matched by email, case-insensitively) gets
    /// its login metadata refreshed. A new account is created active,
    /// linked to the organization owning the email's domain if one does,
    /// and granted `admin` only when it is the first account in the
    /// entire system.
    pub async fn resolve_oauth_login(&self, profile: OAuthProfile) -> Result<User, DomainError> {
        let metadata = ProviderMetadata {
            provider: profile.provider.clone(),
            subject: profile.subject.clone(),
        };

        if let Some(existing) = self.store.find_user_by_email(&profile.email).await {
            tracing::debug!(user = %existing.user_id, provider = %profile.provider, "returning login");
            return self.store.record_login(&existing.user_id, metadata).await;
        }

        let mut user = User::new(profile.email.clone(), profile.first_name, profile.last_name);
        user.status = UserStatus::Active;
        if self.store.count_users().await == 0 {
            user.system_roles = vec![SystemRole::Admin];
            tracing::info!(email = %profile.email, "bootstrapping first account as admin");
        }
        if let Some(domain) = profile.email.rsplit_once('@').map(|(_, d)| d) {
            if let Some(org) = self.store.find_organization_by_domain(domain, None).await {
                user.organization = Some(org.id);
            }
        }

        let created = self.store.create_user(user).await?;
        self.store.record_login(&created.user_id, metadata).await
    }

    /// Serialize a user into its session token.
    pub fn serialize_session(&self, user: &User) -> UserId {
        user.user_id
    }

    /// Resolve a session token back into a user record.
    pub async fn deserialize_session(&self, id: UserId) -> Result<User, DomainError> {
        self.get_user(&id).await
    }

    /// Fetch one user.
    pub async fn get_user(&self, id: &UserId) -> Result<User, DomainError> {
        self.store.find_user(id).await
    }

    /// Replace a user's platform-wide role list. Tier mixing and the
    /// role ceiling are rejected by schema validation.
    pub async fn assign_system_roles(
        &self,
        id: &UserId,
        roles: Vec<SystemRole>,
    ) -> Result<User, DomainError> {
        let mut user = self.store.find_user(id).await?;
        user.system_roles = roles;
        let updated = self.store.update_user(user).await?;
        tracing::info!(user = %id, "system roles replaced");
        Ok(updated)
    }

    /// Grant a catalog role to a user within a context.
    pub async fn grant_role(
        &self,
        user_id: UserId,
        role_id: RoleId,
        context: AssignmentContext,
        assigned_by: UserId,
    ) -> Result<RoleAssignment, DomainError> {
        if !self.catalog().contains(&role_id) {
            return Err(DomainError::not_found("role", &role_id));
        }
        // The grantee must exist; the grantor is trusted caller context.
        self.store.find_user(&user_id).await?;
        let assignment = RoleAssignment::new(user_id, role_id, context, assigned_by);
        self.store.create_assignment(assignment).await
    }

    /// Whether `user_id` holds `permission` in `context`.
    ///
    /// Unlike the pure resolver, this wrapper rejects malformed input:
    /// an unknown user is a `NotFound` error, not a silent `false`.
    pub async fn has_permission(
        &self,
        user_id: &UserId,
        permission: &Permission,
        context: Option<&AssignmentContext>,
    ) -> Result<bool, DomainError> {
        let user = self.store.find_user(user_id).await?;
        let assignments = self.store.find_effective_assignments(user_id).await;
        Ok(self
            .resolver
            .has_permission(&user, &assignments, permission, context))
    }

    /// Whether the actor's roles in an engagement allow granting or
    /// revoking `target` there. Closed-world over the catalog.
    pub async fn can_manage_role(
        &self,
        actor: &UserId,
        engagement_context: &AssignmentContext,
        target: &RoleId,
    ) -> Result<bool, DomainError> {
        self.store.find_user(actor).await?;
        let assignments = self.store.find_effective_assignments(actor).await;
        Ok(assignments
            .iter()
            .filter(|a| a.applies_to(engagement_context))
            .any(|a| self.catalog().can_manage(&a.role_id, target)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audex_core::{EngagementId, OrgId};
    use crate::organization::{CreateOrganization, OrganizationManager};

    fn manager() -> UserManager {
        UserManager::new(DocumentStore::default(), RoleCatalog::standard())
    }

    fn profile(email: &str) -> OAuthProfile {
        OAuthProfile {
            email: email.into(),
            first_name: "Sam".into(),
            last_name: "Lee".into(),
            provider: "google".into(),
            subject: "g-123".into(),
        }
    }

    #[tokio::test]
    async fn test_first_login_bootstraps_admin() {
        let m = manager();
        let first = m.resolve_oauth_login(profile("sam@acme.com")).await.unwrap();
        assert_eq!(first.system_roles, vec![SystemRole::Admin]);
        assert_eq!(first.status, UserStatus::Active);
        assert!(first.last_login.is_some());

        let second = m.resolve_oauth_login(profile("priya@acme.com")).await.unwrap();
        assert!(second.system_roles.is_empty());
    }

    #[tokio::test]
    async fn test_returning_login_updates_metadata_only() {
        let m = manager();
        let created = m.resolve_oauth_login(profile("sam@acme.com")).await.unwrap();

        let mut again = profile("sam@acme.com");
        again.provider = "okta".into();
        again.subject = "o-9".into();
        let resolved = m.resolve_oauth_login(again).await.unwrap();
        assert_eq!(resolved.user_id, created.user_id);
        assert_eq!(resolved.provider.unwrap().provider, "okta");
        // Still the only account.
        assert_eq!(m.store.count_users().await, 1);
    }

    #[tokio::test]
    async fn test_new_login_guesses_organization_from_email_domain() {
        let store = DocumentStore::default();
        let orgs = OrganizationManager::new(store.clone());
        orgs.create_organization(CreateOrganization {
            name: "Acme".into(),
            requested_id: None,
            org_domains: vec!["acme.com".into()],
        })
        .await
        .unwrap();

        let m = UserManager::new(store, RoleCatalog::standard());
        let user = m.resolve_oauth_login(profile("sam@acme.com")).await.unwrap();
        assert_eq!(user.organization, Some(OrgId::new("acme").unwrap()));

        let stranger = m.resolve_oauth_login(profile("kim@globex.com")).await.unwrap();
        assert!(stranger.organization.is_none());
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let m = manager();
        let user = m.resolve_oauth_login(profile("sam@acme.com")).await.unwrap();
        let token = m.serialize_session(&user);
        assert_eq!(m.deserialize_session(token).await.unwrap().user_id, user.user_id);
        assert!(m.deserialize_session(UserId::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_get_user() {
        let m = manager();
        let user = m.resolve_oauth_login(profile("sam@acme.com")).await.unwrap();
        assert_eq!(m.get_user(&user.user_id).await.unwrap().email, user.email);
        assert!(matches!(
            m.get_user(&UserId::new()).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_assign_system_roles_rejects_tier_mix() {
        let m = manager();
        let user = m.resolve_oauth_login(profile("sam@acme.com")).await.unwrap();
        let err = m
            .assign_system_roles(&user.user_id, vec![SystemRole::Auditor, SystemRole::Owner])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let ok = m
            .assign_system_roles(&user.user_id, vec![SystemRole::Auditor])
            .await
            .unwrap();
        assert_eq!(ok.system_roles, vec![SystemRole::Auditor]);
    }

    #[tokio::test]
    async fn test_has_permission_errors_on_unknown_user() {
        let m = manager();
        assert!(matches!(
            m.has_permission(&UserId::new(), &Permission::new("org.manage"), None)
                .await
                .unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_grant_role_and_check() {
        let m = manager();
        let admin = m.resolve_oauth_login(profile("admin@firm.com")).await.unwrap();
        let sme = m.resolve_oauth_login(profile("sme@acme.com")).await.unwrap();
        let context = AssignmentContext::Engagement {
            engagement_id: EngagementId::new("acme_soc2t2_2603:1").unwrap(),
        };

        m.grant_role(
            sme.user_id,
            RoleId::new("engagement_sme").unwrap(),
            context.clone(),
            admin.user_id,
        )
        .await
        .unwrap();

        let perm = Permission::new("controls.respond");
        assert!(m
            .has_permission(&sme.user_id, &perm, Some(&context))
            .await
            .unwrap());
        assert!(!m.has_permission(&sme.user_id, &perm, None).await.unwrap());
    }

    #[tokio::test]
    async fn test_grant_unknown_role_rejected() {
        let m = manager();
        let user = m.resolve_oauth_login(profile("sam@acme.com")).await.unwrap();
        let err = m
            .grant_role(
                user.user_id,
                RoleId::new("phantom").unwrap(),
                AssignmentContext::Organization {
                    org_id: OrgId::new("acme").unwrap(),
                },
                user.user_id,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_can_manage_role_follows_catalog_closure() {
        let m = manager();
        let owner = m.resolve_oauth_login(profile("owner@acme.com")).await.unwrap();
        let context = AssignmentContext::Engagement {
            engagement_id: EngagementId::new("acme_soc2t2_2603:1").unwrap(),
        };
        m.grant_role(
            owner.user_id,
            RoleId::new("engagement_owner").unwrap(),
            context.clone(),
            owner.user_id,
        )
        .await
        .unwrap();

        let sme = RoleId::new("engagement_sme").unwrap();
        let lead = RoleId::new("lead_auditor").unwrap();
        assert!(m.can_manage_role(&owner.user_id, &context, &sme).await.unwrap());
        assert!(!m.can_manage_role(&owner.user_id, &context, &lead).await.unwrap());
    }
}
