//! # End-to-End Engagement Workflow Tests
//!
//! Exercises the full audit lifecycle through the assembled core:
//! organization onboarding, OAuth account bootstrap, role grants,
//! engagement creation and steering, the control assessment loop,
//! framework scoring, and messaging.

use audex_core::{ControlId, RoleId};
use audex_domain::{
    AssessmentState, AudexConfig, AuditCore, CreateOrganization, OAuthProfile,
};
use audex_roles::Permission;
use audex_schema::{AssignmentContext, EngagementType, Evidence, FrameworkSelection, SystemRole};
use audex_state::{ControlStatus, EngagementStage, EngagementStatus, OrgStatus};

fn core() -> AuditCore {
    AuditCore::new(AudexConfig::default()).expect("stock assembly")
}

fn login(email: &str) -> OAuthProfile {
    OAuthProfile {
        email: email.into(),
        first_name: "Sam".into(),
        last_name: "Lee".into(),
        provider: "google".into(),
        subject: format!("sub-{email}"),
    }
}

#[tokio::test]
async fn full_audit_lifecycle() {
    let core = core();

    // First login bootstraps the platform admin.
    let admin = core.users.resolve_oauth_login(login("admin@firm.com")).await.unwrap();
    assert_eq!(admin.system_roles, vec![SystemRole::Admin]);

    // Onboard and activate the customer organization.
    let org = core
        .organizations
        .create_organization(CreateOrganization {
            name: "Acme Corporation".into(),
            requested_id: None,
            org_domains: vec!["acme.com".into()],
        })
        .await
        .unwrap();
    assert_eq!(org.id.as_str(), "acme-corporation");
    core.organizations
        .transition_status(&org.id, OrgStatus::Active)
        .await
        .unwrap();

    // A customer user signs in and is routed to their organization.
    let sme = core.users.resolve_oauth_login(login("sme@acme.com")).await.unwrap();
    assert_eq!(sme.organization.as_ref(), Some(&org.id));
    assert!(sme.system_roles.is_empty());

    // Create and schedule the engagement.
    let engagement = core
        .engagements
        .create_engagement(
            &org.id,
            EngagementType::Soc2Type2,
            "2603",
            vec![FrameworkSelection {
                name: "soc2".into(),
                components: vec!["security".into(), "availability".into()],
            }],
        )
        .await
        .unwrap();
    core.engagements
        .transition_status(&engagement.id, EngagementStatus::Scheduled)
        .await
        .unwrap();
    core.engagements
        .transition_status(&engagement.id, EngagementStatus::Active)
        .await
        .unwrap();

    // Roster the SME and grant the matching engagement role.
    let sme_role = RoleId::new("engagement_sme").unwrap();
    core.engagements
        .add_participant(&engagement.id, sme.user_id, vec![sme_role.clone()])
        .await
        .unwrap();
    let context = AssignmentContext::Engagement {
        engagement_id: engagement.id.clone(),
    };
    core.users
        .grant_role(sme.user_id, sme_role, context.clone(), admin.user_id)
        .await
        .unwrap();
    assert!(core
        .users
        .has_permission(&sme.user_id, &Permission::new("controls.respond"), Some(&context))
        .await
        .unwrap());

    // Fieldwork: respond, review, complete one control.
    core.engagements
        .advance_stage(&engagement.id, EngagementStage::Fieldwork)
        .await
        .unwrap();
    let cc61 = ControlId::new("CC6.1").unwrap();
    core.engagements.open_control(&engagement.id, cc61.clone()).await.unwrap();
    core.engagements
        .submit_response(
            &engagement.id,
            &cc61,
            Evidence::File {
                name: "access-review-q1.pdf".into(),
                size_bytes: 48_213,
                content_type: "application/pdf".into(),
            },
        )
        .await
        .unwrap();
    core.engagements.begin_review(&engagement.id, &cc61).await.unwrap();
    let done = core.engagements.complete_control(&engagement.id, &cc61).await.unwrap();
    assert_eq!(done.status, ControlStatus::Complete);

    // Score the framework from the auditor's assessment.
    core.assess_control("soc2", &cc61, AssessmentState::Compliant).await.unwrap();
    let score = core.calculate_compliance_score("soc2").await.unwrap();
    assert!(score > 0.0 && score < 1.0);
    let gaps = core.perform_gap_analysis("soc2").await.unwrap();
    assert_eq!(gaps.compliant, vec![cc61]);

    // Messaging between participants.
    let draft = core
        .messaging
        .post_draft(&engagement.id, sme.user_id, "evidence uploaded, @admin please review", None, None)
        .await
        .unwrap();
    assert_eq!(draft.mentions, vec!["admin"]);
    core.messaging.send(&draft.id).await.unwrap();
    core.messaging.mark_read(&draft.id, admin.user_id).await.unwrap();
    assert_eq!(core.messaging.thread(&engagement.id).await.len(), 1);

    // Close out.
    core.engagements
        .advance_stage(&engagement.id, EngagementStage::WrapUp)
        .await
        .unwrap();
    let closed = core
        .engagements
        .transition_status(&engagement.id, EngagementStatus::Closed)
        .await
        .unwrap();
    assert!(closed.timeline.closed_at.is_some());

    // Terminal: nothing moves after close.
    assert!(core
        .engagements
        .transition_status(&engagement.id, EngagementStatus::Active)
        .await
        .is_err());
}

#[tokio::test]
async fn rejected_transitions_leave_state_untouched() {
    let core = core();
    let org = core
        .organizations
        .create_organization(CreateOrganization {
            name: "Globex".into(),
            requested_id: None,
            org_domains: vec![],
        })
        .await
        .unwrap();
    let engagement = core
        .engagements
        .create_engagement(
            &org.id,
            EngagementType::Iso27001,
            "2611",
            vec![FrameworkSelection {
                name: "iso27001".into(),
                components: vec![],
            }],
        )
        .await
        .unwrap();
    core.engagements
        .transition_status(&engagement.id, EngagementStatus::Scheduled)
        .await
        .unwrap();
    core.engagements
        .transition_status(&engagement.id, EngagementStatus::Active)
        .await
        .unwrap();

    // active -> pending is off the graph; the stored status survives.
    assert!(core
        .engagements
        .transition_status(&engagement.id, EngagementStatus::Pending)
        .await
        .is_err());
    let stored = core.engagements.get_engagement(&engagement.id).await.unwrap();
    assert_eq!(stored.status, EngagementStatus::Active);

    // active -> extended is legal.
    core.engagements
        .transition_status(&engagement.id, EngagementStatus::Extended)
        .await
        .unwrap();
}

#[tokio::test]
async fn duplicate_domain_claims_rejected_across_organizations() {
    let core = core();
    core.organizations
        .create_organization(CreateOrganization {
            name: "Acme".into(),
            requested_id: None,
            org_domains: vec!["acme.com".into()],
        })
        .await
        .unwrap();
    let rival = core
        .organizations
        .create_organization(CreateOrganization {
            name: "Acme Holdings".into(),
            requested_id: None,
            org_domains: vec![],
        })
        .await
        .unwrap();
    assert!(core.organizations.add_domain(&rival.id, "acme.com").await.is_err());
    assert!(core.organizations.add_domain(&rival.id, "acme-holdings.com").await.is_ok());
}
