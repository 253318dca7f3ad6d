//! # Compliance-Framework Manager
//!
//! Framework control catalogs, per-control assessments, compliance
//! scoring, and gap analysis.
//!
//! Scoring: `(compliant + 0.5 × partially_compliant) / total`, rounded
//! to two decimals. A framework with no controls, or one nobody has
//! assessed yet, scores 0. Gap analysis partitions the framework's full
//! control set; a control without an assessment lands in `unassessed`
//! rather than being skipped.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use audex_core::{ControlId, DomainError};

/// One requirement within a framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkControl {
    /// Requirement identifier, e.g. `CC6.1`.
    pub id: ControlId,
    /// Short requirement title.
    pub title: String,
}

/// A compliance framework: a named, ordered control set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Framework {
    /// Lowercase framework name, e.g. `soc2`.
    pub name: String,
    /// Human-readable title.
    pub title: String,
    /// The full control set.
    pub controls: Vec<FrameworkControl>,
}

/// The outcome recorded for one control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentState {
    /// Fully meets the requirement.
    Compliant,
    /// Partially meets the requirement. Counts half toward the score.
    PartiallyCompliant,
    /// Does not meet the requirement.
    NonCompliant,
}

/// Gap-analysis partition of a framework's full control set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapAnalysis {
    /// Controls with no recorded assessment.
    pub unassessed: Vec<ControlId>,
    /// Controls assessed non-compliant.
    pub non_compliant: Vec<ControlId>,
    /// Controls assessed partially compliant.
    pub partially_compliant: Vec<ControlId>,
    /// Controls assessed compliant.
    pub compliant: Vec<ControlId>,
}

/// Framework catalogs plus the shared assessment map.
#[derive(Debug, Clone)]
pub struct FrameworkManager {
    frameworks: Arc<HashMap<String, Framework>>,
    assessments: Arc<RwLock<HashMap<(String, ControlId), AssessmentState>>>,
}

impl FrameworkManager {
    /// Build a manager over an explicit framework catalog.
    pub fn new(frameworks: Vec<Framework>) -> Self {
        Self {
            frameworks: Arc::new(
                frameworks
                    .into_iter()
                    .map(|f| (f.name.clone(), f))
                    .collect(),
            ),
            assessments: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// The stock framework catalog.
    pub fn standard() -> Self {
        Self::new(standard_frameworks())
    }

    /// Look up a framework by name.
    pub async fn get_framework(&self, name: &str) -> Result<Framework, DomainError> {
        self.frameworks
            .get(name)
            .cloned()
            .ok_or_else(|| DomainError::not_found("framework", name))
    }

    /// Record an assessment for one control. Re-assessing overwrites.
    pub async fn assess_control(
        &self,
        framework: &str,
        control: &ControlId,
        assessment: AssessmentState,
    ) -> Result<(), DomainError> {
        let definition = self
            .frameworks
            .get(framework)
            .ok_or_else(|| DomainError::not_found("framework", framework))?;
        if !definition.controls.iter().any(|c| &c.id == control) {
            return Err(DomainError::not_found(
                "control",
                format!("{framework}/{control}"),
            ));
        }
        let mut assessments = self.assessments.write().await;
        assessments.insert((framework.to_string(), control.clone()), assessment);
        tracing::debug!(framework, control = %control, "control assessed");
        Ok(())
    }

    /// The compliance score for a framework, in `[0, 1]`.
    pub async fn calculate_compliance_score(&self, name: &str) -> Result<f64, DomainError> {
        let framework = self.get_framework(name).await?;
        if framework.controls.is_empty() {
            return Ok(0.0);
        }

        let assessments = self.assessments.read().await;
        let mut compliant = 0usize;
        let mut partial = 0usize;
        let mut assessed = 0usize;
        for control in &framework.controls {
            match assessments.get(&(framework.name.clone(), control.id.clone())) {
                Some(AssessmentState::Compliant) => {
                    compliant += 1;
                    assessed += 1;
                }
                Some(AssessmentState::PartiallyCompliant) => {
                    partial += 1;
                    assessed += 1;
                }
                Some(AssessmentState::NonCompliant) => assessed += 1,
                None => {}
            }
        }
        if assessed == 0 {
            return Ok(0.0);
        }

        let raw = (compliant as f64 + 0.5 * partial as f64) / framework.controls.len() as f64;
        Ok((raw * 100.0).round() / 100.0)
    }

    /// Partition a framework's full control set by assessment outcome.
    pub async fn perform_gap_analysis(&self, name: &str) -> Result<GapAnalysis, DomainError> {
        let framework = self.get_framework(name).await?;
        let assessments = self.assessments.read().await;
        let mut analysis = GapAnalysis::default();
        for control in &framework.controls {
            let bucket = match assessments.get(&(framework.name.clone(), control.id.clone())) {
                None => &mut analysis.unassessed,
                Some(AssessmentState::NonCompliant) => &mut analysis.non_compliant,
                Some(AssessmentState::PartiallyCompliant) => &mut analysis.partially_compliant,
                Some(AssessmentState::Compliant) => &mut analysis.compliant,
            };
            bucket.push(control.id.clone());
        }
        Ok(analysis)
    }
}

fn control(id: &str, title: &str) -> FrameworkControl {
    FrameworkControl {
        id: ControlId::new(id).expect("static control id"),
        title: title.to_string(),
    }
}

fn standard_frameworks() -> Vec<Framework> {
    vec![
        Framework {
            name: "soc2".into(),
            title: "SOC 2 Trust Services Criteria".into(),
            controls: vec![
                control("CC1.1", "Control environment: integrity and ethics"),
                control("CC2.1", "Internal and external communication"),
                control("CC6.1", "Logical access controls"),
                control("CC6.2", "User registration and deprovisioning"),
                control("CC7.1", "Vulnerability detection and monitoring"),
                control("CC8.1", "Change management"),
                control("A1.1", "Capacity and availability management"),
            ],
        },
        Framework {
            name: "iso27001".into(),
            title: "ISO/IEC 27001 Annex A".into(),
            controls: vec![
                control("A.5.1", "Policies for information security"),
                control("A.6.1", "Screening and terms of employment"),
                control("A.8.2", "Privileged access rights"),
                control("A.8.8", "Management of technical vulnerabilities"),
                control("A.8.24", "Use of cryptography"),
            ],
        },
        Framework {
            name: "hipaa".into(),
            title: "HIPAA Security Rule".into(),
            controls: vec![
                control("164.308(a)(1)", "Security management process"),
                control("164.310(a)(1)", "Facility access controls"),
                control("164.312(a)(1)", "Access control"),
                control("164.312(e)(1)", "Transmission security"),
            ],
        },
        Framework {
            name: "pcidss".into(),
            title: "PCI DSS v4.0".into(),
            controls: vec![
                control("1.2", "Network security controls configuration"),
                control("3.5", "Protection of stored account data"),
                control("8.3", "Strong authentication factors"),
                control("10.2", "Audit log implementation"),
            ],
        },
    ]
}
