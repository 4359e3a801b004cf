use super::*;
use chrono::TimeZone;
use drift_core::{
    ApplicationGroupMemberDeviation, Authorization, NamespacePermissionDeviation,
    TeamProjectDeviation, TeamProjectRef,
};

const ORGANIZATION_URL: &str = "https://dev.azure.com/contoso";

fn project(name: &str) -> TeamProjectRef {
    TeamProjectRef {
        id: None,
        name: name.to_string(),
    }
}

fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
}

fn findings_with_drift() -> Findings {
    Findings {
        deviations: vec![
            Deviation::ApplicationGroupMember(ApplicationGroupMemberDeviation {
                team_project: project("Storefront"),
                application_group: "[Storefront]\\Contributors".to_string(),
                member: "Jane".to_string(),
                deviation_type: DeviationType::Missing,
            }),
            Deviation::TeamProject(TeamProjectDeviation {
                team_project: project("Legacy"),
                deviation_type: DeviationType::Obsolete,
            }),
            Deviation::NamespacePermission(NamespacePermissionDeviation {
                team_project: project("Storefront"),
                application_group: "[Storefront]\\Contributors".to_string(),
                namespace: "Git Repositories".to_string(),
                permission: "ForcePush".to_string(),
                authorization: Authorization::Deny,
                deviation_type: DeviationType::Missing,
            }),
        ],
        diagnostics: vec![Diagnostic {
            team_project: project("Storefront"),
            application_group: "[Storefront]\\Readers".to_string(),
            namespace: "Build".to_string(),
            message: "Ambiguous effective permissions (2 allow values, 1 deny values)"
                .to_string(),
        }],
    }
}

fn render_plain(findings: &Findings) -> String {
    colored::control::set_override(false);
    let report = Report::new(findings, ORGANIZATION_URL, timestamp());
    render(&report, OutputFormat::Pretty).unwrap()
}

#[test]
fn test_pretty_groups_deviations_by_team_project() {
    let output = render_plain(&findings_with_drift());

    let storefront = output.find("\nStorefront\n").expect("Storefront header");
    let legacy = output.find("\nLegacy\n").expect("Legacy header");
    assert!(storefront < legacy);

    let member = output
        .find("[Missing] Member Jane is Missing")
        .expect("member line");
    let permission = output
        .find("[Missing] Deny ForcePush is Missing")
        .expect("permission line");
    assert!(member < permission);
    assert!(permission < legacy);
    assert!(output.contains("[Obsolete] Legacy is Obsolete."));
}

#[test]
fn test_pretty_includes_header_diagnostics_and_summary() {
    let output = render_plain(&findings_with_drift());

    assert!(output.contains("Drift report for https://dev.azure.com/contoso"));
    assert!(output.contains("2024-05-01 12:30:00 UTC"));
    assert!(output.contains("Diagnostics:"));
    assert!(output.contains("Ambiguous effective permissions (2 allow values, 1 deny values) for Build"));
    assert!(output.contains("✗ 3 deviation(s): 2 missing, 1 obsolete, 0 incorrect"));
}

#[test]
fn test_pretty_without_drift() {
    let output = render_plain(&Findings::new());

    assert!(output.contains("✓ No drift detected"));
    assert!(!output.contains("Diagnostics"));
}

#[test]
fn test_json_report_document() {
    let findings = findings_with_drift();
    let report = Report::new(&findings, ORGANIZATION_URL, timestamp());

    let output = render(&report, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["organization_url"], ORGANIZATION_URL);
    assert_eq!(value["generated_at"], "2024-05-01T12:30:00Z");
    assert_eq!(value["has_drift"], true);
    assert_eq!(value["summary"]["missing"], 2);
    assert_eq!(value["summary"]["obsolete"], 1);
    assert_eq!(value["summary"]["diagnostics"], 1);
    assert_eq!(value["deviations"].as_array().unwrap().len(), 3);
    assert_eq!(value["deviations"][0]["kind"], "application_group_member");
    assert_eq!(value["deviations"][1]["kind"], "team_project");
    assert_eq!(value["diagnostics"][0]["namespace"], "Build");
}

#[test]
fn test_json_report_without_drift() {
    let findings = Findings::new();
    let report = Report::new(&findings, ORGANIZATION_URL, timestamp());

    let value: serde_json::Value =
        serde_json::from_str(&render(&report, OutputFormat::Json).unwrap()).unwrap();

    assert_eq!(value["has_drift"], false);
    assert!(value["deviations"].as_array().unwrap().is_empty());
}
