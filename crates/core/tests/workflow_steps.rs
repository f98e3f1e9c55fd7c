//! Integration tests for the wizard's step handlers against fake CLIs.

#![cfg(unix)]

mod common;

use common::*;
use csk_core::state::record::read_record;
use csk_core::workflow::Wizard;
use csk_protocol::{
    ArtifactKind, BuildTarget, Distribution, Event, Op, StepStatus, WizardStep,
};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

/// A wizard that has already run the Generate step.
fn prepared(project: &TestProject) -> (Wizard, UnboundedReceiver<Event>) {
    let (mut wizard, rx) = open_wizard(project);
    wizard.refresh();
    wizard.run_step(WizardStep::Generate);
    (wizard, rx)
}

#[tokio::test]
async fn test_generate_then_publish_done() {
    let project = unity_project();
    let (mut wizard, mut rx) = prepared(&project);

    assert_eq!(wizard.steps().status(WizardStep::Generate), StepStatus::Done);
    assert!(wizard.steps().is_enabled(WizardStep::Publish));
    let build = project.read(".github/workflows/build.yml").unwrap();
    assert!(build.contains("game_name: \"Space Goats\""));

    wizard.run_step(WizardStep::Publish);
    assert_eq!(
        wizard.steps().status(WizardStep::Publish),
        StepStatus::InProgress
    );
    settle(&mut wizard).await;

    let events = drain_events(&mut rx);
    assert_went_through_in_progress(&events, WizardStep::Publish);
    assert_eq!(wizard.steps().status(WizardStep::Publish), StepStatus::Done);
    assert!(wizard.steps().is_enabled(WizardStep::Provision));

    let log = project.tool_log("git");
    assert!(log.contains("git add -- .github/workflows/build.yml"), "{log}");
    assert!(log.contains("git commit -m Add CI/CD setup for Space Goats"), "{log}");
    assert!(log.contains("git push -u origin HEAD"), "{log}");
}

#[tokio::test]
async fn test_rejected_push_fails_and_can_be_retried() {
    let project = unity_project();
    project.fake_file("push-rejected", "");
    let (mut wizard, _rx) = prepared(&project);

    wizard.run_step(WizardStep::Publish);
    settle(&mut wizard).await;

    assert_eq!(wizard.steps().status(WizardStep::Publish), StepStatus::Failed);
    assert!(wizard.foreground().stderr().contains("! [rejected]"));
    assert!(wizard.steps().is_enabled(WizardStep::Publish));
    assert!(!wizard.steps().is_enabled(WizardStep::Provision));

    project.remove_fake_file("push-rejected");
    wizard.run_step(WizardStep::Publish);
    settle(&mut wizard).await;

    assert_eq!(wizard.steps().status(WizardStep::Publish), StepStatus::Done);
    assert!(!wizard.foreground().stderr().contains("! [rejected]"));
}

#[tokio::test]
async fn test_pathspec_error_fails_publish() {
    let project = unity_project();
    project.fake_file("add-fails", "");
    let (mut wizard, _rx) = prepared(&project);

    wizard.run_step(WizardStep::Publish);
    settle(&mut wizard).await;

    assert_eq!(wizard.steps().status(WizardStep::Publish), StepStatus::Failed);
    // `set -e` stops the script before anything is pushed.
    assert!(!project.tool_log("git").contains("push"));
}

#[tokio::test]
async fn test_running_publish_keeps_its_output_from_build_and_clear() {
    let project = unity_project();
    project.fake_file("push-rejected", "");
    project.fake_file("push-slow", "");
    let (mut wizard, _rx) = prepared(&project);

    wizard.run_step(WizardStep::Publish);
    for _ in 0..500 {
        wizard.tick();
        if wizard.foreground().stderr().contains("! [rejected]") {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(wizard.foreground().is_running());

    wizard.apply(Op::TriggerBuild {
        target: BuildTarget::Android,
        distribution: Distribution::Firebase,
    });
    wizard.apply(Op::ClearOutput);
    assert!(wizard.foreground().stderr().contains("! [rejected]"));
    assert_eq!(wizard.foreground().queued(), 0);

    settle(&mut wizard).await;

    assert_eq!(wizard.steps().status(WizardStep::Publish), StepStatus::Failed);
    assert!(!project.tool_log("gh").contains("workflow run"));

    // Once the step is settled the build goes out.
    assert!(wizard.trigger_build(BuildTarget::Android, Distribution::Firebase));
    settle(&mut wizard).await;
    assert!(project.tool_log("gh").contains("gh workflow run build.yml"));
}

#[tokio::test]
async fn test_provision_judges_output_not_shell_path() {
    let project = unity_project();
    project.wrap_tool("failed-shells", "bash");
    let (mut wizard, _rx) = open_wizard(&project);
    wizard.refresh();

    wizard.run_step(WizardStep::Provision);
    settle(&mut wizard).await;

    assert!(wizard.foreground().stdout().contains("failed-shells"));
    assert_eq!(
        wizard.steps().status(WizardStep::Provision),
        StepStatus::Done,
        "{}",
        wizard.foreground().combined_output()
    );
}

#[tokio::test]
async fn test_provision_success_records_binding() {
    let project = unity_project();
    let (mut wizard, mut rx) = open_wizard(&project);
    wizard.refresh();

    wizard.run_step(WizardStep::Provision);
    settle(&mut wizard).await;

    let events = drain_events(&mut rx);
    assert_went_through_in_progress(&events, WizardStep::Provision);
    assert_eq!(
        wizard.steps().status(WizardStep::Provision),
        StepStatus::Done,
        "{}",
        wizard.foreground().combined_output()
    );
    assert!(wizard
        .foreground()
        .stdout()
        .contains("status: completed conclusion: success"));

    let log = project.tool_log("gh");
    assert!(log.contains("gh workflow view firebase-setup.yml"), "{log}");
    assert!(log.contains("-f project_id=hcg-space-goats"), "{log}");
    assert!(log.contains("-f ios_bundle_id=com.acme.spacegoats"), "{log}");
    assert!(log.contains("gh run watch 4242"), "{log}");

    let record = read_record(wizard.root()).unwrap();
    assert_eq!(record.project_id, "hcg-space-goats");
    assert_eq!(
        record.service_account,
        "ci-distribution@hcgamesfirebase.iam.gserviceaccount.com"
    );
    assert!(wizard
        .snapshot()
        .is_present(ArtifactKind::ServiceAccountBinding));
}

#[tokio::test]
async fn test_provision_failed_conclusion() {
    let project = unity_project();
    project.fake_file("conclusion", "failure\n");
    let (mut wizard, _rx) = open_wizard(&project);
    wizard.refresh();

    wizard.run_step(WizardStep::Provision);
    settle(&mut wizard).await;

    // The output says "completed" but also "failed".
    let output = wizard.foreground().combined_output();
    assert!(output.contains("completed"), "{output}");
    assert_eq!(
        wizard.steps().status(WizardStep::Provision),
        StepStatus::Failed
    );
    assert!(read_record(wizard.root()).is_none());
}

#[tokio::test]
async fn test_provision_gives_up_when_workflow_never_appears() {
    let project = unity_project();
    project.fake_file("workflow-missing", "");
    let (mut wizard, _rx) = open_wizard(&project);
    wizard.refresh();

    wizard.run_step(WizardStep::Provision);
    settle(&mut wizard).await;

    assert_eq!(
        wizard.steps().status(WizardStep::Provision),
        StepStatus::Failed
    );
    assert!(wizard
        .foreground()
        .stderr()
        .contains("not found on the remote after 2 attempts"));
    assert!(!project.tool_log("gh").contains("workflow run"));
}

#[tokio::test]
async fn test_synchronize_pulls_backend_configs() {
    let project = unity_project();
    project.stage_remote_backend_configs();
    let (mut wizard, mut rx) = open_wizard(&project);
    wizard.refresh();
    assert!(!wizard.snapshot().backend_configs_present());

    wizard.run_step(WizardStep::Synchronize);
    settle(&mut wizard).await;

    let events = drain_events(&mut rx);
    assert!(has_snapshot_refresh(&events));
    assert_eq!(
        wizard.steps().status(WizardStep::Synchronize),
        StepStatus::Done
    );
    assert_eq!(wizard.snapshot().backend_project_id(), Some("hcg-space-goats"));
    // The configs alone are enough to consider provisioning done.
    assert_eq!(
        wizard.steps().status(WizardStep::Provision),
        StepStatus::Done
    );
}

#[tokio::test]
async fn test_synchronize_without_configs_fails() {
    let project = unity_project();
    let (mut wizard, _rx) = open_wizard(&project);
    wizard.refresh();

    wizard.run_step(WizardStep::Synchronize);
    settle(&mut wizard).await;

    assert!(project.tool_log("git").contains("git pull"));
    assert_eq!(
        wizard.steps().status(WizardStep::Synchronize),
        StepStatus::Failed
    );

    // A refresh keeps the failure visible.
    wizard.refresh();
    assert_eq!(
        wizard.steps().status(WizardStep::Synchronize),
        StepStatus::Failed
    );
}
