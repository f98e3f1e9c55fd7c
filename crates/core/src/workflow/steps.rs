//! Step handlers.
//!
//! Every handler marks its step InProgress before issuing any request and
//! clears the foreground output. The step is settled in the continuation of
//! its last request, after a snapshot refresh has run while the step was
//! still InProgress, so the refresh cannot overwrite the outcome. Nothing
//! is retried automatically.

use super::decision::{provision_outcome, publish_outcome, synchronize_outcome};
use super::scripts::{
    provision_script, publish_script, shell_quote, write_script, ProvisionInputs,
    PROVISION_SCRIPT, PUBLISH_SCRIPT,
};
use super::Wizard;
use crate::init::generate_artifacts;
use crate::runner::{run, ProcessRequest};
use crate::state::record::{write_record, ProvisionRecord};
use crate::state::steps::{fail_step, finish_step, start_step};
use chrono::Utc;
use csk_protocol::{Channel, StepStatus, WizardStep};

impl Wizard {
    /// Start `step`. Gating is the panel's job; see
    /// [`StepBoard::is_enabled`](crate::state::steps::StepBoard::is_enabled).
    pub fn run_step(&mut self, step: WizardStep) {
        match step {
            WizardStep::Generate => self.generate(),
            WizardStep::Publish => self.publish(),
            WizardStep::Provision => self.provision(),
            WizardStep::Synchronize => self.synchronize(),
        }
    }

    fn begin(&mut self, step: WizardStep) {
        start_step(&mut self.steps, step, &self.events_tx);
        self.foreground.clear_output();
    }

    /// Refresh while `step` is still InProgress, then apply its outcome.
    fn settle(&mut self, step: WizardStep, outcome: StepStatus) {
        self.refresh();
        finish_step(&mut self.steps, step, outcome, &self.events_tx);
        self.hooks.request_repaint();
    }

    /// Write the missing template artifacts. Done regardless of individual
    /// write failures, which are reported in the output.
    fn generate(&mut self) {
        self.begin(WizardStep::Generate);

        let game_name = self.game_name();
        let report = generate_artifacts(&self.root, &game_name);
        for kind in &report.written {
            self.foreground
                .append_note(&format!("created {}", kind.relative_path()));
        }
        for kind in &report.skipped {
            self.foreground
                .append_note(&format!("kept existing {}", kind.relative_path()));
        }
        for (_, error) in &report.failed {
            self.foreground.append_note(&format!("error: {error}"));
        }

        self.settle(WizardStep::Generate, StepStatus::Done);
    }

    /// Commit and push the generated files.
    fn publish(&mut self) {
        self.begin(WizardStep::Publish);

        let script = publish_script(&self.config.tools.git, &self.game_name());
        let path = match write_script(&self.root, PUBLISH_SCRIPT, &script) {
            Ok(path) => path,
            Err(e) => {
                self.foreground.append_note(&format!("error: {e}"));
                fail_step(&mut self.steps, WizardStep::Publish, &self.events_tx);
                return;
            }
        };

        let request = ProcessRequest::new(
            self.config.tools.bash.clone(),
            shell_quote(&path),
            self.root.clone(),
            |wizard: &mut Wizard| {
                let outcome = publish_outcome(wizard.foreground.stderr());
                wizard.settle(WizardStep::Publish, outcome);
            },
        );
        run(self, Channel::Foreground, request);
    }

    /// Dispatch the remote provisioning workflow and wait for its result.
    fn provision(&mut self) {
        self.begin(WizardStep::Provision);

        let project = self.collector.snapshot().project().clone();
        let inputs = ProvisionInputs {
            project_id: self.project_id(),
            game_name: self.game_name(),
            ios_bundle_id: project.ios_bundle_id.clone().unwrap_or_default(),
            android_bundle_id: project.android_bundle_id.clone().unwrap_or_default(),
            service_account: self.config.service_account.clone(),
        };
        if project.ios_bundle_id.is_none() {
            self.foreground
                .append_note("warning: no iOS bundle id in ProjectSettings.asset");
        }
        if project.android_bundle_id.is_none() {
            self.foreground
                .append_note("warning: no Android package name in ProjectSettings.asset");
        }

        let script = provision_script(&self.config, &inputs);
        let path = match write_script(&self.root, PROVISION_SCRIPT, &script) {
            Ok(path) => path,
            Err(e) => {
                self.foreground.append_note(&format!("error: {e}"));
                fail_step(&mut self.steps, WizardStep::Provision, &self.events_tx);
                return;
            }
        };

        tracing::info!(project_id = %inputs.project_id, "provisioning backend project");
        let request = ProcessRequest::new(
            self.config.tools.bash.clone(),
            shell_quote(&path),
            self.root.clone(),
            move |wizard: &mut Wizard| {
                let outcome = provision_outcome(&wizard.foreground.combined_output());
                if outcome == StepStatus::Done {
                    wizard.record_binding(inputs);
                }
                wizard.settle(WizardStep::Provision, outcome);
            },
        );
        run(self, Channel::Foreground, request);
    }

    fn record_binding(&mut self, inputs: ProvisionInputs) {
        let record = ProvisionRecord {
            project_id: inputs.project_id,
            service_account: inputs.service_account,
            provisioned_at: Some(Utc::now()),
        };
        if let Err(e) = write_record(&self.root, &record) {
            tracing::warn!(error = %e, "failed to record service account binding");
            self.foreground.append_note(&format!("warning: {e}"));
        }
    }

    /// Pull the backend configs the provisioning run committed.
    fn synchronize(&mut self) {
        self.begin(WizardStep::Synchronize);

        let request = ProcessRequest::new(
            self.config.tools.git.clone(),
            "pull",
            self.root.clone(),
            |wizard: &mut Wizard| {
                wizard.refresh();
                wizard.hooks.refresh_assets();
                let outcome = synchronize_outcome(wizard.collector.snapshot());
                finish_step(&mut wizard.steps, WizardStep::Synchronize, outcome, &wizard.events_tx);
                wizard.hooks.request_repaint();
            },
        );
        run(self, Channel::Foreground, request);
    }
}
