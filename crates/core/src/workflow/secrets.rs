//! GitHub secrets the generated workflows read.
//!
//! None of them can be set from here; once the backend project exists the
//! panel lists them so the user can add them at repository or organization
//! level.

use super::Wizard;
use crate::state::steps::StepBoard;
use csk_protocol::{StepStatus, WizardStep};

/// Secrets needed for one part of the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretGroup {
    pub purpose: &'static str,
    pub names: &'static [&'static str],
}

pub const REQUIRED_SECRETS: [SecretGroup; 5] = [
    SecretGroup {
        purpose: "Unity license",
        names: &["UNITY_LICENSE"],
    },
    SecretGroup {
        purpose: "iOS signing (match)",
        names: &[
            "MATCH_PASSWORD",
            "MATCH_KEYCHAIN_PASSWORD",
            "MATCH_GIT_BASIC_AUTHORIZATION",
        ],
    },
    SecretGroup {
        purpose: "App Store Connect",
        names: &[
            "APP_STORE_CONNECT_API_KEY_KEY_ID",
            "APP_STORE_CONNECT_API_KEY_ISSUER_ID",
            "APP_STORE_CONNECT_API_KEY_KEY",
        ],
    },
    SecretGroup {
        purpose: "Android signing",
        names: &[
            "ANDROID_KEYSTORE_NAME",
            "ANDROID_KEYSTORE_BASE64",
            "ANDROID_KEYSTORE_PASS",
            "ANDROID_KEYALIAS_NAME",
            "ANDROID_KEYALIAS_PASS",
        ],
    },
    SecretGroup {
        purpose: "Firebase App Distribution",
        names: &["FIREBASE_SERVICE_ACCOUNT_JSON"],
    },
];

/// The checklist, once Provision is Done.
pub fn secrets_checklist(steps: &StepBoard) -> Option<&'static [SecretGroup]> {
    (steps.status(WizardStep::Provision) == StepStatus::Done).then_some(&REQUIRED_SECRETS[..])
}

impl Wizard {
    pub fn secrets_checklist(&self) -> Option<&'static [SecretGroup]> {
        secrets_checklist(&self.steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::steps::complete_step;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn test_checklist_appears_after_provision() {
        let mut steps = StepBoard::new();
        let (tx, _rx) = unbounded_channel();

        complete_step(&mut steps, WizardStep::Generate, &tx);
        complete_step(&mut steps, WizardStep::Publish, &tx);
        assert_eq!(secrets_checklist(&steps), None);

        complete_step(&mut steps, WizardStep::Provision, &tx);
        let groups = secrets_checklist(&steps).unwrap();
        assert_eq!(groups.len(), 5);
        assert!(groups
            .iter()
            .any(|group| group.names.contains(&"FIREBASE_SERVICE_ACCOUNT_JSON")));
    }
}
