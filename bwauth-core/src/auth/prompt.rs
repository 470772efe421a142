//! Modal dialog asking the user for a password or a two-factor code
//!
//! On macOS the dialog is a JavaScript-for-Automation `displayDialog` run
//! through `osascript`. The flow only sees the [`SecretPrompt`] trait.

use crate::error::{ProcessError, PromptError};
use crate::process::run_with_timeout;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Asks the user for one piece of text
pub trait SecretPrompt {
    /// Show `message` and return what the user typed
    ///
    /// `secret` masks the input. Dismissing the dialog or letting it time
    /// out is reported as an error; nothing is retried.
    fn prompt(&self, message: &str, secret: bool) -> Result<String, PromptError>;
}

/// Marker thrown by the dialog script when `givingUpAfter` elapsed
const GAVE_UP_MARKER: &str = "BWAUTH_DIALOG_GAVE_UP";

/// Extra time the osascript process gets on top of the dialog timeout
const PROCESS_GRACE: Duration = Duration::from_secs(10);

const DIALOG_SCRIPT: &str = r#"function run(argv) {
    var app = Application.currentApplication();
    app.includeStandardAdditions = true;
    var response = app.displayDialog(argv[0], {
        defaultAnswer: "",
        withIcon: "caution",
        buttons: ["Cancel", "OK"],
        defaultButton: "OK",
        cancelButton: "Cancel",
        givingUpAfter: parseInt(argv[2], 10),
        hiddenAnswer: argv[1] === "true"
    });
    if (response.gaveUp) {
        throw new Error("BWAUTH_DIALOG_GAVE_UP");
    }
    return response.textReturned;
}"#;

/// `osascript` dialog with a timeout
#[derive(Debug, Clone)]
pub struct DialogPrompt {
    timeout: Duration,
}

impl DialogPrompt {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn command(&self, message: &str, secret: bool) -> Command {
        let mut command = Command::new("osascript");
        command
            .args(["-l", "JavaScript", "-e", DIALOG_SCRIPT])
            .arg(message)
            .arg(if secret { "true" } else { "false" })
            .arg(self.timeout.as_secs().to_string());
        command
    }
}

impl SecretPrompt for DialogPrompt {
    fn prompt(&self, message: &str, secret: bool) -> Result<String, PromptError> {
        debug!("Showing dialog (secret: {})", secret);

        let output = run_with_timeout(self.command(message, secret), self.timeout + PROCESS_GRACE)
            .map_err(|e| match e {
                ProcessError::TimedOut { .. } => PromptError::TimedOut {
                    seconds: self.timeout.as_secs(),
                },
                other => PromptError::DialogFailed {
                    reason: other.to_string(),
                },
            })?;

        if output.success() {
            return Ok(strip_trailing_newline(output.stdout));
        }

        Err(classify_dialog_failure(&output.stderr, self.timeout))
    }
}

/// Map osascript's stderr to a prompt error
fn classify_dialog_failure(stderr: &str, timeout: Duration) -> PromptError {
    if stderr.contains("(-128)") || stderr.contains("User canceled") {
        debug!("Dialog cancelled by the user");
        PromptError::Cancelled
    } else if stderr.contains(GAVE_UP_MARKER) {
        debug!("Dialog gave up after {}s", timeout.as_secs());
        PromptError::TimedOut {
            seconds: timeout.as_secs(),
        }
    } else {
        PromptError::DialogFailed {
            reason: stderr.trim().to_string(),
        }
    }
}

fn strip_trailing_newline(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}
