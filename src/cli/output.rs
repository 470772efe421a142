//! Status output for Alfred
//!
//! Plain mode prints the message alone. JSON mode prints an Alfred
//! `alfredworkflow` object so the next workflow step can show a notification
//! from the `STATUS_MESSAGE` variables.

use crate::cli::auth::Report;
use bwauth_core::types::Mode;
use serde::Serialize;

#[derive(Serialize)]
struct AlfredOutput {
    alfredworkflow: AlfredWorkflow,
}

#[derive(Serialize)]
struct AlfredWorkflow {
    arg: String,
    variables: StatusVariables,
}

#[derive(Serialize)]
struct StatusVariables {
    #[serde(rename = "STATUS_MESSAGE")]
    status_message: String,
    #[serde(rename = "STATUS_MESSAGE_DESC")]
    status_message_desc: String,
}

/// Print the report to stdout
pub fn print_report(report: &Report, json: bool) {
    if json {
        println!("{}", render_json(report));
    } else {
        println!("{}", report.message());
    }
}

fn render_json(report: &Report) -> String {
    let message = report.message();
    let variables = match &report.result {
        Ok(_) => StatusVariables {
            status_message: message.clone(),
            status_message_desc: format!("User: {}", report.email),
        },
        Err(_) => StatusVariables {
            status_message: match report.mode {
                Mode::Unlock => "Unlock failed".to_string(),
                Mode::Login => "Login failed".to_string(),
            },
            status_message_desc: message.clone(),
        },
    };

    let output = AlfredOutput {
        alfredworkflow: AlfredWorkflow {
            arg: message,
            variables,
        },
    };

    // Plain strings only, serialization cannot fail
    serde_json::to_string(&output).unwrap_or_default()
}
