//! bwauth - Bitwarden unlock/login step for Alfred
//!
//! Asks for the master password (and a two-factor code when configured),
//! runs the Bitwarden CLI and stores the session token in the keychain.

use bwauth_core::config::WorkflowEnv;
use bwauth_core::init_logging;
use clap::Parser;

mod cli;

#[derive(Parser)]
#[command(name = "bwauth")]
#[command(about = "Unlock or log in to Bitwarden and store the session token in the keychain")]
struct Cli {
    /// "unlock" unlocks the vault; any other value logs in
    mode: String,

    /// Bitwarden account email
    email: String,

    /// Two-step method id ("1" = code sent by email)
    totp_mode: Option<String>,

    /// Two-step provider name shown in the dialog; blank disables two-step login
    totp_hint: Option<String>,

    /// Print an Alfred JSON object instead of the bare message
    #[arg(long)]
    json: bool,
}

fn main() {
    let env = WorkflowEnv::capture();

    if let Err(e) = init_logging(env.debug) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(2);
    }

    let args = Cli::parse();
    let invocation = cli::auth::Invocation {
        mode: args.mode,
        email: args.email,
        totp_mode: args.totp_mode,
        totp_hint: args.totp_hint,
    };

    let report = cli::auth::run_auth(&invocation, &env);
    cli::output::print_report(&report, args.json);

    std::process::exit(report.exit_code());
}
