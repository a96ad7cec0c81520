//! WARDEN Document Service Reference: Demo CLI
//!
//! Runs the reference scenarios, or loads a TOML role catalog and shows
//! which roles permit a given request.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- document-access
//!   cargo run -p demo -- delegation
//!   cargo run -p demo -- catalog demo/catalog.toml --resource /docs/public/a --operation read

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use warden_policy::{Permissible, Resource, RoleCatalog};
use warden_ref_docs::{
    scenarios::{delegation, document_access, Outcome, Verdict},
    DocumentResult,
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// WARDEN permission and role algebra demo.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "WARDEN document service reference demo",
    long_about = "Runs WARDEN demo scenarios showing resource-scoped roles, permission\n\
                  differences, delegated role management and authentication failures."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run both scenarios in sequence.
    RunAll,
    /// Scenario 1: Document Access (resource scoping and differences).
    DocumentAccess,
    /// Scenario 2: Delegated Role Management (plain and recursive managers).
    Delegation,
    /// Load a TOML role catalog and list its roles.
    Catalog {
        /// Path to the catalog file.
        path: PathBuf,
        /// Resource path to check, e.g. `/docs/public/a`.
        #[arg(long, requires = "operation")]
        resource: Option<String>,
        /// Operation to check, e.g. `read`.
        #[arg(long)]
        operation: Option<String>,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug to see every policy decision.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::DocumentAccess => document_access::run_scenario().map(summarize),
        Command::Delegation => delegation::run_scenario().map(summarize),
        Command::Catalog {
            path,
            resource,
            operation,
        } => run_catalog(&path, resource.as_deref(), operation.as_deref()),
    };

    match result {
        Ok(()) => {
            println!("Done.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

fn run_all() -> DocumentResult<()> {
    summarize(document_access::run_scenario()?);
    summarize(delegation::run_scenario()?);
    Ok(())
}

fn summarize(outcomes: Vec<Outcome>) {
    let count = |v: Verdict| outcomes.iter().filter(|o| o.verdict == v).count();
    println!(
        "  {} step(s): {} allowed, {} denied, {} failed",
        outcomes.len(),
        count(Verdict::Allowed),
        count(Verdict::Denied),
        count(Verdict::Failed)
    );
    println!();
}

fn run_catalog(
    path: &Path,
    resource: Option<&str>,
    operation: Option<&str>,
) -> DocumentResult<()> {
    let catalog = RoleCatalog::from_file(path)?;
    println!("Catalog {} ({} role(s))", path.display(), catalog.len());
    println!();

    let request = match (resource, operation) {
        (Some(r), Some(op)) => Some(Permissible::access(Resource::parse(r)?, op)),
        (None, Some(op)) => Some(Permissible::operation(op)),
        _ => None,
    };
    if let Some(p) = &request {
        debug!(request = ?p, "checking catalog roles");
        println!("Checking: {}", p);
        println!();
    }

    for name in catalog.names() {
        let role = catalog.role(name)?;
        let description = catalog.description(name).unwrap_or_default();
        match &request {
            Some(p) => {
                let verdict = if role.can(p) { "yes" } else { "no" };
                println!("  {:<16} {:<4} {}", name, verdict, role);
            }
            None => println!("  {:<16} {}  {}", name, role, description),
        }
    }
    println!();
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("WARDEN: Permission & Role Algebra");
    println!("Document Service Reference Demo");
    println!("==================================");
    println!();
    println!("Every guarded call:");
    println!("  [1] Authenticate credentials → User (fails before policy if invalid)");
    println!("  [2] Build a PermissionSource from the user's role");
    println!("  [3] secure(): evaluate the permissible → run the block, or deny");
    println!();
}
