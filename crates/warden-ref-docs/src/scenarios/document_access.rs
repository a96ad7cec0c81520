//! Scenario 1: Document Access
//!
//! Three staff roles share one document tree:
//!
//! ```text
//! /docs
//! ├── public/welcome
//! └── drafts/roadmap
//! ```
//!
//! - editor:  create, read, update and list anywhere under `/docs`
//! - reader:  read and list under `/docs/public` only
//! - auditor: read and list under `/docs` *minus* reading `/docs/drafts`
//!
//! The auditor role is a permission difference, so listing `/docs` shows the
//! auditor only what they may read. A wrong password fails authentication
//! before any policy runs, which the scenario reports as FAILED rather than
//! DENIED.

use serde_json::json;

use warden_core::{Authenticator, Credentials, PermissionSource};
use warden_directory::InMemoryDirectory;
use warden_policy::{Permission, Resource, Role};

use crate::{
    scenarios::{record, Outcome},
    store::{DocumentResult, DocumentStore, CREATE, LIST, READ, UPDATE},
};

// ── Roles ─────────────────────────────────────────────────────────────────────

fn editor(docs: &Resource) -> Role {
    Role::resource(docs.clone(), [CREATE, READ, UPDATE, LIST])
}

fn reader(public: &Resource) -> Role {
    Role::resource(public.clone(), [READ, LIST])
}

fn auditor(docs: &Resource, drafts: &Resource) -> Role {
    Role::from(
        Permission::resource(docs.clone(), [READ, LIST])
            - Permission::resource(drafts.clone(), [READ]),
    )
}

// ── Scenario runner ───────────────────────────────────────────────────────────

/// Run Scenario 1: Document Access.
pub fn run_scenario() -> DocumentResult<Vec<Outcome>> {
    println!("=== Scenario 1: Document Access ===");
    println!();

    let docs = Resource::parse("/docs")?;
    let public = docs.child("public")?;
    let drafts = docs.child("drafts")?;
    let welcome = public.child("welcome")?;
    let roadmap = drafts.child("roadmap")?;

    let directory = InMemoryDirectory::new();
    let store = DocumentStore::new();

    directory.register("erin", "erin-pw", editor(&docs))?;
    directory.register("riley", "riley-pw", reader(&public))?;
    directory.register("avery", "avery-pw", auditor(&docs, &drafts))?;
    directory.register("root", "root-pw", Role::SuperUser)?;

    let login = |name: &str, secret: &str| {
        directory
            .authenticate(&Credentials::new(name, secret))
            .map(PermissionSource::from)
    };

    let erin = login("erin", "erin-pw")?;
    let riley = login("riley", "riley-pw")?;
    let avery = login("avery", "avery-pw")?;
    let root = login("root", "root-pw")?;

    for (name, source) in [("erin", &erin), ("riley", &riley), ("avery", &avery)] {
        println!("  {:<6} {}", name, source);
    }
    println!();

    let mut outcomes = Vec::new();

    // ── Editor writes ─────────────────────────────────────────────────────────

    let result = store.create(&erin, &welcome, json!({"title": "Welcome"}));
    record(&mut outcomes, "erin creates /docs/public/welcome", &result);

    let result = store.create(&erin, &roadmap, json!({"title": "Roadmap", "quarter": 3}));
    record(&mut outcomes, "erin creates /docs/drafts/roadmap", &result);

    // ── Reader is confined to /docs/public ────────────────────────────────────

    let result = store.read(&riley, &welcome);
    record(&mut outcomes, "riley reads /docs/public/welcome", &result);

    let result = store.read(&riley, &roadmap);
    record(&mut outcomes, "riley reads /docs/drafts/roadmap", &result);

    let result = store.update(&riley, &welcome, json!({"title": "Hijacked"}));
    record(&mut outcomes, "riley updates /docs/public/welcome", &result);

    // ── Auditor sees everything except drafts ─────────────────────────────────

    let result = store.list(&avery, &docs);
    record(&mut outcomes, "avery lists /docs", &result);
    if let Ok(listed) = &result {
        for doc in listed {
            println!("      {}", doc.path);
        }
    }

    let result = store.read(&avery, &roadmap);
    record(&mut outcomes, "avery reads /docs/drafts/roadmap", &result);

    // ── Authentication happens before policy ──────────────────────────────────

    let result = login("riley", "wrong-pw");
    record(&mut outcomes, "riley logs in with a wrong secret", &result);

    // ── Superuser cleans up ───────────────────────────────────────────────────

    let result = store.delete(&root, &roadmap);
    record(&mut outcomes, "root deletes /docs/drafts/roadmap", &result);

    println!();
    println!("  Scenario 1 complete.");
    println!();

    Ok(outcomes)
}
