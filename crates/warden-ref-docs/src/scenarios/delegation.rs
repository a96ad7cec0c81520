//! Scenario 2: Delegated Role Management
//!
//! Shows management roles handing out other roles through the directory:
//!
//! - `staff`: viewer + editor, the roles everyday users hold
//! - team lead: may grant and revoke anything up to `staff`
//! - HR: *recursively* manages `staff`, so it may also hand out team-lead
//!   roles and roles built from them
//!
//! A non-recursive team lead cannot create another team lead, and neither
//! manager may act outside the operations it was given.

use warden_core::{authorize, Authenticator, Credentials, PermissionSource, User};
use warden_directory::InMemoryDirectory;
use warden_policy::{ManagementOperation, Permissible, Resource, Role, WardenResult};

use crate::{
    scenarios::{record, Outcome},
    store::{DocumentResult, CREATE, LIST, READ, UPDATE},
};

use ManagementOperation::{Grant, Retrieve, Revoke};

// ── Roles ─────────────────────────────────────────────────────────────────────

struct Roles {
    viewer: Role,
    editor: Role,
    team_lead: Role,
    hr: Role,
}

impl Roles {
    fn new(docs: &Resource) -> Self {
        let viewer = Role::resource(docs.clone(), [READ, LIST]);
        let editor = Role::resource(docs.clone(), [CREATE, UPDATE]);
        let staff = viewer.clone() + editor.clone();
        Self {
            team_lead: Role::manager(staff.clone(), [Grant, Revoke]),
            hr: Role::recursive_manager(staff, [Grant, Revoke, Retrieve]),
            viewer,
            editor,
        }
    }
}

fn login(directory: &InMemoryDirectory, name: &str) -> WardenResult<PermissionSource> {
    directory
        .authenticate(&Credentials::new(name, format!("{name}-pw")))
        .map(PermissionSource::from)
}

// ── Scenario runner ───────────────────────────────────────────────────────────

/// Run Scenario 2: Delegated Role Management.
pub fn run_scenario() -> DocumentResult<Vec<Outcome>> {
    println!("=== Scenario 2: Delegated Role Management ===");
    println!();

    let docs = Resource::parse("/docs")?;
    let roles = Roles::new(&docs);
    let directory = InMemoryDirectory::new();

    let harper = directory.register("harper", "harper-pw", roles.hr.clone())?;
    let lee = directory.register("lee", "lee-pw", Role::NoRole)?;
    let sam = directory.register("sam", "sam-pw", roles.viewer.clone())?;

    println!("  team lead: {}", roles.team_lead);
    println!("  hr:        {}", roles.hr);
    println!();

    let mut outcomes = Vec::new();

    // ── Plain access through authenticate-then-secure ─────────────────────────

    let result = authorize(
        &directory,
        &Credentials::new("sam", "sam-pw"),
        &Permissible::access(docs.clone(), READ),
        |user: &User| user.name.clone(),
    );
    record(&mut outcomes, "sam is authorized to read /docs", &result);

    // ── HR appoints a team lead ───────────────────────────────────────────────

    let hr = login(&directory, &harper.name)?;
    let result = directory.grant_role(&hr, lee.id, roles.team_lead.clone());
    record(&mut outcomes, "harper grants team lead to lee", &result);

    // ── The team lead manages staff roles only ────────────────────────────────

    let lead = login(&directory, &lee.name)?;
    let result = directory.grant_role(&lead, sam.id, roles.editor.clone());
    record(&mut outcomes, "lee grants editor to sam", &result);

    let result = directory.grant_role(&lead, sam.id, roles.team_lead.clone());
    record(&mut outcomes, "lee grants team lead to sam", &result);

    let result = directory.role_of(&lead, sam.id);
    record(&mut outcomes, "lee retrieves sam's role", &result);

    // ── Recursive management reaches self-built roles ─────────────────────────

    let result = directory.role_of(&hr, sam.id);
    record(&mut outcomes, "harper retrieves sam's role", &result);
    if let Ok(role) = &result {
        println!("      {}", role);
    }

    let nested = roles.editor.clone() + roles.team_lead.clone();
    let result = directory.grant_role(&hr, lee.id, nested);
    record(&mut outcomes, "harper grants editor + team lead to lee", &result);

    // ── Staff cannot manage ───────────────────────────────────────────────────

    let staff = login(&directory, &sam.name)?;
    let result = directory.revoke_role(&staff, lee.id, &roles.editor);
    record(&mut outcomes, "sam revokes editor from lee", &result);

    // ── HR demotes the team lead ──────────────────────────────────────────────

    let result = directory.revoke_role(&hr, lee.id, &roles.team_lead);
    record(&mut outcomes, "harper revokes team lead from lee", &result);

    let lee_now = directory.find(lee.id)?;
    println!();
    println!("  lee now holds: {}", lee_now.role);
    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::Verdict::{Allowed, Denied};

    #[test]
    fn every_step_ends_as_expected() {
        let outcomes = run_scenario().unwrap();
        let verdicts: Vec<_> = outcomes.iter().map(|o| o.verdict).collect();
        assert_eq!(
            verdicts,
            vec![Allowed, Allowed, Allowed, Denied, Denied, Allowed, Allowed, Denied, Allowed]
        );
    }

    #[test]
    fn hr_reaches_team_lead_roles_but_team_lead_does_not() {
        let roles = Roles::new(&Resource::parse("/docs").unwrap());
        let appoint = Permissible::manage_role(roles.team_lead.clone(), Grant);
        assert!(roles.hr.can(&appoint));
        assert!(!roles.team_lead.can(&appoint));
        assert!(roles.hr > roles.team_lead);
    }
}
