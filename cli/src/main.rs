//! Access rule evaluator CLI.
//!
//! Loads an entity snapshot (users and groups as returned by the Access API)
//! and answers the same questions the web front-end asks before it renders an
//! action: may this user manage that group, what constraints bind a grant,
//! which access times are on offer, and would a given grant be accepted.
//!
//! Usage:
//!   cargo run -p access-cli -- sample
//!   cargo run -p access-cli -- --snapshot snap.json can-manage --user ada@example.com --group Wiki
//!   cargo run -p access-cli -- constraints --group App-Payments-Readers
//!   cargo run -p access-cli -- check-grant --actor 00u-owner --target 00u-member \
//!       --group App-Payments-Readers --until 43200 --reason "quarter close"

use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use access_config::{parse_until, validate_group_name, AccessConfig, GroupNameKind};
use access_contracts::{AccessError, AccessResult, GrantKind, GrantRequest, GrantVerdict};
use access_core::{authz, GrantChecker, GrantConstraints, Snapshot};

const SAMPLE_SNAPSHOT: &str = include_str!("../snapshots/sample.json");

// ── CLI definition ────────────────────────────────────────────────────────────

/// Evaluate Access authorization and tag constraints against a snapshot.
#[derive(Parser)]
#[command(
    name = "access-cli",
    about = "Evaluate Access authorization rules and tag constraints",
    long_about = "Evaluates the Access front-end's authorization predicates and tag\n\
                  constraint resolution against a saved snapshot of users and groups."
)]
struct Cli {
    /// Configuration override (JSON, or TOML with a .toml extension).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Snapshot of users and groups. Defaults to the bundled sample.
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Whether a user may manage a group.
    CanManage {
        /// User id or email.
        #[arg(long)]
        user: String,
        /// Group id or name.
        #[arg(long)]
        group: String,
    },
    /// Resolved tag constraints for a grant on a group.
    Constraints {
        #[arg(long)]
        group: String,
        /// Resolve for ownership instead of membership.
        #[arg(long)]
        owner: bool,
    },
    /// Access times offered for a grant on a group.
    AccessTimes {
        #[arg(long)]
        group: String,
        #[arg(long)]
        owner: bool,
    },
    /// Evaluate a complete grant request.
    CheckGrant {
        /// Granting user id or email.
        #[arg(long)]
        actor: String,
        /// Receiving user id or email.
        #[arg(long)]
        target: String,
        #[arg(long)]
        group: String,
        #[arg(long)]
        owner: bool,
        /// Access time key ("43200", "indefinite") or an RFC 3339 end date.
        /// Defaults to the preselected access time for the group.
        #[arg(long)]
        until: Option<String>,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Validate a new group name.
    CheckName {
        #[arg(long)]
        name: String,
        /// Validate as a role group name.
        #[arg(long, conflicts_with = "app")]
        role: bool,
        /// Validate as an app group name for this app.
        #[arg(long)]
        app: Option<String>,
    },
    /// Walk through the bundled sample snapshot.
    Sample,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for rule evaluation traces.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("access-cli error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> AccessResult<()> {
    let config = match &cli.config {
        Some(path) => AccessConfig::from_file(path)?,
        None => AccessConfig::builtin()?,
    };
    let snapshot = load_snapshot(cli.snapshot.as_deref())?;

    match cli.command {
        Command::CanManage { user, group } => can_manage(&config, &snapshot, &user, &group),
        Command::Constraints { group, owner } => {
            constraints(&snapshot, &group, GrantKind::from_ownership(owner))
        }
        Command::AccessTimes { group, owner } => {
            access_times(&config, &snapshot, &group, GrantKind::from_ownership(owner))
        }
        Command::CheckGrant {
            actor,
            target,
            group,
            owner,
            until,
            reason,
        } => check_grant(
            &config,
            &snapshot,
            &actor,
            &target,
            &group,
            GrantKind::from_ownership(owner),
            until.as_deref(),
            reason.as_deref(),
        ),
        Command::CheckName { name, role, app } => {
            let kind = match (role, app.as_deref()) {
                (true, _) => GroupNameKind::Role,
                (false, Some(app)) => GroupNameKind::App(app),
                (false, None) => GroupNameKind::Okta,
            };
            validate_group_name(config.name_validator(), kind, &name)?;
            println!("'{}' is a valid group name", name);
            Ok(())
        }
        Command::Sample => sample(&config, &snapshot),
    }
}

fn load_snapshot(path: Option<&Path>) -> AccessResult<Snapshot> {
    match path {
        Some(path) => Snapshot::from_file(path),
        None => Snapshot::from_json_str(SAMPLE_SNAPSHOT),
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn can_manage(config: &AccessConfig, snapshot: &Snapshot, user: &str, group: &str) -> AccessResult<()> {
    let user = snapshot.user(user)?;
    let group = snapshot.group(group)?;
    let reserved = config.access_app_reserved_name();

    println!("{} / {} ({})", user.display_label(), group.name(), group.type_name());
    println!("  access admin         : {}", authz::is_access_admin(user, reserved));
    println!("  direct owner         : {}", authz::is_group_owner(user, group.id()));
    if let Some(app_id) = group.as_app_group().and_then(|g| g.app_id()) {
        println!("  app owner            : {}", authz::is_app_owner_group_owner(user, app_id));
    }
    println!("  can manage           : {}", authz::can_manage_group(user, group, reserved));
    Ok(())
}

fn constraints(snapshot: &Snapshot, group: &str, kind: GrantKind) -> AccessResult<()> {
    let group = snapshot.group(group)?;
    print_constraints(group.name(), kind, &GrantConstraints::for_group(group, kind));
    Ok(())
}

fn print_constraints(group: &str, kind: GrantKind, resolved: &GrantConstraints) {
    println!("{} constraints on {}", kind, group);
    match resolved.time_limit {
        Some(limit) => println!("  time limit           : {} seconds", limit),
        None => println!("  time limit           : none"),
    }
    println!("  reason required      : {}", resolved.reason_required);
    println!("  self-add disallowed  : {}", resolved.self_add_disallowed);
}

fn access_times(config: &AccessConfig, snapshot: &Snapshot, group: &str, kind: GrantKind) -> AccessResult<()> {
    let group = snapshot.group(group)?;
    let limit = GrantConstraints::for_group(group, kind).time_limit;
    let preselected = config.default_access_time_for(limit);

    println!("{} access times for {}", kind, group.name());
    for option in config.allowed_access_times(limit) {
        let marker = if option.time == preselected { "*" } else { " " };
        println!("  {} {:<12} {}", marker, option.time.to_string(), option.label);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn check_grant(
    config: &AccessConfig,
    snapshot: &Snapshot,
    actor: &str,
    target: &str,
    group: &str,
    kind: GrantKind,
    until: Option<&str>,
    reason: Option<&str>,
) -> AccessResult<()> {
    let actor = snapshot.user(actor)?;
    let target = snapshot.user(target)?;
    let group = snapshot.group(group)?;
    let until = match until {
        Some(raw) => parse_until(raw)?,
        None => {
            let limit = GrantConstraints::for_group(group, kind).time_limit;
            config
                .default_access_time_for(limit)
                .to_until()
                .ok_or_else(|| AccessError::InvalidAccessTime {
                    value: "custom (pass --until with an RFC 3339 end date)".to_string(),
                })?
        }
    };

    let request = GrantRequest {
        actor,
        target_user_id: &target.id,
        group,
        kind,
        until,
        reason,
    };
    let verdict = GrantChecker::new(config).evaluate(&request, Utc::now())?;
    print_verdict(&verdict);
    Ok(())
}

fn print_verdict(verdict: &GrantVerdict) {
    match verdict {
        GrantVerdict::Allow { ends_at: Some(at) } => println!("  ALLOW until {}", at.to_rfc3339()),
        GrantVerdict::Allow { ends_at: None } => println!("  ALLOW indefinitely"),
        GrantVerdict::Deny { reason } => println!("  DENY  {}", reason),
    }
}

// ── Sample walkthrough ────────────────────────────────────────────────────────

fn sample(config: &AccessConfig, snapshot: &Snapshot) -> AccessResult<()> {
    println!();
    println!("Access rule core: sample walkthrough");
    println!("====================================");
    println!();

    for (user, group) in [
        ("00u-admin", "Wiki"),
        ("00u-owner", "App-Payments-Readers"),
        ("00u-owner", "Wiki"),
        ("00u-member", "App-Payments-Readers"),
    ] {
        can_manage(config, snapshot, user, group)?;
        println!();
    }

    constraints(snapshot, "App-Payments-Readers", GrantKind::Membership)?;
    println!();
    constraints(snapshot, "Role-Oncall", GrantKind::Membership)?;
    println!();
    access_times(config, snapshot, "Role-Oncall", GrantKind::Membership)?;
    println!();

    let grants: [(&str, &str, &str, Option<&str>, Option<&str>); 4] = [
        ("00u-owner", "00u-member", "App-Payments-Readers", Some("43200"), Some("quarter close")),
        ("00u-owner", "00u-member", "App-Payments-Readers", Some("indefinite"), Some("quarter close")),
        ("00u-owner", "00u-owner", "App-Payments-Readers", Some("43200"), Some("self")),
        ("00u-owner", "00u-member", "Role-Oncall", None, None),
    ];
    for (actor, target, group, until, reason) in grants {
        println!(
            "grant {} membership of {} by {} (until {})",
            target,
            group,
            actor,
            until.unwrap_or("default")
        );
        check_grant(config, snapshot, actor, target, group, GrantKind::Membership, until, reason)?;
    }
    println!();
    Ok(())
}
