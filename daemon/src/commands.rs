//! CLI subcommands, each applied to the persisted deployment state.
//!
//! Mutating commands take an exclusive lock on `<state>.lock`, load the state
//! file, make one call through [`Deployment`], and write the file back only if
//! the call succeeded. Read-only commands take the lock shared.

use crate::config::DeploymentConfig;
use anyhow::{bail, Context};
use fd_lock::RwLock;
use flightsurety_governance::{Deployment, RegistrationOutcome};
use flightsurety_types::{Address, Wei};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone, clap::Subcommand)]
pub enum Command {
    /// Deploy a fresh registry with the configured genesis airline.
    Deploy {
        /// Overwrite an existing state file.
        #[arg(long)]
        force: bool,
    },
    /// Show operational status and every registered airline.
    Status,
    /// Show one address: lifecycle state, funds, and pending votes.
    Airline { address: Address },
    /// Register a candidate, or vote for it once auto-admission is exhausted.
    Register {
        /// The airline making the call.
        #[arg(long = "from")]
        caller: Address,
        candidate: Address,
    },
    /// Fund the calling airline, e.g. `fund --from 0x… "10 ether"`.
    Fund {
        #[arg(long = "from")]
        caller: Address,
        amount: Wei,
    },
    /// Pause (`false`) or resume (`true`) the system. Owner only.
    SetOperational {
        #[arg(long = "from")]
        caller: Address,
        #[arg(action = clap::ArgAction::Set)]
        operational: bool,
    },
    /// Allow a contract identity to mutate the registry. Owner only.
    Authorize {
        #[arg(long = "from")]
        caller: Address,
        contract: Address,
    },
    /// Revoke a contract identity's registry access. Owner only.
    Deauthorize {
        #[arg(long = "from")]
        caller: Address,
        contract: Address,
    },
}

/// Execute `command` against the state file at `state_path`, returning the
/// text to print.
pub fn run(
    command: &Command,
    config: &DeploymentConfig,
    state_path: &Path,
) -> anyhow::Result<String> {
    match command {
        Command::Deploy { force } => deploy(config, state_path, *force),
        Command::Status => read(state_path, |d| Ok(render_status(d))),
        Command::Airline { address } => read(state_path, |d| Ok(render_airline(d, address))),
        Command::Register { caller, candidate } => mutate(state_path, |d| {
            Ok(match d.register_airline(caller, *candidate)? {
                RegistrationOutcome::Registered => format!("{candidate} registered"),
                RegistrationOutcome::VoteRecorded { votes, threshold } => {
                    format!("vote recorded for {candidate}: {votes}/{threshold}")
                }
            })
        }),
        Command::Fund { caller, amount } => mutate(state_path, |d| {
            let active = d.fund(caller, *amount)?;
            Ok(format!("{caller} funded with {amount}, active: {active}"))
        }),
        Command::SetOperational {
            caller,
            operational,
        } => mutate(state_path, |d| {
            d.set_operating_status(caller, *operational)?;
            Ok(format!("operational: {operational}"))
        }),
        Command::Authorize { caller, contract } => mutate(state_path, |d| {
            d.authorize_caller(caller, *contract)?;
            Ok(format!("{contract} authorized"))
        }),
        Command::Deauthorize { caller, contract } => mutate(state_path, |d| {
            d.deauthorize_caller(caller, contract)?;
            Ok(format!("{contract} deauthorized"))
        }),
    }
}

fn deploy(config: &DeploymentConfig, state_path: &Path, force: bool) -> anyhow::Result<String> {
    let genesis = config.genesis_airline()?;
    let deployment = Deployment::deploy(
        config.owner()?,
        config.governance_address()?,
        genesis,
        config.params()?,
    )?;
    let mut lock = open_lock(state_path)?;
    let _guard = lock.write().context("failed to lock state file")?;
    if state_path.exists() && !force {
        bail!(
            "state file {} already exists (use --force to redeploy)",
            state_path.display()
        );
    }
    save_state(state_path, &deployment)?;
    tracing::info!(state = %state_path.display(), "deployment written");
    Ok(format!("deployed with genesis airline {genesis}"))
}

/// Load under a shared lock and render.
fn read<F>(state_path: &Path, view: F) -> anyhow::Result<String>
where
    F: FnOnce(&Deployment) -> anyhow::Result<String>,
{
    let lock = open_lock(state_path)?;
    let _guard = lock.read().context("failed to lock state file")?;
    view(&load_state(state_path)?)
}

/// Load, apply one call, persist on success, all under an exclusive lock so
/// concurrent invocations are serialized.
fn mutate<F>(state_path: &Path, call: F) -> anyhow::Result<String>
where
    F: FnOnce(&Deployment) -> anyhow::Result<String>,
{
    let mut lock = open_lock(state_path)?;
    let _guard = lock.write().context("failed to lock state file")?;
    let deployment = load_state(state_path)?;
    let message = call(&deployment)?;
    save_state(state_path, &deployment)?;
    Ok(message)
}

/// Advisory lock on `<state>.lock`, next to the state file.
fn open_lock(state_path: &Path) -> anyhow::Result<RwLock<File>> {
    let mut name = state_path.as_os_str().to_owned();
    name.push(".lock");
    let lock_path = PathBuf::from(name);
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(&lock_path)
        .with_context(|| format!("failed to open lock file {}", lock_path.display()))?;
    Ok(RwLock::new(file))
}

pub fn load_state(path: &Path) -> anyhow::Result<Deployment> {
    let bytes = std::fs::read(path).with_context(|| {
        format!(
            "failed to read state file {} (run `deploy` first)",
            path.display()
        )
    })?;
    Deployment::from_bytes(&bytes)
        .with_context(|| format!("state file {} is corrupt", path.display()))
}

/// Write through a uniquely named temp file in the same directory, then
/// rename over the state file, so a crash never leaves a half-written state.
pub fn save_state(path: &Path, deployment: &Deployment) -> anyhow::Result<()> {
    let bytes = deployment.to_bytes()?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    tmp.write_all(&bytes)
        .and_then(|()| tmp.as_file().sync_all())
        .context("failed to write state")?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to replace state file {}", path.display()))?;
    Ok(())
}

fn render_status(deployment: &Deployment) -> String {
    let params = deployment.params();
    let mut lines = vec![
        format!("operational: {}", deployment.is_operational()),
        format!("minimum ante: {}", params.minimum_funding_ante),
        format!(
            "auto-approved airlines: {}",
            params.auto_approved_airline_count
        ),
        format!("airlines: {}", deployment.airlines_length()),
    ];
    lines.extend(deployment.airlines().iter().map(|airline| {
        format!(
            "  {}  active={}  funds={}",
            airline.address, airline.active, airline.funds_contributed
        )
    }));
    lines.extend(deployment.pending_candidates().iter().map(|candidate| {
        format!(
            "  pending {}  votes={}",
            candidate,
            deployment.vote_count(candidate)
        )
    }));
    lines.join("\n")
}

fn render_airline(deployment: &Deployment, address: &Address) -> String {
    let funds = deployment
        .airline(address)
        .map(|a| a.funds_contributed)
        .unwrap_or(Wei::ZERO);
    format!(
        "{address}  status={:?}  funds={funds}  votes={}",
        deployment.status(address),
        deployment.vote_count(address)
    )
}
