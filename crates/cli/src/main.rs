use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Read;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use advisor_core::advice::{self, AdvisorySheet, NextStepOutcome};
use advisor_core::domain::contract::AdvisoryRequest;
use advisor_core::domain::recommendation::RecommendationId;
use advisor_core::rules::RuleThresholds;
use advisor_core::storage::PgClientStore;

#[derive(Debug, Parser)]
#[command(name = "advisor_cli")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate an advisory request read from a JSON file.
    Evaluate {
        /// Path to the request JSON, or `-` for stdin.
        #[arg(long, default_value = "-")]
        input: String,
    },

    /// Evaluate a client from the store.
    Client {
        #[arg(long)]
        client_id: Uuid,

        /// Forward this recommendation id (e.g. `efund`) as a next step.
        #[arg(long)]
        next_step: Option<String>,

        /// Do everything except writing to the database.
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = advisor_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    let thresholds = RuleThresholds::from_env();
    thresholds.validate()?;

    let res = match args.command {
        Command::Evaluate { input } => evaluate(&input, &thresholds),
        Command::Client {
            client_id,
            next_step,
            dry_run,
        } => client(&settings, client_id, next_step.as_deref(), dry_run, &thresholds).await,
    };

    if let Err(err) = &res {
        sentry_anyhow::capture_anyhow(err);
    }
    res
}

fn evaluate(input: &str, thresholds: &RuleThresholds) -> anyhow::Result<()> {
    let raw = read_input(input)?;
    let request = parse_request(&raw)?;
    let sheet = AdvisorySheet::evaluate(request, thresholds)?;

    tracing::info!(recommendations = sheet.recommendation_count(), "advisory request evaluated");
    println!("{}", serde_json::to_string_pretty(&sheet)?);
    Ok(())
}

async fn client(
    settings: &advisor_core::config::Settings,
    client_id: Uuid,
    next_step: Option<&str>,
    dry_run: bool,
    thresholds: &RuleThresholds,
) -> anyhow::Result<()> {
    let recommendation_id = next_step
        .map(|s| {
            RecommendationId::parse(s).with_context(|| format!("unknown recommendation id: {s}"))
        })
        .transpose()?;

    let store = PgClientStore::new(settings.connect_pool().await?);

    let Some(recommendation_id) = recommendation_id else {
        let sheet = advice::advise_client(&store, client_id, thresholds)
            .await?
            .with_context(|| format!("client profile not found: {client_id}"))?;
        println!("{}", serde_json::to_string_pretty(&sheet)?);
        return Ok(());
    };

    let outcome =
        advice::forward_next_step(&store, client_id, recommendation_id, thresholds, dry_run)
            .await?;

    match outcome {
        NextStepOutcome::Created { next_step_id, .. } => {
            tracing::info!(%client_id, %recommendation_id, %next_step_id, "next step forwarded");
            println!("{next_step_id}");
        }
        NextStepOutcome::Planned(step) => {
            tracing::info!(%client_id, %recommendation_id, dry_run = true, "next step planned");
            println!("{}", serde_json::to_string_pretty(&step)?);
        }
        NextStepOutcome::ClientNotFound => {
            anyhow::bail!("client profile not found: {client_id}");
        }
        NextStepOutcome::NotApplicable => {
            tracing::warn!(%client_id, %recommendation_id, "recommendation does not apply; nothing forwarded");
        }
    }
    Ok(())
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read request from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(input).with_context(|| format!("failed to read {input}"))
}

fn parse_request(raw: &str) -> anyhow::Result<AdvisoryRequest> {
    serde_json::from_str::<AdvisoryRequest>(raw).context("input is not a valid advisory request")
}

fn init_sentry(settings: &advisor_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_client_subcommand() {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let args = Args::try_parse_from([
            "advisor_cli",
            "client",
            "--client-id",
            id_str.as_str(),
            "--next-step",
            "efund",
            "--dry-run",
        ])
        .unwrap();

        match args.command {
            Command::Client {
                client_id,
                next_step,
                dry_run,
            } => {
                assert_eq!(client_id, id);
                assert_eq!(next_step.as_deref(), Some("efund"));
                assert!(dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_request_reads_both_families() {
        let raw = r#"{
            "investment": {"shape": "snapshot", "savingsRate": 30, "emergencyFundMonths": 2},
            "insurance": {"shape": "snapshot"}
        }"#;
        let request = parse_request(raw).unwrap();
        let sheet = AdvisorySheet::evaluate(request, &RuleThresholds::default()).unwrap();
        assert_eq!(sheet.investment.len(), 2);
        assert_eq!(sheet.insurance.len(), 1);
    }

    #[test]
    fn parse_request_rejects_garbage() {
        assert!(parse_request("not json").is_err());
    }
}
