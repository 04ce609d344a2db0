use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{HttpIntakeBackend, IntakeController, SubmitOutcome};
use shared::domain::{ClientOption, Market};
use tracing::info;

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    server_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the market catalog.
    Markets,
    /// Search clients by name; an empty query lists the first few.
    Search { query: Option<String> },
    /// Fill the intake form and submit it.
    Submit {
        #[arg(long)]
        client: String,
        #[arg(long = "market", required = true)]
        markets: Vec<String>,
        #[arg(long)]
        date: String,
        #[arg(long)]
        html: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    match args.command {
        Command::Markets => {
            for market in Market::ALL {
                println!("{market}");
            }
        }
        Command::Search { query } => {
            let controller = connect(&args.server_url)?;
            controller
                .query_clients(query.unwrap_or_default())
                .await
                .await
                .context("client lookup task panicked")?;
            let options = controller.options().await;
            if options.is_empty() {
                println!("No matches");
            }
            for option in options {
                println!("{}\t{}", option.id, option.name);
            }
        }
        Command::Submit {
            client,
            markets,
            date,
            html,
        } => {
            let controller = connect(&args.server_url)?;
            controller
                .query_clients(client.clone())
                .await
                .await
                .context("client lookup task panicked")?;
            let option = pick_client(&controller.options().await, &client)?;
            info!(client_id = %option.id, "selected client");
            controller
                .select_client(option)
                .await
                .await
                .context("client lookup task panicked")?;

            for raw in &markets {
                let market: Market = raw.parse()?;
                if !controller.selection().await.is_market_selected(market) {
                    controller.toggle_market(market).await;
                }
            }
            controller.set_date(&date).await?;
            controller.set_content(html).await;

            match controller.submit().await? {
                SubmitOutcome::Submitted(receipt) => {
                    println!("Submitted! (Echo):");
                    println!("{}", serde_json::to_string_pretty(&receipt)?);
                }
                SubmitOutcome::Blocked(validity) => {
                    bail!("form is incomplete: {validity:?}");
                }
                SubmitOutcome::InFlight => bail!("a submission is already in flight"),
            }
        }
    }

    Ok(())
}

fn connect(server_url: &str) -> Result<std::sync::Arc<IntakeController>> {
    let backend = HttpIntakeBackend::new(server_url)?;
    Ok(IntakeController::with_backend(backend))
}

/// Exact (case-insensitive) name match first, otherwise the only candidate.
fn pick_client(options: &[ClientOption], wanted: &str) -> Result<ClientOption> {
    if let Some(exact) = options
        .iter()
        .find(|option| option.name.eq_ignore_ascii_case(wanted.trim()))
    {
        return Ok(exact.clone());
    }

    match options {
        [] => Err(anyhow!("no client matches '{wanted}'")),
        [only] => Ok(only.clone()),
        many => {
            let names = many
                .iter()
                .map(|option| option.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            Err(anyhow!("'{wanted}' is ambiguous: {names}"))
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
