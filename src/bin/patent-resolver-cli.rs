//! `patent-resolver-cli` - unified CLI for the USPTO/EPO providers, grounded
//! on `cli.py`'s three `typer` commands.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};

use patent_resolver::config::Config;
use patent_resolver::provider::{CpcWhich, Provider, cql::CqlProvider, field_query::FieldQueryProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProviderKind {
    Uspto,
    Epo,
}

#[derive(Parser)]
#[command(name = "patent-resolver-cli", about = "Unified CLI for USPTO/EPO patent-count providers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Return the total count for a CPC prefix in a given year.
    CountCpcYear {
        /// Calendar year, e.g. 2021.
        year: i32,
        /// CPC prefix, e.g. Y02.
        #[arg(long, default_value = "Y02")]
        cpc: String,
        /// Data source.
        #[arg(long, value_enum, default_value_t = ProviderKind::Uspto)]
        provider: ProviderKind,
        /// Restrict to utility patents, if supported by the provider.
        #[arg(long)]
        utility_only: bool,
        /// Requests-per-minute pacing.
        #[arg(long, default_value_t = 30)]
        rpm: u32,
    },
    /// Return the total count for a CPC prefix and assignee name in a given year.
    CountCpcCompanyYear {
        /// Assignee/applicant name, exact string.
        company: String,
        /// Calendar year, e.g. 2021.
        #[arg(long)]
        year: i32,
        /// CPC prefix, e.g. Y02.
        #[arg(long, default_value = "Y02")]
        cpc: String,
        /// Provider-specific CPC scope.
        #[arg(long, value_enum, default_value_t = CliCpcWhich::Current)]
        which: CliCpcWhich,
        /// Data source.
        #[arg(long, value_enum, default_value_t = ProviderKind::Uspto)]
        provider: ProviderKind,
        /// Restrict to utility patents, if supported.
        #[arg(long)]
        utility_only: bool,
        /// Requests-per-minute pacing.
        #[arg(long, default_value_t = 30)]
        rpm: u32,
    },
    /// List assignees whose organization begins with the given prefix.
    AssigneeDiscover {
        /// Organization prefix, e.g. "BASF".
        prefix: String,
        /// Data source.
        #[arg(long, value_enum, default_value_t = ProviderKind::Uspto)]
        provider: ProviderKind,
        /// Maximum candidates to return.
        #[arg(long, default_value_t = 400)]
        limit: usize,
        /// Requests-per-minute pacing.
        #[arg(long, default_value_t = 30)]
        rpm: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliCpcWhich {
    Current,
    AtIssue,
}

impl From<CliCpcWhich> for CpcWhich {
    fn from(w: CliCpcWhich) -> Self {
        match w {
            CliCpcWhich::Current => CpcWhich::Current,
            CliCpcWhich::AtIssue => CpcWhich::AtIssue,
        }
    }
}

fn build_provider(kind: ProviderKind, rpm: u32, config: &Config) -> patent_resolver::error::Result<Arc<dyn Provider>> {
    let provider: Arc<dyn Provider> = match kind {
        ProviderKind::Uspto => Arc::new(
            FieldQueryProvider::builder("uspto", config.pv_url.clone(), config.pv_key.clone())
                .rpm(rpm)
                .build(),
        ),
        ProviderKind::Epo => Arc::new(
            CqlProvider::builder(
                "epo",
                config.ops_auth_url.clone(),
                config.ops_search_url.clone(),
                config.ops_key.clone(),
                config.ops_secret.clone(),
            )
            .rpm(rpm)
            .build(),
        ),
    };
    Ok(provider)
}

async fn run(cli: Cli) -> patent_resolver::error::Result<()> {
    let config = Config::from_env()?;

    match cli.command {
        Command::CountCpcYear { year, cpc, provider, utility_only, rpm } => {
            let provider = build_provider(provider, rpm, &config)?;
            let res = provider.count_by_cpc_year(year, &cpc, None, utility_only).await?;
            println!("{}", res.total);
        }
        Command::CountCpcCompanyYear { company, year, cpc, which, provider, utility_only, rpm } => {
            let provider = build_provider(provider, rpm, &config)?;
            let res = provider
                .count_by_cpc_company_year(year, &cpc, &company, Some(which.into()), utility_only)
                .await?;
            println!("{}", res.total);
        }
        Command::AssigneeDiscover { prefix, provider, limit, rpm } => {
            let provider = build_provider(provider, rpm, &config)?;
            let assignees = provider.assignee_discover(&prefix, limit).await?;
            for a in assignees {
                let loc = [a.country, a.state, a.city].into_iter().flatten().collect::<Vec<_>>().join(" / ");
                println!("{}\t{}", a.organization, loc);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
