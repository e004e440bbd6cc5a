// 🏠 plan-board CLI - community and builder views over the plans endpoint

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use plan_board::{
    aggregate_with, company_communities, company_tabs, export_file_name, filter_and_sort,
    plans_for_community, plans_for_company, price_series, write_csv, CompanyFilter, Config,
    FileSource, GroupBy, Page, Plan, PlanFilter, PlanSource, PlanType, PlansClient, Poller,
    PriceBand, Route, Screen, SortDirection, SortKey, Summary, TypeFilter, ViewState,
};

#[derive(Parser)]
#[command(name = "plan-board", version, about = "New-home plans by community and builder")]
struct Cli {
    /// Read a saved /plans response instead of calling the API
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// API base URL; plans are fetched from {api-url}/plans
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summary per community
    Communities,

    /// Summary per builder, home builder first
    Companies,

    /// Plan table for one community
    Community {
        name: Option<String>,

        #[command(flatten)]
        view: ViewArgs,

        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Communities one builder is active in
    Company { name: Option<String> },

    /// Write a community's plans to CSV
    Export {
        name: Option<String>,

        /// Defaults to {community}-plans.csv
        #[arg(long)]
        out: Option<PathBuf>,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Price vs sqft series as JSON
    Chart {
        name: Option<String>,

        #[arg(long = "type", default_value = "now", value_parser = parse_plan_type)]
        plan_type: PlanType,
    },

    /// Poll the API and reprint a summary after every refresh
    Watch {
        #[arg(value_enum, default_value_t = WatchView::Communities)]
        view: WatchView,
    },
}

/// Filter and sort flags shared by the table and the export
#[derive(Args)]
struct ViewArgs {
    /// now, plan or all; the community page opens on "now"
    #[arg(long = "type", default_value = "now")]
    plan_type: TypeFilter,

    /// Exact company name as listed in the data
    #[arg(long)]
    company: Option<String>,

    /// Price band label: 10s, 20s, ... 90s, 100s, all
    #[arg(long, default_value = "all")]
    band: PriceBand,

    /// plan_name, price, sqft or last_updated
    #[arg(long, default_value = "price")]
    sort: SortKey,

    #[arg(long)]
    desc: bool,
}

impl ViewArgs {
    fn filter(&self) -> PlanFilter {
        PlanFilter {
            plan_type: self.plan_type,
            company: self
                .company
                .clone()
                .map(CompanyFilter::Exact)
                .unwrap_or_default(),
            price_band: self.band,
        }
    }

    fn direction(&self) -> SortDirection {
        if self.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    /// Filtered and sorted copy of a community's plans
    fn apply(&self, plans: &[Plan]) -> Vec<Plan> {
        filter_and_sort(plans, &self.filter(), self.sort, self.direction())
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum WatchView {
    Communities,
    Companies,
}

fn parse_plan_type(s: &str) -> std::result::Result<PlanType, String> {
    match s.trim().to_lowercase().as_str() {
        "now" => Ok(PlanType::Now),
        "plan" => Ok(PlanType::Plan),
        other => Err(format!("unknown type '{}' (expected now or plan)", other)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("plan_board=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("Invalid configuration")?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_base(url.clone());
    }

    match cli.command {
        Command::Communities => {
            let plans = fetch(cli.file.as_ref(), &config).await?;
            let summaries = aggregate_with(&plans, GroupBy::Community, &config.home_builder);
            print_summaries("🏘️  Communities", &summaries);
        }

        Command::Companies => {
            let plans = fetch(cli.file.as_ref(), &config).await?;
            let summaries = aggregate_with(&plans, GroupBy::Company, &config.home_builder);
            print_summaries("🏗️  Companies", &summaries);
        }

        Command::Community { name, view, page } => {
            let community = community_name(name.as_deref())?;
            let plans = fetch(cli.file.as_ref(), &config).await?;
            let in_community = plans_for_community(&plans, &community);

            print_community(&community, &in_community, &view, page, &config);
        }

        Command::Company { name } => {
            let route = Route::company(name.as_deref())?;
            let company = route.name().to_string();
            let plans = fetch(cli.file.as_ref(), &config).await?;
            print_company(&company, &plans);
        }

        Command::Export { name, out, view } => {
            let community = community_name(name.as_deref())?;
            let plans = fetch(cli.file.as_ref(), &config).await?;
            let in_community = view.apply(&plans_for_community(&plans, &community));

            let path = out.unwrap_or_else(|| PathBuf::from(export_file_name(&community)));
            let file = std::fs::File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_csv(&in_community, file)
                .with_context(|| format!("Failed to write {}", path.display()))?;

            println!("💾 Exported {} plans to {}", in_community.len(), path.display());
        }

        Command::Chart { name, plan_type } => {
            let community = community_name(name.as_deref())?;
            let plans = fetch(cli.file.as_ref(), &config).await?;
            let chart = price_series(&community, &plans, plan_type);
            println!("{}", serde_json::to_string_pretty(&chart)?);
        }

        Command::Watch { view } => match cli.file {
            Some(path) => {
                let origin = path.display().to_string();
                watch(Arc::new(FileSource::new(path)), &origin, view, &config).await?
            }
            None => {
                let client = PlansClient::from_config(&config)?;
                let origin = client.plans_url().to_string();
                watch(Arc::new(client), &origin, view, &config).await?
            }
        },
    }

    Ok(())
}

// ============================================================================
// FETCH
// ============================================================================

async fn fetch(file: Option<&PathBuf>, config: &Config) -> Result<Vec<Plan>> {
    let plans = match file {
        Some(path) => FileSource::new(path).fetch_plans().await?,
        None => {
            let client = PlansClient::from_config(config)?;
            client.fetch_plans().await.map_err(|e| {
                if e.is_fetch_failure() {
                    anyhow::Error::new(e)
                        .context(format!("Plans API unreachable at {}", client.plans_url()))
                } else {
                    e.into()
                }
            })?
        }
    };
    Ok(plans)
}

fn community_name(name: Option<&str>) -> Result<String> {
    let route = Route::community(name)?;
    Ok(route.name().to_string())
}

async fn watch<S: PlanSource>(
    source: Arc<S>,
    origin: &str,
    view: WatchView,
    config: &Config,
) -> Result<()> {
    println!(
        "👀 Polling {} every {}s (Ctrl+C to stop)\n",
        origin,
        config.poll_interval.as_secs()
    );

    let mut handle = Poller::spawn(source, config.poll_interval);
    let mut rx = handle.subscribe();

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = rx.borrow_and_update().clone();
                render_watch(&state, view, config);
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    handle.cancel();
    println!("\n✅ Stopped polling");
    Ok(())
}

fn render_watch(state: &ViewState, view: WatchView, config: &Config) {
    match state.display() {
        Screen::Loading => {}
        Screen::Error(message) => {
            eprintln!("❌ {}", message);
            if !state.plans().is_empty() {
                eprintln!(
                    "   Showing {} plans from the last successful fetch ({})",
                    state.plans().len(),
                    last_updated(state)
                );
            }
        }
        Screen::Empty => println!("📭 No plans found"),
        Screen::Ready(plans) => {
            match view {
                WatchView::Communities => print_summaries(
                    "🏘️  Communities",
                    &aggregate_with(plans, GroupBy::Community, &config.home_builder),
                ),
                WatchView::Companies => print_summaries(
                    "🏗️  Companies",
                    &aggregate_with(plans, GroupBy::Company, &config.home_builder),
                ),
            }
            println!("🕒 {}\n", last_updated(state));
        }
    }
}

/// Local wall-clock time of the snapshot on screen
fn last_updated(state: &ViewState) -> String {
    match state.snapshot() {
        Some(snapshot) => format!(
            "last updated {}",
            snapshot.fetched_at.with_timezone(&chrono::Local).format("%H:%M:%S")
        ),
        None => "never updated".to_string(),
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

fn print_summaries(title: &str, summaries: &[Summary]) {
    println!("{} ({})", title, summaries.len());
    println!("{}", RULE);

    if summaries.is_empty() {
        println!("📭 No plans found");
        return;
    }

    println!(
        "{:<30} {:>6} {:>6} {:>12} {:>25} {:>8}",
        "Name", "Plans", "Now", "Avg Price", "Range", "Changed"
    );
    for summary in summaries {
        println!(
            "{:<30} {:>6} {:>6} {:>12} {:>25} {:>8}",
            truncate(&summary.name, 30),
            summary.total_plans,
            summary.total_now,
            format_price(summary.avg_price),
            format!(
                "{} - {}",
                format_price(summary.price_range.min),
                format_price(summary.price_range.max)
            ),
            summary.recent_changes
        );
        println!("   {}", summary.counterparts.join(", "));
    }
}

fn print_community(
    community: &str,
    plans: &[Plan],
    view_args: &ViewArgs,
    page: usize,
    config: &Config,
) {
    println!("🏘️  {}", community);
    println!("{}", RULE);

    if plans.is_empty() {
        println!("📭 No plans found");
        return;
    }

    println!("🏗️  {}", company_tabs(plans, &config.home_builder).join(" | "));
    println!(
        "💰 {}",
        PriceBand::all_bands()
            .iter()
            .map(|b| b.label())
            .collect::<Vec<_>>()
            .join(" ")
    );

    let view = view_args.apply(plans);
    let page = Page::of(&view, page, config.page_size);

    println!(
        "\n{:<32} {:>12} {:>7} {:>7} {:>6} {:<20} {:<5}",
        "Plan", "Price", "Sqft", "$/Sqft", "Type", "Company", "Chg"
    );
    for plan in page.items {
        println!(
            "{:<32} {:>12} {:>7} {:>7.0} {:>6} {:<20} {:<5}",
            truncate(plan.display_name(), 32),
            format_price(plan.price),
            plan.sqft,
            plan.price_per_sqft,
            plan.plan_type.label(),
            truncate(&plan.company, 20),
            if plan.price_changed_recently { "🔔" } else { "" }
        );
    }

    println!(
        "\n📄 Page {} of {} ({} of {} plans)",
        page.number,
        page.total_pages,
        view.len(),
        plans.len()
    );
}

fn print_company(company: &str, plans: &[Plan]) {
    let own = plans_for_company(plans, company);
    let communities = company_communities(plans, company);

    println!("🏗️  {}", company);
    println!("{}", RULE);

    if own.is_empty() {
        println!("📭 No plans found");
        return;
    }

    println!("✓ {} listings in {} communities\n", own.len(), communities.len());
    for summary in &communities {
        println!(
            "  {:<30} {:>4} listings ({} plan, {} now)   avg {:>12}",
            truncate(&summary.name, 30),
            summary.total_listings(),
            summary.total_plans,
            summary.total_now,
            format_price(summary.avg_price)
        );
    }
}

fn format_price(price: f64) -> String {
    let whole = price.round() as i64;
    let digits = whole.abs().to_string();

    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if whole < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
