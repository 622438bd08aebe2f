use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use monst_dex::catalog::{CatalogSession, PaginationControls, QueryState, Selection};
use monst_dex::config::Config;
use monst_dex::domain::{Element, Partition};
use monst_dex::logging;
use monst_dex::metrics;
use monst_dex::server::{start_server, AppState};
use monst_dex::source::{self, MockCatalog};

#[derive(Parser)]
#[command(name = "monst_dex")]
#[command(about = "Monster catalog query and filter service")]
#[command(version)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the catalog over HTTP and GraphQL
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run one query against the configured source and print the page
    Query {
        /// Substring of the name or a skill name
        #[arg(long)]
        text: Option<String>,
        /// fire, water, wood, light, dark, thunder (or 火水木光闇雷)
        #[arg(long)]
        element: Option<Element>,
        #[arg(long)]
        rarity: Option<u8>,
        #[arg(long)]
        race: Option<String>,
        #[arg(long)]
        battle_type: Option<String>,
        #[arg(long)]
        evolution_stage: Option<String>,
        #[arg(long)]
        friendship_combo: Option<String>,
        #[arg(long)]
        series: Option<String>,
        /// Required ability; repeat for several
        #[arg(long = "ability")]
        abilities: Vec<String>,
        /// all or owned
        #[arg(long, default_value = "all")]
        partition: Partition,
        /// One-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Write a generated catalog to a JSON file
    Generate {
        #[arg(long)]
        count: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        owned_ratio: Option<f64>,
        /// Output path (defaults to catalog.file from the config)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load_from(&cli.config)?;
    let _guard = logging::init_logging(&config.logging)?;
    metrics::init_metrics(config.metrics.listen);

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            let source = source::open_source(&config)?;
            let catalog = source::load_catalog(source.as_ref()).await?;
            if catalog.is_empty() {
                warn!("Catalog is empty; every listing will return no monsters");
            }
            let state = AppState::new(
                catalog,
                config.catalog.image_root.clone(),
                config.server.max_page_size,
            )?;
            start_server(Arc::new(state), &config.server).await?;
        }
        Commands::Query {
            text,
            element,
            rarity,
            race,
            battle_type,
            evolution_stage,
            friendship_combo,
            series,
            abilities,
            partition,
            page,
        } => {
            let mut state = QueryState::new(partition)
                .with_text(text.unwrap_or_default())
                .with_page(page.saturating_sub(1));
            let selections = [
                element.map(Selection::Element),
                rarity.map(Selection::Rarity),
                race.map(Selection::Race),
                battle_type.map(Selection::BattleType),
                evolution_stage.map(Selection::EvolutionStage),
                friendship_combo.map(Selection::FriendshipCombo),
                series.map(Selection::Series),
            ];
            for selection in selections.into_iter().flatten() {
                state = state.with(selection);
            }
            for ability in abilities {
                state = state.with_ability(ability);
            }

            let source = source::open_source(&config)?;
            let session = CatalogSession::new(source, state);
            let Some(result) = session.refresh().await? else {
                return Ok(());
            };

            let controls = PaginationControls::derive(result.page, result.total, result.size);
            match result.display_range() {
                Some((first, last)) => println!(
                    "📖 {}-{} of {} monsters (page {}/{})",
                    first, last, result.total, controls.current, controls.total_pages
                ),
                None => println!(
                    "📭 No monsters on page {} ({} matches)",
                    controls.current, result.total
                ),
            }
            for record in &result.items {
                println!(
                    "  #{:<5} {} [{} ★{}] {}",
                    record.number,
                    record.name,
                    record.element.label(),
                    record.rarity,
                    record.race.as_deref().unwrap_or("-")
                );
            }
            let window: Vec<String> = controls.window.iter().map(ToString::to_string).collect();
            println!("Pages: {}", window.join(" "));
        }
        Commands::Generate {
            count,
            seed,
            owned_ratio,
            out,
        } => {
            let mut mock = MockCatalog::from_config(&config.catalog);
            if let Some(count) = count {
                mock.count = count;
            }
            if let Some(seed) = seed {
                mock.seed = seed;
            }
            if let Some(owned_ratio) = owned_ratio {
                mock.owned_ratio = owned_ratio;
            }
            let out = out.unwrap_or_else(|| config.catalog.file.clone());

            let file = mock.generate()?;
            file.save(&out)?;
            info!(path = %out.display(), "Catalog written");
            println!(
                "✅ Wrote {} monsters ({} owned) to {}",
                file.monsters.len(),
                file.owned.len(),
                out.display()
            );
        }
    }

    Ok(())
}
