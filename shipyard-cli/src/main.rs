#![deny(missing_docs)]
//! Shipyard command-line interface.
//!
//! Lists, counts, creates, updates and deletes ships through the Shipyard server API.

mod client;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use client::{ShipClient, ShipListQuery};
use shipyard_core::{NewShip, Ship, ShipOrder, ShipPatch, ShipType};
use std::fmt::Write;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

#[derive(Parser)]
#[command(name = "shipyard", version, about = "Shipyard CLI")]
struct Cli {
    /// Base URL of the Shipyard server.
    #[arg(long, global = true, env = "SHIPYARD_API_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,
    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OrderArg {
    Id,
    Speed,
    Date,
    Rating,
}

impl From<OrderArg> for ShipOrder {
    fn from(value: OrderArg) -> Self {
        match value {
            OrderArg::Id => ShipOrder::Id,
            OrderArg::Speed => ShipOrder::Speed,
            OrderArg::Date => ShipOrder::Date,
            OrderArg::Rating => ShipOrder::Rating,
        }
    }
}

fn parse_ship_type(raw: &str) -> Result<ShipType, String> {
    raw.trim()
        .to_ascii_uppercase()
        .parse::<ShipType>()
        .map_err(|_| format!("unknown ship type {raw:?}; expected transport, military or merchant"))
}

#[derive(Args, Clone, Debug, Default)]
struct FilterArgs {
    /// Substring of the ship name.
    #[arg(long)]
    name: Option<String>,
    /// Substring of the planet.
    #[arg(long)]
    planet: Option<String>,
    /// Ship class (transport, military, merchant).
    #[arg(long, value_parser = parse_ship_type)]
    ship_type: Option<ShipType>,
    /// Produced strictly after this epoch millisecond.
    #[arg(long, allow_negative_numbers = true)]
    after: Option<i64>,
    /// Produced strictly before this epoch millisecond.
    #[arg(long, allow_negative_numbers = true)]
    before: Option<i64>,
    /// Used flag.
    #[arg(long)]
    used: Option<bool>,
    /// Minimum speed.
    #[arg(long)]
    min_speed: Option<f64>,
    /// Maximum speed.
    #[arg(long)]
    max_speed: Option<f64>,
    /// Minimum crew size.
    #[arg(long)]
    min_crew_size: Option<i32>,
    /// Maximum crew size.
    #[arg(long)]
    max_crew_size: Option<i32>,
    /// Minimum rating.
    #[arg(long)]
    min_rating: Option<f64>,
    /// Maximum rating.
    #[arg(long)]
    max_rating: Option<f64>,
}

impl FilterArgs {
    fn into_query(self) -> ShipListQuery {
        ShipListQuery {
            name: self.name,
            planet: self.planet,
            ship_type: self.ship_type,
            after: self.after,
            before: self.before,
            is_used: self.used,
            min_speed: self.min_speed,
            max_speed: self.max_speed,
            min_crew_size: self.min_crew_size,
            max_crew_size: self.max_crew_size,
            min_rating: self.min_rating,
            max_rating: self.max_rating,
            ..ShipListQuery::default()
        }
    }
}

#[derive(Args, Clone, Debug, Default)]
struct PageArgs {
    /// Sort key.
    #[arg(long, value_enum)]
    order: Option<OrderArg>,
    /// Zero-based page number.
    #[arg(long, allow_negative_numbers = true)]
    page_number: Option<i64>,
    /// Page size.
    #[arg(long, allow_negative_numbers = true)]
    page_size: Option<i64>,
}

#[derive(Args, Clone, Debug, Default)]
struct ShipFieldArgs {
    /// Ship name.
    #[arg(long)]
    name: Option<String>,
    /// Home planet.
    #[arg(long)]
    planet: Option<String>,
    /// Ship class (transport, military, merchant).
    #[arg(long, value_parser = parse_ship_type)]
    ship_type: Option<ShipType>,
    /// Production date in epoch milliseconds.
    #[arg(long, allow_negative_numbers = true)]
    prod_date: Option<i64>,
    /// Used flag.
    #[arg(long)]
    used: Option<bool>,
    /// Maximum speed.
    #[arg(long)]
    speed: Option<f64>,
    /// Crew size.
    #[arg(long)]
    crew_size: Option<i32>,
}

impl ShipFieldArgs {
    fn prod_date(&self) -> CliResult<Option<DateTime<Utc>>> {
        match self.prod_date {
            Some(millis) => DateTime::from_timestamp_millis(millis)
                .map(Some)
                .ok_or_else(|| format!("prod date out of range: {millis}").into()),
            None => Ok(None),
        }
    }

    fn into_new_ship(self) -> CliResult<NewShip> {
        Ok(NewShip {
            prod_date: self.prod_date()?,
            name: self.name,
            planet: self.planet,
            ship_type: self.ship_type,
            is_used: self.used,
            speed: self.speed,
            crew_size: self.crew_size,
        })
    }

    fn into_patch(self) -> CliResult<ShipPatch> {
        Ok(ShipPatch {
            prod_date: self.prod_date()?,
            name: self.name,
            planet: self.planet,
            ship_type: self.ship_type,
            is_used: self.used,
            speed: self.speed,
            crew_size: self.crew_size,
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List ships matching the filters, sorted and paged.
    List {
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Count ships matching the filters.
    Count {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show a single ship.
    Get {
        /// Ship identifier.
        id: String,
    },
    /// Create a ship.
    Create {
        #[command(flatten)]
        fields: ShipFieldArgs,
    },
    /// Update the supplied fields of a ship.
    Update {
        /// Ship identifier.
        id: String,
        #[command(flatten)]
        fields: ShipFieldArgs,
    },
    /// Delete a ship.
    Delete {
        /// Ship identifier.
        id: String,
    },
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let client = client::ReqwestShipClient::new(&cli.server_url)?;
    let output = run_command(cli.command, &client, cli.format).await?;
    print!("{output}");
    Ok(())
}

#[cfg(test)]
fn main() {}

/// Execute a command against the server and render its output.
async fn run_command<C: ShipClient>(
    command: Commands,
    client: &C,
    format: OutputFormat,
) -> CliResult<String> {
    match command {
        Commands::List { filter, page } => {
            let query = ShipListQuery {
                order: page.order.map(ShipOrder::from),
                page_number: page.page_number,
                page_size: page.page_size,
                ..filter.into_query()
            };
            let ships = client.list(&query).await?;
            render_ships(&ships, format)
        }
        Commands::Count { filter } => {
            let count = client.count(&filter.into_query()).await?;
            Ok(format!("{count}\n"))
        }
        Commands::Get { id } => {
            let ship = client.get(&id).await?;
            render_ship(&ship, format)
        }
        Commands::Create { fields } => {
            let ship = client.create(&fields.into_new_ship()?).await?;
            render_ship(&ship, format)
        }
        Commands::Update { id, fields } => {
            let ship = client.update(&id, &fields.into_patch()?).await?;
            render_ship(&ship, format)
        }
        Commands::Delete { id } => {
            client.delete(&id).await?;
            Ok(format!("deleted ship {}\n", id.trim()))
        }
    }
}

fn render_ships(ships: &[Ship], format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(ships)?)),
        OutputFormat::Text => {
            if ships.is_empty() {
                return Ok("no ships found\n".to_string());
            }
            let mut output = String::new();
            for ship in ships {
                writeln!(output, "{}", format_ship_line(ship))?;
            }
            Ok(output)
        }
    }
}

fn render_ship(ship: &Ship, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(ship)?)),
        OutputFormat::Text => Ok(format!("{}\n", format_ship_line(ship))),
    }
}

fn format_ship_line(ship: &Ship) -> String {
    format!(
        "#{id} {name} [{kind}] planet={planet} produced={produced} used={used} speed={speed} crew={crew} rating={rating}",
        id = ship.id,
        name = ship.name,
        kind = ship.ship_type,
        planet = ship.planet,
        produced = ship.prod_date.format("%Y-%m-%d"),
        used = ship.is_used,
        speed = ship.speed,
        crew = ship.crew_size,
        rating = ship.rating,
    )
}
