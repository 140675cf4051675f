//! CLI flag definitions and action selection

use clap::Parser;
use openblu_core::{
    FilterField, FilterSpec, OpenBluError, OrderField, OrderSpec, Pipeline, Result, SortDirection,
    DEFAULT_LIMIT,
};

/// OpenBlu VPN directory client
///
/// Lists servers from the OpenBlu directory and downloads OpenVPN
/// configurations.
#[derive(Parser, Debug)]
#[command(name = "openbluctl")]
#[command(version, about = "OpenBlu VPN directory client", long_about = None)]
pub struct Cli {
    /// OpenBlu API access key (a stored key takes precedence)
    #[arg(long)]
    pub key: Option<String>,

    /// Download the configuration of the best-scoring server
    #[arg(short = 'b', long)]
    pub connect_best: bool,

    /// Prefer servers in this country
    ///
    /// With --connect-best, falls back to any server when none matches.
    /// With --fetch-servers, same as `--filter-by country --filter <COUNTRY>`.
    #[arg(short = 'c', long)]
    pub country: Option<String>,

    /// Fetch and list available servers
    #[arg(short = 'f', long)]
    pub fetch_servers: bool,

    /// Show a server and save its configuration as <ID>.ovpn
    #[arg(short = 'i', long, value_name = "ID")]
    pub info: Option<String>,

    /// Field to filter the listing on (requires --filter)
    #[arg(long, value_enum)]
    pub filter_by: Option<FilterBy>,

    /// Value the --filter-by field must contain (requires --filter-by)
    #[arg(long, value_name = "VALUE")]
    pub filter: Option<String>,

    /// Field to order the listing by
    #[arg(short = 'o', long, value_enum)]
    pub order_by: Option<OrderBy>,

    /// Direction of the ordering (requires --order-by, default ascending)
    #[arg(short = 's', long, value_enum)]
    pub sort_by: Option<SortBy>,

    /// Verbose output
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Maximum number of servers listed [default: 5]
    #[arg(short = 'l', long)]
    pub limit: Option<usize>,

    /// Store an access key for later runs
    #[arg(long, value_name = "KEY")]
    pub set_access_key: Option<String>,

    /// API endpoint (overrides config file)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Output format (overrides config file)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Don't load config file
    #[arg(long)]
    pub no_config: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<clap_complete::Shell>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// One line per server
    Text,
    /// Pretty table output
    Table,
    /// JSON output
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        }
    }
}

impl From<&OutputFormat> for crate::format::OutputFormat {
    fn from(format: &OutputFormat) -> Self {
        match format {
            OutputFormat::Text => crate::format::OutputFormat::Text,
            OutputFormat::Table => crate::format::OutputFormat::Table,
            OutputFormat::Json => crate::format::OutputFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum FilterBy {
    Country,
    #[value(name = "country_short")]
    CountryShort,
}

impl From<FilterBy> for FilterField {
    fn from(value: FilterBy) -> Self {
        match value {
            FilterBy::Country => FilterField::Country,
            FilterBy::CountryShort => FilterField::CountryShort,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OrderBy {
    Score,
    Ping,
    Sessions,
    #[value(name = "total_sessions")]
    TotalSessions,
    #[value(name = "last_updated")]
    LastUpdated,
    Created,
}

impl From<OrderBy> for OrderField {
    fn from(value: OrderBy) -> Self {
        match value {
            OrderBy::Score => OrderField::Score,
            OrderBy::Ping => OrderField::Ping,
            OrderBy::Sessions => OrderField::Sessions,
            OrderBy::TotalSessions => OrderField::TotalSessions,
            OrderBy::LastUpdated => OrderField::LastUpdated,
            OrderBy::Created => OrderField::Created,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SortBy {
    Ascending,
    Descending,
}

impl From<SortBy> for SortDirection {
    fn from(value: SortBy) -> Self {
        match value {
            SortBy::Ascending => SortDirection::Ascending,
            SortBy::Descending => SortDirection::Descending,
        }
    }
}

/// The single thing a run does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SaveKey(String),
    FetchServers,
    ConnectBest,
    Info(String),
}

impl Cli {
    /// Select the action; exactly one must be requested.
    pub fn action(&self) -> Result<Action> {
        let mut actions = Vec::new();
        if let Some(key) = &self.set_access_key {
            actions.push(Action::SaveKey(key.clone()));
        }
        if self.fetch_servers {
            actions.push(Action::FetchServers);
        }
        if self.connect_best {
            actions.push(Action::ConnectBest);
        }
        if let Some(id) = &self.info {
            actions.push(Action::Info(id.clone()));
        }

        if actions.len() > 1 {
            return Err(OpenBluError::Usage(
                "--set-access-key, --fetch-servers, --connect-best and --info are mutually exclusive"
                    .to_string(),
            ));
        }
        let action = actions.pop().ok_or_else(|| {
            OpenBluError::Usage(
                "Nothing to do: pass one of --set-access-key, --fetch-servers, --connect-best or --info"
                    .to_string(),
            )
        })?;

        if self.country.is_some() && !matches!(action, Action::FetchServers | Action::ConnectBest) {
            return Err(OpenBluError::Usage(
                "--country only applies to --fetch-servers and --connect-best".to_string(),
            ));
        }

        if action != Action::FetchServers {
            if let Some(flag) = self.listing_flags().first() {
                return Err(OpenBluError::Usage(format!(
                    "{} only applies to --fetch-servers",
                    flag
                )));
            }
        }

        Ok(action)
    }

    /// Filter, order and limit flags present on the command line
    fn listing_flags(&self) -> Vec<&'static str> {
        [
            ("--filter-by", self.filter_by.is_some()),
            ("--filter", self.filter.is_some()),
            ("--order-by", self.order_by.is_some()),
            ("--sort-by", self.sort_by.is_some()),
            ("--limit", self.limit.is_some()),
        ]
        .into_iter()
        .filter_map(|(flag, set)| set.then_some(flag))
        .collect()
    }

    /// The filter requested on the command line, `-c` included
    pub fn filter_spec(&self) -> Result<Option<FilterSpec>> {
        let explicit = FilterSpec::from_parts(self.filter_by.map(Into::into), self.filter.clone())?;
        match (&self.country, explicit) {
            (Some(_), Some(_)) => Err(OpenBluError::Usage(
                "--country cannot be combined with --filter-by/--filter".to_string(),
            )),
            (Some(country), None) => Ok(Some(FilterSpec::new(FilterField::Country, country))),
            (None, explicit) => Ok(explicit),
        }
    }

    pub fn order_spec(&self) -> Result<Option<OrderSpec>> {
        OrderSpec::from_parts(self.order_by.map(Into::into), self.sort_by.map(Into::into))
    }

    /// Filter → sort → limit as requested
    pub fn pipeline(&self) -> Result<Pipeline> {
        Ok(Pipeline::new(
            self.filter_spec()?,
            self.order_spec()?,
            self.limit.unwrap_or(DEFAULT_LIMIT),
        ))
    }
}
