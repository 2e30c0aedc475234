//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the `rqb` binary.

use clap::{Args, Parser, Subcommand};
use tabled::Tabled;

use crate::{Builder, Client, Config, Query, ResourceConfig, Result, SortDirection};

/// Resource query builder command-line interface.
#[derive(Parser, Debug)]
#[command(name = "rqb", about = "Build and send JSON-API style resource requests", version)]
pub struct Cli {
    /// Base URL of the API (defaults to the installed or placeholder URL).
    #[arg(long, global = true, env = "RQBUILDER_URL")]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Build a client from the environment and the `--url` override.
    pub fn client(&self) -> Result<Client> {
        let mut config = Config::from_env()?;
        if let Some(url) = &self.url {
            config = config.with_url(url);
        }
        Client::install(config)
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the request URL.
    Url(QueryArgs),

    /// Print the query facets as a table.
    Explain(QueryArgs),

    /// Send a GET request and print the response payload as JSON.
    Get(QueryArgs),
}

/// Resource and query facets shared by all commands.
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Resource name, e.g. `users`.
    pub resource: String,

    /// Record id.
    #[arg(long)]
    pub id: Option<String>,

    /// Filter as `column=value`. Repeatable.
    #[arg(long = "filter", value_parser = parse_key_value)]
    pub filters: Vec<(String, String)>,

    /// Multi-value filter as `column=a,b,c`. Repeatable.
    #[arg(long = "filter-in", value_parser = parse_key_value)]
    pub filters_in: Vec<(String, String)>,

    /// Related resources to include. Repeatable or comma-separated.
    #[arg(long = "include", value_delimiter = ',')]
    pub includes: Vec<String>,

    /// Sort field; prefix with `-` for descending. Repeatable.
    #[arg(long = "sort", allow_hyphen_values = true)]
    pub sorts: Vec<String>,

    #[arg(long)]
    pub page: Option<i64>,

    #[arg(long)]
    pub per_page: Option<i64>,

    #[arg(long)]
    pub limit: Option<i64>,

    #[arg(long)]
    pub offset: Option<i64>,

    /// Extra top-level query key as `key=value`. Repeatable.
    #[arg(long = "append", value_parser = parse_key_value)]
    pub appends: Vec<(String, String)>,

    /// Parent resource as `related=id`.
    #[arg(long, value_parser = parse_key_value)]
    pub from: Option<(String, String)>,

    /// Do not prefix the resource with `api/`.
    #[arg(long)]
    pub no_api: bool,
}

impl QueryArgs {
    /// Apply the arguments to a new builder made from `client`.
    pub fn apply(&self, client: &Client) -> Result<Builder> {
        let config = if self.no_api {
            ResourceConfig::append_api_to_request(false)
        } else {
            ResourceConfig::default()
        };
        let mut builder = client.make_with(self.resource.as_str(), config);

        if let Some(id) = &self.id {
            builder = builder.with_resource_id(id);
        }
        for (column, value) in &self.filters {
            builder = builder.filter(column, value)?;
        }
        for (column, values) in &self.filters_in {
            builder = builder.filter_in(column, values.split(','))?;
        }
        if !self.includes.is_empty() {
            builder = builder.with(&self.includes)?;
        }
        for sort in &self.sorts {
            builder = match sort.strip_prefix('-') {
                Some(field) => builder.order_by(field, SortDirection::Desc),
                None => builder.order_by(sort, SortDirection::Asc),
            };
        }
        if let Some(page) = self.page {
            builder = builder.page(page);
        }
        if let Some(per_page) = self.per_page {
            builder = builder.per_page(per_page);
        }
        if let Some(limit) = self.limit {
            builder = builder.limit(limit)?;
        }
        if let Some(offset) = self.offset {
            builder = builder.offset(offset)?;
        }
        for (key, value) in &self.appends {
            builder = builder.append(key, value);
        }
        if let Some((related, id)) = &self.from {
            builder = builder.from(related, id);
        }

        Ok(builder)
    }
}

/// One row of `rqb explain` output.
#[derive(Tabled, Debug, Clone, PartialEq, Eq)]
pub struct FacetRow {
    pub key: String,
    pub value: String,
}

/// Table rows for every rendered query pair, in canonical order.
pub fn facet_rows(query: &Query) -> Vec<FacetRow> {
    query
        .pairs()
        .iter()
        .map(|(key, value)| FacetRow {
            key: key.clone(),
            value: value.clone(),
        })
        .collect()
}

fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{s}'")),
    }
}
