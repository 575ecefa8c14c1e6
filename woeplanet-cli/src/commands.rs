//! Subcommand arguments, their resolved configuration and execution.

use std::{io::Write, str::FromStr};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use woeplanet_cache::{CacheOptions, GeoplanetCache};
use woeplanet_core::Table;

use crate::{
    ARG_CACHE, ARG_PLACETYPE, ARG_WOEID, CliError, ENV_ANCESTOR_CACHE, ENV_ANCESTOR_PLACETYPE,
    ENV_ANCESTOR_WOEID, ENV_INIT_CACHE, ENV_MAXWOEID_CACHE, ENV_PLACE_CACHE, ENV_PLACE_WOEID,
};

/// CLI arguments for the `init` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "init",
    long_about = "Create every table and index in the cache file, creating \
                 the file and its directory when missing. Existing tables \
                 are kept unless --reset is given.",
    about = "Create the cache schema"
)]
#[ortho_config(prefix = "WOEPLANET")]
pub(crate) struct InitArgs {
    /// Path to the cache file.
    #[arg(long = ARG_CACHE, value_name = "path")]
    #[serde(default)]
    pub(crate) cache: Option<Utf8PathBuf>,
    /// Drop and recreate every table.
    #[arg(long)]
    #[serde(default)]
    pub(crate) reset: bool,
}

/// CLI arguments for the `place` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "place", about = "Print a place as JSON")]
#[ortho_config(prefix = "WOEPLANET")]
pub(crate) struct PlaceArgs {
    /// WOE ID of the place.
    #[arg(value_name = "woeid")]
    #[serde(default)]
    pub(crate) woeid: Option<u64>,
    /// Path to the cache file.
    #[arg(long = ARG_CACHE, value_name = "path")]
    #[serde(default)]
    pub(crate) cache: Option<Utf8PathBuf>,
}

/// CLI arguments for the `ancestor` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "ancestor",
    long_about = "Walk parent links upwards from a place and print the first \
                 place with the requested placetype, which may be given as a \
                 numeric identifier or a short name such as `Country`.",
    about = "Print the nearest ancestor of a placetype"
)]
#[ortho_config(prefix = "WOEPLANET")]
pub(crate) struct AncestorArgs {
    /// WOE ID to start from.
    #[arg(value_name = "woeid")]
    #[serde(default)]
    pub(crate) woeid: Option<u64>,
    /// Placetype identifier or short name.
    #[arg(value_name = "placetype")]
    #[serde(default)]
    pub(crate) placetype: Option<String>,
    /// Path to the cache file.
    #[arg(long = ARG_CACHE, value_name = "path")]
    #[serde(default)]
    pub(crate) cache: Option<Utf8PathBuf>,
}

/// CLI arguments for the `maxwoeid` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "maxwoeid", about = "Print the highest recorded WOE ID")]
#[ortho_config(prefix = "WOEPLANET")]
pub(crate) struct MaxwoeidArgs {
    /// Path to the cache file.
    #[arg(long = ARG_CACHE, value_name = "path")]
    #[serde(default)]
    pub(crate) cache: Option<Utf8PathBuf>,
}

/// Placetype named on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PlacetypeRef {
    Id(u64),
    Shortname(String),
}

impl FromStr for PlacetypeRef {
    type Err = CliError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(CliError::InvalidArgument {
                field: ARG_PLACETYPE,
                value: value.to_owned(),
            });
        }
        Ok(trimmed
            .parse()
            .map_or_else(|_| Self::Shortname(trimmed.to_owned()), Self::Id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InitConfig {
    pub(crate) cache: Utf8PathBuf,
    pub(crate) reset: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlaceConfig {
    pub(crate) cache: Utf8PathBuf,
    pub(crate) woeid: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AncestorConfig {
    pub(crate) cache: Utf8PathBuf,
    pub(crate) woeid: u64,
    pub(crate) placetype: PlacetypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MaxwoeidConfig {
    pub(crate) cache: Utf8PathBuf,
}

fn required<T>(value: Option<T>, field: &'static str, env: &'static str) -> Result<T, CliError> {
    value.ok_or(CliError::MissingArgument { field, env })
}

impl TryFrom<InitArgs> for InitConfig {
    type Error = CliError;

    fn try_from(args: InitArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            cache: required(args.cache, ARG_CACHE, ENV_INIT_CACHE)?,
            reset: args.reset,
        })
    }
}

impl TryFrom<PlaceArgs> for PlaceConfig {
    type Error = CliError;

    fn try_from(args: PlaceArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            cache: required(args.cache, ARG_CACHE, ENV_PLACE_CACHE)?,
            woeid: required(args.woeid, ARG_WOEID, ENV_PLACE_WOEID)?,
        })
    }
}

impl TryFrom<AncestorArgs> for AncestorConfig {
    type Error = CliError;

    fn try_from(args: AncestorArgs) -> Result<Self, Self::Error> {
        let placetype = required(args.placetype, ARG_PLACETYPE, ENV_ANCESTOR_PLACETYPE)?;
        Ok(Self {
            cache: required(args.cache, ARG_CACHE, ENV_ANCESTOR_CACHE)?,
            woeid: required(args.woeid, ARG_WOEID, ENV_ANCESTOR_WOEID)?,
            placetype: placetype.parse()?,
        })
    }
}

impl TryFrom<MaxwoeidArgs> for MaxwoeidConfig {
    type Error = CliError;

    fn try_from(args: MaxwoeidArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            cache: required(args.cache, ARG_CACHE, ENV_MAXWOEID_CACHE)?,
        })
    }
}

impl InitArgs {
    pub(crate) fn into_config(self) -> Result<InitConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        InitConfig::try_from(merged)
    }
}

impl PlaceArgs {
    pub(crate) fn into_config(self) -> Result<PlaceConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlaceConfig::try_from(merged)
    }
}

impl AncestorArgs {
    pub(crate) fn into_config(self) -> Result<AncestorConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        AncestorConfig::try_from(merged)
    }
}

impl MaxwoeidArgs {
    pub(crate) fn into_config(self) -> Result<MaxwoeidConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        MaxwoeidConfig::try_from(merged)
    }
}

fn open_existing(path: &Utf8Path) -> Result<GeoplanetCache, CliError> {
    if !path.is_file() {
        return Err(CliError::MissingCache {
            path: path.to_path_buf(),
        });
    }
    GeoplanetCache::open(path, &CacheOptions::without_setup()).map_err(|source| {
        CliError::OpenCache {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn write_line(writer: &mut dyn Write, line: &str) -> Result<(), CliError> {
    writeln!(writer, "{line}").map_err(CliError::WriteOutput)
}

fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    write_line(writer, &payload)
}

pub(crate) fn init(config: &InitConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let mut cache =
        GeoplanetCache::open(&config.cache, &CacheOptions::without_setup()).map_err(|source| {
            CliError::OpenCache {
                path: config.cache.clone(),
                source,
            }
        })?;
    for table in Table::ALL {
        cache.create_table(table, config.reset)?;
        cache.create_index(table)?;
    }
    let verb = if config.reset { "reset" } else { "initialised" };
    write_line(
        writer,
        &format!("{verb} {} tables in {}", Table::ALL.len(), config.cache),
    )
}

pub(crate) fn place(config: &PlaceConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let cache = open_existing(&config.cache)?;
    let place = cache
        .get_woeid(config.woeid)?
        .ok_or_else(|| CliError::NotFound {
            what: format!("woeid {}", config.woeid),
        })?;
    write_json(writer, &place)
}

pub(crate) fn ancestor(config: &AncestorConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let cache = open_existing(&config.cache)?;
    let placetype = match &config.placetype {
        PlacetypeRef::Id(id) => *id,
        PlacetypeRef::Shortname(name) => {
            cache
                .get_placetype(name)?
                .ok_or_else(|| CliError::NotFound {
                    what: format!("placetype {name:?}"),
                })?
                .id
        }
    };
    let place = cache
        .find_ancestor(config.woeid, placetype)?
        .ok_or_else(|| CliError::NotFound {
            what: format!("placetype {placetype} ancestor of woeid {}", config.woeid),
        })?;
    write_json(writer, &place)
}

pub(crate) fn maxwoeid(config: &MaxwoeidConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let cache = open_existing(&config.cache)?;
    write_line(writer, &cache.get_maxwoeid()?.to_string())
}
