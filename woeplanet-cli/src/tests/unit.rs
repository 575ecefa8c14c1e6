//! Focused unit tests covering argument parsing and configuration
//! conversion.

use super::*;
use crate::commands::{
    AncestorConfig, InitConfig, MaxwoeidConfig, PlaceConfig, PlacetypeRef,
};
use camino::Utf8PathBuf;
use rstest::rstest;

#[rstest]
fn subcommands_parse_positionals_and_flags() {
    let cli = Cli::try_parse_from([
        "woeplanet",
        "ancestor",
        "44418",
        "Country",
        "--cache",
        "geoplanet.db",
    ])
    .expect("valid arguments");

    match cli.command {
        Command::Ancestor(args) => {
            assert_eq!(args.woeid, Some(44_418));
            assert_eq!(args.placetype.as_deref(), Some("Country"));
            assert_eq!(args.cache, Some(Utf8PathBuf::from("geoplanet.db")));
        }
        other => panic!("expected ancestor command, found {other:?}"),
    }
}

#[rstest]
fn init_reset_defaults_to_false() {
    let cli = Cli::try_parse_from(["woeplanet", "init", "--cache", "geoplanet.db"])
        .expect("valid arguments");
    match cli.command {
        Command::Init(args) => assert!(!args.reset),
        other => panic!("expected init command, found {other:?}"),
    }
}

#[rstest]
fn non_numeric_woeids_are_rejected_by_clap() {
    let err = Cli::try_parse_from(["woeplanet", "place", "london"])
        .expect_err("woeid must be numeric");
    assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
}

#[rstest]
#[case::id("12", PlacetypeRef::Id(12))]
#[case::shortname("Country", PlacetypeRef::Shortname("Country".to_owned()))]
#[case::padded(" 7 ", PlacetypeRef::Id(7))]
fn placetypes_accept_ids_and_shortnames(#[case] raw: &str, #[case] expected: PlacetypeRef) {
    assert_eq!(raw.parse::<PlacetypeRef>().expect("valid placetype"), expected);
}

#[rstest]
fn blank_placetypes_are_rejected() {
    let err = "  ".parse::<PlacetypeRef>().expect_err("blank placetype");
    assert!(matches!(
        err,
        CliError::InvalidArgument {
            field: ARG_PLACETYPE,
            ..
        }
    ));
}

fn expect_missing(err: CliError, field: &'static str, env_var: &'static str) {
    match err {
        CliError::MissingArgument {
            field: missing,
            env,
        } => {
            assert_eq!(missing, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
#[case(None, Some(Utf8PathBuf::from("geoplanet.db")), ARG_WOEID, ENV_PLACE_WOEID)]
#[case(Some(44_418), None, ARG_CACHE, ENV_PLACE_CACHE)]
fn place_without_required_fields_errors(
    #[case] woeid: Option<u64>,
    #[case] cache: Option<Utf8PathBuf>,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let args = PlaceArgs { woeid, cache };
    let err = PlaceConfig::try_from(args).expect_err("missing field should error");
    expect_missing(err, field, env_var);
}

#[rstest]
fn ancestor_requires_a_placetype() {
    let args = AncestorArgs {
        woeid: Some(44_418),
        placetype: None,
        cache: Some(Utf8PathBuf::from("geoplanet.db")),
    };
    let err = AncestorConfig::try_from(args).expect_err("placetype is required");
    expect_missing(err, ARG_PLACETYPE, ENV_ANCESTOR_PLACETYPE);
}

#[rstest]
fn complete_arguments_convert() {
    let cache = Utf8PathBuf::from("geoplanet.db");
    assert_eq!(
        InitConfig::try_from(InitArgs {
            cache: Some(cache.clone()),
            reset: true,
        })
        .expect("init config"),
        InitConfig {
            cache: cache.clone(),
            reset: true,
        }
    );
    assert_eq!(
        AncestorConfig::try_from(AncestorArgs {
            woeid: Some(44_418),
            placetype: Some("12".into()),
            cache: Some(cache.clone()),
        })
        .expect("ancestor config"),
        AncestorConfig {
            cache: cache.clone(),
            woeid: 44_418,
            placetype: PlacetypeRef::Id(12),
        }
    );
    let err = MaxwoeidConfig::try_from(MaxwoeidArgs::default()).expect_err("cache is required");
    expect_missing(err, ARG_CACHE, ENV_MAXWOEID_CACHE);
}
