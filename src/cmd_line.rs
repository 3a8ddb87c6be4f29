//! Command line options that are used across applications.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

use crate::{config::ImportConfig, errors::GhcndDataErr, fetch::Source};

const DATABASE_ENV_VAR: &str = "GHCND_DATABASE";

/// Struct to package up command line arguments.
#[derive(Clone, Debug)]
pub struct CommonCmdLineArgs {
    // Path to the database file
    db: PathBuf,
    // Log debug messages too.
    verbose: bool,
}

impl<'a, 'b> CommonCmdLineArgs {
    /// Create a new set of args.
    pub fn new_app(app_name: &'static str, about: &'static str) -> App<'a, 'b> {
        App::new(app_name)
            .author("Ryan Leach <clumsycodemonkey@gmail.com>")
            .about(about)
            .version(clap::crate_version!())
            .setting(AppSettings::SubcommandRequiredElseHelp)
            .arg(
                Arg::with_name("db")
                    .short("d")
                    .long("db")
                    .takes_value(true)
                    .global(true)
                    .env(DATABASE_ENV_VAR)
                    .help("Path to the database file.")
                    .long_help(concat!(
                        "Path to the sqlite database file. May also be given with the ",
                        "GHCND_DATABASE environment variable."
                    )),
            )
            .arg(
                Arg::with_name("verbose")
                    .short("v")
                    .long("verbose")
                    .global(true)
                    .help("Log each batch as it is written."),
            )
    }

    /// The `import` sub-command and its options.
    pub fn import_subcommand() -> App<'a, 'b> {
        SubCommand::with_name("import")
            .about("Download station metadata and observations and load them into the archive.")
            .arg(
                Arg::with_name("min-year")
                    .long("min-year")
                    .takes_value(true)
                    .help("Ignore observations from before this year.")
                    .long_help(concat!(
                        "Ignore observations from before this year. Defaults to 25 years ",
                        "before the current year."
                    )),
            )
            .arg(
                Arg::with_name("batch-size")
                    .long("batch-size")
                    .takes_value(true)
                    .help("Number of observations written per database transaction."),
            )
            .arg(
                Arg::with_name("prefix")
                    .multiple(true)
                    .short("p")
                    .long("prefix")
                    .takes_value(true)
                    .number_of_values(1)
                    .help("Only import stations whose id starts with this (default US).")
                    .conflicts_with("all-stations"),
            )
            .arg(
                Arg::with_name("all-stations")
                    .long("all-stations")
                    .help("Import every station in the archive, no prefix filter."),
            )
            .arg(
                Arg::with_name("stations")
                    .long("stations")
                    .takes_value(true)
                    .help("URL or path of the ghcnd-stations.txt file."),
            )
            .arg(
                Arg::with_name("data")
                    .long("data")
                    .takes_value(true)
                    .help("URL or path of the ghcnd_all.tar.gz archive."),
            )
    }

    /// Process an `App` to get the parsed values out of it and the matches object so an application
    /// can continue with further argument parsing.
    pub fn matches(app: App<'a, 'b>) -> Result<(Self, ArgMatches<'a>), GhcndDataErr> {
        let matches = app.get_matches();

        let cmd_line_opts = {
            // Global args given after the sub-command only show up in the sub-command matches.
            let sub_matches = matches.subcommand().1;

            let db = matches
                .value_of("db")
                .or_else(|| sub_matches.and_then(|sub| sub.value_of("db")))
                .map(PathBuf::from)
                .ok_or_else(|| {
                    GhcndDataErr::InvalidConfig(format!(
                        "no database given, use --db or set {}",
                        DATABASE_ENV_VAR
                    ))
                })?;

            let verbose = matches.is_present("verbose")
                || sub_matches.map(|sub| sub.is_present("verbose")).unwrap_or(false);

            CommonCmdLineArgs { db, verbose }
        };

        Ok((cmd_line_opts, matches))
    }

    /// Build the import options from the matches of the `import` sub-command.
    pub fn import_config(sub_args: &ArgMatches) -> Result<ImportConfig, GhcndDataErr> {
        let mut config = ImportConfig::default();

        if let Some(val) = sub_args.value_of("min-year") {
            config.min_year = val.parse::<i32>().map_err(|_| {
                GhcndDataErr::InvalidConfig(format!("min-year is not a year: {}", val))
            })?;
        }

        if let Some(val) = sub_args.value_of("batch-size") {
            config.batch_size = val.parse::<usize>().map_err(|_| {
                GhcndDataErr::InvalidConfig(format!("batch-size is not a number: {}", val))
            })?;
        }

        if sub_args.is_present("all-stations") {
            config.id_prefixes.clear();
        } else if let Some(prefixes) = sub_args.values_of("prefix") {
            config.id_prefixes = prefixes.map(|p| p.to_uppercase()).collect();
        }

        config.validate()?;

        Ok(config)
    }

    /// Get the station metadata and observation sources from the matches of the `import`
    /// sub-command.
    pub fn sources(sub_args: &ArgMatches) -> Result<(Source, Source), GhcndDataErr> {
        let stations = match sub_args.value_of("stations") {
            Some(val) => Source::from_str(val)?,
            None => Source::default_stations(),
        };

        let data = match sub_args.value_of("data") {
            Some(val) => Source::from_str(val)?,
            None => Source::default_data(),
        };

        Ok((stations, data))
    }

    /// Get the path to the database file.
    pub fn db(&self) -> &Path {
        &self.db
    }

    /// Should debug messages be logged?
    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

/*--------------------------------------------------------------------------------------------------
                                          Unit Tests
--------------------------------------------------------------------------------------------------*/
