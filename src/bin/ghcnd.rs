//! GHCN-Daily archive loader.

use anyhow::{anyhow, Result};
use clap::{Arg, ArgMatches, SubCommand};
use ghcnd_data::{run_import, Archive, CommonCmdLineArgs};
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Config, Logger, Root},
    encode::pattern::PatternEncoder,
};

fn main() {
    if let Err(ref e) = run() {
        println!("error: {}", e);

        for cause in e.chain().skip(1) {
            println!("caused by: {}", cause);
        }

        ::std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let app = CommonCmdLineArgs::new_app("ghcnd", "Load NOAA GHCN-Daily observations.")
        .subcommand(
            SubCommand::with_name("create")
                .about("Create a new, empty archive.")
                .arg(
                    Arg::with_name("force")
                        .long("force")
                        .help("Overwrite any existing archive at `db`."),
                ),
        )
        .subcommand(CommonCmdLineArgs::import_subcommand())
        .subcommand(
            SubCommand::with_name("stations")
                .about("List the stations in the archive and how much data each has.")
                .arg(
                    Arg::with_name("prefix")
                        .short("p")
                        .long("prefix")
                        .takes_value(true)
                        .help("Only stations whose id starts with this."),
                )
                .arg(
                    Arg::with_name("with-data")
                        .long("with-data")
                        .help("Only stations with at least one observation."),
                ),
        );

    let (common_args, matches) = CommonCmdLineArgs::matches(app)?;
    init_logging(common_args.verbose())?;

    match matches.subcommand() {
        ("create", Some(sub_args)) => create(&common_args, sub_args)?,
        ("import", Some(sub_args)) => import(&common_args, sub_args)?,
        ("stations", Some(sub_args)) => stations(&common_args, sub_args)?,
        _ => unreachable!(),
    }

    Ok(())
}

fn init_logging(verbose: bool) -> Result<()> {
    log4rs::init_config(logging_config(verbose)?)?;

    Ok(())
}

// Verbose output only raises the library's logger, the http stack stays at info.
fn logging_config(verbose: bool) -> Result<Config> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {l} - {m}{n}",
        )))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .logger(Logger::builder().build("ghcnd_data", level))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info))?;

    Ok(config)
}

fn create(common_args: &CommonCmdLineArgs, sub_args: &ArgMatches) -> Result<()> {
    let already_exists = common_args.db().exists();

    if already_exists && sub_args.is_present("force") {
        ::std::fs::remove_file(common_args.db())?;
    } else if already_exists {
        return Err(anyhow!(
            "Archive already exists, must use --force to overwrite."
        ));
    }

    Archive::create(&common_args.db())?;

    Ok(())
}

fn import(common_args: &CommonCmdLineArgs, sub_args: &ArgMatches) -> Result<()> {
    // Bad options should fail before anything is downloaded.
    let config = CommonCmdLineArgs::import_config(sub_args)?;
    let (stations, data) = CommonCmdLineArgs::sources(sub_args)?;

    let mut arch = Archive::create(&common_args.db())?;
    let summary = run_import(&config, &stations, &data, &mut arch)?;

    println!("Import complete!");
    println!("     stations: {:>12}", summary.stations);
    println!(" station files: {:>11}", summary.stations_processed);
    println!("  observations: {:>11}", summary.records);
    println!("       batches: {:>11}", summary.batches);

    Ok(())
}

fn stations(common_args: &CommonCmdLineArgs, sub_args: &ArgMatches) -> Result<()> {
    let arch = Archive::connect(&common_args.db())?;

    let prefix = sub_args.value_of("prefix").map(str::to_uppercase);
    let with_data = sub_args.is_present("with-data");

    println!(
        "{:<11} {:<30} {:>8} {:>9} {:>25} {:>8}",
        "ID", "NAME", "LAT", "LON", "DATES", "NUM OBS"
    );

    for summary in arch
        .station_summaries()?
        .into_iter()
        .filter(|summary| match prefix {
            Some(ref prefix) => summary.station.id.as_str().starts_with(prefix.as_str()),
            None => true,
        })
        .filter(|summary| !with_data || summary.number_of_observations > 0)
    {
        let stn = &summary.station;
        println!(
            "{:<11} {:<30} {:>8.4} {:>9.4} {:>25} {:>8}",
            stn.id,
            stn.name,
            stn.coords.lat,
            stn.coords.lon,
            summary.date_range_as_string(),
            summary.number_of_observations
        );
    }

    Ok(())
}

/*--------------------------------------------------------------------------------------------------
                                          Unit Tests
--------------------------------------------------------------------------------------------------*/
