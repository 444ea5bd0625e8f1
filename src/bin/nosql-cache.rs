extern crate clap;
#[macro_use]
extern crate slog;
extern crate slog_term;

use clap::{crate_version, App, AppSettings, Arg, ArgMatches, SubCommand};
use failure;
use nosql::{Cache, EngineType, Instrumentation, KeyValueStore, RedisStore, SledStore, Value};
use slog::Drain;
use std::env;
use std::path::PathBuf;

fn main() -> nosql::Result<()> {
    if let Err(e) = run_cache() {
        // Print the Display message for any error.
        // Simply returning the error will print the Debug version, which is not as nice.
        eprintln!("{}", e);
        std::process::exit(1)
    }
    Ok(())
}

fn run_cache() -> nosql::Result<()> {
    let version = env!("CARGO_PKG_VERSION");

    let decorator = slog_term::PlainSyncDecorator::new(std::io::stderr());
    let drain = slog_term::FullFormat::new(decorator).build().fuse();

    let log = slog::Logger::root(drain, o!("version" => version));

    let type_arg = Arg::with_name("type")
        .help("How to interpret VALUE")
        .long("type")
        .takes_value(true)
        .possible_values(&["str", "int", "float", "bytes"])
        .value_name("TYPE")
        .default_value("str");

    let matches = App::new(&[env!("CARGO_PKG_NAME"), "-cache"].concat())
        .version(crate_version!())
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(version)
        .settings(&[
            AppSettings::VersionlessSubcommands,
            AppSettings::SubcommandRequiredElseHelp,
        ])
        .arg(
            Arg::with_name("engine")
                .help("Key-value engine to use")
                .long("engine")
                .takes_value(true)
                .possible_values(&["redis", "sled"])
                .value_name("ENGINE")
                .env("NOSQL_ENGINE")
                .default_value("redis"),
        )
        .arg(
            Arg::with_name("url")
                .help("Redis server URL")
                .long("url")
                .takes_value(true)
                .value_name("URL")
                .env("NOSQL_REDIS_URL")
                .default_value("redis://127.0.0.1/"),
        )
        .arg(
            Arg::with_name("dir")
                .help("Directory for the sled engine's data, defaults to the current directory")
                .long("dir")
                .takes_value(true)
                .value_name("DIR"),
        )
        .arg(
            Arg::with_name("no-count")
                .help("Do not count calls to store")
                .long("no-count"),
        )
        .arg(
            Arg::with_name("no-history")
                .help("Do not record the history of calls to store")
                .long("no-history"),
        )
        .subcommand(
            SubCommand::with_name("store")
                .about("Flush the store, then store each value under a new random key")
                .arg(
                    Arg::with_name("value")
                        .takes_value(true)
                        .value_name("VALUE")
                        .multiple(true)
                        .required(true),
                )
                .arg(&type_arg)
                .arg(
                    Arg::with_name("replay")
                        .help("Print the recorded calls afterwards")
                        .long("replay"),
                ),
        )
        .subcommand(
            SubCommand::with_name("roundtrip")
                .about("Flush the store, store a value and read it back")
                .arg(
                    Arg::with_name("value")
                        .takes_value(true)
                        .value_name("VALUE")
                        .required(true),
                )
                .arg(&type_arg)
                .arg(
                    Arg::with_name("as")
                        .help("How to read the value back")
                        .long("as")
                        .takes_value(true)
                        .possible_values(&["str", "int", "float", "bytes"])
                        .value_name("TYPE")
                        .default_value("bytes"),
                ),
        )
        .get_matches();

    let engine: EngineType = matches.value_of("engine").unwrap_or("redis").parse()?;
    let instrumentation = Instrumentation {
        count_calls: !matches.is_present("no-count"),
        call_history: !matches.is_present("no-history"),
    };

    info!(log, "Opening cache"; "engine" => engine);

    match engine {
        EngineType::Redis => {
            let url = matches.value_of("url").unwrap_or("redis://127.0.0.1/");
            let kv = RedisStore::connect(url)?;
            run_command(&matches, Cache::with_instrumentation(log, kv, instrumentation)?)
        }
        EngineType::Sled => {
            let dir = match matches.value_of("dir") {
                Some(dir) => PathBuf::from(dir),
                None => env::current_dir()?,
            };
            let kv = SledStore::open(dir)?;
            run_command(&matches, Cache::with_instrumentation(log, kv, instrumentation)?)
        }
    }
}

fn run_command<K: KeyValueStore>(matches: &ArgMatches<'_>, cache: Cache<K>) -> nosql::Result<()> {
    match matches.subcommand() {
        ("store", Some(command_matches)) => {
            let kind = command_matches.value_of("type").unwrap_or("str");
            let values = command_matches
                .values_of("value")
                .ok_or(NosqlCacheCliError::UnexpectedArgs)?;
            for value in values {
                println!("{}", cache.store(parse_value(kind, value)?)?);
            }
            if command_matches.is_present("replay") {
                println!("{}", cache.history()?);
            }
            Ok(())
        }
        ("roundtrip", Some(command_matches)) => {
            let kind = command_matches.value_of("type").unwrap_or("str");
            let value = command_matches
                .value_of("value")
                .ok_or(NosqlCacheCliError::UnexpectedArgs)?;
            let key = cache.store(parse_value(kind, value)?)?;

            let read = match command_matches.value_of("as").unwrap_or("bytes") {
                "str" => cache.get_str(&key)?,
                "int" => cache.get_int(&key)?.map(|int| int.to_string()),
                "float" => cache.get_float(&key)?.map(|float| float.to_string()),
                _ => cache.get(&key)?.map(|bytes| format!("{:?}", bytes)),
            };
            match read {
                Some(read) => println!("{}", read),
                None => println!("Key not found"),
            }
            Ok(())
        }
        (cmd, _) => Err(NosqlCacheCliError::UnknownCommand {
            command: cmd.to_string(),
        }
        .into()),
    }
}

fn parse_value(kind: &str, value: &str) -> nosql::Result<Value> {
    Ok(match kind {
        "int" => Value::Int(value.parse()?),
        "float" => Value::Float(value.parse()?),
        "bytes" => Value::Bytes(value.as_bytes().to_vec()),
        _ => Value::Text(value.to_owned()),
    })
}

#[derive(Debug, failure::Fail)]
enum NosqlCacheCliError {
    #[fail(display = "Unknown command: {}", command)]
    UnknownCommand { command: String },

    #[fail(display = "Unexpected CLI arguments")]
    UnexpectedArgs,
}
