extern crate clap;
#[macro_use]
extern crate slog;
extern crate slog_term;

use clap::{crate_version, App, AppSettings, Arg, SubCommand};
use failure;
use nosql::{insert_document, list_all, DocumentStore};
use slog::Drain;
use std::env;
use std::path::PathBuf;

fn main() -> nosql::Result<()> {
    if let Err(e) = run_docs() {
        // Print the Display message for any error.
        // Simply returning the error will print the Debug version, which is not as nice.
        eprintln!("{}", e);
        std::process::exit(1)
    }
    Ok(())
}

fn run_docs() -> nosql::Result<()> {
    let version = env!("CARGO_PKG_VERSION");

    let decorator = slog_term::PlainSyncDecorator::new(std::io::stderr());
    let drain = slog_term::FullFormat::new(decorator).build().fuse();

    let log = slog::Logger::root(drain, o!("version" => version));

    let matches = App::new(&[env!("CARGO_PKG_NAME"), "-docs"].concat())
        .version(crate_version!())
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(version)
        .settings(&[
            AppSettings::VersionlessSubcommands,
            AppSettings::SubcommandRequiredElseHelp,
        ])
        .arg(
            Arg::with_name("dir")
                .help("Directory holding the document store, defaults to the current directory")
                .long("dir")
                .takes_value(true)
                .value_name("DIR")
                .env("NOSQL_DOCS_DIR"),
        )
        .arg(
            Arg::with_name("collection")
                .help("Name of the collection")
                .long("collection")
                .takes_value(true)
                .value_name("NAME")
                .default_value("school"),
        )
        .subcommand(SubCommand::with_name("list").about("Print every document, one per line"))
        .subcommand(
            SubCommand::with_name("insert")
                .about("Insert a document made of the given fields and print its id")
                .arg(
                    Arg::with_name("field")
                        .help("A field as NAME=VALUE, where VALUE is JSON or plain text")
                        .takes_value(true)
                        .value_name("FIELD")
                        .multiple(true),
                ),
        )
        .get_matches();

    let dir = match matches.value_of("dir") {
        Some(dir) => PathBuf::from(dir),
        None => env::current_dir()?,
    };
    let name = matches.value_of("collection").unwrap_or("school");

    info!(log, "Opening collection"; "dir" => %dir.display(), "collection" => name);
    let collection = DocumentStore::open(log, dir)?.collection(name)?;

    match matches.subcommand() {
        ("list", Some(_)) => {
            for document in list_all(&collection)? {
                println!("{}", serde_json::to_string(&document)?);
            }
            Ok(())
        }
        ("insert", Some(command_matches)) => {
            let fields = match command_matches.values_of("field") {
                Some(fields) => fields.map(parse_field).collect::<nosql::Result<Vec<_>>>()?,
                None => Vec::new(),
            };
            println!("{}", insert_document(&collection, fields)?);
            Ok(())
        }
        (cmd, _) => Err(NosqlDocsCliError::UnknownCommand {
            command: cmd.to_string(),
        }
        .into()),
    }
}

fn parse_field(field: &str) -> nosql::Result<(String, serde_json::Value)> {
    let mut parts = field.splitn(2, '=');
    match (parts.next(), parts.next()) {
        (Some(name), Some(value)) if !name.is_empty() => {
            let value = serde_json::from_str(value)
                .unwrap_or_else(|_| serde_json::Value::String(value.to_owned()));
            Ok((name.to_owned(), value))
        }
        _ => Err(NosqlDocsCliError::MalformedField {
            field: field.to_owned(),
        }
        .into()),
    }
}

#[derive(Debug, failure::Fail)]
enum NosqlDocsCliError {
    #[fail(display = "Unknown command: {}", command)]
    UnknownCommand { command: String },

    #[fail(display = "Expected NAME=VALUE, got: {}", field)]
    MalformedField { field: String },
}
