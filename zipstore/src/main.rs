//TODO: update clap to remove the need for this
#![allow(dangerous_implicit_autorefs)]

use chrono::Utc;
use clap::{
    crate_authors, crate_description, crate_name, crate_version, App, AppSettings, Arg, SubCommand,
};
use humansize::{format_size, BINARY};
use zipstore::naming::archive_file_name;
use zipstore::{create, extract, list, verify};

fn default_archive() -> String {
    archive_file_name(crate_name!(), Utc::now().timestamp_millis())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let default_archive = default_archive();
    let help_create_archive = format!("Archive file (defaults to '{}')", &default_archive);

    let arg_archive = Arg::with_name("archive")
        .help("Archive file")
        .short("a")
        .long("archive")
        .required(true)
        .takes_value(true)
        .value_name("FILE");

    let matches = App::new(crate_name!())
        .author(crate_authors!(", "))
        .about(crate_description!())
        .version(crate_version!())
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("create")
                .about("Create archive")
                .arg(
                    arg_archive
                        .clone()
                        .help(&help_create_archive)
                        .required(false)
                        .default_value(&default_archive),
                )
                .arg(
                    Arg::with_name("extension")
                        .help("Replace the extension of every stored name")
                        .short("e")
                        .long("extension")
                        .takes_value(true)
                        .value_name("EXT"),
                )
                .arg(
                    Arg::with_name("inputs")
                        .help("Files and directories to store")
                        .required(true)
                        .multiple(true)
                        .value_name("INPUT"),
                ),
        )
        .subcommand(
            SubCommand::with_name("extract")
                .about("Extract archive")
                .arg(&arg_archive)
                .arg(
                    Arg::with_name("basedir")
                        .help("Directory to unpack to (defaults to '.')")
                        .required(true)
                        .value_name("DIR")
                        .default_value("."),
                ),
        )
        .subcommand(
            SubCommand::with_name("list")
                .about("List archive")
                .arg(&arg_archive),
        )
        .subcommand(
            SubCommand::with_name("verify")
                .about("Verify archive")
                .arg(&arg_archive),
        )
        .get_matches();

    if let Some(matches) = matches.subcommand_matches("create") {
        let inputs: Vec<&str> = matches
            .values_of("inputs")
            .map(|values| values.collect())
            .unwrap_or_default();
        let archive = matches
            .value_of("archive")
            .unwrap_or(default_archive.as_str());
        create(archive, inputs, matches.value_of("extension"))?;
        println!("{}", archive);
    } else if let Some(matches) = matches.subcommand_matches("extract") {
        extract(
            matches.value_of("archive").unwrap(),
            matches.value_of("basedir").unwrap(),
        )?;
    } else if let Some(matches) = matches.subcommand_matches("list") {
        for entry in list(matches.value_of("archive").unwrap())? {
            println!(
                "{:>10}  {}  {}",
                format_size(entry.size(), BINARY),
                entry.datetime(),
                String::from_utf8_lossy(entry.name_bytes())
            );
        }
    } else if let Some(matches) = matches.subcommand_matches("verify") {
        let count = verify(matches.value_of("archive").unwrap())?;
        println!("{} entries OK", count);
    }

    Ok(())
}
