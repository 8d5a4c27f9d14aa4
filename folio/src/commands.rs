use clap::{arg, command};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("folio")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("folio")
        .about("A conversational webhook for browsing an online bookstore")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-c --"config" <PATH>)
                .required(false)
                .global(true)
                .help("Path to a TOML config file (default: ./folio.toml if present)")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            arg!(--"base-url" <URL>)
                .required(false)
                .global(true)
                .help("Storefront base URL (default: https://books.toscrape.com/)"),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .global(true)
                .help("Request timeout in seconds for storefront fetches")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            command!("serve")
                .about("Run the webhook server for the conversational front-end")
                .arg(
                    arg!(-l --"listen" <ADDR>)
                        .required(false)
                        .help("Address to listen on (default: 127.0.0.1:8080)"),
                ),
        )
        .subcommand(
            command!("search")
                .about("Search the storefront once and print the fulfillment text")
                .arg(
                    arg!(-g --"genre" <GENRE>)
                        .required(false)
                        .help("Genre to browse, e.g. \"historical fiction\""),
                )
                .arg(
                    arg!(-p --"max-price" <PRICE>)
                        .required(false)
                        .help("Only show books at or under this price")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    arg!(--"json")
                        .required(false)
                        .help("Print the matching items as JSON instead of text")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(command!("genres").about("List the genres the storefront offers"))
}
