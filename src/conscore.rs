extern crate clap;
use clap::*;

mod cmd_conscore;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let app = Command::new("conscore")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`conscore` - Per-site conservation scores of alignments")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .subcommand(cmd_conscore::list::make_subcommand())
        .subcommand(cmd_conscore::score::make_subcommand())
        .after_help(
            r###"Subcommands:

* list  - Available scorers and their parameters
* score - Score each column of the first sequence in alignments

Set RUST_LOG=debug to see per-alignment timings.

"###,
        );

    // Check which subcommand the user ran...
    match app.get_matches().subcommand() {
        Some(("list", sub_matches)) => cmd_conscore::list::execute(sub_matches),
        Some(("score", sub_matches)) => cmd_conscore::score::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
