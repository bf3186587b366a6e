use clap::*;
use conscore::libs::scorer::{get_scorer_class, list_scorers};
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("list")
        .about("List available scorers")
        .after_help(
            r###"
Prints the dotted name of every scorer, one per line.

With --params, prints every parameter of every scorer as:
    scorer<TAB>parameter<TAB>default<TAB>help

Examples:
1. Scorer names:
   conscore list

2. Parameters of all scorers:
   conscore list --params

"###,
        )
        .arg(
            Arg::new("params")
                .long("params")
                .action(ArgAction::SetTrue)
                .help("Also list the parameters of each scorer"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let mut writer = conscore::writer(args.get_one::<String>("outfile").unwrap())?;
    let with_params = args.get_flag("params");

    for name in list_scorers() {
        if !with_params {
            writer.write_all(format!("{}\n", name).as_ref())?;
            continue;
        }

        let class = get_scorer_class(&name)?;
        for def in (class.params)().iter() {
            writer.write_all(
                format!("{}\t{}\t{}\t{}\n", name, def.name, def.default, def.help).as_ref(),
            )?;
        }
    }

    Ok(())
}
