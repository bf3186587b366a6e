use clap::*;
use conscore::libs::alignment::Alignment;
use conscore::libs::params::{parse_override, Overrides, ParamValue};
use conscore::libs::scorer::get_scorer;
use itertools::Itertools;
use log::info;
use rayon::prelude::*;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("score")
        .about("Score each site of the first sequence in alignments")
        .after_help(
            r###"
Scores every column of the reference (first) sequence of each aligned FASTA file.

Scorers are selected by dotted name, see `conscore list`. Parameters are set with
repeated -P name=value; unknown names and invalid values are rejected before any
scoring starts.

Every scorer accepts:
* window_size   - residues on either side blended into each score, 0 disables
* window_lambda - weight of the neighbour average, in [0, 1]
* normalize     - report z-scores over the alignment

Output columns: file, column (1-based), residue, score
Columns a scorer declines to score (e.g. too many gaps) are reported as NA.

Input files can be gzipped. If the input file is 'stdin', data is read from standard input.

Examples:
1. Default scorer (caprasingh07.js_divergence):
   conscore score tests/aln/small.fas

2. Shannon entropy without windowing, as z-scores:
   conscore score tests/aln/small.fas -s caprasingh07.shannon_entropy -P window_size=0 -P normalize=true

3. Many alignments with 4 threads:
   conscore score aln/*.fas --parallel 4 -o scores.tsv

"###,
        )
        .arg(
            Arg::new("infiles")
                .required(true)
                .num_args(1..)
                .index(1)
                .help("Aligned FASTA file(s) to score"),
        )
        .arg(
            Arg::new("scorer")
                .long("scorer")
                .short('s')
                .num_args(1)
                .default_value("caprasingh07.js_divergence")
                .help("Dotted name of the scorer"),
        )
        .arg(
            Arg::new("param")
                .long("param")
                .short('P')
                .action(ArgAction::Append)
                .value_parser(parse_override)
                .help("Scorer parameter as name=value, maybe repeated"),
        )
        .arg(
            Arg::new("parallel")
                .long("parallel")
                .short('p')
                .num_args(1)
                .default_value("1")
                .value_parser(value_parser!(usize))
                .help("Number of threads for parallel processing"),
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
    //----------------------------
    // Args
    //----------------------------
    let name = args.get_one::<String>("scorer").unwrap();
    let overrides: Overrides = args
        .get_many::<(String, ParamValue)>("param")
        .map(|pairs| pairs.cloned().collect())
        .unwrap_or_default();
    let infiles: Vec<&String> = args.get_many::<String>("infiles").unwrap().collect();

    let opt_parallel = *args.get_one::<usize>("parallel").unwrap();
    rayon::ThreadPoolBuilder::new()
        .num_threads(opt_parallel)
        .build_global()?;

    // fail on a bad name or parameter before reading any input
    let scorer = get_scorer(name, &overrides)?;

    //----------------------------
    // Operating
    //----------------------------
    let results: Vec<anyhow::Result<(Alignment, Vec<f64>)>> = infiles
        .par_iter()
        .map(|infile| {
            info!("Scoring {} with {}", infile, scorer.name());
            let alignment = Alignment::from_fasta(infile)?;
            let scores = scorer.score(&alignment);
            Ok((alignment, scores))
        })
        .collect();

    //----------------------------
    // Output
    //----------------------------
    let mut writer = conscore::writer(args.get_one::<String>("outfile").unwrap())?;
    writer.write_all(format!("{}\n", ["file", "column", "residue", "score"].join("\t")).as_ref())?;

    for (infile, result) in infiles.iter().zip(results) {
        let (alignment, scores) = result?;
        for (i, (&residue, score)) in alignment.reference().iter().zip(scores).enumerate() {
            let fields = [
                infile.to_string(),
                (i + 1).to_string(),
                (residue as char).to_string(),
                format_score(score),
            ];
            writer.write_all(format!("{}\n", fields.iter().join("\t")).as_ref())?;
        }
    }

    Ok(())
}

fn format_score(score: f64) -> String {
    if score.is_nan() {
        "NA".to_string()
    } else {
        format!("{:.6}", score)
    }
}
