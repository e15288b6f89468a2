use clap::{Arg, ArgAction, Command, value_parser};

pub const ESTIMATE_CMD: &str = "estimate";

pub fn create_estimate_cli() -> Command {
    Command::new(ESTIMATE_CMD)
        .about("Estimate the posterior over tail length for a set of reads. Outputs JSON.")
        .arg(
            Arg::new("profile")
                .long("profile")
                .required(true)
                .help("Two-column size/intensity file (.gz accepted)"),
        )
        .arg(
            Arg::new("intervals")
                .long("intervals")
                .required(true)
                .help("Priming intervals, one `start end strand is_tail` per line"),
        )
        .arg(
            Arg::new("reads")
                .long("reads")
                .required(true)
                .help("Read coordinates, one per line ('-' for stdin)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .required(false)
                .help("TOML file with estimation parameters; flags override its values"),
        )
        .arg(
            Arg::new("bin-size")
                .long("bin-size")
                .required(false)
                .value_parser(value_parser!(i64))
                .help("Bin width in nucleotides"),
        )
        .arg(
            Arg::new("lengths")
                .long("lengths")
                .required(false)
                .help("Candidate tail lengths as start:end:step (end exclusive)"),
        )
        .arg(
            Arg::new("weighted")
                .long("weighted")
                .action(ArgAction::SetTrue)
                .help("Weight each length by the likelihood of the read coming from the tail"),
        )
        .arg(
            Arg::new("aggregate")
                .long("aggregate")
                .required(false)
                .help("How per-read posteriors are combined: last, product or mean"),
        )
        .arg(
            Arg::new("tail-index")
                .long("tail-index")
                .required(false)
                .value_parser(value_parser!(usize))
                .help("Index of the tail interval (default: first interval flagged is_tail)"),
        )
        .arg(
            Arg::new("lenient")
                .long("lenient")
                .action(ArgAction::SetTrue)
                .help("Skip reads no candidate length can explain instead of failing"),
        )
        .arg(
            Arg::new("per-read")
                .long("per-read")
                .action(ArgAction::SetTrue)
                .help("Include every read's posterior in the output"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .required(false)
                .help("Output JSON file (default: stdout)"),
        )
}
