use clap::{Arg, Command, value_parser};

pub const SIMULATE_CMD: &str = "simulate";

pub fn create_simulate_cli() -> Command {
    Command::new(SIMULATE_CMD)
        .about("Simulate reads from a known tail length for every gene in a 3' UTR BED file. Outputs JSON.")
        .arg(
            Arg::new("utr-bed")
                .long("utr-bed")
                .required(true)
                .help("BED6 of 3' UTR isoforms, as written by `polyalen utr`"),
        )
        .arg(
            Arg::new("profile")
                .long("profile")
                .required(true)
                .help("Two-column size/intensity file (.gz accepted)"),
        )
        .arg(
            Arg::new("bin-size")
                .long("bin-size")
                .required(false)
                .value_parser(value_parser!(i64))
                .help("Bin width in nucleotides (default: 5)"),
        )
        .arg(
            Arg::new("reads-per-gene")
                .long("reads-per-gene")
                .required(false)
                .value_parser(value_parser!(usize))
                .help("Reads to draw per gene (default: 100)"),
        )
        .arg(
            Arg::new("tail-length")
                .long("tail-length")
                .required(false)
                .value_parser(value_parser!(i64))
                .help("True tail length (default: 42)"),
        )
        .arg(
            Arg::new("offset-min")
                .long("offset-min")
                .required(false)
                .value_parser(value_parser!(i64))
                .help("Smallest priming offset into the tail (default: 1)"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .required(false)
                .value_parser(value_parser!(u64))
                .help("Random seed (default: 42)"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .required(false)
                .help("Output JSON file (default: stdout)"),
        )
}
