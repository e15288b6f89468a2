use clap::{Arg, Command, value_parser};

pub const DISCRETIZE_CMD: &str = "discretize";

pub fn create_discretize_cli() -> Command {
    Command::new(DISCRETIZE_CMD)
        .about("Bin a Bioanalyzer profile into a fragment-size distribution. Outputs size<TAB>probability.")
        .arg(
            Arg::new("profile")
                .long("profile")
                .required(true)
                .help("Two-column size/intensity file (.gz accepted, '-' for stdin)"),
        )
        .arg(
            Arg::new("bin-size")
                .long("bin-size")
                .required(false)
                .value_parser(value_parser!(i64))
                .help("Bin width in nucleotides (default: 5)"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .required(false)
                .help("Output file (default: stdout)"),
        )
}
