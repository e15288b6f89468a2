use clap::{Arg, Command};

use polyalen_core::consts::{DEFAULT_NAME_ATTRIBUTE, DEFAULT_UTR_FEATURE};

pub const UTR_CMD: &str = "utr";

pub fn create_utr_cli() -> Command {
    Command::new(UTR_CMD)
        .about("Extract unique 3' UTR isoforms per gene from a GTF annotation. Outputs BED6.")
        .arg(
            Arg::new("gtf")
                .long("gtf")
                .required(true)
                .help("Path to GTF/GTF.gz annotation ('-' for stdin)"),
        )
        .arg(
            Arg::new("feature")
                .long("feature")
                .required(false)
                .default_value(DEFAULT_UTR_FEATURE)
                .help("Feature type to extract"),
        )
        .arg(
            Arg::new("name-attribute")
                .long("name-attribute")
                .required(false)
                .default_value(DEFAULT_NAME_ATTRIBUTE)
                .help("Attribute used to name records, e.g. gene_name"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .required(false)
                .help("Output BED file (default: stdout)"),
        )
}
