use clap::{Arg, ArgMatches, Command};
use env_logger::{Builder, Env};
use serde::Deserialize;
use std::io::Write;

/// These options define the inputs from the user.
/// Every field is owned plain data so the options can be passed around freely.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct CommandLineOptions {
    pub structure: Option<String>,
    pub train: Option<String>,
    pub test: Option<String>,
    pub model: Option<String>,
    pub cpt_output: Option<String>,
    pub model_output: Option<String>,
    pub prediction_output: Option<String>,
    pub target: Option<String>,
    pub parallel: bool,
    pub dot_output: Option<String>,
    pub highlight: Option<String>,
    pub sample_rows: Option<usize>,
    pub seed: u64,
    pub sample_output: Option<String>,
}

/// Installs the process-wide logger. Honors `RUST_LOG`, defaulting to `info`.
pub fn initialize_logging() {
    let _ = Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let file = record.file().unwrap_or("unknown");
            let line = record.line().unwrap_or(0);
            writeln!(
                buf,
                "{} [{}:{}] {}",
                record.level(),
                file,
                line,
                record.args()
            )
        })
        .try_init();
}

fn command(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .version("1.0")
        .about(about)
        .arg(
            Arg::new("structure")
                .long("structure")
                .value_name("FILE")
                .help("Network structure file, one '<node>: <parents...>' line per node"),
        )
        .arg(
            Arg::new("train")
                .long("train")
                .value_name("FILE")
                .help("CSV training table used to learn the CPTs"),
        )
        .arg(
            Arg::new("test")
                .long("test")
                .value_name("FILE")
                .help("CSV table with a '?' column to fill in"),
        )
        .arg(
            Arg::new("model")
                .long("model")
                .value_name("FILE")
                .help("Load a learned network snapshot instead of learning"),
        )
        .arg(
            Arg::new("cpt_output")
                .long("cpt_output")
                .value_name("FILE")
                .help("Where to write the CPT dump")
                .default_value("output.txt"),
        )
        .arg(
            Arg::new("model_output")
                .long("model_output")
                .value_name("FILE")
                .help("Where to write the JSON network snapshot (optional)"),
        )
        .arg(
            Arg::new("prediction_output")
                .long("prediction_output")
                .value_name("FILE")
                .help("Where to write the completed test table")
                .default_value("completedTest.csv"),
        )
        .arg(
            Arg::new("target")
                .long("target")
                .value_name("NODE")
                .help("Node predicted in the '?' column (defaults to the node named by the column)"),
        )
        .arg(
            Arg::new("parallel")
                .long("parallel")
                .help("Predict rows in parallel")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dot_output")
                .long("dot_output")
                .value_name("FILE")
                .help("Where to write the Graphviz topology diagram")
                .default_value("network.dot"),
        )
        .arg(
            Arg::new("highlight")
                .long("highlight")
                .value_name("NODE")
                .help("Node to highlight in the diagram"),
        )
        .arg(
            Arg::new("sample_rows")
                .long("sample_rows")
                .value_name("NUMBER")
                .value_parser(clap::value_parser!(usize))
                .help("Draw this many synthetic rows from the learned network"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("NUMBER")
                .value_parser(clap::value_parser!(u64))
                .help("Seed for synthetic sampling")
                .default_value("42"),
        )
        .arg(
            Arg::new("sample_output")
                .long("sample_output")
                .value_name("FILE")
                .help("Where to write synthetic rows")
                .default_value("samples.csv"),
        )
}

fn options_from_matches(matches: &ArgMatches) -> CommandLineOptions {
    let string = |name: &str| matches.get_one::<String>(name).cloned();
    CommandLineOptions {
        structure: string("structure"),
        train: string("train"),
        test: string("test"),
        model: string("model"),
        cpt_output: string("cpt_output"),
        model_output: string("model_output"),
        prediction_output: string("prediction_output"),
        target: string("target"),
        parallel: matches.get_flag("parallel"),
        dot_output: string("dot_output"),
        highlight: string("highlight"),
        sample_rows: matches.get_one::<usize>("sample_rows").copied(),
        // safe because we have a default value
        seed: matches.get_one::<u64>("seed").copied().unwrap_or(42),
        sample_output: string("sample_output"),
    }
}

/// Initializes logging and parses the process arguments for the driver `name`.
pub fn parse_configuration_options(name: &'static str, about: &'static str) -> CommandLineOptions {
    initialize_logging();
    let matches = command(name, about).get_matches();
    options_from_matches(&matches)
}

/// Parses an explicit argument list without touching the logger.
pub fn parse_options_from<I, T>(name: &'static str, args: I) -> Result<CommandLineOptions, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = command(name, "probnet").try_get_matches_from(args)?;
    Ok(options_from_matches(&matches))
}
