use clap::Parser;

/// Generates synthetic yes/no vote tallies for the regions of a GeoJSON file.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the generation settings (geojsonPath, votesPath,
    /// entries, seed, referencePath). Relative paths in this file are resolved against its directory.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The GeoJSON feature collection to read the region identifiers from.
    /// Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (file path or 'stdout') Where to write the generated votes in JSON format.
    /// Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (default 100000) The number of vote records to generate.
    #[clap(short = 'n', long, value_parser)]
    pub entries: Option<usize>,

    /// (integer, optional) If specified, the generation is reproducible.
    #[clap(long, value_parser)]
    pub seed: Option<u64>,

    /// (file path) A votes file from a previous run. If provided, votegen checks that the generated
    /// votes match the reference before writing them. This is mostly useful with --seed.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
