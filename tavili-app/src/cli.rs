use clap::{crate_description, crate_name, crate_version, Parser};

#[derive(Parser)]
#[clap(name = crate_name!(), about = crate_description!(), version = crate_version!())]
pub struct Opts {
    /// JSON configuration file, applied on top of the profile defaults.
    #[clap(short = 'c', long)]
    pub config: Option<String>,
    /// Preset: courier (origins nearby) or recipient (destinations nearby).
    #[clap(short = 'p', long, default_value = "courier")]
    pub profile: String,
    /// Backend base URL.
    #[clap(short = 'b', long = "base-url")]
    pub base_url: Option<String>,
    /// Position as `lat:lng`; the built-in default is used otherwise.
    #[clap(short = 'l', long)]
    pub position: Option<String>,
    /// Query radius in degrees.
    #[clap(short = 'r', long)]
    pub radius: Option<f64>,
    /// Filter deliveries by their `from` or `to` end.
    #[clap(long = "poi")]
    pub point_of_interest: Option<String>,
    /// Click a marker after rendering, e.g. `12:from`. Repeatable.
    #[clap(long = "click")]
    pub clicks: Vec<String>,
    /// Print the scene as JSON instead of a summary.
    #[clap(short = 'J', long)]
    pub json: bool,
}
