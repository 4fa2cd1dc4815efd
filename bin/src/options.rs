//! Command line options

use clap::Parser;
use shading::pbrt::Float;

/// Builds one material from parameters and estimates its directional albedo.
#[derive(Parser, Clone, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Options {
    /// Material type name.
    #[clap(long, short = 'm', value_name = "NAME", default_value = "matte")]
    pub material: String,

    /// Float parameters as `name=value`.
    #[clap(long = "float", value_name = "NAME=V")]
    pub floats: Vec<String>,

    /// RGB parameters as `name=r,g,b`.
    #[clap(long = "rgb", value_name = "NAME=R,G,B")]
    pub rgbs: Vec<String>,

    /// Boolean parameters as `name=true|false`.
    #[clap(long = "bool", value_name = "NAME=B")]
    pub bools: Vec<String>,

    /// String parameters as `name=value`.
    #[clap(long = "string", value_name = "NAME=S")]
    pub strings: Vec<String>,

    /// Number of BSDF samples for the albedo estimate.
    #[clap(long, short = 'n', value_name = "NUM", default_value_t = 4096)]
    pub samples: usize,

    /// Stream index for the sampling context.
    #[clap(long, value_name = "NUM", default_value_t = 0)]
    pub seed: u64,

    /// Cosine of the angle between the outgoing direction and the normal.
    #[clap(long = "cos-theta", value_name = "FLOAT", default_value_t = 1.0)]
    pub cos_theta: Float,
}
