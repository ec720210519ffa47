use std::path::PathBuf;

use clap::Parser;
use modelprobe_core::{TensorId, DEFAULT_SIGNATURE, SERVE_TAG};

#[derive(Parser, Debug)]
#[command(
    name = "modelprobe",
    version,
    about = "Load a SavedModel and run one inference pass on synthetic inputs"
)]
pub struct Cli {
    /// SavedModel export directory
    #[arg(long, default_value = "./model/")]
    pub model_dir: PathBuf,

    /// Tag selecting the graph variant to load (repeatable)
    #[arg(long = "tag", default_value = SERVE_TAG)]
    pub tags: Vec<String>,

    /// Signature to introspect and run
    #[arg(long, default_value = DEFAULT_SIGNATURE)]
    pub signature: String,

    /// Feed tensor id (`op:index`), repeatable; defaults to the signature inputs
    #[arg(long = "feed")]
    pub feeds: Vec<TensorId>,

    /// Fetch tensor id (`op:index`), repeatable; defaults to the signature outputs
    #[arg(long = "fetch")]
    pub fetches: Vec<TensorId>,

    /// Log level, used when RUST_LOG is unset
    #[arg(long, default_value = "error")]
    pub log: String,
}
