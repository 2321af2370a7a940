use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "opcattr",
    bin_name = "opcattr",
    version,
    disable_help_subcommand = true
)]
#[command(about = "Read and write node attributes of an OPC UA node set", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Node set file (JSON)
    #[arg(
        short,
        long,
        global = true,
        default_value = "nodeset.json",
        help_heading = "Options"
    )]
    pub nodeset: PathBuf,

    /// Server configuration file (TOML)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        short,
        long,
        global = true,
        value_enum,
        default_value_t = OutputFormat::Text,
        help_heading = "Options"
    )]
    pub output: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every attribute with its declared type and node classes
    Attrs,

    /// Write the sample boiler address space to the node set file
    Init {
        /// Overwrite an existing node set
        #[arg(long)]
        force: bool,
    },

    /// Read attributes of a node
    Read {
        /// Node id, e.g. "ns=1;s=Boiler.Temperature"
        node_id: String,

        /// Attribute names or wire ids
        #[arg(required = true)]
        attributes: Vec<String>,
    },

    /// Write one attribute of a node
    Write {
        /// Node id, e.g. "ns=1;s=Boiler.Temperature"
        node_id: String,

        /// Attribute name or wire id
        attribute: String,

        /// Value as variant JSON, e.g. '{"Double": 42.0}'
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_read_takes_many_attributes() {
        let cli = Cli::parse_from(["opcattr", "read", "i=85", "Value", "13", "-o", "json"]);
        assert_eq!(cli.output, OutputFormat::Json);
        match cli.command {
            Commands::Read {
                node_id,
                attributes,
            } => {
                assert_eq!(node_id, "i=85");
                assert_eq!(attributes, vec!["Value", "13"]);
            }
            other => panic!("Expected Read, got {:?}", other),
        }
    }

    #[test]
    fn test_read_requires_an_attribute() {
        assert!(Cli::try_parse_from(["opcattr", "read", "i=85"]).is_err());
    }

    #[test]
    fn test_global_options_default() {
        let cli = Cli::parse_from(["opcattr", "attrs"]);
        assert_eq!(cli.nodeset, PathBuf::from("nodeset.json"));
        assert!(cli.config.is_none());
        assert!(!cli.verbose);
    }
}
