use clap::{ArgGroup, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tvdb")]
#[command(version)]
#[command(about = "Query TheTVDB for series, episodes, cast and artwork", long_about = None)]
#[command(after_help = "Examples:\n  \
  tvdb search \"Castle\" --pick      search a series and load the chosen one\n  \
  tvdb lookup --imdb tt1219024      find a series by its IMDb id\n  \
  tvdb series 83462 --episodes      list all episodes of a series")]
pub struct Cli {
    /// API key (overrides the config file and TVDB_API_KEY)
    #[arg(long, global = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Server used to fetch the mirror list
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Language abbreviation, e.g. "en" or "de"
    #[arg(short, long, global = true, value_name = "LANG")]
    pub language: Option<String>,

    /// More log output (-v info, -vv debug)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all mirrors and their capabilities
    Mirrors,

    /// List all supported languages
    Languages,

    /// Search series by name
    Search {
        /// Name of the series
        name: String,

        /// Choose one of the results interactively and load it
        #[arg(long)]
        pick: bool,
    },

    /// Find series by IMDb or Zap2it id
    #[command(group(ArgGroup::new("remote").required(true).args(["imdb", "zap2it"])))]
    Lookup {
        /// IMDb id, e.g. tt1219024
        #[arg(long, value_name = "ID")]
        imdb: Option<String>,

        /// Zap2it id, e.g. EP01085588
        #[arg(long, value_name = "ID")]
        zap2it: Option<String>,
    },

    /// Download the full record of a series
    Series {
        /// Series id
        id: u32,

        /// Print the series record as JSON
        #[arg(long)]
        json: bool,

        /// List all episodes
        #[arg(long)]
        episodes: bool,
    },

    /// Print the location of the config file
    ConfigPath,
}

impl Cli {
    /// Default log filter for the requested verbosity
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "tvdb_client=warn",
            1 => "tvdb_client=info",
            _ => "tvdb_client=debug",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_with_global_flags() {
        let cli = Cli::try_parse_from(["tvdb", "search", "Castle", "--pick", "-l", "de", "-vv"]).unwrap();

        assert_eq!(cli.language.as_deref(), Some("de"));
        assert_eq!(cli.log_filter(), "tvdb_client=debug");
        match cli.command {
            Command::Search { name, pick } => {
                assert_eq!(name, "Castle");
                assert!(pick);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_lookup_requires_exactly_one_id() {
        assert!(Cli::try_parse_from(["tvdb", "lookup"]).is_err());
        assert!(Cli::try_parse_from(["tvdb", "lookup", "--imdb", "tt1", "--zap2it", "EP1"]).is_err());
        assert!(Cli::try_parse_from(["tvdb", "lookup", "--zap2it", "EP01085588"]).is_ok());
    }

    #[test]
    fn test_series_id_must_be_numeric() {
        assert!(Cli::try_parse_from(["tvdb", "series", "castle"]).is_err());

        let cli = Cli::try_parse_from(["tvdb", "series", "83462", "--episodes"]).unwrap();
        assert!(matches!(cli.command, Command::Series { id: 83462, episodes: true, json: false }));
        assert_eq!(cli.log_filter(), "tvdb_client=warn");
    }
}
