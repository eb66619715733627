use clap::Parser;
use std::path::PathBuf;

/// Repo Downloader: search GitHub repositories from the terminal, inspect one
/// and simulate downloading it.
#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about,
    long_about = "A terminal client for searching GitHub repositories, browsing the results and simulating a download of any of them."
)]
pub struct Args {
    /// Search text. When given, the app opens directly on the results screen.
    pub query: Option<String>,

    /// GitHub API token for authentication (raises the search rate limit).
    #[clap(short, long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Base URL of the GitHub REST API.
    #[clap(long, default_value = "https://api.github.com")]
    pub api_url: String,

    /// Interval between simulated download progress steps, in milliseconds.
    #[clap(long, value_name = "MS", default_value = "500")]
    pub tick_ms: u64,

    /// Delay after the last keystroke before an edited query is searched.
    /// Zero searches on every keystroke.
    #[clap(long, value_name = "MS", default_value = "300")]
    pub debounce_ms: u64,

    /// Request timeout for the search endpoint, in seconds.
    #[clap(long, value_name = "SECS", default_value = "30")]
    pub timeout_secs: u64,

    /// File that receives the log output of the interactive UI.
    #[clap(long, default_value = "repo-downloader.log")]
    pub log_file: PathBuf,

    /// Print results to stdout instead of starting the interactive UI.
    #[clap(long)]
    pub plain: bool,

    /// With --plain, simulate downloading the given result row (1-based).
    #[clap(short, long, value_name = "ROW", requires = "plain")]
    pub download: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_arguments() {
        let args = Args::try_parse_from(["repo-downloader"]).unwrap();
        assert_eq!(args.query, None);
        assert_eq!(args.api_url, "https://api.github.com");
        assert_eq!(args.tick_ms, 500);
        assert_eq!(args.debounce_ms, 300);
        assert_eq!(args.timeout_secs, 30);
        assert_eq!(args.log_file, PathBuf::from("repo-downloader.log"));
        assert!(!args.plain);
        assert_eq!(args.download, None);
    }

    #[test]
    fn positional_query_and_plain_download() {
        let args =
            Args::try_parse_from(["repo-downloader", "react", "--plain", "--download", "2"])
                .unwrap();
        assert_eq!(args.query.as_deref(), Some("react"));
        assert!(args.plain);
        assert_eq!(args.download, Some(2));
    }

    #[test]
    fn download_requires_plain() {
        let result = Args::try_parse_from(["repo-downloader", "react", "--download", "1"]);
        assert!(result.is_err());
    }
}
