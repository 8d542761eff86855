use clap::{CommandFactory, Parser};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "agrod", version, about = "Crop disease detection and drone field simulation")]
pub struct CliArgs {
    /// Analyze one image and exit
    #[arg(long)]
    pub headless: bool,

    /// Image to analyze in headless mode
    #[arg(long, value_name = "PATH")]
    pub image: Option<PathBuf>,

    /// Print the headless report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the detection endpoint
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Crop type: cotton or coconut
    #[arg(long, value_name = "CROP")]
    pub crop: Option<String>,

    /// Override the log file path
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,

    /// Fix the hint RNG seed
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(endpoint) = &self.endpoint {
            std::env::set_var("AGROD_ENDPOINT", endpoint);
        }
        if let Some(crop) = &self.crop {
            std::env::set_var("AGROD_CROP", crop);
        }
        if let Some(path) = &self.log_file {
            std::env::set_var("AGROD_LOG", path);
        }
        if let Some(seed) = self.seed {
            std::env::set_var("AGROD_SEED", seed.to_string());
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_headless_invocation() {
        let args = CliArgs::try_parse_from([
            "agrod",
            "--headless",
            "--image",
            "leaf.jpg",
            "--crop",
            "coconut",
            "--json",
        ]);
        let args = args.map_err(|e| e.to_string());
        assert!(args.as_ref().is_ok_and(|args| args.headless && args.json));
        assert_eq!(
            args.ok().and_then(|args| args.image),
            Some(PathBuf::from("leaf.jpg"))
        );
    }

    #[test]
    fn help_mentions_endpoint_flag() {
        assert!(CliArgs::help_text().contains("--endpoint"));
    }
}
