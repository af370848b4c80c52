use std::path::Path;

use crate::cli::commands::ConfigArgs;
use crate::cli::output::ConfigJson;
use crate::io::config_io;
use crate::model::Config;

/// Written when `--set-api-url` creates the config file
const CONFIG_TOML_TEMPLATE: &str = r##"# ideabox configuration

[api]
url = "{url}"
# Seconds before a request gives up. Leave unset to wait forever.
# timeout_secs = 30

# --- UI Customization ---
# Uncomment and edit to override defaults.
#
# [ui]
# show_key_hints = false
#
# [ui.colors]
# background = "#0C001B"
# text = "#B0AAFF"
# text_bright = "#FFFFFF"
# highlight = "#FB4196"
# dim = "#7D78BF"
# red = "#FF4444"
# yellow = "#FFD700"
# green = "#44FF88"
# cyan = "#44DDFF"

# --- Logging (terminal UI only; RUST_LOG wins) ---
# [log]
# level = "info"
# file = "/tmp/ideabox.log"
"##;

pub fn cmd_config(
    args: ConfigArgs,
    config: &Config,
    path: &Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(url) = args.set_api_url {
        let url = url.trim();
        if url.is_empty() {
            return Err("api url must not be empty".into());
        }
        if path.exists() {
            let mut doc = config_io::read_document(path)?;
            config_io::set_api_url(&mut doc, url);
            config_io::write_document(path, &doc)?;
        } else {
            let doc: toml_edit::DocumentMut = CONFIG_TOML_TEMPLATE.replace("{url}", url).parse()?;
            config_io::write_document(path, &doc)?;
        }
        println!("api url set to {} in {}", url, path.display());
        return Ok(());
    }

    if json {
        let out = ConfigJson {
            path: path.display().to_string(),
            api_url: &config.api.url,
            timeout_secs: config.api.timeout_secs,
            log_level: &config.log.level,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("config file: {}", path.display());
        println!("api url:     {}", config.api.url);
        match config.api.timeout_secs {
            Some(secs) => println!("timeout:     {}s", secs),
            None => println!("timeout:     none"),
        }
        println!("log level:   {}", config.log.level);
    }
    Ok(())
}
