use agentcfg::schema::coerce;
use agentcfg::{Check, Config, ConfigType, Options, Schema, TypeDecl, ValueKind, init_logging};
use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use serde_json::Value;

/// Build a validated service config from APP_* env vars and --set flags.
#[derive(Debug, Parser)]
#[command(name = "hello-config")]
struct Args {
    /// Field assignment as key=value; may be repeated. Applied after env vars.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    set: Vec<(String, String)>,
    /// Prefix selecting environment variables to read.
    #[arg(long, default_value = "APP_")]
    env_prefix: String,
}

struct BaseService;
struct HttpService;

impl ConfigType for BaseService {
    type Schema = Schema;
    const FIELDS: &'static [&'static str] = &["name", "log_level"];

    fn schema() -> Schema {
        Schema::new()
            .required("name", ValueKind::String)
            .optional_with_default(
                "log_level",
                Check::one_of(["error", "warn", "info", "debug"]),
                "info",
            )
    }
}

impl ConfigType for HttpService {
    type Schema = Schema;
    const FIELDS: &'static [&'static str] = &["host", "port", "timeout", "tls"];

    fn parent() -> Option<TypeDecl> {
        Some(TypeDecl::of::<BaseService>())
    }

    fn schema() -> Schema {
        BaseService::schema().extend(
            Schema::new()
                .optional_with_default("host", ValueKind::String, "127.0.0.1")
                .required("port", coerce::integer())
                .optional_with_default("timeout", coerce::integer(), 30)
                .optional_with_default("tls", coerce::boolean(), false),
        )
    }
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    Ok((key.trim().to_string(), value.to_string()))
}

fn collect_options(args: &Args, vars: impl IntoIterator<Item = (String, String)>) -> Options {
    let mut options = Options::new();
    for (key, value) in vars {
        if let Some(field) = key.strip_prefix(&args.env_prefix) {
            options.insert(field.to_ascii_lowercase(), Value::String(value));
        }
    }
    for (key, value) in &args.set {
        options.insert(key.clone(), Value::String(value.clone()));
    }
    debug!("collected {} option(s)", options.len());
    options
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let options = collect_options(&args, std::env::vars());
    let config = Config::<HttpService>::from_options(&options)
        .context("invalid service configuration")?;

    let rendered = serde_json::to_string_pretty(&config).context("failed to render config")?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn assignment_requires_equals_sign() {
        assert!(parse_assignment("port").is_err());
        assert!(Args::try_parse_from(["hello-config", "--set", "port"]).is_err());
    }

    #[test]
    fn assignment_splits_on_first_equals_sign() {
        assert_eq!(
            parse_assignment(" name =a=b"),
            Ok(("name".to_string(), "a=b".to_string()))
        );
    }

    #[test]
    fn cli_pairs_override_prefixed_env_vars() {
        let args = Args::try_parse_from(["hello-config", "--set", "port=9000"]).expect("args");
        let options = collect_options(
            &args,
            vars(&[("APP_PORT", "8080"), ("APP_NAME", "api"), ("HOME", "/root")]),
        );
        assert_eq!(options.len(), 2);
        assert_eq!(options["port"], json!("9000"));
        assert_eq!(options["name"], json!("api"));
    }

    #[test]
    fn collected_options_build_a_record() {
        let args = Args::try_parse_from(["hello-config", "--env-prefix", "SVC_"]).expect("args");
        let options = collect_options(&args, vars(&[("SVC_NAME", "api"), ("SVC_PORT", "81")]));
        let config = Config::<HttpService>::from_options(&options).expect("valid config");
        assert_eq!(config["port"], json!(81));
        assert_eq!(config["timeout"], json!(30));
    }
}
