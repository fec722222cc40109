use std::collections::BTreeMap;
use std::io::Write;

use anyhow::{Context, Result, anyhow};
use clap::{Arg, ArgAction, ArgMatches, Command, command, crate_authors, crate_description};
use colored::Colorize;
use log::{debug, warn};
use serde::Serialize;

use crate::config::Catalog;
use crate::constants::{
    CONFIG_HELP, LOG_FILE_DEFAULT, LOG_FILE_HELP, STRICT_HELP, VERBOSE_HELP,
};
use crate::errors::generic_error;
use crate::logging::{LogLevel, format_message};
use crate::template::{Template, TemplateKeys};

/// Builds the command-line interface
///
/// Global arguments:
/// - `config`: Path to the configuration file
/// - `verbose`: Increase verbosity level
/// - `log_file`: Additional log file
///
/// Subcommands: `parse`, `format`, `keys`, `check` and `match`.
pub fn build_command() -> Command {
    // define arg for reading from a specific config file
    let arg_config = Arg::new("config")
        .short('c')
        .long("config")
        .help(CONFIG_HELP)
        .global(true);

    // define arg for verbosity level
    let arg_verbose = Arg::new("verbose")
        .short('v')
        .long("verbose")
        .help(VERBOSE_HELP)
        .action(ArgAction::Count)
        .global(true);

    // define arg for log file
    let log_file = Arg::new("log_file")
        .short('l')
        .long("log-file")
        .help(LOG_FILE_HELP)
        .default_value(LOG_FILE_DEFAULT)
        .global(true);

    let parse = Command::new("parse")
        .about("Extract placeholder values from inputs")
        .arg(
            Arg::new("template")
                .short('t')
                .long("template")
                .help("Template to parse with; the first matching template if omitted"),
        )
        .arg(
            Arg::new("strict")
                .short('s')
                .long("strict")
                .help(STRICT_HELP)
                .action(ArgAction::SetTrue),
        )
        .arg(Arg::new("inputs").required(true).num_args(1..));

    let format = Command::new("format")
        .about("Build a string from key=value pairs")
        .arg(Arg::new("template").required(true))
        .arg(Arg::new("values").num_args(0..));

    let keys = Command::new("keys")
        .about("List the keys of a template and their conventions")
        .arg(Arg::new("template").required(true));

    let check = Command::new("check").about("Compile the configuration and report");

    let matching = Command::new("match")
        .about("List the paths an import profile claims")
        .arg(Arg::new("profile").required(true))
        .arg(Arg::new("paths").required(true).num_args(1..));

    command!()
        .author(crate_authors!())
        .about(crate_description!())
        .subcommand_required(true)
        .arg(arg_config)
        .arg(log_file)
        .arg(arg_verbose)
        .subcommand(parse)
        .subcommand(format)
        .subcommand(keys)
        .subcommand(check)
        .subcommand(matching)
}

/// Parses the process arguments
pub fn get_matches() -> ArgMatches {
    build_command().get_matches()
}

/// Gets the verbosity level from the command-line arguments
///
/// # Examples
/// ```
/// use naming_convention::cli::{build_command, get_verbosity};
/// use naming_convention::logging::LogLevel;
///
/// let matches = build_command().get_matches_from(["nconv", "-vv", "check"]);
/// assert_eq!(get_verbosity(&matches), LogLevel::Debug);
/// ```
pub fn get_verbosity(matches: &ArgMatches) -> LogLevel {
    let verbose_count = matches.get_count("verbose");
    LogLevel::from_occurrences(verbose_count)
}

pub fn get_log_file(matches: &ArgMatches) -> String {
    matches
        .get_one::<String>("log_file")
        .cloned()
        .unwrap_or_else(|| LOG_FILE_DEFAULT.to_string())
}

pub fn get_config_option(matches: &ArgMatches) -> Option<&str> {
    matches.get_one::<String>("config").map(String::as_str)
}

#[derive(Serialize, Debug)]
struct ParseReport<'a> {
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    template: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize, Debug)]
struct KeysReport<'a> {
    template: &'a str,
    pattern: String,
    keys: TemplateKeys,
    references: Vec<&'a str>,
}

/// Runs the selected subcommand against a compiled catalogue
///
/// # Returns
/// * `Result<bool>` - Whether every input was handled successfully
///
/// # Errors
/// Returns an error if a named template or profile does not exist, or if
/// writing the output fails
pub fn run_command(matches: &ArgMatches, catalog: &Catalog, out: &mut dyn Write) -> Result<bool> {
    match matches.subcommand() {
        Some(("parse", sub)) => run_parse(sub, catalog, out),
        Some(("format", sub)) => run_format(sub, catalog, out),
        Some(("keys", sub)) => run_keys(sub, catalog, out),
        Some(("check", _)) => run_check(catalog, out),
        Some(("match", sub)) => run_match(sub, catalog, out),
        Some((other, _)) => Err(anyhow!("Unknown command '{}'", other)),
        None => Err(anyhow!("No command given")),
    }
}

fn find_template<'a>(catalog: &'a Catalog, name: &str) -> Result<&'a Template> {
    catalog
        .templates
        .resolve(name)
        .ok_or_else(|| anyhow!("Template '{}' is not defined", name))
}

fn values<'a>(matches: &'a ArgMatches, id: &str) -> Vec<&'a str> {
    matches
        .get_many::<String>(id)
        .map(|values| values.map(String::as_str).collect())
        .unwrap_or_default()
}

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .ok_or_else(|| anyhow!("Missing argument '{}'", id))
}

fn run_parse(matches: &ArgMatches, catalog: &Catalog, out: &mut dyn Write) -> Result<bool> {
    let strict = matches.get_flag("strict");
    let template = match matches.get_one::<String>("template") {
        Some(name) => Some(find_template(catalog, name)?),
        None => None,
    };

    let reports: Vec<ParseReport> = values(matches, "inputs")
        .into_iter()
        .map(|input| {
            let result = match template {
                Some(template) => template.parse_with(input, strict).map(|data| (template, data)),
                None => catalog
                    .templates
                    .parse_first_with(input, strict)
                    .ok_or_else(|| generic_error(&format!("'{input}' matched no template"))),
            };

            match result {
                Ok((template, data)) => ParseReport {
                    input,
                    template: Some(template.name()),
                    data: Some(data.to_values()),
                    error: None,
                },
                Err(e) => {
                    warn!("{}", e);
                    ParseReport {
                        input,
                        template: None,
                        data: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        })
        .collect();

    let success = reports.iter().all(|report| report.error.is_none());
    write!(out, "{}", serde_yaml::to_string(&reports)?)?;
    Ok(success)
}

fn run_format(matches: &ArgMatches, catalog: &Catalog, out: &mut dyn Write) -> Result<bool> {
    let template = find_template(catalog, &required(matches, "template")?)?;

    let mut data = BTreeMap::new();
    for pair in values(matches, "values") {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("Expected key=value, got '{pair}'"))?;
        data.insert(key.to_string(), value.to_string());
    }
    debug!("Formatting '{}' with {} values", template.name(), data.len());

    match template.format(&data) {
        Ok(formatted) => {
            writeln!(out, "{formatted}")?;
            Ok(true)
        }
        Err(e) => {
            warn!("{}", e);
            Ok(false)
        }
    }
}

fn run_keys(matches: &ArgMatches, catalog: &Catalog, out: &mut dyn Write) -> Result<bool> {
    let template = find_template(catalog, &required(matches, "template")?)?;
    let report = KeysReport {
        template: template.name(),
        pattern: template.expanded_pattern(),
        keys: template.key_conventions(),
        references: template.references(),
    };
    write!(out, "{}", serde_yaml::to_string(&report)?)?;
    Ok(true)
}

fn run_check(catalog: &Catalog, out: &mut dyn Write) -> Result<bool> {
    for template in catalog.templates.iter() {
        let plain = format!("ok  template {} => {}", template.name(), template.expanded_pattern());
        let colored = format!(
            "{}  template {} => {}",
            "ok".green(),
            template.name().bold(),
            template.expanded_pattern()
        );
        writeln!(out, "{}", format_message(&plain, &colored))?;
    }

    for profile in &catalog.profiles {
        let state = if profile.enabled { "ok" } else { "off" };
        let plain = format!(
            "{state:<3} profile {} ({} filters)",
            profile.name,
            profile.filters.len()
        );
        let colored = format!(
            "{}{} profile {} ({} filters)",
            if profile.enabled { "ok".green() } else { "off".yellow() },
            if profile.enabled { " " } else { "" },
            profile.name.bold(),
            profile.filters.len()
        );
        writeln!(out, "{}", format_message(&plain, &colored))?;
    }

    Ok(true)
}

fn run_match(matches: &ArgMatches, catalog: &Catalog, out: &mut dyn Write) -> Result<bool> {
    let name = required(matches, "profile")?;
    let profile = catalog
        .profile(&name)
        .ok_or_else(|| anyhow!("Profile '{}' is not defined", name))?;

    let paths = values(matches, "paths");
    let claimed = profile.matching(&paths);
    let mut accepted = 0;
    for path in &claimed {
        if profile.filters.is_empty() || profile.matching_filter(path).is_some() {
            writeln!(out, "{path}")?;
            accepted += 1;
        } else {
            warn!("'{}' is claimed by '{}' but no filter accepts it", path, profile.name);
        }
    }

    if claimed.len() < paths.len() {
        warn!(
            "{} of {} paths are not claimed by '{}'",
            paths.len() - claimed.len(),
            paths.len(),
            profile.name
        );
    }

    Ok(accepted == paths.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn catalog() -> Catalog {
        Config::from_yaml_str(
            r#"
templates:
  - name: texture
    pattern: "T_{name}_{variant}"
    anchor: exact
  - name: any
    pattern: "{name}"
    anchor: exact
profiles:
  - name: Textures
    path: "Assets/Test/{folder}/"
    filters:
      - file: "{file}_001"
        extensions: [".png"]
"#,
        )
        .unwrap()
        .compile()
        .unwrap()
    }

    fn run(args: &[&str]) -> (bool, String) {
        let matches = build_command().get_matches_from(args);
        let mut out = Vec::new();
        let success = run_command(&matches, &catalog(), &mut out).unwrap();
        (success, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_get_verbosity() {
        let matches = build_command().get_matches_from(["nconv", "check"]);
        assert_eq!(get_verbosity(&matches), LogLevel::Warning);
        let matches = build_command().get_matches_from(["nconv", "check", "-vvv"]);
        assert_eq!(get_verbosity(&matches), LogLevel::Trace);
    }

    #[test]
    fn test_parse_with_named_template() {
        let (success, output) = run(&["nconv", "parse", "-t", "texture", "T_hero_01"]);
        assert!(success);
        assert!(output.contains("name: hero"), "Output was: {output}");
        assert!(output.contains("variant: '01'") || output.contains("variant: \"01\""));
    }

    #[test]
    fn test_parse_falls_back_to_first_matching_template() {
        let (success, output) = run(&["nconv", "parse", "hero"]);
        assert!(success);
        assert!(output.contains("template: any"), "Output was: {output}");
    }

    #[test]
    fn test_format_reports_missing_keys() {
        let (success, output) = run(&["nconv", "format", "texture", "name=hero"]);
        assert!(!success);
        assert!(output.is_empty());

        let (success, output) = run(&["nconv", "format", "texture", "name=hero", "variant=02"]);
        assert!(success);
        assert_eq!(output, "T_hero_02\n");
    }

    #[test]
    fn test_match_succeeds_only_when_every_path_is_accepted() {
        let (success, output) = run(&["nconv", "match", "Textures", "Assets/Test/A/a_001.png"]);
        assert!(success);
        assert_eq!(output, "Assets/Test/A/a_001.png\n");

        // One path outside the profile
        let (success, output) = run(&[
            "nconv",
            "match",
            "Textures",
            "Assets/Test/A/a_001.png",
            "Other/b_001.png",
        ]);
        assert!(!success);
        assert_eq!(output, "Assets/Test/A/a_001.png\n");

        // Claimed by the profile path but rejected by every filter
        let (success, output) = run(&["nconv", "match", "Textures", "Assets/Test/A/a_002.png"]);
        assert!(!success);
        assert!(output.is_empty());
    }

    #[test]
    fn test_unknown_template() {
        let matches = build_command().get_matches_from(["nconv", "keys", "missing"]);
        let mut out = Vec::new();
        assert!(run_command(&matches, &catalog(), &mut out).is_err());
    }
}
