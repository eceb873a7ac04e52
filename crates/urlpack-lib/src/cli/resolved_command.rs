use crate::cli::args::{Command, ConfigOverrides};
use crate::cli::params::{CheckParams, FetchParams};
use crate::config::{Config, load_config};
use crate::error::UrlPackError;
use crate::fetch::AccessPath;
use crate::input::{RequestedItem, parse_item_list};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub enum ResolvedCommand {
    Fetch(FetchParams),
    Check(CheckParams),
}

pub fn resolve_command(command: Command) -> Result<ResolvedCommand, UrlPackError> {
    match command {
        Command::Fetch {
            input_path,
            output_path,
            config_path,
            report_path,
            overrides,
        } => {
            let mut app_config = match config_path {
                Some(config_path) => load_config(&config_path)?,
                None => Config::default(),
            };
            overrides.apply(&mut app_config);

            for (name, value) in [
                ("timeout-secs", app_config.fetch.timeout_secs),
                ("concurrency", app_config.batch.concurrency as u64),
            ] {
                if value == 0 {
                    return Err(UrlPackError::CliArgumentValidation {
                        details: format!("{name} must be greater than 0."),
                    });
                }
            }
            // Surface broken templates before any download starts.
            AccessPath::from_defs(&app_config.effective_access_paths())?;

            let items = read_items(&input_path)?;

            Ok(ResolvedCommand::Fetch(FetchParams {
                app_config,
                items,
                output_path: PathBuf::from(output_path),
                report_path: report_path.map(PathBuf::from),
            }))
        }
        Command::Check { input_path } => {
            let items = read_items(&input_path)?;
            Ok(ResolvedCommand::Check(CheckParams { items }))
        }
    }
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(timeout_secs) = self.timeout_secs {
            config.fetch.timeout_secs = timeout_secs;
        }
        if let Some(max_retries) = self.max_retries {
            config.retry.max_retries = max_retries;
        }
        if let Some(retry_delay_ms) = self.retry_delay_ms {
            config.retry.base_delay_ms = retry_delay_ms;
        }
        if let Some(concurrency) = self.concurrency {
            config.batch.concurrency = concurrency;
        }
        if self.no_fallback {
            config.access_paths.clear();
            config.use_default_access_paths = false;
        }
    }
}

fn read_items(input_path: &str) -> Result<Vec<RequestedItem>, UrlPackError> {
    let text = if input_path == "-" {
        std::io::read_to_string(std::io::stdin()).map_err(|e| UrlPackError::InputRead {
            path: PathBuf::from("<stdin>"),
            reason: e.to_string(),
        })?
    } else {
        std::fs::read_to_string(Path::new(input_path)).map_err(|e| UrlPackError::InputRead {
            path: PathBuf::from(input_path),
            reason: e.to_string(),
        })?
    };

    Ok(parse_item_list(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ParseError;

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> String {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path.to_str().unwrap().to_string()
    }

    fn fetch_command(input_path: String, config_path: Option<String>, overrides: ConfigOverrides) -> Command {
        Command::Fetch {
            input_path,
            output_path: "out.zip".to_string(),
            config_path,
            report_path: None,
            overrides,
        }
    }

    #[test]
    fn test_fetch_uses_defaults_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(&dir, "list.txt", "https://example.com/a, a\n");

        let ResolvedCommand::Fetch(params) =
            resolve_command(fetch_command(input, None, ConfigOverrides::default())).unwrap()
        else {
            panic!("expected fetch command");
        };

        assert_eq!(params.items.len(), 1);
        assert_eq!(params.output_path, PathBuf::from("out.zip"));
        assert_eq!(params.app_config.retry.max_retries, 3);
        assert_eq!(params.app_config.effective_access_paths().len(), 4);
    }

    #[test]
    fn test_cli_overrides_win_over_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(&dir, "list.txt", "https://example.com/a, a\n");
        let config = write(
            &dir,
            "config.yaml",
            "retry:\n  max_retries: 9\n  base_delay_ms: 50\nbatch:\n  concurrency: 2\n",
        );
        let overrides = ConfigOverrides {
            max_retries: Some(1),
            no_fallback: true,
            ..Default::default()
        };

        let ResolvedCommand::Fetch(params) =
            resolve_command(fetch_command(input, Some(config), overrides)).unwrap()
        else {
            panic!("expected fetch command");
        };

        assert_eq!(params.app_config.retry.max_retries, 1);
        assert_eq!(params.app_config.retry.base_delay_ms, 50);
        assert_eq!(params.app_config.batch.concurrency, 2);
        assert!(params.app_config.effective_access_paths().is_empty());
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(&dir, "list.txt", "https://example.com/a, a\n");
        let overrides = ConfigOverrides {
            concurrency: Some(0),
            ..Default::default()
        };

        let err = resolve_command(fetch_command(input, None, overrides)).unwrap_err();

        assert!(matches!(err, UrlPackError::CliArgumentValidation { .. }));
    }

    #[test]
    fn test_broken_access_path_is_rejected_before_download() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(&dir, "list.txt", "https://example.com/a, a\n");
        let config = write(
            &dir,
            "config.yaml",
            "access_paths:\n  - name: nowhere\n    template: https://proxy.example/\n",
        );

        let err =
            resolve_command(fetch_command(input, Some(config), ConfigOverrides::default()))
                .unwrap_err();

        assert!(matches!(err, UrlPackError::AccessPath { .. }));
    }

    #[test]
    fn test_check_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(&dir, "list.txt", "https://example.com/a a\n");

        let err = resolve_command(Command::Check { input_path: input }).unwrap_err();

        assert!(matches!(
            err,
            UrlPackError::Parse(ParseError::MissingSeparator { line_number: 1, .. })
        ));
    }

    #[test]
    fn test_missing_input_file_is_reported() {
        let err = resolve_command(Command::Check {
            input_path: "/nonexistent/urlpack/list.txt".to_string(),
        })
        .unwrap_err();

        assert!(matches!(err, UrlPackError::InputRead { .. }));
    }
}
