use std::{env, time::Duration};
use thiserror::Error;
use url::Url;

use crate::domain::{
    config::{ConfigError, SlotlandConfigFile, load_slotland_config_file},
    execution_config::{ExecutorSettings, StrategyConfig},
    services::fee_plan::PriorityFeePlan,
    value_objects::{
        CommitmentLevel, IntervalMillis, Lamports, NonEmptyText, PriorityFeeMicrolamports,
        StrategyKind,
    },
};

const DEFAULT_PROBE_LAMPORTS: u64 = 1_000;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RequiredRuntimeField {
    KeypairPath,
    RpcUrl,
    RelayUrls,
    TipSol,
}

impl RequiredRuntimeField {
    const fn as_str(self) -> &'static str {
        match self {
            Self::KeypairPath => "runtime.keypair_path",
            Self::RpcUrl => "runtime.rpc_url",
            Self::RelayUrls => "bundle.relay_urls",
            Self::TipSol => "bundle.tip_sol",
        }
    }
}

impl std::fmt::Display for RequiredRuntimeField {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IntervalField {
    PollIntervalMs,
    SendIntervalMs,
}

impl IntervalField {
    const fn as_str(self) -> &'static str {
        match self {
            Self::PollIntervalMs => "execution.poll_interval_ms",
            Self::SendIntervalMs => "execution.send_interval_ms",
        }
    }
}

impl std::fmt::Display for IntervalField {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Runtime(#[from] RuntimeSettingsError),
    #[error(transparent)]
    Execution(#[from] ExecutionSettingsError),
}

#[derive(Debug, Error)]
pub enum RuntimeSettingsError {
    #[error("missing {field} in config")]
    MissingField { field: RequiredRuntimeField },
    #[error("invalid commitment; supported values: processed, confirmed, finalized")]
    InvalidCommitment,
    #[error("invalid url '{value}' in {field}")]
    InvalidUrl {
        field: RequiredRuntimeField,
        value: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Error)]
pub enum ExecutionSettingsError {
    #[error("invalid execution.strategy; supported values: direct, escalating, bundle")]
    InvalidStrategy,
    #[error("{field} must be greater than 0")]
    ZeroInterval { field: IntervalField },
    #[error("bundle.tip_sol must be a positive SOL amount with at most 9 decimals")]
    InvalidTip,
    #[error("--lamports must be a positive integer")]
    InvalidProbeLamports,
}

#[derive(Clone, Debug)]
pub struct RuntimeSettings {
    pub config_path: String,
    pub keypair_path: NonEmptyText,
    pub rpc_url: Url,
    pub commitment: CommitmentLevel,
    pub strategy: StrategyConfig,
    pub executor: ExecutorSettings,
    pub fee_plan: PriorityFeePlan,
    pub probe_lamports: Lamports,
}

impl RuntimeSettings {
    pub fn from_args() -> Result<Self, SettingsError> {
        let args = env::args().skip(1).collect::<Vec<_>>();
        Self::from_cli_args(&args)
    }

    pub fn from_cli_args(args: &[String]) -> Result<Self, SettingsError> {
        let config_path =
            arg_value(args, "--config").unwrap_or_else(|| "slotland.toml".to_owned());
        let parsed_config = load_slotland_config_file(&config_path)?;
        Self::from_parsed_config(args, config_path, &parsed_config)
    }

    pub(crate) fn from_parsed_config(
        args: &[String],
        config_path: String,
        parsed_config: &SlotlandConfigFile,
    ) -> Result<Self, SettingsError> {
        let runtime = &parsed_config.runtime;
        let execution = &parsed_config.execution;
        let bundle = &parsed_config.bundle;

        let keypair_path = NonEmptyText::try_from(runtime.keypair_path.clone()).map_err(
            |_source| RuntimeSettingsError::MissingField {
                field: RequiredRuntimeField::KeypairPath,
            },
        )?;
        if runtime.rpc_url.trim().is_empty() {
            return Err(RuntimeSettingsError::MissingField {
                field: RequiredRuntimeField::RpcUrl,
            }
            .into());
        }
        let rpc_url = parse_url(&runtime.rpc_url, RequiredRuntimeField::RpcUrl)?;
        let commitment = CommitmentLevel::parse(&runtime.commitment)
            .ok_or(RuntimeSettingsError::InvalidCommitment)?;

        let strategy_kind = StrategyKind::parse(&execution.strategy)
            .ok_or(ExecutionSettingsError::InvalidStrategy)?;
        let poll_interval = IntervalMillis::new(execution.poll_interval_ms).map_err(|_source| {
            ExecutionSettingsError::ZeroInterval {
                field: IntervalField::PollIntervalMs,
            }
        })?;
        let send_interval = IntervalMillis::new(execution.send_interval_ms).map_err(|_source| {
            ExecutionSettingsError::ZeroInterval {
                field: IntervalField::SendIntervalMs,
            }
        })?;
        let fee = PriorityFeeMicrolamports::new(execution.priority_fee_microlamports);

        let strategy = match strategy_kind {
            StrategyKind::Direct => StrategyConfig {
                fee,
                ..StrategyConfig::direct()
            },
            StrategyKind::Escalating => StrategyConfig::escalating(fee, send_interval),
            StrategyKind::Bundle => {
                if bundle.relay_urls.is_empty() {
                    return Err(RuntimeSettingsError::MissingField {
                        field: RequiredRuntimeField::RelayUrls,
                    }
                    .into());
                }
                let relay_urls = bundle
                    .relay_urls
                    .iter()
                    .map(|value| parse_url(value, RequiredRuntimeField::RelayUrls))
                    .collect::<Result<Vec<_>, _>>()?;
                let tip_sol = bundle
                    .tip_sol
                    .as_deref()
                    .ok_or(RuntimeSettingsError::MissingField {
                        field: RequiredRuntimeField::TipSol,
                    })?;
                let tip = Lamports::parse_positive_sol(tip_sol)
                    .ok_or(ExecutionSettingsError::InvalidTip)?;
                StrategyConfig {
                    fee,
                    ..StrategyConfig::bundle(tip, relay_urls)
                }
            }
        };

        let max_wait = (execution.max_wait_ms > 0)
            .then(|| Duration::from_millis(execution.max_wait_ms));
        let executor = ExecutorSettings {
            poll_interval,
            max_transport_retries: execution.max_transport_retries,
            max_wait,
        };

        let probe_lamports = match arg_value(args, "--lamports") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|value| *value > 0)
                .map(Lamports::new)
                .ok_or(ExecutionSettingsError::InvalidProbeLamports)?,
            None => Lamports::new(DEFAULT_PROBE_LAMPORTS),
        };

        Ok(Self {
            config_path,
            keypair_path,
            rpc_url,
            commitment,
            strategy,
            executor,
            fee_plan: PriorityFeePlan::new(execution.compute_unit_limit, fee),
            probe_lamports,
        })
    }
}

fn parse_url(value: &str, field: RequiredRuntimeField) -> Result<Url, RuntimeSettingsError> {
    Url::parse(value.trim()).map_err(|source| RuntimeSettingsError::InvalidUrl {
        field,
        value: value.to_owned(),
        source,
    })
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|index| args.get(index.saturating_add(1)))
        .cloned()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{
        ExecutionSettingsError, RequiredRuntimeField, RuntimeSettings, RuntimeSettingsError,
        SettingsError,
    };
    use crate::domain::{
        config::{ConfigError, SlotlandConfigFile, parse_slotland_config_toml},
        value_objects::{CommitmentLevel, StrategyKind},
    };

    fn config_with(execution: &str, bundle: &str) -> Result<SlotlandConfigFile, ConfigError> {
        parse_slotland_config_toml(&format!(
            r#"
[runtime]
keypair_path = "keypair.json"
rpc_url = "https://rpc.example"
commitment = "confirmed"

[execution]
{execution}

[bundle]
{bundle}
"#
        ))
    }

    fn settings_from(
        args: &[String],
        execution: &str,
        bundle: &str,
    ) -> Option<Result<RuntimeSettings, SettingsError>> {
        let config = config_with(execution, bundle);
        assert!(config.is_ok());
        let config = config.ok()?;
        Some(RuntimeSettings::from_parsed_config(
            args,
            "slotland.toml".to_owned(),
            &config,
        ))
    }

    #[test]
    fn defaults_to_direct_strategy() {
        let settings = settings_from(&Vec::new(), "", "");
        assert!(matches!(settings, Some(Ok(_))));
        if let Some(Ok(settings)) = settings {
            assert_eq!(settings.strategy.strategy, StrategyKind::Direct);
            assert_eq!(settings.commitment, CommitmentLevel::Confirmed);
            assert_eq!(settings.executor.poll_interval.as_millis(), 1_500);
            assert_eq!(settings.executor.max_wait, Some(Duration::from_secs(90)));
            assert_eq!(settings.probe_lamports.as_u64(), 1_000);
        }
    }

    #[test]
    fn escalating_strategy_carries_fee_and_interval() {
        let settings = settings_from(
            &Vec::new(),
            "strategy = \"escalating\"\nsend_interval_ms = 400\npriority_fee_microlamports = 5000",
            "",
        );
        assert!(matches!(settings, Some(Ok(_))));
        if let Some(Ok(settings)) = settings {
            assert_eq!(settings.strategy.strategy, StrategyKind::Escalating);
            assert_eq!(settings.strategy.send_interval.as_millis(), 400);
            assert_eq!(settings.strategy.fee.as_u64(), 5_000);
            assert_eq!(settings.fee_plan.compute_unit_price().as_u64(), 5_000);
        }
    }

    #[test]
    fn bundle_strategy_requires_relay_urls() {
        let settings = settings_from(&Vec::new(), "strategy = \"bundle\"", "tip_sol = \"0.001\"");
        assert!(matches!(
            settings,
            Some(Err(SettingsError::Runtime(
                RuntimeSettingsError::MissingField {
                    field: RequiredRuntimeField::RelayUrls
                }
            )))
        ));
    }

    #[test]
    fn bundle_strategy_requires_positive_tip() {
        let settings = settings_from(
            &Vec::new(),
            "strategy = \"bundle\"",
            "relay_urls = [\"https://relay.example/api/v1/bundles\"]\ntip_sol = \"0\"",
        );
        assert!(matches!(
            settings,
            Some(Err(SettingsError::Execution(ExecutionSettingsError::InvalidTip)))
        ));
    }

    #[test]
    fn bundle_strategy_parses_tip_and_relays() {
        let settings = settings_from(
            &Vec::new(),
            "strategy = \"jito\"",
            "relay_urls = [\"https://relay.example/api/v1/bundles\"]\ntip_sol = \"0.0001\"",
        );
        assert!(matches!(settings, Some(Ok(_))));
        if let Some(Ok(settings)) = settings {
            assert_eq!(settings.strategy.strategy, StrategyKind::Bundle);
            assert_eq!(settings.strategy.tip.as_u64(), 100_000);
            assert_eq!(settings.strategy.relay_urls.len(), 1);
        }
    }

    #[test]
    fn rejects_zero_poll_interval() {
        let settings = settings_from(&Vec::new(), "poll_interval_ms = 0", "");
        assert!(matches!(
            settings,
            Some(Err(SettingsError::Execution(
                ExecutionSettingsError::ZeroInterval { .. }
            )))
        ));
    }

    #[test]
    fn rejects_unknown_strategy() {
        let settings = settings_from(&Vec::new(), "strategy = \"smoke_signal\"", "");
        assert!(matches!(
            settings,
            Some(Err(SettingsError::Execution(
                ExecutionSettingsError::InvalidStrategy
            )))
        ));
    }

    #[test]
    fn zero_max_wait_disables_wall_clock_ceiling() {
        let settings = settings_from(&Vec::new(), "max_wait_ms = 0", "");
        assert!(matches!(settings, Some(Ok(_))));
        if let Some(Ok(settings)) = settings {
            assert_eq!(settings.executor.max_wait, None);
        }
    }

    #[test]
    fn probe_lamports_come_from_cli() {
        let settings = settings_from(&["--lamports".to_owned(), "5000".to_owned()], "", "");
        assert!(matches!(settings, Some(Ok(_))));
        if let Some(Ok(settings)) = settings {
            assert_eq!(settings.probe_lamports.as_u64(), 5_000);
        }

        let invalid = settings_from(&["--lamports".to_owned(), "zero".to_owned()], "", "");
        assert!(matches!(
            invalid,
            Some(Err(SettingsError::Execution(
                ExecutionSettingsError::InvalidProbeLamports
            )))
        ));
    }
}
