use workbench_macros::config;

use crate::{logger::LogLevel, pda::AcceptanceCriterion};

pub trait IntoOr<T> {
    fn into_or(self, or: T) -> T;
}

impl<T> IntoOr<Option<T>> for Option<T> {
    fn into_or(self, or: Option<T>) -> Option<T> {
        match self {
            Some(t) => Some(t),
            None => or,
        }
    }
}

impl<T> IntoOr<T> for Option<T> {
    fn into_or(self, or: T) -> T {
        self.unwrap_or(or)
    }
}

pub trait GeneralConfig {
    fn logger(&self) -> &LoggerConfig;
}

config! {
    pub struct LoggerConfig {
        enabled: bool = false,
        log_file: bool = false,
        log_level: LogLevel = LogLevel::Warn,
    }
}

config! {
    /// Bounds and acceptance rules of the pushdown configuration search.
    pub struct PdaConfig {
        /// Hard cap on the number of configurations created during one search.
        max_configurations: usize = 10_000,
        /// Rounds performed by a single unattended fast run.
        fast_run_rounds: usize = 500,
        acceptance: AcceptanceCriterion = AcceptanceCriterion::FinalState,
        /// Stack contents of the root configuration, top first.
        initial_stack: String = String::from("Z"),
    }
}

config! {
    pub struct TmConfig {
        /// Steps performed by an unattended fast run before the machine is
        /// reported as halted.
        step_budget: usize = 1000,
    }
}

config! {
    pub struct WorkbenchConfig {
        pda: PdaConfig (Option<PartialPdaConfig> = PdaConfig::default()),
        tm: TmConfig (Option<PartialTmConfig> = TmConfig::default()),
        logger: LoggerConfig (Option<PartialLoggerConfig> = LoggerConfig::default()),
    }
}

impl GeneralConfig for WorkbenchConfig {
    fn logger(&self) -> &LoggerConfig {
        &self.logger
    }
}

#[test]
fn test_partial_config_keeps_defaults() {
    let config = WorkbenchConfig::from_toml_str(
        r#"
        [pda]
        max_configurations = 50
        acceptance = "EmptyStack"

        [logger]
        enabled = true
        "#,
    )
    .unwrap();

    assert_eq!(*config.pda.get_max_configurations(), 50);
    assert_eq!(*config.pda.get_fast_run_rounds(), 500);
    assert_eq!(*config.pda.get_acceptance(), AcceptanceCriterion::EmptyStack);
    assert_eq!(config.pda.get_initial_stack(), "Z");
    assert_eq!(*config.tm.get_step_budget(), 1000);
    assert!(*config.logger().get_enabled());
    assert_eq!(*config.logger().get_log_level(), LogLevel::Warn);
}

#[test]
fn test_empty_config_is_default() {
    let config = WorkbenchConfig::from_toml_str("").unwrap();
    assert_eq!(config, WorkbenchConfig::default());
}
