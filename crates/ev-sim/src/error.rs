use ev_core::EvError;
use ev_stats::StatsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("no vehicles to simulate")]
    EmptyFleet,

    #[error("failed to spawn {stage} stage: {source}")]
    Spawn {
        stage:  &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} stage panicked")]
    StagePanicked(&'static str),

    #[error("report error: {0}")]
    Report(#[from] StatsError),

    #[error(transparent)]
    Core(#[from] EvError),
}

pub type EngineResult<T> = Result<T, EngineError>;
