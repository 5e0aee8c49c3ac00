use thiserror::Error;

#[derive(Error, Debug)]
pub enum NexusError {
    #[error("Données indisponibles : {available} tirages obtenus, {required} requis")]
    DataUnavailable { available: usize, required: usize },

    #[error("Historique insuffisant : {len} tirages, au moins {required} requis pour la fenêtre")]
    InsufficientHistory { len: usize, required: usize },

    #[error("Configuration invalide : {0}")]
    InvalidConfig(String),

    #[error("Erreur de données : {0:#}")]
    Data(#[from] anyhow::Error),

    #[error("Erreur de sérialisation : {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Erreur d'E/S : {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NexusError>;
