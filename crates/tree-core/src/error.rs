use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("photo panel {index} is out of range (scene has {count} panels)")]
    PanelOutOfRange { index: usize, count: usize },
}
