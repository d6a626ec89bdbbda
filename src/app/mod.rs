// Application layer - Use case interactors

pub mod container;
pub mod loop_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use loop_interactor::{CleanupSummary, LoopInteractor, LoopReport, LoopRequest, PlanPreview};
