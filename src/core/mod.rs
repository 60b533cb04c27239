pub mod classify;
pub mod defaults;
pub mod format;
pub mod inspect;
pub mod locator;
pub mod resolver;
pub mod scopes;

pub use crate::domain::model::{
    HostScope, Origin, PreferenceValue, ResolutionResult, TypeTag, UserScope,
};
pub use crate::domain::ports::PreferenceStore;
pub use crate::utils::error::Result;
