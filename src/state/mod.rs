pub mod error;
pub mod event;
pub mod lock;
pub mod machine;
pub mod model;

pub use error::{StateError, StateResult};
pub use event::{ReaderEvent, StateTransition};
pub use lock::ControlLock;
pub use machine::StateMachine;
pub use model::ReaderState;
