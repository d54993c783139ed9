//! Menu list controller and the state it keeps in sync with the remote store.

pub mod controller;
pub mod state;

pub use controller::{MenuController, MenuSession};
pub use state::{apply_event, MenuState, ModalState};
