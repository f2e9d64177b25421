//! UI-agnostic page controllers
//!
//! State machines for the list pages, the create/edit forms and the period
//! workflow. The CLI drives them; nothing here prints.

pub mod debounce;
pub mod form;
pub mod list;
pub mod period;

pub use debounce::Debouncer;
pub use form::{FormMode, FormState};
pub use list::{ListController, LoadTicket, Spinner};
pub use period::{
    run_transition, AlwaysConfirm, Confirm, Outcome, PeriodRowActions, TerminalConfirm, Transition,
};
