mod linking;
mod state;
#[cfg(test)]
mod tests;
mod view;

pub use linking::{AccountLinking, NoopLinking};
pub use state::{LedgerAction, LedgerState};
pub use view::{LedgerEvent, LedgerView};
