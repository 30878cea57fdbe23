// Wallet module - THE COMPOSITION POINT
// Binds the active mint's metadata into a session and wires the state layer

mod session;
mod state;

pub use session::{WalletOptions, WalletSession, DEFAULT_UNIT};
pub use state::Wallet;
