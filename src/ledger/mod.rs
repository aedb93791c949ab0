// Ledger module
//
// The append-only core of the chain:
// - Transaction and its kinds
// - Candidate and sealed block structures with proof-of-work sealing
// - The ledger (chain) with append validation and balance derivation
// - The miner, which screens batches and seals blocks

pub mod block;
pub mod chain;
pub mod miner;
pub mod transaction;

// Re-export main components for easier access
pub use block::{Block, CandidateBlock, MINING_REWARD};
pub use chain::{ChainError, Ledger};
pub use miner::Miner;
pub use transaction::{Transaction, TransactionKind, SYSTEM_ADDRESS};
