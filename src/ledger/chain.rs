use std::sync::{Arc, RwLock};

use log::info;
use rust_decimal::Decimal;
use thiserror::Error;

use super::block::Block;
use super::transaction::Transaction;

/// Errors that can reject a block at append time. A rejected block leaves
/// the chain untouched.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("cannot add block id={block_id} as genesis: the ledger already holds {height} block(s)")]
    NonEmptyLedger { block_id: String, height: usize },

    #[error("block id={block_id} does not link to the current chain tip")]
    BrokenLinkage { block_id: String },

    #[error("hash of block id={block_id} does not satisfy difficulty={difficulty}")]
    InsufficientWork { block_id: String, difficulty: usize },

    #[error("block id={block_id} has an empty transaction list")]
    EmptyBlock { block_id: String },

    #[error("transaction id={tx_id} has an empty 'from' or 'to' address")]
    MissingAddress { tx_id: String },

    #[error("transaction id={tx_id} sends from address '{address}' to itself")]
    SelfDirected { tx_id: String, address: String },
}

/// The chain: an append-only sequence of sealed blocks.
///
/// A `Ledger` is a cheap handle; clones share the same chain. Appends run
/// as one atomic check-then-push under the write lock, so concurrent miners
/// can never link against a stale tip. Reads share the read lock.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    blocks: Arc<RwLock<Vec<Block>>>,
}

impl Ledger {
    /// Creates an empty ledger
    pub fn new() -> Self {
        Ledger {
            blocks: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Appends the genesis block.
    ///
    /// Fails if the ledger already contains any block. The genesis block is
    /// exempt from the previous-hash check but not from the rest of the
    /// validation.
    pub fn add_genesis_block(&self, block: Block, difficulty: usize) -> Result<(), ChainError> {
        let mut blocks = self.blocks.write().unwrap();

        if !blocks.is_empty() {
            return Err(ChainError::NonEmptyLedger {
                block_id: block.id().to_string(),
                height: blocks.len(),
            });
        }
        validate_block(&block, difficulty)?;

        info!("appended genesis block id={} hash={}", block.id(), block.hash());
        blocks.push(block);
        Ok(())
    }

    /// Appends a block to the chain.
    ///
    /// Fails if the ledger is empty or the block's previous hash does not
    /// match the current tip, and otherwise runs the shared validation.
    /// All-or-nothing: a failing block is never partially applied.
    pub fn add_block(&self, block: Block, difficulty: usize) -> Result<(), ChainError> {
        let mut blocks = self.blocks.write().unwrap();

        let links_to_tip = matches!(
            (blocks.last(), block.previous_hash()),
            (Some(tip), Some(previous)) if previous == tip.hash()
        );
        if !links_to_tip {
            return Err(ChainError::BrokenLinkage {
                block_id: block.id().to_string(),
            });
        }
        validate_block(&block, difficulty)?;

        info!(
            "appended block id={} hash={} at height {}",
            block.id(),
            block.hash(),
            blocks.len()
        );
        blocks.push(block);
        Ok(())
    }

    /// Returns the most recently appended block, or `None` on an empty ledger
    pub fn latest_block(&self) -> Option<Block> {
        self.blocks.read().unwrap().last().cloned()
    }

    /// Returns the genesis block, or `None` on an empty ledger
    pub fn genesis_block(&self) -> Option<Block> {
        self.blocks.read().unwrap().first().cloned()
    }

    /// Number of blocks in the chain
    pub fn height(&self) -> usize {
        self.blocks.read().unwrap().len()
    }

    /// Derives the balance of an address by replaying every transaction of
    /// every block in chain order: debit kinds subtract where the address
    /// is the sender, credit kinds add where it is the receiver.
    ///
    /// Exact decimal arithmetic throughout; O(total transactions).
    pub fn balance_of(&self, address: &str) -> Decimal {
        let blocks = self.blocks.read().unwrap();

        let mut balance = Decimal::ZERO;
        for block in blocks.iter() {
            for tx in block.transactions() {
                if tx.kind.is_debit() && tx.from == address {
                    balance -= tx.amount;
                } else if tx.kind.is_credit() && tx.to == address {
                    balance += tx.amount;
                }
            }
        }
        balance
    }
}

/// Validation shared by both append paths: proof-of-work prefix, non-empty
/// transaction list, well-formed addresses.
fn validate_block(block: &Block, difficulty: usize) -> Result<(), ChainError> {
    if !block.hash().starts_with(&"0".repeat(difficulty)) {
        return Err(ChainError::InsufficientWork {
            block_id: block.id().to_string(),
            difficulty,
        });
    }
    if block.transactions().is_empty() {
        return Err(ChainError::EmptyBlock {
            block_id: block.id().to_string(),
        });
    }
    for tx in block.transactions() {
        validate_transaction(tx)?;
    }
    Ok(())
}

fn validate_transaction(tx: &Transaction) -> Result<(), ChainError> {
    if tx.from.is_empty() || tx.to.is_empty() {
        return Err(ChainError::MissingAddress {
            tx_id: tx.id.clone(),
        });
    }
    if tx.from == tx.to {
        return Err(ChainError::SelfDirected {
            tx_id: tx.id.clone(),
            address: tx.from.clone(),
        });
    }
    Ok(())
}
