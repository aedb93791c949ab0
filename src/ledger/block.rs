use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::info;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::transaction::Transaction;

/// Fixed reward credited to the miner of every sealed block
pub const MINING_REWARD: Decimal = dec!(20);

/// A block under construction: transactions collected, proof-of-work not yet
/// found. Sealing consumes the candidate, so a block can never be mined
/// twice.
#[derive(Debug)]
pub struct CandidateBlock {
    id: String,
    transactions: Vec<Transaction>,
    previous_hash: Option<String>,
    timestamp: i64,
    nonce: u64,
    tx_digest: String,
    hash: String,
}

impl CandidateBlock {
    /// Creates a new candidate block.
    ///
    /// The hash is computed immediately at nonce 0; it only satisfies a
    /// difficulty target after `seal` has run.
    pub fn new(
        transactions: Vec<Transaction>,
        previous_hash: Option<String>,
        timestamp: i64,
    ) -> Self {
        let tx_digest = transactions_digest(&transactions);
        let mut candidate = CandidateBlock {
            id: Uuid::new_v4().to_string(),
            transactions,
            previous_hash,
            timestamp,
            nonce: 0,
            tx_digest,
            hash: String::new(),
        };
        candidate.hash = candidate.calculate_hash();
        candidate
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Calculates the block hash: SHA-256 over the previous hash (empty
    /// string for genesis), timestamp, nonce and the content digest of the
    /// transaction list, rendered as base64.
    fn calculate_hash(&self) -> String {
        let previous = self.previous_hash.as_deref().unwrap_or("");
        let source = format!(
            "{}{}{}{}",
            previous, self.timestamp, self.nonce, self.tx_digest
        );

        let mut hasher = Sha256::new();
        hasher.update(source.as_bytes());
        BASE64.encode(hasher.finalize())
    }

    /// Mines the block: increments the nonce and recomputes the hash until
    /// the first `difficulty` characters are all `'0'`, then appends the
    /// reward transaction for the miner and freezes the block.
    ///
    /// The search runs in expected 64^difficulty attempts against the
    /// base64 alphabet, unbounded in the worst case.
    pub fn seal(mut self, difficulty: usize, miner_address: &str) -> Block {
        let target = "0".repeat(difficulty);
        while !self.hash.starts_with(&target) {
            self.nonce += 1;
            self.hash = self.calculate_hash();
        }

        info!(
            "mined block id={} hash={} nonce={}, rewarding {} to address={}",
            self.id, self.hash, self.nonce, MINING_REWARD, miner_address
        );
        self.transactions
            .push(Transaction::new_reward(miner_address, MINING_REWARD));

        Block {
            id: self.id,
            hash: self.hash,
            previous_hash: self.previous_hash,
            transactions: self.transactions,
            timestamp: self.timestamp,
            nonce: self.nonce,
        }
    }
}

/// A sealed block: proof-of-work found, miner reward appended, content
/// frozen. Only the ledger decides whether it joins the chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    id: String,
    hash: String,
    previous_hash: Option<String>,
    transactions: Vec<Transaction>,
    timestamp: i64,
    nonce: u64,
}

impl Block {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn previous_hash(&self) -> Option<&str> {
        self.previous_hash.as_deref()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }
}

/// Content digest of a transaction list: SHA-256 over each transaction's
/// id, addresses, amount and kind in list order, rendered as hex. Depends
/// only on transaction content, so the block hash is reproducible.
fn transactions_digest(transactions: &[Transaction]) -> String {
    let mut hasher = Sha256::new();
    for tx in transactions {
        hasher.update(tx.id.as_bytes());
        hasher.update(tx.from.as_bytes());
        hasher.update(tx.to.as_bytes());
        hasher.update(tx.amount.to_string().as_bytes());
        hasher.update(tx.kind.as_str().as_bytes());
    }
    hex::encode(hasher.finalize())
}
