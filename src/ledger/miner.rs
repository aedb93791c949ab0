use std::collections::HashMap;

use chrono::Utc;
use log::{debug, info};
use rust_decimal::Decimal;

use super::block::{Block, CandidateBlock};
use super::chain::Ledger;
use super::transaction::{Transaction, TransactionKind};

/// Outcome of simulating one transaction against the working balances.
/// Rejections are routine business outcomes, not errors, and never surface
/// to the caller of `generate_block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    RejectedInsufficientFunds {
        required: Decimal,
        available: Decimal,
    },
}

/// Result of screening a candidate batch: survivors in their original
/// relative order, plus each dropped transaction with its verdict.
#[derive(Debug, Default)]
struct BatchReport {
    accepted: Vec<Transaction>,
    rejected: Vec<(Transaction, Verdict)>,
}

/// Builds blocks from transaction batches: screens out overdrafts against
/// the chain's balances, then seals the survivors with proof-of-work.
#[derive(Debug)]
pub struct Miner {
    difficulty: usize,
    address: String,
    ledger: Ledger,
}

impl Miner {
    pub fn new(difficulty: usize, address: impl Into<String>, ledger: Ledger) -> Self {
        Miner {
            difficulty,
            address: address.into(),
            ledger,
        }
    }

    /// Builds and mines a block from a transaction batch.
    ///
    /// The batch is screened first: any transfer or fee that would drive
    /// its sender's working balance negative is dropped, where the working
    /// balance accounts for the chain's history plus earlier transactions
    /// in the same batch. Top-ups and rewards always pass. The sealed block
    /// ends with exactly one reward transaction for this miner.
    ///
    /// Mining is CPU-bound and does not touch the ledger while searching.
    pub fn generate_block(
        &self,
        transactions: Vec<Transaction>,
        previous_hash: Option<String>,
    ) -> Block {
        let report = self.screen_batch(transactions);
        for (tx, verdict) in &report.rejected {
            if let Verdict::RejectedInsufficientFunds {
                required,
                available,
            } = verdict
            {
                info!(
                    "transaction id={} declined: address '{}' holds {} of the required {}",
                    tx.id, tx.from, available, required
                );
            }
            debug!("dropped transaction id={} from the candidate block", tx.id);
        }

        let candidate = CandidateBlock::new(
            report.accepted,
            previous_hash,
            Utc::now().timestamp_millis(),
        );
        debug!(
            "mining candidate block id={} at difficulty {}",
            candidate.id(),
            self.difficulty
        );
        candidate.seal(self.difficulty, &self.address)
    }

    /// Walks the batch in order, committing each transaction against the
    /// scratch balances. Order matters: it is the commit order of the
    /// simulation.
    fn screen_batch(&self, transactions: Vec<Transaction>) -> BatchReport {
        let mut balances: HashMap<String, Decimal> = HashMap::new();
        let mut report = BatchReport::default();

        for tx in transactions {
            match self.screen_transaction(&mut balances, &tx) {
                Verdict::Accepted => report.accepted.push(tx),
                rejected => report.rejected.push((tx, rejected)),
            }
        }

        info!(
            "screened batch: {} accepted, {} rejected",
            report.accepted.len(),
            report.rejected.len()
        );
        report
    }

    fn screen_transaction(
        &self,
        balances: &mut HashMap<String, Decimal>,
        tx: &Transaction,
    ) -> Verdict {
        match tx.kind {
            TransactionKind::Transfer => {
                let available = *self.working_balance(balances, &tx.from);
                if tx.amount > available {
                    return Verdict::RejectedInsufficientFunds {
                        required: tx.amount,
                        available,
                    };
                }
                *self.working_balance(balances, &tx.from) -= tx.amount;
                *self.working_balance(balances, &tx.to) += tx.amount;
                Verdict::Accepted
            }
            TransactionKind::Fee => {
                let available = *self.working_balance(balances, &tx.from);
                if tx.amount > available {
                    return Verdict::RejectedInsufficientFunds {
                        required: tx.amount,
                        available,
                    };
                }
                *self.working_balance(balances, &tx.from) -= tx.amount;
                Verdict::Accepted
            }
            TransactionKind::Reward | TransactionKind::TopUp => {
                *self.working_balance(balances, &tx.to) += tx.amount;
                Verdict::Accepted
            }
        }
    }

    /// Scratch balance for an address, seeded lazily from the chain's
    /// derived balance on first reference.
    fn working_balance<'a>(
        &self,
        balances: &'a mut HashMap<String, Decimal>,
        address: &str,
    ) -> &'a mut Decimal {
        balances
            .entry(address.to_string())
            .or_insert_with(|| self.ledger.balance_of(address))
    }
}
