use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reserved sender address for system-originated transactions (top-ups and
/// mining rewards). A sentinel string keeps the "no empty addresses"
/// invariant total instead of special-casing a missing sender.
pub const SYSTEM_ADDRESS: &str = "blockchain-system";

/// The kind of economic event a transaction represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    TopUp,
    Transfer,
    Reward,
    Fee,
}

impl TransactionKind {
    /// Kinds that increase the receiver's balance
    pub fn is_credit(self) -> bool {
        matches!(self, Self::TopUp | Self::Transfer | Self::Reward)
    }

    /// Kinds that decrease the sender's balance
    pub fn is_debit(self) -> bool {
        matches!(self, Self::Transfer | Self::Fee)
    }

    /// Stable label, used when deriving the content digest of a block
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopUp => "TOP_UP",
            Self::Transfer => "TRANSFER",
            Self::Reward => "REWARD",
            Self::Fee => "FEE",
        }
    }
}

/// An immutable economic event recorded in a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier for the transaction
    pub id: String,

    /// Sender's address
    pub from: String,

    /// Recipient's address
    pub to: String,

    /// Amount being moved, exact decimal
    pub amount: Decimal,

    /// Semantic kind of the transaction
    pub kind: TransactionKind,
}

impl Transaction {
    /// Creates a new transaction with a fresh identifier.
    ///
    /// Addresses are not checked here; malformed transactions are rejected
    /// when their block is appended to the ledger.
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        amount: Decimal,
        kind: TransactionKind,
    ) -> Self {
        Transaction {
            id: Uuid::new_v4().to_string(),
            from: from.into(),
            to: to.into(),
            amount,
            kind,
        }
    }

    /// Creates a mining reward transaction from the system address
    pub fn new_reward(miner_address: impl Into<String>, amount: Decimal) -> Self {
        Transaction::new(SYSTEM_ADDRESS, miner_address, amount, TransactionKind::Reward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_transaction() {
        let tx = Transaction::new("Alice", "Bob", dec!(10.5), TransactionKind::Transfer);

        assert_eq!(tx.from, "Alice");
        assert_eq!(tx.to, "Bob");
        assert_eq!(tx.amount, dec!(10.5));
        assert_eq!(tx.kind, TransactionKind::Transfer);
        assert!(!tx.id.is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let tx1 = Transaction::new("Alice", "Bob", dec!(1), TransactionKind::Transfer);
        let tx2 = Transaction::new("Alice", "Bob", dec!(1), TransactionKind::Transfer);

        assert_ne!(tx1.id, tx2.id);
        assert_ne!(tx1, tx2);
    }

    #[test]
    fn test_reward_transaction() {
        let tx = Transaction::new_reward("miner1", dec!(20));

        assert_eq!(tx.from, SYSTEM_ADDRESS);
        assert_eq!(tx.to, "miner1");
        assert_eq!(tx.amount, dec!(20));
        assert_eq!(tx.kind, TransactionKind::Reward);
    }

    #[test]
    fn test_kind_semantics() {
        assert!(TransactionKind::TopUp.is_credit());
        assert!(TransactionKind::Transfer.is_credit());
        assert!(TransactionKind::Reward.is_credit());
        assert!(!TransactionKind::Fee.is_credit());

        assert!(TransactionKind::Transfer.is_debit());
        assert!(TransactionKind::Fee.is_debit());
        assert!(!TransactionKind::TopUp.is_debit());
        assert!(!TransactionKind::Reward.is_debit());
    }
}
