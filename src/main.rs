use anyhow::Result;
use log::info;
use rust_decimal_macros::dec;

mod ledger;

use ledger::{Ledger, Miner, Transaction, TransactionKind, SYSTEM_ADDRESS};

const MINING_DIFFICULTY: usize = 2;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let ledger = Ledger::new();
    let miner = Miner::new(MINING_DIFFICULTY, "miner1", ledger.clone());

    let genesis = miner.generate_block(opening_batch(), None);
    let genesis_hash = genesis.hash().to_string();
    ledger.add_genesis_block(genesis, MINING_DIFFICULTY)?;

    let block = miner.generate_block(follow_up_batch(), Some(genesis_hash));
    ledger.add_block(block, MINING_DIFFICULTY)?;

    info!("chain height: {}", ledger.height());
    if let Some(tip) = ledger.latest_block() {
        info!(
            "chain tip: id={} hash={} nonce={} timestamp={}",
            tip.id(),
            tip.hash(),
            tip.nonce(),
            tip.timestamp()
        );
    }

    if let Some(genesis) = ledger.genesis_block() {
        println!("{}", serde_json::to_string_pretty(&genesis)?);
    }
    for address in [
        "Alice", "Bob", "Toby", "Ken", "Josh", "Marie", "Hellen", "miner1",
    ] {
        println!("{address}: {}", ledger.balance_of(address));
    }

    Ok(())
}

fn opening_batch() -> Vec<Transaction> {
    vec![
        Transaction::new(SYSTEM_ADDRESS, "Alice", dec!(24), TransactionKind::TopUp),
        Transaction::new(SYSTEM_ADDRESS, "Ken", dec!(200), TransactionKind::TopUp),
        Transaction::new(SYSTEM_ADDRESS, "Marie", dec!(300), TransactionKind::TopUp),
        Transaction::new("Alice", "Bob", dec!(23), TransactionKind::Transfer),
        Transaction::new("Ken", "Josh", dec!(100), TransactionKind::Transfer),
        Transaction::new("Marie", "Hellen", dec!(200), TransactionKind::Transfer),
    ]
}

fn follow_up_batch() -> Vec<Transaction> {
    // Bob only holds 23 at this point; the miner drops this transfer and
    // the block still carries its reward transaction.
    vec![Transaction::new(
        "Bob",
        "Toby",
        dec!(25),
        TransactionKind::Transfer,
    )]
}
