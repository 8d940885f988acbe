//! CLI commands

use crate::context::AppContext;
use bestbid_core::FundsTxType;
use bestbid_events::EventReader;
use bestbid_flows::{add_funds as add_funds_flow, end_auction as end_auction_flow, issue_item, place_bid};
use bestbid_ledger::{verify_chain, LedgerError};
use bestbid_vault::{LedgerQuery, StateQuery};
use rust_decimal::Decimal;

/// Issue a new auction item
pub async fn issue(ctx: &AppContext, item_id: &str, minimum_bid: Decimal) -> Result<(), anyhow::Error> {
    let finalized = issue_item(&ctx.flows, minimum_bid, item_id, &ctx.counterparty()).await?;

    println!(
        "✅ Issued item {} with minimum bid {} (tx: {})",
        item_id,
        minimum_bid,
        finalized.tx_id.short()
    );
    Ok(())
}

/// Credit funds to a wallet address
pub async fn add_funds(ctx: &AppContext, address: &str, amount: Decimal) -> Result<(), anyhow::Error> {
    let finalized = add_funds_flow(
        &ctx.flows,
        FundsTxType::NewFunds,
        amount,
        address,
        &ctx.counterparty(),
    )
    .await?;

    let balance = finalized
        .transaction
        .outputs
        .first()
        .and_then(|state| state.as_funds())
        .map(|funds| funds.balance)
        .unwrap_or(amount);

    println!(
        "✅ Added {} to {} (balance: {}, tx: {})",
        amount,
        address,
        balance,
        finalized.tx_id.short()
    );
    Ok(())
}

/// Place a bid on an item
pub async fn bid(ctx: &AppContext, item_id: &str, address: &str, amount: Decimal) -> Result<(), anyhow::Error> {
    let finalized = place_bid(&ctx.flows, amount, address, item_id, &ctx.counterparty()).await?;

    println!(
        "✅ {} bid {} on item {} (tx: {})",
        address,
        amount,
        item_id,
        finalized.tx_id.short()
    );
    Ok(())
}

/// Close an auction
pub async fn end_auction(ctx: &AppContext, item_id: &str) -> Result<(), anyhow::Error> {
    let finalized = end_auction_flow(&ctx.flows, item_id, &ctx.counterparty()).await?;

    let winner = finalized
        .transaction
        .outputs
        .first()
        .and_then(|state| state.as_item())
        .filter(|item| item.has_bids())
        .map(|item| format!("{} at {}", item.current_bidder, item.current_bid))
        .unwrap_or_else(|| "no bids".to_string());

    println!(
        "✅ Auction for item {} ended: {} (tx: {})",
        item_id,
        winner,
        finalized.tx_id.short()
    );
    Ok(())
}

/// List current funds accounts
pub async fn funds(ctx: &AppContext, address: Option<&str>) -> Result<(), anyhow::Error> {
    let query = match address {
        Some(address) => StateQuery::FundsByAddress(address.to_string()),
        None => StateQuery::AllFunds,
    };
    let found = ctx.vault.find_unconsumed(&query).await?;

    if found.is_empty() {
        println!("No funds accounts found");
        return Ok(());
    }

    println!("{:<24} {:>16} {:<14}", "ADDRESS", "BALANCE", "LAST CHANGE");
    for state in &found {
        if let Some(account) = state.state.as_funds() {
            println!(
                "{:<24} {:>16} {:<14}",
                account.address, account.balance, account.tx_type
            );
        }
    }
    Ok(())
}

/// List current auction items
pub async fn items(ctx: &AppContext, item_id: Option<&str>) -> Result<(), anyhow::Error> {
    let query = match item_id {
        Some(item_id) => StateQuery::ItemById(item_id.to_string()),
        None => StateQuery::AllItems,
    };
    let found = ctx.vault.find_unconsumed(&query).await?;

    if found.is_empty() {
        println!("No items found");
        return Ok(());
    }

    println!(
        "{:<12} {:>10} {:>10} {:>5} {:<24} {:<6}",
        "ITEM", "MIN BID", "CURRENT", "BIDS", "BIDDER", "STATUS"
    );
    for state in &found {
        if let Some(item) = state.state.as_item() {
            println!(
                "{:<12} {:>10} {:>10} {:>5} {:<24} {:<6}",
                item.item_id,
                item.minimum_bid,
                item.current_bid,
                item.bid_count,
                item.current_bidder,
                if item.auction_closed { "closed" } else { "open" }
            );
        }
    }
    Ok(())
}

/// Every version of an item, consumed ones included
pub async fn history(ctx: &AppContext, item_id: &str) -> Result<(), anyhow::Error> {
    let records = ctx
        .vault
        .history(&StateQuery::ItemById(item_id.to_string()))
        .await;

    if records.is_empty() {
        anyhow::bail!("NFT with {} doesn't exist", item_id);
    }

    println!("History for item {} ({} versions)", item_id, records.len());
    for record in &records {
        let status = match &record.consumed_by {
            Some(tx_id) => format!("consumed by {}", tx_id.short()),
            None => "current".to_string(),
        };
        let state = serde_json::to_string(&record.state.state)?;
        println!("  {} [{}] {}", record.state.state_ref.tx_id.short(), status, state);
    }
    Ok(())
}

/// Journal audit summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditReport {
    pub records: usize,
    pub signatures: usize,
}

/// Verify the journal hash chain and every required signature
pub fn audit(ctx: &AppContext) -> Result<AuditReport, anyhow::Error> {
    let records = EventReader::from_directory(ctx.journal_path())?.read_all()?;

    verify_chain(&records)?;

    let mut signatures = 0;
    for record in &records {
        record
            .transaction
            .verify_signatures()
            .map_err(|e: LedgerError| anyhow::anyhow!("seq {}: {}", record.sequence, e))?;
        signatures += record.transaction.signatures.len();
    }

    println!("✅ Hash chain verified ({} records)", records.len());
    println!("✅ Signatures verified ({} signatures)", signatures);

    Ok(AuditReport {
        records: records.len(),
        signatures,
    })
}
