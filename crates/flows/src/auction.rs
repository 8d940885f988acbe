//! Auction builders: issue, bid, end

use crate::context::{FinalizedTransaction, FlowContext};
use crate::error::FlowError;
use bestbid_core::{AuctionItem, FundsAccount, FundsTxType, Party};
use bestbid_ledger::{Command, StateAndRef};
use bestbid_vault::StateQuery;
use rust_decimal::Decimal;
use tracing::info;

fn item_not_found(item_id: &str) -> FlowError {
    FlowError::NotFound(format!("NFT with {} doesn't exist", item_id))
}

fn user_not_found(address: &str) -> FlowError {
    FlowError::NotFound(format!("User with address {} not found", address))
}

fn overflow() -> FlowError {
    FlowError::MalformedProposal("Balance overflow".to_string())
}

async fn current_item(ctx: &FlowContext, item_id: &str) -> Result<(StateAndRef, AuctionItem), FlowError> {
    let found = ctx
        .find_one(StateQuery::ItemById(item_id.to_string()))
        .await?
        .ok_or_else(|| item_not_found(item_id))?;
    let item = found.state.as_item().cloned().ok_or_else(|| item_not_found(item_id))?;
    Ok((found, item))
}

async fn current_funds(ctx: &FlowContext, address: &str) -> Result<(StateAndRef, FundsAccount), FlowError> {
    let found = ctx
        .find_one(StateQuery::FundsByAddress(address.to_string()))
        .await?
        .ok_or_else(|| user_not_found(address))?;
    let funds = found.state.as_funds().cloned().ok_or_else(|| user_not_found(address))?;
    Ok((found, funds))
}

/// Issue a new auction item with no bids
pub async fn issue_item(
    ctx: &FlowContext,
    minimum_bid: Decimal,
    item_id: &str,
    counterparty: &Party,
) -> Result<FinalizedTransaction, FlowError> {
    info!(%item_id, %minimum_bid, "Issuing item");

    if ctx
        .find_one(StateQuery::ItemById(item_id.to_string()))
        .await?
        .is_some()
    {
        return Err(FlowError::AlreadyExists(format!(
            "Nft with id {} is already created",
            item_id
        )));
    }

    let item = AuctionItem::issue(item_id, minimum_bid, ctx.me.clone(), counterparty.clone());
    let tx = ctx
        .transaction(counterparty)
        .command(Command::Issue)
        .output(item)
        .build()?;
    let finalized = ctx.finalize(tx).await?;

    info!(%item_id, tx_id = %finalized.tx_id.short(), "Item issued");
    Ok(finalized)
}

/// Bid `amount` from `bidder_address` on `item_id`.
///
/// The first bid consumes the item and the bidder's funds. Later bids also
/// consume the current bidder's funds and refund them the item's current bid.
pub async fn place_bid(
    ctx: &FlowContext,
    amount: Decimal,
    bidder_address: &str,
    item_id: &str,
    counterparty: &Party,
) -> Result<FinalizedTransaction, FlowError> {
    info!(%item_id, bidder = %bidder_address, %amount, "Placing bid");

    let (item_ref, item) = current_item(ctx, item_id).await?;
    let (bidder_ref, bidder) = current_funds(ctx, bidder_address).await?;

    // Same funds account would be consumed twice
    if item.has_bids() && item.current_bidder == bidder_address {
        return Err(FlowError::MalformedProposal(
            "New bidder cannot be the same as current bidder".to_string(),
        ));
    }

    let me = ctx.me.clone();
    let item_out = item
        .with_bid(amount, bidder_address)
        .between(me.clone(), counterparty.clone());
    let remaining = bidder.balance.checked_sub(amount).ok_or_else(overflow)?;
    let bidder_out = bidder
        .with_balance(FundsTxType::NewBid, remaining)
        .between(me.clone(), counterparty.clone());

    let mut builder = ctx
        .transaction(counterparty)
        .command(Command::PlaceBid { amount })
        .input(item_ref)
        .input(bidder_ref)
        .output(item_out)
        .output(bidder_out);

    if item.has_bids() {
        let (overtaken_ref, overtaken) = current_funds(ctx, &item.current_bidder).await?;
        let refund = overtaken
            .balance
            .checked_add(item.current_bid)
            .ok_or_else(overflow)?;
        builder = builder.input(overtaken_ref).output(
            overtaken
                .with_balance(FundsTxType::BidOvertaken, refund)
                .between(me, counterparty.clone()),
        );
    }

    let tx = builder.build()?;
    let finalized = ctx.finalize(tx).await?;

    info!(%item_id, bidder = %bidder_address, tx_id = %finalized.tx_id.short(), "Bid placed");
    Ok(finalized)
}

/// Close the auction for `item_id`, keeping the winning bid
pub async fn end_auction(
    ctx: &FlowContext,
    item_id: &str,
    counterparty: &Party,
) -> Result<FinalizedTransaction, FlowError> {
    info!(%item_id, "Ending auction");

    let (item_ref, item) = current_item(ctx, item_id).await?;
    if item.auction_closed {
        return Err(FlowError::NotFound(format!(
            "Auction for NFT {} is already closed",
            item_id
        )));
    }

    let tx = ctx
        .transaction(counterparty)
        .command(Command::EndAuction)
        .input(item_ref)
        .output(item.closed().between(ctx.me.clone(), counterparty.clone()))
        .build()?;
    let finalized = ctx.finalize(tx).await?;

    info!(%item_id, winner = %item.current_bidder, tx_id = %finalized.tx_id.short(), "Auction ended");
    Ok(finalized)
}
