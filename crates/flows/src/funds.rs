//! AddFunds builder

use crate::context::{FinalizedTransaction, FlowContext};
use crate::error::FlowError;
use bestbid_core::{FundsAccount, FundsTxType, Party};
use bestbid_ledger::Command;
use bestbid_vault::StateQuery;
use rust_decimal::Decimal;
use tracing::info;

/// Credit `amount` to the wallet at `address`.
///
/// `amount` is a delta: the current account (if any) is consumed and replaced
/// by one holding `old + amount`. Otherwise a fresh account holding `amount`
/// is produced.
pub async fn add_funds(
    ctx: &FlowContext,
    tx_type: FundsTxType,
    amount: Decimal,
    address: &str,
    counterparty: &Party,
) -> Result<FinalizedTransaction, FlowError> {
    info!(%address, %amount, "Adding funds");

    let current = ctx
        .find_one(StateQuery::FundsByAddress(address.to_string()))
        .await?;

    let mut builder = ctx.transaction(counterparty).command(Command::AddFunds { amount });

    let output = match current {
        Some(current) => {
            let account = current
                .state
                .as_funds()
                .cloned()
                .ok_or_else(|| FlowError::NotFound(format!("User with address {} not found", address)))?;
            let balance = account
                .balance
                .checked_add(amount)
                .ok_or_else(|| FlowError::MalformedProposal("Balance overflow".to_string()))?;
            builder = builder.input(current);
            account
                .with_balance(tx_type, balance)
                .between(ctx.me.clone(), counterparty.clone())
        }
        None => FundsAccount::new(tx_type, amount, address, ctx.me.clone(), counterparty.clone()),
    };

    let tx = builder.output(output).build()?;
    let finalized = ctx.finalize(tx).await?;

    info!(%address, tx_id = %finalized.tx_id.short(), "Funds added");
    Ok(finalized)
}
