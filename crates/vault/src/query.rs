//! Query port

use crate::error::QueryError;
use async_trait::async_trait;
use bestbid_core::{LedgerState, StateKind};
use bestbid_ledger::StateAndRef;
use serde::{Deserialize, Serialize};

/// Typed lookup over current states
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateQuery {
    /// `FundsAccount` where `address` equals the value
    FundsByAddress(String),
    /// `AuctionItem` where `item_id` equals the value
    ItemById(String),
    AllFunds,
    AllItems,
}

impl StateQuery {
    pub fn kind(&self) -> StateKind {
        match self {
            StateQuery::FundsByAddress(_) | StateQuery::AllFunds => StateKind::FundsAccount,
            StateQuery::ItemById(_) | StateQuery::AllItems => StateKind::AuctionItem,
        }
    }

    pub fn matches(&self, state: &LedgerState) -> bool {
        match (self, state) {
            (StateQuery::FundsByAddress(address), LedgerState::Funds(funds)) => {
                &funds.address == address
            }
            (StateQuery::ItemById(item_id), LedgerState::Item(item)) => &item.item_id == item_id,
            (StateQuery::AllFunds, LedgerState::Funds(_)) => true,
            (StateQuery::AllItems, LedgerState::Item(_)) => true,
            _ => false,
        }
    }
}

/// Read access to the current (unconsumed) ledger states.
///
/// Implementations must never return a state that has been consumed.
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    async fn find_unconsumed(&self, query: &StateQuery) -> Result<Vec<StateAndRef>, QueryError>;

    /// At most one match is expected; the first one is returned
    async fn find_one(&self, query: &StateQuery) -> Result<Option<StateAndRef>, QueryError> {
        Ok(self.find_unconsumed(query).await?.into_iter().next())
    }
}
