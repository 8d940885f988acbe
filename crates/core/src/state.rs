//! Ledger states - immutable funds and auction records

use crate::party::Party;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Why a given version of a funds balance exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FundsTxType {
    /// Funds deposited from an external wallet
    NewFunds,
    /// Balance reduced by a bid the owner placed
    NewBid,
    /// Balance refunded because the owner was outbid
    BidOvertaken,
}

/// A version of the balance held for one external wallet address.
///
/// # Invariant
/// Under correct operation at most one unconsumed `FundsAccount` exists per
/// address. The type does not enforce this; builders preserve it by always
/// consuming the current version before producing the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundsAccount {
    pub tx_type: FundsTxType,
    pub balance: Decimal,
    pub address: String,
    pub initiator: Party,
    pub counterparty: Party,
}

impl FundsAccount {
    pub fn new(
        tx_type: FundsTxType,
        balance: Decimal,
        address: impl Into<String>,
        initiator: Party,
        counterparty: Party,
    ) -> Self {
        Self {
            tx_type,
            balance,
            address: address.into(),
            initiator,
            counterparty,
        }
    }

    /// Next version of this account with a new balance and reason
    pub fn with_balance(&self, tx_type: FundsTxType, balance: Decimal) -> Self {
        Self {
            tx_type,
            balance,
            ..self.clone()
        }
    }

    /// Re-assign the signing parties (each new version is co-signed by the
    /// parties building it)
    pub fn between(mut self, initiator: Party, counterparty: Party) -> Self {
        self.initiator = initiator;
        self.counterparty = counterparty;
        self
    }

    pub fn participants(&self) -> [&Party; 2] {
        [&self.initiator, &self.counterparty]
    }
}

/// A version of an NFT auction record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionItem {
    pub bid_count: u32,
    pub auction_closed: bool,
    pub minimum_bid: Decimal,
    pub current_bid: Decimal,
    pub current_bidder: String,
    pub item_id: String,
    pub initiator: Party,
    pub counterparty: Party,
}

impl AuctionItem {
    /// A freshly issued item: no bids, open auction
    pub fn issue(
        item_id: impl Into<String>,
        minimum_bid: Decimal,
        initiator: Party,
        counterparty: Party,
    ) -> Self {
        Self {
            bid_count: 0,
            auction_closed: false,
            minimum_bid,
            current_bid: Decimal::ZERO,
            current_bidder: String::new(),
            item_id: item_id.into(),
            initiator,
            counterparty,
        }
    }

    /// Next version after a successful bid
    pub fn with_bid(&self, amount: Decimal, bidder: impl Into<String>) -> Self {
        Self {
            bid_count: self.bid_count + 1,
            current_bid: amount,
            current_bidder: bidder.into(),
            ..self.clone()
        }
    }

    /// Next version with the auction closed
    pub fn closed(&self) -> Self {
        Self {
            auction_closed: true,
            ..self.clone()
        }
    }

    pub fn between(mut self, initiator: Party, counterparty: Party) -> Self {
        self.initiator = initiator;
        self.counterparty = counterparty;
        self
    }

    pub fn has_bids(&self) -> bool {
        self.bid_count > 0
    }

    pub fn participants(&self) -> [&Party; 2] {
        [&self.initiator, &self.counterparty]
    }
}

/// Discriminant of a ledger state, used by typed queries and error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum StateKind {
    FundsAccount,
    AuctionItem,
}

/// Any state that can be consumed or produced by a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerState {
    Funds(FundsAccount),
    Item(AuctionItem),
}

impl LedgerState {
    pub fn kind(&self) -> StateKind {
        match self {
            LedgerState::Funds(_) => StateKind::FundsAccount,
            LedgerState::Item(_) => StateKind::AuctionItem,
        }
    }

    pub fn as_funds(&self) -> Option<&FundsAccount> {
        match self {
            LedgerState::Funds(funds) => Some(funds),
            LedgerState::Item(_) => None,
        }
    }

    pub fn as_item(&self) -> Option<&AuctionItem> {
        match self {
            LedgerState::Item(item) => Some(item),
            LedgerState::Funds(_) => None,
        }
    }

    pub fn participants(&self) -> [&Party; 2] {
        match self {
            LedgerState::Funds(funds) => funds.participants(),
            LedgerState::Item(item) => item.participants(),
        }
    }
}

impl From<FundsAccount> for LedgerState {
    fn from(funds: FundsAccount) -> Self {
        LedgerState::Funds(funds)
    }
}

impl From<AuctionItem> for LedgerState {
    fn from(item: AuctionItem) -> Self {
        LedgerState::Item(item)
    }
}
