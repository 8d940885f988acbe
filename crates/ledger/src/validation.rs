//! Contract verification rules
//!
//! Each `Command` has its own rule set. Rules run in a fixed order and the
//! first failing rule rejects the whole transaction.
//!
//! Two contracts govern the ledger:
//! - the funds contract owns `FundsAccount` states (AddFunds, PlaceBid)
//! - the auction contract owns `AuctionItem` states (Issue, PlaceBid, EndAuction)
//!
//! A transaction touching a state whose contract does not know the command
//! is rejected as an unknown command.

use crate::error::ContractError;
use crate::transaction::{Command, Transaction};
use bestbid_core::{AuctionItem, FundsAccount, FundsTxType, StateKind};
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Validation result with the violated rule
pub type ValidationResult = Result<(), ContractError>;

/// Validate a proposed transaction against the rules of its command
pub fn validate(tx: &Transaction) -> ValidationResult {
    require_distinct_inputs(tx)?;
    require_known_command(tx)?;

    match &tx.command {
        Command::Issue => validate_issue(tx),
        Command::AddFunds { amount } => validate_add_funds(tx, *amount),
        Command::PlaceBid { amount } => validate_place_bid(tx, *amount),
        Command::EndAuction => validate_end_auction(tx),
    }
}

fn require(condition: bool, rule: &'static str) -> ValidationResult {
    if condition {
        Ok(())
    } else {
        Err(ContractError::Rule(rule))
    }
}

fn require_distinct_inputs(tx: &Transaction) -> ValidationResult {
    let mut seen = HashSet::new();
    require(
        tx.input_refs().all(|state_ref| seen.insert(state_ref)),
        "A state cannot be consumed twice in the same transaction",
    )
}

fn require_known_command(tx: &Transaction) -> ValidationResult {
    for state in tx.states() {
        let (contract, known) = match state.kind() {
            StateKind::FundsAccount => (
                "funds",
                matches!(tx.command, Command::AddFunds { .. } | Command::PlaceBid { .. }),
            ),
            StateKind::AuctionItem => (
                "auction",
                matches!(
                    tx.command,
                    Command::Issue | Command::PlaceBid { .. } | Command::EndAuction
                ),
            ),
        };
        if !known {
            return Err(ContractError::UnknownCommand {
                contract,
                command: tx.command.to_string(),
            });
        }
    }
    Ok(())
}

// === Positional accessors ===

fn input_item<'a>(tx: &'a Transaction, slot: usize, rule: &'static str) -> Result<&'a AuctionItem, ContractError> {
    tx.inputs
        .get(slot)
        .and_then(|input| input.state.as_item())
        .ok_or(ContractError::Rule(rule))
}

fn input_funds<'a>(tx: &'a Transaction, slot: usize, rule: &'static str) -> Result<&'a FundsAccount, ContractError> {
    tx.inputs
        .get(slot)
        .and_then(|input| input.state.as_funds())
        .ok_or(ContractError::Rule(rule))
}

fn output_item<'a>(tx: &'a Transaction, slot: usize, rule: &'static str) -> Result<&'a AuctionItem, ContractError> {
    tx.outputs
        .get(slot)
        .and_then(|state| state.as_item())
        .ok_or(ContractError::Rule(rule))
}

fn output_funds<'a>(tx: &'a Transaction, slot: usize, rule: &'static str) -> Result<&'a FundsAccount, ContractError> {
    tx.outputs
        .get(slot)
        .and_then(|state| state.as_funds())
        .ok_or(ContractError::Rule(rule))
}

/// Overflowing arithmetic never satisfies a balance rule
fn require_balance(actual: Decimal, expected: Option<Decimal>, rule: &'static str) -> ValidationResult {
    require(expected == Some(actual), rule)
}

/// Issue: no inputs, one fresh AuctionItem
fn validate_issue(tx: &Transaction) -> ValidationResult {
    require(
        tx.inputs.is_empty(),
        "No inputs should be consumed when issuing a NftState.",
    )?;
    require(
        tx.outputs.len() == 1,
        "Only one output state must be generated when issuing a new NftState",
    )?;
    let item = output_item(
        tx,
        0,
        "When issuing a new NftState the type of the outputted state must be NftState",
    )?;

    require(item.minimum_bid > Decimal::ZERO, "Minimum Bid must be more than zero.")?;
    require(item.bid_count == 0, "When issuing a NftState the bid number must be 0")?;
    require(
        item.current_bidder.is_empty(),
        "When issuing a NftState the current bidder must be empty",
    )?;
    require(!item.item_id.is_empty(), "When issuing a NftId must not be null")?;
    require(
        item.current_bid.is_zero(),
        "When issuing a NftState the current bid must be 0",
    )?;
    require(
        !item.auction_closed,
        "When issuing a NftState the auction cannot be ended",
    )
}

/// AddFunds: one NEW_FUNDS output whose balance is the previous balance plus `amount`
fn validate_add_funds(tx: &Transaction, amount: Decimal) -> ValidationResult {
    require(
        tx.outputs.len() == 1,
        "AddFunds commands transactions must generate only one output state.",
    )?;
    let output = output_funds(tx, 0, "AddFunds output state must be of type AccountsFundsState")?;

    require(
        output.tx_type == FundsTxType::NewFunds,
        "The tx type should be NEW_FUNDS",
    )?;
    require(amount > Decimal::ZERO, "The amount should be greater than 0")?;
    require(
        tx.inputs.len() <= 1,
        "AddFunds can consume at most one AccountsFundsState",
    )?;

    let previous = if tx.inputs.is_empty() {
        Decimal::ZERO
    } else {
        let input = input_funds(tx, 0, "AddFunds input state must be of type AccountsFundsState")?;
        require(input.address == output.address, "AddFunds must keep the funds address")?;
        input.balance
    };

    require_balance(
        output.balance,
        previous.checked_add(amount),
        "Outputted AccountsFundsState must have funds equal to old funds plus amount added",
    )
}

/// PlaceBid: first bid (2 in / 2 out) or overtaking bid (3 in / 3 out)
fn validate_place_bid(tx: &Transaction, amount: Decimal) -> ValidationResult {
    let item_in = input_item(tx, 0, "First input state must be of type NftState")?;
    require(!item_in.auction_closed, "You can't make a bid on a ended auction.")?;

    if item_in.bid_count == 0 {
        validate_first_bid(tx, item_in, amount)?;
    } else {
        validate_overtaking_bid(tx, item_in, amount)?;
    }

    // Slot types were checked by the branch above
    let bidder_in = input_funds(tx, 1, "Second input state must be of type AccountsFundsState")?;
    let item_out = output_item(tx, 0, "first output state must be of type NftState")?;

    for (slot, funds_out) in tx.outputs.iter().enumerate().skip(1) {
        let funds_in = tx.inputs[slot].state.as_funds();
        require(
            funds_in.map(|f| &f.address) == funds_out.as_funds().map(|f| &f.address),
            "Outputted AccountsFundsState must keep the account address",
        )?;
    }
    require(
        item_out.current_bidder == bidder_in.address,
        "Outputted NftState must have the bidder as current bidder",
    )?;
    require(
        item_out.item_id == item_in.item_id && item_out.minimum_bid == item_in.minimum_bid,
        "Outputted NftState must keep the item id and minimum bid",
    )?;
    require(
        !item_out.auction_closed,
        "Auction ended must be false on the output State.",
    )
}

fn validate_first_bid(tx: &Transaction, item_in: &AuctionItem, amount: Decimal) -> ValidationResult {
    require(
        tx.inputs.len() == 2,
        "On first bid only 2 input states should be consumed",
    )?;
    let bidder_in = input_funds(tx, 1, "Second input state must be of type AccountsFundsState")?;

    require(
        amount >= item_in.minimum_bid,
        "Amount bidded must be equal or higher than minimum bid",
    )?;
    require(bidder_in.balance >= amount, "Bidder need to have enough funds")?;
    require(
        tx.outputs.len() == 2,
        "When a first bid on an NFT is made two and only two output states must be generated",
    )?;

    let item_out = output_item(tx, 0, "first output state must be of type NftState")?;
    let bidder_out = output_funds(tx, 1, "second output state must be of type AccountsFundsState")?;

    require_balance(
        bidder_out.balance,
        bidder_in.balance.checked_sub(amount),
        "Outputted AccountsFundsState must have funds equal to old funds minus amount bidded",
    )?;
    require(
        bidder_out.tx_type == FundsTxType::NewBid,
        "Outputted AccountsFundsState must have type as NEW_BID",
    )?;
    require(
        item_out.bid_count == 1,
        "Outputted NftState must have bid number equal to 1",
    )?;
    require(
        item_out.current_bid == amount,
        "Outputted NftState must have current bid equal to amount bidded",
    )
}

/// The refund paid to the overtaken bidder is the input item's
/// `current_bid`, not anything recorded on the overtaken bidder's account.
/// This holds only while exactly one funds account tracks the current bidder.
fn validate_overtaking_bid(tx: &Transaction, item_in: &AuctionItem, amount: Decimal) -> ValidationResult {
    require(
        tx.inputs.len() == 3,
        "After the first bid all tx must have 3 and only 3 input states.",
    )?;
    let bidder_in = input_funds(tx, 1, "Second input state must be of type AccountsFundsState")?;
    let overtaken_in = input_funds(tx, 2, "Third input state must be of type AccountsFundsState")?;

    require(
        overtaken_in.address == item_in.current_bidder,
        "Third input state must belong to the current bidder",
    )?;
    require(
        item_in.current_bidder != bidder_in.address,
        "New bidder cannot be the same as current bidder",
    )?;
    require(
        amount > item_in.current_bid,
        "Amount bidded must be higher than current bid",
    )?;
    require(bidder_in.balance >= amount, "Bidder need to have enough funds")?;
    require(
        tx.outputs.len() == 3,
        "After the first bid all tx must have 3 and only 3 output states.",
    )?;

    let item_out = output_item(tx, 0, "first output state must be of type NftState")?;
    let bidder_out = output_funds(tx, 1, "second output state must be of type AccountsFundsState")?;
    let overtaken_out = output_funds(tx, 2, "third output state must be of type AccountsFundsState")?;

    require_balance(
        bidder_out.balance,
        bidder_in.balance.checked_sub(amount),
        "Outputted AccountsFundsState from bidder must have funds equal to old funds minus amount bidded",
    )?;
    require_balance(
        overtaken_out.balance,
        overtaken_in.balance.checked_add(item_in.current_bid),
        "Outputted AccountsFundsState from old bidder must have funds equal to his current funds plus the amount that he bidded",
    )?;
    require(
        bidder_out.tx_type == FundsTxType::NewBid,
        "Outputted AccountsFundsState from bidder must have type as NEW_BID",
    )?;
    require(
        overtaken_out.tx_type == FundsTxType::BidOvertaken,
        "Outputted AccountsFundsState from old bidder must have type as BID_OVERTAKEN",
    )?;
    require(
        item_out.bid_count == item_in.bid_count + 1,
        "Outputted NftState has wrong bid number",
    )?;
    require(
        item_out.current_bid == amount,
        "Outputted NftState must have current bid equal to amount bidded",
    )
}

/// EndAuction: one open item in, the same item closed out
fn validate_end_auction(tx: &Transaction) -> ValidationResult {
    require(tx.inputs.len() == 1, "There must be only one NftState inputted.")?;
    let item_in = input_item(tx, 0, "Input state must be of type NftState.")?;
    require(
        !item_in.auction_closed,
        "Auction ended must be false on the input State.",
    )?;

    require(tx.outputs.len() == 1, "There must be only one NftState outputted.")?;
    let item_out = output_item(tx, 0, "Output state must be of type NftState.")?;
    require(
        item_out.auction_closed,
        "Auction ended must be true on the output State.",
    )?;

    require(
        item_out.bid_count == item_in.bid_count
            && item_out.minimum_bid == item_in.minimum_bid
            && item_out.current_bid == item_in.current_bid
            && item_out.current_bidder == item_in.current_bidder
            && item_out.item_id == item_in.item_id,
        "All other NftState fields must pass through unchanged when ending an auction",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::{StateAndRef, StateRef, TransactionBuilder, TxId};
    use bestbid_core::{LedgerState, Party};
    use rust_decimal_macros::dec;

    const ACCOUNT_ONE: &str = "0x0KLJH234978YFSLKJ4";
    const ACCOUNT_TWO: &str = "0x030FF76FFDV3T2T8FA";

    fn sender() -> Party {
        Party::new("PartyA")
    }

    fn receiver() -> Party {
        Party::new("PartyC")
    }

    fn input(index: u32, state: impl Into<LedgerState>) -> StateAndRef {
        StateAndRef::new(StateRef::new(TxId::new("prev"), index), state.into())
    }

    fn funds(tx_type: FundsTxType, balance: Decimal, address: &str) -> FundsAccount {
        FundsAccount::new(tx_type, balance, address, sender(), receiver())
    }

    fn item(bid_count: u32, min: Decimal, current: Decimal, bidder: &str) -> AuctionItem {
        AuctionItem {
            bid_count,
            auction_closed: false,
            minimum_bid: min,
            current_bid: current,
            current_bidder: bidder.to_string(),
            item_id: "1".to_string(),
            initiator: sender(),
            counterparty: receiver(),
        }
    }

    fn tx(command: Command) -> TransactionBuilder {
        TransactionBuilder::new()
            .correlation_id("test-1")
            .command(command)
            .signer(sender())
    }

    fn rule_of(tx: &Transaction) -> String {
        validate(tx).unwrap_err().rule()
    }

    // === Issue ===

    #[test]
    fn test_issue_success() {
        let tx = tx(Command::Issue)
            .output(AuctionItem::issue("1", dec!(10), sender(), receiver()))
            .build()
            .unwrap();
        assert!(validate(&tx).is_ok());
    }

    #[test]
    fn test_issue_rejects_non_positive_minimum_bid() {
        for minimum in [dec!(0), dec!(-5)] {
            let tx = tx(Command::Issue)
                .output(AuctionItem::issue("1", minimum, sender(), receiver()))
                .build()
                .unwrap();
            assert_eq!(rule_of(&tx), "Minimum Bid must be more than zero.");
        }
    }

    #[test]
    fn test_issue_rejects_inputs() {
        let tx = tx(Command::Issue)
            .input(input(0, item(0, dec!(10), dec!(0), "")))
            .output(AuctionItem::issue("1", dec!(10), sender(), receiver()))
            .build()
            .unwrap();
        assert_eq!(rule_of(&tx), "No inputs should be consumed when issuing a NftState.");
    }

    #[test]
    fn test_issue_rejects_prefilled_bidder() {
        let tx = tx(Command::Issue)
            .output(item(0, dec!(10), dec!(0), ACCOUNT_ONE))
            .build()
            .unwrap();
        assert_eq!(rule_of(&tx), "When issuing a NftState the current bidder must be empty");
    }

    #[test]
    fn test_issue_rejects_empty_item_id() {
        let tx = tx(Command::Issue)
            .output(AuctionItem::issue("", dec!(10), sender(), receiver()))
            .build()
            .unwrap();
        assert_eq!(rule_of(&tx), "When issuing a NftId must not be null");
    }

    #[test]
    fn test_issue_rejects_existing_bid() {
        let tx = tx(Command::Issue)
            .output(item(0, dec!(10), dec!(5), ""))
            .build()
            .unwrap();
        assert_eq!(rule_of(&tx), "When issuing a NftState the current bid must be 0");
    }

    #[test]
    fn test_issue_rejects_closed_auction() {
        let tx = tx(Command::Issue)
            .output(item(0, dec!(10), dec!(0), "").closed())
            .build()
            .unwrap();
        assert_eq!(rule_of(&tx), "When issuing a NftState the auction cannot be ended");
    }

    #[test]
    fn test_issue_with_funds_state_is_unknown_command() {
        let tx = tx(Command::Issue)
            .output(funds(FundsTxType::NewFunds, dec!(10), ACCOUNT_ONE))
            .build()
            .unwrap();
        assert!(matches!(
            validate(&tx),
            Err(ContractError::UnknownCommand { contract: "funds", .. })
        ));
    }

    // === AddFunds ===

    #[test]
    fn test_add_funds_first_time() {
        let tx = tx(Command::AddFunds { amount: dec!(10) })
            .output(funds(FundsTxType::NewFunds, dec!(10), ACCOUNT_ONE))
            .build()
            .unwrap();
        assert!(validate(&tx).is_ok());
    }

    #[test]
    fn test_add_funds_two_outputs_rejected() {
        let tx = tx(Command::AddFunds { amount: dec!(0) })
            .output(funds(FundsTxType::NewFunds, dec!(0), ACCOUNT_ONE))
            .output(funds(FundsTxType::NewFunds, dec!(0), ACCOUNT_ONE))
            .build()
            .unwrap();
        assert_eq!(
            rule_of(&tx),
            "AddFunds commands transactions must generate only one output state."
        );
    }

    #[test]
    fn test_add_funds_wrong_tx_type() {
        let tx = tx(Command::AddFunds { amount: dec!(0) })
            .output(funds(FundsTxType::NewBid, dec!(0), ACCOUNT_ONE))
            .build()
            .unwrap();
        assert_eq!(rule_of(&tx), "The tx type should be NEW_FUNDS");
    }

    #[test]
    fn test_add_funds_zero_amount() {
        let tx = tx(Command::AddFunds { amount: dec!(0) })
            .output(funds(FundsTxType::NewFunds, dec!(0), ACCOUNT_ONE))
            .build()
            .unwrap();
        assert_eq!(rule_of(&tx), "The amount should be greater than 0");
    }

    #[test]
    fn test_add_funds_top_up_adds_delta() {
        let ok = tx(Command::AddFunds { amount: dec!(50) })
            .input(input(0, funds(FundsTxType::NewFunds, dec!(100), ACCOUNT_ONE)))
            .output(funds(FundsTxType::NewFunds, dec!(150), ACCOUNT_ONE))
            .build()
            .unwrap();
        assert!(validate(&ok).is_ok());

        let wrong = tx(Command::AddFunds { amount: dec!(50) })
            .input(input(0, funds(FundsTxType::NewFunds, dec!(100), ACCOUNT_ONE)))
            .output(funds(FundsTxType::NewFunds, dec!(50), ACCOUNT_ONE))
            .build()
            .unwrap();
        assert_eq!(
            rule_of(&wrong),
            "Outputted AccountsFundsState must have funds equal to old funds plus amount added"
        );
    }

    #[test]
    fn test_add_funds_cannot_move_address() {
        let tx = tx(Command::AddFunds { amount: dec!(50) })
            .input(input(0, funds(FundsTxType::NewFunds, dec!(100), ACCOUNT_ONE)))
            .output(funds(FundsTxType::NewFunds, dec!(150), ACCOUNT_TWO))
            .build()
            .unwrap();
        assert_eq!(rule_of(&tx), "AddFunds must keep the funds address");
    }

    #[test]
    fn test_add_funds_with_item_is_unknown_command() {
        let tx = tx(Command::AddFunds { amount: dec!(10) })
            .input(input(0, item(0, dec!(10), dec!(0), "")))
            .output(funds(FundsTxType::NewFunds, dec!(10), ACCOUNT_ONE))
            .build()
            .unwrap();
        assert!(matches!(
            validate(&tx),
            Err(ContractError::UnknownCommand { contract: "auction", .. })
        ));
    }

    // === PlaceBid: first bid ===

    fn first_bid(amount: Decimal, balance: Decimal) -> TransactionBuilder {
        let item_in = item(0, dec!(1), dec!(0), "");
        tx(Command::PlaceBid { amount })
            .input(input(0, item_in.clone()))
            .input(input(1, funds(FundsTxType::NewFunds, balance, ACCOUNT_ONE)))
            .output(item_in.with_bid(amount, ACCOUNT_ONE))
            .output(funds(FundsTxType::NewBid, balance - amount, ACCOUNT_ONE))
    }

    #[test]
    fn test_first_bid_success() {
        let tx = first_bid(dec!(10), dec!(10)).build().unwrap();
        assert!(validate(&tx).is_ok());
    }

    #[test]
    fn test_first_bid_below_minimum() {
        let item_in = item(0, dec!(10), dec!(0), "");
        let tx = tx(Command::PlaceBid { amount: dec!(5) })
            .input(input(0, item_in.clone()))
            .input(input(1, funds(FundsTxType::NewFunds, dec!(100), ACCOUNT_ONE)))
            .output(item_in.with_bid(dec!(5), ACCOUNT_ONE))
            .output(funds(FundsTxType::NewBid, dec!(95), ACCOUNT_ONE))
            .build()
            .unwrap();
        assert_eq!(rule_of(&tx), "Amount bidded must be equal or higher than minimum bid");
    }

    #[test]
    fn test_first_bid_insufficient_funds() {
        let tx = first_bid(dec!(10), dec!(5)).build().unwrap();
        assert_eq!(rule_of(&tx), "Bidder need to have enough funds");
    }

    #[test]
    fn test_first_bid_wrong_remaining_balance() {
        let item_in = item(0, dec!(1), dec!(0), "");
        let tx = tx(Command::PlaceBid { amount: dec!(10) })
            .input(input(0, item_in.clone()))
            .input(input(1, funds(FundsTxType::NewFunds, dec!(10), ACCOUNT_ONE)))
            .output(item_in.with_bid(dec!(10), ACCOUNT_ONE))
            .output(funds(FundsTxType::NewBid, dec!(10), ACCOUNT_ONE))
            .build()
            .unwrap();
        assert_eq!(
            rule_of(&tx),
            "Outputted AccountsFundsState must have funds equal to old funds minus amount bidded"
        );
    }

    #[test]
    fn test_first_bid_with_third_input_rejected() {
        let tx = first_bid(dec!(10), dec!(10))
            .input(input(2, funds(FundsTxType::NewFunds, dec!(10), ACCOUNT_TWO)))
            .build()
            .unwrap();
        assert_eq!(rule_of(&tx), "On first bid only 2 input states should be consumed");
    }

    #[test]
    fn test_bid_requires_item_first() {
        let tx = tx(Command::PlaceBid { amount: dec!(10) })
            .input(input(0, funds(FundsTxType::NewFunds, dec!(10), ACCOUNT_ONE)))
            .build()
            .unwrap();
        assert_eq!(rule_of(&tx), "First input state must be of type NftState");
    }

    #[test]
    fn test_bid_on_closed_auction() {
        let mut closed = item(0, dec!(1), dec!(0), "");
        closed.auction_closed = true;
        let tx = tx(Command::PlaceBid { amount: dec!(10) })
            .input(input(0, closed.clone()))
            .input(input(1, funds(FundsTxType::NewFunds, dec!(10), ACCOUNT_ONE)))
            .output(closed.with_bid(dec!(10), ACCOUNT_ONE))
            .output(funds(FundsTxType::NewBid, dec!(0), ACCOUNT_ONE))
            .build()
            .unwrap();
        assert_eq!(rule_of(&tx), "You can't make a bid on a ended auction.");
    }

    #[test]
    fn test_bid_must_record_bidder() {
        let item_in = item(0, dec!(1), dec!(0), "");
        let tx = tx(Command::PlaceBid { amount: dec!(10) })
            .input(input(0, item_in.clone()))
            .input(input(1, funds(FundsTxType::NewFunds, dec!(10), ACCOUNT_ONE)))
            .output(item_in.with_bid(dec!(10), ACCOUNT_TWO))
            .output(funds(FundsTxType::NewBid, dec!(0), ACCOUNT_ONE))
            .build()
            .unwrap();
        assert_eq!(rule_of(&tx), "Outputted NftState must have the bidder as current bidder");
    }

    #[test]
    fn test_bid_cannot_move_funds_address() {
        let item_in = item(0, dec!(1), dec!(0), "");
        let tx = tx(Command::PlaceBid { amount: dec!(10) })
            .input(input(0, item_in.clone()))
            .input(input(1, funds(FundsTxType::NewFunds, dec!(10), ACCOUNT_ONE)))
            .output(item_in.with_bid(dec!(10), ACCOUNT_ONE))
            .output(funds(FundsTxType::NewBid, dec!(0), ACCOUNT_TWO))
            .build()
            .unwrap();
        assert_eq!(
            rule_of(&tx),
            "Outputted AccountsFundsState must keep the account address"
        );
    }

    #[test]
    fn test_bid_cannot_rewrite_item_terms() {
        let item_in = item(0, dec!(1), dec!(0), "");
        let renamed = AuctionItem {
            item_id: "2".to_string(),
            ..item_in.with_bid(dec!(10), ACCOUNT_ONE)
        };
        let cheaper = AuctionItem {
            minimum_bid: dec!(0.5),
            ..item_in.with_bid(dec!(10), ACCOUNT_ONE)
        };

        for item_out in [renamed, cheaper] {
            let tx = tx(Command::PlaceBid { amount: dec!(10) })
                .input(input(0, item_in.clone()))
                .input(input(1, funds(FundsTxType::NewFunds, dec!(10), ACCOUNT_ONE)))
                .output(item_out)
                .output(funds(FundsTxType::NewBid, dec!(0), ACCOUNT_ONE))
                .build()
                .unwrap();
            assert_eq!(
                rule_of(&tx),
                "Outputted NftState must keep the item id and minimum bid"
            );
        }
    }

    #[test]
    fn test_bid_cannot_close_auction() {
        let item_in = item(0, dec!(1), dec!(0), "");
        let tx = tx(Command::PlaceBid { amount: dec!(10) })
            .input(input(0, item_in.clone()))
            .input(input(1, funds(FundsTxType::NewFunds, dec!(10), ACCOUNT_ONE)))
            .output(item_in.with_bid(dec!(10), ACCOUNT_ONE).closed())
            .output(funds(FundsTxType::NewBid, dec!(0), ACCOUNT_ONE))
            .build()
            .unwrap();
        assert_eq!(rule_of(&tx), "Auction ended must be false on the output State.");
    }

    #[test]
    fn test_duplicate_input_rejected() {
        let item_in = item(0, dec!(1), dec!(0), "");
        let tx = tx(Command::PlaceBid { amount: dec!(10) })
            .input(input(0, item_in.clone()))
            .input(input(0, item_in))
            .build()
            .unwrap();
        assert_eq!(
            rule_of(&tx),
            "A state cannot be consumed twice in the same transaction"
        );
    }

    // === PlaceBid: overtaking bid ===

    fn second_bid(amount: Decimal) -> TransactionBuilder {
        let item_in = item(1, dec!(1), dec!(1), ACCOUNT_ONE);
        tx(Command::PlaceBid { amount })
            .input(input(0, item_in.clone()))
            .input(input(1, funds(FundsTxType::NewFunds, dec!(10), ACCOUNT_TWO)))
            .input(input(2, funds(FundsTxType::NewBid, dec!(10), ACCOUNT_ONE)))
            .output(item_in.with_bid(amount, ACCOUNT_TWO))
            .output(funds(FundsTxType::NewBid, dec!(10) - amount, ACCOUNT_TWO))
            .output(funds(FundsTxType::BidOvertaken, dec!(11), ACCOUNT_ONE))
    }

    #[test]
    fn test_second_bid_success() {
        let tx = second_bid(dec!(10)).build().unwrap();
        assert!(validate(&tx).is_ok());
    }

    #[test]
    fn test_second_bid_equal_to_current_rejected() {
        let tx = second_bid(dec!(1)).build().unwrap();
        assert_eq!(rule_of(&tx), "Amount bidded must be higher than current bid");
    }

    #[test]
    fn test_second_bid_same_bidder_rejected() {
        let item_in = item(1, dec!(1), dec!(1), ACCOUNT_ONE);
        let tx = tx(Command::PlaceBid { amount: dec!(5) })
            .input(input(0, item_in.clone()))
            .input(input(1, funds(FundsTxType::NewBid, dec!(10), ACCOUNT_ONE)))
            .input(input(2, funds(FundsTxType::NewBid, dec!(10), ACCOUNT_ONE)))
            .build()
            .unwrap();
        assert_eq!(rule_of(&tx), "New bidder cannot be the same as current bidder");
    }

    #[test]
    fn test_second_bid_refund_uses_item_current_bid() {
        let item_in = item(1, dec!(1), dec!(1), ACCOUNT_ONE);
        let tx = tx(Command::PlaceBid { amount: dec!(10) })
            .input(input(0, item_in.clone()))
            .input(input(1, funds(FundsTxType::NewFunds, dec!(10), ACCOUNT_TWO)))
            .input(input(2, funds(FundsTxType::NewBid, dec!(10), ACCOUNT_ONE)))
            .output(item_in.with_bid(dec!(10), ACCOUNT_TWO))
            .output(funds(FundsTxType::NewBid, dec!(0), ACCOUNT_TWO))
            .output(funds(FundsTxType::BidOvertaken, dec!(20), ACCOUNT_ONE))
            .build()
            .unwrap();
        assert_eq!(
            rule_of(&tx),
            "Outputted AccountsFundsState from old bidder must have funds equal to his current funds plus the amount that he bidded"
        );
    }

    #[test]
    fn test_second_bid_refund_must_go_to_current_bidder() {
        let item_in = item(1, dec!(1), dec!(1), ACCOUNT_ONE);
        let tx = tx(Command::PlaceBid { amount: dec!(10) })
            .input(input(0, item_in))
            .input(input(1, funds(FundsTxType::NewFunds, dec!(10), ACCOUNT_TWO)))
            .input(input(2, funds(FundsTxType::NewBid, dec!(10), "0xSOMEONE_ELSE")))
            .build()
            .unwrap();
        assert_eq!(rule_of(&tx), "Third input state must belong to the current bidder");
    }

    #[test]
    fn test_second_bid_wrong_overtaken_type() {
        let item_in = item(1, dec!(1), dec!(1), ACCOUNT_ONE);
        let tx = tx(Command::PlaceBid { amount: dec!(10) })
            .input(input(0, item_in.clone()))
            .input(input(1, funds(FundsTxType::NewFunds, dec!(10), ACCOUNT_TWO)))
            .input(input(2, funds(FundsTxType::NewBid, dec!(10), ACCOUNT_ONE)))
            .output(item_in.with_bid(dec!(10), ACCOUNT_TWO))
            .output(funds(FundsTxType::NewBid, dec!(0), ACCOUNT_TWO))
            .output(funds(FundsTxType::NewFunds, dec!(11), ACCOUNT_ONE))
            .build()
            .unwrap();
        assert_eq!(
            rule_of(&tx),
            "Outputted AccountsFundsState from old bidder must have type as BID_OVERTAKEN"
        );
    }

    #[test]
    fn test_second_bid_must_increment_bid_number() {
        let item_in = item(1, dec!(1), dec!(1), ACCOUNT_ONE);
        let item_out = AuctionItem {
            bid_count: item_in.bid_count,
            ..item_in.with_bid(dec!(10), ACCOUNT_TWO)
        };
        let tx = tx(Command::PlaceBid { amount: dec!(10) })
            .input(input(0, item_in))
            .input(input(1, funds(FundsTxType::NewFunds, dec!(10), ACCOUNT_TWO)))
            .input(input(2, funds(FundsTxType::NewBid, dec!(10), ACCOUNT_ONE)))
            .output(item_out)
            .output(funds(FundsTxType::NewBid, dec!(0), ACCOUNT_TWO))
            .output(funds(FundsTxType::BidOvertaken, dec!(11), ACCOUNT_ONE))
            .build()
            .unwrap();
        assert_eq!(rule_of(&tx), "Outputted NftState has wrong bid number");
    }

    #[test]
    fn test_second_bid_missing_third_input() {
        let item_in = item(1, dec!(1), dec!(1), ACCOUNT_ONE);
        let tx = tx(Command::PlaceBid { amount: dec!(10) })
            .input(input(0, item_in))
            .input(input(1, funds(FundsTxType::NewFunds, dec!(10), ACCOUNT_TWO)))
            .build()
            .unwrap();
        assert_eq!(
            rule_of(&tx),
            "After the first bid all tx must have 3 and only 3 input states."
        );
    }

    // === EndAuction ===

    #[test]
    fn test_end_auction_success() {
        let open = item(1, dec!(1), dec!(5), ACCOUNT_ONE);
        let tx = tx(Command::EndAuction)
            .input(input(0, open.clone()))
            .output(open.closed())
            .build()
            .unwrap();
        assert!(validate(&tx).is_ok());
    }

    #[test]
    fn test_end_auction_already_closed() {
        let closed = item(1, dec!(1), dec!(5), ACCOUNT_ONE).closed();
        let tx = tx(Command::EndAuction)
            .input(input(0, closed.clone()))
            .output(closed)
            .build()
            .unwrap();
        assert_eq!(rule_of(&tx), "Auction ended must be false on the input State.");
    }

    #[test]
    fn test_end_auction_must_close() {
        let open = item(0, dec!(1), dec!(0), "");
        let tx = tx(Command::EndAuction)
            .input(input(0, open.clone()))
            .output(open)
            .build()
            .unwrap();
        assert_eq!(rule_of(&tx), "Auction ended must be true on the output State.");
    }

    #[test]
    fn test_end_auction_cannot_rewrite_winner() {
        let open = item(1, dec!(1), dec!(5), ACCOUNT_ONE);
        let mut tampered = open.closed();
        tampered.current_bidder = ACCOUNT_TWO.to_string();
        let tx = tx(Command::EndAuction)
            .input(input(0, open))
            .output(tampered)
            .build()
            .unwrap();
        assert_eq!(
            rule_of(&tx),
            "All other NftState fields must pass through unchanged when ending an auction"
        );
    }

    #[test]
    fn test_end_auction_with_funds_is_unknown_command() {
        let open = item(0, dec!(1), dec!(0), "");
        let tx = tx(Command::EndAuction)
            .input(input(0, open.clone()))
            .output(open.closed())
            .output(funds(FundsTxType::NewFunds, dec!(1), ACCOUNT_ONE))
            .build()
            .unwrap();
        let err = validate(&tx).unwrap_err();
        assert!(err.to_string().starts_with("Command not found"));
    }
}
