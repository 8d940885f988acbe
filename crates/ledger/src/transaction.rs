//! Transactions - atomic consume/produce bundles

use crate::error::LedgerError;
use bestbid_core::{LedgerState, Party};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::Display;

/// Transaction identifier (hex SHA-256 of the transaction content)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(String);

impl TxId {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for log lines
    pub fn short(&self) -> &str {
        self.0.get(..12).unwrap_or(&self.0)
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pointer to a state produced by a committed transaction
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateRef {
    pub tx_id: TxId,
    pub index: u32,
}

impl StateRef {
    pub fn new(tx_id: TxId, index: u32) -> Self {
        Self { tx_id, index }
    }
}

impl fmt::Display for StateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tx_id, self.index)
    }
}

/// A state together with the ref it was produced under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateAndRef {
    pub state_ref: StateRef,
    pub state: LedgerState,
}

impl StateAndRef {
    pub fn new(state_ref: StateRef, state: LedgerState) -> Self {
        Self { state_ref, state }
    }
}

/// The instruction a transaction carries; selects the verification rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Create a new auction item
    Issue,
    /// Credit an external wallet balance by `amount`
    AddFunds { amount: Decimal },
    /// Bid `amount` on an open auction
    PlaceBid { amount: Decimal },
    /// Close an open auction
    EndAuction,
}

impl Command {
    /// Amount carried by the command, if any
    pub fn amount(&self) -> Option<Decimal> {
        match self {
            Command::AddFunds { amount } | Command::PlaceBid { amount } => Some(*amount),
            Command::Issue | Command::EndAuction => None,
        }
    }
}

/// An atomic proposal: consumed states, produced states and one command.
///
/// Slot order of `inputs` and `outputs` is significant; the contract rules
/// address states by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub correlation_id: String,
    pub command: Command,
    pub inputs: Vec<StateAndRef>,
    pub outputs: Vec<LedgerState>,
    /// Parties whose signatures are required to commit
    pub signers: Vec<Party>,
}

impl Transaction {
    /// Refs the produced states will have once committed under `tx_id`
    pub fn output_refs(&self, tx_id: &TxId) -> Vec<StateAndRef> {
        self.outputs
            .iter()
            .enumerate()
            .map(|(index, state)| {
                StateAndRef::new(StateRef::new(tx_id.clone(), index as u32), state.clone())
            })
            .collect()
    }

    pub fn input_refs(&self) -> impl Iterator<Item = &StateRef> {
        self.inputs.iter().map(|input| &input.state_ref)
    }

    /// All states touched by the transaction, consumed ones first
    pub fn states(&self) -> impl Iterator<Item = &LedgerState> {
        self.inputs
            .iter()
            .map(|input| &input.state)
            .chain(self.outputs.iter())
    }
}

/// Builder for transactions
#[derive(Debug, Default)]
pub struct TransactionBuilder {
    correlation_id: Option<String>,
    command: Option<Command>,
    inputs: Vec<StateAndRef>,
    outputs: Vec<LedgerState>,
    signers: Vec<Party>,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    pub fn command(mut self, command: Command) -> Self {
        self.command = Some(command);
        self
    }

    pub fn input(mut self, input: StateAndRef) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn output(mut self, state: impl Into<LedgerState>) -> Self {
        self.outputs.push(state.into());
        self
    }

    pub fn signer(mut self, party: Party) -> Self {
        if !self.signers.contains(&party) {
            self.signers.push(party);
        }
        self
    }

    pub fn build(self) -> Result<Transaction, LedgerError> {
        let command = self.command.ok_or(LedgerError::MissingCommand)?;
        let correlation_id = self.correlation_id.unwrap_or_default();
        if correlation_id.is_empty() {
            return Err(LedgerError::EmptyCorrelationId);
        }
        if self.signers.is_empty() {
            return Err(LedgerError::NoSigners);
        }

        Ok(Transaction {
            correlation_id,
            command,
            inputs: self.inputs,
            outputs: self.outputs,
            signers: self.signers,
        })
    }
}
