//! Scripted replay of ledger calls.
//!
//! A script is a JSON list of calls, each naming the authenticated caller
//! and an operation. Amounts are decimal strings decoded modulo 2^256.

use crate::{
    deputation::Deputation,
    shared::{lock, shared, SharedToken},
    storage::BalanceSheet,
    token::Token,
};
use maskin_common::{
    amount::{self, Amount},
    config::{DeputationConfig, TokenConfig},
    crypto::Address,
    error::LedgerError,
    event::EmittedEvent,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReplayConfig {
    pub token: TokenConfig,
    #[serde(default)]
    pub deputation: Option<DeputationConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Call {
    pub caller: Address,
    #[serde(flatten)]
    pub op: Op,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    // ===== Access =====
    AddAdmins { addrs: Vec<Address> },
    RemoveAdmins { addrs: Vec<Address> },
    AddOperators { addrs: Vec<Address> },
    RemoveOperators { addrs: Vec<Address> },
    IsAdmin { addr: Address },
    IsOperator { addr: Address },
    TransferOwnership { new_owner: Address },
    ClaimOwnership,

    // ===== Balances =====
    Transfer {
        to: Address,
        #[serde(with = "amount::decimal")]
        value: Amount,
    },
    TransferFrom {
        from: Address,
        to: Address,
        #[serde(with = "amount::decimal")]
        value: Amount,
    },
    Approve {
        spender: Address,
        #[serde(with = "amount::decimal")]
        value: Amount,
    },
    IncreaseApproval {
        spender: Address,
        #[serde(with = "amount::decimal")]
        value: Amount,
    },
    DecreaseApproval {
        spender: Address,
        #[serde(with = "amount::decimal")]
        value: Amount,
    },
    Burn {
        #[serde(with = "amount::decimal")]
        value: Amount,
        #[serde(default)]
        note: String,
    },
    BalanceOf { who: Address },
    Allowance { owner: Address, spender: Address },
    TotalSupply,
    /// Swap in an empty balance sheet
    ResetBalanceSheet,

    // ===== Holders =====
    HolderCount,
    Holder { index: u64 },

    // ===== Minting =====
    PreMint,
    Mint {
        to: Address,
        #[serde(with = "amount::decimal")]
        value: Amount,
    },
    SubmitMintRequest {
        beneficiary: Address,
        #[serde(with = "amount::decimal")]
        amount: Amount,
    },
    ConfirmMintRequest { id: u64 },
    GetMintRequest { id: u64 },
    ChangePaidRates { system_paid_rate: u8, writer_paid_rate: u8 },
    ChangeWallet { wallet: Address },
    ChangeDeputation { deputation: Address },

    // ===== Pause =====
    Pause,
    Unpause,

    // ===== Delegation =====
    SetDelegatedFrom { addr: Address },
    DelegateTransfer {
        to: Address,
        #[serde(with = "amount::decimal")]
        value: Amount,
        origin: Address,
    },
    DelegateTransferFrom {
        from: Address,
        to: Address,
        #[serde(with = "amount::decimal")]
        value: Amount,
        origin: Address,
    },
    DelegateApprove {
        spender: Address,
        #[serde(with = "amount::decimal")]
        value: Amount,
        origin: Address,
    },
    DelegateIncreaseApproval {
        spender: Address,
        #[serde(with = "amount::decimal")]
        value: Amount,
        origin: Address,
    },
    DelegateDecreaseApproval {
        spender: Address,
        #[serde(with = "amount::decimal")]
        value: Amount,
        origin: Address,
    },
    DelegateBurn {
        from: Address,
        #[serde(with = "amount::decimal")]
        value: Amount,
        #[serde(default)]
        note: String,
    },
    DelegateTotalSupply,
    DelegateBalanceOf { who: Address },
    DelegateAllowance { owner: Address, spender: Address },

    // ===== Deputation =====
    SetToken,
    DeputationAddAdmins { addrs: Vec<Address> },
    DeputationRemoveAdmins { addrs: Vec<Address> },
    Distribute {
        holders: Vec<Address>,
        #[serde(with = "amount::decimal_vec")]
        amounts: Vec<Amount>,
    },
    PoolBalance,
}

/// Outcome of one call, printed as a JSON line.
#[derive(Debug, Clone, Serialize)]
pub struct CallReport {
    pub index: usize,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct Replay {
    token: SharedToken,
    deputation: Option<Deputation>,
}

impl Replay {
    pub fn new(config: &ReplayConfig) -> Result<Self, LedgerError> {
        let token = shared(Token::new(&config.token)?);
        let deputation = config
            .deputation
            .as_ref()
            .map(Deputation::new)
            .transpose()?;
        Ok(Self { token, deputation })
    }

    pub fn token(&self) -> &SharedToken {
        &self.token
    }

    pub fn deputation(&self) -> Option<&Deputation> {
        self.deputation.as_ref()
    }

    fn deputation_mut(&mut self) -> Result<&mut Deputation, LedgerError> {
        self.deputation
            .as_mut()
            .ok_or_else(|| LedgerError::invalid("no deputation configured"))
    }

    /// Apply one call. Read operations return their value.
    pub fn apply(&mut self, call: &Call) -> Result<Option<Value>, LedgerError> {
        let caller = &call.caller;
        match &call.op {
            Op::SetToken => {
                let token = self.token.clone();
                self.deputation_mut()?.set_token(caller, token)?;
                Ok(None)
            }
            Op::DeputationAddAdmins { addrs } => {
                self.deputation_mut()?.add_admins(caller, addrs)?;
                Ok(None)
            }
            Op::DeputationRemoveAdmins { addrs } => {
                self.deputation_mut()?.remove_admins(caller, addrs)?;
                Ok(None)
            }
            Op::Distribute { holders, amounts } => {
                self.deputation_mut()?.distribute(caller, holders, amounts)?;
                Ok(None)
            }
            Op::PoolBalance => {
                let balance = self.deputation_mut()?.pool_balance()?;
                Ok(Some(json!(balance.to_string())))
            }
            op => {
                let mut token = lock(&self.token)?;
                apply_token(&mut token, caller, op)
            }
        }
    }

    /// Apply every call in order and collect one report per call.
    pub fn run(&mut self, calls: &[Call], stop_on_error: bool) -> Vec<CallReport> {
        let mut reports = Vec::with_capacity(calls.len());
        for (index, call) in calls.iter().enumerate() {
            let report = match self.apply(call) {
                Ok(result) => CallReport {
                    index,
                    status: "ok",
                    result,
                    code: None,
                    error: None,
                },
                Err(e) => CallReport {
                    index,
                    status: "error",
                    result: None,
                    code: Some(e.to_code()),
                    error: Some(e.to_string()),
                },
            };
            let failed = report.code.is_some();
            reports.push(report);
            if failed && stop_on_error {
                break;
            }
        }
        reports
    }

    /// Committed events of the token and the deputation, token first.
    pub fn drain_events(&mut self) -> Result<Vec<EmittedEvent>, LedgerError> {
        let mut events = lock(&self.token)?.drain_events();
        if let Some(deputation) = self.deputation.as_mut() {
            events.extend(deputation.drain_events());
        }
        Ok(events)
    }
}

fn amount_value(value: Amount) -> Option<Value> {
    Some(json!(value.to_string()))
}

fn apply_token(token: &mut Token, caller: &Address, op: &Op) -> Result<Option<Value>, LedgerError> {
    match op {
        Op::AddAdmins { addrs } => token.add_admins(caller, addrs)?,
        Op::RemoveAdmins { addrs } => token.remove_admins(caller, addrs)?,
        Op::AddOperators { addrs } => token.add_operators(caller, addrs)?,
        Op::RemoveOperators { addrs } => token.remove_operators(caller, addrs)?,
        Op::IsAdmin { addr } => return Ok(Some(json!(token.is_admin(addr)?))),
        Op::IsOperator { addr } => return Ok(Some(json!(token.is_operator(addr)?))),
        Op::TransferOwnership { new_owner } => token.transfer_ownership(caller, new_owner)?,
        Op::ClaimOwnership => token.claim_ownership(caller)?,

        Op::Transfer { to, value } => token.transfer(caller, to, *value)?,
        Op::TransferFrom { from, to, value } => token.transfer_from(caller, from, to, *value)?,
        Op::Approve { spender, value } => token.approve(caller, spender, *value)?,
        Op::IncreaseApproval { spender, value } => {
            token.increase_approval(caller, spender, *value)?
        }
        Op::DecreaseApproval { spender, value } => {
            token.decrease_approval(caller, spender, *value)?
        }
        Op::Burn { value, note } => token.burn(caller, *value, note)?,
        Op::BalanceOf { who } => return Ok(amount_value(token.balance_of(who))),
        Op::Allowance { owner, spender } => {
            return Ok(amount_value(token.allowance(owner, spender)))
        }
        Op::TotalSupply => return Ok(amount_value(token.total_supply())),
        Op::ResetBalanceSheet => {
            token.set_balance_sheet(caller, BalanceSheet::new())?;
        }

        Op::HolderCount => return Ok(Some(json!(token.holder_count(caller)?))),
        Op::Holder { index } => return Ok(Some(json!(token.holder(caller, *index)?))),

        Op::PreMint => token.pre_mint(caller)?,
        Op::Mint { to, value } => token.mint(caller, to, *value)?,
        Op::SubmitMintRequest {
            beneficiary,
            amount,
        } => {
            let id = token.submit_mint_request(caller, beneficiary, *amount)?;
            return Ok(Some(json!(id)));
        }
        Op::ConfirmMintRequest { id } => token.confirm_mint_request(caller, *id)?,
        Op::GetMintRequest { id } => {
            let request = token.get_mint_request(*id)?;
            return serde_json::to_value(request)
                .map(Some)
                .map_err(|e| LedgerError::InvalidArgument(e.to_string()));
        }
        Op::ChangePaidRates {
            system_paid_rate,
            writer_paid_rate,
        } => token.change_paid_rates(caller, *system_paid_rate, *writer_paid_rate)?,
        Op::ChangeWallet { wallet } => token.change_wallet(caller, wallet)?,
        Op::ChangeDeputation { deputation } => token.change_deputation(caller, deputation)?,

        Op::Pause => token.pause(caller)?,
        Op::Unpause => token.unpause(caller)?,

        Op::SetDelegatedFrom { addr } => token.set_delegated_from(caller, addr)?,
        Op::DelegateTransfer { to, value, origin } => {
            token.delegate_transfer(caller, to, *value, origin)?
        }
        Op::DelegateTransferFrom {
            from,
            to,
            value,
            origin,
        } => token.delegate_transfer_from(caller, from, to, *value, origin)?,
        Op::DelegateApprove {
            spender,
            value,
            origin,
        } => token.delegate_approve(caller, spender, *value, origin)?,
        Op::DelegateIncreaseApproval {
            spender,
            value,
            origin,
        } => token.delegate_increase_approval(caller, spender, *value, origin)?,
        Op::DelegateDecreaseApproval {
            spender,
            value,
            origin,
        } => token.delegate_decrease_approval(caller, spender, *value, origin)?,
        Op::DelegateBurn { from, value, note } => token.delegate_burn(caller, from, *value, note)?,
        Op::DelegateTotalSupply => return Ok(amount_value(token.delegate_total_supply(caller)?)),
        Op::DelegateBalanceOf { who } => {
            return Ok(amount_value(token.delegate_balance_of(caller, who)?))
        }
        Op::DelegateAllowance { owner, spender } => {
            return Ok(amount_value(token.delegate_allowance(caller, owner, spender)?))
        }

        Op::SetToken
        | Op::DeputationAddAdmins { .. }
        | Op::DeputationRemoveAdmins { .. }
        | Op::Distribute { .. }
        | Op::PoolBalance => {
            return Err(LedgerError::invalid("deputation operation sent to the token"))
        }
    }
    Ok(None)
}
