/*!
# Solana RPC Endpoint Adapter

Implements the engine's `Endpoint` trait against a Solana RPC node. The
resource being budgeted is the serialized transaction size: the probe packs
recipients into one transaction until it approaches the wire packet limit,
which is what actually bounds how many transfers fit per submission.

Native sends use per-entry system transfers (the chunk's aggregate value
rides inside the instructions, so the engine's attached value is implicit
here). Token sends transfer from the payer's associated token account and
create each recipient's account idempotently; "authorization" for this
adapter means the source account holds at least the total the run needs.
*/

use async_trait::async_trait;
use scatter_engine::{Endpoint, EndpointError, SubmitReceipt};
use scatter_recipients::{Asset, Entry};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    instruction::Instruction,
    message::Message,
    signature::Keypair,
    signer::Signer,
    system_instruction,
    transaction::Transaction,
};
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account_idempotent,
};
use std::sync::Arc;

/// Wire packet ceiling for one serialized transaction, in bytes.
pub const TRANSACTION_SIZE_CEILING: u64 = solana_sdk::packet::PACKET_DATA_SIZE as u64;

pub struct RpcEndpoint {
    rpc_client: Arc<RpcClient>,
    payer: Keypair,
    asset: Asset,
}

impl RpcEndpoint {
    pub fn new(rpc_client: Arc<RpcClient>, payer: Keypair, asset: Asset) -> Self {
        Self {
            rpc_client,
            payer,
            asset,
        }
    }

    fn build_instructions(&self, entries: &[Entry]) -> Result<Vec<Instruction>, EndpointError> {
        let payer = self.payer.pubkey();
        let mut instructions = Vec::new();

        match &self.asset {
            Asset::Native => {
                for entry in entries {
                    instructions.push(system_instruction::transfer(
                        &payer,
                        &entry.address,
                        entry.amount_units,
                    ));
                }
            }
            Asset::Token { mint } => {
                let source = get_associated_token_address(&payer, mint);
                for entry in entries {
                    let destination = get_associated_token_address(&entry.address, mint);
                    instructions.push(create_associated_token_account_idempotent(
                        &payer,
                        &entry.address,
                        mint,
                        &spl_token::id(),
                    ));
                    let transfer = spl_token::instruction::transfer(
                        &spl_token::id(),
                        &source,
                        &destination,
                        &payer,
                        &[],
                        entry.amount_units,
                    )
                    .map_err(|e| {
                        EndpointError::from_message(format!(
                            "Failed to build token transfer: {}",
                            e
                        ))
                    })?;
                    instructions.push(transfer);
                }
            }
        }

        Ok(instructions)
    }

    async fn build_transaction(&self, entries: &[Entry]) -> Result<Transaction, EndpointError> {
        let instructions = self.build_instructions(entries)?;
        let blockhash = self
            .rpc_client
            .get_latest_blockhash()
            .await
            .map_err(|e| EndpointError::from_message(format!("Failed to fetch blockhash: {}", e)))?;

        let message =
            Message::new_with_blockhash(&instructions, Some(&self.payer.pubkey()), &blockhash);
        Ok(Transaction::new_unsigned(message))
    }

    fn serialized_size(transaction: &Transaction) -> Result<u64, EndpointError> {
        let bytes = bincode::serialize(transaction).map_err(|e| {
            EndpointError::from_message(format!("Failed to serialize transaction: {}", e))
        })?;
        Ok(bytes.len() as u64)
    }
}

#[async_trait]
impl Endpoint for RpcEndpoint {
    async fn estimate_cost(&self, entries: &[Entry]) -> Result<u64, EndpointError> {
        let transaction = self.build_transaction(entries).await?;
        Self::serialized_size(&transaction)
    }

    async fn ensure_authorization(&self, total_required: u64) -> Result<(), EndpointError> {
        let Asset::Token { mint } = &self.asset else {
            return Ok(());
        };

        let source = get_associated_token_address(&self.payer.pubkey(), mint);
        let balance = self
            .rpc_client
            .get_token_account_balance(&source)
            .await
            .map_err(|e| {
                EndpointError::from_message(format!("Failed to read source token account: {}", e))
            })?;

        let available: u64 = balance.amount.parse().map_err(|e| {
            EndpointError::from_message(format!("Unparseable token balance: {}", e))
        })?;

        if available < total_required {
            return Err(EndpointError::from_message(format!(
                "Insufficient token balance: need {} base units, have {}",
                total_required, available
            )));
        }

        Ok(())
    }

    async fn submit_chunk(
        &self,
        entries: &[Entry],
        _attached_value: Option<u64>,
    ) -> Result<SubmitReceipt, EndpointError> {
        let mut transaction = self.build_transaction(entries).await?;
        let blockhash = transaction.message.recent_blockhash;
        transaction
            .try_sign(&[&self.payer], blockhash)
            .map_err(|e| {
                EndpointError::from_message(format!("Failed to sign transaction: {}", e))
            })?;

        let confirmed_cost = Self::serialized_size(&transaction)?;
        let signature = self
            .rpc_client
            .send_and_confirm_transaction(&transaction)
            .await
            .map_err(|e| EndpointError::from_message(format!("Submission failed: {}", e)))?;

        Ok(SubmitReceipt {
            handle: signature.to_string(),
            confirmed_cost,
        })
    }
}
